//! Offline cache worker.
//!
//! The worker script imports the wasm bundle and forwards its `install`,
//! `activate`, `fetch` and `sync` events to the `sw_*` exports below.

use js_sys::{Array, Promise, Reflect};
use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, future_to_promise};
use web_sys::{Cache, ExtendableEvent, FetchEvent, Request, RequestMode, ServiceWorkerGlobalScope};

use crate::error::{AppError, Result};

pub const CACHE_NAME: &str = "christmas-countdown-v1";
pub const PRECACHE_URLS: [&str; 5] = [
    "/",
    "/index.html",
    "/manifest.json",
    "/pkg/christmas_countdown.js",
    "/pkg/christmas_countdown_bg.wasm",
];
pub const SYNC_TAG: &str = "countdown-sync";
const NAVIGATION_FALLBACK: &str = "/";

/// Cache names `activate` should delete.
pub fn stale_caches(names: &[String]) -> Vec<&str> {
    names.iter().map(String::as_str).filter(|n| *n != CACHE_NAME).collect()
}

/// Cached URL served when the network fails.
pub fn fallback_for(navigate: bool) -> Option<&'static str> {
    navigate.then_some(NAVIGATION_FALLBACK)
}

#[derive(Serialize)]
struct SyncMessage {
    #[serde(rename = "type")]
    kind: &'static str,
}

pub fn sync_message() -> String {
    serde_json::to_string(&SyncMessage { kind: "SYNC_COUNTDOWN" }).unwrap_or_default()
}

fn scope() -> Result<ServiceWorkerGlobalScope> {
    js_sys::global()
        .dyn_into()
        .map_err(|_| AppError::Js("not running in a service worker".into()))
}

fn into_promise(fut: impl std::future::Future<Output = Result<JsValue>> + 'static) -> Promise {
    future_to_promise(async move { fut.await.map_err(JsValue::from) })
}

async fn precache() -> Result<JsValue> {
    let caches = scope()?.caches()?;
    let cache: Cache = JsFuture::from(caches.open(CACHE_NAME)).await?.dyn_into()?;
    let urls: Array = PRECACHE_URLS.iter().map(|u| JsValue::from_str(u)).collect();
    if let Err(e) = JsFuture::from(cache.add_all_with_str_sequence(&urls)).await {
        log::warn!("service worker install failed: {}", AppError::from(e));
    }
    Ok(JsValue::UNDEFINED)
}

async fn drop_stale_caches() -> Result<JsValue> {
    let caches = scope()?.caches()?;
    let keys: Array = JsFuture::from(caches.keys()).await?.dyn_into()?;
    let names: Vec<String> = keys.iter().filter_map(|k| k.as_string()).collect();
    for name in stale_caches(&names) {
        JsFuture::from(caches.delete(name)).await?;
        log::info!("deleted cache {name}");
    }
    Ok(JsValue::UNDEFINED)
}

async fn cache_first(request: Request) -> Result<JsValue> {
    let scope = scope()?;
    let caches = scope.caches()?;
    let hit = JsFuture::from(caches.match_with_request(&request)).await?;
    if !hit.is_undefined() {
        return Ok(hit);
    }
    let navigate = request.mode() == RequestMode::Navigate;
    match JsFuture::from(scope.fetch_with_request(&request)).await {
        Ok(response) => Ok(response),
        Err(e) => {
            if let Some(url) = fallback_for(navigate) {
                let cached = JsFuture::from(caches.match_with_str(url)).await?;
                if !cached.is_undefined() {
                    return Ok(cached);
                }
            }
            Err(e.into())
        }
    }
}

async fn notify_clients() -> Result<JsValue> {
    let clients: Array = JsFuture::from(scope()?.clients().match_all()).await?.dyn_into()?;
    let message = js_sys::JSON::parse(&sync_message())?;
    for client in clients.iter() {
        let client: web_sys::Client = client.dyn_into()?;
        client.post_message(&message)?;
    }
    Ok(JsValue::UNDEFINED)
}

#[wasm_bindgen]
pub fn sw_install(event: ExtendableEvent) -> std::result::Result<(), JsValue> {
    event.wait_until(&into_promise(precache()))
}

#[wasm_bindgen]
pub fn sw_activate(event: ExtendableEvent) -> std::result::Result<(), JsValue> {
    event.wait_until(&into_promise(drop_stale_caches()))
}

#[wasm_bindgen]
pub fn sw_fetch(event: FetchEvent) -> std::result::Result<(), JsValue> {
    event.respond_with(&into_promise(cache_first(event.request())))
}

/// `sync` carries a `tag` that web-sys has no binding for.
#[wasm_bindgen]
pub fn sw_sync(event: ExtendableEvent) -> std::result::Result<(), JsValue> {
    let tag = Reflect::get(&event, &JsValue::from_str("tag"))?.as_string();
    if tag.as_deref() != Some(SYNC_TAG) {
        return Ok(());
    }
    event.wait_until(&into_promise(notify_clients()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_other_caches_are_stale() {
        let names = vec![
            "christmas-countdown-v0".to_string(),
            CACHE_NAME.to_string(),
            "unrelated".to_string(),
        ];
        assert_eq!(stale_caches(&names), vec!["christmas-countdown-v0", "unrelated"]);
    }

    #[test]
    fn navigation_falls_back_to_root() {
        assert_eq!(fallback_for(true), Some("/"));
        assert_eq!(fallback_for(false), None);
        assert!(PRECACHE_URLS.contains(&"/"));
    }

    #[test]
    fn sync_message_shape() {
        let v: serde_json::Value = serde_json::from_str(&sync_message()).unwrap();
        assert_eq!(v, serde_json::json!({ "type": "SYNC_COUNTDOWN" }));
    }
}
