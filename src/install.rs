//! "Install app" button driven by the browser's deferred install prompt.

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Element, Event};

use crate::dom;
use crate::error::Result;
use crate::scheduler::Listener;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstallOutcome {
    Accepted,
    Dismissed,
}

impl InstallOutcome {
    /// `userChoice.outcome`; anything but "accepted" counts as dismissed.
    pub fn from_choice(outcome: &str) -> Self {
        if outcome == "accepted" { Self::Accepted } else { Self::Dismissed }
    }
}

/// Holds the deferred prompt event until the user asks to install.
#[derive(Debug)]
pub struct InstallPrompt<E> {
    deferred: Option<E>,
    installed: bool,
}

impl<E> Default for InstallPrompt<E> {
    fn default() -> Self {
        Self { deferred: None, installed: false }
    }
}

impl<E> InstallPrompt<E> {
    pub fn capture(&mut self, event: E) {
        if !self.installed {
            self.deferred = Some(event);
        }
    }

    pub fn is_visible(&self) -> bool {
        self.deferred.is_some() && !self.installed
    }

    /// Hand out the stored event; a prompt can only be shown once.
    pub fn take(&mut self) -> Option<E> {
        self.deferred.take()
    }

    pub fn mark_installed(&mut self) {
        self.installed = true;
        self.deferred = None;
    }

    pub fn is_installed(&self) -> bool {
        self.installed
    }
}

async fn show_prompt(event: Event) -> Result<InstallOutcome> {
    let prompt: Function = Reflect::get(&event, &JsValue::from_str("prompt"))?.dyn_into()?;
    prompt.call0(&event)?;
    let choice: Promise = Reflect::get(&event, &JsValue::from_str("userChoice"))?.dyn_into()?;
    let choice = JsFuture::from(choice).await?;
    let outcome = Reflect::get(&choice, &JsValue::from_str("outcome"))?
        .as_string()
        .unwrap_or_default();
    Ok(InstallOutcome::from_choice(&outcome))
}

pub struct InstallButton {
    _listeners: Vec<Listener>,
}

impl InstallButton {
    pub fn mount(parent: &Element, id: &str) -> Result<Self> {
        let win = dom::window()?;
        let button = dom::ensure_child(parent, "button", id)?;
        button.set_attribute("aria-label", "Install Christmas Countdown app").ok();
        button.set_text_content(Some("📱 Install App"));

        let state: Rc<RefCell<InstallPrompt<Event>>> = Rc::default();
        let button_id: Rc<str> = Rc::from(id);
        let render = {
            let state = state.clone();
            let button_id = button_id.clone();
            move || dom::set_hidden(&button_id, !state.borrow().is_visible())
        };
        render();

        let on_prompt = {
            let state = state.clone();
            let render = render.clone();
            move |event: Event| {
                event.prevent_default();
                state.borrow_mut().capture(event);
                render();
            }
        };
        let on_installed = {
            let state = state.clone();
            let render = render.clone();
            move |_: Event| {
                state.borrow_mut().mark_installed();
                render();
                log::info!("app installed");
            }
        };
        let on_click = move |_: Event| {
            let Some(event) = state.borrow_mut().take() else { return };
            render();
            wasm_bindgen_futures::spawn_local(async move {
                match show_prompt(event).await {
                    Ok(InstallOutcome::Accepted) => log::info!("install prompt accepted"),
                    Ok(InstallOutcome::Dismissed) => log::info!("install prompt dismissed"),
                    Err(e) => log::warn!("install prompt failed: {e}"),
                }
            });
        };

        let listeners = vec![
            Listener::new(win.as_ref(), "beforeinstallprompt", on_prompt)?,
            Listener::new(win.as_ref(), "appinstalled", on_installed)?,
            Listener::new(button.as_ref(), "click", on_click)?,
        ];
        Ok(Self { _listeners: listeners })
    }
}
