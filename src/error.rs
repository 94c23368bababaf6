//! Errors raised by the browser glue. The countdown math and the simulators
//! never fail; everything here comes from DOM lookups, JS calls or config.

use std::fmt;

use wasm_bindgen::JsValue;

#[derive(Debug)]
pub enum AppError {
    /// No global `window` (e.g. running inside a worker).
    NoWindow,
    /// Window without a document.
    NoDocument,
    /// An element the page needs was not found and could not be created.
    MissingElement(String),
    /// 2d context could not be obtained for a canvas.
    Canvas(String),
    /// Config or theme JSON could not be parsed.
    Config(serde_json::Error),
    /// A JS call threw.
    Js(String),
    /// An export that needs a running app was called before `start_app`.
    NotStarted,
}

pub type Result<T> = std::result::Result<T, AppError>;

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NoWindow => write!(f, "no window"),
            AppError::NoDocument => write!(f, "no document"),
            AppError::MissingElement(id) => write!(f, "missing element #{id}"),
            AppError::Canvas(id) => write!(f, "no 2d context for canvas #{id}"),
            AppError::Config(e) => write!(f, "invalid config: {e}"),
            AppError::Js(msg) => write!(f, "js error: {msg}"),
            AppError::NotStarted => write!(f, "app not started"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Config(e)
    }
}

impl From<JsValue> for AppError {
    fn from(v: JsValue) -> Self {
        AppError::Js(v.as_string().unwrap_or_else(|| format!("{v:?}")))
    }
}

impl From<AppError> for JsValue {
    fn from(e: AppError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}
