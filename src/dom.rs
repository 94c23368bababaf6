use web_sys::{Document, Element, Window};

use crate::error::{AppError, Result};

pub fn window() -> Result<Window> {
    web_sys::window().ok_or(AppError::NoWindow)
}

pub fn document() -> Result<Document> {
    window()?.document().ok_or(AppError::NoDocument)
}

pub fn element(id: &str) -> Result<Element> {
    document()?
        .get_element_by_id(id)
        .ok_or_else(|| AppError::MissingElement(id.to_string()))
}

/// Return `#id`, creating it as a `tag` child of `parent` when absent.
pub fn ensure_child(parent: &Element, tag: &str, id: &str) -> Result<Element> {
    let doc = document()?;
    if let Some(el) = doc.get_element_by_id(id) {
        return Ok(el);
    }
    let el = doc.create_element(tag)?;
    el.set_id(id);
    parent.append_child(&el)?;
    Ok(el)
}

/// Body-level container, created when the host page does not provide one.
pub fn ensure_root(id: &str) -> Result<Element> {
    let doc = document()?;
    if let Some(el) = doc.get_element_by_id(id) {
        return Ok(el);
    }
    let body = doc.body().ok_or_else(|| AppError::MissingElement("body".into()))?;
    ensure_child(&body, "div", id)
}

pub fn set_text(id: &str, text: &str) {
    if let Ok(el) = element(id) {
        el.set_text_content(Some(text));
    }
}

pub fn set_class(id: &str, class: &str) {
    if let Ok(el) = element(id) {
        el.set_class_name(class);
    }
}

pub fn set_hidden(id: &str, hidden: bool) {
    if let Ok(el) = element(id) {
        if hidden {
            el.set_attribute("hidden", "").ok();
        } else {
            el.remove_attribute("hidden").ok();
        }
    }
}

pub fn viewport_size(window: &Window) -> (f64, f64) {
    let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    (w, h)
}
