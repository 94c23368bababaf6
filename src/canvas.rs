//! Transparent full-viewport canvases the simulators paint on.

use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::dom;
use crate::error::{AppError, Result};

pub struct CanvasLayer {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasLayer {
    /// Reuse `#id` or append a new fixed canvas to `<body>`, sized to the viewport.
    pub fn attach(id: &str, z_index: i32) -> Result<Self> {
        let doc = dom::document()?;
        let canvas: HtmlCanvasElement = match doc.get_element_by_id(id) {
            Some(el) => el
                .dyn_into()
                .map_err(|_| AppError::MissingElement(id.to_string()))?,
            None => {
                let c: HtmlCanvasElement = doc
                    .create_element("canvas")?
                    .dyn_into()
                    .map_err(|_| AppError::Canvas(id.to_string()))?;
                c.set_id(id);
                let body = doc.body().ok_or_else(|| AppError::MissingElement("body".into()))?;
                body.append_child(&c)?;
                c
            }
        };
        canvas
            .set_attribute(
                "style",
                &format!(
                    "position:fixed; inset:0; pointer-events:none; background:transparent; z-index:{z_index};"
                ),
            )
            .ok();
        canvas.set_attribute("aria-hidden", "true").ok();
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| AppError::Canvas(id.to_string()))?
            .dyn_into()
            .map_err(|_| AppError::Canvas(id.to_string()))?;
        let layer = Self { canvas, ctx };
        layer.fit_to_viewport();
        Ok(layer)
    }

    /// Match the backing store to the viewport; returns the new size.
    pub fn fit_to_viewport(&self) -> (f64, f64) {
        if let Some(win) = web_sys::window() {
            let (w, h) = dom::viewport_size(&win);
            self.canvas.set_width(w.max(0.0) as u32);
            self.canvas.set_height(h.max(0.0) as u32);
        }
        self.size()
    }

    pub fn size(&self) -> (f64, f64) {
        (self.canvas.width() as f64, self.canvas.height() as f64)
    }

    pub fn ctx(&self) -> &CanvasRenderingContext2d {
        &self.ctx
    }

    pub fn clear(&self) {
        let (w, h) = self.size();
        self.ctx.clear_rect(0.0, 0.0, w, h);
    }

    pub fn set_visible(&self, visible: bool) {
        if visible {
            self.canvas.remove_attribute("hidden").ok();
        } else {
            self.canvas.set_attribute("hidden", "").ok();
        }
    }
}
