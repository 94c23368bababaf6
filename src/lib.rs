//! Christmas countdown core crate.
//!
//! A timezone-aware countdown to December 25 with two canvas layers (falling
//! snow and theme particles), theme switching, an optional bell chime, an
//! install button and the handlers of the offline cache worker. The page calls
//! `start_app()`; the worker script forwards its events to the `sw_*` exports.

use wasm_bindgen::prelude::*;

mod app;
mod canvas;
mod controls;
mod dom;

pub mod audio;
pub mod config;
pub mod countdown;
pub mod display;
pub mod error;
pub mod install;
pub mod particles;
pub mod scheduler;
pub mod snow;
pub mod sw;
pub mod theme;

pub use app::{
    remaining_time, remaining_to_json, set_theme, set_timezone, start_app, stop_app, themes_json,
    themes_to_json, timezones_json, timezones_to_json,
};
pub use countdown::{RemainingTime, TimezoneSelection, time_left};
pub use error::{AppError, Result};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::warn!("logger already initialised");
    }
}
