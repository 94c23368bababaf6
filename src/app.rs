//! Page lifecycle: builds every component on `start_app`, routes the JS
//! exports to the running instance and tears it all down on `stop_app`.

use std::cell::RefCell;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use wasm_bindgen::prelude::*;

use crate::audio::AudioControls;
use crate::config::{AppConfig, Environment};
use crate::controls::{ThemeButtons, TimezoneSelect};
use crate::countdown::{Countdown, TIMEZONE_OPTIONS, TimezoneSelection};
use crate::display::Display;
use crate::dom;
use crate::error::{AppError, Result};
use crate::install::InstallButton;
use crate::particles::ParticleLayer;
use crate::snow::SnowLayer;
use crate::theme::{ParticleConfig, Theme, ThemeRegistry};

thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

struct App {
    config: AppConfig,
    env: Environment,
    registry: ThemeRegistry,
    theme_id: String,
    countdown: Countdown,
    snow: Option<SnowLayer>,
    particles: Option<ParticleLayer>,
    theme_buttons: ThemeButtons,
    display: Rc<Display>,
    _timezone: TimezoneSelect,
    _audio: AudioControls,
    _install: Option<InstallButton>,
}

fn mount_particles(config: &ParticleConfig, env: &Environment, canvas_id: &str) -> Option<ParticleLayer> {
    ParticleLayer::mount(config, env, canvas_id).unwrap_or_else(|e| {
        log::warn!("particles disabled: {e}");
        None
    })
}

impl App {
    fn start(config: AppConfig) -> Result<Self> {
        let window = dom::window()?;
        let env = Environment::detect(&window, &config);
        let registry = ThemeRegistry::new(&config.themes);
        let ids = config.elements.clone();

        let display = Rc::new(Display::build(&ids.root)?);
        let card = display.card()?;
        let audio = AudioControls::mount(&card, &ids)?;

        let selection = TimezoneSelection::parse(&config.timezone);
        let publish_display = display.clone();
        let reached = audio.handle();
        let countdown = Countdown::mount(selection, move |left| {
            publish_display.render(&left);
            reached.set_reached(left.is_reached());
        })?;

        let timezone = TimezoneSelect::mount(&card, &ids.timezone_select, selection, |selection| {
            with_app(|app| app.countdown.set_timezone(selection));
        })?;
        let theme_buttons = ThemeButtons::mount(&card, &ids.theme_buttons, &registry, |id| {
            with_app(|app| app.apply_theme(id));
        })?;
        let install = InstallButton::mount(&card, &ids.install_button)
            .inspect_err(|e| log::warn!("install prompt unavailable: {e}"))
            .ok();

        let theme = registry.resolve(&config.theme).clone();
        let snow = SnowLayer::mount(&config.snow, &env, &theme.snow, &ids.snow_canvas)?;

        log::info!(
            "started: timezone={}, theme={}, reduced_motion={}, mobile={}",
            selection.value(),
            theme.id,
            env.reduced_motion,
            env.mobile
        );
        let mut app = Self {
            config,
            env,
            registry,
            theme_id: String::new(),
            countdown,
            snow,
            particles: None,
            theme_buttons,
            display,
            _timezone: timezone,
            _audio: audio,
            _install: install,
        };
        app.show_theme(&theme);
        Ok(app)
    }

    fn apply_theme(&mut self, id: &str) {
        let theme = self.registry.resolve(id).clone();
        if theme.id != id {
            log::warn!("unknown theme {id:?}, using {}", theme.id);
        }
        if theme.id == self.theme_id {
            return;
        }
        self.show_theme(&theme);
        log::info!("theme: {}", theme.id);
    }

    /// Palette, snow overrides and particles for `theme`. The snow layer is
    /// adjusted in place, never remounted.
    fn show_theme(&mut self, theme: &Theme) {
        self.display.apply_palette(&theme.palette);
        if let Some(snow) = &self.snow {
            snow.apply_overrides(&theme.snow);
        }
        if let Some(config) = &theme.particles {
            if let Some(layer) = &self.particles {
                layer.retheme(config);
            } else {
                self.particles = mount_particles(config, &self.env, &self.config.elements.particle_canvas);
            }
        } else {
            self.particles = None;
        }
        self.theme_buttons.mark_active(&theme.id);
        self.theme_id = theme.id.clone();
    }
}

fn with_app<R>(f: impl FnOnce(&mut App) -> R) -> Option<R> {
    APP.with(|slot| slot.borrow_mut().as_mut().map(f))
}

fn running<R>(f: impl FnOnce(&mut App) -> R) -> Result<R> {
    with_app(f).ok_or(AppError::NotStarted)
}

pub fn themes_to_json(registry: &ThemeRegistry) -> Result<String> {
    Ok(serde_json::to_string(&registry.iter().collect::<Vec<_>>())?)
}

pub fn timezones_to_json() -> Result<String> {
    Ok(serde_json::to_string(&TIMEZONE_OPTIONS)?)
}

pub fn remaining_to_json(value: &str, now: DateTime<Utc>) -> Result<String> {
    Ok(serde_json::to_string(&TimezoneSelection::parse(value).time_left(now))?)
}

/// Mount the app. `config_json` may be omitted; a running instance is
/// stopped first.
#[wasm_bindgen]
pub fn start_app(config_json: Option<String>) -> std::result::Result<(), JsValue> {
    stop_app();
    let config = AppConfig::from_json(config_json.as_deref().unwrap_or(""))?;
    let app = App::start(config).inspect_err(|e| log::error!("start failed: {e}"))?;
    APP.with(|slot| *slot.borrow_mut() = Some(app));
    Ok(())
}

#[wasm_bindgen]
pub fn stop_app() {
    let app = APP.with(|slot| slot.borrow_mut().take());
    if app.is_some() {
        drop(app);
        log::info!("stopped");
    }
}

#[wasm_bindgen]
pub fn set_theme(id: &str) -> std::result::Result<(), JsValue> {
    running(|app| app.apply_theme(id))?;
    Ok(())
}

/// Accepts the same values as the selector; unknown values mean local time.
#[wasm_bindgen]
pub fn set_timezone(value: &str) -> std::result::Result<(), JsValue> {
    let selection = TimezoneSelection::parse(value);
    running(|app| app.countdown.set_timezone(selection))?;
    Ok(())
}

/// Themes of the running app, or the built-in set when stopped.
#[wasm_bindgen]
pub fn themes_json() -> std::result::Result<String, JsValue> {
    let json = with_app(|app| themes_to_json(&app.registry))
        .unwrap_or_else(|| themes_to_json(&ThemeRegistry::default()))?;
    Ok(json)
}

#[wasm_bindgen]
pub fn timezones_json() -> std::result::Result<String, JsValue> {
    Ok(timezones_to_json()?)
}

/// One-off calculation for `value`, independent of the mounted countdown.
#[wasm_bindgen]
pub fn remaining_time(value: &str) -> std::result::Result<String, JsValue> {
    Ok(remaining_to_json(value, Utc::now())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn themes_json_lists_builtins_in_order() {
        let json = themes_to_json(&ThemeRegistry::default()).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        let ids: Vec<&str> = v.as_array().unwrap().iter().map(|t| t["id"].as_str().unwrap()).collect();
        assert_eq!(ids, ["classic", "starry", "frost", "neon", "retro"]);
        assert!(v[0]["particles"].is_null());
    }

    #[test]
    fn timezones_json_starts_with_local() {
        let v: serde_json::Value = serde_json::from_str(&timezones_to_json().unwrap()).unwrap();
        assert_eq!(v[0]["value"], "local");
        assert_eq!(v.as_array().unwrap().len(), TIMEZONE_OPTIONS.len());
    }

    #[test]
    fn remaining_json_for_utc() {
        let now = Utc.with_ymd_and_hms(2024, 12, 1, 12, 0, 0).unwrap();
        let v: serde_json::Value = serde_json::from_str(&remaining_to_json("UTC", now).unwrap()).unwrap();
        assert_eq!(v, serde_json::json!({ "days": 23, "hours": 12, "minutes": 0, "seconds": 0 }));
    }

    #[test]
    fn exports_need_a_running_app() {
        assert!(matches!(running(|_| ()), Err(AppError::NotStarted)));
    }
}
