//! Startup configuration and environment signals.
//!
//! `AppConfig` comes from the optional JSON string handed to `start_app`; every
//! field has a default so `"{}"` (or an empty string) is a valid config.
//! `Environment` is read once from the browser and passed to the simulators.

use serde::{Deserialize, Serialize};
use web_sys::Window;

use crate::error::Result;
use crate::theme::Theme;

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Initial timezone selector value (`"local"`, `"UTC"` or an IANA name).
    pub timezone: String,
    /// Initial theme id.
    pub theme: String,
    /// Viewports narrower than this (CSS px) count as constrained.
    pub mobile_breakpoint: f64,
    /// Treat the page as reduce-motion regardless of the media query.
    pub force_reduced_motion: bool,
    pub snow: SnowSettings,
    pub elements: ElementIds,
    /// Extra themes; an entry with a built-in id replaces the built-in.
    pub themes: Vec<Theme>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            timezone: "local".into(),
            theme: "classic".into(),
            mobile_breakpoint: 768.0,
            force_reduced_motion: false,
            snow: SnowSettings::default(),
            elements: ElementIds::default(),
            themes: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowSettings {
    pub count: usize,
    pub mobile_count: usize,
    pub fps: u32,
    pub mobile_fps: u32,
}

impl Default for SnowSettings {
    fn default() -> Self {
        Self { count: 150, mobile_count: 60, fps: 60, mobile_fps: 30 }
    }
}

impl SnowSettings {
    pub fn population(&self, env: &Environment) -> usize {
        if env.reduced_motion {
            0
        } else if env.mobile {
            self.mobile_count
        } else {
            self.count
        }
    }

    pub fn target_fps(&self, env: &Environment) -> u32 {
        if env.mobile { self.mobile_fps } else { self.fps }
    }
}

/// DOM ids the app reads or creates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementIds {
    pub root: String,
    pub snow_canvas: String,
    pub particle_canvas: String,
    pub timezone_select: String,
    pub theme_buttons: String,
    pub mute_button: String,
    pub chime_button: String,
    pub celebrate_button: String,
    pub install_button: String,
}

impl Default for ElementIds {
    fn default() -> Self {
        Self {
            root: "countdown-app".into(),
            snow_canvas: "snow-canvas".into(),
            particle_canvas: "particle-canvas".into(),
            timezone_select: "timezone-select".into(),
            theme_buttons: "theme-buttons".into(),
            mute_button: "mute-btn".into(),
            chime_button: "chime-btn".into(),
            celebrate_button: "celebrate-btn".into(),
            install_button: "install-btn".into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Environment {
    pub reduced_motion: bool,
    pub mobile: bool,
}

impl Environment {
    pub fn detect(window: &Window, config: &AppConfig) -> Self {
        let prefers_reduced = window
            .match_media(REDUCED_MOTION_QUERY)
            .ok()
            .flatten()
            .map(|mq| mq.matches())
            .unwrap_or(false);
        let width = window
            .inner_width()
            .ok()
            .and_then(|w| w.as_f64())
            .unwrap_or(f64::MAX);
        Self {
            reduced_motion: prefers_reduced || config.force_reduced_motion,
            mobile: width < config.mobile_breakpoint,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_is_default_config() {
        assert_eq!(AppConfig::from_json("").unwrap(), AppConfig::default());
        assert_eq!(AppConfig::from_json("{}").unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let cfg = AppConfig::from_json(r#"{ "timezone": "UTC", "snow": { "count": 80 } }"#).unwrap();
        assert_eq!(cfg.timezone, "UTC");
        assert_eq!(cfg.snow.count, 80);
        assert_eq!(cfg.snow.mobile_count, 60);
        assert_eq!(cfg.theme, "classic");
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = AppConfig::from_json("{ timezone: ").unwrap_err();
        assert!(matches!(err, crate::error::AppError::Config(_)));
    }

    #[test]
    fn snow_population_follows_environment() {
        let snow = SnowSettings::default();
        let desktop = Environment::default();
        let mobile = Environment { mobile: true, ..Default::default() };
        let still = Environment { reduced_motion: true, mobile: true };
        assert_eq!(snow.population(&desktop), 150);
        assert_eq!(snow.population(&mobile), 60);
        assert_eq!(snow.population(&still), 0);
        assert_eq!(snow.target_fps(&desktop), 60);
        assert_eq!(snow.target_fps(&mobile), 30);
    }
}
