//! Themes: palette classes for the display, snow overrides, and the optional
//! particle configuration that drives the theme particle simulator.

use serde::{Deserialize, Serialize};

use crate::config::Environment;

/// Particle animation rule of a theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleStyle {
    #[serde(alias = "stars")]
    Star,
    #[serde(alias = "sparkles")]
    Sparkle,
    Neon,
    #[serde(alias = "retro")]
    Trail,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticleConfig {
    pub style: ParticleStyle,
    pub count: usize,
    /// Any CSS colour.
    pub color: String,
}

impl ParticleConfig {
    /// Population for the current environment: none under reduce-motion, half
    /// on constrained viewports.
    pub fn count_for(&self, env: &Environment) -> usize {
        if env.reduced_motion {
            0
        } else if env.mobile {
            self.count.div_ceil(2)
        } else {
            self.count
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnowOverrides {
    /// Multiplier on every flake's fall speed.
    pub speed: f64,
    /// Flake colour as RGB; per-flake opacity is applied on top.
    pub color: [u8; 3],
}

impl Default for SnowOverrides {
    fn default() -> Self {
        Self { speed: 1.0, color: [255, 255, 255] }
    }
}

/// CSS class names applied to the display surface.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: String,
    pub card: String,
    pub title: String,
    pub accent: String,
    pub secondary: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: "bg-gradient-to-br from-red-600 via-red-700 to-green-700".into(),
            card: "bg-white".into(),
            title: "text-red-600".into(),
            accent: "text-red-600 bg-red-50".into(),
            secondary: "text-green-600 bg-green-50".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub palette: Palette,
    #[serde(default)]
    pub particles: Option<ParticleConfig>,
    #[serde(default)]
    pub snow: SnowOverrides,
}

fn palette(background: &str, card: &str, title: &str, accent: &str, secondary: &str) -> Palette {
    Palette {
        background: background.into(),
        card: card.into(),
        title: title.into(),
        accent: accent.into(),
        secondary: secondary.into(),
    }
}

fn particles(style: ParticleStyle, count: usize, color: &str) -> Option<ParticleConfig> {
    Some(ParticleConfig { style, count, color: color.into() })
}

pub fn builtin_themes() -> Vec<Theme> {
    vec![
        Theme {
            id: "classic".into(),
            label: "Classic".into(),
            palette: Palette::default(),
            particles: None,
            snow: SnowOverrides::default(),
        },
        Theme {
            id: "starry".into(),
            label: "Starry Night".into(),
            palette: palette(
                "bg-gradient-to-br from-indigo-900 via-blue-900 to-slate-900",
                "bg-slate-800/90",
                "text-yellow-300",
                "text-yellow-300 bg-slate-700",
                "text-blue-200 bg-slate-700",
            ),
            particles: particles(ParticleStyle::Star, 80, "#fde68a"),
            snow: SnowOverrides { speed: 0.7, color: [226, 232, 240] },
        },
        Theme {
            id: "frost".into(),
            label: "Frost".into(),
            palette: palette(
                "bg-gradient-to-br from-sky-200 via-cyan-100 to-white",
                "bg-white/80",
                "text-sky-700",
                "text-sky-700 bg-sky-50",
                "text-cyan-600 bg-cyan-50",
            ),
            particles: particles(ParticleStyle::Sparkle, 60, "#e0f2fe"),
            snow: SnowOverrides { speed: 1.2, color: [240, 249, 255] },
        },
        Theme {
            id: "neon".into(),
            label: "Neon".into(),
            palette: palette(
                "bg-gradient-to-br from-fuchsia-900 via-purple-950 to-black",
                "bg-black/80",
                "text-fuchsia-400",
                "text-fuchsia-400 bg-purple-950",
                "text-cyan-300 bg-purple-950",
            ),
            particles: particles(ParticleStyle::Neon, 40, "#f0abfc"),
            snow: SnowOverrides { speed: 1.0, color: [244, 114, 182] },
        },
        Theme {
            id: "retro".into(),
            label: "Retro".into(),
            palette: palette(
                "bg-gradient-to-br from-orange-500 via-amber-600 to-emerald-800",
                "bg-amber-50",
                "text-orange-700",
                "text-orange-700 bg-orange-100",
                "text-emerald-700 bg-emerald-100",
            ),
            particles: particles(ParticleStyle::Trail, 25, "#fbbf24"),
            snow: SnowOverrides { speed: 0.9, color: [254, 243, 199] },
        },
    ]
}

/// Ordered theme list: built-ins first, then custom entries. The first theme
/// is the fallback for unknown ids.
#[derive(Clone, Debug)]
pub struct ThemeRegistry {
    themes: Vec<Theme>,
}

impl ThemeRegistry {
    pub fn new(custom: &[Theme]) -> Self {
        let mut themes = builtin_themes();
        for theme in custom {
            match themes.iter_mut().find(|t| t.id == theme.id) {
                Some(slot) => *slot = theme.clone(),
                None => themes.push(theme.clone()),
            }
        }
        Self { themes }
    }

    pub fn get(&self, id: &str) -> Option<&Theme> {
        self.themes.iter().find(|t| t.id == id)
    }

    pub fn resolve(&self, id: &str) -> &Theme {
        self.get(id).unwrap_or(&self.themes[0])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Theme> {
        self.themes.iter()
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::new(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_has_no_particles() {
        let reg = ThemeRegistry::default();
        assert!(reg.get("classic").unwrap().particles.is_none());
        assert_eq!(reg.resolve("does-not-exist").id, "classic");
    }

    #[test]
    fn builtin_ids_are_unique() {
        let themes = builtin_themes();
        for (i, a) in themes.iter().enumerate() {
            assert!(themes[i + 1..].iter().all(|b| b.id != a.id), "duplicate id {}", a.id);
        }
    }

    #[test]
    fn custom_theme_replaces_builtin_with_same_id() {
        let custom: Theme = serde_json::from_str(
            r##"{ "id": "neon", "label": "Loud", "particles": { "style": "sparkles", "count": 5, "color": "#fff" } }"##,
        )
        .unwrap();
        let reg = ThemeRegistry::new(&[custom]);
        let neon = reg.get("neon").unwrap();
        assert_eq!(neon.label, "Loud");
        assert_eq!(neon.particles.as_ref().unwrap().style, ParticleStyle::Sparkle);
        assert_eq!(neon.snow, SnowOverrides::default());
        assert_eq!(reg.iter().count(), builtin_themes().len());
    }

    #[test]
    fn style_accepts_legacy_names() {
        let retro: ParticleStyle = serde_json::from_str("\"retro\"").unwrap();
        let stars: ParticleStyle = serde_json::from_str("\"stars\"").unwrap();
        assert_eq!(retro, ParticleStyle::Trail);
        assert_eq!(stars, ParticleStyle::Star);
    }

    #[test]
    fn particle_count_scales_with_environment() {
        let cfg = ParticleConfig { style: ParticleStyle::Neon, count: 41, color: "#fff".into() };
        assert_eq!(cfg.count_for(&Environment::default()), 41);
        assert_eq!(cfg.count_for(&Environment { mobile: true, reduced_motion: false }), 21);
        assert_eq!(cfg.count_for(&Environment { mobile: false, reduced_motion: true }), 0);
    }
}
