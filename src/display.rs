//! Display surface: numerals, labels, icons and the completion message.
//!
//! The page may ship its own markup; any element the display needs and cannot
//! find is created under the app root.

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use crate::countdown::RemainingTime;
use crate::dom;
use crate::error::Result;
use crate::theme::Palette;

pub const TITLE: &str = "Christmas Countdown";
pub const TITLE_REACHED: &str = "🎄 Merry Christmas! 🎄";
pub const SUBTITLE: &str = "Time until Christmas Day";
pub const FOOTER: &str = "The most wonderful time of the year is almost here!";
pub const FOOTER_REACHED: &str = "Hope your day is filled with joy and wonder!";
pub const CELEBRATION: &str = "🎅🎁🎄";
/// Stacking level of the app root; the snow and particle canvases sit below.
pub const DISPLAY_Z_INDEX: i32 = 20;
/// Tree, star, gift.
pub const ICONS: [&str; 3] = ["🎄", "⭐", "🎁"];

/// (element id suffix, label) per numeral, in display order.
pub const UNITS: [(&str, &str); 4] =
    [("days", "Days"), ("hours", "Hours"), ("minutes", "Minutes"), ("seconds", "Seconds")];

/// Text content for one snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayText {
    pub title: &'static str,
    pub subtitle: Option<&'static str>,
    pub numerals: Option<[String; 4]>,
    pub celebration: Option<&'static str>,
    pub footer: &'static str,
}

impl DisplayText {
    pub fn for_remaining(left: &RemainingTime) -> Self {
        if left.is_reached() {
            return Self {
                title: TITLE_REACHED,
                subtitle: None,
                numerals: None,
                celebration: Some(CELEBRATION),
                footer: FOOTER_REACHED,
            };
        }
        Self {
            title: TITLE,
            subtitle: Some(SUBTITLE),
            numerals: Some([
                left.days.to_string(),
                left.hours.to_string(),
                left.minutes.to_string(),
                left.seconds.to_string(),
            ]),
            celebration: None,
            footer: FOOTER,
        }
    }
}

pub struct Display {
    root: String,
}

impl Display {
    fn id(&self, suffix: &str) -> String {
        format!("{}-{suffix}", self.root)
    }

    /// Find or build the card under `#root_id`.
    pub fn build(root_id: &str) -> Result<Self> {
        let root = dom::ensure_root(root_id)?;
        root.set_attribute("role", "main").ok();
        root.set_attribute("aria-label", "Christmas countdown application").ok();
        if let Some(root) = root.dyn_ref::<HtmlElement>() {
            let style = root.style();
            style.set_property("position", "relative").ok();
            style.set_property("z-index", &DISPLAY_Z_INDEX.to_string()).ok();
        }
        let display = Self { root: root_id.to_string() };

        let card = dom::ensure_child(&root, "div", &display.id("card"))?;
        let icons = dom::ensure_child(&card, "div", &display.id("icons"))?;
        icons.set_attribute("aria-hidden", "true").ok();
        icons.set_text_content(Some(&ICONS.join(" ")));
        dom::ensure_child(&card, "h1", &display.id("title"))?;
        dom::ensure_child(&card, "p", &display.id("subtitle"))?;

        let grid = dom::ensure_child(&card, "div", &display.id("units"))?;
        grid.set_attribute("aria-live", "polite").ok();
        for (suffix, label) in UNITS {
            let cell = dom::ensure_child(&grid, "div", &display.id(&format!("{suffix}-cell")))?;
            dom::ensure_child(&cell, "div", &display.id(suffix))?;
            let caption = dom::ensure_child(&cell, "div", &display.id(&format!("{suffix}-label")))?;
            caption.set_text_content(Some(label));
        }

        let celebration = dom::ensure_child(&card, "div", &display.id("celebration"))?;
        celebration.set_text_content(Some(CELEBRATION));
        dom::ensure_child(&card, "p", &display.id("footer"))?;
        Ok(display)
    }

    /// Container other widgets (selector, buttons) are placed in.
    pub fn card(&self) -> Result<Element> {
        dom::element(&self.id("card"))
    }

    pub fn render(&self, left: &RemainingTime) {
        let text = DisplayText::for_remaining(left);
        dom::set_text(&self.id("title"), text.title);
        dom::set_text(&self.id("subtitle"), text.subtitle.unwrap_or(""));
        dom::set_hidden(&self.id("subtitle"), text.subtitle.is_none());
        dom::set_hidden(&self.id("units"), text.numerals.is_none());
        if let Some(numerals) = &text.numerals {
            for ((suffix, _), value) in UNITS.iter().zip(numerals) {
                dom::set_text(&self.id(suffix), value);
            }
        }
        dom::set_hidden(&self.id("celebration"), text.celebration.is_none());
        dom::set_text(&self.id("footer"), text.footer);
    }

    /// Theme colour classes. Numerals alternate accent / secondary.
    pub fn apply_palette(&self, palette: &Palette) {
        dom::set_class(&self.root, &palette.background);
        dom::set_class(&self.id("card"), &palette.card);
        dom::set_class(&self.id("title"), &palette.title);
        for (i, (suffix, _)) in UNITS.iter().enumerate() {
            let class = if i % 2 == 0 { &palette.accent } else { &palette.secondary };
            dom::set_class(&self.id(&format!("{suffix}-cell")), class);
        }
    }
}
