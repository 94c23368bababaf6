//! Timezone `<select>` and theme buttons.

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlOptionElement, HtmlSelectElement};

use crate::countdown::{TIMEZONE_OPTIONS, TimezoneSelection};
use crate::dom;
use crate::error::{AppError, Result};
use crate::scheduler::Listener;
use crate::theme::ThemeRegistry;

pub struct TimezoneSelect {
    _change: Listener,
}

impl TimezoneSelect {
    pub fn mount(
        parent: &Element,
        id: &str,
        initial: TimezoneSelection,
        on_change: impl Fn(TimezoneSelection) + 'static,
    ) -> Result<Self> {
        let wrapper = dom::ensure_child(parent, "div", &format!("{id}-wrapper"))?;
        let label = dom::ensure_child(&wrapper, "label", &format!("{id}-label"))?;
        label.set_attribute("for", id).ok();
        label.set_text_content(Some("🌐 Choose timezone:"));

        let select: HtmlSelectElement = dom::ensure_child(&wrapper, "select", id)?
            .dyn_into()
            .map_err(|_| AppError::MissingElement(id.to_string()))?;
        select
            .set_attribute("aria-label", "Select timezone for Christmas countdown")
            .ok();
        if select.length() == 0 {
            for opt in TIMEZONE_OPTIONS {
                let option = HtmlOptionElement::new_with_text_and_value(opt.label, opt.value)?;
                select.append_child(&option)?;
            }
        }
        select.set_value(initial.value());

        let source = select.clone();
        let change = Listener::new(select.as_ref(), "change", move |_| {
            on_change(TimezoneSelection::parse(&source.value()));
        })?;
        Ok(Self { _change: change })
    }
}

pub struct ThemeButtons {
    container: String,
    _clicks: Vec<Listener>,
}

impl ThemeButtons {
    pub fn mount(
        parent: &Element,
        id: &str,
        themes: &ThemeRegistry,
        on_select: impl Fn(&str) + 'static,
    ) -> Result<Self> {
        let container = dom::ensure_child(parent, "div", id)?;
        container.set_attribute("role", "group").ok();
        container.set_attribute("aria-label", "Theme").ok();
        container.set_inner_html("");

        let on_select = std::rc::Rc::new(on_select);
        let doc = dom::document()?;
        let mut clicks = Vec::new();
        for theme in themes.iter() {
            let button = doc.create_element("button")?;
            button.set_attribute("type", "button").ok();
            button.set_attribute("data-theme", &theme.id).ok();
            button.set_text_content(Some(&theme.label));
            container.append_child(&button)?;

            let theme_id = theme.id.clone();
            let handler = on_select.clone();
            clicks.push(Listener::new(button.as_ref(), "click", move |_| handler(&theme_id))?);
        }
        Ok(Self { container: id.to_string(), _clicks: clicks })
    }

    /// Mark the active theme's button as pressed.
    pub fn mark_active(&self, theme_id: &str) {
        let Ok(container) = dom::element(&self.container) else { return };
        let buttons = container.children();
        for i in 0..buttons.length() {
            if let Some(button) = buttons.item(i) {
                let active = button.get_attribute("data-theme").as_deref() == Some(theme_id);
                button.set_attribute("aria-pressed", if active { "true" } else { "false" }).ok();
            }
        }
    }
}
