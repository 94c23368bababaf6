//! Synthesized bell chime and its mute / chime / celebrate controls.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AudioContext, Element, OscillatorType};

use crate::config::ElementIds;
use crate::dom;
use crate::error::Result;
use crate::scheduler::{Listener, Timeout};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration_s: f64,
    pub offset_ms: u32,
}

/// Three sine partials, staggered by 100 ms.
pub const CHIME: [Tone; 3] = [
    Tone { frequency_hz: 800.0, duration_s: 0.5, offset_ms: 0 },
    Tone { frequency_hz: 600.0, duration_s: 0.4, offset_ms: 100 },
    Tone { frequency_hz: 900.0, duration_s: 0.3, offset_ms: 200 },
];

pub const PEAK_GAIN: f32 = 0.1;
pub const ATTACK_S: f64 = 0.01;
pub const FLOOR_GAIN: f32 = 0.001;
/// The chime button re-enables after this long.
pub const PLAYING_RESET_MS: i32 = 3_000;

/// Milliseconds until the last partial has faded.
pub fn chime_length_ms() -> u32 {
    CHIME
        .iter()
        .map(|t| t.offset_ms + (t.duration_s * 1000.0) as u32)
        .max()
        .unwrap_or(0)
}

/// Button state. Starts muted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AudioState {
    muted: bool,
    playing: bool,
    reached: bool,
}

impl Default for AudioState {
    fn default() -> Self {
        Self { muted: true, playing: false, reached: false }
    }
}

impl AudioState {
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Returns the new muted flag. Muting ends the playing state.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        if self.muted {
            self.playing = false;
        }
        self.muted
    }

    /// Chime button. True when a chime should sound now.
    pub fn press_chime(&mut self) -> bool {
        if self.muted {
            return false;
        }
        if self.playing {
            self.playing = false;
            return false;
        }
        self.playing = true;
        true
    }

    pub fn finish_playing(&mut self) {
        self.playing = false;
    }

    pub fn set_reached(&mut self, reached: bool) {
        self.reached = reached;
    }

    pub fn can_celebrate(&self) -> bool {
        self.reached && !self.muted
    }

    pub fn mute_label(&self) -> &'static str {
        if self.muted { "🔇 Unmute" } else { "🔊 Mute" }
    }

    pub fn chime_label(&self) -> &'static str {
        if self.playing { "Playing..." } else { "🎵 Chime" }
    }
}

/// Play [`CHIME`] on a fresh audio context that closes once the tones end.
pub fn play_chime() -> Result<()> {
    let ctx = AudioContext::new()?;
    let start = ctx.current_time();
    for tone in &CHIME {
        schedule_tone(&ctx, tone, start)?;
    }
    let close = Closure::once_into_js(move || {
        ctx.close().ok();
    });
    dom::window()?.set_timeout_with_callback_and_timeout_and_arguments_0(
        close.unchecked_ref(),
        chime_length_ms() as i32 + 100,
    )?;
    Ok(())
}

fn schedule_tone(ctx: &AudioContext, tone: &Tone, start: f64) -> Result<()> {
    let osc = ctx.create_oscillator()?;
    let gain = ctx.create_gain()?;
    osc.connect_with_audio_node(&gain)?;
    gain.connect_with_audio_node(&ctx.destination())?;

    let t0 = start + tone.offset_ms as f64 / 1000.0;
    let t_end = t0 + tone.duration_s;
    osc.set_type(OscillatorType::Sine);
    osc.frequency().set_value_at_time(tone.frequency_hz, t0)?;

    let envelope = gain.gain();
    envelope.set_value_at_time(0.0, t0)?;
    envelope.linear_ramp_to_value_at_time(PEAK_GAIN, t0 + ATTACK_S)?;
    envelope.exponential_ramp_to_value_at_time(FLOOR_GAIN, t_end)?;

    osc.start_with_when(t0)?;
    osc.stop_with_when(t_end)?;
    Ok(())
}

fn sound() {
    if let Err(e) = play_chime() {
        log::warn!("audio not supported: {e}");
    }
}

struct Shared {
    state: RefCell<AudioState>,
    mute_id: String,
    chime_id: String,
    celebrate_id: String,
    reset: RefCell<Option<Timeout>>,
}

impl Shared {
    fn render(&self) {
        let state = *self.state.borrow();
        dom::set_text(&self.mute_id, state.mute_label());
        if let Ok(el) = dom::element(&self.mute_id) {
            let label = if state.is_muted() { "Unmute audio" } else { "Mute audio" };
            el.set_attribute("aria-label", label).ok();
        }
        dom::set_hidden(&self.chime_id, state.is_muted());
        dom::set_text(&self.chime_id, state.chime_label());
        if let Ok(el) = dom::element(&self.chime_id) {
            if state.is_playing() {
                el.set_attribute("disabled", "").ok();
            } else {
                el.remove_attribute("disabled").ok();
            }
        }
        dom::set_hidden(&self.celebrate_id, !state.can_celebrate());
    }

    fn on_chime(self: &Rc<Self>) {
        let play = self.state.borrow_mut().press_chime();
        if play {
            sound();
            let weak: Weak<Self> = Rc::downgrade(self);
            let reset = Timeout::start(PLAYING_RESET_MS, move || {
                if let Some(shared) = weak.upgrade() {
                    shared.state.borrow_mut().finish_playing();
                    shared.render();
                }
            });
            match reset {
                Ok(t) => *self.reset.borrow_mut() = Some(t),
                Err(e) => log::warn!("chime reset timer: {e}"),
            }
        } else {
            self.reset.borrow_mut().take();
        }
        self.render();
    }

    fn on_mute(&self) {
        let muted = self.state.borrow_mut().toggle_mute();
        if muted {
            self.reset.borrow_mut().take();
        }
        self.render();
    }

    fn on_celebrate(&self) {
        if self.state.borrow().can_celebrate() {
            sound();
        }
    }
}

/// Cheap handle the countdown publisher uses to report the reached state.
#[derive(Clone)]
pub struct AudioHandle(Rc<Shared>);

impl AudioHandle {
    pub fn set_reached(&self, reached: bool) {
        let changed = {
            let mut state = self.0.state.borrow_mut();
            let before = state.can_celebrate();
            state.set_reached(reached);
            before != state.can_celebrate()
        };
        if changed {
            self.0.render();
        }
    }
}

pub struct AudioControls {
    shared: Rc<Shared>,
    _listeners: Vec<Listener>,
}

impl AudioControls {
    pub fn mount(parent: &Element, ids: &ElementIds) -> Result<Self> {
        let row = dom::ensure_child(parent, "div", &format!("{}-audio", ids.root))?;
        let mute = dom::ensure_child(&row, "button", &ids.mute_button)?;
        let chime = dom::ensure_child(&row, "button", &ids.chime_button)?;
        let celebrate = dom::ensure_child(&row, "button", &ids.celebrate_button)?;
        celebrate.set_attribute("aria-label", "Play celebration sound").ok();
        celebrate.set_text_content(Some("🔔 Celebrate!"));

        let shared = Rc::new(Shared {
            state: RefCell::new(AudioState::default()),
            mute_id: ids.mute_button.clone(),
            chime_id: ids.chime_button.clone(),
            celebrate_id: ids.celebrate_button.clone(),
            reset: RefCell::new(None),
        });

        let on_mute = shared.clone();
        let on_chime = shared.clone();
        let on_celebrate = shared.clone();
        let listeners = vec![
            Listener::new(mute.as_ref(), "click", move |_| on_mute.on_mute())?,
            Listener::new(chime.as_ref(), "click", move |_| on_chime.on_chime())?,
            Listener::new(celebrate.as_ref(), "click", move |_| on_celebrate.on_celebrate())?,
        ];
        shared.render();
        Ok(Self { shared, _listeners: listeners })
    }

    pub fn handle(&self) -> AudioHandle {
        AudioHandle(self.shared.clone())
    }
}

impl Drop for AudioControls {
    fn drop(&mut self) {
        self.shared.reset.borrow_mut().take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_muted_and_silent() {
        let mut s = AudioState::default();
        assert!(s.is_muted());
        assert!(!s.press_chime());
        assert!(!s.is_playing());
    }

    #[test]
    fn chime_plays_once_until_finished() {
        let mut s = AudioState::default();
        assert!(!s.toggle_mute());
        assert!(s.press_chime());
        assert!(s.is_playing());
        assert_eq!(s.chime_label(), "Playing...");
        s.finish_playing();
        assert!(s.press_chime());
    }

    #[test]
    fn pressing_while_playing_stops() {
        let mut s = AudioState::default();
        s.toggle_mute();
        s.press_chime();
        assert!(!s.press_chime());
        assert!(!s.is_playing());
    }

    #[test]
    fn muting_stops_playing() {
        let mut s = AudioState::default();
        s.toggle_mute();
        s.press_chime();
        assert!(s.toggle_mute());
        assert!(!s.is_playing());
    }

    #[test]
    fn celebrate_needs_reached_and_sound() {
        let mut s = AudioState::default();
        s.set_reached(true);
        assert!(!s.can_celebrate());
        s.toggle_mute();
        assert!(s.can_celebrate());
        s.set_reached(false);
        assert!(!s.can_celebrate());
    }

    #[test]
    fn chime_envelope_fits_in_half_a_second() {
        assert_eq!(chime_length_ms(), 500);
        assert!(CHIME.iter().all(|t| ATTACK_S < t.duration_s));
        assert!(FLOOR_GAIN > 0.0, "exponential ramps cannot target zero");
    }
}
