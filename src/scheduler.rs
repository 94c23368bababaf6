//! Browser scheduling primitives as owned guards.
//!
//! Every handle the page hands out (animation frame id, interval id, timeout
//! id, event listener) is owned by a value here and released when that value
//! is stopped or dropped. Components hold the guards; unmounting a component is
//! dropping it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Event, EventTarget};

use crate::dom;
use crate::error::Result;

struct FrameLoopInner {
    running: Cell<bool>,
    handle: Cell<Option<i32>>,
    callback: RefCell<Option<Closure<dyn FnMut(f64)>>>,
}

impl FrameLoopInner {
    fn schedule(&self) {
        let Some(win) = web_sys::window() else {
            self.running.set(false);
            return;
        };
        if let Some(cb) = self.callback.borrow().as_ref() {
            match win.request_animation_frame(cb.as_ref().unchecked_ref()) {
                Ok(id) => self.handle.set(Some(id)),
                Err(_) => self.running.set(false),
            }
        }
    }
}

/// Self-rescheduling `requestAnimationFrame` loop.
///
/// The callback receives the frame timestamp. Once stopped the loop never
/// reschedules, even when a frame was already queued.
pub struct FrameLoop {
    inner: Rc<FrameLoopInner>,
}

impl FrameLoop {
    pub fn start(mut tick: impl FnMut(f64) + 'static) -> Result<Self> {
        dom::window()?;
        let inner = Rc::new(FrameLoopInner {
            running: Cell::new(true),
            handle: Cell::new(None),
            callback: RefCell::new(None),
        });
        let weak = Rc::downgrade(&inner);
        let closure = Closure::wrap(Box::new(move |ts: f64| {
            let Some(inner) = weak.upgrade() else { return };
            inner.handle.set(None);
            if !inner.running.get() {
                return;
            }
            tick(ts);
            if inner.running.get() {
                inner.schedule();
            }
        }) as Box<dyn FnMut(f64)>);
        *inner.callback.borrow_mut() = Some(closure);
        inner.schedule();
        Ok(Self { inner })
    }

    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }

    pub fn stop(&self) {
        self.inner.running.set(false);
        if let Some(id) = self.inner.handle.take() {
            if let Some(win) = web_sys::window() {
                win.cancel_animation_frame(id).ok();
            }
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

/// `setInterval` guard.
pub struct Interval {
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

impl Interval {
    pub fn start(period_ms: i32, f: impl FnMut() + 'static) -> Result<Self> {
        let callback = Closure::wrap(Box::new(f) as Box<dyn FnMut()>);
        let handle = dom::window()?.set_interval_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            period_ms,
        )?;
        Ok(Self { handle, _callback: callback })
    }
}

impl Drop for Interval {
    fn drop(&mut self) {
        if let Some(win) = web_sys::window() {
            win.clear_interval_with_handle(self.handle);
        }
    }
}

/// `setTimeout` guard. Dropping it before it fires cancels the call.
pub struct Timeout {
    handle: i32,
    _callback: Closure<dyn FnMut()>,
}

impl Timeout {
    pub fn start(delay_ms: i32, f: impl FnOnce() + 'static) -> Result<Self> {
        let mut f = Some(f);
        let callback = Closure::wrap(Box::new(move || {
            if let Some(f) = f.take() {
                f();
            }
        }) as Box<dyn FnMut()>);
        let handle = dom::window()?.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            delay_ms,
        )?;
        Ok(Self { handle, _callback: callback })
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        if let Some(win) = web_sys::window() {
            win.clear_timeout_with_handle(self.handle);
        }
    }
}

/// Event listener that removes itself on drop.
pub struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
    pub fn new(
        target: &EventTarget,
        event: &'static str,
        f: impl FnMut(Event) + 'static,
    ) -> Result<Self> {
        let callback = Closure::wrap(Box::new(f) as Box<dyn FnMut(Event)>);
        target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
        Ok(Self { target: target.clone(), event, callback })
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.target
            .remove_event_listener_with_callback(self.event, self.callback.as_ref().unchecked_ref())
            .ok();
    }
}

/// Elapsed-time gate that throttles a frame loop to a target rate.
#[derive(Clone, Debug)]
pub struct FrameGate {
    interval_ms: f64,
    last_ms: Option<f64>,
}

// rAF timestamps wobble around the display period; without slack a 60 fps
// target on a 60 Hz display would drop every other frame.
const JITTER_MS: f64 = 1.0;

impl FrameGate {
    /// `fps == 0` disables throttling.
    pub fn new(fps: u32) -> Self {
        let interval_ms = if fps == 0 { 0.0 } else { 1000.0 / fps as f64 };
        Self { interval_ms, last_ms: None }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// True when a frame at `now_ms` should advance and paint.
    pub fn ready(&mut self, now_ms: f64) -> bool {
        match self.last_ms {
            Some(last) => {
                let elapsed = now_ms - last;
                if elapsed + JITTER_MS < self.interval_ms {
                    return false;
                }
                let carry = if self.interval_ms > JITTER_MS && elapsed >= self.interval_ms {
                    (elapsed % self.interval_ms).min(self.interval_ms - JITTER_MS)
                } else {
                    0.0
                };
                self.last_ms = Some(now_ms - carry);
                true
            }
            None => {
                self.last_ms = Some(now_ms);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_always_passes() {
        let mut gate = FrameGate::new(30);
        assert!(gate.ready(5.0));
    }

    #[test]
    fn thirty_fps_skips_every_other_sixty_hz_frame() {
        let mut gate = FrameGate::new(30);
        let period = 1000.0 / 60.0;
        let passed = (0..60).filter(|i| gate.ready(*i as f64 * period)).count();
        assert_eq!(passed, 30);
    }

    #[test]
    fn sixty_fps_keeps_jittery_sixty_hz_frames() {
        let mut gate = FrameGate::new(60);
        let stamps = [0.0, 16.5, 33.4, 49.9, 66.8, 83.3];
        assert!(stamps.iter().all(|t| gate.ready(*t)));
    }

    #[test]
    fn zero_fps_never_throttles() {
        let mut gate = FrameGate::new(0);
        assert_eq!(gate.interval_ms(), 0.0);
        assert!(gate.ready(0.0));
        assert!(gate.ready(0.1));
        assert!(gate.ready(0.2));
    }
}
