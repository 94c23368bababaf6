// Browser-only tests for the scheduler guards, countdown teardown and page layout. Run with `wasm-pack test --headless --chrome`.
#![cfg(target_arch = "wasm32")]

use std::cell::Cell;
use std::rc::Rc;

use christmas_countdown::TimezoneSelection;
use christmas_countdown::countdown::Countdown;
use christmas_countdown::display::{DISPLAY_Z_INDEX, Display};
use christmas_countdown::scheduler::{FrameLoop, Interval, Listener, Timeout};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

async fn sleep(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    wasm_bindgen_futures::JsFuture::from(promise).await.unwrap();
}

#[wasm_bindgen_test]
async fn frame_loop_runs_until_stopped() {
    let frames = Rc::new(Cell::new(0u32));
    let counter = frames.clone();
    let lp = FrameLoop::start(move |_| counter.set(counter.get() + 1)).unwrap();
    sleep(200).await;
    assert!(frames.get() > 0);
    lp.stop();
    assert!(!lp.is_running());
    let stopped_at = frames.get();
    sleep(200).await;
    assert_eq!(frames.get(), stopped_at);
}

#[wasm_bindgen_test]
async fn dropped_timeout_never_fires() {
    let fired = Rc::new(Cell::new(false));
    let flag = fired.clone();
    let timeout = Timeout::start(50, move || flag.set(true)).unwrap();
    drop(timeout);
    sleep(150).await;
    assert!(!fired.get());
}

#[wasm_bindgen_test]
fn dropped_listener_is_removed() {
    let document = web_sys::window().unwrap().document().unwrap();
    let target = document.create_element("div").unwrap();
    let hits = Rc::new(Cell::new(0u32));
    let counter = hits.clone();
    let listener = Listener::new(target.as_ref(), "ping", move |_| counter.set(counter.get() + 1)).unwrap();

    let event = web_sys::Event::new("ping").unwrap();
    target.dispatch_event(&event).unwrap();
    drop(listener);
    target.dispatch_event(&event).unwrap();
    assert_eq!(hits.get(), 1);
}

#[wasm_bindgen_test]
async fn dropped_interval_stops_firing() {
    let ticks = Rc::new(Cell::new(0u32));
    let counter = ticks.clone();
    let interval = Interval::start(20, move || counter.set(counter.get() + 1)).unwrap();
    sleep(120).await;
    assert!(ticks.get() > 0);
    drop(interval);
    let stopped_at = ticks.get();
    sleep(120).await;
    assert_eq!(ticks.get(), stopped_at);
}

#[wasm_bindgen_test]
async fn countdown_publishes_every_second_until_dropped() {
    let published = Rc::new(Cell::new(0u32));
    let counter = published.clone();
    let countdown = Countdown::mount(TimezoneSelection::Utc, move |_| counter.set(counter.get() + 1)).unwrap();
    assert_eq!(published.get(), 1);
    sleep(1_100).await;
    assert!(published.get() >= 2);
    assert!(countdown.latest().is_some());

    drop(countdown);
    let stopped_at = published.get();
    sleep(1_500).await;
    assert_eq!(published.get(), stopped_at);
}

#[wasm_bindgen_test]
fn display_root_stacks_above_canvases() {
    Display::build("stacking-test-root").unwrap();
    let root: web_sys::HtmlElement = web_sys::window()
        .unwrap()
        .document()
        .unwrap()
        .get_element_by_id("stacking-test-root")
        .unwrap()
        .dyn_into()
        .unwrap();
    let style = root.style();
    assert_eq!(style.get_property_value("position").unwrap(), "relative");
    assert_eq!(style.get_property_value("z-index").unwrap(), DISPLAY_Z_INDEX.to_string());
}

#[wasm_bindgen_test]
fn start_hook_is_idempotent_and_logging_works() {
    christmas_countdown::wasm_start();
    christmas_countdown::wasm_start();
    log::info!("logger reachable from tests");
}
