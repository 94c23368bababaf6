//! Falling snow.
//!
//! A fixed population of flakes drifts down a transparent canvas. A flake that
//! leaves the bottom edge is respawned at [`SPAWN_Y`] with fresh attributes, so
//! the population never shrinks; horizontal drift wraps across the side edges.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use web_sys::CanvasRenderingContext2d;

use crate::canvas::CanvasLayer;
use crate::config::{Environment, SnowSettings};
use crate::error::Result;
use crate::scheduler::{FrameGate, FrameLoop, Listener};
use crate::theme::SnowOverrides;

/// Row new flakes enter on, just above the visible area.
pub const SPAWN_Y: f64 = -10.0;
const WRAP_MARGIN: f64 = 10.0;
pub const SNOW_Z_INDEX: i32 = 10;

#[derive(Clone, Debug, PartialEq)]
pub struct Snowflake {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub fall_speed: f64,
    pub drift: f64,
    pub opacity: f64,
}

impl Snowflake {
    fn spawn(rng: &mut SmallRng, width: f64) -> Self {
        Self {
            x: rng.r#gen::<f64>() * width,
            y: SPAWN_Y,
            radius: rng.gen_range(1.0..4.0),
            fall_speed: rng.gen_range(0.5..2.5),
            drift: rng.gen_range(-0.25..0.25),
            opacity: rng.gen_range(0.2..1.0),
        }
    }
}

pub struct SnowField {
    flakes: Vec<Snowflake>,
    width: f64,
    height: f64,
    speed: f64,
    color: [u8; 3],
    rng: SmallRng,
}

impl SnowField {
    /// Initial flakes are scattered over the whole height so the first frames
    /// are not one dense row at the top.
    pub fn new(population: usize, width: f64, height: f64, overrides: &SnowOverrides, mut rng: SmallRng) -> Self {
        let flakes = (0..population)
            .map(|_| {
                let mut flake = Snowflake::spawn(&mut rng, width);
                flake.y = rng.r#gen::<f64>() * height;
                flake
            })
            .collect();
        Self {
            flakes,
            width,
            height,
            speed: overrides.speed,
            color: overrides.color,
            rng,
        }
    }

    pub fn flakes(&self) -> &[Snowflake] {
        &self.flakes
    }

    pub fn flakes_mut(&mut self) -> &mut [Snowflake] {
        &mut self.flakes
    }

    pub fn len(&self) -> usize {
        self.flakes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flakes.is_empty()
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// New bounds; flakes keep their state.
    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn apply_overrides(&mut self, overrides: &SnowOverrides) {
        self.speed = overrides.speed;
        self.color = overrides.color;
    }

    /// Advance one frame.
    pub fn step(&mut self) {
        let (width, height) = (self.width, self.height);
        for flake in &mut self.flakes {
            flake.y += flake.fall_speed * self.speed;
            flake.x += flake.drift;

            if flake.y > height {
                *flake = Snowflake::spawn(&mut self.rng, width);
            }

            if flake.x > width + WRAP_MARGIN {
                flake.x = -WRAP_MARGIN;
            } else if flake.x < -WRAP_MARGIN {
                flake.x = width + WRAP_MARGIN;
            }
        }
    }

    pub fn draw(&self, ctx: &CanvasRenderingContext2d) {
        ctx.clear_rect(0.0, 0.0, self.width, self.height);
        let [r, g, b] = self.color;
        for flake in &self.flakes {
            ctx.begin_path();
            ctx.arc(flake.x, flake.y, flake.radius, 0.0, TAU).ok();
            ctx.set_fill_style_str(&format!("rgba({r}, {g}, {b}, {})", flake.opacity));
            ctx.fill();
        }
    }
}

/// Mounted snow simulator: canvas, frame loop and resize listener.
pub struct SnowLayer {
    field: Rc<RefCell<SnowField>>,
    layer: Rc<CanvasLayer>,
    _frames: FrameLoop,
    _resize: Listener,
}

impl SnowLayer {
    /// `Ok(None)` when the environment leaves no flakes to draw.
    pub fn mount(
        settings: &SnowSettings,
        env: &Environment,
        overrides: &SnowOverrides,
        canvas_id: &str,
    ) -> Result<Option<Self>> {
        let population = settings.population(env);
        if population == 0 {
            return Ok(None);
        }
        let layer = Rc::new(CanvasLayer::attach(canvas_id, SNOW_Z_INDEX)?);
        let (w, h) = layer.size();
        let field = Rc::new(RefCell::new(SnowField::new(population, w, h, overrides, SmallRng::from_entropy())));

        let mut gate = FrameGate::new(settings.target_fps(env));
        let frame_field = field.clone();
        let frame_layer = layer.clone();
        let frames = FrameLoop::start(move |ts| {
            if !gate.ready(ts) {
                return;
            }
            let mut field = frame_field.borrow_mut();
            field.step();
            field.draw(frame_layer.ctx());
        })?;

        let resize_field = field.clone();
        let resize_layer = layer.clone();
        let window = crate::dom::window()?;
        let resize = Listener::new(window.as_ref(), "resize", move |_| {
            let (w, h) = resize_layer.fit_to_viewport();
            resize_field.borrow_mut().resize(w, h);
        })?;

        log::info!("snow: {population} flakes");
        Ok(Some(Self { field, layer, _frames: frames, _resize: resize }))
    }

    pub fn apply_overrides(&self, overrides: &SnowOverrides) {
        self.field.borrow_mut().apply_overrides(overrides);
    }
}

impl Drop for SnowLayer {
    fn drop(&mut self) {
        self.layer.clear();
    }
}
