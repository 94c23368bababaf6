//! Theme particle system.
//!
//! Each particle carries the shared position/opacity/life record plus a
//! [`ParticleKind`] with exactly the fields its animation rule needs. The active
//! theme picks the kind; changing it reseeds the population on the next frame.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::f64::consts::{PI, TAU};
use std::rc::Rc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use web_sys::CanvasRenderingContext2d;

use crate::canvas::CanvasLayer;
use crate::config::Environment;
use crate::error::Result;
use crate::scheduler::{FrameLoop, Listener};
use crate::theme::{ParticleConfig, ParticleStyle};

/// Positions kept behind a trail particle.
pub const TRAIL_LENGTH: usize = 10;
pub const PARTICLE_Z_INDEX: i32 = 5;

#[derive(Clone, Debug, PartialEq)]
pub enum ParticleKind {
    Star { size: f64, twinkle: f64, phase: f64 },
    Sparkle { size: f64, rotation: f64, rotation_speed: f64 },
    Neon { size: f64, pulse: f64, phase: f64, glow_size: f64 },
    Trail { size: f64, speed: f64, heading: f64, trail: VecDeque<(f64, f64)> },
}

impl ParticleKind {
    pub fn style(&self) -> ParticleStyle {
        match self {
            ParticleKind::Star { .. } => ParticleStyle::Star,
            ParticleKind::Sparkle { .. } => ParticleStyle::Sparkle,
            ParticleKind::Neon { .. } => ParticleStyle::Neon,
            ParticleKind::Trail { .. } => ParticleStyle::Trail,
        }
    }

    fn spawn(style: ParticleStyle, rng: &mut SmallRng) -> Self {
        match style {
            ParticleStyle::Star => ParticleKind::Star {
                size: rng.gen_range(1.0..3.0),
                twinkle: rng.gen_range(0.01..0.03),
                phase: 0.0,
            },
            ParticleStyle::Sparkle => ParticleKind::Sparkle {
                size: rng.gen_range(1.0..4.0),
                rotation: rng.gen_range(0.0..TAU),
                rotation_speed: rng.gen_range(-0.05..0.05),
            },
            ParticleStyle::Neon => ParticleKind::Neon {
                size: rng.gen_range(2.0..6.0),
                pulse: rng.gen_range(0.02..0.07),
                phase: 0.0,
                glow_size: rng.gen_range(5.0..15.0),
            },
            ParticleStyle::Trail => ParticleKind::Trail {
                size: rng.gen_range(3.0..9.0),
                speed: rng.gen_range(1.0..3.0),
                heading: rng.gen_range(0.0..TAU),
                trail: VecDeque::with_capacity(TRAIL_LENGTH + 1),
            },
        }
    }
}

/// Neon glow factor in `[0.4, 1.0]`.
pub fn glow_intensity(phase: f64) -> f64 {
    phase.sin() * 0.3 + 0.7
}

#[derive(Clone, Debug, PartialEq)]
pub struct ThemeParticle {
    pub x: f64,
    pub y: f64,
    pub opacity: f64,
    /// Frames until respawn.
    pub life: u32,
    pub kind: ParticleKind,
}

impl ThemeParticle {
    fn spawn(style: ParticleStyle, rng: &mut SmallRng, width: f64, height: f64) -> Self {
        Self {
            x: rng.r#gen::<f64>() * width,
            y: rng.r#gen::<f64>() * height,
            opacity: rng.gen_range(0.2..1.0),
            life: rng.gen_range(50..150),
            kind: ParticleKind::spawn(style, rng),
        }
    }

    fn advance(&mut self, width: f64, height: f64) {
        match &mut self.kind {
            ParticleKind::Star { twinkle, phase, .. } => {
                *phase += *twinkle;
                self.opacity = phase.sin() * 0.5 + 0.5;
            }
            ParticleKind::Sparkle { rotation, rotation_speed, .. } => {
                *rotation += *rotation_speed;
            }
            ParticleKind::Neon { pulse, phase, .. } => {
                *phase += *pulse;
            }
            ParticleKind::Trail { speed, heading, trail, .. } => {
                self.x += heading.cos() * *speed;
                self.y += heading.sin() * *speed;
                trail.push_back((self.x, self.y));
                while trail.len() > TRAIL_LENGTH {
                    trail.pop_front();
                }
                if self.x > width {
                    self.x = 0.0;
                } else if self.x < 0.0 {
                    self.x = width;
                }
                if self.y > height {
                    self.y = 0.0;
                } else if self.y < 0.0 {
                    self.y = height;
                }
            }
        }
    }

    fn draw(&self, ctx: &CanvasRenderingContext2d, color: &str) {
        ctx.save();
        ctx.set_fill_style_str(color);
        ctx.set_stroke_style_str(color);
        match &self.kind {
            ParticleKind::Star { size, .. } => {
                ctx.set_global_alpha(self.opacity);
                ctx.begin_path();
                ctx.arc(self.x, self.y, *size, 0.0, TAU).ok();
                ctx.fill();
                // cross flare
                ctx.set_line_width(1.0);
                ctx.begin_path();
                ctx.move_to(self.x - size * 2.0, self.y);
                ctx.line_to(self.x + size * 2.0, self.y);
                ctx.move_to(self.x, self.y - size * 2.0);
                ctx.line_to(self.x, self.y + size * 2.0);
                ctx.stroke();
            }
            ParticleKind::Sparkle { size, rotation, .. } => {
                ctx.translate(self.x, self.y).ok();
                ctx.rotate(*rotation).ok();
                ctx.set_global_alpha(self.opacity);
                ctx.begin_path();
                ctx.move_to(0.0, -size);
                ctx.line_to(size * 0.5, 0.0);
                ctx.line_to(0.0, *size);
                ctx.line_to(-size * 0.5, 0.0);
                ctx.close_path();
                ctx.fill();
            }
            ParticleKind::Neon { size, phase, glow_size, .. } => {
                let glow = glow_intensity(*phase);
                ctx.set_global_alpha(self.opacity * glow);
                ctx.set_shadow_color(color);
                ctx.set_shadow_blur(glow_size * glow);
                ctx.begin_path();
                ctx.arc(self.x, self.y, *size, 0.0, TAU).ok();
                ctx.fill();
            }
            ParticleKind::Trail { size, trail, .. } => {
                let len = trail.len() as f64;
                for (i, &(px, py)) in trail.iter().enumerate() {
                    let t = i as f64 / len;
                    ctx.set_global_alpha(t * self.opacity * 0.5);
                    ctx.begin_path();
                    ctx.arc(px, py, size * t, 0.0, PI * 2.0).ok();
                    ctx.fill();
                }
            }
        }
        ctx.restore();
    }
}

pub struct ParticleField {
    particles: Vec<ThemeParticle>,
    style: ParticleStyle,
    color: String,
    width: f64,
    height: f64,
    rng: SmallRng,
}

impl ParticleField {
    pub fn new(config: &ParticleConfig, count: usize, width: f64, height: f64, rng: SmallRng) -> Self {
        let mut field = Self {
            particles: Vec::new(),
            style: config.style,
            color: config.color.clone(),
            width,
            height,
            rng,
        };
        field.reseed(count);
        field
    }

    fn reseed(&mut self, count: usize) {
        let (style, w, h) = (self.style, self.width, self.height);
        let rng = &mut self.rng;
        self.particles = (0..count).map(|_| ThemeParticle::spawn(style, rng, w, h)).collect();
    }

    /// Adopt a new theme configuration. The population is rebuilt with the new
    /// style and count; a colour-only change keeps particles as they are.
    pub fn set_config(&mut self, config: &ParticleConfig, count: usize) {
        self.color = config.color.clone();
        if config.style != self.style || count != self.particles.len() {
            self.style = config.style;
            self.reseed(count);
        }
    }

    pub fn style(&self) -> ParticleStyle {
        self.style
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn particles(&self) -> &[ThemeParticle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [ThemeParticle] {
        &mut self.particles
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    /// Advance one frame: animate, age, respawn the expired.
    pub fn step(&mut self) {
        let (style, w, h) = (self.style, self.width, self.height);
        for particle in &mut self.particles {
            particle.advance(w, h);
            particle.life = particle.life.saturating_sub(1);
            if particle.life == 0 {
                *particle = ThemeParticle::spawn(style, &mut self.rng, w, h);
            }
        }
    }

    pub fn draw(&self, ctx: &CanvasRenderingContext2d) {
        ctx.clear_rect(0.0, 0.0, self.width, self.height);
        for particle in &self.particles {
            particle.draw(ctx, &self.color);
        }
    }
}

/// Mounted particle simulator for the active theme.
pub struct ParticleLayer {
    field: Rc<RefCell<ParticleField>>,
    layer: Rc<CanvasLayer>,
    env: Environment,
    _frames: FrameLoop,
    _resize: Listener,
}

impl ParticleLayer {
    /// `Ok(None)` when the environment leaves nothing to animate.
    pub fn mount(config: &ParticleConfig, env: &Environment, canvas_id: &str) -> Result<Option<Self>> {
        let count = config.count_for(env);
        if count == 0 {
            return Ok(None);
        }
        let layer = Rc::new(CanvasLayer::attach(canvas_id, PARTICLE_Z_INDEX)?);
        layer.set_visible(true);
        let (w, h) = layer.size();
        let field = Rc::new(RefCell::new(ParticleField::new(config, count, w, h, SmallRng::from_entropy())));

        let frame_field = field.clone();
        let frame_layer = layer.clone();
        let frames = FrameLoop::start(move |_ts| {
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

        log::info!("particles: {count} x {:?}", config.style);
        Ok(Some(Self { field, layer, env: *env, _frames: frames, _resize: resize }))
    }

    /// Switch to another theme's particles without remounting.
    pub fn retheme(&self, config: &ParticleConfig) {
        let count = config.count_for(&self.env);
        self.field.borrow_mut().set_config(config, count);
    }

    pub fn style(&self) -> ParticleStyle {
        self.field.borrow().style()
    }
}

impl Drop for ParticleLayer {
    fn drop(&mut self) {
        self.layer.clear();
        self.layer.set_visible(false);
    }
}
