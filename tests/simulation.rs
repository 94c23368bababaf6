// Native integration tests for the snow and theme particle simulators.

use christmas_countdown::config::Environment;
use christmas_countdown::particles::{ParticleField, ParticleKind};
use christmas_countdown::snow::{SPAWN_Y, SnowField};
use christmas_countdown::theme::{ParticleConfig, ParticleStyle, SnowOverrides, ThemeRegistry};
use rand::SeedableRng;
use rand::rngs::SmallRng;

#[test]
fn flake_below_the_bottom_respawns_at_the_top() {
    let mut field = SnowField::new(20, 800.0, 600.0, &SnowOverrides::default(), SmallRng::seed_from_u64(1));
    field.flakes_mut()[3].y = 601.0;
    field.step();
    assert_eq!(field.flakes()[3].y, SPAWN_Y);
    assert_eq!(field.len(), 20);
}

#[test]
fn snow_population_is_constant_over_many_frames() {
    let mut field = SnowField::new(150, 320.0, 240.0, &SnowOverrides::default(), SmallRng::seed_from_u64(9));
    for _ in 0..2_000 {
        field.step();
    }
    assert_eq!(field.len(), 150);
    assert!(field.flakes().iter().all(|f| f.y <= 240.0));
}

#[test]
fn theme_switch_changes_particle_variant_only() {
    let registry = ThemeRegistry::default();
    let starry = registry.resolve("starry").particles.clone().unwrap();
    let neon = registry.resolve("neon").particles.clone().unwrap();
    let env = Environment::default();

    let mut snow = SnowField::new(10, 400.0, 300.0, &SnowOverrides::default(), SmallRng::seed_from_u64(2));
    let mut particles =
        ParticleField::new(&starry, starry.count_for(&env), 400.0, 300.0, SmallRng::seed_from_u64(3));
    snow.step();
    let snow_before = snow.flakes().to_vec();

    particles.set_config(&neon, neon.count_for(&env));
    particles.step();
    assert_eq!(particles.style(), ParticleStyle::Neon);
    assert!(particles.particles().iter().all(|p| matches!(p.kind, ParticleKind::Neon { .. })));
    assert_eq!(snow.flakes(), snow_before.as_slice());
}

#[test]
fn constrained_viewport_halves_particles_and_reduced_motion_stops_them() {
    let config = ParticleConfig { style: ParticleStyle::Sparkle, count: 61, color: "#fff".into() };
    let mobile = Environment { reduced_motion: false, mobile: true };
    let still = Environment { reduced_motion: true, mobile: false };
    assert_eq!(config.count_for(&Environment::default()), 61);
    assert_eq!(config.count_for(&mobile), 31);
    assert_eq!(config.count_for(&still), 0);
}

#[test]
fn classic_theme_has_no_particles() {
    assert!(ThemeRegistry::default().resolve("classic").particles.is_none());
}
