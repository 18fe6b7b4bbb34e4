//! Particle emitters for entities and one-shot effects
//!
//! These only feed the particle system. None of them touch gameplay state.

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec2;
use rand::Rng;

use super::difficulty::AsteroidClass;
use super::particles::{Emission, ParticleSystem, Span};
use super::state::{Player, PowerUpKind};
use crate::{Rgba, direction_from_angle, uniform};

/// Asteroid fire trail
pub const FIRE_COLORS: [Rgba; 5] = [
    Rgba::rgb(255, 165, 0),
    Rgba::rgb(255, 140, 0),
    Rgba::rgb(255, 69, 0),
    Rgba::rgb(255, 215, 0),
    Rgba::rgb(255, 99, 71),
];

/// Player thruster jets
pub const THRUSTER_COLORS: [Rgba; 5] = [
    Rgba::rgb(0, 191, 255),
    Rgba::rgb(30, 144, 255),
    Rgba::rgb(65, 105, 225),
    Rgba::rgb(100, 149, 237),
    Rgba::rgb(135, 206, 250),
];

const SPARK_COLORS: [Rgba; 3] = [
    Rgba::rgb(255, 255, 255),
    Rgba::rgb(255, 240, 150),
    Rgba::rgb(255, 180, 60),
];

const HEAL_COLORS: [Rgba; 3] = [
    Rgba::rgb(120, 255, 120),
    Rgba::rgb(60, 220, 90),
    Rgba::rgb(200, 255, 200),
];

const BOOM_PICKUP_COLORS: [Rgba; 3] = [
    Rgba::rgb(255, 80, 80),
    Rgba::rgb(255, 200, 80),
    Rgba::rgb(255, 255, 255),
];

const START_COLORS: [Rgba; 4] = [
    Rgba::rgb(255, 255, 255),
    Rgba::rgb(0, 191, 255),
    Rgba::rgb(135, 206, 250),
    Rgba::rgb(255, 215, 0),
];

/// Velocity span of ±10% around `v`
#[inline]
fn jittered(v: Vec2) -> (Span, Span) {
    (Span::around(v.x, 0.1), Span::around(v.y, 0.1))
}

/// Cone of fire behind a moving asteroid. Denser, hotter, and longer-lived
/// for higher danger classes.
pub fn asteroid_fire<R: Rng + ?Sized>(
    particles: &mut ParticleSystem,
    rng: &mut R,
    pos: Vec2,
    vel: Vec2,
    radius: f32,
    class: AsteroidClass,
) {
    let Some(heading) = vel.try_normalize() else {
        return;
    };
    let class_n = class.index() as f32;
    let trail = -heading;
    let perp = Vec2::new(-heading.y, heading.x);

    let clusters = 1 + class.index() / 2;
    let max_offset = (radius * 0.4 * (1.0 - class_n / 12.0)).max(f32::EPSILON);
    let base_speed = vel.length() * (0.5 + class_n * 0.05);
    let trail_angle = trail.y.atan2(trail.x);

    for _ in 0..clusters * 2 {
        let offset = uniform(rng, -max_offset, max_offset);
        // 1 at the cone's center line, 0 at its edge
        let center_ratio = 1.0 - offset.abs() / max_offset;
        let back = radius * (0.2 + (1.0 - center_ratio) * 0.3);
        let origin = pos + perp * offset + trail * back;

        let angle = trail_angle + uniform(rng, -0.2, 0.2);
        let speed = base_speed * (0.8 + center_ratio * 0.4);
        let v = direction_from_angle(angle) * speed;

        let bump = if center_ratio > 0.7 { 1.0 } else { 0.0 };
        let min_size = 1.0 + (class.index() / 3) as f32 + bump;
        let max_size = 2.0 + (class.index() / 2) as f32 + bump;
        let min_life = 0.1 + center_ratio * 0.1 + class_n * 0.02;
        let max_life = 0.2 + center_ratio * 0.1 + class_n * 0.04;

        let (vx, vy) = jittered(v);
        particles.emit(
            rng,
            &Emission::at(origin, &FIRE_COLORS)
                .velocity(vx, vy)
                .size(Span::new(min_size, max_size))
                .lifetime(Span::new(min_life, max_life)),
        );
    }
}

/// Three thruster jets (center plus two sides) opposite the player's motion
pub fn thruster_trail<R: Rng + ?Sized>(particles: &mut ParticleSystem, rng: &mut R, player: &Player) {
    let radius = player.radius();
    let facing = player.rotation.to_radians();

    let backward = Vec2::new(-facing.sin(), facing.cos());
    let back = player.pos + backward * (radius * 0.9);
    let side = direction_from_angle(facing);
    let spacing = radius * 0.45;

    let flame = if player.vel.length() > 0.1 {
        -player.vel.normalize()
    } else {
        backward
    };
    let flame_angle = flame.y.atan2(flame.x);
    let base_speed = (player.vel.length() * 0.5).max(150.0);

    let jets = [
        (back, 3, 0.15, 1.8, (3.0, 6.0), (0.15, 0.3)),
        (back + side * spacing, 2, 0.1, 1.5, (2.0, 4.0), (0.1, 0.25)),
        (back - side * spacing, 2, 0.1, 1.5, (2.0, 4.0), (0.1, 0.25)),
    ];
    for (origin, count, cone, speed_factor, size, life) in jets {
        let cone_width = (radius * cone).max(f32::EPSILON);
        for _ in 0..count {
            let offset = uniform(rng, -cone_width, cone_width);
            let center_ratio = 1.0 - offset.abs() / cone_width;
            let speed = base_speed * speed_factor * (0.8 + center_ratio * 0.4);
            let angle = flame_angle + uniform(rng, -0.15, 0.15) * (1.0 - center_ratio);
            let (vx, vy) = jittered(direction_from_angle(angle) * speed);
            let life_scale = 0.9 + center_ratio * 0.2;
            particles.emit(
                rng,
                &Emission::at(origin + side * offset, &THRUSTER_COLORS)
                    .velocity(vx, vy)
                    .size(Span::new(size.0 + center_ratio, size.1 + center_ratio))
                    .lifetime(Span::new(life.0 * life_scale, life.1 * life_scale)),
            );
        }
    }
}

/// Radial fireball when an asteroid is destroyed
pub fn explosion<R: Rng + ?Sized>(
    particles: &mut ParticleSystem,
    rng: &mut R,
    pos: Vec2,
    class: AsteroidClass,
) {
    let count = 12 + class.index() * 4;
    let max_speed = 120.0 + class.index() as f32 * 20.0;
    for _ in 0..count {
        let angle = uniform(rng, 0.0, TAU);
        let v = direction_from_angle(angle) * uniform(rng, 30.0, max_speed);
        particles.emit(
            rng,
            &Emission::at(pos, &FIRE_COLORS)
                .velocity(Span::fixed(v.x), Span::fixed(v.y))
                .size(Span::new(2.0, 5.0))
                .lifetime(Span::new(0.4, 1.0))
                .gravity(true),
        );
    }
}

/// Short bright sparks where the player got hit
pub fn sparks<R: Rng + ?Sized>(particles: &mut ParticleSystem, rng: &mut R, pos: Vec2) {
    particles.emit(
        rng,
        &Emission::at(pos, &SPARK_COLORS)
            .count(15)
            .velocity(Span::new(-150.0, 150.0), Span::new(-150.0, 150.0))
            .size(Span::new(1.0, 3.0))
            .lifetime(Span::new(0.15, 0.4))
            .gravity(true),
    );
}

/// Upward sparkle when a power-up is collected
pub fn pickup_sparkle<R: Rng + ?Sized>(
    particles: &mut ParticleSystem,
    rng: &mut R,
    pos: Vec2,
    kind: PowerUpKind,
) {
    let colors: &[Rgba] = match kind {
        PowerUpKind::Boom => &BOOM_PICKUP_COLORS,
        _ => &HEAL_COLORS,
    };
    particles.emit(
        rng,
        &Emission::at(pos, colors)
            .count(20)
            .velocity(Span::new(-60.0, 60.0), Span::new(-120.0, -20.0))
            .size(Span::new(1.0, 3.0))
            .lifetime(Span::new(0.3, 0.8)),
    );
}

/// Ring burst at screen center when a game starts
pub fn start_burst<R: Rng + ?Sized>(particles: &mut ParticleSystem, rng: &mut R, center: Vec2) {
    const RING: usize = 60;
    for i in 0..RING {
        let angle = i as f32 / RING as f32 * TAU + uniform(rng, -0.05, 0.05);
        let v = direction_from_angle(angle) * uniform(rng, 150.0, 300.0);
        particles.emit(
            rng,
            &Emission::at(center, &START_COLORS)
                .velocity(Span::around(v.x, 0.05), Span::around(v.y, 0.05))
                .size(Span::new(2.0, 4.0))
                .lifetime(Span::new(0.6, 1.2)),
        );
    }
}

/// Facing (degrees, 0 = nose up) for something travelling along `dir`
#[inline]
pub fn heading_degrees(dir: Vec2) -> f32 {
    (dir.y.atan2(dir.x) + FRAC_PI_2).to_degrees()
}
