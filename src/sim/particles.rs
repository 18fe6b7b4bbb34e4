//! Bounded particle system for visual effects
//!
//! Particles never affect gameplay. The pool is capped: when it is full the
//! oldest particle is evicted to make room, so dense explosion chains cannot
//! blow up frame time.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use crate::consts::{MAX_PARTICLES, PARTICLE_GRAVITY};
use crate::{Rgba, uniform};

/// A single short-lived visual particle
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: Rgba,
    /// Radius in pixels
    pub size: f32,
    /// Seconds since creation
    pub age: f32,
    /// Seconds the particle lives for (fixed at creation)
    pub lifetime: f32,
    pub gravity: bool,
    pub fade: bool,
}

impl Particle {
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.age < self.lifetime
    }

    /// Advance one step. Returns false once the particle has expired.
    fn step(&mut self, dt: f32) -> bool {
        self.pos += self.vel * dt;
        if self.gravity {
            self.vel.y += PARTICLE_GRAVITY * dt;
        }
        self.age += dt;
        self.is_alive()
    }

    /// Render alpha: linear 255 -> 0 over the lifetime when fading
    pub fn alpha(&self) -> u8 {
        if !self.fade || self.lifetime <= 0.0 {
            return self.color.a;
        }
        let t = (1.0 - self.age / self.lifetime).clamp(0.0, 1.0);
        (255.0 * t) as u8
    }

    /// Color with the effective alpha applied
    pub fn render_color(&self) -> Rgba {
        self.color.with_alpha(self.alpha())
    }
}

/// Inclusive `[min, max]` range a value is sampled from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Collapsed span that always yields `v`
    pub const fn fixed(v: f32) -> Self {
        Self { min: v, max: v }
    }

    /// `center` ± `fraction` of itself (order-safe for negative centers)
    pub fn around(center: f32, fraction: f32) -> Self {
        let a = center * (1.0 - fraction);
        let b = center * (1.0 + fraction);
        Self::new(a.min(b), a.max(b))
    }

    #[inline]
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        uniform(rng, self.min, self.max)
    }
}

/// One emission request: `count` particles at `pos`, each sampled independently
#[derive(Debug, Clone)]
pub struct Emission<'a> {
    pub pos: Vec2,
    pub colors: &'a [Rgba],
    pub count: usize,
    pub vel_x: Span,
    pub vel_y: Span,
    pub size: Span,
    pub lifetime: Span,
    pub gravity: bool,
    pub fade: bool,
}

impl<'a> Emission<'a> {
    /// Emission with the stock ranges: velocity ±20, size 1-3, lifetime 0.5-1.5s
    pub fn at(pos: Vec2, colors: &'a [Rgba]) -> Self {
        Self {
            pos,
            colors,
            count: 1,
            vel_x: Span::new(-20.0, 20.0),
            vel_y: Span::new(-20.0, 20.0),
            size: Span::new(1.0, 3.0),
            lifetime: Span::new(0.5, 1.5),
            gravity: false,
            fade: true,
        }
    }

    pub fn count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn velocity(mut self, vel_x: Span, vel_y: Span) -> Self {
        self.vel_x = vel_x;
        self.vel_y = vel_y;
        self
    }

    pub fn size(mut self, size: Span) -> Self {
        self.size = size;
        self
    }

    pub fn lifetime(mut self, lifetime: Span) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn gravity(mut self, gravity: bool) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn fade(mut self, fade: bool) -> Self {
        self.fade = fade;
        self
    }
}

/// Owner of every live particle
#[derive(Debug, Clone)]
pub struct ParticleSystem {
    particles: VecDeque<Particle>,
    capacity: usize,
}

impl Default for ParticleSystem {
    fn default() -> Self {
        Self::new(MAX_PARTICLES)
    }
}

impl ParticleSystem {
    pub fn new(capacity: usize) -> Self {
        Self {
            // Don't reserve the full cap up front; most frames use a fraction
            particles: VecDeque::with_capacity(capacity.min(512)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Live particles, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Insert one particle, evicting the oldest if the pool is full
    pub fn push(&mut self, particle: Particle) {
        if self.capacity == 0 {
            return;
        }
        while self.particles.len() >= self.capacity {
            self.particles.pop_front();
        }
        self.particles.push_back(particle);
    }

    /// Create `emission.count` particles with independently sampled properties
    pub fn emit<R: Rng + ?Sized>(&mut self, rng: &mut R, emission: &Emission<'_>) {
        for _ in 0..emission.count {
            let color = emission.colors.choose(rng).copied().unwrap_or(Rgba::WHITE);
            let vel = Vec2::new(emission.vel_x.sample(rng), emission.vel_y.sample(rng));
            let size = emission.size.sample(rng);
            let lifetime = emission.lifetime.sample(rng);
            self.push(Particle {
                pos: emission.pos,
                vel,
                color,
                size,
                age: 0.0,
                lifetime,
                gravity: emission.gravity,
                fade: emission.fade,
            });
        }
    }

    /// Integrate every particle and drop the expired ones
    pub fn update(&mut self, dt: f32) {
        self.particles.retain_mut(|p| p.step(dt));
        debug_assert!(self.particles.len() <= self.capacity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const PALETTE: [Rgba; 2] = [Rgba::rgb(255, 0, 0), Rgba::rgb(0, 0, 255)];

    fn particle_with_lifetime(lifetime: f32) -> Particle {
        Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(10.0, 0.0),
            color: Rgba::WHITE,
            size: 2.0,
            age: 0.0,
            lifetime,
            gravity: false,
            fade: true,
        }
    }

    #[test]
    fn test_particle_dies_at_lifetime() {
        let mut system = ParticleSystem::new(10);
        system.push(particle_with_lifetime(1.0));

        system.update(0.99);
        assert_eq!(system.len(), 1, "alive just before lifetime");

        system.update(0.02);
        assert_eq!(system.len(), 0, "gone just after lifetime");
    }

    #[test]
    fn test_oldest_particle_evicted_when_full() {
        let mut system = ParticleSystem::new(3);
        for i in 0..5 {
            let mut p = particle_with_lifetime(10.0);
            p.size = i as f32;
            system.push(p);
        }
        assert_eq!(system.len(), 3);
        let sizes: Vec<f32> = system.iter().map(|p| p.size).collect();
        assert_eq!(sizes, vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_zero_capacity_holds_nothing() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut system = ParticleSystem::new(0);
        system.emit(&mut rng, &Emission::at(Vec2::ZERO, &PALETTE).count(10));
        assert!(system.is_empty());
    }

    #[test]
    fn test_emit_samples_within_ranges() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut system = ParticleSystem::new(1000);
        let emission = Emission::at(Vec2::new(5.0, 5.0), &PALETTE)
            .count(200)
            .velocity(Span::new(-1.0, 1.0), Span::new(10.0, 20.0))
            .size(Span::new(2.0, 4.0))
            .lifetime(Span::new(0.1, 0.2));
        system.emit(&mut rng, &emission);

        assert_eq!(system.len(), 200);
        for p in system.iter() {
            assert_eq!(p.pos, Vec2::new(5.0, 5.0));
            assert!((-1.0..=1.0).contains(&p.vel.x));
            assert!((10.0..=20.0).contains(&p.vel.y));
            assert!((2.0..=4.0).contains(&p.size));
            assert!((0.1..=0.2).contains(&p.lifetime));
            assert!(PALETTE.contains(&p.color));
        }
    }

    #[test]
    fn test_gravity_pulls_down() {
        let mut system = ParticleSystem::new(4);
        let mut p = particle_with_lifetime(5.0);
        p.vel = Vec2::ZERO;
        p.gravity = true;
        system.push(p);

        system.update(1.0);
        let p = system.iter().next().unwrap();
        assert!((p.vel.y - PARTICLE_GRAVITY).abs() < 1e-4);
        // Position integrates before gravity is applied
        assert_eq!(p.pos.y, 0.0);
    }

    #[test]
    fn test_fade_alpha_is_linear() {
        let mut p = particle_with_lifetime(2.0);
        assert_eq!(p.alpha(), 255);
        p.age = 1.0;
        assert_eq!(p.alpha(), 127);
        p.fade = false;
        assert_eq!(p.alpha(), 255);
    }

    proptest! {
        #[test]
        fn prop_len_never_exceeds_capacity(
            capacity in 0usize..64,
            steps in prop::collection::vec((0usize..40, 0.0f32..0.2), 1..30),
        ) {
            let mut rng = Pcg32::seed_from_u64(7);
            let mut system = ParticleSystem::new(capacity);
            for (count, dt) in steps {
                system.emit(&mut rng, &Emission::at(Vec2::ZERO, &PALETTE).count(count));
                prop_assert!(system.len() <= capacity);
                system.update(dt);
                prop_assert!(system.len() <= capacity);
                prop_assert!(system.iter().all(Particle::is_alive));
            }
        }
    }
}
