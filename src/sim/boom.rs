//! Area-effect ("boom") resolution and the full-screen flash

use glam::Vec2;
use rand::Rng;

use super::emitters;
use super::particles::ParticleSystem;
use super::state::{Asteroid, PlayState};
use crate::consts::{BOOM_BONUS_PER_ASTEROID, BOOM_FLASH_DURATION, BOOM_RADIUS_FRACTION};
use crate::{Rgba, Viewport};

/// Decaying full-screen color overlay
#[derive(Debug, Clone, PartialEq)]
pub struct ScreenFlash {
    pub color: Rgba,
    duration: f32,
    remaining: f32,
}

impl Default for ScreenFlash {
    fn default() -> Self {
        Self {
            color: Rgba::WHITE,
            duration: BOOM_FLASH_DURATION,
            remaining: 0.0,
        }
    }
}

impl ScreenFlash {
    pub fn trigger(&mut self, color: Rgba, duration: f32) {
        self.color = color;
        self.duration = duration.max(f32::EPSILON);
        self.remaining = self.duration;
    }

    pub fn update(&mut self, dt: f32) {
        self.remaining = (self.remaining - dt).max(0.0);
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    /// Overlay alpha, linear from 255 down to 0
    pub fn alpha(&self) -> u8 {
        if !self.is_active() {
            return 0;
        }
        (255.0 * (self.remaining / self.duration).clamp(0.0, 1.0)) as u8
    }
}

/// Effect radius for the given screen
#[inline]
pub fn boom_radius(viewport: &Viewport) -> f32 {
    viewport.min_dimension() * BOOM_RADIUS_FRACTION
}

/// Remove every asteroid touching the circle at `center`, returning them
/// in their original order
pub fn take_asteroids_in_radius(asteroids: &mut Vec<Asteroid>, center: Vec2, radius: f32) -> Vec<Asteroid> {
    let mut destroyed = Vec::new();
    asteroids.retain(|a| {
        let reach = radius + a.radius();
        if a.pos.distance_squared(center) < reach * reach {
            destroyed.push(a.clone());
            false
        } else {
            true
        }
    });
    destroyed
}

/// Detonate a boom at `center`: destroy asteroids in range, award the bonus,
/// burst explosions, and start the flash. Returns the number destroyed.
pub fn detonate<R: Rng + ?Sized>(
    state: &mut PlayState,
    center: Vec2,
    viewport: &Viewport,
    particles: &mut ParticleSystem,
    rng: &mut R,
) -> usize {
    let radius = boom_radius(viewport);
    let destroyed = take_asteroids_in_radius(&mut state.asteroids, center, radius);

    for asteroid in &destroyed {
        emitters::explosion(particles, rng, asteroid.pos, asteroid.class);
    }

    let count = destroyed.len();
    state.boom_kills += count as u32;
    state.score += (count as u64 * BOOM_BONUS_PER_ASTEROID) as f64;
    state.flash.trigger(Rgba::WHITE, BOOM_FLASH_DURATION);

    log::info!(
        "Boom at ({:.0}, {:.0}) r={:.0}: {} asteroids destroyed",
        center.x,
        center.y,
        radius,
        count
    );
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::difficulty::{AsteroidClass, Difficulty, SizeCategory};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rock_at(id: u32, pos: Vec2) -> Asteroid {
        Asteroid {
            id,
            class: AsteroidClass::Iron,
            size: SizeCategory::Small,
            diameter: 20.0,
            pos,
            vel: Vec2::ZERO,
            damage: 25,
            rotation: 0.0,
            spin: 0.0,
            fire_timer: 0.0,
        }
    }

    #[test]
    fn test_boom_destroys_only_asteroids_in_range() {
        let mut rng = Pcg32::seed_from_u64(5);
        let vp = Viewport::default();
        let mut particles = ParticleSystem::default();
        let mut state = PlayState::new(Difficulty::NormalSpace, &vp, &mut rng);
        let center = vp.center();
        // radius = 600 * 0.35 = 210
        let inside = [
            Vec2::new(0.0, 0.0),
            Vec2::new(100.0, 0.0),
            Vec2::new(0.0, -150.0),
            Vec2::new(-200.0, 0.0),
            Vec2::new(140.0, 140.0),
        ];
        let outside = [Vec2::new(300.0, 0.0), Vec2::new(0.0, 250.0)];
        for (i, offset) in inside.iter().chain(outside.iter()).enumerate() {
            state.asteroids.push(rock_at(i as u32, center + *offset));
        }
        let score_before = state.score;

        let destroyed = detonate(&mut state, center, &vp, &mut particles, &mut rng);

        assert_eq!(destroyed, 5);
        assert_eq!(state.asteroids.len(), 2);
        assert!(state.asteroids.iter().all(|a| a.id >= 5));
        assert_eq!(state.score - score_before, (5 * BOOM_BONUS_PER_ASTEROID) as f64);
        assert_eq!(state.boom_kills, 5);
        assert!(state.flash.is_active());
        assert!(!particles.is_empty());
    }

    #[test]
    fn test_radius_includes_asteroid_size() {
        let mut asteroids = vec![rock_at(1, Vec2::new(105.0, 0.0))];
        // 100 + 10 > 105
        let hit = take_asteroids_in_radius(&mut asteroids, Vec2::ZERO, 100.0);
        assert_eq!(hit.len(), 1);
        assert!(asteroids.is_empty());
    }

    #[test]
    fn test_flash_decays_linearly() {
        let mut flash = ScreenFlash::default();
        assert_eq!(flash.alpha(), 0);
        flash.trigger(Rgba::WHITE, 0.5);
        assert_eq!(flash.alpha(), 255);
        flash.update(0.25);
        assert_eq!(flash.alpha(), 127);
        flash.update(0.3);
        assert!(!flash.is_active());
        assert_eq!(flash.alpha(), 0);
    }
}
