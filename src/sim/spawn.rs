//! Spawn timers and entity descriptors
//!
//! The director owns two independent timers (asteroids and power-ups). When a
//! timer fires it is re-armed with a fresh jittered interval and the director
//! hands back a descriptor. Turning descriptors into entities (and assigning
//! IDs) is the play state's job.

use glam::Vec2;
use rand::Rng;

use super::difficulty::{AsteroidClass, Difficulty, DifficultyProfile, SizeCategory, asteroid_damage};
use super::state::PowerUpKind;
use super::weighted;
use crate::consts::*;
use crate::{Viewport, uniform};

/// Probability split for power-up kinds (boom vs. heal tiers)
pub const POWERUP_KIND_WEIGHTS: [(PowerUpKind, f32); 4] = [
    (PowerUpKind::Boom, 0.25),
    (PowerUpKind::Heal25, 0.45),
    (PowerUpKind::Heal50, 0.20),
    (PowerUpKind::Heal100, 0.10),
];

/// Countdown timer re-armed with a jittered interval each time it fires
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnTimer {
    /// Average seconds between firings
    pub base: f32,
    /// Interval is uniform in `[base * (1 - jitter), base * (1 + jitter)]`
    pub jitter: f32,
    remaining: f32,
}

impl SpawnTimer {
    pub fn new<R: Rng + ?Sized>(base: f32, jitter: f32, rng: &mut R) -> Self {
        let mut timer = Self {
            base,
            jitter: jitter.clamp(0.0, 0.95),
            remaining: 0.0,
        };
        timer.remaining = timer.next_interval(rng);
        timer
    }

    fn next_interval<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        let lo = self.base * (1.0 - self.jitter);
        let hi = self.base * (1.0 + self.jitter);
        uniform(rng, lo, hi).max(0.01)
    }

    /// Seconds until the next firing
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Advance by `dt`; returns how many times the timer fired
    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) -> u32 {
        self.remaining -= dt;
        let mut fired = 0;
        while self.remaining <= 0.0 {
            fired += 1;
            self.remaining += self.next_interval(rng);
        }
        fired
    }
}

/// Everything needed to place a new asteroid
#[derive(Debug, Clone, PartialEq)]
pub struct AsteroidSpawn {
    pub class: AsteroidClass,
    pub size: SizeCategory,
    pub diameter: f32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: u32,
    pub spin: f32,
}

/// Everything needed to place a new power-up
#[derive(Debug, Clone, PartialEq)]
pub struct PowerUpSpawn {
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub vel: Vec2,
}

/// A spawn decision for this frame
#[derive(Debug, Clone, PartialEq)]
pub enum Spawn {
    Asteroid(AsteroidSpawn),
    PowerUp(PowerUpSpawn),
}

/// Per-episode spawn timing, driven by the active difficulty profile
#[derive(Debug, Clone)]
pub struct SpawnDirector {
    difficulty: Difficulty,
    asteroid_timer: SpawnTimer,
    powerup_timer: SpawnTimer,
}

impl SpawnDirector {
    pub fn new<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> Self {
        let profile = difficulty.profile();
        let asteroid_base = ASTEROID_SPAWN_INTERVAL / profile.spawn_rate_multiplier;
        let powerup_base = POWERUP_SPAWN_INTERVAL * profile.powerup_interval_multiplier;
        Self {
            difficulty,
            asteroid_timer: SpawnTimer::new(asteroid_base, ASTEROID_SPAWN_JITTER, rng),
            powerup_timer: SpawnTimer::new(powerup_base, POWERUP_SPAWN_JITTER, rng),
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn profile(&self) -> &'static DifficultyProfile {
        self.difficulty.profile()
    }

    /// Advance both timers and collect this frame's spawns.
    ///
    /// A power-up firing while `live_powerups` is at the cap is dropped and
    /// the timer simply re-arms.
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        live_powerups: usize,
        viewport: &Viewport,
        rng: &mut R,
    ) -> Vec<Spawn> {
        let mut spawns = Vec::new();

        for _ in 0..self.asteroid_timer.update(dt, rng) {
            spawns.push(Spawn::Asteroid(self.spawn_asteroid(viewport, rng)));
        }

        let mut live = live_powerups;
        for _ in 0..self.powerup_timer.update(dt, rng) {
            if live >= MAX_ACTIVE_POWERUPS {
                log::debug!("Power-up spawn skipped: {} already live", live);
                continue;
            }
            spawns.push(Spawn::PowerUp(spawn_powerup(viewport, rng)));
            live += 1;
        }

        spawns
    }

    /// Roll a new asteroid: weighted class, allowed size, edge position, aim
    pub fn spawn_asteroid<R: Rng + ?Sized>(&self, viewport: &Viewport, rng: &mut R) -> AsteroidSpawn {
        let profile = self.profile();
        let class = weighted::choose(rng, &profile.class_table()).unwrap_or(AsteroidClass::Dust);
        let sizes = profile.sizes_for(class);
        let size = sizes
            .get(rng.random_range(0..sizes.len().max(1)))
            .copied()
            .unwrap_or(SizeCategory::Small);

        let (min_d, max_d) = size.diameter_range();
        let diameter = uniform(rng, min_d, max_d).round();

        let (w, h) = (viewport.width, viewport.height);
        let pos = match rng.random_range(0..4) {
            0 => Vec2::new(uniform(rng, 0.0, w), -diameter),
            1 => Vec2::new(w + diameter, uniform(rng, 0.0, h)),
            2 => Vec2::new(uniform(rng, 0.0, w), h + diameter),
            _ => Vec2::new(-diameter, uniform(rng, 0.0, h)),
        };

        let spread_x = w * ASTEROID_TARGET_SPREAD;
        let spread_y = h * ASTEROID_TARGET_SPREAD;
        let target = viewport.center()
            + Vec2::new(uniform(rng, -spread_x, spread_x), uniform(rng, -spread_y, spread_y));
        let dir = (target - pos).try_normalize().unwrap_or(Vec2::Y);
        let speed = uniform(rng, ASTEROID_MIN_SPEED, ASTEROID_MAX_SPEED) * size.speed_multiplier();

        let spawn = AsteroidSpawn {
            class,
            size,
            diameter,
            pos,
            vel: dir * speed,
            damage: asteroid_damage(class, size),
            spin: uniform(rng, -ASTEROID_MAX_SPIN, ASTEROID_MAX_SPIN),
        };
        log::debug!(
            "Spawn asteroid {:?}/{:?} d={} dmg={} at ({:.0}, {:.0})",
            class,
            size,
            diameter,
            spawn.damage,
            pos.x,
            pos.y
        );
        spawn
    }
}

/// Roll a new power-up just above the top edge, drifting down
pub fn spawn_powerup<R: Rng + ?Sized>(viewport: &Viewport, rng: &mut R) -> PowerUpSpawn {
    let kind = weighted::choose(rng, &POWERUP_KIND_WEIGHTS).unwrap_or(PowerUpKind::Heal25);
    let half = POWERUP_SIZE / 2.0;
    let pos = Vec2::new(uniform(rng, half, viewport.width - half), -half);
    let vel = Vec2::new(uniform(rng, -20.0, 20.0), uniform(rng, 20.0, 50.0));
    log::debug!("Spawn power-up {} at x={:.0}", kind.as_str(), pos.x);
    PowerUpSpawn { kind, pos, vel }
}
