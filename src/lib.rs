//! Final Escape - asteroid-dodging arcade core
//!
//! Core modules:
//! - `sim`: Frame simulation (particles, spawning, motion, collisions, health)
//! - `flow`: Game flow state machine (menu, countdown, playing, game over)
//! - `audio`: Sound cue / music crossfade model handed to the host
//! - `assets`: Opaque asset handles with placeholder fallback
//! - `draw`: Per-frame draw snapshot for an external renderer
//! - `settings`: User settings record (difficulty, sound, star opacity)

pub mod assets;
pub mod audio;
pub mod draw;
pub mod error;
pub mod flow;
pub mod highscores;
pub mod input;
pub mod settings;
pub mod sim;

pub use error::{ConfigError, FlowError};
pub use flow::{FlowState, GameFlowController};
pub use input::FrameInput;
pub use settings::Settings;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Game configuration constants
pub mod consts {
    /// Default screen dimensions
    pub const SCREEN_WIDTH: f32 = 800.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;
    /// Upper bound on a single frame's dt (avoids spiral of death after a stall)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Player ship
    pub const PLAYER_SIZE: f32 = 60.0;
    pub const PLAYER_SPEED: f32 = 300.0;
    pub const PLAYER_ACCELERATION: f32 = 1200.0;
    pub const PLAYER_DECELERATION: f32 = 900.0;
    pub const PLAYER_MAX_HEALTH: u32 = 100;
    /// Seconds of invulnerability after a hit
    pub const INVULNERABILITY_DURATION: f32 = 1.0;
    /// Seconds between flash toggles while invulnerable
    pub const FLASH_INTERVAL: f32 = 0.1;
    /// Alpha of the player during the "off" half of the flash
    pub const FLASH_DIM_ALPHA: u8 = 128;
    pub const THRUSTER_EMIT_INTERVAL: f32 = 0.03;

    /// Asteroids
    pub const ASTEROID_MIN_SPEED: f32 = 50.0;
    pub const ASTEROID_MAX_SPEED: f32 = 200.0;
    /// Average seconds between asteroid spawns at spawn-rate multiplier 1.0
    pub const ASTEROID_SPAWN_INTERVAL: f32 = 0.5;
    /// Spawn interval jitter as a fraction of the base (uniform in [1-j, 1+j])
    pub const ASTEROID_SPAWN_JITTER: f32 = 0.5;
    /// Max cosmetic spin (degrees per second, either direction)
    pub const ASTEROID_MAX_SPIN: f32 = 50.0;
    pub const ASTEROID_FIRE_INTERVAL: f32 = 0.08;
    /// Asteroid trajectories aim at center ± this fraction of the screen size
    pub const ASTEROID_TARGET_SPREAD: f32 = 0.25;

    /// Power-ups
    pub const MAX_ACTIVE_POWERUPS: usize = 2;
    pub const POWERUP_SIZE: f32 = 30.0;
    pub const POWERUP_SPAWN_INTERVAL: f32 = 10.0;
    pub const POWERUP_SPAWN_JITTER: f32 = 0.3;
    /// Boom radius as a fraction of min(screen width, height)
    pub const BOOM_RADIUS_FRACTION: f32 = 0.35;
    pub const BOOM_BONUS_PER_ASTEROID: u64 = 50;
    pub const BOOM_FLASH_DURATION: f32 = 0.5;
    /// Delay between consecutive destruction cues in a boom chain
    pub const BOOM_CHAIN_DELAY: f32 = 0.08;
    /// Only the first few destroyed asteroids get their own cue
    pub const BOOM_CHAIN_MAX_CUES: usize = 5;

    /// Particles
    pub const MAX_PARTICLES: usize = 5000;
    /// Downward acceleration for gravity-flagged particles (pixels/s²)
    pub const PARTICLE_GRAVITY: f32 = 50.0;

    /// Flow timings (seconds)
    pub const FADE_DURATION: f32 = 1.0;
    pub const FADE_IN_DURATION: f32 = 0.5;
    pub const MUSIC_FADE_DURATION: f32 = 1.0;
    pub const COUNTDOWN_DURATION: f32 = 3.0;
    pub const GAME_OVER_INPUT_DELAY: f32 = 1.0;

    /// Score accrued per second survived
    pub const SCORE_PER_SECOND: f64 = 10.0;

    /// Background stars
    pub const NUM_STARS: usize = 100;
}

/// Screen rectangle the simulation lives in (origin top-left, +y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(consts::SCREEN_WIDTH, consts::SCREEN_HEIGHT)
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    #[inline]
    pub fn min_dimension(&self) -> f32 {
        self.width.min(self.height)
    }

    /// True if a box of `half_extent` around `pos` lies entirely outside the
    /// screen rectangle grown by `buffer` on every side
    pub fn is_fully_outside(&self, pos: Vec2, half_extent: f32, buffer: f32) -> bool {
        pos.x + half_extent < -buffer
            || pos.x - half_extent > self.width + buffer
            || pos.y + half_extent < -buffer
            || pos.y - half_extent > self.height + buffer
    }
}

/// 8-bit RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

/// Uniform sample in `[lo, hi]`; tolerates reversed or collapsed bounds
#[inline]
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
    if hi - lo <= f32::EPSILON {
        return lo;
    }
    rng.random_range(lo..=hi)
}

/// Unit vector for an angle in radians
#[inline]
pub fn direction_from_angle(theta: f32) -> Vec2 {
    Vec2::new(theta.cos(), theta.sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_uniform_handles_degenerate_ranges() {
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(uniform(&mut rng, 3.0, 3.0), 3.0);
        for _ in 0..100 {
            let v = uniform(&mut rng, 5.0, -5.0);
            assert!((-5.0..=5.0).contains(&v));
        }
    }

    #[test]
    fn test_viewport_outside_check() {
        let vp = Viewport::new(800.0, 600.0);
        // Partially visible box is still inside
        assert!(!vp.is_fully_outside(Vec2::new(-10.0, 300.0), 20.0, 0.0));
        // Fully past the left edge but inside the buffer
        assert!(!vp.is_fully_outside(Vec2::new(-30.0, 300.0), 20.0, 40.0));
        // Beyond the buffer
        assert!(vp.is_fully_outside(Vec2::new(-61.0, 300.0), 20.0, 40.0));
        assert!(vp.is_fully_outside(Vec2::new(400.0, 661.0), 20.0, 40.0));
    }
}
