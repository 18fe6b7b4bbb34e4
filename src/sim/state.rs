//! Entities and per-episode play state
//!
//! A `PlayState` is created fresh for every Playing episode and owns the
//! player, the live asteroids and power-ups, the spawn timers, and the score.
//! Nothing in here survives into the next episode.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::boom::ScreenFlash;
use super::difficulty::{AsteroidClass, Difficulty, SizeCategory};
use super::emitters::heading_degrees;
use super::health::Health;
use super::spawn::{AsteroidSpawn, PowerUpSpawn, SpawnDirector};
use crate::Viewport;
use crate::consts::*;

/// An obstacle flying across the screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asteroid {
    pub id: u32,
    pub class: AsteroidClass,
    pub size: SizeCategory,
    /// Diameter in pixels
    pub diameter: f32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Damage dealt to the player on contact
    pub damage: u32,
    /// Cosmetic rotation (degrees)
    pub rotation: f32,
    /// Cosmetic spin (degrees per second)
    pub spin: f32,
    /// Seconds until the next fire-trail emission
    pub fire_timer: f32,
}

impl Asteroid {
    pub fn from_spawn(id: u32, spawn: &AsteroidSpawn) -> Self {
        Self {
            id,
            class: spawn.class,
            size: spawn.size,
            diameter: spawn.diameter,
            pos: spawn.pos,
            vel: spawn.vel,
            damage: spawn.damage,
            rotation: 0.0,
            spin: spawn.spin,
            fire_timer: 0.0,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.diameter / 2.0
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.rotation = (self.rotation + self.spin * dt) % 360.0;
    }

    /// Gone for good once its box is past the screen by twice its size
    pub fn is_off_screen(&self, viewport: &Viewport) -> bool {
        viewport.is_fully_outside(self.pos, self.radius(), self.diameter * 2.0)
    }
}

/// Kind of collectible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Area effect that destroys nearby asteroids
    Boom,
    Heal25,
    Heal50,
    Heal100,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Boom,
        PowerUpKind::Heal25,
        PowerUpKind::Heal50,
        PowerUpKind::Heal100,
    ];

    /// Health restored on pickup, `None` for non-healing kinds
    pub fn heal_amount(self) -> Option<u32> {
        match self {
            PowerUpKind::Boom => None,
            PowerUpKind::Heal25 => Some(25),
            PowerUpKind::Heal50 => Some(50),
            PowerUpKind::Heal100 => Some(100),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PowerUpKind::Boom => "boom",
            PowerUpKind::Heal25 => "heal-25",
            PowerUpKind::Heal50 => "heal-50",
            PowerUpKind::Heal100 => "heal-100",
        }
    }
}

/// A collectible drifting down the screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Edge length of the pickup sprite in pixels
    pub size: f32,
}

impl PowerUp {
    pub fn from_spawn(id: u32, spawn: &PowerUpSpawn) -> Self {
        Self {
            id,
            kind: spawn.kind,
            pos: spawn.pos,
            vel: spawn.vel,
            size: POWERUP_SIZE,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.size / 2.0
    }

    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }

    pub fn is_off_screen(&self, viewport: &Viewport) -> bool {
        viewport.is_fully_outside(self.pos, self.radius(), self.size)
    }
}

/// The player's craft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing (degrees, 0 = nose up)
    pub rotation: f32,
    pub health: Health,
    /// Steering input was active this frame
    pub thrusting: bool,
    /// Seconds until the next thruster emission
    pub thruster_timer: f32,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            rotation: 0.0,
            health: Health::default(),
            thrusting: false,
            thruster_timer: 0.0,
        }
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        PLAYER_SIZE / 2.0
    }

    /// Steer toward `direction` (magnitude <= 1) and integrate position
    pub fn steer(&mut self, direction: Vec2, dt: f32, viewport: &Viewport) {
        self.thrusting = direction.length_squared() > 0.0;

        if self.thrusting {
            self.vel += direction.normalize_or_zero() * PLAYER_ACCELERATION * dt;
            self.vel = self.vel.clamp_length_max(PLAYER_SPEED);
        } else {
            let speed = self.vel.length();
            let decel = PLAYER_DECELERATION * dt;
            // Never overshoot through zero
            if speed <= decel {
                self.vel = Vec2::ZERO;
            } else {
                self.vel -= self.vel / speed * decel;
            }
        }

        self.pos += self.vel * dt;
        self.clamp_to(viewport);

        if self.vel.length() > 0.5 {
            self.rotation = heading_degrees(self.vel);
        }
    }

    fn clamp_to(&mut self, viewport: &Viewport) {
        let r = self.radius();
        let max_x = (viewport.width - r).max(r);
        let max_y = (viewport.height - r).max(r);
        if self.pos.x < r || self.pos.x > max_x {
            self.pos.x = self.pos.x.clamp(r, max_x);
            self.vel.x = 0.0;
        }
        if self.pos.y < r || self.pos.y > max_y {
            self.pos.y = self.pos.y.clamp(r, max_y);
            self.vel.y = 0.0;
        }
    }
}

/// Everything owned by one Playing episode
#[derive(Debug, Clone)]
pub struct PlayState {
    /// Tier this episode was started with
    pub difficulty: Difficulty,
    pub player: Player,
    pub asteroids: Vec<Asteroid>,
    pub powerups: Vec<PowerUp>,
    pub spawner: SpawnDirector,
    /// Full-screen flash after a boom
    pub flash: ScreenFlash,
    /// Time survived plus boom bonuses
    pub score: f64,
    /// Seconds survived
    pub time_alive: f32,
    /// Asteroids destroyed by booms
    pub boom_kills: u32,
    /// Next entity ID
    next_id: u32,
}

impl PlayState {
    pub fn new<R: Rng + ?Sized>(difficulty: Difficulty, viewport: &Viewport, rng: &mut R) -> Self {
        log::info!("New episode on {}", difficulty.label());
        Self {
            difficulty,
            player: Player::new(viewport.center()),
            asteroids: Vec::new(),
            powerups: Vec::new(),
            spawner: SpawnDirector::new(difficulty, rng),
            flash: ScreenFlash::default(),
            score: 0.0,
            time_alive: 0.0,
            boom_kills: 0,
            next_id: 1,
        }
    }

    /// Get the next entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Whole-point score shown to the player
    pub fn display_score(&self) -> u64 {
        self.score.max(0.0) as u64
    }

    pub fn add_asteroid(&mut self, spawn: &AsteroidSpawn) -> u32 {
        let id = self.next_entity_id();
        self.asteroids.push(Asteroid::from_spawn(id, spawn));
        id
    }

    pub fn add_powerup(&mut self, spawn: &PowerUpSpawn) -> u32 {
        let id = self.next_entity_id();
        self.powerups.push(PowerUp::from_spawn(id, spawn));
        id
    }
}
