//! Frame simulation module
//!
//! All gameplay logic lives here:
//! - Every random draw goes through a caller-supplied RNG
//! - Entity lists are iterated in insertion order
//! - No rendering, audio, or platform dependencies

pub mod boom;
pub mod collision;
pub mod difficulty;
pub mod emitters;
pub mod health;
pub mod particles;
pub mod spawn;
pub mod stars;
pub mod state;
pub mod tick;
pub mod weighted;

pub use boom::{ScreenFlash, boom_radius, detonate};
pub use collision::{AsteroidHit, CollisionReport, circles_overlap, resolve_player_collisions};
pub use difficulty::{AsteroidClass, Difficulty, DifficultyProfile, SizeCategory};
pub use health::{Damageable, Health};
pub use particles::{Emission, Particle, ParticleSystem, Span};
pub use spawn::{AsteroidSpawn, PowerUpSpawn, Spawn, SpawnDirector, SpawnTimer};
pub use stars::{Star, StarField};
pub use state::{Asteroid, PlayState, Player, PowerUp, PowerUpKind};
pub use tick::{PlayEvent, TickContext, TickOutcome, tick};
