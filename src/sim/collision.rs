//! Circle collision and off-screen culling
//!
//! Every entity collides as a circle. The player is tested once per frame
//! against all asteroids and all power-ups.

use glam::Vec2;

use super::health::Damageable;
use super::state::{Asteroid, PlayState, PowerUp};
use crate::Viewport;

/// True if two circles strictly overlap
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) < reach * reach
}

/// Index of the first asteroid (in list order) overlapping the circle
pub fn first_overlapping_asteroid(pos: Vec2, radius: f32, asteroids: &[Asteroid]) -> Option<usize> {
    asteroids
        .iter()
        .position(|a| circles_overlap(pos, radius, a.pos, a.radius()))
}

/// Damage that actually landed this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsteroidHit {
    pub asteroid_id: u32,
    pub damage: u32,
    /// Midpoint between the two centers, used for the spark burst
    pub contact: Vec2,
}

/// Apply asteroid contact damage to `target`.
///
/// At most one asteroid deals damage per frame: the first overlapping one in
/// list order. Asteroids are not destroyed by the contact. Returns `None` if
/// nothing overlapped or the target shrugged the hit off.
pub fn resolve_asteroid_contact<D: Damageable + ?Sized>(
    target: &mut D,
    pos: Vec2,
    radius: f32,
    asteroids: &[Asteroid],
) -> Option<AsteroidHit> {
    if target.is_invulnerable() {
        return None;
    }
    let asteroid = &asteroids[first_overlapping_asteroid(pos, radius, asteroids)?];
    if !target.take_damage(asteroid.damage) {
        return None;
    }
    Some(AsteroidHit {
        asteroid_id: asteroid.id,
        damage: asteroid.damage,
        contact: (pos + asteroid.pos) / 2.0,
    })
}

/// Remove and return every power-up the circle touches
pub fn collect_powerups(pos: Vec2, radius: f32, powerups: &mut Vec<PowerUp>) -> Vec<PowerUp> {
    let mut picked = Vec::new();
    powerups.retain(|p| {
        if circles_overlap(pos, radius, p.pos, p.radius()) {
            picked.push(p.clone());
            false
        } else {
            true
        }
    });
    picked
}

/// Outcome of the per-frame player collision pass
#[derive(Debug, Clone, Default)]
pub struct CollisionReport {
    pub hit: Option<AsteroidHit>,
    pub pickups: Vec<PowerUp>,
}

/// Run the player against everything live.
///
/// A player whose health is depleted collects nothing, so a power-up
/// touched on the killing frame stays in the field.
pub fn resolve_player_collisions(state: &mut PlayState) -> CollisionReport {
    let pos = state.player.pos;
    let radius = state.player.radius();
    let hit = resolve_asteroid_contact(&mut state.player.health, pos, radius, &state.asteroids);
    if state.player.health.is_depleted() {
        return CollisionReport { hit, pickups: Vec::new() };
    }
    let pickups = collect_powerups(pos, radius, &mut state.powerups);
    CollisionReport { hit, pickups }
}

/// Drop asteroids and power-ups that have left the screen for good.
/// Returns how many entities were removed.
pub fn cull_off_screen(state: &mut PlayState, viewport: &Viewport) -> usize {
    let before = state.asteroids.len() + state.powerups.len();
    state.asteroids.retain(|a| !a.is_off_screen(viewport));
    state.powerups.retain(|p| !p.is_off_screen(viewport));
    before - state.asteroids.len() - state.powerups.len()
}
