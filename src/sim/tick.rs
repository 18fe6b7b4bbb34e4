//! Per-frame Playing simulation
//!
//! One call advances an episode by `dt` in a fixed order: particles, motion
//! and culling, spawn timers, collisions and their effects, then score.

use glam::Vec2;
use rand::Rng;

use super::boom;
use super::collision::{cull_off_screen, resolve_player_collisions};
use super::emitters;
use super::particles::ParticleSystem;
use super::spawn::Spawn;
use super::state::{PlayState, PowerUpKind};
use crate::Viewport;
use crate::consts::*;

/// Shared resources the episode borrows for one frame
pub struct TickContext<'a, R: Rng + ?Sized> {
    pub rng: &'a mut R,
    pub particles: &'a mut ParticleSystem,
    pub viewport: Viewport,
}

/// Something gameplay-relevant that happened this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlayEvent {
    /// Contact damage landed
    PlayerHit { damage: u32, health: u32 },
    PowerUpCollected(PowerUpKind),
    Healed { amount: u32 },
    BoomDetonated { destroyed: usize },
    /// Health reached zero
    PlayerDestroyed,
}

/// Result of one tick
#[derive(Debug, Clone, Default)]
pub struct TickOutcome {
    pub events: Vec<PlayEvent>,
    pub player_destroyed: bool,
}

/// Advance the episode by one frame
pub fn tick<R: Rng + ?Sized>(
    state: &mut PlayState,
    ctx: &mut TickContext<'_, R>,
    direction: Vec2,
    dt: f32,
) -> TickOutcome {
    let mut outcome = TickOutcome::default();
    let viewport = ctx.viewport;

    ctx.particles.update(dt);

    update_player(state, ctx, direction, dt);
    update_hazards(state, ctx, dt);
    state.flash.update(dt);
    cull_off_screen(state, &viewport);

    let live_powerups = state.powerups.len();
    for spawn in state.spawner.update(dt, live_powerups, &viewport, ctx.rng) {
        match spawn {
            Spawn::Asteroid(a) => {
                state.add_asteroid(&a);
            }
            Spawn::PowerUp(p) => {
                state.add_powerup(&p);
            }
        }
    }

    let report = resolve_player_collisions(state);
    if let Some(hit) = report.hit {
        emitters::sparks(ctx.particles, ctx.rng, hit.contact);
        outcome.events.push(PlayEvent::PlayerHit {
            damage: hit.damage,
            health: state.player.health.current(),
        });
        log::debug!(
            "Player hit for {} ({} left)",
            hit.damage,
            state.player.health.current()
        );
    }
    if state.player.health.is_depleted() {
        outcome.player_destroyed = true;
    }
    for pickup in &report.pickups {
        emitters::pickup_sparkle(ctx.particles, ctx.rng, pickup.pos, pickup.kind);
        outcome.events.push(PlayEvent::PowerUpCollected(pickup.kind));
        match pickup.kind.heal_amount() {
            Some(amount) => {
                let healed = state.player.health.heal(amount);
                outcome.events.push(PlayEvent::Healed { amount: healed });
            }
            None => {
                let center = state.player.pos;
                let destroyed = boom::detonate(state, center, &viewport, ctx.particles, ctx.rng);
                outcome.events.push(PlayEvent::BoomDetonated { destroyed });
            }
        }
    }

    if outcome.player_destroyed {
        outcome.events.push(PlayEvent::PlayerDestroyed);
        log::info!(
            "Player destroyed after {:.1}s with score {}",
            state.time_alive + dt,
            state.display_score()
        );
    }

    state.time_alive += dt;
    state.score += f64::from(dt) * SCORE_PER_SECOND;

    outcome
}

fn update_player<R: Rng + ?Sized>(
    state: &mut PlayState,
    ctx: &mut TickContext<'_, R>,
    direction: Vec2,
    dt: f32,
) {
    let player = &mut state.player;
    player.steer(direction, dt, &ctx.viewport);
    player.health.update(dt);

    if player.thrusting {
        player.thruster_timer -= dt;
        if player.thruster_timer <= 0.0 {
            emitters::thruster_trail(ctx.particles, ctx.rng, player);
            player.thruster_timer = THRUSTER_EMIT_INTERVAL;
        }
    }
}

fn update_hazards<R: Rng + ?Sized>(state: &mut PlayState, ctx: &mut TickContext<'_, R>, dt: f32) {
    for asteroid in &mut state.asteroids {
        asteroid.advance(dt);
        asteroid.fire_timer -= dt;
        if asteroid.fire_timer <= 0.0 {
            emitters::asteroid_fire(
                ctx.particles,
                ctx.rng,
                asteroid.pos,
                asteroid.vel,
                asteroid.radius(),
                asteroid.class,
            );
            asteroid.fire_timer = ASTEROID_FIRE_INTERVAL;
        }
    }
    for powerup in &mut state.powerups {
        powerup.advance(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::difficulty::{AsteroidClass, Difficulty, SizeCategory};
    use crate::sim::spawn::{AsteroidSpawn, PowerUpSpawn};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 1.0 / 60.0;

    fn setup(seed: u64) -> (PlayState, Pcg32, ParticleSystem) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let state = PlayState::new(Difficulty::NormalSpace, &Viewport::default(), &mut rng);
        (state, rng, ParticleSystem::default())
    }

    fn run(state: &mut PlayState, rng: &mut Pcg32, particles: &mut ParticleSystem, dir: Vec2) -> TickOutcome {
        let mut ctx = TickContext {
            rng,
            particles,
            viewport: Viewport::default(),
        };
        tick(state, &mut ctx, dir, DT)
    }

    fn parked_asteroid(pos: Vec2, damage: u32) -> AsteroidSpawn {
        AsteroidSpawn {
            class: AsteroidClass::Ember,
            size: SizeCategory::Small,
            diameter: 20.0,
            pos,
            vel: Vec2::ZERO,
            damage,
            spin: 0.0,
        }
    }

    #[test]
    fn test_score_accrues_with_time() {
        let (mut state, mut rng, mut particles) = setup(1);
        // Keep the field empty so nothing interferes
        for _ in 0..60 {
            state.asteroids.clear();
            state.powerups.clear();
            run(&mut state, &mut rng, &mut particles, Vec2::ZERO);
        }
        assert!((state.score - SCORE_PER_SECOND).abs() < 1e-3);
        assert!((state.time_alive - 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_spawning_fills_the_field() {
        let (mut state, mut rng, mut particles) = setup(2);
        for _ in 0..180 {
            run(&mut state, &mut rng, &mut particles, Vec2::ZERO);
            state.player.health.heal(PLAYER_MAX_HEALTH);
        }
        assert!(!state.asteroids.is_empty());
        assert!(!particles.is_empty(), "fire trails emitted");
    }

    #[test]
    fn test_lethal_hit_reports_destruction() {
        let (mut state, mut rng, mut particles) = setup(3);
        let pos = state.player.pos;
        state.add_asteroid(&parked_asteroid(pos, 500));

        let outcome = run(&mut state, &mut rng, &mut particles, Vec2::ZERO);
        assert!(outcome.player_destroyed);
        assert!(outcome.events.contains(&PlayEvent::PlayerHit { damage: 500, health: 0 }));
        assert!(outcome.events.contains(&PlayEvent::PlayerDestroyed));
        // Contact does not destroy the asteroid
        assert_eq!(state.asteroids.len(), 1);
    }

    #[test]
    fn test_heal_on_lethal_frame_does_not_revive() {
        let (mut state, mut rng, mut particles) = setup(6);
        let pos = state.player.pos;
        state.add_asteroid(&parked_asteroid(pos, 500));
        state.add_powerup(&PowerUpSpawn {
            kind: PowerUpKind::Heal25,
            pos,
            vel: Vec2::ZERO,
        });

        let outcome = run(&mut state, &mut rng, &mut particles, Vec2::ZERO);
        assert!(outcome.player_destroyed);
        assert!(outcome.events.contains(&PlayEvent::PlayerDestroyed));
        assert!(!outcome.events.iter().any(|e| matches!(e, PlayEvent::Healed { .. })));
        assert_eq!(state.player.health.current(), 0);
        // The heal was never picked up
        assert_eq!(state.powerups.len(), 1);
    }

    #[test]
    fn test_heal_pickup_restores_health() {
        let (mut state, mut rng, mut particles) = setup(4);
        state.player.health.take_damage(60);
        let pos = state.player.pos;
        state.add_powerup(&PowerUpSpawn {
            kind: PowerUpKind::Heal50,
            pos,
            vel: Vec2::ZERO,
        });

        let outcome = run(&mut state, &mut rng, &mut particles, Vec2::ZERO);
        assert!(outcome.events.contains(&PlayEvent::Healed { amount: 50 }));
        assert_eq!(state.player.health.current(), 90);
        assert!(state.powerups.is_empty());
    }

    #[test]
    fn test_boom_pickup_clears_nearby_rocks() {
        let (mut state, mut rng, mut particles) = setup(5);
        let pos = state.player.pos;
        // Make the player untouchable so the rocks only matter to the boom
        state.player.health.take_damage(0);
        state.add_asteroid(&parked_asteroid(pos + Vec2::new(100.0, 0.0), 5));
        state.add_asteroid(&parked_asteroid(pos + Vec2::new(-50.0, 50.0), 5));
        state.add_powerup(&PowerUpSpawn {
            kind: PowerUpKind::Boom,
            pos,
            vel: Vec2::ZERO,
        });

        let outcome = run(&mut state, &mut rng, &mut particles, Vec2::ZERO);
        assert!(outcome.events.contains(&PlayEvent::BoomDetonated { destroyed: 2 }));
        assert!(state.asteroids.iter().all(|a| a.pos.distance(pos) > 200.0));
        assert!(state.flash.is_active());
        assert!(state.score >= (2 * BOOM_BONUS_PER_ASTEROID) as f64);
    }

    #[test]
    fn test_determinism() {
        let (mut a, mut rng_a, mut pa) = setup(99);
        let (mut b, mut rng_b, mut pb) = setup(99);
        let steer = [Vec2::X, Vec2::new(0.0, -1.0), Vec2::ZERO, Vec2::new(-0.7, 0.7)];
        for i in 0..600 {
            let dir = steer[(i / 60) % steer.len()];
            run(&mut a, &mut rng_a, &mut pa, dir);
            run(&mut b, &mut rng_b, &mut pb, dir);
        }
        assert_eq!(a.asteroids, b.asteroids);
        assert_eq!(a.player, b.player);
        assert_eq!(a.score, b.score);
        assert_eq!(pa.len(), pb.len());
    }
}
