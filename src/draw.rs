//! Per-frame draw snapshot
//!
//! The renderer is external. Each frame the controller flattens everything
//! visible into a back-to-front list of items plus the scalar status the HUD
//! needs; nothing here is ever read back by the simulation.

use glam::Vec2;

use crate::Rgba;
use crate::assets::{AssetProvider, Handle, ImageKey};
use crate::consts::PLAYER_SIZE;
use crate::flow::FlowState;
use crate::sim::particles::ParticleSystem;
use crate::sim::stars::StarField;
use crate::sim::state::PlayState;

/// What to put on screen for one item
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Visual {
    /// Sprite scaled to `size` pixels across
    Image { handle: Handle, size: f32 },
    /// Filled circle (particles, stars)
    Circle { radius: f32, color: Rgba },
    /// Whole-screen overlay
    Fill { color: Rgba },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    /// Center of the item in screen pixels
    pub pos: Vec2,
    pub visual: Visual,
    /// Degrees, 0 = unrotated
    pub rotation: f32,
    pub alpha: u8,
}

/// One row of a menu
#[derive(Debug, Clone, PartialEq)]
pub struct MenuEntry {
    pub label: String,
    /// Current value for settings rows ("On", "60%", ...)
    pub value: Option<String>,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MenuHud {
    pub title: &'static str,
    pub entries: Vec<MenuEntry>,
    pub selected: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameOverHud {
    pub final_score: u64,
    pub time_alive: f32,
    /// Ready for the "press any key" prompt
    pub ready: bool,
    pub rank: Option<usize>,
    pub session_best: Option<u64>,
}

/// Scalar status for the renderer to lay out
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub state: FlowState,
    pub score: u64,
    pub health: u32,
    pub max_health: u32,
    pub difficulty: &'static str,
    /// Countdown number and its pop-in scale
    pub countdown: Option<(u32, f32)>,
    pub menu: Option<MenuHud>,
    pub game_over: Option<GameOverHud>,
    /// Black transition overlay (0 - 255)
    pub fade_alpha: u8,
}

impl Hud {
    pub fn new(state: FlowState, difficulty: &'static str) -> Self {
        Self {
            state,
            score: 0,
            health: 0,
            max_health: 0,
            difficulty,
            countdown: None,
            menu: None,
            game_over: None,
            fade_alpha: 0,
        }
    }
}

/// Everything to draw this frame, back to front
#[derive(Debug, Clone, PartialEq)]
pub struct DrawList {
    pub items: Vec<DrawItem>,
    pub hud: Hud,
}

impl DrawList {
    pub fn new(hud: Hud) -> Self {
        Self {
            items: Vec::new(),
            hud,
        }
    }

    pub fn push_image(&mut self, handle: Handle, pos: Vec2, size: f32, rotation: f32, alpha: u8) {
        self.items.push(DrawItem {
            pos,
            visual: Visual::Image { handle, size },
            rotation,
            alpha,
        });
    }

    pub fn push_circle(&mut self, pos: Vec2, radius: f32, color: Rgba) {
        self.items.push(DrawItem {
            pos,
            visual: Visual::Circle { radius, color },
            rotation: 0.0,
            alpha: color.a,
        });
    }

    pub fn push_fill(&mut self, color: Rgba, alpha: u8) {
        if alpha == 0 {
            return;
        }
        self.items.push(DrawItem {
            pos: Vec2::ZERO,
            visual: Visual::Fill { color },
            rotation: 0.0,
            alpha,
        });
    }

    /// Background stars at the user's opacity
    pub fn push_stars(&mut self, stars: &StarField, opacity: u8) {
        let alpha = StarField::alpha_for_opacity(opacity);
        if alpha == 0 {
            return;
        }
        for star in stars.stars() {
            self.push_circle(star.pos, star.size, star.color.with_alpha(alpha));
        }
    }

    pub fn push_particles(&mut self, particles: &ParticleSystem) {
        for p in particles.iter() {
            let color = p.render_color();
            if color.a > 0 {
                self.push_circle(p.pos, p.size, color);
            }
        }
    }

    /// Hazards, pickups, and (while alive) the player
    pub fn push_play_state(&mut self, state: &PlayState, assets: &dyn AssetProvider, show_player: bool) {
        for powerup in &state.powerups {
            let handle = assets.resolve(ImageKey::PowerUp(powerup.kind));
            self.push_image(handle, powerup.pos, powerup.size, 0.0, 255);
        }
        for asteroid in &state.asteroids {
            let handle = assets.resolve(ImageKey::Asteroid(asteroid.class));
            self.push_image(handle, asteroid.pos, asteroid.diameter, asteroid.rotation, 255);
        }
        if show_player {
            let player = &state.player;
            let handle = assets.resolve(ImageKey::Player);
            self.push_image(
                handle,
                player.pos,
                PLAYER_SIZE,
                player.rotation,
                player.health.render_alpha(),
            );
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Count of items using a given image
    pub fn count_images(&self, handle: Handle) -> usize {
        self.items
            .iter()
            .filter(|item| matches!(item.visual, Visual::Image { handle: h, .. } if h == handle))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetTable;
    use crate::sim::difficulty::Difficulty;
    use crate::sim::particles::Emission;
    use crate::Viewport;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_zero_opacity_hides_stars() {
        let mut rng = Pcg32::seed_from_u64(3);
        let stars = StarField::with_count(10, &Viewport::default(), &mut rng);
        let mut list = DrawList::new(Hud::new(FlowState::Menu, "Normal Space"));
        list.push_stars(&stars, 0);
        assert!(list.is_empty());
        list.push_stars(&stars, 100);
        assert_eq!(list.len(), 10);
        assert!(list.items.iter().all(|item| item.alpha == 255));
    }

    #[test]
    fn test_missing_images_still_draw() {
        let mut rng = Pcg32::seed_from_u64(3);
        let viewport = Viewport::default();
        let mut state = PlayState::new(Difficulty::NormalSpace, &viewport, &mut rng);
        let spawn = state.spawner.spawn_asteroid(&viewport, &mut rng);
        state.add_asteroid(&spawn);

        let mut list = DrawList::new(Hud::new(FlowState::Playing, "Normal Space"));
        list.push_play_state(&state, &AssetTable::new(), true);
        assert_eq!(list.count_images(Handle::PLACEHOLDER), 2);
    }

    #[test]
    fn test_particles_and_fill() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut particles = ParticleSystem::new(16);
        particles.emit(&mut rng, &Emission::at(Vec2::ZERO, &[Rgba::WHITE]).count(4));

        let mut list = DrawList::new(Hud::new(FlowState::Playing, "Normal Space"));
        list.push_particles(&particles);
        list.push_fill(Rgba::WHITE, 0);
        assert_eq!(list.len(), 4);
        list.push_fill(Rgba::WHITE, 90);
        assert!(matches!(list.items.last().map(|i| i.visual), Some(Visual::Fill { .. })));
    }
}
