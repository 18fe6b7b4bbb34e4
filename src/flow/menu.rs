//! Main menu, settings sub-menu, and the menu backdrop

use glam::Vec2;
use rand::Rng;

use crate::draw::MenuEntry;
use crate::input::{FrameInput, MenuNav};
use crate::settings::{STAR_OPACITY_STEP, Settings};
use crate::sim::difficulty::AsteroidClass;
use crate::sim::emitters::{FIRE_COLORS, heading_degrees};
use crate::sim::particles::{Emission, ParticleSystem, Span};
use crate::{Viewport, direction_from_angle, uniform};

/// What a menu wants done after handling input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Selection moved
    Moved,
    /// A setting changed value
    Changed,
    StartGame,
    OpenSettings,
    Back,
}

/// Move `selected` one step, wrapping and skipping disabled rows
fn step_selection(selected: usize, forward: bool, enabled: &[bool]) -> usize {
    let n = enabled.len();
    let mut i = selected;
    for _ in 0..n {
        i = if forward { (i + 1) % n } else { (i + n - 1) % n };
        if enabled[i] {
            return i;
        }
    }
    selected
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainMenuItem {
    FreeEscape,
    Story,
    Settings,
}

impl MainMenuItem {
    pub const ALL: [MainMenuItem; 3] = [
        MainMenuItem::FreeEscape,
        MainMenuItem::Story,
        MainMenuItem::Settings,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MainMenuItem::FreeEscape => "Free Escape",
            MainMenuItem::Story => "Story",
            MainMenuItem::Settings => "Settings",
        }
    }

    /// Story mode is listed but not playable
    pub fn is_enabled(self) -> bool {
        !matches!(self, MainMenuItem::Story)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MainMenu {
    selected: usize,
}

impl MainMenu {
    pub fn selected(&self) -> MainMenuItem {
        MainMenuItem::ALL[self.selected]
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn handle(&mut self, input: &FrameInput) -> Option<MenuAction> {
        if input.confirm {
            return match self.selected() {
                MainMenuItem::FreeEscape => Some(MenuAction::StartGame),
                MainMenuItem::Settings => Some(MenuAction::OpenSettings),
                MainMenuItem::Story => None,
            };
        }
        let forward = match input.nav? {
            MenuNav::Down => true,
            MenuNav::Up => false,
            MenuNav::Left | MenuNav::Right => return None,
        };
        let enabled = MainMenuItem::ALL.map(MainMenuItem::is_enabled);
        self.selected = step_selection(self.selected, forward, &enabled);
        Some(MenuAction::Moved)
    }

    pub fn entries(&self) -> Vec<MenuEntry> {
        MainMenuItem::ALL
            .iter()
            .map(|item| MenuEntry {
                label: item.label().to_string(),
                value: None,
                enabled: item.is_enabled(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsItem {
    Sound,
    StarOpacity,
    Difficulty,
    Back,
}

impl SettingsItem {
    pub const ALL: [SettingsItem; 4] = [
        SettingsItem::Sound,
        SettingsItem::StarOpacity,
        SettingsItem::Difficulty,
        SettingsItem::Back,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SettingsItem::Sound => "Sound",
            SettingsItem::StarOpacity => "Star Opacity",
            SettingsItem::Difficulty => "Difficulty",
            SettingsItem::Back => "Back to Main Menu",
        }
    }

    fn value(self, settings: &Settings) -> Option<String> {
        match self {
            SettingsItem::Sound => Some(if settings.sound_enabled { "On" } else { "Off" }.to_string()),
            SettingsItem::StarOpacity => Some(format!("{}%", settings.star_opacity)),
            SettingsItem::Difficulty => Some(settings.difficulty.label().to_string()),
            SettingsItem::Back => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SettingsMenu {
    selected: usize,
}

impl SettingsMenu {
    pub fn selected(&self) -> SettingsItem {
        SettingsItem::ALL[self.selected]
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn reset(&mut self) {
        self.selected = 0;
    }

    /// Apply one frame of input to `settings`
    pub fn handle(&mut self, input: &FrameInput, settings: &mut Settings) -> Option<MenuAction> {
        if input.back {
            return Some(MenuAction::Back);
        }
        let item = self.selected();
        if input.confirm {
            return match item {
                SettingsItem::Back => Some(MenuAction::Back),
                SettingsItem::Sound => {
                    settings.toggle_sound();
                    Some(MenuAction::Changed)
                }
                SettingsItem::StarOpacity => {
                    // Advancing past full opacity wraps to zero
                    if !settings.adjust_star_opacity(STAR_OPACITY_STEP) {
                        settings.star_opacity = 0;
                    }
                    Some(MenuAction::Changed)
                }
                SettingsItem::Difficulty => {
                    settings.cycle_difficulty(true);
                    Some(MenuAction::Changed)
                }
            };
        }

        match input.nav? {
            MenuNav::Up | MenuNav::Down => {
                let forward = input.nav == Some(MenuNav::Down);
                self.selected = step_selection(self.selected, forward, &[true; 4]);
                Some(MenuAction::Moved)
            }
            MenuNav::Left | MenuNav::Right => {
                let forward = input.nav == Some(MenuNav::Right);
                let changed = match item {
                    SettingsItem::Sound => {
                        settings.toggle_sound();
                        true
                    }
                    SettingsItem::StarOpacity => {
                        let step = if forward { STAR_OPACITY_STEP } else { -STAR_OPACITY_STEP };
                        settings.adjust_star_opacity(step)
                    }
                    SettingsItem::Difficulty => {
                        settings.cycle_difficulty(forward);
                        true
                    }
                    SettingsItem::Back => false,
                };
                changed.then_some(MenuAction::Changed)
            }
        }
    }

    pub fn entries(&self, settings: &Settings) -> Vec<MenuEntry> {
        SettingsItem::ALL
            .iter()
            .map(|item| MenuEntry {
                label: item.label().to_string(),
                value: item.value(settings),
                enabled: true,
            })
            .collect()
    }
}

const DECOR_ASTEROIDS: usize = 10;
const SHIP_ORBIT_RADIUS: f32 = 150.0;
const SHIP_ORBIT_SPEED: f32 = 0.5;
const TITLE_ALPHA_MIN: f32 = 100.0;
const TITLE_ALPHA_MAX: f32 = 255.0;
const TITLE_PULSE_SPEED: f32 = 200.0;
const FIRE_CHANCE_PER_FRAME: f32 = 0.2;
const FIRE_COOLDOWN: f32 = 0.2;

/// Slow drifting asteroid behind the menu
#[derive(Debug, Clone, PartialEq)]
pub struct DecorAsteroid {
    pub class: AsteroidClass,
    pub pos: Vec2,
    pub vel: Vec2,
    pub diameter: f32,
    /// Degrees
    pub rotation: f32,
    /// Degrees per second
    pub spin: f32,
    fire_cooldown: f32,
}

impl DecorAsteroid {
    fn random<R: Rng + ?Sized>(viewport: &Viewport, rng: &mut R) -> Self {
        let class = AsteroidClass::from_index(rng.random_range(0..4));
        let angle = uniform(rng, 0.0, std::f32::consts::TAU);
        Self {
            class,
            pos: Vec2::new(
                uniform(rng, 0.0, viewport.width),
                uniform(rng, 0.0, viewport.height),
            ),
            vel: direction_from_angle(angle) * uniform(rng, 20.0, 60.0),
            diameter: uniform(rng, 35.0, 55.0),
            rotation: uniform(rng, 0.0, 360.0),
            spin: uniform(rng, -30.0, 30.0),
            fire_cooldown: 0.0,
        }
    }

    fn wrap(&mut self, viewport: &Viewport) {
        let d = self.diameter;
        if self.pos.x < -d {
            self.pos.x = viewport.width + d;
        } else if self.pos.x > viewport.width + d {
            self.pos.x = -d;
        }
        if self.pos.y < -d {
            self.pos.y = viewport.height + d;
        } else if self.pos.y > viewport.height + d {
            self.pos.y = -d;
        }
    }
}

/// Everything animated behind the menus
#[derive(Debug, Clone)]
pub struct MenuDecor {
    pub asteroids: Vec<DecorAsteroid>,
    /// Orbit angle of the ship (radians)
    ship_angle: f32,
    title_alpha: f32,
    title_rising: bool,
}

impl MenuDecor {
    pub fn new<R: Rng + ?Sized>(viewport: &Viewport, rng: &mut R) -> Self {
        Self {
            asteroids: (0..DECOR_ASTEROIDS)
                .map(|_| DecorAsteroid::random(viewport, rng))
                .collect(),
            ship_angle: 0.0,
            title_alpha: TITLE_ALPHA_MAX,
            title_rising: false,
        }
    }

    /// Ship position on its orbit and its facing (toward the center)
    pub fn ship(&self, viewport: &Viewport) -> (Vec2, f32) {
        let center = viewport.center();
        let pos = center + direction_from_angle(self.ship_angle) * SHIP_ORBIT_RADIUS;
        (pos, heading_degrees(center - pos))
    }

    pub fn title_alpha(&self) -> u8 {
        self.title_alpha.clamp(0.0, 255.0) as u8
    }

    pub fn update<R: Rng + ?Sized>(
        &mut self,
        dt: f32,
        viewport: &Viewport,
        particles: &mut ParticleSystem,
        rng: &mut R,
    ) {
        for asteroid in &mut self.asteroids {
            asteroid.pos += asteroid.vel * dt;
            asteroid.rotation = (asteroid.rotation + asteroid.spin * dt).rem_euclid(360.0);
            asteroid.wrap(viewport);

            asteroid.fire_cooldown = (asteroid.fire_cooldown - dt).max(0.0);
            if asteroid.class.index() < 2 || asteroid.fire_cooldown > 0.0 {
                continue;
            }
            // Chance is tuned per 60 fps frame
            if rng.random::<f32>() < FIRE_CHANCE_PER_FRAME * dt * 60.0 {
                shed_fire(particles, rng, asteroid);
                asteroid.fire_cooldown = FIRE_COOLDOWN;
            }
        }

        self.ship_angle = (self.ship_angle + SHIP_ORBIT_SPEED * dt).rem_euclid(std::f32::consts::TAU);

        if self.title_rising {
            self.title_alpha += TITLE_PULSE_SPEED * dt;
            if self.title_alpha >= TITLE_ALPHA_MAX {
                self.title_alpha = TITLE_ALPHA_MAX;
                self.title_rising = false;
            }
        } else {
            self.title_alpha -= TITLE_PULSE_SPEED * dt;
            if self.title_alpha <= TITLE_ALPHA_MIN {
                self.title_alpha = TITLE_ALPHA_MIN;
                self.title_rising = true;
            }
        }
    }
}

fn shed_fire<R: Rng + ?Sized>(particles: &mut ParticleSystem, rng: &mut R, asteroid: &DecorAsteroid) {
    let offset = direction_from_angle(uniform(rng, 0.0, std::f32::consts::TAU)) * asteroid.diameter * 0.4;
    let drift = offset * 0.5;
    particles.emit(
        rng,
        &Emission::at(asteroid.pos + offset, &FIRE_COLORS)
            .count(2)
            .velocity(
                Span::new(drift.x - 5.0, drift.x + 5.0),
                Span::new(drift.y - 5.0, drift.y + 5.0),
            )
            .size(Span::new(2.0, 4.0))
            .lifetime(Span::new(0.3, 0.7)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::difficulty::Difficulty;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_main_menu_skips_story() {
        let mut menu = MainMenu::default();
        assert_eq!(menu.selected(), MainMenuItem::FreeEscape);
        menu.handle(&FrameInput::navigate(MenuNav::Down));
        assert_eq!(menu.selected(), MainMenuItem::Settings);
        menu.handle(&FrameInput::navigate(MenuNav::Down));
        assert_eq!(menu.selected(), MainMenuItem::FreeEscape);
        menu.handle(&FrameInput::navigate(MenuNav::Up));
        assert_eq!(menu.selected(), MainMenuItem::Settings);
        assert_eq!(menu.handle(&FrameInput::confirm()), Some(MenuAction::OpenSettings));
    }

    #[test]
    fn test_main_menu_ignores_plain_keys() {
        let mut menu = MainMenu::default();
        assert_eq!(menu.handle(&FrameInput::any_key()), None);
        assert_eq!(menu.handle(&FrameInput::confirm()), Some(MenuAction::StartGame));
    }

    #[test]
    fn test_settings_menu_adjusts_values() {
        let mut menu = SettingsMenu::default();
        let mut settings = Settings::default();

        assert_eq!(
            menu.handle(&FrameInput::navigate(MenuNav::Left), &mut settings),
            Some(MenuAction::Changed)
        );
        assert!(!settings.sound_enabled);

        menu.handle(&FrameInput::navigate(MenuNav::Down), &mut settings);
        assert_eq!(menu.selected(), SettingsItem::StarOpacity);
        menu.handle(&FrameInput::navigate(MenuNav::Right), &mut settings);
        assert_eq!(settings.star_opacity, 70);

        menu.handle(&FrameInput::navigate(MenuNav::Down), &mut settings);
        menu.handle(&FrameInput::navigate(MenuNav::Left), &mut settings);
        assert_eq!(settings.difficulty, Difficulty::LightDrift);
        menu.handle(&FrameInput::confirm(), &mut settings);
        assert_eq!(settings.difficulty, Difficulty::NormalSpace);

        menu.handle(&FrameInput::navigate(MenuNav::Down), &mut settings);
        assert_eq!(menu.handle(&FrameInput::confirm(), &mut settings), Some(MenuAction::Back));
        assert_eq!(menu.handle(&FrameInput::back(), &mut settings), Some(MenuAction::Back));
    }

    #[test]
    fn test_opacity_at_limit_is_unchanged() {
        let mut menu = SettingsMenu::default();
        let mut settings = Settings {
            star_opacity: 100,
            ..Default::default()
        };
        menu.handle(&FrameInput::navigate(MenuNav::Down), &mut settings);
        assert_eq!(menu.handle(&FrameInput::navigate(MenuNav::Right), &mut settings), None);
        let entries = menu.entries(&settings);
        assert_eq!(entries[1].value.as_deref(), Some("100%"));
    }

    #[test]
    fn test_decor_ship_faces_center() {
        let mut rng = Pcg32::seed_from_u64(5);
        let viewport = Viewport::default();
        let mut decor = MenuDecor::new(&viewport, &mut rng);
        let mut particles = ParticleSystem::default();
        for _ in 0..120 {
            decor.update(1.0 / 60.0, &viewport, &mut particles, &mut rng);
        }
        let (pos, rotation) = decor.ship(&viewport);
        assert!((pos.distance(viewport.center()) - SHIP_ORBIT_RADIUS).abs() < 1e-3);
        assert!((rotation - heading_degrees(viewport.center() - pos)).abs() < 1e-4);
        assert_eq!(decor.asteroids.len(), DECOR_ASTEROIDS);
        assert!(decor.asteroids.iter().all(|a| a.class.index() < 4));
    }

    #[test]
    fn test_title_pulses_between_bounds() {
        let mut rng = Pcg32::seed_from_u64(5);
        let viewport = Viewport::default();
        let mut decor = MenuDecor::new(&viewport, &mut rng);
        let mut particles = ParticleSystem::default();
        let mut seen_min = u8::MAX;
        for _ in 0..300 {
            decor.update(1.0 / 60.0, &viewport, &mut particles, &mut rng);
            seen_min = seen_min.min(decor.title_alpha());
        }
        assert_eq!(seen_min, 100);
    }
}
