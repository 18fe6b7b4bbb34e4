//! Game flow state machine
//!
//! Exactly one screen is active at a time. The host calls `update` once per
//! frame with the elapsed time and an input snapshot, then drains audio
//! commands and asks for a draw list. No screen ever blocks waiting for
//! input; each simply checks this frame's edges.

pub mod countdown;
pub mod fade;
pub mod game_over;
pub mod menu;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::assets::{AssetProvider, ImageKey};
use crate::audio::{AudioCommand, AudioMixer, MusicTrack, SoundCue};
use crate::consts::{MAX_FRAME_DT, PLAYER_SIZE};
use crate::draw::{DrawList, GameOverHud, Hud, MenuHud};
use crate::error::FlowError;
use crate::highscores::SessionScores;
use crate::input::FrameInput;
use crate::settings::Settings;
use crate::sim::emitters;
use crate::sim::particles::ParticleSystem;
use crate::sim::stars::StarField;
use crate::sim::state::PlayState;
use crate::sim::tick::{PlayEvent, TickContext, tick};
use crate::{Rgba, Viewport};

pub use countdown::Countdown;
pub use fade::Fade;
pub use game_over::GameOverScreen;
pub use menu::{MainMenu, MenuAction, MenuDecor, SettingsMenu};

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowState {
    Menu,
    Settings,
    Countdown,
    Playing,
    GameOver,
}

impl FlowState {
    /// Whether `self -> to` is one of the allowed edges
    pub fn can_transition_to(self, to: FlowState) -> bool {
        use FlowState::*;
        matches!(
            (self, to),
            (Menu, Settings)
                | (Settings, Menu)
                | (Menu, Countdown)
                | (Countdown, Playing)
                | (Playing, GameOver)
                | (GameOver, Menu)
        )
    }

    /// Menu <-> Settings swaps without a fade
    fn is_instant(self, to: FlowState) -> bool {
        matches!(
            (self, to),
            (FlowState::Menu, FlowState::Settings) | (FlowState::Settings, FlowState::Menu)
        )
    }
}

/// Owns every screen and the resources they share
pub struct GameFlowController {
    state: FlowState,
    rng: Pcg32,
    viewport: Viewport,
    settings: Settings,
    settings_dirty: bool,
    particles: ParticleSystem,
    stars: StarField,
    fade: Fade,
    audio: AudioMixer,
    scores: SessionScores,
    main_menu: MainMenu,
    settings_menu: SettingsMenu,
    decor: MenuDecor,
    countdown: Countdown,
    play: Option<PlayState>,
    game_over: Option<GameOverScreen>,
}

impl GameFlowController {
    pub fn new(seed: u64, settings: Settings) -> Self {
        Self::with_viewport(seed, settings, Viewport::default())
    }

    pub fn with_viewport(seed: u64, settings: Settings, viewport: Viewport) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = StarField::new(&viewport, &mut rng);
        let decor = MenuDecor::new(&viewport, &mut rng);
        let mut audio = AudioMixer::new();
        audio.set_muted(!settings.sound_enabled);
        audio.start_music(MusicTrack::Menu);

        log::info!("Flow controller started (seed {})", seed);
        Self {
            state: FlowState::Menu,
            rng,
            viewport,
            settings,
            settings_dirty: false,
            particles: ParticleSystem::default(),
            stars,
            fade: Fade::default(),
            audio,
            scores: SessionScores::new(),
            main_menu: MainMenu::default(),
            settings_menu: SettingsMenu::default(),
            decor,
            countdown: Countdown::default(),
            play: None,
            game_over: None,
        }
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Target of the transition in progress, if any
    pub fn pending_transition(&self) -> Option<FlowState> {
        self.fade.pending()
    }

    pub fn can_transition_to(&self, to: FlowState) -> bool {
        !self.fade.is_fading_out() && self.state.can_transition_to(to)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Replace the settings (e.g. after the host reloads them). Difficulty
    /// takes effect at the next episode.
    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
        self.audio.set_muted(!settings.sound_enabled);
    }

    /// True once after the settings menu changed something worth saving
    pub fn take_settings_dirty(&mut self) -> bool {
        std::mem::take(&mut self.settings_dirty)
    }

    pub fn play_state(&self) -> Option<&PlayState> {
        self.play.as_ref()
    }

    pub fn play_state_mut(&mut self) -> Option<&mut PlayState> {
        self.play.as_mut()
    }

    pub fn game_over_screen(&self) -> Option<&GameOverScreen> {
        self.game_over.as_ref()
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn session_scores(&self) -> &SessionScores {
        &self.scores
    }

    pub fn particles(&self) -> &ParticleSystem {
        &self.particles
    }

    pub fn audio(&self) -> &AudioMixer {
        &self.audio
    }

    /// Audio commands queued since the last call
    pub fn drain_audio(&mut self) -> Vec<AudioCommand> {
        self.audio.drain()
    }

    /// Ask to move to `target`.
    ///
    /// Menu <-> Settings switches immediately; every other edge starts a
    /// fade-out and switches once the screen is covered. Illegal edges and
    /// requests made while a fade-out is running are rejected unchanged.
    pub fn request(&mut self, target: FlowState) -> Result<(), FlowError> {
        if let Some(pending) = self.fade.pending() {
            log::debug!("Rejected {:?}: already heading to {:?}", target, pending);
            return Err(FlowError::TransitionInProgress(pending));
        }
        if !self.state.can_transition_to(target) {
            log::debug!("Rejected transition {:?} -> {:?}", self.state, target);
            return Err(FlowError::IllegalTransition {
                from: self.state,
                to: target,
            });
        }

        if self.state.is_instant(target) {
            self.enter(target);
            return Ok(());
        }

        match (self.state, target) {
            (FlowState::Menu, FlowState::Countdown) => {
                emitters::start_burst(&mut self.particles, &mut self.rng, self.viewport.center());
                self.audio.crossfade_to(MusicTrack::Gameplay);
                self.play = None;
            }
            (FlowState::Playing, FlowState::GameOver) => {
                self.audio.play(SoundCue::GameOver);
                self.audio.crossfade_to(MusicTrack::GameOver);
            }
            (FlowState::GameOver, FlowState::Menu) => {
                self.audio.crossfade_to(MusicTrack::Menu);
            }
            _ => {}
        }
        log::debug!("Fading {:?} -> {:?}", self.state, target);
        self.fade.start_out(target);
        Ok(())
    }

    /// Switch screens now and set up the new one
    fn enter(&mut self, target: FlowState) {
        log::info!("{:?} -> {:?}", self.state, target);
        let from = self.state;
        self.state = target;

        match target {
            FlowState::Menu => {
                self.game_over = None;
                if from == FlowState::GameOver {
                    self.play = None;
                }
            }
            FlowState::Settings => self.settings_menu.reset(),
            FlowState::Countdown => {
                self.countdown = Countdown::default();
                self.audio.play(SoundCue::CountdownTick);
            }
            FlowState::Playing => {
                // Difficulty is read fresh for every episode
                self.play = Some(PlayState::new(
                    self.settings.difficulty,
                    &self.viewport,
                    &mut self.rng,
                ));
            }
            FlowState::GameOver => {
                let (score, time_alive, label) = match &self.play {
                    Some(play) => (play.display_score(), play.time_alive, play.difficulty.label()),
                    None => (0, 0.0, self.settings.difficulty.label()),
                };
                let rank = self.scores.record(score, time_alive, label);
                log::info!("Game over: {} points after {:.1}s", score, time_alive);
                self.game_over = Some(GameOverScreen::new(score, time_alive, rank, self.scores.best()));
            }
        }
    }

    /// Advance one frame
    pub fn update(&mut self, dt: f32, input: &FrameInput) {
        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 };

        self.audio.update(dt);
        self.stars.update(dt, &self.viewport, &mut self.rng);

        if let Some(target) = self.fade.update(dt) {
            self.enter(target);
            self.fade.start_in();
        }
        // Input is ignored and Playing is frozen while the screen covers
        let frozen = self.fade.is_fading_out();

        if self.state != FlowState::Playing || frozen {
            self.particles.update(dt);
        }

        match self.state {
            FlowState::Menu => {
                self.decor.update(dt, &self.viewport, &mut self.particles, &mut self.rng);
                if !frozen {
                    self.update_main_menu(input);
                }
            }
            FlowState::Settings => {
                self.decor.update(dt, &self.viewport, &mut self.particles, &mut self.rng);
                if !frozen {
                    self.update_settings_menu(input);
                }
            }
            FlowState::Countdown => {
                if !frozen {
                    self.update_countdown(dt, input);
                }
            }
            FlowState::Playing => {
                if !frozen {
                    self.update_playing(dt, input);
                }
            }
            FlowState::GameOver => self.update_game_over(dt, input, frozen),
        }
    }

    fn update_main_menu(&mut self, input: &FrameInput) {
        let Some(action) = self.main_menu.handle(input) else {
            return;
        };
        match action {
            MenuAction::Moved => self.audio.play(SoundCue::MenuMove),
            MenuAction::StartGame => {
                self.audio.play(SoundCue::MenuSelect);
                self.request_or_warn(FlowState::Countdown);
            }
            MenuAction::OpenSettings => {
                self.audio.play(SoundCue::MenuSelect);
                self.request_or_warn(FlowState::Settings);
            }
            MenuAction::Changed | MenuAction::Back => {}
        }
    }

    fn update_settings_menu(&mut self, input: &FrameInput) {
        let Some(action) = self.settings_menu.handle(input, &mut self.settings) else {
            return;
        };
        match action {
            MenuAction::Moved => self.audio.play(SoundCue::MenuMove),
            MenuAction::Changed => {
                self.settings_dirty = true;
                self.audio.set_muted(!self.settings.sound_enabled);
                self.audio.play(SoundCue::MenuMove);
            }
            MenuAction::Back => {
                self.audio.play(SoundCue::MenuSelect);
                self.request_or_warn(FlowState::Menu);
            }
            MenuAction::StartGame | MenuAction::OpenSettings => {}
        }
    }

    fn update_countdown(&mut self, dt: f32, input: &FrameInput) {
        if input.skip {
            log::debug!("Countdown skipped");
            self.countdown.skip();
            self.enter(FlowState::Playing);
            return;
        }
        if self.countdown.update(dt).is_some() {
            self.audio.play(SoundCue::CountdownTick);
        }
        if self.countdown.is_finished() {
            self.request_or_warn(FlowState::Playing);
        }
    }

    fn update_playing(&mut self, dt: f32, input: &FrameInput) {
        let Some(play) = self.play.as_mut() else {
            log::error!("Playing without an episode, skipping frame");
            return;
        };
        let mut ctx = TickContext {
            rng: &mut self.rng,
            particles: &mut self.particles,
            viewport: self.viewport,
        };
        let outcome = tick(play, &mut ctx, input.direction(), dt);

        for event in &outcome.events {
            match *event {
                PlayEvent::PlayerHit { .. } => self.audio.play(SoundCue::PlayerHit),
                PlayEvent::PowerUpCollected(_) => self.audio.play(SoundCue::PowerUpPickup),
                PlayEvent::BoomDetonated { destroyed } => {
                    self.audio.play(SoundCue::ExplosionMain);
                    self.audio.play_chain(SoundCue::AsteroidDestroyed, destroyed);
                }
                PlayEvent::Healed { .. } | PlayEvent::PlayerDestroyed => {}
            }
        }
        if outcome.player_destroyed {
            self.request_or_warn(FlowState::GameOver);
        }
    }

    fn update_game_over(&mut self, dt: f32, input: &FrameInput, frozen: bool) {
        let Some(screen) = self.game_over.as_mut() else {
            return;
        };
        screen.update(dt);
        if !frozen && screen.accepts(input) {
            self.audio.play(SoundCue::MenuSelect);
            self.request_or_warn(FlowState::Menu);
        }
    }

    fn request_or_warn(&mut self, target: FlowState) {
        if let Err(e) = self.request(target) {
            log::warn!("{}", e);
        }
    }

    /// Snapshot of everything to draw this frame
    pub fn draw_list(&self, assets: &dyn AssetProvider) -> DrawList {
        let mut list = DrawList::new(self.hud());
        list.push_stars(&self.stars, self.settings.star_opacity);

        match self.state {
            FlowState::Menu | FlowState::Settings => {
                for asteroid in &self.decor.asteroids {
                    let handle = assets.resolve(ImageKey::Asteroid(asteroid.class));
                    list.push_image(handle, asteroid.pos, asteroid.diameter, asteroid.rotation, 255);
                }
                let (ship_pos, ship_rotation) = self.decor.ship(&self.viewport);
                list.push_image(assets.resolve(ImageKey::Player), ship_pos, PLAYER_SIZE, ship_rotation, 255);
                list.push_particles(&self.particles);
                let logo_pos = Vec2::new(self.viewport.center().x, self.viewport.height * 0.2);
                list.push_image(
                    assets.resolve(ImageKey::Logo),
                    logo_pos,
                    self.viewport.width * 0.5,
                    0.0,
                    self.decor.title_alpha(),
                );
            }
            FlowState::Countdown => list.push_particles(&self.particles),
            FlowState::Playing | FlowState::GameOver => {
                list.push_particles(&self.particles);
                if let Some(play) = &self.play {
                    list.push_play_state(play, assets, self.state == FlowState::Playing);
                    list.push_fill(play.flash.color, play.flash.alpha());
                }
            }
        }
        list.push_fill(Rgba::BLACK, self.fade.alpha());
        list
    }

    fn hud(&self) -> Hud {
        let difficulty = match &self.play {
            Some(play) => play.difficulty.label(),
            None => self.settings.difficulty.label(),
        };
        let mut hud = Hud::new(self.state, difficulty);
        hud.fade_alpha = self.fade.alpha();
        if let Some(play) = &self.play {
            hud.score = play.display_score();
            hud.health = play.player.health.current();
            hud.max_health = play.player.health.max();
        }

        match self.state {
            FlowState::Menu => {
                hud.menu = Some(MenuHud {
                    title: "Final Escape",
                    entries: self.main_menu.entries(),
                    selected: self.main_menu.selected_index(),
                });
            }
            FlowState::Settings => {
                hud.menu = Some(MenuHud {
                    title: "Settings",
                    entries: self.settings_menu.entries(&self.settings),
                    selected: self.settings_menu.selected_index(),
                });
            }
            FlowState::Countdown => {
                hud.countdown = Some((self.countdown.number(), self.countdown.scale()));
            }
            FlowState::Playing => {}
            FlowState::GameOver => {
                hud.game_over = self.game_over.as_ref().map(|screen| GameOverHud {
                    final_score: screen.final_score,
                    time_alive: screen.time_alive,
                    ready: screen.is_ready(),
                    rank: screen.rank,
                    session_best: screen.session_best,
                });
            }
        }
        hud
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetTable;
    use crate::input::MenuNav;

    const DT: f32 = 1.0 / 60.0;

    fn run(flow: &mut GameFlowController, seconds: f32) {
        let frames = (seconds / DT).ceil() as usize;
        for _ in 0..frames {
            flow.update(DT, &FrameInput::default());
        }
    }

    #[test]
    fn test_transition_table() {
        use FlowState::*;
        assert!(Menu.can_transition_to(Countdown));
        assert!(GameOver.can_transition_to(Menu));
        assert!(!GameOver.can_transition_to(Playing));
        assert!(!Settings.can_transition_to(Playing));
        assert!(!Countdown.can_transition_to(Menu));
        assert!(!Menu.can_transition_to(Menu));
    }

    #[test]
    fn test_illegal_request_is_rejected_unchanged() {
        let mut flow = GameFlowController::new(1, Settings::default());
        assert_eq!(
            flow.request(FlowState::Playing),
            Err(FlowError::IllegalTransition {
                from: FlowState::Menu,
                to: FlowState::Playing
            })
        );
        assert_eq!(flow.state(), FlowState::Menu);
        assert!(flow.pending_transition().is_none());
    }

    #[test]
    fn test_settings_switch_is_instant() {
        let mut flow = GameFlowController::new(1, Settings::default());
        flow.update(DT, &FrameInput::navigate(MenuNav::Down));
        flow.update(DT, &FrameInput::confirm());
        assert_eq!(flow.state(), FlowState::Settings);

        // Toggle sound off and come back
        flow.update(DT, &FrameInput::navigate(MenuNav::Right));
        assert!(!flow.settings().sound_enabled);
        assert!(flow.audio().is_muted());
        assert!(flow.take_settings_dirty());
        assert!(!flow.take_settings_dirty());

        flow.update(DT, &FrameInput::back());
        assert_eq!(flow.state(), FlowState::Menu);
    }

    #[test]
    fn test_second_request_during_fade_is_rejected() {
        let mut flow = GameFlowController::new(1, Settings::default());
        flow.request(FlowState::Countdown).unwrap();
        assert_eq!(
            flow.request(FlowState::Settings),
            Err(FlowError::TransitionInProgress(FlowState::Countdown))
        );
        run(&mut flow, 1.05);
        assert_eq!(flow.state(), FlowState::Countdown);
    }

    #[test]
    fn test_input_ignored_while_fading() {
        let mut flow = GameFlowController::new(1, Settings::default());
        flow.request(FlowState::Countdown).unwrap();
        flow.update(DT, &FrameInput::navigate(MenuNav::Down));
        assert_eq!(flow.draw_list(&AssetTable::new()).hud.menu.map(|m| m.selected), Some(0));
    }

    #[test]
    fn test_skip_starts_playing_immediately() {
        let mut flow = GameFlowController::new(1, Settings::default());
        flow.request(FlowState::Countdown).unwrap();
        run(&mut flow, 1.05);
        assert_eq!(flow.state(), FlowState::Countdown);
        flow.update(DT, &FrameInput::skip());
        assert_eq!(flow.state(), FlowState::Playing);
        assert!(flow.play_state().is_some());
    }

    #[test]
    fn test_playing_without_episode_keeps_state() {
        let mut flow = GameFlowController::new(1, Settings::default());
        flow.request(FlowState::Countdown).unwrap();
        run(&mut flow, 1.05);
        flow.update(DT, &FrameInput::skip());
        flow.play = None;

        flow.update(DT, &FrameInput::default());
        assert_eq!(flow.state(), FlowState::Playing);
        assert_eq!(flow.pending_transition(), None);
    }

    #[test]
    fn test_countdown_runs_into_playing() {
        let mut flow = GameFlowController::new(2, Settings::default());
        flow.update(DT, &FrameInput::confirm());
        run(&mut flow, 1.05);
        assert_eq!(flow.state(), FlowState::Countdown);
        run(&mut flow, 3.0);
        assert_eq!(flow.pending_transition(), Some(FlowState::Playing));
        run(&mut flow, 1.05);
        assert_eq!(flow.state(), FlowState::Playing);
    }

    #[test]
    fn test_episode_uses_current_difficulty() {
        let settings = Settings {
            difficulty: crate::sim::Difficulty::DeadlyStorm,
            ..Default::default()
        };
        let mut flow = GameFlowController::new(3, settings);
        flow.request(FlowState::Countdown).unwrap();
        run(&mut flow, 1.05);
        flow.update(DT, &FrameInput::skip());
        let play = flow.play_state().unwrap();
        assert_eq!(play.difficulty, crate::sim::Difficulty::DeadlyStorm);
        assert_eq!(flow.draw_list(&AssetTable::new()).hud.difficulty, "Deadly Storm");
    }

    #[test]
    fn test_music_crossfades_to_gameplay() {
        let mut flow = GameFlowController::new(1, Settings::default());
        flow.drain_audio();
        flow.request(FlowState::Countdown).unwrap();
        let cmds = flow.drain_audio();
        assert!(cmds.contains(&AudioCommand::StartMusic {
            track: MusicTrack::Gameplay,
            volume: 0.0
        }));
        assert_eq!(flow.audio().current_track(), Some(MusicTrack::Gameplay));
    }

    #[test]
    fn test_frame_dt_is_clamped() {
        let mut flow = GameFlowController::new(1, Settings::default());
        flow.request(FlowState::Countdown).unwrap();
        // One huge stall only advances the fade by the clamp
        flow.update(5.0, &FrameInput::default());
        assert_eq!(flow.state(), FlowState::Menu);
        flow.update(f32::NAN, &FrameInput::default());
        assert_eq!(flow.state(), FlowState::Menu);
    }
}
