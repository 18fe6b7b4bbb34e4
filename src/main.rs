//! Final Escape headless driver
//!
//! Runs the flow controller at a fixed 60 fps with a simple autopilot and
//! logs what happens. Useful for soak testing and for eyeballing balance.

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;

use final_escape::assets::AssetTable;
use final_escape::sim::Difficulty;
use final_escape::{FlowState, FrameInput, GameFlowController, Settings};

const FRAME_DT: f32 = 1.0 / 60.0;

#[derive(Parser, Debug)]
#[command(name = "final-escape")]
#[command(about = "Run the Final Escape simulation headless with an autopilot")]
struct Options {
    /// RNG seed for the whole run
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,

    /// Simulated seconds to run at 60 fps
    #[arg(long, default_value_t = 120.0)]
    seconds: f32,

    /// Difficulty label, overriding the settings file
    #[arg(long)]
    difficulty: Option<String>,

    /// JSON settings record to start from
    #[arg(long)]
    settings: Option<PathBuf>,
}

/// Steer away from the closest asteroid, drifting back toward the center
/// when nothing is close
fn autopilot(flow: &GameFlowController) -> FrameInput {
    match flow.state() {
        FlowState::Menu => FrameInput::confirm(),
        FlowState::Settings => FrameInput::back(),
        FlowState::Countdown => FrameInput::default(),
        FlowState::GameOver => {
            let ready = flow.game_over_screen().is_some_and(|s| s.is_ready());
            if ready { FrameInput::any_key() } else { FrameInput::default() }
        }
        FlowState::Playing => {
            let Some(play) = flow.play_state() else {
                return FrameInput::default();
            };
            let player = play.player.pos;
            let threat = play
                .asteroids
                .iter()
                .map(|a| (a.pos, a.pos.distance_squared(player)))
                .min_by(|a, b| a.1.total_cmp(&b.1));
            let direction = match threat {
                Some((pos, dist_sq)) if dist_sq < 150.0 * 150.0 => (player - pos).normalize_or_zero(),
                _ => {
                    let home = flow.viewport().center() - player;
                    if home.length() > 40.0 { home.normalize_or_zero() * 0.5 } else { Vec2::ZERO }
                }
            };
            FrameInput::steering(direction)
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let options = Options::parse();

    let record = match &options.settings {
        Some(path) => match fs::read_to_string(path) {
            Ok(text) => Some(text),
            Err(e) => {
                log::warn!("Could not read {}: {}", path.display(), e);
                None
            }
        },
        None => None,
    };
    let mut settings = Settings::load_or_default(record.as_deref());
    if let Some(label) = &options.difficulty {
        settings.difficulty = Difficulty::from_label_or_default(label);
    }

    log::info!(
        "Final Escape (headless) starting: seed {}, {}s on {}",
        options.seed,
        options.seconds,
        settings.difficulty.label()
    );

    let assets = AssetTable::with_all_images();
    let mut flow = GameFlowController::new(options.seed, settings);
    let frames = (options.seconds / FRAME_DT).ceil() as u64;
    let mut last_state = flow.state();
    let mut episodes = 0u32;
    let mut audio_commands = 0usize;
    let mut peak_items = 0usize;

    for _ in 0..frames {
        let input = autopilot(&flow);
        flow.update(FRAME_DT, &input);

        if flow.state() != last_state {
            if flow.state() == FlowState::Playing {
                episodes += 1;
            }
            last_state = flow.state();
        }

        audio_commands += flow.drain_audio().len();
        peak_items = peak_items.max(flow.draw_list(&assets).len());
    }

    log::info!(
        "Done: {} episodes, best {} points, {} audio commands, peak {} draw items",
        episodes,
        flow.session_scores().best().unwrap_or(0),
        audio_commands,
        peak_items
    );
    for (i, entry) in flow.session_scores().entries.iter().enumerate() {
        log::info!(
            "  #{} {} points, {:.1}s on {}",
            i + 1,
            entry.score,
            entry.time_alive,
            entry.difficulty
        );
    }
    Ok(())
}
