//! Game over screen

use crate::consts::GAME_OVER_INPUT_DELAY;
use crate::input::FrameInput;

/// Summary of the finished run plus the input cool-down
#[derive(Debug, Clone, PartialEq)]
pub struct GameOverScreen {
    pub final_score: u64,
    pub time_alive: f32,
    /// Rank in this session's table, if the run made it
    pub rank: Option<usize>,
    pub session_best: Option<u64>,
    elapsed: f32,
}

impl GameOverScreen {
    pub fn new(final_score: u64, time_alive: f32, rank: Option<usize>, session_best: Option<u64>) -> Self {
        Self {
            final_score,
            time_alive,
            rank,
            session_best,
            elapsed: 0.0,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    /// Input is accepted once the cool-down has passed
    pub fn is_ready(&self) -> bool {
        self.elapsed >= GAME_OVER_INPUT_DELAY
    }

    /// True if this input should leave the screen
    pub fn accepts(&self, input: &FrameInput) -> bool {
        self.is_ready() && input.has_press()
    }
}
