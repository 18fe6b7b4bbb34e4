//! Pre-game countdown (3, 2, 1)

use crate::consts::COUNTDOWN_DURATION;

const SCALE_START: f32 = 0.1;
const SCALE_SPEED: f32 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Countdown {
    duration: f32,
    elapsed: f32,
    /// Pop-in scale of the current number (0.1 - 1.0)
    scale: f32,
    shown: u32,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(COUNTDOWN_DURATION)
    }
}

impl Countdown {
    pub fn new(duration: f32) -> Self {
        let mut countdown = Self {
            duration: duration.max(0.0),
            elapsed: 0.0,
            scale: SCALE_START,
            shown: 0,
        };
        countdown.shown = countdown.number();
        countdown
    }

    /// Number on screen: `max(1, floor(duration - t) + 1)`, never above the
    /// whole seconds in the countdown
    pub fn number(&self) -> u32 {
        let left = (self.duration - self.elapsed).floor() as i64 + 1;
        let top = (self.duration.ceil() as i64).max(1);
        left.clamp(1, top) as u32
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Jump straight to the end
    pub fn skip(&mut self) {
        self.elapsed = self.duration;
    }

    /// Advance. Returns the new number when it changes so the caller can
    /// play a tick.
    pub fn update(&mut self, dt: f32) -> Option<u32> {
        if self.is_finished() {
            return None;
        }
        self.elapsed += dt;
        self.scale = (self.scale + SCALE_SPEED * dt).min(1.0);

        let number = self.number();
        if number != self.shown && !self.is_finished() {
            self.shown = number;
            self.scale = SCALE_START;
            return Some(number);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_down_three_two_one() {
        let mut countdown = Countdown::new(3.0);
        assert_eq!(countdown.number(), 3);
        let mut changes = Vec::new();
        for _ in 0..200 {
            if let Some(n) = countdown.update(1.0 / 60.0) {
                changes.push(n);
            }
        }
        assert!(countdown.is_finished());
        assert_eq!(changes, vec![2, 1]);
        assert_eq!(countdown.number(), 1);
    }

    #[test]
    fn test_number_formula() {
        let mut countdown = Countdown::new(3.0);
        countdown.elapsed = 0.5;
        assert_eq!(countdown.number(), 3);
        countdown.elapsed = 1.2;
        assert_eq!(countdown.number(), 2);
        countdown.elapsed = 2.99;
        assert_eq!(countdown.number(), 1);
        countdown.elapsed = 7.0;
        assert_eq!(countdown.number(), 1);
    }

    #[test]
    fn test_scale_pops_in_and_resets() {
        let mut countdown = Countdown::new(3.0);
        countdown.update(0.2);
        assert!((countdown.scale() - 0.5).abs() < 1e-5);
        countdown.update(0.5);
        assert_eq!(countdown.scale(), 1.0);
        // Crossing the first whole second resets the pop-in
        countdown.update(0.4);
        assert_eq!(countdown.scale(), SCALE_START);
    }

    #[test]
    fn test_skip_finishes() {
        let mut countdown = Countdown::default();
        countdown.skip();
        assert!(countdown.is_finished());
        assert_eq!(countdown.update(0.1), None);
    }
}
