//! Screen fade used to mask state switches
//!
//! A transition fades to black (alpha 0 -> 255) and reports its target once
//! fully covered. After the switch a shorter fade-in (255 -> 0) uncovers the
//! new screen. The fade-in is cosmetic and never blocks input.

use super::FlowState;
use crate::consts::{FADE_DURATION, FADE_IN_DURATION};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Out { target: FlowState, elapsed: f32 },
    In { elapsed: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Fade {
    phase: Phase,
    out_duration: f32,
    in_duration: f32,
}

impl Default for Fade {
    fn default() -> Self {
        Self::new(FADE_DURATION, FADE_IN_DURATION)
    }
}

impl Fade {
    pub fn new(out_duration: f32, in_duration: f32) -> Self {
        Self {
            phase: Phase::Idle,
            out_duration: out_duration.max(f32::EPSILON),
            in_duration: in_duration.max(f32::EPSILON),
        }
    }

    /// Begin covering the screen on the way to `target`
    pub fn start_out(&mut self, target: FlowState) {
        self.phase = Phase::Out {
            target,
            elapsed: 0.0,
        };
    }

    /// Begin uncovering the screen
    pub fn start_in(&mut self) {
        self.phase = Phase::In { elapsed: 0.0 };
    }

    /// Target of the fade-out in progress, if any
    pub fn pending(&self) -> Option<FlowState> {
        match self.phase {
            Phase::Out { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn is_fading_out(&self) -> bool {
        self.pending().is_some()
    }

    /// Advance. Returns the target once the fade-out is complete; the fade
    /// then idles until `start_in` is called.
    pub fn update(&mut self, dt: f32) -> Option<FlowState> {
        match &mut self.phase {
            Phase::Idle => None,
            Phase::Out { target, elapsed } => {
                *elapsed += dt;
                if *elapsed >= self.out_duration {
                    let target = *target;
                    self.phase = Phase::Idle;
                    Some(target)
                } else {
                    None
                }
            }
            Phase::In { elapsed } => {
                *elapsed += dt;
                if *elapsed >= self.in_duration {
                    self.phase = Phase::Idle;
                }
                None
            }
        }
    }

    /// Black overlay alpha for the renderer
    pub fn alpha(&self) -> u8 {
        let t = match self.phase {
            Phase::Idle => return 0,
            Phase::Out { elapsed, .. } => elapsed / self.out_duration,
            Phase::In { elapsed } => 1.0 - elapsed / self.in_duration,
        };
        (255.0 * t.clamp(0.0, 1.0)) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_out_reports_target_once() {
        let mut fade = Fade::new(1.0, 0.5);
        assert_eq!(fade.alpha(), 0);
        fade.start_out(FlowState::Countdown);
        assert!(fade.is_fading_out());

        assert_eq!(fade.update(0.5), None);
        assert_eq!(fade.alpha(), 127);
        assert_eq!(fade.update(0.5), Some(FlowState::Countdown));
        assert_eq!(fade.update(0.5), None);
        assert!(!fade.is_fading_out());
    }

    #[test]
    fn test_fade_in_uncovers() {
        let mut fade = Fade::new(1.0, 0.5);
        fade.start_in();
        assert_eq!(fade.alpha(), 255);
        fade.update(0.25);
        assert_eq!(fade.alpha(), 127);
        fade.update(0.25);
        assert_eq!(fade.alpha(), 0);
        assert_eq!(fade.pending(), None);
    }
}
