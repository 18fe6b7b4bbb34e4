//! Per-frame input snapshot
//!
//! Polling keyboards and joysticks is the host's job. The core only sees an
//! already deadzone-filtered direction plus this frame's button edges.

use glam::Vec2;

/// Discrete menu navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuNav {
    Up,
    Down,
    Left,
    Right,
}

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Steering direction, magnitude <= 1
    pub direction: Vec2,
    /// Any key or button went down this frame
    pub any_pressed: bool,
    /// Menu confirm (Enter / button A)
    pub confirm: bool,
    /// Menu back (Escape / button B)
    pub back: bool,
    /// Skip the countdown
    pub skip: bool,
    /// Menu navigation edge
    pub nav: Option<MenuNav>,
}

impl FrameInput {
    /// Steering input with the magnitude guaranteed to be at most 1
    pub fn direction(&self) -> Vec2 {
        if self.direction.is_finite() {
            self.direction.clamp_length_max(1.0)
        } else {
            Vec2::ZERO
        }
    }

    /// Input that only steers
    pub fn steering(direction: Vec2) -> Self {
        Self {
            direction,
            ..Default::default()
        }
    }

    /// A confirm press (also counts as "any key")
    pub fn confirm() -> Self {
        Self {
            confirm: true,
            any_pressed: true,
            ..Default::default()
        }
    }

    /// A press of some key that has no menu meaning
    pub fn any_key() -> Self {
        Self {
            any_pressed: true,
            ..Default::default()
        }
    }

    pub fn navigate(nav: MenuNav) -> Self {
        Self {
            nav: Some(nav),
            any_pressed: true,
            ..Default::default()
        }
    }

    pub fn back() -> Self {
        Self {
            back: true,
            any_pressed: true,
            ..Default::default()
        }
    }

    pub fn skip() -> Self {
        Self {
            skip: true,
            any_pressed: true,
            ..Default::default()
        }
    }

    /// True if any discrete edge fired this frame
    pub fn has_press(&self) -> bool {
        self.any_pressed || self.confirm || self.back || self.skip || self.nav.is_some()
    }
}
