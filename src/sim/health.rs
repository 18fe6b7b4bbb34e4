//! Player health, invulnerability window, and hit flash

use serde::{Deserialize, Serialize};

use crate::consts::{FLASH_DIM_ALPHA, FLASH_INTERVAL, INVULNERABILITY_DURATION, PLAYER_MAX_HEALTH};

/// Anything that can absorb contact damage
pub trait Damageable {
    fn is_invulnerable(&self) -> bool;
    /// Returns true if the damage was applied
    fn take_damage(&mut self, amount: u32) -> bool;
}

/// Health pool with a post-hit invulnerability window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Health {
    current: u32,
    max: u32,
    invulnerable: bool,
    /// Seconds of invulnerability left
    invulnerable_timer: f32,
    /// Seconds until the flash toggles again
    flash_timer: f32,
    /// Cosmetic only; collision never looks at it
    flash_visible: bool,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(PLAYER_MAX_HEALTH)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self {
            current: max,
            max,
            invulnerable: false,
            invulnerable_timer: 0.0,
            flash_timer: 0.0,
            flash_visible: true,
        }
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Fraction of max health left (0.0 - 1.0)
    pub fn fraction(&self) -> f32 {
        if self.max == 0 {
            0.0
        } else {
            self.current as f32 / self.max as f32
        }
    }

    /// Apply damage. Returns false (and changes nothing) while invulnerable.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if self.invulnerable {
            return false;
        }
        self.current = self.current.saturating_sub(amount);
        self.invulnerable = true;
        self.invulnerable_timer = INVULNERABILITY_DURATION;
        self.flash_timer = FLASH_INTERVAL;
        self.flash_visible = true;
        true
    }

    /// Restore health, clamped to max. Returns the amount actually healed.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.current;
        self.current = self.current.saturating_add(amount).min(self.max);
        self.current - before
    }

    /// Advance the invulnerability window and the flash toggle
    pub fn update(&mut self, dt: f32) {
        if !self.invulnerable {
            return;
        }

        self.invulnerable_timer -= dt;
        self.flash_timer -= dt;
        if self.flash_timer <= 0.0 {
            self.flash_visible = !self.flash_visible;
            self.flash_timer = FLASH_INTERVAL;
        }

        if self.invulnerable_timer <= 0.0 {
            self.invulnerable = false;
            self.invulnerable_timer = 0.0;
            self.flash_visible = true;
        }
    }

    /// Player render alpha: dimmed during the "off" half of the flash
    pub fn render_alpha(&self) -> u8 {
        if self.invulnerable && !self.flash_visible {
            FLASH_DIM_ALPHA
        } else {
            255
        }
    }
}

impl Damageable for Health {
    fn is_invulnerable(&self) -> bool {
        Health::is_invulnerable(self)
    }

    fn take_damage(&mut self, amount: u32) -> bool {
        Health::take_damage(self, amount)
    }
}
