//! Asteroid classes, size categories, and difficulty tiers
//!
//! Everything in here is static configuration. Tables are fixed-size arrays
//! indexed by `AsteroidClass::index()` so every class has an entry.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Number of asteroid danger classes
pub const NUM_CLASSES: usize = 7;

/// Asteroid danger class, from harmless dust to the rare void rock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsteroidClass {
    Dust,
    Stone,
    Rock,
    Iron,
    Crystal,
    Ember,
    Void,
}

impl AsteroidClass {
    pub const ALL: [AsteroidClass; NUM_CLASSES] = [
        AsteroidClass::Dust,
        AsteroidClass::Stone,
        AsteroidClass::Rock,
        AsteroidClass::Iron,
        AsteroidClass::Crystal,
        AsteroidClass::Ember,
        AsteroidClass::Void,
    ];

    /// Ordinal danger class (0-6)
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Class for an ordinal, falling back to `Dust` for out-of-range values
    pub fn from_index(index: usize) -> Self {
        match Self::ALL.get(index) {
            Some(&class) => class,
            None => {
                log::warn!("Unknown asteroid class {}, using {:?}", index, AsteroidClass::Dust);
                AsteroidClass::Dust
            }
        }
    }

    /// Damage dealt by a small asteroid of this class
    pub fn base_damage(self) -> u32 {
        const BASE_DAMAGE: [u32; NUM_CLASSES] = [5, 10, 15, 25, 35, 50, 80];
        BASE_DAMAGE[self.index()]
    }
}

/// Asteroid size band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SizeCategory {
    Small,
    Medium,
    Large,
}

impl SizeCategory {
    /// Diameter range in pixels (inclusive)
    pub fn diameter_range(self) -> (f32, f32) {
        match self {
            SizeCategory::Small => (15.0, 25.0),
            SizeCategory::Medium => (26.0, 40.0),
            SizeCategory::Large => (41.0, 60.0),
        }
    }

    /// Smaller rocks fly faster
    pub fn speed_multiplier(self) -> f32 {
        match self {
            SizeCategory::Small => 1.4,
            SizeCategory::Medium => 1.0,
            SizeCategory::Large => 0.7,
        }
    }

    /// Bigger rocks hit harder
    pub fn damage_multiplier(self) -> f32 {
        match self {
            SizeCategory::Small => 1.0,
            SizeCategory::Medium => 1.5,
            SizeCategory::Large => 2.0,
        }
    }
}

/// Damage for a class/size pair (truncated toward zero)
pub fn asteroid_damage(class: AsteroidClass, size: SizeCategory) -> u32 {
    (class.base_damage() as f32 * size.damage_multiplier()) as u32
}

const S: &[SizeCategory] = &[SizeCategory::Small];
const SM: &[SizeCategory] = &[SizeCategory::Small, SizeCategory::Medium];
const SML: &[SizeCategory] = &[SizeCategory::Small, SizeCategory::Medium, SizeCategory::Large];

/// Static per-tier tuning
#[derive(Debug, Clone, PartialEq)]
pub struct DifficultyProfile {
    /// Scales the asteroid spawn rate (2.0 = twice as many asteroids)
    pub spawn_rate_multiplier: f32,
    /// Relative spawn weight per class
    pub type_weights: [f32; NUM_CLASSES],
    /// Size categories each class may spawn with (never empty)
    pub allowed_sizes: [&'static [SizeCategory]; NUM_CLASSES],
    /// Scales the power-up spawn interval (larger = rarer pickups)
    pub powerup_interval_multiplier: f32,
}

impl DifficultyProfile {
    /// `(class, weight)` table for weighted selection
    pub fn class_table(&self) -> [(AsteroidClass, f32); NUM_CLASSES] {
        let mut table = [(AsteroidClass::Dust, 0.0); NUM_CLASSES];
        for (slot, class) in table.iter_mut().zip(AsteroidClass::ALL) {
            *slot = (class, self.type_weights[class.index()]);
        }
        table
    }

    pub fn sizes_for(&self, class: AsteroidClass) -> &'static [SizeCategory] {
        self.allowed_sizes[class.index()]
    }
}

static PEACEFUL_VOID: DifficultyProfile = DifficultyProfile {
    spawn_rate_multiplier: 0.6,
    type_weights: [35.0, 25.0, 15.0, 5.0, 0.0, 0.0, 0.0],
    allowed_sizes: [SML, SML, SML, SM, SM, S, S],
    powerup_interval_multiplier: 0.8,
};

static LIGHT_DRIFT: DifficultyProfile = DifficultyProfile {
    spawn_rate_multiplier: 0.8,
    type_weights: [30.0, 22.0, 15.0, 8.0, 4.0, 1.0, 0.0],
    allowed_sizes: [SML, SML, SML, SM, SM, S, S],
    powerup_interval_multiplier: 0.9,
};

static NORMAL_SPACE: DifficultyProfile = DifficultyProfile {
    spawn_rate_multiplier: 1.0,
    type_weights: [25.0, 20.0, 15.0, 10.0, 7.0, 4.0, 2.0],
    allowed_sizes: [SML, SML, SML, SM, SM, S, S],
    powerup_interval_multiplier: 1.0,
};

static DENSE_FIELD: DifficultyProfile = DifficultyProfile {
    spawn_rate_multiplier: 1.3,
    type_weights: [20.0, 18.0, 15.0, 12.0, 10.0, 6.0, 4.0],
    allowed_sizes: [SML, SML, SML, SML, SML, SM, S],
    powerup_interval_multiplier: 1.15,
};

static DEADLY_STORM: DifficultyProfile = DifficultyProfile {
    spawn_rate_multiplier: 1.7,
    type_weights: [15.0, 15.0, 14.0, 14.0, 12.0, 10.0, 8.0],
    allowed_sizes: [SML, SML, SML, SML, SML, SM, SM],
    powerup_interval_multiplier: 1.3,
};

/// Named difficulty tier, easiest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    PeacefulVoid,
    LightDrift,
    #[default]
    NormalSpace,
    DenseField,
    DeadlyStorm,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::PeacefulVoid,
        Difficulty::LightDrift,
        Difficulty::NormalSpace,
        Difficulty::DenseField,
        Difficulty::DeadlyStorm,
    ];

    /// Display label, also used as the settings value
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::PeacefulVoid => "Peaceful Void",
            Difficulty::LightDrift => "Light Drift",
            Difficulty::NormalSpace => "Normal Space",
            Difficulty::DenseField => "Dense Field",
            Difficulty::DeadlyStorm => "Deadly Storm",
        }
    }

    /// Parse a label (case-insensitive, surrounding whitespace ignored)
    pub fn from_label(label: &str) -> Result<Self, ConfigError> {
        let wanted = label.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::UnknownDifficulty(label.to_string()))
    }

    /// Parse a label, falling back to the default tier with a warning
    pub fn from_label_or_default(label: &str) -> Self {
        Self::from_label(label).unwrap_or_else(|e| {
            log::warn!("{}; using {}", e, Difficulty::default().label());
            Difficulty::default()
        })
    }

    pub fn profile(self) -> &'static DifficultyProfile {
        match self {
            Difficulty::PeacefulVoid => &PEACEFUL_VOID,
            Difficulty::LightDrift => &LIGHT_DRIFT,
            Difficulty::NormalSpace => &NORMAL_SPACE,
            Difficulty::DenseField => &DENSE_FIELD,
            Difficulty::DeadlyStorm => &DEADLY_STORM,
        }
    }

    /// Next harder tier (wraps)
    pub fn next(self) -> Self {
        let i = self as usize;
        Self::ALL[(i + 1) % Self::ALL.len()]
    }

    /// Next easier tier (wraps)
    pub fn prev(self) -> Self {
        let i = self as usize;
        Self::ALL[(i + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip() {
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_label(d.label()).unwrap(), d);
        }
        assert_eq!(
            Difficulty::from_label("  deadly storm ").unwrap(),
            Difficulty::DeadlyStorm
        );
    }

    #[test]
    fn test_unknown_label_falls_back() {
        assert!(matches!(
            Difficulty::from_label("Nightmare"),
            Err(ConfigError::UnknownDifficulty(_))
        ));
        assert_eq!(
            Difficulty::from_label_or_default("Nightmare"),
            Difficulty::NormalSpace
        );
    }

    #[test]
    fn test_cycle_wraps() {
        assert_eq!(Difficulty::DeadlyStorm.next(), Difficulty::PeacefulVoid);
        assert_eq!(Difficulty::PeacefulVoid.prev(), Difficulty::DeadlyStorm);
        assert_eq!(Difficulty::NormalSpace.next().prev(), Difficulty::NormalSpace);
    }

    #[test]
    fn test_profiles_are_well_formed() {
        for d in Difficulty::ALL {
            let p = d.profile();
            assert!(p.spawn_rate_multiplier > 0.0);
            assert!(p.powerup_interval_multiplier > 0.0);
            assert!(p.type_weights.iter().all(|&w| w >= 0.0));
            assert!(p.type_weights.iter().any(|&w| w > 0.0));
            assert!(p.allowed_sizes.iter().all(|sizes| !sizes.is_empty()));
        }
        // Easiest tier never spawns the most dangerous class
        assert_eq!(Difficulty::PeacefulVoid.profile().type_weights[6], 0.0);
        // Harder tiers open up bigger sizes for dangerous classes
        let normal = Difficulty::NormalSpace.profile();
        let deadly = Difficulty::DeadlyStorm.profile();
        assert!(deadly.sizes_for(AsteroidClass::Void).len() > normal.sizes_for(AsteroidClass::Void).len());
    }

    #[test]
    fn test_damage_table() {
        assert_eq!(asteroid_damage(AsteroidClass::Dust, SizeCategory::Small), 5);
        assert_eq!(asteroid_damage(AsteroidClass::Dust, SizeCategory::Medium), 7);
        assert_eq!(asteroid_damage(AsteroidClass::Void, SizeCategory::Large), 160);
        assert_eq!(AsteroidClass::from_index(42), AsteroidClass::Dust);
        assert_eq!(AsteroidClass::from_index(6), AsteroidClass::Void);
    }
}
