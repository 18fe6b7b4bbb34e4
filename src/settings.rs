//! User settings and preferences
//!
//! Stored by the host as a small JSON record. The core only parses and
//! produces that record; reading and writing the file is not its concern.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::ConfigError;
use crate::sim::difficulty::Difficulty;

/// Default star opacity (percent)
pub const DEFAULT_STAR_OPACITY: u8 = 60;
/// Step used by the settings menu
pub const STAR_OPACITY_STEP: i32 = 10;

/// Game settings/preferences
///
/// Missing fields take their default. A field with an invalid value also
/// keeps its default and logs a warning, so one bad entry never discards
/// the rest of the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Master sound switch
    #[serde(deserialize_with = "sound_or_default")]
    pub sound_enabled: bool,
    /// Background star opacity (0 - 100)
    #[serde(deserialize_with = "star_opacity_or_default")]
    pub star_opacity: u8,
    /// Asteroid density and mix for new episodes, stored by its label
    #[serde(
        serialize_with = "serialize_difficulty",
        deserialize_with = "difficulty_or_default"
    )]
    pub difficulty: Difficulty,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::NormalSpace,
            sound_enabled: true,
            star_opacity: DEFAULT_STAR_OPACITY,
        }
    }
}

impl Settings {
    /// Parse a settings record.
    ///
    /// Fails only if the text is not a JSON object. Individual fields that are
    /// missing or invalid keep their default value and log a warning.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Object(map) = value else {
            return Err(ConfigError::InvalidField { field: "settings" });
        };
        warn_unknown_keys(&map);
        Ok(serde_json::from_value(Value::Object(map))?)
    }

    /// Parse a record if there is one, falling back to defaults on any error
    pub fn load_or_default(json: Option<&str>) -> Self {
        let Some(json) = json else {
            log::info!("No settings record, using defaults");
            return Self::default();
        };
        match Self::from_json(json) {
            Ok(settings) => {
                log::info!("Settings loaded");
                settings
            }
            Err(e) => {
                log::warn!("{}; using default settings", e);
                Self::default()
            }
        }
    }

    /// Serialize to the record format (pretty-printed)
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set star opacity, rejecting values outside 0-100
    pub fn set_star_opacity(&mut self, opacity: f64) -> Result<(), ConfigError> {
        if !(0.0..=100.0).contains(&opacity) {
            return Err(ConfigError::StarOpacityOutOfRange(opacity));
        }
        self.star_opacity = opacity.round() as u8;
        Ok(())
    }

    /// Nudge star opacity by `delta`, clamped to 0-100. Returns true on change.
    pub fn adjust_star_opacity(&mut self, delta: i32) -> bool {
        let next = (i32::from(self.star_opacity) + delta).clamp(0, 100) as u8;
        let changed = next != self.star_opacity;
        self.star_opacity = next;
        changed
    }

    pub fn toggle_sound(&mut self) {
        self.sound_enabled = !self.sound_enabled;
    }

    /// Step to the next harder (or easier) tier, wrapping around
    pub fn cycle_difficulty(&mut self, forward: bool) {
        self.difficulty = if forward {
            self.difficulty.next()
        } else {
            self.difficulty.prev()
        };
    }
}

/// Deserialize a field through `parse`, keeping `fallback` on any error
fn field_or<'de, D, T>(
    deserializer: D,
    parse: fn(&Value) -> Result<T, ConfigError>,
    fallback: T,
) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(parse(&value).unwrap_or_else(|e| {
        log::warn!("{}; using default", e);
        fallback
    }))
}

fn sound_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    field_or(deserializer, parse_sound, Settings::default().sound_enabled)
}

fn star_opacity_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    field_or(deserializer, parse_star_opacity, DEFAULT_STAR_OPACITY)
}

fn difficulty_or_default<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Difficulty, D::Error> {
    field_or(deserializer, parse_difficulty, Difficulty::default())
}

fn serialize_difficulty<S: Serializer>(difficulty: &Difficulty, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(difficulty.label())
}

fn parse_sound(v: &Value) -> Result<bool, ConfigError> {
    v.as_bool()
        .ok_or(ConfigError::InvalidField { field: "sound_enabled" })
}

fn parse_star_opacity(v: &Value) -> Result<u8, ConfigError> {
    let opacity = v
        .as_f64()
        .ok_or(ConfigError::InvalidField { field: "star_opacity" })?;
    if !(0.0..=100.0).contains(&opacity) {
        return Err(ConfigError::StarOpacityOutOfRange(opacity));
    }
    Ok(opacity.round() as u8)
}

fn parse_difficulty(v: &Value) -> Result<Difficulty, ConfigError> {
    let label = v
        .as_str()
        .ok_or(ConfigError::InvalidField { field: "difficulty" })?;
    Difficulty::from_label(label)
}

fn warn_unknown_keys(map: &Map<String, Value>) {
    for key in map.keys() {
        if !matches!(key.as_str(), "sound_enabled" | "star_opacity" | "difficulty") {
            log::warn!("Ignoring unknown settings key '{}'", key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let settings = Settings {
            difficulty: Difficulty::DeadlyStorm,
            sound_enabled: false,
            star_opacity: 30,
        };
        let json = settings.to_json().unwrap();
        assert!(json.contains("\"Deadly Storm\""));
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_invalid_fields_fall_back_individually() {
        let json = r#"{"sound_enabled": "yes", "star_opacity": 150, "difficulty": "Light Drift"}"#;
        let settings = Settings::from_json(json).unwrap();
        assert!(settings.sound_enabled);
        assert_eq!(settings.star_opacity, DEFAULT_STAR_OPACITY);
        assert_eq!(settings.difficulty, Difficulty::LightDrift);

        let json = r#"{"difficulty": "Impossible", "star_opacity": 0}"#;
        let settings = Settings::from_json(json).unwrap();
        assert_eq!(settings.difficulty, Difficulty::NormalSpace);
        assert_eq!(settings.star_opacity, 0);
    }

    #[test]
    fn test_serde_derive_applies_field_fallbacks() {
        let settings: Settings = serde_json::from_str(r#"{"star_opacity": 40}"#).unwrap();
        assert_eq!(settings.star_opacity, 40);
        assert!(settings.sound_enabled);
        assert_eq!(settings.difficulty, Difficulty::NormalSpace);

        let settings: Settings =
            serde_json::from_str(r#"{"sound_enabled": false, "difficulty": 3}"#).unwrap();
        assert!(!settings.sound_enabled);
        assert_eq!(settings.difficulty, Difficulty::NormalSpace);

        let value = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(value["difficulty"], "Normal Space");
    }

    #[test]
    fn test_malformed_record_is_an_error() {
        assert!(matches!(Settings::from_json("{not json"), Err(ConfigError::Json(_))));
        assert!(matches!(
            Settings::from_json("[1, 2]"),
            Err(ConfigError::InvalidField { .. })
        ));
        assert_eq!(Settings::load_or_default(Some("{not json")), Settings::default());
        assert_eq!(Settings::load_or_default(None), Settings::default());
    }

    #[test]
    fn test_star_opacity_bounds() {
        let mut settings = Settings::default();
        assert!(matches!(
            settings.set_star_opacity(-1.0),
            Err(ConfigError::StarOpacityOutOfRange(_))
        ));
        settings.set_star_opacity(95.0).unwrap();
        assert!(settings.adjust_star_opacity(STAR_OPACITY_STEP));
        assert_eq!(settings.star_opacity, 100);
        assert!(!settings.adjust_star_opacity(STAR_OPACITY_STEP));
        settings.star_opacity = 5;
        settings.adjust_star_opacity(-STAR_OPACITY_STEP);
        assert_eq!(settings.star_opacity, 0);
    }
}
