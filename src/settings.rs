//! Simulation configuration and presets
//!
//! Persisted in LocalStorage on the web, defaults everywhere else.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;
use crate::sim::Roster;

/// Named parameter sets matching the arena variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Preset {
    /// Corner spawns, moderate speed
    #[default]
    Classic,
    /// Slow entities spread over the whole arena
    Calm,
    /// Fast, small entities
    Frantic,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Classic => "Classic",
            Preset::Calm => "Calm",
            Preset::Frantic => "Frantic",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" => Some(Preset::Classic),
            "calm" => Some(Preset::Calm),
            "frantic" | "fast" => Some(Preset::Frantic),
            _ => None,
        }
    }
}

/// Where spawn candidates are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SpawnArea {
    /// Uniform over the whole arena
    Anywhere,
    /// One of the four corners, each spanning `fraction` of both axes
    Corners { fraction: f32 },
}

/// Simulation parameters, validated before every spawn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Upper bound on entities per spawn
    pub max_entities: usize,
    /// Per-component speed range (pixels per tick)
    pub min_speed: f32,
    pub max_speed: f32,
    /// Radius used for both collisions and wall bounces
    pub entity_radius: f32,
    /// Minimum centre distance between entities at spawn
    pub min_separation: f32,
    /// Rejection-sampling budget per entity and separation level
    pub max_placement_attempts: u32,
    pub spawn_area: SpawnArea,
    /// Kinds in beats order
    #[serde(default)]
    pub roster: Roster,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_entities: MAX_ENTITIES,
            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
            entity_radius: ENTITY_RADIUS,
            min_separation: MIN_SEPARATION,
            max_placement_attempts: MAX_PLACEMENT_ATTEMPTS,
            spawn_area: SpawnArea::Corners {
                fraction: CORNER_FRACTION,
            },
            roster: Roster::default(),
        }
    }
}

impl SimConfig {
    /// Create a config from a preset
    pub fn from_preset(preset: Preset) -> Self {
        let base = Self::default();
        match preset {
            Preset::Classic => base,
            Preset::Calm => Self {
                min_speed: 0.5,
                max_speed: 2.0,
                spawn_area: SpawnArea::Anywhere,
                ..base
            },
            Preset::Frantic => Self {
                min_speed: 3.0,
                max_speed: 8.0,
                entity_radius: 12.0,
                min_separation: 40.0,
                spawn_area: SpawnArea::Anywhere,
                ..base
            },
        }
    }

    /// Entity diameter (the smallest separation placement may relax to)
    pub fn diameter(&self) -> f32 {
        self.entity_radius * 2.0
    }

    /// Check every field against its allowed range
    pub fn validate(&self) -> Result<(), SimError> {
        let invalid = |msg: String| Err(SimError::InvalidConfig(msg));

        if self.max_entities == 0 {
            return invalid("max_entities must be at least 1".into());
        }
        if !(self.min_speed > 0.0 && self.min_speed <= self.max_speed) {
            return invalid(format!(
                "speed range [{}, {}] must satisfy 0 < min <= max",
                self.min_speed, self.max_speed
            ));
        }
        if !(self.entity_radius > 0.0) {
            return invalid(format!("entity_radius {} must be positive", self.entity_radius));
        }
        if self.min_separation < self.diameter() {
            return invalid(format!(
                "min_separation {} is below the entity diameter {}",
                self.min_separation,
                self.diameter()
            ));
        }
        if self.max_placement_attempts == 0 {
            return invalid("max_placement_attempts must be at least 1".into());
        }
        if let SpawnArea::Corners { fraction } = self.spawn_area {
            if !(fraction > 0.0 && fraction <= 0.5) {
                return invalid(format!("corner fraction {fraction} must be in (0, 0.5]"));
            }
        }
        self.roster.validate()
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| SimError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "emoji_clash_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored config: {e}"),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Save config to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Config saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_are_valid() {
        for preset in [Preset::Classic, Preset::Calm, Preset::Frantic] {
            let config = SimConfig::from_preset(preset);
            assert!(config.validate().is_ok(), "{} preset invalid", preset.as_str());
        }
    }

    #[test]
    fn test_preset_from_str() {
        assert_eq!(Preset::from_str("CALM"), Some(Preset::Calm));
        assert_eq!(Preset::from_str("fast"), Some(Preset::Frantic));
        assert_eq!(Preset::from_str("chaos"), None);
    }

    #[test]
    fn test_validate_rejects_bad_speed_range() {
        let config = SimConfig {
            min_speed: 4.0,
            max_speed: 2.0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(SimError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_tight_separation() {
        let config = SimConfig {
            entity_radius: 15.0,
            min_separation: 20.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_wide_corners() {
        let config = SimConfig {
            spawn_area: SpawnArea::Corners { fraction: 0.75 },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_round_trip_keeps_values() {
        let config = SimConfig::from_preset(Preset::Frantic);
        let json = serde_json::to_string(&config).unwrap();
        let parsed = SimConfig::from_json(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_json_missing_roster_uses_default() {
        let json = r#"{
            "max_entities": 10,
            "min_speed": 1.0,
            "max_speed": 2.0,
            "entity_radius": 10.0,
            "min_separation": 30.0,
            "max_placement_attempts": 100,
            "spawn_area": "Anywhere"
        }"#;
        let config = SimConfig::from_json(json).unwrap();
        assert_eq!(config.roster.len(), 3);
        assert_eq!(config.max_entities, 10);
    }

    #[test]
    fn test_json_rejects_garbage() {
        assert!(matches!(
            SimConfig::from_json("{not json"),
            Err(SimError::InvalidConfig(_))
        ));
    }
}
