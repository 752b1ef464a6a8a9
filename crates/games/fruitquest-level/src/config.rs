use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use fruitquest_core::events::WorldSetup;
use fruitquest_core::score::LevelId;

use crate::movement::MovementModel;
use crate::session::DEFAULT_COUNTDOWN_SECS;
use crate::theme::CollectibleTheme;

/// World and camera geometry handed to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Tiled JSON file holding terrain and object layers.
    pub tilemap: String,
    pub world_width: f32,
    pub world_height: f32,
    pub spawn_x: f32,
    pub spawn_y: f32,
    /// Downward arcade gravity. Unused by the position-offset model.
    pub gravity_y: f32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            tilemap: "level-2.json".to_string(),
            world_width: 1984.0,
            world_height: 608.0,
            spawn_x: 30.0,
            spawn_y: 350.0,
            gravity_y: 1000.0,
        }
    }
}

/// Everything that differs between two levels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub name: String,
    pub level_id: LevelId,
    pub theme: CollectibleTheme,
    pub movement: MovementModel,
    pub countdown_secs: u32,
    pub map: MapConfig,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self::cherry_grove()
    }
}

impl LevelConfig {
    /// First level: free movement by fixed offsets.
    pub fn training() -> Self {
        Self {
            name: "training".to_string(),
            level_id: 1,
            theme: CollectibleTheme::Cherry,
            movement: MovementModel::delta(),
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
            map: MapConfig {
                tilemap: "level-1.json".to_string(),
                spawn_x: 20.0,
                ..MapConfig::default()
            },
        }
    }

    pub fn cherry_grove() -> Self {
        Self {
            name: "cherry_grove".to_string(),
            level_id: 5,
            theme: CollectibleTheme::Cherry,
            movement: MovementModel::velocity(),
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
            map: MapConfig::default(),
        }
    }

    /// World bounds and gravity for the host. Offset-moved levels get no gravity.
    pub fn world_setup(&self) -> WorldSetup {
        let gravity_y = match self.movement {
            MovementModel::Delta { .. } => None,
            MovementModel::Velocity { .. } => Some(self.map.gravity_y),
        };
        WorldSetup {
            tilemap: self.map.tilemap.clone(),
            width: self.map.world_width,
            height: self.map.world_height,
            spawn_x: self.map.spawn_x,
            spawn_y: self.map.spawn_y,
            gravity_y,
        }
    }

    pub fn melon_canyon() -> Self {
        Self {
            name: "melon_canyon".to_string(),
            level_id: 6,
            theme: CollectibleTheme::Melon,
            movement: MovementModel::velocity(),
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
            map: MapConfig {
                tilemap: "level-3.json".to_string(),
                spawn_x: 20.0,
                ..MapConfig::default()
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    NoLevels,
    ZeroCountdown { level: String },
    DuplicateLevelId(LevelId),
    InvalidMovement { level: String, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoLevels => write!(f, "no levels configured"),
            ConfigError::ZeroCountdown { level } => {
                write!(f, "level {level}: countdown_secs must be > 0")
            },
            ConfigError::DuplicateLevelId(id) => write!(f, "level_id {id} is used twice"),
            ConfigError::InvalidMovement { level, reason } => {
                write!(f, "level {level}: {reason}")
            },
        }
    }
}

impl std::error::Error for ConfigError {}

/// All playable levels, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelCatalog {
    pub levels: Vec<LevelConfig>,
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self {
            levels: vec![
                LevelConfig::training(),
                LevelConfig::cherry_grove(),
                LevelConfig::melon_canyon(),
            ],
        }
    }
}

impl LevelCatalog {
    /// Load from `FRUITQUEST_LEVELS_CONFIG` or `config/levels.toml`. Falls back
    /// to the built-in levels if the file is missing, unparseable or invalid.
    pub fn load() -> Self {
        let path = std::env::var("FRUITQUEST_LEVELS_CONFIG")
            .unwrap_or_else(|_| "config/levels.toml".to_string());
        Self::load_from(&path)
    }

    pub fn load_from(path: &str) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => {
                tracing::info!("No {path} found, using built-in levels");
                return LevelCatalog::default();
            },
        };
        match Self::parse(&content) {
            Ok(catalog) => {
                tracing::info!(levels = catalog.levels.len(), "Loaded levels from {path}");
                catalog
            },
            Err(e) => {
                tracing::warn!("Failed to load {path}: {e}, using built-in levels");
                LevelCatalog::default()
            },
        }
    }

    /// Parse and validate a TOML catalog.
    pub fn parse(content: &str) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let catalog: LevelCatalog = toml::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::NoLevels);
        }
        let mut seen = HashSet::new();
        for level in &self.levels {
            if level.countdown_secs == 0 {
                return Err(ConfigError::ZeroCountdown {
                    level: level.name.clone(),
                });
            }
            if !seen.insert(level.level_id) {
                return Err(ConfigError::DuplicateLevelId(level.level_id));
            }
            level
                .movement
                .validate()
                .map_err(|reason| ConfigError::InvalidMovement {
                    level: level.name.clone(),
                    reason,
                })?;
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&LevelConfig> {
        self.levels.iter().find(|l| l.name == name)
    }
}
