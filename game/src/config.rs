use crate::entities::player::SteeringMode;
use collisions::BroadPhase;
use common::shapes::Rectangle;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunables for one [`crate::Simulation`].
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub width: f32,
    pub height: f32,
    /// Seconds advanced by each call to `tick`.
    pub fixed_dt: f32,
    pub starting_lives: u32,
    /// Percent chance per tick of spawning an asteroid at a screen edge.
    pub asteroid_spawn_chance: u32,
    pub powerup_drop_chance: f64,
    pub invulnerability_ticks: u32,
    /// Frames a banner stays up after a pickup or a lost life.
    pub banner_frames: u32,
    pub quadtree_node_capacity: usize,
    pub quadtree_max_depth: usize,
    /// When set, replaces the bounding-circle broad phase with a fixed
    /// center-distance check.
    pub broad_phase_distance: Option<f32>,
    pub steering: SteeringMode,
    pub turn_speed: f32,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: 800.0,
            height: 600.0,
            fixed_dt: 1.0 / 60.0,
            starting_lives: 3,
            asteroid_spawn_chance: 2,
            powerup_drop_chance: 0.15,
            invulnerability_ticks: 120,
            banner_frames: 90,
            quadtree_node_capacity: 4,
            quadtree_max_depth: 5,
            broad_phase_distance: None,
            steering: SteeringMode::Eased,
            turn_speed: 10.0,
            seed: None,
        }
    }
}

impl GameConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: GameConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "window must have a positive size, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.fixed_dt > 0.0 && self.fixed_dt.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "fixed_dt must be positive, got {}",
                self.fixed_dt
            )));
        }
        if !(0.0..=1.0).contains(&self.powerup_drop_chance) {
            return Err(ConfigError::Invalid(format!(
                "powerup_drop_chance must be within [0, 1], got {}",
                self.powerup_drop_chance
            )));
        }
        if let Some(distance) = self.broad_phase_distance {
            if !(distance > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "broad_phase_distance must be positive, got {}",
                    distance
                )));
            }
        }
        Ok(())
    }

    pub fn window(&self) -> Rectangle {
        Rectangle::new(0.0, 0.0, self.width, self.height)
    }

    pub fn quadtree_config(&self) -> quadtree::quadtree::Config {
        quadtree::quadtree::Config {
            node_capacity: self.quadtree_node_capacity,
            max_depth: self.quadtree_max_depth,
        }
    }

    pub fn broad_phase(&self) -> BroadPhase {
        match self.broad_phase_distance {
            Some(distance) => BroadPhase::FixedDistance(distance),
            None => BroadPhase::BoundingCircle,
        }
    }
}
