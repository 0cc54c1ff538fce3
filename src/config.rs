//! Tunable game constants.
//!
//! Defaults reproduce the classic 400×600 playfield. A JSON file may override
//! any subset of fields; missing fields keep their default.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "FLAPPY_CONFIG";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub world_width: f32,
    pub world_height: f32,

    pub bird_x: f32,
    pub bird_start_y: f32,
    pub bird_width: f32,
    pub bird_height: f32,

    pub gravity: f32,
    /// Velocity set by a flap (negative = upward).
    pub flap_impulse: f32,

    /// Units per frame pipes travel to the left.
    pub pipe_speed: f32,
    pub pipe_width: f32,
    pub pipe_height: f32,
    pub pipe_gap: f32,
    /// Candidate y values for the top edge of the bottom segment.
    pub pipe_offsets: Vec<f32>,
    /// Pipes spawn centred this far right of the world's right edge.
    pub spawn_x_offset: f32,
    pub spawn_interval_ms: u64,

    pub floor_y: f32,
    pub ceiling_y: f32,

    pub score_per_frame: f64,

    /// Activation chance per frame is `1 / power_up_chance`.
    pub power_up_chance: u32,
    pub power_up_duration_ms: u64,
    pub power_up_radius: f32,

    pub target_fps: u32,

    /// Overrides the platform data directory location of the score table.
    pub scores_file: Option<PathBuf>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            world_width: 400.0,
            world_height: 600.0,
            bird_x: 100.0,
            bird_start_y: 300.0,
            bird_width: 40.0,
            bird_height: 30.0,
            gravity: 0.5,
            flap_impulse: -10.0,
            pipe_speed: 5.0,
            pipe_width: 52.0,
            pipe_height: 320.0,
            pipe_gap: 200.0,
            pipe_offsets: vec![300.0, 350.0, 400.0, 450.0],
            spawn_x_offset: 100.0,
            spawn_interval_ms: 1200,
            floor_y: 550.0,
            ceiling_y: -100.0,
            score_per_frame: 0.01,
            power_up_chance: 1000,
            power_up_duration_ms: 5000,
            power_up_radius: 30.0,
            target_fps: 60,
            scores_file: None,
        }
    }
}

impl GameConfig {
    /// Parse and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, or the file named by `FLAPPY_CONFIG` when it is set.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("world_width", self.world_width),
            ("world_height", self.world_height),
            ("bird_width", self.bird_width),
            ("bird_height", self.bird_height),
            ("pipe_width", self.pipe_width),
            ("pipe_height", self.pipe_height),
            ("pipe_gap", self.pipe_gap),
        ];
        for (field, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be positive, got {value}"),
                });
            }
        }
        if self.pipe_offsets.is_empty() {
            return Err(ConfigError::Invalid {
                field: "pipe_offsets",
                reason: "needs at least one offset".to_string(),
            });
        }
        if self.spawn_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "spawn_interval_ms",
                reason: "must be non-zero".to_string(),
            });
        }
        if self.power_up_chance == 0 {
            return Err(ConfigError::Invalid {
                field: "power_up_chance",
                reason: "must be non-zero".to_string(),
            });
        }
        if self.target_fps == 0 {
            return Err(ConfigError::Invalid {
                field: "target_fps",
                reason: "must be non-zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn frame_duration(&self) -> std::time::Duration {
        std::time::Duration::from_secs(1) / self.target_fps
    }
}
