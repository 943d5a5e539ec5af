//! ManipulatorConfig: tuning гравипушки
//!
//! Задаётся при создании, в runtime не меняется.
//! Defaults описаны один раз здесь (reference tuning, world units).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Tuning гравипушки (immutable)
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct ManipulatorConfig {
    /// Длина луча acquisition и нормализация falloff
    pub max_reach_distance: f32,
    /// Импульс push на границе reach
    pub min_push_force: f32,
    /// Импульс push в упор
    pub max_push_force: f32,
    /// Скорость сходимости далёкого тела (1/s)
    pub min_pull_speed: f32,
    /// Скорость сходимости близкого тела (1/s)
    pub max_pull_speed: f32,
    /// Сдвиг gravity center от muzzle (fallback aim)
    pub muzzle_offset: f32,
    /// Сдвиг origin от глаза игрока вдоль взгляда
    pub player_muzzle_offset: f32,
    /// Ближе этого тело считается "at rest" → instant mode
    pub snap_threshold: f32,
}

impl Default for ManipulatorConfig {
    fn default() -> Self {
        Self {
            max_reach_distance: 2000.0,
            min_push_force: 1000.0,
            max_push_force: 5000.0,
            min_pull_speed: 5.0,
            max_pull_speed: 50.0,
            muzzle_offset: 50.0,
            player_muzzle_offset: 100.0,
            snap_threshold: 5.0,
        }
    }
}

/// Ошибки валидации tuning'а
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("max_reach_distance must be positive and finite, got {0}")]
    InvalidReach(f32),

    #[error("{field} must be non-negative and finite, got {value}")]
    NegativeValue { field: &'static str, value: f32 },

    #[error("{min_field} ({min}) exceeds {max_field} ({max})")]
    InvertedRange {
        min_field: &'static str,
        min: f32,
        max_field: &'static str,
        max: f32,
    },

    #[error("snap_threshold must be positive, got {0}")]
    InvalidSnapThreshold(f32),
}

impl ManipulatorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_reach_distance.is_finite() && self.max_reach_distance > 0.0) {
            return Err(ConfigError::InvalidReach(self.max_reach_distance));
        }

        let non_negative = [
            ("min_push_force", self.min_push_force),
            ("max_push_force", self.max_push_force),
            ("min_pull_speed", self.min_pull_speed),
            ("max_pull_speed", self.max_pull_speed),
            ("muzzle_offset", self.muzzle_offset),
            ("player_muzzle_offset", self.player_muzzle_offset),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::NegativeValue { field, value });
            }
        }

        check_range("min_push_force", self.min_push_force, "max_push_force", self.max_push_force)?;
        check_range("min_pull_speed", self.min_pull_speed, "max_pull_speed", self.max_pull_speed)?;

        if !(self.snap_threshold.is_finite() && self.snap_threshold > 0.0) {
            return Err(ConfigError::InvalidSnapThreshold(self.snap_threshold));
        }

        Ok(())
    }
}

fn check_range(min_field: &'static str, min: f32, max_field: &'static str, max: f32) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::InvertedRange {
            min_field,
            min,
            max_field,
            max,
        });
    }
    Ok(())
}
