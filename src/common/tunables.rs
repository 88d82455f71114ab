//! Tunable gameplay constants.
//!
//! Every field has a default, so a config file only needs to name what it changes:
//!
//! ```toml
//! laser_cooldown = 4.0
//! illusion_spawn_offsets = [[-2.0, 0.0, 0.0], [2.0, 0.0, 0.0]]
//! ```

use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

/// Errors produced while loading or validating [`Tunables`].
#[derive(Debug, Error)]
pub enum TunablesError {
    #[error("failed to read tunables from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse tunables: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid tunable `{field}`: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

#[derive(Resource, Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tunables {
    pub enemy_damage: f32,
    /// Illusion damage is `enemy_damage * illusion_damage_fraction`.
    pub illusion_damage_fraction: f32,
    pub laser_cooldown: f32,
    pub laser_duration: f32,
    pub illusion_respawn_cooldown: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub flyer_speed: f32,
    pub hover_height: f32,
    pub illusion_speed: f32,
    /// One roster slot per offset, relative to the flyer.
    pub illusion_spawn_offsets: Vec<[f32; 3]>,
    pub laser_muzzle_offset: [f32; 3],
    pub player_speed: f32,
    pub player_max_health: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            enemy_damage: 10.0,
            illusion_damage_fraction: 0.5,
            laser_cooldown: 6.0,
            laser_duration: 0.5,
            illusion_respawn_cooldown: 20.0,
            min_distance: 5.0,
            max_distance: 15.0,
            flyer_speed: 5.0,
            hover_height: 3.0,
            illusion_speed: 5.0,
            illusion_spawn_offsets: vec![[-2.5, 0.0, 0.0], [2.5, 0.0, 0.0], [0.0, 0.0, 2.5]],
            laser_muzzle_offset: [0.0, -0.5, -1.0],
            player_speed: 6.0,
            player_max_health: 100.0,
        }
    }
}

impl Tunables {
    pub fn from_toml_str(text: &str) -> Result<Self, TunablesError> {
        let tunables: Self = toml::from_str(text)?;
        tunables.validate()?;
        Ok(tunables)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TunablesError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| TunablesError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), TunablesError> {
        let non_negative = [
            ("enemy_damage", self.enemy_damage),
            ("min_distance", self.min_distance),
            ("max_distance", self.max_distance),
            ("flyer_speed", self.flyer_speed),
            ("hover_height", self.hover_height),
            ("illusion_speed", self.illusion_speed),
            ("player_speed", self.player_speed),
        ];
        for (field, v) in non_negative {
            if !v.is_finite() || v < 0.0 {
                return Err(TunablesError::Invalid { field, reason: "must be a finite, non-negative number" });
            }
        }

        // Timers with a zero period would fire every tick.
        let positive = [
            ("laser_cooldown", self.laser_cooldown),
            ("laser_duration", self.laser_duration),
            ("illusion_respawn_cooldown", self.illusion_respawn_cooldown),
            ("player_max_health", self.player_max_health),
        ];
        for (field, v) in positive {
            if !v.is_finite() || v <= 0.0 {
                return Err(TunablesError::Invalid { field, reason: "must be a finite, positive number" });
            }
        }

        if !(0.0..=1.0).contains(&self.illusion_damage_fraction) {
            return Err(TunablesError::Invalid {
                field: "illusion_damage_fraction",
                reason: "must lie in [0, 1]",
            });
        }

        if self.min_distance > self.max_distance {
            return Err(TunablesError::Invalid {
                field: "min_distance",
                reason: "must not exceed max_distance",
            });
        }

        if !self.illusion_spawn_offsets.iter().flatten().all(|c| c.is_finite()) {
            return Err(TunablesError::Invalid {
                field: "illusion_spawn_offsets",
                reason: "offsets must be finite",
            });
        }

        if !self.laser_muzzle_offset.iter().all(|c| c.is_finite()) {
            return Err(TunablesError::Invalid {
                field: "laser_muzzle_offset",
                reason: "offset must be finite",
            });
        }

        Ok(())
    }

    #[inline]
    pub fn illusion_damage(&self) -> f32 {
        self.enemy_damage * self.illusion_damage_fraction
    }

    pub fn illusion_spawn_offsets(&self) -> Vec<Vec3> {
        self.illusion_spawn_offsets.iter().copied().map(Vec3::from_array).collect()
    }

    #[inline]
    pub fn laser_muzzle_offset(&self) -> Vec3 {
        Vec3::from_array(self.laser_muzzle_offset)
    }
}
