//! # Generator Configuration
//!
//! Every terrain parameter in one serde-friendly struct, loadable from TOML.
//!
//! ```toml
//! seed = 1000
//! octaves = 4
//! amplitude = 1.0
//! persistence = 0.5
//! ```
//!
//! Missing keys fall back to [`GeneratorConfig::default`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::chunk::CHUNK_HEIGHT;
use crate::error::{TerrainError, TerrainResult};
use crate::noise::{MIN_AMPLITUDE, MIN_PERSISTENCE};

/// Parameters for the terrain generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// World seed.
    pub seed: u32,
    /// Elevation noise octaves.
    pub octaves: u32,
    /// Elevation noise base amplitude.
    pub amplitude: f64,
    /// Elevation noise per-octave weight multiplier.
    pub persistence: f64,
    /// Exclusive bound on chunk coordinate magnitude.
    pub max_chunk_coord: u32,
    /// World blocks per noise unit.
    pub scale: f64,
    /// Lowest column surface.
    pub height_min: usize,
    /// Highest column surface.
    pub height_max: usize,
    /// Sea level: columns below it are underwater.
    pub dirt_threshold: usize,
    /// Land columns at or above this height get a snow cap.
    pub snow_threshold: usize,
    /// Thickness of the dirt/stone blend band under land surfaces.
    pub dirt_depth: usize,
    /// Thickness of the sand/stone blend band under sea beds.
    pub sand_depth: usize,
    /// Cloud noise octaves.
    pub cloud_octaves: u32,
    /// World blocks per cloud-noise unit.
    pub cloud_scale: f64,
    /// Cloud density above which a column is covered.
    pub cloud_threshold: f64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 1000,
            octaves: 4,
            amplitude: 1.0,
            persistence: 0.5,
            max_chunk_coord: 1 << 20,
            scale: 64.0,
            height_min: 8,
            height_max: 96,
            dirt_threshold: 32,
            snow_threshold: 72,
            dirt_depth: 4,
            sand_depth: 3,
            cloud_octaves: 2,
            cloud_scale: 48.0,
            cloud_threshold: 0.2,
        }
    }
}

impl GeneratorConfig {
    /// Default configuration with a different seed.
    #[must_use]
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::Config`] on malformed TOML or unknown keys,
    /// and [`TerrainError::InvalidParameter`] if validation fails.
    pub fn from_toml_str(source: &str) -> TerrainResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// As [`GeneratorConfig::from_toml_str`], plus [`TerrainError::Io`] if
    /// the file cannot be read.
    pub fn load(path: impl AsRef<Path>) -> TerrainResult<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Checks every parameter.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidParameter`] naming the first bad field.
    pub fn validate(&self) -> TerrainResult<()> {
        if self.octaves == 0 {
            return Err(TerrainError::parameter("octaves", self.octaves));
        }
        if !self.amplitude.is_finite() || self.amplitude < MIN_AMPLITUDE {
            return Err(TerrainError::parameter("amplitude", self.amplitude));
        }
        if !self.persistence.is_finite() || self.persistence < MIN_PERSISTENCE {
            return Err(TerrainError::parameter("persistence", self.persistence));
        }
        if self.max_chunk_coord == 0 {
            return Err(TerrainError::parameter("max_chunk_coord", self.max_chunk_coord));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(TerrainError::parameter("scale", self.scale));
        }
        if self.height_min == 0 {
            return Err(TerrainError::parameter("height_min", self.height_min));
        }
        if self.height_max <= self.height_min || self.height_max >= CHUNK_HEIGHT {
            return Err(TerrainError::parameter("height_max", self.height_max));
        }
        if self.dirt_threshold >= CHUNK_HEIGHT {
            return Err(TerrainError::parameter("dirt_threshold", self.dirt_threshold));
        }
        if self.cloud_octaves == 0 {
            return Err(TerrainError::parameter("cloud_octaves", self.cloud_octaves));
        }
        if !self.cloud_scale.is_finite() || self.cloud_scale <= 0.0 {
            return Err(TerrainError::parameter("cloud_scale", self.cloud_scale));
        }
        if !self.cloud_threshold.is_finite() {
            return Err(TerrainError::parameter("cloud_threshold", self.cloud_threshold));
        }
        Ok(())
    }
}
