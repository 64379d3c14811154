//! # Terrain Error Types
//!
//! All errors that can occur while generating or editing terrain.
//!
//! Reads never fail: probing outside a chunk yields air. Only writes,
//! parameter validation and chunk allocation produce errors. The y = 0
//! floor only ever holds the boundary block.

use thiserror::Error;

use crate::chunk::ChunkCoord;

/// Errors that can occur in the procedural terrain system.
#[derive(Error, Debug)]
pub enum TerrainError {
    /// A generation parameter is outside its accepted range.
    #[error("invalid parameter `{name}`: {value}")]
    InvalidParameter {
        /// Parameter name as it appears in the configuration.
        name: &'static str,
        /// Offending value, formatted for display.
        value: String,
    },

    /// Chunk coordinate exceeds the generator's configured bound.
    #[error("chunk coordinate ({}, {}) outside generator bound {max}", coord.x, coord.z)]
    CoordinateOutOfRange {
        /// The rejected coordinate.
        coord: ChunkCoord,
        /// Exclusive bound on the coordinate magnitude.
        max: u32,
    },

    /// A blend or distribution range is malformed.
    #[error("malformed range: min {min} > max {max}")]
    InvalidRange {
        /// Lower end of the range.
        min: f64,
        /// Upper end of the range.
        max: f64,
    },

    /// A voxel write targeted a position outside the chunk.
    #[error("voxel position ({x}, {y}, {z}) outside chunk")]
    PositionOutOfRange {
        /// Local X.
        x: i32,
        /// Y level.
        y: i32,
        /// Local Z.
        z: i32,
    },

    /// A write would replace the boundary floor at y = 0.
    #[error("column ({x}, {z}) boundary floor is read-only")]
    BoundaryWrite {
        /// Local X.
        x: i32,
        /// Local Z.
        z: i32,
    },

    /// Chunk storage could not be allocated.
    #[error("failed to allocate {bytes} bytes of chunk storage")]
    Allocation {
        /// Requested size in bytes.
        bytes: usize,
    },

    /// Configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Configuration file could not be read.
    #[error("configuration I/O: {0}")]
    Io(#[from] std::io::Error),
}

impl TerrainError {
    /// Shorthand for [`TerrainError::InvalidParameter`].
    pub(crate) fn parameter(name: &'static str, value: impl std::fmt::Display) -> Self {
        Self::InvalidParameter {
            name,
            value: value.to_string(),
        }
    }
}

/// Result type for terrain operations.
pub type TerrainResult<T> = Result<T, TerrainError>;
