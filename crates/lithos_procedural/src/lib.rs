//! # LITHOS Procedural Generation
//!
//! Deterministic voxel terrain for infinite, reproducible worlds.
//!
//! ## Design Principles
//!
//! 1. **Deterministic**: same seed, coordinate and parameters always
//!    produce the same chunk, in any process
//! 2. **Chunked**: the world is a grid of full-height W×H×W chunks
//! 3. **Eventually consistent edits**: `set` queues, `update` applies
//! 4. **No global state**: each `TerrainManager` is an independent world
//!
//! ## Core Components
//!
//! - `NoiseField`: seeded fractal 3D Perlin noise
//! - `SeededRandom`: uniform and piecewise-linear sampling
//! - `TerrainGenerator`: fills one chunk from noise and column rules
//! - `Chunk`: bounds-checked voxel storage with edit and spawn queues
//! - `TerrainManager`: lazily populated coordinate → chunk registry
//!
//! ## Example
//!
//! ```rust
//! use lithos_procedural::{BlockPos, BlockType, ChunkCoord, GeneratorConfig, TerrainManager};
//!
//! let mut terrain = TerrainManager::new(GeneratorConfig::with_seed(1000)).unwrap();
//! let chunk = terrain.at(ChunkCoord::new(0, 0)).unwrap();
//! assert_eq!(chunk.block_type(BlockPos::new(0, 0, 0)), BlockType::Boundary);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod block;
pub mod chunk;
pub mod config;
pub mod error;
pub mod generator;
pub mod manager;
pub mod noise;
pub mod random;

pub use block::{BlockAttributes, BlockType};
pub use chunk::{
    BlockPos, Chunk, ChunkCoord, EdgeMask, EditBatch, CHUNK_AREA, CHUNK_HEIGHT, CHUNK_WIDTH,
};
pub use config::GeneratorConfig;
pub use error::{TerrainError, TerrainResult};
pub use generator::{CloudMap, TerrainGenerator};
pub use manager::TerrainManager;
pub use noise::{NoiseField, WorldSeed};
pub use random::{PiecewiseLinear, SeededRandom};
