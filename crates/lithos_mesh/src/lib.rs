//! # LITHOS Mesh
//!
//! Face-culled chunk meshes for the LITHOS voxel world.
//!
//! ## Core Components
//!
//! - `ChunkMesh`: visible faces of one chunk, culled against its neighbors
//! - `MeshBuffers`: parallel position/color/UV arrays grouped per material
//! - `MeshRegistry`: one mesh per chunk plus the per-tick edit drain
//!
//! ## Example
//!
//! ```rust
//! use lithos_mesh::MeshRegistry;
//! use lithos_procedural::{ChunkCoord, GeneratorConfig, TerrainManager};
//!
//! let mut terrain = TerrainManager::new(GeneratorConfig::with_seed(1000)).unwrap();
//! terrain.at(ChunkCoord::new(0, 0)).unwrap();
//!
//! let mut meshes = MeshRegistry::new();
//! let mesh = meshes.rebuild(&terrain, ChunkCoord::new(0, 0)).unwrap();
//! assert!(!mesh.buffers().is_empty());
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod buffers;
pub mod builder;
pub mod face;
pub mod registry;

pub use buffers::{FaceGroup, FaceTag, MeshBuffers, VERTICES_PER_FACE};
pub use builder::{ChunkMesh, NeighborCoords, Neighbors};
pub use face::Face;
pub use registry::{MeshRegistry, TickReport};
