//! # Terrain Manager
//!
//! Coordinate-keyed registry owning every chunk of one world.
//!
//! Chunks are generated lazily and synchronously the first time
//! [`TerrainManager::at`] sees their coordinate. There is no internal
//! locking; callers serialize access to a manager.
//!
//! ```rust
//! use lithos_procedural::{ChunkCoord, GeneratorConfig, TerrainManager};
//!
//! let mut terrain = TerrainManager::new(GeneratorConfig::with_seed(42)).unwrap();
//! let chunk = terrain.at(ChunkCoord::new(0, 0)).unwrap();
//! assert!(chunk.height(0, 0) > 0);
//! assert!(terrain.contains(ChunkCoord::new(0, 0)));
//! ```

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::{debug, info};

use crate::chunk::{Chunk, ChunkCoord};
use crate::config::GeneratorConfig;
use crate::error::TerrainResult;
use crate::generator::TerrainGenerator;

/// Owns the chunk registry and the world's single generator.
#[derive(Debug)]
pub struct TerrainManager {
    chunks: HashMap<ChunkCoord, Chunk>,
    generator: TerrainGenerator,
}

impl TerrainManager {
    /// Creates an empty world.
    ///
    /// # Errors
    ///
    /// Returns [`crate::TerrainError::InvalidParameter`] for a rejected
    /// configuration.
    pub fn new(config: GeneratorConfig) -> TerrainResult<Self> {
        Ok(Self::with_generator(TerrainGenerator::new(config)?))
    }

    /// Creates an empty world around an existing generator.
    #[must_use]
    pub fn with_generator(generator: TerrainGenerator) -> Self {
        info!(seed = generator.config().seed, "terrain manager created");
        Self {
            chunks: HashMap::new(),
            generator,
        }
    }

    /// Returns the chunk at `coord`, generating it on first access.
    ///
    /// A second call for the same coordinate returns the stored chunk
    /// without regenerating it. Lookups that must not generate go through
    /// [`TerrainManager::get`] instead.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lithos_procedural::{ChunkCoord, GeneratorConfig, TerrainManager};
    ///
    /// let mut terrain = TerrainManager::new(GeneratorConfig::default()).unwrap();
    /// let coord = ChunkCoord::new(2, -1);
    /// assert!(terrain.get(coord).is_none());
    ///
    /// terrain.at(coord).unwrap();
    /// assert!(terrain.get(coord).is_some());
    /// assert_eq!(terrain.len(), 1);
    /// ```
    ///
    /// # Errors
    ///
    /// Propagates allocation and generation failures; nothing is inserted
    /// in that case.
    pub fn at(&mut self, coord: ChunkCoord) -> TerrainResult<&mut Chunk> {
        match self.chunks.entry(coord) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let mut chunk = Chunk::new(coord)?;
                self.generator.chunk(coord, &mut chunk)?;
                debug!(x = coord.x, z = coord.z, "chunk registered");
                Ok(entry.insert(chunk))
            }
        }
    }

    /// Returns the chunk at `coord` only if it already exists.
    #[must_use]
    pub fn get(&self, coord: ChunkCoord) -> Option<&Chunk> {
        self.chunks.get(&coord)
    }

    /// Mutable access to an existing chunk; never generates.
    pub fn get_mut(&mut self, coord: ChunkCoord) -> Option<&mut Chunk> {
        self.chunks.get_mut(&coord)
    }

    /// True if a chunk exists at `coord`. No side effects.
    #[must_use]
    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains_key(&coord)
    }

    /// Evicts a chunk, handing ownership back to the caller.
    pub fn remove(&mut self, coord: ChunkCoord) -> Option<Chunk> {
        self.chunks.remove(&coord)
    }

    /// Number of registered chunks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// True if no chunk is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Registered coordinates, sorted.
    #[must_use]
    pub fn coords(&self) -> Vec<ChunkCoord> {
        let mut coords: Vec<_> = self.chunks.keys().copied().collect();
        coords.sort_unstable();
        coords
    }

    /// The world's generator.
    #[must_use]
    pub const fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{BlockAttributes, BlockType};
    use crate::chunk::BlockPos;
    use crate::error::TerrainError;

    fn manager() -> TerrainManager {
        TerrainManager::new(GeneratorConfig::default()).unwrap()
    }

    #[test]
    fn test_at_generates_once() {
        let mut terrain = manager();
        let coord = ChunkCoord::new(1, 1);
        assert!(!terrain.contains(coord));

        let pos = BlockPos::new(4, 120, 4);
        terrain
            .at(coord)
            .unwrap()
            .set_block(pos, BlockType::Stone, BlockAttributes::BREAKABLE)
            .unwrap();

        // The edit survives, so the chunk was not regenerated.
        assert_eq!(terrain.at(coord).unwrap().block_type(pos), BlockType::Stone);
        assert_eq!(terrain.len(), 1);
    }

    #[test]
    fn test_get_never_generates() {
        let mut terrain = manager();
        let coord = ChunkCoord::new(-2, 3);
        assert!(terrain.get(coord).is_none());
        assert!(terrain.get_mut(coord).is_none());
        assert!(terrain.is_empty());
    }

    #[test]
    fn test_failed_generation_inserts_nothing() {
        let mut terrain = TerrainManager::new(GeneratorConfig {
            max_chunk_coord: 2,
            ..GeneratorConfig::default()
        })
        .unwrap();
        let coord = ChunkCoord::new(5, 0);
        assert!(matches!(
            terrain.at(coord),
            Err(TerrainError::CoordinateOutOfRange { .. })
        ));
        assert!(!terrain.contains(coord));
    }

    #[test]
    fn test_remove_and_coords() {
        let mut terrain = manager();
        for coord in [ChunkCoord::new(1, 0), ChunkCoord::new(0, 0), ChunkCoord::new(0, -1)] {
            terrain.at(coord).unwrap();
        }
        assert_eq!(
            terrain.coords(),
            vec![ChunkCoord::new(0, -1), ChunkCoord::new(0, 0), ChunkCoord::new(1, 0)]
        );

        let removed = terrain.remove(ChunkCoord::new(0, 0)).unwrap();
        assert_eq!(removed.coord(), ChunkCoord::new(0, 0));
        assert!(!terrain.contains(ChunkCoord::new(0, 0)));
        assert_eq!(terrain.len(), 2);
    }

    #[test]
    fn test_independent_worlds() {
        let mut a = TerrainManager::new(GeneratorConfig::with_seed(1)).unwrap();
        let mut b = TerrainManager::new(GeneratorConfig::with_seed(1)).unwrap();
        let coord = ChunkCoord::new(0, 0);

        let pos = BlockPos::new(0, 1, 0);
        a.at(coord)
            .unwrap()
            .set_block(pos, BlockType::Air, BlockAttributes::empty())
            .unwrap();
        assert_ne!(
            a.at(coord).unwrap().block_type(pos),
            b.at(coord).unwrap().block_type(pos)
        );
    }
}
