//! # Mesh Registry
//!
//! Owns one [`ChunkMesh`] per meshed chunk and runs the world tick.
//!
//! A chunk's mesh is only correct against the current state of its four
//! neighbors, so an edit on a chunk side also rebuilds the mesh across
//! that side. Every dirty mesh is rebuilt at most once per tick.

use std::collections::{BTreeSet, HashMap};

use lithos_procedural::{ChunkCoord, EdgeMask, TerrainManager, TerrainResult};
use tracing::debug;

use crate::builder::{ChunkMesh, Neighbors};

/// What one [`MeshRegistry::tick`] did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Edits applied across all chunks.
    pub edits: usize,
    /// Spawns that became ready and were queued as edits.
    pub spawned: usize,
    /// Meshes rebuilt.
    pub rebuilt: usize,
}

/// Meshes keyed by chunk coordinate.
#[derive(Debug, Default)]
pub struct MeshRegistry {
    meshes: HashMap<ChunkCoord, ChunkMesh>,
}

impl MeshRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds or rebuilds the mesh at `coord` against its current
    /// neighbors. Returns `None` if the chunk is not loaded.
    pub fn rebuild(&mut self, terrain: &TerrainManager, coord: ChunkCoord) -> Option<&ChunkMesh> {
        let chunk = terrain.get(coord)?;
        let neighbors = Neighbors::around(terrain, coord);
        let mesh = self
            .meshes
            .entry(coord)
            .or_insert_with(|| ChunkMesh::new(coord));
        mesh.rebuild(chunk, &neighbors);
        Some(&*mesh)
    }

    /// Rebuilds `coord` and every already-meshed neighbor, so seams that
    /// were hidden against a missing chunk open up once it loads.
    ///
    /// Returns the number of meshes rebuilt.
    pub fn rebuild_with_neighbors(&mut self, terrain: &TerrainManager, coord: ChunkCoord) -> usize {
        let mut rebuilt = usize::from(self.rebuild(terrain, coord).is_some());
        for neighbor in [coord.right(), coord.left(), coord.back(), coord.front()] {
            if self.meshes.contains_key(&neighbor) && self.rebuild(terrain, neighbor).is_some() {
                rebuilt += 1;
            }
        }
        rebuilt
    }

    /// Mesh at `coord`, if one was built.
    #[must_use]
    pub fn get(&self, coord: ChunkCoord) -> Option<&ChunkMesh> {
        self.meshes.get(&coord)
    }

    /// Mutable mesh at `coord`, for [`ChunkMesh::on_update`].
    pub fn get_mut(&mut self, coord: ChunkCoord) -> Option<&mut ChunkMesh> {
        self.meshes.get_mut(&coord)
    }

    /// Drops the mesh at `coord`.
    pub fn remove(&mut self, coord: ChunkCoord) -> Option<ChunkMesh> {
        self.meshes.remove(&coord)
    }

    /// Number of meshes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// True if no mesh is held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Runs one world tick.
    ///
    /// For every loaded chunk, in coordinate order: ready spawns are
    /// queued as edits, then the edit queue is drained. Afterwards each
    /// meshed chunk that changed, or whose neighbor changed along the
    /// shared side, is rebuilt once.
    ///
    /// # Errors
    ///
    /// Propagates edit failures. Chunks drained before the failure keep
    /// their edits; no mesh is rebuilt.
    pub fn tick(&mut self, terrain: &mut TerrainManager) -> TerrainResult<TickReport> {
        let mut report = TickReport::default();
        let mut dirty = BTreeSet::new();

        for coord in terrain.coords() {
            let Some(chunk) = terrain.get_mut(coord) else {
                continue;
            };

            for (pos, block) in chunk.spawn() {
                chunk.set(pos, block, block.default_attributes())?;
                report.spawned += 1;
            }

            let batch = chunk.update()?;
            if batch.is_empty() {
                continue;
            }
            report.edits += batch.applied;
            dirty.insert(coord);

            let sides = [
                (EdgeMask::RIGHT, coord.right()),
                (EdgeMask::LEFT, coord.left()),
                (EdgeMask::BACK, coord.back()),
                (EdgeMask::FRONT, coord.front()),
            ];
            for (edge, neighbor) in sides {
                if batch.edges.contains(edge) {
                    dirty.insert(neighbor);
                }
            }
        }

        for coord in dirty {
            if self.meshes.contains_key(&coord) && self.rebuild(terrain, coord).is_some() {
                report.rebuilt += 1;
            }
        }

        if report != TickReport::default() {
            debug!(
                edits = report.edits,
                spawned = report.spawned,
                rebuilt = report.rebuilt,
                "world tick"
            );
        }
        Ok(report)
    }
}
