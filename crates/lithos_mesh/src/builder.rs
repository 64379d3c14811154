//! # Chunk Mesh Builder
//!
//! Derives the visible shell of one chunk, culled against itself and its
//! four horizontal neighbors.
//!
//! ## Culling Rules
//!
//! - Interior neighbor: occluded iff it is not air
//! - Across a chunk side: look at the adjacent chunk's mirrored column;
//!   a missing neighbor counts as occluded so world edges never show holes
//! - Below y = 0: always occluded
//! - Above the chunk top: always exposed
//!
//! Each column is scanned downward from its cached height. The scan stops
//! at the first non-air voxel with no exposed face: generation never
//! leaves air beneath the surface, so everything lower is interior.

use lithos_procedural::{BlockPos, BlockType, Chunk, ChunkCoord, EditBatch, TerrainManager};
use lithos_procedural::{TerrainResult, CHUNK_HEIGHT, CHUNK_WIDTH};
use tracing::{debug, warn};

use crate::buffers::{FaceTag, MeshBuffers, Quad};
use crate::face::Face;

#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
const WIDTH_I32: i32 = CHUNK_WIDTH as i32;

#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
const HEIGHT_I32: i32 = CHUNK_HEIGHT as i32;

/// Borrowed neighbor chunks for one rebuild. `None` means not loaded.
#[derive(Clone, Copy, Debug, Default)]
pub struct Neighbors<'a> {
    /// Chunk at +X.
    pub right: Option<&'a Chunk>,
    /// Chunk at -X.
    pub left: Option<&'a Chunk>,
    /// Chunk at +Z.
    pub back: Option<&'a Chunk>,
    /// Chunk at -Z.
    pub front: Option<&'a Chunk>,
}

impl<'a> Neighbors<'a> {
    /// No neighbors at all.
    pub const NONE: Self = Self {
        right: None,
        left: None,
        back: None,
        front: None,
    };

    /// Looks up the four chunks around `coord` without generating any.
    #[must_use]
    pub fn around(terrain: &'a TerrainManager, coord: ChunkCoord) -> Self {
        Self {
            right: terrain.get(coord.right()),
            left: terrain.get(coord.left()),
            back: terrain.get(coord.back()),
            front: terrain.get(coord.front()),
        }
    }

    /// Block across a chunk side, or `None` if that neighbor is missing.
    ///
    /// `pos` is a position just outside `[0, W)` on x or z.
    fn across(&self, pos: BlockPos) -> Option<BlockType> {
        let (chunk, local) = if pos.x >= WIDTH_I32 {
            (self.right?, BlockPos::new(0, pos.y, pos.z))
        } else if pos.x < 0 {
            (self.left?, BlockPos::new(WIDTH_I32 - 1, pos.y, pos.z))
        } else if pos.z >= WIDTH_I32 {
            (self.back?, BlockPos::new(pos.x, pos.y, 0))
        } else {
            (self.front?, BlockPos::new(pos.x, pos.y, WIDTH_I32 - 1))
        };
        Some(chunk.block_type(local))
    }
}

/// Coordinates of the neighbors present at the last rebuild.
///
/// Held by coordinate, never by reference: a neighbor evicted since then
/// simply resolves to `None`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NeighborCoords {
    /// Coordinate at +X, if it was loaded.
    pub right: Option<ChunkCoord>,
    /// Coordinate at -X, if it was loaded.
    pub left: Option<ChunkCoord>,
    /// Coordinate at +Z, if it was loaded.
    pub back: Option<ChunkCoord>,
    /// Coordinate at -Z, if it was loaded.
    pub front: Option<ChunkCoord>,
}

impl NeighborCoords {
    /// Borrows the chunks that are still loaded.
    #[must_use]
    pub fn resolve(self, terrain: &TerrainManager) -> Neighbors<'_> {
        Neighbors {
            right: self.right.and_then(|c| terrain.get(c)),
            left: self.left.and_then(|c| terrain.get(c)),
            back: self.back.and_then(|c| terrain.get(c)),
            front: self.front.and_then(|c| terrain.get(c)),
        }
    }

    /// Number of remembered neighbors.
    #[must_use]
    pub fn count(self) -> usize {
        [self.right, self.left, self.back, self.front]
            .iter()
            .filter(|c| c.is_some())
            .count()
    }
}

/// Face list of one chunk.
#[derive(Clone, Debug)]
pub struct ChunkMesh {
    coord: ChunkCoord,
    buffers: MeshBuffers,
    known: NeighborCoords,
    quads: Vec<Quad>,
}

impl ChunkMesh {
    /// Creates an empty mesh for the chunk at `coord`.
    #[must_use]
    pub fn new(coord: ChunkCoord) -> Self {
        Self {
            coord,
            buffers: MeshBuffers::new(),
            known: NeighborCoords::default(),
            quads: Vec::new(),
        }
    }

    /// Chunk this mesh belongs to.
    #[inline]
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Current vertex data.
    #[inline]
    #[must_use]
    pub const fn buffers(&self) -> &MeshBuffers {
        &self.buffers
    }

    /// Neighbors remembered from the last rebuild.
    #[inline]
    #[must_use]
    pub const fn known_neighbors(&self) -> NeighborCoords {
        self.known
    }

    /// Regenerates the face list from `chunk` and `neighbors`.
    pub fn rebuild(&mut self, chunk: &Chunk, neighbors: &Neighbors<'_>) {
        self.coord = chunk.coord();
        self.known = NeighborCoords {
            right: neighbors.right.map(Chunk::coord),
            left: neighbors.left.map(Chunk::coord),
            back: neighbors.back.map(Chunk::coord),
            front: neighbors.front.map(Chunk::coord),
        };

        self.quads.clear();
        for z in 0..WIDTH_I32 {
            for x in 0..WIDTH_I32 {
                scan_column(chunk, neighbors, x, z, &mut self.quads);
            }
        }
        self.buffers.fill(&mut self.quads);

        debug!(
            chunk = ?self.coord,
            faces = self.buffers.face_count(),
            neighbors = self.known.count(),
            "mesh rebuilt"
        );
    }

    /// Drains the chunk's edit queue and rebuilds once if anything changed,
    /// against the neighbors seen at the last rebuild.
    ///
    /// A chunk no longer in `terrain` yields an empty batch.
    ///
    /// # Errors
    ///
    /// Propagates [`Chunk::update`] failures.
    pub fn on_update(&mut self, terrain: &mut TerrainManager) -> TerrainResult<EditBatch> {
        let Some(chunk) = terrain.get_mut(self.coord) else {
            warn!(chunk = ?self.coord, "update for unloaded chunk");
            return Ok(EditBatch::default());
        };

        let batch = chunk.update()?;
        if batch.is_empty() {
            return Ok(batch);
        }

        let known = self.known;
        let neighbors = known.resolve(terrain);
        if let Some(chunk) = terrain.get(self.coord) {
            self.rebuild(chunk, &neighbors);
        }
        Ok(batch)
    }
}

/// Emits the exposed faces of one column, top down.
fn scan_column(chunk: &Chunk, neighbors: &Neighbors<'_>, x: i32, z: i32, quads: &mut Vec<Quad>) {
    let top = i32::try_from(chunk.height(x, z)).unwrap_or(HEIGHT_I32 - 1);

    for y in (0..=top).rev() {
        let pos = BlockPos::new(x, y, z);
        let material = chunk.block_type(pos);
        if material == BlockType::Air {
            continue;
        }

        let before = quads.len();
        for face in Face::ALL {
            if is_exposed(chunk, neighbors, pos, face) {
                quads.push(Quad {
                    origin: [x, y, z],
                    tag: FaceTag { material, face },
                });
            }
        }
        if quads.len() == before {
            break;
        }
    }
}

fn is_exposed(chunk: &Chunk, neighbors: &Neighbors<'_>, pos: BlockPos, face: Face) -> bool {
    let [dx, dy, dz] = face.offset();
    let next = BlockPos::new(pos.x + dx, pos.y + dy, pos.z + dz);

    if next.y < 0 {
        return false;
    }
    if next.y >= HEIGHT_I32 {
        return true;
    }
    if next.in_bounds() {
        return chunk.block_type(next) == BlockType::Air;
    }
    neighbors
        .across(next)
        .is_some_and(|block| block == BlockType::Air)
}
