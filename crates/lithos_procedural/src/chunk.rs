//! # Chunk Storage
//!
//! A chunk is a full-height W×H×W column of voxels addressed by a 2D
//! chunk coordinate.
//!
//! ## Layout
//!
//! Block types and attributes live in two parallel flat buffers indexed
//! as `[y][z][x]` through [`Chunk::index`], the only place bounds are
//! checked. A W×W height map caches the topmost selectable y per column.
//!
//! ## Deferred work
//!
//! - [`Chunk::set`] queues an edit; nothing changes until [`Chunk::update`].
//! - [`Chunk::set_spawn`] queues a delayed spawn; [`Chunk::spawn`] ticks it.

use std::collections::VecDeque;

use bitflags::bitflags;
use tracing::trace;

use crate::block::{BlockAttributes, BlockType};
use crate::error::{TerrainError, TerrainResult};

/// Chunk width/depth in blocks.
pub const CHUNK_WIDTH: usize = 16;

/// Chunk height in blocks.
pub const CHUNK_HEIGHT: usize = 128;

/// Columns per chunk.
pub const CHUNK_AREA: usize = CHUNK_WIDTH * CHUNK_WIDTH;

/// Total blocks per chunk.
pub const BLOCKS_PER_CHUNK: usize = CHUNK_AREA * CHUNK_HEIGHT;

#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
const WIDTH_I32: i32 = CHUNK_WIDTH as i32;

#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
const HEIGHT_I32: i32 = CHUNK_HEIGHT as i32;

/// Chunk coordinate (identifies a chunk in the world grid).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// X coordinate (in chunks, not blocks).
    pub x: i32,
    /// Z coordinate (in chunks, not blocks).
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Converts world block coordinates to chunk coordinate.
    #[inline]
    #[must_use]
    pub const fn from_block_pos(block_x: i32, block_z: i32) -> Self {
        Self {
            x: block_x.div_euclid(WIDTH_I32),
            z: block_z.div_euclid(WIDTH_I32),
        }
    }

    /// Returns the world X coordinate of the chunk's origin (corner).
    #[inline]
    #[must_use]
    pub const fn world_x(self) -> i64 {
        self.x as i64 * WIDTH_I32 as i64
    }

    /// Returns the world Z coordinate of the chunk's origin.
    #[inline]
    #[must_use]
    pub const fn world_z(self) -> i64 {
        self.z as i64 * WIDTH_I32 as i64
    }

    /// Coordinate offset by whole chunks.
    #[inline]
    #[must_use]
    pub const fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            x: self.x.wrapping_add(dx),
            z: self.z.wrapping_add(dz),
        }
    }

    /// Neighbor across the +X edge.
    #[inline]
    #[must_use]
    pub const fn right(self) -> Self {
        self.offset(1, 0)
    }

    /// Neighbor across the -X edge.
    #[inline]
    #[must_use]
    pub const fn left(self) -> Self {
        self.offset(-1, 0)
    }

    /// Neighbor across the +Z edge.
    #[inline]
    #[must_use]
    pub const fn back(self) -> Self {
        self.offset(0, 1)
    }

    /// Neighbor across the -Z edge.
    #[inline]
    #[must_use]
    pub const fn front(self) -> Self {
        self.offset(0, -1)
    }
}

/// Local voxel position inside a chunk.
///
/// Signed so callers can probe one cell past an edge; such reads yield air.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BlockPos {
    /// Local X.
    pub x: i32,
    /// Y level.
    pub y: i32,
    /// Local Z.
    pub z: i32,
}

impl BlockPos {
    /// Creates a new position.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// True if the position lies inside a chunk.
    #[inline]
    #[must_use]
    pub const fn in_bounds(self) -> bool {
        self.x >= 0
            && self.x < WIDTH_I32
            && self.y >= 0
            && self.y < HEIGHT_I32
            && self.z >= 0
            && self.z < WIDTH_I32
    }

    /// Chunk sides this position touches.
    #[must_use]
    pub fn edges(self) -> EdgeMask {
        let mut mask = EdgeMask::empty();
        mask.set(EdgeMask::LEFT, self.x == 0);
        mask.set(EdgeMask::RIGHT, self.x == WIDTH_I32 - 1);
        mask.set(EdgeMask::FRONT, self.z == 0);
        mask.set(EdgeMask::BACK, self.z == WIDTH_I32 - 1);
        mask
    }
}

bitflags! {
    /// Set of chunk sides.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EdgeMask: u8 {
        /// The +X side.
        const RIGHT = 1 << 0;
        /// The -X side.
        const LEFT = 1 << 1;
        /// The +Z side.
        const BACK = 1 << 2;
        /// The -Z side.
        const FRONT = 1 << 3;
    }
}

impl Default for EdgeMask {
    fn default() -> Self {
        Self::empty()
    }
}

/// A queued voxel write.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PendingEdit {
    /// Target position.
    pub pos: BlockPos,
    /// New material.
    pub block: BlockType,
    /// New attributes.
    pub attributes: BlockAttributes,
}

/// A queued delayed spawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct SpawnEntry {
    /// Where the block should appear.
    pub pos: BlockPos,
    /// Ticks left before the spawn is ready.
    pub countdown: u32,
    /// Material to spawn.
    pub block: BlockType,
}

/// Outcome of draining the edit queue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EditBatch {
    /// Number of edits applied.
    pub applied: usize,
    /// Sides touched by at least one applied edit.
    pub edges: EdgeMask,
}

impl EditBatch {
    /// True if no edit was applied.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.applied == 0
    }
}

/// A chunk of world data.
#[derive(Clone)]
pub struct Chunk {
    coord: ChunkCoord,
    /// Block types (indexed as [y][z][x]).
    blocks: Vec<BlockType>,
    /// Attributes, parallel to `blocks`.
    attributes: Vec<BlockAttributes>,
    /// Topmost selectable y per column (indexed as [z][x]).
    height_map: [u16; CHUNK_AREA],
    pending: VecDeque<PendingEdit>,
    active: bool,
    spawns: Vec<SpawnEntry>,
}

impl std::fmt::Debug for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunk")
            .field("coord", &self.coord)
            .field("active", &self.active)
            .field("pending", &self.pending.len())
            .field("spawns", &self.spawns.len())
            .finish_non_exhaustive()
    }
}

impl Chunk {
    /// Creates an all-air chunk at the given coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::Allocation`] if the voxel buffers cannot be
    /// reserved.
    pub fn new(coord: ChunkCoord) -> TerrainResult<Self> {
        let mut blocks = Vec::new();
        blocks
            .try_reserve_exact(BLOCKS_PER_CHUNK)
            .map_err(|_| TerrainError::Allocation {
                bytes: BLOCKS_PER_CHUNK * std::mem::size_of::<BlockType>(),
            })?;
        blocks.resize(BLOCKS_PER_CHUNK, BlockType::Air);

        let mut attributes = Vec::new();
        attributes
            .try_reserve_exact(BLOCKS_PER_CHUNK)
            .map_err(|_| TerrainError::Allocation {
                bytes: BLOCKS_PER_CHUNK * std::mem::size_of::<BlockAttributes>(),
            })?;
        attributes.resize(BLOCKS_PER_CHUNK, BlockAttributes::empty());

        Ok(Self {
            coord,
            blocks,
            attributes,
            height_map: [0; CHUNK_AREA],
            pending: VecDeque::new(),
            active: false,
            spawns: Vec::new(),
        })
    }

    /// Chunk position in the world.
    #[inline]
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// Flat buffer index, or `None` outside the chunk.
    #[inline]
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn index(pos: BlockPos) -> Option<usize> {
        if pos.in_bounds() {
            Some((pos.y as usize * CHUNK_WIDTH + pos.z as usize) * CHUNK_WIDTH + pos.x as usize)
        } else {
            None
        }
    }

    #[inline]
    #[allow(clippy::cast_sign_loss)]
    const fn column(x: i32, z: i32) -> Option<usize> {
        if x >= 0 && x < WIDTH_I32 && z >= 0 && z < WIDTH_I32 {
            Some(z as usize * CHUNK_WIDTH + x as usize)
        } else {
            None
        }
    }

    /// Block type at a local position; air outside the chunk.
    #[inline]
    #[must_use]
    pub fn block_type(&self, pos: BlockPos) -> BlockType {
        Self::index(pos).map_or(BlockType::Air, |i| self.blocks[i])
    }

    /// Attributes at a local position; empty outside the chunk.
    #[inline]
    #[must_use]
    pub fn attributes(&self, pos: BlockPos) -> BlockAttributes {
        Self::index(pos).map_or(BlockAttributes::empty(), |i| self.attributes[i])
    }

    /// Topmost selectable y in a column; 0 outside the chunk or if the
    /// column holds nothing selectable.
    #[inline]
    #[must_use]
    pub fn height(&self, x: i32, z: i32) -> usize {
        Self::column(x, z).map_or(0, |c| usize::from(self.height_map[c]))
    }

    /// Rejects writes outside the chunk and writes that would put
    /// anything but the boundary block on the y = 0 floor.
    fn check_write(pos: BlockPos, block: BlockType) -> TerrainResult<()> {
        if !pos.in_bounds() {
            return Err(TerrainError::PositionOutOfRange {
                x: pos.x,
                y: pos.y,
                z: pos.z,
            });
        }
        if pos.y == 0 && block != BlockType::Boundary {
            return Err(TerrainError::BoundaryWrite { x: pos.x, z: pos.z });
        }
        Ok(())
    }

    /// Writes a voxel immediately and returns the column's new height.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::PositionOutOfRange`] for positions outside
    /// the chunk and [`TerrainError::BoundaryWrite`] for a non-boundary
    /// block at y = 0. Nothing is clamped and a rejected write changes
    /// nothing.
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    pub fn set_block(
        &mut self,
        pos: BlockPos,
        block: BlockType,
        attributes: BlockAttributes,
    ) -> TerrainResult<usize> {
        Self::check_write(pos, block)?;
        let index = Self::index(pos).ok_or(TerrainError::PositionOutOfRange {
            x: pos.x,
            y: pos.y,
            z: pos.z,
        })?;
        self.blocks[index] = block;
        self.attributes[index] = attributes;

        // In bounds, so x/z/y are non-negative and y < CHUNK_HEIGHT.
        let column = pos.z as usize * CHUNK_WIDTH + pos.x as usize;
        let y = pos.y as usize;
        let current = usize::from(self.height_map[column]);

        let height = if block.is_selectable() {
            current.max(y)
        } else if y == current {
            self.rescan_column(pos.x, pos.z)
        } else {
            current
        };

        self.height_map[column] = height as u16;
        Ok(height)
    }

    /// Walks a column from the top down to the first selectable block.
    ///
    /// A column with nothing selectable reports 0.
    fn rescan_column(&self, x: i32, z: i32) -> usize {
        (0..HEIGHT_I32)
            .rev()
            .find(|&y| self.block_type(BlockPos::new(x, y, z)).is_selectable())
            .map_or(0, |y| y as usize)
    }

    /// Queues an edit to be applied by the next [`Chunk::update`].
    ///
    /// # Errors
    ///
    /// Fails like [`Chunk::set_block`]; rejected edits are never queued.
    pub fn set(
        &mut self,
        pos: BlockPos,
        block: BlockType,
        attributes: BlockAttributes,
    ) -> TerrainResult<()> {
        Self::check_write(pos, block)?;
        trace!(chunk = ?self.coord, ?pos, ?block, "queued edit");
        self.pending.push_back(PendingEdit {
            pos,
            block,
            attributes,
        });
        self.active = true;
        Ok(())
    }

    /// Applies every queued edit in FIFO order.
    ///
    /// No-op when the chunk is inactive.
    ///
    /// # Errors
    ///
    /// Propagates [`Chunk::set_block`] failures. Edits before the failing
    /// one are applied; the failing edit stays at the front of the queue
    /// with the rest behind it, and the chunk stays active.
    pub fn update(&mut self) -> TerrainResult<EditBatch> {
        if !self.active {
            return Ok(EditBatch::default());
        }

        let mut batch = EditBatch::default();
        while let Some(edit) = self.pending.pop_front() {
            if let Err(err) = self.set_block(edit.pos, edit.block, edit.attributes) {
                self.pending.push_front(edit);
                return Err(err);
            }
            batch.applied += 1;
            batch.edges |= edit.pos.edges();
        }
        self.active = false;

        trace!(chunk = ?self.coord, applied = batch.applied, "drained edits");
        Ok(batch)
    }

    /// True while edits are queued.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Number of queued edits.
    #[inline]
    #[must_use]
    pub fn pending_edits(&self) -> usize {
        self.pending.len()
    }

    /// Queues a spawn that becomes ready after `timeout` calls to
    /// [`Chunk::spawn`]. A zero timeout is ready on the next call.
    ///
    /// # Errors
    ///
    /// Fails like [`Chunk::set_block`], so a queued spawn always lands.
    pub fn set_spawn(&mut self, pos: BlockPos, block: BlockType, timeout: u32) -> TerrainResult<()> {
        Self::check_write(pos, block)?;
        self.spawns.push(SpawnEntry {
            pos,
            countdown: timeout,
            block,
        });
        Ok(())
    }

    /// Number of queued spawns.
    #[inline]
    #[must_use]
    pub fn pending_spawns(&self) -> usize {
        self.spawns.len()
    }

    /// Ticks every queued spawn and returns the ones that became ready,
    /// in queue order.
    pub fn spawn(&mut self) -> Vec<(BlockPos, BlockType)> {
        let mut ready = Vec::new();
        self.spawns.retain_mut(|entry| {
            entry.countdown = entry.countdown.saturating_sub(1);
            if entry.countdown == 0 {
                ready.push((entry.pos, entry.block));
                false
            } else {
                true
            }
        });

        if !ready.is_empty() {
            trace!(chunk = ?self.coord, ready = ready.len(), "spawns ready");
        }
        ready
    }
}
