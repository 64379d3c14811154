//! # Terrain Generator
//!
//! Turns a chunk coordinate into a fully populated chunk.
//!
//! ## Column Rules
//!
//! Each column's surface height comes from the absolute value of the
//! elevation field, mapped into `[height_min, height_max]`.
//!
//! Land (surface at or above `dirt_threshold`):
//! - surface block is snow at or above `snow_threshold`, grass below it
//! - a `dirt_depth` band under it blends dirt into stone
//! - stone below
//!
//! Underwater (surface below `dirt_threshold`):
//! - water in the top `sand_depth` blocks, down to the sand line
//! - a `sand_depth` band under the sand line blends sand into stone
//! - stone below
//!
//! Every column is solid up to its surface and air above it. y = 0 is
//! always the boundary block.
//!
//! ## Determinism
//!
//! The blend sampler is reseeded from `(seed, coordinate)` at the start of
//! every chunk, so a chunk's blocks never depend on which chunks were
//! generated before it.

use tracing::{debug, info};

use crate::block::BlockType;
use crate::chunk::{BlockPos, Chunk, ChunkCoord, CHUNK_AREA, CHUNK_HEIGHT, CHUNK_WIDTH};
use crate::config::GeneratorConfig;
use crate::error::{TerrainError, TerrainResult};
use crate::noise::{NoiseField, WorldSeed};
use crate::random::{PiecewiseLinear, SeededRandom};

/// Seed stream for the cloud field.
const CLOUD_STREAM: u64 = 0xC10D;

/// Seed stream for material blending.
const BLEND_STREAM: u64 = 0xB1E0;

/// Plane through the cloud field sampled for coverage.
const CLOUD_PLANE: f64 = 0.5;

#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
const WIDTH_I32: i32 = CHUNK_WIDTH as i32;

/// Cloud coverage for one chunk, one flag per column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CloudMap {
    coord: ChunkCoord,
    covered: [bool; CHUNK_AREA],
}

impl CloudMap {
    /// Chunk this map belongs to.
    #[must_use]
    pub const fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// True if the column is under cloud; false outside the chunk.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn is_covered(&self, x: i32, z: i32) -> bool {
        if (0..WIDTH_I32).contains(&x) && (0..WIDTH_I32).contains(&z) {
            self.covered[z as usize * CHUNK_WIDTH + x as usize]
        } else {
            false
        }
    }

    /// Number of covered columns.
    #[must_use]
    pub fn coverage(&self) -> usize {
        self.covered.iter().filter(|c| **c).count()
    }
}

/// Chunk generator using procedural noise.
#[derive(Clone, Debug)]
pub struct TerrainGenerator {
    config: GeneratorConfig,
    seed: WorldSeed,
    /// Elevation field.
    elevation: NoiseField,
    /// Decoration field, used for cloud cover.
    clouds: NoiseField,
    /// Material blend sampler, reseeded per chunk.
    random: SeededRandom,
}

impl TerrainGenerator {
    /// Builds a generator from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidParameter`] if the configuration is
    /// rejected by [`GeneratorConfig::validate`].
    pub fn new(config: GeneratorConfig) -> TerrainResult<Self> {
        config.validate()?;

        let seed = WorldSeed::from(config.seed);
        let elevation =
            NoiseField::setup(seed, config.octaves, config.amplitude, config.persistence)?;
        let clouds = NoiseField::setup(seed.derive(CLOUD_STREAM), config.cloud_octaves, 1.0, 0.5)?;

        info!(
            seed = config.seed,
            octaves = config.octaves,
            amplitude = config.amplitude,
            persistence = config.persistence,
            "terrain generator ready"
        );

        Ok(Self {
            random: SeededRandom::new(seed.derive(BLEND_STREAM)),
            config,
            seed,
            elevation,
            clouds,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Rejects coordinates outside the configured bound.
    fn check_bounds(&self, coord: ChunkCoord) -> TerrainResult<()> {
        let max = self.config.max_chunk_coord;
        if coord.x.unsigned_abs() >= max || coord.z.unsigned_abs() >= max {
            return Err(TerrainError::CoordinateOutOfRange { coord, max });
        }
        Ok(())
    }

    /// Surface height of the column at world block coordinates.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn column_height(&self, world_x: i64, world_z: i64) -> usize {
        let scale = self.config.scale;
        let signal = self
            .elevation
            .generate(world_x as f64 / scale, 0.0, world_z as f64 / scale)
            .abs();

        let low = self.config.height_min as f64;
        let high = self.config.height_max as f64;
        (low + signal * (high - low)).clamp(low, high) as usize
    }

    /// Populates every voxel of `chunk` for the chunk at `coord`.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::CoordinateOutOfRange`] if either component's
    /// magnitude reaches `max_chunk_coord`. A failure part-way through
    /// leaves the chunk partially written.
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub fn chunk(&mut self, coord: ChunkCoord, chunk: &mut Chunk) -> TerrainResult<()> {
        self.check_bounds(coord)?;
        self.random.reseed(self.chunk_seed(coord));

        let mut lowest = usize::MAX;
        let mut highest = 0;

        for local_z in 0..CHUNK_WIDTH {
            for local_x in 0..CHUNK_WIDTH {
                let height = self.column_height(
                    coord.world_x() + local_x as i64,
                    coord.world_z() + local_z as i64,
                );
                lowest = lowest.min(height);
                highest = highest.max(height);

                let (x, z) = (local_x as i32, local_z as i32);
                for y in (height + 1)..CHUNK_HEIGHT {
                    let block = BlockType::Air;
                    chunk.set_block(BlockPos::new(x, y as i32, z), block, block.default_attributes())?;
                }
                self.chunk_column(BlockPos::new(x, height as i32, z), chunk)?;
            }
        }

        debug!(x = coord.x, z = coord.z, lowest, highest, "generated chunk");
        Ok(())
    }

    /// Fills one column from its surface down to the boundary.
    ///
    /// `column.y` is the column's surface height.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::PositionOutOfRange`] if `column` lies
    /// outside the chunk.
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn chunk_column(&mut self, column: BlockPos, chunk: &mut Chunk) -> TerrainResult<()> {
        if !column.in_bounds() {
            return Err(TerrainError::PositionOutOfRange {
                x: column.x,
                y: column.y,
                z: column.z,
            });
        }

        let surface = column.y;
        let sea = self.config.dirt_threshold as i32;

        for y in (0..=surface).rev() {
            let pos = BlockPos::new(column.x, y, column.z);
            let block = if y == 0 {
                BlockType::Boundary
            } else if surface >= sea {
                self.land_block(pos, surface)?
            } else {
                self.underwater_block(pos, surface)?
            };
            chunk.set_block(pos, block, block.default_attributes())?;
        }

        Ok(())
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    fn land_block(&mut self, pos: BlockPos, surface: i32) -> TerrainResult<BlockType> {
        let depth = self.config.dirt_depth as i32;
        if pos.y == surface {
            if surface >= self.config.snow_threshold as i32 {
                Ok(BlockType::Snow)
            } else {
                Ok(BlockType::Grass)
            }
        } else if pos.y >= surface - depth {
            self.chunk_block_blend(pos, surface - depth, surface - 1, BlockType::Stone, BlockType::Dirt)
        } else {
            Ok(BlockType::Stone)
        }
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    fn underwater_block(&mut self, pos: BlockPos, surface: i32) -> TerrainResult<BlockType> {
        let depth = self.config.sand_depth as i32;
        let sand_line = surface - depth;
        if pos.y > sand_line {
            Ok(BlockType::Water)
        } else if pos.y > sand_line - depth {
            self.chunk_block_blend(pos, sand_line - depth + 1, sand_line, BlockType::Stone, BlockType::Sand)
        } else {
            Ok(BlockType::Stone)
        }
    }

    /// Picks `a` or `b` for a voxel inside a transition band.
    ///
    /// Below `min` the result is always `a`, above `max` always `b`. Inside
    /// the band a sample is drawn from a density that is 1 at `min`, 0 at
    /// `position.y` and 1 at `max`; the chance of `b` grows linearly from
    /// 0 at `min` to 1 at `max`.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidRange`] if `min > max`.
    pub fn chunk_block_blend(
        &mut self,
        position: BlockPos,
        min: i32,
        max: i32,
        a: BlockType,
        b: BlockType,
    ) -> TerrainResult<BlockType> {
        if min > max {
            return Err(TerrainError::InvalidRange {
                min: f64::from(min),
                max: f64::from(max),
            });
        }

        let y = position.y;
        if y < min {
            return Ok(a);
        }
        if y >= max {
            return Ok(b);
        }

        let y = f64::from(y);
        let distribution =
            PiecewiseLinear::new(&[f64::from(min), y, f64::from(max)], &[1.0, 0.0, 1.0])?;
        if self.random.sample(&distribution) < y {
            Ok(b)
        } else {
            Ok(a)
        }
    }

    /// Cloud density at world block coordinates.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn cloud_density(&self, world_x: i64, world_z: i64) -> f64 {
        let scale = self.config.cloud_scale;
        self.clouds
            .generate(world_x as f64 / scale, CLOUD_PLANE, world_z as f64 / scale)
    }

    /// Cloud coverage for the chunk at `coord`.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::CoordinateOutOfRange`] like [`TerrainGenerator::chunk`].
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub fn cloud_map(&self, coord: ChunkCoord) -> TerrainResult<CloudMap> {
        self.check_bounds(coord)?;

        let mut covered = [false; CHUNK_AREA];
        for (i, cell) in covered.iter_mut().enumerate() {
            let world_x = coord.world_x() + (i % CHUNK_WIDTH) as i64;
            let world_z = coord.world_z() + (i / CHUNK_WIDTH) as i64;
            *cell = self.cloud_density(world_x, world_z) > self.config.cloud_threshold;
        }

        Ok(CloudMap { coord, covered })
    }

    #[allow(clippy::cast_sign_loss)]
    fn chunk_seed(&self, coord: ChunkCoord) -> WorldSeed {
        let key = (u64::from(coord.x as u32) << 32) | u64::from(coord.z as u32);
        self.seed.derive(BLEND_STREAM).derive(key)
    }
}
