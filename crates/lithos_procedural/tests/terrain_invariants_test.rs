//! # Terrain Invariant Tests
//!
//! Verifies the properties every generated or edited chunk must hold:
//! determinism, the boundary floor, the height map and queued edits.

use lithos_procedural::{
    BlockAttributes, BlockPos, BlockType, Chunk, ChunkCoord, GeneratorConfig, NoiseField,
    TerrainError, TerrainGenerator, TerrainManager, WorldSeed, CHUNK_HEIGHT, CHUNK_WIDTH,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const W: i32 = CHUNK_WIDTH as i32;
const H: i32 = CHUNK_HEIGHT as i32;

fn generate(config: GeneratorConfig, coord: ChunkCoord) -> Chunk {
    let mut generator = TerrainGenerator::new(config).unwrap();
    let mut chunk = Chunk::new(coord).unwrap();
    generator.chunk(coord, &mut chunk).unwrap();
    chunk
}

fn assert_same_blocks(a: &Chunk, b: &Chunk) {
    for y in 0..H {
        for z in 0..W {
            for x in 0..W {
                let pos = BlockPos::new(x, y, z);
                assert_eq!(a.block_type(pos), b.block_type(pos), "Mismatch at {pos:?}");
                assert_eq!(a.attributes(pos), b.attributes(pos), "Mismatch at {pos:?}");
            }
        }
    }
}

/// Brute-force topmost selectable y.
fn true_height(chunk: &Chunk, x: i32, z: i32) -> usize {
    (0..H)
        .rev()
        .find(|&y| chunk.block_type(BlockPos::new(x, y, z)).is_selectable())
        .map_or(0, |y| y as usize)
}

/// Test: the documented reference scenario.
#[test]
fn test_reference_scenario_seed_1000() {
    let config = GeneratorConfig {
        seed: 1000,
        octaves: 4,
        amplitude: 1.0,
        persistence: 0.5,
        ..GeneratorConfig::default()
    };
    let (min, max) = (config.height_min, config.height_max);
    let chunk = generate(config, ChunkCoord::new(0, 0));

    let height = chunk.height(0, 0);
    assert!((min..=max).contains(&height), "height(0,0) = {height}");
    assert_eq!(chunk.block_type(BlockPos::new(0, 0, 0)), BlockType::Boundary);
}

/// Test: seed 1000 noise matches recorded bit patterns.
#[test]
fn test_noise_golden_values() {
    let field = NoiseField::setup(WorldSeed::new(1000), 4, 1.0, 0.5).unwrap();
    let golden: [((f64, f64, f64), u64); 4] = [
        ((0.3, 0.0, 1.7), 0x3fc7_9b7e_7af7_1885),
        ((12.75, 0.5, -3.25), 0xbfcd_0a5c_0000_0000),
        ((-7.1, 2.2, 0.9), 0x3fbf_05a6_e152_0abf),
        ((100.5, 0.0, 100.5), 0xbfd0_0000_0000_0000),
    ];
    for ((x, y, z), bits) in golden {
        let value = field.generate(x, y, z);
        assert_eq!(value.to_bits(), bits, "noise({x}, {y}, {z}) = {value}");
    }
}

/// Test: chunk (0, 0) at seed 1000 matches recorded surface heights.
#[test]
fn test_chunk_golden_surface() {
    let chunk = generate(GeneratorConfig::with_seed(1000), ChunkCoord::new(0, 0));
    let golden = [
        (0, 0, 8, BlockType::Water),
        (5, 0, 19, BlockType::Water),
        (15, 0, 32, BlockType::Grass),
        (0, 15, 19, BlockType::Water),
        (7, 9, 26, BlockType::Water),
        (15, 15, 39, BlockType::Grass),
        (3, 12, 20, BlockType::Water),
        (11, 4, 31, BlockType::Water),
    ];
    for (x, z, height, top) in golden {
        assert_eq!(chunk.height(x, z), height, "height({x}, {z})");
        let y = height as i32;
        assert_eq!(chunk.block_type(BlockPos::new(x, y, z)), top, "top of ({x}, {z})");
        assert_eq!(chunk.block_type(BlockPos::new(x, y + 1, z)), BlockType::Air);
        assert_eq!(chunk.block_type(BlockPos::new(x, 0, z)), BlockType::Boundary);
    }

    // Column (0, 0): water above the sand line at 5, sand band 3..=5.
    assert_eq!(chunk.block_type(BlockPos::new(0, 6, 0)), BlockType::Water);
    assert_eq!(chunk.block_type(BlockPos::new(0, 5, 0)), BlockType::Sand);
    assert_eq!(chunk.block_type(BlockPos::new(0, 3, 0)), BlockType::Stone);
    assert_eq!(chunk.block_type(BlockPos::new(0, 2, 0)), BlockType::Stone);
}

/// Test: two generators with the same seed build identical chunks.
#[test]
fn test_generation_is_deterministic() {
    for coord in [ChunkCoord::new(0, 0), ChunkCoord::new(-3, 9), ChunkCoord::new(40, -12)] {
        let a = generate(GeneratorConfig::with_seed(42), coord);
        let b = generate(GeneratorConfig::with_seed(42), coord);
        assert_same_blocks(&a, &b);
    }
}

/// Test: noise values are pinned to the seed, not to the process.
#[test]
fn test_noise_repeatable_across_instances() {
    let points: Vec<(f64, f64, f64)> = (0..64)
        .map(|i| {
            let t = f64::from(i);
            (t * 0.37 - 5.0, t * 0.11, t * -0.23 + 2.0)
        })
        .collect();

    let first = NoiseField::setup(WorldSeed::new(1000), 4, 1.0, 0.5).unwrap();
    let bits: Vec<u64> = points.iter().map(|&(x, y, z)| first.generate(x, y, z).to_bits()).collect();
    drop(first);

    let second = NoiseField::setup(WorldSeed::new(1000), 4, 1.0, 0.5).unwrap();
    for (&(x, y, z), expected) in points.iter().zip(bits) {
        assert_eq!(second.generate(x, y, z).to_bits(), expected);
    }
}

/// Test: different seeds give different terrain.
#[test]
fn test_seeds_change_terrain() {
    let coord = ChunkCoord::new(1, 1);
    let a = generate(GeneratorConfig::with_seed(1), coord);
    let b = generate(GeneratorConfig::with_seed(2), coord);

    let differs = (0..W).any(|z| (0..W).any(|x| a.height(x, z) != b.height(x, z)));
    assert!(differs, "Seeds 1 and 2 produced identical height maps");
}

/// Test: every generated chunk sits on the boundary layer.
#[test]
fn test_boundary_layer_everywhere() {
    let mut terrain = TerrainManager::new(GeneratorConfig::default()).unwrap();
    for cz in -2..2 {
        for cx in -2..2 {
            let chunk = terrain.at(ChunkCoord::new(cx, cz)).unwrap();
            for z in 0..W {
                for x in 0..W {
                    let pos = BlockPos::new(x, 0, z);
                    assert_eq!(chunk.block_type(pos), BlockType::Boundary);
                    assert!(chunk.attributes(pos).contains(BlockAttributes::STATIC));
                }
            }
        }
    }
}

/// Test: the height map matches storage after generation and random edits.
#[test]
fn test_height_invariant_under_random_edits() {
    let mut chunk = generate(GeneratorConfig::default(), ChunkCoord::new(0, 0));
    for z in 0..W {
        for x in 0..W {
            assert_eq!(chunk.height(x, z), true_height(&chunk, x, z));
        }
    }

    let mut rng = ChaCha8Rng::seed_from_u64(77);
    let materials = [BlockType::Air, BlockType::Air, BlockType::Stone, BlockType::Water];
    for _ in 0..5000 {
        let x = rng.gen_range(0..4);
        let z = rng.gen_range(0..4);
        let y = rng.gen_range(1..H);
        let block = materials[rng.gen_range(0..materials.len())];
        let reported = chunk
            .set_block(BlockPos::new(x, y, z), block, block.default_attributes())
            .unwrap();
        assert_eq!(reported, true_height(&chunk, x, z), "after write at ({x}, {y}, {z})");
        assert_eq!(chunk.height(x, z), reported);
    }
}

/// Test: the boundary floor survives direct and queued writes.
#[test]
fn test_boundary_rejects_edits() {
    let mut terrain = TerrainManager::new(GeneratorConfig::default()).unwrap();
    let chunk = terrain.at(ChunkCoord::new(0, 0)).unwrap();
    let heights: Vec<usize> = (0..W).map(|x| chunk.height(x, 3)).collect();

    for x in 0..W {
        let pos = BlockPos::new(x, 0, 3);
        assert!(matches!(
            chunk.set_block(pos, BlockType::Air, BlockAttributes::empty()),
            Err(TerrainError::BoundaryWrite { .. })
        ));
        assert!(matches!(
            chunk.set(pos, BlockType::Stone, BlockAttributes::BREAKABLE),
            Err(TerrainError::BoundaryWrite { .. })
        ));
    }
    assert!(!chunk.is_active());
    assert!(chunk.update().unwrap().is_empty());

    for x in 0..W {
        let pos = BlockPos::new(x, 0, 3);
        assert_eq!(chunk.block_type(pos), BlockType::Boundary);
        assert!(chunk.attributes(pos).contains(BlockAttributes::STATIC));
        assert_eq!(chunk.height(x, 3), heights[x as usize]);
    }
}

/// Test: queued edits land exactly like immediate writes.
#[test]
fn test_queue_matches_immediate_writes() {
    let base = generate(GeneratorConfig::default(), ChunkCoord::new(2, 2));
    let mut queued = base.clone();
    let mut immediate = base;

    let mut rng = ChaCha8Rng::seed_from_u64(5);
    for _ in 0..300 {
        let pos = BlockPos::new(rng.gen_range(0..W), rng.gen_range(1..H), rng.gen_range(0..W));
        let block = if rng.gen_bool(0.5) { BlockType::Air } else { BlockType::Dirt };
        queued.set(pos, block, block.default_attributes()).unwrap();
        immediate.set_block(pos, block, block.default_attributes()).unwrap();
    }

    let batch = queued.update().unwrap();
    assert_eq!(batch.applied, 300);
    assert_same_blocks(&queued, &immediate);
    for z in 0..W {
        for x in 0..W {
            assert_eq!(queued.height(x, z), immediate.height(x, z));
        }
    }

    // A second update has nothing left to do.
    assert!(queued.update().unwrap().is_empty());
}

/// Test: configuration shipped with the repository parses.
#[test]
fn test_shipped_config_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/terrain.toml");
    let config = GeneratorConfig::load(path).unwrap();
    assert_eq!(config, GeneratorConfig::default());
}
