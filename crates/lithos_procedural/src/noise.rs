//! # Fractal Perlin Noise
//!
//! Deterministic, seeded 3D gradient noise stacked into octaves.
//!
//! ## Determinism Guarantee
//!
//! The permutation table is shuffled with ChaCha8, whose output stream is
//! fixed by its algorithm rather than by the platform or the `rand`
//! release. Given the same `WorldSeed` and parameters, [`NoiseField::generate`]
//! returns **exactly** the same value in every run and every process.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::{TerrainError, TerrainResult};

/// Smallest accepted base amplitude.
pub const MIN_AMPLITUDE: f64 = 0.01;

/// Smallest accepted per-octave persistence.
pub const MIN_PERSISTENCE: f64 = 0.01;

/// World seed for deterministic generation.
///
/// All procedural generation derives from this seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WorldSeed(u64);

impl WorldSeed {
    /// Creates a new world seed.
    #[inline]
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    /// Returns the raw seed value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Derives a sub-seed for a specific purpose (e.g., cloud noise).
    ///
    /// Uses a hash function to create independent streams from one seed.
    #[inline]
    #[must_use]
    pub const fn derive(self, purpose: u64) -> Self {
        let mut hash = self.0;
        hash ^= purpose;
        hash = hash.wrapping_mul(0x517c_c1b7_2722_0a95);
        hash ^= hash >> 32;
        Self(hash)
    }
}

impl From<u32> for WorldSeed {
    fn from(seed: u32) -> Self {
        Self(u64::from(seed))
    }
}

/// Pre-computed permutation table for noise.
///
/// 256 shuffled entries, doubled so lattice hashing never wraps.
#[derive(Clone)]
struct PermutationTable {
    perm: [u8; 512],
}

impl PermutationTable {
    /// Builds the table from a seed: identity, shuffle, duplicate.
    fn new(seed: WorldSeed) -> Self {
        let mut perm = [0u8; 512];
        for (slot, value) in perm[..256].iter_mut().zip(0..=u8::MAX) {
            *slot = value;
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed.value());
        perm[..256].shuffle(&mut rng);

        let (low, high) = perm.split_at_mut(256);
        high.copy_from_slice(low);

        Self { perm }
    }

    #[inline]
    fn get(&self, index: usize) -> usize {
        usize::from(self.perm[index])
    }
}

/// Seeded fractal noise field over ℝ³.
///
/// Each octave samples classic gradient noise; per octave the amplitude
/// halves, the persistence multiplies into a running weight and the
/// sampled coordinates double.
///
/// # Example
///
/// ```rust
/// use lithos_procedural::noise::{NoiseField, WorldSeed};
///
/// let field = NoiseField::setup(WorldSeed::new(1000), 4, 1.0, 0.5).unwrap();
/// let a = field.generate(0.3, 0.0, 1.7);
/// let b = field.generate(0.3, 0.0, 1.7);
/// assert_eq!(a.to_bits(), b.to_bits());
/// ```
#[derive(Clone)]
pub struct NoiseField {
    table: PermutationTable,
    octaves: u32,
    amplitude: f64,
    persistence: f64,
}

impl std::fmt::Debug for NoiseField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoiseField")
            .field("octaves", &self.octaves)
            .field("amplitude", &self.amplitude)
            .field("persistence", &self.persistence)
            .finish_non_exhaustive()
    }
}

impl NoiseField {
    /// Validates the parameters and builds the permutation table.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidParameter`] if `octaves` is zero, or if
    /// `amplitude` / `persistence` are below their minimums or not finite.
    pub fn setup(
        seed: WorldSeed,
        octaves: u32,
        amplitude: f64,
        persistence: f64,
    ) -> TerrainResult<Self> {
        if !amplitude.is_finite() || amplitude < MIN_AMPLITUDE {
            return Err(TerrainError::parameter("amplitude", amplitude));
        }
        if octaves == 0 {
            return Err(TerrainError::parameter("octaves", octaves));
        }
        if !persistence.is_finite() || persistence < MIN_PERSISTENCE {
            return Err(TerrainError::parameter("persistence", persistence));
        }

        Ok(Self {
            table: PermutationTable::new(seed),
            octaves,
            amplitude,
            persistence,
        })
    }

    /// Number of octaves summed per sample.
    #[inline]
    #[must_use]
    pub const fn octaves(&self) -> u32 {
        self.octaves
    }

    /// Generates octaved (fractal) noise at the given point.
    #[must_use]
    pub fn generate(&self, x: f64, y: f64, z: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = self.amplitude;
        let mut weight = 1.0;
        let mut frequency = 1.0;

        for _ in 0..self.octaves {
            total += self.sample(x * frequency, y * frequency, z * frequency) * amplitude * weight;
            amplitude *= 0.5;
            weight *= self.persistence;
            frequency *= 2.0;
        }

        total
    }

    /// Samples a single octave of gradient noise, roughly in [-1, 1].
    ///
    /// Zero at every integer lattice point.
    #[must_use]
    pub fn sample(&self, x: f64, y: f64, z: f64) -> f64 {
        let (xi, x) = lattice(x);
        let (yi, y) = lattice(y);
        let (zi, z) = lattice(z);

        let u = fade(x);
        let v = fade(y);
        let w = fade(z);

        let p = &self.table;
        let a = p.get(xi) + yi;
        let aa = p.get(a) + zi;
        let ab = p.get(a + 1) + zi;
        let b = p.get(xi + 1) + yi;
        let ba = p.get(b) + zi;
        let bb = p.get(b + 1) + zi;

        lerp(
            w,
            lerp(
                v,
                lerp(u, grad(p.get(aa), x, y, z), grad(p.get(ba), x - 1.0, y, z)),
                lerp(
                    u,
                    grad(p.get(ab), x, y - 1.0, z),
                    grad(p.get(bb), x - 1.0, y - 1.0, z),
                ),
            ),
            lerp(
                v,
                lerp(
                    u,
                    grad(p.get(aa + 1), x, y, z - 1.0),
                    grad(p.get(ba + 1), x - 1.0, y, z - 1.0),
                ),
                lerp(
                    u,
                    grad(p.get(ab + 1), x, y - 1.0, z - 1.0),
                    grad(p.get(bb + 1), x - 1.0, y - 1.0, z - 1.0),
                ),
            ),
        )
    }
}

/// Splits a coordinate into its wrapped lattice cell and the fractional part.
#[inline]
fn lattice(value: f64) -> (usize, f64) {
    let floor = value.floor();
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let cell = ((floor as i64) & 255) as usize;
    (cell, value - floor)
}

/// Quintic fade curve: 6t⁵ − 15t⁴ + 10t³.
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product with one of 12 cube-edge gradients picked by the low 4 bits.
#[inline]
fn grad(hash: usize, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}
