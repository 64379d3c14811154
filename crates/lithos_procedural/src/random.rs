//! # Seeded Random Sampling
//!
//! Uniform and shaped sampling from a reseedable ChaCha8 stream.
//!
//! Used by the terrain generator to blend materials across a transition
//! band instead of cutting them at a flat boundary.

use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::error::{TerrainError, TerrainResult};
use crate::noise::WorldSeed;

/// Deterministic random source.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    rng: ChaCha8Rng,
}

impl SeededRandom {
    /// Creates a random source positioned at the start of `seed`'s stream.
    #[must_use]
    pub fn new(seed: WorldSeed) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed.value()),
        }
    }

    /// Restarts the stream from `seed`.
    pub fn reseed(&mut self, seed: WorldSeed) {
        self.rng = ChaCha8Rng::seed_from_u64(seed.value());
    }

    /// Uniform sample in `[low, high)`.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidRange`] if `low >= high` or either
    /// bound is not finite.
    pub fn uniform(&mut self, low: f64, high: f64) -> TerrainResult<f64> {
        if !(low.is_finite() && high.is_finite()) || low >= high {
            return Err(TerrainError::InvalidRange { min: low, max: high });
        }
        Ok(self.rng.gen_range(low..high))
    }

    /// Draws one value from a distribution.
    pub fn sample<D: Distribution<f64>>(&mut self, distribution: &D) -> f64 {
        distribution.sample(&mut self.rng)
    }
}

/// Continuous distribution whose density is linear between breakpoints.
///
/// Equivalent to a piecewise-linear density over `breakpoints`, with the
/// density at each breakpoint given by the matching entry of `densities`.
#[derive(Clone, Debug)]
pub struct PiecewiseLinear {
    breakpoints: Vec<f64>,
    densities: Vec<f64>,
    segments: WeightedIndex<f64>,
}

impl PiecewiseLinear {
    /// Builds the distribution.
    ///
    /// Zero-width segments are allowed and never selected.
    ///
    /// # Errors
    ///
    /// Returns [`TerrainError::InvalidRange`] if there are fewer than two
    /// breakpoints, the two slices differ in length, breakpoints decrease,
    /// a density is negative or not finite, or the total mass is zero.
    pub fn new(breakpoints: &[f64], densities: &[f64]) -> TerrainResult<Self> {
        let first = breakpoints.first().copied().unwrap_or(f64::NAN);
        let last = breakpoints.last().copied().unwrap_or(f64::NAN);
        let malformed = TerrainError::InvalidRange { min: first, max: last };

        if breakpoints.len() < 2 || breakpoints.len() != densities.len() {
            return Err(malformed);
        }
        if breakpoints.iter().any(|b| !b.is_finite())
            || breakpoints.windows(2).any(|w| w[0] > w[1])
            || densities.iter().any(|d| !d.is_finite() || *d < 0.0)
        {
            return Err(malformed);
        }

        let areas = breakpoints
            .windows(2)
            .zip(densities.windows(2))
            .map(|(x, d)| (x[1] - x[0]) * (d[0] + d[1]) * 0.5);
        let segments = WeightedIndex::new(areas).map_err(|_| malformed)?;

        Ok(Self {
            breakpoints: breakpoints.to_vec(),
            densities: densities.to_vec(),
            segments,
        })
    }
}

impl Distribution<f64> for PiecewiseLinear {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        let i = self.segments.sample(rng);
        let (x0, x1) = (self.breakpoints[i], self.breakpoints[i + 1]);
        let (d0, d1) = (self.densities[i], self.densities[i + 1]);
        let u: f64 = rng.gen();

        // Invert the segment CDF d0*t + (d1-d0)*t²/2 = u*(d0+d1)/2.
        let slope = d1 - d0;
        let t = if slope.abs() < f64::EPSILON {
            u
        } else {
            let disc = d0.mul_add(d0, u * (d1 * d1 - d0 * d0));
            (disc.max(0.0).sqrt() - d0) / slope
        };

        x0 + t.clamp(0.0, 1.0) * (x1 - x0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = SeededRandom::new(WorldSeed::new(7));
        let mut b = SeededRandom::new(WorldSeed::new(7));
        for _ in 0..100 {
            assert_eq!(
                a.uniform(0.0, 1.0).unwrap().to_bits(),
                b.uniform(0.0, 1.0).unwrap().to_bits()
            );
        }
    }

    #[test]
    fn test_reseed_restarts_stream() {
        let mut rng = SeededRandom::new(WorldSeed::new(7));
        let first = rng.uniform(0.0, 1.0).unwrap();
        let _ = rng.uniform(0.0, 1.0).unwrap();
        rng.reseed(WorldSeed::new(7));
        assert_eq!(rng.uniform(0.0, 1.0).unwrap().to_bits(), first.to_bits());
    }

    #[test]
    fn test_uniform_rejects_empty_range() {
        let mut rng = SeededRandom::new(WorldSeed::new(1));
        assert!(matches!(
            rng.uniform(2.0, 1.0),
            Err(TerrainError::InvalidRange { .. })
        ));
    }

    #[test]
    fn test_piecewise_stays_in_support() {
        let dist = PiecewiseLinear::new(&[2.0, 5.0, 9.0], &[1.0, 0.0, 1.0]).unwrap();
        let mut rng = SeededRandom::new(WorldSeed::new(3));
        for _ in 0..2000 {
            let v = rng.sample(&dist);
            assert!((2.0..=9.0).contains(&v), "Sample {v} outside support");
        }
    }

    #[test]
    fn test_piecewise_follows_density() {
        // Density rises linearly from 0 to 1: P(x < 0.5) = 0.25.
        let dist = PiecewiseLinear::new(&[0.0, 1.0], &[0.0, 1.0]).unwrap();
        let mut rng = SeededRandom::new(WorldSeed::new(11));
        let n = 20_000;
        let below = (0..n).filter(|_| rng.sample(&dist) < 0.5).count();
        #[allow(clippy::cast_precision_loss)]
        let ratio = below as f64 / f64::from(n);
        assert!((ratio - 0.25).abs() < 0.02, "Observed ratio {ratio}");
    }

    #[test]
    fn test_piecewise_zero_width_segment() {
        let dist = PiecewiseLinear::new(&[4.0, 4.0, 8.0], &[1.0, 0.0, 1.0]).unwrap();
        let mut rng = SeededRandom::new(WorldSeed::new(5));
        for _ in 0..500 {
            let v = rng.sample(&dist);
            assert!((4.0..=8.0).contains(&v));
        }
    }

    #[test]
    fn test_piecewise_rejects_malformed() {
        assert!(PiecewiseLinear::new(&[1.0], &[1.0]).is_err());
        assert!(PiecewiseLinear::new(&[3.0, 1.0], &[1.0, 1.0]).is_err());
        assert!(PiecewiseLinear::new(&[0.0, 1.0], &[-1.0, 1.0]).is_err());
        assert!(PiecewiseLinear::new(&[0.0, 1.0], &[0.0, 0.0]).is_err());
        assert!(PiecewiseLinear::new(&[0.0, 1.0, 2.0], &[1.0, 1.0]).is_err());
    }
}
