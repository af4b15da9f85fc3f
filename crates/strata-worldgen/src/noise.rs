//! Seeded 2D gradient noise.
//!
//! Each lattice cell's gradient is a pure function of `(seed, cell)`, so
//! sampling needs no shared state and the same seed always yields the same
//! field, independently of call order.

use std::f64::consts::{SQRT_2, TAU};

/// Largest value `noise2d` returns; the range is half-open at the top.
const NOISE_MAX: f64 = 1.0 - f64::EPSILON;

/// Gradient-lattice noise source for a fixed seed.
#[derive(Debug, Clone, Copy)]
pub struct NoiseSource {
    seed: u64,
}

impl NoiseSource {
    /// Creates a noise source for the given seed.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed this source was built from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Derives an independent field from this one.
    ///
    /// Used for the auxiliary channels (temperature, humidity, ...) so they
    /// do not correlate with the height field.
    #[must_use]
    pub const fn channel(&self, offset: u64) -> Self {
        Self::new(self.seed.wrapping_add(offset.wrapping_mul(1000)))
    }

    /// Noise value in `[-1, 1)` at a continuous position.
    #[must_use]
    pub fn noise2d(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor();
        let y0 = y.floor();
        let fx = x - x0;
        let fy = y - y0;
        let ix = x0 as i64;
        let iy = y0 as i64;

        let n00 = self.dot_gradient(ix, iy, fx, fy);
        let n10 = self.dot_gradient(ix + 1, iy, fx - 1.0, fy);
        let n01 = self.dot_gradient(ix, iy + 1, fx, fy - 1.0);
        let n11 = self.dot_gradient(ix + 1, iy + 1, fx - 1.0, fy - 1.0);

        let sx = fade(fx);
        let sy = fade(fy);
        let nx0 = lerp(n00, n10, sx);
        let nx1 = lerp(n01, n11, sx);

        // Unit gradients bound the raw value by sqrt(1/2).
        (lerp(nx0, nx1, sy) * SQRT_2).clamp(-1.0, NOISE_MAX)
    }

    /// Fractal sum of `octaves` layers, normalised back into `[-1, 1)`.
    #[must_use]
    pub fn fbm(&self, x: f64, y: f64, octaves: u32, persistence: f64) -> f64 {
        let mut value = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_value = 0.0;

        for _ in 0..octaves.max(1) {
            value += self.noise2d(x * frequency, y * frequency) * amplitude;
            max_value += amplitude;
            amplitude *= persistence;
            frequency *= 2.0;
        }

        (value / max_value).clamp(-1.0, NOISE_MAX)
    }

    /// Noise remapped to `[0, 1)`.
    #[must_use]
    pub fn unit(&self, x: f64, y: f64) -> f64 {
        (self.noise2d(x, y) + 1.0) * 0.5
    }

    fn dot_gradient(&self, ix: i64, iy: i64, dx: f64, dy: f64) -> f64 {
        let angle = (self.hash(ix, iy) >> 11) as f64 / (1u64 << 53) as f64 * TAU;
        let (gy, gx) = angle.sin_cos();
        gx * dx + gy * dy
    }

    fn hash(&self, ix: i64, iy: i64) -> u64 {
        let mut h = self.seed
            ^ (ix as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ (iy as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
        // splitmix64 finaliser
        h = (h ^ (h >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        h = (h ^ (h >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        h ^ (h >> 31)
    }
}

/// Quintic fade curve.
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_deterministic() {
        let a = NoiseSource::new(12345);
        let b = NoiseSource::new(12345);
        for i in 0..50 {
            let x = f64::from(i) * 0.37;
            assert_eq!(a.noise2d(x, 1.5).to_bits(), b.noise2d(x, 1.5).to_bits());
        }
    }

    #[test]
    fn test_zero_at_lattice_points() {
        let noise = NoiseSource::new(9);
        assert!(noise.noise2d(3.0, -2.0).abs() < 1e-12);
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = NoiseSource::new(1);
        let b = NoiseSource::new(2);
        let differs = (0..20).any(|i| {
            let x = f64::from(i) * 0.5 + 0.25;
            (a.noise2d(x, 0.75) - b.noise2d(x, 0.75)).abs() > 1e-9
        });
        assert!(differs);
    }

    #[test]
    fn test_channels_are_independent() {
        let base = NoiseSource::new(5);
        assert_ne!(base.channel(1).seed(), base.channel(2).seed());
        assert_ne!(base.channel(1).seed(), base.seed());
    }

    #[test]
    fn test_fbm_range() {
        let noise = NoiseSource::new(77);
        for i in 0..200 {
            let v = noise.fbm(f64::from(i) * 0.13, f64::from(i) * 0.07, 4, 0.5);
            assert!((-1.0..1.0).contains(&v));
        }
    }

    proptest! {
        #[test]
        fn noise_stays_in_range(
            seed in any::<u64>(),
            x in -1.0e4f64..1.0e4,
            y in -1.0e4f64..1.0e4,
        ) {
            let v = NoiseSource::new(seed).noise2d(x, y);
            prop_assert!((-1.0..1.0).contains(&v));
        }

        #[test]
        fn unit_noise_in_unit_interval(
            seed in any::<u64>(),
            x in -500.0f64..500.0,
            y in -500.0f64..500.0,
        ) {
            let v = NoiseSource::new(seed).unit(x, y);
            prop_assert!((0.0..1.0).contains(&v));
        }
    }
}
