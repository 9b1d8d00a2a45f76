//! Classic 2-D gradient noise over a shuffled permutation table.
//!
//! The table holds a permutation of 0..=255 repeated twice so corner hashes
//! (`p[p[X] + Y + 1]`) never need a wrap check. The table is built once and
//! never mutated, which makes [`NoiseField::noise`] a pure function of its
//! inputs for the life of the instance.

use noise::NoiseFn;

use crate::error::EngineError;
use crate::prng::Xorshift64;

const TABLE_SIZE: usize = 256;

/// Gradient noise generator with a per-instance permutation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoiseField {
    table: [u8; TABLE_SIZE * 2],
}

impl NoiseField {
    /// Builds a table by Fisher-Yates shuffling 0..=255 with `rng`.
    pub fn new(rng: &mut Xorshift64) -> Self {
        let mut perm = identity_permutation();
        rng.shuffle(&mut perm);
        Self::from_table(perm)
    }

    /// Builds a noise field over the unshuffled table `[0, 1, ..., 255]`.
    pub fn identity() -> Self {
        Self::from_table(identity_permutation())
    }

    /// Builds a noise field over an explicit permutation.
    ///
    /// Returns `EngineError::InvalidPermutation` if any value appears twice.
    pub fn from_permutation(perm: [u8; TABLE_SIZE]) -> Result<Self, EngineError> {
        let mut seen = [false; TABLE_SIZE];
        for &v in &perm {
            if std::mem::replace(&mut seen[v as usize], true) {
                return Err(EngineError::InvalidPermutation(format!(
                    "value {v} appears more than once"
                )));
            }
        }
        Ok(Self::from_table(perm))
    }

    fn from_table(perm: [u8; TABLE_SIZE]) -> Self {
        let mut table = [0u8; TABLE_SIZE * 2];
        table[..TABLE_SIZE].copy_from_slice(&perm);
        table[TABLE_SIZE..].copy_from_slice(&perm);
        Self { table }
    }

    /// The permutation (first half of the doubled table).
    pub fn permutation(&self) -> &[u8] {
        &self.table[..TABLE_SIZE]
    }

    /// Samples the noise at `(x, y)`. Output lies in roughly [-1, 1].
    pub fn noise(&self, x: f64, y: f64) -> f64 {
        let fx = x.floor();
        let fy = y.floor();
        let xi = (fx as i64 & 255) as usize;
        let yi = (fy as i64 & 255) as usize;

        let x = x - fx;
        let y = y - fy;
        let u = fade(x);
        let v = fade(y);

        let p = &self.table;
        let a = p[xi] as usize + yi;
        let b = p[xi + 1] as usize + yi;

        lerp(
            v,
            lerp(u, grad(p[a], x, y), grad(p[b], x - 1.0, y)),
            lerp(u, grad(p[a + 1], x, y - 1.0), grad(p[b + 1], x - 1.0, y - 1.0)),
        )
    }
}

impl NoiseFn<f64, 2> for NoiseField {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.noise(point[0], point[1])
    }
}

fn identity_permutation() -> [u8; TABLE_SIZE] {
    let mut perm = [0u8; TABLE_SIZE];
    for (i, slot) in perm.iter_mut().enumerate() {
        *slot = i as u8;
    }
    perm
}

/// Quintic fade `6t^5 - 15t^4 + 10t^3`; first and second derivatives vanish
/// at 0 and 1.
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Picks one of the four diagonal gradients from the low two bits of `hash`.
fn grad(hash: u8, x: f64, y: f64) -> f64 {
    let h = hash & 3;
    let (u, v) = if h < 2 { (x, y) } else { (y, x) };
    let u = if h & 1 == 0 { u } else { -u };
    let v = if h & 2 == 0 { v } else { -v };
    u + v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_table_at_origin_is_zero() {
        let n = NoiseField::identity();
        assert_eq!(n.noise(0.0, 0.0), 0.0);
    }

    #[test]
    fn every_lattice_point_is_zero() {
        let mut rng = Xorshift64::new(11);
        let n = NoiseField::new(&mut rng);
        for x in -3..4 {
            for y in -3..4 {
                assert_eq!(n.noise(x as f64, y as f64), 0.0, "lattice ({x}, {y})");
            }
        }
    }

    #[test]
    fn shuffled_table_is_a_permutation() {
        let mut rng = Xorshift64::new(99);
        let n = NoiseField::new(&mut rng);
        let mut sorted = n.permutation().to_vec();
        sorted.sort_unstable();
        let expected: Vec<u8> = (0..=255).collect();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn from_permutation_rejects_duplicates() {
        let mut perm = identity_permutation();
        perm[10] = 3;
        let err = NoiseField::from_permutation(perm).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPermutation(_)));
    }

    #[test]
    fn from_permutation_accepts_reversed_table() {
        let mut perm = identity_permutation();
        perm.reverse();
        let n = NoiseField::from_permutation(perm).unwrap();
        assert_eq!(n.permutation()[0], 255);
        assert_eq!(n.permutation()[255], 0);
    }

    #[test]
    fn grad_selects_signed_axis_sums() {
        assert_eq!(grad(0, 0.25, 0.5), 0.75);
        assert_eq!(grad(1, 0.25, 0.5), 0.25);
        assert_eq!(grad(2, 0.25, 0.5), 0.25);
        assert_eq!(grad(2, 0.5, 0.25), -0.25);
        assert_eq!(grad(3, 0.25, 0.5), -0.75);
        // only the low two bits matter
        assert_eq!(grad(4, 0.25, 0.5), grad(0, 0.25, 0.5));
    }

    #[test]
    fn fade_endpoints_and_midpoint() {
        assert_eq!(fade(0.0), 0.0);
        assert_eq!(fade(1.0), 1.0);
        assert!((fade(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn noise_fn_get_matches_noise() {
        let n = NoiseField::new(&mut Xorshift64::new(3));
        assert_eq!(n.get([12.3, 45.6]), n.noise(12.3, 45.6));
    }

    #[test]
    fn same_rng_seed_gives_same_table() {
        let a = NoiseField::new(&mut Xorshift64::new(8));
        let b = NoiseField::new(&mut Xorshift64::new(8));
        assert_eq!(a, b);
    }

    #[test]
    fn continuous_across_lattice_boundary() {
        let n = NoiseField::new(&mut Xorshift64::new(21));
        let eps = 1e-7;
        for i in 0..50 {
            let x = 3.0 + i as f64 * 0.01;
            let left = n.noise(4.0 - eps, x);
            let right = n.noise(4.0 + eps, x);
            assert!((left - right).abs() < 1e-5, "jump at x=4, y={x}");
        }
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn noise_is_idempotent(seed: u64, x in -1e4_f64..1e4, y in -1e4_f64..1e4) {
                let n = NoiseField::new(&mut Xorshift64::new(seed));
                let a = n.noise(x, y);
                let b = n.noise(x, y);
                prop_assert_eq!(a.to_bits(), b.to_bits());
            }

            #[test]
            fn noise_is_finite_and_bounded(seed: u64, x in -1e6_f64..1e6, y in -1e6_f64..1e6) {
                let n = NoiseField::new(&mut Xorshift64::new(seed));
                let v = n.noise(x, y);
                prop_assert!(v.is_finite());
                prop_assert!(v.abs() <= 1.0 + 1e-9, "noise({x}, {y}) = {v}");
            }

            #[test]
            fn small_steps_give_small_changes(seed: u64, x in -500_f64..500.0, y in -500_f64..500.0) {
                let n = NoiseField::new(&mut Xorshift64::new(seed));
                let eps = 1e-6;
                prop_assert!((n.noise(x + eps, y) - n.noise(x, y)).abs() < 1e-4);
                prop_assert!((n.noise(x, y + eps) - n.noise(x, y)).abs() < 1e-4);
            }

            #[test]
            fn every_table_is_a_bijection(seed: u64) {
                let n = NoiseField::new(&mut Xorshift64::new(seed));
                let mut seen = [false; 256];
                for &v in n.permutation() {
                    prop_assert!(!seen[v as usize]);
                    seen[v as usize] = true;
                }
            }
        }
    }
}
