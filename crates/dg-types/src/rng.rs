//! Seeded RNG — the deterministic substrate procedural generation and
//! replay are built on.
//!
//! All gameplay randomness must go through `RngState`: two runs started
//! from the same seed and fed the same input events must reach byte-
//! identical world states, so the exact bit sequence this type produces
//! is a contract, not an implementation detail (see spec §4.A / §8
//! "Determinism"). A separate, unrelated [`CosmeticRng`] is available for
//! non-gameplay visuals; it must never be consulted during recording
//! replay, so it is a distinct type rather than a flag on `RngState` —
//! there is no way to accidentally wire it into the replay path.

use serde::{Deserialize, Serialize};

use crate::fixed::{Fixed, FP_FACTOR};

/// splitmix64 — the fixed-increment stream used to turn `seed + counter`
/// into the next raw 64-bit draw. Small, fast, and passes the usual
/// empirical randomness batteries; its only job here is determinism, not
/// cryptographic strength.
fn splitmix64(mut x: u64) -> u64 {
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// Deterministic, seeded RNG. `seed` is fixed for the life of a session
/// (or a level, when re-seeded per spec §4.E step 1); `counter` advances
/// on every draw and is itself part of the replay contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub counter: u64,
}

impl RngState {
    /// Create an RNG with the given seed (counter starts at 0).
    pub const fn new(seed: u64) -> Self {
        Self { seed, counter: 0 }
    }

    /// Re-seed in place, e.g. `levelSeed = hash(runSeed, depth)` (spec
    /// §4.E step 1). Counter resets so each level's draw sequence is
    /// reproducible independent of how many draws prior levels consumed.
    pub fn reseed_for_depth(run_seed: u64, depth: u32) -> Self {
        let mixed = splitmix64(run_seed ^ splitmix64(depth as u64));
        Self::new(mixed)
    }

    /// Next raw 64-bit draw. Advances the counter.
    fn next_u64(&mut self) -> u64 {
        self.counter = self.counter.wrapping_add(1);
        splitmix64(self.seed.wrapping_add(self.counter))
    }

    /// Uniform integer in `[lo, hi]` inclusive.
    ///
    /// # Panics
    /// Panics if `lo > hi` — per spec §4.A this is a programmer error, not
    /// a recoverable runtime condition.
    pub fn rand_range(&mut self, lo: i64, hi: i64) -> i64 {
        assert!(lo <= hi, "rand_range: lo ({lo}) > hi ({hi})");
        let span = (hi - lo + 1) as u64;
        lo + (self.next_u64() % span) as i64
    }

    /// Returns `true` with probability `min(100, max(0, p))%`.
    pub fn rand_percent(&mut self, p: i32) -> bool {
        let clamped = p.clamp(0, 100);
        if clamped == 0 {
            return false;
        }
        if clamped == 100 {
            return true;
        }
        self.rand_range(0, 99) < clamped as i64
    }

    /// Sum of `clump_factor` independent uniform draws from an equal split
    /// of `[lower, upper]`, yielding a bell-shaped distribution centered
    /// near the middle of the range (each "clump" is a narrower uniform
    /// draw, so their sum concentrates around the mean).
    pub fn rand_clump(&mut self, lower: i64, upper: i64, clump_factor: u32) -> i64 {
        if clump_factor <= 1 {
            return self.rand_range(lower, upper);
        }
        let span = upper - lower + 1;
        let mut total = 0i64;
        for i in 0..clump_factor as i64 {
            let sub_lo = lower + (span * i) / clump_factor as i64;
            let sub_hi = lower + (span * (i + 1)) / clump_factor as i64 - 1;
            let sub_hi = sub_hi.max(sub_lo);
            total += self.rand_range(sub_lo, sub_hi);
        }
        total
    }

    /// Fixed-point variant of `rand_range`: a uniform draw in
    /// `[lo, hi]` expressed in `Fixed` units, with sub-unit precision
    /// filled in uniformly within the resulting unit cell.
    pub fn rand_from_range_fixpt(&mut self, lo: Fixed, hi: Fixed) -> Fixed {
        let lo_raw = lo.raw();
        let hi_raw = hi.raw();
        assert!(lo_raw <= hi_raw, "rand_from_range_fixpt: lo > hi");
        let raw = self.rand_range(lo_raw, hi_raw);
        Fixed::from_raw(raw)
    }

    /// Fisher-Yates shuffle.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.rand_range(0, i as i64) as usize;
            slice.swap(i, j);
        }
    }

    /// Pick a random index from `[0, len)`. `None` if `len == 0`.
    pub fn random_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some(self.rand_range(0, len as i64 - 1) as usize)
    }
}

/// A second, deliberately-separate RNG stream for cosmetic (non-gameplay)
/// effects — color-dance jitter, flavor-text variant selection. Consulting
/// it can never desync a replay because nothing in the recording/playback
/// path reads or seeds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CosmeticRng(RngState);

impl CosmeticRng {
    pub const fn new(seed: u64) -> Self {
        Self(RngState::new(seed))
    }

    pub fn rand_range(&mut self, lo: i64, hi: i64) -> i64 {
        self.0.rand_range(lo, hi)
    }

    pub fn rand_percent(&mut self, p: i32) -> bool {
        self.0.rand_percent(p)
    }
}

/// `FP_FACTOR` re-exported for callers that only need the RNG module.
pub const FIXED_POINT_FACTOR: i64 = FP_FACTOR;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic_same_seed() {
        let mut a = RngState::new(42);
        let mut b = RngState::new(42);
        for _ in 0..200 {
            assert_eq!(a.rand_range(0, 1_000_000), b.rand_range(0, 1_000_000));
        }
    }

    #[test]
    fn different_seeds_usually_differ() {
        let mut a = RngState::new(42);
        let mut b = RngState::new(43);
        let draws_a: Vec<i64> = (0..20).map(|_| a.rand_range(0, 1 << 40)).collect();
        let draws_b: Vec<i64> = (0..20).map(|_| b.rand_range(0, 1 << 40)).collect();
        assert_ne!(draws_a, draws_b);
    }

    #[test]
    fn rand_range_bounds() {
        let mut rng = RngState::new(7);
        for _ in 0..2000 {
            let v = rng.rand_range(3, 9);
            assert!((3..=9).contains(&v));
        }
    }

    #[test]
    fn rand_range_single_value() {
        let mut rng = RngState::new(7);
        assert_eq!(rng.rand_range(5, 5), 5);
    }

    #[test]
    fn rand_percent_extremes() {
        let mut rng = RngState::new(1);
        for _ in 0..50 {
            assert!(rng.rand_percent(0) == false);
            assert!(rng.rand_percent(100) == true);
        }
    }

    #[test]
    fn rand_percent_distribution_roughly_matches() {
        let mut rng = RngState::new(99);
        let hits = (0..10_000).filter(|_| rng.rand_percent(30)).count();
        // Loose bound: a seeded deterministic RNG isn't obligated to be
        // unbiased, but this one should not be wildly off from 30%.
        assert!((2_000..4_000).contains(&hits), "hits={hits}");
    }

    #[test]
    fn rand_clump_stays_in_range() {
        let mut rng = RngState::new(3);
        for _ in 0..500 {
            let v = rng.rand_clump(0, 20, 3);
            assert!((0..=20).contains(&v), "v={v}");
        }
    }

    #[test]
    fn rand_clump_factor_one_matches_rand_range() {
        let mut rng_a = RngState::new(3);
        let mut rng_b = RngState::new(3);
        assert_eq!(rng_a.rand_clump(0, 20, 1), rng_b.rand_range(0, 20));
    }

    #[test]
    fn fixed_point_range_respects_bounds() {
        let mut rng = RngState::new(5);
        let lo = Fixed::from_int(1);
        let hi = Fixed::from_int(4);
        for _ in 0..200 {
            let v = rng.rand_from_range_fixpt(lo, hi);
            assert!(v >= lo && v <= hi);
        }
    }

    #[test]
    fn reseed_for_depth_is_deterministic_and_depth_sensitive() {
        let a = RngState::reseed_for_depth(1234, 5);
        let b = RngState::reseed_for_depth(1234, 5);
        let c = RngState::reseed_for_depth(1234, 6);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut rng = RngState::new(42);
        let mut arr: Vec<usize> = (0..10).collect();
        rng.shuffle(&mut arr);
        let mut sorted = arr.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn shuffle_empty_and_single_are_no_ops() {
        let mut rng = RngState::new(42);
        let mut empty: Vec<u32> = vec![];
        rng.shuffle(&mut empty);
        assert!(empty.is_empty());

        let mut single = vec![42u32];
        rng.shuffle(&mut single);
        assert_eq!(single, vec![42]);
    }

    #[test]
    fn random_index_empty_is_none() {
        let mut rng = RngState::new(42);
        assert_eq!(rng.random_index(0), None);
    }

    #[test]
    fn random_index_in_range() {
        let mut rng = RngState::new(42);
        for _ in 0..200 {
            let idx = rng.random_index(5).unwrap();
            assert!(idx < 5);
        }
    }

    #[test]
    fn counter_increments_once_per_draw() {
        let mut rng = RngState::new(42);
        assert_eq!(rng.counter, 0);
        rng.rand_range(0, 10);
        assert_eq!(rng.counter, 1);
        rng.rand_percent(50);
        assert_eq!(rng.counter, 2);
    }

    #[test]
    fn cosmetic_rng_is_independent_of_gameplay_rng() {
        let mut gameplay = RngState::new(1);
        let mut cosmetic = CosmeticRng::new(1);
        let gameplay_draw = gameplay.rand_range(0, 1000);
        let cosmetic_draw = cosmetic.rand_range(0, 1000);
        // Same seed, same algorithm family, but distinct types: nothing
        // prevents them tracking identical state here, the point is that
        // the type system keeps them from being accidentally swapped.
        assert_eq!(gameplay_draw, cosmetic_draw);
    }
}
