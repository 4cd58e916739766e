use rand::SeedableRng;
use rand_core::{impls, RngCore};
use serde::{Deserialize, Serialize};

/// Small fast deterministic generator based on the Mulberry32 mixer.
///
/// Output depends only on the 32-bit seed, so a seed reproduces the exact
/// same stream on every platform. Not suitable for anything that needs
/// unpredictability.
#[derive(
    Copy, Clone, Default, Eq, PartialEq, Hash, Debug, Serialize, Deserialize,
)]
pub struct GameRng {
    state: u32,
}

impl GameRng {
    pub fn new(seed: u32) -> Self {
        GameRng { state: seed }
    }
}

impl RngCore for GameRng {
    fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_add(0x6D2B_79F5);
        let mut t = self.state;
        t = (t ^ (t >> 15)).wrapping_mul(t | 1);
        t ^= t.wrapping_add((t ^ (t >> 7)).wrapping_mul(t | 61));
        t ^ (t >> 14)
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_u32(self)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        impls::fill_bytes_via_next(self, dst)
    }
}

impl SeedableRng for GameRng {
    type Seed = [u8; 4];

    fn from_seed(seed: Self::Seed) -> Self {
        GameRng::new(u32::from_le_bytes(seed))
    }
}

/// Derive the seed of a single dungeon level from the seed of the whole run.
pub fn level_seed(seed: u32, depth: u32) -> u32 {
    // Splitmix-style finalizer so neighboring depths get unrelated streams.
    let mut z = seed ^ depth.wrapping_mul(0x9E37_79B9);
    z = (z ^ (z >> 16)).wrapping_mul(0x85EB_CA6B);
    z = (z ^ (z >> 13)).wrapping_mul(0xC2B2_AE35);
    z ^ (z >> 16)
}

pub trait RngExt {
    /// Uniform float in [0, 1).
    fn unit(&mut self) -> f64;

    /// Uniform integer in the inclusive range [min, max].
    fn int_in(&mut self, min: i32, max: i32) -> i32;

    /// Uniformly chosen element, `None` for an empty slice.
    fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T>;

    fn one_chance_in(&mut self, n: usize) -> bool;
}

impl<R: RngCore + ?Sized> RngExt for R {
    fn unit(&mut self) -> f64 {
        self.next_u32() as f64 / 4_294_967_296.0
    }

    fn int_in(&mut self, min: i32, max: i32) -> i32 {
        assert!(min <= max, "int_in: empty range {min}..={max}");
        let span = (max as i64 - min as i64 + 1) as f64;
        (min as i64 + (self.unit() * span).floor() as i64) as i32
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let i = self.int_in(0, items.len() as i32 - 1);
        items.get(i as usize)
    }

    fn one_chance_in(&mut self, n: usize) -> bool {
        if n == 0 {
            return false;
        }
        self.int_in(0, n as i32 - 1) == 0
    }
}
