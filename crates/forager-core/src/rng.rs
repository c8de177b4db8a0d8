//! Seeded randomness for stochastic selection. Not cryptographic.

const GOLDEN_GAMMA: u64 = 0x9E37_79B9_7F4A_7C15;

/// Source of uniformly distributed bits.
pub trait DeterministicRng {
    fn next_u64(&mut self) -> u64;

    /// Uniform in `[0, 1)`, built from the top 53 bits.
    fn next_f64_unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// SplitMix64 generator. A seed always yields the same sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }
}

impl DeterministicRng for SplitMix64 {
    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        finalize(self.state)
    }
}

fn finalize(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Seed of the `stream` generator for one cycle of a run seeded with `seed`.
pub fn derive_seed(seed: u64, cycle: u64, stream: u64) -> u64 {
    finalize(seed ^ finalize(cycle.wrapping_add(GOLDEN_GAMMA)) ^ finalize(stream))
}
