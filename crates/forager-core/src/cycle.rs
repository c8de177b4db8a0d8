use crate::{rng, SplitMix64};

/// Per-cycle bookkeeping handed to the decision components.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleContext {
    /// Zero-based index of the cycle being processed.
    pub cycle: u64,
    pub seed: u64,
}

impl CycleContext {
    pub fn new(cycle: u64, seed: u64) -> Self {
        Self { cycle, seed }
    }

    /// Independent RNG stream for this cycle. Same `(seed, cycle, stream)` gives the same sequence.
    pub fn rng(&self, stream: u64) -> SplitMix64 {
        SplitMix64::new(rng::derive_seed(self.seed, self.cycle, stream))
    }
}
