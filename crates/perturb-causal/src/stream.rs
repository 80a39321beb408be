//! The seeded random stream owned by a causal model.
//!
//! A stream runs in two phases. Construction draws (biases, edge weights,
//! intervention signs) come from the raw seed. Once the graph is built the
//! stream is re-keyed for sampling, so sample draws depend only on the seed
//! and on how many samples came before, never on how the graph was built.
//! A graph restored from disk skips construction draws and still reproduces
//! the samples of the graph it was saved from.

use perturb_core::constants::MAX_GENERATED_SEED;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

const SAMPLING_KEY: u64 = 0x9E37_79B9_7F4A_7C15;

/// Which draws the stream is currently serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamPhase {
    Construction,
    Sampling,
}

#[derive(Debug, Clone)]
pub struct RandomStream {
    seed: u64,
    phase: StreamPhase,
    rng: StdRng,
}

impl RandomStream {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            phase: StreamPhase::Construction,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw a fresh seed in `[0, MAX_GENERATED_SEED)` from thread entropy.
    pub fn generated_seed() -> u64 {
        rand::thread_rng().gen_range(0..MAX_GENERATED_SEED)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> StreamPhase {
        self.phase
    }

    /// Switch to the sampling phase. Idempotent.
    pub fn begin_sampling(&mut self) {
        if self.phase == StreamPhase::Sampling {
            return;
        }
        self.rng = StdRng::seed_from_u64(self.seed ^ SAMPLING_KEY);
        self.phase = StreamPhase::Sampling;
    }
}

impl RngCore for RandomStream {
    fn next_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.rng.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.rng.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.rng.try_fill_bytes(dest)
    }
}
