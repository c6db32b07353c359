//! Deterministic random sources for payload evaluation.
//!
//! Evaluation takes any [`rand::Rng`], so tests and replays can pass a seeded
//! generator and get identical draws.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// The generator used for payload sampling.
pub type SampleRng = ChaCha8Rng;

/// Creates a generator that always produces the same sequence for `seed`.
#[must_use]
pub fn seeded(seed: u64) -> SampleRng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Creates a generator seeded from the thread-local entropy source.
#[must_use]
pub fn unseeded() -> SampleRng {
    ChaCha8Rng::seed_from_u64(rand::random())
}
