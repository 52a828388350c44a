//! Random number generation for expansion and rollouts.
//!
//! `GameRng` is a seeded ChaCha8 stream: the same seed always yields the
//! same expansion order. `RandomSource` hands every thread its own
//! `GameRng`, seeded from a process-wide atomic counter, so threads running
//! rollouts side by side never contend on one generator or share a seed.
//!
//! ```
//! use mcts_engine::core::{GameRng, RandomSource};
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//! assert_eq!(a.gen_range_usize(0..1000), b.gen_range_usize(0..1000));
//!
//! let roll = RandomSource::with(|rng| rng.gen_range_usize(0..6));
//! assert!(roll < 6);
//! ```

use std::cell::RefCell;
use std::sync::atomic::{AtomicU64, Ordering};

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Golden-ratio multiplier spreading consecutive counter values apart.
const SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Seeded uniform generator.
///
/// ChaCha8 keeps it fast enough for playouts without giving up quality.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl GameRng {
    /// Create a new RNG with the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// The seed this generator was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Uniform integer in `range`. Panics on an empty range.
    pub fn gen_range_usize(&mut self, range: std::ops::Range<usize>) -> usize {
        self.inner.gen_range(range)
    }

    /// Uniformly chosen element, `None` for an empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        items.choose(&mut self.inner)
    }
}

static SEED_COUNTER: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_RNG: RefCell<GameRng> = RefCell::new(GameRng::new(RandomSource::next_seed()));
}

/// Per-thread uniform random source.
///
/// The first use on a thread lazily creates that thread's generator.
pub struct RandomSource;

impl RandomSource {
    /// Draw a fresh seed from the shared counter.
    ///
    /// Seeds are never handed out twice within a process.
    #[must_use]
    pub fn next_seed() -> u64 {
        SEED_COUNTER
            .fetch_add(1, Ordering::Relaxed)
            .wrapping_mul(SEED_STRIDE)
    }

    /// Run `f` with this thread's generator.
    ///
    /// Calls must not nest on the same thread.
    pub fn with<R>(f: impl FnOnce(&mut GameRng) -> R) -> R {
        THREAD_RNG.with(|rng| f(&mut rng.borrow_mut()))
    }

    /// An owned generator with its own seed, for handing to another thread.
    #[must_use]
    pub fn fork() -> GameRng {
        GameRng::new(Self::next_seed())
    }

    /// Uniform integer in `range` from this thread's generator.
    pub fn gen_range_usize(range: std::ops::Range<usize>) -> usize {
        Self::with(|rng| rng.gen_range_usize(range))
    }
}
