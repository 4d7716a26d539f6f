//! Injected randomness.
//!
//! The engine never owns a source of entropy: the world is handed a
//! [`RandomProvider`] and every randomized action draws from it exactly
//! once per invocation. With a seeded provider a simulation replays
//! identically.
//!
//! [`GameRng`] is the default provider: ChaCha8 seeded from a `u64`, with
//! forking for independent search branches.
//!
//! ```
//! use brazier_core::core::{GameRng, RandomProvider};
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//! assert_eq!(a.roll(1, 6), b.roll(1, 6));
//!
//! let mut branch = a.fork();
//! let value = branch.roll(1, 6);
//! assert!((1..=6).contains(&value));
//! ```

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Source of randomness used by randomized actions.
pub trait RandomProvider {
    /// Uniform integer in `[min, max]` (inclusive). `min >= max` yields `min`.
    ///
    /// Degenerate ranges still advance the stream, so whether a call draws
    /// never depends on its arguments.
    fn roll(&mut self, min: i32, max: i32) -> i32;

    /// Uniform index into a collection of `len` elements, `None` when empty.
    ///
    /// Advances the stream for every `len`, including 0.
    fn pick_index(&mut self, len: usize) -> Option<usize>;
}

/// Deterministic ChaCha8 random provider.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// Fork an independent, deterministic branch.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self
            .seed
            .wrapping_add(self.fork_counter.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        Self::new(fork_seed)
    }

    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Capture the stream position for later replay.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
            fork_counter: self.fork_counter,
        }
    }

    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
            fork_counter: state.fork_counter,
        }
    }
}

impl RandomProvider for GameRng {
    fn roll(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            let _ = self.inner.next_u32();
            return min;
        }
        self.inner.gen_range(min..=max)
    }

    fn pick_index(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            let _ = self.inner.next_u32();
            return None;
        }
        Some(self.inner.gen_range(0..len))
    }
}

/// Serializable position of a [`GameRng`] stream.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    pub seed: u64,
    /// ChaCha8 word position (128-bit counter).
    pub word_pos: u128,
    pub fork_counter: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determinism() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.roll(0, 1000), rng2.roll(0, 1000));
        }
    }

    #[test]
    fn test_roll_is_inclusive() {
        let mut rng = GameRng::new(7);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let value = rng.roll(1, 3);
            assert!((1..=3).contains(&value));
            seen[(value - 1) as usize] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_degenerate_range() {
        let mut rng = GameRng::new(7);
        assert_eq!(rng.roll(4, 4), 4);
        assert_eq!(rng.roll(5, 2), 5);
    }

    #[test]
    fn test_every_call_advances_stream() {
        let mut rng = GameRng::new(11);
        let calls: [fn(&mut GameRng); 4] = [
            |rng| {
                rng.roll(4, 4);
            },
            |rng| {
                rng.roll(5, 2);
            },
            |rng| {
                rng.pick_index(0);
            },
            |rng| {
                rng.pick_index(1);
            },
        ];
        for call in calls {
            let before = rng.state().word_pos;
            call(&mut rng);
            assert!(rng.state().word_pos > before);
        }
    }

    #[test]
    fn test_pick_index() {
        let mut rng = GameRng::new(3);
        assert_eq!(rng.pick_index(0), None);
        assert_eq!(rng.pick_index(1), Some(0));
        for _ in 0..50 {
            assert!(rng.pick_index(4).is_some_and(|i| i < 4));
        }
    }

    #[test]
    fn test_fork_is_deterministic() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        let mut forked1 = rng1.fork();
        let mut forked2 = rng2.fork();

        assert_eq!(forked1.seed(), forked2.seed());
        assert_eq!(forked1.roll(0, 1000), forked2.roll(0, 1000));
        assert_ne!(forked1.seed(), rng1.seed());
    }

    #[test]
    fn test_state_round_trip() {
        let mut rng = GameRng::new(42);
        for _ in 0..10 {
            rng.roll(0, 1000);
        }

        let state = rng.state();
        let expected: Vec<_> = (0..10).map(|_| rng.roll(0, 1000)).collect();

        let mut restored = GameRng::from_state(&state);
        let actual: Vec<_> = (0..10).map(|_| restored.roll(0, 1000)).collect();
        assert_eq!(expected, actual);
    }
}
