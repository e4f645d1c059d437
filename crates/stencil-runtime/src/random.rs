//! Random number runtime
//!
//! `randomInt` is the one impure function in the basic library. Its routine
//! is an instance routine: the compiled code calls into a `RandomRuntime`
//! object registered by the host, so hosts can seed it deterministically.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{RuntimeError, RuntimeResult};

/// Per-renderer random source
pub struct RandomRuntime {
    rng: Mutex<StdRng>,
}

impl RandomRuntime {
    /// Deterministic source for tests and reproducible renders
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Source seeded from the operating system
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Uniform integer in `0..upper`
    pub fn random_int(&self, upper: i64) -> RuntimeResult<i64> {
        if upper <= 0 {
            return Err(RuntimeError::InvalidArgument {
                routine: "randomInt".to_string(),
                message: format!("upper bound must be positive, got {}", upper),
            });
        }
        Ok(self.rng.lock().gen_range(0..upper))
    }
}

impl Default for RandomRuntime {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_int_in_bounds() {
        let runtime = RandomRuntime::seeded(7);
        for _ in 0..200 {
            let n = runtime.random_int(10).unwrap();
            assert!((0..10).contains(&n));
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a = RandomRuntime::seeded(42);
        let b = RandomRuntime::seeded(42);
        let xs: Vec<i64> = (0..8).map(|_| a.random_int(1000).unwrap()).collect();
        let ys: Vec<i64> = (0..8).map(|_| b.random_int(1000).unwrap()).collect();
        assert_eq!(xs, ys);
    }

    #[test]
    fn test_non_positive_bound() {
        assert!(RandomRuntime::seeded(1).random_int(0).is_err());
    }
}
