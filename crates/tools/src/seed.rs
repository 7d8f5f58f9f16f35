//! Seed selection for `cave` runs. Unseeded runs get a fresh seed that is
//! reported alongside the cave so the run can be replayed with `--seed`.

use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedOrigin {
    /// Passed with `--seed`.
    Flag,
    /// Drawn from the clock, the process id and a per-process draw counter.
    Fresh,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSeed {
    pub value: u64,
    pub origin: SeedOrigin,
}

impl RunSeed {
    pub fn from_flag(flag: Option<u64>) -> Self {
        flag.map_or_else(Self::fresh, |value| Self { value, origin: SeedOrigin::Flag })
    }

    pub fn fresh() -> Self {
        Self { value: fresh_seed(), origin: SeedOrigin::Fresh }
    }
}

static FRESH_DRAWS: AtomicU64 = AtomicU64::new(0);

fn fresh_seed() -> u64 {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos() as u64);
    let draw = FRESH_DRAWS.fetch_add(1, Ordering::Relaxed);
    let entropy = nanos ^ u64::from(process::id()).rotate_left(32) ^ draw.rotate_left(48);
    ChaCha8Rng::seed_from_u64(entropy).next_u64()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_value_is_used_verbatim() {
        let seed = RunSeed::from_flag(Some(4_242));
        assert_eq!(seed, RunSeed { value: 4_242, origin: SeedOrigin::Flag });
    }

    #[test]
    fn missing_flag_draws_a_fresh_seed() {
        assert_eq!(RunSeed::from_flag(None).origin, SeedOrigin::Fresh);
    }

    #[test]
    fn fresh_seeds_differ_between_draws() {
        let first = RunSeed::fresh().value;
        let second = RunSeed::fresh().value;
        assert_ne!(first, second, "consecutive fresh seeds should differ");
    }
}
