//! Seeded random streams.
//!
//! Every citizen draws from its own `SmallRng`, seeded from the run seed and
//! the citizen id, so a newborn's stream never shifts anyone else's.  Global
//! draws (utility failures, initial birthdays) come from [`SimRng`] and the
//! child streams split off it.

use rand::distributions::uniform::{SampleRange, SampleUniform};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::CitizenId;

/// Golden-ratio multiplier; spreads consecutive salts across the seed space.
const GOLDEN: u64 = 0x9e37_79b9_7f4a_7c15;

#[inline]
fn mix(seed: u64, salt: u64) -> u64 {
    seed ^ salt.wrapping_mul(GOLDEN)
}

/// Per-citizen stream.
#[derive(Clone, Debug)]
pub struct AgentRng(SmallRng);

impl AgentRng {
    pub fn new(global_seed: u64, citizen: CitizenId) -> Self {
        AgentRng(SmallRng::seed_from_u64(mix(global_seed, u64::from(citizen.0))))
    }

    #[inline]
    pub fn gen_range<T: SampleUniform, R: SampleRange<T>>(&mut self, range: R) -> T {
        self.0.gen_range(range)
    }

    /// `true` with probability `p`; `p` outside `[0, 1]` is clamped.
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}

/// Run-wide stream, owned by the tick loop.
#[derive(Clone, Debug)]
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Split off an independent stream.  Different `stream` values give
    /// different children for the same parent state.
    pub fn child(&mut self, stream: u64) -> SimRng {
        let base: u64 = self.0.r#gen();
        SimRng(SmallRng::seed_from_u64(mix(base, stream)))
    }

    #[inline]
    pub fn gen_range<T: SampleUniform, R: SampleRange<T>>(&mut self, range: R) -> T {
        self.0.gen_range(range)
    }

    /// Same clamping as [`AgentRng::gen_bool`].
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }
}
