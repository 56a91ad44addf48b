use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::ZRng;

/// ChaCha8 based RNG
///
/// The generator state is part of a game snapshot, so two copies compare equal exactly when
/// they will produce the same sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChaChaRng {
    rng: ChaCha8Rng,
}

impl Default for ChaChaRng {
    fn default() -> Self {
        ChaChaRng::new()
    }
}

impl ChaChaRng {
    /// Constructor, seeded from entropy
    pub fn new() -> ChaChaRng {
        ChaChaRng {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Constructor with a fixed seed
    ///
    /// # Arguments
    /// * `seed` - seed value
    pub fn seeded(seed: u16) -> ChaChaRng {
        ChaChaRng {
            rng: ChaCha8Rng::seed_from_u64(seed as u64),
        }
    }
}

impl ZRng for ChaChaRng {
    fn type_name(&self) -> &str {
        "ChaChaRng"
    }

    fn seed(&mut self, seed: u16) {
        if seed == 0 {
            debug!(target: "app::state", "RNG seeded from entropy");
            self.rng = ChaCha8Rng::from_entropy();
        } else {
            debug!(target: "app::state", "RNG seeded with {}", seed);
            self.rng = ChaCha8Rng::seed_from_u64(seed as u64)
        }
    }

    fn random(&mut self, range: u16) -> u16 {
        if range == 0 {
            0
        } else {
            self.rng.gen_range(1..=range)
        }
    }
}
