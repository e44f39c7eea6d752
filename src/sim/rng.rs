//! Seeded random source
//!
//! Every stochastic decision in a run (traffic jitter, spawn placement,
//! sensor removal, pool colors) draws from the `Randomizer` owned by that
//! run's state. Drawing before seeding is an error, never a silent default.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::RngError;

/// Seed value for a run. Integers seed by their decimal text so
/// `Seed::from(12345)` and `Seed::from("12345")` give the same stream.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Seed(String);

impl Seed {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Stretch the seed text into PCG seed bytes
    fn to_pcg_seed(&self) -> [u8; 16] {
        let digest = blake3::hash(self.0.as_bytes());
        let mut bytes = [0u8; 16];
        bytes.copy_from_slice(&digest.as_bytes()[..16]);
        bytes
    }
}

impl From<&str> for Seed {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for Seed {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<u64> for Seed {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl std::fmt::Display for Seed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-run pseudo-random stream
#[derive(Debug, Clone, Default)]
pub struct Randomizer {
    rng: Option<Pcg32>,
}

impl Randomizer {
    /// Unseeded source; every draw fails until `seed` is called
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(value: impl Into<Seed>) -> Self {
        let mut rng = Self::new();
        rng.seed(value);
        rng
    }

    /// (Re)initialize the stream from `value`
    pub fn seed(&mut self, value: impl Into<Seed>) {
        let seed = value.into();
        log::debug!("Seeded RNG with {seed}");
        self.rng = Some(Pcg32::from_seed(seed.to_pcg_seed()));
    }

    pub fn is_seeded(&self) -> bool {
        self.rng.is_some()
    }

    fn stream(&mut self) -> Result<&mut Pcg32, RngError> {
        self.rng.as_mut().ok_or(RngError::Unseeded)
    }

    /// Uniform draw in [0, 1)
    pub fn random_uniform(&mut self) -> Result<f64, RngError> {
        Ok(self.stream()?.random::<f64>())
    }

    /// Uniform index in [0, len)
    pub fn random_index(&mut self, len: usize) -> Result<usize, RngError> {
        let rng = self.stream()?;
        if len == 0 {
            return Err(RngError::EmptyChoice);
        }
        Ok(rng.random_range(0..len))
    }

    /// Pick one element uniformly
    pub fn random_choice<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T, RngError> {
        let index = self.random_index(items.len())?;
        Ok(&items[index])
    }
}
