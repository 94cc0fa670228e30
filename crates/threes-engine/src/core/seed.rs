use std::fmt::Write as _;

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Seed for deterministic games.
///
/// A 128-bit seed that initializes every random source in a game: board lane
/// selection, deck draws, bonus odds, and search sampling. Using the same seed
/// with the same configuration reproduces the same game.
///
/// Serialized as a 32-character lowercase hex string.
///
/// # Example
///
/// ```
/// use threes_engine::GameSeed;
/// use rand::Rng as _;
///
/// let seed: GameSeed = rand::rng().random();
/// let json = serde_json::to_string(&seed).unwrap();
/// assert_eq!(json.len(), 34); // 32 hex digits plus quotes
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSeed([u8; 16]);

impl GameSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn from_u128(num: u128) -> Self {
        Self(num.to_be_bytes())
    }

    /// Creates the generator every seeded component uses.
    #[must_use]
    pub fn rng(self) -> Pcg32 {
        Pcg32::from_seed(self.0)
    }
}

impl Serialize for GameSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let num = u128::from_be_bytes(self.0);
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{num:032x}").map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for GameSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid hex: expected 32 characters, got {}",
                hex_str.len()
            )));
        }
        let num = u128::from_str_radix(&hex_str, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid hex: {hex_str} ({e})")))?;
        Ok(Self::from_u128(num))
    }
}

impl Distribution<GameSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> GameSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        GameSeed(seed)
    }
}
