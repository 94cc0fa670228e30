use rand::{
    Rng,
    distr::{Distribution, StandardUniform},
};
use serde::{Deserialize, Serialize};

/// A shift direction.
///
/// Shifting `Up` moves tiles toward row 0; shifting `Left` moves tiles toward
/// column 0. The new tile always enters on the opposite (trailing) edge.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[display("up")]
    Up = 0,
    #[display("down")]
    Down = 1,
    #[display("left")]
    Left = 2,
    #[display("right")]
    Right = 3,
}

impl Distribution<Direction> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Direction {
        Direction::ALL[rng.random_range(0..Direction::LEN)]
    }
}

impl Direction {
    /// Number of directions (4).
    pub const LEN: usize = 4;

    /// All directions, in search order.
    pub const ALL: [Self; Self::LEN] = [Self::Up, Self::Down, Self::Left, Self::Right];

    #[must_use]
    pub const fn as_usize(self) -> usize {
        self as usize
    }
}
