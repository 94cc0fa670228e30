use serde::{Deserialize, Serialize};

/// A numbered tile on the board.
///
/// Tiles follow the Threes convention: the base pair `1` and `2`, then
/// `3 · 2ⁿ` (3, 6, 12, 24, ...). A value of `0` denotes an empty cell.
///
/// # Combination Law
///
/// A tile `a` combines onto a tile `b` (the value of `a` moves into `b` and the
/// slot of `a` is vacated) when any of the following holds:
///
/// 1. `b` is empty and `a` is not (slide onto an empty cell)
/// 2. `a + b == 3` (the base `1 + 2` pair)
/// 3. `a > 2` and `a == b` (equal pairs of `3 · 2ⁿ`)
///
/// Rule 1 is directional: an empty tile never combines onto a populated one.
///
/// # Example
///
/// ```
/// use threes_engine::Tile;
///
/// assert!(Tile::new(1).can_combine_onto(Tile::new(2)));
/// assert!(Tile::new(6).can_combine_onto(Tile::new(6)));
/// assert!(!Tile::new(2).can_combine_onto(Tile::new(2)));
/// assert!(!Tile::EMPTY.can_combine_onto(Tile::new(3)));
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(transparent)]
pub struct Tile(u32);

impl Tile {
    /// The empty cell.
    pub const EMPTY: Self = Self(0);

    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if `self` may merge onto `dest`.
    #[must_use]
    pub const fn can_combine_onto(self, dest: Self) -> bool {
        if self.0 == 0 {
            return false;
        }
        let slide = dest.0 == 0;
        let base_pair = self.0 + dest.0 == 3;
        let equal_pair = self.0 > 2 && self.0 == dest.0;
        slide || base_pair || equal_pair
    }

    /// Merges `self` onto `dest` and returns the resulting tile.
    ///
    /// The vacated source slot is left to the caller, which compacts the line.
    #[must_use]
    pub const fn combined_onto(self, dest: Self) -> Self {
        debug_assert!(self.can_combine_onto(dest));
        Self(dest.0 + self.0)
    }

    /// Returns the point value of this tile in a final board tally.
    ///
    /// `1` and `2` are worth nothing; a tile `3 · 2ⁿ` is worth `3ⁿ⁺¹`.
    #[must_use]
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn score(self) -> u64 {
        const EPSILON: f64 = 1e-2;
        if self.0 <= 2 {
            return 0;
        }
        let times_combined = (f64::from(self.0) / 3.0).log2() + 1.0;
        (3.0_f64.powf(times_combined) + EPSILON) as u64
    }
}
