use crate::Tile;

/// Running statistics for a game session.
///
/// - **Moves**: Shifts applied since the initial deal
/// - **Score**: Sum of [`Tile::score`] over the board after the latest move
/// - **Max tile**: Largest tile the board has held
/// - **Bonus tiles**: Bonus tiles inserted so far
///
/// # Example
///
/// ```
/// use threes_engine::{GameStats, Tile};
///
/// let mut stats = GameStats::new();
/// stats.complete_move(36, Tile::new(12), false);
/// stats.complete_move(45, Tile::new(12), true);
///
/// assert_eq!(stats.moves(), 2);
/// assert_eq!(stats.score(), 45);
/// assert_eq!(stats.bonus_tiles(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameStats {
    moves: usize,
    score: u64,
    max_tile: Tile,
    bonus_tiles: usize,
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self::with_board(0, Tile::EMPTY)
    }

    /// Starts tracking from a freshly dealt board.
    #[must_use]
    pub const fn with_board(score: u64, max_tile: Tile) -> Self {
        Self {
            moves: 0,
            score,
            max_tile,
            bonus_tiles: 0,
        }
    }

    #[must_use]
    pub const fn moves(&self) -> usize {
        self.moves
    }

    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    #[must_use]
    pub const fn max_tile(&self) -> Tile {
        self.max_tile
    }

    #[must_use]
    pub const fn bonus_tiles(&self) -> usize {
        self.bonus_tiles
    }

    /// Records one applied shift and the board it produced.
    pub fn complete_move(&mut self, score: u64, max_tile: Tile, bonus: bool) {
        self.moves += 1;
        self.score = score;
        self.max_tile = self.max_tile.max(max_tile);
        if bonus {
            self.bonus_tiles += 1;
        }
    }
}
