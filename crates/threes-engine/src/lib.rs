//! Simulation of the Threes sliding-tile puzzle.
//!
//! Tiles on an `N×N` grid shift toward one edge, combining under the
//! [`Tile`] combination law, and a single new tile enters on the trailing edge
//! after every move. The tile to insert comes from a [`TileSequence`], which
//! deals from a shuffled deck and occasionally substitutes a bonus tile once the
//! board holds large values.
//!
//! - [`core`] - Tiles, directions, the board, seeds
//! - [`engine`] - Tile sequence, bonus tiles, game session, statistics
//!
//! # Example
//!
//! ```
//! use threes_engine::{Direction, GameSeed, GameSession, SessionConfig};
//!
//! let mut session = GameSession::<4>::new(&SessionConfig::default(), GameSeed::from_u128(7));
//! while !session.is_game_over() {
//!     let Some(direction) = Direction::ALL.into_iter().find(|&d| session.board().can_shift(d))
//!     else {
//!         break;
//!     };
//!     session.try_move(direction).unwrap();
//! }
//! assert!(session.stats().moves() > 0);
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardSetupError {
    #[display("got {tiles} tiles but {positions} positions")]
    TileCountMismatch { tiles: usize, positions: usize },
    #[display("position {position} is outside a board of {cells} cells")]
    PositionOutOfRange { position: usize, cells: usize },
    #[display("position {position} is used more than once")]
    DuplicatePosition { position: usize },
    #[display("{tiles} tiles do not fit on a board of {cells} cells")]
    TooManyTiles { tiles: usize, cells: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("cannot shift {direction}")]
pub struct ShiftError {
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BonusError {
    #[display("max tile {max_tile} is below the bonus threshold")]
    BelowThreshold { max_tile: Tile },
    #[display("max tile {max_tile} does not map to a bonus denomination")]
    NotADenomination { max_tile: Tile },
}
