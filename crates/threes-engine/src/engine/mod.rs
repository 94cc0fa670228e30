//! Game flow built on the core board.
//!
//! - [`TileSequence`] - Deck dealing with one-tile lookahead and bonus tiles
//! - [`bonus_tile`] - Bonus tile denominations keyed to the board's max tile
//! - [`GameSession`] - Initial deal, move application, game-over detection
//! - [`GameStats`] - Moves, score, max tile, bonus count
//!
//! # Game Flow
//!
//! 1. Deal the initial tiles from the sequence onto random cells
//! 2. Pick a shiftable direction
//! 3. Draw the held tile (the sequence sees the board and may queue a bonus)
//! 4. Shift the board and insert the tile on the trailing edge
//! 5. Repeat until no direction can shift

pub use self::{bonus::*, game_session::*, game_stats::*, tile_sequence::*};

mod bonus;
mod game_session;
mod game_stats;
mod tile_sequence;
