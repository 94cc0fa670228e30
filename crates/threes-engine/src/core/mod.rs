//! Value types and the grid the game is played on.
//!
//! - [`Tile`] - A numbered tile and the combination law
//! - [`Direction`] - The four shift directions
//! - [`Board`] - Fixed-size grid with the shift-and-insert transform
//! - [`BoardSnapshot`] - Size-erased read-only view consumed by evaluators
//! - [`GameSeed`] - Seed for every random source in a game

pub use self::{board::*, direction::*, seed::*, tile::*};

pub(crate) mod board;
pub(crate) mod direction;
pub(crate) mod seed;
pub(crate) mod tile;
