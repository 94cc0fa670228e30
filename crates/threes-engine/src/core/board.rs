use std::fmt;

use arrayvec::ArrayVec;
use rand::{Rng as _, RngCore, SeedableRng as _, seq::index};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{BoardSetupError, ShiftError};

use super::{direction::Direction, seed::GameSeed, tile::Tile};

/// How a shift picks the line that receives the new tile.
///
/// Applies only when the streak rule does not: if the previous shift went the
/// same direction and inserted into a line that moved again, that line is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaneChoice {
    /// Uniformly random among the lines that moved.
    #[default]
    Uniform,
    /// Always the lowest-indexed line that moved.
    Lowest,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub lane_choice: LaneChoice,
}

impl BoardConfig {
    #[must_use]
    pub fn with_lane_choice(mut self, lane_choice: LaneChoice) -> Self {
        self.lane_choice = lane_choice;
        self
    }
}

/// One row or column, walked from the leading edge of a shift.
///
/// Position `0` is the cell tiles move toward; position `dim - 1` is the
/// trailing cell that receives the inserted tile.
#[derive(Debug, Clone, Copy)]
struct Slice {
    start: usize,
    step: usize,
    forward: bool,
}

impl Slice {
    fn new(dim: usize, direction: Direction, line: usize) -> Self {
        debug_assert!(line < dim);
        let last = dim - 1;
        match direction {
            Direction::Up => Self {
                start: line,
                step: dim,
                forward: true,
            },
            Direction::Down => Self {
                start: line + last * dim,
                step: dim,
                forward: false,
            },
            Direction::Left => Self {
                start: line * dim,
                step: 1,
                forward: true,
            },
            Direction::Right => Self {
                start: line * dim + last,
                step: 1,
                forward: false,
            },
        }
    }

    fn index(self, pos: usize) -> usize {
        if self.forward {
            self.start + pos * self.step
        } else {
            self.start - pos * self.step
        }
    }
}

fn can_shift_slice(cells: &[Tile], slice: Slice, dim: usize) -> bool {
    (1..dim).any(|pos| cells[slice.index(pos)].can_combine_onto(cells[slice.index(pos - 1)]))
}

/// Performs at most one combination along `slice`, compacting everything
/// behind it one cell toward the leading edge.
///
/// Returns the combined tile, or `None` if nothing in the slice could move.
fn shift_slice(cells: &mut [Tile], slice: Slice, dim: usize) -> Option<Tile> {
    let pos = (1..dim)
        .find(|&pos| cells[slice.index(pos)].can_combine_onto(cells[slice.index(pos - 1)]))?;
    let dest = slice.index(pos - 1);
    let merged = cells[slice.index(pos)].combined_onto(cells[dest]);
    cells[dest] = merged;
    for p in pos..dim - 1 {
        cells[slice.index(p)] = cells[slice.index(p + 1)];
    }
    cells[slice.index(dim - 1)] = Tile::EMPTY;
    Some(merged)
}

/// Read-only view of a board's cells, independent of its dimension.
///
/// Evaluators score this view so they can be shared across board sizes.
#[derive(Debug, Clone, Copy)]
pub struct BoardSnapshot<'a> {
    cells: &'a [Tile],
    dim: usize,
    max_tile: Tile,
}

impl<'a> BoardSnapshot<'a> {
    /// Creates a snapshot from row-major cells.
    ///
    /// # Panics
    ///
    /// Panics if `cells.len() != dim * dim`.
    #[must_use]
    pub fn new(cells: &'a [Tile], dim: usize) -> Self {
        assert_eq!(cells.len(), dim * dim, "snapshot must be square");
        let max_tile = cells.iter().copied().max().unwrap_or(Tile::EMPTY);
        Self {
            cells,
            dim,
            max_tile,
        }
    }

    #[must_use]
    pub fn cells(&self) -> &'a [Tile] {
        self.cells
    }

    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Largest tile seen on the board this snapshot was taken from.
    #[must_use]
    pub fn max_tile(&self) -> Tile {
        self.max_tile
    }

    #[must_use]
    pub fn tile_at(&self, row: usize, col: usize) -> Tile {
        self.cells[col + row * self.dim]
    }
}

/// An `N×N` grid of tiles.
///
/// Cells are stored row-major; the flat index of `(row, col)` is `col + row * N`.
/// The board is mutated only through [`Board::shift`], which combines or
/// compacts every line in the shift direction and then inserts one new tile
/// into the trailing cell of a line that moved.
///
/// # Shift Rules
///
/// Each line is scanned from the leading edge. The first adjacent pair whose
/// trailing tile can combine onto its leading neighbor is merged, and every
/// tile behind it moves one cell toward the leading edge. At most one merge
/// happens per line per shift.
///
/// # Example
///
/// ```
/// use threes_engine::{Board, BoardConfig, Direction, GameSeed, LaneChoice, Tile};
///
/// let config = BoardConfig::default().with_lane_choice(LaneChoice::Lowest);
/// let mut board = Board::<3>::with_positions(&[Tile::new(1)], &[6], &config, GameSeed::from_u128(0));
///
/// board.shift(Direction::Right, Tile::new(2));
/// assert_eq!(board.tile_at(2, 1), Tile::new(1));
/// assert_eq!(board.tile_at(2, 0), Tile::new(2));
/// ```
#[derive(Debug, Clone)]
pub struct Board<const N: usize> {
    cells: [[Tile; N]; N],
    max_tile: Tile,
    last_shift: Option<(Direction, usize)>,
    lane_choice: LaneChoice,
    rng: Pcg32,
}

impl<const N: usize> Board<N> {
    /// Number of cells on the board.
    pub const CELLS: usize = N * N;

    /// Places `tiles` at the given flat indices.
    pub fn try_with_positions(
        tiles: &[Tile],
        positions: &[usize],
        config: &BoardConfig,
        seed: GameSeed,
    ) -> Result<Self, BoardSetupError> {
        if tiles.len() != positions.len() {
            return Err(BoardSetupError::TileCountMismatch {
                tiles: tiles.len(),
                positions: positions.len(),
            });
        }
        let mut board = Self::empty(config, seed);
        let cells = board.cells.as_flattened_mut();
        let mut placed = vec![false; Self::CELLS];
        for (&tile, &position) in tiles.iter().zip(positions) {
            if position >= Self::CELLS {
                return Err(BoardSetupError::PositionOutOfRange {
                    position,
                    cells: Self::CELLS,
                });
            }
            if placed[position] {
                return Err(BoardSetupError::DuplicatePosition { position });
            }
            placed[position] = true;
            cells[position] = tile;
        }
        board.max_tile = tiles.iter().copied().max().unwrap_or(Tile::EMPTY);
        Ok(board)
    }

    /// Like [`Self::try_with_positions`], but a malformed layout is a contract violation.
    ///
    /// # Panics
    ///
    /// Panics if the tile and position counts differ, or a position is out of
    /// range or repeated.
    #[must_use]
    pub fn with_positions(
        tiles: &[Tile],
        positions: &[usize],
        config: &BoardConfig,
        seed: GameSeed,
    ) -> Self {
        match Self::try_with_positions(tiles, positions, config, seed) {
            Ok(board) => board,
            Err(e) => panic!("invalid initial board: {e}"),
        }
    }

    /// Places `tiles` at unique positions sampled without replacement.
    pub fn try_with_random_positions(
        tiles: &[Tile],
        config: &BoardConfig,
        seed: GameSeed,
    ) -> Result<Self, BoardSetupError> {
        if tiles.len() > Self::CELLS {
            return Err(BoardSetupError::TooManyTiles {
                tiles: tiles.len(),
                cells: Self::CELLS,
            });
        }
        let mut rng = seed.rng();
        let positions = index::sample(&mut rng, Self::CELLS, tiles.len()).into_vec();
        let mut board = Self::try_with_positions(tiles, &positions, config, seed)?;
        board.rng = rng;
        Ok(board)
    }

    /// Like [`Self::try_with_random_positions`], but too many tiles is a contract violation.
    ///
    /// # Panics
    ///
    /// Panics if `tiles` has more entries than the board has cells.
    #[must_use]
    pub fn with_random_positions(tiles: &[Tile], config: &BoardConfig, seed: GameSeed) -> Self {
        match Self::try_with_random_positions(tiles, config, seed) {
            Ok(board) => board,
            Err(e) => panic!("invalid initial board: {e}"),
        }
    }

    fn empty(config: &BoardConfig, seed: GameSeed) -> Self {
        Self {
            cells: [[Tile::EMPTY; N]; N],
            max_tile: Tile::EMPTY,
            last_shift: None,
            lane_choice: config.lane_choice,
            rng: seed.rng(),
        }
    }

    /// Deep copy with an independent random source drawn from `rng`.
    ///
    /// Search branches fork the board so that their lane choices do not
    /// replay each other.
    #[must_use]
    pub fn forked<R: RngCore>(&self, rng: &mut R) -> Self {
        let mut board = self.clone();
        board.rng = Pcg32::from_rng(rng);
        board
    }

    #[must_use]
    pub const fn dim(&self) -> usize {
        N
    }

    #[must_use]
    pub fn tile_at(&self, row: usize, col: usize) -> Tile {
        self.cells[row][col]
    }

    /// Row-major view of all cells.
    #[must_use]
    pub fn cells(&self) -> &[Tile] {
        self.cells.as_flattened()
    }

    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot<'_> {
        BoardSnapshot {
            cells: self.cells(),
            dim: N,
            max_tile: self.max_tile,
        }
    }

    /// Largest tile that has appeared on this board. Never decreases.
    #[must_use]
    pub fn max_tile(&self) -> Tile {
        self.max_tile
    }

    #[must_use]
    pub fn empty_count(&self) -> usize {
        self.cells().iter().filter(|t| t.is_empty()).count()
    }

    /// Sum of [`Tile::score`] over every cell.
    #[must_use]
    pub fn score(&self) -> u64 {
        self.cells().iter().map(|t| t.score()).sum()
    }

    /// Direction and line index of the most recent insertion.
    #[must_use]
    pub fn last_shift(&self) -> Option<(Direction, usize)> {
        self.last_shift
    }

    /// Returns `true` if at least one line can move in `direction`.
    ///
    /// Boards smaller than 2×2 never shift.
    #[must_use]
    pub fn can_shift(&self, direction: Direction) -> bool {
        if N < 2 {
            return false;
        }
        let cells = self.cells();
        (0..N).any(|line| can_shift_slice(cells, Slice::new(N, direction, line), N))
    }

    #[must_use]
    pub fn can_shift_any(&self) -> bool {
        Direction::ALL.into_iter().any(|d| self.can_shift(d))
    }

    /// Shifts every line in `direction` and inserts `tile` into one vacated trailing cell.
    pub fn try_shift(&mut self, direction: Direction, tile: Tile) -> Result<(), ShiftError> {
        if !self.can_shift(direction) {
            return Err(ShiftError { direction });
        }

        let mut lanes = ArrayVec::<usize, N>::new();
        let cells = self.cells.as_flattened_mut();
        for line in 0..N {
            if let Some(merged) = shift_slice(cells, Slice::new(N, direction, line), N) {
                self.max_tile = self.max_tile.max(merged);
                lanes.push(line);
            }
        }

        let line = self.choose_lane(direction, &lanes);
        let index = Slice::new(N, direction, line).index(N - 1);
        let cell = &mut self.cells.as_flattened_mut()[index];
        assert!(
            cell.is_empty(),
            "insertion cell {index} holds {cell} after shifting {direction}"
        );
        *cell = tile;
        self.max_tile = self.max_tile.max(tile);
        self.last_shift = Some((direction, line));
        Ok(())
    }

    /// Like [`Self::try_shift`], but an unshiftable direction is a contract violation.
    ///
    /// # Panics
    ///
    /// Panics if `self.can_shift(direction)` is `false`.
    pub fn shift(&mut self, direction: Direction, tile: Tile) {
        if let Err(e) = self.try_shift(direction, tile) {
            panic!("{e}");
        }
    }

    fn choose_lane(&mut self, direction: Direction, lanes: &[usize]) -> usize {
        debug_assert!(!lanes.is_empty());
        if let Some((last_direction, last_line)) = self.last_shift {
            if last_direction == direction && lanes.contains(&last_line) {
                return last_line;
            }
        }
        match self.lane_choice {
            LaneChoice::Lowest => lanes[0],
            LaneChoice::Uniform => lanes[self.rng.random_range(0..lanes.len())],
        }
    }
}

impl<const N: usize> fmt::Display for Board<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for tile in row {
                write!(f, "{:>6}", tile.value())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
