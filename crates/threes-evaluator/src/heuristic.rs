//! Leaf evaluation: scoring a board position without further lookahead.
//!
//! The [`PositionalHeuristic`] rewards open space and combinable neighbors,
//! penalizes tiles boxed in by larger ones, and pushes the largest tiles toward
//! the walls.
//!
//! # Scoring Rules
//!
//! | Rule | Points |
//! |------|--------|
//! | Empty cell | +3 |
//! | Right or lower neighbor equal, double, or half | +2 |
//! | Tile bounded on both sides horizontally by a wall or larger tile | −5 |
//! | Same, vertically | −5 |
//! | Largest value in a corner | +6 |
//! | Largest value on a wall (not a corner) | +3 |
//! | Second-largest value on a wall | +1 |
//! | Second-largest value next to the largest | +1 |
//! | Third-largest value on a wall and next to the second-largest | +1 |
//!
//! "Largest" here ranks distinct values, so several tiles can share a rank.
//! An optional base term ([`BaseTerm`]) adds the board's max tile value.
//!
//! # Usage
//!
//! ```
//! use threes_engine::{Board, BoardConfig, GameSeed, Tile};
//! use threes_evaluator::heuristic::{BoardEvaluator, HeuristicConfig, PositionalHeuristic};
//!
//! let tiles = [Tile::new(1), Tile::new(2), Tile::new(3)];
//! let board = Board::<3>::with_positions(&tiles, &[0, 4, 8], &BoardConfig::default(), GameSeed::from_u128(0));
//!
//! let heuristic = PositionalHeuristic::new(&HeuristicConfig::default());
//! // six empty cells, and the largest tile sits in a corner
//! assert_eq!(heuristic.evaluate(&board.snapshot()), 3.0 * 6.0 + 6.0);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use threes_engine::{BoardSnapshot, Tile};

const EMPTY_CELL: f64 = 3.0;
const COMBINABLE_PAIR: f64 = 2.0;
const TRAPPED: f64 = -5.0;
const LARGEST_IN_CORNER: f64 = 6.0;
const LARGEST_ON_WALL: f64 = 3.0;
const RANK_BONUS: f64 = 1.0;

/// Scores a board position (higher is better).
pub trait BoardEvaluator: fmt::Debug + Send + Sync {
    /// Evaluates `board` without mutating anything; equal boards score equally.
    fn evaluate(&self, board: &BoardSnapshot<'_>) -> f64;
}

/// Base term added to every evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseTerm {
    /// Positional features only.
    #[default]
    None,
    /// The board's max tile value, rewarding raw progress.
    MaxTile,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    pub base_term: BaseTerm,
}

impl HeuristicConfig {
    #[must_use]
    pub fn with_base_term(mut self, base_term: BaseTerm) -> Self {
        self.base_term = base_term;
        self
    }
}

/// Per-rule contributions to a [`PositionalHeuristic`] score.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HeuristicBreakdown {
    pub base: f64,
    pub empty_cells: f64,
    pub combinable_pairs: f64,
    pub trapped: f64,
    pub rank_bonus: f64,
}

impl HeuristicBreakdown {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.base + self.empty_cells + self.combinable_pairs + self.trapped + self.rank_bonus
    }
}

#[derive(Debug, Clone)]
pub struct PositionalHeuristic {
    base_term: BaseTerm,
}

impl Default for PositionalHeuristic {
    fn default() -> Self {
        Self::new(&HeuristicConfig::default())
    }
}

impl PositionalHeuristic {
    #[must_use]
    pub fn new(config: &HeuristicConfig) -> Self {
        Self {
            base_term: config.base_term,
        }
    }

    /// Scores `board`, keeping each rule's contribution separate.
    #[must_use]
    pub fn breakdown(&self, board: &BoardSnapshot<'_>) -> HeuristicBreakdown {
        let dim = board.dim();
        let cells = board.cells();
        let top_three = top_three_values(cells);

        let mut breakdown = HeuristicBreakdown {
            base: match self.base_term {
                BaseTerm::None => 0.0,
                BaseTerm::MaxTile => f64::from(board.max_tile().value()),
            },
            ..HeuristicBreakdown::default()
        };

        for (i, tile) in cells.iter().enumerate() {
            let (row, col) = (i / dim, i % dim);
            let value = tile.value();
            if value == 0 {
                breakdown.empty_cells += EMPTY_CELL;
                continue;
            }

            if col + 1 < dim {
                breakdown.combinable_pairs += pair_score(value, cells[i + 1].value());
            }
            if row + 1 < dim {
                breakdown.combinable_pairs += pair_score(value, cells[i + dim].value());
            }

            let larger = |index: usize| cells[index].value() > value;
            let trapped_left = col == 0 || larger(i - 1);
            let trapped_right = col == dim - 1 || larger(i + 1);
            let trapped_above = row == 0 || larger(i - dim);
            let trapped_below = row == dim - 1 || larger(i + dim);
            if trapped_left && trapped_right {
                breakdown.trapped += TRAPPED;
            }
            if trapped_above && trapped_below {
                breakdown.trapped += TRAPPED;
            }

            let on_row_edge = row == 0 || row == dim - 1;
            let on_col_edge = col == 0 || col == dim - 1;
            let on_wall = on_row_edge || on_col_edge;
            let in_corner = on_row_edge && on_col_edge;
            let [third, second, first] = top_three;
            if value == third && on_wall {
                if next_to_value(board, row, col, second) {
                    breakdown.rank_bonus += RANK_BONUS;
                }
            } else if value == second {
                if on_wall {
                    breakdown.rank_bonus += RANK_BONUS;
                }
                if next_to_value(board, row, col, first) {
                    breakdown.rank_bonus += RANK_BONUS;
                }
            } else if value == first {
                if in_corner {
                    breakdown.rank_bonus += LARGEST_IN_CORNER;
                } else if on_wall {
                    breakdown.rank_bonus += LARGEST_ON_WALL;
                }
            }
        }

        breakdown
    }
}

impl BoardEvaluator for PositionalHeuristic {
    fn evaluate(&self, board: &BoardSnapshot<'_>) -> f64 {
        self.breakdown(board).total()
    }
}

/// The three largest distinct values on the board, ascending.
///
/// Slots start at `[0, 1, 2]`, so boards with fewer distinct values keep the
/// placeholders. A value enters only if it beats the smallest slot and is not
/// already ranked.
#[must_use]
pub fn top_three_values(cells: &[Tile]) -> [u32; 3] {
    let mut top = [0, 1, 2];
    for value in cells.iter().map(|t| t.value()) {
        if value <= top[0] || value == top[1] || value == top[2] {
            continue;
        }
        if value > top[2] {
            top = [top[1], top[2], value];
        } else if value > top[1] {
            top = [top[1], value, top[2]];
        } else {
            top[0] = value;
        }
    }
    top
}

/// Score for a tile next to `neighbor`: equal, double, or half.
#[must_use]
pub fn pair_score(value: u32, neighbor: u32) -> f64 {
    if value == neighbor || value == 2 * neighbor || neighbor == 2 * value {
        COMBINABLE_PAIR
    } else {
        0.0
    }
}

/// Returns `true` if any orthogonal neighbor of `(row, col)` holds `value`.
#[must_use]
pub fn next_to_value(board: &BoardSnapshot<'_>, row: usize, col: usize, value: u32) -> bool {
    let dim = board.dim();
    let is = |r: usize, c: usize| board.tile_at(r, c).value() == value;
    (col > 0 && is(row, col - 1))
        || (col + 1 < dim && is(row, col + 1))
        || (row > 0 && is(row - 1, col))
        || (row + 1 < dim && is(row + 1, col))
}

#[cfg(test)]
mod tests {
    use threes_engine::{Board, BoardConfig, Direction, GameSeed, LaneChoice};

    use super::*;

    fn board3(values: &[u32], positions: &[usize]) -> Board<3> {
        let tiles: Vec<_> = values.iter().copied().map(Tile::new).collect();
        let config = BoardConfig::default().with_lane_choice(LaneChoice::Lowest);
        Board::with_positions(&tiles, positions, &config, GameSeed::from_u128(0))
    }

    fn score(board: &Board<3>) -> f64 {
        PositionalHeuristic::default().evaluate(&board.snapshot())
    }

    mod ranking {
        use super::*;

        #[test]
        fn test_top_three_left_column() {
            let board = board3(&[1, 2, 3], &[0, 3, 6]);
            assert_eq!(top_three_values(board.cells()), [1, 2, 3]);
        }

        #[test]
        fn test_top_three_after_shift() {
            let mut board = board3(&[1, 2, 3], &[0, 3, 6]);
            board.shift(Direction::Right, Tile::new(6));
            assert_eq!(top_three_values(board.cells()), [2, 3, 6]);
        }

        #[test]
        fn test_top_three_ignores_duplicates() {
            let board = board3(&[12, 12, 6, 6, 3], &[0, 1, 2, 3, 4]);
            assert_eq!(top_three_values(board.cells()), [3, 6, 12]);
        }

        #[test]
        fn test_top_three_keeps_placeholders() {
            let board = board3(&[48], &[4]);
            assert_eq!(top_three_values(board.cells()), [1, 2, 48]);
            let empty = board3(&[], &[]);
            assert_eq!(top_three_values(empty.cells()), [0, 1, 2]);
        }
    }

    mod neighbors {
        use super::*;

        #[test]
        fn test_next_to_value_left_column() {
            // 1 0 0
            // 2 0 0
            // 3 0 0
            let board = board3(&[1, 2, 3], &[0, 3, 6]);
            let snapshot = board.snapshot();
            let next_to = |row, col, value| next_to_value(&snapshot, row, col, value);

            assert!(next_to(0, 0, 2));
            assert!(next_to(1, 0, 3));
            assert!(next_to(1, 0, 1));
            assert!(next_to(2, 0, 2));
            assert!(next_to(0, 1, 1));
            assert!(next_to(1, 1, 2));
            assert!(next_to(2, 1, 3));
            assert!(next_to(0, 2, 0));
            assert!(next_to(1, 2, 0));
            assert!(next_to(2, 2, 0));

            assert!(!next_to(0, 0, 6));
            assert!(!next_to(0, 0, 3));
            assert!(!next_to(1, 0, 2));
            assert!(!next_to(2, 0, 1));
            assert!(!next_to(2, 0, 3));
            assert!(!next_to(0, 1, 2));
            assert!(!next_to(1, 1, 3));
            assert!(!next_to(2, 1, 2));
            assert!(!next_to(0, 2, 1));
            assert!(!next_to(2, 2, 2));
        }

        #[test]
        fn test_next_to_value_after_shift() {
            // 6 1 0
            // 0 2 0
            // 0 3 0
            let mut board = board3(&[1, 2, 3], &[0, 3, 6]);
            board.shift(Direction::Right, Tile::new(6));
            let snapshot = board.snapshot();
            let next_to = |row, col, value| next_to_value(&snapshot, row, col, value);

            assert!(next_to(0, 0, 1));
            assert!(next_to(0, 1, 6));
            assert!(next_to(0, 1, 2));
            assert!(next_to(1, 1, 1));
            assert!(next_to(1, 1, 3));
            assert!(next_to(2, 0, 3));
            assert!(next_to(0, 2, 1));
            assert!(next_to(2, 2, 3));

            assert!(!next_to(2, 2, 6));
            assert!(!next_to(2, 2, 2));
            assert!(!next_to(0, 0, 2));
            assert!(!next_to(2, 0, 6));
            assert!(!next_to(0, 2, 6));
        }

        #[test]
        fn test_pair_score() {
            assert_eq!(pair_score(1, 1), 2.0);
            assert_eq!(pair_score(6, 12), 2.0);
            assert_eq!(pair_score(12, 6), 2.0);
            assert_eq!(pair_score(6, 24), 0.0);
            assert_eq!(pair_score(1, 2), 2.0);
            assert_eq!(pair_score(3, 2), 0.0);
        }
    }

    mod scoring {
        use super::*;

        #[test]
        fn test_diagonal_and_successive_shifts() {
            // 1 0 0
            // 0 2 0
            // 0 0 3
            let mut board = board3(&[1, 2, 3], &[0, 4, 8]);
            assert_eq!(score(&board), 3.0 * 6.0 + 6.0);

            // 6 1 0
            // 0 0 2
            // 0 0 3
            board.shift(Direction::Right, Tile::new(6));
            assert_eq!(board.tile_at(0, 0), Tile::new(6));
            assert_eq!(board.tile_at(1, 2), Tile::new(2));
            assert_eq!(score(&board), 3.0 * 5.0 + 1.0 + 1.0 + 6.0);

            // 12 6 1
            //  0 0 2
            //  0 0 3
            board.shift(Direction::Right, Tile::new(12));
            assert_eq!(board.tile_at(0, 0), Tile::new(12));
            assert_eq!(
                score(&board),
                3.0 * 4.0 + 2.0 + 6.0 + 2.0 + 2.0 - 5.0 - 5.0
            );
        }

        #[test]
        fn test_small_tile_trapped_between_larger() {
            for positions in [[0, 1, 2], [6, 7, 8], [2, 5, 8], [0, 3, 6]] {
                let board = board3(&[12, 2, 12], &positions);
                assert_eq!(
                    score(&board),
                    18.0 + 12.0 + 2.0 - 5.0,
                    "positions {positions:?}"
                );
            }
        }

        #[test]
        fn test_tile_trapped_against_wall() {
            // 0 2 0
            // 0 3 0
            // 0 0 0
            for edge in [1, 7, 3, 5] {
                let board = board3(&[2, 3], &[edge, 4]);
                assert_eq!(score(&board), 21.0 + 2.0 - 5.0, "2 at {edge}");
            }
        }

        #[test]
        fn test_breakdown_parts() {
            let board = board3(&[12, 2, 12], &[0, 1, 2]);
            let breakdown = PositionalHeuristic::default().breakdown(&board.snapshot());
            assert_eq!(breakdown.base, 0.0);
            assert_eq!(breakdown.empty_cells, 18.0);
            assert_eq!(breakdown.combinable_pairs, 0.0);
            assert_eq!(breakdown.trapped, -5.0);
            assert_eq!(breakdown.rank_bonus, 14.0);
            assert_eq!(breakdown.total(), 27.0);
        }

        #[test]
        fn test_max_tile_base_term() {
            let board = board3(&[1, 2, 3], &[0, 4, 8]);
            let heuristic =
                PositionalHeuristic::new(&HeuristicConfig::default().with_base_term(BaseTerm::MaxTile));
            assert_eq!(heuristic.evaluate(&board.snapshot()), 3.0 + 3.0 * 6.0 + 6.0);
        }

        #[test]
        fn test_evaluation_is_pure() {
            let board = board3(&[12, 6, 1, 2, 3], &[0, 1, 2, 5, 8]);
            let heuristic = PositionalHeuristic::default();
            let snapshot = board.snapshot();
            assert_eq!(heuristic.evaluate(&snapshot), heuristic.evaluate(&snapshot));
        }

        #[test]
        fn test_full_board_without_empties() {
            // 1 3 1
            // 3 1 3
            // 1 3 1
            let board = board3(&[1, 3, 1, 3, 1, 3, 1, 3, 1], &[0, 1, 2, 3, 4, 5, 6, 7, 8]);
            let breakdown = PositionalHeuristic::default().breakdown(&board.snapshot());
            assert_eq!(breakdown.empty_cells, 0.0);
            assert_eq!(breakdown.combinable_pairs, 0.0);
            // every 1 is boxed in both ways by walls or 3s
            assert_eq!(breakdown.trapped, -5.0 * 2.0 * 5.0);
        }
    }

    #[test]
    fn test_config_serde() {
        let config: HeuristicConfig = serde_json::from_str(r#"{"base_term": "max_tile"}"#).unwrap();
        assert_eq!(config.base_term, BaseTerm::MaxTile);
        let defaulted: HeuristicConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(defaulted, HeuristicConfig::default());
    }
}
