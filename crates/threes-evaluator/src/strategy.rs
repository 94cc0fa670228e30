//! Move-selection strategies and their configuration.
//!
//! [`Strategy`] is a closed set of players chosen at runtime from a
//! [`StrategyConfig`]:
//!
//! - [`RandomStrategy`] - A uniformly random shiftable direction
//! - [`ExpectimaxStrategy`] - Sampled expectimax search over a [`PositionalHeuristic`]
//!
//! # Configuration
//!
//! ```
//! use threes_evaluator::strategy::StrategyConfig;
//!
//! let config: StrategyConfig = serde_json::from_str(
//!     r#"{"kind": "expectimax", "search": {"depth": 3, "samples": 4}}"#,
//! )
//! .unwrap();
//! assert!(matches!(config, StrategyConfig::Expectimax { .. }));
//! ```

use arrayvec::ArrayVec;
use rand::Rng as _;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use threes_engine::{Board, Direction, GameSeed, TileSequence};

use crate::{
    expectimax::{ExpectimaxStrategy, SearchConfig, SearchConfigError},
    heuristic::{HeuristicConfig, PositionalHeuristic},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum StrategyConfig {
    Random,
    Expectimax {
        #[serde(default)]
        search: SearchConfig,
        #[serde(default)]
        heuristic: HeuristicConfig,
    },
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self::Expectimax {
            search: SearchConfig::default(),
            heuristic: HeuristicConfig::default(),
        }
    }
}

/// Picks uniformly among the directions that can shift.
#[derive(Debug, Clone)]
pub struct RandomStrategy {
    rng: Pcg32,
}

impl RandomStrategy {
    #[must_use]
    pub fn new(seed: GameSeed) -> Self {
        Self { rng: seed.rng() }
    }

    /// # Panics
    ///
    /// Panics if no direction can shift.
    pub fn choose_move<const N: usize>(&mut self, board: &Board<N>) -> Direction {
        let legal: ArrayVec<Direction, { Direction::LEN }> = Direction::ALL
            .into_iter()
            .filter(|&d| board.can_shift(d))
            .collect();
        assert!(
            !legal.is_empty(),
            "cannot choose a move on a terminal board:\n{board}"
        );
        legal[self.rng.random_range(0..legal.len())]
    }
}

#[derive(Debug)]
pub enum Strategy {
    Random(RandomStrategy),
    Expectimax(ExpectimaxStrategy),
}

impl Strategy {
    pub fn from_config(config: &StrategyConfig, seed: GameSeed) -> Result<Self, SearchConfigError> {
        let strategy = match config {
            StrategyConfig::Random => Self::Random(RandomStrategy::new(seed)),
            StrategyConfig::Expectimax { search, heuristic } => {
                Self::Expectimax(ExpectimaxStrategy::try_new(
                    *search,
                    Box::new(PositionalHeuristic::new(heuristic)),
                    seed,
                )?)
            }
        };
        Ok(strategy)
    }

    /// Picks the next direction for `board`, which must not be terminal.
    ///
    /// # Panics
    ///
    /// Panics if no direction can shift.
    pub fn choose_move<const N: usize>(
        &mut self,
        board: &Board<N>,
        sequence: &TileSequence,
    ) -> Direction {
        match self {
            Self::Random(strategy) => strategy.choose_move(board),
            Self::Expectimax(strategy) => strategy.choose_move(board, sequence),
        }
    }
}

#[cfg(test)]
mod tests {
    use threes_engine::{BoardConfig, Tile};

    use super::*;

    #[test]
    fn test_random_picks_only_legal() {
        // 3 in the top-left corner slides only down or right
        let board = Board::<3>::with_positions(
            &[Tile::new(3)],
            &[0],
            &BoardConfig::default(),
            GameSeed::from_u128(0),
        );
        let mut strategy = RandomStrategy::new(GameSeed::from_u128(1));
        let mut seen = [false; Direction::LEN];
        for _ in 0..64 {
            let direction = strategy.choose_move(&board);
            assert!(board.can_shift(direction), "{direction}");
            seen[direction.as_usize()] = true;
        }
        assert_eq!(seen, [false, true, false, true]);
    }

    #[test]
    #[should_panic(expected = "terminal board")]
    fn test_random_on_terminal_board_panics() {
        let tiles: Vec<_> = [1, 3, 3, 1].into_iter().map(Tile::new).collect();
        let board = Board::<2>::with_positions(
            &tiles,
            &[0, 1, 2, 3],
            &BoardConfig::default(),
            GameSeed::from_u128(0),
        );
        let _ = RandomStrategy::new(GameSeed::from_u128(1)).choose_move(&board);
    }

    #[test]
    fn test_from_config() {
        let seed = GameSeed::from_u128(0);
        assert!(matches!(
            Strategy::from_config(&StrategyConfig::Random, seed),
            Ok(Strategy::Random(_))
        ));
        assert!(matches!(
            Strategy::from_config(&StrategyConfig::default(), seed),
            Ok(Strategy::Expectimax(_))
        ));
        let invalid = StrategyConfig::Expectimax {
            search: SearchConfig::default().with_samples(0),
            heuristic: HeuristicConfig::default(),
        };
        assert!(matches!(
            Strategy::from_config(&invalid, seed),
            Err(SearchConfigError::ZeroSamples)
        ));
    }

    #[test]
    fn test_config_serde() {
        let random: StrategyConfig = serde_json::from_str(r#"{"kind": "random"}"#).unwrap();
        assert_eq!(random, StrategyConfig::Random);

        let expectimax: StrategyConfig = serde_json::from_str(
            r#"{"kind": "expectimax", "search": {"samples": 2}, "heuristic": {"base_term": "max_tile"}}"#,
        )
        .unwrap();
        let StrategyConfig::Expectimax { search, heuristic } = expectimax else {
            panic!("expected expectimax, got {expectimax:?}");
        };
        assert_eq!(search, SearchConfig::default().with_samples(2));
        assert_eq!(heuristic.base_term, crate::heuristic::BaseTerm::MaxTile);

        let bare: StrategyConfig = serde_json::from_str(r#"{"kind": "expectimax"}"#).unwrap();
        assert_eq!(bare, StrategyConfig::default());
    }
}
