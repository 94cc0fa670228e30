//! Move selection by sampled expectimax search.
//!
//! # How It Works
//!
//! For each shiftable direction, [`ExpectimaxStrategy`] runs `samples`
//! independent rollouts of [`expected_value`] and sums them; the direction with
//! the largest sum wins (the earliest direction in [`Direction::ALL`] on ties).
//!
//! A rollout at depth `d > 0` forks the board and sequence, draws a tile,
//! applies the move, and returns the mean of the depth `d - 1` values over
//! every direction shiftable on the result. At depth `0` it returns the
//! heuristic score of the board it was given. A move that leaves no shiftable
//! direction is worth `0.0`.
//!
//! Only the tile draws and lane choices are sampled. The averaging over
//! follow-up directions is exhaustive, so a rollout costs `O(4^depth)` board
//! copies.
//!
//! # Determinism
//!
//! Every rollout runs on its own `Pcg32`, seeded from the strategy's generator
//! in direction-then-sample order before any rollout starts. Parallel search
//! ([`SearchConfig::parallel`]) therefore picks the same move as sequential
//! search for the same seed.
//!
//! # Usage
//!
//! ```
//! use threes_engine::{GameSeed, GameSession, SessionConfig};
//! use threes_evaluator::{
//!     expectimax::{ExpectimaxStrategy, SearchConfig},
//!     heuristic::PositionalHeuristic,
//! };
//!
//! let session = GameSession::<4>::new(&SessionConfig::default(), GameSeed::from_u128(1));
//! let mut strategy = ExpectimaxStrategy::new(
//!     SearchConfig::default().with_depth(1).with_samples(2),
//!     Box::new(PositionalHeuristic::default()),
//!     GameSeed::from_u128(2),
//! );
//!
//! let direction = strategy.choose_move(session.board(), session.sequence());
//! assert!(session.board().can_shift(direction));
//! ```

use rand::{Rng as _, RngCore};
use rand_pcg::Pcg32;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use threes_engine::{Board, Direction, GameSeed, TileSequence};
use tracing::debug;

use crate::heuristic::BoardEvaluator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SearchConfigError {
    #[display("search needs at least one sample per direction")]
    ZeroSamples,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Moves simulated below the candidate move before scoring.
    pub depth: u32,
    /// Rollouts per candidate direction.
    pub samples: u32,
    /// Run rollouts on the rayon thread pool.
    pub parallel: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: 2,
            samples: 8,
            parallel: false,
        }
    }
}

impl SearchConfig {
    #[must_use]
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    #[must_use]
    pub fn with_samples(mut self, samples: u32) -> Self {
        self.samples = samples;
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn validate(&self) -> Result<(), SearchConfigError> {
        if self.samples == 0 {
            return Err(SearchConfigError::ZeroSamples);
        }
        Ok(())
    }
}

/// Accumulated search value of one candidate direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchEval {
    pub direction: Direction,
    /// Sum over all rollouts; `0.0` when the direction is not legal.
    pub value: f64,
    pub legal: bool,
}

/// Estimated value of moving `direction` from `board`, looking `depth` moves ahead.
///
/// # Panics
///
/// Panics if `depth > 0` and `direction` cannot shift on `board`.
pub fn expected_value<const N: usize, R>(
    evaluator: &dyn BoardEvaluator,
    board: &Board<N>,
    sequence: &TileSequence,
    direction: Direction,
    depth: u32,
    rng: &mut R,
) -> f64
where
    R: RngCore,
{
    if depth == 0 {
        return evaluator.evaluate(&board.snapshot());
    }

    let mut board = board.forked(rng);
    let mut sequence = sequence.forked(rng);
    let tile = sequence.draw(Some(board.snapshot()));
    board.shift(direction, tile);

    let mut total = 0.0;
    let mut legal = 0_u32;
    for candidate in Direction::ALL {
        if board.can_shift(candidate) {
            legal += 1;
            total += expected_value(evaluator, &board, &sequence, candidate, depth - 1, rng);
        }
    }
    if legal == 0 {
        return 0.0;
    }
    total / f64::from(legal)
}

#[derive(Debug)]
pub struct ExpectimaxStrategy {
    config: SearchConfig,
    evaluator: Box<dyn BoardEvaluator>,
    rng: Pcg32,
}

impl ExpectimaxStrategy {
    pub fn try_new(
        config: SearchConfig,
        evaluator: Box<dyn BoardEvaluator>,
        seed: GameSeed,
    ) -> Result<Self, SearchConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            evaluator,
            rng: seed.rng(),
        })
    }

    /// Like [`Self::try_new`], but an invalid configuration is a contract violation.
    ///
    /// # Panics
    ///
    /// Panics if `config.samples == 0`.
    #[must_use]
    pub fn new(config: SearchConfig, evaluator: Box<dyn BoardEvaluator>, seed: GameSeed) -> Self {
        match Self::try_new(config, evaluator, seed) {
            Ok(strategy) => strategy,
            Err(e) => panic!("invalid search config: {e}"),
        }
    }

    /// Runs the search and reports the accumulated value of every direction.
    pub fn branch_evals<const N: usize>(
        &mut self,
        board: &Board<N>,
        sequence: &TileSequence,
    ) -> [BranchEval; Direction::LEN] {
        let legal = Direction::ALL.map(|d| board.can_shift(d));
        let samples = self.config.samples;
        let depth = self.config.depth;

        let rollouts: Vec<(Direction, GameSeed)> = Direction::ALL
            .into_iter()
            .filter(|d| legal[d.as_usize()])
            .flat_map(|d| (0..samples).map(move |_| d))
            .map(|d| (d, self.rng.random()))
            .collect();

        let evaluator = self.evaluator.as_ref();
        let rollout = |&(direction, seed): &(Direction, GameSeed)| {
            expected_value(evaluator, board, sequence, direction, depth, &mut seed.rng())
        };
        let values: Vec<f64> = if self.config.parallel {
            rollouts.par_iter().map(rollout).collect()
        } else {
            rollouts.iter().map(rollout).collect()
        };

        let mut sums = [0.0; Direction::LEN];
        for ((direction, _), value) in rollouts.iter().zip(values) {
            sums[direction.as_usize()] += value;
        }
        Direction::ALL.map(|direction| BranchEval {
            direction,
            value: sums[direction.as_usize()],
            legal: legal[direction.as_usize()],
        })
    }

    /// Picks the direction with the highest accumulated rollout value.
    ///
    /// # Panics
    ///
    /// Panics if no direction can shift; callers check for game over first.
    pub fn choose_move<const N: usize>(
        &mut self,
        board: &Board<N>,
        sequence: &TileSequence,
    ) -> Direction {
        assert!(
            board.can_shift_any(),
            "cannot choose a move on a terminal board:\n{board}"
        );
        let evals = self.branch_evals(board, sequence);

        let mut best: Option<&BranchEval> = None;
        for eval in evals.iter().filter(|e| e.legal) {
            if best.is_none_or(|b| eval.value > b.value) {
                best = Some(eval);
            }
        }
        let Some(best) = best else {
            unreachable!("a shiftable direction always yields a legal branch");
        };

        debug!(
            direction = %best.direction,
            value = best.value,
            evals = ?evals,
            depth = self.config.depth,
            samples = self.config.samples,
            "chose move"
        );
        best.direction
    }
}
