//! Automated players for the Threes puzzle.
//!
//! This crate chooses moves for a [`threes_engine::GameSession`]:
//!
//! 1. **Leaf Evaluation** ([`heuristic`]) - Scores a board position from positional
//!    features (open cells, combinable neighbors, trapped tiles, placement of the
//!    largest tiles).
//!
//! 2. **Search** ([`expectimax`]) - Simulates each candidate direction on forked
//!    copies of the board and tile sequence, averaging over follow-up moves down to
//!    a fixed depth, and samples each direction several times to cover random draws.
//!
//! 3. **Strategies** ([`strategy`]) - Expectimax and random players behind one
//!    [`strategy::Strategy`] type, built from serde configuration.
//!
//! 4. **Session Play** ([`session_player`]) - Runs a strategy against a session until
//!    game over.
//!
//! # Architecture
//!
//! ```text
//! Session Play (turn loop)
//!     ↓ asks
//! Strategy (pick a direction)
//!     ↓ uses
//! Expectimax Search (sampled rollouts on forked state)
//!     ↓ bottoms out at
//! Heuristic (score a board)
//! ```
//!
//! All lookahead runs on forked copies; only the chosen direction is applied to
//! the live session.
//!
//! # Example
//!
//! ```
//! use threes_engine::{GameSeed, GameSession, SessionConfig};
//! use threes_evaluator::{
//!     expectimax::SearchConfig,
//!     heuristic::HeuristicConfig,
//!     session_player::play_session,
//!     strategy::{Strategy, StrategyConfig},
//! };
//!
//! let config = StrategyConfig::Expectimax {
//!     search: SearchConfig::default().with_depth(1).with_samples(2),
//!     heuristic: HeuristicConfig::default(),
//! };
//! let mut strategy = Strategy::from_config(&config, GameSeed::from_u128(1)).unwrap();
//! let mut session = GameSession::<4>::new(&SessionConfig::default(), GameSeed::from_u128(2));
//!
//! let stats = play_session(&mut strategy, &mut session, 20);
//! assert!(stats.moves() > 0);
//! ```

pub mod expectimax;
pub mod heuristic;
pub mod session_player;
pub mod strategy;
