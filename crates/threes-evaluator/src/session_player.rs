//! Driving a [`GameSession`] with a [`Strategy`].

use threes_engine::{GameSession, GameStats, MoveOutcome};
use tracing::debug;

use crate::strategy::Strategy;

/// Plays `session` until game over or `move_limit` moves, returning the final statistics.
///
/// # Panics
///
/// Panics if the strategy picks a direction that cannot shift.
///
/// # Example
///
/// ```
/// use threes_engine::{GameSeed, GameSession, SessionConfig};
/// use threes_evaluator::{
///     session_player::play_session,
///     strategy::{Strategy, StrategyConfig},
/// };
///
/// let mut session = GameSession::<4>::new(&SessionConfig::default(), GameSeed::from_u128(3));
/// let mut strategy = Strategy::from_config(&StrategyConfig::Random, GameSeed::from_u128(4)).unwrap();
///
/// let stats = play_session(&mut strategy, &mut session, 10);
/// assert!(stats.moves() <= 10);
/// ```
pub fn play_session<const N: usize>(
    strategy: &mut Strategy,
    session: &mut GameSession<N>,
    move_limit: usize,
) -> GameStats {
    for _ in 0..move_limit {
        if session.is_game_over() {
            break;
        }
        let direction = strategy.choose_move(session.board(), session.sequence());
        match session.try_move(direction) {
            Ok(MoveOutcome::Moved) => {}
            Ok(MoveOutcome::GameOver) => break,
            Err(e) => panic!("strategy chose an illegal move: {e}"),
        }
    }
    debug!(
        moves = session.stats().moves(),
        score = session.stats().score(),
        game_over = session.is_game_over(),
        "session finished"
    );
    session.stats().clone()
}

#[cfg(test)]
mod tests {
    use threes_engine::{GameSeed, SessionConfig};

    use super::*;
    use crate::strategy::StrategyConfig;

    #[test]
    fn test_respects_move_limit() {
        let mut session = GameSession::<4>::new(&SessionConfig::default(), GameSeed::from_u128(1));
        let mut strategy =
            Strategy::from_config(&StrategyConfig::Random, GameSeed::from_u128(2)).unwrap();
        let stats = play_session(&mut strategy, &mut session, 5);
        assert_eq!(stats.moves(), 5);
        assert_eq!(&stats, session.stats());
    }

    #[test]
    fn test_zero_limit_is_noop() {
        let mut session = GameSession::<4>::new(&SessionConfig::default(), GameSeed::from_u128(1));
        let before = session.board().cells().to_vec();
        let mut strategy =
            Strategy::from_config(&StrategyConfig::Random, GameSeed::from_u128(2)).unwrap();
        let stats = play_session(&mut strategy, &mut session, 0);
        assert_eq!(stats.moves(), 0);
        assert_eq!(session.board().cells(), before);
    }

    #[test]
    fn test_stops_at_game_over() {
        let mut session = GameSession::<3>::new(
            &SessionConfig::default().with_initial_tiles(5),
            GameSeed::from_u128(3),
        );
        let mut strategy =
            Strategy::from_config(&StrategyConfig::Random, GameSeed::from_u128(4)).unwrap();
        let stats = play_session(&mut strategy, &mut session, 100_000);
        assert!(session.is_game_over());
        assert!(stats.moves() < 100_000);
    }
}
