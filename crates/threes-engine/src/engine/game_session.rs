use rand::Rng as _;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    BoardSetupError, ShiftError,
    core::{
        board::{Board, BoardConfig},
        direction::Direction,
        seed::GameSeed,
        tile::Tile,
    },
};

use super::{
    GameStats,
    tile_sequence::{SequenceConfig, TileSequence},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Tiles dealt onto the board before the first move.
    pub initial_tiles: usize,
    pub board: BoardConfig,
    pub sequence: SequenceConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            initial_tiles: 9,
            board: BoardConfig::default(),
            sequence: SequenceConfig::default(),
        }
    }
}

impl SessionConfig {
    #[must_use]
    pub fn with_initial_tiles(mut self, initial_tiles: usize) -> Self {
        self.initial_tiles = initial_tiles;
        self
    }

    #[must_use]
    pub fn with_board(mut self, board: BoardConfig) -> Self {
        self.board = board;
        self
    }

    #[must_use]
    pub fn with_sequence(mut self, sequence: SequenceConfig) -> Self {
        self.sequence = sequence;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum MoveOutcome {
    /// The shift was applied and another move is possible.
    Moved,
    /// The shift was applied and left no shiftable direction.
    GameOver,
}

/// A game from the initial deal to the point where no direction can shift.
///
/// The session owns the live board and tile sequence. Each move draws the
/// held tile from the sequence (letting it see the board for bonus odds) and
/// shifts it in.
#[derive(Debug, Clone)]
pub struct GameSession<const N: usize> {
    board: Board<N>,
    sequence: TileSequence,
    stats: GameStats,
}

impl<const N: usize> GameSession<N> {
    /// Deals `config.initial_tiles` tiles from the sequence onto random cells.
    ///
    /// The initial deal never includes bonus tiles.
    pub fn try_new(config: &SessionConfig, seed: GameSeed) -> Result<Self, BoardSetupError> {
        let mut rng = seed.rng();
        let board_seed: GameSeed = rng.random();
        let sequence_seed: GameSeed = rng.random();

        let mut sequence = TileSequence::from_config(&config.sequence, sequence_seed);
        let tiles: Vec<Tile> = (0..config.initial_tiles)
            .map(|_| sequence.draw(None))
            .collect();
        let board = Board::try_with_random_positions(&tiles, &config.board, board_seed)?;
        let stats = GameStats::with_board(board.score(), board.max_tile());
        Ok(Self {
            board,
            sequence,
            stats,
        })
    }

    /// Like [`Self::try_new`], but an oversized deal is a contract violation.
    ///
    /// # Panics
    ///
    /// Panics if `config.initial_tiles` exceeds the number of cells.
    #[must_use]
    pub fn new(config: &SessionConfig, seed: GameSeed) -> Self {
        match Self::try_new(config, seed) {
            Ok(session) => session,
            Err(e) => panic!("cannot deal initial board: {e}"),
        }
    }

    #[must_use]
    pub fn board(&self) -> &Board<N> {
        &self.board
    }

    #[must_use]
    pub fn sequence(&self) -> &TileSequence {
        &self.sequence
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn score(&self) -> u64 {
        self.board.score()
    }

    /// The tile the next move inserts.
    #[must_use]
    pub fn next_tile(&self) -> Tile {
        self.sequence.peek()
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        !self.board.can_shift_any()
    }

    /// Shifts the board in `direction`, inserting the next tile.
    pub fn try_move(&mut self, direction: Direction) -> Result<MoveOutcome, ShiftError> {
        if !self.board.can_shift(direction) {
            return Err(ShiftError { direction });
        }
        let bonus = self.sequence.next_is_bonus();
        let tile = self.sequence.draw(Some(self.board.snapshot()));
        self.board.shift(direction, tile);
        self.stats
            .complete_move(self.board.score(), self.board.max_tile(), bonus);

        if self.board.can_shift_any() {
            return Ok(MoveOutcome::Moved);
        }
        debug!(
            moves = self.stats.moves(),
            score = self.stats.score(),
            max_tile = %self.stats.max_tile(),
            "game over"
        );
        Ok(MoveOutcome::GameOver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_legal<const N: usize>(session: &GameSession<N>) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|&d| session.board().can_shift(d))
    }

    fn cell_sum<const N: usize>(session: &GameSession<N>) -> u32 {
        session.board().cells().iter().map(|t| t.value()).sum()
    }

    #[test]
    fn test_initial_deal() {
        let session = GameSession::<4>::new(&SessionConfig::default(), GameSeed::from_u128(1));
        assert_eq!(session.board().empty_count(), 16 - 9);
        assert_eq!(session.stats().moves(), 0);
        assert_eq!(session.stats().score(), session.score());
        assert!(session.board().cells().iter().all(|t| t.value() <= 3));
        assert_eq!(session.board().last_shift(), None);
    }

    #[test]
    fn test_oversized_deal_is_rejected() {
        let config = SessionConfig::default().with_initial_tiles(10);
        assert!(matches!(
            GameSession::<3>::try_new(&config, GameSeed::from_u128(1)),
            Err(BoardSetupError::TooManyTiles { tiles: 10, cells: 9 })
        ));
    }

    #[test]
    fn test_move_inserts_peeked_tile() {
        let mut session = GameSession::<4>::new(&SessionConfig::default(), GameSeed::from_u128(2));
        for _ in 0..20 {
            let Some(direction) = first_legal(&session) else {
                break;
            };
            let before = cell_sum(&session);
            let next = session.next_tile();
            session.try_move(direction).unwrap();
            assert_eq!(cell_sum(&session), before + next.value());
        }
    }

    #[test]
    fn test_unshiftable_move_is_rejected() {
        let config = SessionConfig::default().with_initial_tiles(1);
        let mut session = GameSession::<2>::new(&config, GameSeed::from_u128(3));
        let blocked: Vec<_> = Direction::ALL
            .into_iter()
            .filter(|&d| !session.board().can_shift(d))
            .collect();
        assert_eq!(blocked.len(), 2, "a lone tile sits against two walls");
        let cells = session.board().cells().to_vec();
        for direction in blocked {
            assert_eq!(session.try_move(direction), Err(ShiftError { direction }));
        }
        assert_eq!(session.board().cells(), cells);
        assert_eq!(session.stats().moves(), 0);
    }

    #[test]
    fn test_plays_to_game_over() {
        let mut session = GameSession::<3>::new(
            &SessionConfig::default().with_initial_tiles(4),
            GameSeed::from_u128(4),
        );
        let mut outcome = MoveOutcome::Moved;
        for _ in 0..10_000 {
            let Some(direction) = first_legal(&session) else {
                break;
            };
            outcome = session.try_move(direction).unwrap();
            if outcome.is_game_over() {
                break;
            }
        }
        assert!(outcome.is_game_over());
        assert!(session.is_game_over());
        assert!(session.stats().moves() > 0);
        assert_eq!(session.stats().score(), session.score());
        for direction in Direction::ALL {
            assert!(session.try_move(direction).is_err());
        }
    }

    #[test]
    fn test_same_seed_same_game() {
        let play = || {
            let mut session =
                GameSession::<4>::new(&SessionConfig::default(), GameSeed::from_u128(5));
            for _ in 0..50 {
                let Some(direction) = first_legal(&session) else {
                    break;
                };
                session.try_move(direction).unwrap();
            }
            (session.board().cells().to_vec(), session.stats().clone())
        };
        assert_eq!(play(), play());
    }

    #[test]
    fn test_config_serde() {
        let config: SessionConfig = serde_json::from_str(
            r#"{"initial_tiles": 4, "board": {"lane_choice": "lowest"}}"#,
        )
        .unwrap();
        assert_eq!(config.initial_tiles, 4);
        assert_eq!(config.board.lane_choice, crate::LaneChoice::Lowest);
        assert_eq!(config.sequence, SequenceConfig::default());
    }
}
