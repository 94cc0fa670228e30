use rand::{Rng as _, RngCore, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{BoardSnapshot, GameSeed, Tile};

use super::bonus::{BONUS_THRESHOLD, bonus_tile};

/// How the next deck tile is chosen from those not yet dealt in the current pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawOrder {
    /// Deal the deck front to back, repeating the same order every pass.
    InOrder,
    /// Deal a uniformly random remaining tile, so every pass is a fresh shuffle.
    #[default]
    UniformRemaining,
}

/// When a bonus tile replaces the next deck tile.
///
/// Only consulted when a board is supplied and its max tile has reached
/// [`BONUS_THRESHOLD`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum BonusRule {
    Never,
    Always,
    Odds { probability: f64 },
}

impl Default for BonusRule {
    fn default() -> Self {
        Self::Odds {
            probability: 1.0 / 21.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    pub deck: Vec<Tile>,
    pub draw_order: DrawOrder,
    pub bonus_rule: BonusRule,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            deck: TileSequence::default_deck(),
            draw_order: DrawOrder::default(),
            bonus_rule: BonusRule::default(),
        }
    }
}

impl SequenceConfig {
    #[must_use]
    pub fn with_deck(mut self, deck: Vec<Tile>) -> Self {
        self.deck = deck;
        self
    }

    #[must_use]
    pub fn with_draw_order(mut self, draw_order: DrawOrder) -> Self {
        self.draw_order = draw_order;
        self
    }

    #[must_use]
    pub fn with_bonus_rule(mut self, bonus_rule: BonusRule) -> Self {
        self.bonus_rule = bonus_rule;
        self
    }
}

/// Unbounded stream of tiles to insert after each shift.
///
/// # Deck
///
/// Tiles are dealt from a fixed deck in passes. Within a pass, the
/// [`DrawOrder`] picks one of the tiles not yet dealt and swaps it to the
/// cursor; when the cursor reaches the end of the deck a new pass begins.
/// With the default deck and order, every run of 12 draws contains exactly
/// four each of `1`, `2` and `3` (bonus tiles aside).
///
/// # Lookahead
///
/// The sequence always holds the next tile, so [`TileSequence::peek`] is free
/// of side effects. [`TileSequence::draw`] returns the held tile and then
/// decides the following one, possibly as a bonus tile computed from the board.
///
/// # Example
///
/// ```
/// use threes_engine::{DrawOrder, GameSeed, SequenceConfig, Tile, TileSequence};
///
/// let config = SequenceConfig::default()
///     .with_deck(TileSequence::one_two_three_deck())
///     .with_draw_order(DrawOrder::InOrder);
/// let mut sequence = TileSequence::from_config(&config, GameSeed::from_u128(0));
///
/// assert_eq!(sequence.peek(), Tile::new(1));
/// assert_eq!(sequence.draw(None), Tile::new(1));
/// assert_eq!(sequence.draw(None), Tile::new(2));
/// assert_eq!(sequence.draw(None), Tile::new(3));
/// assert_eq!(sequence.draw(None), Tile::new(1));
/// ```
#[derive(Debug, Clone)]
pub struct TileSequence {
    deck: Vec<Tile>,
    cursor: usize,
    next: Tile,
    next_is_bonus: bool,
    draw_order: DrawOrder,
    bonus_rule: BonusRule,
    rng: Pcg32,
}

impl TileSequence {
    /// Creates a sequence dealing from `config.deck`.
    ///
    /// # Panics
    ///
    /// Panics if the deck is empty or a bonus probability lies outside `0.0..=1.0`.
    #[must_use]
    pub fn from_config(config: &SequenceConfig, seed: GameSeed) -> Self {
        assert!(!config.deck.is_empty(), "tile deck must not be empty");
        if let BonusRule::Odds { probability } = config.bonus_rule {
            assert!(
                (0.0..=1.0).contains(&probability),
                "bonus probability {probability} outside 0.0..=1.0"
            );
        }
        let mut sequence = Self {
            deck: config.deck.clone(),
            cursor: 0,
            next: Tile::EMPTY,
            next_is_bonus: false,
            draw_order: config.draw_order,
            bonus_rule: config.bonus_rule,
            rng: seed.rng(),
        };
        sequence.next = sequence.pop_deck();
        sequence
    }

    /// Creates a sequence with the default configuration.
    #[must_use]
    pub fn with_seed(seed: GameSeed) -> Self {
        Self::from_config(&SequenceConfig::default(), seed)
    }

    /// Four each of `1`, `2` and `3`.
    #[must_use]
    pub fn default_deck() -> Vec<Tile> {
        [1, 2, 3]
            .into_iter()
            .flat_map(|v| [Tile::new(v); 4])
            .collect()
    }

    /// One each of `1`, `2` and `3`.
    #[must_use]
    pub fn one_two_three_deck() -> Vec<Tile> {
        vec![Tile::new(1), Tile::new(2), Tile::new(3)]
    }

    /// Deep copy with an independent random source drawn from `rng`.
    #[must_use]
    pub fn forked<R: RngCore>(&self, rng: &mut R) -> Self {
        let mut sequence = self.clone();
        sequence.rng = Pcg32::from_rng(rng);
        sequence
    }

    /// The tile the next [`Self::draw`] returns.
    #[must_use]
    pub fn peek(&self) -> Tile {
        self.next
    }

    /// Returns `true` if the held tile is a bonus tile.
    #[must_use]
    pub fn next_is_bonus(&self) -> bool {
        self.next_is_bonus
    }

    /// Returns the held tile and decides the one after it.
    ///
    /// `board` is the board the returned tile is about to be inserted into.
    /// Without a board no bonus tile is ever chosen.
    ///
    /// # Panics
    ///
    /// Panics if a bonus tile is due and the board's max tile is not a legal
    /// tile value.
    pub fn draw(&mut self, board: Option<BoardSnapshot<'_>>) -> Tile {
        let tile = self.next;
        let bonus_max = board
            .map(|b| b.max_tile())
            .filter(|&max_tile| max_tile >= BONUS_THRESHOLD && self.bonus_fires());
        if let Some(max_tile) = bonus_max {
            self.next = match bonus_tile(max_tile, &mut self.rng) {
                Ok(bonus) => bonus,
                Err(e) => panic!("cannot draw bonus tile: {e}"),
            };
            self.next_is_bonus = true;
            trace!(%max_tile, bonus = %self.next, "bonus tile drawn");
        } else {
            self.next = self.pop_deck();
            self.next_is_bonus = false;
        }
        tile
    }

    fn bonus_fires(&mut self) -> bool {
        match self.bonus_rule {
            BonusRule::Never => false,
            BonusRule::Always => true,
            BonusRule::Odds { probability } => self.rng.random_bool(probability),
        }
    }

    fn pop_deck(&mut self) -> Tile {
        if self.cursor == self.deck.len() {
            trace!(deck_len = self.deck.len(), "starting new pass over deck");
            self.cursor = 0;
        }
        let index = match self.draw_order {
            DrawOrder::InOrder => self.cursor,
            DrawOrder::UniformRemaining => self.rng.random_range(self.cursor..self.deck.len()),
        };
        self.deck.swap(self.cursor, index);
        let tile = self.deck[self.cursor];
        self.cursor += 1;
        tile
    }
}
