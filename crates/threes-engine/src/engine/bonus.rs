use rand::Rng;

use crate::{BonusError, Tile};

/// Smallest max tile at which bonus tiles may appear.
pub const BONUS_THRESHOLD: Tile = Tile::new(48);

/// The largest bonus denomination is the board's max tile divided by this.
pub const BONUS_RATIO: u32 = 8;

/// Smallest bonus denomination.
pub const BONUS_BASE: Tile = Tile::new(6);

/// Exponent `k` such that `max_tile / BONUS_RATIO == BONUS_BASE · 2ᵏ`.
fn top_exponent(max_tile: Tile) -> Result<u32, BonusError> {
    if max_tile < BONUS_THRESHOLD {
        return Err(BonusError::BelowThreshold { max_tile });
    }
    let value = max_tile.value();
    let not_denomination = BonusError::NotADenomination { max_tile };
    if value % BONUS_RATIO != 0 {
        return Err(not_denomination);
    }
    let top = value / BONUS_RATIO;
    if top % BONUS_BASE.value() != 0 {
        return Err(not_denomination);
    }
    let multiple = top / BONUS_BASE.value();
    if !multiple.is_power_of_two() {
        return Err(not_denomination);
    }
    Ok(multiple.trailing_zeros())
}

/// Every bonus denomination available when the board's max tile is `max_tile`,
/// smallest first.
///
/// ```
/// use threes_engine::{Tile, bonus_denominations};
///
/// let pool: Vec<_> = bonus_denominations(Tile::new(192)).unwrap().collect();
/// assert_eq!(pool, [Tile::new(6), Tile::new(12), Tile::new(24)]);
/// ```
pub fn bonus_denominations(max_tile: Tile) -> Result<impl Iterator<Item = Tile>, BonusError> {
    let k = top_exponent(max_tile)?;
    Ok((0..=k).map(|i| Tile::new(BONUS_BASE.value() << i)))
}

/// Draws a bonus tile uniformly from [`bonus_denominations`].
///
/// Fails when `max_tile` is below [`BONUS_THRESHOLD`] or is not a legal tile
/// value, which means the caller passed a board that could not have arisen
/// from play.
pub fn bonus_tile<R>(max_tile: Tile, rng: &mut R) -> Result<Tile, BonusError>
where
    R: Rng + ?Sized,
{
    let k = top_exponent(max_tile)?;
    let i = rng.random_range(0..=k);
    Ok(Tile::new(BONUS_BASE.value() << i))
}
