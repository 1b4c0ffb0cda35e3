//! Oil price movement.
//!
//! Each turn a die is rolled for every oil company. The die has faces
//! 2, 2, 3, 3, 4, 4, alternately red and blue; the value times 500 is the
//! size of the price change and the colour picks its direction. How the
//! colour maps to a direction depends on the [`PriceModel`] in the game
//! configuration.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Price change per pip.
pub const PRICE_UNIT: i64 = 500;
pub const MIN_PRICE: i64 = 500;
pub const MAX_PRICE: i64 = 9_000;
/// Prices at or above this are in the blue zone.
pub const BLUE_ZONE: i64 = 7_000;
/// Prices below this are in the red zone.
pub const RED_ZONE: i64 = 4_000;

pub const DICE_VALUES: [i64; 6] = [2, 2, 3, 3, 4, 4];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DieColor {
    Red,
    Blue,
}

pub const DICE_COLORS: [DieColor; 6] = [
    DieColor::Red,
    DieColor::Blue,
    DieColor::Red,
    DieColor::Blue,
    DieColor::Red,
    DieColor::Blue,
];

/// One face of the price die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DieRoll {
    pub value: i64,
    pub color: DieColor,
}

impl DieRoll {
    /// The roll showing `face` (0..6).
    pub fn from_face(face: usize) -> DieRoll {
        let face = face % DICE_VALUES.len();
        DieRoll {
            value: DICE_VALUES[face],
            color: DICE_COLORS[face],
        }
    }

    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> DieRoll {
        DieRoll::from_face(rng.gen_range(0..DICE_VALUES.len()))
    }

    fn delta(self) -> i64 {
        self.value * PRICE_UNIT
    }
}

/// Zoned model: red pushes the price up out of the red zone and down
/// everywhere else; blue pushes it down out of the blue zone and up
/// everywhere else.
pub fn next_price_zoned(old: i64, roll: DieRoll) -> i64 {
    let delta = roll.delta();
    let new = match roll.color {
        DieColor::Red if old < RED_ZONE => old + delta,
        DieColor::Red => old - delta,
        DieColor::Blue if old >= BLUE_ZONE => old - delta,
        DieColor::Blue => old + delta,
    };
    log::trace!("{}{:?} ${} -> ${}", roll.value, roll.color, old, new);
    new
}

/// Clamped model: red lowers the price, blue raises it, within
/// [`MIN_PRICE`, `MAX_PRICE`].
pub fn next_price_clamped(old: i64, roll: DieRoll) -> i64 {
    let delta = roll.delta();
    let new = match roll.color {
        DieColor::Red => (old - delta).max(MIN_PRICE),
        DieColor::Blue => (old + delta).min(MAX_PRICE),
    };
    log::trace!("{}{:?} ${} -> ${}", roll.value, roll.color, old, new);
    new
}

/// Which rule moves the price after a die roll.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceModel {
    /// [`next_price_zoned`]
    #[default]
    Zoned,
    /// [`next_price_clamped`]
    Clamped,
}

impl PriceModel {
    pub fn next_price(self, old: i64, roll: DieRoll) -> i64 {
        match self {
            PriceModel::Zoned => next_price_zoned(old, roll),
            PriceModel::Clamped => next_price_clamped(old, roll),
        }
    }
}

/// Raises a price by `steps` units, capped at [`MAX_PRICE`].
pub fn raise_price(old: i64, steps: u32) -> i64 {
    (old + steps as i64 * PRICE_UNIT).min(MAX_PRICE)
}
