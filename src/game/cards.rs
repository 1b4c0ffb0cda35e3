//! Action cards, license cards and the decks they are drawn from.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

/// A red action card. One is turned up each turn; it also drives the black
/// locomotive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RedCard {
    pub black_loco: u32,
    pub licenses: u32,
    pub movement: i32,
    /// Crude oil markers taken into storage.
    pub markers: u32,
    /// Columns every rival train moves back.
    pub backwards: u32,
}

/// A beige action card. One per player is turned up each turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BeigeCard {
    pub licenses: u32,
    pub movement: i32,
    /// Steps of 500 the holder may raise one company's oil price by.
    pub oil_price: u32,
}

const fn red(
    black_loco: u32,
    licenses: u32,
    movement: i32,
    markers: u32,
    backwards: u32,
) -> RedCard {
    RedCard {
        black_loco,
        licenses,
        movement,
        markers,
        backwards,
    }
}

const fn beige(licenses: u32, movement: i32, oil_price: u32) -> BeigeCard {
    BeigeCard {
        licenses,
        movement,
        oil_price,
    }
}

pub const RED_ACTION_CARDS: [RedCard; 12] = [
    red(3, 3, 4, 1, 0),
    red(2, 4, 8, 0, 2),
    red(2, 3, 6, 0, 3),
    red(2, 2, 6, 1, 0),
    red(1, 4, 2, 1, 0),
    red(3, 2, 4, 0, 5),
    red(2, 2, 6, 0, 4),
    red(3, 3, 4, 1, 0),
    red(1, 2, 8, 0, 3),
    red(2, 2, 6, 1, 0),
    red(3, 2, 6, 0, 4),
    red(2, 3, 2, 0, 5),
];

pub const BEIGE_ACTION_CARDS: [BeigeCard; 30] = [
    beige(2, 10, 2),
    beige(7, 4, 0),
    beige(5, 8, 0),
    beige(5, 5, 3),
    beige(4, 10, 0),
    beige(5, 8, 0),
    beige(4, 5, 4),
    beige(4, 10, 0),
    beige(4, 6, 3),
    beige(5, 8, 0),
    beige(5, 8, 0),
    beige(2, 10, 2),
    beige(3, 8, 3),
    beige(6, 6, 0),
    beige(3, 12, 0),
    beige(5, 8, 0),
    beige(4, 10, 0),
    beige(3, 12, 0),
    beige(6, 6, 0),
    beige(5, 8, 0),
    beige(7, 4, 0),
    beige(4, 5, 4),
    beige(6, 6, 0),
    beige(8, 3, 0),
    beige(4, 5, 4),
    beige(6, 6, 0),
    beige(3, 12, 0),
    beige(4, 10, 0),
    beige(6, 4, 2),
    beige(4, 10, 0),
];

/// The card a player picked for the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActionCard {
    Red(RedCard),
    Beige(BeigeCard),
}

/// A green license card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LicenseCard {
    Single,
    Double,
}

impl LicenseCard {
    pub const fn licenses(self) -> u32 {
        match self {
            LicenseCard::Single => 1,
            LicenseCard::Double => 2,
        }
    }
}

/// A draw pile and its discards.
#[derive(Debug, Clone)]
pub struct Deck<T> {
    cards: Vec<T>,
    discards: Vec<T>,
}

impl<T> Deck<T> {
    /// Shuffles `cards` into a new draw pile.
    pub fn new<R: Rng + ?Sized>(mut cards: Vec<T>, rng: &mut R) -> Self {
        cards.shuffle(rng);
        Deck {
            cards,
            discards: Vec::new(),
        }
    }

    /// Draws the top card. An empty draw pile takes the shuffled discards
    /// first; `None` only when both are empty.
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<T> {
        if self.cards.is_empty() {
            self.cards.append(&mut self.discards);
            self.cards.shuffle(rng);
            log::trace!("reshuffled {} discards", self.cards.len());
        }
        self.cards.pop()
    }

    pub fn discard(&mut self, card: T) {
        self.discards.push(card);
    }

    /// Cards left in the draw pile.
    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn discarded(&self) -> usize {
        self.discards.len()
    }
}

/// Builds the license deck.
pub fn license_deck<R: Rng + ?Sized>(
    singles: usize,
    doubles: usize,
    rng: &mut R,
) -> Deck<LicenseCard> {
    let mut cards = vec![LicenseCard::Single; singles];
    cards.extend(std::iter::repeat(LicenseCard::Double).take(doubles));
    Deck::new(cards, rng)
}
