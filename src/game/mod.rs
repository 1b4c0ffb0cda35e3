//! Game state and turn orchestration.
//!
//! A `Game` owns the board, the players, the card decks and the oil prices.
//! It is the only writer of the board: every search, move and derrick goes
//! through `Game::play_turn`.

pub mod cards;
pub mod market;
pub mod oil_price;
pub mod player;
pub mod turn;

pub use cards::{ActionCard, BeigeCard, Deck, LicenseCard, RedCard};
pub use market::{sell_oil, MarketRules, Sale};
pub use player::{Actions, Player};
pub use turn::{MoveReport, TurnReport};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::board::{Board, CellId, ConsistencyError, PlayerId};
use crate::config::{ConfigError, GameConfig};
use crate::protocol::BoardTextError;
use crate::search::{SearchError, SearchState};

/// Errors raised while setting up or playing a game.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Board(#[from] BoardTextError),

    #[error(transparent)]
    Consistency(#[from] ConsistencyError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{players} players requested, only {seats} starting rows configured")]
    TooManyPlayers { players: usize, seats: usize },

    #[error("a game needs at least one player")]
    NoPlayers,

    #[error("starting row {row} is outside a board of {rows} rows")]
    StartRowOutOfRange { row: usize, rows: usize },

    #[error("the {0} deck is empty")]
    EmptyDeck(&'static str),

    #[error("the game is already over")]
    GameOver,
}

#[derive(Debug)]
pub struct Game {
    pub board: Board,
    pub players: Vec<Player>,
    pub black_train_col: usize,
    /// Current bid of each oil company.
    pub oil_prices: Vec<i64>,
    /// Turns played so far.
    pub turn: u32,
    /// Seat that acts first next turn.
    pub start_seat: usize,
    pub over: bool,
    pub config: GameConfig,
    red_cards: Deck<RedCard>,
    beige_cards: Deck<BeigeCard>,
    licenses: Deck<LicenseCard>,
    search: SearchState,
}

/// Shuffled copies of the oil tiles, one pile per well count.
fn deal_tiles<R: Rng + ?Sized>(board: &mut Board, config: &GameConfig, rng: &mut R) {
    let mut piles: [Vec<u32>; 3] = Default::default();
    for i in 0..board.len() {
        let id = CellId(i as u32);
        let wells = board.cell(id).wells;
        if wells == 0 {
            continue;
        }
        let k = (wells as usize - 1).min(2);
        if piles[k].is_empty() {
            piles[k] = config.tile_reserves[k].clone();
            piles[k].shuffle(rng);
        }
        // Validated config keeps every pile non-empty after a refill.
        let reserve = piles[k].pop().unwrap_or(0);
        board.set_oil_reserve(id, reserve);
    }
}

impl Game {
    /// Seats `nplayers` trucks in column 0 of their starting rows, deals the
    /// oil tiles and shuffles the decks.
    pub fn new<R: Rng + ?Sized>(
        mut board: Board,
        nplayers: usize,
        config: GameConfig,
        rng: &mut R,
    ) -> Result<Game, GameError> {
        config.validate()?;
        if nplayers == 0 {
            return Err(GameError::NoPlayers);
        }
        if nplayers > config.truck_start_rows.len() {
            return Err(GameError::TooManyPlayers {
                players: nplayers,
                seats: config.truck_start_rows.len(),
            });
        }

        let mut players = Vec::with_capacity(nplayers);
        for (seat, &row) in config.truck_start_rows[..nplayers].iter().enumerate() {
            let truck = board.id(row, 0).ok_or(GameError::StartRowOutOfRange {
                row,
                rows: board.rows(),
            })?;
            let id = PlayerId(seat as u8);
            board.set_occupant(truck, Some(id));
            players.push(Player::new(
                id,
                truck,
                config.initial_cash,
                config.initial_oil_rigs,
            ));
        }

        deal_tiles(&mut board, &config, rng);

        let red_cards = Deck::new(cards::RED_ACTION_CARDS.to_vec(), rng);
        let beige_cards = Deck::new(cards::BEIGE_ACTION_CARDS.to_vec(), rng);
        let licenses = cards::license_deck(config.single_licenses, config.double_licenses, rng);
        let search = board.search_state();

        Ok(Game {
            board,
            players,
            black_train_col: 0,
            oil_prices: vec![config.initial_oil_price; config.oil_companies],
            turn: 0,
            start_seat: 0,
            over: false,
            config,
            red_cards,
            beige_cards,
            licenses,
            search,
        })
    }

    /// Moves the black locomotive. Returns true once it runs off the board,
    /// which ends the game.
    pub fn move_black_train(&mut self, spaces: u32) -> bool {
        self.black_train_col += spaces as usize;
        self.black_train_col >= self.board.cols()
    }

    /// Seats in acting order for this turn.
    pub fn seat_order(&self) -> Vec<usize> {
        let n = self.players.len();
        (0..n).map(|i| (self.start_seat + i) % n).collect()
    }

    /// Results of the most recent search.
    pub fn last_search(&self) -> &SearchState {
        &self.search
    }

    /// Seat with the most cash; the lower seat wins ties.
    pub fn leader(&self) -> Option<PlayerId> {
        let mut best: Option<&Player> = None;
        for p in &self.players {
            match best {
                Some(b) if b.cash >= p.cash => {}
                _ => best = Some(p),
            }
        }
        best.map(|p| p.id)
    }
}
