//! One turn of play.
//!
//! Phases, in order:
//!
//! 1. roll the price die for every oil company and apply the configured
//!    price model;
//! 2. turn up the red card and advance the black locomotive;
//! 3. turn up one beige card per player; each player, in seat order, picks
//!    one of the face-up cards;
//! 4. deal licenses;
//! 5. move every player: search, score, move the truck, maybe drill, then
//!    advance the train; then apply the card's special actions;
//! 6. pump one barrel from every derrick into its owner's storage;
//! 7. sell the stored oil.

use rand::Rng;
use serde::Serialize;

use crate::board::{CellId, ConsistencyError, PlayerId};
use crate::eval::{choose_destination, ScoreRequest};
use crate::search::constrained_search;

use super::cards::{ActionCard, RedCard};
use super::market::{sell_oil, MarketRules, Sale};
use super::oil_price::{raise_price, DieRoll, MAX_PRICE};
use super::{Game, GameError};

/// What one player's move did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveReport {
    pub player: PlayerId,
    pub from: CellId,
    pub to: CellId,
    pub distance: i32,
    pub score: i64,
    /// Well cell drilled after the move.
    pub derrick: Option<CellId>,
    pub train_cols: usize,
}

/// Everything that happened in one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnReport {
    pub turn: u32,
    pub red_card: RedCard,
    pub black_train_col: usize,
    pub prices: Vec<i64>,
    pub moves: Vec<MoveReport>,
    pub barrels_pumped: u32,
    pub sales: Vec<Sale>,
    pub game_over: bool,
}

impl Game {
    /// Plays one full turn.
    pub fn play_turn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<TurnReport, GameError> {
        if self.over {
            return Err(GameError::GameOver);
        }
        let model = self.config.price_model;
        for price in self.oil_prices.iter_mut() {
            *price = model.next_price(*price, DieRoll::roll(rng));
        }

        let red = self.red_cards.draw(rng).ok_or(GameError::EmptyDeck("red"))?;
        let mut report = TurnReport {
            turn: self.turn,
            red_card: red,
            black_train_col: self.black_train_col,
            prices: Vec::new(),
            moves: Vec::new(),
            barrels_pumped: 0,
            sales: Vec::new(),
            game_over: false,
        };

        if self.move_black_train(red.black_loco) {
            self.over = true;
            self.red_cards.discard(red);
            report.black_train_col = self.black_train_col;
            report.prices = self.oil_prices.clone();
            report.game_over = true;
            log::info!("turn {}: black train reached column {}", self.turn, self.black_train_col);
            return Ok(report);
        }
        report.black_train_col = self.black_train_col;

        let mut face_up = vec![ActionCard::Red(red)];
        for _ in 0..self.players.len() {
            let card = self.beige_cards.draw(rng).ok_or(GameError::EmptyDeck("beige"))?;
            face_up.push(ActionCard::Beige(card));
        }

        let order = self.seat_order();
        for &seat in &order {
            let card = face_up.swap_remove(rng.gen_range(0..face_up.len()));
            self.players[seat].actions = card.into();
            log::debug!("{} takes {:?}", self.players[seat].id, card);
            self.discard_action(card);
        }
        for card in face_up {
            self.discard_action(card);
        }

        for &seat in &order {
            self.deal_licenses(seat, rng);
        }

        for &seat in &order {
            report.moves.push(self.move_player(seat)?);
            self.special_actions(seat);
        }

        report.barrels_pumped = self.drain_derricks()?;

        let rules = MarketRules {
            price_step: self.config.price_step,
            transport_fee: self.config.transport_fee,
        };
        report.sales = sell_oil(&mut self.players, &mut self.oil_prices, &order, rules);
        report.prices = self.oil_prices.clone();

        self.start_seat = (self.start_seat + 1) % self.players.len();
        self.turn += 1;
        if self.turn >= self.config.max_turns {
            self.over = true;
            report.game_over = true;
        }
        log::info!(
            "turn {}: {} moves, {} barrels pumped, {} sales",
            report.turn,
            report.moves.len(),
            report.barrels_pumped,
            report.sales.len()
        );
        Ok(report)
    }

    /// Deals the license cards the player's action card grants. Stops early
    /// if every license card is in a hand.
    pub fn deal_licenses<R: Rng + ?Sized>(&mut self, seat: usize, rng: &mut R) -> u32 {
        let mut dealt = 0;
        for _ in 0..self.players[seat].actions.licenses {
            match self.licenses.draw(rng) {
                Some(card) => self.players[seat].take_license(card),
                None => break,
            }
            dealt += 1;
        }
        dealt
    }

    fn discard_action(&mut self, card: ActionCard) {
        match card {
            ActionCard::Red(c) => self.red_cards.discard(c),
            ActionCard::Beige(c) => self.beige_cards.discard(c),
        }
    }

    /// Moves one player's truck to the best-scoring reachable cell, drills
    /// next to it if possible, and spends the leftover points on the train.
    pub fn move_player(&mut self, seat: usize) -> Result<MoveReport, GameError> {
        let player = &self.players[seat];
        let (id, from, budget) = (player.id, player.truck, player.actions.movement);

        constrained_search(&self.board, &mut self.search, from, budget)?;
        let request = ScoreRequest {
            start: from,
            budget,
            train_col: player.train_col,
            train_costs: &self.config.train_costs,
        };
        let best = choose_destination(&self.board, &self.search, &request, &self.config.weights)?;

        self.board.move_occupant(from, best.cell, id)?;
        self.players[seat].truck = best.cell;

        let leftover = budget.saturating_sub(best.distance).max(0);
        let derrick = if leftover > 0 {
            self.try_drill(seat)?
        } else {
            None
        };
        let train_cols = self.players[seat].advance_train(leftover, &self.config.train_costs);

        log::debug!(
            "{} {} -> {} distance {} score {}, train +{}",
            id,
            self.board.cell(from),
            self.board.cell(best.cell),
            best.distance,
            best.score,
            train_cols
        );
        Ok(MoveReport {
            player: id,
            from,
            to: best.cell,
            distance: best.distance,
            score: best.score,
            derrick,
            train_cols,
        })
    }

    /// Builds a derrick on the richest well next to the player's truck that
    /// the player holds licenses and a rig for.
    fn try_drill(&mut self, seat: usize) -> Result<Option<CellId>, ConsistencyError> {
        let player = &self.players[seat];
        let mut target: Option<CellId> = None;
        for well in self.board.adjacent_undrilled_wells(player.truck) {
            let wells = self.board.cell(well).wells;
            if !player.can_drill(wells) {
                continue;
            }
            match target {
                Some(t) if self.board.cell(t).wells >= wells => {}
                _ => target = Some(well),
            }
        }
        let Some(well) = target else {
            return Ok(None);
        };

        let wells = self.board.cell(well).wells;
        self.board.build_derrick(well)?;
        let player = &mut self.players[seat];
        let spent = player.spend_licenses(wells as u32).unwrap_or_default();
        player.free_rigs -= 1;
        player.rigs_in_use.push(well);
        player.derricks_built += 1;
        for card in spent {
            self.licenses.discard(card);
        }
        log::debug!(
            "{} drills {} ({} wells, {} barrels)",
            self.players[seat].id,
            self.board.cell(well),
            wells,
            self.board.cell(well).oil_reserve
        );
        Ok(Some(well))
    }

    /// Red-card backwards moves and oil markers, beige-card price raises.
    fn special_actions(&mut self, seat: usize) {
        let actions = self.players[seat].actions;
        if actions.backwards > 0 {
            for (other, p) in self.players.iter_mut().enumerate() {
                if other != seat {
                    p.retreat_train(actions.backwards);
                }
            }
        }
        if actions.markers > 0 {
            let capacity = self.config.storage_capacity;
            self.players[seat].store_oil(actions.markers, capacity);
        }
        if actions.oil_price > 0 {
            // Raise the best bid that is not already at the cap.
            let mut target: Option<usize> = None;
            for (i, &p) in self.oil_prices.iter().enumerate() {
                if p >= MAX_PRICE {
                    continue;
                }
                match target {
                    Some(t) if self.oil_prices[t] >= p => {}
                    _ => target = Some(i),
                }
            }
            if let Some(company) = target {
                self.oil_prices[company] = raise_price(self.oil_prices[company], actions.oil_price);
            }
        }
    }

    /// Pumps one barrel from every player's derricks. Exhausted derricks give
    /// their rig back. Returns the barrels pumped.
    fn drain_derricks(&mut self) -> Result<u32, ConsistencyError> {
        let capacity = self.config.storage_capacity;
        let mut pumped = 0;
        for player in self.players.iter_mut() {
            let rigs = std::mem::take(&mut player.rigs_in_use);
            for rig in rigs {
                let extraction = self.board.extract_oil(rig)?;
                pumped += extraction.barrels;
                player.store_oil(extraction.barrels, capacity);
                if extraction.exhausted {
                    player.free_rigs += 1;
                } else {
                    player.rigs_in_use.push(rig);
                }
            }
        }
        Ok(pumped)
    }
}
