//! Player state: truck, train, money, oil and licenses.

use serde::Serialize;

use crate::board::{CellId, PlayerId};
use crate::eval::train_columns_affordable;

use super::cards::{ActionCard, LicenseCard};

/// What a player may do this turn, taken from the action card they picked.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Actions {
    pub licenses: u32,
    /// Movement points shared by truck and train.
    pub movement: i32,
    pub markers: u32,
    pub backwards: u32,
    pub oil_price: u32,
}

impl From<ActionCard> for Actions {
    fn from(card: ActionCard) -> Self {
        match card {
            ActionCard::Red(c) => Actions {
                licenses: c.licenses,
                movement: c.movement,
                markers: c.markers,
                backwards: c.backwards,
                oil_price: 0,
            },
            ActionCard::Beige(c) => Actions {
                licenses: c.licenses,
                movement: c.movement,
                markers: 0,
                backwards: 0,
                oil_price: c.oil_price,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    /// Cell the truck stands on.
    pub truck: CellId,
    pub train_col: usize,
    pub free_rigs: u32,
    /// Cells where this player's derricks stand.
    pub rigs_in_use: Vec<CellId>,
    pub cash: i64,
    /// Barrels in storage, waiting to be sold.
    pub barrels: u32,
    pub actions: Actions,
    pub single_licenses: u32,
    pub double_licenses: u32,
    pub derricks_built: u32,
    pub barrels_sold: u32,
}

impl Player {
    pub fn new(id: PlayerId, truck: CellId, cash: i64, rigs: u32) -> Self {
        Player {
            id,
            truck,
            train_col: 0,
            free_rigs: rigs,
            rigs_in_use: Vec::new(),
            cash,
            barrels: 0,
            actions: Actions::default(),
            single_licenses: 0,
            double_licenses: 0,
            derricks_built: 0,
            barrels_sold: 0,
        }
    }

    /// Total licenses held.
    pub fn licenses(&self) -> u32 {
        self.single_licenses + 2 * self.double_licenses
    }

    pub fn take_license(&mut self, card: LicenseCard) {
        match card {
            LicenseCard::Single => self.single_licenses += 1,
            LicenseCard::Double => self.double_licenses += 1,
        }
    }

    /// True if the player can drill a cell with `wells` wells.
    pub fn can_drill(&self, wells: u8) -> bool {
        self.free_rigs > 0 && self.licenses() >= wells as u32
    }

    /// Hands in license cards worth at least `needed`. Double cards go first
    /// while they fit; a double covers a last odd license only when no single
    /// is left. Returns the spent cards, or `None` without spending anything
    /// if the player holds too few.
    pub fn spend_licenses(&mut self, needed: u32) -> Option<Vec<LicenseCard>> {
        if self.licenses() < needed {
            return None;
        }
        let mut spent = Vec::new();
        let mut remaining = needed;
        while remaining >= 2 && self.double_licenses > 0 {
            self.double_licenses -= 1;
            remaining -= 2;
            spent.push(LicenseCard::Double);
        }
        while remaining > 0 && self.single_licenses > 0 {
            self.single_licenses -= 1;
            remaining -= 1;
            spent.push(LicenseCard::Single);
        }
        if remaining > 0 {
            self.double_licenses -= 1;
            spent.push(LicenseCard::Double);
        }
        Some(spent)
    }

    /// Moves the train right as far as `points` pay for. Returns columns moved.
    pub fn advance_train(&mut self, points: i32, costs: &[i32]) -> usize {
        let cols = train_columns_affordable(self.train_col, points, costs);
        self.train_col += cols;
        cols
    }

    /// Moves the train back, never past the depot.
    pub fn retreat_train(&mut self, cols: u32) {
        self.train_col = self.train_col.saturating_sub(cols as usize);
    }

    /// Adds barrels to storage up to `capacity`. Returns the barrels kept.
    pub fn store_oil(&mut self, barrels: u32, capacity: u32) -> u32 {
        let kept = barrels.min(capacity.saturating_sub(self.barrels));
        self.barrels += kept;
        kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::cards::{BeigeCard, RedCard};

    fn player() -> Player {
        Player::new(PlayerId(0), CellId(0), 15_000, 5)
    }

    #[test]
    fn actions_from_cards() {
        let red = ActionCard::Red(RedCard {
            black_loco: 2,
            licenses: 4,
            movement: 8,
            markers: 0,
            backwards: 2,
        });
        assert_eq!(
            Actions::from(red),
            Actions {
                licenses: 4,
                movement: 8,
                markers: 0,
                backwards: 2,
                oil_price: 0
            }
        );
        let beige = ActionCard::Beige(BeigeCard {
            licenses: 5,
            movement: 5,
            oil_price: 3,
        });
        assert_eq!(Actions::from(beige).oil_price, 3);
        assert_eq!(Actions::from(beige).backwards, 0);
    }

    #[test]
    fn doubles_are_spent_first() {
        let mut p = player();
        p.single_licenses = 2;
        p.double_licenses = 2;
        assert_eq!(
            p.spend_licenses(3),
            Some(vec![LicenseCard::Double, LicenseCard::Single])
        );
        assert_eq!((p.single_licenses, p.double_licenses), (1, 1));
    }

    #[test]
    fn double_covers_odd_license_without_singles() {
        let mut p = player();
        p.double_licenses = 2;
        assert_eq!(
            p.spend_licenses(3),
            Some(vec![LicenseCard::Double, LicenseCard::Double])
        );
        assert_eq!(p.licenses(), 0);
    }

    #[test]
    fn too_few_licenses_spends_nothing() {
        let mut p = player();
        p.single_licenses = 1;
        assert_eq!(p.spend_licenses(2), None);
        assert_eq!(p.single_licenses, 1);
        assert!(!p.can_drill(2));
        assert!(p.can_drill(1));
    }

    #[test]
    fn drilling_needs_a_free_rig() {
        let mut p = player();
        p.single_licenses = 3;
        p.free_rigs = 0;
        assert!(!p.can_drill(1));
    }

    #[test]
    fn train_moves_and_retreats() {
        let costs = [0, 1, 1, 2, 2];
        let mut p = player();
        assert_eq!(p.advance_train(3, &costs), 2);
        assert_eq!(p.train_col, 2);
        p.retreat_train(5);
        assert_eq!(p.train_col, 0);
    }

    #[test]
    fn storage_is_capped() {
        let mut p = player();
        assert_eq!(p.store_oil(4, 6), 4);
        assert_eq!(p.store_oil(4, 6), 2);
        assert_eq!(p.barrels, 6);
        assert_eq!(p.store_oil(1, 6), 0);
    }
}
