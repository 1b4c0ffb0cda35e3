//! Selling oil to the oil companies.
//!
//! Barrels are auctioned one at a time to the company currently bidding the
//! most. Each purchase lowers that company's bid by the price step. Rivals
//! whose trains are further along collect a transport fee on every barrel.

use serde::Serialize;

use crate::board::PlayerId;

use super::oil_price::MIN_PRICE;
use super::player::Player;

/// One player's sales in a market phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sale {
    pub player: PlayerId,
    pub barrels: u32,
    pub revenue: i64,
    /// Transport fees paid to rivals.
    pub fees: i64,
    /// Barrels bought by each company.
    pub per_company: Vec<u32>,
}

/// Market rules.
#[derive(Debug, Clone, Copy)]
pub struct MarketRules {
    pub price_step: i64,
    pub transport_fee: i64,
}

/// Index of the highest bid; the lowest index wins ties.
fn best_bid(prices: &[i64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, &p) in prices.iter().enumerate() {
        match best {
            Some(b) if prices[b] >= p => {}
            _ => best = Some(i),
        }
    }
    best
}

/// Sells every stored barrel, seat by seat in `order`.
pub fn sell_oil(
    players: &mut [Player],
    prices: &mut [i64],
    order: &[usize],
    rules: MarketRules,
) -> Vec<Sale> {
    let mut sales = Vec::new();
    for &seat in order {
        let barrels = players[seat].barrels;
        if barrels == 0 {
            continue;
        }
        let mut sale = Sale {
            player: players[seat].id,
            barrels: 0,
            revenue: 0,
            fees: 0,
            per_company: vec![0; prices.len()],
        };
        let seller_col = players[seat].train_col;
        let rivals: Vec<usize> = (0..players.len())
            .filter(|&r| r != seat && players[r].train_col > seller_col)
            .collect();

        for _ in 0..barrels {
            let Some(company) = best_bid(prices) else {
                break;
            };
            let price = prices[company];
            prices[company] = (price - rules.price_step).max(MIN_PRICE);
            sale.barrels += 1;
            sale.revenue += price;
            sale.per_company[company] += 1;

            // Fees on a barrel never exceed what it sold for.
            let mut left = price;
            for &r in &rivals {
                let fee = rules.transport_fee.min(left);
                left -= fee;
                players[r].cash += fee;
                sale.fees += fee;
            }
        }

        let p = &mut players[seat];
        p.barrels -= sale.barrels;
        p.barrels_sold += sale.barrels;
        p.cash += sale.revenue - sale.fees;
        log::debug!(
            "{} sold {} barrels for ${}, paid ${} transport",
            p.id,
            sale.barrels,
            sale.revenue,
            sale.fees
        );
        sales.push(sale);
    }
    sales
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CellId;

    const RULES: MarketRules = MarketRules {
        price_step: 500,
        transport_fee: 1_000,
    };

    fn players(n: u8) -> Vec<Player> {
        (0..n)
            .map(|i| Player::new(PlayerId(i), CellId(i as u32), 0, 5))
            .collect()
    }

    #[test]
    fn barrels_go_to_the_best_bid() {
        let mut ps = players(1);
        ps[0].barrels = 3;
        let mut prices = vec![5_000, 6_000, 5_000];
        let sales = sell_oil(&mut ps, &mut prices, &[0], RULES);
        // 6000 -> company 1, then 5500 -> company 1, then 5000 ties go to company 0.
        assert_eq!(sales[0].per_company, vec![1, 2, 0]);
        assert_eq!(sales[0].revenue, 6_000 + 5_500 + 5_000);
        assert_eq!(prices, vec![4_500, 5_000, 5_000]);
        assert_eq!(ps[0].cash, 16_500);
        assert_eq!(ps[0].barrels, 0);
        assert_eq!(ps[0].barrels_sold, 3);
    }

    #[test]
    fn bids_never_drop_below_floor() {
        let mut ps = players(1);
        ps[0].barrels = 2;
        let mut prices = vec![MIN_PRICE];
        sell_oil(&mut ps, &mut prices, &[0], RULES);
        assert_eq!(prices, vec![MIN_PRICE]);
        assert_eq!(ps[0].cash, 2 * MIN_PRICE);
    }

    #[test]
    fn rivals_ahead_collect_transport_fees() {
        let mut ps = players(3);
        ps[0].barrels = 2;
        ps[0].train_col = 2;
        ps[1].train_col = 5;
        ps[2].train_col = 2;
        let mut prices = vec![5_000];
        let sales = sell_oil(&mut ps, &mut prices, &[0, 1, 2], RULES);
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].fees, 2_000);
        assert_eq!(ps[1].cash, 2_000);
        assert_eq!(ps[2].cash, 0);
        assert_eq!(ps[0].cash, 5_000 + 4_500 - 2_000);
    }

    #[test]
    fn fees_are_capped_at_the_barrel_price() {
        let mut ps = players(3);
        ps[0].barrels = 1;
        ps[1].train_col = 1;
        ps[2].train_col = 1;
        let mut prices = vec![1_500];
        sell_oil(&mut ps, &mut prices, &[0], RULES);
        assert_eq!(ps[1].cash, 1_000);
        assert_eq!(ps[2].cash, 500);
        assert_eq!(ps[0].cash, 0);
    }

    #[test]
    fn players_without_oil_make_no_sale() {
        let mut ps = players(2);
        let mut prices = vec![5_000, 5_000];
        assert!(sell_oil(&mut ps, &mut prices, &[0, 1], RULES).is_empty());
        assert_eq!(prices, vec![5_000, 5_000]);
    }
}
