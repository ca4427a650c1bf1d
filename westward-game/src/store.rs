//! Fort store: fixed price table and atomic purchases.
use serde::{Deserialize, Serialize};

use crate::constants::{
    PRICE_AMMO_BOX_CENTS, PRICE_CLOTHING_SET_CENTS, PRICE_FOOD_PER_LB_CENTS,
    PRICE_OXEN_PAIR_CENTS, PRICE_SPARE_AXLE_CENTS, PRICE_SPARE_TONGUE_CENTS,
    PRICE_SPARE_WHEEL_CENTS, ROUNDS_PER_AMMO_BOX,
};
use crate::state::{GameState, format_money_cents};

/// Prices in cents to keep purchase math exact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceTable {
    pub food_per_lb_cents: i64,
    pub clothing_set_cents: i64,
    /// Ammunition is sold by the box of [`ROUNDS_PER_AMMO_BOX`] rounds.
    pub ammo_box_cents: i64,
    pub oxen_pair_cents: i64,
    pub spare_wheel_cents: i64,
    pub spare_axle_cents: i64,
    pub spare_tongue_cents: i64,
}

impl PriceTable {
    #[must_use]
    pub const fn default_config() -> Self {
        Self {
            food_per_lb_cents: PRICE_FOOD_PER_LB_CENTS,
            clothing_set_cents: PRICE_CLOTHING_SET_CENTS,
            ammo_box_cents: PRICE_AMMO_BOX_CENTS,
            oxen_pair_cents: PRICE_OXEN_PAIR_CENTS,
            spare_wheel_cents: PRICE_SPARE_WHEEL_CENTS,
            spare_axle_cents: PRICE_SPARE_AXLE_CENTS,
            spare_tongue_cents: PRICE_SPARE_TONGUE_CENTS,
        }
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::default_config()
    }
}

/// Requested quantities per store line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PurchaseOrder {
    pub food_lbs: i32,
    pub clothing_sets: i32,
    pub ammo_boxes: i32,
    pub oxen_pairs: i32,
    pub spare_wheels: i32,
    pub spare_axles: i32,
    pub spare_tongues: i32,
}

impl PurchaseOrder {
    /// Total cost of the order at the given prices.
    #[must_use]
    pub const fn total_cents(&self, prices: &PriceTable) -> i64 {
        self.food_lbs as i64 * prices.food_per_lb_cents
            + self.clothing_sets as i64 * prices.clothing_set_cents
            + self.ammo_boxes as i64 * prices.ammo_box_cents
            + self.oxen_pairs as i64 * prices.oxen_pair_cents
            + self.spare_wheels as i64 * prices.spare_wheel_cents
            + self.spare_axles as i64 * prices.spare_axle_cents
            + self.spare_tongues as i64 * prices.spare_tongue_cents
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.food_lbs == 0
            && self.clothing_sets == 0
            && self.ammo_boxes == 0
            && self.oxen_pairs == 0
            && self.spare_wheels == 0
            && self.spare_axles == 0
            && self.spare_tongues == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOutcome {
    Purchased {
        total_cents: i64,
    },
    /// Not an error: the state is untouched apart from the narration.
    InsufficientFunds {
        required_cents: i64,
        available_cents: i64,
    },
}

/// Debit money and credit every line of the order atomically, or reject
/// the whole order when it would overdraw the purse.
pub fn purchase(gs: &mut GameState, order: &PurchaseOrder, prices: &PriceTable) -> StoreOutcome {
    let total = order.total_cents(prices);
    if total > gs.money_cents {
        gs.push_message("You don't have enough money for those purchases.");
        return StoreOutcome::InsufficientFunds {
            required_cents: total,
            available_cents: gs.money_cents,
        };
    }
    gs.money_cents -= total;
    gs.inventory.food += order.food_lbs;
    gs.inventory.clothing += order.clothing_sets;
    gs.inventory.ammunition += order.ammo_boxes * ROUNDS_PER_AMMO_BOX;
    gs.inventory.oxen += order.oxen_pairs;
    gs.inventory.spare_wheels += order.spare_wheels;
    gs.inventory.spare_axles += order.spare_axles;
    gs.inventory.spare_tongues += order.spare_tongues;
    gs.push_message(format!(
        "Purchases complete. Spent {}.",
        format_money_cents(total)
    ));
    StoreOutcome::Purchased { total_cents: total }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_state() -> GameState {
        let members: Vec<String> = ["Silas", "Mercy"].iter().map(ToString::to_string).collect();
        GameState::new("Augusta", &members, 21)
    }

    #[test]
    fn order_totals_use_the_price_table() {
        let prices = PriceTable::default_config();
        let order = PurchaseOrder {
            food_lbs: 100,
            clothing_sets: 2,
            ammo_boxes: 1,
            oxen_pairs: 1,
            spare_wheels: 1,
            ..PurchaseOrder::default()
        };
        // $20 food + $20 clothing + $2 ammo + $40 oxen + $10 wheel
        assert_eq!(order.total_cents(&prices), 9_200);
    }

    #[test]
    fn purchase_is_atomic() {
        let mut gs = fresh_state();
        let prices = PriceTable::default_config();
        let order = PurchaseOrder {
            food_lbs: 50,
            ammo_boxes: 2,
            ..PurchaseOrder::default()
        };
        let outcome = purchase(&mut gs, &order, &prices);
        assert_eq!(outcome, StoreOutcome::Purchased { total_cents: 1_400 });
        assert_eq!(gs.money_cents, 88_600);
        assert_eq!(gs.inventory.food, 250);
        assert_eq!(gs.inventory.ammunition, 60, "boxes convert to rounds");
    }

    #[test]
    fn overdrawing_order_is_rejected_without_state_change() {
        let mut gs = fresh_state();
        gs.money_cents = 2_000;
        let prices = PriceTable::default_config();
        let order = PurchaseOrder {
            oxen_pairs: 1,
            ..PurchaseOrder::default()
        };
        let inventory_before = gs.inventory.clone();
        let outcome = purchase(&mut gs, &order, &prices);
        assert_eq!(
            outcome,
            StoreOutcome::InsufficientFunds {
                required_cents: 4_000,
                available_cents: 2_000,
            }
        );
        assert_eq!(gs.money_cents, 2_000);
        assert_eq!(gs.inventory, inventory_before);
        assert!(
            gs.messages.last().unwrap().contains("enough money"),
            "rejection narrates"
        );
    }
}
