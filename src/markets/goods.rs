//! Goods market: price-weighted demand allocation across active firms.

use crate::agents::{Firm, Household};
use rand::rngs::StdRng;

const EPS: f64 = 1e-9;

/// Per-period clearing statistics for the goods market.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoodsMarketStats {
    pub total_demand: f64,
    pub total_sales: f64,
    pub average_price: f64,
    pub inflation: f64,
}

/// Clears demand for consumption goods against firm inventories.
#[derive(Debug, Clone)]
pub struct GoodsMarket {
    previous_average_price: f64,
}

impl Default for GoodsMarket {
    fn default() -> Self {
        Self::new()
    }
}

impl GoodsMarket {
    pub fn new() -> Self {
        Self {
            previous_average_price: 0.0,
        }
    }

    /// Clear the goods market for one period.
    ///
    /// Demand is allocated across active (non-bankrupt) firms by a weight
    /// that is linear in the gap between each firm's price and the highest
    /// active price, so cheaper firms capture a larger share of total
    /// demand. Each firm's realised excess demand then feeds its own
    /// `adapt_markup`.
    pub fn clear(
        &mut self,
        firms: &mut [Firm],
        households: &[Household],
        government_expenditure: f64,
        mut rng: Option<&mut StdRng>,
    ) -> GoodsMarketStats {
        let active: Vec<usize> = firms
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.bankrupt)
            .map(|(i, _)| i)
            .collect();

        if active.is_empty() {
            return GoodsMarketStats::default();
        }

        let total_demand: f64 =
            households.iter().map(|h| h.consumption).sum::<f64>() + government_expenditure;

        let max_price = active
            .iter()
            .map(|&i| firms[i].price)
            .fold(f64::MIN, f64::max);

        let weights: Vec<f64> = active
            .iter()
            .map(|&i| (max_price - firms[i].price).max(EPS) + EPS)
            .collect();
        let total_weight: f64 = weights.iter().sum();

        let mut total_sales = 0.0;
        let mut price_sum = 0.0;

        for (k, &i) in active.iter().enumerate() {
            let share = weights[k] / total_weight;
            let demand_f = total_demand * share;
            let available_f = firms[i].inventory * firms[i].price;
            let sales_f = demand_f.min(available_f);

            let sold_quantity = sales_f / firms[i].price.max(EPS);
            firms[i].inventory -= sold_quantity;
            firms[i].turnover = sales_f;
            total_sales += sales_f;
            price_sum += firms[i].price;

            let excess_demand = (demand_f - available_f) / available_f.max(EPS);
            firms[i].adapt_markup(excess_demand, rng.as_deref_mut());
        }

        let average_price = price_sum / active.len() as f64;
        let inflation = if self.previous_average_price > 0.0 {
            (average_price - self.previous_average_price) / self.previous_average_price
        } else {
            0.0
        };
        self.previous_average_price = average_price;

        GoodsMarketStats {
            total_demand,
            total_sales,
            average_price,
            inflation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FirmBehaviorConfig, HouseholdBehaviorConfig};

    fn firm_with(price: f64, inventory: f64) -> Firm {
        let mut f = Firm::new(
            "other_services",
            1,
            0.0,
            0.0,
            100.0,
            0.0,
            0.0,
            100.0,
            FirmBehaviorConfig::default(),
        );
        f.price = price;
        f.inventory = inventory;
        f
    }

    #[test]
    fn no_active_firms_returns_zero_stats() {
        let mut market = GoodsMarket::new();
        let mut firms = vec![firm_with(10.0, 100.0)];
        firms[0].bankrupt = true;
        let stats = market.clear(&mut firms, &[], 0.0, None);
        assert_eq!(stats.total_demand, 0.0);
        assert_eq!(stats.total_sales, 0.0);
    }

    // S6: goods market allocation ordering scenario.
    #[test]
    fn cheaper_firms_capture_larger_share() {
        let mut market = GoodsMarket::new();
        let mut firms = vec![firm_with(5.0, 200.0), firm_with(10.0, 100.0), firm_with(20.0, 50.0)];
        let mut hh = Household::new(900.0, 0.0, 0.8, HouseholdBehaviorConfig::default());
        hh.consumption = 900.0;
        market.clear(&mut firms, &[hh], 0.0, None);
        // Cheapest firm (price 5) should sell at least as much revenue as the
        // most expensive (price 20), given equal available inventory value.
        assert!(firms[0].turnover >= firms[2].turnover);
    }

    #[test]
    fn inventory_never_goes_negative() {
        let mut market = GoodsMarket::new();
        let mut firms = vec![firm_with(5.0, 1.0)];
        let mut hh = Household::new(10_000.0, 0.0, 0.8, HouseholdBehaviorConfig::default());
        hh.consumption = 10_000.0;
        market.clear(&mut firms, &[hh], 0.0, None);
        assert!(firms[0].inventory >= 0.0);
    }
}
