//! Labour market: exogenous separations and fixed-order matching.

use crate::agents::{FirmId, HouseholdId};
use crate::agents::{Firm, Household};
use crate::config::LaborMarketConfig;
use rand::rngs::StdRng;
use rand::Rng;

/// Per-period clearing statistics for the labour market.
#[derive(Debug, Clone, Copy, Default)]
pub struct LaborMarketStats {
    pub employed: usize,
    pub unemployed: usize,
    pub unemployment_rate: f64,
    pub average_wage: f64,
}

/// Clears labour supply and demand by fixed population order.
#[derive(Debug, Clone)]
pub struct LaborMarket {
    config: LaborMarketConfig,
}

impl LaborMarket {
    pub fn new(config: LaborMarketConfig) -> Self {
        Self { config }
    }

    /// Clear the labour market for one period.
    ///
    /// Order of operations: exogenous separations first, then matching of
    /// searching households against firms with open vacancies, iterated in
    /// population order. Order-of-iteration bias is intentional: it is
    /// reproducible under a fixed seed and is part of the contract, not an
    /// implementation detail to be "fixed" with randomized ordering.
    pub fn clear(
        &self,
        firms: &mut [Firm],
        households: &mut [Household],
        mut rng: Option<&mut StdRng>,
    ) -> LaborMarketStats {
        self.apply_separations(firms, households, rng.as_deref_mut());
        self.match_vacancies(firms, households, rng.as_deref_mut());
        self.compute_stats(households)
    }

    fn apply_separations(
        &self,
        firms: &mut [Firm],
        households: &mut [Household],
        mut rng: Option<&mut StdRng>,
    ) {
        for hh in households.iter_mut() {
            if !hh.employed {
                continue;
            }
            let separates = match rng.as_deref_mut() {
                Some(rng) => rng.random::<f64>() < self.config.separation_rate,
                None => false,
            };
            if separates {
                if let Some(FirmId(idx)) = hh.employer_id {
                    if let Some(firm) = firms.get_mut(idx) {
                        firm.fire(1);
                    }
                }
                hh.become_unemployed();
            }
        }
    }

    fn match_vacancies(
        &self,
        firms: &mut [Firm],
        households: &mut [Household],
        mut rng: Option<&mut StdRng>,
    ) {
        let average_wage = self.average_wage(households);

        let seekers: Vec<HouseholdId> = households
            .iter()
            .enumerate()
            .filter(|(_, h)| h.is_searching(rng.as_deref_mut()))
            .map(|(i, _)| HouseholdId(i))
            .collect();

        let mut seeker_cursor = 0usize;

        for firm_idx in 0..firms.len() {
            if firms[firm_idx].bankrupt {
                continue;
            }
            while firms[firm_idx].vacancies > 0 && seeker_cursor < seekers.len() {
                let HouseholdId(hh_idx) = seekers[seeker_cursor];
                seeker_cursor += 1;

                if households[hh_idx].employed {
                    continue;
                }

                let accepted = match rng.as_deref_mut() {
                    Some(rng) => rng.random::<f64>() < self.config.matching_efficiency,
                    None => true,
                };
                if !accepted {
                    continue;
                }

                let wage = if average_wage > 0.0 {
                    self.config.wage_stickiness * average_wage
                        + (1.0 - self.config.wage_stickiness) * firms[firm_idx].wage_rate
                } else {
                    firms[firm_idx].wage_rate
                };

                firms[firm_idx].hire(1, wage);
                households[hh_idx].become_employed(FirmId(firm_idx), wage);
            }
        }
    }

    fn average_wage(&self, households: &[Household]) -> f64 {
        let positive: Vec<f64> = households
            .iter()
            .map(|h| h.wage)
            .filter(|&w| w > 0.0)
            .collect();
        if positive.is_empty() {
            0.0
        } else {
            positive.iter().sum::<f64>() / positive.len() as f64
        }
    }

    fn compute_stats(&self, households: &[Household]) -> LaborMarketStats {
        let employed = households.iter().filter(|h| h.employed).count();
        let unemployed = households.len() - employed;
        let total = employed + unemployed;
        let unemployment_rate = if total > 0 {
            unemployed as f64 / total as f64
        } else {
            0.0
        };
        LaborMarketStats {
            employed,
            unemployed,
            unemployment_rate,
            average_wage: self.average_wage(households),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{FirmBehaviorConfig, HouseholdBehaviorConfig};

    fn firm() -> Firm {
        Firm::new(
            "other_services",
            0,
            0.0,
            0.0,
            1000.0,
            0.0,
            0.0,
            1000.0,
            FirmBehaviorConfig::default(),
        )
    }

    #[test]
    fn employment_parity_holds_after_clear() {
        let mut firms = vec![firm()];
        firms[0].vacancies = 3;
        let mut households = vec![
            Household::new(0.0, 0.0, 0.8, HouseholdBehaviorConfig::default()),
            Household::new(0.0, 0.0, 0.8, HouseholdBehaviorConfig::default()),
        ];
        let market = LaborMarket::new(LaborMarketConfig {
            matching_efficiency: 1.0,
            separation_rate: 0.0,
            ..LaborMarketConfig::default()
        });
        market.clear(&mut firms, &mut households, None);

        let total_firm_employees: u32 = firms.iter().map(|f| f.employees).sum();
        let total_employed_households = households.iter().filter(|h| h.employed).count();
        assert_eq!(total_firm_employees as usize, total_employed_households);
        for hh in households.iter().filter(|h| h.employed) {
            let FirmId(idx) = hh.employer_id.unwrap();
            assert!(idx < firms.len());
        }
    }

    #[test]
    fn no_separations_without_rng() {
        let mut firms = vec![firm()];
        let mut households = vec![Household::new(0.0, 0.0, 0.8, HouseholdBehaviorConfig::default())];
        households[0].become_employed(FirmId(0), 100.0);
        firms[0].employees = 1;

        let market = LaborMarket::new(LaborMarketConfig::default());
        market.clear(&mut firms, &mut households, None);
        assert!(households[0].employed);
    }
}
