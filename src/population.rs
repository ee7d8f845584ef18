//! Initial population construction from configuration + a seeded RNG.
//!
//! Calibration constants are taken from UK macroeconomic aggregates (ONS
//! Blue Book, Labour Force Survey), matching the sector-representative
//! factory this core's population initializer generalizes.

use crate::agents::{Bank, Firm, Household};
use crate::config::ModelConfig;
use rand::rngs::StdRng;
use rand_distr::{Distribution, LogNormal, Normal, Pareto};

/// UK mean quarterly wage per employee (£), used to size firm wage bills.
const UK_WAGE_QUARTERLY: f64 = 7_000.0;

/// Floor applied to summed sector shares to avoid division by zero when a
/// custom sector list resolves to all-unknown labels.
const EPS_POPULATION: f64 = 1e-9;

/// Calibration data for one sector's representative firm share.
#[derive(Debug, Clone, Copy)]
pub struct SectorProfile {
    pub gdp_share: f64,
    pub employment_share: f64,
    pub capital_output_ratio: f64,
    pub markup: f64,
}

/// Look up the calibration profile for a known sector label, falling back
/// to a neutral profile for unrecognised labels so custom sector lists
/// never panic the initializer.
pub fn sector_profile(sector: &str) -> SectorProfile {
    match sector {
        "agriculture" => SectorProfile { gdp_share: 0.007, employment_share: 0.016, capital_output_ratio: 3.5, markup: 0.08 },
        "manufacturing" => SectorProfile { gdp_share: 0.100, employment_share: 0.097, capital_output_ratio: 2.0, markup: 0.12 },
        "construction" => SectorProfile { gdp_share: 0.060, employment_share: 0.081, capital_output_ratio: 1.5, markup: 0.10 },
        "wholesale_retail" => SectorProfile { gdp_share: 0.110, employment_share: 0.129, capital_output_ratio: 1.0, markup: 0.20 },
        "transport" => SectorProfile { gdp_share: 0.050, employment_share: 0.052, capital_output_ratio: 2.5, markup: 0.12 },
        "hospitality" => SectorProfile { gdp_share: 0.030, employment_share: 0.065, capital_output_ratio: 1.0, markup: 0.25 },
        "information_communication" => SectorProfile { gdp_share: 0.060, employment_share: 0.048, capital_output_ratio: 1.5, markup: 0.30 },
        "financial" => SectorProfile { gdp_share: 0.080, employment_share: 0.039, capital_output_ratio: 2.0, markup: 0.35 },
        "professional_services" => SectorProfile { gdp_share: 0.120, employment_share: 0.161, capital_output_ratio: 1.0, markup: 0.25 },
        "public_admin" => SectorProfile { gdp_share: 0.050, employment_share: 0.048, capital_output_ratio: 2.0, markup: 0.05 },
        "education" => SectorProfile { gdp_share: 0.060, employment_share: 0.081, capital_output_ratio: 2.5, markup: 0.05 },
        "health" => SectorProfile { gdp_share: 0.070, employment_share: 0.145, capital_output_ratio: 2.0, markup: 0.05 },
        "other_services" => SectorProfile { gdp_share: 0.060, employment_share: 0.052, capital_output_ratio: 1.5, markup: 0.15 },
        _ => SectorProfile { gdp_share: 1.0 / 13.0, employment_share: 1.0 / 13.0, capital_output_ratio: 1.5, markup: 0.15 },
    }
}

/// Build the initial firm population: `config.firms.sample_size` firms
/// spread round-robin across `config.firms.sectors`, each scaled down from
/// national sector totals by the sample's share of `config.households.count`
/// so a small sample still produces a plausible, internally consistent
/// balance sheet.
pub fn build_firms(config: &ModelConfig) -> Vec<Firm> {
    let n = config.firms.sample_size.max(1);
    let sectors = &config.firms.sectors;

    // A direct national-scale calibration would give firms tens of
    // thousands of employees even in a ten-firm toy run. Instead each
    // firm's head-count is its sector's share of total employment
    // (normalised over just the sampled sectors) applied to the
    // configured household population, so total labour demand at init is
    // commensurate with total labour supply.
    let sector_shares: Vec<f64> = (0..n)
        .map(|i| sector_profile(&sectors[i % sectors.len()]).employment_share)
        .collect();
    let share_total: f64 = sector_shares.iter().sum::<f64>().max(EPS_POPULATION);

    (0..n)
        .map(|i| {
            let sector_label = sectors[i % sectors.len()].clone();
            let profile = sector_profile(&sector_label);

            let employees = ((sector_shares[i] / share_total) * config.households.count as f64)
                .round()
                .max(1.0) as u32;
            let wage_bill = employees as f64 * UK_WAGE_QUARTERLY;
            let turnover = wage_bill * (1.0 + profile.markup);
            let capital = profile.capital_output_ratio * turnover * 4.0;
            let cash = turnover;
            let equity = capital + cash;

            let mut behavior = config.firm_behavior.clone();
            behavior.price_markup = profile.markup;
            behavior.exit_threshold = config.firms.exit_threshold;

            Firm::new(sector_label, employees, wage_bill, turnover, capital, cash, 0.0, equity, behavior)
        })
        .collect()
}

/// Build the initial household population, sampling income from a
/// log-normal distribution (calibrated by mean/std) and wealth from a
/// Pareto tail (calibrated by shape), as real wealth distributions are
/// strongly right-skewed.
pub fn build_households(config: &ModelConfig, rng: &mut StdRng) -> Vec<Household> {
    let income_dist = lognormal_from_mean_std(config.households.income_mean, config.households.income_std);
    let mpc_dist = Normal::new(config.households.mpc_mean, config.households.mpc_std).ok();
    let wealth_dist = Pareto::new(1.0, config.households.wealth_shape).ok();

    (0..config.households.count)
        .map(|_| {
            let income = income_dist
                .as_ref()
                .map(|d| d.sample(rng))
                .unwrap_or(config.households.income_mean)
                .max(0.0);
            let wealth = wealth_dist
                .as_ref()
                .map(|d| (d.sample(rng) - 1.0) * income)
                .unwrap_or(0.0)
                .max(0.0);
            let mpc = mpc_dist
                .map(|d| d.sample(rng))
                .unwrap_or(0.8)
                .clamp(0.1, 0.99);
            Household::new(income, wealth, mpc, config.household_behavior.clone())
        })
        .collect()
}

/// Build the initial bank population with capital sized to meet the
/// configured requirement against a zero initial loan book.
pub fn build_banks(config: &ModelConfig) -> Vec<Bank> {
    let per_bank_capital = 10.0 * config.households.income_mean * config.households.count as f64
        / config.banks.count.max(1) as f64
        * config.banks.capital_requirement.max(0.01);
    let per_bank_deposits = per_bank_capital * 5.0;
    let per_bank_reserves = per_bank_deposits * config.banks.reserve_requirement;

    (0..config.banks.count)
        .map(|_| {
            Bank::new(
                per_bank_capital,
                per_bank_reserves,
                per_bank_deposits,
                config.banks.clone(),
                config.bank_behavior.clone(),
            )
        })
        .collect()
}

/// Build the full initial population (firms, households, banks) from
/// `config` and a seeded RNG, assigning households as employees of firms
/// up to each firm's initial head-count (mirrors `_initial_employment` in
/// the reference model).
pub fn initialize_population(
    config: &ModelConfig,
    rng: &mut StdRng,
) -> (Vec<Firm>, Vec<Household>, Vec<Bank>) {
    let mut firms = build_firms(config);
    let mut households = build_households(config, rng);
    let banks = build_banks(config);

    let mut hh_cursor = 0usize;
    for (firm_idx, firm) in firms.iter_mut().enumerate() {
        let target = firm.employees;
        firm.employees = 0;
        for _ in 0..target {
            if hh_cursor >= households.len() {
                break;
            }
            let wage = firm.wage_rate;
            households[hh_cursor].become_employed(crate::agents::FirmId(firm_idx), wage);
            firm.employees += 1;
            hh_cursor += 1;
        }
        firm.wage_bill = firm.employees as f64 * firm.wage_rate;
    }

    (firms, households, banks)
}

fn lognormal_from_mean_std(mean: f64, std: f64) -> Option<LogNormal<f64>> {
    if mean <= 0.0 {
        return None;
    }
    let variance = std * std;
    let mu = (mean * mean / (variance + mean * mean).sqrt()).ln();
    let sigma = ((variance / (mean * mean)) + 1.0).ln().sqrt();
    LogNormal::new(mu, sigma).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn builds_requested_number_of_firms() {
        let config = ModelConfig::default();
        let firms = build_firms(&config);
        assert_eq!(firms.len(), config.firms.sample_size);
    }

    #[test]
    fn builds_requested_number_of_households() {
        let config = ModelConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let households = build_households(&config, &mut rng);
        assert_eq!(households.len(), config.households.count);
    }

    #[test]
    fn household_mpc_stays_in_valid_range() {
        let config = ModelConfig::default();
        let mut rng = StdRng::seed_from_u64(1);
        let households = build_households(&config, &mut rng);
        for hh in &households {
            assert!(hh.mpc >= 0.1 && hh.mpc <= 0.99);
        }
    }

    #[test]
    fn builds_requested_number_of_banks() {
        let config = ModelConfig::default();
        let banks = build_banks(&config);
        assert_eq!(banks.len(), config.banks.count);
    }

    #[test]
    fn firms_have_positive_equity_at_init() {
        let config = ModelConfig::default();
        for firm in build_firms(&config) {
            assert!(firm.equity > 0.0);
        }
    }

    #[test]
    fn initial_employment_never_exceeds_household_count() {
        let config = ModelConfig::default();
        let mut rng = StdRng::seed_from_u64(3);
        let (firms, households, _) = initialize_population(&config, &mut rng);
        let total_employed: u32 = firms.iter().map(|f| f.employees).sum();
        let employed_households = households.iter().filter(|h| h.employed).count();
        assert_eq!(total_employed as usize, employed_households);
        assert!(employed_households <= households.len());
    }

    #[test]
    fn unknown_sector_label_falls_back_to_neutral_profile() {
        let profile = sector_profile("not_a_real_sector");
        assert!(profile.gdp_share > 0.0);
    }
}
