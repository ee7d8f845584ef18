//! The scheduler: owns every agent population and the single simulation RNG,
//! and drives the fixed within-period order.

use crate::agents::{Bank, CentralBank, Firm, Government, Household};
use crate::config::ModelConfig;
use crate::markets::{CreditMarket, GoodsMarket, LaborMarket};
use crate::population;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// A flat record of one period's observable aggregates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub period: u64,
    pub gdp: f64,
    pub inflation: f64,
    pub unemployment_rate: f64,
    pub average_wage: f64,
    pub policy_rate: f64,
    pub deficit: f64,
    pub debt: f64,
    pub total_lending: f64,
    pub bankruptcies_count: u64,
    pub total_employment: u64,
}

/// The result of a completed (or in-progress) simulation run.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub records: Vec<PeriodRecord>,
}

/// Owns the full agent population and drives the period loop.
pub struct Simulation {
    pub config: ModelConfig,
    pub firms: Vec<Firm>,
    pub households: Vec<Household>,
    pub banks: Vec<Bank>,
    pub central_bank: CentralBank,
    pub government: Government,

    goods_market: GoodsMarket,
    labor_market: LaborMarket,
    credit_market: CreditMarket,

    rng: StdRng,
    bankruptcies_ever: u64,
}

impl Simulation {
    /// Build a new simulation, constructing the initial population from
    /// `config` with the config's seed.
    pub fn new(config: ModelConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.simulation.seed);
        let (firms, households, banks) = population::initialize_population(&config, &mut rng);
        let central_bank = CentralBank::new(config.taylor_rule.inflation_target, config.taylor_rule.clone());
        let government = Government::new(
            config.fiscal_rule.clone(),
            config.fiscal_rule.tax_rate_corporate,
            config.fiscal_rule.tax_rate_income_base,
            config.fiscal_rule.spending_gdp_ratio,
            config.transfers.unemployment_benefit_ratio,
        );
        let goods_market = GoodsMarket::new();
        let labor_market = LaborMarket::new(config.labor_market.clone());
        let credit_market = CreditMarket::new(config.credit_market.clone());

        Self {
            config,
            firms,
            households,
            banks,
            central_bank,
            government,
            goods_market,
            labor_market,
            credit_market,
            rng,
            bankruptcies_ever: 0,
        }
    }

    /// Construct a simulation from pre-built populations (for calibration
    /// pipelines or tests that bypass [`population`]). The core never
    /// requires its own initializer to be used.
    pub fn with_population(
        config: ModelConfig,
        firms: Vec<Firm>,
        households: Vec<Household>,
        banks: Vec<Bank>,
    ) -> Self {
        let rng = StdRng::seed_from_u64(config.simulation.seed);
        let central_bank = CentralBank::new(config.taylor_rule.inflation_target, config.taylor_rule.clone());
        let government = Government::new(
            config.fiscal_rule.clone(),
            config.fiscal_rule.tax_rate_corporate,
            config.fiscal_rule.tax_rate_income_base,
            config.fiscal_rule.spending_gdp_ratio,
            config.transfers.unemployment_benefit_ratio,
        );
        let goods_market = GoodsMarket::new();
        let labor_market = LaborMarket::new(config.labor_market.clone());
        let credit_market = CreditMarket::new(config.credit_market.clone());

        Self {
            config,
            firms,
            households,
            banks,
            central_bank,
            government,
            goods_market,
            labor_market,
            credit_market,
            rng,
            bankruptcies_ever: 0,
        }
    }

    /// Run `config.simulation.periods` periods and return the trajectory,
    /// numbered 1-based in emission order.
    pub fn run(&mut self) -> SimulationResult {
        let periods = self.config.simulation.periods;
        run_numbered(self, periods)
    }

    /// Final (or current) firm states, for inspection beyond the trajectory.
    pub fn firms(&self) -> &[Firm] {
        &self.firms
    }

    pub fn households(&self) -> &[Household] {
        &self.households
    }

    pub fn banks(&self) -> &[Bank] {
        &self.banks
    }

    /// Advance exactly one period, following the fixed within-period order.
    pub fn step(&mut self) -> PeriodRecord {
        // 1-2: government begins the period, central bank sets policy rate.
        self.government.begin_period();
        self.central_bank.step();

        // 3: banks reprice from the policy rate.
        for bank in self.banks.iter_mut() {
            bank.set_policy_rate(self.central_bank.policy_rate);
        }

        // 4: credit market processes defaults then new applications.
        let credit_stats = self
            .credit_market
            .clear(&mut self.firms, &mut self.banks, Some(&mut self.rng));

        // 5: firms produce, price and update financials.
        for firm in self.firms.iter_mut() {
            firm.step();
        }

        // 6: labour market clears.
        let labor_stats = self
            .labor_market
            .clear(&mut self.firms, &mut self.households, Some(&mut self.rng));

        // 7: unemployment benefits distributed evenly across the unemployed.
        let benefit_pool = self
            .government
            .pay_unemployment_benefit(labor_stats.average_wage, labor_stats.unemployed);
        let benefit_share = if labor_stats.unemployed > 0 {
            benefit_pool / labor_stats.unemployed as f64
        } else {
            0.0
        };
        for hh in self.households.iter_mut().filter(|h| !h.employed) {
            hh.transfer_income = benefit_share;
        }

        // 8: households receive income, adapt expectations, consume, save.
        for hh in self.households.iter_mut() {
            hh.step();
        }

        // 9: scrub transfer income so it doesn't leak into the next period.
        for hh in self.households.iter_mut() {
            hh.transfer_income = 0.0;
        }

        // 10: GDP is realised turnover of surviving firms.
        let gdp: f64 = self
            .firms
            .iter()
            .filter(|f| !f.bankrupt)
            .map(|f| f.turnover)
            .sum();
        self.government.gdp_estimate = gdp;
        self.government.calculate_spending();

        // 11: goods market clears against the expenditure just set.
        let goods_stats = self.goods_market.clear(
            &mut self.firms,
            &self.households,
            self.government.expenditure,
            Some(&mut self.rng),
        );

        // 12: corporate tax on profitable, surviving firms.
        for firm in self.firms.iter_mut().filter(|f| !f.bankrupt && f.profit > 0.0) {
            let tax = self.government.collect_corporate_tax(firm.profit);
            firm.cash -= tax;
        }

        // 13: income tax on households with positive income.
        for hh in self.households.iter_mut().filter(|h| h.income > 0.0) {
            let tax = self.government.collect_income_tax(hh.income);
            hh.wealth -= tax;
        }

        // 14: fiscal rule, then settle the period's flows into debt.
        self.government.step();
        self.government.end_period();

        // 15: push this period's observations in for next period's rate.
        self.central_bank.update_observations(goods_stats.inflation, 0.0);

        // 16: banks accrue interest income/expense and provisions.
        for bank in self.banks.iter_mut() {
            bank.step();
        }

        let newly_bankrupt = self.firms.iter().filter(|f| f.bankrupt).count() as u64;
        if newly_bankrupt > self.bankruptcies_ever {
            self.bankruptcies_ever = newly_bankrupt;
        }

        let total_employment = self.households.iter().filter(|h| h.employed).count() as u64;

        debug!(
            "gdp={:.2} inflation={:.4} unemployment={:.4} policy_rate={:.4}",
            gdp, goods_stats.inflation, labor_stats.unemployment_rate, self.central_bank.policy_rate
        );

        PeriodRecord {
            period: 0, // assigned by the caller loop below
            gdp,
            inflation: goods_stats.inflation,
            unemployment_rate: labor_stats.unemployment_rate,
            average_wage: labor_stats.average_wage,
            policy_rate: self.central_bank.policy_rate,
            deficit: self.government.deficit,
            debt: self.government.debt,
            total_lending: credit_stats.total_lending,
            bankruptcies_count: self.bankruptcies_ever,
            total_employment,
        }
    }
}

/// Run `periods` steps of `sim`, assigning 1-based period indices as the
/// scheduler's contract requires.
pub fn run_numbered(sim: &mut Simulation, periods: usize) -> SimulationResult {
    let mut records = Vec::with_capacity(periods);
    for i in 0..periods {
        let mut record = sim.step();
        record.period = i as u64 + 1;
        records.push(record);
    }
    info!("completed {} periods", periods);
    SimulationResult { records }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigPreset;

    // S1: deterministic smoke test scenario.
    #[test]
    fn smoke_test_emits_five_numbered_records() {
        let mut config = ModelConfig::from_preset(ConfigPreset::Default);
        config.simulation.periods = 5;
        config.simulation.seed = 42;
        config.firms.sample_size = 10;
        config.households.count = 20;
        config.banks.count = 2;

        let mut sim = Simulation::new(config);
        let result = run_numbered(&mut sim, 5);

        assert_eq!(result.records.len(), 5);
        for (i, record) in result.records.iter().enumerate() {
            assert_eq!(record.period, i as u64 + 1);
            assert!(record.gdp >= 0.0);
            assert!(record.policy_rate >= 0.001);
        }
    }

    #[test]
    fn same_seed_produces_identical_trajectories() {
        let mut config = ModelConfig::from_preset(ConfigPreset::SmallEconomy);
        config.simulation.seed = 7;

        let mut sim_a = Simulation::new(config.clone());
        let mut sim_b = Simulation::new(config);

        let result_a = run_numbered(&mut sim_a, 10);
        let result_b = run_numbered(&mut sim_b, 10);

        for (a, b) in result_a.records.iter().zip(result_b.records.iter()) {
            assert_eq!(a.period, b.period);
            assert!((a.gdp - b.gdp).abs() < 1e-9);
            assert!((a.inflation - b.inflation).abs() < 1e-9);
            assert!((a.unemployment_rate - b.unemployment_rate).abs() < 1e-9);
            assert!((a.policy_rate - b.policy_rate).abs() < 1e-9);
        }
    }

    #[test]
    fn policy_rate_never_drops_below_lower_bound() {
        let mut config = ModelConfig::from_preset(ConfigPreset::SmallEconomy);
        config.simulation.periods = 15;
        let mut sim = Simulation::new(config.clone());
        let result = run_numbered(&mut sim, 15);
        for record in result.records {
            assert!(record.policy_rate >= config.taylor_rule.lower_bound);
        }
    }

    #[test]
    fn bankruptcy_count_is_monotone_non_decreasing() {
        let config = ModelConfig::from_preset(ConfigPreset::CrisisStress);
        let mut sim = Simulation::new(config);
        let result = run_numbered(&mut sim, 20);
        let mut previous = 0;
        for record in result.records {
            assert!(record.bankruptcies_count >= previous);
            previous = record.bankruptcies_count;
        }
    }
}
