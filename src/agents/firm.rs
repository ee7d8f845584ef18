//! Firm agent: production, pricing and employment decisions.

use crate::config::FirmBehaviorConfig;
use serde::Serialize;

const EPS: f64 = 1e-9;

/// A firm agent with a Companies-House-style balance sheet.
#[derive(Debug, Clone)]
pub struct Firm {
    pub sector: String,
    pub employees: u32,
    pub wage_bill: f64,
    pub turnover: f64,
    pub price: f64,
    pub output: f64,
    pub inventory: f64,
    pub cash: f64,
    pub debt: f64,
    pub capital: f64,
    pub equity: f64,
    pub profit: f64,
    pub markup: f64,
    pub vacancies: u32,
    pub wage_rate: f64,
    pub desired_production: f64,
    pub bankrupt: bool,

    /// Rolling window of `profit / turnover`, used by the satisficing
    /// markup heuristic (Simon 1955).
    profit_rate_history: Vec<f64>,

    behavior: FirmBehaviorConfig,
}

/// Point-in-time snapshot of a firm's state for reporting/serialization.
#[derive(Debug, Clone, Serialize)]
pub struct FirmState {
    pub sector: String,
    pub employees: u32,
    pub wage_bill: f64,
    pub turnover: f64,
    pub price: f64,
    pub output: f64,
    pub inventory: f64,
    pub cash: f64,
    pub debt: f64,
    pub capital: f64,
    pub equity: f64,
    pub profit: f64,
    pub markup: f64,
    pub aspiration_rate: f64,
    pub bankrupt: bool,
}

impl Firm {
    /// Create a new firm from an initial balance sheet.
    pub fn new(
        sector: impl Into<String>,
        employees: u32,
        wage_bill: f64,
        turnover: f64,
        capital: f64,
        cash: f64,
        debt: f64,
        equity: f64,
        behavior: FirmBehaviorConfig,
    ) -> Self {
        let wage_rate = if employees > 0 {
            wage_bill / employees as f64
        } else {
            0.0
        };
        Self {
            sector: sector.into(),
            employees,
            wage_bill,
            turnover,
            price: 1.0,
            output: turnover,
            inventory: 0.0,
            cash,
            debt,
            capital,
            equity,
            profit: 0.0,
            markup: behavior.price_markup,
            vacancies: 0,
            wage_rate,
            desired_production: turnover,
            bankrupt: false,
            profit_rate_history: Vec::new(),
            behavior,
        }
    }

    /// Run one period of firm behaviour: plan production, set price,
    /// determine labour demand, produce, then settle financials.
    ///
    /// A no-op once [`Firm::bankrupt`] is set; bankruptcy is absorbing.
    pub fn step(&mut self) {
        if self.bankrupt {
            return;
        }
        self.plan_production();
        self.set_price();
        self.determine_labour_demand();
        self.produce();
        self.update_financials();
    }

    fn plan_production(&mut self) {
        let expected_sales = self.turnover / self.price.max(EPS);
        let desired =
            expected_sales + self.behavior.inventory_target_ratio * expected_sales - self.inventory;
        self.desired_production = desired.max(0.0);
    }

    fn set_price(&mut self) {
        if self.output > 0.0 {
            let unit_cost = self.wage_bill / self.output.max(EPS);
            self.price = unit_cost * (1.0 + self.markup);
        }
    }

    fn determine_labour_demand(&mut self) {
        let labour_productivity = if self.employees > 0 {
            self.output / self.employees as f64
        } else {
            1.0
        };
        let desired_employees =
            (self.desired_production / labour_productivity.max(EPS)) as i64;
        let gap = desired_employees - self.employees as i64;
        self.vacancies = gap.max(0) as u32;
    }

    fn produce(&mut self) {
        let labour_productivity = if self.employees > 0 {
            self.output / self.employees.max(1) as f64
        } else {
            1.0
        };
        let capacity = self.capital * self.behavior.capacity_utilization_target;
        let labour_output = self.employees as f64 * labour_productivity;
        self.output = self
            .desired_production
            .min(labour_output)
            .min(capacity.max(0.0));
        self.inventory += self.output;
    }

    fn update_financials(&mut self) {
        let sales_quantity = self.inventory.min(self.turnover / self.price.max(EPS));
        let revenue = sales_quantity * self.price;
        self.inventory -= sales_quantity;
        self.turnover = revenue;
        self.wage_bill = self.employees as f64 * self.wage_rate;
        self.profit = revenue - self.wage_bill;
        self.cash += self.profit;
        self.equity += self.profit;

        if self.equity < 0.0 && self.capital > 0.0 {
            let ratio = self.equity / self.capital;
            if ratio < self.behavior.exit_threshold {
                self.bankrupt = true;
            }
        }
    }

    /// Adjust markup toward (or away from) market-clearing conditions.
    ///
    /// Implements the satisficing heuristic (Simon 1955): once the rolling
    /// average profit rate meets the firm's aspiration level the firm
    /// responds to excess demand at a tenth of its usual speed, conserving
    /// behavioural inertia instead of chasing every signal.
    ///
    /// `excess_demand` is positive when demand exceeds supply. When `rng`
    /// is `Some` and `markup_noise_std > 0`, Gaussian noise is layered on
    /// top of the adjustment (bounded-rationality noise, Gabaix 2014).
    pub fn adapt_markup(&mut self, excess_demand: f64, rng: Option<&mut rand::rngs::StdRng>) {
        let speed = self.behavior.markup_adjustment_speed;
        let aspiration = self.behavior.satisficing_aspiration_rate;
        let window = self.behavior.satisficing_window;
        let noise_std = self.behavior.markup_noise_std;

        let profit_rate = self.profit / self.turnover.abs().max(EPS);
        self.profit_rate_history.push(profit_rate);
        if self.profit_rate_history.len() > window {
            self.profit_rate_history.remove(0);
        }

        let avg_profit_rate: f64 =
            self.profit_rate_history.iter().sum::<f64>() / self.profit_rate_history.len() as f64;

        let mut adjustment = if self.profit_rate_history.len() >= 2 && avg_profit_rate >= aspiration
        {
            speed * excess_demand * 0.1
        } else {
            speed * excess_demand
        };

        if let (Some(rng), true) = (rng, noise_std > 0.0) {
            use rand_distr::{Distribution, Normal};
            if let Ok(normal) = Normal::new(0.0, noise_std) {
                adjustment += normal.sample(rng);
            }
        }

        if adjustment > 0.0 || self.markup > 0.01 {
            self.markup = (self.markup + adjustment).max(0.01);
        }
    }

    /// Hire `count` workers at `wage`, reducing open vacancies.
    pub fn hire(&mut self, count: u32, wage: f64) {
        self.employees += count;
        self.wage_rate = wage;
        self.wage_bill = self.employees as f64 * self.wage_rate;
        self.vacancies = self.vacancies.saturating_sub(count);
    }

    /// Lay off `count` workers.
    pub fn fire(&mut self, count: u32) {
        self.employees = self.employees.saturating_sub(count);
        self.wage_bill = self.employees as f64 * self.wage_rate;
    }

    /// Rolling average profit rate used as the satisficing aspiration signal.
    pub fn aspiration_rate(&self) -> f64 {
        if self.profit_rate_history.is_empty() {
            self.behavior.satisficing_aspiration_rate
        } else {
            self.profit_rate_history.iter().sum::<f64>() / self.profit_rate_history.len() as f64
        }
    }

    pub fn state(&self) -> FirmState {
        FirmState {
            sector: self.sector.clone(),
            employees: self.employees,
            wage_bill: self.wage_bill,
            turnover: self.turnover,
            price: self.price,
            output: self.output,
            inventory: self.inventory,
            cash: self.cash,
            debt: self.debt,
            capital: self.capital,
            equity: self.equity,
            profit: self.profit,
            markup: self.markup,
            aspiration_rate: self.aspiration_rate(),
            bankrupt: self.bankrupt,
        }
    }
}
