//! Household agent: labour supply, consumption and saving.

use crate::agents::FirmId;
use crate::config::HouseholdBehaviorConfig;
use rand::Rng;
use serde::Serialize;

/// A household agent.
#[derive(Debug, Clone)]
pub struct Household {
    pub income: f64,
    pub wealth: f64,
    pub mpc: f64,
    pub employed: bool,
    pub employer_id: Option<FirmId>,
    pub wage: f64,
    pub consumption: f64,
    pub savings: f64,
    pub transfer_income: f64,

    /// Adaptive expectation of income (spec: α-weighted exponential average).
    pub expected_income: f64,

    behavior: HouseholdBehaviorConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct HouseholdState {
    pub income: f64,
    pub wealth: f64,
    pub consumption: f64,
    pub savings: f64,
    pub employed: bool,
    pub employer_id: Option<usize>,
    pub wage: f64,
    pub mpc: f64,
    pub expected_income: f64,
}

impl Household {
    pub fn new(income: f64, wealth: f64, mpc: f64, behavior: HouseholdBehaviorConfig) -> Self {
        Self {
            income,
            wealth,
            mpc,
            employed: false,
            employer_id: None,
            wage: 0.0,
            consumption: 0.0,
            savings: 0.0,
            transfer_income: 0.0,
            expected_income: income,
            behavior,
        }
    }

    /// Receive income, adapt expectations, consume, then save the rest.
    pub fn step(&mut self) {
        self.receive_income();
        self.update_expected_income();
        self.consume();
        self.save();
    }

    fn receive_income(&mut self) {
        let wage_income = if self.employed { self.wage } else { 0.0 };
        self.income = wage_income + self.transfer_income;
    }

    /// `expected := alpha * realised + (1 - alpha) * expected`.
    fn update_expected_income(&mut self) {
        let alpha = self.behavior.expectation_adaptation_speed;
        self.expected_income = alpha * self.income + (1.0 - alpha) * self.expected_income;
    }

    fn consume(&mut self) {
        let smoothing = self.behavior.consumption_smoothing;
        let c_income = self.mpc * self.expected_income;
        let c_wealth = (1.0 - smoothing) * 0.04 * self.wealth;
        let desired = c_income + c_wealth;
        self.consumption = desired.clamp(0.0, self.income + self.wealth);
    }

    fn save(&mut self) {
        self.savings = self.income - self.consumption;
        self.wealth += self.savings;
    }

    pub fn become_employed(&mut self, employer_id: FirmId, wage: f64) {
        self.employed = true;
        self.employer_id = Some(employer_id);
        self.wage = wage;
    }

    pub fn become_unemployed(&mut self) {
        self.employed = false;
        self.employer_id = None;
        self.wage = 0.0;
    }

    /// Whether the household looks for a job this period.
    ///
    /// Always `false` while employed. When `rng` is absent the household is
    /// treated as actively searching (deterministic default, matching the
    /// reference model's behaviour with no RNG configured).
    pub fn is_searching(&self, rng: Option<&mut rand::rngs::StdRng>) -> bool {
        if self.employed {
            return false;
        }
        match rng {
            Some(rng) => rng.random::<f64>() < self.behavior.job_search_intensity,
            None => true,
        }
    }

    pub fn state(&self) -> HouseholdState {
        HouseholdState {
            income: self.income,
            wealth: self.wealth,
            consumption: self.consumption,
            savings: self.savings,
            employed: self.employed,
            employer_id: self.employer_id.map(|id| id.0),
            wage: self.wage,
            mpc: self.mpc,
            expected_income: self.expected_income,
        }
    }
}
