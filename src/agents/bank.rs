//! Bank agent: lending, deposit-taking and capital management.

use crate::config::{BankBehaviorConfig, BankConfig};
use serde::Serialize;

const EPS: f64 = 1e-9;

/// A bank agent.
#[derive(Debug, Clone)]
pub struct Bank {
    pub capital: f64,
    pub reserves: f64,
    pub loans: f64,
    pub deposits: f64,
    pub non_performing_loans: f64,
    pub lending_rate: f64,
    pub profit: f64,

    config: BankConfig,
    behavior: BankBehaviorConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct BankState {
    pub capital: f64,
    pub reserves: f64,
    pub loans: f64,
    pub deposits: f64,
    pub non_performing_loans: f64,
    pub lending_rate: f64,
    pub profit: f64,
    pub capital_ratio: f64,
    pub reserve_ratio: f64,
    pub meets_capital_requirement: bool,
}

impl Bank {
    pub fn new(
        capital: f64,
        reserves: f64,
        deposits: f64,
        config: BankConfig,
        behavior: BankBehaviorConfig,
    ) -> Self {
        Self {
            capital,
            reserves,
            loans: 0.0,
            deposits,
            non_performing_loans: 0.0,
            lending_rate: behavior.base_interest_markup,
            profit: 0.0,
            config,
            behavior,
        }
    }

    /// Capital divided by risk-weighted loans. Re-derived on every read.
    pub fn capital_ratio(&self) -> f64 {
        let risk_weighted_loans = self.loans * self.config.risk_weight;
        if risk_weighted_loans <= EPS {
            // No loans outstanding: capital fully covers a zero exposure.
            f64::INFINITY
        } else {
            self.capital / risk_weighted_loans
        }
    }

    pub fn reserve_ratio(&self) -> f64 {
        if self.deposits <= EPS {
            0.0
        } else {
            self.reserves / self.deposits
        }
    }

    pub fn meets_capital_requirement(&self) -> bool {
        self.capital_ratio() >= self.config.capital_requirement + self.behavior.capital_buffer
    }

    /// Accrue interest income/expense and loan-loss provisions for the period.
    pub fn step(&mut self) {
        let interest_income = self.lending_rate * self.loans;
        let deposit_rate = (self.lending_rate - 0.02).max(0.0);
        let interest_expense = deposit_rate * self.deposits;
        let provision = 0.5 * self.non_performing_loans;
        self.profit = interest_income - interest_expense - provision;
        self.capital += self.profit;
    }

    /// Recompute the lending rate from the central bank's policy rate.
    pub fn set_policy_rate(&mut self, policy_rate: f64) {
        let npl_ratio = if self.loans > EPS {
            self.non_performing_loans / self.loans
        } else {
            0.0
        };
        self.lending_rate = policy_rate
            + self.behavior.base_interest_markup
            + self.behavior.risk_premium_sensitivity * npl_ratio;
    }

    /// Decide whether to approve a loan application.
    ///
    /// Rejects outright when the bank is below its capital requirement, or
    /// when the borrower reports non-positive revenue. Otherwise follows
    /// either the noisy composite-score path (Gabaix 2014, when `rng` is
    /// given and `credit_score_noise_std > 0`) or the deterministic
    /// hard-threshold path, which is the noiseless limit of the same score.
    pub fn evaluate_loan(
        &self,
        amount: f64,
        borrower_equity: f64,
        borrower_revenue: f64,
        rng: Option<&mut rand::rngs::StdRng>,
    ) -> bool {
        if !self.meets_capital_requirement() {
            return false;
        }
        if borrower_revenue <= 0.0 {
            return false;
        }

        let threshold = self.behavior.lending_threshold;
        let noise_std = self.behavior.credit_score_noise_std;

        if let (Some(rng), true) = (rng, noise_std > 0.0) {
            use rand_distr::{Distribution, Normal};
            let collateral_score = borrower_equity / (amount * 0.5).max(EPS);
            let coverage_score =
                (borrower_revenue / (amount * self.lending_rate).max(EPS)) / threshold;
            let composite = 0.5 * collateral_score + 0.5 * coverage_score;
            let noise = Normal::new(0.0, noise_std)
                .map(|n| n.sample(rng))
                .unwrap_or(0.0);
            composite + noise > 1.0
        } else {
            let collateral_ok = borrower_equity >= 0.5 * amount;
            let coverage_ok =
                borrower_revenue / (amount * self.lending_rate).max(EPS) >= threshold;
            collateral_ok && coverage_ok
        }
    }

    /// Extend a loan: loans and deposits both rise (loan creates a deposit).
    /// Returns the rate charged.
    pub fn extend_loan(&mut self, amount: f64) -> f64 {
        self.loans += amount;
        self.deposits += amount;
        self.lending_rate
    }

    pub fn record_default(&mut self, amount: f64) {
        self.non_performing_loans += amount;
    }

    pub fn record_repayment(&mut self, amount: f64) {
        self.loans = (self.loans - amount).max(0.0);
    }

    pub fn state(&self) -> BankState {
        BankState {
            capital: self.capital,
            reserves: self.reserves,
            loans: self.loans,
            deposits: self.deposits,
            non_performing_loans: self.non_performing_loans,
            lending_rate: self.lending_rate,
            profit: self.profit,
            capital_ratio: self.capital_ratio(),
            reserve_ratio: self.reserve_ratio(),
            meets_capital_requirement: self.meets_capital_requirement(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bank(capital: f64, loans: f64) -> Bank {
        let config = BankConfig::default();
        let behavior = BankBehaviorConfig {
            lending_threshold: 0.3,
            credit_score_noise_std: 0.0,
            ..BankBehaviorConfig::default()
        };
        let mut b = Bank::new(capital, 0.0, 0.0, config, behavior);
        b.loans = loans;
        b.lending_rate = 0.05;
        b
    }

    // S5: hard-threshold scenario from the design document.
    #[test]
    fn evaluate_loan_rejects_on_collateral_shortfall() {
        let b = bank(1_000_000.0, 0.0);
        assert!(!b.evaluate_loan(100.0, 49.0, 10_000.0, None));
    }

    #[test]
    fn evaluate_loan_rejects_on_coverage_shortfall() {
        let b = bank(1_000_000.0, 0.0);
        assert!(!b.evaluate_loan(100.0, 51.0, 1.0, None));
    }

    #[test]
    fn evaluate_loan_approves_when_both_thresholds_clear() {
        let b = bank(1_000_000.0, 0.0);
        assert!(b.evaluate_loan(100.0, 60.0, 1000.0, None));
    }

    #[test]
    fn evaluate_loan_rejects_below_capital_requirement() {
        let mut b = bank(1.0, 1_000_000.0);
        b.capital = 1.0;
        assert!(!b.evaluate_loan(100.0, 1000.0, 1000.0, None));
    }

    #[test]
    fn extend_loan_increases_loans_and_deposits_equally() {
        let mut b = bank(1_000_000.0, 0.0);
        let before_deposits = b.deposits;
        b.extend_loan(500.0);
        assert_eq!(b.loans, 500.0);
        assert_eq!(b.deposits, before_deposits + 500.0);
    }

    #[test]
    fn record_repayment_never_drives_loans_negative() {
        let mut b = bank(1_000_000.0, 100.0);
        b.record_repayment(1_000.0);
        assert_eq!(b.loans, 0.0);
    }

    #[test]
    fn zero_loans_gives_infinite_capital_ratio() {
        let b = bank(1_000.0, 0.0);
        assert!(b.capital_ratio().is_infinite());
    }
}
