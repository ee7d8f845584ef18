//! Central bank agent: Taylor-rule monetary policy.

use crate::config::TaylorRuleConfig;

/// The singleton central bank.
#[derive(Debug, Clone)]
pub struct CentralBank {
    pub policy_rate: f64,
    pub observed_inflation: f64,
    pub output_gap: f64,
    previous_rate: f64,
    config: TaylorRuleConfig,
}

impl CentralBank {
    pub fn new(initial_rate: f64, config: TaylorRuleConfig) -> Self {
        Self {
            policy_rate: initial_rate,
            observed_inflation: 0.0,
            output_gap: 0.0,
            previous_rate: initial_rate,
            config,
        }
    }

    /// Apply the Taylor rule with interest-rate smoothing:
    ///
    /// `target = inflation_target + κ_π (π_obs − inflation_target) + κ_y · y_gap`
    /// `smoothed = ρ · previous + (1 − ρ) · target`
    /// `rate = max(smoothed, lower_bound)`
    ///
    /// A no-op leaving `policy_rate` unchanged when the rule is inactive.
    pub fn step(&mut self) {
        if !self.config.active {
            return;
        }
        let target = self.config.inflation_target
            + self.config.inflation_coefficient * (self.observed_inflation - self.config.inflation_target)
            + self.config.output_gap_coefficient * self.output_gap;
        let smoothed = self.config.interest_rate_smoothing * self.previous_rate
            + (1.0 - self.config.interest_rate_smoothing) * target;
        self.policy_rate = smoothed.max(self.config.lower_bound);
        self.previous_rate = self.policy_rate;
    }

    /// Push observed inflation and output gap in ahead of the next `step`.
    pub fn update_observations(&mut self, inflation: f64, output_gap: f64) {
        self.observed_inflation = inflation;
        self.output_gap = output_gap;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // S4: Taylor rule response scenario from the design document.
    #[test]
    fn taylor_rule_matches_worked_example() {
        let config = TaylorRuleConfig {
            active: true,
            inflation_target: 0.02,
            inflation_coefficient: 1.5,
            output_gap_coefficient: 0.5,
            interest_rate_smoothing: 0.8,
            lower_bound: 0.001,
        };
        let mut cb = CentralBank::new(0.02, config);
        cb.update_observations(0.05, 0.0);
        cb.step();
        assert!((cb.policy_rate - 0.029).abs() < 1e-9);
    }

    #[test]
    fn rate_never_drops_below_lower_bound() {
        let config = TaylorRuleConfig {
            active: true,
            inflation_target: 0.02,
            inflation_coefficient: 1.5,
            output_gap_coefficient: 0.5,
            interest_rate_smoothing: 0.0,
            lower_bound: 0.001,
        };
        let mut cb = CentralBank::new(0.02, config);
        cb.update_observations(-1.0, -1.0);
        cb.step();
        assert!(cb.policy_rate >= 0.001);
    }

    #[test]
    fn inactive_rule_leaves_rate_unchanged() {
        let config = TaylorRuleConfig {
            active: false,
            ..TaylorRuleConfig::default()
        };
        let mut cb = CentralBank::new(0.03, config);
        cb.update_observations(0.10, 0.5);
        cb.step();
        assert_eq!(cb.policy_rate, 0.03);
    }
}
