//! Government agent: taxation, transfers and the fiscal rule.

use crate::config::FiscalRuleConfig;

/// The singleton government.
#[derive(Debug, Clone)]
pub struct Government {
    pub revenue: f64,
    pub expenditure: f64,
    pub transfers: f64,
    pub deficit: f64,
    pub debt: f64,
    pub gdp_estimate: f64,

    config: FiscalRuleConfig,
    tax_rate_corporate: f64,
    tax_rate_income_base: f64,
    spending_gdp_ratio: f64,
    unemployment_benefit_ratio: f64,
}

impl Government {
    pub fn new(
        config: FiscalRuleConfig,
        tax_rate_corporate: f64,
        tax_rate_income_base: f64,
        spending_gdp_ratio: f64,
        unemployment_benefit_ratio: f64,
    ) -> Self {
        Self {
            revenue: 0.0,
            expenditure: 0.0,
            transfers: 0.0,
            deficit: 0.0,
            debt: 0.0,
            gdp_estimate: 0.0,
            config,
            tax_rate_corporate,
            tax_rate_income_base,
            spending_gdp_ratio,
            unemployment_benefit_ratio,
        }
    }

    /// Zero the flow accumulators for a new period.
    pub fn begin_period(&mut self) {
        self.revenue = 0.0;
        self.expenditure = 0.0;
        self.transfers = 0.0;
    }

    /// Returns the corporate tax owed on `profits` (zero when not in profit)
    /// and adds it to period revenue.
    pub fn collect_corporate_tax(&mut self, profits: f64) -> f64 {
        if profits <= 0.0 {
            return 0.0;
        }
        let tax = self.tax_rate_corporate * profits;
        self.revenue += tax;
        tax
    }

    /// Returns the income tax owed on `income` and adds it to period revenue.
    pub fn collect_income_tax(&mut self, income: f64) -> f64 {
        let tax = self.tax_rate_income_base * income.max(0.0);
        self.revenue += tax;
        tax
    }

    /// Returns the total unemployment-benefit pool and adds it to transfer
    /// spending. Division of the pool across households is the scheduler's
    /// job, not the government's.
    pub fn pay_unemployment_benefit(&mut self, avg_wage: f64, n_unemployed: usize) -> f64 {
        let total = self.unemployment_benefit_ratio * avg_wage * n_unemployed as f64;
        self.transfers += total;
        total
    }

    /// Planned expenditure as a share of the current GDP estimate.
    pub fn calculate_spending(&mut self) -> f64 {
        self.expenditure = self.spending_gdp_ratio * self.gdp_estimate.max(0.0);
        self.expenditure
    }

    /// Apply the fiscal rule: trim expenditure when the deficit-to-GDP ratio
    /// exceeds the target, never letting expenditure go negative.
    pub fn step(&mut self) {
        if !self.config.active || self.gdp_estimate <= 0.0 {
            return;
        }
        let provisional_deficit = self.expenditure + self.transfers - self.revenue;
        let deficit_ratio = provisional_deficit.abs() / self.gdp_estimate;
        if deficit_ratio > self.config.deficit_target {
            let gap = deficit_ratio - self.config.deficit_target;
            let cut = self.config.deficit_adjustment_speed * gap * self.gdp_estimate;
            self.expenditure = (self.expenditure - cut).max(0.0);
        }
    }

    /// Settle the period's flows into the debt stock: a surplus reduces
    /// debt, a deficit increases it.
    pub fn end_period(&mut self) {
        self.deficit = self.revenue - (self.expenditure + self.transfers);
        self.debt -= self.deficit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn government() -> Government {
        Government::new(FiscalRuleConfig::default(), 0.19, 0.20, 0.40, 0.4)
    }

    #[test]
    fn no_corporate_tax_on_losses() {
        let mut gov = government();
        assert_eq!(gov.collect_corporate_tax(-500.0), 0.0);
        assert_eq!(gov.revenue, 0.0);
    }

    #[test]
    fn corporate_tax_adds_to_revenue() {
        let mut gov = government();
        let tax = gov.collect_corporate_tax(1000.0);
        assert_eq!(tax, 190.0);
        assert_eq!(gov.revenue, 190.0);
    }

    #[test]
    fn surplus_reduces_debt() {
        let mut gov = government();
        gov.revenue = 1000.0;
        gov.expenditure = 200.0;
        gov.transfers = 100.0;
        gov.debt = 500.0;
        gov.end_period();
        assert_eq!(gov.deficit, 700.0);
        assert_eq!(gov.debt, -200.0);
    }

    #[test]
    fn deficit_increases_debt() {
        let mut gov = government();
        gov.revenue = 100.0;
        gov.expenditure = 300.0;
        gov.transfers = 50.0;
        gov.debt = 0.0;
        gov.end_period();
        assert_eq!(gov.deficit, -250.0);
        assert_eq!(gov.debt, 250.0);
    }

    #[test]
    fn fiscal_rule_never_drives_expenditure_negative() {
        let mut gov = government();
        gov.gdp_estimate = 1000.0;
        gov.expenditure = 10.0;
        gov.transfers = 5000.0;
        gov.revenue = 0.0;
        gov.step();
        assert!(gov.expenditure >= 0.0);
    }

    #[test]
    fn begin_period_zeroes_flows() {
        let mut gov = government();
        gov.revenue = 10.0;
        gov.expenditure = 20.0;
        gov.transfers = 30.0;
        gov.begin_period();
        assert_eq!(gov.revenue, 0.0);
        assert_eq!(gov.expenditure, 0.0);
        assert_eq!(gov.transfers, 0.0);
    }
}
