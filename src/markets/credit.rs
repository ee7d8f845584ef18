//! Credit market: prior-period default loss-sharing and round-robin lending.

use crate::agents::{Bank, Firm};
use crate::config::CreditMarketConfig;
use rand::rngs::StdRng;

/// Per-period clearing statistics for the credit market.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreditMarketStats {
    pub total_lending: f64,
    pub approvals: usize,
    pub rejections: usize,
    pub defaults: usize,
    pub average_approved_rate: f64,
}

/// Clears new loan applications and distributes prior-period defaults.
#[derive(Debug, Clone)]
pub struct CreditMarket {
    config: CreditMarketConfig,
}

impl CreditMarket {
    pub fn new(config: CreditMarketConfig) -> Self {
        Self { config }
    }

    /// Clear the credit market for one period.
    ///
    /// First distributes any bankrupt firm's outstanding debt pro rata
    /// across banks holding loans, then routes new applications
    /// round-robin by firm order. Routing is round-robin, not
    /// price-based, to avoid a circular dependency with the rate-setting
    /// step that already ran this period.
    pub fn clear(
        &self,
        firms: &mut [Firm],
        banks: &mut [Bank],
        mut rng: Option<&mut StdRng>,
    ) -> CreditMarketStats {
        let mut stats = CreditMarketStats::default();
        self.process_defaults(firms, banks, &mut stats);
        self.process_applications(firms, banks, rng.as_deref_mut(), &mut stats);
        stats
    }

    fn process_defaults(&self, firms: &mut [Firm], banks: &mut [Bank], stats: &mut CreditMarketStats) {
        let total_loans: f64 = banks.iter().map(|b| b.loans).sum();
        if total_loans <= 0.0 {
            return;
        }

        for firm in firms.iter().filter(|f| f.bankrupt && f.debt > 0.0) {
            stats.defaults += 1;
            for bank in banks.iter_mut().filter(|b| b.loans > 0.0) {
                let share = bank.loans / total_loans;
                bank.record_default(share * firm.debt * self.config.default_rate_base);
            }
        }
    }

    fn process_applications(
        &self,
        firms: &mut [Firm],
        banks: &mut [Bank],
        mut rng: Option<&mut StdRng>,
        stats: &mut CreditMarketStats,
    ) {
        if banks.is_empty() {
            return;
        }

        let mut bank_cursor = 0usize;
        let mut approved_rate_sum = 0.0;

        for firm in firms.iter_mut().filter(|f| !f.bankrupt && f.cash < 0.0) {
            let amount = -firm.cash;
            let bank_idx = bank_cursor % banks.len();
            bank_cursor += 1;

            let approved = !self.config.rationing
                || banks[bank_idx].evaluate_loan(amount, firm.equity, firm.turnover, rng.as_deref_mut());

            if approved {
                let rate = banks[bank_idx].extend_loan(amount);
                firm.cash += amount;
                firm.debt += amount;
                stats.approvals += 1;
                stats.total_lending += amount;
                approved_rate_sum += rate;
            } else {
                stats.rejections += 1;
            }
        }

        if stats.approvals > 0 {
            stats.average_approved_rate = approved_rate_sum / stats.approvals as f64;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BankBehaviorConfig, BankConfig, FirmBehaviorConfig};

    fn solvent_bank() -> Bank {
        let mut b = Bank::new(1_000_000.0, 0.0, 0.0, BankConfig::default(), BankBehaviorConfig::default());
        b.lending_rate = 0.05;
        b
    }

    fn needy_firm() -> Firm {
        let mut f = Firm::new(
            "other_services",
            1,
            0.0,
            0.0,
            1000.0,
            -100.0,
            0.0,
            1000.0,
            FirmBehaviorConfig::default(),
        );
        f.equity = 1000.0;
        f.turnover = 10_000.0;
        f
    }

    #[test]
    fn approved_loan_zeroes_out_negative_cash() {
        let mut firms = vec![needy_firm()];
        let mut banks = vec![solvent_bank()];
        let market = CreditMarket::new(CreditMarketConfig {
            rationing: false,
            ..CreditMarketConfig::default()
        });
        market.clear(&mut firms, &mut banks, None);
        assert!(firms[0].cash >= -1e-9);
        assert!(firms[0].debt > 0.0);
    }

    #[test]
    fn no_banks_leaves_applications_unprocessed() {
        let mut firms = vec![needy_firm()];
        let mut banks: Vec<Bank> = vec![];
        let market = CreditMarket::new(CreditMarketConfig::default());
        let stats = market.clear(&mut firms, &mut banks, None);
        assert_eq!(stats.approvals, 0);
        assert_eq!(stats.rejections, 0);
    }

    #[test]
    fn defaults_spread_pro_rata_across_lending_banks() {
        let mut firms = vec![needy_firm()];
        firms[0].bankrupt = true;
        firms[0].debt = 1000.0;

        let mut b1 = solvent_bank();
        b1.loans = 500.0;
        let mut b2 = solvent_bank();
        b2.loans = 500.0;
        let mut banks = vec![b1, b2];

        let market = CreditMarket::new(CreditMarketConfig::default());
        let stats = market.clear(&mut firms, &mut banks, None);

        assert_eq!(stats.defaults, 1);
        assert!(banks[0].non_performing_loans > 0.0);
        assert!(banks[1].non_performing_loans > 0.0);
    }
}
