//! Configuration record for the economic simulation.
//!
//! [`ModelConfig`] is the single immutable bundle of numeric parameters
//! every other component is built from. It is treated as read-only for the
//! duration of a run: components borrow only the sub-record they need
//! (explicit, not ambient) and nothing in the core mutates it.

use crate::error::{Result, SimulationError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Top-level simulation settings (spec §6.1 `simulation`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub periods: usize,
    pub seed: u64,
    pub warm_up_periods: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            periods: 400,
            seed: 42,
            warm_up_periods: 40,
        }
    }
}

/// Firm population parameters (spec §6.1 `firms`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FirmConfig {
    pub sample_size: usize,
    pub sectors: Vec<String>,
    pub entry_rate: f64,
    pub exit_threshold: f64,
}

impl Default for FirmConfig {
    fn default() -> Self {
        Self {
            sample_size: 50,
            sectors: DEFAULT_SECTORS.iter().map(|s| s.to_string()).collect(),
            entry_rate: 0.02,
            exit_threshold: -0.5,
        }
    }
}

/// The 13 default UK sector labels (ONS Blue Book grouping).
pub const DEFAULT_SECTORS: [&str; 13] = [
    "agriculture",
    "manufacturing",
    "construction",
    "wholesale_retail",
    "transport",
    "hospitality",
    "information_communication",
    "financial",
    "professional_services",
    "public_admin",
    "education",
    "health",
    "other_services",
];

/// Behavioral parameters for firms (spec §6.1 `firm_behavior`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FirmBehaviorConfig {
    pub price_markup: f64,
    pub markup_adjustment_speed: f64,
    pub inventory_target_ratio: f64,
    pub capacity_utilization_target: f64,
    pub investment_sensitivity: f64,
    pub wage_adjustment_speed: f64,
    /// Bounded rationality: satisficing markup heuristic (Simon 1955).
    pub satisficing_aspiration_rate: f64,
    pub satisficing_window: usize,
    pub markup_noise_std: f64,
    /// Equity/capital ratio below which a firm is declared bankrupt.
    /// Mirrors `FirmConfig::exit_threshold`; copied in at population-build
    /// time so `Firm` itself never needs to borrow the outer `ModelConfig`.
    pub exit_threshold: f64,
}

impl Default for FirmBehaviorConfig {
    fn default() -> Self {
        Self {
            price_markup: 0.15,
            markup_adjustment_speed: 0.1,
            inventory_target_ratio: 0.2,
            capacity_utilization_target: 0.85,
            investment_sensitivity: 2.0,
            wage_adjustment_speed: 0.05,
            satisficing_aspiration_rate: 0.5,
            satisficing_window: 4,
            markup_noise_std: 0.0,
            exit_threshold: -0.5,
        }
    }
}

/// Household population parameters (spec §6.1 `households`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseholdConfig {
    pub count: usize,
    pub income_mean: f64,
    pub income_std: f64,
    pub wealth_shape: f64,
    pub mpc_mean: f64,
    pub mpc_std: f64,
}

impl Default for HouseholdConfig {
    fn default() -> Self {
        Self {
            count: 200,
            income_mean: 35_000.0,
            income_std: 15_000.0,
            wealth_shape: 1.5,
            mpc_mean: 0.8,
            mpc_std: 0.1,
        }
    }
}

/// Behavioral parameters for households (spec §6.1 `household_behavior`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseholdBehaviorConfig {
    pub job_search_intensity: f64,
    pub reservation_wage_ratio: f64,
    pub consumption_smoothing: f64,
    /// Bounded rationality: adaptive income expectations (Dosi et al. 2010).
    pub expectation_adaptation_speed: f64,
}

impl Default for HouseholdBehaviorConfig {
    fn default() -> Self {
        Self {
            job_search_intensity: 0.3,
            reservation_wage_ratio: 0.9,
            consumption_smoothing: 0.7,
            expectation_adaptation_speed: 0.3,
        }
    }
}

/// Bank population parameters (spec §6.1 `banks`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BankConfig {
    pub count: usize,
    pub capital_requirement: f64,
    pub reserve_requirement: f64,
    pub risk_weight: f64,
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            count: 5,
            capital_requirement: 0.10,
            reserve_requirement: 0.01,
            risk_weight: 1.0,
        }
    }
}

/// Behavioral parameters for banks (spec §6.1 `bank_behavior`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BankBehaviorConfig {
    pub base_interest_markup: f64,
    pub risk_premium_sensitivity: f64,
    pub lending_threshold: f64,
    pub capital_buffer: f64,
    /// Bounded rationality: noisy composite credit scoring (Gabaix 2014).
    pub credit_score_noise_std: f64,
}

impl Default for BankBehaviorConfig {
    fn default() -> Self {
        Self {
            base_interest_markup: 0.02,
            risk_premium_sensitivity: 0.05,
            lending_threshold: 0.3,
            capital_buffer: 0.02,
            credit_score_noise_std: 0.0,
        }
    }
}

/// Central bank Taylor rule configuration (spec §6.1 `taylor_rule`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TaylorRuleConfig {
    pub active: bool,
    pub inflation_target: f64,
    pub inflation_coefficient: f64,
    pub output_gap_coefficient: f64,
    pub interest_rate_smoothing: f64,
    pub lower_bound: f64,
}

impl Default for TaylorRuleConfig {
    fn default() -> Self {
        Self {
            active: true,
            inflation_target: 0.02,
            inflation_coefficient: 1.5,
            output_gap_coefficient: 0.5,
            interest_rate_smoothing: 0.8,
            lower_bound: 0.001,
        }
    }
}

/// Government fiscal rule configuration (spec §6.1 `fiscal_rule`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FiscalRuleConfig {
    pub active: bool,
    pub spending_gdp_ratio: f64,
    pub tax_rate_corporate: f64,
    pub tax_rate_income_base: f64,
    pub tax_progressivity: f64,
    pub deficit_target: f64,
    pub deficit_adjustment_speed: f64,
}

impl Default for FiscalRuleConfig {
    fn default() -> Self {
        Self {
            active: true,
            spending_gdp_ratio: 0.40,
            tax_rate_corporate: 0.19,
            tax_rate_income_base: 0.20,
            tax_progressivity: 0.1,
            deficit_target: 0.03,
            deficit_adjustment_speed: 0.1,
        }
    }
}

/// Transfer payment configuration (spec §6.1 `transfers`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TransfersConfig {
    pub unemployment_benefit_ratio: f64,
    pub pension_ratio: f64,
}

impl Default for TransfersConfig {
    fn default() -> Self {
        Self {
            unemployment_benefit_ratio: 0.4,
            pension_ratio: 0.3,
        }
    }
}

/// Goods market configuration (spec §6.1 `goods_market`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GoodsMarketConfig {
    pub price_adjustment_speed: f64,
    pub quantity_adjustment_speed: f64,
    pub search_intensity: f64,
}

impl Default for GoodsMarketConfig {
    fn default() -> Self {
        Self {
            price_adjustment_speed: 0.1,
            quantity_adjustment_speed: 0.3,
            search_intensity: 0.5,
        }
    }
}

/// Labour market configuration (spec §6.1 `labor_market`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LaborMarketConfig {
    pub wage_stickiness: f64,
    pub matching_efficiency: f64,
    pub separation_rate: f64,
    pub phillips_curve_slope: f64,
}

impl Default for LaborMarketConfig {
    fn default() -> Self {
        Self {
            wage_stickiness: 0.8,
            matching_efficiency: 0.3,
            separation_rate: 0.05,
            phillips_curve_slope: -0.5,
        }
    }
}

/// Credit market configuration (spec §6.1 `credit_market`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CreditMarketConfig {
    pub rationing: bool,
    pub collateral_requirement: f64,
    pub default_rate_base: f64,
}

impl Default for CreditMarketConfig {
    fn default() -> Self {
        Self {
            rationing: true,
            collateral_requirement: 0.5,
            default_rate_base: 0.01,
        }
    }
}

/// The complete, immutable model configuration (spec §6.1).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ModelConfig {
    pub simulation: SimulationConfig,
    pub firms: FirmConfig,
    pub firm_behavior: FirmBehaviorConfig,
    pub households: HouseholdConfig,
    pub household_behavior: HouseholdBehaviorConfig,
    pub banks: BankConfig,
    pub bank_behavior: BankBehaviorConfig,
    pub taylor_rule: TaylorRuleConfig,
    pub fiscal_rule: FiscalRuleConfig,
    pub transfers: TransfersConfig,
    pub goods_market: GoodsMarketConfig,
    pub labor_market: LaborMarketConfig,
    pub credit_market: CreditMarketConfig,
}

/// Named preset configurations for common scenarios.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    Default,
    SmallEconomy,
    CrisisStress,
    LowRationing,
}

impl ConfigPreset {
    pub fn all() -> Vec<ConfigPreset> {
        vec![
            ConfigPreset::Default,
            ConfigPreset::SmallEconomy,
            ConfigPreset::CrisisStress,
            ConfigPreset::LowRationing,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigPreset::Default => "default",
            ConfigPreset::SmallEconomy => "small_economy",
            ConfigPreset::CrisisStress => "crisis_stress",
            ConfigPreset::LowRationing => "low_rationing",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ConfigPreset::Default => "Standard economy: 50 firms, 200 households, 5 banks",
            ConfigPreset::SmallEconomy => "Small economy for quick smoke tests",
            ConfigPreset::CrisisStress => "Tight exit threshold and thin capital buffers",
            ConfigPreset::LowRationing => "Credit rationing disabled; every application is funded",
        }
    }
}

impl FromStr for ConfigPreset {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "default" => Ok(ConfigPreset::Default),
            "small_economy" | "small" => Ok(ConfigPreset::SmallEconomy),
            "crisis_stress" | "crisis" => Ok(ConfigPreset::CrisisStress),
            "low_rationing" | "no_rationing" => Ok(ConfigPreset::LowRationing),
            _ => Err(format!("unknown preset: '{}'", s)),
        }
    }
}

impl ModelConfig {
    /// Build a configuration from a named preset.
    pub fn from_preset(preset: ConfigPreset) -> Self {
        let mut config = ModelConfig::default();
        match preset {
            ConfigPreset::Default => {}
            ConfigPreset::SmallEconomy => {
                config.simulation.periods = 20;
                config.simulation.warm_up_periods = 4;
                config.firms.sample_size = 10;
                config.households.count = 20;
                config.banks.count = 2;
            }
            ConfigPreset::CrisisStress => {
                config.firms.exit_threshold = -0.15;
                config.bank_behavior.capital_buffer = 0.005;
                config.bank_behavior.credit_score_noise_std = 0.1;
            }
            ConfigPreset::LowRationing => {
                config.credit_market.rationing = false;
            }
        }
        config
    }

    /// Validate every range constraint named in spec §6.1.
    ///
    /// Called at the configuration boundary, never inside the per-period
    /// step loop: an invalid parameter is a load-time error, not a runtime
    /// condition (spec §7).
    pub fn validate(&self) -> Result<()> {
        if self.simulation.periods == 0 {
            return Err(SimulationError::ValidationError(
                "simulation.periods must be >= 1".to_string(),
            ));
        }
        if self.firms.sample_size == 0 {
            return Err(SimulationError::ValidationError(
                "firms.sample_size must be >= 1".to_string(),
            ));
        }
        if self.firms.sectors.is_empty() {
            return Err(SimulationError::ValidationError(
                "firms.sectors must not be empty".to_string(),
            ));
        }
        if self.firms.exit_threshold >= 0.0 {
            return Err(SimulationError::ValidationError(format!(
                "firms.exit_threshold must be negative, got: {}",
                self.firms.exit_threshold
            )));
        }
        if self.firm_behavior.satisficing_window == 0 {
            return Err(SimulationError::ValidationError(
                "firm_behavior.satisficing_window must be >= 1".to_string(),
            ));
        }
        if self.firm_behavior.markup_noise_std < 0.0 {
            return Err(SimulationError::ValidationError(
                "firm_behavior.markup_noise_std must be >= 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.household_behavior.job_search_intensity) {
            return Err(SimulationError::ValidationError(format!(
                "household_behavior.job_search_intensity must be in [0,1], got: {}",
                self.household_behavior.job_search_intensity
            )));
        }
        if !(0.0..=1.0).contains(&self.household_behavior.consumption_smoothing) {
            return Err(SimulationError::ValidationError(
                "household_behavior.consumption_smoothing must be in [0,1]".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.household_behavior.expectation_adaptation_speed) {
            return Err(SimulationError::ValidationError(
                "household_behavior.expectation_adaptation_speed must be in [0,1]".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.banks.capital_requirement) {
            return Err(SimulationError::ValidationError(
                "banks.capital_requirement must be in [0,1]".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.banks.reserve_requirement) {
            return Err(SimulationError::ValidationError(
                "banks.reserve_requirement must be in [0,1]".to_string(),
            ));
        }
        if self.bank_behavior.credit_score_noise_std < 0.0 {
            return Err(SimulationError::ValidationError(
                "bank_behavior.credit_score_noise_std must be >= 0".to_string(),
            ));
        }
        if !(0.0..1.0).contains(&self.taylor_rule.interest_rate_smoothing) {
            return Err(SimulationError::ValidationError(format!(
                "taylor_rule.interest_rate_smoothing must be in [0,1), got: {}",
                self.taylor_rule.interest_rate_smoothing
            )));
        }
        if self.taylor_rule.lower_bound < 0.0 {
            return Err(SimulationError::ValidationError(
                "taylor_rule.lower_bound must be >= 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from a YAML or TOML file, auto-detected by extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(SimulationError::ConfigFileRead)?;

        let extension = path.extension().and_then(|s| s.to_str()).ok_or_else(|| {
            SimulationError::UnsupportedConfigFormat("(no extension)".to_string())
        })?;

        match extension.to_lowercase().as_str() {
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .map_err(|e| SimulationError::YamlParse(e.to_string())),
            "toml" => {
                toml::from_str(&contents).map_err(|e| SimulationError::TomlParse(e.to_string()))
            }
            other => Err(SimulationError::UnsupportedConfigFormat(other.to_string())),
        }
    }
}
