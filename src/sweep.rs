//! Parameter sweep engine: Cartesian-product grid search over simulations.
//!
//! Simulations are pure functions of `(config, seed)` and communicate
//! nothing between combinations, making the sweep the one parallel seam in
//! the core (see the concurrency model). Combinations run on a `rayon`
//! worker pool; a factory failure for one combination is logged and does
//! not abort the others.

use crate::config::ModelConfig;
use crate::evaluator::{evaluate_simulation, EvaluationReport, TargetStat};
use crate::scheduler::{run_numbered, Simulation};
use colored::Colorize;
use log::warn;
use rayon::prelude::*;
use std::fs::File;
use std::io::Write;

/// An ordered parameter grid: each entry is `(name, candidate values)`.
/// The Cartesian product iterates in the insertion order of this vector,
/// not alphabetical order, matching the contract.
#[derive(Debug, Clone, Default)]
pub struct ParameterGrid {
    entries: Vec<(String, Vec<f64>)>,
}

impl ParameterGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.entries.push((name.into(), values));
        self
    }

    /// Enumerate the Cartesian product of all value lists, each tuple as an
    /// ordered list of `(name, value)` pairs in grid insertion order.
    pub fn combinations(&self) -> Vec<Vec<(String, f64)>> {
        let mut result: Vec<Vec<(String, f64)>> = vec![Vec::new()];
        for (name, values) in &self.entries {
            let mut next = Vec::with_capacity(result.len() * values.len());
            for partial in &result {
                for &value in values {
                    let mut combo = partial.clone();
                    combo.push((name.clone(), value));
                    next.push(combo);
                }
            }
            result = next;
        }
        result
    }

    /// Total number of combinations the Cartesian product will produce
    /// (1 for an empty grid, matching [`ParameterGrid::combinations`]).
    pub fn len(&self) -> usize {
        self.entries.iter().map(|(_, v)| v.len()).product()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The outcome of running one parameter combination through the grid.
pub struct SweepCombinationResult {
    pub params: Vec<(String, f64)>,
    pub report: Option<EvaluationReport>,
    pub error: Option<String>,
}

/// Complete results from a sweep over a [`ParameterGrid`].
pub struct SweepResult {
    pub combinations: Vec<SweepCombinationResult>,
}

impl SweepResult {
    /// The combination with the lowest (best) overall score, if any succeeded.
    pub fn best(&self) -> Option<&SweepCombinationResult> {
        self.combinations
            .iter()
            .filter(|c| c.report.is_some())
            .min_by(|a, b| {
                a.report
                    .as_ref()
                    .unwrap()
                    .overall_score()
                    .partial_cmp(&b.report.as_ref().unwrap().overall_score())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// The combination with the highest (worst) overall score, if any succeeded.
    pub fn worst(&self) -> Option<&SweepCombinationResult> {
        self.combinations
            .iter()
            .filter(|c| c.report.is_some())
            .max_by(|a, b| {
                a.report
                    .as_ref()
                    .unwrap()
                    .overall_score()
                    .partial_cmp(&b.report.as_ref().unwrap().overall_score())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }

    /// A stable ranking of successful combinations from best to worst score.
    pub fn ranking(&self) -> Vec<&SweepCombinationResult> {
        let mut ranked: Vec<&SweepCombinationResult> =
            self.combinations.iter().filter(|c| c.report.is_some()).collect();
        ranked.sort_by(|a, b| {
            a.report
                .as_ref()
                .unwrap()
                .overall_score()
                .partial_cmp(&b.report.as_ref().unwrap().overall_score())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }

    pub fn n_succeeded(&self) -> usize {
        self.combinations.iter().filter(|c| c.report.is_some()).count()
    }

    pub fn n_failed(&self) -> usize {
        self.combinations.iter().filter(|c| c.error.is_some()).count()
    }

    pub fn save_summary_to_file(&self, path: &str) -> crate::error::Result<()> {
        let mut lines = Vec::new();
        for combo in &self.combinations {
            let params_str = combo
                .params
                .iter()
                .map(|(k, v)| format!("{}={:.6}", k, v))
                .collect::<Vec<_>>()
                .join(",");
            match &combo.report {
                Some(report) => lines.push(format!("{}\tscore={:.6}", params_str, report.overall_score())),
                None => lines.push(format!(
                    "{}\tFAILED: {}",
                    params_str,
                    combo.error.as_deref().unwrap_or("unknown error")
                )),
            }
        }
        let mut file = File::create(path)?;
        file.write_all(lines.join("\n").as_bytes())?;
        Ok(())
    }

    pub fn print_summary(&self) {
        println!("\n{}", "=== Parameter Sweep Results ===".bright_cyan().bold());
        println!("Combinations: {}", self.combinations.len());
        println!(
            "Succeeded: {}  Failed: {}\n",
            self.n_succeeded().to_string().green(),
            self.n_failed().to_string().red()
        );

        if let Some(best) = self.best() {
            println!(
                "{} score={:.4} params={:?}",
                "Best:".bright_green(),
                best.report.as_ref().unwrap().overall_score(),
                best.params
            );
        }
        if let Some(worst) = self.worst() {
            println!(
                "{} score={:.4} params={:?}",
                "Worst:".bright_red(),
                worst.report.as_ref().unwrap().overall_score(),
                worst.params
            );
        }
    }
}

/// Run a grid sweep: for every combination, call `factory` to obtain a
/// configured [`ModelConfig`], run `periods` periods, and evaluate with
/// `warm_up` leading periods dropped against `targets` (or the defaults).
///
/// A factory failure for one combination is logged at warning level and
/// recorded as an error; it does not abort the remaining combinations.
pub fn run_sweep<F>(
    grid: &ParameterGrid,
    factory: F,
    periods: usize,
    warm_up: usize,
    targets: Option<&[TargetStat]>,
) -> SweepResult
where
    F: Fn(&[(String, f64)]) -> Result<ModelConfig, String> + Sync,
{
    let combos = grid.combinations();
    let combinations: Vec<SweepCombinationResult> = combos
        .into_par_iter()
        .map(|params| match factory(&params) {
            Ok(config) => {
                let mut sim = Simulation::new(config);
                let result = run_numbered(&mut sim, periods);
                let report = evaluate_simulation(&result, targets, warm_up);
                SweepCombinationResult { params, report: Some(report), error: None }
            }
            Err(e) => {
                warn!("sweep combination failed: params={:?} error={}", params, e);
                SweepCombinationResult { params, report: None, error: Some(e) }
            }
        })
        .collect();

    SweepResult { combinations }
}
