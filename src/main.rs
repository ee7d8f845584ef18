use clap::{Parser, Subcommand};
use colored::Colorize;
use economy_abm::config::{ConfigPreset, ModelConfig};
use economy_abm::evaluator::evaluate_simulation;
use economy_abm::scheduler::{run_numbered, PeriodRecord, Simulation, SimulationResult};
use economy_abm::sweep::{run_sweep, ParameterGrid};
use log::info;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "economy-abm")]
#[command(about = "Stock-flow consistent agent-based model of a closed national economy")]
struct Cli {
    /// List available configuration presets and exit.
    #[arg(long, default_value_t = false)]
    list_presets: bool,

    /// Disable colored terminal output.
    #[arg(long, default_value_t = false)]
    no_color: bool,

    /// Log level (error, warn, info, debug, trace). Overridden by RUST_LOG.
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run a single simulation and write its trajectory to JSON.
    Run {
        /// Path to a YAML or TOML configuration file.
        #[arg(long)]
        config: Option<String>,

        /// Named preset to start from (overridden by --config if both given).
        #[arg(long)]
        preset: Option<String>,

        /// Override the number of periods to run.
        #[arg(long)]
        periods: Option<usize>,

        /// Write the resulting trajectory to this path as JSON.
        #[arg(long)]
        out: Option<String>,
    },
    /// Run a Cartesian-product parameter sweep against calibration targets.
    Sweep {
        #[arg(long)]
        config: Option<String>,

        #[arg(long)]
        preset: Option<String>,

        /// Path to a YAML grid file: a map of parameter name to a list of values.
        #[arg(long)]
        grid: String,

        #[arg(long)]
        periods: Option<usize>,

        #[arg(long, default_value_t = 0)]
        warm_up: usize,

        /// Write a tab-separated results summary to this path.
        #[arg(long)]
        out: Option<String>,
    },
    /// Evaluate a previously saved trajectory against calibration targets.
    Evaluate {
        /// Path to a JSON trajectory produced by `run --out`.
        #[arg(long)]
        trajectory: String,

        #[arg(long, default_value_t = 0)]
        warm_up: usize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", &cli.log_level);
    }
    env_logger::init();

    if cli.list_presets {
        println!("Available preset configurations:\n");
        for preset in ConfigPreset::all() {
            println!("  {}", preset.as_str());
            println!("    {}", preset.description());
        }
        return Ok(());
    }

    match cli.command {
        Some(Command::Run { config, preset, periods, out }) => run_command(config, preset, periods, out),
        Some(Command::Sweep { config, preset, grid, periods, warm_up, out }) => {
            sweep_command(config, preset, grid, periods, warm_up, out)
        }
        Some(Command::Evaluate { trajectory, warm_up }) => evaluate_command(trajectory, warm_up),
        None => {
            eprintln!("no subcommand given; use `run`, `sweep` or `evaluate` (see --help)");
            Ok(())
        }
    }
}

fn load_config(config: Option<String>, preset: Option<String>) -> Result<ModelConfig, Box<dyn std::error::Error>> {
    if let Some(path) = config {
        info!("loading configuration from {}", path);
        Ok(ModelConfig::from_file(&path)?)
    } else if let Some(name) = preset {
        let preset = ConfigPreset::from_str(&name)
            .map_err(|e| format!("{e}. Use --list-presets to see available presets."))?;
        info!("loading preset configuration: {}", preset.as_str());
        Ok(ModelConfig::from_preset(preset))
    } else {
        Ok(ModelConfig::default())
    }
}

fn run_command(
    config: Option<String>,
    preset: Option<String>,
    periods: Option<usize>,
    out: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(config, preset)?;
    if let Some(periods) = periods {
        config.simulation.periods = periods;
    }
    config.validate()?;

    let mut sim = Simulation::new(config);
    let result = sim.run();

    print_trajectory_summary(&result);

    if let Some(path) = out {
        write_trajectory_json(&result, &path)?;
        println!("\nWrote {} periods to {}", result.records.len(), path);
    }

    Ok(())
}

fn sweep_command(
    config: Option<String>,
    preset: Option<String>,
    grid_path: String,
    periods: Option<usize>,
    warm_up: usize,
    out: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let base_config = load_config(config, preset)?;
    let periods = periods.unwrap_or(base_config.simulation.periods);

    let raw = std::fs::read_to_string(&grid_path)?;
    let parsed: std::collections::BTreeMap<String, Vec<f64>> = serde_yaml::from_str(&raw)
        .map_err(|e| format!("failed to parse grid file {grid_path}: {e}"))?;

    let mut grid = ParameterGrid::new();
    for (name, values) in parsed {
        grid = grid.with(name, values);
    }

    let result = run_sweep(
        &grid,
        |params| apply_params(&base_config, params),
        periods,
        warm_up,
        None,
    );

    result.print_summary();
    if let Some(path) = out {
        result.save_summary_to_file(&path)?;
        println!("\nWrote sweep summary to {path}");
    }

    Ok(())
}

fn evaluate_command(trajectory_path: String, warm_up: usize) -> Result<(), Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(&trajectory_path)?;
    let records: Vec<PeriodRecord> = serde_json::from_str(&raw)?;
    let result = SimulationResult { records };

    let report = evaluate_simulation(&result, None, warm_up);
    println!("{}", report.summary());

    Ok(())
}

/// Applies named overrides from a sweep combination onto a clone of the base
/// config. Names are matched against the handful of parameters that are
/// meaningful to vary in a grid search; anything else is rejected so typos
/// in a grid file fail loudly rather than silently doing nothing.
fn apply_params(base: &ModelConfig, params: &[(String, f64)]) -> Result<ModelConfig, String> {
    let mut config = base.clone();
    for (name, value) in params {
        match name.as_str() {
            "price_markup" => config.firm_behavior.price_markup = *value,
            "markup_adjustment_speed" => config.firm_behavior.markup_adjustment_speed = *value,
            "wage_adjustment_speed" => config.firm_behavior.wage_adjustment_speed = *value,
            "inflation_coefficient" => config.taylor_rule.inflation_coefficient = *value,
            "interest_rate_smoothing" => config.taylor_rule.interest_rate_smoothing = *value,
            "deficit_target" => config.fiscal_rule.deficit_target = *value,
            "spending_gdp_ratio" => config.fiscal_rule.spending_gdp_ratio = *value,
            "matching_efficiency" => config.labor_market.matching_efficiency = *value,
            "separation_rate" => config.labor_market.separation_rate = *value,
            "collateral_requirement" => config.credit_market.collateral_requirement = *value,
            "seed" => config.simulation.seed = *value as u64,
            other => return Err(format!("unknown sweep parameter: {other}")),
        }
    }
    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn write_trajectory_json(result: &SimulationResult, path: &str) -> std::io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let json = serde_json::to_string_pretty(&result.records)?;
    writer.write_all(json.as_bytes())?;
    Ok(())
}

fn print_trajectory_summary(result: &SimulationResult) {
    println!("\n{}", "=== Simulation Complete ===".bright_cyan().bold());
    println!("Periods run: {}", result.records.len());
    if let Some(last) = result.records.last() {
        println!(
            "Final period: gdp={:.2} inflation={:.4} unemployment={:.4} policy_rate={:.4} debt={:.2}",
            last.gdp, last.inflation, last.unemployment_rate, last.policy_rate, last.debt
        );
        println!(
            "Bankruptcies to date: {}  Employment: {}",
            last.bankruptcies_count, last.total_employment
        );
    }
}
