// Scenario Runner - one full pipeline pass per scenario
// Validate → Monte Carlo → aggregate → sensitivity → price sweep

use pricing_risk_engine::api::ErrorPayload;
use pricing_risk_engine::compare::{sweep_range, SweepMode};
use pricing_risk_engine::results::run_simulation;
use pricing_risk_engine::{analytical_optimal_price, rank_assumptions_by_impact};
use pricing_risk_engine::{PricingSimulationConfig, SimulationError};

use crate::report::*;
use crate::scenarios::Scenario;
use crate::trials;

use std::path::Path;
use std::time::Instant;

pub struct RunOptions<'a> {
    pub runs: Option<usize>,
    pub seed: Option<i64>,
    pub perturbation: f64,
    /// Per-bound overrides of each scenario's sweep (min_price, max_price, step)
    pub sweep: (Option<f64>, Option<f64>, Option<f64>),
    pub mode: SweepMode,
    pub trials_dir: Option<&'a Path>,
}

fn failure(scenario: &Scenario, payload: ErrorPayload) -> ScenarioFailure {
    ScenarioFailure {
        scenario_name: scenario.name.clone(),
        field: payload.field,
        message: payload.message,
    }
}

/// Run one scenario through the whole pipeline.
pub fn run_scenario(scenario: &Scenario, opts: &RunOptions) -> Result<ScenarioReport, ScenarioFailure> {
    let start = Instant::now();

    let mut config = PricingSimulationConfig::from_request(&scenario.request)
        .map_err(|e| failure(scenario, e.into()))?;
    if let Some(runs) = opts.runs {
        config = config.with_num_runs(runs.max(1));
    }
    if let Some(seed) = opts.seed {
        config = config.with_random_seed(seed);
    }

    evaluate(scenario, &config, opts, start).map_err(|e| failure(scenario, e.into()))
}

fn evaluate(
    scenario: &Scenario,
    config: &PricingSimulationConfig,
    opts: &RunOptions,
    start: Instant,
) -> Result<ScenarioReport, SimulationError> {
    let result = run_simulation(config)?;

    if let Some(dir) = opts.trials_dir {
        let path = dir.join(format!("{}.jsonl", scenario.name.to_lowercase()));
        if let Err(e) = trials::write_jsonl(&path, &result.outcomes) {
            tracing::warn!(path = %path.display(), error = %e, "failed to write trial log");
        }
    }

    let ranked = rank_assumptions_by_impact(config, opts.perturbation)?;
    let (min_price, max_price, step) = scenario.sweep;
    let min_price = opts.sweep.0.unwrap_or(min_price);
    let max_price = opts.sweep.1.unwrap_or(max_price);
    let step = opts.sweep.2.unwrap_or(step);
    let sweep = sweep_range(config, min_price, max_price, step, opts.mode)?;
    let analytical = analytical_optimal_price(config.unit_cost, config.price_elasticity)?;

    let mean_profit = result.summary.mean_profit;
    let prob_loss = result.prob_loss();

    let mut pass = true;
    if let Some(max) = scenario.criteria.max_prob_loss {
        if prob_loss > max {
            pass = false;
        }
    }
    if let Some(min) = scenario.criteria.min_mean_profit {
        if mean_profit < min {
            pass = false;
        }
    }

    Ok(ScenarioReport {
        scenario_name: scenario.name.clone(),
        label: scenario.label.clone(),
        category: scenario.category.clone(),
        pass,
        config: *config,
        mean_profit,
        std_profit: result.std_profit(),
        prob_loss,
        profit_percentiles: result.summary.profit_percentiles,
        analytical_optimal_price: analytical,
        sensitivity: ranked
            .into_iter()
            .map(|(assumption, impact)| SensitivityEntry { assumption, impact })
            .collect(),
        sweep,
        elapsed_ms: start.elapsed().as_millis(),
    })
}
