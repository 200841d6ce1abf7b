// Risk Bench Report Types
// Structured output for independent analysis of pricing decisions

use pricing_risk_engine::compare::PriceSweep;
use pricing_risk_engine::sensitivity::Assumption;
use pricing_risk_engine::PricingSimulationConfig;
use serde::Serialize;
use std::collections::BTreeMap;

// ─── Per-Scenario Report ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioReport {
    pub scenario_name: String,
    pub label: String,
    pub category: String,
    pub pass: bool,
    pub config: PricingSimulationConfig,
    pub mean_profit: f64,
    pub std_profit: f64,
    pub prob_loss: f64,
    pub profit_percentiles: BTreeMap<u32, f64>,
    /// Closed-form optimum of the noise-free model, for comparison with the sweep
    pub analytical_optimal_price: f64,
    pub sensitivity: Vec<SensitivityEntry>,
    pub sweep: PriceSweep,
    pub elapsed_ms: u128,
}

#[derive(Debug, Clone, Serialize)]
pub struct SensitivityEntry {
    pub assumption: Assumption,
    pub impact: f64,
}

/// A scenario that could not be evaluated, with the engine's reason.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioFailure {
    pub scenario_name: String,
    pub field: Option<String>,
    pub message: String,
}

// ─── Top-Level Report ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BenchReport {
    pub timestamp: String,
    pub version: &'static str,
    pub prng: &'static str,
    pub perturbation: f64,
    pub sweep_mode: String,
    pub summary: Summary,
    pub scenarios: Vec<ScenarioReport>,
    pub failures: Vec<ScenarioFailure>,
}

#[derive(Debug, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
}
