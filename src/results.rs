// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Single-simulation orchestration: Monte Carlo, then aggregation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::aggregate::{self, SimulationSummary, DEFAULT_PERCENTILES};
use crate::error::Result;
use crate::monte_carlo::run_monte_carlo;
use crate::types::{PricingOutcome, PricingSimulationConfig};

/// Full outcome batch plus its summary. The caller owns both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub outcomes: Vec<PricingOutcome>,
    pub summary: SimulationSummary,
}

impl SimulationResult {
    pub fn std_profit(&self) -> f64 {
        self.summary.std_profit()
    }

    pub fn prob_loss(&self) -> f64 {
        aggregate::prob_loss(&self.outcomes)
    }

    pub fn risk_metrics(&self) -> RiskMetrics {
        RiskMetrics {
            profits: self.outcomes.iter().map(|o| o.profit).collect(),
            mean_profit: self.summary.mean_profit,
            std_profit: self.std_profit(),
            prob_loss: self.prob_loss(),
            profit_percentiles: self.summary.profit_percentiles.clone(),
        }
    }
}

/// Flattened risk view of one simulation, as served to the risk dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub profits: Vec<f64>,
    pub mean_profit: f64,
    pub std_profit: f64,
    pub prob_loss: f64,
    pub profit_percentiles: BTreeMap<u32, f64>,
}

/// Run one pricing simulation with the default percentiles.
pub fn run_simulation(config: &PricingSimulationConfig) -> Result<SimulationResult> {
    run_simulation_with_percentiles(config, &DEFAULT_PERCENTILES)
}

pub fn run_simulation_with_percentiles(
    config: &PricingSimulationConfig,
    percentiles: &[u32],
) -> Result<SimulationResult> {
    tracing::debug!(
        price = config.price,
        runs = config.num_runs,
        seed = config.random_seed,
        "monte carlo run starting"
    );
    let outcomes = run_monte_carlo(config)?;
    let summary = aggregate::aggregate_with_percentiles(&outcomes, percentiles)?;
    tracing::debug!(
        price = config.price,
        mean_profit = summary.mean_profit,
        std_profit = summary.std_profit(),
        "monte carlo run finished"
    );
    Ok(SimulationResult { outcomes, summary })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Distribution, NoiseSpec};
    use approx::assert_relative_eq;

    fn config() -> PricingSimulationConfig {
        PricingSimulationConfig {
            price: 15.0,
            base_demand: 100.0,
            price_elasticity: 0.1,
            unit_cost: 3.0,
            fixed_cost: 50.0,
            demand_noise: NoiseSpec::new(Distribution::LogNormal, 0.3),
            elasticity_noise: NoiseSpec::new(Distribution::Normal, 0.2),
            num_runs: 1000,
            random_seed: 7,
        }
    }

    #[test]
    fn identical_configs_give_identical_results() {
        let a = run_simulation(&config()).unwrap();
        let b = run_simulation(&config()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn risk_metrics_match_summary() {
        let result = run_simulation(&config()).unwrap();
        let risk = result.risk_metrics();
        assert_eq!(risk.profits.len(), 1000);
        assert_relative_eq!(risk.std_profit * risk.std_profit, result.summary.profit_variance, max_relative = 1e-12);
        assert!((0.0..=1.0).contains(&risk.prob_loss));
        let p5 = risk.profit_percentiles[&5];
        let p95 = risk.profit_percentiles[&95];
        assert!(p5 <= risk.profit_percentiles[&50] && risk.profit_percentiles[&50] <= p95);
    }

    #[test]
    fn custom_percentiles_are_honoured() {
        let result = run_simulation_with_percentiles(&config(), &[1, 99]).unwrap();
        let keys: Vec<u32> = result.summary.profit_percentiles.keys().copied().collect();
        assert_eq!(keys, vec![1, 99]);
    }
}
