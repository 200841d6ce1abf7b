// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! One-at-a-time sensitivity of mean profit to each economic assumption.
//!
//! Every derived config keeps the base seed, so the perturbed and base runs
//! share one noise realization and the delta reflects the assumption alone.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::config::ConfigValidationError;
use crate::error::Result;
use crate::results::run_simulation;
use crate::types::PricingSimulationConfig;

/// The four perturbable assumptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assumption {
    BaseDemand,
    PriceElasticity,
    UnitCost,
    FixedCost,
}

impl Assumption {
    pub const ALL: [Assumption; 4] = [
        Assumption::BaseDemand,
        Assumption::PriceElasticity,
        Assumption::UnitCost,
        Assumption::FixedCost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BaseDemand => "base_demand",
            Self::PriceElasticity => "price_elasticity",
            Self::UnitCost => "unit_cost",
            Self::FixedCost => "fixed_cost",
        }
    }

    /// Copy of `config` with only this assumption scaled by `factor`.
    pub fn scaled(&self, config: &PricingSimulationConfig, factor: f64) -> PricingSimulationConfig {
        match self {
            Self::BaseDemand => config.with_base_demand(config.base_demand * factor),
            Self::PriceElasticity => config.with_price_elasticity(config.price_elasticity * factor),
            Self::UnitCost => config.with_unit_cost(config.unit_cost * factor),
            Self::FixedCost => config.with_fixed_cost(config.fixed_cost * factor),
        }
    }
}

impl fmt::Display for Assumption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed change in mean profit when each assumption grows by `perturbation`.
pub fn sensitivity_analysis(
    base: &PricingSimulationConfig,
    perturbation: f64,
) -> Result<BTreeMap<Assumption, f64>> {
    if !perturbation.is_finite() {
        return Err(ConfigValidationError::new("perturbation", "Must be a finite number").into());
    }

    let base_profit = run_simulation(base)?.summary.mean_profit;
    let factor = 1.0 + perturbation;

    let mut impacts = BTreeMap::new();
    for assumption in Assumption::ALL {
        let derived = assumption.scaled(base, factor);
        tracing::debug!(%assumption, factor, "sensitivity rerun");
        let delta = run_simulation(&derived)?.summary.mean_profit - base_profit;
        impacts.insert(assumption, delta);
    }
    Ok(impacts)
}

/// Assumptions ordered by descending absolute impact. Ties keep the
/// declaration order of [`Assumption::ALL`].
pub fn rank_assumptions_by_impact(
    base: &PricingSimulationConfig,
    perturbation: f64,
) -> Result<Vec<(Assumption, f64)>> {
    let mut ranked: Vec<(Assumption, f64)> = sensitivity_analysis(base, perturbation)?.into_iter().collect();
    ranked.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
    Ok(ranked)
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
            demand_noise: NoiseSpec::new(Distribution::Normal, 0.1),
            elasticity_noise: NoiseSpec::new(Distribution::Normal, 0.05),
            num_runs: 400,
            random_seed: 11,
        }
    }

    #[test]
    fn scaled_touches_one_field() {
        let base = config();
        let derived = Assumption::UnitCost.scaled(&base, 1.1);
        assert_relative_eq!(derived.unit_cost, 3.3);
        assert_eq!(derived.with_unit_cost(base.unit_cost), base);
    }

    #[test]
    fn signs_follow_the_economics() {
        let impacts = sensitivity_analysis(&config(), 0.1).unwrap();
        assert_eq!(impacts.len(), 4);
        assert!(impacts[&Assumption::BaseDemand] > 0.0);
        assert!(impacts[&Assumption::PriceElasticity] < 0.0);
        assert!(impacts[&Assumption::UnitCost] < 0.0);
        // Fixed cost never interacts with noise: the delta is exactly -10% of it.
        assert_relative_eq!(impacts[&Assumption::FixedCost], -5.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_perturbation_is_neutral() {
        let impacts = sensitivity_analysis(&config(), 0.0).unwrap();
        assert!(impacts.values().all(|&d| d == 0.0));
    }

    #[test]
    fn ranking_is_by_absolute_impact() {
        let ranked = rank_assumptions_by_impact(&config(), 0.1).unwrap();
        assert_eq!(ranked.len(), 4);
        for pair in ranked.windows(2) {
            assert!(pair[0].1.abs() >= pair[1].1.abs());
        }
    }

    #[test]
    fn non_finite_perturbation_rejected() {
        let err = sensitivity_analysis(&config(), f64::NAN).unwrap_err();
        assert_eq!(err.field(), Some("perturbation"));
    }

    #[test]
    fn assumption_keys_serialize_by_name() {
        let impacts = sensitivity_analysis(&config().with_num_runs(10), 0.1).unwrap();
        let json = serde_json::to_value(&impacts).unwrap();
        assert!(json.get("price_elasticity").is_some());
        assert!(json.get("fixed_cost").is_some());
    }
}
