// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Data model shared by every stage of the pricing-risk pipeline.
//!
//! All values here are immutable once built. A "modified" configuration is
//! always a fresh copy produced by one of the `with_*` methods on
//! [`PricingSimulationConfig`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::sampler::SamplerError;

// ─── Decision & Parameters ──────────────────────────────────────────────────

/// The control variable under evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingDecision {
    pub price: f64,
}

/// Economic assumptions for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingParameters {
    pub base_demand: f64,
    pub price_elasticity: f64,
    pub unit_cost: f64,
    pub fixed_cost: f64,
}

/// Result of one deterministic evaluation (baseline or one Monte Carlo trial).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingOutcome {
    pub demand: f64,
    pub revenue: f64,
    pub total_cost: f64,
    pub profit: f64,
}

// ─── Noise ──────────────────────────────────────────────────────────────────

/// Closed set of supported multiplicative noise distributions.
///
/// `Normal` is centred on 1.0 (unbiased multiplier). `LogNormal` has an
/// underlying normal of mean 0, so its median multiplier is 1.0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Distribution {
    Normal,
    LogNormal,
}

impl Distribution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::LogNormal => "lognormal",
        }
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Distribution {
    type Err = SamplerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Self::Normal),
            "lognormal" => Ok(Self::LogNormal),
            other => Err(SamplerError::UnsupportedDistribution(other.to_string())),
        }
    }
}

/// A named distribution plus its spread.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseSpec {
    pub distribution: Distribution,
    pub sigma: f64,
}

impl NoiseSpec {
    pub fn new(distribution: Distribution, sigma: f64) -> Self {
        Self { distribution, sigma }
    }
}

/// Upper bound on elasticity noise; larger spreads destabilise demand.
pub const MAX_ELASTICITY_NOISE_SIGMA: f64 = 0.5;

// ─── Simulation Config ──────────────────────────────────────────────────────

/// Fully validated, immutable simulation configuration.
///
/// Built by [`PricingSimulationConfig::from_request`](crate::config) or, for
/// derived configs, by copying an existing one through a `with_*` method.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingSimulationConfig {
    pub price: f64,

    pub base_demand: f64,
    pub price_elasticity: f64,

    pub unit_cost: f64,
    pub fixed_cost: f64,

    pub demand_noise: NoiseSpec,
    pub elasticity_noise: NoiseSpec,

    pub num_runs: usize,
    pub random_seed: i64,
}

impl PricingSimulationConfig {
    pub fn decision(&self) -> PricingDecision {
        PricingDecision { price: self.price }
    }

    /// Nominal (unperturbed) parameters.
    pub fn parameters(&self) -> PricingParameters {
        PricingParameters {
            base_demand: self.base_demand,
            price_elasticity: self.price_elasticity,
            unit_cost: self.unit_cost,
            fixed_cost: self.fixed_cost,
        }
    }

    pub fn with_price(&self, price: f64) -> Self {
        Self { price, ..*self }
    }

    pub fn with_base_demand(&self, base_demand: f64) -> Self {
        Self { base_demand, ..*self }
    }

    pub fn with_price_elasticity(&self, price_elasticity: f64) -> Self {
        Self { price_elasticity, ..*self }
    }

    pub fn with_unit_cost(&self, unit_cost: f64) -> Self {
        Self { unit_cost, ..*self }
    }

    pub fn with_fixed_cost(&self, fixed_cost: f64) -> Self {
        Self { fixed_cost, ..*self }
    }

    pub fn with_num_runs(&self, num_runs: usize) -> Self {
        Self { num_runs, ..*self }
    }

    pub fn with_random_seed(&self, random_seed: i64) -> Self {
        Self { random_seed, ..*self }
    }

    /// Seed for the run's private random stream. Negative seeds are
    /// reinterpreted bitwise, so every `i64` maps to a distinct stream.
    pub fn stream_seed(&self) -> u64 {
        self.random_seed as u64
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> PricingSimulationConfig {
        PricingSimulationConfig {
            price: 10.0,
            base_demand: 100.0,
            price_elasticity: 0.1,
            unit_cost: 3.0,
            fixed_cost: 50.0,
            demand_noise: NoiseSpec::new(Distribution::Normal, 0.1),
            elasticity_noise: NoiseSpec::new(Distribution::LogNormal, 0.05),
            num_runs: 100,
            random_seed: 42,
        }
    }

    #[test]
    fn with_price_copies_everything_else() {
        let base = config();
        let derived = base.with_price(12.5);
        assert_eq!(derived.price, 12.5);
        assert_eq!(base.price, 10.0);
        assert_eq!(derived.with_price(10.0), base);
    }

    #[test]
    fn distribution_parses_only_known_names() {
        assert_eq!("normal".parse::<Distribution>().ok(), Some(Distribution::Normal));
        assert_eq!("lognormal".parse::<Distribution>().ok(), Some(Distribution::LogNormal));
        assert!(matches!(
            "uniform".parse::<Distribution>(),
            Err(SamplerError::UnsupportedDistribution(name)) if name == "uniform"
        ));
        // Names are case-sensitive.
        assert!("Normal".parse::<Distribution>().is_err());
    }

    #[test]
    fn distribution_serde_names() {
        let json = serde_json::to_string(&Distribution::LogNormal).unwrap();
        assert_eq!(json, "\"lognormal\"");
    }

    #[test]
    fn negative_seed_maps_bitwise() {
        let cfg = config().with_random_seed(-1);
        assert_eq!(cfg.stream_seed(), u64::MAX);
        assert_eq!(config().with_random_seed(0).stream_seed(), 0);
    }
}
