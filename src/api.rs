// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Request handlers shared by the WASM exports and the bench CLI.
//!
//! Each handler validates a nested JSON request, runs the pipeline and
//! returns a serializable response. Failures become an [`ErrorPayload`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::compare::{sweep_prices, sweep_range, PriceSweep, SweepMode};
use crate::config::{
    perturbation_from_request, price_selection_from_request, ConfigValidationError, PriceSelection,
};
use crate::error::SimulationError;
use crate::model::evaluate_from_config;
use crate::results::{run_simulation, RiskMetrics};
use crate::sensitivity::{rank_assumptions_by_impact, Assumption};
use crate::types::{PricingOutcome, PricingSimulationConfig};

/// User-facing error: `field` is set for validation failures only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub field: Option<String>,
    pub message: String,
}

impl From<SimulationError> for ErrorPayload {
    fn from(err: SimulationError) -> Self {
        match err {
            SimulationError::Validation(e) => e.into(),
            other => Self {
                field: None,
                message: other.to_string(),
            },
        }
    }
}

impl From<ConfigValidationError> for ErrorPayload {
    fn from(err: ConfigValidationError) -> Self {
        Self {
            field: Some(err.field),
            message: err.message,
        }
    }
}

type Response<T> = Result<T, ErrorPayload>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedImpact {
    pub assumption: Assumption,
    pub impact: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityResponse {
    pub perturbation: f64,
    pub impacts: BTreeMap<Assumption, f64>,
    pub ranking: Vec<RankedImpact>,
}

/// Noise-free evaluation of the request's price and nominal assumptions.
pub fn simulate(request: &Value) -> Response<PricingOutcome> {
    let config = PricingSimulationConfig::from_request(request)?;
    Ok(evaluate_from_config(&config).map_err(SimulationError::from)?)
}

pub fn simulate_monte_carlo(request: &Value) -> Response<RiskMetrics> {
    let config = PricingSimulationConfig::from_request(request)?;
    Ok(run_simulation(&config)?.risk_metrics())
}

/// Sweep over `range`. `range.mode` picks `deterministic` (default) or
/// `monte_carlo`.
pub fn simulate_range(request: &Value) -> Response<PriceSweep> {
    let config = PricingSimulationConfig::from_request(request)?;
    let selection = price_selection_from_request(request)?;
    let mode = match request.pointer("/range/mode") {
        None | Some(Value::Null) => SweepMode::Deterministic,
        Some(value) => serde_json::from_value(value.clone()).map_err(|_| {
            ConfigValidationError::new("range.mode", "Must be 'monte_carlo' or 'deterministic'")
        })?,
    };

    let sweep = match selection {
        PriceSelection::Range(r) => sweep_range(&config, r.min_price, r.max_price, r.step, mode),
        PriceSelection::List(prices) => sweep_prices(&config, &prices, mode),
    };
    Ok(sweep?)
}

pub fn sensitivity(request: &Value) -> Response<SensitivityResponse> {
    let config = PricingSimulationConfig::from_request(request)?;
    let perturbation = perturbation_from_request(request)?;
    let ranked = rank_assumptions_by_impact(&config, perturbation)?;

    Ok(SensitivityResponse {
        perturbation,
        impacts: ranked.iter().copied().collect(),
        ranking: ranked
            .into_iter()
            .map(|(assumption, impact)| RankedImpact { assumption, impact })
            .collect(),
    })
}
