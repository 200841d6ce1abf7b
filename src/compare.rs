// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Price comparison and range sweeps.
//!
//! Every price is run against the same base config and seed (common random
//! numbers), so differences along the curve come from price alone.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::evaluate_from_config;
use crate::results::{run_simulation, SimulationResult};
use crate::types::PricingSimulationConfig;

/// Hard cap on candidate prices in one sweep.
pub const MAX_SWEEP_POINTS: usize = 5000;

/// Relative slack that lets `max_price` count as reached despite rounding.
const RANGE_TOLERANCE: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RangeError {
    #[error("invalid price range: {0}")]
    InvalidRange(&'static str),

    #[error("sweep of {requested} points exceeds the cap of {cap}")]
    TooManyPoints { requested: usize, cap: usize },

    #[error("sweep produced no points")]
    EmptyCurve,
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Whether each price gets a full Monte Carlo run or one noise-free evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SweepMode {
    #[default]
    MonteCarlo,
    Deterministic,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CurvePoint {
    Stochastic {
        price: f64,
        mean_profit: f64,
        std_profit: f64,
        prob_loss: f64,
    },
    Deterministic {
        price: f64,
        profit: f64,
    },
}

impl CurvePoint {
    pub fn price(&self) -> f64 {
        match self {
            Self::Stochastic { price, .. } | Self::Deterministic { price, .. } => *price,
        }
    }

    /// Mean profit in Monte Carlo mode, plain profit otherwise.
    pub fn profit(&self) -> f64 {
        match self {
            Self::Stochastic { mean_profit, .. } => *mean_profit,
            Self::Deterministic { profit, .. } => *profit,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSweep {
    pub curve: Vec<CurvePoint>,
    pub optimal_price: f64,
    pub max_profit: f64,
}

// ---------------------------------------------------------------------------
// Price grid
// ---------------------------------------------------------------------------

/// Prices `min, min + step, ...` up to and including `max` (within tolerance).
///
/// The point count is computed up front and checked against
/// [`MAX_SWEEP_POINTS`] before anything is allocated.
pub fn price_grid(min_price: f64, max_price: f64, step: f64) -> std::result::Result<Vec<f64>, RangeError> {
    if !(min_price.is_finite() && max_price.is_finite() && step.is_finite()) {
        return Err(RangeError::InvalidRange("bounds and step must be finite"));
    }
    if step <= 0.0 {
        return Err(RangeError::InvalidRange("step must be > 0"));
    }
    if min_price <= 0.0 {
        return Err(RangeError::InvalidRange("min_price must be > 0"));
    }
    if max_price < min_price {
        return Err(RangeError::InvalidRange("max_price must be >= min_price"));
    }

    let span = (max_price - min_price) / step;
    let steps = (span + RANGE_TOLERANCE * span.max(1.0)).floor();
    if steps >= MAX_SWEEP_POINTS as f64 {
        return Err(RangeError::TooManyPoints {
            requested: if steps < usize::MAX as f64 { steps as usize + 1 } else { usize::MAX },
            cap: MAX_SWEEP_POINTS,
        });
    }

    let count = steps as usize + 1;
    Ok((0..count).map(|i| min_price + i as f64 * step).collect())
}

// ---------------------------------------------------------------------------
// Comparison & sweeps
// ---------------------------------------------------------------------------

/// Full simulation per price, in input order, all sharing the base seed.
pub fn compare_pricing_decisions(
    base: &PricingSimulationConfig,
    prices: &[f64],
) -> Result<Vec<(f64, SimulationResult)>> {
    prices
        .iter()
        .map(|&price| Ok((price, run_simulation(&base.with_price(price))?)))
        .collect()
}

fn curve_point(config: &PricingSimulationConfig, mode: SweepMode) -> Result<CurvePoint> {
    Ok(match mode {
        SweepMode::MonteCarlo => {
            let result = run_simulation(config)?;
            CurvePoint::Stochastic {
                price: config.price,
                mean_profit: result.summary.mean_profit,
                std_profit: result.std_profit(),
                prob_loss: result.prob_loss(),
            }
        }
        SweepMode::Deterministic => CurvePoint::Deterministic {
            price: config.price,
            profit: evaluate_from_config(config)?.profit,
        },
    })
}

/// Evaluate an explicit price list and locate the most profitable point.
/// Ties go to the earliest price in the list.
pub fn sweep_prices(
    base: &PricingSimulationConfig,
    prices: &[f64],
    mode: SweepMode,
) -> Result<PriceSweep> {
    if prices.len() > MAX_SWEEP_POINTS {
        return Err(RangeError::TooManyPoints {
            requested: prices.len(),
            cap: MAX_SWEEP_POINTS,
        }
        .into());
    }

    let curve = prices
        .iter()
        .map(|&price| curve_point(&base.with_price(price), mode))
        .collect::<Result<Vec<_>>>()?;

    let best = curve
        .iter()
        .copied()
        .reduce(|best, point| if point.profit() > best.profit() { point } else { best })
        .ok_or(RangeError::EmptyCurve)?;

    tracing::info!(
        points = curve.len(),
        optimal_price = best.price(),
        max_profit = best.profit(),
        ?mode,
        "price sweep complete"
    );

    Ok(PriceSweep {
        optimal_price: best.price(),
        max_profit: best.profit(),
        curve,
    })
}

/// Sweep `min_price..=max_price` by `step`. Fails before running anything
/// if the grid is invalid or too large.
pub fn sweep_range(
    base: &PricingSimulationConfig,
    min_price: f64,
    max_price: f64,
    step: f64,
    mode: SweepMode,
) -> Result<PriceSweep> {
    let prices = price_grid(min_price, max_price, step)?;
    sweep_prices(base, &prices, mode)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
