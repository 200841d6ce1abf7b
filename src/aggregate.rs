// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Batch statistics over Monte Carlo outcomes.
//!
//! The batch is the whole population of executed trials, so the variance is
//! the population variance (divide by N). Percentiles use the nearest-rank
//! index `floor(p / 100 * (N - 1))` into the ascending profits.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::PricingOutcome;

/// Percentile ranks reported when the caller does not ask for others.
pub const DEFAULT_PERCENTILES: [u32; 3] = [5, 50, 95];

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Batch-integrity errors raised during aggregation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AggregationError {
    #[error("no outcomes to aggregate")]
    EmptyBatch,

    #[error("outcome {index} has negative demand ({demand})")]
    NegativeDemand { index: usize, demand: f64 },

    #[error("outcome {index} has non-finite profit")]
    NonFiniteProfit { index: usize },

    #[error("percentile {0} is outside 0..=100")]
    InvalidPercentile(u32),
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub mean_profit: f64,
    /// Population variance of profit.
    pub profit_variance: f64,
    pub profit_percentiles: BTreeMap<u32, f64>,
}

impl SimulationSummary {
    pub fn std_profit(&self) -> f64 {
        self.profit_variance.sqrt()
    }

    pub fn percentile(&self, rank: u32) -> Option<f64> {
        self.profit_percentiles.get(&rank).copied()
    }
}

/// Fraction of outcomes with strictly negative profit; 0 for an empty batch.
pub fn prob_loss(outcomes: &[PricingOutcome]) -> f64 {
    if outcomes.is_empty() {
        return 0.0;
    }
    let losses = outcomes.iter().filter(|o| o.profit < 0.0).count();
    losses as f64 / outcomes.len() as f64
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Aggregate with [`DEFAULT_PERCENTILES`].
pub fn aggregate(outcomes: &[PricingOutcome]) -> Result<SimulationSummary, AggregationError> {
    aggregate_with_percentiles(outcomes, &DEFAULT_PERCENTILES)
}

/// Reduce a batch to its summary. Any invalid outcome fails the whole batch.
pub fn aggregate_with_percentiles(
    outcomes: &[PricingOutcome],
    percentiles: &[u32],
) -> Result<SimulationSummary, AggregationError> {
    if outcomes.is_empty() {
        return Err(AggregationError::EmptyBatch);
    }
    if let Some(&p) = percentiles.iter().find(|&&p| p > 100) {
        return Err(AggregationError::InvalidPercentile(p));
    }

    for (index, o) in outcomes.iter().enumerate() {
        if o.demand < 0.0 || o.demand.is_nan() {
            return Err(AggregationError::NegativeDemand { index, demand: o.demand });
        }
        if !o.profit.is_finite() {
            return Err(AggregationError::NonFiniteProfit { index });
        }
    }

    let n = outcomes.len();
    let mut profits: Vec<f64> = outcomes.iter().map(|o| o.profit).collect();

    let mean = profits.iter().sum::<f64>() / n as f64;
    let variance = profits.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / n as f64;

    profits.sort_by(f64::total_cmp);
    let profit_percentiles = percentiles
        .iter()
        .map(|&p| {
            let idx = ((p as f64 / 100.0) * (n - 1) as f64).floor() as usize;
            (p, profits[idx.min(n - 1)])
        })
        .collect();

    Ok(SimulationSummary {
        mean_profit: mean,
        profit_variance: variance,
        profit_percentiles,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
