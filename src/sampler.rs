// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Reproducible multiplicative noise.
//!
//! The sampler borrows a caller-owned random stream, so two samplers over
//! identically seeded streams yield identical draws.

use rand::Rng;
use rand_distr::{Distribution as _, LogNormal, Normal};

use crate::types::Distribution;

/// Floor applied to sampled multipliers.
pub const MIN_MULTIPLIER: f64 = 1e-8;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from noise sampling.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SamplerError {
    #[error("unsupported distribution: {0}")]
    UnsupportedDistribution(String),

    #[error("invalid {distribution} parameters (sigma={sigma})")]
    InvalidParameters { distribution: Distribution, sigma: f64 },

    #[error("numerical instability: sampled noise is not finite ({0})")]
    NonFinite(f64),
}

// ---------------------------------------------------------------------------
// DistributionSampler
// ---------------------------------------------------------------------------

/// Draws noise multipliers from a borrowed random stream.
pub struct DistributionSampler<'a, R: Rng> {
    rng: &'a mut R,
}

impl<'a, R: Rng> DistributionSampler<'a, R> {
    pub fn new(rng: &'a mut R) -> Self {
        Self { rng }
    }

    /// Draw one raw multiplier. Consumes the stream even when the value is
    /// later rejected by [`enforce_valid_sample`]. `sigma` must be finite
    /// and strictly positive; nothing is drawn otherwise.
    pub fn sample(&mut self, distribution: Distribution, sigma: f64) -> Result<f64, SamplerError> {
        if !(sigma > 0.0 && sigma.is_finite()) {
            return Err(SamplerError::InvalidParameters { distribution, sigma });
        }
        let invalid = |_| SamplerError::InvalidParameters { distribution, sigma };
        match distribution {
            Distribution::Normal => {
                let normal = Normal::new(1.0, sigma).map_err(invalid)?;
                Ok(normal.sample(&mut *self.rng))
            }
            Distribution::LogNormal => {
                let lognormal = LogNormal::new(0.0, sigma).map_err(invalid)?;
                Ok(lognormal.sample(&mut *self.rng))
            }
        }
    }

    /// Like [`sample`](Self::sample), for callers holding an unvalidated name.
    pub fn sample_named(&mut self, distribution: &str, sigma: f64) -> Result<f64, SamplerError> {
        let distribution = distribution.parse::<Distribution>()?;
        self.sample(distribution, sigma)
    }
}

/// Reject non-finite draws; floor tiny or negative draws at [`MIN_MULTIPLIER`].
pub fn enforce_valid_sample(value: f64) -> Result<f64, SamplerError> {
    if !value.is_finite() {
        return Err(SamplerError::NonFinite(value));
    }
    if value < MIN_MULTIPLIER {
        tracing::warn!(value, floor = MIN_MULTIPLIER, "noise multiplier floored");
        return Ok(MIN_MULTIPLIER);
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
