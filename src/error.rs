// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Top-level error for the simulation pipeline.
//!
//! Each stage owns its own error type; this enum only gathers them so the
//! orchestrators can propagate with `?`. Nothing is retried or partially
//! returned.

use crate::aggregate::AggregationError;
use crate::compare::RangeError;
use crate::config::ConfigValidationError;
use crate::model::ModelError;
use crate::sampler::SamplerError;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    Validation(#[from] ConfigValidationError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Sampler(#[from] SamplerError),

    #[error("batch integrity: {0}")]
    Aggregation(#[from] AggregationError),

    #[error("price range: {0}")]
    Range(#[from] RangeError),
}

impl SimulationError {
    /// Dotted field path for validation failures; `None` for everything else.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation(e) => Some(&e.field),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
