// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Request validation.
//!
//! Turns an untyped nested request into a [`PricingSimulationConfig`]. Checks
//! run in a fixed order and the first failure wins; a config is never
//! partially built.
//!
//! ```text
//! decision.price
//! assumptions.demand_model.{base_demand, price_elasticity}
//! assumptions.cost_model.{unit_cost, fixed_cost}
//! uncertainty.demand_noise.{distribution, sigma}
//! uncertainty.elasticity_noise.{distribution, sigma}
//! simulation.{num_runs, random_seed}
//! ```

use serde_json::Value;

use crate::types::{Distribution, NoiseSpec, PricingSimulationConfig, MAX_ELASTICITY_NOISE_SIGMA};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// A field-level validation failure, tagged with its dotted path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl ConfigValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

type Result<T> = std::result::Result<T, ConfigValidationError>;

// ---------------------------------------------------------------------------
// Field access
// ---------------------------------------------------------------------------

fn lookup<'a>(request: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(request, |node, key| node.as_object()?.get(key))
        .filter(|v| !v.is_null())
}

fn required<'a>(request: &'a Value, path: &str) -> Result<&'a Value> {
    lookup(request, path).ok_or_else(|| ConfigValidationError::new(path, "Missing field"))
}

/// JSON numbers and numeric strings; booleans are not numbers.
fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Integers, finite floats (truncated toward zero) and integer strings.
/// Wide enough to hold both `i64` and `u64` JSON integers.
fn as_integer(value: &Value) -> Option<i128> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
            .or_else(|| {
                let f = n.as_f64()?;
                (f.is_finite() && f.abs() < i128::MAX as f64).then(|| f.trunc() as i128)
            }),
        Value::String(s) => s.trim().parse::<i128>().ok(),
        _ => None,
    }
}

/// Any 64-bit seed. Values above `i64::MAX` are reinterpreted bitwise, so
/// `u64::MAX` and `-1` name the same stream.
fn seed_bits(seed: i128) -> Option<i64> {
    i64::try_from(seed)
        .ok()
        .or_else(|| u64::try_from(seed).ok().map(|bits| bits as i64))
}

fn number(request: &Value, path: &str) -> Result<f64> {
    let value = required(request, path)?;
    let n = as_number(value).ok_or_else(|| ConfigValidationError::new(path, "Must be a number"))?;
    if !n.is_finite() {
        return Err(ConfigValidationError::new(path, "Must be a finite number"));
    }
    Ok(n)
}

fn integer(request: &Value, path: &str) -> Result<i128> {
    let value = required(request, path)?;
    as_integer(value).ok_or_else(|| ConfigValidationError::new(path, "Must be an integer"))
}

fn distribution(value: &Value, path: &str) -> Result<Distribution> {
    value
        .as_str()
        .and_then(|name| name.parse::<Distribution>().ok())
        .ok_or_else(|| ConfigValidationError::new(path, "Unsupported distribution"))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

impl PricingSimulationConfig {
    /// Validate a nested request into an immutable config.
    pub fn from_request(request: &Value) -> Result<Self> {
        // 1. Decision
        let price = number(request, "decision.price")?;
        if price <= 0.0 {
            return Err(ConfigValidationError::new("decision.price", "Must be > 0"));
        }

        // 2-3. Demand and cost models (ranges are the model's concern)
        let base_demand = number(request, "assumptions.demand_model.base_demand")?;
        let price_elasticity = number(request, "assumptions.demand_model.price_elasticity")?;
        let unit_cost = number(request, "assumptions.cost_model.unit_cost")?;
        let fixed_cost = number(request, "assumptions.cost_model.fixed_cost")?;

        // 4. Uncertainty block
        required(request, "uncertainty")?;
        let demand_dist = required(request, "uncertainty.demand_noise.distribution")?;
        let demand_sigma = number(request, "uncertainty.demand_noise.sigma")?;
        let elasticity_dist = required(request, "uncertainty.elasticity_noise.distribution")?;
        let elasticity_sigma = number(request, "uncertainty.elasticity_noise.sigma")?;

        // 5. Spreads
        if demand_sigma <= 0.0 {
            return Err(ConfigValidationError::new(
                "uncertainty.demand_noise.sigma",
                "Must be > 0",
            ));
        }
        if elasticity_sigma <= 0.0 {
            return Err(ConfigValidationError::new(
                "uncertainty.elasticity_noise.sigma",
                "Must be > 0",
            ));
        }
        if elasticity_sigma > MAX_ELASTICITY_NOISE_SIGMA {
            return Err(ConfigValidationError::new(
                "uncertainty.elasticity_noise.sigma",
                format!("Too large (max {MAX_ELASTICITY_NOISE_SIGMA}); may cause instability"),
            ));
        }

        // 6. Distribution names
        let demand_dist = distribution(demand_dist, "uncertainty.demand_noise.distribution")?;
        let elasticity_dist =
            distribution(elasticity_dist, "uncertainty.elasticity_noise.distribution")?;

        // 7. Simulation controls
        let num_runs = integer(request, "simulation.num_runs")?;
        let random_seed = integer(request, "simulation.random_seed")?;
        if num_runs < 1 {
            return Err(ConfigValidationError::new("simulation.num_runs", "Must be >= 1"));
        }
        let num_runs = usize::try_from(num_runs)
            .map_err(|_| ConfigValidationError::new("simulation.num_runs", "Too large"))?;
        let random_seed = seed_bits(random_seed).ok_or_else(|| {
            ConfigValidationError::new("simulation.random_seed", "Must fit in 64 bits")
        })?;

        Ok(Self {
            price,
            base_demand,
            price_elasticity,
            unit_cost,
            fixed_cost,
            demand_noise: NoiseSpec::new(demand_dist, demand_sigma),
            elasticity_noise: NoiseSpec::new(elasticity_dist, elasticity_sigma),
            num_runs,
            random_seed,
        })
    }
}

// ---------------------------------------------------------------------------
// Sweep & sensitivity extras
// ---------------------------------------------------------------------------

/// `(min_price, max_price, step)` as supplied under a request's `range` key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    pub min_price: f64,
    pub max_price: f64,
    pub step: f64,
}

/// Parse `range.{min_price, max_price, step}`. Range consistency is checked
/// by the sweeper, not here.
pub fn price_range_from_request(request: &Value) -> Result<PriceRange> {
    Ok(PriceRange {
        min_price: number(request, "range.min_price")?,
        max_price: number(request, "range.max_price")?,
        step: number(request, "range.step")?,
    })
}

/// Which prices a sweep should visit.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceSelection {
    Range(PriceRange),
    List(Vec<f64>),
}

/// `range.prices` (explicit list) takes precedence over the min/max/step form.
pub fn price_selection_from_request(request: &Value) -> Result<PriceSelection> {
    let Some(list) = lookup(request, "range.prices") else {
        return price_range_from_request(request).map(PriceSelection::Range);
    };
    let items = list
        .as_array()
        .ok_or_else(|| ConfigValidationError::new("range.prices", "Must be a list of numbers"))?;
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            as_number(item)
                .filter(|n| n.is_finite())
                .ok_or_else(|| ConfigValidationError::new(format!("range.prices.{i}"), "Must be a finite number"))
        })
        .collect::<Result<Vec<f64>>>()
        .map(PriceSelection::List)
}

pub const DEFAULT_PERTURBATION: f64 = 0.10;

/// Optional top-level `perturbation`, defaulting to 10%.
pub fn perturbation_from_request(request: &Value) -> Result<f64> {
    match lookup(request, "perturbation") {
        None => Ok(DEFAULT_PERTURBATION),
        Some(_) => number(request, "perturbation"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> Value {
        json!({
            "decision": { "price": 10.0 },
            "assumptions": {
                "demand_model": { "base_demand": 100.0, "price_elasticity": 0.1 },
                "cost_model": { "unit_cost": 3.0, "fixed_cost": 50.0 }
            },
            "uncertainty": {
                "demand_noise": { "distribution": "normal", "sigma": 0.1 },
                "elasticity_noise": { "distribution": "lognormal", "sigma": 0.05 }
            },
            "simulation": { "num_runs": 500, "random_seed": 42 }
        })
    }

    fn field_of(req: &Value) -> String {
        PricingSimulationConfig::from_request(req).unwrap_err().field
    }

    #[test]
    fn valid_request_builds_config() {
        let cfg = PricingSimulationConfig::from_request(&request()).unwrap();
        assert_eq!(cfg.price, 10.0);
        assert_eq!(cfg.price_elasticity, 0.1);
        assert_eq!(cfg.demand_noise, NoiseSpec::new(Distribution::Normal, 0.1));
        assert_eq!(cfg.elasticity_noise, NoiseSpec::new(Distribution::LogNormal, 0.05));
        assert_eq!(cfg.num_runs, 500);
        assert_eq!(cfg.random_seed, 42);
    }

    #[test]
    fn lookup_walks_nested_objects() {
        let req = request();
        assert_eq!(lookup(&req, "simulation.num_runs"), Some(&json!(500)));
        assert_eq!(lookup(&req, "simulation.missing"), None);
        assert_eq!(lookup(&req, "decision.price.deeper"), None);
    }

    #[test]
    fn null_counts_as_missing() {
        let mut req = request();
        req["decision"]["price"] = Value::Null;
        let err = PricingSimulationConfig::from_request(&req).unwrap_err();
        assert_eq!(err, ConfigValidationError::new("decision.price", "Missing field"));
    }

    #[test]
    fn numeric_strings_are_coerced() {
        let mut req = request();
        req["decision"]["price"] = json!("12.5");
        req["simulation"]["num_runs"] = json!("20");
        let cfg = PricingSimulationConfig::from_request(&req).unwrap();
        assert_eq!(cfg.price, 12.5);
        assert_eq!(cfg.num_runs, 20);
    }

    #[test]
    fn booleans_are_not_numbers() {
        let mut req = request();
        req["assumptions"]["cost_model"]["unit_cost"] = json!(true);
        let err = PricingSimulationConfig::from_request(&req).unwrap_err();
        assert_eq!(err.field, "assumptions.cost_model.unit_cost");
        assert_eq!(err.message, "Must be a number");
    }

    #[test]
    fn non_finite_strings_rejected() {
        let mut req = request();
        req["uncertainty"]["demand_noise"]["sigma"] = json!("inf");
        let err = PricingSimulationConfig::from_request(&req).unwrap_err();
        assert_eq!(err.field, "uncertainty.demand_noise.sigma");
        assert_eq!(err.message, "Must be a finite number");
    }

    #[test]
    fn float_runs_truncate() {
        let mut req = request();
        req["simulation"]["num_runs"] = json!(7.9);
        let cfg = PricingSimulationConfig::from_request(&req).unwrap();
        assert_eq!(cfg.num_runs, 7);

        req["simulation"]["num_runs"] = json!(0.5);
        assert_eq!(field_of(&req), "simulation.num_runs");
    }

    #[test]
    fn seed_accepts_zero_and_negative() {
        let mut req = request();
        req["simulation"]["random_seed"] = json!(0);
        assert_eq!(PricingSimulationConfig::from_request(&req).unwrap().random_seed, 0);
        req["simulation"]["random_seed"] = json!(-17);
        assert_eq!(PricingSimulationConfig::from_request(&req).unwrap().random_seed, -17);
    }

    #[test]
    fn seed_accepts_full_unsigned_range() {
        let mut req = request();
        req["simulation"]["random_seed"] = json!(u64::MAX);
        let cfg = PricingSimulationConfig::from_request(&req).unwrap();
        assert_eq!(cfg.random_seed, -1);
        assert_eq!(cfg.stream_seed(), u64::MAX);

        req["simulation"]["random_seed"] = json!("18446744073709551616");
        let err = PricingSimulationConfig::from_request(&req).unwrap_err();
        assert_eq!(err, ConfigValidationError::new("simulation.random_seed", "Must fit in 64 bits"));
    }

    #[test]
    fn oversized_run_count_is_rejected() {
        let mut req = request();
        req["simulation"]["num_runs"] = json!("18446744073709551616");
        let err = PricingSimulationConfig::from_request(&req).unwrap_err();
        assert_eq!(err, ConfigValidationError::new("simulation.num_runs", "Too large"));
    }

    #[test]
    fn first_failure_wins() {
        let mut req = request();
        req["decision"]["price"] = json!(-1.0);
        req["uncertainty"]["demand_noise"]["distribution"] = json!("uniform");
        assert_eq!(field_of(&req), "decision.price");
    }

    #[test]
    fn sigma_checked_before_distribution() {
        let mut req = request();
        req["uncertainty"]["elasticity_noise"]["sigma"] = json!(0.0);
        req["uncertainty"]["demand_noise"]["distribution"] = json!("uniform");
        assert_eq!(field_of(&req), "uncertainty.elasticity_noise.sigma");
    }

    #[test]
    fn elasticity_sigma_bound_is_inclusive() {
        let mut req = request();
        req["uncertainty"]["elasticity_noise"]["sigma"] = json!(0.5);
        assert!(PricingSimulationConfig::from_request(&req).is_ok());
    }

    #[test]
    fn non_string_distribution_is_unsupported() {
        let mut req = request();
        req["uncertainty"]["demand_noise"]["distribution"] = json!(3);
        let err = PricingSimulationConfig::from_request(&req).unwrap_err();
        assert_eq!(err.field, "uncertainty.demand_noise.distribution");
        assert_eq!(err.message, "Unsupported distribution");
    }

    #[test]
    fn missing_uncertainty_block() {
        let mut req = request();
        req.as_object_mut().unwrap().remove("uncertainty");
        assert_eq!(field_of(&req), "uncertainty");
    }

    #[test]
    fn range_and_perturbation_extras() {
        let mut req = request();
        assert_eq!(perturbation_from_request(&req).unwrap(), DEFAULT_PERTURBATION);
        req["perturbation"] = json!(0.25);
        assert_eq!(perturbation_from_request(&req).unwrap(), 0.25);

        assert_eq!(
            price_range_from_request(&req).unwrap_err().field,
            "range.min_price"
        );
        req["range"] = json!({ "min_price": 1, "max_price": 50, "step": 2 });
        assert_eq!(
            price_range_from_request(&req).unwrap(),
            PriceRange { min_price: 1.0, max_price: 50.0, step: 2.0 }
        );
    }

    #[test]
    fn explicit_price_list_wins() {
        let mut req = request();
        req["range"] = json!({ "prices": [8, "9.5", 11.0], "min_price": 1 });
        assert_eq!(
            price_selection_from_request(&req).unwrap(),
            PriceSelection::List(vec![8.0, 9.5, 11.0])
        );

        req["range"]["prices"] = json!([8, "cheap"]);
        let err = price_selection_from_request(&req).unwrap_err();
        assert_eq!(err.field, "range.prices.1");
    }
}
