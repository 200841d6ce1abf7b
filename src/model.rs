// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Causal pricing model.
//!
//! Deterministic map from a price decision and economic parameters to a
//! financial outcome under exponential demand:
//!
//! ```text
//! demand     = base_demand * exp(-price_elasticity * price)
//! revenue    = price * demand
//! total_cost = fixed_cost + unit_cost * demand
//! profit     = revenue - total_cost
//! ```

use crate::types::{PricingDecision, PricingOutcome, PricingParameters, PricingSimulationConfig};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from model evaluation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("{quantity} must be {requirement} (got {value})")]
    Domain {
        quantity: &'static str,
        value: f64,
        requirement: &'static str,
    },

    #[error("numerical instability: {quantity} is not finite")]
    NumericalInstability { quantity: &'static str },
}

fn require(
    quantity: &'static str,
    value: f64,
    requirement: &'static str,
    ok: bool,
) -> Result<(), ModelError> {
    if ok {
        Ok(())
    } else {
        Err(ModelError::Domain { quantity, value, requirement })
    }
}

fn finite(quantity: &'static str, value: f64) -> Result<f64, ModelError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ModelError::NumericalInstability { quantity })
    }
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Evaluate one pricing scenario. No randomness, no side effects.
///
/// Preconditions are enforced as [`ModelError::Domain`]. Each computed
/// quantity is checked for finiteness before it feeds the next one.
pub fn evaluate(
    decision: &PricingDecision,
    params: &PricingParameters,
) -> Result<PricingOutcome, ModelError> {
    let price = decision.price;
    // NaN fails every comparison, so these also reject NaN inputs.
    require("price", price, "> 0", price > 0.0)?;
    require("base_demand", params.base_demand, ">= 0", params.base_demand >= 0.0)?;
    require(
        "price_elasticity",
        params.price_elasticity,
        "> 0",
        params.price_elasticity > 0.0,
    )?;
    require("unit_cost", params.unit_cost, ">= 0", params.unit_cost >= 0.0)?;
    require("fixed_cost", params.fixed_cost, ">= 0", params.fixed_cost >= 0.0)?;

    let demand = params.base_demand * (-params.price_elasticity * price).exp();
    let demand = finite("demand", demand)?.max(0.0);

    let revenue = finite("revenue", price * demand)?;
    let total_cost = finite("total_cost", params.fixed_cost + params.unit_cost * demand)?;
    let profit = finite("profit", revenue - total_cost)?;

    Ok(PricingOutcome {
        demand,
        revenue,
        total_cost,
        profit,
    })
}

/// Noise-free evaluation of a config's decision at its nominal parameters.
pub fn evaluate_from_config(config: &PricingSimulationConfig) -> Result<PricingOutcome, ModelError> {
    evaluate(&config.decision(), &config.parameters())
}

/// Closed-form profit-maximising price for exponential demand: `c + 1/k`.
pub fn analytical_optimal_price(unit_cost: f64, price_elasticity: f64) -> Result<f64, ModelError> {
    require("unit_cost", unit_cost, ">= 0", unit_cost >= 0.0)?;
    require("price_elasticity", price_elasticity, "> 0", price_elasticity > 0.0)?;
    finite("optimal_price", unit_cost + 1.0 / price_elasticity)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params(base_demand: f64, price_elasticity: f64, unit_cost: f64, fixed_cost: f64) -> PricingParameters {
        PricingParameters {
            base_demand,
            price_elasticity,
            unit_cost,
            fixed_cost,
        }
    }

    fn at(price: f64) -> PricingDecision {
        PricingDecision { price }
    }

    #[test]
    fn closed_form_evaluation() {
        let outcome = evaluate(&at(10.0), &params(100.0, 0.1, 3.0, 50.0)).unwrap();

        let demand = 100.0 * (-1.0_f64).exp();
        assert_relative_eq!(outcome.demand, demand, max_relative = 1e-12);
        assert_relative_eq!(outcome.revenue, 10.0 * demand, max_relative = 1e-12);
        assert_relative_eq!(outcome.total_cost, 50.0 + 3.0 * demand, max_relative = 1e-12);
        assert_relative_eq!(outcome.profit, 7.0 * demand - 50.0, max_relative = 1e-12);

        assert_relative_eq!(outcome.demand, 36.788, epsilon = 1e-3);
        assert_relative_eq!(outcome.revenue, 367.88, epsilon = 1e-2);
        assert_relative_eq!(outcome.total_cost, 160.36, epsilon = 1e-2);
        assert_relative_eq!(outcome.profit, 207.51, epsilon = 1e-2);
    }

    #[test]
    fn outcome_identities_hold() {
        let p = params(150.0, 0.2, 4.0, 30.0);
        let o = evaluate(&at(12.0), &p).unwrap();
        assert_eq!(o.profit, o.revenue - o.total_cost);
        assert_eq!(o.revenue, 12.0 * o.demand);
        assert_eq!(o.total_cost, p.fixed_cost + p.unit_cost * o.demand);
    }

    #[test]
    fn zero_price_is_domain_error() {
        let err = evaluate(&at(0.0), &params(100.0, 0.1, 3.0, 50.0)).unwrap_err();
        assert!(matches!(err, ModelError::Domain { quantity: "price", .. }));
    }

    #[test]
    fn negative_elasticity_is_domain_error() {
        let err = evaluate(&at(10.0), &params(100.0, -0.5, 3.0, 50.0)).unwrap_err();
        assert!(matches!(err, ModelError::Domain { quantity: "price_elasticity", .. }));
    }

    #[test]
    fn negative_costs_are_domain_errors() {
        let err = evaluate(&at(10.0), &params(100.0, 0.1, -1.0, 50.0)).unwrap_err();
        assert!(matches!(err, ModelError::Domain { quantity: "unit_cost", .. }));
        let err = evaluate(&at(10.0), &params(100.0, 0.1, 1.0, -50.0)).unwrap_err();
        assert!(matches!(err, ModelError::Domain { quantity: "fixed_cost", .. }));
        let err = evaluate(&at(10.0), &params(-1.0, 0.1, 1.0, 50.0)).unwrap_err();
        assert!(matches!(err, ModelError::Domain { quantity: "base_demand", .. }));
    }

    #[test]
    fn nan_inputs_are_rejected() {
        assert!(evaluate(&at(f64::NAN), &params(100.0, 0.1, 3.0, 50.0)).is_err());
        assert!(evaluate(&at(10.0), &params(f64::NAN, 0.1, 3.0, 50.0)).is_err());
    }

    #[test]
    fn overflowing_demand_is_reported_before_revenue() {
        let err = evaluate(&at(1.0), &params(f64::INFINITY, 0.1, 0.0, 0.0)).unwrap_err();
        assert_eq!(err, ModelError::NumericalInstability { quantity: "demand" });

        let err = evaluate(&at(1e300), &params(1e300, 1e-300, 0.0, 0.0)).unwrap_err();
        assert_eq!(err, ModelError::NumericalInstability { quantity: "revenue" });

        let err = evaluate(&at(1.0), &params(1e300, 1e-300, 1e300, 0.0)).unwrap_err();
        assert_eq!(err, ModelError::NumericalInstability { quantity: "total_cost" });
    }

    #[test]
    fn large_price_stays_finite() {
        let o = evaluate(&at(1000.0), &params(100.0, 0.01, 2.0, 10.0)).unwrap();
        assert!(o.demand.is_finite() && o.revenue.is_finite());
        assert!(o.total_cost.is_finite() && o.profit.is_finite());
        assert!(o.demand >= 0.0);
    }

    #[test]
    fn deterministic_behavior() {
        let p = params(90.0, 0.25, 3.0, 25.0);
        let first = evaluate(&at(8.0), &p).unwrap();
        for _ in 0..10 {
            assert_eq!(evaluate(&at(8.0), &p).unwrap(), first);
        }
    }

    #[test]
    fn analytical_optimum_beats_neighbours() {
        let p = params(500.0, 0.2, 5.0, 100.0);
        let optimum = analytical_optimal_price(p.unit_cost, p.price_elasticity).unwrap();
        assert_relative_eq!(optimum, 10.0);

        let profit = |price: f64| evaluate(&at(price), &p).unwrap().profit;
        let eps = 1e-4;
        assert!(profit(optimum) >= profit(optimum - eps));
        assert!(profit(optimum) >= profit(optimum + eps));

        // Strictly decreasing away from the optimum.
        assert!(profit(optimum) > profit(optimum - 0.5));
        assert!(profit(optimum) > profit(optimum + 0.5));
        assert!(profit(optimum - 0.5) > profit(optimum - 1.0));
        assert!(profit(optimum + 0.5) > profit(optimum + 1.0));
    }

    #[test]
    fn analytical_price_rejects_bad_elasticity() {
        assert!(analytical_optimal_price(1.0, 0.0).is_err());
        assert!(analytical_optimal_price(-1.0, 0.5).is_err());
        let price = analytical_optimal_price(1.0, 0.5).unwrap();
        assert!(price > 0.0 && price.is_finite());
    }
}
