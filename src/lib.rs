// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Pricing Risk Engine - Monte Carlo evaluation of pricing decisions

pub mod types;
pub mod config;
pub mod model;
pub mod sampler;
pub mod monte_carlo;
pub mod aggregate;
pub mod results;
pub mod sensitivity;
pub mod compare;
pub mod error;
pub mod api;

pub use types::*;
pub use config::ConfigValidationError;
pub use error::SimulationError;
pub use model::{analytical_optimal_price, evaluate, evaluate_from_config, ModelError};
pub use aggregate::{aggregate, SimulationSummary};
pub use results::{run_simulation, RiskMetrics, SimulationResult};
pub use sensitivity::{rank_assumptions_by_impact, sensitivity_analysis, Assumption};
pub use compare::{compare_pricing_decisions, sweep_prices, sweep_range, PriceSweep, SweepMode};

use serde::Serialize;
use wasm_bindgen::prelude::*;

// ─── WASM Interface ──────────────────────────────────────────────────────────

fn install_panic_hook() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> JsValue {
    // Plain objects rather than ES Maps, so percentile maps read like JSON.
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap_or_else(|e| JsValue::from_str(&e.to_string()))
}

fn respond<T: Serialize>(
    request: JsValue,
    handler: impl FnOnce(&serde_json::Value) -> Result<T, api::ErrorPayload>,
) -> Result<JsValue, JsValue> {
    install_panic_hook();
    let request: serde_json::Value = serde_wasm_bindgen::from_value(request).map_err(|e| {
        to_js(&api::ErrorPayload {
            field: None,
            message: format!("malformed request: {e}"),
        })
    })?;
    handler(&request).map(|body| to_js(&body)).map_err(|err| to_js(&err))
}

/// Noise-free evaluation: `{demand, revenue, total_cost, profit}`.
#[wasm_bindgen]
pub fn simulate(request: JsValue) -> Result<JsValue, JsValue> {
    respond(request, api::simulate)
}

/// Monte Carlo run: `{profits, mean_profit, std_profit, prob_loss, profit_percentiles}`.
#[wasm_bindgen]
pub fn simulate_monte_carlo(request: JsValue) -> Result<JsValue, JsValue> {
    respond(request, api::simulate_monte_carlo)
}

/// Price sweep: `{curve, optimal_price, max_profit}`.
#[wasm_bindgen]
pub fn simulate_range(request: JsValue) -> Result<JsValue, JsValue> {
    respond(request, api::simulate_range)
}

/// Ranked one-at-a-time sensitivity of mean profit.
#[wasm_bindgen]
pub fn sensitivity(request: JsValue) -> Result<JsValue, JsValue> {
    respond(request, api::sensitivity)
}
