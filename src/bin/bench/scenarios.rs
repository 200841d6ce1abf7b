// Scenario Definitions - built-in pricing cases for the risk bench
// Each scenario is a plain nested request, identical to what the WASM boundary receives

use serde_json::{json, Value};

// ─── Scenario Configuration ─────────────────────────────────────────────────

pub struct Scenario {
    pub name: String,
    pub label: String,
    pub category: String,
    /// Nested request: decision, assumptions, uncertainty, simulation
    pub request: Value,
    /// Sweep bounds (min_price, max_price, step)
    pub sweep: (f64, f64, f64),
    pub criteria: PassCriteria,
}

#[derive(Default)]
pub struct PassCriteria {
    /// Largest acceptable probability of a loss at the decided price
    pub max_prob_loss: Option<f64>,
    /// Smallest acceptable mean profit at the decided price
    pub min_mean_profit: Option<f64>,
}

struct Market {
    price: f64,
    base_demand: f64,
    elasticity: f64,
    unit_cost: f64,
    fixed_cost: f64,
}

struct Noise {
    demand: (&'static str, f64),
    elasticity: (&'static str, f64),
}

fn request(m: Market, n: Noise, num_runs: u64, seed: i64) -> Value {
    json!({
        "decision": { "price": m.price },
        "assumptions": {
            "demand_model": { "base_demand": m.base_demand, "price_elasticity": m.elasticity },
            "cost_model": { "unit_cost": m.unit_cost, "fixed_cost": m.fixed_cost }
        },
        "uncertainty": {
            "demand_noise": { "distribution": n.demand.0, "sigma": n.demand.1 },
            "elasticity_noise": { "distribution": n.elasticity.0, "sigma": n.elasticity.1 }
        },
        "simulation": { "num_runs": num_runs, "random_seed": seed }
    })
}

fn scenario(
    name: &str,
    label: &str,
    category: &str,
    request: Value,
    sweep: (f64, f64, f64),
    criteria: PassCriteria,
) -> Scenario {
    Scenario {
        name: name.to_string(),
        label: label.to_string(),
        category: category.to_string(),
        request,
        sweep,
        criteria,
    }
}

// ─── Scenario Definitions ───────────────────────────────────────────────────

pub fn scenarios() -> Vec<Scenario> {
    vec![
        // ─── Baselines ──────────────────────────────────────────────────
        scenario("RISK_DEFAULT", "Risk Dashboard Default", "baseline",
            request(
                Market { price: 15.0, base_demand: 100.0, elasticity: 0.1, unit_cost: 3.0, fixed_cost: 50.0 },
                Noise { demand: ("normal", 0.1), elasticity: ("normal", 0.02) },
                1000, 42),
            (1.0, 50.0, 2.0),
            PassCriteria { max_prob_loss: Some(0.05), ..Default::default() }),
        scenario("ANALYTICAL_OPTIMUM", "Analytical Optimum (p* = 10)", "baseline",
            request(
                Market { price: 10.0, base_demand: 500.0, elasticity: 0.2, unit_cost: 5.0, fixed_cost: 100.0 },
                Noise { demand: ("lognormal", 0.05), elasticity: ("lognormal", 0.05) },
                1000, 7),
            (5.0, 15.0, 0.25),
            PassCriteria { min_mean_profit: Some(0.0), ..Default::default() }),

        // ─── Uncertainty Stress ─────────────────────────────────────────
        scenario("WIDE_DEMAND", "Wide Demand Uncertainty", "stress",
            request(
                Market { price: 13.0, base_demand: 100.0, elasticity: 0.1, unit_cost: 3.0, fixed_cost: 50.0 },
                Noise { demand: ("lognormal", 0.6), elasticity: ("normal", 0.1) },
                2000, 1),
            (1.0, 40.0, 1.0),
            PassCriteria::default()),
        scenario("ELASTICITY_EDGE", "Elasticity Noise at Bound", "stress",
            request(
                Market { price: 13.0, base_demand: 100.0, elasticity: 0.1, unit_cost: 3.0, fixed_cost: 50.0 },
                Noise { demand: ("normal", 0.1), elasticity: ("normal", 0.5) },
                2000, 2),
            (1.0, 40.0, 1.0),
            PassCriteria::default()),
        scenario("THIN_MARGIN", "Thin Margin, High Fixed Cost", "stress",
            request(
                Market { price: 4.0, base_demand: 200.0, elasticity: 0.15, unit_cost: 3.5, fixed_cost: 80.0 },
                Noise { demand: ("normal", 0.2), elasticity: ("lognormal", 0.1) },
                1000, 3),
            (3.5, 20.0, 0.5),
            PassCriteria::default()),

        // ─── Premium Positioning ────────────────────────────────────────
        scenario("PREMIUM_LOW_ELASTICITY", "Premium, Low Elasticity", "positioning",
            request(
                Market { price: 60.0, base_demand: 40.0, elasticity: 0.02, unit_cost: 12.0, fixed_cost: 300.0 },
                Noise { demand: ("lognormal", 0.2), elasticity: ("lognormal", 0.15) },
                1500, 11),
            (20.0, 120.0, 5.0),
            PassCriteria { max_prob_loss: Some(0.25), ..Default::default() }),
    ]
}

/// Load a scenario from a request file. The file may carry optional `name`,
/// `range` and `max_prob_loss` keys alongside the request itself.
pub fn from_request_file(path: &std::path::Path, request: Value) -> Scenario {
    let name = request
        .get("name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| {
            path.file_stem()
                .map(|s| s.to_string_lossy().to_uppercase())
                .unwrap_or_else(|| "CUSTOM".to_string())
        });
    let range = |key: &str, default: f64| {
        request
            .pointer(&format!("/range/{key}"))
            .and_then(Value::as_f64)
            .unwrap_or(default)
    };
    let price = request.pointer("/decision/price").and_then(Value::as_f64).unwrap_or(10.0);
    let sweep = (
        range("min_price", (price * 0.25).max(0.01)),
        range("max_price", price * 2.0),
        range("step", (price * 0.05).max(0.01)),
    );
    let criteria = PassCriteria {
        max_prob_loss: request.get("max_prob_loss").and_then(Value::as_f64),
        min_mean_profit: None,
    };
    Scenario {
        label: name.clone(),
        name,
        category: "custom".to_string(),
        request,
        sweep,
        criteria,
    }
}
