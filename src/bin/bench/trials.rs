// Per-Trial JSONL Recorder
// Outputs one JSON line per Monte Carlo trial for independent analysis

use pricing_risk_engine::PricingOutcome;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Serialize)]
pub struct TrialSnapshot {
    pub trial: usize,
    pub demand: f64,
    pub revenue: f64,
    pub total_cost: f64,
    pub profit: f64,
    pub loss: bool,
}

impl TrialSnapshot {
    pub fn from_outcome(trial: usize, outcome: &PricingOutcome) -> Self {
        Self {
            trial,
            demand: outcome.demand,
            revenue: outcome.revenue,
            total_cost: outcome.total_cost,
            profit: outcome.profit,
            loss: outcome.profit < 0.0,
        }
    }
}

/// Write every outcome of a run to a JSONL file, creating parent dirs.
pub fn write_jsonl(path: &std::path::Path, outcomes: &[PricingOutcome]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    for (trial, outcome) in outcomes.iter().enumerate() {
        let line = serde_json::to_string(&TrialSnapshot::from_outcome(trial, outcome))?;
        writeln!(file, "{}", line)?;
    }
    file.flush()
}
