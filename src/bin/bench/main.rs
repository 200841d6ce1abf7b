// Pricing Risk Bench v0.1.0 - Monte Carlo risk report for pricing decisions
// Seedable ChaCha8 stream per run, sensitivity ranking, common-random-number price sweeps
//
// Usage:
//   cargo run --release --bin risk-bench                          # All built-in scenarios
//   cargo run --release --bin risk-bench -- --runs 200            # Quick mode
//   cargo run --release --bin risk-bench -- THIN_MARGIN           # Filter by name
//   cargo run --release --bin risk-bench -- --config request.json # Run a request file
//   cargo run --release --bin risk-bench -- --trials-jsonl        # Per-trial JSONL output
//   cargo run --release --bin risk-bench -- --min-price 5 --max-price 20 --step 0.25

mod report;
mod scenarios;
mod monte_carlo;
mod trials;

use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use pricing_risk_engine::compare::SweepMode;
use pricing_risk_engine::config::DEFAULT_PERTURBATION;
use report::*;
use scenarios::*;
use std::path::PathBuf;
use std::time::{Instant, SystemTime, UNIX_EPOCH};
use tracing_subscriber::EnvFilter;

// ─── CLI Parsing ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    MonteCarlo,
    Deterministic,
}

impl From<Mode> for SweepMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::MonteCarlo => SweepMode::MonteCarlo,
            Mode::Deterministic => SweepMode::Deterministic,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "risk-bench")]
#[command(about = "Monte Carlo risk report for pricing decisions")]
struct Args {
    /// Only run scenarios whose name, label or category contains this text
    filter: Option<String>,

    /// Override the number of Monte Carlo trials per run
    #[arg(long)]
    runs: Option<usize>,

    /// Override the random seed
    #[arg(long, allow_hyphen_values = true)]
    seed: Option<i64>,

    /// Run a nested JSON request file instead of the built-in scenarios
    #[arg(long)]
    config: Option<PathBuf>,

    /// Relative change applied to each assumption in the sensitivity pass
    #[arg(long, default_value_t = DEFAULT_PERTURBATION)]
    perturbation: f64,

    /// Override the lower bound of the price sweep
    #[arg(long)]
    min_price: Option<f64>,

    /// Override the upper bound of the price sweep
    #[arg(long)]
    max_price: Option<f64>,

    /// Override the price sweep step
    #[arg(long)]
    step: Option<f64>,

    /// Evaluation used at each price of the sweep
    #[arg(long, value_enum, default_value_t = Mode::MonteCarlo)]
    mode: Mode,

    /// Write every trial of each base run as JSONL
    #[arg(long)]
    trials_jsonl: bool,

    /// Directory for the JSON report
    #[arg(long, default_value = "benchmark-results")]
    output_dir: PathBuf,

    /// Log level (debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_scenarios(args: &Args) -> anyhow::Result<Vec<Scenario>> {
    if let Some(path) = &args.config {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let request = serde_json::from_str(&text)
            .with_context(|| format!("{} is not valid JSON", path.display()))?;
        return Ok(vec![from_request_file(path, request)]);
    }

    let all = scenarios();
    Ok(match &args.filter {
        Some(f) => {
            let f_lower = f.to_lowercase();
            all.into_iter()
                .filter(|s| s.name.to_lowercase().contains(&f_lower)
                          || s.label.to_lowercase().contains(&f_lower)
                          || s.category.to_lowercase().contains(&f_lower))
                .collect()
        }
        None => all,
    })
}

// ─── Main ───────────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level);

    let to_run = load_scenarios(&args)?;
    if to_run.is_empty() {
        bail!("no scenarios match filter: {:?}", args.filter);
    }

    let trials_dir = args.trials_jsonl.then(|| args.output_dir.join("trials"));
    let opts = monte_carlo::RunOptions {
        runs: args.runs,
        seed: args.seed,
        perturbation: args.perturbation,
        sweep: (args.min_price, args.max_price, args.step),
        mode: args.mode.into(),
        trials_dir: trials_dir.as_deref(),
    };

    println!("\n  Pricing Risk Bench v0.1.0");
    println!("  PRNG: ChaCha8Rng | Perturbation: {:.0}% | Sweep: {:?}",
        args.perturbation * 100.0, args.mode);
    println!("  Running {} scenario(s)...\n", to_run.len());
    println!("  {:<34} {:>12} {:>10} {:>7} {:>9} {:>9} {:>16} {:>6}",
        "Scenario", "Mean", "Std", "Loss%", "p*", "Sweep p*", "Top driver", "Time");
    println!("  {}", "-".repeat(114));

    let suite_start = Instant::now();
    let mut reports = Vec::new();
    let mut failures = Vec::new();

    for scenario in &to_run {
        match monte_carlo::run_scenario(scenario, &opts) {
            Ok(report) => {
                let top = report.sensitivity.first()
                    .map(|e| e.assumption.as_str())
                    .unwrap_or("-");
                println!("  {:<34} {:>12.2} {:>10.2} {:>6.1}% {:>9.2} {:>9.2} {:>16} {:>4}ms  {}",
                    report.label,
                    report.mean_profit,
                    report.std_profit,
                    report.prob_loss * 100.0,
                    report.analytical_optimal_price,
                    report.sweep.optimal_price,
                    top,
                    report.elapsed_ms,
                    if report.pass { "PASS" } else { "FAIL" },
                );
                reports.push(report);
            }
            Err(failure) => {
                tracing::error!(scenario = %failure.scenario_name, field = ?failure.field,
                    message = %failure.message, "scenario failed");
                println!("  {:<34} ERROR {}", scenario.label, failure.message);
                failures.push(failure);
            }
        }
    }

    // ─── Summary ────────────────────────────────────────────────────────

    let total = to_run.len();
    let passed = reports.iter().filter(|r| r.pass).count();
    let errored = failures.len();
    let failed = total - passed;

    println!("  {}", "-".repeat(114));
    println!("  Total: {}  Passed: {}  Failed: {}  Errored: {}  Suite time: {:.1}s\n",
        total, passed, failed - errored, errored, suite_start.elapsed().as_secs_f64());

    // ─── Write JSON Report ──────────────────────────────────────────────

    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is before the unix epoch")?
        .as_millis()
        .to_string();

    let report = BenchReport {
        timestamp: timestamp.clone(),
        version: "0.1.0",
        prng: "ChaCha8Rng",
        perturbation: args.perturbation,
        sweep_mode: format!("{:?}", args.mode),
        summary: Summary { total, passed, failed: failed - errored, errored },
        scenarios: reports,
        failures,
    };

    std::fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("failed to create {}", args.output_dir.display()))?;
    let path = args.output_dir.join(format!("risk-{}.json", timestamp));
    let json = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
    std::fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
    println!("  Results saved to: {}\n", path.display());

    if failed > 0 {
        std::process::exit(1);
    }
    Ok(())
}
