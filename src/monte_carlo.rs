// Copyright (c) 2026 Hypermesh Foundation. All rights reserved.
// Licensed under the Business Source License 1.1.
// See the LICENSE file in the repository root for full license text.

//! Monte Carlo driver.
//!
//! One ChaCha8 stream per run, seeded once from the config. Each trial
//! draws demand noise then elasticity noise, in that order, so a given
//! seed and run count always replays the same outcomes.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::Result;
use crate::model;
use crate::sampler::{enforce_valid_sample, DistributionSampler};
use crate::types::{PricingOutcome, PricingParameters, PricingSimulationConfig};

/// Upper bound on the up-front outcome reservation; longer runs grow the
/// batch as trials complete.
const MAX_PREALLOCATED_TRIALS: usize = 4096;

fn initial_capacity(num_runs: usize) -> usize {
    num_runs.min(MAX_PREALLOCATED_TRIALS)
}

/// Run `config.num_runs` trials. The first failing trial aborts the run.
pub fn run_monte_carlo(config: &PricingSimulationConfig) -> Result<Vec<PricingOutcome>> {
    let mut rng = ChaCha8Rng::seed_from_u64(config.stream_seed());
    let mut sampler = DistributionSampler::new(&mut rng);

    let decision = config.decision();
    let mut outcomes = Vec::with_capacity(initial_capacity(config.num_runs));

    for _ in 0..config.num_runs {
        let demand_noise = sampler.sample(config.demand_noise.distribution, config.demand_noise.sigma)?;
        let elasticity_noise = sampler.sample(
            config.elasticity_noise.distribution,
            config.elasticity_noise.sigma,
        )?;

        let demand_noise = enforce_valid_sample(demand_noise)?;
        let elasticity_noise = enforce_valid_sample(elasticity_noise)?;

        // Costs are never perturbed.
        let params = PricingParameters {
            base_demand: config.base_demand * demand_noise,
            price_elasticity: config.price_elasticity * elasticity_noise,
            unit_cost: config.unit_cost,
            fixed_cost: config.fixed_cost,
        };

        outcomes.push(model::evaluate(&decision, &params)?);
    }

    Ok(outcomes)
}
