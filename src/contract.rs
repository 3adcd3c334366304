//! Request and response shapes of the model-generation boundary.
//!
//! A request names how many copies of each baseline to play against and
//! which payoff table to use; the response carries the evolved strategy as a
//! bit string. Transport is left to the caller.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::fitness_calculator::PoolFitnessCalculator;
use crate::game::PayoffMatrix;
use crate::local_search::{AnnealingConfig, Optimizer, SimulatedAnnealing};
use crate::monitor::SearchMonitor;
use crate::strategies::OpponentPool;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ModelRequest {
    pub players: BTreeMap<String, usize>,
    pub payoffs: PayoffMatrix,
}

impl ModelRequest {
    pub fn from_json(json: &str) -> Result<ModelRequest> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelResponse {
    pub model: String,
}

impl ModelResponse {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Annealing settings every request is served with: five restarts from
/// temperature 100 over the 149-bit layout.
pub fn request_annealing_config() -> AnnealingConfig {
    AnnealingConfig::default()
}

/// Evolves a strategy against the requested opponents. Configuration
/// problems are reported before any search work starts.
pub fn serve_model_request<R: Rng + ?Sized>(
    request: &ModelRequest,
    rng: &mut R,
    monitor: &mut dyn SearchMonitor,
) -> Result<ModelResponse> {
    let pool = OpponentPool::from_counts(&request.players)?;
    let fitness = PoolFitnessCalculator::new(request.payoffs, pool);
    let engine = SimulatedAnnealing::new(request_annealing_config(), fitness)?;
    let result = engine.optimize(rng, monitor);
    info!(fitness = result.fitness, "model request served");
    Ok(ModelResponse {
        model: result.bit_string(),
    })
}
