use rand::Rng;
use tracing::debug;

use crate::encoding::{MemoryLayout, StrategyEncoding};
use crate::error::{check_nonzero, ConfigError};
use crate::fitness_calculator::FitnessCalculator;
use crate::local_search::hill_climb::{climb, ClimbPlan};
use crate::local_search::{Optimizer, SearchResult};
use crate::lru_cache::LruCache;
use crate::monitor::SearchMonitor;
use crate::neighbor::{NeighborGenerator, RandomBitFlip};

/// How many extra perturbations a colliding neighbor gets before it is
/// dropped from the iteration's candidate list.
pub const MAX_REPERTURBATIONS: usize = 64;

pub type VisitedSet = LruCache<StrategyEncoding, usize>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TabuConfig {
    pub num_restarts: usize,
    pub num_iterations: usize,
    pub tabu_capacity: usize,
    pub layout: MemoryLayout,
}

impl Default for TabuConfig {
    fn default() -> Self {
        TabuConfig {
            num_restarts: 1,
            num_iterations: 16,
            tabu_capacity: 10_000,
            layout: MemoryLayout::CANONICAL,
        }
    }
}

impl TabuConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_nonzero("num_restarts", self.num_restarts)?;
        check_nonzero("num_iterations", self.num_iterations)?;
        check_nonzero("tabu_capacity", self.tabu_capacity)
    }
}

/// Hill climbing that refuses to regenerate recently visited encodings.
///
/// Every expanded point and every generated candidate enters a
/// least-recently-used visited set of `tabu_capacity` entries. A fresh neighbor that is already in the set is
/// perturbed again, up to `MAX_REPERTURBATIONS` times; if it still
/// collides it is dropped. The set lives for one `optimize` call and is
/// shared by all of its restarts.
#[derive(Clone, Debug)]
pub struct TabuSearch<F, N = RandomBitFlip> {
    config: TabuConfig,
    fitness_calculator: F,
    neighbors: N,
}

impl<F: FitnessCalculator> TabuSearch<F> {
    pub fn new(config: TabuConfig, fitness_calculator: F) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(TabuSearch {
            config,
            fitness_calculator,
            neighbors: RandomBitFlip::default(),
        })
    }
}

impl<F, N> TabuSearch<F, N> {
    pub fn with_neighbor_generator<M: NeighborGenerator>(self, neighbors: M) -> TabuSearch<F, M> {
        TabuSearch {
            config: self.config,
            fitness_calculator: self.fitness_calculator,
            neighbors,
        }
    }

    pub fn config(&self) -> &TabuConfig {
        &self.config
    }
}

/// Neighbor of `current` that is not in `visited`, or `None` once the retry
/// budget is spent.
pub(crate) fn fresh_neighbor<N, R>(
    generator: &N,
    current: &StrategyEncoding,
    visited: &VisitedSet,
    rng: &mut R,
) -> Option<StrategyEncoding>
where
    N: NeighborGenerator,
    R: Rng + ?Sized,
{
    let mut candidate = generator.neighbor(current, rng);
    for _ in 0..MAX_REPERTURBATIONS {
        if !visited.contains(&candidate) {
            return Some(candidate);
        }
        candidate = generator.neighbor(&candidate, rng);
    }
    (!visited.contains(&candidate)).then_some(candidate)
}

impl<F: FitnessCalculator, N: NeighborGenerator> Optimizer for TabuSearch<F, N> {
    fn name(&self) -> &'static str {
        "TabuSearch"
    }

    fn optimize<R: Rng + ?Sized>(&self, rng: &mut R, monitor: &mut dyn SearchMonitor) -> SearchResult {
        let plan = ClimbPlan {
            engine: self.name(),
            num_restarts: self.config.num_restarts,
            num_iterations: self.config.num_iterations,
            layout: self.config.layout,
        };
        let mut visited = VisitedSet::new(self.config.tabu_capacity);
        let mut generation = 0usize;
        let mut dropped = 0usize;
        let result = climb(
            &plan,
            &self.fitness_calculator,
            rng,
            monitor,
            |current: &StrategyEncoding, count: usize, rng: &mut R| {
                generation += 1;
                // The expanded point is itself visited.
                visited.put(current.clone(), generation);
                let mut candidates = Vec::with_capacity(count);
                for _ in 0..count {
                    match fresh_neighbor(&self.neighbors, current, &visited, rng) {
                        Some(candidate) => {
                            visited.put(candidate.clone(), generation);
                            candidates.push(candidate);
                        }
                        None => dropped += 1,
                    }
                }
                candidates
            },
        );
        if dropped > 0 {
            debug!(engine = self.name(), dropped, "neighbors dropped after repeated collisions");
        }
        result
    }
}
