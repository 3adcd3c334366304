use rand::Rng;
use crate::encoding::{MemoryLayout, StrategyEncoding};
use crate::error::{check_nonzero, ConfigError};
use crate::fitness_calculator::FitnessCalculator;
use crate::local_search::{
    log_finished, poll, Incumbent, Optimizer, SearchResult, SearchStats, TerminationReason,
};
use crate::monitor::{Progress, SearchMonitor, SearchPlan};
use crate::neighbor::{NeighborGenerator, RandomBitFlip};

/// Probability of accepting a move that lowers fitness by `-delta`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AcceptanceRule {
    /// `exp(delta / t)`.
    #[default]
    Metropolis,
    /// `exp(delta)`, ignoring the temperature. Reproduces historical runs.
    Unnormalized,
}

impl AcceptanceRule {
    pub fn probability(self, delta: f64, temperature: f64) -> f64 {
        match self {
            AcceptanceRule::Metropolis => (delta / temperature).exp(),
            AcceptanceRule::Unnormalized => delta.exp(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnnealingConfig {
    pub num_restarts: usize,
    pub temperature: f64,
    pub cooling_factor: f64,
    /// The walk stops once the temperature is no longer above this.
    pub stop_temperature: f64,
    pub acceptance: AcceptanceRule,
    pub layout: MemoryLayout,
}

impl Default for AnnealingConfig {
    fn default() -> Self {
        AnnealingConfig {
            num_restarts: 5,
            temperature: 100.0,
            cooling_factor: 0.99,
            stop_temperature: 0.1,
            acceptance: AcceptanceRule::Metropolis,
            layout: MemoryLayout::CANONICAL,
        }
    }
}

impl AnnealingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_nonzero("num_restarts", self.num_restarts)?;
        if !(self.cooling_factor > 0.0 && self.cooling_factor < 1.0) {
            return Err(ConfigError::OutOfRange {
                name: "cooling_factor",
                value: self.cooling_factor,
                range: "(0, 1)",
            });
        }
        if !(self.temperature.is_finite() && self.temperature > 0.0) {
            return Err(ConfigError::OutOfRange {
                name: "temperature",
                value: self.temperature,
                range: "(0, inf)",
            });
        }
        if !(self.stop_temperature.is_finite() && self.stop_temperature > 0.0) {
            return Err(ConfigError::OutOfRange {
                name: "stop_temperature",
                value: self.stop_temperature,
                range: "(0, inf)",
            });
        }
        Ok(())
    }

    /// Number of cooling steps one restart takes.
    pub fn steps_per_restart(&self) -> usize {
        let mut temperature = self.temperature;
        let mut steps = 0;
        while temperature > self.stop_temperature {
            temperature *= self.cooling_factor;
            steps += 1;
        }
        steps
    }
}

/// Simulated annealing with random restarts.
///
/// Each step proposes one neighbor. Improvements and ties are always taken;
/// a worse neighbor is taken with the probability given by the
/// `AcceptanceRule`. Every evaluated point competes for the returned best,
/// so a walk that later drifts away from a good point still reports it.
#[derive(Clone, Debug)]
pub struct SimulatedAnnealing<F, N = RandomBitFlip> {
    config: AnnealingConfig,
    fitness_calculator: F,
    neighbors: N,
}

impl<F: FitnessCalculator> SimulatedAnnealing<F> {
    pub fn new(config: AnnealingConfig, fitness_calculator: F) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(SimulatedAnnealing {
            config,
            fitness_calculator,
            neighbors: RandomBitFlip::default(),
        })
    }
}

impl<F, N> SimulatedAnnealing<F, N> {
    pub fn with_neighbor_generator<M: NeighborGenerator>(
        self,
        neighbors: M,
    ) -> SimulatedAnnealing<F, M> {
        SimulatedAnnealing {
            config: self.config,
            fitness_calculator: self.fitness_calculator,
            neighbors,
        }
    }

    pub fn config(&self) -> &AnnealingConfig {
        &self.config
    }
}

impl<F: FitnessCalculator, N: NeighborGenerator> Optimizer for SimulatedAnnealing<F, N> {
    fn name(&self) -> &'static str {
        "SimulatedAnnealing"
    }

    fn optimize<R: Rng + ?Sized>(&self, rng: &mut R, monitor: &mut dyn SearchMonitor) -> SearchResult {
        let config = &self.config;
        monitor.on_enter_search(&SearchPlan {
            engine: self.name(),
            restarts: config.num_restarts,
            iterations: Some(config.steps_per_restart()),
        });
        let mut stats = SearchStats::default();
        let mut incumbent = Incumbent::new();

        'restarts: for restart in 0..config.num_restarts {
            monitor.on_restart(restart);
            let mut current = StrategyEncoding::random(config.layout, rng);
            let mut current_fitness = self.fitness_calculator.calculate_fitness(&current);
            stats.evaluations += 1;
            incumbent.offer(&current, current_fitness);

            let mut temperature = config.temperature;
            let mut iteration = 0;
            while temperature > config.stop_temperature {
                let candidate = self.neighbors.neighbor(&current, rng);
                let candidate_fitness = self.fitness_calculator.calculate_fitness(&candidate);
                stats.evaluations += 1;
                incumbent.offer(&candidate, candidate_fitness);

                let delta = candidate_fitness - current_fitness;
                let accept = delta >= 0.0
                    || rng.gen::<f64>() < config.acceptance.probability(delta, temperature);
                if accept {
                    current = candidate;
                    current_fitness = candidate_fitness;
                }
                temperature *= config.cooling_factor;
                stats.iterations += 1;

                monitor.on_step(&Progress {
                    restart,
                    iteration,
                    current_fitness,
                    best_fitness: incumbent.fitness(),
                });
                iteration += 1;
                if let Some(reason) = poll(monitor) {
                    stats.restarts += 1;
                    stats.checkpoints.push(current_fitness);
                    stats.termination = TerminationReason::Aborted(reason);
                    break 'restarts;
                }
            }

            stats.restarts += 1;
            stats.checkpoints.push(current_fitness);
        }

        monitor.on_exit_search();
        let result = incumbent.into_result(stats);
        log_finished(self.name(), &result);
        result
    }
}
