use rand::Rng;
use crate::encoding::{MemoryLayout, StrategyEncoding};
use crate::error::{check_nonzero, ConfigError};
use crate::fitness_calculator::FitnessCalculator;
use crate::local_search::{
    log_finished, poll, sort_descending, Incumbent, Optimizer, SearchResult, SearchStats,
    TerminationReason,
};
use crate::monitor::{Progress, SearchMonitor, SearchPlan};
use crate::neighbor::{NeighborGenerator, RandomBitFlip};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BeamConfig {
    pub num_iterations: usize,
    pub beam_width: usize,
    pub layout: MemoryLayout,
}

impl Default for BeamConfig {
    fn default() -> Self {
        BeamConfig {
            num_iterations: 16,
            beam_width: 8,
            layout: MemoryLayout::CANONICAL,
        }
    }
}

impl BeamConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_nonzero("num_iterations", self.num_iterations)?;
        check_nonzero("beam_width", self.beam_width)
    }
}

/// Local beam search: `k` walkers that pool their neighbors, so good regions
/// attract the whole beam.
#[derive(Clone, Debug)]
pub struct LocalBeamSearch<F, N = RandomBitFlip> {
    config: BeamConfig,
    fitness_calculator: F,
    neighbors: N,
}

impl<F: FitnessCalculator> LocalBeamSearch<F> {
    pub fn new(config: BeamConfig, fitness_calculator: F) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(LocalBeamSearch {
            config,
            fitness_calculator,
            neighbors: RandomBitFlip::default(),
        })
    }
}

impl<F, N> LocalBeamSearch<F, N> {
    pub fn with_neighbor_generator<M: NeighborGenerator>(self, neighbors: M) -> LocalBeamSearch<F, M> {
        LocalBeamSearch {
            config: self.config,
            fitness_calculator: self.fitness_calculator,
            neighbors,
        }
    }

    pub fn config(&self) -> &BeamConfig {
        &self.config
    }
}

impl<F: FitnessCalculator, N: NeighborGenerator> Optimizer for LocalBeamSearch<F, N> {
    fn name(&self) -> &'static str {
        "LocalBeamSearch"
    }

    fn optimize<R: Rng + ?Sized>(&self, rng: &mut R, monitor: &mut dyn SearchMonitor) -> SearchResult {
        let k = self.config.beam_width;
        monitor.on_enter_search(&SearchPlan {
            engine: self.name(),
            restarts: 1,
            iterations: Some(self.config.num_iterations),
        });
        monitor.on_restart(0);
        let mut stats = SearchStats {
            restarts: 1,
            ..SearchStats::default()
        };
        let mut incumbent = Incumbent::new();

        let starts: Vec<StrategyEncoding> = (0..k)
            .map(|_| StrategyEncoding::random(self.config.layout, rng))
            .collect();
        let scores = self.fitness_calculator.calculate_fitnesses(&starts);
        stats.evaluations += starts.len();
        let mut beam: Vec<_> = starts.into_iter().zip(scores).collect();
        sort_descending(&mut beam);
        incumbent.offer(&beam[0].0, beam[0].1);

        for iteration in 0..self.config.num_iterations {
            let mut candidates = Vec::with_capacity(beam.len() * k);
            for (member, _) in &beam {
                for _ in 0..k {
                    candidates.push(self.neighbors.neighbor(member, rng));
                }
            }
            let scores = self.fitness_calculator.calculate_fitnesses(&candidates);
            stats.evaluations += candidates.len();

            beam.extend(candidates.into_iter().zip(scores));
            sort_descending(&mut beam);
            beam.truncate(k);
            incumbent.offer(&beam[0].0, beam[0].1);
            stats.iterations += 1;
            stats.checkpoints.push(beam[0].1);

            monitor.on_step(&Progress {
                restart: 0,
                iteration,
                current_fitness: beam[0].1,
                best_fitness: incumbent.fitness(),
            });
            if let Some(reason) = poll(monitor) {
                stats.termination = TerminationReason::Aborted(reason);
                break;
            }
        }

        monitor.on_exit_search();
        let result = incumbent.into_result(stats);
        log_finished(self.name(), &result);
        result
    }
}
