use rand::Rng;
use crate::encoding::{MemoryLayout, StrategyEncoding};
use crate::error::{check_nonzero, ConfigError};
use crate::fitness_calculator::FitnessCalculator;
use crate::local_search::{
    log_finished, poll, sort_descending, weighted_choice, Incumbent, Optimizer, SearchResult,
    SearchStats, TerminationReason,
};
use crate::monitor::{Progress, SearchMonitor, SearchPlan};
use crate::neighbor::{NeighborGenerator, RandomBitFlip};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HillClimbConfig {
    pub num_restarts: usize,
    pub num_iterations: usize,
    pub layout: MemoryLayout,
}

impl Default for HillClimbConfig {
    fn default() -> Self {
        HillClimbConfig {
            num_restarts: 1,
            num_iterations: 16,
            layout: MemoryLayout::CANONICAL,
        }
    }
}

impl HillClimbConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_nonzero("num_restarts", self.num_restarts)?;
        check_nonzero("num_iterations", self.num_iterations)
    }
}

/// Stochastic hill climbing with random restarts.
///
/// Each iteration scores `L` neighbors of the current point (`L` being the
/// encoding length) together with the point itself, keeps the best `L`, and
/// moves to one of them drawn with weight `(fitness - worst)^2`. A restart
/// ends in whatever point the last iteration chose; the result is the best
/// of those end points.
#[derive(Clone, Debug)]
pub struct HillClimbing<F, N = RandomBitFlip> {
    config: HillClimbConfig,
    fitness_calculator: F,
    neighbors: N,
}

impl<F: FitnessCalculator> HillClimbing<F> {
    pub fn new(config: HillClimbConfig, fitness_calculator: F) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(HillClimbing {
            config,
            fitness_calculator,
            neighbors: RandomBitFlip::default(),
        })
    }
}

impl<F, N> HillClimbing<F, N> {
    pub fn with_neighbor_generator<M: NeighborGenerator>(self, neighbors: M) -> HillClimbing<F, M> {
        HillClimbing {
            config: self.config,
            fitness_calculator: self.fitness_calculator,
            neighbors,
        }
    }

    pub fn config(&self) -> &HillClimbConfig {
        &self.config
    }
}

impl<F: FitnessCalculator, N: NeighborGenerator> Optimizer for HillClimbing<F, N> {
    fn name(&self) -> &'static str {
        "HillClimbing"
    }

    fn optimize<R: Rng + ?Sized>(&self, rng: &mut R, monitor: &mut dyn SearchMonitor) -> SearchResult {
        let plan = ClimbPlan {
            engine: self.name(),
            num_restarts: self.config.num_restarts,
            num_iterations: self.config.num_iterations,
            layout: self.config.layout,
        };
        climb(
            &plan,
            &self.fitness_calculator,
            rng,
            monitor,
            |current: &StrategyEncoding, count: usize, rng: &mut R| {
                (0..count)
                    .map(|_| self.neighbors.neighbor(current, rng))
                    .collect()
            },
        )
    }
}

pub(crate) struct ClimbPlan {
    pub(crate) engine: &'static str,
    pub(crate) num_restarts: usize,
    pub(crate) num_iterations: usize,
    pub(crate) layout: MemoryLayout,
}

/// Restart loop shared by hill climbing and tabu search. `generate` is asked
/// for up to `count` candidates around the current point each iteration.
pub(crate) fn climb<F, R, G>(
    plan: &ClimbPlan,
    fitness_calculator: &F,
    rng: &mut R,
    monitor: &mut dyn SearchMonitor,
    mut generate: G,
) -> SearchResult
where
    F: FitnessCalculator + ?Sized,
    R: Rng + ?Sized,
    G: FnMut(&StrategyEncoding, usize, &mut R) -> Vec<StrategyEncoding>,
{
    monitor.on_enter_search(&SearchPlan {
        engine: plan.engine,
        restarts: plan.num_restarts,
        iterations: Some(plan.num_iterations),
    });
    let width = plan.layout.len();
    let mut stats = SearchStats::default();
    let mut incumbent = Incumbent::new();

    for restart in 0..plan.num_restarts {
        monitor.on_restart(restart);
        let mut current = StrategyEncoding::random(plan.layout, rng);
        let mut current_fitness = fitness_calculator.calculate_fitness(&current);
        stats.evaluations += 1;
        let mut aborted = None;

        for iteration in 0..plan.num_iterations {
            let neighbors = generate(&current, width, rng);
            let scores = fitness_calculator.calculate_fitnesses(&neighbors);
            stats.evaluations += neighbors.len();

            let mut scored: Vec<_> = neighbors.into_iter().zip(scores).collect();
            scored.push((current, current_fitness));
            sort_descending(&mut scored);
            scored.truncate(width);
            let worst = scored.last().map_or(0.0, |(_, f)| *f);
            let weights: Vec<f64> = scored.iter().map(|(_, f)| (f - worst).powi(2)).collect();
            (current, current_fitness) = scored.swap_remove(weighted_choice(&weights, rng));
            stats.iterations += 1;

            monitor.on_step(&Progress {
                restart,
                iteration,
                current_fitness,
                best_fitness: incumbent.fitness().max(current_fitness),
            });
            if let Some(reason) = poll(monitor) {
                aborted = Some(reason);
                break;
            }
        }

        incumbent.offer(&current, current_fitness);
        stats.restarts += 1;
        stats.checkpoints.push(current_fitness);
        if let Some(reason) = aborted {
            stats.termination = TerminationReason::Aborted(reason);
            break;
        }
    }

    monitor.on_exit_search();
    let result = incumbent.into_result(stats);
    log_finished(plan.engine, &result);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fitness_calculator::PoolFitnessCalculator;
    use crate::game::PayoffMatrix;
    use crate::monitor::testing::RecordingMonitor;
    use crate::monitor::NoOpMonitor;
    use crate::strategies::OpponentPool;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn calculator() -> PoolFitnessCalculator {
        PoolFitnessCalculator::new(PayoffMatrix::default(), OpponentPool::standard())
    }

    fn small_config() -> HillClimbConfig {
        HillClimbConfig {
            num_restarts: 2,
            num_iterations: 3,
            layout: MemoryLayout::from_memory_size(21).unwrap(),
        }
    }

    #[test]
    fn test_zero_restarts_or_iterations_rejected() {
        let config = HillClimbConfig {
            num_restarts: 0,
            ..small_config()
        };
        assert_eq!(
            HillClimbing::new(config, calculator()).unwrap_err(),
            ConfigError::Zero("num_restarts")
        );
        let config = HillClimbConfig {
            num_iterations: 0,
            ..small_config()
        };
        assert_eq!(
            HillClimbing::new(config, calculator()).unwrap_err(),
            ConfigError::Zero("num_iterations")
        );
    }

    #[test]
    fn test_result_fitness_is_consistent() {
        let engine = HillClimbing::new(small_config(), calculator()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let result = engine.optimize(&mut rng, &mut NoOpMonitor);
        assert_eq!(result.encoding.len(), 21);
        assert_eq!(calculator().calculate_fitness(&result.encoding), result.fitness);
        assert_eq!(result.stats.restarts, 2);
        assert_eq!(result.stats.iterations, 6);
        assert_eq!(result.stats.evaluations, 2 * (1 + 3 * 21));
        assert_eq!(result.stats.termination, TerminationReason::Completed);
    }

    #[test]
    fn test_same_seed_same_result() {
        let engine = HillClimbing::new(small_config(), calculator()).unwrap();
        let a = engine.optimize(&mut ChaCha8Rng::seed_from_u64(7), &mut NoOpMonitor);
        let b = engine.optimize(&mut ChaCha8Rng::seed_from_u64(7), &mut NoOpMonitor);
        assert_eq!(a, b);
    }

    #[test]
    fn test_best_is_max_over_restart_end_points() {
        let engine = HillClimbing::new(small_config(), calculator()).unwrap();
        let mut monitor = RecordingMonitor::default();
        let result = engine.optimize(&mut ChaCha8Rng::seed_from_u64(3), &mut monitor);
        assert!(monitor.entered && monitor.exited);
        assert_eq!(monitor.restarts, vec![0, 1]);
        let end_points: Vec<f64> = monitor
            .steps
            .iter()
            .filter(|p| p.iteration == 2)
            .map(|p| p.current_fitness)
            .collect();
        assert_eq!(end_points.len(), 2);
        assert_eq!(result.fitness, end_points[0].max(end_points[1]));
        assert_eq!(result.stats.checkpoints, end_points);
    }

    #[test]
    fn test_monitor_can_stop_early() {
        let engine = HillClimbing::new(small_config(), calculator()).unwrap();
        let mut monitor = RecordingMonitor {
            stop_after: Some(2),
            ..Default::default()
        };
        let result = engine.optimize(&mut ChaCha8Rng::seed_from_u64(3), &mut monitor);
        assert_eq!(monitor.steps.len(), 2);
        assert_eq!(result.stats.restarts, 1);
        assert_eq!(
            result.stats.termination,
            TerminationReason::Aborted("step limit".to_string())
        );
        assert_eq!(calculator().calculate_fitness(&result.encoding), result.fitness);
    }
}
