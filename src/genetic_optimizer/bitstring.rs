use rand::seq::index;
use rand::Rng;

use crate::encoding::StrategyEncoding;
use crate::error::ConfigError;
use crate::fitness_calculator::FitnessCalculator;
use crate::genetic_optimizer::GeneticConfig;
use crate::local_search::{
    log_finished, poll, sort_descending, Incumbent, Optimizer, SearchResult, SearchStats,
    TerminationReason,
};
use crate::monitor::{Progress, SearchMonitor, SearchPlan};

type Population = Vec<(StrategyEncoding, f64)>;

/// Generational genetic algorithm over strategy encodings.
///
/// Offspring come from uniform bit-mask crossover between two parents drawn
/// from the fittest `percent_for_crossover` of the population, and the next
/// generation keeps the fittest `population_size` of parents and offspring
/// together. The reported result is the best individual ever evaluated; with
/// this replacement it is also the best of the final generation.
#[derive(Clone, Debug)]
pub struct GeneticOptimizer<F> {
    config: GeneticConfig,
    fitness_calculator: F,
}

impl<F: FitnessCalculator> GeneticOptimizer<F> {
    pub fn new(config: GeneticConfig, fitness_calculator: F) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(GeneticOptimizer {
            config,
            fitness_calculator,
        })
    }

    pub fn config(&self) -> &GeneticConfig {
        &self.config
    }

    fn evaluate(&self, individuals: Vec<StrategyEncoding>, stats: &mut SearchStats) -> Population {
        let fitnesses = self.fitness_calculator.calculate_fitnesses(&individuals);
        stats.evaluations += individuals.len();
        individuals.into_iter().zip(fitnesses).collect()
    }

    /// `population` must be sorted fittest first.
    fn breed<R: Rng + ?Sized>(&self, population: &Population, rng: &mut R) -> Vec<StrategyEncoding> {
        let parents = &population[..self.config.parent_count()];
        let mut offspring: Vec<StrategyEncoding> = (0..self.config.population_size)
            .map(|_| {
                let mother = &parents[rng.gen_range(0..parents.len())].0;
                let father = &parents[rng.gen_range(0..parents.len())].0;
                mother.crossover(father, rng)
            })
            .collect();

        let mutants = self.config.mutant_count();
        if mutants > 0 && self.config.mutation_count > 0 {
            for i in index::sample(rng, offspring.len(), mutants) {
                offspring[i] = offspring[i].flip_random_bits(self.config.mutation_count, rng);
            }
        }
        offspring
    }
}

fn mean_fitness(population: &Population) -> f64 {
    population.iter().map(|(_, f)| f).sum::<f64>() / population.len() as f64
}

impl<F: FitnessCalculator> Optimizer for GeneticOptimizer<F> {
    fn name(&self) -> &'static str {
        "GeneticOptimizer"
    }

    fn optimize<R: Rng + ?Sized>(&self, rng: &mut R, monitor: &mut dyn SearchMonitor) -> SearchResult {
        monitor.on_enter_search(&SearchPlan {
            engine: self.name(),
            restarts: 1,
            iterations: Some(self.config.num_generations),
        });
        monitor.on_restart(0);
        let mut stats = SearchStats {
            restarts: 1,
            ..SearchStats::default()
        };
        let mut incumbent = Incumbent::new();

        let initial = (0..self.config.population_size)
            .map(|_| StrategyEncoding::random(self.config.layout, rng))
            .collect();
        let mut population = self.evaluate(initial, &mut stats);
        sort_descending(&mut population);
        incumbent.offer(&population[0].0, population[0].1);

        for generation in 0..self.config.num_generations {
            let offspring = self.breed(&population, rng);
            let offspring = self.evaluate(offspring, &mut stats);
            population.extend(offspring);
            sort_descending(&mut population);
            population.truncate(self.config.population_size);
            incumbent.offer(&population[0].0, population[0].1);
            stats.iterations += 1;

            stats.checkpoints.push(population[0].1);
            let mean = mean_fitness(&population);
            monitor.on_step(&Progress {
                restart: 0,
                iteration: generation,
                current_fitness: mean,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::MemoryLayout;
    use crate::fitness_calculator::PoolFitnessCalculator;
    use crate::game::PayoffMatrix;
    use crate::monitor::testing::RecordingMonitor;
    use crate::monitor::NoOpMonitor;
    use crate::strategies::OpponentPool;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn calculator() -> PoolFitnessCalculator {
        PoolFitnessCalculator::new(PayoffMatrix::default(), OpponentPool::standard())
    }

    fn small_config() -> GeneticConfig {
        GeneticConfig {
            population_size: 10,
            num_generations: 8,
            layout: MemoryLayout::from_memory_size(21).unwrap(),
            ..GeneticConfig::default()
        }
    }

    #[test]
    fn test_mean_fitness_never_decreases() {
        let engine = GeneticOptimizer::new(small_config(), calculator()).unwrap();
        let mut monitor = RecordingMonitor::default();
        let result = engine.optimize(&mut StdRng::seed_from_u64(2024), &mut monitor);
        assert_eq!(monitor.steps.len(), 8);
        for pair in monitor.steps.windows(2) {
            assert!(pair[1].current_fitness >= pair[0].current_fitness);
            assert!(pair[1].best_fitness >= pair[0].best_fitness);
        }
        assert_eq!(result.stats.evaluations, 10 + 8 * 10);
        assert_eq!(calculator().calculate_fitness(&result.encoding), result.fitness);
        let bests: Vec<f64> = monitor.steps.iter().map(|p| p.best_fitness).collect();
        assert_eq!(result.stats.checkpoints, bests);
    }

    #[test]
    fn test_mutation_variant() {
        let config = GeneticConfig {
            mutation_percent: 0.2,
            mutation_count: 3,
            ..small_config()
        };
        let engine = GeneticOptimizer::new(config, calculator()).unwrap();
        let mut monitor = RecordingMonitor::default();
        let result = engine.optimize(&mut ChaCha8Rng::seed_from_u64(9), &mut monitor);
        for pair in monitor.steps.windows(2) {
            assert!(pair[1].current_fitness >= pair[0].current_fitness);
        }
        assert_eq!(result.fitness, monitor.steps.last().unwrap().best_fitness);
    }

    #[test]
    fn test_same_seed_same_result() {
        let engine = GeneticOptimizer::new(small_config(), calculator()).unwrap();
        let a = engine.optimize(&mut ChaCha8Rng::seed_from_u64(3), &mut NoOpMonitor);
        let b = engine.optimize(&mut ChaCha8Rng::seed_from_u64(3), &mut NoOpMonitor);
        assert_eq!(a, b);
    }

    #[test]
    fn test_breed_fills_population() {
        let engine = GeneticOptimizer::new(small_config(), calculator()).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut stats = SearchStats::default();
        let individuals = (0..10)
            .map(|_| StrategyEncoding::random(small_config().layout, &mut rng))
            .collect();
        let mut population = engine.evaluate(individuals, &mut stats);
        sort_descending(&mut population);
        let offspring = engine.breed(&population, &mut rng);
        assert_eq!(offspring.len(), 10);
        assert!(offspring.iter().all(|child| child.len() == 21));
        assert_eq!(stats.evaluations, 10);
    }

    #[test]
    fn test_monitor_can_stop_early() {
        let engine = GeneticOptimizer::new(small_config(), calculator()).unwrap();
        let mut monitor = RecordingMonitor {
            stop_after: Some(3),
            ..Default::default()
        };
        let result = engine.optimize(&mut ChaCha8Rng::seed_from_u64(3), &mut monitor);
        assert_eq!(result.stats.iterations, 3);
        assert!(matches!(result.stats.termination, TerminationReason::Aborted(_)));
    }
}
