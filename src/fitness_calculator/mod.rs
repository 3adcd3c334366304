pub mod pool;

use rayon::prelude::*;

use crate::encoding::StrategyEncoding;
pub use pool::PoolFitnessCalculator;

pub trait FitnessCalculator: Sync {
    fn calculate_fitness(&self, encoding: &StrategyEncoding) -> f64;

    /// Scores a batch in parallel. The output is index-aligned with
    /// `encodings`, so the result does not depend on scheduling.
    fn calculate_fitnesses(&self, encodings: &[StrategyEncoding]) -> Vec<f64> {
        encodings
            .par_iter()
            .map(|encoding| self.calculate_fitness(encoding))
            .collect()
    }
}

impl<F: FitnessCalculator + ?Sized> FitnessCalculator for &F {
    fn calculate_fitness(&self, encoding: &StrategyEncoding) -> f64 {
        (**self).calculate_fitness(encoding)
    }

    fn calculate_fitnesses(&self, encodings: &[StrategyEncoding]) -> Vec<f64> {
        (**self).calculate_fitnesses(encodings)
    }
}
