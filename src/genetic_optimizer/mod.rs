pub mod bitstring;

use crate::encoding::MemoryLayout;
use crate::error::{check_fraction, check_nonzero, ConfigError};
pub use bitstring::GeneticOptimizer;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeneticConfig {
    pub population_size: usize,
    pub num_generations: usize,
    /// Fraction of the sorted population that may become a parent.
    pub percent_for_crossover: f64,
    /// Fraction of each generation's offspring that gets mutated.
    pub mutation_percent: f64,
    /// Bits flipped in a mutated offspring.
    pub mutation_count: usize,
    pub layout: MemoryLayout,
}

impl Default for GeneticConfig {
    fn default() -> Self {
        GeneticConfig {
            population_size: 20,
            num_generations: 20,
            percent_for_crossover: 1.0,
            mutation_percent: 0.0,
            mutation_count: 0,
            layout: MemoryLayout::CANONICAL,
        }
    }
}

impl GeneticConfig {
    /// The mutation variant: 5% of the offspring get two flipped bits.
    pub fn with_mutation() -> GeneticConfig {
        GeneticConfig {
            mutation_percent: 0.05,
            mutation_count: 2,
            ..GeneticConfig::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_nonzero("population_size", self.population_size)?;
        check_nonzero("num_generations", self.num_generations)?;
        check_fraction("percent_for_crossover", self.percent_for_crossover)?;
        if !(0.0..=1.0).contains(&self.mutation_percent) {
            return Err(ConfigError::OutOfRange {
                name: "mutation_percent",
                value: self.mutation_percent,
                range: "[0, 1]",
            });
        }
        Ok(())
    }

    /// How many of the fittest individuals breed.
    pub fn parent_count(&self) -> usize {
        ((self.percent_for_crossover * self.population_size as f64).ceil() as usize)
            .clamp(1, self.population_size)
    }

    /// How many offspring get mutated each generation.
    pub fn mutant_count(&self) -> usize {
        ((self.mutation_percent * self.population_size as f64).round() as usize)
            .min(self.population_size)
    }
}
