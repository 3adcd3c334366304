use crate::encoding::StrategyEncoding;
use crate::error::{check_nonzero, ConfigError};
use crate::fitness_calculator::FitnessCalculator;
use crate::game::{play_match, PayoffMatrix};
use crate::strategies::OpponentPool;

/// Rounds per match when scoring a candidate.
pub const DEFAULT_ROUNDS: usize = 10;

/// Scores a candidate by its points against every pool member plus twice its
/// first-seat score against a copy of itself.
#[derive(Clone, Debug)]
pub struct PoolFitnessCalculator {
    payoffs: PayoffMatrix,
    pool: OpponentPool,
    rounds: usize,
}

impl PoolFitnessCalculator {
    pub fn new(payoffs: PayoffMatrix, pool: OpponentPool) -> PoolFitnessCalculator {
        PoolFitnessCalculator {
            payoffs,
            pool,
            rounds: DEFAULT_ROUNDS,
        }
    }

    pub fn with_rounds(mut self, rounds: usize) -> Result<PoolFitnessCalculator, ConfigError> {
        check_nonzero("rounds", rounds)?;
        self.rounds = rounds;
        Ok(self)
    }

    pub fn payoffs(&self) -> &PayoffMatrix {
        &self.payoffs
    }

    pub fn pool(&self) -> &OpponentPool {
        &self.pool
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }
}

impl FitnessCalculator for PoolFitnessCalculator {
    fn calculate_fitness(&self, encoding: &StrategyEncoding) -> f64 {
        let vs_pool: f64 = self
            .pool
            .opponents()
            .iter()
            .map(|opponent| play_match(&self.payoffs, encoding, opponent, self.rounds).score_a)
            .sum();
        let vs_self = play_match(&self.payoffs, encoding, encoding, self.rounds).score_a;
        vs_pool + 2.0 * vs_self
    }
}
