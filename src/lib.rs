//! Evolution of bit-string strategies for the iterated prisoner's dilemma.
//!
//! A strategy is a `StrategyEncoding`: one bit per observable history state.
//! Candidates are scored by `PoolFitnessCalculator` against a pool of fixed
//! baselines plus a copy of themselves, and searched with hill climbing,
//! tabu search, simulated annealing, local beam search or a genetic
//! algorithm. Every engine draws randomness only from the generator passed
//! to `Optimizer::optimize`.

pub mod contract;
pub mod encoding;
pub mod error;
pub mod fitness_calculator;
pub mod game;
pub mod genetic_optimizer;
pub mod local_search;
pub mod lru_cache;
pub mod monitor;
pub mod neighbor;
pub mod strategies;

pub use encoding::{MemoryLayout, StrategyEncoding};
pub use error::{ConfigError, Error, Result};
pub use fitness_calculator::{FitnessCalculator, PoolFitnessCalculator};
pub use game::{play_match, MatchResult, Move, PayoffMatrix};
pub use local_search::{Optimizer, SearchResult, SearchStats, TerminationReason};
pub use strategies::{Baseline, OpponentPool, Player, Strategy};
