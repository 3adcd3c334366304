//! Single-point and beam metaheuristics over strategy encodings.
//!
//! Every engine is a pure function of its configuration, its fitness
//! calculator and the random source handed to `optimize`: the same seed
//! always yields the same result. Configurations are validated when the
//! engine is built, so a constructed engine cannot fail mid-run.

pub mod annealing;
pub mod beam;
pub mod hill_climb;
pub mod tabu;

use std::fmt;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use tracing::{debug, info};

use crate::encoding::StrategyEncoding;
use crate::monitor::{SearchCommand, SearchMonitor};
pub use annealing::{AcceptanceRule, AnnealingConfig, SimulatedAnnealing};
pub use beam::{BeamConfig, LocalBeamSearch};
pub use hill_climb::{HillClimbConfig, HillClimbing};
pub use tabu::{TabuConfig, TabuSearch, MAX_REPERTURBATIONS};

/// Common entry point of every engine.
pub trait Optimizer {
    fn name(&self) -> &'static str;

    fn optimize<R: Rng + ?Sized>(&self, rng: &mut R, monitor: &mut dyn SearchMonitor) -> SearchResult;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum TerminationReason {
    /// Every configured restart and iteration ran.
    #[default]
    Completed,
    /// A monitor asked the search to stop.
    Aborted(String),
}

impl fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerminationReason::Completed => write!(f, "Completed"),
            TerminationReason::Aborted(msg) => write!(f, "Aborted: {}", msg),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchStats {
    pub restarts: usize,
    pub iterations: usize,
    pub evaluations: usize,
    /// Fitness at the end of every restart for single-point engines, or the
    /// best fitness of every generation for population engines.
    pub checkpoints: Vec<f64>,
    pub termination: TerminationReason,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub encoding: StrategyEncoding,
    pub fitness: f64,
    pub stats: SearchStats,
}

impl SearchResult {
    /// The encoding rendered as a zero-padded bit string.
    pub fn bit_string(&self) -> String {
        self.encoding.to_bit_string()
    }
}

/// Best (encoding, fitness) pair seen so far. Only strictly better offers
/// replace it.
#[derive(Debug, Clone)]
pub(crate) struct Incumbent {
    best: Option<(StrategyEncoding, f64)>,
}

impl Incumbent {
    pub(crate) fn new() -> Self {
        Self { best: None }
    }

    pub(crate) fn offer(&mut self, encoding: &StrategyEncoding, fitness: f64) -> bool {
        match &self.best {
            Some((_, best)) if fitness <= *best => false,
            _ => {
                self.best = Some((encoding.clone(), fitness));
                true
            }
        }
    }

    pub(crate) fn fitness(&self) -> f64 {
        self.best.as_ref().map_or(f64::NEG_INFINITY, |(_, f)| *f)
    }

    /// # Panics
    ///
    /// Panics if nothing was ever offered. Engines always evaluate their
    /// starting point first.
    pub(crate) fn into_result(self, stats: SearchStats) -> SearchResult {
        let (encoding, fitness) = self
            .best
            .expect("an engine always evaluates at least its starting point");
        SearchResult {
            encoding,
            fitness,
            stats,
        }
    }
}

/// Emits the run's events once the search loop is over, so nothing is
/// written while it runs.
pub(crate) fn log_finished(engine: &'static str, result: &SearchResult) {
    for (checkpoint, fitness) in result.stats.checkpoints.iter().enumerate() {
        debug!(engine, checkpoint, fitness, "checkpoint");
    }
    if let TerminationReason::Aborted(reason) = &result.stats.termination {
        info!(engine, %reason, "search aborted");
    }
    info!(
        engine,
        fitness = result.fitness,
        evaluations = result.stats.evaluations,
        "search finished"
    );
}

pub(crate) fn poll(monitor: &dyn SearchMonitor) -> Option<String> {
    match monitor.search_command() {
        SearchCommand::Continue => None,
        SearchCommand::Terminate(reason) => Some(reason),
    }
}

/// Index drawn with probability proportional to `weights`; uniform when no
/// weight is positive.
pub(crate) fn weighted_choice<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> usize {
    match WeightedIndex::new(weights) {
        Ok(distribution) => distribution.sample(rng),
        Err(_) => rng.gen_range(0..weights.len()),
    }
}

/// Sorts by descending fitness. Ties keep their input order.
pub(crate) fn sort_descending(scored: &mut [(StrategyEncoding, f64)]) {
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::MemoryLayout;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_incumbent_keeps_strictly_better() {
        let zeros = StrategyEncoding::zeros(MemoryLayout::CANONICAL);
        let other = zeros.with_flipped(3);
        let mut incumbent = Incumbent::new();
        assert_eq!(incumbent.fitness(), f64::NEG_INFINITY);
        assert!(incumbent.offer(&zeros, 5.0));
        assert!(!incumbent.offer(&other, 5.0));
        assert!(incumbent.offer(&other, 6.0));
        let result = incumbent.into_result(SearchStats::default());
        assert_eq!(result.encoding, other);
        assert_eq!(result.fitness, 6.0);
    }

    #[test]
    fn test_weighted_choice_ignores_zero_weights() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(weighted_choice(&[0.0, 4.0, 0.0], &mut rng), 1);
        }
    }

    #[test]
    fn test_weighted_choice_all_zero_is_uniform() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut seen = [false; 3];
        for _ in 0..100 {
            seen[weighted_choice(&[0.0, 0.0, 0.0], &mut rng)] = true;
        }
        assert_eq!(seen, [true, true, true]);
    }

    #[test]
    fn test_sort_descending_is_stable() {
        let a = StrategyEncoding::zeros(MemoryLayout::CANONICAL);
        let b = a.with_flipped(1);
        let c = a.with_flipped(2);
        let mut scored = vec![(a.clone(), 1.0), (b.clone(), 3.0), (c.clone(), 1.0)];
        sort_descending(&mut scored);
        assert_eq!(scored, vec![(b, 3.0), (a, 1.0), (c, 1.0)]);
    }

    #[test]
    fn test_termination_display() {
        assert_eq!(TerminationReason::Completed.to_string(), "Completed");
        assert_eq!(
            TerminationReason::Aborted("time limit reached".into()).to_string(),
            "Aborted: time limit reached"
        );
    }
}
