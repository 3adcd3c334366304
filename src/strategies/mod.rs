pub mod baseline;
pub mod pool;

use crate::encoding::StrategyEncoding;
use crate::game::{HistoryView, Move};
pub use baseline::Baseline;
pub use pool::OpponentPool;

/// A deterministic rule mapping the moves seen so far to the next move.
pub trait Strategy {
    fn action(&self, history: &HistoryView<'_>) -> Move;
}

impl<S: Strategy + ?Sized> Strategy for &S {
    fn action(&self, history: &HistoryView<'_>) -> Move {
        (**self).action(history)
    }
}

/// Anything that can take a seat in a match: one of the fixed baselines or
/// an evolved encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Player {
    Baseline(Baseline),
    Encoded(StrategyEncoding),
}

impl Strategy for Player {
    fn action(&self, history: &HistoryView<'_>) -> Move {
        match self {
            Player::Baseline(baseline) => baseline.action(history),
            Player::Encoded(encoding) => encoding.action(history),
        }
    }
}

impl From<Baseline> for Player {
    fn from(baseline: Baseline) -> Self {
        Player::Baseline(baseline)
    }
}

impl From<StrategyEncoding> for Player {
    fn from(encoding: StrategyEncoding) -> Self {
        Player::Encoded(encoding)
    }
}
