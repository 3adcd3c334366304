pub mod history;
pub mod tournament;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::strategies::Strategy;
pub use history::{History, HistoryView};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Move {
    Cooperate,
    Defect,
}

impl Move {
    /// `0` for cooperate, `1` for defect.
    #[inline]
    pub fn bit(self) -> usize {
        match self {
            Move::Cooperate => 0,
            Move::Defect => 1,
        }
    }

    #[inline]
    pub fn from_bit(bit: bool) -> Move {
        if bit {
            Move::Defect
        } else {
            Move::Cooperate
        }
    }
}

/// Symmetric two-action payoff table. `payoff(a, b)` is what a player earns
/// for playing `a` against an opponent playing `b`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>")]
pub struct PayoffMatrix {
    payoffs: [[f64; 2]; 2],
}

impl PayoffMatrix {
    pub fn new(payoffs: [[f64; 2]; 2]) -> Result<PayoffMatrix, ConfigError> {
        for (row, values) in payoffs.iter().enumerate() {
            for (col, value) in values.iter().enumerate() {
                if !value.is_finite() {
                    return Err(ConfigError::NonFinitePayoff { row, col });
                }
            }
        }
        Ok(PayoffMatrix { payoffs })
    }

    #[inline]
    pub fn payoff(&self, actor: Move, opponent: Move) -> f64 {
        self.payoffs[actor.bit()][opponent.bit()]
    }

    pub fn as_array(&self) -> [[f64; 2]; 2] {
        self.payoffs
    }
}

impl Default for PayoffMatrix {
    fn default() -> Self {
        PayoffMatrix {
            payoffs: [[3.0, 0.0], [5.0, 1.0]],
        }
    }
}

impl TryFrom<Vec<Vec<f64>>> for PayoffMatrix {
    type Error = ConfigError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        if rows.len() != 2 || rows.iter().any(|row| row.len() != 2) {
            return Err(ConfigError::PayoffShape {
                rows: rows.len(),
                cols: rows.iter().map(Vec::len).collect(),
            });
        }
        PayoffMatrix::new([[rows[0][0], rows[0][1]], [rows[1][0], rows[1][1]]])
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchResult {
    pub score_a: f64,
    pub score_b: f64,
}

impl MatchResult {
    pub fn swapped(self) -> MatchResult {
        MatchResult {
            score_a: self.score_b,
            score_b: self.score_a,
        }
    }
}

#[derive(Clone, Debug)]
pub struct MatchRecord {
    pub result: MatchResult,
    pub history: History,
}

/// Plays `rounds` rounds and keeps the full move history.
pub fn play_recorded<A, B>(payoffs: &PayoffMatrix, a: &A, b: &B, rounds: usize) -> MatchRecord
where
    A: Strategy + ?Sized,
    B: Strategy + ?Sized,
{
    let mut history = History::with_rounds(rounds);
    let mut result = MatchResult {
        score_a: 0.0,
        score_b: 0.0,
    };
    for _ in 0..rounds {
        let action_a = a.action(&history.view_for_a());
        let action_b = b.action(&history.view_for_b());
        history.record(action_a, action_b);
        result.score_a += payoffs.payoff(action_a, action_b);
        result.score_b += payoffs.payoff(action_b, action_a);
    }
    MatchRecord { result, history }
}

pub fn play_match<A, B>(payoffs: &PayoffMatrix, a: &A, b: &B, rounds: usize) -> MatchResult
where
    A: Strategy + ?Sized,
    B: Strategy + ?Sized,
{
    play_recorded(payoffs, a, b, rounds).result
}
