use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::game::{HistoryView, Move};
use crate::strategies::Strategy;

/// Opponent defection rate at which `NiceTitForTat` starts defecting.
pub const NICE_TIT_FOR_TAT_THRESHOLD: f64 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Baseline {
    Cooperator,
    Defector,
    TitForTat,
    TwoTitForTat,
    NiceTitForTat,
    SuspiciousTitForTat,
    GrimTrigger,
}

impl Baseline {
    /// Every baseline, in the order pools are built from player counts.
    pub const ALL: [Baseline; 7] = [
        Baseline::TitForTat,
        Baseline::GrimTrigger,
        Baseline::TwoTitForTat,
        Baseline::NiceTitForTat,
        Baseline::Cooperator,
        Baseline::Defector,
        Baseline::SuspiciousTitForTat,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Baseline::Cooperator => "Always Cooperate",
            Baseline::Defector => "Always Defect",
            Baseline::TitForTat => "Tit For Tat",
            Baseline::TwoTitForTat => "Two Tit For Tat",
            Baseline::NiceTitForTat => "Nice Tit For Tat",
            Baseline::SuspiciousTitForTat => "Suspicious Tit For Tat",
            Baseline::GrimTrigger => "Grim Trigger",
        }
    }

    fn slug(self) -> String {
        self.name().to_ascii_lowercase().replace(' ', "-")
    }
}

impl Strategy for Baseline {
    fn action(&self, history: &HistoryView<'_>) -> Move {
        let round = history.round();
        match self {
            Baseline::Cooperator => Move::Cooperate,
            Baseline::Defector => Move::Defect,
            Baseline::TitForTat => {
                if round == 0 {
                    Move::Cooperate
                } else {
                    history.opponent_back(1)
                }
            }
            Baseline::SuspiciousTitForTat => {
                if round == 0 {
                    Move::Defect
                } else {
                    history.opponent_back(1)
                }
            }
            Baseline::TwoTitForTat => {
                let punished = round >= 2
                    && history.opponent_back(1) == Move::Defect
                    && history.opponent_back(2) == Move::Defect;
                Move::from_bit(punished)
            }
            Baseline::NiceTitForTat => {
                if round == 0 {
                    return Move::Cooperate;
                }
                let rate = history.opponent_defections() as f64 / round as f64;
                Move::from_bit(rate >= NICE_TIT_FOR_TAT_THRESHOLD)
            }
            Baseline::GrimTrigger => Move::from_bit(history.opponent_ever_defected()),
        }
    }
}

impl fmt::Display for Baseline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts display names ("Tit For Tat") and kebab-case ("tit-for-tat").
impl FromStr for Baseline {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Baseline::ALL
            .into_iter()
            .find(|b| b.name().eq_ignore_ascii_case(wanted) || b.slug() == wanted)
            .ok_or_else(|| ConfigError::UnknownStrategy(s.to_string()))
    }
}
