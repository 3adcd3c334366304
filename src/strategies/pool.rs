use std::collections::BTreeMap;

use crate::error::ConfigError;
use crate::strategies::{Baseline, Player};

/// Ordered list of fixed opponents a candidate is scored against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpponentPool {
    opponents: Vec<Baseline>,
}

impl OpponentPool {
    pub fn new(opponents: Vec<Baseline>) -> Result<OpponentPool, ConfigError> {
        if opponents.is_empty() {
            return Err(ConfigError::EmptyOpponentPool);
        }
        Ok(OpponentPool { opponents })
    }

    /// One of each baseline.
    pub fn standard() -> OpponentPool {
        OpponentPool {
            opponents: Baseline::ALL.to_vec(),
        }
    }

    /// Replicates each named baseline `count` times, in `Baseline::ALL`
    /// order. Names that are absent count as zero.
    pub fn from_counts<S: AsRef<str>>(
        counts: &BTreeMap<S, usize>,
    ) -> Result<OpponentPool, ConfigError> {
        let mut per_baseline = [0usize; Baseline::ALL.len()];
        for (name, &count) in counts {
            let baseline: Baseline = name.as_ref().parse()?;
            let slot = Baseline::ALL
                .iter()
                .position(|&b| b == baseline)
                .unwrap_or_default();
            per_baseline[slot] += count;
        }
        let opponents = Baseline::ALL
            .iter()
            .zip(per_baseline)
            .flat_map(|(&baseline, count)| std::iter::repeat(baseline).take(count))
            .collect();
        OpponentPool::new(opponents)
    }

    pub fn opponents(&self) -> &[Baseline] {
        &self.opponents
    }

    pub fn len(&self) -> usize {
        self.opponents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opponents.is_empty()
    }

    pub fn players(&self) -> Vec<Player> {
        self.opponents.iter().copied().map(Player::Baseline).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_expand_in_fixed_order() {
        let mut counts = BTreeMap::new();
        counts.insert("Always Defect", 2);
        counts.insert("Tit For Tat", 1);
        counts.insert("Grim Trigger", 0);
        let pool = OpponentPool::from_counts(&counts).unwrap();
        assert_eq!(
            pool.opponents(),
            &[Baseline::TitForTat, Baseline::Defector, Baseline::Defector]
        );
    }

    #[test]
    fn test_empty_pool_rejected() {
        let mut counts = BTreeMap::new();
        counts.insert("Tit For Tat", 0);
        assert_eq!(
            OpponentPool::from_counts(&counts),
            Err(ConfigError::EmptyOpponentPool)
        );
        assert_eq!(OpponentPool::new(vec![]), Err(ConfigError::EmptyOpponentPool));
    }

    #[test]
    fn test_unknown_name_rejected() {
        let mut counts = BTreeMap::new();
        counts.insert("Random Chooser".to_string(), 3);
        assert!(matches!(
            OpponentPool::from_counts(&counts),
            Err(ConfigError::UnknownStrategy(_))
        ));
    }

    #[test]
    fn test_standard_pool_has_every_baseline() {
        assert_eq!(OpponentPool::standard().len(), 7);
    }
}
