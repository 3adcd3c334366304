use rand::Rng;

use crate::error::ConfigError;
use crate::game::{play_match, PayoffMatrix};
use crate::strategies::{Player, Strategy};

/// Round count used by the full round robin.
pub const ROUND_ROBIN_ROUNDS: usize = 10;

/// Every player meets every player, itself included, once per ordered pair.
/// A player's total counts the points it earned both as the first and as
/// the second seat.
pub fn calculate_all_fitnesses(payoffs: &PayoffMatrix, players: &[Player]) -> Vec<f64> {
    let mut scores = vec![0.0; players.len()];
    for (i, first) in players.iter().enumerate() {
        for (j, second) in players.iter().enumerate() {
            let result = play_match(payoffs, first, second, ROUND_ROBIN_ROUNDS);
            scores[i] += result.score_a;
            scores[j] += result.score_b;
        }
    }
    scores
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeadToHeadConfig {
    pub min_rounds: usize,
    pub max_rounds: usize,
    pub matches: usize,
}

impl Default for HeadToHeadConfig {
    fn default() -> Self {
        HeadToHeadConfig {
            min_rounds: 50,
            max_rounds: 200,
            matches: 20,
        }
    }
}

impl HeadToHeadConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_rounds > self.max_rounds {
            return Err(ConfigError::RoundRange {
                min: self.min_rounds,
                max: self.max_rounds,
            });
        }
        crate::error::check_nonzero("matches", self.matches)
    }
}

/// Average scores of `a` and `b` over `config.matches` matches whose length
/// is drawn uniformly from `min_rounds..=max_rounds`. The config is checked
/// before any match is played.
pub fn head_to_head<A, B, R>(
    payoffs: &PayoffMatrix,
    a: &A,
    b: &B,
    config: &HeadToHeadConfig,
    rng: &mut R,
) -> Result<(f64, f64), ConfigError>
where
    A: Strategy + ?Sized,
    B: Strategy + ?Sized,
    R: Rng + ?Sized,
{
    config.validate()?;
    let mut total_a = 0.0;
    let mut total_b = 0.0;
    for _ in 0..config.matches {
        let rounds = rng.gen_range(config.min_rounds..=config.max_rounds);
        let result = play_match(payoffs, a, b, rounds);
        total_a += result.score_a;
        total_b += result.score_b;
    }
    let n = config.matches as f64;
    Ok((total_a / n, total_b / n))
}

/// Mean head-to-head score of `evolved` across `baselines`; `0.0` when there
/// are none.
pub fn head_to_head_all<S, R>(
    payoffs: &PayoffMatrix,
    evolved: &S,
    baselines: &[Player],
    config: &HeadToHeadConfig,
    rng: &mut R,
) -> Result<f64, ConfigError>
where
    S: Strategy + ?Sized,
    R: Rng + ?Sized,
{
    config.validate()?;
    if baselines.is_empty() {
        return Ok(0.0);
    }
    let mut total = 0.0;
    for baseline in baselines {
        total += head_to_head(payoffs, evolved, baseline, config, rng)?.0;
    }
    Ok(total / baselines.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategies::Baseline;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_round_robin_counts_both_seats() {
        let payoffs = PayoffMatrix::default();
        let players = vec![
            Player::Baseline(Baseline::Defector),
            Player::Baseline(Baseline::Cooperator),
        ];
        let scores = calculate_all_fitnesses(&payoffs, &players);
        // Defector: 10 (self) + 10 (self, second seat) + 50 + 50.
        assert_eq!(scores[0], 120.0);
        // Cooperator: 30 + 30 + 0 + 0.
        assert_eq!(scores[1], 60.0);
    }

    #[test]
    fn test_head_to_head_against_cooperator() {
        let payoffs = PayoffMatrix::default();
        let config = HeadToHeadConfig {
            min_rounds: 20,
            max_rounds: 20,
            matches: 3,
        };
        let mut rng = StdRng::seed_from_u64(5);
        let (d, c) = head_to_head(
            &payoffs,
            &Baseline::Defector,
            &Baseline::Cooperator,
            &config,
            &mut rng,
        )
        .unwrap();
        assert_eq!(d, 100.0);
        assert_eq!(c, 0.0);
    }

    #[test]
    fn test_head_to_head_all_averages_over_baselines() {
        let payoffs = PayoffMatrix::default();
        let config = HeadToHeadConfig {
            min_rounds: 10,
            max_rounds: 10,
            matches: 1,
        };
        let baselines = vec![
            Player::Baseline(Baseline::Cooperator),
            Player::Baseline(Baseline::Defector),
        ];
        let mut rng = StdRng::seed_from_u64(5);
        let score =
            head_to_head_all(&payoffs, &Baseline::Defector, &baselines, &config, &mut rng).unwrap();
        assert_eq!(score, (50.0 + 10.0) / 2.0);
        assert_eq!(
            head_to_head_all(&payoffs, &Baseline::Defector, &[], &config, &mut rng),
            Ok(0.0)
        );
    }

    #[test]
    fn test_zero_matches_rejected() {
        let config = HeadToHeadConfig {
            matches: 0,
            ..HeadToHeadConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(6);
        let payoffs = PayoffMatrix::default();
        assert_eq!(
            head_to_head(&payoffs, &Baseline::TitForTat, &Baseline::Defector, &config, &mut rng),
            Err(ConfigError::Zero("matches"))
        );
        // Rejected even when there is nobody to play.
        assert_eq!(
            head_to_head_all(&payoffs, &Baseline::TitForTat, &[], &config, &mut rng),
            Err(ConfigError::Zero("matches"))
        );
    }

    #[test]
    fn test_inverted_round_range_rejected() {
        let config = HeadToHeadConfig {
            min_rounds: 200,
            max_rounds: 50,
            matches: 20,
        };
        let mut rng = StdRng::seed_from_u64(7);
        let payoffs = PayoffMatrix::default();
        let baselines = vec![Player::Baseline(Baseline::Cooperator)];
        assert_eq!(
            head_to_head_all(&payoffs, &Baseline::GrimTrigger, &baselines, &config, &mut rng),
            Err(ConfigError::RoundRange { min: 200, max: 50 })
        );
    }

    #[test]
    fn test_config_validation() {
        let bad = HeadToHeadConfig {
            min_rounds: 9,
            max_rounds: 3,
            matches: 1,
        };
        assert_eq!(bad.validate(), Err(ConfigError::RoundRange { min: 9, max: 3 }));
        assert!(HeadToHeadConfig::default().validate().is_ok());
    }
}
