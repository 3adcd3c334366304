use rand::Rng;

use crate::encoding::StrategyEncoding;
use crate::error::ConfigError;

pub trait NeighborGenerator: Sync {
    fn neighbor<R: Rng + ?Sized>(&self, encoding: &StrategyEncoding, rng: &mut R) -> StrategyEncoding;
}

/// Flips `K` random bits, with `K` drawn uniformly from
/// `min_flips..=max_flips` on every call. Repeated positions cancel, so the
/// neighbor can equal its source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RandomBitFlip {
    min_flips: usize,
    max_flips: usize,
}

impl RandomBitFlip {
    /// Requires `1 <= min_flips <= max_flips`.
    pub fn new(min_flips: usize, max_flips: usize) -> Result<RandomBitFlip, ConfigError> {
        if min_flips == 0 || min_flips > max_flips {
            return Err(ConfigError::FlipRange {
                min: min_flips,
                max: max_flips,
            });
        }
        Ok(RandomBitFlip {
            min_flips,
            max_flips,
        })
    }

    pub fn min_flips(&self) -> usize {
        self.min_flips
    }

    pub fn max_flips(&self) -> usize {
        self.max_flips
    }
}

impl Default for RandomBitFlip {
    fn default() -> Self {
        RandomBitFlip {
            min_flips: 1,
            max_flips: 10,
        }
    }
}

impl NeighborGenerator for RandomBitFlip {
    fn neighbor<R: Rng + ?Sized>(&self, encoding: &StrategyEncoding, rng: &mut R) -> StrategyEncoding {
        let flips = rng.gen_range(self.min_flips..=self.max_flips);
        encoding.flip_random_bits(flips, rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::MemoryLayout;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_neighbor_distance_bounded() {
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let generator = RandomBitFlip::default();
        let zeros = StrategyEncoding::zeros(MemoryLayout::CANONICAL);
        let mut saw_change = false;
        for _ in 0..200 {
            let neighbor = generator.neighbor(&zeros, &mut rng);
            assert!(neighbor.count_ones() <= 10);
            saw_change |= neighbor != zeros;
        }
        assert!(saw_change);
    }

    #[test]
    fn test_flip_range_validated() {
        assert_eq!(
            RandomBitFlip::new(5, 2),
            Err(ConfigError::FlipRange { min: 5, max: 2 })
        );
        assert_eq!(
            RandomBitFlip::new(0, 3),
            Err(ConfigError::FlipRange { min: 0, max: 3 })
        );
        let exact = RandomBitFlip::new(3, 3).unwrap();
        assert_eq!((exact.min_flips(), exact.max_flips()), (3, 3));
        assert_eq!(RandomBitFlip::new(1, 10).unwrap(), RandomBitFlip::default());
    }

    #[test]
    fn test_single_flip_always_moves() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let generator = RandomBitFlip::new(1, 1).unwrap();
        let zeros = StrategyEncoding::zeros(MemoryLayout::CANONICAL);
        for _ in 0..50 {
            assert_eq!(generator.neighbor(&zeros, &mut rng).count_ones(), 1);
        }
    }

    #[test]
    fn test_neighbor_is_reproducible() {
        let generator = RandomBitFlip::default();
        let start = StrategyEncoding::zeros(MemoryLayout::CANONICAL);
        let run = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            (0..5)
                .map(|_| generator.neighbor(&start, &mut rng))
                .collect::<Vec<_>>()
        };
        assert_eq!(run(7), run(7));
    }
}
