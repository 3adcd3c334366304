use crate::error::ConfigError;
use crate::game::HistoryView;

/// Deepest lookback a layout may condition on.
pub const MAX_LOOKBACK: usize = 8;

/// How a strategy's bits are split into regions.
///
/// Rounds `r < lookback` each own a region of `4^r` bits addressed by the
/// `r` most recent own moves followed by the `r` most recent opponent moves.
/// Every later round shares the steady-state region, addressed by the
/// `lookback` most recent moves of both players, prefixed with an
/// "opponent ever defected" bit when `defection_flag` is set.
///
/// Regions are stacked from the most significant bit down: round 0 is the
/// top bit and the steady-state region starts at bit 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MemoryLayout {
    lookback: usize,
    defection_flag: bool,
}

impl MemoryLayout {
    /// Three rounds of lookback plus the defection flag: 149 bits.
    pub const CANONICAL: MemoryLayout = MemoryLayout {
        lookback: 3,
        defection_flag: true,
    };

    pub fn new(lookback: usize, defection_flag: bool) -> Result<MemoryLayout, ConfigError> {
        if lookback == 0 || lookback > MAX_LOOKBACK {
            return Err(ConfigError::OutOfRange {
                name: "lookback",
                value: lookback as f64,
                range: "[1, 8]",
            });
        }
        Ok(MemoryLayout {
            lookback,
            defection_flag,
        })
    }

    /// Finds the layout whose total length is `memory_size` bits
    /// (21, 85 and 149 are the usual ones).
    pub fn from_memory_size(memory_size: usize) -> Result<MemoryLayout, ConfigError> {
        (1..=MAX_LOOKBACK)
            .flat_map(|lookback| {
                [false, true].into_iter().map(move |defection_flag| MemoryLayout {
                    lookback,
                    defection_flag,
                })
            })
            .find(|layout| layout.len() == memory_size)
            .ok_or(ConfigError::UnsupportedMemorySize(memory_size))
    }

    pub fn lookback(&self) -> usize {
        self.lookback
    }

    pub fn defection_flag(&self) -> bool {
        self.defection_flag
    }

    /// Total number of bits.
    pub fn len(&self) -> usize {
        self.steady_state_bits() + (0..self.lookback).map(early_region_bits).sum::<usize>()
    }

    fn steady_state_bits(&self) -> usize {
        1 << (2 * self.lookback + usize::from(self.defection_flag))
    }

    /// First bit of the region that decides moves at `round`.
    pub fn region_offset(&self, round: usize) -> usize {
        if round >= self.lookback {
            return 0;
        }
        self.steady_state_bits()
            + (round + 1..self.lookback)
                .map(early_region_bits)
                .sum::<usize>()
    }

    /// Bit that decides the next move for the player whose view this is.
    pub fn state_index(&self, history: &HistoryView<'_>) -> usize {
        let round = history.round();
        let depth = round.min(self.lookback);
        let mut key = 0;
        if round >= self.lookback && self.defection_flag {
            key = usize::from(history.opponent_ever_defected());
        }
        for back in 1..=depth {
            key = (key << 1) | history.own_back(back).bit();
        }
        for back in 1..=depth {
            key = (key << 1) | history.opponent_back(back).bit();
        }
        self.region_offset(round) + key
    }
}

impl Default for MemoryLayout {
    fn default() -> Self {
        MemoryLayout::CANONICAL
    }
}

#[inline]
fn early_region_bits(round: usize) -> usize {
    1 << (2 * round)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{History, Move};

    #[test]
    fn test_known_memory_sizes() {
        let l21 = MemoryLayout::from_memory_size(21).unwrap();
        assert_eq!((l21.lookback(), l21.defection_flag()), (2, false));
        let l85 = MemoryLayout::from_memory_size(85).unwrap();
        assert_eq!((l85.lookback(), l85.defection_flag()), (3, false));
        let l149 = MemoryLayout::from_memory_size(149).unwrap();
        assert_eq!(l149, MemoryLayout::CANONICAL);
        assert_eq!(MemoryLayout::CANONICAL.len(), 149);
    }

    #[test]
    fn test_unsupported_memory_size() {
        assert_eq!(
            MemoryLayout::from_memory_size(150),
            Err(ConfigError::UnsupportedMemorySize(150))
        );
        assert!(MemoryLayout::new(0, false).is_err());
        assert!(MemoryLayout::new(9, true).is_err());
    }

    #[test]
    fn test_canonical_offsets() {
        let layout = MemoryLayout::CANONICAL;
        assert_eq!(layout.region_offset(0), 148);
        assert_eq!(layout.region_offset(1), 144);
        assert_eq!(layout.region_offset(2), 128);
        assert_eq!(layout.region_offset(3), 0);
        assert_eq!(layout.region_offset(40), 0);
    }

    #[test]
    fn test_canonical_keys() {
        use crate::game::Move::{Cooperate as C, Defect as D};
        let layout = MemoryLayout::CANONICAL;
        let mut history = History::with_rounds(5);
        assert_eq!(layout.state_index(&history.view_for_a()), 148);

        history.record(D, C);
        // my0 << 1 | opp0
        assert_eq!(layout.state_index(&history.view_for_a()), 144 + 0b10);
        assert_eq!(layout.state_index(&history.view_for_b()), 144 + 0b01);

        history.record(C, D);
        // my-1, my-2, opp-1, opp-2
        assert_eq!(layout.state_index(&history.view_for_a()), 128 + 0b0110);

        history.record(C, C);
        // flag, my-1..-3, opp-1..-3
        assert_eq!(layout.state_index(&history.view_for_a()), 0b1_001_010);
        assert_eq!(layout.state_index(&history.view_for_b()), 0b1_010_001);
    }

    #[test]
    fn test_every_index_in_range() {
        for size in [5, 9, 21, 37, 85, 149, 341] {
            let layout = MemoryLayout::from_memory_size(size).unwrap();
            for pattern in 0u32..(1 << 10) {
                let mut history = History::with_rounds(5);
                for round in 0..5 {
                    let index = layout.state_index(&history.view_for_a());
                    assert!(index < layout.len(), "size {size} round {round}");
                    let a = Move::from_bit((pattern >> (2 * round)) & 1 == 1);
                    let b = Move::from_bit((pattern >> (2 * round + 1)) & 1 == 1);
                    history.record(a, b);
                }
            }
        }
    }
}
