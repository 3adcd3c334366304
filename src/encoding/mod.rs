pub mod layout;

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::error::ConfigError;
use crate::game::{HistoryView, Move};
use crate::strategies::Strategy;
pub use layout::{MemoryLayout, MAX_LOOKBACK};

const WORD_BITS: usize = 64;

/// A strategy as a fixed-width bit string. Bit `i` is bit `i` of the string
/// read as an unsigned integer; a set bit means defect in the history state
/// that `MemoryLayout::state_index` maps to `i`.
///
/// Encodings are values: flipping or recombining bits always returns a new
/// encoding.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct StrategyEncoding {
    layout: MemoryLayout,
    words: Box<[u64]>,
}

impl StrategyEncoding {
    pub fn zeros(layout: MemoryLayout) -> StrategyEncoding {
        StrategyEncoding {
            layout,
            words: vec![0; layout.len().div_ceil(WORD_BITS)].into_boxed_slice(),
        }
    }

    pub fn random<R: Rng + ?Sized>(layout: MemoryLayout, rng: &mut R) -> StrategyEncoding {
        let mut encoding = StrategyEncoding::zeros(layout);
        for word in encoding.words.iter_mut() {
            *word = rng.gen();
        }
        encoding.clear_unused_bits();
        encoding
    }

    /// Parses a most-significant-bit-first string of `0`s and `1`s. The
    /// string length selects the layout.
    pub fn parse_bits(bits: &str) -> Result<StrategyEncoding, ConfigError> {
        let layout = MemoryLayout::from_memory_size(bits.len())?;
        let mut encoding = StrategyEncoding::zeros(layout);
        for (pos, c) in bits.chars().enumerate() {
            let index = layout.len() - 1 - pos;
            match c {
                '0' => {}
                '1' => encoding.words[index / WORD_BITS] |= 1 << (index % WORD_BITS),
                other => {
                    return Err(ConfigError::BitString(format!(
                        "unexpected {other:?} at position {pos}"
                    )))
                }
            }
        }
        Ok(encoding)
    }

    pub fn layout(&self) -> MemoryLayout {
        self.layout
    }

    pub fn len(&self) -> usize {
        self.layout.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// # Panics
    ///
    /// Panics if `index` is outside the encoding.
    #[inline]
    pub fn bit(&self, index: usize) -> bool {
        assert!(
            index < self.len(),
            "history-state index {index} out of range for a {}-bit encoding",
            self.len()
        );
        (self.words[index / WORD_BITS] >> (index % WORD_BITS)) & 1 == 1
    }

    /// Move this strategy plays given `history`. Only rounds already played
    /// are visible through the view, so the result never depends on the
    /// future.
    pub fn decode(&self, history: &HistoryView<'_>) -> Move {
        Move::from_bit(self.bit(self.layout.state_index(history)))
    }

    pub fn with_flipped(&self, index: usize) -> StrategyEncoding {
        assert!(index < self.len(), "cannot flip bit {index} of {}", self.len());
        let mut flipped = self.clone();
        flipped.words[index / WORD_BITS] ^= 1 << (index % WORD_BITS);
        flipped
    }

    /// Flips `count` uniformly drawn positions. Positions may repeat, in
    /// which case the flips cancel.
    pub fn flip_random_bits<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> StrategyEncoding {
        let mut flipped = self.clone();
        for _ in 0..count {
            let index = rng.gen_range(0..self.len());
            flipped.words[index / WORD_BITS] ^= 1 << (index % WORD_BITS);
        }
        flipped
    }

    /// Uniform bit-mask recombination: each bit comes from `self` where a
    /// random mask bit is set and from `other` elsewhere.
    pub fn crossover<R: Rng + ?Sized>(&self, other: &StrategyEncoding, rng: &mut R) -> StrategyEncoding {
        assert_eq!(
            self.layout, other.layout,
            "cannot recombine encodings with different layouts"
        );
        let mut child = self.clone();
        for (word, theirs) in child.words.iter_mut().zip(other.words.iter()) {
            let mask: u64 = rng.gen();
            *word = (*word & mask) | (theirs & !mask);
        }
        child
    }

    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Exactly `len()` characters, most significant bit first, zero padded.
    pub fn to_bit_string(&self) -> String {
        (0..self.len())
            .rev()
            .map(|i| if self.bit(i) { '1' } else { '0' })
            .collect()
    }

    fn clear_unused_bits(&mut self) {
        let used = self.len() % WORD_BITS;
        if used != 0 {
            if let Some(last) = self.words.last_mut() {
                *last &= (1u64 << used) - 1;
            }
        }
    }
}

impl Strategy for StrategyEncoding {
    fn action(&self, history: &HistoryView<'_>) -> Move {
        self.decode(history)
    }
}

impl FromStr for StrategyEncoding {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StrategyEncoding::parse_bits(s.trim())
    }
}

impl fmt::Display for StrategyEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_bit_string())
    }
}

impl fmt::Debug for StrategyEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StrategyEncoding({}: {})", self.len(), self.to_bit_string())
    }
}
