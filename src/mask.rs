//! Spaced-seed masks: `'0'` positions are ignored for hashing and equality.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;

use crate::alphabet::Alphabet;
use crate::error::ConfigError;
use crate::power::PowerTable;

/// Fixed-length pattern over `{'0', '1'}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    pattern: String,
    ignored: Vec<usize>,
}

impl Mask {
    /// Parse an explicit pattern for features of length `k`.
    pub fn parse(pattern: &str, k: usize) -> Result<Self, ConfigError> {
        if pattern.len() != k {
            return Err(ConfigError::MaskLength {
                len: pattern.len(),
                k,
            });
        }
        if let Some(bad) = pattern.chars().find(|c| !matches!(c, '0' | '1')) {
            return Err(ConfigError::MaskSymbol(bad));
        }
        Ok(Self::from_pattern(pattern.to_owned()))
    }

    /// Random mask with exactly `min(mismatches, k-1)` ignored positions.
    ///
    /// Positions are drawn uniformly; a draw landing on an already ignored
    /// position is repeated. `seed` makes the mask reproducible.
    pub fn random(k: usize, mismatches: usize, seed: Option<u64>) -> Self {
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_os_rng(),
        };
        let target = mismatches.min(k.saturating_sub(1));
        let mut bits = vec![b'1'; k];
        let mut zeros = 0;
        while zeros < target {
            let pos = rng.random_range(0..k);
            if bits[pos] == b'1' {
                bits[pos] = b'0';
                zeros += 1;
            }
        }
        let pattern = bits.into_iter().map(char::from).collect();
        Self::from_pattern(pattern)
    }

    /// Same mask with every ignored position also ignored at its mirror `k-1-i`.
    ///
    /// Both strands of a folded feature then share one set of ignored positions.
    pub fn mirrored(&self) -> Self {
        let bits = self.pattern.as_bytes();
        let k = bits.len();
        let pattern = (0..k)
            .map(|i| if bits[i] == b'0' || bits[k - 1 - i] == b'0' { '0' } else { '1' })
            .collect();
        Self::from_pattern(pattern)
    }

    /// Whether the mask reads the same from both ends.
    pub fn is_symmetric(&self) -> bool {
        self.pattern.bytes().eq(self.pattern.bytes().rev())
    }

    fn from_pattern(pattern: String) -> Self {
        let ignored = pattern
            .bytes()
            .enumerate()
            .filter(|&(_, b)| b == b'0')
            .map(|(i, _)| i)
            .collect();
        Mask { pattern, ignored }
    }

    /// Feature length this mask applies to.
    #[inline]
    pub fn len(&self) -> usize {
        self.pattern.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Ignored positions, ascending.
    #[inline]
    pub fn ignored(&self) -> &[usize] {
        &self.ignored
    }

    #[inline]
    pub fn is_kept(&self, pos: usize) -> bool {
        self.pattern.as_bytes()[pos] == b'1'
    }

    /// Kept positions of `key`, in order.
    pub fn kept<'a>(&'a self, key: &'a [u8]) -> impl Iterator<Item = u8> + 'a {
        key.iter()
            .zip(self.pattern.bytes())
            .filter(|&(_, m)| m == b'1')
            .map(|(&c, _)| c)
    }

    /// Equality over kept positions only.
    pub fn matches(&self, a: &[u8], b: &[u8]) -> bool {
        a.len() == b.len()
            && a.len() == self.len()
            && a
                .iter()
                .zip(b)
                .zip(self.pattern.bytes())
                .all(|((x, y), m)| m == b'0' || x == y)
    }

    /// Remove the contribution of every ignored position of `key` from `hash`.
    #[inline]
    pub fn adjust(&self, hash: u16, key: &[u8], alphabet: Alphabet, powers: &PowerTable) -> u16 {
        let k = self.len();
        self.ignored.iter().fold(hash, |h, &j| {
            h.wrapping_sub(powers.term(alphabet.value(key[j]), k - 1 - j))
        })
    }
}

impl fmt::Display for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}
