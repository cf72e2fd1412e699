//! Feature scheme: the immutable hashing/equality strategy of one run.
//!
//! Alphabet, feature length, optional mask and strand folding are fixed at
//! construction. Window and table share one scheme through an `Arc`.

use crate::alphabet::Alphabet;
use crate::error::ConfigError;
use crate::mask::Mask;
use crate::power::PowerTable;

/// Rule picking the canonical strand of a nucleotide feature.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StrandRule {
    /// Lexicographically smaller of forward and reverse complement.
    #[default]
    Lexicographic,
    /// Strand with the smaller rolling hash; ties keep the forward strand.
    /// May disagree with string order.
    HashValue,
}

/// Hashing, equality and canonicalization for features of one length.
#[derive(Clone, Debug)]
pub struct FeatureScheme {
    alphabet: Alphabet,
    k: usize,
    mask: Option<Mask>,
    fold_strands: bool,
    strand_rule: StrandRule,
    powers: PowerTable,
}

impl FeatureScheme {
    pub fn new(
        alphabet: Alphabet,
        k: usize,
        mask: Option<Mask>,
        fold_strands: bool,
        strand_rule: StrandRule,
    ) -> Result<Self, ConfigError> {
        if k == 0 {
            return Err(ConfigError::ZeroLength);
        }
        if let Some(m) = &mask {
            if m.len() != k {
                return Err(ConfigError::MaskLength { len: m.len(), k });
            }
        }
        if fold_strands && !alphabet.is_nucleotide() {
            return Err(ConfigError::ReverseComplementUnsupported(alphabet));
        }
        // folded features are compared on both strands
        let mask = match mask {
            Some(m) if fold_strands => Some(m.mirrored()),
            other => other,
        };
        Ok(FeatureScheme {
            alphabet,
            k,
            mask,
            fold_strands,
            strand_rule,
            powers: PowerTable::new(k, alphabet.radix()),
        })
    }

    #[inline]
    pub fn alphabet(&self) -> Alphabet {
        self.alphabet
    }

    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    #[inline]
    pub fn mask(&self) -> Option<&Mask> {
        self.mask.as_ref()
    }

    /// Whether features are folded onto one strand.
    #[inline]
    pub fn folds_strands(&self) -> bool {
        self.fold_strands
    }

    #[inline]
    pub fn strand_rule(&self) -> StrandRule {
        self.strand_rule
    }

    #[inline]
    pub fn powers(&self) -> &PowerTable {
        &self.powers
    }

    /// From-scratch rolling hash of a canonical key, ignoring the mask.
    pub fn hash(&self, key: &[u8]) -> u16 {
        self.powers.hash(key.iter().map(|&c| self.alphabet.value(c)))
    }

    /// Bucket hash of a canonical key whose unmasked hash is `hash`.
    #[inline]
    pub fn bucket_hash(&self, key: &[u8], hash: u16) -> u16 {
        match &self.mask {
            Some(m) => m.adjust(hash, key, self.alphabet, &self.powers),
            None => hash,
        }
    }

    /// Key equality: full, or over kept mask positions.
    #[inline]
    pub fn keys_equal(&self, a: &[u8], b: &[u8]) -> bool {
        match &self.mask {
            Some(m) => m.matches(a, b),
            None => a == b,
        }
    }

    /// Pick the canonical strand given both strings and their unmasked rolling hashes.
    ///
    /// With a mask only kept positions take part, so keys equal under the
    /// mask always pick equal representatives. Ties keep the forward strand.
    #[inline]
    pub fn choose_strand<'a>(
        &self,
        fwd: &'a [u8],
        fwd_hash: u16,
        rev: &'a [u8],
        rev_hash: u16,
    ) -> (&'a [u8], u16) {
        let take_rev = match (self.strand_rule, &self.mask) {
            (StrandRule::Lexicographic, None) => rev < fwd,
            (StrandRule::Lexicographic, Some(m)) => m.kept(rev).lt(m.kept(fwd)),
            (StrandRule::HashValue, _) => {
                self.bucket_hash(fwd, fwd_hash) > self.bucket_hash(rev, rev_hash)
            }
        };
        if take_rev {
            (rev, rev_hash)
        } else {
            (fwd, fwd_hash)
        }
    }

    /// Canonical form of a raw key: folded, upper-cased, strand chosen.
    ///
    /// `None` if the key has the wrong length or holds invalid symbols.
    pub fn canonical_key(&self, raw: &[u8]) -> Option<Vec<u8>> {
        if raw.len() != self.k {
            return None;
        }
        let fwd = self.alphabet.fold_key(raw)?;
        if !self.fold_strands {
            return Some(fwd);
        }
        let rev = self.alphabet.reverse_complement(&fwd)?;
        let (fh, rh) = (self.hash(&fwd), self.hash(&rev));
        let (chosen, _) = self.choose_strand(&fwd, fh, &rev, rh);
        Some(chosen.to_vec())
    }
}
