//! Run configuration: builder → validated [`FeatureScheme`] and [`Profiler`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use crate::alphabet::Alphabet;
use crate::error::{ConfigError, ProfileError};
use crate::mask::Mask;
use crate::scheme::{FeatureScheme, StrandRule};
use crate::stream::Profiler;
use crate::vocab::load_vocabulary;

/// Feature length used when none is given.
pub const DEFAULT_FEATURE_LEN: usize = 10;
/// Longest feature accepted unless overridden.
pub const DEFAULT_MAX_FEATURE_LEN: usize = 40;
/// Environment variable overriding [`DEFAULT_MAX_FEATURE_LEN`].
pub const MAX_FEATURE_LEN_ENV: &str = "MAX_WORD_SIZE";

/// Parse a maximum-length override; missing, zero or malformed values fall back to the default.
pub fn parse_max_feature_len(value: Option<&str>) -> usize {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_MAX_FEATURE_LEN)
}

/// Maximum feature length from [`MAX_FEATURE_LEN_ENV`].
pub fn max_feature_len_from_env() -> usize {
    parse_max_feature_len(std::env::var(MAX_FEATURE_LEN_ENV).ok().as_deref())
}

/// Profiling configuration.
///
/// Defaults: RY-coded nucleotides, k = 10, reverse-complement folding on,
/// lexicographic strand rule, one profile per input.
#[derive(Clone, Debug)]
pub struct ProfileConfig {
    alphabet: Alphabet,
    k: usize,
    max_k: Option<usize>,
    mask: Option<String>,
    random_mismatches: Option<usize>,
    seed: Option<u64>,
    reverse_complement: bool,
    strand_rule: StrandRule,
    multi_record: bool,
    vocabulary: Option<PathBuf>,
    threads: Option<usize>,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            alphabet: Alphabet::NucleotideRy,
            k: DEFAULT_FEATURE_LEN,
            max_k: None,
            mask: None,
            random_mismatches: None,
            seed: None,
            reverse_complement: true,
            strand_rule: StrandRule::Lexicographic,
            multi_record: false,
            vocabulary: None,
            threads: None,
        }
    }
}

impl ProfileConfig {
    /// Symbol alphabet (including folding sub-mode).
    pub fn alphabet(mut self, a: Alphabet) -> Self {
        self.alphabet = a;
        self
    }
    /// Feature length `k`.
    pub fn length(mut self, k: usize) -> Self {
        self.k = k;
        self
    }
    /// Maximum feature length; defaults to [`max_feature_len_from_env`].
    pub fn max_length(mut self, n: usize) -> Self {
        self.max_k = Some(n);
        self
    }
    /// Explicit mask pattern over `{0,1}`.
    pub fn mask(mut self, pattern: impl Into<String>) -> Self {
        self.mask = Some(pattern.into());
        self
    }
    /// Random mask with `m` ignored positions.
    pub fn random_mask(mut self, m: usize) -> Self {
        self.random_mismatches = Some(m);
        self
    }
    /// Seed for the random mask.
    pub fn seed(mut self, s: u64) -> Self {
        self.seed = Some(s);
        self
    }
    /// Fold nucleotide features with their reverse complement (ignored for other alphabets).
    pub fn reverse_complement(mut self, yes: bool) -> Self {
        self.reverse_complement = yes;
        self
    }
    /// Canonical strand rule.
    pub fn strand_rule(mut self, r: StrandRule) -> Self {
        self.strand_rule = r;
        self
    }
    /// One profile per FASTA record.
    pub fn multi_record(mut self, yes: bool) -> Self {
        self.multi_record = yes;
        self
    }
    /// Restrict counting to the features listed in `path`.
    pub fn vocabulary(mut self, path: impl Into<PathBuf>) -> Self {
        self.vocabulary = Some(path.into());
        self
    }
    /// Fix the number of rayon threads for batch runs.
    pub fn threads(mut self, n: usize) -> Self {
        self.threads = Some(n);
        self
    }

    pub fn k(&self) -> usize {
        self.k
    }
    pub fn vocabulary_path(&self) -> Option<&Path> {
        self.vocabulary.as_deref()
    }
    pub(crate) fn multi_record_flag(&self) -> bool {
        self.multi_record
    }
    pub(crate) fn thread_count(&self) -> Option<usize> {
        self.threads
    }
    /// Effective folding: only nucleotide alphabets have a reverse complement.
    pub(crate) fn reverse_complement_effective(&self) -> bool {
        self.reverse_complement && self.alphabet.is_nucleotide()
    }

    /// Validate and build the scheme. A random mask is drawn here.
    pub fn scheme(&self) -> Result<FeatureScheme, ConfigError> {
        let k = self.k;
        let max = self.max_k.unwrap_or_else(max_feature_len_from_env);
        if k == 0 {
            return Err(ConfigError::ZeroLength);
        }
        if k > max {
            return Err(ConfigError::FeatureTooLong { k, max });
        }

        let mask = match (&self.mask, self.random_mismatches) {
            (Some(_), Some(_)) => {
                return Err(ConfigError::ConflictingOptions("mask", "random mask"));
            }
            (Some(p), None) => Some(Mask::parse(p, k)?),
            (None, Some(m)) => {
                if m >= k {
                    warn!("random mask mismatches {m} clamped to {}", k - 1);
                }
                Some(Mask::random(k, m, self.seed))
            }
            (None, None) => {
                if self.seed.is_some() {
                    warn!("seed given without a random mask; ignored");
                }
                None
            }
        };
        let requested = mask.clone();
        if self.reverse_complement && !self.alphabet.is_nucleotide() {
            warn!("reverse-complement folding disabled for the {} alphabet", self.alphabet);
        }

        let scheme = FeatureScheme::new(
            self.alphabet,
            k,
            mask,
            self.reverse_complement_effective(),
            self.strand_rule,
        )?;
        if let (Some(req), Some(eff)) = (&requested, scheme.mask()) {
            if !req.is_symmetric() && scheme.folds_strands() {
                warn!("mask {req} mirrored to {eff} for reverse-complement folding");
            }
            info!("using feature mask: {eff}");
        }
        Ok(scheme)
    }

    /// Build a ready profiler, loading the vocabulary if one is configured.
    pub fn profiler(&self) -> Result<Profiler, ProfileError> {
        let scheme = Arc::new(self.scheme()?);
        let profiler = match &self.vocabulary {
            Some(path) => Profiler::with_vocabulary(load_vocabulary(path, scheme)?),
            None => Profiler::new(scheme),
        };
        Ok(profiler.multi_record(self.multi_record))
    }
}
