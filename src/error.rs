//! Error types for configuration and profiling.

use std::path::PathBuf;
use thiserror::Error;

use crate::alphabet::Alphabet;

#[derive(Debug, Error)]
/// Invalid run configuration; raised before any input is read.
pub enum ConfigError {
    /// Feature length of zero.
    #[error("feature length must be at least 1")]
    ZeroLength,
    /// Feature length above the configured maximum.
    #[error(
        "feature length {k} exceeds maximum {max} (raise MAX_WORD_SIZE to allow longer features)"
    )]
    FeatureTooLong { k: usize, max: usize },
    /// Mask pattern length differs from the feature length.
    #[error("mask length {len} does not match feature length {k}")]
    MaskLength { len: usize, k: usize },
    /// Mask pattern contains something other than '0' or '1'.
    #[error("mask may only contain '0' and '1', found {0:?}")]
    MaskSymbol(char),
    /// Two options that cannot be combined.
    #[error("options {0} and {1} are mutually exclusive")]
    ConflictingOptions(&'static str, &'static str),
    /// Reverse-complement folding requested for a non-nucleotide alphabet.
    #[error("reverse-complement folding is not defined for the {0} alphabet")]
    ReverseComplementUnsupported(Alphabet),
}

#[derive(Debug, Error)]
/// Errors returned while loading vocabularies or profiling input.
pub enum ProfileError {
    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Input could not be opened.
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A directory was given where a file was expected.
    #[error("{} is a directory", .0.display())]
    IsDirectory(PathBuf),
    /// Vocabulary token of the wrong length.
    #[error("vocabulary feature {token:?} has length {len}, expected {k}")]
    VocabularyLength { token: String, len: usize, k: usize },
}
