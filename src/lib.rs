//! Feature Frequency Profiles (FFP): streaming k-mer counting in modern Rust (edition 2024).
//!
//! - Nucleotide (plain or RY-coded), amino-acid (plain or 12-class) and text alphabets
//! - O(1) rolling forward and reverse-complement hashes (16-bit, base 16807)
//! - Spaced-seed masks: explicit or random (seedable)
//! - Vocabulary restriction with stable, values-only output
//! - Chunked FASTA driver with per-record profiles
//!
//! A [`ProfileConfig`] is validated once into an immutable [`FeatureScheme`];
//! the [`Profiler`] owns one [`Window`] and one [`FeatureTable`] and pushes
//! each completed record to a [`ProfileSink`].
//!
//! Enumeration order is bucket order, then chain order: deterministic for a
//! given input, but neither sorted nor insertion order.

pub mod alphabet;
mod batch;
mod config;
mod error;
mod mask;
mod output;
mod power;
mod scheme;
mod stream;
mod table;
mod vocab;
mod window;

pub use alphabet::Alphabet;
pub use batch::profile_files_parallel;
pub use config::{
    DEFAULT_FEATURE_LEN, DEFAULT_MAX_FEATURE_LEN, MAX_FEATURE_LEN_ENV, ProfileConfig,
    max_feature_len_from_env, parse_max_feature_len,
};
pub use error::{ConfigError, ProfileError};
pub use mask::Mask;
pub use output::{Profile, ProfileSink, TsvWriter, write_profile};
pub use power::{PowerTable, ROLL_BASE, ROLL_BASE_INV, ROLLING_BUCKETS};
pub use scheme::{FeatureScheme, StrandRule};
pub use stream::{MIN_CHUNK_SIZE, Profiler, ScanState, preferred_chunk_size};
pub use table::{FeatureTable, SIMPLE_BUCKETS, TableLayout, Tally};
pub use vocab::{load_vocabulary, vocabulary_from_reader};
pub use window::Window;
