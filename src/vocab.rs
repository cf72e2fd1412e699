//! Vocabulary restriction: a pre-seeded, sealed feature table.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use tracing::warn;

use crate::error::ProfileError;
use crate::scheme::FeatureScheme;
use crate::table::{FeatureTable, Tally};

/// Load a whitespace-separated feature list from `path`.
pub fn load_vocabulary(
    path: &Path,
    scheme: Arc<FeatureScheme>,
) -> Result<FeatureTable, ProfileError> {
    if path.is_dir() {
        return Err(ProfileError::IsDirectory(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|source| ProfileError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    vocabulary_from_reader(file, scheme)
}

/// Seed a restricted table with every token of `reader`, each with count 0.
///
/// Every token must be exactly `k` bytes long. Tokens holding symbols
/// outside the alphabet are skipped with a warning.
pub fn vocabulary_from_reader<R: Read>(
    reader: R,
    scheme: Arc<FeatureScheme>,
) -> Result<FeatureTable, ProfileError> {
    let k = scheme.k();
    let mut table = FeatureTable::rolling(scheme);
    let mut reader = BufReader::new(reader);
    let mut line = Vec::new();
    let mut skipped = 0usize;

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        for token in line
            .split(|b| b.is_ascii_whitespace())
            .filter(|t| !t.is_empty())
        {
            if token.len() != k {
                return Err(ProfileError::VocabularyLength {
                    token: String::from_utf8_lossy(token).into_owned(),
                    len: token.len(),
                    k,
                });
            }
            if table.increment(token, 0) == Tally::Ignored {
                warn!(
                    "skipping vocabulary feature {:?}: invalid symbol",
                    String::from_utf8_lossy(token)
                );
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!("{skipped} vocabulary feature(s) skipped");
    }
    table.restrict();
    Ok(table)
}
