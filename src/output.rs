//! Profile sinks: tab-separated printer and in-memory collector.

use std::collections::BTreeMap;
use std::io::{self, Write};

use crate::error::ProfileError;
use crate::table::FeatureTable;

/// Receives one completed profile per flush.
pub trait ProfileSink {
    fn emit(&mut self, table: &FeatureTable) -> Result<(), ProfileError>;
}

/// Write one profile line.
///
/// `feature\tcount\t...\tfeature\tcount\n`, or only the counts when
/// `values_only` is set. An empty table yields a bare newline.
pub fn write_profile<W: Write>(
    out: &mut W,
    table: &FeatureTable,
    values_only: bool,
) -> io::Result<()> {
    let mut first = true;
    for (key, count) in table.iter() {
        if !first {
            out.write_all(b"\t")?;
        }
        first = false;
        if !values_only {
            out.write_all(key)?;
            out.write_all(b"\t")?;
        }
        write!(out, "{count}")?;
    }
    out.write_all(b"\n")
}

/// Tab-separated profile printer.
pub struct TsvWriter<W: Write> {
    out: W,
    values_only: bool,
}

impl<W: Write> TsvWriter<W> {
    pub fn new(out: W) -> Self {
        TsvWriter {
            out,
            values_only: false,
        }
    }

    /// Print counts only (vocabulary runs).
    pub fn values_only(mut self, yes: bool) -> Self {
        self.values_only = yes;
        self
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ProfileSink for TsvWriter<W> {
    fn emit(&mut self, table: &FeatureTable) -> Result<(), ProfileError> {
        write_profile(&mut self.out, table, self.values_only)?;
        Ok(())
    }
}

/// Snapshot of one flushed profile, in enumeration order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Profile {
    pub features: Vec<(Vec<u8>, u32)>,
}

impl Profile {
    pub fn from_table(table: &FeatureTable) -> Self {
        Profile {
            features: table.iter().map(|(k, v)| (k.to_vec(), v)).collect(),
        }
    }

    /// Count stored under the exact canonical key.
    pub fn get(&self, key: &[u8]) -> Option<u32> {
        self.features
            .iter()
            .find(|(k, _)| k.as_slice() == key)
            .map(|&(_, v)| v)
    }

    pub fn total(&self) -> u64 {
        self.features.iter().map(|&(_, v)| u64::from(v)).sum()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Features sorted by key.
    pub fn to_map(&self) -> BTreeMap<Vec<u8>, u32> {
        self.features.iter().cloned().collect()
    }
}

impl ProfileSink for Vec<Profile> {
    fn emit(&mut self, table: &FeatureTable) -> Result<(), ProfileError> {
        self.push(Profile::from_table(table));
        Ok(())
    }
}
