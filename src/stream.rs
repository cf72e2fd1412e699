//! Stream driver: chunked input → window → feature table → sink.
//!
//! FASTA headers (`>` through end of line) are skipped and reset the window.
//! In multi-record mode each header after the first flushes the profile of
//! the record it closes. The header state survives chunk boundaries.

use std::fs::{File, Metadata};
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::ProfileError;
use crate::output::ProfileSink;
use crate::scheme::FeatureScheme;
use crate::table::FeatureTable;
use crate::window::Window;

/// Smallest read size used for any input.
pub const MIN_CHUNK_SIZE: usize = 8 * 1024;

/// Where the scanner is within the input.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScanState {
    /// Reading sequence bytes.
    Sequence,
    /// Inside a header line; bytes are discarded up to the next newline.
    Header,
}

/// Preferred read size for a file: its I/O block size, at least [`MIN_CHUNK_SIZE`].
pub fn preferred_chunk_size(meta: &Metadata) -> usize {
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;
        (meta.blksize() as usize).max(MIN_CHUNK_SIZE)
    }
    #[cfg(not(unix))]
    {
        let _ = meta;
        MIN_CHUNK_SIZE
    }
}

/// Feature counter for one stream at a time; reusable across inputs.
pub struct Profiler {
    window: Window,
    table: FeatureTable,
    multi_record: bool,
    state: ScanState,
    seen_header: bool,
    windows: u64,
    records: u64,
}

impl Profiler {
    /// Unrestricted profiler with a fresh rolling table.
    pub fn new(scheme: Arc<FeatureScheme>) -> Self {
        let table = FeatureTable::rolling(scheme);
        Self::with_table(table)
    }

    /// Profiler counting only the features of `vocabulary`.
    pub fn with_vocabulary(mut vocabulary: FeatureTable) -> Self {
        vocabulary.restrict();
        Self::with_table(vocabulary)
    }

    fn with_table(table: FeatureTable) -> Self {
        Profiler {
            window: Window::new(Arc::clone(table.scheme())),
            table,
            multi_record: false,
            state: ScanState::Sequence,
            seen_header: false,
            windows: 0,
            records: 0,
        }
    }

    /// Emit one profile per FASTA record instead of one per input.
    pub fn multi_record(mut self, yes: bool) -> Self {
        self.multi_record = yes;
        self
    }

    #[inline]
    pub fn scheme(&self) -> &Arc<FeatureScheme> {
        self.table.scheme()
    }

    /// Counts accumulated for the current record.
    #[inline]
    pub fn table(&self) -> &FeatureTable {
        &self.table
    }

    #[inline]
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Profiles emitted so far.
    #[inline]
    pub fn records(&self) -> u64 {
        self.records
    }

    /// Consume one chunk of raw input.
    pub fn feed<S: ProfileSink + ?Sized>(
        &mut self,
        chunk: &[u8],
        sink: &mut S,
    ) -> Result<(), ProfileError> {
        let headers = self.scheme().alphabet().recognizes_headers();
        let mut i = 0;
        while i < chunk.len() {
            if self.state == ScanState::Header {
                match chunk[i..].iter().position(|&b| b == b'\n') {
                    Some(p) => {
                        i += p + 1;
                        self.state = ScanState::Sequence;
                    }
                    None => return Ok(()),
                }
                continue;
            }

            let b = chunk[i];
            i += 1;
            if headers && b == b'>' {
                self.enter_header(sink)?;
                continue;
            }
            if b.is_ascii_whitespace() {
                continue;
            }
            if self.window.push(b) {
                let (key, hash) = self.window.canonical();
                self.table.tally_window(key, hash);
                self.windows += 1;
            }
        }
        Ok(())
    }

    /// End of input: flush the last record and rewind for the next input.
    pub fn finish<S: ProfileSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), ProfileError> {
        self.flush(sink)?;
        self.state = ScanState::Sequence;
        self.seen_header = false;
        Ok(())
    }

    /// Profile a whole reader, reading `chunk_size` bytes at a time.
    pub fn profile_reader<R: Read, S: ProfileSink + ?Sized>(
        &mut self,
        mut reader: R,
        chunk_size: usize,
        sink: &mut S,
    ) -> Result<(), ProfileError> {
        let mut buf = vec![0u8; chunk_size.max(1)];
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            self.feed(&buf[..n], sink)?;
        }
        self.finish(sink)
    }

    /// Profile a file; directories are rejected.
    pub fn profile_path<S: ProfileSink + ?Sized>(
        &mut self,
        path: &Path,
        sink: &mut S,
    ) -> Result<(), ProfileError> {
        let open_err = |source| ProfileError::Open {
            path: path.to_path_buf(),
            source,
        };
        let meta = std::fs::metadata(path).map_err(open_err)?;
        if meta.is_dir() {
            return Err(ProfileError::IsDirectory(path.to_path_buf()));
        }
        let file = File::open(path).map_err(open_err)?;
        let chunk = preferred_chunk_size(&meta);
        debug!("profiling {} in {chunk}-byte chunks", path.display());
        self.profile_reader(file, chunk, sink)
    }

    /// Profile standard input.
    pub fn profile_stdin<S: ProfileSink + ?Sized>(
        &mut self,
        sink: &mut S,
    ) -> Result<(), ProfileError> {
        let stdin = io::stdin();
        self.profile_reader(stdin.lock(), MIN_CHUNK_SIZE, sink)
    }

    fn enter_header<S: ProfileSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), ProfileError> {
        self.state = ScanState::Header;
        self.window.reset();
        if self.multi_record && self.seen_header {
            self.flush(sink)?;
        }
        self.seen_header = true;
        Ok(())
    }

    fn flush<S: ProfileSink + ?Sized>(&mut self, sink: &mut S) -> Result<(), ProfileError> {
        self.window.reset();
        if self.table.is_empty() && !self.table.is_restricted() {
            warn!("no features of length {} found", self.scheme().k());
        }
        debug!(
            "record {}: {} windows, {} distinct features",
            self.records,
            self.windows,
            self.table.len()
        );
        sink.emit(&self.table)?;
        if self.table.is_restricted() {
            self.table.reset();
        } else {
            self.table.clear();
        }
        self.windows = 0;
        self.records += 1;
        Ok(())
    }
}
