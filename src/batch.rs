//! Parallel profiling of several inputs with rayon.
//! One profiler per file; all share one immutable scheme (and vocabulary).

use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::ProfileConfig;
use crate::error::ProfileError;
use crate::output::TsvWriter;
use crate::stream::Profiler;
use crate::vocab::load_vocabulary;

/// Profile `paths` in parallel and return each file's rendered output, in input order.
///
/// Configuration and vocabulary errors abort the whole batch; per-file
/// errors are reported in place.
pub fn profile_files_parallel(
    paths: &[PathBuf],
    cfg: &ProfileConfig,
) -> Result<Vec<Result<Vec<u8>, ProfileError>>, ProfileError> {
    if let Some(n) = cfg.thread_count() {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .ok();
    }

    let scheme = Arc::new(cfg.scheme()?);
    let vocabulary = match cfg.vocabulary_path() {
        Some(p) => Some(load_vocabulary(p, Arc::clone(&scheme))?),
        None => None,
    };
    let values_only = vocabulary.is_some();

    let outputs = paths
        .par_iter()
        .map(|path| -> Result<Vec<u8>, ProfileError> {
            let profiler = match &vocabulary {
                Some(v) => Profiler::with_vocabulary(v.clone()),
                None => Profiler::new(Arc::clone(&scheme)),
            };
            let mut profiler = profiler.multi_record(cfg.multi_record_flag());
            let mut sink = TsvWriter::new(Vec::new()).values_only(values_only);
            profiler.profile_path(path, &mut sink)?;
            Ok(sink.into_inner())
        })
        .collect();
    Ok(outputs)
}
