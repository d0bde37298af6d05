//! Pipeline orchestration for pharmacorpus.
//!
//! Ties the dataset, corpus, cleaner, and template crates together into the
//! three one-shot workflows: corpus build, description cleaning, and
//! template merge.

pub mod clean;
pub mod merge;
pub mod pipeline;

pub use clean::{CleanConfig, CleanResult, clean_descriptions};
pub use merge::{MergeConfig, MergeResult, merge_template};
pub use pipeline::{CorpusBuild, CorpusOutcome, ProgressReporter, SilentProgress, build_corpus};

#[cfg(test)]
pub(crate) fn temp_dir(prefix: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(format!("{prefix}-{}", uuid::Uuid::now_v7()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}
