//! Corpus build pipeline: dataset → normalize → filter → aggregate → corpus
//! file + Parquet snapshot.
//!
//! Also home of the [`ProgressReporter`] seam shared by every pipeline.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, instrument, warn};

use pharmacorpus_corpus::{aggregate, drop_incomplete, normalize_table, write_corpus};
use pharmacorpus_dataset::{OutputMeta, load_table, write_snapshot};
use pharmacorpus_shared::{Corpus, CorpusConfig, PharmaCorpusError, Result};

/// Progress callback for reporting pipeline status.
pub trait ProgressReporter: Send + Sync {
    /// Called when entering a new phase.
    fn phase(&self, name: &str);
    /// Called once when the pipeline finishes, with a one-line summary.
    fn done(&self, summary: &str);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn phase(&self, _name: &str) {}
    fn done(&self, _summary: &str) {}
}

/// Outcome of [`build_corpus`].
#[derive(Debug)]
pub enum CorpusOutcome {
    /// Corpus and snapshot written.
    Built(CorpusBuild),
    /// The dataset file does not exist; nothing was written.
    Skipped { dataset: PathBuf },
}

/// Result of a completed corpus build.
#[derive(Debug)]
pub struct CorpusBuild {
    pub corpus: Corpus,
    /// Rows read from the dataset.
    pub rows_loaded: usize,
    /// Rows left after dropping incomplete ones.
    pub rows_kept: usize,
    pub corpus_file: OutputMeta,
    pub snapshot_file: OutputMeta,
    pub elapsed: Duration,
}

/// Run the corpus build pipeline.
///
/// 1. Load the dataset (first sheet unless one is configured)
/// 2. Lowercase headers and text cells
/// 3. Drop rows missing the term or synonym column
/// 4. Group term names under their synonym-source key
/// 5. Write the corpus JSON, then the filtered table as a Parquet snapshot
///
/// A dataset path that does not exist yields [`CorpusOutcome::Skipped`].
#[instrument(skip_all, fields(origin = %config.origin))]
pub fn build_corpus(
    config: &CorpusConfig,
    progress: &dyn ProgressReporter,
) -> Result<CorpusOutcome> {
    let start = Instant::now();

    let dataset = config
        .dataset
        .as_deref()
        .ok_or_else(|| PharmaCorpusError::config("no dataset configured for the corpus build"))?;

    if !dataset.exists() {
        warn!(path = %dataset.display(), "dataset file not found, skipping corpus build");
        progress.done(&format!("dataset {} not found, nothing built", dataset.display()));
        return Ok(CorpusOutcome::Skipped {
            dataset: dataset.to_path_buf(),
        });
    }

    // --- Phase 1: Load ---
    progress.phase("Loading dataset");
    let mut table = load_table(dataset, config.sheet.as_deref())?;
    let rows_loaded = table.len();

    // --- Phase 2: Normalize + filter ---
    progress.phase("Normalizing rows");
    normalize_table(&mut table);
    let term_column = config.term_column.to_lowercase();
    let synonym_column = config.synonym_column.to_lowercase();
    drop_incomplete(&mut table, &[&term_column, &synonym_column])?;

    // --- Phase 3: Aggregate ---
    progress.phase("Aggregating corpus");
    let corpus = aggregate(&table, &term_column, &synonym_column)?;

    // --- Phase 4: Persist ---
    progress.phase("Writing corpus");
    let corpus_file = write_corpus(&config.output_path(), &corpus)?;

    progress.phase("Writing snapshot");
    let snapshot_file = write_snapshot(&config.snapshot_path(), &table)?;

    let build = CorpusBuild {
        rows_loaded,
        rows_kept: table.len(),
        corpus,
        corpus_file,
        snapshot_file,
        elapsed: start.elapsed(),
    };

    info!(
        rows_loaded = build.rows_loaded,
        rows_kept = build.rows_kept,
        keys = build.corpus.len(),
        synonyms = build.corpus.synonym_count(),
        corpus = %build.corpus_file.path.display(),
        sha256 = %build.corpus_file.sha256,
        elapsed_ms = build.elapsed.as_millis(),
        "corpus build complete"
    );

    progress.done(&format!(
        "{} terms from {} rows saved to {}",
        build.corpus.len(),
        build.rows_kept,
        build.corpus_file.path.display()
    ));

    Ok(CorpusOutcome::Built(build))
}
