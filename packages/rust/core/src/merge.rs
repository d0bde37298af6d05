//! Template merge pipeline: corpus + template → patched template.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{info, instrument};

use pharmacorpus_corpus::read_corpus;
use pharmacorpus_dataset::OutputMeta;
use pharmacorpus_shared::{PharmaCorpusError, Result};
use pharmacorpus_template::Template;

use crate::pipeline::ProgressReporter;

/// Resolved inputs for [`merge_template`].
#[derive(Debug, Clone)]
pub struct MergeConfig {
    /// Corpus JSON produced by the corpus build.
    pub corpus: PathBuf,
    /// Template to read; never written.
    pub input: PathBuf,
    /// Patched template destination.
    pub output: PathBuf,
}

/// Result of [`merge_template`].
#[derive(Debug)]
pub struct MergeResult {
    /// Terms appended to the first library.
    pub appended: usize,
    /// Terms in the first library after the merge.
    pub total_terms: usize,
    pub output: OutputMeta,
    pub elapsed: Duration,
}

/// Append one term per corpus entry to the template's first library and
/// write the result to `config.output`.
#[instrument(skip_all, fields(corpus = %config.corpus.display(), template = %config.input.display()))]
pub fn merge_template(
    config: &MergeConfig,
    progress: &dyn ProgressReporter,
) -> Result<MergeResult> {
    let start = Instant::now();

    if same_file(&config.input, &config.output) {
        return Err(PharmaCorpusError::validation(format!(
            "output {} would overwrite the input template",
            config.output.display()
        )));
    }

    progress.phase("Loading corpus");
    let corpus = read_corpus(&config.corpus)?;

    progress.phase("Loading template");
    let mut template = Template::read(&config.input)?;

    progress.phase("Injecting terms");
    let appended = template.inject(&corpus)?;

    progress.phase("Writing template");
    let output = template.write(&config.output)?;

    let result = MergeResult {
        appended,
        total_terms: template.terms().len(),
        output,
        elapsed: start.elapsed(),
    };

    info!(
        appended = result.appended,
        total_terms = result.total_terms,
        output = %result.output.path.display(),
        sha256 = %result.output.sha256,
        elapsed_ms = result.elapsed.as_millis(),
        "template merge complete"
    );

    progress.done(&format!(
        "{} terms added, template saved to {}",
        result.appended,
        result.output.path.display()
    ));

    Ok(result)
}

/// Whether `output` names the same file as `input`, after resolving `..`,
/// symlinks, and relative spellings. An output that does not exist yet is
/// resolved through its parent directory.
fn same_file(input: &Path, output: &Path) -> bool {
    if input == output {
        return true;
    }
    let Ok(input) = std::fs::canonicalize(input) else {
        return false;
    };
    resolve_output(output).is_some_and(|output| output == input)
}

fn resolve_output(output: &Path) -> Option<PathBuf> {
    if let Ok(resolved) = std::fs::canonicalize(output) {
        return Some(resolved);
    }
    let file_name = output.file_name()?;
    let parent = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::canonicalize(parent)
        .ok()
        .map(|parent| parent.join(file_name))
}
