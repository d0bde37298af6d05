//! Description cleaning pipeline: dataset → field extraction → cleaned table.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing::{info, instrument};

use pharmacorpus_cleaner::{FieldExtractor, clean_table};
use pharmacorpus_dataset::{OutputMeta, load_table, write_table};
use pharmacorpus_shared::{CleanerConfig, PharmaCorpusError, Result};

use crate::pipeline::ProgressReporter;

/// Resolved inputs for [`clean_descriptions`].
#[derive(Debug, Clone)]
pub struct CleanConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub sheet: Option<String>,
    pub description_column: String,
    pub cleaned_column: String,
}

impl CleanConfig {
    /// Resolve paths from the `[cleaner]` section. The input is required.
    pub fn from_config(config: &CleanerConfig) -> Result<Self> {
        let input = config
            .input
            .clone()
            .ok_or_else(|| PharmaCorpusError::config("no input file configured for the cleaner"))?;
        let output = config
            .output_path()
            .ok_or_else(|| PharmaCorpusError::config("no output file configured for the cleaner"))?;

        Ok(Self {
            input,
            output,
            sheet: config.sheet.clone(),
            description_column: config.description_column.clone(),
            cleaned_column: config.cleaned_column.clone(),
        })
    }
}

/// Result of [`clean_descriptions`].
#[derive(Debug)]
pub struct CleanResult {
    pub rows: usize,
    /// Rows where at least one field was extracted.
    pub rows_with_fields: usize,
    pub output: OutputMeta,
    pub elapsed: Duration,
}

/// Extract dose/form/recipient from every description and write the
/// cleaned table.
#[instrument(skip_all, fields(input = %config.input.display()))]
pub fn clean_descriptions(
    config: &CleanConfig,
    extractor: &FieldExtractor,
    progress: &dyn ProgressReporter,
) -> Result<CleanResult> {
    let start = Instant::now();

    progress.phase("Loading descriptions");
    let table = load_table(&config.input, config.sheet.as_deref())?;

    progress.phase("Extracting fields");
    let table = clean_table(
        table,
        extractor,
        &config.description_column,
        &config.cleaned_column,
    )?;

    let field_columns: Vec<usize> = ["dose", "form", "recipient"]
        .iter()
        .filter_map(|name| table.column_index(name))
        .collect();
    let rows_with_fields = table
        .rows()
        .iter()
        .filter(|row| field_columns.iter().any(|&idx| row[idx].is_present()))
        .count();

    progress.phase("Writing cleaned table");
    let output = write_table(&config.output, &table)?;

    let result = CleanResult {
        rows: table.len(),
        rows_with_fields,
        output,
        elapsed: start.elapsed(),
    };

    info!(
        rows = result.rows,
        rows_with_fields = result.rows_with_fields,
        output = %result.output.path.display(),
        sha256 = %result.output.sha256,
        elapsed_ms = result.elapsed.as_millis(),
        "cleaning complete"
    );

    progress.done(&format!(
        "{} rows cleaned, output saved to {}",
        result.rows,
        result.output.path.display()
    ));

    Ok(result)
}

#[cfg(test)]
mod tests {
    use pharmacorpus_shared::Cell;

    use super::*;
    use crate::pipeline::SilentProgress;

    #[test]
    fn cleans_csv_descriptions() {
        let dir = crate::temp_dir("pc-core-clean");
        std::fs::write(
            dir.join("descricoes.csv"),
            "EAN,DESCRIÇÃO\n\
             7891058,Sachê 500mg BG\n\
             7896004,produto generico\n\
             7896005,Soro 500ml FR\n",
        )
        .unwrap();

        let cleaner = CleanerConfig {
            input: Some(dir.join("descricoes.csv")),
            output: Some(dir.join("limpo.csv")),
            ..CleanerConfig::default()
        };
        let config = CleanConfig::from_config(&cleaner).expect("resolve");
        let result =
            clean_descriptions(&config, &FieldExtractor::default(), &SilentProgress).expect("clean");

        assert_eq!(result.rows, 3);
        assert_eq!(result.rows_with_fields, 2);

        let out = load_table(&dir.join("limpo.csv"), None).expect("reload");
        assert_eq!(
            out.columns(),
            ["EAN", "DESCRIÇÃO", "dose", "form", "recipient", "xprod_cleaned"]
        );
        assert_eq!(out.rows()[0][2], Cell::from("500mg"));
        assert_eq!(out.rows()[0][3], Cell::from("Sachê"));
        assert_eq!(out.rows()[1][5], Cell::from("produto generico"));
        assert_eq!(out.rows()[2][5], Cell::from("Soro"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn input_is_required() {
        let err = CleanConfig::from_config(&CleanerConfig::default()).unwrap_err();
        assert!(matches!(err, PharmaCorpusError::Config { .. }));
    }

    #[test]
    fn missing_description_column_writes_nothing() {
        let dir = crate::temp_dir("pc-core-clean-col");
        std::fs::write(dir.join("in.csv"), "EAN,NOME\n1,Novalgina\n").unwrap();

        let config = CleanConfig {
            input: dir.join("in.csv"),
            output: dir.join("out.csv"),
            sheet: None,
            description_column: "DESCRIÇÃO".into(),
            cleaned_column: "xprod_cleaned".into(),
        };
        assert!(clean_descriptions(&config, &FieldExtractor::default(), &SilentProgress).is_err());
        assert!(!dir.join("out.csv").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
