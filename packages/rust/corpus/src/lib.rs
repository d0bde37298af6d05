//! Corpus construction: row normalization, required-field filtering, and
//! grouping of term names under their synonym-source key.

mod aggregate;
mod normalize;

use std::path::Path;

use tracing::{error, info, instrument};

use pharmacorpus_dataset::{OutputMeta, read_json, write_json};
use pharmacorpus_shared::{Corpus, Result};

pub use aggregate::{CorpusBuilder, aggregate};
pub use normalize::{drop_incomplete, normalize_table};

/// Persist a corpus as an indented UTF-8 JSON object.
#[instrument(skip_all, fields(path = %path.display(), keys = corpus.len()))]
pub fn write_corpus(path: &Path, corpus: &Corpus) -> Result<OutputMeta> {
    let meta =
        write_json(path, corpus).inspect_err(|e| error!(error = %e, "failed to write corpus"))?;
    info!(size = meta.size_bytes, "corpus saved");
    Ok(meta)
}

/// Load a corpus file written by [`write_corpus`] (or any string → string-array object).
#[instrument(skip_all, fields(path = %path.display()))]
pub fn read_corpus(path: &Path) -> Result<Corpus> {
    let corpus: Corpus =
        read_json(path).inspect_err(|e| error!(error = %e, "failed to load corpus"))?;
    info!(keys = corpus.len(), "corpus loaded");
    Ok(corpus)
}

#[cfg(test)]
mod tests {
    use pharmacorpus_shared::{PharmaCorpusError, Table};

    use super::*;

    fn temp_dir() -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("pc-corpus-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn corpus_file_round_trip() {
        let dir = temp_dir();
        let path = dir.join("abcfarma_corpus.json");

        let mut table = Table::new(vec!["nome".into(), "composição".into()]);
        table.push_row(vec!["Cataflam".into(), "Diclofenaco Potássico".into()]);
        table.push_row(vec!["Voltaren".into(), "Diclofenaco Sódico".into()]);
        table.push_row(vec!["Biofenac".into(), "Diclofenaco Sódico".into()]);
        normalize_table(&mut table);
        let corpus = aggregate(&table, "nome", "composição").expect("aggregate");

        write_corpus(&path, &corpus).expect("write");
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"diclofenaco sódico\""));

        let back = read_corpus(&path).expect("read");
        assert_eq!(back, corpus);
        assert_eq!(
            back.get("diclofenaco sódico").unwrap(),
            ["biofenac", "voltaren"]
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn non_corpus_json_is_load_error() {
        let dir = temp_dir();
        let path = dir.join("wrong.json");
        std::fs::write(&path, r#"{"a": "not a list"}"#).unwrap();

        let err = read_corpus(&path).unwrap_err();
        assert!(matches!(err, PharmaCorpusError::Load { .. }));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn serialized_form_is_plain_mapping() {
        let mut table = Table::new(vec!["nome".into(), "composição".into()]);
        table.push_row(vec!["x".into(), "a".into()]);
        let corpus = aggregate(&table, "nome", "composição").expect("aggregate");
        assert_eq!(
            serde_json::to_value(&corpus).unwrap(),
            serde_json::json!({"a": ["x"]})
        );
    }
}
