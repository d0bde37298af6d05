//! Lemma table: inflected form → dictionary base form.
//!
//! File format: one `lemma<TAB>form` pair per line, `#` comments allowed.

use std::path::Path;

use rustc_hash::FxHashMap;
use tracing::debug;

use pharmacorpus_shared::{PharmaCorpusError, Result};

#[derive(Debug, Clone, Default)]
pub struct LemmaTable {
    lemmas: FxHashMap<String, String>,
}

impl LemmaTable {
    /// Load a lemma table file. When a form is listed under several lemmas the
    /// first one wins.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PharmaCorpusError::io(path, e))?;
        let table = Self::parse(&content).map_err(|msg| PharmaCorpusError::load(path, msg))?;
        debug!(path = %path.display(), forms = table.len(), "lemma table loaded");
        Ok(table)
    }

    fn parse(content: &str) -> std::result::Result<Self, String> {
        let mut table = Self::default();
        for (n, line) in content.lines().enumerate() {
            let line = line.trim_start_matches('\u{feff}').trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut fields = line.split('\t');
            match (fields.next(), fields.next()) {
                (Some(lemma), Some(form)) if !lemma.is_empty() && !form.is_empty() => {
                    table.insert(lemma, form);
                }
                _ => return Err(format!("line {}: expected 'lemma<TAB>form'", n + 1)),
            }
        }
        Ok(table)
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut table = Self::default();
        for (lemma, form) in pairs {
            table.insert(lemma, form);
        }
        table
    }

    fn insert(&mut self, lemma: &str, form: &str) {
        self.lemmas
            .entry(form.trim().to_lowercase())
            .or_insert_with(|| lemma.trim().to_lowercase());
    }

    /// Base form of `word`; unknown words lemmatize to their lowercase form.
    pub fn lemma(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        self.lemmas.get(&lower).cloned().unwrap_or(lower)
    }

    pub fn len(&self) -> usize {
        self.lemmas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lemmas.is_empty()
    }
}
