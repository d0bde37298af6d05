//! Synset index loaded from an Open Multilingual Wordnet tab file.
//!
//! Each data line is `<synset><TAB><lang>:lemma<TAB><word>`; other relation
//! types (`por:def`, `por:exe`, ...) and `#` comment lines are skipped.
//! Multi-word lemmas are stored with `_` separators, as in WordNet.

use std::path::Path;

use rustc_hash::FxHashMap;
use tracing::debug;

use pharmacorpus_shared::{PharmaCorpusError, Result};

#[derive(Debug, Clone, Default)]
pub struct Wordnet {
    /// Lemma names per synset, in file order.
    synsets: Vec<Vec<String>>,
    /// Lowercase lemma name → synset positions, in file order.
    index: FxHashMap<String, Vec<usize>>,
    /// Synset identifier → position in `synsets`.
    ids: FxHashMap<String, usize>,
}

impl Wordnet {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PharmaCorpusError::io(path, e))?;
        let wordnet = Self::parse(&content).map_err(|msg| PharmaCorpusError::load(path, msg))?;
        debug!(
            path = %path.display(),
            synsets = wordnet.synsets.len(),
            lemmas = wordnet.index.len(),
            "wordnet loaded"
        );
        Ok(wordnet)
    }

    fn parse(content: &str) -> std::result::Result<Self, String> {
        let mut wordnet = Self::default();
        for (n, line) in content.lines().enumerate() {
            let line = line.trim_start_matches('\u{feff}').trim_end();
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            let [synset, relation, word, ..] = fields.as_slice() else {
                return Err(format!("line {}: expected 3 tab-separated fields", n + 1));
            };
            if !relation.ends_with(":lemma") || word.trim().is_empty() {
                continue;
            }
            wordnet.insert(synset, word);
        }
        Ok(wordnet)
    }

    /// Add `word` as a lemma of `synset`.
    pub fn insert(&mut self, synset: &str, word: &str) {
        let name = word.trim().replace(' ', "_");
        let next = self.synsets.len();
        let pos = *self.ids.entry(synset.to_string()).or_insert(next);
        if pos == next {
            self.synsets.push(Vec::new());
        }
        self.synsets[pos].push(name.clone());

        let senses = self.index.entry(name.to_lowercase()).or_default();
        if !senses.contains(&pos) {
            senses.push(pos);
        }
    }

    /// All lemma names (lowercased) of every synset containing `word`, in
    /// sense order. Empty when the word is unknown.
    pub fn synonyms(&self, word: &str) -> Vec<String> {
        let key = word.trim().to_lowercase().replace(' ', "_");
        self.index
            .get(&key)
            .into_iter()
            .flatten()
            .flat_map(|&pos| self.synsets[pos].iter().map(|lemma| lemma.to_lowercase()))
            .collect()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index
            .contains_key(&word.trim().to_lowercase().replace(' ', "_"))
    }

    pub fn len(&self) -> usize {
        self.synsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synsets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "# Open Multilingual Wordnet\tpor\thttp://example.org\tCC BY\n\
02769748-n\tpor:lemma\tcomprimido\n\
02769748-n\tpor:lemma\tpastilha\n\
02769748-n\tpor:def\tpequena massa de medicamento\n\
03000001-n\tpor:lemma\tComprimido\n\
03000001-n\tpor:lemma\tdrágea\n\
04000002-n\tpor:lemma\tácido acetilsalicílico\n\
04000002-n\tpor:lemma\taspirina\n";

    #[test]
    fn synonyms_span_all_senses_in_order() {
        let wordnet = Wordnet::parse(SAMPLE).expect("parse");
        assert_eq!(wordnet.len(), 3);
        assert_eq!(
            wordnet.synonyms("comprimido"),
            ["comprimido", "pastilha", "comprimido", "drágea"]
        );
    }

    #[test]
    fn multiword_lemmas_use_underscores() {
        let wordnet = Wordnet::parse(SAMPLE).expect("parse");
        assert_eq!(
            wordnet.synonyms("Ácido Acetilsalicílico"),
            ["ácido_acetilsalicílico", "aspirina"]
        );
        assert!(wordnet.contains("aspirina"));
    }

    #[test]
    fn unknown_word_has_no_synonyms() {
        let wordnet = Wordnet::parse(SAMPLE).expect("parse");
        assert!(wordnet.synonyms("xarope").is_empty());
        assert!(Wordnet::default().synonyms("comprimido").is_empty());
    }

    #[test]
    fn short_line_is_rejected() {
        let err = Wordnet::parse("02769748-n\tpor:lemma\n").unwrap_err();
        assert!(err.contains("line 1"));
    }
}
