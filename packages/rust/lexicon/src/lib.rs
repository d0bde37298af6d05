//! Text Normalizer: lemmatization, stop-word filtering, and synonym lookup.
//!
//! A [`Lexicon`] is an explicit capability object. Callers build it once from
//! a [`LexiconConfig`] and pass it to whatever needs normalized text; nothing
//! here is loaded lazily or shared process-wide.

mod lemmas;
mod stopwords;
mod wordnet;

use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, instrument};

use pharmacorpus_shared::{LexiconConfig, Result};

pub use lemmas::LemmaTable;
pub use stopwords::StopwordFilter;
pub use wordnet::Wordnet;

/// Word runs, digit runs, and punctuation runs.
static TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{Alphabetic}\p{M}]+|\p{N}+|[^\s\p{Alphabetic}\p{M}\p{N}]+")
        .expect("valid regex")
});

/// A token made only of letters and combining marks.
static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{Alphabetic}\p{M}]+$").expect("valid regex"));

#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    stopwords: StopwordFilter,
    lemmas: LemmaTable,
    wordnet: Wordnet,
}

impl Lexicon {
    /// Assemble a lexicon from already-loaded parts.
    pub fn new(stopwords: StopwordFilter, lemmas: LemmaTable, wordnet: Wordnet) -> Self {
        Self {
            stopwords,
            lemmas,
            wordnet,
        }
    }

    /// Load stop words for the configured language plus the optional lemma
    /// table and wordnet files.
    #[instrument(skip_all, fields(language = %config.language))]
    pub fn load(config: &LexiconConfig) -> Result<Self> {
        let stopwords = StopwordFilter::for_language(&config.language)?;
        let lemmas = match &config.lemma_file {
            Some(path) => LemmaTable::load(path)?,
            None => LemmaTable::default(),
        };
        let wordnet = match &config.wordnet_file {
            Some(path) => Wordnet::load(path)?,
            None => Wordnet::default(),
        };

        info!(
            stopwords = stopwords.len(),
            lemma_forms = lemmas.len(),
            synsets = wordnet.len(),
            "lexicon ready"
        );
        Ok(Self::new(stopwords, lemmas, wordnet))
    }

    /// Lemmas of the alphabetic, non-stop-word tokens of `text`, in order,
    /// joined by single spaces.
    pub fn normalize_text(&self, text: &str) -> String {
        TOKEN_RE
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|token| WORD_RE.is_match(token))
            .filter(|token| !self.stopwords.is_stopword(token))
            .map(|token| self.lemmas.lemma(token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Synonym lemmas for a single word across all of its senses.
    ///
    /// When the word itself is unknown its lemma is tried instead. Unknown
    /// words yield an empty list.
    pub fn synonyms(&self, word: &str) -> Vec<String> {
        if self.wordnet.contains(word) {
            return self.wordnet.synonyms(word);
        }
        self.wordnet.synonyms(&self.lemmas.lemma(word))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon() -> Lexicon {
        let mut wordnet = Wordnet::default();
        wordnet.insert("02769748-n", "comprimido");
        wordnet.insert("02769748-n", "pastilha");
        Lexicon::new(
            StopwordFilter::from_list(&["de", "para", "com"]),
            LemmaTable::from_pairs([("comprimido", "comprimidos"), ("revestir", "revestidos")]),
            wordnet,
        )
    }

    #[test]
    fn drops_stopwords_numbers_and_punctuation() {
        let text = "Caixa com 20 comprimidos revestidos, para uso de adultos!";
        assert_eq!(
            lexicon().normalize_text(text),
            "caixa comprimido revestir uso adultos"
        );
    }

    #[test]
    fn mixed_alphanumeric_tokens_split() {
        assert_eq!(lexicon().normalize_text("Dipirona 500mg"), "dipirona mg");
    }

    #[test]
    fn combining_marks_stay_in_words() {
        let decomposed = "Cafe\u{0301} xarope\u{1dc0}";
        assert_eq!(
            lexicon().normalize_text(decomposed),
            "cafe\u{0301} xarope\u{1dc0}"
        );
    }

    #[test]
    fn empty_and_symbol_only_text() {
        assert_eq!(lexicon().normalize_text(""), "");
        assert_eq!(lexicon().normalize_text(" 10 % - 2,5 "), "");
    }

    #[test]
    fn synonyms_fall_back_to_lemma() {
        let lexicon = lexicon();
        assert_eq!(lexicon.synonyms("comprimido"), ["comprimido", "pastilha"]);
        assert_eq!(lexicon.synonyms("comprimidos"), ["comprimido", "pastilha"]);
        assert!(lexicon.synonyms("xarope").is_empty());
    }

    #[test]
    fn load_without_files_uses_stopwords_only() {
        let lexicon = Lexicon::load(&LexiconConfig::default()).expect("load");
        assert_eq!(lexicon.normalize_text("Solução de Dipirona"), "solução dipirona");
        assert!(lexicon.synonyms("solução").is_empty());
    }

    #[test]
    fn load_reads_resource_files() {
        let dir = std::env::temp_dir().join(format!("pc-lexicon-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&dir).unwrap();
        let lemma_file = dir.join("lemmas.txt");
        let wordnet_file = dir.join("wn-data-por.tab");
        std::fs::write(&lemma_file, "frasco\tfrascos\n").unwrap();
        std::fs::write(&wordnet_file, "1-n\tpor:lemma\tfrasco\n1-n\tpor:lemma\tvidro\n").unwrap();

        let config = LexiconConfig {
            language: "pt".into(),
            lemma_file: Some(lemma_file),
            wordnet_file: Some(wordnet_file),
        };
        let lexicon = Lexicon::load(&config).expect("load");
        assert_eq!(lexicon.normalize_text("Frascos"), "frasco");
        assert_eq!(lexicon.synonyms("frascos"), ["frasco", "vidro"]);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
