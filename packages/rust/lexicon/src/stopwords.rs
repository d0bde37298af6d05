//! Stop-word filtering backed by the `stop-words` lists.

use rustc_hash::FxHashSet;
use stop_words::{LANGUAGE, get};

use pharmacorpus_shared::{PharmaCorpusError, Result};

/// A case-insensitive stop-word set.
#[derive(Debug, Clone, Default)]
pub struct StopwordFilter {
    stopwords: FxHashSet<String>,
}

impl StopwordFilter {
    /// Stop words for a language code or English name (`pt`, `portuguese`, ...).
    pub fn for_language(language: &str) -> Result<Self> {
        let lang = match language.to_lowercase().as_str() {
            "pt" | "portuguese" => LANGUAGE::Portuguese,
            "en" | "english" => LANGUAGE::English,
            "es" | "spanish" => LANGUAGE::Spanish,
            "fr" | "french" => LANGUAGE::French,
            "it" | "italian" => LANGUAGE::Italian,
            "de" | "german" => LANGUAGE::German,
            other => {
                return Err(PharmaCorpusError::config(format!(
                    "unsupported stop-word language '{other}'"
                )));
            }
        };

        Ok(Self {
            stopwords: get(lang).iter().map(|s| s.to_lowercase()).collect(),
        })
    }

    /// Build a filter from an explicit list.
    pub fn from_list(words: &[&str]) -> Self {
        Self {
            stopwords: words.iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.stopwords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stopwords.is_empty()
    }
}
