//! Dictionary template (`.tap`) handling and the Term Injector.
//!
//! The template is owned by an external text-analytics tool, so it is kept as
//! an untyped JSON document: fields we do not touch survive a read/write cycle
//! unchanged and in their original order. Only the injected term entries are
//! typed.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, instrument};

use pharmacorpus_dataset::{OutputMeta, read_json, write_json};
use pharmacorpus_shared::{Corpus, PharmaCorpusError, Result};

/// `match` value for synonyms: exact matching disabled.
pub const SYNONYM_MATCH: u8 = 0;

/// Type identifier assigned to injected terms and their synonyms.
pub const TERM_TYPE_ID: u32 = 1;

/// `isAddSingleTerms` value for injected terms.
pub const ADD_SINGLE_TERMS: u8 = 2;

// ---------------------------------------------------------------------------
// Term entries
// ---------------------------------------------------------------------------

/// One entry of a library's `terms` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateTerm {
    pub form: String,
    pub synonyms: SynonymList,
    pub typeid: u32,
    pub inflected: bool,
    pub is_add_single_terms: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymList {
    pub terms: Vec<SynonymTerm>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynonymTerm {
    pub form: String,
    #[serde(rename = "match")]
    pub match_mode: u8,
    pub typeid: u32,
    pub inflected: bool,
}

impl TemplateTerm {
    /// Term for one corpus entry; blank synonyms are skipped.
    pub fn from_entry(form: &str, synonyms: &[String]) -> Self {
        Self {
            form: form.to_string(),
            synonyms: SynonymList {
                terms: synonyms
                    .iter()
                    .filter(|s| !s.is_empty())
                    .map(|s| SynonymTerm {
                        form: s.clone(),
                        match_mode: SYNONYM_MATCH,
                        typeid: TERM_TYPE_ID,
                        inflected: true,
                    })
                    .collect(),
            },
            typeid: TERM_TYPE_ID,
            inflected: true,
            is_add_single_terms: ADD_SINGLE_TERMS,
        }
    }
}

// ---------------------------------------------------------------------------
// Template document
// ---------------------------------------------------------------------------

/// A template document (`{"template": {"libraries": [{"terms": [...]}, ...]}}`).
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    doc: Value,
}

impl Template {
    pub fn from_value(doc: Value) -> Self {
        Self { doc }
    }

    pub fn as_value(&self) -> &Value {
        &self.doc
    }

    /// Read a template file.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn read(path: &Path) -> Result<Self> {
        let doc: Value =
            read_json(path).inspect_err(|e| error!(error = %e, "failed to load template"))?;
        debug!("template loaded");
        Ok(Self { doc })
    }

    /// Write the template with 4-space indentation.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn write(&self, path: &Path) -> Result<OutputMeta> {
        let meta = write_json(path, &self.doc)
            .inspect_err(|e| error!(error = %e, "failed to write template"))?;
        info!(size = meta.size_bytes, "template saved");
        Ok(meta)
    }

    /// Terms of the first library (empty when it has no term list yet).
    pub fn terms(&self) -> &[Value] {
        self.doc
            .pointer("/template/libraries/0/terms")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Append one term per corpus entry to the first library, in corpus key
    /// order. Existing terms are left untouched and never deduplicated.
    ///
    /// Returns the number of appended terms.
    pub fn inject(&mut self, corpus: &Corpus) -> Result<usize> {
        let terms = self.first_library_terms()?;

        let before = terms.len();
        for (form, synonyms) in corpus {
            let term = TemplateTerm::from_entry(form, synonyms);
            let value = serde_json::to_value(&term).map_err(|e| {
                PharmaCorpusError::validation(format!("cannot encode term '{form}': {e}"))
            })?;
            terms.push(value);
        }

        let appended = terms.len() - before;
        info!(appended, total = terms.len(), "terms injected");
        Ok(appended)
    }

    /// The first library's `terms` array, created empty when missing or not
    /// an array.
    fn first_library_terms(&mut self) -> Result<&mut Vec<Value>> {
        let library = self
            .doc
            .pointer_mut("/template/libraries/0")
            .ok_or_else(|| PharmaCorpusError::validation("template has no libraries"))?
            .as_object_mut()
            .ok_or_else(|| PharmaCorpusError::validation("first library is not an object"))?;

        if !library.get("terms").is_some_and(Value::is_array) {
            debug!("library has no term list, creating one");
            library.insert("terms".to_string(), Value::Array(Vec::new()));
        }

        match library.get_mut("terms") {
            Some(Value::Array(terms)) => Ok(terms),
            _ => Err(PharmaCorpusError::validation("library term list unavailable")),
        }
    }
}
