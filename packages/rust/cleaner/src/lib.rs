//! Description Cleaner: pulls dose, form, and recipient out of free-text
//! product descriptions and strips them from the text.
//!
//! Extraction always looks at the original description. Removal is a
//! separate pass that applies each pattern in [`FieldKind::ALL`] order to the
//! text left by the previous pattern, so an earlier removal can hide a
//! substring a later pattern would otherwise have matched.

mod patterns;
mod table;

use regex::Regex;
use tracing::debug;

use pharmacorpus_shared::{CleanerConfig, Result};

pub use patterns::FieldKind;
pub use table::clean_table;

/// Per-description result of [`FieldExtractor::extract`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub dose: Option<String>,
    pub form: Option<String>,
    pub recipient: Option<String>,
    /// Description with every field match removed, trimmed.
    pub cleaned: String,
}

impl Extraction {
    pub fn field(&self, kind: FieldKind) -> Option<&str> {
        match kind {
            FieldKind::Dose => self.dose.as_deref(),
            FieldKind::Form => self.form.as_deref(),
            FieldKind::Recipient => self.recipient.as_deref(),
        }
    }

    fn set(&mut self, kind: FieldKind, value: Option<String>) {
        match kind {
            FieldKind::Dose => self.dose = value,
            FieldKind::Form => self.form = value,
            FieldKind::Recipient => self.recipient = value,
        }
    }
}

/// Ordered set of field patterns.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    patterns: Vec<(FieldKind, Regex)>,
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self {
            patterns: FieldKind::ALL
                .iter()
                .map(|&kind| (kind, patterns::default_regex(kind)))
                .collect(),
        }
    }
}

impl FieldExtractor {
    /// Built-in patterns, with any per-field overrides from the config.
    pub fn from_config(config: &CleanerConfig) -> Result<Self> {
        let overrides = [
            (FieldKind::Dose, config.dose_pattern.as_deref()),
            (FieldKind::Form, config.form_pattern.as_deref()),
            (FieldKind::Recipient, config.recipient_pattern.as_deref()),
        ];

        let mut extractor = Self::default();
        for (kind, pattern) in overrides {
            if let Some(pattern) = pattern {
                extractor.set_pattern(kind, pattern)?;
            }
        }
        Ok(extractor)
    }

    /// Replace one field's pattern. The new pattern is case-insensitive.
    pub fn set_pattern(&mut self, kind: FieldKind, pattern: &str) -> Result<()> {
        let regex = patterns::compile(kind, pattern)?;
        debug!(field = %kind, pattern, "field pattern overridden");
        for (k, re) in &mut self.patterns {
            if *k == kind {
                *re = regex.clone();
            }
        }
        Ok(())
    }

    /// First match of each field in `text` (trimmed), plus the stripped text.
    pub fn extract(&self, text: &str) -> Extraction {
        let mut extraction = Extraction::default();
        for (kind, re) in &self.patterns {
            extraction.set(*kind, find_first(re, text));
        }
        extraction.cleaned = self.strip(text);
        extraction
    }

    /// Remove every non-overlapping match of every pattern, in field order,
    /// then trim.
    pub fn strip(&self, text: &str) -> String {
        let mut result = text.to_string();
        for (_, re) in &self.patterns {
            result = re.replace_all(&result, "").into_owned();
        }
        result.trim().to_string()
    }
}

fn find_first(re: &Regex, text: &str) -> Option<String> {
    re.find(text).map(|m| m.as_str().trim().to_string())
}
