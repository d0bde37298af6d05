//! Application configuration for pharmacorpus.
//!
//! User config lives at `~/.pharmacorpus/pharmacorpus.toml`.
//! CLI flags override config file values, which override defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PharmaCorpusError, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "pharmacorpus.toml";

/// Default config directory name under the user's home.
const CONFIG_DIR_NAME: &str = ".pharmacorpus";

// ---------------------------------------------------------------------------
// Config structs (matching pharmacorpus.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Corpus builder settings.
    #[serde(default)]
    pub corpus: CorpusConfig,

    /// Description cleaner settings.
    #[serde(default)]
    pub cleaner: CleanerConfig,

    /// Template merge settings.
    #[serde(default)]
    pub template: TemplateConfig,

    /// Lemmatizer / synonym resources.
    #[serde(default)]
    pub lexicon: LexiconConfig,
}

/// `[corpus]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Source spreadsheet or CSV file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<PathBuf>,

    /// Worksheet to read (first sheet when unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,

    /// Column holding the member names (e.g. product name).
    #[serde(default = "default_term_column")]
    pub term_column: String,

    /// Column whose value becomes the corpus key (e.g. active ingredient).
    #[serde(default = "default_synonym_column")]
    pub synonym_column: String,

    /// Origin label; names the snapshot and the default output files.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Corpus JSON path (defaults to `<origin>_corpus.json`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Directory receiving the `<origin>.parquet` snapshot.
    #[serde(default = "default_snapshot_dir")]
    pub snapshot_dir: PathBuf,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            dataset: None,
            sheet: None,
            term_column: default_term_column(),
            synonym_column: default_synonym_column(),
            origin: default_origin(),
            output: None,
            snapshot_dir: default_snapshot_dir(),
        }
    }
}

impl CorpusConfig {
    /// Resolved corpus output path.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}_corpus.json", self.origin)))
    }

    /// Resolved snapshot path, `<snapshot_dir>/<origin>.parquet`.
    pub fn snapshot_path(&self) -> PathBuf {
        self.snapshot_dir.join(format!("{}.parquet", self.origin))
    }
}

fn default_term_column() -> String {
    "nome".into()
}
fn default_synonym_column() -> String {
    "composição".into()
}
fn default_origin() -> String {
    "abcfarma".into()
}
fn default_snapshot_dir() -> PathBuf {
    PathBuf::from(".")
}

/// `[cleaner]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanerConfig {
    /// Spreadsheet or CSV file holding product descriptions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,

    /// Cleaned output file (`.xlsx` or `.csv`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Worksheet to read (first sheet when unset).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,

    /// Column with the free-text description, matched exactly.
    #[serde(default = "default_description_column")]
    pub description_column: String,

    /// Name of the cleaned-text column placed last.
    #[serde(default = "default_cleaned_column")]
    pub cleaned_column: String,

    /// Override for the `dose` pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dose_pattern: Option<String>,

    /// Override for the `form` pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form_pattern: Option<String>,

    /// Override for the `recipient` pattern.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_pattern: Option<String>,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            sheet: None,
            description_column: default_description_column(),
            cleaned_column: default_cleaned_column(),
            dose_pattern: None,
            form_pattern: None,
            recipient_pattern: None,
        }
    }
}

impl CleanerConfig {
    /// Resolved output path: the configured one, else `cleaned_file.xlsx`
    /// next to the input. `None` when neither path is set.
    pub fn output_path(&self) -> Option<PathBuf> {
        self.output.clone().or_else(|| {
            self.input
                .as_deref()
                .map(|input| input.with_file_name(DEFAULT_CLEANED_FILE))
        })
    }
}

const DEFAULT_CLEANED_FILE: &str = "cleaned_file.xlsx";

fn default_description_column() -> String {
    "DESCRIÇÃO".into()
}
fn default_cleaned_column() -> String {
    "xprod_cleaned".into()
}

/// `[template]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// Template document to read; never modified.
    #[serde(default = "default_template_input")]
    pub input: PathBuf,

    /// Patched template path (defaults to `<origin>.tap`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            input: default_template_input(),
            output: None,
        }
    }
}

impl TemplateConfig {
    /// Resolved output path for the given origin label.
    pub fn output_path(&self, origin: &str) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{origin}.tap")))
    }
}

fn default_template_input() -> PathBuf {
    PathBuf::from("medicamentos.tap")
}

/// `[lexicon]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconConfig {
    /// Stop-word language code.
    #[serde(default = "default_language")]
    pub language: String,

    /// Lemma table, one `lemma<TAB>form` pair per line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lemma_file: Option<PathBuf>,

    /// Open Multilingual Wordnet tab file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wordnet_file: Option<PathBuf>,
}

impl Default for LexiconConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            lemma_file: None,
            wordnet_file: None,
        }
    }
}

fn default_language() -> String {
    "pt".into()
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Get the path to the config directory (`~/.pharmacorpus/`).
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PharmaCorpusError::config("could not determine home directory"))?;
    Ok(home.join(CONFIG_DIR_NAME))
}

/// Get the path to the config file (`~/.pharmacorpus/pharmacorpus.toml`).
pub fn config_file_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Load the application config from disk. Returns defaults if the file does not exist.
pub fn load_config() -> Result<AppConfig> {
    let path = config_file_path()?;

    if !path.exists() {
        tracing::debug!(?path, "config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    load_config_from(&path)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| PharmaCorpusError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        PharmaCorpusError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

/// Create the config directory and write a default config file.
/// Returns the path to the created file.
pub fn init_config() -> Result<PathBuf> {
    let dir = config_dir()?;
    std::fs::create_dir_all(&dir).map_err(|e| PharmaCorpusError::io(&dir, e))?;

    let path = dir.join(CONFIG_FILE_NAME);
    let config = AppConfig::default();
    let content =
        toml::to_string_pretty(&config).map_err(|e| PharmaCorpusError::config(e.to_string()))?;

    std::fs::write(&path, content).map_err(|e| PharmaCorpusError::io(&path, e))?;
    tracing::info!(?path, "created default config file");

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("term_column"));
        assert!(toml_str.contains("xprod_cleaned"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.corpus.synonym_column, "composição");
        assert_eq!(parsed.cleaner.description_column, "DESCRIÇÃO");
        assert_eq!(parsed.lexicon.language, "pt");
    }

    #[test]
    fn partial_config_fills_defaults() {
        let toml_str = r#"
[corpus]
dataset = "/data/EANS.xlsx"
sheet = "Planilha1"
origin = "anvisa"

[cleaner]
form_pattern = 'comp\w*'
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.corpus.sheet.as_deref(), Some("Planilha1"));
        assert_eq!(config.corpus.term_column, "nome");
        assert_eq!(config.corpus.output_path(), PathBuf::from("anvisa_corpus.json"));
        assert_eq!(config.corpus.snapshot_path(), PathBuf::from("./anvisa.parquet"));
        assert_eq!(config.cleaner.form_pattern.as_deref(), Some(r"comp\w*"));
        assert!(config.cleaner.dose_pattern.is_none());
    }

    #[test]
    fn cleaner_output_defaults_next_to_input() {
        let mut cleaner = CleanerConfig::default();
        assert!(cleaner.output_path().is_none());

        cleaner.input = Some(PathBuf::from("data/EANS.xlsx"));
        assert_eq!(cleaner.output_path(), Some(PathBuf::from("data/cleaned_file.xlsx")));

        cleaner.output = Some(PathBuf::from("out.csv"));
        assert_eq!(cleaner.output_path(), Some(PathBuf::from("out.csv")));
    }

    #[test]
    fn template_output_defaults_to_origin() {
        let template = TemplateConfig::default();
        assert_eq!(template.output_path("abcfarma"), PathBuf::from("abcfarma.tap"));
        assert_eq!(template.input, PathBuf::from("medicamentos.tap"));
    }

    #[test]
    fn malformed_config_is_config_error() {
        let path = std::env::temp_dir().join(format!(
            "pc_config_{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[corpus\norigin = ").expect("write");
        let err = load_config_from(&path).unwrap_err();
        assert!(matches!(err, PharmaCorpusError::Config { .. }));
        let _ = std::fs::remove_file(&path);
    }
}
