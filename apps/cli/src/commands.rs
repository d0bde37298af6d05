//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use pharmacorpus_cleaner::FieldExtractor;
use pharmacorpus_core::{
    CleanConfig, CorpusOutcome, MergeConfig, ProgressReporter, build_corpus, clean_descriptions,
    merge_template,
};
use pharmacorpus_lexicon::Lexicon;
use pharmacorpus_shared::{AppConfig, init_config, load_config, load_config_from};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// pharmacorpus: pharmaceutical synonym corpora and template patching.
#[derive(Parser)]
#[command(
    name = "pharmacorpus",
    version,
    about = "Build pharmaceutical synonym corpora, clean product descriptions, and patch dictionary templates.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Config file (defaults to ~/.pharmacorpus/pharmacorpus.toml).
    #[arg(long, env = "PHARMACORPUS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Build the synonym corpus and the Parquet snapshot from a dataset.
    Corpus {
        /// Source spreadsheet or CSV file.
        #[arg(short, long)]
        dataset: Option<PathBuf>,

        /// Worksheet name (defaults to the first sheet).
        #[arg(long)]
        sheet: Option<String>,

        /// Column holding the member names.
        #[arg(long)]
        term_column: Option<String>,

        /// Column whose value becomes the corpus key.
        #[arg(long)]
        synonym_column: Option<String>,

        /// Origin label (names the snapshot and default outputs).
        #[arg(long)]
        origin: Option<String>,

        /// Corpus JSON output path.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory for the `<origin>.parquet` snapshot.
        #[arg(long)]
        snapshot_dir: Option<PathBuf>,
    },

    /// Extract dose, form, and recipient from product descriptions.
    Clean {
        /// Spreadsheet or CSV file with descriptions.
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Cleaned output file (.xlsx or .csv).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Worksheet name (defaults to the first sheet).
        #[arg(long)]
        sheet: Option<String>,

        /// Description column, matched exactly.
        #[arg(long)]
        description_column: Option<String>,
    },

    /// Append corpus entries as terms to a dictionary template.
    Merge {
        /// Corpus JSON (defaults to the corpus output path).
        #[arg(long)]
        corpus: Option<PathBuf>,

        /// Template to read.
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Patched template path (defaults to `<origin>.tap`).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Origin label.
        #[arg(long)]
        origin: Option<String>,
    },

    /// Lemmatize text, dropping stop words and non-alphabetic tokens.
    Normalize {
        /// Text to normalize.
        text: String,
    },

    /// List wordnet synonyms of a word across all its senses.
    Synonyms {
        /// Word to look up.
        word: String,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "pharmacorpus=info",
        1 => "pharmacorpus=debug",
        _ => "pharmacorpus=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Command::Corpus {
            dataset,
            sheet,
            term_column,
            synonym_column,
            origin,
            output,
            snapshot_dir,
        } => {
            let mut config = resolve_config(config_path)?;
            let corpus = &mut config.corpus;
            override_opt(&mut corpus.dataset, dataset);
            override_opt(&mut corpus.sheet, sheet);
            override_opt(&mut corpus.output, output);
            override_val(&mut corpus.term_column, term_column);
            override_val(&mut corpus.synonym_column, synonym_column);
            override_val(&mut corpus.origin, origin);
            override_val(&mut corpus.snapshot_dir, snapshot_dir);
            cmd_corpus(&config)
        }
        Command::Clean {
            input,
            output,
            sheet,
            description_column,
        } => {
            let mut config = resolve_config(config_path)?;
            let cleaner = &mut config.cleaner;
            override_opt(&mut cleaner.input, input);
            override_opt(&mut cleaner.output, output);
            override_opt(&mut cleaner.sheet, sheet);
            override_val(&mut cleaner.description_column, description_column);
            cmd_clean(&config)
        }
        Command::Merge {
            corpus,
            template,
            output,
            origin,
        } => {
            let mut config = resolve_config(config_path)?;
            override_val(&mut config.corpus.origin, origin);
            override_opt(&mut config.corpus.output, corpus);
            override_val(&mut config.template.input, template);
            override_opt(&mut config.template.output, output);
            cmd_merge(&config)
        }
        Command::Normalize { text } => cmd_normalize(&resolve_config(config_path)?, &text),
        Command::Synonyms { word } => cmd_synonyms(&resolve_config(config_path)?, &word),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(config_path),
        },
    }
}

/// Load `--config` when given, else the user config (or defaults).
fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    let config = match path {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    Ok(config)
}

fn override_opt<T>(slot: &mut Option<T>, flag: Option<T>) {
    if flag.is_some() {
        *slot = flag;
    }
}

fn override_val<T>(slot: &mut T, flag: Option<T>) {
    if let Some(value) = flag {
        *slot = value;
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_corpus(config: &AppConfig) -> Result<()> {
    info!(
        origin = %config.corpus.origin,
        term_column = %config.corpus.term_column,
        synonym_column = %config.corpus.synonym_column,
        "building corpus"
    );

    let reporter = CliProgress::new();
    let build = match build_corpus(&config.corpus, &reporter)? {
        CorpusOutcome::Built(build) => build,
        CorpusOutcome::Skipped { dataset } => {
            println!("Dataset '{}' not found, nothing to do.", dataset.display());
            return Ok(());
        }
    };

    println!();
    println!("  Corpus built successfully!");
    println!("  Rows:     {} loaded, {} kept", build.rows_loaded, build.rows_kept);
    println!("  Terms:    {}", build.corpus.len());
    println!("  Synonyms: {}", build.corpus.synonym_count());
    println!("  Corpus:   {}", build.corpus_file.path.display());
    println!("  Snapshot: {}", build.snapshot_file.path.display());
    println!("  Time:     {:.1}s", build.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_clean(config: &AppConfig) -> Result<()> {
    let clean_config = CleanConfig::from_config(&config.cleaner)?;
    let extractor = FieldExtractor::from_config(&config.cleaner)?;

    info!(
        input = %clean_config.input.display(),
        column = %clean_config.description_column,
        "cleaning descriptions"
    );

    let reporter = CliProgress::new();
    let result = clean_descriptions(&clean_config, &extractor, &reporter)?;

    println!();
    println!("  Cleaning complete!");
    println!("  Rows:   {} ({} with extracted fields)", result.rows, result.rows_with_fields);
    println!("  Output: {}", result.output.path.display());
    println!("  Time:   {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_merge(config: &AppConfig) -> Result<()> {
    let merge_config = MergeConfig {
        corpus: config.corpus.output_path(),
        input: config.template.input.clone(),
        output: config.template.output_path(&config.corpus.origin),
    };

    info!(
        corpus = %merge_config.corpus.display(),
        template = %merge_config.input.display(),
        "merging corpus into template"
    );

    let reporter = CliProgress::new();
    let result = merge_template(&merge_config, &reporter)?;

    println!();
    println!("  Template updated successfully!");
    println!("  Added:  {} terms ({} total)", result.appended, result.total_terms);
    println!("  Output: {}", result.output.path.display());
    println!("  Time:   {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_normalize(config: &AppConfig, text: &str) -> Result<()> {
    let lexicon = Lexicon::load(&config.lexicon)?;
    println!("{}", lexicon.normalize_text(text));
    Ok(())
}

fn cmd_synonyms(config: &AppConfig, word: &str) -> Result<()> {
    if config.lexicon.wordnet_file.is_none() {
        return Err(eyre!(
            "no wordnet file configured: set [lexicon] wordnet_file in the config"
        ));
    }

    let lexicon = Lexicon::load(&config.lexicon)?;
    let synonyms = lexicon.synonyms(word);
    if synonyms.is_empty() {
        println!("No synonyms found for '{word}'.");
    }
    for synonym in synonyms {
        println!("{synonym}");
    }
    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = resolve_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, _summary: &str) {
        self.spinner.finish_and_clear();
    }
}

impl Drop for CliProgress {
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_corpus_overrides() {
        let cli = Cli::try_parse_from([
            "pharmacorpus",
            "-vv",
            "corpus",
            "--dataset",
            "EANS.xlsx",
            "--origin",
            "anvisa",
        ])
        .expect("parse");

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Command::Corpus {
                dataset, origin, ..
            } => {
                assert_eq!(dataset, Some(PathBuf::from("EANS.xlsx")));
                assert_eq!(origin.as_deref(), Some("anvisa"));
            }
            _ => panic!("expected corpus command"),
        }
    }

    #[test]
    fn flags_override_config_values() {
        let mut origin = "abcfarma".to_string();
        override_val(&mut origin, None);
        assert_eq!(origin, "abcfarma");
        override_val(&mut origin, Some("anvisa".to_string()));
        assert_eq!(origin, "anvisa");

        let mut output = Some(PathBuf::from("a.json"));
        override_opt(&mut output, None);
        assert_eq!(output, Some(PathBuf::from("a.json")));
    }
}
