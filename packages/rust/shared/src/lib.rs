//! Shared types, error model, and configuration for pharmacorpus.
//!
//! This crate is the foundation depended on by all other pharmacorpus crates.
//! It provides:
//! - [`PharmaCorpusError`], the unified error type
//! - Domain types ([`Cell`], [`Table`], [`Corpus`])
//! - Configuration ([`AppConfig`] and its sections, config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CleanerConfig, CorpusConfig, LexiconConfig, TemplateConfig, config_dir,
    config_file_path, init_config, load_config, load_config_from,
};
pub use error::{PharmaCorpusError, Result};
pub use types::{Cell, Corpus, Table};
