//! tables_core - Loot table analysis
//!
//! Resolves the cross-references between loot tables and loot buckets into
//! leaf items with true drop probabilities, filters them against a
//! [`ProbabilityContext`] and merges duplicates.
//!
//! ```rust,ignore
//! use tables_core::{Analyzer, AnalyzerConfig, TableSelector};
//!
//! let loot = loot_core::parse_loot(&tables_json, &buckets_json)?;
//! let analyzer = Analyzer::new(&loot, AnalyzerConfig::default());
//! let analysis = analyzer.analyze(&TableSelector::All)?;
//! for table in &analysis.tables {
//!     println!("{}: {} items", table.id, table.items.len());
//! }
//! ```

mod analyzer;
mod conditions;
mod config;
mod dereference;
mod diagnostics;
mod merge;
mod probability;
mod registry;

pub use analyzer::{Analysis, Analyzer, TableSelector};
pub use conditions::{condition_failed, is_eligible, Expected};
pub use config::{
    AnalyzerConfig, AnalyzerOptions, EnemyContext, LocationContext, ProbabilityContext, TableIds,
};
pub use dereference::{Dereferencer, BUCKET_PICK_PREFIX};
pub use diagnostics::Diagnostic;
pub use merge::{merge_duplicates, merge_into};
pub use probability::{renormalize_single_choice, roll_to_probability};
pub use registry::LootRegistry;

use std::path::PathBuf;
use thiserror::Error;

/// Error loading analyzer configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading '{path:?}': {error}")]
    Io {
        error: std::io::Error,
        path: Option<PathBuf>,
    },
    #[error("Parse error in '{path:?}': {error}")]
    Parse {
        error: toml::de::Error,
        path: Option<PathBuf>,
    },
}

/// Error analyzing loot tables
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("Unknown table: {0}")]
    UnknownTable(String),
}
