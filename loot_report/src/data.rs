//! Datasheet files: local cache and download

use anyhow::{Context, Result};
use loot_core::{parser, Loot};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Repository the datasheets are published in
pub const DEFAULT_SOURCE: &str = "https://raw.githubusercontent.com/Kattoor/nw-datasheets-json/main/";

pub const LOOT_TABLES_FILE: &str = "javelindata_loottables.json";
pub const LOOT_BUCKETS_FILE: &str = "javelindata_lootbuckets.json";

const DATA_FILES: [&str; 2] = [LOOT_TABLES_FILE, LOOT_BUCKETS_FILE];

/// Loads datasheets from a local directory, downloading them on demand
pub struct DataLoader {
    dir: PathBuf,
    source: String,
}

impl DataLoader {
    pub fn new(dir: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        DataLoader {
            dir: dir.into(),
            source: source.into(),
        }
    }

    fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    fn url(&self, file: &str) -> String {
        if self.source.ends_with('/') {
            format!("{}{}", self.source, file)
        } else {
            format!("{}/{}", self.source, file)
        }
    }

    /// Check if every datasheet is present locally
    pub fn data_files_exist(&self) -> bool {
        DATA_FILES.iter().all(|file| self.path(file).exists())
    }

    /// Download the datasheets if forced or missing
    pub fn ensure(&self, force: bool) -> Result<()> {
        if force || !self.data_files_exist() {
            self.download()?;
        }
        Ok(())
    }

    /// Download every datasheet from the source
    pub fn download(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create data directory {}", self.dir.display()))?;

        for file in DATA_FILES {
            let url = self.url(file);
            info!("Downloading {}", url);
            let body = ureq::get(&url)
                .call()
                .with_context(|| format!("Failed to download {}", url))?
                .into_string()
                .with_context(|| format!("Failed to read response from {}", url))?;
            let path = self.path(file);
            fs::write(&path, body)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        Ok(())
    }

    /// Parse the local datasheets
    ///
    /// A missing bucket datasheet yields no buckets; bucket references then
    /// show up as unresolved in the analysis.
    pub fn parse(&self) -> Result<Loot> {
        let tables_path = self.path(LOOT_TABLES_FILE);
        let tables_json = read(&tables_path)?;
        let loot_tables = parser::parse_loot_tables(&tables_json)
            .with_context(|| format!("Failed to parse {}", tables_path.display()))?;

        let buckets_path = self.path(LOOT_BUCKETS_FILE);
        let loot_buckets = if buckets_path.exists() {
            let buckets_json = read(&buckets_path)?;
            parser::parse_loot_buckets(&buckets_json)
                .with_context(|| format!("Failed to parse {}", buckets_path.display()))?
        } else {
            warn!("No loot bucket datasheet at {}", buckets_path.display());
            Vec::new()
        };

        info!(
            "Loaded {} loot tables and {} loot buckets",
            loot_tables.len(),
            loot_buckets.len()
        );
        Ok(Loot {
            loot_tables,
            loot_buckets,
        })
    }
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
