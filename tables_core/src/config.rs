use crate::analyzer::TableSelector;
use crate::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where the character is
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationContext {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Content (point of interest) level
    pub level: Option<i64>,
}

/// The enemy being looted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyContext {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub level: Option<i64>,
    /// Unset returns loot for both common and elite enemies
    pub elite: Option<bool>,
}

/// Run-time facts used to filter eligible items
///
/// Every unset field means "do not restrict on this dimension". Setting
/// `location` or `enemy` at all, even empty, enables evaluation of named
/// conditions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbabilityContext {
    pub location: Option<LocationContext>,
    pub enemy: Option<EnemyContext>,
    /// Fishing water: `true` for salt water, `false` for fresh water
    pub salt: Option<bool>,
    pub character_level: Option<i64>,
}

impl ProbabilityContext {
    /// No field set at all
    pub fn is_empty(&self) -> bool {
        self.location.is_none()
            && self.enemy.is_none()
            && self.salt.is_none()
            && self.character_level.is_none()
    }

    pub fn has_enemy_or_location(&self) -> bool {
        self.enemy.is_some() || self.location.is_some()
    }

    pub fn enemy_elite(&self) -> Option<bool> {
        self.enemy.as_ref().and_then(|e| e.elite)
    }

    pub fn enemy_level(&self) -> Option<i64> {
        self.enemy.as_ref().and_then(|e| e.level)
    }

    pub fn location_level(&self) -> Option<i64> {
        self.location.as_ref().and_then(|l| l.level)
    }

    /// Enemy and location names/types that named conditions may match
    pub fn name_candidates(&self) -> Vec<&str> {
        let enemy = self.enemy.as_ref();
        let location = self.location.as_ref();
        [
            enemy.and_then(|e| e.name.as_deref()),
            enemy.and_then(|e| e.kind.as_deref()),
            location.and_then(|l| l.name.as_deref()),
            location.and_then(|l| l.kind.as_deref()),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Behaviour switches of the analyzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerOptions {
    /// Merge duplicate items even when no context was supplied
    pub force_merge: bool,
    /// Loot buckets with more items than this are not expanded
    pub bucket_threshold: usize,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        AnalyzerOptions {
            force_merge: false,
            bucket_threshold: 1,
        }
    }
}

/// Table ids given either as a single id or a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableIds {
    Single(String),
    Many(Vec<String>),
}

impl TableIds {
    pub fn into_selector(self) -> TableSelector {
        match self {
            TableIds::Single(id) => TableSelector::Only(vec![id]),
            TableIds::Many(ids) if ids.is_empty() => TableSelector::All,
            TableIds::Many(ids) => TableSelector::Only(ids),
        }
    }
}

/// TOML configuration for an analysis run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub context: ProbabilityContext,
    pub options: AnalyzerOptions,
    /// Tables to analyze; unset analyzes every table
    pub tables: Option<TableIds>,
}

impl AnalyzerConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            error: e,
            path: Some(path.to_path_buf()),
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            error: e,
            path: Some(path.to_path_buf()),
        })
    }

    /// Parse configuration from a TOML string
    pub fn parse(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::Parse {
            error: e,
            path: None,
        })
    }

    pub fn selector(&self) -> TableSelector {
        self.tables
            .clone()
            .map(TableIds::into_selector)
            .unwrap_or(TableSelector::All)
    }
}
