//! JSONPath queries over parsed and analyzed data

use anyhow::{Context, Result};
use loot_core::AnalyzedLootTable;
use serde::Serialize;
use serde_json::Value;
use serde_json_path::JsonPath;
use tracing::debug;

/// A parsed JSONPath query
pub struct Query {
    path: JsonPath,
    source: String,
}

impl Query {
    pub fn parse(source: &str) -> Result<Self> {
        let path = JsonPath::parse(source)
            .with_context(|| format!("Invalid JSONPath query: {}", source))?;
        Ok(Query {
            path,
            source: source.to_string(),
        })
    }

    /// Run the query against the JSON form of `value`
    pub fn select<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<Value>> {
        let json = serde_json::to_value(value).context("Failed to serialize query input")?;
        let matches: Vec<Value> = self.path.query(&json).all().into_iter().cloned().collect();
        debug!("Query {} matched {} nodes", self.source, matches.len());
        Ok(matches)
    }
}

/// Ids of the loot tables among the matched nodes
pub fn table_ids(matches: &[Value]) -> Vec<String> {
    matches
        .iter()
        .filter_map(|node| node.get("LootTableID").and_then(Value::as_str))
        .map(String::from)
        .collect()
}

/// The matched nodes as analyzed tables, if every one of them is a table
pub fn analyzed_tables(matches: &[Value]) -> Option<Vec<AnalyzedLootTable>> {
    matches
        .iter()
        .map(|node| serde_json::from_value(node.clone()).ok())
        .collect()
}
