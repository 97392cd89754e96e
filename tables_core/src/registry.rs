use loot_core::{Loot, LootBucket, LootTable};
use std::collections::HashMap;

/// Lookup of loot tables by id and loot buckets by name
///
/// Borrows from the data set it indexes. Duplicate ids or names resolve to
/// the last occurrence.
#[derive(Debug, Default)]
pub struct LootRegistry<'a> {
    tables: HashMap<&'a str, &'a LootTable>,
    buckets: HashMap<&'a str, &'a LootBucket>,
}

impl<'a> LootRegistry<'a> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every table and bucket of a data set
    pub fn build(loot: &'a Loot) -> Self {
        let mut registry = Self::new();
        for table in &loot.loot_tables {
            registry.tables.insert(table.loot_table_id.as_str(), table);
        }
        for bucket in &loot.loot_buckets {
            registry.buckets.insert(bucket.name.as_str(), bucket);
        }
        registry
    }

    /// Get a table by ID
    pub fn table(&self, id: &str) -> Option<&'a LootTable> {
        self.tables.get(id).copied()
    }

    /// Get a bucket by name
    pub fn bucket(&self, name: &str) -> Option<&'a LootBucket> {
        self.buckets.get(name).copied()
    }

    /// Check if a table exists
    pub fn contains_table(&self, id: &str) -> bool {
        self.tables.contains_key(id)
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}
