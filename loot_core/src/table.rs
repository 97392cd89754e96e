use crate::item::{AnalyzedLootItem, LootBucketItem, LootTableItem};
use serde::{Deserialize, Serialize};

/// Selection mode of a loot table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AndOr {
    /// Every item rolls independently, several may drop
    #[serde(rename = "AND")]
    And,
    /// Exactly one item is selected
    #[serde(rename = "OR")]
    Or,
}

/// A loot table as read from the datasheets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LootTable {
    #[serde(rename = "LootTableID")]
    pub loot_table_id: String,
    /// Absent means `OR`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub and_or: Option<AndOr>,
    #[serde(default)]
    pub high_water_mark_multiplier: f64,
    #[serde(default)]
    pub gear_score_bonus: f64,
    /// Maximum unmodified roll on this table
    #[serde(default)]
    pub max_roll: i64,
    #[serde(default)]
    pub items: Vec<LootTableItem>,
    #[serde(default)]
    pub use_level_gear_score: bool,
    /// Roll is not influenced by luck
    #[serde(default)]
    pub luck_safe: bool,
}

impl LootTable {
    /// Empty `OR` table with the given roll ceiling
    pub fn new(id: impl Into<String>, max_roll: i64) -> Self {
        LootTable {
            loot_table_id: id.into(),
            and_or: None,
            high_water_mark_multiplier: 0.0,
            gear_score_bonus: 0.0,
            max_roll,
            items: Vec::new(),
            use_level_gear_score: false,
            luck_safe: false,
        }
    }

    pub fn with_and_or(mut self, and_or: AndOr) -> Self {
        self.and_or = Some(and_or);
        self
    }

    pub fn with_item(mut self, item: LootTableItem) -> Self {
        self.items.push(item);
        self
    }

    /// Whether several items can be received from one roll of this table
    pub fn is_multiple(&self) -> bool {
        self.and_or == Some(AndOr::And)
    }
}

/// A named, reusable pool of items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LootBucket {
    pub name: String,
    /// All members share the same probability; otherwise one member is drawn
    #[serde(default)]
    pub match_one: bool,
    #[serde(default)]
    pub items: Vec<LootBucketItem>,
}

impl LootBucket {
    pub fn new(name: impl Into<String>, match_one: bool) -> Self {
        LootBucket {
            name: name.into(),
            match_one,
            items: Vec::new(),
        }
    }

    pub fn with_item(mut self, item: LootBucketItem) -> Self {
        self.items.push(item);
        self
    }
}

/// The complete parsed data set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loot {
    #[serde(default)]
    pub loot_tables: Vec<LootTable>,
    #[serde(default)]
    pub loot_buckets: Vec<LootBucket>,
}

/// A loot table after analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AnalyzedLootTable {
    pub id: String,
    /// Several items can be received
    pub multiple: bool,
    pub high_water_mark_multiplier: f64,
    pub use_level_gear_score: bool,
    pub gear_score_bonus: f64,
    pub luck_safe: bool,
    pub items: Vec<AnalyzedLootItem>,
}

impl AnalyzedLootTable {
    /// Carry the scalar metadata of a source table, with no items yet
    pub fn from_source(table: &LootTable) -> Self {
        AnalyzedLootTable {
            id: table.loot_table_id.clone(),
            multiple: table.is_multiple(),
            high_water_mark_multiplier: table.high_water_mark_multiplier,
            use_level_gear_score: table.use_level_gear_score,
            gear_score_bonus: table.gear_score_bonus,
            luck_safe: table.luck_safe,
            items: Vec::new(),
        }
    }

    pub fn total_probability(&self) -> f64 {
        self.items.iter().map(|i| i.probability).sum()
    }
}
