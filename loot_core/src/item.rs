use crate::types::{Conditions, NumberRange, Reference};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single entry of a loot table as read from the datasheets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LootTableItem {
    /// Technical item key, or a `[LTID]`/`[LBID]` cross-reference
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gear_score: Option<NumberRange>,
    pub quantity: NumberRange,
    /// Roll threshold: the minimum roll needed to get this item.
    /// Not a probability.
    pub probability: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perk_bucket_overrides: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perk_overrides: Option<String>,
    #[serde(default)]
    pub conditions: Conditions,
}

impl LootTableItem {
    /// Literal item with quantity 1 and threshold 0
    pub fn new(name: impl Into<String>) -> Self {
        LootTableItem {
            name: name.into(),
            gear_score: None,
            quantity: NumberRange::single(1),
            probability: 0,
            perk_bucket_overrides: None,
            perk_overrides: None,
            conditions: Conditions::default(),
        }
    }

    pub fn with_quantity(mut self, quantity: NumberRange) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_threshold(mut self, threshold: i64) -> Self {
        self.probability = threshold;
        self
    }

    pub fn with_gear_score(mut self, gear_score: NumberRange) -> Self {
        self.gear_score = Some(gear_score);
        self
    }

    pub fn with_conditions(mut self, conditions: Conditions) -> Self {
        self.conditions = conditions;
        self
    }

    /// Cross-reference encoded in the name, if any
    pub fn reference(&self) -> Option<Reference<'_>> {
        Reference::parse(&self.name)
    }
}

/// A member of a loot bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LootBucketItem {
    pub name: String,
    pub quantity: NumberRange,
    #[serde(default)]
    pub conditions: Conditions,
}

impl LootBucketItem {
    pub fn new(name: impl Into<String>, quantity: NumberRange) -> Self {
        LootBucketItem {
            name: name.into(),
            quantity,
            conditions: Conditions::default(),
        }
    }
}

/// A fully resolved leaf item with a true probability in [0, 1]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AnalyzedLootItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gear_score: Option<NumberRange>,
    pub quantity: NumberRange,
    pub probability: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perk_bucket_overrides: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perk_overrides: Option<String>,
    #[serde(default)]
    pub conditions: Conditions,
}

impl fmt::Display for AnalyzedLootItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} x{} ({:.3}%)",
            self.name,
            self.quantity,
            self.probability * 100.0
        )
    }
}
