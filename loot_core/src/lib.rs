//! loot_core - Typed loot records and the datasheet parser
//!
//! This library provides:
//! - Loot tables, loot buckets and their items as read from the datasheets
//! - Analyzed (resolved) tables and items handed to report renderers
//! - A parser turning spreadsheet-shaped JSON rows into a `Loot` data set

pub mod item;
pub mod parser;
pub mod table;
pub mod types;

pub use item::{AnalyzedLootItem, LootBucketItem, LootTableItem};
pub use parser::{parse_loot, parse_loot_buckets, parse_loot_tables, ParseError};
pub use table::{AndOr, AnalyzedLootTable, Loot, LootBucket, LootTable};
pub use types::{Conditions, Levels, NumberRange, Reference, WaterType};
