use super::values::{is_truthy, parse_bool, parse_list, parse_range, parse_string, range_from_str};
use super::{parse_rows, ParseError, Row};
use crate::item::LootBucketItem;
use crate::table::LootBucket;
use crate::types::{Conditions, NumberRange};
use tracing::{debug, warn};

/// Upper bound on bucket columns in the definition row
const MAX_BUCKET_COLUMNS: usize = 1000;

const DEFINITION_ROW: &str = "FIRSTROW";

/// Parse the loot bucket datasheet
pub fn parse_loot_buckets(json: &str) -> Result<Vec<LootBucket>, ParseError> {
    let rows = parse_rows(json)?;
    debug!("Loaded {} loot bucket rows", rows.len());
    Ok(loot_buckets_from_rows(&rows))
}

/// Assemble loot buckets from datasheet rows
///
/// Buckets are columns: the `FIRSTROW` row names them (`LootBucketN`,
/// `MatchOneN`), every row then contributes at most one item per bucket.
pub fn loot_buckets_from_rows(rows: &[Row]) -> Vec<LootBucket> {
    let mut buckets = rows
        .iter()
        .find(|row| parse_string(row.get("RowPlaceholders")).as_deref() == Some(DEFINITION_ROW))
        .map(bucket_definitions)
        .unwrap_or_default();

    for row in rows {
        for (offset, bucket) in buckets.iter_mut().enumerate() {
            let index = offset + 1;
            let quantity = row.get(&format!("Quantity{}", index));
            if !is_truthy(quantity) {
                continue;
            }
            let Some(name) = parse_string(row.get(&format!("Item{}", index))) else {
                warn!("Loot bucket {} has a quantity without an item", bucket.name);
                continue;
            };

            bucket.items.push(LootBucketItem {
                name,
                quantity: parse_range(quantity).unwrap_or_default(),
                conditions: parse_tags(&parse_list(row.get(&format!("Tags{}", index)))),
            });
        }
    }

    debug!("Parsed {} loot buckets", buckets.len());
    buckets
}

fn bucket_definitions(row: &Row) -> Vec<LootBucket> {
    let mut buckets = Vec::new();
    let mut index = 1;
    while is_truthy(row.get(&format!("LootBucket{}", index))) {
        if index > MAX_BUCKET_COLUMNS {
            warn!("Detected bucket column bounds violation, did the datasheet layout change?");
            break;
        }
        buckets.push(LootBucket {
            name: parse_string(row.get(&format!("LootBucket{}", index))).unwrap_or_default(),
            match_one: parse_bool(row.get(&format!("MatchOne{}", index))),
            items: Vec::new(),
        });
        index += 1;
    }
    buckets
}

/// Translate bucket item tags into item conditions
fn parse_tags(tags: &[String]) -> Conditions {
    let mut conditions = Conditions::default();
    for tag in tags {
        match tag.split_once(':') {
            Some(("MinContLevel", value)) => match range_from_str(value) {
                Some(range) => conditions.levels.content = Some(NumberRange::at_least(range.low)),
                None => warn!("Invalid content level tag '{}'", tag),
            },
            Some(("Level", value)) => match range_from_str(value) {
                Some(range) => conditions.levels.character = Some(range),
                None => warn!("Invalid level tag '{}'", tag),
            },
            _ => conditions.named.push(tag.clone()),
        }
    }
    conditions
}
