use super::values::{
    is_present, is_truthy, parse_bool, parse_float, parse_int, parse_list, parse_range,
    parse_string,
};
use super::{parse_rows, ParseError, Row};
use crate::item::LootTableItem;
use crate::table::{AndOr, LootTable};
use crate::types::{Conditions, NumberRange, WaterType};
use std::collections::HashMap;
use tracing::{debug, warn};

const QUANTITY_SUFFIX: &str = "_Qty";
const PROBABILITY_SUFFIX: &str = "_Probs";

/// What the `_Probs` values of a table mean when it carries a level condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ThresholdMeaning {
    CharacterLevel,
    EnemyLevel,
    ContentLevel,
}

/// Parse the loot table datasheet
pub fn parse_loot_tables(json: &str) -> Result<Vec<LootTable>, ParseError> {
    let rows = parse_rows(json)?;
    debug!("Loaded {} loot table rows", rows.len());
    Ok(loot_tables_from_rows(&rows))
}

/// Assemble loot tables from datasheet rows
///
/// Each table is split across up to three rows: `X` (items and metadata),
/// `X_Qty` (quantities) and `X_Probs` (roll thresholds and max roll).
pub fn loot_tables_from_rows(rows: &[Row]) -> Vec<LootTable> {
    let mut builder = TableBuilder::default();

    for row in rows {
        let Some(id) = parse_string(row.get("LootTableID")) else {
            warn!("Skipping loot table row without LootTableID");
            continue;
        };

        if let Some(base) = id.strip_suffix(QUANTITY_SUFFIX) {
            builder.amend_quantities(base, row);
        } else if let Some(base) = id.strip_suffix(PROBABILITY_SUFFIX) {
            builder.amend_probabilities(base, row);
        } else {
            builder.insert_main(id, row);
        }
    }

    debug!("Parsed {} loot tables", builder.tables.len());
    builder.tables
}

#[derive(Default)]
struct TableBuilder {
    tables: Vec<LootTable>,
    positions: HashMap<String, usize>,
    meanings: HashMap<String, ThresholdMeaning>,
}

impl TableBuilder {
    fn insert_main(&mut self, id: String, row: &Row) {
        let (conditions, meaning) = parse_table_conditions(row.get("Conditions"));

        let mut table = LootTable {
            loot_table_id: id.clone(),
            and_or: parse_and_or(row),
            high_water_mark_multiplier: parse_float(row.get("HWMMult")).unwrap_or_default(),
            gear_score_bonus: parse_float(row.get("GSBonus")).unwrap_or_default(),
            max_roll: parse_int(row.get("MaxRoll")).unwrap_or_default(),
            items: Vec::new(),
            use_level_gear_score: parse_bool(row.get("UseLevelGS")),
            luck_safe: parse_bool(row.get("LuckSafe")),
        };

        let mut index = 1;
        while is_truthy(row.get(&format!("Item{}", index))) {
            let name = parse_string(row.get(&format!("Item{}", index))).unwrap_or_default();
            table.items.push(LootTableItem {
                name,
                gear_score: parse_range(row.get(&format!("GearScoreRange{}", index))),
                // Filled in by the _Qty and _Probs rows
                quantity: NumberRange::default(),
                probability: 0,
                perk_bucket_overrides: parse_string(
                    row.get(&format!("PerkBucketOverrides{}", index)),
                ),
                perk_overrides: parse_string(row.get(&format!("PerkOverrides{}", index))),
                conditions: conditions.clone(),
            });
            index += 1;
        }

        match meaning {
            Some(meaning) => {
                self.meanings.insert(id.clone(), meaning);
            }
            None => {
                self.meanings.remove(&id);
            }
        }

        match self.positions.get(&id) {
            Some(&pos) => self.tables[pos] = table,
            None => {
                self.positions.insert(id, self.tables.len());
                self.tables.push(table);
            }
        }
    }

    fn main_table(&mut self, base: &str, amendment: &str) -> Option<&mut LootTable> {
        match self.positions.get(base) {
            Some(&pos) => Some(&mut self.tables[pos]),
            None => {
                warn!(
                    "Main table for loot table {}{} not found",
                    base, amendment
                );
                None
            }
        }
    }

    fn amend_quantities(&mut self, base: &str, row: &Row) {
        let Some(table) = self.main_table(base, QUANTITY_SUFFIX) else {
            return;
        };

        let mut index = 1;
        while is_present(row.get(&format!("Item{}", index))) {
            let Some(item) = table.items.get_mut(index - 1) else {
                warn!(
                    "Quantity column Item{} of {} has no matching item",
                    index, table.loot_table_id
                );
                break;
            };
            item.quantity = parse_range(row.get(&format!("Item{}", index))).unwrap_or_default();
            index += 1;
        }
    }

    fn amend_probabilities(&mut self, base: &str, row: &Row) {
        let meaning = self.meanings.get(base).copied();
        let Some(table) = self.main_table(base, PROBABILITY_SUFFIX) else {
            return;
        };

        table.max_roll = parse_int(row.get("MaxRoll")).unwrap_or_default();

        let mut index = 1;
        while is_present(row.get(&format!("Item{}", index))) {
            let Some(item) = table.items.get_mut(index - 1) else {
                warn!(
                    "Probability column Item{} of {} has no matching item",
                    index, table.loot_table_id
                );
                break;
            };
            let value = parse_int(row.get(&format!("Item{}", index))).unwrap_or_default();
            match meaning {
                // The column holds a minimum level rather than a roll threshold
                Some(meaning) => {
                    item.probability = 0;
                    let levels = &mut item.conditions.levels;
                    let range = Some(NumberRange::at_least(value));
                    match meaning {
                        ThresholdMeaning::CharacterLevel => levels.character = range,
                        ThresholdMeaning::EnemyLevel => levels.enemy = range,
                        ThresholdMeaning::ContentLevel => levels.content = range,
                    }
                }
                None => item.probability = value,
            }
            index += 1;
        }
    }
}

fn parse_and_or(row: &Row) -> Option<AndOr> {
    match parse_string(row.get("AND/OR")).as_deref() {
        Some("AND") => Some(AndOr::And),
        Some("OR") => Some(AndOr::Or),
        _ => None,
    }
}

/// Decode the comma separated table conditions shared by all items of a table
fn parse_table_conditions(
    value: Option<&serde_json::Value>,
) -> (Conditions, Option<ThresholdMeaning>) {
    let mut conditions = Conditions::default();
    let mut meaning = None;

    for condition in parse_list(value) {
        match condition.as_str() {
            "Level" => meaning = Some(ThresholdMeaning::CharacterLevel),
            "EnemyLevel" => meaning = Some(ThresholdMeaning::EnemyLevel),
            "MinPOIContLevel" => meaning = Some(ThresholdMeaning::ContentLevel),
            "Elite" => conditions.elite = Some(true),
            "Common" => conditions.elite = Some(false),
            "GlobalMod" => conditions.global_mod = Some(true),
            "Salt" => conditions.fishing = Some(WaterType::Salt),
            "Fresh" => conditions.fishing = Some(WaterType::Fresh),
            // Not evaluated
            "Named" | "FishRarity" | "FishSize" => {}
            _ => conditions.named.push(condition),
        }
    }

    (conditions, meaning)
}
