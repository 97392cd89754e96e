//! Collapsing of duplicate leaf items reached through different paths

use loot_core::types::widen_optional;
use loot_core::{AnalyzedLootItem, Conditions, Levels};
use std::collections::HashMap;

/// Merge items sharing a name into their first occurrence
///
/// Without a context, duplicates may carry mutually exclusive conditions that
/// must stay distinguishable, so they are only merged when forced.
pub fn merge_duplicates(
    items: Vec<AnalyzedLootItem>,
    force_merging: bool,
    has_context: bool,
) -> Vec<AnalyzedLootItem> {
    if !force_merging && !has_context {
        return items;
    }

    let mut merged: Vec<AnalyzedLootItem> = Vec::with_capacity(items.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for item in items {
        match positions.get(&item.name) {
            Some(&pos) => merge_into(&mut merged[pos], &item),
            None => {
                positions.insert(item.name.clone(), merged.len());
                merged.push(item);
            }
        }
    }

    merged
}

/// Fold `source` into `target`
///
/// Ranges widen, probabilities add up (alternative ways to the same item) and
/// disagreeing conditions become unrestricted.
pub fn merge_into(target: &mut AnalyzedLootItem, source: &AnalyzedLootItem) {
    target.gear_score = widen_optional(target.gear_score, source.gear_score);
    target.quantity = target.quantity.widen(&source.quantity);
    target.probability += source.probability;
    if target.perk_bucket_overrides != source.perk_bucket_overrides {
        target.perk_bucket_overrides = None;
    }
    if target.perk_overrides != source.perk_overrides {
        target.perk_overrides = None;
    }
    target.conditions = merge_conditions(&target.conditions, &source.conditions);
}

fn merge_conditions(target: &Conditions, source: &Conditions) -> Conditions {
    let mut named = target.named.clone();
    named.extend(source.named.iter().cloned());

    Conditions {
        elite: agreed(target.elite, source.elite),
        fishing: agreed(target.fishing, source.fishing),
        global_mod: agreed(target.global_mod, source.global_mod),
        levels: Levels {
            character: widen_optional(target.levels.character, source.levels.character),
            content: widen_optional(target.levels.content, source.levels.content),
            enemy: widen_optional(target.levels.enemy, source.levels.enemy),
        },
        named,
    }
}

fn agreed<T: PartialEq>(a: Option<T>, b: Option<T>) -> Option<T> {
    if a == b {
        a
    } else {
        None
    }
}
