//! Conversion of roll thresholds into probabilities

use loot_core::AnalyzedLootItem;

/// Probability of rolling at least `threshold` on a table with the given
/// roll ceiling.
///
/// Tables without a roll range (`max_roll <= 0`) only hand out the items
/// flagged with threshold 0.
pub fn roll_to_probability(max_roll: i64, threshold: i64) -> f64 {
    if max_roll > 0 {
        if threshold > max_roll {
            0.0
        } else {
            1.0 - threshold as f64 / max_roll as f64
        }
    } else if threshold == 0 {
        1.0
    } else {
        0.0
    }
}

/// Rescale mutually exclusive entries so they reflect a single draw among them
///
/// Each entry holds the leaves one sibling expanded into. Every leaf is
/// divided by the number of entries that can be drawn at all, so an entry
/// expanding into several leaves still counts once. Sets where nothing can be
/// drawn are left at zero.
pub fn renormalize_single_choice(entries: &mut [Vec<AnalyzedLootItem>]) {
    let possible = entries
        .iter()
        .filter(|leaves| leaves.iter().any(|i| i.probability > 0.0))
        .count();
    if possible == 0 {
        return;
    }
    for item in entries.iter_mut().flatten() {
        item.probability /= possible as f64;
    }
}
