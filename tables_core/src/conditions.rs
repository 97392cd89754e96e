//! Evaluation of item eligibility against a probability context

use crate::config::ProbabilityContext;
use loot_core::{Conditions, NumberRange};

/// Value an item condition expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expected<T> {
    /// Exact match
    Scalar(T),
    /// Inclusive bounds
    Range(T, T),
}

impl<T: PartialOrd> Expected<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Expected::Scalar(expected) => value == expected,
            Expected::Range(low, high) => low <= value && value <= high,
        }
    }
}

impl From<NumberRange> for Expected<i64> {
    fn from(range: NumberRange) -> Self {
        Expected::Range(range.low, range.high)
    }
}

/// A condition fails only if both sides are known and disagree
pub fn condition_failed<T: PartialOrd>(observed: Option<T>, expected: Option<Expected<T>>) -> bool {
    match (observed, expected) {
        (Some(observed), Some(expected)) => !expected.admits(&observed),
        _ => false,
    }
}

/// Whether an item with these conditions can drop in the given context
pub fn is_eligible(conditions: &Conditions, context: &ProbabilityContext) -> bool {
    let levels = &conditions.levels;

    if condition_failed(context.enemy_elite(), conditions.elite.map(Expected::Scalar)) {
        return false;
    }
    if condition_failed(
        context.salt,
        conditions.fishing.map(|water| Expected::Scalar(water.is_salt())),
    ) {
        return false;
    }
    if condition_failed(context.character_level, levels.character.map(Expected::from)) {
        return false;
    }
    if condition_failed(context.location_level(), levels.content.map(Expected::from)) {
        return false;
    }
    if condition_failed(context.enemy_level(), levels.enemy.map(Expected::from)) {
        return false;
    }

    // Named tags are only evaluated once enemy or location facts are given
    if context.has_enemy_or_location() {
        return named_tags_matched(&conditions.named, context.name_candidates());
    }
    true
}

/// Every tag must consume a distinct candidate
fn named_tags_matched(named: &[String], mut candidates: Vec<&str>) -> bool {
    for tag in named {
        match candidates.iter().position(|c| *c == tag.as_str()) {
            Some(index) => {
                candidates.swap_remove(index);
            }
            None => return false,
        }
    }
    true
}
