use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive numeric interval used for quantities, gear scores and levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase")]
pub struct NumberRange {
    pub low: i64,
    pub high: i64,
}

impl NumberRange {
    /// Sentinel upper bound for open-ended ranges
    pub const OPEN_HIGH: i64 = i64::MAX;

    pub fn new(low: i64, high: i64) -> Self {
        NumberRange { low, high }
    }

    /// Range containing exactly one value
    pub fn single(value: i64) -> Self {
        NumberRange {
            low: value,
            high: value,
        }
    }

    /// Range with no upper bound, e.g. "level 20 or higher"
    pub fn at_least(low: i64) -> Self {
        NumberRange {
            low,
            high: Self::OPEN_HIGH,
        }
    }

    pub fn is_open(&self) -> bool {
        self.high == Self::OPEN_HIGH
    }

    pub fn contains(&self, value: i64) -> bool {
        self.low <= value && value <= self.high
    }

    /// Pairwise multiplication: low * low, high * high
    pub fn multiply(&self, other: &NumberRange) -> Self {
        NumberRange {
            low: self.low.saturating_mul(other.low),
            high: self.high.saturating_mul(other.high),
        }
    }

    /// Smallest range covering both inputs
    pub fn widen(&self, other: &NumberRange) -> Self {
        NumberRange {
            low: self.low.min(other.low),
            high: self.high.max(other.high),
        }
    }
}

impl fmt::Display for NumberRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_open() {
            write!(f, "{}+", self.low)
        } else if self.low == self.high {
            write!(f, "{}", self.low)
        } else {
            write!(f, "{}-{}", self.low, self.high)
        }
    }
}

/// Widen two optional ranges; an unset side is unbounded and swallows the other
pub fn widen_optional(a: Option<NumberRange>, b: Option<NumberRange>) -> Option<NumberRange> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.widen(&b)),
        _ => None,
    }
}

/// Water type for fishing loot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaterType {
    Fresh,
    Salt,
}

impl WaterType {
    pub fn is_salt(&self) -> bool {
        matches!(self, WaterType::Salt)
    }
}

impl fmt::Display for WaterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WaterType::Fresh => write!(f, "Fresh water"),
            WaterType::Salt => write!(f, "Salt water"),
        }
    }
}

/// Level requirements of an item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Levels {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character: Option<NumberRange>,
    /// Content (point of interest) level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<NumberRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enemy: Option<NumberRange>,
}

impl Levels {
    pub fn is_empty(&self) -> bool {
        self.character.is_none() && self.content.is_none() && self.enemy.is_none()
    }
}

/// Eligibility predicates attached to an item
///
/// Every unset field is unrestricted. `named` tags must all be matched by the
/// enemy or location facts of a context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Conditions {
    /// `Some(true)` for elite enemies only, `Some(false)` for common enemies only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elite: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fishing: Option<WaterType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_mod: Option<bool>,
    #[serde(default, skip_serializing_if = "Levels::is_empty")]
    pub levels: Levels,
    #[serde(default)]
    pub named: Vec<String>,
}

impl Conditions {
    /// Narrow these conditions by another set: set fields of `other` take
    /// precedence and named tags accumulate.
    pub fn restricted_by(&self, other: &Conditions) -> Conditions {
        let mut named = self.named.clone();
        named.extend(other.named.iter().cloned());
        Conditions {
            elite: other.elite.or(self.elite),
            fishing: other.fishing.or(self.fishing),
            global_mod: other.global_mod.or(self.global_mod),
            levels: Levels {
                character: other.levels.character.or(self.levels.character),
                content: other.levels.content.or(self.levels.content),
                enemy: other.levels.enemy.or(self.levels.enemy),
            },
            named,
        }
    }
}

/// Target of a cross-reference item name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference<'a> {
    /// `[LTID]<loot table id>`
    Table(&'a str),
    /// `[LBID]<loot bucket name>`
    Bucket(&'a str),
}

impl<'a> Reference<'a> {
    pub const TABLE_PREFIX: &'static str = "[LTID]";
    pub const BUCKET_PREFIX: &'static str = "[LBID]";

    /// Decode a reference from an item name, `None` for literal items
    pub fn parse(name: &'a str) -> Option<Self> {
        if let Some(id) = name.strip_prefix(Self::TABLE_PREFIX) {
            Some(Reference::Table(id))
        } else {
            name.strip_prefix(Self::BUCKET_PREFIX).map(Reference::Bucket)
        }
    }
}
