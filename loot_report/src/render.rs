//! Report rendering

use anyhow::{Context, Result};
use loot_core::{AnalyzedLootItem, AnalyzedLootTable, Conditions, NumberRange};
use serde::Serialize;
use tables_core::Diagnostic;

/// Display a range as `n`, `a-b` or `a+`; unset ranges are empty
pub fn format_range(range: Option<NumberRange>) -> String {
    range.map(|r| r.to_string()).unwrap_or_default()
}

/// Display a probability as a percentage with three decimals
pub fn format_probability(probability: f64) -> String {
    if probability.is_finite() {
        format!("{:.3}%", probability * 100.0)
    } else {
        "0.000%".to_string()
    }
}

/// Human-readable summary of item conditions
pub fn describe_conditions(conditions: &Conditions) -> String {
    let mut parts = Vec::new();

    match conditions.elite {
        Some(true) => parts.push("Elite".to_string()),
        Some(false) => parts.push("Common".to_string()),
        None => {}
    }
    if let Some(water) = conditions.fishing {
        parts.push(water.to_string());
    }
    if conditions.global_mod == Some(true) {
        parts.push("Global modifier".to_string());
    }

    let levels = &conditions.levels;
    if let Some(range) = levels.character {
        parts.push(format!("Character level {}", range));
    }
    if let Some(range) = levels.content {
        parts.push(format!("Content level {}", range));
    }
    if let Some(range) = levels.enemy {
        parts.push(format!("Enemy level {}", range));
    }

    if !conditions.named.is_empty() {
        parts.push(format!("Named: {}", conditions.named.join(", ")));
    }

    parts.join("; ")
}

/// Render analyzed tables as a Markdown document
pub fn markdown(tables: &[AnalyzedLootTable], diagnostics: &[Diagnostic]) -> String {
    let mut md = String::new();
    md.push_str("# Loot Tables\n\n");

    for table in tables {
        table_markdown(&mut md, table);
    }

    let warnings: Vec<&Diagnostic> = diagnostics.iter().filter(|d| d.is_warning()).collect();
    if !warnings.is_empty() {
        md.push_str("## Data warnings\n\n");
        for warning in warnings {
            md.push_str(&format!("- {}\n", warning));
        }
        md.push('\n');
    }

    md
}

fn table_markdown(md: &mut String, table: &AnalyzedLootTable) {
    md.push_str(&format!("## {}\n\n", table.id));

    let mut facts = vec![if table.multiple {
        "Multiple items".to_string()
    } else {
        "One item".to_string()
    }];
    if table.high_water_mark_multiplier != 0.0 {
        facts.push(format!("HWM multiplier {}", table.high_water_mark_multiplier));
    }
    if table.gear_score_bonus != 0.0 {
        facts.push(format!("Gear score bonus {}", table.gear_score_bonus));
    }
    if table.use_level_gear_score {
        facts.push("Level gear score".to_string());
    }
    if table.luck_safe {
        facts.push("Luck safe".to_string());
    }
    md.push_str(&format!("*{}*\n\n", facts.join(", ")));

    if table.items.is_empty() {
        md.push_str("No eligible items.\n\n");
        return;
    }

    md.push_str("| Item | Quantity | Probability | Gear Score | Conditions |\n");
    md.push_str("|------|----------|-------------|------------|------------|\n");
    for item in &table.items {
        md.push_str(&item_row(item));
    }
    md.push('\n');
}

fn item_row(item: &AnalyzedLootItem) -> String {
    format!(
        "| {} | {} | {} | {} | {} |\n",
        escape(&item.name),
        item.quantity,
        format_probability(item.probability),
        format_range(item.gear_score),
        escape(&describe_conditions(&item.conditions)),
    )
}

fn escape(cell: &str) -> String {
    cell.replace('|', "\\|")
}

/// Render any serializable value as pretty JSON
pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize report")
}

#[cfg(test)]
mod tests {
    use super::*;
    use loot_core::{Levels, WaterType};

    fn sample_table() -> AnalyzedLootTable {
        AnalyzedLootTable {
            id: "ChestLoot".to_string(),
            multiple: false,
            high_water_mark_multiplier: 0.0,
            use_level_gear_score: true,
            gear_score_bonus: 0.0,
            luck_safe: true,
            items: vec![AnalyzedLootItem {
                name: "IronOre".to_string(),
                gear_score: Some(NumberRange::new(100, 150)),
                quantity: NumberRange::new(1, 3),
                probability: 0.25,
                perk_bucket_overrides: None,
                perk_overrides: None,
                conditions: Conditions::default(),
            }],
        }
    }

    #[test]
    fn test_format_range() {
        assert_eq!(format_range(None), "");
        assert_eq!(format_range(Some(NumberRange::single(5))), "5");
        assert_eq!(format_range(Some(NumberRange::new(5, 9))), "5-9");
        assert_eq!(format_range(Some(NumberRange::at_least(20))), "20+");
    }

    #[test]
    fn test_format_probability() {
        assert_eq!(format_probability(0.25), "25.000%");
        assert_eq!(format_probability(0.0), "0.000%");
        assert_eq!(format_probability(f64::NAN), "0.000%");
        assert_eq!(format_probability(1.0 / 3.0), "33.333%");
    }

    #[test]
    fn test_describe_conditions() {
        assert_eq!(describe_conditions(&Conditions::default()), "");
        let conditions = Conditions {
            elite: Some(false),
            fishing: Some(WaterType::Salt),
            global_mod: Some(true),
            levels: Levels {
                character: None,
                content: Some(NumberRange::at_least(25)),
                enemy: Some(NumberRange::new(30, 40)),
            },
            named: vec!["Brimstone".to_string(), "Ancient".to_string()],
        };
        assert_eq!(
            describe_conditions(&conditions),
            "Common; Salt water; Global modifier; Content level 25+; Enemy level 30-40; Named: Brimstone, Ancient"
        );
    }

    #[test]
    fn test_markdown_table() {
        let md = markdown(&[sample_table()], &[]);
        assert!(md.contains("## ChestLoot"));
        assert!(md.contains("*One item, Level gear score, Luck safe*"));
        assert!(md.contains("| IronOre | 1-3 | 25.000% | 100-150 |  |"));
        assert!(!md.contains("Data warnings"));
    }

    #[test]
    fn test_markdown_empty_table_and_warnings() {
        let mut table = sample_table();
        table.items.clear();
        let diagnostics = vec![
            Diagnostic::UnknownTable {
                table: "ChestLoot".to_string(),
                reference: "[LTID]Gone".to_string(),
            },
            Diagnostic::BucketCollapsed {
                table: "ChestLoot".to_string(),
                bucket: "Ores".to_string(),
                size: 40,
            },
        ];
        let md = markdown(&[table], &diagnostics);
        assert!(md.contains("No eligible items."));
        assert!(md.contains("## Data warnings"));
        assert!(md.contains("[LTID]Gone"));
        assert!(!md.contains("Ores"));
    }

    #[test]
    fn test_json_uses_datasheet_names() {
        let out = json(&[sample_table()]).unwrap();
        assert!(out.contains("\"Id\": \"ChestLoot\""));
        assert!(out.contains("\"Probability\": 0.25"));
    }
}
