use crate::config::{AnalyzerConfig, ProbabilityContext};
use crate::dereference::Dereferencer;
use crate::diagnostics::Diagnostic;
use crate::merge::merge_duplicates;
use crate::registry::LootRegistry;
use crate::AnalyzeError;
use loot_core::{AnalyzedLootTable, Loot, LootTable};
use std::sync::OnceLock;
use tracing::debug;

/// Which tables to analyze
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TableSelector {
    #[default]
    All,
    /// Only these ids, reported in source order
    Only(Vec<String>),
}

impl TableSelector {
    pub fn only<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let ids: Vec<String> = ids.into_iter().map(Into::into).collect();
        if ids.is_empty() {
            TableSelector::All
        } else {
            TableSelector::Only(ids)
        }
    }

    fn includes(&self, id: &str) -> bool {
        match self {
            TableSelector::All => true,
            TableSelector::Only(ids) => ids.iter().any(|i| i == id),
        }
    }
}

/// Result of one analysis run
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    /// Resolved tables in source order
    pub tables: Vec<AnalyzedLootTable>,
    /// Degraded-resolution events, in the order they occurred
    pub diagnostics: Vec<Diagnostic>,
}

impl Analysis {
    pub fn table(&self, id: &str) -> Option<&AnalyzedLootTable> {
        self.tables.iter().find(|t| t.id == id)
    }

    /// Diagnostics caused by broken data
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }
}

/// Resolves loot tables of a data set into drop probabilities
///
/// The reference index is built on first use and reused by every later call.
pub struct Analyzer<'a> {
    loot: &'a Loot,
    config: AnalyzerConfig,
    registry: OnceLock<LootRegistry<'a>>,
}

impl<'a> Analyzer<'a> {
    pub fn new(loot: &'a Loot, config: AnalyzerConfig) -> Self {
        Analyzer {
            loot,
            config,
            registry: OnceLock::new(),
        }
    }

    /// Analyzer with default options filtering by the given context
    pub fn with_context(loot: &'a Loot, context: ProbabilityContext) -> Self {
        Self::new(
            loot,
            AnalyzerConfig {
                context,
                ..Default::default()
            },
        )
    }

    /// Lookup of tables and buckets, built once
    pub fn registry(&self) -> &LootRegistry<'a> {
        self.registry.get_or_init(|| {
            let registry = LootRegistry::build(self.loot);
            debug!(
                "Indexed {} loot tables and {} loot buckets",
                registry.table_count(),
                registry.bucket_count()
            );
            registry
        })
    }

    /// Analyze the selected tables
    ///
    /// Data-quality problems never fail the run; they are reported in
    /// [`Analysis::diagnostics`]. Selecting an id that does not exist is an
    /// error.
    pub fn analyze(&self, selector: &TableSelector) -> Result<Analysis, AnalyzeError> {
        // TODO: account for luck bonuses once their effect on MaxRoll is known
        let registry = self.registry();

        if let TableSelector::Only(ids) = selector {
            if let Some(missing) = ids.iter().find(|id| !registry.contains_table(id)) {
                return Err(AnalyzeError::UnknownTable(missing.clone()));
            }
        }

        let mut dereferencer = Dereferencer::new(
            registry,
            &self.config.context,
            self.config.options.bucket_threshold,
        );
        let tables: Vec<AnalyzedLootTable> = self
            .loot
            .loot_tables
            .iter()
            .filter(|table| selector.includes(&table.loot_table_id))
            .map(|table| self.analyze_table(table, &mut dereferencer))
            .collect();

        debug!("Analyzed {} loot tables", tables.len());
        Ok(Analysis {
            tables,
            diagnostics: dereferencer.into_diagnostics(),
        })
    }

    fn analyze_table(
        &self,
        table: &'a LootTable,
        dereferencer: &mut Dereferencer<'_, 'a>,
    ) -> AnalyzedLootTable {
        let items = dereferencer.resolve_items(table);

        let mut analyzed = AnalyzedLootTable::from_source(table);
        analyzed.items = merge_duplicates(
            items,
            self.config.options.force_merge,
            !self.config.context.is_empty(),
        );
        analyzed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AnalyzerOptions, EnemyContext};
    use loot_core::{AndOr, Conditions, LootBucket, LootBucketItem, LootTableItem, NumberRange};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn loot(tables: Vec<LootTable>, buckets: Vec<LootBucket>) -> Loot {
        Loot {
            loot_tables: tables,
            loot_buckets: buckets,
        }
    }

    fn analyze_all(loot: &Loot) -> Analysis {
        Analyzer::new(loot, AnalyzerConfig::default())
            .analyze(&TableSelector::All)
            .unwrap()
    }

    fn bucket_of_three(match_one: bool) -> LootBucket {
        LootBucket::new("B", match_one)
            .with_item(LootBucketItem::new("Copper", NumberRange::single(1)))
            .with_item(LootBucketItem::new("Iron", NumberRange::single(1)))
            .with_item(LootBucketItem::new("Silver", NumberRange::single(1)))
    }

    fn with_threshold(bucket_threshold: usize) -> AnalyzerConfig {
        AnalyzerConfig {
            options: AnalyzerOptions {
                bucket_threshold,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_threshold_at_max_roll_is_zero() {
        let data = loot(
            vec![LootTable::new("T1", 100).with_item(LootTableItem::new("A").with_threshold(100))],
            Vec::new(),
        );
        let analysis = analyze_all(&data);
        assert_eq!(analysis.tables[0].items[0].probability, 0.0);
    }

    #[test]
    fn test_zero_threshold_is_certain() {
        let data = loot(
            vec![LootTable::new("T1", 100).with_item(LootTableItem::new("A"))],
            Vec::new(),
        );
        let analysis = analyze_all(&data);
        assert_eq!(analysis.tables[0].items[0].probability, 1.0);
    }

    #[test]
    fn test_table_without_roll_range() {
        let data = loot(
            vec![LootTable::new("T2", 0)
                .with_item(LootTableItem::new("A"))
                .with_item(LootTableItem::new("B").with_threshold(5))],
            Vec::new(),
        );
        let items = &analyze_all(&data).tables[0].items;
        assert_eq!(items[0].probability, 1.0);
        assert_eq!(items[1].probability, 0.0);
    }

    #[test]
    fn test_or_table_splits_between_items() {
        let data = loot(
            vec![LootTable::new("T3", 100)
                .with_item(LootTableItem::new("A"))
                .with_item(LootTableItem::new("B"))],
            Vec::new(),
        );
        let table = &analyze_all(&data).tables[0];
        assert!(!table.multiple);
        assert_eq!(table.items[0].probability, 0.5);
        assert_eq!(table.items[1].probability, 0.5);
    }

    #[test]
    fn test_and_table_keeps_independent_probabilities() {
        let data = loot(
            vec![LootTable::new("T", 100)
                .with_and_or(AndOr::And)
                .with_item(LootTableItem::new("A"))
                .with_item(LootTableItem::new("B").with_threshold(50))],
            Vec::new(),
        );
        let table = &analyze_all(&data).tables[0];
        assert!(table.multiple);
        assert_eq!(table.items[0].probability, 1.0);
        assert_eq!(table.items[1].probability, 0.5);
    }

    #[test]
    fn test_match_one_bucket_keeps_outer_probability() {
        let data = loot(
            vec![LootTable::new("T", 0)
                .with_and_or(AndOr::And)
                .with_item(LootTableItem::new("[LBID]B"))],
            vec![bucket_of_three(true)],
        );
        let analysis = Analyzer::new(&data, with_threshold(5))
            .analyze(&TableSelector::All)
            .unwrap();
        let items = &analysis.tables[0].items;
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|i| approx(i.probability, 1.0)));
    }

    #[test]
    fn test_split_bucket_divides_outer_probability() {
        let data = loot(
            vec![LootTable::new("T", 10)
                .with_and_or(AndOr::And)
                .with_item(LootTableItem::new("[LBID]B").with_threshold(7))],
            vec![bucket_of_three(false)],
        );
        let analysis = Analyzer::new(&data, with_threshold(5))
            .analyze(&TableSelector::All)
            .unwrap();
        let items = &analysis.tables[0].items;
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|i| approx(i.probability, 0.1)));
    }

    #[test]
    fn test_default_threshold_collapses_buckets() {
        let data = loot(
            vec![LootTable::new("T", 0).with_item(LootTableItem::new("[LBID]B"))],
            vec![bucket_of_three(false)],
        );
        let analysis = analyze_all(&data);
        let items = &analysis.tables[0].items;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Pick from loot bucket: B");
        assert_eq!(analysis.diagnostics.len(), 1);
        assert_eq!(analysis.warnings().count(), 0);
    }

    #[test]
    fn test_or_tables_sum_to_one() {
        let data = loot(
            vec![
                LootTable::new("Mixed", 1000)
                    .with_item(LootTableItem::new("A").with_threshold(100))
                    .with_item(LootTableItem::new("B").with_threshold(900))
                    .with_item(LootTableItem::new("C").with_threshold(2000)),
                LootTable::new("Impossible", 10)
                    .with_item(LootTableItem::new("A").with_threshold(10))
                    .with_item(LootTableItem::new("B").with_threshold(11)),
                LootTable::new("Guaranteed", 0)
                    .with_item(LootTableItem::new("A"))
                    .with_item(LootTableItem::new("B"))
                    .with_item(LootTableItem::new("C")),
            ],
            Vec::new(),
        );
        let analysis = analyze_all(&data);
        let guaranteed = analysis.table("Guaranteed").unwrap();
        assert!(approx(guaranteed.total_probability(), 1.0));
        assert_eq!(analysis.table("Impossible").unwrap().total_probability(), 0.0);

        let mixed = analysis.table("Mixed").unwrap();
        // (0.9 + 0.1) / 2
        assert!(approx(mixed.total_probability(), 0.5));
    }

    #[test]
    fn test_context_filters_before_renormalizing() {
        let elite = Conditions {
            elite: Some(true),
            ..Default::default()
        };
        let common = Conditions {
            elite: Some(false),
            ..Default::default()
        };
        let data = loot(
            vec![LootTable::new("Boss", 0)
                .with_item(LootTableItem::new("EliteDrop").with_conditions(elite))
                .with_item(LootTableItem::new("CommonDrop").with_conditions(common))
                .with_item(LootTableItem::new("Coin"))],
            Vec::new(),
        );

        let unfiltered = analyze_all(&data);
        assert_eq!(unfiltered.tables[0].items.len(), 3);

        let context = ProbabilityContext {
            enemy: Some(EnemyContext {
                elite: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };
        let analysis = Analyzer::with_context(&data, context)
            .analyze(&TableSelector::All)
            .unwrap();
        let items = &analysis.tables[0].items;
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["EliteDrop", "Coin"]);
        assert!(items.iter().all(|i| approx(i.probability, 0.5)));
    }

    #[test]
    fn test_nested_or_tables_sum_to_one() {
        let inner = LootTable::new("Inner", 0)
            .with_item(LootTableItem::new("X"))
            .with_item(LootTableItem::new("Y"));
        let data = loot(
            vec![
                LootTable::new("Outer", 0).with_item(LootTableItem::new("[LTID]Inner")),
                LootTable::new("Mixed", 0)
                    .with_item(LootTableItem::new("A"))
                    .with_item(LootTableItem::new("[LTID]Inner")),
                inner,
            ],
            Vec::new(),
        );
        let analysis = analyze_all(&data);

        let outer = analysis.table("Outer").unwrap();
        assert!(outer.items.iter().all(|i| approx(i.probability, 0.5)));
        assert!(approx(outer.total_probability(), 1.0));

        let mixed = analysis.table("Mixed").unwrap();
        let probabilities: Vec<f64> = mixed.items.iter().map(|i| i.probability).collect();
        assert!(approx(probabilities[0], 0.5));
        assert!(approx(probabilities[1], 0.25));
        assert!(approx(probabilities[2], 0.25));
        assert!(approx(mixed.total_probability(), 1.0));
    }

    #[test]
    fn test_referenced_table_resolves_like_direct_analysis() {
        let elite = Conditions {
            elite: Some(true),
            ..Default::default()
        };
        let common = Conditions {
            elite: Some(false),
            ..Default::default()
        };
        let data = loot(
            vec![
                LootTable::new("Outer", 0)
                    .with_and_or(AndOr::And)
                    .with_item(LootTableItem::new("[LTID]Inner")),
                LootTable::new("Inner", 0)
                    .with_item(LootTableItem::new("EliteX").with_conditions(elite))
                    .with_item(LootTableItem::new("CommonY").with_conditions(common)),
            ],
            Vec::new(),
        );
        let context = ProbabilityContext {
            enemy: Some(EnemyContext {
                elite: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };
        let analysis = Analyzer::with_context(&data, context)
            .analyze(&TableSelector::All)
            .unwrap();

        let outer = &analysis.table("Outer").unwrap().items;
        let inner = &analysis.table("Inner").unwrap().items;
        assert_eq!(outer, inner);
        assert_eq!(outer[0].name, "EliteX");
        assert!(approx(outer[0].probability, 1.0));
    }

    #[test]
    fn test_duplicates_merge_only_with_context() {
        let inner = LootTable::new("Inner", 0)
            .with_and_or(AndOr::And)
            .with_item(LootTableItem::new("Gold").with_quantity(NumberRange::single(5)));
        let outer = LootTable::new("Outer", 0)
            .with_and_or(AndOr::And)
            .with_item(LootTableItem::new("Gold"))
            .with_item(LootTableItem::new("[LTID]Inner"));
        let data = loot(vec![outer, inner], Vec::new());

        let analysis = analyze_all(&data);
        assert_eq!(analysis.table("Outer").unwrap().items.len(), 2);

        let analysis = Analyzer::with_context(
            &data,
            ProbabilityContext {
                character_level: Some(60),
                ..Default::default()
            },
        )
        .analyze(&TableSelector::All)
        .unwrap();
        let items = &analysis.table("Outer").unwrap().items;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].probability, 2.0);
        assert_eq!(items[0].quantity, NumberRange::new(1, 5));
    }

    #[test]
    fn test_selector_preserves_source_order() {
        let data = loot(
            vec![
                LootTable::new("A", 0),
                LootTable::new("B", 0),
                LootTable::new("C", 0),
            ],
            Vec::new(),
        );
        let analysis = Analyzer::new(&data, AnalyzerConfig::default())
            .analyze(&TableSelector::only(["C", "A"]))
            .unwrap();
        let ids: Vec<&str> = analysis.tables.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "C"]);
        // Tables without items still appear
        assert!(analysis.tables.iter().all(|t| t.items.is_empty()));
    }

    #[test]
    fn test_unknown_selected_table() {
        let data = loot(vec![LootTable::new("A", 0)], Vec::new());
        let result = Analyzer::new(&data, AnalyzerConfig::default())
            .analyze(&TableSelector::only(["Missing"]));
        assert!(matches!(result, Err(AnalyzeError::UnknownTable(id)) if id == "Missing"));
    }

    #[test]
    fn test_empty_selector_means_all() {
        assert_eq!(TableSelector::only(Vec::<String>::new()), TableSelector::All);
    }

    #[test]
    fn test_registry_built_once() {
        let data = loot(vec![LootTable::new("A", 0)], Vec::new());
        let analyzer = Analyzer::new(&data, AnalyzerConfig::default());
        let first: *const LootRegistry = analyzer.registry();
        analyzer.analyze(&TableSelector::All).unwrap();
        analyzer.analyze(&TableSelector::All).unwrap();
        assert!(std::ptr::eq(first, analyzer.registry()));
    }

    #[test]
    fn test_broken_reference_does_not_abort_run() {
        let data = loot(
            vec![
                LootTable::new("Broken", 0).with_item(LootTableItem::new("[LTID]Gone")),
                LootTable::new("Fine", 0).with_item(LootTableItem::new("Coin")),
            ],
            Vec::new(),
        );
        let analysis = analyze_all(&data);
        assert_eq!(analysis.tables.len(), 2);
        assert_eq!(analysis.tables[0].items[0].name, "[LTID]Gone");
        assert_eq!(analysis.tables[1].items[0].probability, 1.0);
        assert_eq!(analysis.warnings().count(), 1);
        assert_eq!(analysis.diagnostics[0].table(), "Broken");
    }

    #[test]
    fn test_sampled_draws_match_analysis() {
        let thresholds = [0, 40, 75, 120];
        let mut table = LootTable::new("Sampled", 100);
        for (i, threshold) in thresholds.iter().enumerate() {
            table = table.with_item(LootTableItem::new(format!("Item{}", i)).with_threshold(*threshold));
        }
        let data = loot(vec![table], Vec::new());
        let analysis = analyze_all(&data);
        let items = &analysis.tables[0].items;

        // One draw among the reachable items, then a roll against its threshold
        let reachable: Vec<usize> = (0..thresholds.len())
            .filter(|&i| thresholds[i] < 100)
            .collect();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let iterations = 200_000;
        let mut counts = vec![0usize; thresholds.len()];
        for _ in 0..iterations {
            let pick = reachable[rng.gen_range(0..reachable.len())];
            if rng.gen_range(0..100) >= thresholds[pick] {
                counts[pick] += 1;
            }
        }

        for (i, item) in items.iter().enumerate() {
            let observed = counts[i] as f64 / iterations as f64;
            assert!(
                (observed - item.probability).abs() < 0.01,
                "{}: observed {} vs analyzed {}",
                item.name,
                observed,
                item.probability
            );
        }
    }
}
