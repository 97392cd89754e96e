//! Recursive expansion of table and bucket references into leaf items

use crate::conditions::is_eligible;
use crate::config::ProbabilityContext;
use crate::diagnostics::Diagnostic;
use crate::probability::{renormalize_single_choice, roll_to_probability};
use crate::registry::LootRegistry;
use loot_core::{
    AnalyzedLootItem, Conditions, LootBucket, LootTable, LootTableItem, NumberRange, Reference,
};
use tracing::{debug, warn};

/// Name prefix of the placeholder emitted for buckets too large to expand
pub const BUCKET_PICK_PREFIX: &str = "Pick from loot bucket: ";

/// Expands loot table items into leaf items
///
/// Probabilities and quantities multiply along every reference chain. Leaves
/// the context rules out are dropped before any OR table is renormalized, so
/// a table resolves the same whether it is analyzed directly or reached
/// through a reference. The tables currently being expanded are tracked so
/// that a reference back into one of them is reported instead of recursing
/// forever.
pub struct Dereferencer<'r, 'a> {
    registry: &'r LootRegistry<'a>,
    context: &'r ProbabilityContext,
    bucket_threshold: usize,
    path: Vec<&'a str>,
    diagnostics: Vec<Diagnostic>,
}

impl<'r, 'a> Dereferencer<'r, 'a> {
    pub fn new(
        registry: &'r LootRegistry<'a>,
        context: &'r ProbabilityContext,
        bucket_threshold: usize,
    ) -> Self {
        Dereferencer {
            registry,
            context,
            bucket_threshold,
            path: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Resolve every eligible leaf of a top-level table
    pub fn resolve_items(&mut self, table: &'a LootTable) -> Vec<AnalyzedLootItem> {
        self.expand_table(table, NumberRange::single(1), 1.0)
    }

    /// Expand one item of `table` into leaf items
    ///
    /// `base_quantity` and `base_probability` are the accumulated factors of
    /// the reference chain leading here, 1 for top-level items.
    pub fn dereference(
        &mut self,
        item: &'a LootTableItem,
        table: &'a LootTable,
        base_quantity: NumberRange,
        base_probability: f64,
    ) -> Vec<AnalyzedLootItem> {
        let probability = base_probability * roll_to_probability(table.max_roll, item.probability);
        let quantity = item.quantity.multiply(&base_quantity);

        match item.reference() {
            Some(Reference::Table(id)) => match self.registry.table(id) {
                Some(_) if self.path.contains(&id) => {
                    let mut path: Vec<String> = self.path.iter().map(|s| s.to_string()).collect();
                    path.push(id.to_string());
                    self.report(Diagnostic::CyclicReference {
                        table: table.loot_table_id.clone(),
                        reference: item.name.clone(),
                        path,
                    });
                }
                Some(referenced) => {
                    return self.expand_table(referenced, quantity, probability);
                }
                None => self.report(Diagnostic::UnknownTable {
                    table: table.loot_table_id.clone(),
                    reference: item.name.clone(),
                }),
            },
            Some(Reference::Bucket(name)) => match self.registry.bucket(name) {
                Some(bucket) => {
                    return self.expand_bucket(item, table, bucket, quantity, probability);
                }
                None => self.report(Diagnostic::UnknownBucket {
                    table: table.loot_table_id.clone(),
                    reference: item.name.clone(),
                }),
            },
            None => {}
        }

        // Literal item, or a reference that could not be resolved
        vec![leaf(
            item.name.clone(),
            item,
            quantity,
            probability,
            item.conditions.clone(),
        )]
    }

    /// Expand every entry of `table`, keeping one group of leaves per entry
    ///
    /// An OR table is a single draw among its entries, however many leaves
    /// each of them expands into.
    fn expand_table(
        &mut self,
        table: &'a LootTable,
        quantity: NumberRange,
        probability: f64,
    ) -> Vec<AnalyzedLootItem> {
        let context = self.context;

        self.path.push(&table.loot_table_id);
        let mut entries: Vec<Vec<AnalyzedLootItem>> = table
            .items
            .iter()
            .map(|item| {
                let mut leaves = self.dereference(item, table, quantity, probability);
                leaves.retain(|leaf| is_eligible(&leaf.conditions, context));
                leaves
            })
            .collect();
        self.path.pop();

        if !table.is_multiple() {
            renormalize_single_choice(&mut entries);
        }
        entries.into_iter().flatten().collect()
    }

    fn expand_bucket(
        &mut self,
        item: &'a LootTableItem,
        table: &'a LootTable,
        bucket: &'a LootBucket,
        quantity: NumberRange,
        probability: f64,
    ) -> Vec<AnalyzedLootItem> {
        let size = bucket.items.len();

        if size > self.bucket_threshold {
            debug!(
                "Not expanding bucket {} ({} items) referenced by {}",
                bucket.name, size, table.loot_table_id
            );
            self.diagnostics.push(Diagnostic::BucketCollapsed {
                table: table.loot_table_id.clone(),
                bucket: bucket.name.clone(),
                size,
            });
            return vec![leaf(
                format!("{}{}", BUCKET_PICK_PREFIX, bucket.name),
                item,
                quantity,
                probability,
                item.conditions.clone(),
            )];
        }

        // MatchOne buckets hand out each member under the shared probability,
        // otherwise exactly one member is drawn
        let member_probability = if bucket.match_one {
            probability
        } else {
            probability / size as f64
        };

        bucket
            .items
            .iter()
            .map(|member| {
                leaf(
                    member.name.clone(),
                    item,
                    quantity.multiply(&member.quantity),
                    member_probability,
                    item.conditions.restricted_by(&member.conditions),
                )
            })
            .collect()
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }
}

fn leaf(
    name: String,
    source: &LootTableItem,
    quantity: NumberRange,
    probability: f64,
    conditions: Conditions,
) -> AnalyzedLootItem {
    AnalyzedLootItem {
        name,
        gear_score: source.gear_score,
        quantity,
        probability,
        perk_bucket_overrides: source.perk_bucket_overrides.clone(),
        perk_overrides: source.perk_overrides.clone(),
        conditions,
    }
}
