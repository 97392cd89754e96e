use std::fmt;

/// A degraded-resolution event recorded while analyzing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// `[LTID]` reference to a table that does not exist
    UnknownTable { table: String, reference: String },
    /// `[LBID]` reference to a bucket that does not exist
    UnknownBucket { table: String, reference: String },
    /// Reference back into a table already being resolved
    CyclicReference {
        table: String,
        reference: String,
        path: Vec<String>,
    },
    /// Bucket larger than the expansion threshold, kept as a single pick
    BucketCollapsed {
        table: String,
        bucket: String,
        size: usize,
    },
}

impl Diagnostic {
    /// Table whose item triggered the event
    pub fn table(&self) -> &str {
        match self {
            Diagnostic::UnknownTable { table, .. }
            | Diagnostic::UnknownBucket { table, .. }
            | Diagnostic::CyclicReference { table, .. }
            | Diagnostic::BucketCollapsed { table, .. } => table,
        }
    }

    /// Whether the event indicates broken data rather than a reporting choice
    pub fn is_warning(&self) -> bool {
        !matches!(self, Diagnostic::BucketCollapsed { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnknownTable { table, reference } => {
                write!(f, "Loot table {} has unknown table reference {}", table, reference)
            }
            Diagnostic::UnknownBucket { table, reference } => {
                write!(f, "Loot table {} has unknown bucket reference {}", table, reference)
            }
            Diagnostic::CyclicReference {
                table,
                reference,
                path,
            } => write!(
                f,
                "Loot table {} has cyclic reference {} (via {})",
                table,
                reference,
                path.join(" -> ")
            ),
            Diagnostic::BucketCollapsed {
                table,
                bucket,
                size,
            } => write!(
                f,
                "Loot table {} keeps bucket {} with {} items unexpanded",
                table, bucket, size
            ),
        }
    }
}
