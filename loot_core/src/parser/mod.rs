//! Datasheet parser
//!
//! The datasheets are exported spreadsheets: a JSON array of row objects whose
//! columns are indexed by suffix (`Item1`, `Item2`, ... `Quantity1`, ...).
//! Values may be strings or numbers, booleans are the strings `"TRUE"` and
//! `"FALSE"`, ranges are `"100"` or `"100-150"`.

mod buckets;
mod tables;
mod values;

pub use buckets::{loot_buckets_from_rows, parse_loot_buckets};
pub use tables::{loot_tables_from_rows, parse_loot_tables};

use crate::table::Loot;
use serde_json::{Map, Value};
use thiserror::Error;

/// A single datasheet row
pub type Row = Map<String, Value>;

/// Error reading a datasheet
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unexpected datasheet shape: {0}")]
    Shape(String),
}

/// Split a datasheet document into its rows
pub fn parse_rows(json: &str) -> Result<Vec<Row>, ParseError> {
    let document: Value = serde_json::from_str(json)?;
    let Value::Array(rows) = document else {
        return Err(ParseError::Shape(
            "top level is not an array of rows".to_string(),
        ));
    };

    rows.into_iter()
        .enumerate()
        .map(|(index, row)| match row {
            Value::Object(map) => Ok(map),
            _ => Err(ParseError::Shape(format!("row {} is not an object", index))),
        })
        .collect()
}

/// Parse both datasheets into a complete data set
pub fn parse_loot(tables_json: &str, buckets_json: &str) -> Result<Loot, ParseError> {
    Ok(Loot {
        loot_tables: parse_loot_tables(tables_json)?,
        loot_buckets: parse_loot_buckets(buckets_json)?,
    })
}
