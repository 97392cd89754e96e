use crate::types::NumberRange;
use serde_json::Value;

/// Spreadsheet truthiness: unset, empty, zero and false cells are blank
pub(super) fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// A cell holding any value, including a literal zero
pub(super) fn is_present(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => !s.trim().is_empty(),
        Some(_) => true,
    }
}

/// Booleans are stored as `"TRUE"`/`"FALSE"`; anything else is false
pub(super) fn parse_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::String(s)) => s == "TRUE",
        Some(Value::Bool(b)) => *b,
        _ => false,
    }
}

pub(super) fn parse_int(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|v| v as i64)),
        Value::String(s) => int_from_str(s),
        _ => None,
    }
}

pub(super) fn parse_float(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(super) fn parse_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Parse `"100"`, `"100-150"` or a plain number; blank cells are `None`
pub(super) fn parse_range(value: Option<&Value>) -> Option<NumberRange> {
    if !is_truthy(value) {
        return None;
    }
    match value? {
        Value::Number(_) => parse_int(value).map(NumberRange::single),
        Value::String(s) => range_from_str(s),
        _ => None,
    }
}

pub(super) fn range_from_str(s: &str) -> Option<NumberRange> {
    let s = s.trim();
    match s.char_indices().skip(1).find(|&(_, c)| c == '-') {
        Some((dash, _)) => {
            let low = int_from_str(&s[..dash])?;
            let high = int_from_str(&s[dash + 1..])?;
            Some(NumberRange::new(low, high))
        }
        None => int_from_str(s).map(NumberRange::single),
    }
}

/// Comma separated list with blank entries removed
pub(super) fn parse_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(s)) => s
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    }
}

fn int_from_str(s: &str) -> Option<i64> {
    let s = s.trim();
    s.parse::<i64>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().map(|v| v as i64))
}
