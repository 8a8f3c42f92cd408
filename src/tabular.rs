//! Schema detection for tabular encoding.
//!
//! A list qualifies as a tabular block when every element is a map with the
//! same keys in the same order as the first element and every cell is a
//! scalar. The field order is the first element's key order. Anything less
//! uniform falls back to structural encoding, so the per-element key order
//! survives the round trip.

use crate::value::{Map, Value};

/// Transient view over a detected tabular region; recomputed on every
/// encode, never persisted.
#[derive(Debug)]
pub(crate) struct TabularBlock<'a> {
    pub fields: Vec<&'a str>,
    pub rows: Vec<&'a Map>,
}

pub(crate) fn detect_tabular(items: &[Value]) -> Option<TabularBlock<'_>> {
    let first = match items.first() {
        Some(Value::Map(map)) => map,
        _ => return None,
    };
    if first.is_empty() || !first.values().all(Value::is_scalar) {
        return None;
    }

    let fields: Vec<&str> = first.keys().map(String::as_str).collect();
    let mut rows = Vec::with_capacity(items.len());
    rows.push(first);

    for item in &items[1..] {
        let map = match item {
            Value::Map(map) => map,
            _ => return None,
        };
        if map.len() != fields.len() {
            return None;
        }
        for (key, field) in map.keys().zip(&fields) {
            if key != field {
                return None;
            }
        }
        if !map.values().all(Value::is_scalar) {
            return None;
        }
        rows.push(map);
    }

    Some(TabularBlock { fields, rows })
}
