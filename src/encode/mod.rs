//! Encoding: walk the value tree and emit the line-oriented wire form.
//!
//! Lists switch between three layouts per substructure: inline (`key[]: a,b`)
//! when every element is a scalar, tabular (`key[f1,f2]:` + rows) when the
//! schema detector qualifies the list, and one `- ` item line per element
//! otherwise. Indentation grows one level per nesting step and is the only
//! scope signal.

mod writer;

use serde::Serialize;

use crate::constants::MAX_DEPTH;
use crate::error::{Error, Result};
use crate::options::EncodeOptions;
use crate::tabular::{detect_tabular, TabularBlock};
use crate::value::{Map, Value};
use writer::Writer;

/// Encode any `Serialize` type through the value model.
pub fn to_string<T: Serialize>(value: &T, options: &EncodeOptions) -> Result<String> {
    let json = serde_json::to_value(value)
        .map_err(|err| Error::unsupported(format!("serialize failed: {err}")))?;
    encode(&Value::from(json), options)
}

/// Encode a value as TOON text. Pure and deterministic; fails only on
/// non-finite numbers or nesting beyond the depth cap.
pub fn encode(value: &Value, options: &EncodeOptions) -> Result<String> {
    let mut writer = Writer::new(options);
    match value {
        Value::Map(map) => write_map_block(&mut writer, map, 0)?,
        Value::List(items) => write_root_list(&mut writer, items)?,
        scalar => {
            writer.begin_line(0);
            writer.scalar(scalar)?;
        }
    }
    Ok(writer.finish())
}

enum ListShape<'a> {
    /// Every element is a scalar (or the list is empty): `[]: a,b,c`.
    Inline,
    /// Uniform maps: header plus one delimited row per element.
    Tabular(TabularBlock<'a>),
    /// Anything else: one `- ` item line per element.
    Items,
}

fn classify(items: &[Value]) -> ListShape<'_> {
    if items.iter().all(Value::is_scalar) {
        return ListShape::Inline;
    }
    match detect_tabular(items) {
        Some(block) => ListShape::Tabular(block),
        None => ListShape::Items,
    }
}

fn check_depth(depth: usize) -> Result<()> {
    if depth >= MAX_DEPTH {
        return Err(Error::unsupported(format!(
            "nesting deeper than {MAX_DEPTH} levels"
        )));
    }
    Ok(())
}

fn write_root_list(writer: &mut Writer, items: &[Value]) -> Result<()> {
    match classify(items) {
        ListShape::Inline => {
            writer.begin_line(0);
            write_inline_list(writer, items)
        }
        ListShape::Tabular(block) => {
            writer.begin_line(0);
            write_tabular(writer, &block, 0)
        }
        ListShape::Items => write_list_items(writer, items, 0),
    }
}

fn write_map_block(writer: &mut Writer, map: &Map, depth: usize) -> Result<()> {
    check_depth(depth)?;
    for (key, value) in map {
        write_map_entry(writer, key, value, depth)?;
    }
    Ok(())
}

fn write_map_entry(writer: &mut Writer, key: &str, value: &Value, depth: usize) -> Result<()> {
    match value {
        Value::List(items) => write_keyed_list(writer, key, items, depth),
        Value::Map(nested) => {
            writer.begin_line(depth);
            writer.key(key);
            writer.raw_char(':');
            write_map_block(writer, nested, depth + 1)
        }
        scalar => {
            writer.begin_line(depth);
            writer.key(key);
            writer.raw(": ");
            writer.scalar(scalar)
        }
    }
}

fn write_keyed_list(writer: &mut Writer, key: &str, items: &[Value], depth: usize) -> Result<()> {
    check_depth(depth)?;
    writer.begin_line(depth);
    writer.key(key);
    match classify(items) {
        ListShape::Inline => write_inline_list(writer, items),
        ListShape::Tabular(block) => write_tabular(writer, &block, depth),
        ListShape::Items => {
            writer.raw_char(':');
            write_list_items(writer, items, depth + 1)
        }
    }
}

/// `[]: v1,v2,...` appended to the current line; `[]:` alone for the empty
/// list, so emptiness is never confused with an empty map.
fn write_inline_list(writer: &mut Writer, items: &[Value]) -> Result<()> {
    writer.raw("[]:");
    if items.is_empty() {
        return Ok(());
    }
    writer.raw_char(' ');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            writer.delimiter();
        }
        writer.scalar(item)?;
    }
    Ok(())
}

/// `[f1,f2]:` appended to the current line, then one row per element one
/// level below `depth` (the depth of the header line).
fn write_tabular(writer: &mut Writer, block: &TabularBlock<'_>, depth: usize) -> Result<()> {
    check_depth(depth + 1)?;
    writer.raw_char('[');
    for (i, field) in block.fields.iter().enumerate() {
        if i > 0 {
            writer.delimiter();
        }
        writer.key(field);
    }
    writer.raw("]:");
    for row in &block.rows {
        writer.begin_line(depth + 1);
        for (i, field) in block.fields.iter().enumerate() {
            if i > 0 {
                writer.delimiter();
            }
            match row.get(*field) {
                Some(cell) => writer.scalar(cell)?,
                // Unreachable for a detected block; keep rows total anyway.
                None => writer.raw("null"),
            }
        }
    }
    Ok(())
}

fn write_list_items(writer: &mut Writer, items: &[Value], depth: usize) -> Result<()> {
    check_depth(depth)?;
    for item in items {
        write_list_item(writer, item, depth)?;
    }
    Ok(())
}

fn write_list_item(writer: &mut Writer, item: &Value, depth: usize) -> Result<()> {
    writer.begin_line(depth);
    writer.raw_char('-');
    match item {
        Value::List(items) => match classify(items) {
            ListShape::Inline => {
                writer.raw_char(' ');
                write_inline_list(writer, items)
            }
            ListShape::Tabular(block) => {
                writer.raw_char(' ');
                write_tabular(writer, &block, depth)
            }
            ListShape::Items => write_list_items(writer, items, depth + 1),
        },
        Value::Map(map) => {
            let mut entries = map.iter();
            match entries.next() {
                // A bare marker decodes back to an empty map.
                None => Ok(()),
                Some((key, first)) if first.is_scalar() => {
                    writer.raw_char(' ');
                    writer.key(key);
                    writer.raw(": ");
                    writer.scalar(first)?;
                    for (key, value) in entries {
                        write_map_entry(writer, key, value, depth + 1)?;
                    }
                    Ok(())
                }
                // A container-valued first entry cannot share the marker
                // line; the whole map goes one level below instead.
                Some(_) => write_map_block(writer, map, depth + 1),
            }
        }
        scalar => {
            writer.raw_char(' ');
            writer.scalar(scalar)
        }
    }
}
