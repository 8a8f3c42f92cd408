//! Decoding: line-oriented recursive descent keyed on indentation depth.
//!
//! The scanner resolves leading spaces to nesting levels; the parser then
//! reads a contiguous run of lines at one level as the children of the
//! enclosing node. The shape of a line decides the node kind: `key:` opens a
//! map entry, `key[]:` an inline list, `key[f1,f2]:` a tabular block, `-` a
//! list item. Any malformation aborts the whole decode with the offending
//! line number.

mod scan;

use serde::de::DeserializeOwned;
use smallvec::SmallVec;

use crate::constants::{is_structural_char, MAX_DEPTH};
use crate::error::{Error, Result};
use crate::num::parse_number_token;
use crate::options::DecodeOptions;
use crate::value::{Map, Value};
use scan::{scan_lines, Line};

type CellBuf<'a> = SmallVec<[&'a str; 16]>;

/// Decode TOON text into a value. Fails with [`Error::Decode`] on the first
/// malformed line; there is no partial result.
pub fn decode(input: &str, options: &DecodeOptions) -> Result<Value> {
    let lines = scan_lines(input, options.indent.get())?;
    let mut parser = Parser {
        lines: &lines,
        idx: 0,
        delimiter: options.delimiter.as_char(),
    };
    parser.parse_document()
}

/// Decode into any `Deserialize` type through the value model.
pub fn from_str<T: DeserializeOwned>(input: &str, options: &DecodeOptions) -> Result<T> {
    let value = decode(input, options)?;
    serde_json::from_value(serde_json::Value::from(value))
        .map_err(|err| Error::unsupported(format!("deserialize failed: {err}")))
}

/// How a single line reads, before structure is applied.
enum LineForm<'a> {
    /// A lone scalar token (root values, `- ` items).
    Scalar(&'a str),
    /// `key:` or `key: scalar`; an empty `rest` means the value is a
    /// container on the following deeper lines (or an empty map).
    Entry { key: String, rest: &'a str },
    /// `key[]:` or `[]:` with the cells on the same line.
    InlineList { key: Option<String>, cells: &'a str },
    /// `key[f1,f2]:` or `[f1,f2]:`; rows follow one level deeper.
    TableHeader {
        key: Option<String>,
        fields: Vec<String>,
    },
}

struct Parser<'a, 'b> {
    lines: &'b [Line<'a>],
    idx: usize,
    delimiter: char,
}

impl<'a> Parser<'a, '_> {
    fn parse_document(&mut self) -> Result<Value> {
        let Some(first) = self.peek() else {
            return Ok(Value::Map(Map::new()));
        };
        if first.level != 0 {
            return Err(Error::decode(first.number, "unexpected indentation"));
        }
        if is_list_item(first.content) {
            let items = self.parse_list_items(0)?;
            self.ensure_end()?;
            return Ok(Value::List(items));
        }
        let value = match classify(first.content, first.number, self.delimiter)? {
            LineForm::Scalar(token) => {
                self.advance();
                let value = parse_scalar(token.trim(), first.number)?;
                self.ensure_end()?;
                value
            }
            LineForm::InlineList { key: None, cells } => {
                self.advance();
                let value = self.parse_inline_cells(cells, first.number)?;
                self.ensure_end()?;
                value
            }
            LineForm::TableHeader { key: None, fields } => {
                self.advance();
                let value = self.parse_rows(&fields, 1, first.number)?;
                self.ensure_end()?;
                value
            }
            _ => {
                let mut map = Map::new();
                self.parse_map_entries(&mut map, 0)?;
                Value::Map(map)
            }
        };
        Ok(value)
    }

    /// Skip blank lines and return the next meaningful one without
    /// consuming it.
    fn peek(&mut self) -> Option<Line<'a>> {
        while let Some(line) = self.lines.get(self.idx) {
            if line.blank {
                self.idx += 1;
                continue;
            }
            return Some(*line);
        }
        None
    }

    fn advance(&mut self) {
        self.idx += 1;
    }

    fn ensure_end(&mut self) -> Result<()> {
        match self.peek() {
            Some(line) => Err(Error::decode(line.number, "unexpected trailing content")),
            None => Ok(()),
        }
    }

    fn check_depth(&self, level: usize) -> Result<()> {
        if level >= MAX_DEPTH {
            let number = self.lines.get(self.idx).map_or(0, |line| line.number);
            return Err(Error::decode(
                number,
                format!("nesting deeper than {MAX_DEPTH} levels"),
            ));
        }
        Ok(())
    }

    /// Consume map entries at exactly `level`, inserting into `map`. Stops
    /// at a dedent; a line deeper than `level` is a structural error.
    fn parse_map_entries(&mut self, map: &mut Map, level: usize) -> Result<()> {
        self.check_depth(level)?;
        while let Some(line) = self.peek() {
            if line.level < level {
                break;
            }
            if line.level > level {
                return Err(Error::decode(line.number, "unexpected indentation"));
            }
            let (key, value) = self.parse_map_entry(line, level)?;
            if map.insert(key.clone(), value).is_some() {
                return Err(Error::decode(line.number, format!("duplicate key {key:?}")));
            }
        }
        Ok(())
    }

    fn parse_map_entry(&mut self, line: Line<'a>, level: usize) -> Result<(String, Value)> {
        match classify(line.content, line.number, self.delimiter)? {
            LineForm::Entry { key, rest } => {
                self.advance();
                let rest = rest.trim();
                if rest.is_empty() {
                    Ok((key, self.parse_container(level)?))
                } else {
                    Ok((key, parse_scalar(rest, line.number)?))
                }
            }
            LineForm::InlineList {
                key: Some(key),
                cells,
            } => {
                self.advance();
                let value = self.parse_inline_cells(cells, line.number)?;
                Ok((key, value))
            }
            LineForm::TableHeader {
                key: Some(key),
                fields,
            } => {
                self.advance();
                let value = self.parse_rows(&fields, level + 1, line.number)?;
                Ok((key, value))
            }
            LineForm::Scalar(_)
            | LineForm::InlineList { key: None, .. }
            | LineForm::TableHeader { key: None, .. } => {
                Err(Error::decode(line.number, "expected a key"))
            }
        }
    }

    /// Value of a `key:` entry: the deeper lines that follow, or an empty
    /// map when there are none.
    fn parse_container(&mut self, level: usize) -> Result<Value> {
        match self.peek() {
            Some(child) if child.level > level => {
                if is_list_item(child.content) {
                    Ok(Value::List(self.parse_list_items(level + 1)?))
                } else {
                    let mut map = Map::new();
                    self.parse_map_entries(&mut map, level + 1)?;
                    Ok(Value::Map(map))
                }
            }
            _ => Ok(Value::Map(Map::new())),
        }
    }

    fn parse_list_items(&mut self, level: usize) -> Result<Vec<Value>> {
        self.check_depth(level)?;
        let mut items = Vec::new();
        while let Some(line) = self.peek() {
            if line.level < level {
                break;
            }
            if line.level > level {
                return Err(Error::decode(line.number, "unexpected indentation"));
            }
            if !is_list_item(line.content) {
                return Err(Error::decode(line.number, "expected a '-' list item"));
            }
            items.push(self.parse_list_item(line, level)?);
        }
        Ok(items)
    }

    fn parse_list_item(&mut self, line: Line<'a>, level: usize) -> Result<Value> {
        self.advance();
        if line.content == "-" {
            // Bare marker: the item's content sits one level below, or the
            // item is an empty map.
            return match self.peek() {
                Some(child) if child.level > level => {
                    if is_list_item(child.content) {
                        Ok(Value::List(self.parse_list_items(level + 1)?))
                    } else {
                        let mut map = Map::new();
                        self.parse_map_entries(&mut map, level + 1)?;
                        Ok(Value::Map(map))
                    }
                }
                _ => Ok(Value::Map(Map::new())),
            };
        }
        let rest = &line.content[2..];
        match classify(rest, line.number, self.delimiter)? {
            LineForm::Scalar(token) => parse_scalar(token.trim(), line.number),
            LineForm::InlineList { key: None, cells } => {
                self.parse_inline_cells(cells, line.number)
            }
            LineForm::TableHeader { key: None, fields } => {
                self.parse_rows(&fields, level + 1, line.number)
            }
            LineForm::Entry { key, rest } => {
                let rest = rest.trim();
                if rest.is_empty() {
                    return Err(Error::decode(
                        line.number,
                        "missing value after ':' on a list item line",
                    ));
                }
                let mut map = Map::new();
                map.insert(key, parse_scalar(rest, line.number)?);
                self.parse_map_entries(&mut map, level + 1)?;
                Ok(Value::Map(map))
            }
            LineForm::InlineList {
                key: Some(key),
                cells,
            } => {
                let value = self.parse_inline_cells(cells, line.number)?;
                let mut map = Map::new();
                map.insert(key, value);
                self.parse_map_entries(&mut map, level + 1)?;
                Ok(Value::Map(map))
            }
            LineForm::TableHeader { key: Some(_), .. } => Err(Error::decode(
                line.number,
                "tabular block cannot share a list item line",
            )),
        }
    }

    fn parse_rows(&mut self, fields: &[String], level: usize, header_line: usize) -> Result<Value> {
        self.check_depth(level)?;
        for (idx, field) in fields.iter().enumerate() {
            if fields[..idx].contains(field) {
                return Err(Error::decode(
                    header_line,
                    format!("duplicate field {field:?} in tabular header"),
                ));
            }
        }
        let mut rows = Vec::new();
        while let Some(line) = self.peek() {
            if line.level < level {
                break;
            }
            if line.level > level {
                return Err(Error::decode(line.number, "unexpected indentation"));
            }
            self.advance();
            let cells = split_delimited(line.content, self.delimiter, line.number)?;
            if cells.len() != fields.len() {
                return Err(Error::decode(
                    line.number,
                    format!(
                        "tabular row has {} cells, header has {} fields",
                        cells.len(),
                        fields.len()
                    ),
                ));
            }
            let mut row = Map::with_capacity(fields.len());
            for (field, cell) in fields.iter().zip(cells) {
                row.insert(field.clone(), parse_scalar(cell.trim(), line.number)?);
            }
            rows.push(Value::Map(row));
        }
        if rows.is_empty() {
            return Err(Error::decode(header_line, "tabular header has no rows"));
        }
        Ok(Value::List(rows))
    }

    fn parse_inline_cells(&self, cells: &str, number: usize) -> Result<Value> {
        let cells = cells.trim();
        if cells.is_empty() {
            return Ok(Value::List(Vec::new()));
        }
        let mut items = Vec::new();
        for cell in split_delimited(cells, self.delimiter, number)? {
            items.push(parse_scalar(cell.trim(), number)?);
        }
        Ok(Value::List(items))
    }
}

/// Only `-` alone or `- ` can open a list item; a longer `-`-prefixed token
/// is a scalar (a negative number).
fn is_list_item(content: &str) -> bool {
    content == "-" || content.starts_with("- ")
}

fn classify<'a>(content: &'a str, number: usize, delimiter: char) -> Result<LineForm<'a>> {
    if content.starts_with('"') {
        let (key, rest) = parse_quoted(content, number)?;
        if rest.is_empty() {
            return Ok(LineForm::Scalar(content));
        }
        if let Some(rest) = rest.strip_prefix(':') {
            return Ok(LineForm::Entry { key, rest });
        }
        if rest.starts_with('[') {
            return classify_bracket(Some(key), rest, number, delimiter);
        }
        return Err(Error::decode(
            number,
            "unexpected content after closing quote",
        ));
    }
    for (idx, ch) in content.char_indices() {
        match ch {
            ':' => {
                let key = content[..idx].trim();
                if key.is_empty() {
                    return Err(Error::decode(number, "expected a key before ':'"));
                }
                return Ok(LineForm::Entry {
                    key: key.to_string(),
                    rest: &content[idx + 1..],
                });
            }
            '[' => {
                let key = content[..idx].trim();
                let key = (!key.is_empty()).then(|| key.to_string());
                return classify_bracket(key, &content[idx..], number, delimiter);
            }
            ']' => return Err(Error::decode(number, "']' without a matching '['")),
            _ => {}
        }
    }
    Ok(LineForm::Scalar(content))
}

fn classify_bracket<'a>(
    key: Option<String>,
    s: &'a str,
    number: usize,
    delimiter: char,
) -> Result<LineForm<'a>> {
    let inner = &s[1..];
    if let Some(rest) = inner.strip_prefix(']') {
        let cells = rest
            .strip_prefix(':')
            .ok_or_else(|| Error::decode(number, "expected ':' after '[]'"))?;
        return Ok(LineForm::InlineList { key, cells });
    }
    let (fields_raw, rest) = split_at_closing_bracket(inner, number)?;
    let rest = rest
        .strip_prefix(':')
        .ok_or_else(|| Error::decode(number, "expected ':' after tabular header"))?;
    if !rest.trim().is_empty() {
        return Err(Error::decode(
            number,
            "unexpected content after tabular header",
        ));
    }
    let mut fields = Vec::new();
    for token in split_delimited(fields_raw, delimiter, number)? {
        fields.push(parse_key_token(token.trim(), number)?);
    }
    Ok(LineForm::TableHeader { key, fields })
}

/// Find the `]` that closes a tabular header, skipping quoted field names.
fn split_at_closing_bracket(s: &str, line: usize) -> Result<(&str, &str)> {
    let bytes = s.as_bytes();
    let mut in_quotes = false;
    let mut idx = 0;
    while idx < bytes.len() {
        match bytes[idx] {
            b'"' => in_quotes = !in_quotes,
            b'\\' if in_quotes => idx += 1,
            b']' if !in_quotes => return Ok((&s[..idx], &s[idx + 1..])),
            _ => {}
        }
        idx += 1;
    }
    Err(Error::decode(line, "'[' without a matching ']'"))
}

/// Split delimiter-separated cells, leaving quoted cells intact.
fn split_delimited<'a>(s: &'a str, delimiter: char, line: usize) -> Result<CellBuf<'a>> {
    let mut cells = CellBuf::new();
    let mut start = 0;
    let mut in_quotes = false;
    let mut iter = s.char_indices();
    while let Some((idx, ch)) = iter.next() {
        if in_quotes {
            match ch {
                '"' => in_quotes = false,
                '\\' => {
                    iter.next();
                }
                _ => {}
            }
        } else if ch == '"' {
            in_quotes = true;
        } else if ch == delimiter {
            cells.push(&s[start..idx]);
            start = idx + ch.len_utf8();
        }
    }
    if in_quotes {
        return Err(Error::decode(line, "unterminated quoted string"));
    }
    cells.push(&s[start..]);
    Ok(cells)
}

fn parse_key_token(token: &str, line: usize) -> Result<String> {
    if token.starts_with('"') {
        let (key, rest) = parse_quoted(token, line)?;
        if !rest.is_empty() {
            return Err(Error::decode(line, "unexpected content after closing quote"));
        }
        return Ok(key);
    }
    if token.is_empty() {
        return Err(Error::decode(line, "empty field name"));
    }
    Ok(token.to_string())
}

fn parse_scalar(token: &str, line: usize) -> Result<Value> {
    if token.is_empty() {
        return Err(Error::decode(line, "empty value"));
    }
    if token.starts_with('"') {
        let (text, rest) = parse_quoted(token, line)?;
        if !rest.is_empty() {
            return Err(Error::decode(line, "unexpected content after closing quote"));
        }
        return Ok(Value::String(text));
    }
    if token.chars().any(|ch| is_structural_char(ch) || ch == '"') {
        return Err(Error::decode(line, format!("value {token:?} must be quoted")));
    }
    Ok(match token {
        "null" => Value::Null,
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        _ => match parse_number_token(token) {
            Some(number) => Value::Number(number),
            None => Value::String(token.to_string()),
        },
    })
}

/// Read a quoted string starting at the opening `"`, returning the text and
/// whatever follows the closing quote.
fn parse_quoted(s: &str, line: usize) -> Result<(String, &str)> {
    let mut out = String::new();
    let mut chars = s.char_indices().skip(1);
    while let Some((idx, ch)) = chars.next() {
        match ch {
            '"' => return Ok((out, &s[idx + 1..])),
            '\\' => match chars.next() {
                Some((_, 'n')) => out.push('\n'),
                Some((_, 'r')) => out.push('\r'),
                Some((_, 't')) => out.push('\t'),
                Some((_, '"')) => out.push('"'),
                Some((_, '\\')) => out.push('\\'),
                Some((_, other)) => {
                    return Err(Error::decode(
                        line,
                        format!("invalid escape sequence \\{other}"),
                    ));
                }
                None => return Err(Error::decode(line, "unterminated quoted string")),
            },
            other => out.push(other),
        }
    }
    Err(Error::decode(line, "unterminated quoted string"))
}
