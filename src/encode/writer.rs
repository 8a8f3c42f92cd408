use crate::error::{Error, Result};
use crate::num::write_number_into;
use crate::options::EncodeOptions;
use crate::text::{escape_into, is_bare_key, needs_quoting};
use crate::value::Value;

pub(crate) struct Writer {
    buffer: String,
    delimiter: char,
    indent_unit: String,
}

impl Writer {
    pub fn new(options: &EncodeOptions) -> Self {
        Self {
            buffer: String::new(),
            delimiter: options.delimiter.as_char(),
            indent_unit: " ".repeat(options.indent.get()),
        }
    }

    pub fn finish(self) -> String {
        self.buffer
    }

    pub fn raw(&mut self, s: &str) {
        self.buffer.push_str(s);
    }

    pub fn raw_char(&mut self, ch: char) {
        self.buffer.push(ch);
    }

    /// Start a fresh line at `depth`. The very first line of the document
    /// gets no leading newline, so the output never ends with one either.
    pub fn begin_line(&mut self, depth: usize) {
        if !self.buffer.is_empty() {
            self.buffer.push('\n');
        }
        for _ in 0..depth {
            self.buffer.push_str(&self.indent_unit);
        }
    }

    pub fn delimiter(&mut self) {
        self.buffer.push(self.delimiter);
    }

    pub fn key(&mut self, key: &str) {
        if is_bare_key(key) {
            self.buffer.push_str(key);
        } else {
            self.quoted(key);
        }
    }

    pub fn quoted(&mut self, s: &str) {
        self.buffer.push('"');
        escape_into(&mut self.buffer, s);
        self.buffer.push('"');
    }

    pub fn scalar(&mut self, value: &Value) -> Result<()> {
        match value {
            Value::Null => self.raw("null"),
            Value::Bool(true) => self.raw("true"),
            Value::Bool(false) => self.raw("false"),
            Value::Number(n) => {
                if !n.is_finite() {
                    return Err(Error::unsupported("number is not finite"));
                }
                write_number_into(n, &mut self.buffer);
            }
            Value::String(s) => {
                if needs_quoting(s, self.delimiter) {
                    self.quoted(s);
                } else {
                    self.raw(s);
                }
            }
            Value::List(_) | Value::Map(_) => {
                return Err(Error::unsupported(format!(
                    "expected a scalar, found a {}",
                    value.type_name()
                )));
            }
        }
        Ok(())
    }
}
