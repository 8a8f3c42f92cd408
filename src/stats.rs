//! Token estimation and the JSON-to-TOON conversion report.
//!
//! The estimator divides text length by four, the usual rule of thumb for
//! English-heavy LLM input. It is an approximation for display purposes, not
//! a tokenizer, and is no part of the encoding contract.

use crate::encode;
use crate::error::Result;
use crate::options::EncodeOptions;
use crate::value::from_json_text;

/// Rough token count: `ceil(len / 4)`.
pub fn approximate_tokens(text: &str) -> usize {
    text.len().div_ceil(4)
}

/// Rounded percentage of tokens saved going from `input_tokens` to
/// `output_tokens`; 0 when the input is empty, negative when the output
/// grew.
pub fn savings_percent(input_tokens: usize, output_tokens: usize) -> i64 {
    if input_tokens == 0 {
        return 0;
    }
    let saved = input_tokens as f64 - output_tokens as f64;
    (saved / input_tokens as f64 * 100.0).round() as i64
}

/// Outcome of one JSON-to-TOON conversion, with token estimates for both
/// sides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub output: String,
    pub input_tokens: usize,
    pub output_tokens: usize,
}

impl Conversion {
    pub fn savings_percent(&self) -> i64 {
        savings_percent(self.input_tokens, self.output_tokens)
    }
}

/// Parse JSON text and encode it as TOON, reporting token estimates for the
/// raw input and the produced output.
pub fn convert_json(input: &str, options: &EncodeOptions) -> Result<Conversion> {
    let value = from_json_text(input)?;
    let output = encode::encode(&value, options)?;
    Ok(Conversion {
        input_tokens: approximate_tokens(input),
        output_tokens: approximate_tokens(&output),
        output,
    })
}
