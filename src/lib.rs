//! Encoder and decoder for TOON, a token-efficient line-oriented notation
//! for JSON-like data. Lists of uniform objects collapse into a header row
//! plus delimited value rows; everything else nests by indentation alone.

mod constants;
pub mod decode;
pub mod encode;
pub mod error;
mod num;
pub mod options;
pub mod stats;
mod tabular;
mod text;
pub mod value;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use crate::decode::decode;
pub use crate::encode::encode;
pub use crate::error::{Error, Result};
pub use crate::options::{DecodeOptions, Delimiter, EncodeOptions, Indent};
pub use crate::stats::{approximate_tokens, convert_json, savings_percent, Conversion};
pub use crate::value::{from_json_text, to_json_text, Map, Number, Value};

pub fn to_string<T: Serialize>(value: &T) -> Result<String> {
    to_string_with_options(value, &EncodeOptions::default())
}

pub fn to_string_with_options<T: Serialize>(value: &T, options: &EncodeOptions) -> Result<String> {
    encode::to_string(value, options)
}

pub fn from_str<T: DeserializeOwned>(input: &str) -> Result<T> {
    from_str_with_options(input, &DecodeOptions::default())
}

pub fn from_str_with_options<T: DeserializeOwned>(
    input: &str,
    options: &DecodeOptions,
) -> Result<T> {
    decode::from_str(input, options)
}
