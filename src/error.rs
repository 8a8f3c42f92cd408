use thiserror::Error;

/// Errors produced by the conversion core.
///
/// Every variant is terminal for the call that produced it: there is no
/// partial result and no side effect to undo.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The JSON bridge was handed text that is not well-formed JSON.
    #[error("invalid JSON at line {line}, column {column}: {message}")]
    Parse {
        line: usize,
        column: usize,
        message: String,
    },

    /// The value cannot be written as TOON (non-finite number, nesting
    /// beyond the depth cap, or a value serde could not represent).
    #[error("unsupported value: {0}")]
    UnsupportedValue(String),

    /// The TOON text is malformed. `line` is 1-based and points at the
    /// offending input line.
    #[error("line {line}: {reason}")]
    Decode { line: usize, reason: String },
}

impl Error {
    pub(crate) fn decode(line: usize, reason: impl Into<String>) -> Self {
        Error::Decode {
            line,
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(message: impl Into<String>) -> Self {
        Error::UnsupportedValue(message.into())
    }

    /// The input line the error points at, when the error carries one.
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Parse { line, .. } | Error::Decode { line, .. } => Some(*line),
            Error::UnsupportedValue(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
