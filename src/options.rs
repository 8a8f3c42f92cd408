use crate::constants::DEFAULT_INDENT;

/// Cell separator used by inline lists and tabular rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
}

impl Delimiter {
    pub fn as_char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indent {
    Spaces(usize),
}

impl Indent {
    pub fn spaces(count: usize) -> Self {
        Indent::Spaces(count)
    }

    pub fn get(self) -> usize {
        let Indent::Spaces(count) = self;
        count
    }
}

impl Default for Indent {
    fn default() -> Self {
        Indent::Spaces(DEFAULT_INDENT)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeOptions {
    pub indent: Indent,
    pub delimiter: Delimiter,
}

impl EncodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// The wire form carries no delimiter marker, so a document written with a
/// non-default delimiter must be decoded with the same one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    pub indent: Indent,
    pub delimiter: Delimiter,
}

impl DecodeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent(mut self, indent: Indent) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_defaults() {
        let encode = EncodeOptions::default();
        assert_eq!(encode.indent, Indent::Spaces(2));
        assert_eq!(encode.delimiter, Delimiter::Comma);

        let decode = DecodeOptions::default();
        assert_eq!(decode.indent, Indent::Spaces(2));
        assert_eq!(decode.delimiter, Delimiter::Comma);
    }

    #[rstest::rstest]
    fn test_builders() {
        let options = EncodeOptions::new()
            .with_indent(Indent::spaces(4))
            .with_delimiter(Delimiter::Pipe);
        assert_eq!(options.indent.get(), 4);
        assert_eq!(options.delimiter.as_char(), '|');
    }
}
