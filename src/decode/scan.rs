use memchr::memchr_iter;

use crate::error::{Error, Result};

/// One input line with its indentation resolved to a nesting level.
/// `number` is 1-based for diagnostics.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Line<'a> {
    pub number: usize,
    pub level: usize,
    pub content: &'a str,
    pub blank: bool,
}

/// Split the input into lines and turn leading spaces into levels. Tabs in
/// indentation and indents that are not a whole multiple of the unit are
/// rejected here; level jumps are the parser's concern because they need
/// the enclosing scope.
pub(crate) fn scan_lines(input: &str, indent_size: usize) -> Result<Vec<Line<'_>>> {
    if indent_size == 0 {
        return Err(Error::decode(1, "indent size must be greater than zero"));
    }
    let bytes = input.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    for idx in memchr_iter(b'\n', bytes) {
        lines.push(build_line(input, lines.len() + 1, start, idx, indent_size)?);
        start = idx + 1;
    }
    if start < bytes.len() {
        lines.push(build_line(
            input,
            lines.len() + 1,
            start,
            bytes.len(),
            indent_size,
        )?);
    }
    Ok(lines)
}

fn build_line<'a>(
    input: &'a str,
    number: usize,
    start: usize,
    mut end: usize,
    indent_size: usize,
) -> Result<Line<'a>> {
    let bytes = input.as_bytes();
    if end > start && bytes[end - 1] == b'\r' {
        end -= 1;
    }
    let raw = &input[start..end];

    if raw.bytes().all(|b| b == b' ' || b == b'\t') {
        return Ok(Line {
            number,
            level: 0,
            content: "",
            blank: true,
        });
    }

    let mut indent = 0;
    for byte in raw.bytes() {
        match byte {
            b' ' => indent += 1,
            b'\t' => return Err(Error::decode(number, "tabs are not allowed in indentation")),
            _ => break,
        }
    }
    if indent % indent_size != 0 {
        return Err(Error::decode(
            number,
            format!("indentation of {indent} spaces is not a multiple of {indent_size}"),
        ));
    }

    Ok(Line {
        number,
        level: indent / indent_size,
        content: &raw[indent..],
        blank: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[rstest::rstest]
    fn test_levels_and_numbers() {
        let lines = scan_lines("a: 1\n  b: 2\n    c: 3", 2).unwrap();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines
                .iter()
                .map(|line| (line.number, line.level, line.content))
                .collect::<Vec<_>>(),
            vec![(1, 0, "a: 1"), (2, 1, "b: 2"), (3, 2, "c: 3")]
        );
    }

    #[rstest::rstest]
    fn test_blank_and_crlf_lines() {
        let lines = scan_lines("a: 1\r\n\r\n  b: 2\r\n", 2).unwrap();
        assert_eq!(lines.len(), 3);
        assert!(!lines[0].blank);
        assert!(lines[1].blank);
        assert_eq!(lines[2].content, "b: 2");
    }

    #[rstest::rstest]
    fn test_rejects_tabs_in_indentation() {
        let err = scan_lines("a:\n\tb: 1", 2).unwrap_err();
        assert_eq!(err.line(), Some(2));
    }

    #[rstest::rstest]
    fn test_rejects_uneven_indent() {
        let err = scan_lines("a:\n   b: 1", 2).unwrap_err();
        match err {
            Error::Decode { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("not a multiple"));
            }
            other => panic!("expected Decode error, got {other:?}"),
        }
    }

    #[rstest::rstest]
    fn test_respects_indent_size() {
        let lines = scan_lines("a:\n    b: 1", 4).unwrap();
        assert_eq!(lines[1].level, 1);
    }

    #[rstest::rstest]
    fn test_empty_input() {
        assert!(scan_lines("", 2).unwrap().is_empty());
    }
}
