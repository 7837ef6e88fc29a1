//! Line splitting and per-line tokenization
//!
//! A line has the shape `<level> <id-or-tag> [<tag>] [<value...>]`. Tokens are
//! separated by any run of whitespace.

use crate::diagnostic::{Diagnostic, DiagnosticKind};

const BOM: char = '\u{feff}';

/// Iterator over `(line_number, line)` pairs
///
/// Accepts `\n`, `\r\n` and lone `\r` terminators. A terminator at the very
/// end of the input does not yield a trailing empty line.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    rest: &'a str,
    number: usize,
}

/// Split decoded text into numbered lines, dropping a leading BOM
pub fn split_lines(text: &str) -> Lines<'_> {
    Lines {
        rest: text.strip_prefix(BOM).unwrap_or(text),
        number: 0,
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = (usize, &'a str);

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }
        self.number += 1;

        let (line, rest) = match self.rest.find(|c| c == '\r' || c == '\n') {
            Some(pos) => {
                let after = &self.rest[pos + 1..];
                let after = if self.rest.as_bytes()[pos] == b'\r' {
                    after.strip_prefix('\n').unwrap_or(after)
                } else {
                    after
                };
                (&self.rest[..pos], after)
            }
            None => (self.rest, ""),
        };
        self.rest = rest;
        Some((self.number, line))
    }
}

/// A tokenized line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GedcomLine<'a> {
    /// 1-based line number
    pub number: usize,
    /// Nesting depth
    pub level: u32,
    /// Everything after the level token; never empty
    tokens: Vec<&'a str>,
}

impl<'a> GedcomLine<'a> {
    /// Cross-reference id on a record header, otherwise the tag
    pub fn id_or_tag(&self) -> &'a str {
        self.tokens[0]
    }

    /// Token after [`Self::id_or_tag`]: the record marker on a level-0 header
    pub fn second(&self) -> Option<&'a str> {
        self.tokens.get(1).copied()
    }

    /// Tokens following the tag
    pub fn value_tokens(&self) -> &[&'a str] {
        &self.tokens[1..]
    }

    /// Tokens following the tag, joined by single spaces
    pub fn value(&self) -> String {
        self.value_tokens().join(" ")
    }
}

/// Remove the `@` wrapper from a cross-reference such as `@I1@`
pub fn strip_xref(token: &str) -> &str {
    token.trim_matches('@')
}

/// Tokenize one line, or explain why it must be skipped
pub fn tokenize_line(number: usize, raw: &str) -> Result<GedcomLine<'_>, Diagnostic> {
    let mut parts = raw.split_whitespace();
    let (Some(level), Some(first)) = (parts.next(), parts.next()) else {
        return Err(Diagnostic::new(number, DiagnosticKind::TooFewTokens, raw.trim()));
    };
    let level = level
        .parse::<u32>()
        .map_err(|_| Diagnostic::new(number, DiagnosticKind::InvalidLevel, raw.trim()))?;

    let mut tokens = vec![first];
    tokens.extend(parts);
    Ok(GedcomLine {
        number,
        level,
        tokens,
    })
}
