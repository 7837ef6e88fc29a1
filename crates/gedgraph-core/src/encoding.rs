//! Encoding detection and candidate-ordered decoding
//!
//! Input files arrive as raw bytes in whatever encoding the exporting program
//! chose. Detection proposes a best guess, then the fallback list is tried in
//! order until one candidate decodes the whole buffer without a malformed
//! sequence.

use crate::config::ParserConfig;
use crate::error::{Error, Result};
use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use std::borrow::Cow;

/// Labels that select true ISO-8859-1 rather than the WHATWG windows-1252 alias
const LATIN1_LABELS: &[&str] = &["latin-1", "latin1", "iso-8859-1", "iso8859-1", "l1"];

/// A text encoding candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// ISO-8859-1: every byte maps to the code point of the same value
    Latin1,
    /// Any encoding known to `encoding_rs`
    Whatwg(&'static Encoding),
}

impl TextEncoding {
    pub fn utf_8() -> Self {
        Self::Whatwg(encoding_rs::UTF_8)
    }

    pub fn windows_1252() -> Self {
        Self::Whatwg(encoding_rs::WINDOWS_1252)
    }

    /// Resolve a user-facing label such as `utf-8` or `latin-1`
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_lowercase();
        if LATIN1_LABELS.contains(&label.as_str()) {
            return Some(Self::Latin1);
        }
        Encoding::for_label(label.as_bytes()).map(Self::Whatwg)
    }

    /// Canonical name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Latin1 => "ISO-8859-1",
            Self::Whatwg(encoding) => encoding.name(),
        }
    }

    /// Decode the entire buffer, or `None` on the first malformed sequence
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
        match self {
            Self::Latin1 => Some(encoding_rs::mem::decode_latin1(bytes)),
            Self::Whatwg(encoding) => {
                encoding.decode_without_bom_handling_and_without_replacement(bytes)
            }
        }
    }
}

impl std::fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Best-guess encoding for a byte buffer
///
/// A byte-order mark is authoritative. Otherwise the guess comes from
/// statistical sniffing, with UTF-8 allowed as an answer.
pub fn detect(bytes: &[u8]) -> TextEncoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return TextEncoding::Whatwg(encoding);
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    TextEncoding::Whatwg(detector.guess(None, true))
}

/// Ordered, de-duplicated candidate list: detected encoding first, then the
/// configured fallbacks
pub fn candidates(bytes: &[u8], config: &ParserConfig) -> Result<Vec<TextEncoding>> {
    let mut list = Vec::with_capacity(config.fallback_encodings.len() + 1);
    if config.detect_encoding {
        list.push(detect(bytes));
    }
    for label in &config.fallback_encodings {
        let encoding = TextEncoding::from_label(label)
            .ok_or_else(|| Error::UnknownEncoding(label.clone()))?;
        if !list.contains(&encoding) {
            list.push(encoding);
        }
    }
    Ok(list)
}

/// Decode with the first candidate that accepts the whole buffer
pub fn decode_with_fallback<'a>(
    bytes: &'a [u8],
    candidates: &[TextEncoding],
) -> Result<(Cow<'a, str>, TextEncoding)> {
    for candidate in candidates {
        tracing::debug!("Attempting to decode input as {}", candidate);
        match candidate.decode(bytes) {
            Some(text) => {
                tracing::info!("Decoded input as {}", candidate);
                return Ok((text, *candidate));
            }
            None => tracing::debug!("Failed to decode input as {}", candidate),
        }
    }
    Err(Error::Decode {
        tried: candidates.iter().map(|c| c.name().to_string()).collect(),
    })
}
