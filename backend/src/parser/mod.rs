//! Byte-level CSV machinery: encoding resolution, row splitting and
//! quote-aware field parsing. No catalog-specific logic here.
//!
//! The government CSV exports arrive in either UTF-8 or legacy EUC-KR.
//! Rather than trusting metadata, [`resolve_encoding`] decodes as UTF-8
//! first and falls back to EUC-KR when the result contains the Unicode
//! replacement character. This is a heuristic, not a guarantee: EUC-KR
//! output is never itself validated.

use std::borrow::Cow;

// =============================================================================
// Encoding Resolver
// =============================================================================

/// Outcome of decoding a raw byte buffer.
#[derive(Debug, Clone)]
pub struct Decoded {
    /// The decoded text.
    pub text: String,
    /// Encoding actually used: `utf-8` or `euc-kr`.
    pub encoding: String,
    /// True when UTF-8 decoding failed and EUC-KR was used instead.
    pub fell_back: bool,
    /// What chardet guessed the charset to be. Diagnostic only.
    pub detected: String,
}

/// Guess the charset of raw bytes. Used for diagnostics when falling back.
pub fn detect_charset(bytes: &[u8]) -> String {
    chardet::detect(bytes).0
}

/// Decode a raw buffer, preferring UTF-8.
///
/// Contract: if lossy UTF-8 decoding produces the replacement character
/// (U+FFFD) anywhere, the UTF-8 text is discarded and the buffer is
/// re-decoded as EUC-KR.
pub fn resolve_encoding(bytes: &[u8]) -> Decoded {
    let utf8 = String::from_utf8_lossy(bytes);

    if utf8.contains('\u{FFFD}') {
        let detected = detect_charset(bytes);
        let (text, _, _) = encoding_rs::EUC_KR.decode(bytes);
        Decoded {
            text: text.into_owned(),
            encoding: "euc-kr".to_string(),
            fell_back: true,
            detected,
        }
    } else {
        let text = match utf8 {
            Cow::Borrowed(s) => s.to_string(),
            Cow::Owned(s) => s,
        };
        Decoded {
            text,
            encoding: "utf-8".to_string(),
            fell_back: false,
            detected: "utf-8".to_string(),
        }
    }
}

// =============================================================================
// Row Splitter
// =============================================================================

/// Split decoded text into non-empty logical rows.
///
/// Rows are physical lines: a quoted field containing a literal newline is
/// not supported, each line parses independently.
pub fn split_rows(text: &str) -> Vec<&str> {
    text.split('\n')
        .filter(|row| !row.trim().is_empty())
        .collect()
}

// =============================================================================
// Field Parser
// =============================================================================

/// Tokenize one CSV line into field values.
///
/// Scans character by character with an in-quotes flag: `"` toggles the
/// flag, `,` delimits only outside quotes, everything accumulates. The last
/// field is always emitted. Each field is trimmed, one wrapping quote pair
/// is removed, and doubled-quote escapes collapse to a single quote.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            ',' if !in_quotes => {
                fields.push(clean_field(&current));
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    fields.push(clean_field(&current));

    fields
}

/// Trim, strip one wrapping quote pair, collapse `""` to `"`.
fn clean_field(raw: &str) -> String {
    let trimmed = raw.trim();
    let unwrapped = trimmed.strip_prefix('"').unwrap_or(trimmed);
    let unwrapped = unwrapped.strip_suffix('"').unwrap_or(unwrapped);
    unwrapped.replace("\"\"", "\"")
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_fields() {
        let fields = parse_line("a,b,c");
        assert_eq!(fields, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_fields_are_trimmed() {
        let fields = parse_line("  a , b ,c  ");
        assert_eq!(fields, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_quoted_field_with_embedded_comma() {
        let fields = parse_line(r#""Seoul, Gangnam",02-123"#);
        assert_eq!(fields, vec!["Seoul, Gangnam", "02-123"]);
    }

    #[test]
    fn test_doubled_quote_escape() {
        let fields = parse_line(r#""Say ""hi""",x"#);
        assert_eq!(fields, vec![r#"Say "hi""#, "x"]);
    }

    #[test]
    fn test_trailing_empty_field_emitted() {
        let fields = parse_line("a,b,");
        assert_eq!(fields, vec!["a", "b", ""]);
    }

    #[test]
    fn test_single_field_line() {
        assert_eq!(parse_line("only"), vec!["only"]);
    }

    #[test]
    fn test_split_rows_drops_blank_lines() {
        let rows = split_rows("a,b\n\n  \nc,d\n");
        assert_eq!(rows, vec!["a,b", "c,d"]);
    }

    #[test]
    fn test_crlf_rows_parse_clean() {
        let rows = split_rows("a,b\r\nc,d\r\n");
        assert_eq!(rows.len(), 2);
        // The \r survives the split but dies in field trimming.
        assert_eq!(parse_line(rows[0]), vec!["a", "b"]);
    }

    #[test]
    fn test_utf8_passthrough() {
        let decoded = resolve_encoding("업체명,주소".as_bytes());
        assert_eq!(decoded.encoding, "utf-8");
        assert!(!decoded.fell_back);
        assert_eq!(decoded.text, "업체명,주소");
    }

    #[test]
    fn test_euc_kr_fallback() {
        // "가" in EUC-KR; invalid as UTF-8, so the resolver must fall back.
        let bytes: &[u8] = &[0xB0, 0xA1];
        let decoded = resolve_encoding(bytes);
        assert_eq!(decoded.encoding, "euc-kr");
        assert!(decoded.fell_back);
        assert_eq!(decoded.text, "가");
    }
}
