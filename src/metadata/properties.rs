//! Reader for ISO-8859-1 key/value property files.
//!
//! The accepted syntax is the conventional one written by property-file writers:
//!
//! - `#` or `!` as the first non-whitespace character starts a comment line,
//! - a line ending in an odd number of backslashes continues onto the next line,
//! - the key ends at the first unescaped `=`, `:` or whitespace,
//! - `\t`, `\n`, `\r`, `\f` and `\uXXXX` escapes are decoded; any other escaped character stands for
//!   itself.

use std::collections::BTreeMap;

use crate::foundation::error::{StampError, StampResult};

/// One logical entry read from a property file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyEntry {
    /// 1-based natural line on which the entry starts.
    pub line: usize,
    /// Decoded key.
    pub key: String,
    /// Decoded value.
    pub value: String,
}

/// Decode raw property-file bytes as ISO-8859-1 and parse them.
///
/// Duplicate keys resolve to the last occurrence.
pub fn parse_properties(bytes: &[u8]) -> StampResult<BTreeMap<String, String>> {
    let text: String = bytes.iter().map(|&b| char::from(b)).collect();
    parse_properties_str(&text)
}

/// Parse already-decoded property-file text into a key/value map.
pub fn parse_properties_str(text: &str) -> StampResult<BTreeMap<String, String>> {
    let mut out = BTreeMap::new();
    for entry in parse_entries(text)? {
        out.insert(entry.key, entry.value);
    }
    Ok(out)
}

/// Parse property-file text into entries in file order, duplicates included.
pub fn parse_entries(text: &str) -> StampResult<Vec<PropertyEntry>> {
    let mut entries = Vec::new();
    for logical in logical_lines(text) {
        let (raw_key, raw_value) = split_key_value(&logical.text);
        entries.push(PropertyEntry {
            line: logical.line,
            key: unescape(raw_key, logical.line)?,
            value: unescape(raw_value, logical.line)?,
        });
    }
    Ok(entries)
}

struct LogicalLine {
    line: usize,
    text: String,
}

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\x0c')
}

fn natural_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0usize;
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += 1;
                if i < bytes.len() && bytes[i] == b'\n' {
                    i += 1;
                }
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < bytes.len() {
        lines.push(&text[start..]);
    }
    lines
}

/// Strip a trailing continuation backslash, returning whether the line continues.
fn strip_continuation(line: &str) -> (&str, bool) {
    let trailing = line.chars().rev().take_while(|&c| c == '\\').count();
    if trailing % 2 == 1 {
        (&line[..line.len() - 1], true)
    } else {
        (line, false)
    }
}

fn logical_lines(text: &str) -> Vec<LogicalLine> {
    let mut out = Vec::new();
    let mut pending: Option<LogicalLine> = None;

    for (idx, raw) in natural_lines(text).into_iter().enumerate() {
        let trimmed = raw.trim_start_matches(is_blank);
        let (body, continues) = strip_continuation(trimmed);

        match pending.take() {
            Some(mut current) => {
                current.text.push_str(body);
                if continues {
                    pending = Some(current);
                } else {
                    out.push(current);
                }
            }
            None => {
                if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                    continue;
                }
                let current = LogicalLine {
                    line: idx + 1,
                    text: body.to_string(),
                };
                if continues {
                    pending = Some(current);
                } else {
                    out.push(current);
                }
            }
        }
    }

    // A continuation at end of input just ends the entry.
    if let Some(current) = pending {
        out.push(current);
    }
    out
}

fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    let mut value_start = line.len();
    let mut has_separator = false;

    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if c == '\\' {
            escaped = true;
            continue;
        }
        if c == '=' || c == ':' {
            key_end = i;
            value_start = i + 1;
            has_separator = true;
            break;
        }
        if is_blank(c) {
            key_end = i;
            value_start = i + 1;
            break;
        }
    }

    let mut rest = line[value_start..].trim_start_matches(is_blank);
    if !has_separator && let Some(stripped) = rest.strip_prefix(['=', ':']) {
        rest = stripped.trim_start_matches(is_blank);
    }
    (&line[..key_end], rest)
}

fn unescape(raw: &str, line: usize) -> StampResult<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    let mut high_surrogate: Option<u16> = None;

    while let Some(c) = chars.next() {
        if c != '\\' {
            flush_surrogate(&mut out, &mut high_surrogate);
            out.push(c);
            continue;
        }
        let Some(next) = chars.next() else {
            break;
        };
        if next != 'u' {
            flush_surrogate(&mut out, &mut high_surrogate);
            out.push(match next {
                't' => '\t',
                'n' => '\n',
                'r' => '\r',
                'f' => '\x0c',
                other => other,
            });
            continue;
        }

        let mut unit = 0u16;
        for _ in 0..4 {
            let digit = chars
                .next()
                .and_then(|h| h.to_digit(16))
                .ok_or_else(|| {
                    StampError::malformed_anchor(format!(
                        "malformed \\uXXXX escape on line {line}"
                    ))
                })?;
            unit = (unit << 4) | digit as u16;
        }
        match (high_surrogate.take(), unit) {
            (Some(high), 0xDC00..=0xDFFF) => {
                let decoded = char::decode_utf16([high, unit])
                    .next()
                    .and_then(Result::ok)
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                out.push(decoded);
            }
            (previous, 0xD800..=0xDBFF) => {
                if previous.is_some() {
                    out.push(char::REPLACEMENT_CHARACTER);
                }
                high_surrogate = Some(unit);
            }
            (previous, _) => {
                if previous.is_some() {
                    out.push(char::REPLACEMENT_CHARACTER);
                }
                out.push(char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
        }
    }
    flush_surrogate(&mut out, &mut high_surrogate);
    Ok(out)
}

fn flush_surrogate(out: &mut String, pending: &mut Option<u16>) {
    if pending.take().is_some() {
        out.push(char::REPLACEMENT_CHARACTER);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/metadata/properties.rs"]
mod tests;
