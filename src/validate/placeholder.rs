//! Scanners for the markup embedded in texts.
//!
//! Placeholders: `{name}`, the count placeholder `{#}` and verbatim
//! substitutions `{=...}`. A doubled `{{` is an escaped brace. Key references
//! are written `[[key]]` or `[[key|anything]]`.

use std::collections::BTreeSet;
use std::ops::Range;

pub const COUNT_PLACEHOLDER: &str = "#";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceholderKind<'a> {
    Named(&'a str),
    Count,
    Verbatim(&'a str),
    /// `{#...}` and other braces that are neither of the above
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder<'a> {
    pub kind: PlaceholderKind<'a>,
    /// Byte range including the braces
    pub span: Range<usize>,
}

/// All `{...}` spans of `text` in order
pub fn scan(text: &str) -> Vec<Placeholder<'_>> {
    let bytes = text.as_bytes();
    let mut out = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'{' {
            i += 1;
            continue;
        }
        if bytes.get(i + 1) == Some(&b'{') {
            i += 2;
            continue;
        }
        let Some(close) = text[i + 1..].find('}') else {
            break;
        };
        let end = i + 1 + close;
        let inner = &text[i + 1..end];
        let kind = if inner == COUNT_PLACEHOLDER {
            PlaceholderKind::Count
        } else if let Some(rest) = inner.strip_prefix('=') {
            PlaceholderKind::Verbatim(rest)
        } else if inner.is_empty() || inner.starts_with('#') {
            PlaceholderKind::Other
        } else {
            PlaceholderKind::Named(inner)
        };
        out.push(Placeholder {
            kind,
            span: i..end + 1,
        });
        i = end + 1;
    }
    out
}

/// Placeholder names compared across cultures; the count placeholder is
/// reported as `#` unless `include_count` is false
pub fn placeholder_names(text: &str, include_count: bool) -> BTreeSet<&str> {
    scan(text)
        .into_iter()
        .filter_map(|p| match p.kind {
            PlaceholderKind::Named(name) => Some(name),
            PlaceholderKind::Count if include_count => Some(COUNT_PLACEHOLDER),
            _ => None,
        })
        .collect()
}

/// `text` with every placeholder span replaced by a space
pub fn strip_placeholders(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for p in scan(text) {
        out.push_str(&text[last..p.span.start]);
        out.push(' ');
        last = p.span.end;
    }
    out.push_str(&text[last..]);
    out
}

/// Keys referenced as `[[key]]` or `[[key|...]]`
pub fn key_references(text: &str) -> Vec<&str> {
    let mut refs = Vec::new();
    let mut rest = text;
    while let Some(start) = rest.find("[[") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("]]") else {
            break;
        };
        let inner = &after[..end];
        let key = inner.split('|').next().unwrap_or(inner).trim();
        if !key.is_empty() {
            refs.push(key);
        }
        rest = &after[end + 2..];
    }
    refs
}
