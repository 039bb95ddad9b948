//! Backslash escape decoding for double-quoted literals.

use super::error::{Error, Result};

/// Resolve the backslash sequences in the body of a `"..."` literal.
///
/// `\a` decodes to a plain `a`, not the bell character.
pub fn unescape(raw: &str) -> Result<String> {
    if !raw.contains('\\') {
        return Ok(raw.to_owned());
    }
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('a') => out.push('a'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('v') => out.push('\u{b}'),
            Some(c @ ('\\' | '\'' | '"')) => out.push(c),
            Some(other) => return Err(Error::UnsupportedEscape(other)),
            None => return Err(Error::UnsupportedEscape('\\')),
        }
    }
    Ok(out)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
