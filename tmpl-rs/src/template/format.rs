//! Rendering values to text.
//!
//! Single values render through `Display for Value`; this module joins
//! several of them the way `print` does.

use super::value::Value;

/// Concatenate `values`, inserting one space between two neighbours unless
/// both are strings.
pub fn sprint(values: &[Value]) -> String {
    let mut out = String::new();
    for (i, v) in values.iter().enumerate() {
        if i > 0 && !(values[i - 1].is_str() && v.is_str()) {
            out.push(' ');
        }
        out.push_str(&v.to_string());
    }
    out
}

/// [`sprint`] followed by a newline.
pub fn sprintln(values: &[Value]) -> String {
    let mut out = sprint(values);
    out.push('\n');
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
