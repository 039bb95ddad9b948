//! Built-in template functions.
//!
//! Each function receives its already-evaluated arguments (any piped value
//! last) and returns a [`Value`].  Arity and operand-kind violations are
//! reported as [`Error::InvalidArguments`].

use std::cmp::Ordering;

use super::error::{Error, Result};
use super::format::{sprint, sprintln};
use super::value::Value;

/// Names the language reserves but this engine does not support.
pub const UNIMPLEMENTED: &[&str] = &[
    "call", "printf", "if", "else", "range", "block", "define", "template", "break", "continue",
];

/// Dispatch a built-in function call.
///
/// Returns `None` if `name` is not a built-in (the caller reports it as an
/// unknown function).
pub fn call_builtin(name: &str, args: Vec<Value>) -> Option<Result<Value>> {
    // Ok(None) → not a builtin; `.transpose()` turns that into `None`.
    fn inner(name: &str, args: Vec<Value>) -> Result<Option<Value>> {
        Ok(Some(match name {
            // ── Comparison ───────────────────────────────────────────────────
            "eq" => {
                at_least(&args, 2, name)?;
                let (first, rest) = args.split_at(1);
                Value::Bool(rest.iter().any(|v| *v == first[0]))
            }
            "ne" => {
                exactly(&args, 2, name)?;
                Value::Bool(args[0] != args[1])
            }
            "lt" => Value::Bool(ordering(&args, name)?.is_lt()),
            "le" => Value::Bool(ordering(&args, name)?.is_le()),
            "gt" => Value::Bool(ordering(&args, name)?.is_gt()),
            "ge" => Value::Bool(ordering(&args, name)?.is_ge()),

            // ── Logic ────────────────────────────────────────────────────────
            "and" => {
                at_least(&args, 2, name)?;
                fold_until(args, Value::is_empty)
            }
            "or" => {
                at_least(&args, 2, name)?;
                fold_until(args, |v| !v.is_empty())
            }
            "not" => {
                exactly(&args, 1, name)?;
                Value::Bool(args[0].is_empty())
            }

            // ── Output ───────────────────────────────────────────────────────
            "print" => Value::Str(sprint(&args)),
            "println" => Value::Str(sprintln(&args)),

            // ── Strings ──────────────────────────────────────────────────────
            "len" => {
                exactly(&args, 1, name)?;
                match &args[0] {
                    Value::Str(s) => Value::Number(s.chars().count() as f64),
                    other => {
                        return Err(Error::invalid_args(
                            name,
                            format!("can't take length of {}", other.kind()),
                        ))
                    }
                }
            }

            n if UNIMPLEMENTED.contains(&n) => return Err(Error::NotImplemented(n.to_owned())),
            _ => return Ok(None),
        }))
    }

    inner(name, args).transpose()
}

/// Return the first operand for which `stop` holds, else the last operand.
fn fold_until(args: Vec<Value>, stop: impl Fn(&Value) -> bool) -> Value {
    let mut last = Value::Nil;
    for v in args {
        if stop(&v) {
            return v;
        }
        last = v;
    }
    last
}

fn ordering(args: &[Value], name: &str) -> Result<Ordering> {
    exactly(args, 2, name)?;
    let (a, b) = (&args[0], &args[1]);
    if a.is_nil() || b.is_nil() {
        return Err(Error::invalid_args(name, "can't compare nil"));
    }
    a.compare(b).ok_or_else(|| {
        Error::invalid_args(name, format!("can't compare {} with {}", a.kind(), b.kind()))
    })
}

// ── Arity checks ──────────────────────────────────────────────────────────────

fn exactly(args: &[Value], n: usize, name: &str) -> Result<()> {
    if args.len() != n {
        return Err(Error::invalid_args(
            name,
            format!("want {n} argument(s), got {}", args.len()),
        ));
    }
    Ok(())
}

fn at_least(args: &[Value], n: usize, name: &str) -> Result<()> {
    if args.len() < n {
        return Err(Error::invalid_args(
            name,
            format!("want at least {n} arguments, got {}", args.len()),
        ));
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
