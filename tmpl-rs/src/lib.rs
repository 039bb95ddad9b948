//! `tmpl`: a small interpreter for double-brace templates.
//!
//! The engine lives in [`template`]; [`cli`] holds the argument parsing for
//! the `tmpl` binary.

pub mod cli;
pub mod template;
