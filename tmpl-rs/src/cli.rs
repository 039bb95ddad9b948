//! Command-line argument parsing.
//!
//! Usage:
//!   tmpl [-v] [-d<datafile>] [-j<json>] [-n<name>] [<template>|-]

use std::io::Read;
use std::path::PathBuf;

pub const USAGE: &str = "Usage: tmpl [-v] [-d<datafile>] [-j<json>] [-n<name>] [<template>|-]";

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "TMPL_LOG";

// ── Public types ──────────────────────────────────────────────────────────────

/// Parsed command-line arguments.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Where to read the template text.
    pub template: TemplateSource,
    /// Where to read the root data.
    pub data: DataSource,
    /// Template name for diagnostics (`-n<name>`).
    pub name: Option<String>,
    /// Debug logging (`-v`).
    pub verbose: bool,
}

/// Where the template text comes from.
#[derive(Debug, Default, PartialEq)]
pub enum TemplateSource {
    /// Standard input (no positional argument, or `-`).
    #[default]
    Stdin,
    File(PathBuf),
}

/// Where the root data comes from.
#[derive(Debug, Default, PartialEq)]
pub enum DataSource {
    /// No data: the root dot is nil.
    #[default]
    Null,
    /// `-d<file>`: a JSON document on disk.
    File(PathBuf),
    /// `-j<json>`: JSON given on the command line.
    Inline(String),
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Parse `std::env::args()` and return [`CliArgs`] or an error message.
pub fn parse_args() -> Result<CliArgs, String> {
    let raw: Vec<String> = std::env::args().collect();
    parse_argv(&raw[1..])
}

/// Parse a slice of argument strings (exposed for testing).
pub fn parse_argv(argv: &[String]) -> Result<CliArgs, String> {
    let mut args = CliArgs::default();
    let mut positional: Vec<String> = Vec::new();
    let mut i = 0;

    while i < argv.len() {
        let arg = argv[i].as_str();

        // `--` ends flag processing.
        if arg == "--" {
            i += 1;
            positional.extend(argv[i..].iter().cloned());
            break;
        }

        // Non-flag argument.
        if !arg.starts_with('-') || arg == "-" {
            positional.push(arg.to_owned());
            i += 1;
            continue;
        }

        // Flag argument: iterate over characters after the leading `-`.
        let chars: Vec<char> = arg[1..].chars().collect();
        let mut j = 0;
        while j < chars.len() {
            match chars[j] {
                'v' => args.verbose = true,

                // -d<file>
                'd' => {
                    let file = flag_value(&chars, &mut j, argv, &mut i, 'd')?;
                    set_data(&mut args, DataSource::File(PathBuf::from(file)))?;
                }

                // -j<json>
                'j' => {
                    let json = flag_value(&chars, &mut j, argv, &mut i, 'j')?;
                    set_data(&mut args, DataSource::Inline(json))?;
                }

                // -n<name>
                'n' => args.name = Some(flag_value(&chars, &mut j, argv, &mut i, 'n')?),

                c => return Err(format!("unknown option: -{c}")),
            }
            j += 1;
        }
        i += 1;
    }

    match positional.len() {
        0 => {}
        1 => {
            let p = positional.remove(0);
            if p != "-" {
                args.template = TemplateSource::File(PathBuf::from(p));
            }
        }
        n => return Err(format!("too many arguments ({n})")),
    }

    Ok(args)
}

/// Read the value of a value-taking flag: either the rest of the current
/// cluster (`-dfile`) or the next argument (`-d file`).
fn flag_value(
    chars: &[char],
    j: &mut usize,
    argv: &[String],
    i: &mut usize,
    flag: char,
) -> Result<String, String> {
    if *j + 1 < chars.len() {
        let s: String = chars[*j + 1..].iter().collect();
        *j = chars.len(); // consumed rest of this arg
        Ok(s)
    } else if *i + 1 < argv.len() {
        *i += 1;
        Ok(argv[*i].clone())
    } else {
        Err(format!("-{flag} requires an argument"))
    }
}

fn set_data(args: &mut CliArgs, data: DataSource) -> Result<(), String> {
    if args.data != DataSource::Null {
        return Err("-d and -j are mutually exclusive".to_owned());
    }
    args.data = data;
    Ok(())
}

// ── Input helpers ─────────────────────────────────────────────────────────────

impl CliArgs {
    /// The template name: `-n<name>` if given, else the template file name.
    pub fn template_name(&self) -> Option<String> {
        if let Some(name) = &self.name {
            return Some(name.clone());
        }
        match &self.template {
            TemplateSource::File(path) => {
                path.file_name().map(|f| f.to_string_lossy().into_owned())
            }
            TemplateSource::Stdin => None,
        }
    }
}

/// Read the template text.
pub fn read_template(src: &TemplateSource) -> Result<String, String> {
    match src {
        TemplateSource::Stdin => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| format!("reading stdin: {e}"))?;
            Ok(text)
        }
        TemplateSource::File(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("{}: {e}", path.display())),
    }
}

/// Load and parse the root data.
pub fn load_data(src: &DataSource) -> Result<serde_json::Value, String> {
    match src {
        DataSource::Null => Ok(serde_json::Value::Null),
        DataSource::Inline(json) => {
            serde_json::from_str(json).map_err(|e| format!("invalid -j data: {e}"))
        }
        DataSource::File(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("{}: {e}", path.display()))?;
            serde_json::from_str(&text).map_err(|e| format!("{}: {e}", path.display()))
        }
    }
}

/// Determine the log filter directive.
///
/// Priority: `TMPL_LOG` env var → `debug` with `-v` → `warn`.
pub fn log_filter(verbose: bool) -> String {
    if let Ok(f) = std::env::var(LOG_ENV) {
        if !f.is_empty() {
            return f;
        }
    }
    let level = if verbose { "debug" } else { "warn" };
    level.to_owned()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
