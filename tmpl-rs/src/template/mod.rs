//! Double-brace template engine.
//!
//! Text is scanned for `{{ ... }}` actions; each action is tokenized,
//! evaluated as a pipeline against a stack of scopes, and replaced by its
//! value.  The engine covers:
//!
//! - Literals (`"quoted"`, `` `raw` ``, `42`, `true`, `nil`)
//! - Field selectors on the current data (`.`, `.user.name`)
//! - Variables (`$x := ...`, `$x = ...`, `$x`, bare `$` for the root data)
//! - Pipelines (`.name | len | eq 3`) and parenthesized sub-pipelines
//! - `with ... end` blocks that change the current data
//! - Builtins (`eq ne lt le gt ge and or not print println len`)
//! - User functions via [`Template::add_func`]
//!
//! # Quick start
//!
//! ```rust
//! use tmpl::template::{Template, Value};
//!
//! let mut tmpl = Template::new();
//! tmpl.add_func("double", |args| match args {
//!     [Value::Number(n)] => Ok(Value::Number(n * 2.0)),
//!     _ => Err("double wants one number".into()),
//! });
//! let data = serde_json::json!({"count": 21});
//! assert_eq!(tmpl.execute("{{.count | double}}", data).unwrap(), "42");
//! ```

pub mod builtins;
pub mod error;
pub mod escape;
pub mod eval;
pub mod exec;
pub mod format;
pub mod lexer;
pub mod scope;
pub mod value;

// Re-exports for convenience.
pub use error::Error;
pub use exec::{render, Template, UserFn};
pub use value::Value;
