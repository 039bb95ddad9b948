//! Template execution: finds actions in the text and substitutes their
//! results.
//!
//! | Delimiter      | Meaning                                               |
//! |----------------|-------------------------------------------------------|
//! | `{{ ... }}`    | Evaluate the action and substitute its value          |
//! | `{{- ... }}`   | Same, and drop all whitespace before the action       |
//! | `{{ ... -}}`   | Same, and drop all whitespace after the action        |
//!
//! The trim markers must be separated from the action body by whitespace
//! (`{{- 3}}`, not `{{-3}}`, which is the number -3).  An action whose value is
//! unset (a declaration, `with`, `end`, an empty action) renders as nothing.
//! Variable bindings and open `with` blocks carry over from one action to the
//! next within a single [`Template::execute`] call.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use regex::Regex;

use super::error::Result;
use super::eval::evaluate;
use super::lexer::tokenize;
use super::scope::ScopeStack;
use super::value::Value;

/// A user-registered template function.
pub type UserFn = Arc<dyn Fn(&[Value]) -> std::result::Result<Value, String> + Send + Sync>;

fn action_regex() -> &'static Regex {
    static ACTION: OnceLock<Regex> = OnceLock::new();
    ACTION.get_or_init(|| {
        Regex::new(r"(?s)(?:\s*\{\{-\s|\{\{)(.*?)(?:\s-\}\}\s*|\}\})")
            .expect("action delimiter pattern is valid")
    })
}

/// A function table plus an optional name, reusable across many
/// [`execute`](Template::execute) calls.
#[derive(Clone, Default)]
pub struct Template {
    name: Option<String>,
    funcs: HashMap<String, UserFn>,
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.funcs.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("Template")
            .field("name", &self.name)
            .field("funcs", &names)
            .finish()
    }
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    /// A template with a name, used in log output.
    pub fn named(name: impl Into<String>) -> Self {
        Template { name: Some(name.into()), funcs: HashMap::new() }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Register `f` under `name`.  User functions take priority over
    /// builtins of the same name; re-registering a name replaces it.
    pub fn add_func<F>(&mut self, name: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(&[Value]) -> std::result::Result<Value, String> + Send + Sync + 'static,
    {
        self.funcs.insert(name.into(), Arc::new(f));
        self
    }

    pub fn has_func(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }

    pub(crate) fn user_fn(&self, name: &str) -> Option<&UserFn> {
        self.funcs.get(name)
    }

    /// Render `text` against `data`.
    ///
    /// The first failing action aborts the whole call; no partial output is
    /// returned.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(template = self.name.as_deref().unwrap_or("<anonymous>"))
    )]
    pub fn execute(&self, text: &str, data: impl Into<Value>) -> Result<String> {
        let mut scopes = ScopeStack::new(data.into());
        let mut out = String::with_capacity(text.len());
        let mut last = 0;

        for caps in action_regex().captures_iter(text) {
            let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            out.push_str(&text[last..whole.start()]);
            last = whole.end();

            let rendered = self.run_action(body.as_str(), &mut scopes).inspect_err(|e| {
                tracing::debug!(action = body.as_str(), offset = whole.start(), error = %e, "action failed");
            })?;
            out.push_str(&rendered);
        }

        out.push_str(&text[last..]);
        if scopes.depth() > 1 {
            tracing::trace!(depth = scopes.depth(), "with block left open at end of text");
        }
        Ok(out)
    }

    fn run_action(&self, src: &str, scopes: &mut ScopeStack) -> Result<String> {
        tracing::trace!(action = src, depth = scopes.depth(), "evaluating action");
        scopes.reset_acc();
        let tokens = tokenize(src)?;
        evaluate(self, &tokens, scopes)?;
        Ok(scopes.take_acc().map(|v| v.to_string()).unwrap_or_default())
    }
}

/// Render `text` against `data` with no user functions.
pub fn render(text: &str, data: impl Into<Value>) -> Result<String> {
    Template::new().execute(text, data)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::error::Error;
    use serde_json::json;

    fn exec(src: &str) -> String {
        render(src, Value::Nil).expect("render failed")
    }

    #[test]
    fn no_actions() {
        assert_eq!(exec("hello world"), "hello world");
        assert_eq!(exec(""), "");
    }

    #[test]
    fn literal_action() {
        assert_eq!(exec("a{{1}}b"), "a1b");
        assert_eq!(exec(r#"{{"x"}}{{ "y" }}"#), "xy");
    }

    #[test]
    fn trim_markers() {
        assert_eq!(exec("{{23 -}} < {{- 45}}"), "23<45");
        assert_eq!(exec("a \n\t {{- 1}}"), "a1");
        assert_eq!(exec("{{1 -}} \n\n b"), "1b");
    }

    #[test]
    fn dash_without_space_is_a_number() {
        assert_eq!(exec("a {{-3}} b"), "a -3 b");
    }

    #[test]
    fn declaration_renders_empty() {
        assert_eq!(exec("{{$x := 5}}{{$x}}"), "5");
        assert_eq!(exec("[{{$x := 5}}]"), "[]");
    }

    #[test]
    fn empty_and_comment_actions() {
        assert_eq!(exec("a{{}}b"), "ab");
        assert_eq!(exec("a{{/* note */}}b"), "ab");
        assert_eq!(exec("a {{- /* note */ -}} b"), "ab");
    }

    #[test]
    fn nil_renders() {
        assert_eq!(exec("{{nil}}"), "<nil>");
    }

    #[test]
    fn unterminated_delimiter_is_text() {
        assert_eq!(exec("a {{ b"), "a {{ b");
    }

    #[test]
    fn multiline_action() {
        assert_eq!(exec("{{print\n  1\n  2}}"), "1 2");
    }

    #[test]
    fn with_block() {
        let data = json!({"user": {"name": "ann", "age": 31}});
        assert_eq!(
            render("{{with .user}}{{.name}} is {{.age}}{{end}}.", data).unwrap(),
            "ann is 31."
        );
    }

    #[test]
    fn unterminated_with_persists() {
        let data = json!({"a": {"b": "inner"}, "b": "outer"});
        assert_eq!(render("{{with .a}}{{.b}} {{.b}}", data).unwrap(), "inner inner");
    }

    #[test]
    fn with_missing_field_fails() {
        let err = render("{{with .nonexistent}}{{.}}{{end}}", json!({})).unwrap_err();
        assert!(matches!(err, Error::FieldAccess { ref field, .. } if field == "nonexistent"));
    }

    #[test]
    fn undefined_variable_aborts() {
        assert_eq!(
            render("before {{$nope}} after", Value::Nil),
            Err(Error::UndefinedVariable("nope".into()))
        );
    }

    #[test]
    fn first_error_wins() {
        assert_eq!(
            render("{{end}}{{$nope}}", Value::Nil),
            Err(Error::UnboundedEnd)
        );
    }

    #[test]
    fn user_function() {
        let mut tmpl = Template::named("greeting");
        tmpl.add_func("upper", |args| match args {
            [Value::Str(s)] => Ok(Value::Str(s.to_uppercase())),
            _ => Err("upper wants one string".into()),
        });
        assert!(tmpl.has_func("upper"));
        assert_eq!(tmpl.name(), Some("greeting"));
        assert_eq!(
            tmpl.execute("hi {{.who | upper}}", json!({"who": "bob"})).unwrap(),
            "hi BOB"
        );
        assert!(matches!(
            tmpl.execute("{{upper 1}}", Value::Nil),
            Err(Error::FunctionFailed { .. })
        ));
    }

    #[test]
    fn template_is_reusable() {
        let tmpl = Template::new();
        assert_eq!(tmpl.execute("{{.}}", json!(1)).unwrap(), "1");
        assert_eq!(tmpl.execute("{{.}}", json!("two")).unwrap(), "two");
        // Bindings do not leak between calls.
        assert!(tmpl.execute("{{$x := 1}}", Value::Nil).is_ok());
        assert!(tmpl.execute("{{$x}}", Value::Nil).is_err());
    }

    #[test]
    fn debug_lists_function_names() {
        let mut tmpl = Template::new();
        tmpl.add_func("b", |_| Ok(Value::Nil)).add_func("a", |_| Ok(Value::Nil));
        let dbg = format!("{tmpl:?}");
        assert!(dbg.contains(r#"funcs: ["a", "b"]"#), "{dbg}");
    }
}
