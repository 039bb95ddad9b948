//! Variable scopes.
//!
//! A [`ScopeStack`] holds one [`Frame`] per open `with` block above the root
//! frame.  Lookups check the innermost frame first and fall back outward;
//! bindings always go to the innermost frame.

use std::collections::HashMap;

use super::error::{Error, Result};
use super::value::Value;

/// One scope: the current dot, its local variables, and the most recently
/// computed value.
#[derive(Debug, Clone)]
pub struct Frame {
    pub dot: Value,
    vars: HashMap<String, Value>,
    acc: Option<Value>,
}

impl Frame {
    fn new(dot: Value) -> Self {
        Frame { dot, vars: HashMap::new(), acc: None }
    }
}

/// The frame stack for one template execution.  Never empty.
#[derive(Debug, Clone)]
pub struct ScopeStack {
    frames: Vec<Frame>,
}

impl ScopeStack {
    /// Create a stack with a single root frame over `data`.
    ///
    /// The root frame binds bare `$` to the root data.
    pub fn new(data: Value) -> Self {
        let mut root = Frame::new(data.clone());
        root.vars.insert(String::new(), data);
        ScopeStack { frames: vec![root] }
    }

    fn top(&self) -> &Frame {
        // `frames` always holds the root frame.
        &self.frames[self.frames.len() - 1]
    }

    fn top_mut(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    /// Number of frames, including the root.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// The data context of the innermost frame.
    pub fn dot(&self) -> &Value {
        &self.top().dot
    }

    /// Resolve `$name`, innermost frame first.
    pub fn lookup(&self, name: &str) -> Result<Value> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.vars.get(name))
            .cloned()
            .ok_or_else(|| Error::UndefinedVariable(name.to_owned()))
    }

    /// Bind `name` in the innermost frame.
    pub fn declare(&mut self, name: impl Into<String>, value: Value) {
        self.top_mut().vars.insert(name.into(), value);
    }

    /// Enter a `with` block over `dot`.
    pub fn push(&mut self, dot: Value) {
        self.frames.push(Frame::new(dot));
    }

    /// Leave the innermost `with` block.
    pub fn pop(&mut self) -> Result<()> {
        if self.frames.len() == 1 {
            return Err(Error::UnboundedEnd);
        }
        self.frames.pop();
        Ok(())
    }

    pub fn acc(&self) -> Option<&Value> {
        self.top().acc.as_ref()
    }

    pub fn set_acc(&mut self, value: Value) {
        self.top_mut().acc = Some(value);
    }

    pub fn take_acc(&mut self) -> Option<Value> {
        self.top_mut().acc.take()
    }

    pub fn reset_acc(&mut self) {
        self.top_mut().acc = None;
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
