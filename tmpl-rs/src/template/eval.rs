//! Pipeline evaluator.
//!
//! A recursive-descent walk over one action's tokens.  Evaluation has no
//! tree: each production updates the accumulator of the innermost scope
//! frame, and `with` / `end` push and pop frames as they are reached.
//!
//! ```text
//! Pipeline := Arg ('|' Arg)*
//! Arg      := Literal | Field | '(' Pipeline ')'
//!           | Var [(':=' | '=') Pipeline]
//!           | 'nil' | 'true' | 'false' | 'with' Arg | 'end'
//!           | Ident Arg*
//! ```
//!
//! Command arguments are collected greedily: an invocation consumes every
//! Arg that follows it, so `print len "a" "b"` passes both strings to `len`.
//! The value piped in with `|` is appended after the explicit arguments.

use super::builtins::call_builtin;
use super::error::{Error, Result};
use super::exec::Template;
use super::lexer::{Symbol, Token};
use super::scope::ScopeStack;
use super::value::Value;

pub struct Evaluator<'a> {
    template: &'a Template,
    tokens: &'a [Token],
    pos: usize,
    scopes: &'a mut ScopeStack,
}

impl<'a> Evaluator<'a> {
    pub fn new(template: &'a Template, tokens: &'a [Token], scopes: &'a mut ScopeStack) -> Self {
        Evaluator { template, tokens, pos: 0, scopes }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn eat(&mut self, sym: Symbol) -> bool {
        if self.peek() == Some(&Token::Sym(sym)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Tokens not yet consumed.
    pub fn remaining(&self) -> &'a [Token] {
        &self.tokens[self.pos..]
    }

    /// Evaluate `Arg ('|' Arg)*`.  Returns `false` if not even the first Arg
    /// is present.
    pub fn pipeline(&mut self) -> Result<bool> {
        if !self.arg()? {
            return Ok(false);
        }
        while self.eat(Symbol::Pipe) {
            if !self.arg()? {
                return Err(Error::syntax("missing command after '|'"));
            }
        }
        Ok(true)
    }

    /// Evaluate one Arg.  Returns `false`, consuming nothing, when the next
    /// token cannot start one.
    fn arg(&mut self) -> Result<bool> {
        let Some(tok) = self.peek() else {
            return Ok(false);
        };
        match tok {
            Token::Literal(v) => {
                self.pos += 1;
                self.scopes.set_acc(v.clone());
            }
            Token::Var(name) => {
                self.pos += 1;
                self.variable(name)?;
            }
            Token::Field(path) => {
                self.pos += 1;
                let v = self.scopes.dot().walk(path)?;
                self.scopes.set_acc(v);
            }
            Token::Ident(name) => {
                self.pos += 1;
                self.ident(name)?;
            }
            Token::Sym(Symbol::LParen) => {
                self.pos += 1;
                self.paren()?;
            }
            Token::Sym(_) => return Ok(false),
        }
        Ok(true)
    }

    fn variable(&mut self, name: &str) -> Result<()> {
        let op = match self.peek() {
            Some(Token::Sym(op @ (Symbol::Declare | Symbol::Assign))) => *op,
            _ => {
                let v = self.scopes.lookup(name)?;
                self.scopes.set_acc(v);
                return Ok(());
            }
        };
        self.pos += 1;
        if op == Symbol::Assign {
            // Assignment needs an existing variable; the new value is still
            // bound in the innermost frame.
            self.scopes.lookup(name)?;
        }
        self.scopes.reset_acc();
        self.pipeline()?;
        let value = self
            .scopes
            .take_acc()
            .ok_or_else(|| Error::syntax(format!("missing value for ${name}")))?;
        self.scopes.declare(name, value);
        Ok(())
    }

    fn ident(&mut self, name: &str) -> Result<()> {
        match name {
            "nil" => self.scopes.set_acc(Value::Nil),
            "true" => self.scopes.set_acc(Value::Bool(true)),
            "false" => self.scopes.set_acc(Value::Bool(false)),
            "with" => {
                self.scopes.reset_acc();
                if !self.arg()? {
                    return Err(Error::syntax("missing argument to with"));
                }
                let dot = self
                    .scopes
                    .take_acc()
                    .ok_or_else(|| Error::syntax("with argument has no value"))?;
                self.scopes.push(dot);
            }
            "end" => self.scopes.pop()?,
            _ => self.invoke(name)?,
        }
        Ok(())
    }

    fn invoke(&mut self, name: &str) -> Result<()> {
        let piped = self.scopes.take_acc();
        let mut args = Vec::new();
        loop {
            self.scopes.reset_acc();
            if !self.arg()? {
                break;
            }
            if let Some(v) = self.scopes.take_acc() {
                args.push(v);
            }
        }
        args.extend(piped);
        tracing::trace!(func = name, argc = args.len(), "invoke");
        let result = self.call(name, args)?;
        self.scopes.set_acc(result);
        Ok(())
    }

    /// Resolve `name`: user functions first, then builtins.
    fn call(&self, name: &str, args: Vec<Value>) -> Result<Value> {
        if let Some(f) = self.template.user_fn(name) {
            return f(args.as_slice()).map_err(|message| Error::FunctionFailed {
                func: name.to_owned(),
                message,
            });
        }
        call_builtin(name, args).unwrap_or_else(|| Err(Error::UnknownFunction(name.to_owned())))
    }

    fn paren(&mut self) -> Result<()> {
        if !self.pipeline()? {
            return Err(Error::syntax("empty parenthesized pipeline"));
        }
        if !self.eat(Symbol::RParen) {
            return Err(Error::syntax("unclosed '('"));
        }
        Ok(())
    }
}

/// Evaluate a complete action, leaving its result in the innermost frame's
/// accumulator.  Fails if any token is left over.
pub fn evaluate(template: &Template, tokens: &[Token], scopes: &mut ScopeStack) -> Result<()> {
    let mut ev = Evaluator::new(template, tokens, scopes);
    ev.pipeline()?;
    if let Some(tok) = ev.remaining().first() {
        return Err(Error::syntax(format!("unexpected {} {tok} in action", tok.kind())));
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
