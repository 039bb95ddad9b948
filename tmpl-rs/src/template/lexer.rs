//! Action lexer.
//!
//! Turns the text between one pair of delimiters into [`Token`]s.  Each
//! token must start exactly where the previous one ended; whitespace and
//! `/* ... */` comments are skipped.  Lexical forms, in precedence order:
//!
//! | Form              | Example              | Token                 |
//! |-------------------|----------------------|-----------------------|
//! | symbol            | `(` `)` `:=` `=` `,` `\|` | [`Token::Sym`]   |
//! | variable          | `$x`, `$`            | [`Token::Var`]        |
//! | identifier        | `eq`, `true`, `with` | [`Token::Ident`]      |
//! | raw string        | `` `a\b` ``          | [`Token::Literal`]    |
//! | quoted string     | `"a\tb"`             | [`Token::Literal`]    |
//! | signed integer    | `42`, `-7`, `+3`     | [`Token::Literal`]    |
//! | dot selector      | `.`, `.a.b`          | [`Token::Field`]      |

use std::fmt;

use super::error::{Error, Result};
use super::escape::unescape;
use super::value::Value;

// ── Token ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    LParen,
    RParen,
    Declare, // :=
    Assign,  // =
    Comma,
    Pipe,
}

impl Symbol {
    pub fn as_str(self) -> &'static str {
        match self {
            Symbol::LParen => "(",
            Symbol::RParen => ")",
            Symbol::Declare => ":=",
            Symbol::Assign => "=",
            Symbol::Comma => ",",
            Symbol::Pipe => "|",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A string or number literal.
    Literal(Value),
    /// A bare lowercase-led name: keyword or function.
    Ident(String),
    /// A dot selector; the path excludes the leading dot (`""` for `.`).
    Field(String),
    /// `$name`; the name excludes the `$` and may be empty.
    Var(String),
    Sym(Symbol),
}

impl Token {
    /// Short description of the token kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Token::Literal(_) => "literal",
            Token::Ident(_) => "identifier",
            Token::Field(_) => "field",
            Token::Var(_) => "variable",
            Token::Sym(_) => "symbol",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Literal(Value::Str(s)) => write!(f, "{s:?}"),
            Token::Literal(v) => write!(f, "{v}"),
            Token::Ident(name) => f.write_str(name),
            Token::Field(path) => write!(f, ".{path}"),
            Token::Var(name) => write!(f, "${name}"),
            Token::Sym(sym) => f.write_str(sym.as_str()),
        }
    }
}

// ── Lexer ─────────────────────────────────────────────────────────────────────

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl<'a> Lexer<'a> {
    fn new(src: &'a str) -> Self {
        Lexer { src, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek2(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if pred(c)) {
            self.bump();
        }
        &self.src[start..self.pos]
    }

    fn unexpected(&self, at: usize) -> Error {
        let snippet: String = self.src[at..].chars().take(16).collect();
        Error::syntax_at(at, format!("unexpected input {snippet:?}"))
    }

    fn sym(&mut self, sym: Symbol) -> Token {
        self.pos += sym.as_str().len();
        Token::Sym(sym)
    }

    fn read_raw_string(&mut self, start: usize) -> Result<Token> {
        self.bump(); // opening back-tick
        let Some(len) = self.rest().find('`') else {
            return Err(self.unexpected(start));
        };
        let body = &self.rest()[..len];
        self.pos += len + 1;
        Ok(Token::Literal(Value::Str(body.to_owned())))
    }

    fn read_quoted(&mut self, start: usize) -> Result<Token> {
        self.bump(); // opening quote
        let body_start = self.pos;
        loop {
            match self.bump() {
                None => return Err(self.unexpected(start)),
                Some('\\') => {
                    if self.bump().is_none() {
                        return Err(self.unexpected(start));
                    }
                }
                Some('"') => break,
                Some(_) => {}
            }
        }
        let body = &self.src[body_start..self.pos - 1];
        Ok(Token::Literal(Value::Str(unescape(body)?)))
    }

    fn read_number(&mut self, start: usize) -> Result<Token> {
        if matches!(self.peek(), Some('+' | '-')) {
            self.bump();
        }
        self.eat_while(|c| c.is_ascii_digit());
        let text = &self.src[start..self.pos];
        let n: f64 = text.parse().map_err(|_| self.unexpected(start))?;
        Ok(Token::Literal(Value::Number(n)))
    }

    fn read_field(&mut self) -> Token {
        self.bump(); // leading '.'
        let mut path = String::new();
        if !matches!(self.peek(), Some(c) if is_word(c)) {
            return Token::Field(path);
        }
        loop {
            path.push_str(self.eat_while(is_word));
            if self.peek() == Some('.') && matches!(self.peek2(), Some(c) if is_word(c)) {
                self.bump();
                path.push('.');
            } else {
                break;
            }
        }
        Token::Field(path)
    }

    fn skip_comment(&mut self, start: usize) -> Result<()> {
        let Some(end) = self.rest()[2..].find("*/") else {
            return Err(self.unexpected(start));
        };
        self.pos += 2 + end + 2;
        Ok(())
    }

    /// Produce the next token, or `None` at end of input.
    fn next_token(&mut self) -> Result<Option<Token>> {
        loop {
            let start = self.pos;
            let Some(c) = self.peek() else {
                return Ok(None);
            };
            let tok = match c {
                '(' => self.sym(Symbol::LParen),
                ')' => self.sym(Symbol::RParen),
                ',' => self.sym(Symbol::Comma),
                '|' => self.sym(Symbol::Pipe),
                '=' => self.sym(Symbol::Assign),
                ':' if self.peek2() == Some('=') => self.sym(Symbol::Declare),
                '$' => {
                    self.bump();
                    Token::Var(self.eat_while(is_word).to_owned())
                }
                'a'..='z' => Token::Ident(self.eat_while(is_word).to_owned()),
                '`' => self.read_raw_string(start)?,
                '"' => self.read_quoted(start)?,
                '0'..='9' => self.read_number(start)?,
                '+' | '-' if matches!(self.peek2(), Some(d) if d.is_ascii_digit()) => {
                    self.read_number(start)?
                }
                '.' => self.read_field(),
                '/' if self.peek2() == Some('*') => {
                    self.skip_comment(start)?;
                    continue;
                }
                c if c.is_whitespace() => {
                    self.eat_while(char::is_whitespace);
                    continue;
                }
                _ => return Err(self.unexpected(start)),
            };
            return Ok(Some(tok));
        }
    }
}

/// Tokenize the text of one action.
pub fn tokenize(src: &str) -> Result<Vec<Token>> {
    let mut lexer = Lexer::new(src);
    let mut tokens = Vec::new();
    while let Some(tok) = lexer.next_token()? {
        tokens.push(tok);
    }
    Ok(tokens)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
