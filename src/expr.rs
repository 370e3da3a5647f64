//! Composition expressions
//!
//! A small infix language for composing cycles from the command line or a
//! config file:
//!
//! ```text
//! (color + linewidth) * 2
//! cycler("ls", ["-", "--"]) * color[::-1]
//! concat(color, cycler("color", ["k"]))
//! ```
//!
//! `*` binds tighter than `+`. Identifiers name configured properties.
//! The `Display` form of any `Cycle<String, Value>` parses back to an equal
//! cycle.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::cycle::{Cycle, Slice};
use crate::error::CycleError;
use crate::value::Value;

/// Errors from tokenizing or evaluating an expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    /// A character that starts no token
    #[error("unexpected character {ch:?} at offset {offset}")]
    UnexpectedChar {
        /// The offending character
        ch: char,
        /// Byte offset in the source
        offset: usize,
    },

    /// A string literal without its closing quote
    #[error("unterminated string starting at offset {0}")]
    UnterminatedString(usize),

    /// A numeric literal that does not parse
    #[error("invalid number {text:?} at offset {offset}")]
    InvalidNumber {
        /// The literal text
        text: String,
        /// Byte offset in the source
        offset: usize,
    },

    /// The parser wanted something else here
    #[error("expected {expected} at offset {offset}, found {found}")]
    Unexpected {
        /// What the grammar allows at this point
        expected: &'static str,
        /// What was there instead
        found: String,
        /// Byte offset in the source
        offset: usize,
    },

    /// An identifier that names no configured property
    #[error("unknown property {0:?}")]
    UnknownProperty(String),

    /// The expression was well formed but the composition failed
    #[error(transparent)]
    Cycle(#[from] CycleError),
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    Int(i64),
    Float(f64),
    Str(String),
    Plus,
    Star,
    Minus,
    Colon,
    Comma,
    LParen,
    RParen,
    LBracket,
    RBracket,
    End,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(name) => write!(f, "identifier {name:?}"),
            Self::Int(i) => write!(f, "integer {i}"),
            Self::Float(x) => write!(f, "number {x:?}"),
            Self::Str(s) => write!(f, "string {s:?}"),
            Self::Plus => f.write_str("'+'"),
            Self::Star => f.write_str("'*'"),
            Self::Minus => f.write_str("'-'"),
            Self::Colon => f.write_str("':'"),
            Self::Comma => f.write_str("','"),
            Self::LParen => f.write_str("'('"),
            Self::RParen => f.write_str("')'"),
            Self::LBracket => f.write_str("'['"),
            Self::RBracket => f.write_str("']'"),
            Self::End => f.write_str("end of input"),
        }
    }
}

fn tokenize(source: &str) -> Result<Vec<(usize, Token)>, ExprError> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some(&(offset, ch)) = chars.peek() {
        let single = match ch {
            '+' => Some(Token::Plus),
            '*' => Some(Token::Star),
            '-' => Some(Token::Minus),
            ':' => Some(Token::Colon),
            ',' => Some(Token::Comma),
            '(' => Some(Token::LParen),
            ')' => Some(Token::RParen),
            '[' => Some(Token::LBracket),
            ']' => Some(Token::RBracket),
            _ => None,
        };
        if let Some(token) = single {
            chars.next();
            tokens.push((offset, token));
            continue;
        }

        if ch.is_whitespace() {
            chars.next();
        } else if ch == '"' || ch == '\'' {
            chars.next();
            let mut text = String::new();
            let mut closed = false;
            while let Some((_, c)) = chars.next() {
                match c {
                    '\\' => {
                        let Some((_, escaped)) = chars.next() else {
                            break;
                        };
                        match escaped {
                            'n' => text.push('\n'),
                            't' => text.push('\t'),
                            'r' => text.push('\r'),
                            '0' => text.push('\0'),
                            'u' => text.push(unicode_escape(&mut chars, offset)?),
                            other => text.push(other),
                        }
                    }
                    c if c == ch => {
                        closed = true;
                        break;
                    }
                    c => text.push(c),
                }
            }
            if !closed {
                return Err(ExprError::UnterminatedString(offset));
            }
            tokens.push((offset, Token::Str(text)));
        } else if ch.is_ascii_digit() || ch == '.' {
            let mut text = String::new();
            while let Some(&(_, c)) = chars.peek() {
                let exponent_sign = (c == '-' || c == '+') && text.ends_with(['e', 'E']);
                if c.is_ascii_alphanumeric() || c == '.' || c == '_' || exponent_sign {
                    text.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push((offset, number(&text, offset)?));
        } else if ch.is_alphabetic() || ch == '_' {
            let mut name = String::new();
            while let Some(&(_, c)) = chars.peek() {
                if c.is_alphanumeric() || c == '_' {
                    name.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push((offset, Token::Ident(name)));
        } else {
            return Err(ExprError::UnexpectedChar { ch, offset });
        }
    }

    tokens.push((source.len(), Token::End));
    Ok(tokens)
}

fn unicode_escape(
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
    offset: usize,
) -> Result<char, ExprError> {
    let mut hex = String::new();
    if chars.next_if(|&(_, c)| c == '{').is_some() {
        for (_, c) in chars.by_ref() {
            if c == '}' {
                break;
            }
            hex.push(c);
        }
    }
    u32::from_str_radix(&hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or(ExprError::InvalidNumber {
            text: format!("\\u{{{hex}}}"),
            offset,
        })
}

fn number(text: &str, offset: usize) -> Result<Token, ExprError> {
    let clean = text.replace('_', "");
    if let Ok(i) = clean.parse::<i64>() {
        return Ok(Token::Int(i));
    }
    clean
        .parse::<f64>()
        .map(Token::Float)
        .map_err(|_| ExprError::InvalidNumber {
            text: text.to_string(),
            offset,
        })
}

/// Intermediate results: integers are only meaningful as multipliers.
#[derive(Debug)]
enum Operand {
    Cycle(Cycle<String, Value>),
    Scalar(Value),
}

impl Operand {
    fn describe(&self) -> String {
        match self {
            Self::Cycle(_) => "cycle".to_string(),
            Self::Scalar(v) => v.type_name().to_string(),
        }
    }

    fn into_cycle(self, op: &'static str) -> Result<Cycle<String, Value>, CycleError> {
        match self {
            Self::Cycle(cycle) => Ok(cycle),
            Self::Scalar(v) => Err(CycleError::TypeMismatch {
                op,
                detail: format!("expected a cycle, found {}", v.type_name()),
            }),
        }
    }
}

#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
fn repeat_count(n: i64) -> usize {
    if n <= 0 {
        0
    } else {
        n as usize
    }
}

fn add(left: Operand, right: Operand) -> Result<Operand, CycleError> {
    match (left, right) {
        (Operand::Cycle(l), Operand::Cycle(r)) => Ok(Operand::Cycle((l + r)?)),
        (l, r) => Err(CycleError::TypeMismatch {
            op: "+",
            detail: format!("{} + {}", l.describe(), r.describe()),
        }),
    }
}

fn mul(left: Operand, right: Operand) -> Result<Operand, CycleError> {
    match (left, right) {
        (Operand::Cycle(l), Operand::Cycle(r)) => Ok(Operand::Cycle((l * r)?)),
        (Operand::Cycle(c), Operand::Scalar(Value::Int(n)))
        | (Operand::Scalar(Value::Int(n)), Operand::Cycle(c)) => {
            Ok(Operand::Cycle(c.times(repeat_count(n))?))
        }
        (l, r) => Err(CycleError::TypeMismatch {
            op: "*",
            detail: format!("{} * {}", l.describe(), r.describe()),
        }),
    }
}

struct Parser<'p> {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    properties: &'p BTreeMap<String, Cycle<String, Value>>,
}

impl Parser<'_> {
    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).map_or(&Token::End, |(_, t)| t)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.pos).map_or(0, |(o, _)| *o)
    }

    fn bump(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == token {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Token, expected: &'static str) -> Result<(), ExprError> {
        if self.eat(token) {
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn unexpected(&self, expected: &'static str) -> ExprError {
        ExprError::Unexpected {
            expected,
            found: self.peek().to_string(),
            offset: self.offset(),
        }
    }

    fn expr(&mut self) -> Result<Operand, ExprError> {
        let mut acc = self.term()?;
        while self.eat(&Token::Plus) {
            let rhs = self.term()?;
            acc = add(acc, rhs)?;
        }
        Ok(acc)
    }

    fn term(&mut self) -> Result<Operand, ExprError> {
        let mut acc = self.postfix()?;
        while self.eat(&Token::Star) {
            let rhs = self.postfix()?;
            acc = mul(acc, rhs)?;
        }
        Ok(acc)
    }

    fn postfix(&mut self) -> Result<Operand, ExprError> {
        let mut operand = self.primary()?;
        while self.eat(&Token::LBracket) {
            let slice = self.slice()?;
            self.expect(&Token::RBracket, "']'")?;
            let cycle = operand.into_cycle("[]")?;
            operand = Operand::Cycle(cycle.slice(slice)?);
        }
        Ok(operand)
    }

    fn slice(&mut self) -> Result<Slice, ExprError> {
        let start = self.bound()?;
        if !self.eat(&Token::Colon) {
            return Err(CycleError::IndexNotSlice.into());
        }
        let stop = self.bound()?;
        let step = if self.eat(&Token::Colon) {
            self.bound()?
        } else {
            None
        };
        Ok(Slice { start, stop, step })
    }

    fn bound(&mut self) -> Result<Option<isize>, ExprError> {
        if matches!(self.peek(), Token::Colon | Token::RBracket) {
            return Ok(None);
        }
        let offset = self.offset();
        match self.literal()? {
            Value::Int(i) => isize::try_from(i)
                .map(Some)
                .map_err(|_| ExprError::InvalidNumber {
                    text: i.to_string(),
                    offset,
                }),
            _ => Err(CycleError::IndexNotSlice.into()),
        }
    }

    fn literal(&mut self) -> Result<Value, ExprError> {
        let negative = self.eat(&Token::Minus);
        let value = match self.bump() {
            Token::Int(i) if negative => Value::Int(-i),
            Token::Float(x) if negative => Value::Float(-x),
            Token::Int(i) => Value::Int(i),
            Token::Float(x) => Value::Float(x),
            Token::Str(s) if !negative => Value::Str(s),
            Token::Ident(name) if !negative && name == "true" => Value::Bool(true),
            Token::Ident(name) if !negative && name == "false" => Value::Bool(false),
            _ => {
                self.pos -= 1;
                return Err(self.unexpected("a literal value"));
            }
        };
        Ok(value)
    }

    fn primary(&mut self) -> Result<Operand, ExprError> {
        match self.peek().clone() {
            Token::LParen => {
                self.bump();
                let inner = self.expr()?;
                self.expect(&Token::RParen, "')'")?;
                Ok(inner)
            }
            Token::Ident(name) if name == "cycler" => {
                self.bump();
                self.cycler_call()
            }
            Token::Ident(name) if name == "concat" => {
                self.bump();
                self.expect(&Token::LParen, "'('")?;
                let left = self.expr()?.into_cycle("concat")?;
                self.expect(&Token::Comma, "','")?;
                let right = self.expr()?.into_cycle("concat")?;
                self.expect(&Token::RParen, "')'")?;
                Ok(Operand::Cycle(left.concat(&right)?))
            }
            Token::Ident(name) if name != "true" && name != "false" => {
                self.bump();
                let cycle = self
                    .properties
                    .get(&name)
                    .cloned()
                    .ok_or(ExprError::UnknownProperty(name))?;
                Ok(Operand::Cycle(cycle))
            }
            _ => Ok(Operand::Scalar(self.literal()?)),
        }
    }

    /// `cycler("key", [v, ...])` or `cycler("key", <single-key cycle>)`
    fn cycler_call(&mut self) -> Result<Operand, ExprError> {
        self.expect(&Token::LParen, "'('")?;
        let Token::Str(key) = self.bump() else {
            self.pos -= 1;
            return Err(self.unexpected("a string key"));
        };
        self.expect(&Token::Comma, "','")?;

        let cycle = if self.eat(&Token::LBracket) {
            let mut values = Vec::new();
            while !self.eat(&Token::RBracket) {
                values.push(self.literal()?);
                if !self.eat(&Token::Comma) {
                    self.expect(&Token::RBracket, "',' or ']'")?;
                    break;
                }
            }
            Cycle::new(key, values)
        } else {
            let source = self.expr()?.into_cycle("cycler")?;
            Cycle::rekeyed(key, &source)?
        };
        self.expect(&Token::RParen, "')'")?;
        Ok(Operand::Cycle(cycle))
    }
}

/// Evaluate `source` against the named `properties`.
pub fn evaluate(
    source: &str,
    properties: &BTreeMap<String, Cycle<String, Value>>,
) -> Result<Cycle<String, Value>, ExprError> {
    let mut parser = Parser {
        tokens: tokenize(source)?,
        pos: 0,
        properties,
    };
    let result = parser.expr()?;
    if *parser.peek() != Token::End {
        return Err(parser.unexpected("an operator or end of input"));
    }
    Ok(result.into_cycle("expression")?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cycler;
    use crate::testutil::chars;

    fn props() -> BTreeMap<String, Cycle<String, Value>> {
        let mut map = BTreeMap::new();
        map.insert("color".to_string(), cycler("color".to_string(), chars("rgb")));
        map.insert(
            "lw".to_string(),
            cycler("lw".to_string(), [1, 2, 3].map(Value::from)),
        );
        map.insert(
            "ls".to_string(),
            cycler("ls".to_string(), ["-", "--"].map(Value::from)),
        );
        map
    }

    fn eval(src: &str) -> Result<Cycle<String, Value>, ExprError> {
        evaluate(src, &props())
    }

    #[test]
    fn test_precedence_product_binds_tighter() {
        let p = props();
        let got = eval("ls * color + ls2").unwrap_err();
        assert_eq!(got, ExprError::UnknownProperty("ls2".to_string()));

        let got = eval("color + lw * 1").unwrap();
        assert_eq!(got, p["color"].zip(&p["lw"]).unwrap());
    }

    #[test]
    fn test_example_composition() {
        let p = props();
        let got = eval("ls * (color + lw)").unwrap();
        let expected = p["ls"].product(&p["color"].zip(&p["lw"]).unwrap()).unwrap();
        assert_eq!(got, expected);
        assert_eq!(got.len(), 6);
    }

    #[test]
    fn test_integer_multiplication_either_side() {
        let p = props();
        assert_eq!(eval("2 * color").unwrap(), p["color"].times(2).unwrap());
        assert_eq!(eval("color * 2").unwrap(), p["color"].times(2).unwrap());
        assert!(eval("color * -1").unwrap().is_empty());
    }

    #[test]
    fn test_oversized_numbers_fail_cleanly() {
        assert!(matches!(
            eval("color * 9223372036854775807"),
            Err(ExprError::Cycle(CycleError::LengthOverflow { left: 3, .. }))
        ));
        assert_eq!(
            eval("color[1::9223372036854775807]").unwrap(),
            cycler("color".to_string(), chars("g"))
        );
    }

    #[test]
    fn test_type_errors() {
        assert!(matches!(
            eval("color * 2.5"),
            Err(ExprError::Cycle(CycleError::TypeMismatch { op: "*", .. }))
        ));
        assert!(matches!(
            eval("color * \"a\""),
            Err(ExprError::Cycle(CycleError::TypeMismatch { .. }))
        ));
        assert!(matches!(
            eval("color + 1"),
            Err(ExprError::Cycle(CycleError::TypeMismatch { op: "+", .. }))
        ));
        assert!(matches!(
            eval("2 * 3"),
            Err(ExprError::Cycle(CycleError::TypeMismatch { .. }))
        ));
        assert!(matches!(
            eval("3"),
            Err(ExprError::Cycle(CycleError::TypeMismatch { op: "expression", .. }))
        ));
    }

    #[test]
    fn test_slicing() {
        let p = props();
        assert_eq!(
            eval("color[::-1]").unwrap(),
            cycler("color".to_string(), chars("bgr"))
        );
        assert_eq!(eval("color[1:]").unwrap(), p["color"].slice(1..).unwrap());
        assert_eq!(
            eval("(color * lw)[0:9:4]").unwrap().len(),
            3
        );
    }

    #[test]
    fn test_index_is_not_a_slice() {
        assert_eq!(
            eval("color[0]").unwrap_err(),
            ExprError::Cycle(CycleError::IndexNotSlice)
        );
        assert_eq!(
            eval("color[\"a\":]").unwrap_err(),
            ExprError::Cycle(CycleError::IndexNotSlice)
        );
    }

    #[test]
    fn test_inline_cycler_and_rekey() {
        let got = eval(r#"cycler("ec", color) + color"#).unwrap();
        assert!(got.contains_key(&"ec".to_string()));
        let got = eval(r#"cycler("m", ["o", 'x', 1.5, true, -2,])"#).unwrap();
        assert_eq!(got.len(), 5);
        assert_eq!(got.get(4).unwrap()["m"], Value::Int(-2));
    }

    #[test]
    fn test_concat_call() {
        let got = eval(r#"concat(color, cycler("color", ["k"]))"#).unwrap();
        assert_eq!(got.len(), 4);
        assert!(matches!(
            eval("concat(color, lw)"),
            Err(ExprError::Cycle(CycleError::KeySetMismatch { .. }))
        ));
    }

    #[test]
    fn test_composition_errors_surface() {
        assert!(matches!(
            eval("color + ls"),
            Err(ExprError::Cycle(CycleError::LengthMismatch { left: 3, right: 2 }))
        ));
        assert!(matches!(
            eval("color * color"),
            Err(ExprError::Cycle(CycleError::Overlap { .. }))
        ));
    }

    #[test]
    fn test_syntax_errors() {
        assert!(matches!(eval("color +"), Err(ExprError::Unexpected { .. })));
        assert!(matches!(eval("(color"), Err(ExprError::Unexpected { .. })));
        assert!(matches!(eval("color lw"), Err(ExprError::Unexpected { .. })));
        assert!(matches!(eval("color $ lw"), Err(ExprError::UnexpectedChar { ch: '$', .. })));
        assert!(matches!(eval("cycler(\"a, [1])"), Err(ExprError::UnterminatedString(_))));
    }

    #[test]
    fn test_display_round_trips() {
        let p = props();
        let original = p["ls"]
            .product(&p["color"].zip(&p["lw"]).unwrap())
            .unwrap();
        let parsed = evaluate(&original.to_string(), &BTreeMap::new()).unwrap();
        assert_eq!(parsed, original);
        assert_eq!(parsed.to_string(), original.to_string());
    }

    #[test]
    fn test_escaped_strings_round_trip() {
        let c = cycler("k\"ey".to_string(), [Value::from("a\\b\n"), Value::from("é")]);
        let parsed = evaluate(&c.to_string(), &BTreeMap::new()).unwrap();
        assert_eq!(parsed, c);
    }
}
