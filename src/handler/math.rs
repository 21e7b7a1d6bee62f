//! Math evaluation
//!
//! Two fallbacks of the classifier: single-function calls such as
//! `floor(3.7)` or `pow(2, 8)`, and full arithmetic expressions with
//! `+ - * / % ^`, parentheses and the constants `pi` and `e`. Results print
//! with double formatting, so whole numbers keep a trailing `.0`.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::error::{Error, Result};

/// Maximum nesting depth for parenthesised sub-expressions and `^` chains.
const MAX_DEPTH: usize = 64;

static FUNCTION_CALL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z][a-z0-9]*)\((.*)\)$").expect("valid regex"));

/// Names accepted by [`evaluate_function`]
pub const FUNCTIONS: &[&str] = &[
    "abs", "ceil", "floor", "log", "log10", "max", "min", "pow", "round", "sqrt",
];

/// Call shape of a known function, shown when its arguments are malformed
pub fn function_usage(name: &str) -> Option<&'static str> {
    let usage = match name {
        "abs" => "abs(<number>)",
        "ceil" => "ceil(<number>)",
        "floor" => "floor(<number>)",
        "log" => "log(<number>)",
        "log10" => "log10(<number>)",
        "max" => "max(<a>, <b>)",
        "min" => "min(<a>, <b>)",
        "pow" => "pow(<base>, <exponent>)",
        "round" => "round(<number>)",
        "sqrt" => "sqrt(<number>)",
        _ => return None,
    };
    Some(usage)
}

/// Result of an evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Float(f64),
    Integer(i64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Float(value) => f.write_str(&format_double(*value)),
            Number::Integer(value) => write!(f, "{}", value),
        }
    }
}

/// Format a double the way a console user expects: `3.0`, `0.5`, `NaN`
pub fn format_double(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

fn math_error(expression: &str, reason: impl Into<String>) -> Error {
    Error::Math {
        expression: expression.to_string(),
        reason: reason.into(),
    }
}

/// Evaluate `name(args)`.
///
/// Returns `None` when the input is not a call to a known function, so the
/// caller can fall through to the next check. Malformed arguments to a known
/// function yield [`Error::Usage`].
pub fn evaluate_function(input: &str) -> Option<Result<Number>> {
    let compact: String = input
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_lowercase();
    let captures = FUNCTION_CALL.captures(&compact)?;
    let name = captures.get(1)?.as_str();
    let usage = function_usage(name)?;
    let raw_args = captures.get(2).map(|m| m.as_str()).unwrap_or("");

    let args: Result<Vec<f64>> = if raw_args.is_empty() {
        Ok(Vec::new())
    } else {
        raw_args.split(',').map(evaluate_expression).collect()
    };
    let result = args
        .and_then(|args| apply_function(input, name, &args))
        .map_err(|e| {
            debug!("{}", e);
            Error::usage(usage)
        });
    Some(result)
}

fn apply_function(input: &str, name: &str, args: &[f64]) -> Result<Number> {
    let expect = |count: usize| -> Result<()> {
        if args.len() == count {
            Ok(())
        } else {
            Err(math_error(
                input,
                format!("{} takes {} argument(s), got {}", name, count, args.len()),
            ))
        }
    };

    let value = match name {
        "abs" => {
            expect(1)?;
            args[0].abs()
        }
        "ceil" => {
            expect(1)?;
            args[0].ceil()
        }
        "floor" => {
            expect(1)?;
            args[0].floor()
        }
        "log" => {
            expect(1)?;
            args[0].ln()
        }
        "log10" => {
            expect(1)?;
            args[0].log10()
        }
        "max" => {
            expect(2)?;
            args[0].max(args[1])
        }
        "min" => {
            expect(2)?;
            args[0].min(args[1])
        }
        "pow" => {
            expect(2)?;
            args[0].powf(args[1])
        }
        "round" => {
            expect(1)?;
            // Half rounds toward positive infinity
            return Ok(Number::Integer((args[0] + 0.5).floor() as i64));
        }
        "sqrt" => {
            expect(1)?;
            args[0].sqrt()
        }
        other => return Err(math_error(input, format!("unknown function '{}'", other))),
    };
    Ok(Number::Float(value))
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Op(char),
    Open,
    Close,
}

/// Evaluate an arithmetic expression
pub fn evaluate_expression(input: &str) -> Result<f64> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(math_error(input, "empty expression"));
    }
    let mut parser = Parser {
        input,
        tokens: &tokens,
        pos: 0,
    };
    let value = parser.add_sub(0)?;
    if let Some(token) = parser.peek() {
        return Err(math_error(input, format!("unexpected token {:?}", token)));
    }
    Ok(value)
}

/// Whether `input` looks like arithmetic rather than a word command
pub fn looks_like_expression(input: &str) -> bool {
    tokenize(input)
        .map(|tokens| {
            tokens
                .iter()
                .any(|token| matches!(token, Token::Number(_)))
        })
        .unwrap_or(false)
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    while let Some(&ch) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
        } else if ch.is_ascii_digit() || ch == '.' {
            let mut num = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_ascii_digit() || c == '.' {
                    num.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            let value = num
                .parse()
                .map_err(|_| math_error(input, format!("bad number '{}'", num)))?;
            tokens.push(Token::Number(value));
        } else if ch.is_ascii_alphabetic() {
            let mut word = String::new();
            while let Some(&c) = chars.peek() {
                if c.is_ascii_alphanumeric() {
                    word.push(c);
                    chars.next();
                } else {
                    break;
                }
            }
            let value = match word.to_lowercase().as_str() {
                "pi" => std::f64::consts::PI,
                "e" => std::f64::consts::E,
                _ => return Err(math_error(input, format!("unknown name '{}'", word))),
            };
            tokens.push(Token::Number(value));
        } else if "+-*/%^".contains(ch) {
            tokens.push(Token::Op(ch));
            chars.next();
        } else if ch == '(' {
            tokens.push(Token::Open);
            chars.next();
        } else if ch == ')' {
            tokens.push(Token::Close);
            chars.next();
        } else {
            return Err(math_error(input, format!("unexpected character '{}'", ch)));
        }
    }
    Ok(tokens)
}

struct Parser<'a> {
    input: &'a str,
    tokens: &'a [Token],
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn eat_op(&mut self, ops: &str) -> Option<char> {
        match self.peek() {
            Some(Token::Op(op)) if ops.contains(op) => {
                self.pos += 1;
                Some(op)
            }
            _ => None,
        }
    }

    fn add_sub(&mut self, depth: usize) -> Result<f64> {
        let mut left = self.mul_div(depth)?;
        while let Some(op) = self.eat_op("+-") {
            let right = self.mul_div(depth)?;
            if op == '+' {
                left += right;
            } else {
                left -= right;
            }
        }
        Ok(left)
    }

    fn mul_div(&mut self, depth: usize) -> Result<f64> {
        let mut left = self.unary(depth)?;
        while let Some(op) = self.eat_op("*/%") {
            let right = self.unary(depth)?;
            match op {
                '*' => left *= right,
                '/' | '%' if right == 0.0 => {
                    return Err(math_error(self.input, "division by zero"));
                }
                '/' => left /= right,
                _ => left %= right,
            }
        }
        Ok(left)
    }

    fn unary(&mut self, depth: usize) -> Result<f64> {
        let mut negative = false;
        while let Some(op) = self.eat_op("+-") {
            if op == '-' {
                negative = !negative;
            }
        }
        let value = self.power(depth)?;
        Ok(if negative { -value } else { value })
    }

    fn power(&mut self, depth: usize) -> Result<f64> {
        let base = self.primary(depth)?;
        if self.eat_op("^").is_some() {
            if depth >= MAX_DEPTH {
                return Err(math_error(self.input, "exponent chain too long"));
            }
            // Right associative: 2^3^2 = 2^9
            let exponent = self.unary(depth + 1)?;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self, depth: usize) -> Result<f64> {
        match self.peek() {
            None => Err(math_error(self.input, "unexpected end of expression")),
            Some(Token::Number(value)) => {
                self.pos += 1;
                Ok(value)
            }
            Some(Token::Open) => {
                if depth >= MAX_DEPTH {
                    return Err(math_error(self.input, "expression too deeply nested"));
                }
                self.pos += 1;
                let value = self.add_sub(depth + 1)?;
                if self.peek() != Some(Token::Close) {
                    return Err(math_error(self.input, "missing closing parenthesis"));
                }
                self.pos += 1;
                Ok(value)
            }
            Some(token) => Err(math_error(
                self.input,
                format!("expected a number, got {:?}", token),
            )),
        }
    }
}
