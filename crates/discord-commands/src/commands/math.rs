//! Arithmetic evaluator for the `math` command.
//!
//! A small recursive-descent parser over `f64`. Grammar, loosest first:
//!
//! ```text
//! expr    := term (("+" | "-") term)*
//! term    := unary (("*" | "/" | "%") unary)*
//! unary   := ("+" | "-") unary | power
//! power   := primary (("**" | "^") unary)?
//! primary := number | "(" expr ")"
//! ```
//!
//! Power is right-associative and binds tighter than unary minus, so
//! `-2 ^ 2` is `-4` and `2 ^ 3 ^ 2` is `512`.

use async_trait::async_trait;
use thiserror::Error;

use crate::context::CommandContext;
use crate::error::CommandResult;
use crate::registry::Command;

const MAX_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MathError {
    #[error("unexpected character '{0}' at {1}")]
    UnexpectedChar(char, usize),
    #[error("unexpected end of expression")]
    UnexpectedEnd,
    #[error("unexpected {0}")]
    UnexpectedToken(String),
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    #[error("expression nested too deeply")]
    TooDeep,
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Pow,
    LParen,
    RParen,
}

fn tokenize(input: &str) -> Result<Vec<Token>, MathError> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let token = match c {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                if i < chars.len() && matches!(chars[i], 'e' | 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && matches!(chars[j], '+' | '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        while j < chars.len() && chars[j].is_ascii_digit() {
                            j += 1;
                        }
                        i = j;
                    }
                }
                let literal: String = chars[start..i].iter().collect();
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| MathError::InvalidNumber(literal.clone()))?;
                tokens.push(Token::Num(value));
                continue;
            }
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' if chars.get(i + 1) == Some(&'*') => {
                i += 1;
                Token::Pow
            }
            '*' => Token::Star,
            '/' => Token::Slash,
            '%' => Token::Percent,
            '^' => Token::Pow,
            '(' => Token::LParen,
            ')' => Token::RParen,
            other => return Err(MathError::UnexpectedChar(other, i)),
        };
        tokens.push(token);
        i += 1;
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn descend(&mut self) -> Result<(), MathError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(MathError::TooDeep);
        }
        Ok(())
    }

    fn expr(&mut self) -> Result<f64, MathError> {
        let mut value = self.term()?;
        loop {
            match self.peek() {
                Some(Token::Plus) => {
                    self.pos += 1;
                    value += self.term()?;
                }
                Some(Token::Minus) => {
                    self.pos += 1;
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64, MathError> {
        let mut value = self.unary()?;
        loop {
            match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    value *= self.unary()?;
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    value /= self.unary()?;
                }
                Some(Token::Percent) => {
                    self.pos += 1;
                    value %= self.unary()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary(&mut self) -> Result<f64, MathError> {
        match self.peek() {
            Some(Token::Plus) | Some(Token::Minus) => {
                let negate = self.next() == Some(Token::Minus);
                self.descend()?;
                let value = self.unary()?;
                self.depth -= 1;
                Ok(if negate { -value } else { value })
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<f64, MathError> {
        let base = self.primary()?;
        if self.peek() == Some(&Token::Pow) {
            self.pos += 1;
            self.descend()?;
            let exponent = self.unary()?;
            self.depth -= 1;
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<f64, MathError> {
        match self.next() {
            Some(Token::Num(n)) => Ok(n),
            Some(Token::LParen) => {
                self.descend()?;
                let value = self.expr()?;
                self.depth -= 1;
                match self.next() {
                    Some(Token::RParen) => Ok(value),
                    Some(other) => Err(MathError::UnexpectedToken(format!("{:?}", other))),
                    None => Err(MathError::UnexpectedEnd),
                }
            }
            Some(other) => Err(MathError::UnexpectedToken(format!("{:?}", other))),
            None => Err(MathError::UnexpectedEnd),
        }
    }
}

/// Evaluate an arithmetic expression.
pub fn evaluate(input: &str) -> Result<f64, MathError> {
    let mut parser = Parser {
        tokens: tokenize(input)?,
        pos: 0,
        depth: 0,
    };
    let value = parser.expr()?;
    match parser.next() {
        None => Ok(value),
        Some(extra) => Err(MathError::UnexpectedToken(format!("{:?}", extra))),
    }
}

/// Render a number the way a browser console would: no trailing `.0`,
/// `Infinity`/`NaN` spelled out, exponent form outside `[1e-6, 1e21)`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let abs = value.abs();
    if (1e-6..1e21).contains(&abs) {
        return value.to_string();
    }
    let exp = format!("{:e}", value);
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{}e+{}", mantissa, power),
        _ => exp,
    }
}

pub struct Math;

#[async_trait]
impl Command for Math {
    async fn execute(&self, ctx: &CommandContext<'_>, args: &[String]) -> CommandResult {
        let reply = match evaluate(&args.join(" ")) {
            Ok(value) => format!("🧮 Result: {}", format_number(value)),
            Err(_) => "Invalid expression.".to_string(),
        };
        ctx.reply(reply).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::Outcome;
    use crate::mock::MockDiscord;
    use crate::testing::Harness;

    fn eval(s: &str) -> f64 {
        evaluate(s).unwrap_or_else(|e| panic!("{:?} failed: {}", s, e))
    }

    #[test]
    fn test_precedence() {
        assert_eq!(eval("1 + 2 * 3"), 7.0);
        assert_eq!(eval("(1 + 2) * 3"), 9.0);
        assert_eq!(eval("10 - 4 - 3"), 3.0);
        assert_eq!(eval("8 / 4 / 2"), 1.0);
        assert_eq!(eval("7 % 4 + 1"), 4.0);
    }

    #[test]
    fn test_power_is_right_associative() {
        assert_eq!(eval("2 ^ 3 ^ 2"), 512.0);
        assert_eq!(eval("2 ** 3 ** 2"), 512.0);
        assert_eq!(eval("2 ** -1"), 0.5);
    }

    #[test]
    fn test_unary_minus_binds_looser_than_power() {
        assert_eq!(eval("-2 ^ 2"), -4.0);
        assert_eq!(eval("(-2) ^ 2"), 4.0);
        assert_eq!(eval("--3"), 3.0);
        assert_eq!(eval("+5 - -5"), 10.0);
    }

    #[test]
    fn test_number_forms() {
        assert_eq!(eval("1.5 * 2"), 3.0);
        assert_eq!(eval(".5 + .25"), 0.75);
        assert_eq!(eval("1e3 + 2E-1"), 1000.2);
    }

    #[test]
    fn test_division_by_zero_is_infinite() {
        assert!(eval("1 / 0").is_infinite());
        assert!(eval("0 / 0").is_nan());
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert_eq!(evaluate(""), Err(MathError::UnexpectedEnd));
        assert_eq!(evaluate("1 +"), Err(MathError::UnexpectedEnd));
        assert_eq!(evaluate("(1 + 2"), Err(MathError::UnexpectedEnd));
        assert!(matches!(evaluate("1 2"), Err(MathError::UnexpectedToken(_))));
        assert!(matches!(evaluate("1..2"), Err(MathError::InvalidNumber(_))));
        assert_eq!(evaluate("2 + x"), Err(MathError::UnexpectedChar('x', 4)));
    }

    #[test]
    fn test_rejects_code() {
        assert!(evaluate("process.exit()").is_err());
        assert!(evaluate("alert(1)").is_err());
    }

    #[test]
    fn test_deep_nesting_is_bounded() {
        let deep = format!("{}1{}", "(".repeat(500), ")".repeat(500));
        assert_eq!(evaluate(&deep), Err(MathError::TooDeep));
        let ok = format!("{}1{}", "(".repeat(10), ")".repeat(10));
        assert_eq!(evaluate(&ok), Ok(1.0));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(7.0), "7");
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(f64::INFINITY), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
    }

    #[tokio::test]
    async fn test_math_replies_with_result() {
        let h = Harness::new(MockDiscord::new());
        h.run("!math (2 + 3) * 4").await;
        h.run("!math 1/0").await;
        assert_eq!(
            h.mock.replies(),
            vec!["🧮 Result: 20", "🧮 Result: Infinity"]
        );
    }

    #[tokio::test]
    async fn test_invalid_expression_is_a_normal_reply() {
        let h = Harness::new(MockDiscord::new());
        let outcome = h.run("!math 2 +* 3").await;
        assert!(matches!(outcome, Outcome::Completed { .. }));
        h.run("!math").await;
        assert_eq!(
            h.mock.replies(),
            vec!["Invalid expression.", "Invalid expression."]
        );
    }
}
