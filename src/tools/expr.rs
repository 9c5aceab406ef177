//! Arithmetic expression evaluator backing `basic_calculator`
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expr    := term (("+" | "-") term)*
//! term    := unary (("*" | "/" | "//" | "%") unary)*
//! unary   := ("+" | "-") unary | power
//! power   := primary ("**" unary)?
//! primary := NUMBER | "(" expr ")"
//! ```
//!
//! `**` is right-associative and binds tighter than a unary minus on its
//! left, so `-2 ** 2` is `-4`. Nesting deeper than [`MAX_DEPTH`] is a
//! parse error.

use super::ToolError;

/// Deepest nesting of parentheses, signs and `**` chains accepted
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Plus,
    Minus,
    Star,
    Slash,
    DoubleSlash,
    Percent,
    Power,
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Number(n) => format!("number {}", n),
            Token::Plus => "'+'".to_string(),
            Token::Minus => "'-'".to_string(),
            Token::Star => "'*'".to_string(),
            Token::Slash => "'/'".to_string(),
            Token::DoubleSlash => "'//'".to_string(),
            Token::Percent => "'%'".to_string(),
            Token::Power => "'**'".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
        }
    }
}

/// Evaluate an arithmetic expression
pub fn evaluate(expression: &str) -> Result<f64, ToolError> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(parse_error(0, "empty expression"));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        end: expression.len(),
        depth: 0,
    };
    let value = parser.expr()?;

    if let Some((offset, token)) = parser.peek() {
        return Err(parse_error(offset, format!("unexpected {}", token.describe())));
    }
    Ok(value)
}

fn parse_error(position: usize, message: impl Into<String>) -> ToolError {
    ToolError::Parse {
        position,
        message: message.into(),
    }
}

fn tokenize(input: &str) -> Result<Vec<(usize, Token)>, ToolError> {
    let bytes = input.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;
        match c {
            b' ' | b'\t' | b'\n' | b'\r' => {
                i += 1;
                continue;
            }
            b'+' => tokens.push((start, Token::Plus)),
            b'-' => tokens.push((start, Token::Minus)),
            b'%' => tokens.push((start, Token::Percent)),
            b'(' => tokens.push((start, Token::LParen)),
            b')' => tokens.push((start, Token::RParen)),
            b'*' => {
                if bytes.get(i + 1) == Some(&b'*') {
                    i += 1;
                    tokens.push((start, Token::Power));
                } else {
                    tokens.push((start, Token::Star));
                }
            }
            b'/' => {
                if bytes.get(i + 1) == Some(&b'/') {
                    i += 1;
                    tokens.push((start, Token::DoubleSlash));
                } else {
                    tokens.push((start, Token::Slash));
                }
            }
            b'0'..=b'9' | b'.' => {
                let end = scan_number(bytes, i);
                let literal = &input[start..end];
                let value = literal
                    .parse::<f64>()
                    .map_err(|_| parse_error(start, format!("invalid number '{}'", literal)))?;
                tokens.push((start, Token::Number(value)));
                i = end;
                continue;
            }
            _ => {
                let ch = input[start..].chars().next().unwrap_or('?');
                return Err(parse_error(start, format!("unexpected character '{}'", ch)));
            }
        }
        i += 1;
    }

    Ok(tokens)
}

/// Returns the end offset of the number literal starting at `start`
fn scan_number(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
        i += 1;
    }
    // exponent only when followed by digits
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            i = j;
        }
    }
    i
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    end: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<(usize, &Token)> {
        self.tokens.get(self.pos).map(|(offset, token)| (*offset, token))
    }

    fn advance(&mut self) -> Option<(usize, Token)> {
        let next = self.tokens.get(self.pos).cloned();
        if next.is_some() {
            self.pos += 1;
        }
        next
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if matches!(self.peek(), Some((_, t)) if t == expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expr(&mut self) -> Result<f64, ToolError> {
        let mut value = self.term()?;
        loop {
            if self.eat(&Token::Plus) {
                value += self.term()?;
            } else if self.eat(&Token::Minus) {
                value -= self.term()?;
            } else {
                return Ok(value);
            }
        }
    }

    fn term(&mut self) -> Result<f64, ToolError> {
        let mut value = self.unary()?;
        loop {
            if self.eat(&Token::Star) {
                value *= self.unary()?;
            } else if self.eat(&Token::Slash) {
                let rhs = nonzero(self.unary()?)?;
                value /= rhs;
            } else if self.eat(&Token::DoubleSlash) {
                let rhs = nonzero(self.unary()?)?;
                value = (value / rhs).floor();
            } else if self.eat(&Token::Percent) {
                let rhs = nonzero(self.unary()?)?;
                // result takes the sign of the divisor
                value -= rhs * (value / rhs).floor();
            } else {
                return Ok(value);
            }
        }
    }

    /// Every nested level passes through here
    fn unary(&mut self) -> Result<f64, ToolError> {
        if self.depth >= MAX_DEPTH {
            let offset = self.peek().map_or(self.end, |(offset, _)| offset);
            return Err(parse_error(offset, "expression nested too deeply"));
        }
        self.depth += 1;
        let value = self.signed();
        self.depth -= 1;
        value
    }

    fn signed(&mut self) -> Result<f64, ToolError> {
        if self.eat(&Token::Minus) {
            return Ok(-self.unary()?);
        }
        if self.eat(&Token::Plus) {
            return self.unary();
        }
        self.power()
    }

    fn power(&mut self) -> Result<f64, ToolError> {
        let base = self.primary()?;
        if self.eat(&Token::Power) {
            let exponent = self.unary()?;
            if base == 0.0 && exponent < 0.0 {
                return Err(ToolError::ZeroDivision);
            }
            return Ok(base.powf(exponent));
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<f64, ToolError> {
        match self.advance() {
            Some((_, Token::Number(n))) => Ok(n),
            Some((_, Token::LParen)) => {
                let value = self.expr()?;
                match self.advance() {
                    Some((_, Token::RParen)) => Ok(value),
                    Some((offset, token)) => Err(parse_error(
                        offset,
                        format!("expected ')', found {}", token.describe()),
                    )),
                    None => Err(parse_error(self.end, "expected ')'")),
                }
            }
            Some((offset, token)) => Err(parse_error(
                offset,
                format!("unexpected {}", token.describe()),
            )),
            None => Err(parse_error(self.end, "unexpected end of expression")),
        }
    }
}

fn nonzero(value: f64) -> Result<f64, ToolError> {
    if value == 0.0 {
        Err(ToolError::ZeroDivision)
    } else {
        Ok(value)
    }
}
