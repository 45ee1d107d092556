// SPDX-License-Identifier: MIT OR Apache-2.0

//! Strict literal grammar.
//!
//! A recursive-descent parser for the literal forms a configuration value may be
//! written in on the command line or inside a YAML string: numbers, booleans,
//! `None`, quoted strings, lists, tuples and string-keyed dicts. It never
//! evaluates expressions.
//!
//! ```text
//! top    := expr ("," expr)* ","?          (two or more items form a tuple)
//! expr   := ("+" | "-")* number | "True" | "False" | "None"
//!         | string | list | tuple | dict
//! list   := "[" (expr ("," expr)* ","?)? "]"
//! tuple  := "(" ")" | "(" expr ")" | "(" expr "," (expr ("," expr)* ","?)? ")"
//! dict   := "{" (string ":" expr ("," string ":" expr)* ","?)? "}"
//! ```

use crate::domain::config_value::ConfigValue;
use crate::domain::node::CfgNode;
use thiserror::Error;

const MAX_DEPTH: usize = 64;

/// Reasons a string is not a literal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LiteralError {
    /// Input ended inside a literal.
    #[error("unexpected end of input")]
    UnexpectedEnd,
    /// A character that cannot start or continue a literal.
    #[error("unexpected character {found:?} at offset {offset}")]
    UnexpectedChar {
        /// The offending character
        found: char,
        /// Byte offset into the input
        offset: usize,
    },
    /// An identifier other than `True`, `False` or `None`.
    #[error("name '{0}' is not a literal")]
    NotALiteral(String),
    /// A malformed or out-of-range number.
    #[error("invalid number '{0}'")]
    InvalidNumber(String),
    /// A malformed escape sequence inside a string.
    #[error("invalid escape sequence at offset {0}")]
    InvalidEscape(usize),
    /// A dict key that is not a string.
    #[error("dict keys must be strings")]
    NonStringKey,
    /// Containers nested too deeply.
    #[error("literal nested deeper than {} levels", MAX_DEPTH)]
    TooDeep,
    /// Input left over after a complete literal.
    #[error("trailing input at offset {0}")]
    TrailingInput(usize),
}

/// Parses `input` as a single literal.
///
/// # Examples
///
/// ```
/// use cfgtree::domain::literal::parse_literal;
/// use cfgtree::domain::ConfigValue;
///
/// assert_eq!(parse_literal("0.5").unwrap(), ConfigValue::Float(0.5));
/// assert_eq!(parse_literal("(1, 2)").unwrap(), ConfigValue::tuple([1, 2]));
/// assert!(parse_literal("foo/bar").is_err());
/// ```
pub fn parse_literal(input: &str) -> Result<ConfigValue, LiteralError> {
    let mut parser = Parser {
        src: input,
        pos: 0,
        depth: 0,
    };
    let value = parser.parse_top()?;
    parser.skip_ws();
    if parser.pos < input.len() {
        return Err(LiteralError::TrailingInput(parser.pos));
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_ws();
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), LiteralError> {
        if self.eat(expected) {
            return Ok(());
        }
        match self.peek() {
            Some(found) => Err(LiteralError::UnexpectedChar {
                found,
                offset: self.pos,
            }),
            None => Err(LiteralError::UnexpectedEnd),
        }
    }

    fn at_end(&mut self) -> bool {
        self.skip_ws();
        self.pos >= self.src.len()
    }

    fn parse_top(&mut self) -> Result<ConfigValue, LiteralError> {
        let first = self.parse_expr()?;
        if !self.eat(',') {
            return Ok(first);
        }
        let mut items = vec![first];
        while !self.at_end() {
            items.push(self.parse_expr()?);
            if !self.eat(',') {
                break;
            }
        }
        Ok(ConfigValue::Tuple(items))
    }

    fn parse_expr(&mut self) -> Result<ConfigValue, LiteralError> {
        self.skip_ws();
        match self.peek() {
            None => Err(LiteralError::UnexpectedEnd),
            Some('[') => self.nested(|p| {
                p.bump();
                p.parse_items(']').map(ConfigValue::List)
            }),
            Some('(') => self.nested(Self::parse_paren),
            Some('{') => self.nested(Self::parse_dict),
            Some('\'') | Some('"') => self.parse_string().map(ConfigValue::Str),
            Some('+') | Some('-') => self.parse_signed(),
            Some(c) if c.is_ascii_digit() || c == '.' => self.parse_number(false),
            Some(c) if c.is_alphabetic() || c == '_' => self.parse_name(),
            Some(found) => Err(LiteralError::UnexpectedChar {
                found,
                offset: self.pos,
            }),
        }
    }

    fn nested<F>(&mut self, f: F) -> Result<ConfigValue, LiteralError>
    where
        F: FnOnce(&mut Self) -> Result<ConfigValue, LiteralError>,
    {
        if self.depth >= MAX_DEPTH {
            return Err(LiteralError::TooDeep);
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Items up to and including `close`, allowing one trailing comma.
    fn parse_items(&mut self, close: char) -> Result<Vec<ConfigValue>, LiteralError> {
        let mut items = Vec::new();
        loop {
            if self.eat(close) {
                return Ok(items);
            }
            items.push(self.parse_expr()?);
            if !self.eat(',') {
                self.expect(close)?;
                return Ok(items);
            }
        }
    }

    fn parse_paren(&mut self) -> Result<ConfigValue, LiteralError> {
        self.bump();
        if self.eat(')') {
            return Ok(ConfigValue::Tuple(Vec::new()));
        }
        let first = self.parse_expr()?;
        if self.eat(')') {
            return Ok(first);
        }
        self.expect(',')?;
        let mut items = vec![first];
        items.extend(self.parse_items(')')?);
        Ok(ConfigValue::Tuple(items))
    }

    fn parse_dict(&mut self) -> Result<ConfigValue, LiteralError> {
        self.bump();
        let mut node = CfgNode::new();
        loop {
            if self.eat('}') {
                return Ok(ConfigValue::Node(node));
            }
            self.skip_ws();
            let key = match self.peek() {
                Some('\'') | Some('"') => self.parse_string()?,
                Some(_) => {
                    self.parse_expr()?;
                    return Err(LiteralError::NonStringKey);
                }
                None => return Err(LiteralError::UnexpectedEnd),
            };
            self.expect(':')?;
            let value = self.parse_expr()?;
            node.insert(key, value);
            if !self.eat(',') {
                self.expect('}')?;
                return Ok(ConfigValue::Node(node));
            }
        }
    }

    fn parse_signed(&mut self) -> Result<ConfigValue, LiteralError> {
        let mut negative = false;
        while let Some(c) = self.peek() {
            match c {
                '-' => negative = !negative,
                '+' => {}
                _ => break,
            }
            self.bump();
            self.skip_ws();
        }
        match self.peek() {
            Some(c) if c.is_ascii_digit() || c == '.' => self.parse_number(negative),
            Some(found) => Err(LiteralError::UnexpectedChar {
                found,
                offset: self.pos,
            }),
            None => Err(LiteralError::UnexpectedEnd),
        }
    }

    fn parse_number(&mut self, negative: bool) -> Result<ConfigValue, LiteralError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            let exponent_sign = (c == '+' || c == '-')
                && matches!(self.src[start..self.pos].chars().last(), Some('e') | Some('E'))
                && !self.src[start..].starts_with("0x")
                && !self.src[start..].starts_with("0X");
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || exponent_sign {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        let text = &self.src[start..self.pos];
        let invalid = || LiteralError::InvalidNumber(text.to_string());
        if text.starts_with('_') || text.ends_with('_') || text.contains("__") {
            return Err(invalid());
        }
        let digits = text.replace('_', "");

        let radix = match digits.get(..2) {
            Some("0x") | Some("0X") => Some(16),
            Some("0o") | Some("0O") => Some(8),
            Some("0b") | Some("0B") => Some(2),
            _ => None,
        };
        if let Some(radix) = radix {
            let magnitude = i128::from_str_radix(&digits[2..], radix).map_err(|_| invalid())?;
            return signed_int(magnitude, negative).ok_or_else(invalid);
        }

        let is_float = digits.contains(|c: char| matches!(c, '.' | 'e' | 'E'));
        if !is_float {
            if !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid());
            }
            // a leading zero is only allowed for zero itself
            if digits.len() > 1 && digits.starts_with('0') && digits.bytes().any(|b| b != b'0') {
                return Err(invalid());
            }
            let magnitude: i128 = digits.parse().map_err(|_| invalid())?;
            return signed_int(magnitude, negative).ok_or_else(invalid);
        }

        if !digits
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
        {
            return Err(invalid());
        }
        let mantissa_end = digits
            .find(|c: char| matches!(c, 'e' | 'E'))
            .unwrap_or(digits.len());
        if !digits[..mantissa_end].bytes().any(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let value: f64 = digits.parse().map_err(|_| invalid())?;
        Ok(ConfigValue::Float(if negative { -value } else { value }))
    }

    fn parse_name(&mut self) -> Result<ConfigValue, LiteralError> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
        match &self.src[start..self.pos] {
            "True" => Ok(ConfigValue::Bool(true)),
            "False" => Ok(ConfigValue::Bool(false)),
            "None" => Ok(ConfigValue::Null),
            other => Err(LiteralError::NotALiteral(other.to_string())),
        }
    }

    fn parse_string(&mut self) -> Result<String, LiteralError> {
        let quote = self.bump().ok_or(LiteralError::UnexpectedEnd)?;
        let mut out = String::new();
        loop {
            let offset = self.pos;
            match self.bump() {
                None | Some('\n') => return Err(LiteralError::UnexpectedEnd),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => self.parse_escape(offset, &mut out)?,
                Some(c) => out.push(c),
            }
        }
    }

    fn parse_escape(&mut self, offset: usize, out: &mut String) -> Result<(), LiteralError> {
        match self.bump().ok_or(LiteralError::UnexpectedEnd)? {
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            '0' => out.push('\0'),
            '\n' => {}
            'x' => out.push(self.parse_code_point(2, offset)?),
            'u' => out.push(self.parse_code_point(4, offset)?),
            'U' => out.push(self.parse_code_point(8, offset)?),
            other => {
                // unknown escapes are kept verbatim
                out.push('\\');
                out.push(other);
            }
        }
        Ok(())
    }

    fn parse_code_point(&mut self, width: usize, offset: usize) -> Result<char, LiteralError> {
        let hex = self
            .src
            .get(self.pos..self.pos + width)
            .ok_or(LiteralError::InvalidEscape(offset))?;
        let code = u32::from_str_radix(hex, 16).map_err(|_| LiteralError::InvalidEscape(offset))?;
        self.pos += width;
        char::from_u32(code).ok_or(LiteralError::InvalidEscape(offset))
    }
}

fn signed_int(magnitude: i128, negative: bool) -> Option<ConfigValue> {
    let value = if negative { -magnitude } else { magnitude };
    i64::try_from(value).ok().map(ConfigValue::Int)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(input: &str) -> ConfigValue {
        parse_literal(input).unwrap()
    }

    #[test]
    fn test_integers() {
        assert_eq!(lit("123"), ConfigValue::Int(123));
        assert_eq!(lit("-7"), ConfigValue::Int(-7));
        assert_eq!(lit("+7"), ConfigValue::Int(7));
        assert_eq!(lit("1_000"), ConfigValue::Int(1000));
        assert_eq!(lit("0"), ConfigValue::Int(0));
        assert_eq!(lit("0x1F"), ConfigValue::Int(31));
        assert_eq!(lit("0b101"), ConfigValue::Int(5));
        assert_eq!(lit("-9223372036854775808"), ConfigValue::Int(i64::MIN));
    }

    #[test]
    fn test_integer_rejections() {
        assert!(parse_literal("007").is_err());
        assert!(parse_literal("1__0").is_err());
        assert!(parse_literal("12abc").is_err());
        assert!(parse_literal("99999999999999999999").is_err());
    }

    #[test]
    fn test_floats() {
        assert_eq!(lit("0.5"), ConfigValue::Float(0.5));
        assert_eq!(lit("1."), ConfigValue::Float(1.0));
        assert_eq!(lit(".25"), ConfigValue::Float(0.25));
        assert_eq!(lit("1e-3"), ConfigValue::Float(0.001));
        assert_eq!(lit("-2.5E2"), ConfigValue::Float(-250.0));
        assert_eq!(lit("1e+20"), ConfigValue::Float(1e20));
        assert_eq!(lit("1.5e-07"), ConfigValue::Float(1.5e-7));
        assert!(parse_literal(".").is_err());
        assert!(parse_literal("1e").is_err());
        assert!(parse_literal("inf").is_err());
    }

    #[test]
    fn test_keywords() {
        assert_eq!(lit("True"), ConfigValue::Bool(true));
        assert_eq!(lit("False"), ConfigValue::Bool(false));
        assert_eq!(lit("None"), ConfigValue::Null);
        assert!(parse_literal("true").is_err());
        assert!(parse_literal("foo").is_err());
    }

    #[test]
    fn test_strings() {
        assert_eq!(lit("'abc'"), ConfigValue::from("abc"));
        assert_eq!(lit("\"a b\""), ConfigValue::from("a b"));
        assert_eq!(lit(r"'it\'s\n'"), ConfigValue::from("it's\n"));
        assert_eq!(lit(r"'\x41é'"), ConfigValue::from("Aé"));
        assert!(parse_literal("'unterminated").is_err());
    }

    #[test]
    fn test_lists() {
        assert_eq!(lit("[]"), ConfigValue::List(vec![]));
        assert_eq!(lit("[1, 2,]"), ConfigValue::list([1, 2]));
        assert_eq!(
            lit("[[1], ['a']]"),
            ConfigValue::list([ConfigValue::list([1]), ConfigValue::list(["a"])])
        );
        assert!(parse_literal("[1, 2").is_err());
    }

    #[test]
    fn test_tuples() {
        assert_eq!(lit("()"), ConfigValue::Tuple(vec![]));
        assert_eq!(lit("(1,)"), ConfigValue::tuple([1]));
        assert_eq!(lit("(1)"), ConfigValue::Int(1));
        assert_eq!(lit("(1, 2)"), ConfigValue::tuple([1, 2]));
        assert_eq!(lit("1, 2"), ConfigValue::tuple([1, 2]));
        assert_eq!(lit("3,"), ConfigValue::tuple([3]));
    }

    #[test]
    fn test_dicts() {
        let value = lit("{'A': 1, 'B': {'C': 'x'}}");
        let node = value.as_node("test").unwrap();
        assert_eq!(node.get("A"), Some(&ConfigValue::Int(1)));
        assert_eq!(node.lookup("B.C").unwrap(), &ConfigValue::from("x"));
        assert_eq!(parse_literal("{1: 2}"), Err(LiteralError::NonStringKey));
    }

    #[test]
    fn test_paths_and_words_are_not_literals() {
        assert!(parse_literal("foo/bar").is_err());
        assert!(parse_literal("./output").is_err());
        assert!(parse_literal("").is_err());
        assert!(parse_literal("1 + 2").is_err());
        assert!(parse_literal("__import__('os')").is_err());
    }

    #[test]
    fn test_depth_limit() {
        let deep = "[".repeat(MAX_DEPTH + 1) + &"]".repeat(MAX_DEPTH + 1);
        assert_eq!(parse_literal(&deep), Err(LiteralError::TooDeep));
        let ok = "[".repeat(MAX_DEPTH) + &"]".repeat(MAX_DEPTH);
        assert!(parse_literal(&ok).is_ok());
    }

    #[test]
    fn test_surrounding_whitespace() {
        assert_eq!(lit("  42 \n"), ConfigValue::Int(42));
    }
}
