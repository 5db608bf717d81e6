//! Type expressions as written in declarations: `int`, `T`, `IList<T>`,
//! `T[]`, `S?`, and any nesting of those.

use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeExpr {
    Name {
        name: String,
        args: Vec<TypeExpr>,
    },
    Array(Box<TypeExpr>),
    Nullable(Box<TypeExpr>),
}

/// A type expression that could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeExprError {
    pub input: String,
    /// Byte offset of the failure.
    pub position: usize,
    pub message: &'static str,
}

impl fmt::Display for TypeExprError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at offset {}", self.message, self.position)
    }
}

impl std::error::Error for TypeExprError {}

impl TypeExpr {
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name {
            name: name.into(),
            args: Vec::new(),
        }
    }

    pub fn parse(input: &str) -> Result<Self, TypeExprError> {
        let mut parser = Parser {
            input,
            bytes: input.as_bytes(),
            pos: 0,
        };
        let expr = parser.parse_type()?;
        parser.skip_ws();
        if parser.pos != parser.bytes.len() {
            return Err(parser.error("unexpected trailing input"));
        }
        Ok(expr)
    }
}

impl FromStr for TypeExpr {
    type Err = TypeExprError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            Self::Array(element) => write!(f, "{element}[]"),
            Self::Nullable(inner) => write!(f, "{inner}?"),
        }
    }
}

struct Parser<'a> {
    input: &'a str,
    bytes: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, message: &'static str) -> TypeExprError {
        TypeExprError {
            input: self.input.to_string(),
            position: self.pos,
            message,
        }
    }

    fn skip_ws(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, byte: u8) -> bool {
        self.skip_ws();
        if self.bytes.get(self.pos) == Some(&byte) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_type(&mut self) -> Result<TypeExpr, TypeExprError> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.eat(b'[') {
                if !self.eat(b']') {
                    return Err(self.error("expected ']'"));
                }
                expr = TypeExpr::Array(Box::new(expr));
            } else if self.eat(b'?') {
                expr = TypeExpr::Nullable(Box::new(expr));
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_primary(&mut self) -> Result<TypeExpr, TypeExprError> {
        self.skip_ws();
        let start = self.pos;
        while self.pos < self.bytes.len()
            && (self.bytes[self.pos].is_ascii_alphanumeric()
                || matches!(self.bytes[self.pos], b'_' | b'.'))
        {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(self.error("expected a type name"));
        }
        if self.bytes[start].is_ascii_digit() {
            self.pos = start;
            return Err(self.error("type names cannot start with a digit"));
        }
        let name = self.input[start..self.pos].to_string();
        let mut args = Vec::new();
        if self.eat(b'<') {
            loop {
                args.push(self.parse_type()?);
                if self.eat(b',') {
                    continue;
                }
                if self.eat(b'>') {
                    break;
                }
                return Err(self.error("expected ',' or '>'"));
            }
        }
        Ok(TypeExpr::Name { name, args })
    }
}

#[cfg(test)]
#[path = "tests/type_expr_tests.rs"]
mod tests;
