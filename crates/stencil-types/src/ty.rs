//! Semantic type definitions
//!
//! Types are compared structurally. `Unknown` stands for "not known until
//! render time" and is compatible with everything in both directions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// A compile-time type used in function signatures
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SemanticType {
    /// Not statically known (`?`)
    Unknown,
    /// Any value, including null (`any`)
    Any,
    /// The `null` type
    Null,
    /// The `bool` type
    Bool,
    /// The `int` type (64-bit signed integer)
    Int,
    /// The `float` type (IEEE 754 double)
    Float,
    /// The `number` type, the union of `int` and `float`
    Number,
    /// The `string` type
    String,
    /// `list<T>`
    List(Box<SemanticType>),
    /// `map<K, V>`
    Map(Box<SemanticType>, Box<SemanticType>),
}

impl SemanticType {
    /// `list<element>`
    pub fn list_of(element: SemanticType) -> Self {
        SemanticType::List(Box::new(element))
    }

    /// `map<key, value>`
    pub fn map_of(key: SemanticType, value: SemanticType) -> Self {
        SemanticType::Map(Box::new(key), Box::new(value))
    }

    /// Is this `int`, `float` or `number`?
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            SemanticType::Int | SemanticType::Float | SemanticType::Number
        )
    }

    /// Can a value of type `actual` be passed where `self` is declared?
    pub fn is_assignable_from(&self, actual: &SemanticType) -> bool {
        match (self, actual) {
            (SemanticType::Unknown, _) | (_, SemanticType::Unknown) => true,
            (SemanticType::Any, _) => true,
            (SemanticType::Number, other) => other.is_numeric(),
            (SemanticType::List(expected), SemanticType::List(found)) => {
                expected.is_assignable_from(found)
            }
            (SemanticType::Map(ek, ev), SemanticType::Map(fk, fv)) => {
                ek.is_assignable_from(fk) && ev.is_assignable_from(fv)
            }
            (expected, found) => expected == found,
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticType::Unknown => write!(f, "?"),
            SemanticType::Any => write!(f, "any"),
            SemanticType::Null => write!(f, "null"),
            SemanticType::Bool => write!(f, "bool"),
            SemanticType::Int => write!(f, "int"),
            SemanticType::Float => write!(f, "float"),
            SemanticType::Number => write!(f, "number"),
            SemanticType::String => write!(f, "string"),
            SemanticType::List(element) => write!(f, "list<{}>", element),
            SemanticType::Map(key, value) => write!(f, "map<{}, {}>", key, value),
        }
    }
}

impl FromStr for SemanticType {
    type Err = TypeError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parser = TypeParser { input, pos: 0 };
        let ty = parser.parse_type();
        parser.skip_ws();
        match ty {
            Some(ty) if parser.pos == input.len() => Ok(ty),
            _ => Err(TypeError::Parse {
                input: input.to_string(),
            }),
        }
    }
}

/// Recursive-descent parser for signature annotations such as `list<int>`
struct TypeParser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> TypeParser<'a> {
    fn skip_ws(&mut self) {
        while self.rest().starts_with(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn eat(&mut self, token: char) -> bool {
        self.skip_ws();
        if self.rest().starts_with(token) {
            self.pos += token.len_utf8();
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Option<&'a str> {
        self.skip_ws();
        let rest = self.rest();
        let len = rest
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '?'))
            .unwrap_or(rest.len());
        if len == 0 {
            return None;
        }
        self.pos += len;
        Some(&rest[..len])
    }

    fn parse_type(&mut self) -> Option<SemanticType> {
        let ty = match self.ident()? {
            "?" => SemanticType::Unknown,
            "any" => SemanticType::Any,
            "null" => SemanticType::Null,
            "bool" => SemanticType::Bool,
            "int" => SemanticType::Int,
            "float" => SemanticType::Float,
            "number" => SemanticType::Number,
            "string" => SemanticType::String,
            "list" => {
                if !self.eat('<') {
                    return None;
                }
                let element = self.parse_type()?;
                if !self.eat('>') {
                    return None;
                }
                SemanticType::list_of(element)
            }
            "map" => {
                if !self.eat('<') {
                    return None;
                }
                let key = self.parse_type()?;
                if !self.eat(',') {
                    return None;
                }
                let value = self.parse_type()?;
                if !self.eat('>') {
                    return None;
                }
                SemanticType::map_of(key, value)
            }
            _ => return None,
        };
        Some(ty)
    }
}
