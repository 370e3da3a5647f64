//! Dynamically typed property values
//!
//! Style properties mix types freely (`color = "r"`, `linewidth = 2`), so
//! cycles loaded from configuration or parsed from expressions hold `Value`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single property value as found in a style mapping.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean flag
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// String (colors, line styles, markers)
    Str(String),
}

impl Value {
    /// Short type name used in error messages
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
        }
    }

    /// Borrow the string payload, if any
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }
}

/// Bare rendering, used for tables.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

/// Literal rendering: strings are quoted, floats keep their decimal point.
/// A cycle printed with these literals parses back as an expression.
impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s:?}"),
            other => fmt::Display::fmt(other, f),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Self::Str(c.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_bare() {
        assert_eq!(Value::from("r").to_string(), "r");
        assert_eq!(Value::from(3).to_string(), "3");
        assert_eq!(Value::from(1.5).to_string(), "1.5");
        assert_eq!(Value::from(true).to_string(), "true");
    }

    #[test]
    fn test_debug_is_literal() {
        assert_eq!(format!("{:?}", Value::from("r")), "\"r\"");
        assert_eq!(format!("{:?}", Value::from(2.0)), "2.0");
        assert_eq!(format!("{:?}", Value::from(-4)), "-4");
    }

    #[test]
    fn test_deserialize_mixed_array() {
        let values: Vec<Value> = serde_json::from_str(r#"["r", 2, 0.5, false]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Value::from("r"),
                Value::from(2),
                Value::from(0.5),
                Value::from(false)
            ]
        );
    }

    #[test]
    fn test_type_name() {
        assert_eq!(Value::from('x').type_name(), "str");
        assert_eq!(Value::from(7_i64).type_name(), "int");
        assert_eq!(Value::from('x').as_str(), Some("x"));
        assert_eq!(Value::from(7).as_str(), None);
    }
}
