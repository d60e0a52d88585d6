use std::fmt::Display;

use crate::typechecker::Type;

/// A runtime value, tagged with its type. Every operation re-checks the tags
/// so that even an unchecked tree fails with a diagnostic instead of
/// undefined behavior.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Char(char),
    /// Result of calling a function without a return type. Never printable
    /// and never storable; the checker keeps it out of value positions.
    Void,
}

impl Value {
    pub fn type_id(&self) -> Type {
        match self {
            Value::Int(_) => Type::Integer,
            Value::Float(_) => Type::FloatingPoint,
            Value::Bool(_) => Type::Boolean,
            Value::Char(_) => Type::Character,
            Value::Void => Type::Void,
        }
    }

    /// The zero value a `var` without initializer starts out with.
    pub fn zero(type_id: &Type) -> Option<Value> {
        match type_id {
            Type::Integer => Some(Value::Int(0)),
            Type::FloatingPoint => Some(Value::Float(0.0)),
            Type::Boolean => Some(Value::Bool(false)),
            Type::Character => Some(Value::Char('\0')),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Int(value) => write!(f, "{value}"),
            Value::Float(value) => write!(f, "{value}"),
            Value::Bool(value) => write!(f, "{}", if *value { "true" } else { "false" }),
            Value::Char(value) => write!(f, "{value}"),
            Value::Void => write!(f, "void"),
        }
    }
}

/// Decode an integer literal lexeme.
pub fn int_value(lexeme: &str) -> Result<i64, String> {
    lexeme
        .parse::<i64>()
        .map_err(|_| format!("invalid integer literal '{lexeme}'"))
}

/// Decode a float literal lexeme.
pub fn float_value(lexeme: &str) -> Result<f64, String> {
    lexeme
        .parse::<f64>()
        .map_err(|_| format!("invalid float literal '{lexeme}'"))
}

/// Decode a character literal lexeme, quotes included, resolving the
/// two-character escapes.
pub fn char_value(lexeme: &str) -> Result<char, String> {
    let error = || format!("invalid character literal {lexeme}");

    let inner = lexeme
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
        .ok_or_else(error)?;

    // `\0` is not covered by the unescape crate
    if inner == "\\0" {
        return Ok('\0');
    }

    let unescaped = unescape::unescape(inner).ok_or_else(error)?;

    let mut chars = unescaped.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(error()),
    }
}

/// Floor division, the semantics of the integer `/` operator.
pub fn floor_div(lhs: i64, rhs: i64) -> i64 {
    let quotient = lhs.wrapping_div(rhs);
    if lhs.wrapping_rem(rhs) != 0 && (lhs < 0) != (rhs < 0) {
        quotient - 1
    } else {
        quotient
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_value_plain_and_escaped() {
        assert_eq!(char_value("'a'"), Ok('a'));
        assert_eq!(char_value(r"'\n'"), Ok('\n'));
        assert_eq!(char_value(r"'\t'"), Ok('\t'));
        assert_eq!(char_value(r"'\\'"), Ok('\\'));
        assert_eq!(char_value(r"'\''"), Ok('\''));
        assert_eq!(char_value(r"'\0'"), Ok('\0'));
    }

    #[test]
    fn test_char_value_rejects_garbage() {
        assert!(char_value("'ab'").is_err());
        assert!(char_value("x").is_err());
    }

    #[test]
    fn test_floor_div_rounds_toward_negative_infinity() {
        assert_eq!(floor_div(7, 2), 3);
        assert_eq!(floor_div(-7, 2), -4);
        assert_eq!(floor_div(7, -2), -4);
        assert_eq!(floor_div(-7, -2), 3);
        assert_eq!(floor_div(6, 3), 2);
        assert_eq!(floor_div(-6, 3), -2);
    }

    #[test]
    fn test_display_formatting() {
        assert_eq!(Value::Int(-42).to_string(), "-42");
        assert_eq!(Value::Float(25.13272).to_string(), "25.13272");
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::Char('x').to_string(), "x");
    }

    #[test]
    fn test_zero_values() {
        assert_eq!(Value::zero(&Type::Integer), Some(Value::Int(0)));
        assert_eq!(Value::zero(&Type::FloatingPoint), Some(Value::Float(0.0)));
        assert_eq!(Value::zero(&Type::Boolean), Some(Value::Bool(false)));
        assert_eq!(Value::zero(&Type::Character), Some(Value::Char('\0')));
        assert_eq!(Value::zero(&Type::Void), None);
    }
}
