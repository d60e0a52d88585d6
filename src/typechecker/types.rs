use crate::parser::ast::TypeName;

/// Canonical semantic type used by the checker, the interpreter and the code
/// generator. The language only has scalar values; `Void` marks statements
/// and value-less functions, `Function` carries a callable's signature.
#[derive(Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Type {
    Integer,
    FloatingPoint,
    Boolean,
    Character,
    Void,
    Function {
        params: Vec<Type>,
        return_value: Box<Type>,
    },
}

impl Type {
    /// Resolve a written annotation to a type, if the name denotes one.
    pub fn from_type_name(type_name: &TypeName) -> Option<Type> {
        match type_name.name.as_str() {
            "int" => Some(Type::Integer),
            "float" => Some(Type::FloatingPoint),
            "bool" => Some(Type::Boolean),
            "char" => Some(Type::Character),
            _ => None,
        }
    }

    /// Types valid for `+ - * /` and unary `-`/`+`.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Integer | Type::FloatingPoint)
    }

    /// Types valid for the ordering comparisons.
    pub fn is_ordered(&self) -> bool {
        matches!(self, Type::Integer | Type::FloatingPoint | Type::Character)
    }

    /// Types a binding (or a printed value) may have.
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            Type::Integer | Type::FloatingPoint | Type::Boolean | Type::Character
        )
    }
}

impl std::fmt::Debug for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer => write!(f, "int"),
            Self::FloatingPoint => write!(f, "float"),
            Self::Boolean => write!(f, "bool"),
            Self::Character => write!(f, "char"),
            Self::Void => write!(f, "void"),
            Self::Function {
                params,
                return_value,
            } => f.write_fmt(format_args!(
                "func({}) {return_value:?}",
                params
                    .iter()
                    .map(|param| format!("{param:?}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Span;

    fn type_name(name: &str) -> TypeName {
        TypeName {
            name: name.into(),
            position: Span::default(),
        }
    }

    #[test]
    fn test_primitive_type_names() {
        assert_eq!(Type::from_type_name(&type_name("int")), Some(Type::Integer));
        assert_eq!(
            Type::from_type_name(&type_name("float")),
            Some(Type::FloatingPoint)
        );
        assert_eq!(
            Type::from_type_name(&type_name("bool")),
            Some(Type::Boolean)
        );
        assert_eq!(
            Type::from_type_name(&type_name("char")),
            Some(Type::Character)
        );
    }

    #[test]
    fn test_invalid_type_names() {
        assert_eq!(Type::from_type_name(&type_name("i64")), None);
        assert_eq!(Type::from_type_name(&type_name("string")), None);
    }

    #[test]
    fn test_operand_classes() {
        assert!(Type::Integer.is_numeric());
        assert!(Type::FloatingPoint.is_numeric());
        assert!(!Type::Boolean.is_numeric());
        assert!(Type::Character.is_ordered());
        assert!(!Type::Boolean.is_ordered());
        assert!(!Type::Void.is_scalar());
    }
}
