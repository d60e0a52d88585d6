use std::{error::Error, fmt::Display};

use crate::lexer::Span;

use super::types::Type;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeCheckError {
    TypeMismatch(TypeMismatch, Span),
    UndefinedVariable(UndefinedVariable, Span),
    UndefinedFunction(UndefinedFunction, Span),
    UndefinedType(UndefinedType, Span),
    Redefinition(Redefinition, Span),
    ImmutableReassign(ImmutableReassign, Span),
    InvalidAssignmentTarget(Span),
    UnsupportedOperand(UnsupportedOperand, Span),
    ArityMismatch(ArityMismatch, Span),
    MissingTypeAnnotation(MissingTypeAnnotation, Span),
    MisplacedStatement(MisplacedStatement, Span),
    MissingBlockValue(Span),
    UnprintableValue(UnprintableValue, Span),
    InvalidBindingType(InvalidBindingType, Span),
}

impl TypeCheckError {
    pub fn span(&self) -> Span {
        match self {
            TypeCheckError::TypeMismatch(_, span) => span.clone(),
            TypeCheckError::UndefinedVariable(_, span) => span.clone(),
            TypeCheckError::UndefinedFunction(_, span) => span.clone(),
            TypeCheckError::UndefinedType(_, span) => span.clone(),
            TypeCheckError::Redefinition(_, span) => span.clone(),
            TypeCheckError::ImmutableReassign(_, span) => span.clone(),
            TypeCheckError::InvalidAssignmentTarget(span) => span.clone(),
            TypeCheckError::UnsupportedOperand(_, span) => span.clone(),
            TypeCheckError::ArityMismatch(_, span) => span.clone(),
            TypeCheckError::MissingTypeAnnotation(_, span) => span.clone(),
            TypeCheckError::MisplacedStatement(_, span) => span.clone(),
            TypeCheckError::MissingBlockValue(span) => span.clone(),
            TypeCheckError::UnprintableValue(_, span) => span.clone(),
            TypeCheckError::InvalidBindingType(_, span) => span.clone(),
        }
    }

    fn message(&self) -> String {
        match self {
            TypeCheckError::TypeMismatch(e, _) => e.to_string(),
            TypeCheckError::UndefinedVariable(e, _) => e.to_string(),
            TypeCheckError::UndefinedFunction(e, _) => e.to_string(),
            TypeCheckError::UndefinedType(e, _) => e.to_string(),
            TypeCheckError::Redefinition(e, _) => e.to_string(),
            TypeCheckError::ImmutableReassign(e, _) => e.to_string(),
            TypeCheckError::InvalidAssignmentTarget(_) => {
                "left hand side of an assignment must be a mutable name".into()
            }
            TypeCheckError::UnsupportedOperand(e, _) => e.to_string(),
            TypeCheckError::ArityMismatch(e, _) => e.to_string(),
            TypeCheckError::MissingTypeAnnotation(e, _) => e.to_string(),
            TypeCheckError::MisplacedStatement(e, _) => e.to_string(),
            TypeCheckError::MissingBlockValue(_) => {
                "a block used as an expression must end in an expression statement".into()
            }
            TypeCheckError::UnprintableValue(e, _) => e.to_string(),
            TypeCheckError::InvalidBindingType(e, _) => e.to_string(),
        }
    }
}

impl Display for TypeCheckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("line {}: {}", self.span().line, self.message()))
    }
}

impl Error for TypeCheckError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeMismatch {
    pub expected: Type,
    pub actual: Type,
}

impl Display for TypeMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "expected type '{:?}' but got '{:?}'",
            self.expected, self.actual
        ))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndefinedVariable {
    pub name: String,
}

impl Display for UndefinedVariable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("undefined name '{}'", self.name))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndefinedFunction {
    pub name: String,
}

impl Display for UndefinedFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("call to undefined function '{}'", self.name))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UndefinedType {
    pub name: String,
}

impl Display for UndefinedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("unknown type '{}'", self.name))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redefinition {
    pub name: String,
}

impl Display for Redefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "'{}' is already declared in this scope",
            self.name
        ))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImmutableReassign {
    pub name: String,
}

impl Display for ImmutableReassign {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "cannot assign to '{}', it was declared 'const'",
            self.name
        ))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnsupportedOperand {
    pub op: String,
    pub type_id: Type,
}

impl Display for UnsupportedOperand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "operator '{}' does not support operands of type '{:?}'",
            self.op, self.type_id
        ))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArityMismatch {
    pub name: String,
    pub expected: usize,
    pub actual: usize,
}

impl Display for ArityMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "function '{}' takes {} argument(s) but {} were supplied",
            self.name, self.expected, self.actual
        ))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissingTypeAnnotation {
    pub name: String,
}

impl Display for MissingTypeAnnotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "'{}' needs a type annotation or an initializer",
            self.name
        ))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MisplacedStatement {
    pub keyword: &'static str,
    pub requirement: &'static str,
}

impl Display for MisplacedStatement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "'{}' is only allowed {}",
            self.keyword, self.requirement
        ))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidBindingType {
    pub name: String,
    pub type_id: Type,
}

impl Display for InvalidBindingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!(
            "cannot bind '{}' to a value of type '{:?}'",
            self.name, self.type_id
        ))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnprintableValue {
    pub type_id: Type,
}

impl Display for UnprintableValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("cannot print a value of type '{:?}'", self.type_id))
    }
}
