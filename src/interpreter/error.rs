use std::{error::Error, fmt::Display};

use crate::{lexer::Span, typechecker::Type};

use super::value::Value;

/// A fatal evaluation error. These terminate the run with a diagnostic; they
/// are deliberately a different type from the control-flow signals in
/// [`Interrupt`] so the two can never be confused.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    UndefinedName { name: String, span: Span },
    AlreadyDefined { name: String, span: Span },
    ImmutableAssign { name: String, span: Span },
    InvalidAssignmentTarget { span: Span },
    NotAFunction { name: String, span: Span },
    NotAValue { name: String, span: Span },
    TypeMismatch { expected: Type, actual: Type, span: Span },
    UnsupportedOperand { op: String, type_id: Type, span: Span },
    Unprintable { type_id: Type, span: Span },
    DivisionByZero { span: Span },
    ArityMismatch { name: String, expected: usize, supplied: usize, span: Span },
    MissingReturn { name: String },
    MalformedLiteral { lexeme: String, span: Span },
    MissingBlockValue { span: Span },
    MisplacedBreak { span: Span },
    MisplacedContinue { span: Span },
    MisplacedReturn { span: Span },
    Io { message: String },
}

impl EvalError {
    fn span(&self) -> Option<&Span> {
        match self {
            EvalError::UndefinedName { span, .. }
            | EvalError::AlreadyDefined { span, .. }
            | EvalError::ImmutableAssign { span, .. }
            | EvalError::InvalidAssignmentTarget { span }
            | EvalError::NotAFunction { span, .. }
            | EvalError::NotAValue { span, .. }
            | EvalError::TypeMismatch { span, .. }
            | EvalError::UnsupportedOperand { span, .. }
            | EvalError::Unprintable { span, .. }
            | EvalError::DivisionByZero { span }
            | EvalError::ArityMismatch { span, .. }
            | EvalError::MalformedLiteral { span, .. }
            | EvalError::MissingBlockValue { span }
            | EvalError::MisplacedBreak { span }
            | EvalError::MisplacedContinue { span }
            | EvalError::MisplacedReturn { span } => Some(span),
            EvalError::MissingReturn { .. } | EvalError::Io { .. } => None,
        }
    }

    fn message(&self) -> String {
        match self {
            EvalError::UndefinedName { name, .. } => format!("undefined name '{name}'"),
            EvalError::AlreadyDefined { name, .. } => {
                format!("'{name}' is already declared in this scope")
            }
            EvalError::ImmutableAssign { name, .. } => {
                format!("cannot assign to '{name}', it was declared 'const'")
            }
            EvalError::InvalidAssignmentTarget { .. } => {
                "left hand side of an assignment must be a mutable name".into()
            }
            EvalError::NotAFunction { name, .. } => format!("'{name}' is not a function"),
            EvalError::NotAValue { name, .. } => format!("function '{name}' is not a value"),
            EvalError::TypeMismatch {
                expected, actual, ..
            } => format!("expected a value of type '{expected:?}' but got '{actual:?}'"),
            EvalError::UnsupportedOperand { op, type_id, .. } => {
                format!("operator '{op}' does not support operands of type '{type_id:?}'")
            }
            EvalError::Unprintable { type_id, .. } => {
                format!("cannot print a value of type '{type_id:?}'")
            }
            EvalError::DivisionByZero { .. } => "integer division by zero".into(),
            EvalError::ArityMismatch {
                name,
                expected,
                supplied,
                ..
            } => format!("function '{name}' takes {expected} argument(s) but {supplied} were supplied"),
            EvalError::MissingReturn { name } => {
                format!("function '{name}' finished without returning a value")
            }
            EvalError::MalformedLiteral { lexeme, .. } => format!("malformed literal '{lexeme}'"),
            EvalError::MissingBlockValue { .. } => {
                "a block used as an expression must end in an expression statement".into()
            }
            EvalError::MisplacedBreak { .. } => "'break' outside of a while loop".into(),
            EvalError::MisplacedContinue { .. } => "'continue' outside of a while loop".into(),
            EvalError::MisplacedReturn { .. } => "'return' outside of a function".into(),
            EvalError::Io { message } => format!("output failed: {message}"),
        }
    }
}

impl Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.span() {
            Some(span) => f.write_fmt(format_args!("line {}: {}", span.line, self.message())),
            None => f.write_str(&self.message()),
        }
    }
}

impl Error for EvalError {}

/// Non-local exit from the evaluator. `break`, `continue` and `return` unwind
/// through `?` just like errors do, but carry their own variants so the
/// absorbing construct can pattern-match exactly the signal it owns.
#[derive(Debug, Clone, PartialEq)]
pub enum Interrupt {
    Break(Span),
    Continue(Span),
    Return(Value, Span),
    Error(EvalError),
}

impl From<EvalError> for Interrupt {
    fn from(error: EvalError) -> Self {
        Interrupt::Error(error)
    }
}

impl Interrupt {
    /// Turn a signal that escaped all the way out of a construct that should
    /// have absorbed it into a proper error.
    pub fn escalate(self) -> EvalError {
        match self {
            Interrupt::Break(span) => EvalError::MisplacedBreak { span },
            Interrupt::Continue(span) => EvalError::MisplacedContinue { span },
            Interrupt::Return(_, span) => EvalError::MisplacedReturn { span },
            Interrupt::Error(error) => error,
        }
    }
}
