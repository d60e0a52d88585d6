//! Type checking for Wabbit.
//!
//! A single walk over the parsed tree which either rejects a statement with a
//! [`TypeCheckError`] or re-produces it with every node annotated with its
//! [`Type`]. Errors accumulate across top-level statements so several problems
//! surface in one run; execution is refused if any were reported.
//!
//! Function signatures are registered in a shallow pre-pass, so calls may
//! appear before the definition they refer to.

mod context;
mod error;
mod scope;
mod types;

pub use context::*;
pub use error::*;
pub use scope::*;
pub use types::*;

use crate::parser::ast::{
    Assignment, Binary, Block, Bool, Call, Character, Constant, Expression, Function, Id, If,
    Logical, Num, Parameter, Prefix, PrefixOperator, Print, Relation, Return, Statement, TypeName,
    Variable, WhileLoop,
};

/// Type annotation attached to every AST node by the checker.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TypeInfo {
    pub type_id: Type,
}

impl From<Type> for TypeInfo {
    fn from(type_id: Type) -> Self {
        TypeInfo { type_id }
    }
}

pub type TypeResult<T> = Result<T, TypeCheckError>;

/// Trait for nodes which can be checked, yielding their typed counterpart.
pub trait TypeCheckable {
    type Checked;

    fn check(self, ctx: &mut Context) -> TypeResult<Self::Checked>;
}

/// Check a whole program. On success every statement is annotated; on failure
/// all collected diagnostics are returned.
pub fn check_program(
    statements: Vec<Statement<()>>,
) -> Result<Vec<Statement<TypeInfo>>, Vec<TypeCheckError>> {
    let mut ctx = Context::default();
    let mut errors = vec![];

    // shallow pre-pass: register top-level function signatures
    for statement in &statements {
        if let Statement::Function(function) = statement {
            let Ok(signature) = function_signature(function) else {
                // the malformed signature is reported when the definition
                // itself is checked
                continue;
            };
            if ctx.scope.add_function(&function.id.name, signature).is_err() {
                errors.push(TypeCheckError::Redefinition(
                    Redefinition {
                        name: function.id.name.clone(),
                    },
                    function.id.position.clone(),
                ));
            }
        }
    }

    let mut checked = vec![];
    for statement in statements {
        match statement.check(&mut ctx) {
            Ok(statement) => checked.push(statement),
            Err(e) => errors.push(e),
        }
    }

    if errors.is_empty() {
        Ok(checked)
    } else {
        Err(errors)
    }
}

fn resolve_type_name(type_name: &TypeName) -> TypeResult<Type> {
    Type::from_type_name(type_name).ok_or_else(|| {
        TypeCheckError::UndefinedType(
            UndefinedType {
                name: type_name.name.clone(),
            },
            type_name.position.clone(),
        )
    })
}

fn function_signature(function: &Function<()>) -> TypeResult<Type> {
    let mut params = vec![];
    for parameter in &function.parameters {
        params.push(resolve_type_name(&parameter.type_name)?);
    }

    let return_value = match &function.return_type {
        Some(type_name) => resolve_type_name(type_name)?,
        None => Type::Void,
    };

    Ok(Type::Function {
        params,
        return_value: Box::new(return_value),
    })
}

/// Check the statements of a block in a nested scope. The block's type is the
/// type of its trailing expression statement, or `Void` when it does not end
/// in one; whether that matters depends on the position the block appears in.
fn check_block(block: Block<()>, ctx: &mut Context) -> TypeResult<Block<TypeInfo>> {
    let Block {
        statements,
        position,
        ..
    } = block;

    ctx.scope.enter_scope();

    let mut checked = vec![];
    for statement in statements {
        match statement.check(ctx) {
            Ok(statement) => checked.push(statement),
            Err(e) => {
                ctx.scope.exit_scope();
                return Err(e);
            }
        }
    }

    ctx.scope.exit_scope();

    let type_id = match checked.last() {
        Some(Statement::Expression(expression)) => expression.get_info().type_id,
        _ => Type::Void,
    };

    Ok(Block {
        statements: checked,
        info: type_id.into(),
        position,
    })
}

fn check_function(function: Function<()>, ctx: &mut Context) -> TypeResult<Function<TypeInfo>> {
    let Function {
        id,
        parameters,
        return_type,
        block,
        position,
        ..
    } = function;

    if ctx.scope.depth() != 1 || ctx.function_return.is_some() {
        return Err(TypeCheckError::MisplacedStatement(
            MisplacedStatement {
                keyword: "func",
                requirement: "at the top level of the program",
            },
            position,
        ));
    }

    let return_value = match &return_type {
        Some(type_name) => resolve_type_name(type_name)?,
        None => Type::Void,
    };

    ctx.scope.enter_scope();

    let result = (|ctx: &mut Context| {
        let mut checked_parameters = vec![];
        for parameter in parameters {
            checked_parameters.push(check_parameter(parameter, ctx)?);
        }

        let saved_return = ctx.function_return.replace(return_value.clone());
        let saved_loop_depth = std::mem::take(&mut ctx.loop_depth);

        let block = check_block(block, ctx);

        ctx.function_return = saved_return;
        ctx.loop_depth = saved_loop_depth;

        Ok((checked_parameters, block?))
    })(ctx);

    ctx.scope.exit_scope();

    let (checked_parameters, block) = result?;

    let signature = Type::Function {
        params: checked_parameters
            .iter()
            .map(|parameter| parameter.info.type_id.clone())
            .collect(),
        return_value: Box::new(return_value),
    };

    Ok(Function {
        id: Id {
            name: id.name,
            info: signature.clone().into(),
            position: id.position,
        },
        parameters: checked_parameters,
        return_type,
        block,
        info: signature.into(),
        position,
    })
}

fn check_parameter(parameter: Parameter<()>, ctx: &mut Context) -> TypeResult<Parameter<TypeInfo>> {
    let Parameter {
        id,
        type_name,
        default,
        position,
        ..
    } = parameter;

    let type_id = resolve_type_name(&type_name)?;

    let default = match default {
        Some(default) => {
            let default = default.check(ctx)?;
            let default_type = default.get_info().type_id;
            if default_type != type_id {
                return Err(TypeCheckError::TypeMismatch(
                    TypeMismatch {
                        expected: type_id,
                        actual: default_type,
                    },
                    default.position(),
                ));
            }
            Some(default)
        }
        None => None,
    };

    if ctx.scope.add_variable(&id.name, type_id.clone(), true).is_err() {
        return Err(TypeCheckError::Redefinition(
            Redefinition {
                name: id.name.clone(),
            },
            id.position.clone(),
        ));
    }

    Ok(Parameter {
        id: Id {
            name: id.name,
            info: type_id.clone().into(),
            position: id.position,
        },
        type_name,
        default,
        info: type_id.into(),
        position,
    })
}

impl TypeCheckable for Statement<()> {
    type Checked = Statement<TypeInfo>;

    fn check(self, ctx: &mut Context) -> TypeResult<Self::Checked> {
        match self {
            Statement::Expression(expression) => {
                Ok(Statement::Expression(expression.check(ctx)?))
            }
            Statement::Print(print) => {
                let Print {
                    value, position, ..
                } = print;

                let value = value.check(ctx)?;
                let type_id = value.get_info().type_id;
                if !type_id.is_scalar() {
                    return Err(TypeCheckError::UnprintableValue(
                        UnprintableValue { type_id },
                        value.position(),
                    ));
                }

                Ok(Statement::Print(Print {
                    value,
                    info: Type::Void.into(),
                    position,
                }))
            }
            Statement::Constant(constant) => {
                let Constant {
                    id,
                    type_name,
                    value,
                    position,
                    ..
                } = constant;

                let value = value.check(ctx)?;
                let value_type = value.get_info().type_id;

                if !value_type.is_scalar() {
                    return Err(TypeCheckError::InvalidBindingType(
                        InvalidBindingType {
                            name: id.name.clone(),
                            type_id: value_type,
                        },
                        value.position(),
                    ));
                }

                if let Some(type_name) = &type_name {
                    let declared = resolve_type_name(type_name)?;
                    if declared != value_type {
                        return Err(TypeCheckError::TypeMismatch(
                            TypeMismatch {
                                expected: declared,
                                actual: value_type,
                            },
                            value.position(),
                        ));
                    }
                }

                if ctx
                    .scope
                    .add_variable(&id.name, value_type.clone(), false)
                    .is_err()
                {
                    return Err(TypeCheckError::Redefinition(
                        Redefinition {
                            name: id.name.clone(),
                        },
                        id.position.clone(),
                    ));
                }

                Ok(Statement::Constant(Constant {
                    id: Id {
                        name: id.name,
                        info: value_type.clone().into(),
                        position: id.position,
                    },
                    type_name,
                    value,
                    info: value_type.into(),
                    position,
                }))
            }
            Statement::Variable(variable) => {
                let Variable {
                    id,
                    type_name,
                    value,
                    position,
                    ..
                } = variable;

                if type_name.is_none() && value.is_none() {
                    return Err(TypeCheckError::MissingTypeAnnotation(
                        MissingTypeAnnotation {
                            name: id.name.clone(),
                        },
                        position,
                    ));
                }

                let declared = match &type_name {
                    Some(type_name) => Some(resolve_type_name(type_name)?),
                    None => None,
                };

                let value = match value {
                    Some(value) => Some(value.check(ctx)?),
                    None => None,
                };

                let binding_type = match (&declared, &value) {
                    (Some(declared), Some(value)) => {
                        let value_type = value.get_info().type_id;
                        if *declared != value_type {
                            return Err(TypeCheckError::TypeMismatch(
                                TypeMismatch {
                                    expected: declared.clone(),
                                    actual: value_type,
                                },
                                value.position(),
                            ));
                        }
                        declared.clone()
                    }
                    (Some(declared), None) => declared.clone(),
                    (None, Some(value)) => value.get_info().type_id,
                    (None, None) => unreachable!("rejected above"),
                };

                if !binding_type.is_scalar() {
                    return Err(TypeCheckError::InvalidBindingType(
                        InvalidBindingType {
                            name: id.name.clone(),
                            type_id: binding_type,
                        },
                        position,
                    ));
                }

                if ctx
                    .scope
                    .add_variable(&id.name, binding_type.clone(), true)
                    .is_err()
                {
                    return Err(TypeCheckError::Redefinition(
                        Redefinition {
                            name: id.name.clone(),
                        },
                        id.position.clone(),
                    ));
                }

                Ok(Statement::Variable(Variable {
                    id: Id {
                        name: id.name,
                        info: binding_type.clone().into(),
                        position: id.position,
                    },
                    type_name,
                    value,
                    info: binding_type.into(),
                    position,
                }))
            }
            Statement::If(if_statement) => {
                let If {
                    condition,
                    if_block,
                    else_block,
                    position,
                    ..
                } = if_statement;

                let condition = check_condition(condition, ctx)?;
                let if_block = check_block(if_block, ctx)?;
                let else_block = match else_block {
                    Some(block) => Some(check_block(block, ctx)?),
                    None => None,
                };

                Ok(Statement::If(If {
                    condition,
                    if_block,
                    else_block,
                    info: Type::Void.into(),
                    position,
                }))
            }
            Statement::WhileLoop(while_loop) => {
                let WhileLoop {
                    condition,
                    block,
                    position,
                    ..
                } = while_loop;

                let condition = check_condition(condition, ctx)?;

                ctx.loop_depth += 1;
                let block = check_block(block, ctx);
                ctx.loop_depth -= 1;

                Ok(Statement::WhileLoop(WhileLoop {
                    condition,
                    block: block?,
                    info: Type::Void.into(),
                    position,
                }))
            }
            Statement::Break(span) => {
                if ctx.loop_depth == 0 {
                    return Err(TypeCheckError::MisplacedStatement(
                        MisplacedStatement {
                            keyword: "break",
                            requirement: "inside a while loop",
                        },
                        span,
                    ));
                }
                Ok(Statement::Break(span))
            }
            Statement::Continue(span) => {
                if ctx.loop_depth == 0 {
                    return Err(TypeCheckError::MisplacedStatement(
                        MisplacedStatement {
                            keyword: "continue",
                            requirement: "inside a while loop",
                        },
                        span,
                    ));
                }
                Ok(Statement::Continue(span))
            }
            Statement::Return(return_statement) => {
                let Return {
                    value, position, ..
                } = return_statement;

                let Some(expected) = ctx.function_return.clone() else {
                    return Err(TypeCheckError::MisplacedStatement(
                        MisplacedStatement {
                            keyword: "return",
                            requirement: "inside a function body",
                        },
                        position,
                    ));
                };

                let value = value.check(ctx)?;
                let value_type = value.get_info().type_id;
                if value_type != expected {
                    return Err(TypeCheckError::TypeMismatch(
                        TypeMismatch {
                            expected,
                            actual: value_type,
                        },
                        value.position(),
                    ));
                }

                Ok(Statement::Return(Return {
                    value,
                    info: expected.into(),
                    position,
                }))
            }
            Statement::Function(function) => {
                Ok(Statement::Function(check_function(function, ctx)?))
            }
            Statement::Block(block) => Ok(Statement::Block(check_block(block, ctx)?)),
        }
    }
}

fn check_condition(
    condition: Expression<()>,
    ctx: &mut Context,
) -> TypeResult<Expression<TypeInfo>> {
    let condition = condition.check(ctx)?;
    let type_id = condition.get_info().type_id;
    if type_id != Type::Boolean {
        return Err(TypeCheckError::TypeMismatch(
            TypeMismatch {
                expected: Type::Boolean,
                actual: type_id,
            },
            condition.position(),
        ));
    }
    Ok(condition)
}

impl TypeCheckable for Expression<()> {
    type Checked = Expression<TypeInfo>;

    fn check(self, ctx: &mut Context) -> TypeResult<Self::Checked> {
        match self {
            Expression::Id(id) => {
                let Some(stored) = ctx.scope.resolve_variable(&id.name) else {
                    return Err(TypeCheckError::UndefinedVariable(
                        UndefinedVariable {
                            name: id.name.clone(),
                        },
                        id.position,
                    ));
                };

                Ok(Expression::Id(Id {
                    info: stored.type_id.clone().into(),
                    name: id.name,
                    position: id.position,
                }))
            }
            Expression::Num(Num::Integer(lexeme, _, position)) => Ok(Expression::Num(
                Num::Integer(lexeme, Type::Integer.into(), position),
            )),
            Expression::Num(Num::FloatingPoint(lexeme, _, position)) => Ok(Expression::Num(
                Num::FloatingPoint(lexeme, Type::FloatingPoint.into(), position),
            )),
            Expression::Character(character) => Ok(Expression::Character(Character {
                lexeme: character.lexeme,
                info: Type::Character.into(),
                position: character.position,
            })),
            Expression::Bool(value) => Ok(Expression::Bool(Bool {
                value: value.value,
                info: Type::Boolean.into(),
                position: value.position,
            })),
            Expression::Binary(binary) => {
                let Binary {
                    op,
                    lhs,
                    rhs,
                    position,
                    ..
                } = *binary;

                let lhs = lhs.check(ctx)?;
                let rhs = rhs.check(ctx)?;

                let lhs_type = lhs.get_info().type_id;
                let rhs_type = rhs.get_info().type_id;

                if lhs_type != rhs_type {
                    return Err(TypeCheckError::TypeMismatch(
                        TypeMismatch {
                            expected: lhs_type,
                            actual: rhs_type,
                        },
                        rhs.position(),
                    ));
                }

                if !lhs_type.is_numeric() {
                    return Err(TypeCheckError::UnsupportedOperand(
                        UnsupportedOperand {
                            op: op.to_string(),
                            type_id: lhs_type,
                        },
                        position,
                    ));
                }

                Ok(Expression::Binary(Box::new(Binary {
                    op,
                    lhs,
                    rhs,
                    info: lhs_type.into(),
                    position,
                })))
            }
            Expression::Relation(relation) => {
                let Relation {
                    op,
                    lhs,
                    rhs,
                    position,
                    ..
                } = *relation;

                let lhs = lhs.check(ctx)?;
                let rhs = rhs.check(ctx)?;

                let lhs_type = lhs.get_info().type_id;
                let rhs_type = rhs.get_info().type_id;

                if lhs_type != rhs_type {
                    return Err(TypeCheckError::TypeMismatch(
                        TypeMismatch {
                            expected: lhs_type,
                            actual: rhs_type,
                        },
                        rhs.position(),
                    ));
                }

                let allowed = if op.is_equality() {
                    lhs_type.is_scalar()
                } else {
                    lhs_type.is_ordered()
                };
                if !allowed {
                    return Err(TypeCheckError::UnsupportedOperand(
                        UnsupportedOperand {
                            op: op.to_string(),
                            type_id: lhs_type,
                        },
                        position,
                    ));
                }

                Ok(Expression::Relation(Box::new(Relation {
                    op,
                    lhs,
                    rhs,
                    info: Type::Boolean.into(),
                    position,
                })))
            }
            Expression::Logical(logical) => {
                let Logical {
                    op,
                    lhs,
                    rhs,
                    position,
                    ..
                } = *logical;

                let lhs = check_condition(lhs, ctx)?;
                let rhs = check_condition(rhs, ctx)?;

                Ok(Expression::Logical(Box::new(Logical {
                    op,
                    lhs,
                    rhs,
                    info: Type::Boolean.into(),
                    position,
                })))
            }
            Expression::Prefix(prefix) => {
                let Prefix {
                    op,
                    inner,
                    position,
                    ..
                } = *prefix;

                let inner = inner.check(ctx)?;
                let inner_type = inner.get_info().type_id;

                let allowed = match op {
                    PrefixOperator::Minus | PrefixOperator::Plus => inner_type.is_numeric(),
                    PrefixOperator::Negation => inner_type == Type::Boolean,
                };
                if !allowed {
                    return Err(TypeCheckError::UnsupportedOperand(
                        UnsupportedOperand {
                            op: op.to_string(),
                            type_id: inner_type,
                        },
                        position,
                    ));
                }

                Ok(Expression::Prefix(Box::new(Prefix {
                    op,
                    inner,
                    info: inner_type.into(),
                    position,
                })))
            }
            Expression::Grouped(inner) => Ok(Expression::Grouped(Box::new(inner.check(ctx)?))),
            Expression::Assignment(assignment) => {
                let Assignment {
                    lvalue,
                    rvalue,
                    position,
                    ..
                } = *assignment;

                let Expression::Id(id) = lvalue else {
                    return Err(TypeCheckError::InvalidAssignmentTarget(position));
                };

                let Some(stored) = ctx.scope.resolve_variable(&id.name) else {
                    return Err(TypeCheckError::UndefinedVariable(
                        UndefinedVariable {
                            name: id.name.clone(),
                        },
                        id.position,
                    ));
                };

                if !stored.mutable {
                    return Err(TypeCheckError::ImmutableReassign(
                        ImmutableReassign {
                            name: id.name.clone(),
                        },
                        id.position,
                    ));
                }

                let expected = stored.type_id.clone();

                let rvalue = rvalue.check(ctx)?;
                let rvalue_type = rvalue.get_info().type_id;
                if rvalue_type != expected {
                    return Err(TypeCheckError::TypeMismatch(
                        TypeMismatch {
                            expected,
                            actual: rvalue_type,
                        },
                        rvalue.position(),
                    ));
                }

                Ok(Expression::Assignment(Box::new(Assignment {
                    lvalue: Expression::Id(Id {
                        name: id.name,
                        info: expected.clone().into(),
                        position: id.position,
                    }),
                    rvalue,
                    info: expected.into(),
                    position,
                })))
            }
            Expression::Block(block) => {
                let position = block.position.clone();
                let block = check_block(block, ctx)?;

                if !matches!(block.statements.last(), Some(Statement::Expression(_))) {
                    return Err(TypeCheckError::MissingBlockValue(position));
                }

                Ok(Expression::Block(block))
            }
            Expression::Call(call) => {
                let Call {
                    id,
                    arguments,
                    position,
                    ..
                } = call;

                let Some(signature) = ctx.scope.resolve_function(&id.name).cloned() else {
                    return Err(TypeCheckError::UndefinedFunction(
                        UndefinedFunction {
                            name: id.name.clone(),
                        },
                        position,
                    ));
                };

                let Type::Function {
                    params,
                    return_value,
                } = signature.clone()
                else {
                    return Err(TypeCheckError::UndefinedFunction(
                        UndefinedFunction {
                            name: id.name.clone(),
                        },
                        position,
                    ));
                };

                if arguments.len() != params.len() {
                    return Err(TypeCheckError::ArityMismatch(
                        ArityMismatch {
                            name: id.name.clone(),
                            expected: params.len(),
                            actual: arguments.len(),
                        },
                        position,
                    ));
                }

                let mut checked_arguments = vec![];
                for (argument, param) in arguments.into_iter().zip(params) {
                    let argument = argument.check(ctx)?;
                    let argument_type = argument.get_info().type_id;
                    if argument_type != param {
                        return Err(TypeCheckError::TypeMismatch(
                            TypeMismatch {
                                expected: param,
                                actual: argument_type,
                            },
                            argument.position(),
                        ));
                    }
                    checked_arguments.push(argument);
                }

                Ok(Expression::Call(Call {
                    id: Id {
                        name: id.name,
                        info: signature.into(),
                        position: id.position,
                    },
                    arguments: checked_arguments,
                    info: (*return_value).into(),
                    position,
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::Lexer, parser};

    fn check_source(input: &str) -> Result<Vec<Statement<TypeInfo>>, Vec<TypeCheckError>> {
        let (tokens, errors) = Lexer::new(input).lex();
        assert!(errors.is_empty(), "unexpected lex errors: {errors:?}");
        let statements = parser::parse(tokens).expect("parsing failed");
        check_program(statements)
    }

    fn assert_rejected(input: &str) -> Vec<TypeCheckError> {
        match check_source(input) {
            Ok(_) => panic!("expected '{input}' to be rejected"),
            Err(errors) => errors,
        }
    }

    #[test]
    fn test_check_simple_program() {
        assert!(check_source("var x int = 2; print x + 3 * 4;").is_ok());
    }

    #[test]
    fn test_check_mixed_arithmetic_is_rejected() {
        let errors = assert_rejected("print 2 + 3.5;");
        assert!(matches!(errors[0], TypeCheckError::TypeMismatch(_, _)));
    }

    #[test]
    fn test_check_const_reassign_is_rejected() {
        let errors = assert_rejected("const x = 1; x = 2;");
        assert!(matches!(errors[0], TypeCheckError::ImmutableReassign(_, _)));
    }

    #[test]
    fn test_check_undefined_name() {
        let errors = assert_rejected("print x;");
        assert!(matches!(errors[0], TypeCheckError::UndefinedVariable(_, _)));
    }

    #[test]
    fn test_check_var_without_type_or_initializer() {
        let errors = assert_rejected("var x;");
        assert!(matches!(
            errors[0],
            TypeCheckError::MissingTypeAnnotation(_, _)
        ));
    }

    #[test]
    fn test_check_annotation_must_agree_with_initializer() {
        let errors = assert_rejected("var x int = 1.5;");
        assert!(matches!(errors[0], TypeCheckError::TypeMismatch(_, _)));
    }

    #[test]
    fn test_check_condition_must_be_bool() {
        assert_rejected("if 1 { print 1; }");
        assert_rejected("while 1 { print 1; }");
        assert!(check_source("while true { break; }").is_ok());
    }

    #[test]
    fn test_check_break_outside_loop() {
        let errors = assert_rejected("break;");
        assert!(matches!(
            errors[0],
            TypeCheckError::MisplacedStatement(_, _)
        ));
    }

    #[test]
    fn test_check_return_outside_function() {
        let errors = assert_rejected("return 1;");
        assert!(matches!(
            errors[0],
            TypeCheckError::MisplacedStatement(_, _)
        ));
    }

    #[test]
    fn test_check_call_rules() {
        assert!(check_source("func add(x int, y int) int { return x + y; } print add(2, 3);").is_ok());

        let errors = assert_rejected("func f(x int) int { return x; } print f();");
        assert!(matches!(errors[0], TypeCheckError::ArityMismatch(_, _)));

        let errors = assert_rejected("func f(x int) int { return x; } print f(1.5);");
        assert!(matches!(errors[0], TypeCheckError::TypeMismatch(_, _)));

        let errors = assert_rejected("print f(1);");
        assert!(matches!(errors[0], TypeCheckError::UndefinedFunction(_, _)));
    }

    #[test]
    fn test_check_call_may_precede_definition() {
        assert!(
            check_source("func f(x int) int { return g(x); } func g(x int) int { return x; }")
                .is_ok()
        );
    }

    #[test]
    fn test_check_return_type_must_match() {
        let errors = assert_rejected("func f() int { return 1.5; }");
        assert!(matches!(errors[0], TypeCheckError::TypeMismatch(_, _)));
    }

    #[test]
    fn test_check_nested_function_is_rejected() {
        let errors = assert_rejected("func f() int { func g() int { return 1; } return 1; }");
        assert!(matches!(
            errors[0],
            TypeCheckError::MisplacedStatement(_, _)
        ));
    }

    #[test]
    fn test_check_void_call_in_value_position() {
        let errors = assert_rejected("func f() { print 1; } print f();");
        assert!(matches!(errors[0], TypeCheckError::UnprintableValue(_, _)));
    }

    #[test]
    fn test_check_equality_on_bools_only() {
        assert!(check_source("print true == false;").is_ok());
        let errors = assert_rejected("print true < false;");
        assert!(matches!(
            errors[0],
            TypeCheckError::UnsupportedOperand(_, _)
        ));
    }

    #[test]
    fn test_check_char_comparisons() {
        assert!(check_source("print 'a' < 'b';").is_ok());
        assert!(check_source("print 'a' == 'a';").is_ok());
    }

    #[test]
    fn test_check_compound_expression_value() {
        assert!(check_source("var x = { 1; 2; }; print x;").is_ok());

        let errors = assert_rejected("var x = { var y = 1; };");
        assert!(matches!(errors[0], TypeCheckError::MissingBlockValue(_)));
    }

    #[test]
    fn test_check_logical_operands() {
        assert!(check_source("print true && false || true;").is_ok());
        let errors = assert_rejected("print 1 && true;");
        assert!(matches!(errors[0], TypeCheckError::TypeMismatch(_, _)));
    }

    #[test]
    fn test_check_shadowing_in_nested_scope() {
        assert!(check_source("var x = 1; { var x = true; print x; } print x;").is_ok());
        let errors = assert_rejected("var x = 1; var x = 2;");
        assert!(matches!(errors[0], TypeCheckError::Redefinition(_, _)));
    }

    #[test]
    fn test_check_errors_accumulate() {
        let errors = assert_rejected("print a; print b; print c;");
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_check_assignment_yields_value() {
        assert!(check_source("var x = 1; print x = 2;").is_ok());
        let errors = assert_rejected("var x = 1; print (x + 1) = 2;");
        assert!(matches!(
            errors[0],
            TypeCheckError::InvalidAssignmentTarget(_)
        ));
    }
}
