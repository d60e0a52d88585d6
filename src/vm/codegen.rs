use std::{collections::HashMap, error::Error, fmt::Display};

use crate::{
    interpreter::{char_value, float_value, int_value},
    lexer::Span,
    parser::ast::{
        Assignment, Binary, Block, Call, Expression, Function, Logical, LogicalOperator, Num,
        Prefix, PrefixOperator, Relation, RelationOperator, Statement,
    },
    typechecker::{Type, TypeInfo},
};

use super::instruction::{CmpOp, Instruction};

#[derive(Debug, Clone, PartialEq)]
pub enum CodegenError {
    MalformedLiteral { lexeme: String, span: Span },
    UndefinedName { name: String, span: Span },
    MisplacedControl { keyword: &'static str, span: Span },
    InvalidAssignmentTarget { span: Span },
    MissingBlockValue { span: Span },
    UnsupportedType { type_id: Type, span: Span },
}

impl Display for CodegenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodegenError::MalformedLiteral { lexeme, span } => {
                write!(f, "line {}: malformed literal '{lexeme}'", span.line)
            }
            CodegenError::UndefinedName { name, span } => {
                write!(f, "line {}: undefined name '{name}'", span.line)
            }
            CodegenError::MisplacedControl { keyword, span } => {
                write!(f, "line {}: '{keyword}' outside of a while loop", span.line)
            }
            CodegenError::InvalidAssignmentTarget { span } => write!(
                f,
                "line {}: left hand side of an assignment must be a mutable name",
                span.line
            ),
            CodegenError::MissingBlockValue { span } => write!(
                f,
                "line {}: a block used as an expression must end in an expression statement",
                span.line
            ),
            CodegenError::UnsupportedType { type_id, span } => {
                write!(
                    f,
                    "line {}: no instruction selection for type '{type_id:?}'",
                    span.line
                )
            }
        }
    }
}

impl Error for CodegenError {}

/// Where a binding lives and which slot it occupies. Slots are handed out at
/// declaration time in order of appearance, separately for the module level
/// and each function body.
#[derive(Debug, Clone)]
struct Slot {
    storage: Storage,
    index: u32,
    type_id: Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Storage {
    Global,
    Local,
}

struct LoopLabels {
    test: String,
    end: String,
}

/// Lowers a type-checked program to stack machine instructions. Top-level
/// code compiles first and ends in `HALT`; every function body follows as its
/// own label block ending in `RET`.
pub struct Codegen {
    code: Vec<Instruction>,
    functions: Vec<Vec<Instruction>>,
    scopes: Vec<HashMap<String, Slot>>,
    storage: Storage,
    global_count: u32,
    local_count: u32,
    label_count: usize,
    loop_labels: Vec<LoopLabels>,
}

/// Lower a checked program to an executable instruction stream.
pub fn generate(statements: &[Statement<TypeInfo>]) -> Result<Vec<Instruction>, CodegenError> {
    let mut codegen = Codegen::new();

    for statement in statements {
        codegen.compile_statement(statement)?;
    }
    codegen.code.push(Instruction::Halt);

    let mut code = codegen.code;
    for function in codegen.functions {
        code.extend(function);
    }

    log::debug!("generated {} instructions", code.len());

    Ok(code)
}

impl Codegen {
    fn new() -> Self {
        Self {
            code: vec![],
            functions: vec![],
            scopes: vec![HashMap::new()],
            storage: Storage::Global,
            global_count: 0,
            local_count: 0,
            label_count: 0,
            loop_labels: vec![],
        }
    }

    /// A fresh branch label. The dot prefix keeps generated labels apart from
    /// function labels, which use the (dot-less) source name.
    fn label(&mut self) -> String {
        self.label_count += 1;
        format!(".L{}", self.label_count)
    }

    fn define(&mut self, name: &str, type_id: Type) -> Slot {
        let index = match self.storage {
            Storage::Global => {
                let index = self.global_count;
                self.global_count += 1;
                index
            }
            Storage::Local => {
                let index = self.local_count;
                self.local_count += 1;
                index
            }
        };

        let slot = Slot {
            storage: self.storage,
            index,
            type_id,
        };
        self.scopes
            .last_mut()
            .expect("scope stack is never empty")
            .insert(name.to_string(), slot.clone());
        slot
    }

    fn resolve(&self, name: &str) -> Option<&Slot> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    fn store(&mut self, slot: &Slot) {
        let instruction = match (slot.storage, &slot.type_id) {
            (Storage::Global, Type::FloatingPoint) => Instruction::FStoreGlobal(slot.index),
            (Storage::Global, _) => Instruction::IStoreGlobal(slot.index),
            (Storage::Local, Type::FloatingPoint) => Instruction::FStoreLocal(slot.index),
            (Storage::Local, _) => Instruction::IStoreLocal(slot.index),
        };
        self.code.push(instruction);
    }

    fn load(&mut self, slot: &Slot) {
        let instruction = match (slot.storage, &slot.type_id) {
            (Storage::Global, Type::FloatingPoint) => Instruction::FLoadGlobal(slot.index),
            (Storage::Global, _) => Instruction::ILoadGlobal(slot.index),
            (Storage::Local, Type::FloatingPoint) => Instruction::FLoadLocal(slot.index),
            (Storage::Local, _) => Instruction::ILoadLocal(slot.index),
        };
        self.code.push(instruction);
    }

    fn compile_statement(&mut self, statement: &Statement<TypeInfo>) -> Result<(), CodegenError> {
        match statement {
            Statement::Expression(expression) => {
                self.compile_expression(expression)?;
                // expression statements discard their value
                match expression.get_info().type_id {
                    Type::FloatingPoint => self.code.push(Instruction::FPop),
                    Type::Void => {}
                    _ => self.code.push(Instruction::IPop),
                }
                Ok(())
            }
            Statement::Print(print) => {
                self.compile_expression(&print.value)?;
                let instruction = match print.value.get_info().type_id {
                    Type::Integer => Instruction::IPrint,
                    Type::FloatingPoint => Instruction::FPrint,
                    Type::Boolean => Instruction::BPrint,
                    Type::Character => Instruction::CPrint,
                    type_id => {
                        return Err(CodegenError::UnsupportedType {
                            type_id,
                            span: print.position.clone(),
                        })
                    }
                };
                self.code.push(instruction);
                Ok(())
            }
            Statement::Constant(constant) => {
                self.compile_expression(&constant.value)?;
                let slot = self.define(&constant.id.name, constant.info.type_id.clone());
                self.store(&slot);
                Ok(())
            }
            Statement::Variable(variable) => {
                let type_id = variable.info.type_id.clone();
                match &variable.value {
                    Some(initializer) => self.compile_expression(initializer)?,
                    // no initializer: the binding starts at its zero value
                    None => match type_id {
                        Type::FloatingPoint => self.code.push(Instruction::FPush(0.0)),
                        _ => self.code.push(Instruction::IPush(0)),
                    },
                }
                let slot = self.define(&variable.id.name, type_id);
                self.store(&slot);
                Ok(())
            }
            Statement::If(if_statement) => {
                self.compile_expression(&if_statement.condition)?;

                let end = self.label();
                match &if_statement.else_block {
                    Some(else_block) => {
                        let alternative = self.label();
                        self.code.push(Instruction::Bz(alternative.clone()));
                        self.compile_block(&if_statement.if_block)?;
                        self.code.push(Instruction::Goto(end.clone()));
                        self.code.push(Instruction::Label(alternative));
                        self.compile_block(else_block)?;
                    }
                    None => {
                        self.code.push(Instruction::Bz(end.clone()));
                        self.compile_block(&if_statement.if_block)?;
                    }
                }
                self.code.push(Instruction::Label(end));
                Ok(())
            }
            Statement::WhileLoop(while_loop) => {
                let test = self.label();
                let end = self.label();

                self.code.push(Instruction::Label(test.clone()));
                self.compile_expression(&while_loop.condition)?;
                self.code.push(Instruction::Bz(end.clone()));

                self.loop_labels.push(LoopLabels {
                    test: test.clone(),
                    end: end.clone(),
                });
                let body = self.compile_block(&while_loop.block);
                self.loop_labels.pop();
                body?;

                self.code.push(Instruction::Goto(test));
                self.code.push(Instruction::Label(end));
                Ok(())
            }
            Statement::Break(span) => {
                let Some(labels) = self.loop_labels.last() else {
                    return Err(CodegenError::MisplacedControl {
                        keyword: "break",
                        span: span.clone(),
                    });
                };
                self.code.push(Instruction::Goto(labels.end.clone()));
                Ok(())
            }
            Statement::Continue(span) => {
                let Some(labels) = self.loop_labels.last() else {
                    return Err(CodegenError::MisplacedControl {
                        keyword: "continue",
                        span: span.clone(),
                    });
                };
                self.code.push(Instruction::Goto(labels.test.clone()));
                Ok(())
            }
            Statement::Return(return_statement) => {
                self.compile_expression(&return_statement.value)?;
                self.code.push(Instruction::Ret);
                Ok(())
            }
            Statement::Function(function) => self.compile_function(function),
            Statement::Block(block) => self.compile_block(block),
        }
    }

    fn compile_block(&mut self, block: &Block<TypeInfo>) -> Result<(), CodegenError> {
        self.scopes.push(HashMap::new());
        let result = block
            .statements
            .iter()
            .try_for_each(|statement| self.compile_statement(statement));
        self.scopes.pop();
        result
    }

    /// Compile a function body into its own label block. The caller pushed
    /// the arguments left to right, so the prologue stores them into their
    /// slots right to left.
    fn compile_function(&mut self, function: &Function<TypeInfo>) -> Result<(), CodegenError> {
        let saved_code = std::mem::take(&mut self.code);
        let saved_storage = self.storage;
        let saved_locals = self.local_count;

        self.storage = Storage::Local;
        self.local_count = 0;
        self.scopes.push(HashMap::new());

        self.code
            .push(Instruction::Label(function.id.name.clone()));

        let slots = function
            .parameters
            .iter()
            .map(|parameter| self.define(&parameter.id.name, parameter.info.type_id.clone()))
            .collect::<Vec<_>>();
        for slot in slots.iter().rev() {
            self.store(slot);
        }

        let body = function
            .block
            .statements
            .iter()
            .try_for_each(|statement| self.compile_statement(statement));

        self.code.push(Instruction::Ret);

        self.scopes.pop();
        let instructions = std::mem::replace(&mut self.code, saved_code);
        self.storage = saved_storage;
        self.local_count = saved_locals;

        body?;
        self.functions.push(instructions);
        Ok(())
    }

    fn compile_expression(&mut self, expression: &Expression<TypeInfo>) -> Result<(), CodegenError> {
        match expression {
            Expression::Num(Num::Integer(lexeme, _, span)) => {
                let value = int_value(lexeme).map_err(|_| CodegenError::MalformedLiteral {
                    lexeme: lexeme.clone(),
                    span: span.clone(),
                })?;
                self.code.push(Instruction::IPush(value));
                Ok(())
            }
            Expression::Num(Num::FloatingPoint(lexeme, _, span)) => {
                let value = float_value(lexeme).map_err(|_| CodegenError::MalformedLiteral {
                    lexeme: lexeme.clone(),
                    span: span.clone(),
                })?;
                self.code.push(Instruction::FPush(value));
                Ok(())
            }
            Expression::Character(character) => {
                let value = char_value(&character.lexeme).map_err(|_| {
                    CodegenError::MalformedLiteral {
                        lexeme: character.lexeme.clone(),
                        span: character.position.clone(),
                    }
                })?;
                self.code.push(Instruction::IPush(value as i64));
                Ok(())
            }
            Expression::Bool(value) => {
                self.code.push(Instruction::IPush(i64::from(value.value)));
                Ok(())
            }
            Expression::Id(id) => {
                let Some(slot) = self.resolve(&id.name).cloned() else {
                    return Err(CodegenError::UndefinedName {
                        name: id.name.clone(),
                        span: id.position.clone(),
                    });
                };
                self.load(&slot);
                Ok(())
            }
            Expression::Binary(binary) => self.compile_binary(binary),
            Expression::Relation(relation) => self.compile_relation(relation),
            Expression::Logical(logical) => self.compile_logical(logical),
            Expression::Prefix(prefix) => self.compile_prefix(prefix),
            Expression::Grouped(inner) => self.compile_expression(inner),
            Expression::Assignment(assignment) => self.compile_assignment(assignment),
            Expression::Block(block) => self.compile_compound(block),
            Expression::Call(call) => self.compile_call(call),
        }
    }

    fn compile_binary(&mut self, binary: &Binary<TypeInfo>) -> Result<(), CodegenError> {
        use crate::parser::ast::BinaryOperator::*;

        self.compile_expression(&binary.lhs)?;
        self.compile_expression(&binary.rhs)?;

        let instruction = match binary.info.type_id {
            Type::Integer => match binary.op {
                Plus => Instruction::IAdd,
                Minus => Instruction::ISub,
                Times => Instruction::IMul,
                DividedBy => Instruction::IDiv,
            },
            Type::FloatingPoint => match binary.op {
                Plus => Instruction::FAdd,
                Minus => Instruction::FSub,
                Times => Instruction::FMul,
                DividedBy => Instruction::FDiv,
            },
            ref type_id => {
                return Err(CodegenError::UnsupportedType {
                    type_id: type_id.clone(),
                    span: binary.position.clone(),
                })
            }
        };
        self.code.push(instruction);
        Ok(())
    }

    fn compile_relation(&mut self, relation: &Relation<TypeInfo>) -> Result<(), CodegenError> {
        self.compile_expression(&relation.lhs)?;
        self.compile_expression(&relation.rhs)?;

        let op = cmp_op(relation.op);
        // everything but floats (bools, chars) rides the integer stack
        let instruction = match relation.lhs.get_info().type_id {
            Type::FloatingPoint => Instruction::FCmp(op),
            _ => Instruction::ICmp(op),
        };
        self.code.push(instruction);
        Ok(())
    }

    /// Short-circuit lowering: the right operand only executes when the left
    /// one did not already decide the result.
    fn compile_logical(&mut self, logical: &Logical<TypeInfo>) -> Result<(), CodegenError> {
        match logical.op {
            LogicalOperator::And => {
                let short = self.label();
                let end = self.label();

                self.compile_expression(&logical.lhs)?;
                self.code.push(Instruction::Bz(short.clone()));
                self.compile_expression(&logical.rhs)?;
                self.code.push(Instruction::Goto(end.clone()));
                self.code.push(Instruction::Label(short));
                self.code.push(Instruction::IPush(0));
                self.code.push(Instruction::Label(end));
            }
            LogicalOperator::Or => {
                let rhs = self.label();
                let end = self.label();

                self.compile_expression(&logical.lhs)?;
                self.code.push(Instruction::Bz(rhs.clone()));
                self.code.push(Instruction::IPush(1));
                self.code.push(Instruction::Goto(end.clone()));
                self.code.push(Instruction::Label(rhs));
                self.compile_expression(&logical.rhs)?;
                self.code.push(Instruction::Label(end));
            }
        }
        Ok(())
    }

    fn compile_prefix(&mut self, prefix: &Prefix<TypeInfo>) -> Result<(), CodegenError> {
        match (prefix.op, &prefix.info.type_id) {
            (PrefixOperator::Minus, Type::Integer) => {
                self.code.push(Instruction::IPush(0));
                self.compile_expression(&prefix.inner)?;
                self.code.push(Instruction::ISub);
            }
            (PrefixOperator::Minus, Type::FloatingPoint) => {
                self.code.push(Instruction::FPush(0.0));
                self.compile_expression(&prefix.inner)?;
                self.code.push(Instruction::FSub);
            }
            (PrefixOperator::Plus, _) => self.compile_expression(&prefix.inner)?,
            (PrefixOperator::Negation, _) => {
                self.compile_expression(&prefix.inner)?;
                self.code.push(Instruction::IPush(1));
                self.code.push(Instruction::Xor);
            }
            (_, type_id) => {
                return Err(CodegenError::UnsupportedType {
                    type_id: type_id.clone(),
                    span: prefix.position.clone(),
                })
            }
        }
        Ok(())
    }

    fn compile_assignment(&mut self, assignment: &Assignment<TypeInfo>) -> Result<(), CodegenError> {
        let Expression::Id(id) = &assignment.lvalue else {
            return Err(CodegenError::InvalidAssignmentTarget {
                span: assignment.position.clone(),
            });
        };

        self.compile_expression(&assignment.rvalue)?;

        let Some(slot) = self.resolve(&id.name).cloned() else {
            return Err(CodegenError::UndefinedName {
                name: id.name.clone(),
                span: id.position.clone(),
            });
        };

        // an assignment yields its value, so load the slot right back
        self.store(&slot);
        self.load(&slot);
        Ok(())
    }

    fn compile_compound(&mut self, block: &Block<TypeInfo>) -> Result<(), CodegenError> {
        let Some((Statement::Expression(tail), leading)) = block.statements.split_last() else {
            return Err(CodegenError::MissingBlockValue {
                span: block.position.clone(),
            });
        };

        self.scopes.push(HashMap::new());
        let result = leading
            .iter()
            .try_for_each(|statement| self.compile_statement(statement))
            .and_then(|()| self.compile_expression(tail));
        self.scopes.pop();
        result
    }

    fn compile_call(&mut self, call: &Call<TypeInfo>) -> Result<(), CodegenError> {
        for argument in &call.arguments {
            self.compile_expression(argument)?;
        }
        self.code.push(Instruction::Call(call.id.name.clone()));
        Ok(())
    }
}

fn cmp_op(op: RelationOperator) -> CmpOp {
    match op {
        RelationOperator::Equal => CmpOp::Equal,
        RelationOperator::NotEqual => CmpOp::NotEqual,
        RelationOperator::LessThan => CmpOp::LessThan,
        RelationOperator::LessOrEqual => CmpOp::LessOrEqual,
        RelationOperator::GreaterThan => CmpOp::GreaterThan,
        RelationOperator::GreaterOrEqual => CmpOp::GreaterOrEqual,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer::Lexer, parser, typechecker, vm::Machine};

    fn lower(input: &str) -> Vec<Instruction> {
        let (tokens, errors) = Lexer::new(input).lex();
        assert!(errors.is_empty(), "unexpected lex errors: {errors:?}");
        let statements = parser::parse(tokens).expect("parsing failed");
        let statements = typechecker::check_program(statements).expect("type checking failed");
        generate(&statements).expect("lowering failed")
    }

    fn execute(input: &str) -> String {
        let code = lower(input);
        let mut machine = Machine::with_output(Vec::new());
        machine.run(&code).expect("machine run failed");
        String::from_utf8(machine.into_output()).expect("output is valid utf-8")
    }

    #[test]
    fn test_literal_lowering() {
        assert_eq!(
            lower("print 2 + 3 * 4;"),
            vec![
                Instruction::IPush(2),
                Instruction::IPush(3),
                Instruction::IPush(4),
                Instruction::IMul,
                Instruction::IAdd,
                Instruction::IPrint,
                Instruction::Halt,
            ]
        );
    }

    #[test]
    fn test_global_slots_in_declaration_order() {
        let code = lower("var a = 1; var b = 2.0; print a; print b;");
        assert!(code.contains(&Instruction::IStoreGlobal(0)));
        assert!(code.contains(&Instruction::FStoreGlobal(1)));
        assert!(code.contains(&Instruction::ILoadGlobal(0)));
        assert!(code.contains(&Instruction::FLoadGlobal(1)));
    }

    #[test]
    fn test_short_circuit_compiles_to_branches() {
        let code = lower("print true && false;");
        assert!(code.iter().any(|i| matches!(i, Instruction::Bz(_))));
        assert!(!code.contains(&Instruction::And));
    }

    #[test]
    fn test_functions_follow_halt() {
        let code = lower("func f() int { return 1; } print f();");
        let halt = code
            .iter()
            .position(|i| *i == Instruction::Halt)
            .expect("program ends in HALT");
        assert!(code[halt..].contains(&Instruction::Label("f".into())));
        assert!(code[halt..].contains(&Instruction::Ret));
    }

    #[test]
    fn test_execute_arithmetic() {
        assert_eq!(execute("print 2 + 3 * 4;"), "14\n");
        assert_eq!(execute("print (2 + 3) * -4;"), "-20\n");
        assert_eq!(execute("print 7 / 2;"), "3\n");
        assert_eq!(execute("print -7 / 2;"), "-4\n");
    }

    #[test]
    fn test_execute_while_loop() {
        assert_eq!(
            execute("var x int = 1; var f int = 1; while x <= 5 { f = f * x; x = x + 1; print f; }"),
            "1\n2\n6\n24\n120\n"
        );
    }

    #[test]
    fn test_execute_break_continue() {
        assert_eq!(
            execute(
                "var n = 0; while true { if n == 2 { print n; break; } else { n = n + 1; continue; } }"
            ),
            "2\n"
        );
    }

    #[test]
    fn test_execute_function_calls() {
        assert_eq!(
            execute("func add(x int, y int) int { return x + y; } print add(2, 3);"),
            "5\n"
        );
    }

    #[test]
    fn test_execute_recursion_uses_fresh_frames() {
        let source = "
            func fib(n int) int {
                if n < 2 { return n; } else { return fib(n - 1) + fib(n - 2); }
            }
            print fib(10);
        ";
        assert_eq!(execute(source), "55\n");
    }

    #[test]
    fn test_execute_globals_from_functions() {
        let source = "
            var counter = 0;
            func bump() { counter = counter + 1; }
            bump();
            bump();
            print counter;
        ";
        assert_eq!(execute(source), "2\n");
    }

    #[test]
    fn test_execute_char_relations() {
        assert_eq!(execute("print 'a' < 'b'; print 'a' == 'a';"), "true\ntrue\n");
    }

    #[test]
    fn test_execute_float_program() {
        assert_eq!(
            execute("const pi = 3.14159; var r = 4.0; print pi * r * 2.0;"),
            "25.13272\n"
        );
    }

    #[test]
    fn test_execute_compound_and_assignment_value() {
        assert_eq!(execute("var x = { var a = 2; a * 3; }; print x;"), "6\n");
        assert_eq!(execute("var x = 0; print x = 5;"), "5\n");
    }

    #[test]
    fn test_execute_unary_and_negation() {
        assert_eq!(execute("print !true; print !false;"), "false\ntrue\n");
        assert_eq!(execute("print -2.5; print +3;"), "-2.5\n3\n");
    }
}
