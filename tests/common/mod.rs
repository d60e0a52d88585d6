#![allow(dead_code)]

use wabbit::{
    interpreter::{EvalError, Interpreter},
    lexer::Lexer,
    parser,
    parser::ast::Statement,
    typechecker::{self, TypeCheckError, TypeInfo},
    vm::{self, Machine, MachineError},
};

/// Run a source program through lexer, parser and type checker.
pub fn compile(source: &str) -> Vec<Statement<TypeInfo>> {
    let (tokens, errors) = Lexer::new(source).lex();
    assert!(errors.is_empty(), "unexpected lex errors: {errors:?}");

    let statements = parser::parse(tokens).expect("parsing failed");
    typechecker::check_program(statements).expect("type checking failed")
}

/// Run a source program through lexer and parser, returning the checker's
/// diagnostics (which the program is expected to produce).
pub fn check_errors(source: &str) -> Vec<TypeCheckError> {
    let (tokens, errors) = Lexer::new(source).lex();
    assert!(errors.is_empty(), "unexpected lex errors: {errors:?}");

    let statements = parser::parse(tokens).expect("parsing failed");
    match typechecker::check_program(statements) {
        Ok(_) => panic!("expected '{source}' to be rejected by the type checker"),
        Err(errors) => errors,
    }
}

/// Execute with the tree-walking interpreter, capturing stdout.
pub fn run_interpreter(source: &str) -> Result<String, EvalError> {
    let statements = compile(source);

    let mut interpreter = Interpreter::with_output(Vec::new());
    interpreter.run(&statements)?;
    Ok(String::from_utf8(interpreter.into_output()).expect("output is valid utf-8"))
}

/// Lower to stack machine code and execute, capturing stdout.
pub fn run_vm(source: &str) -> Result<String, MachineError> {
    let statements = compile(source);
    let code = vm::generate(&statements).expect("lowering failed");

    let mut machine = Machine::with_output(Vec::new());
    machine.run(&code)?;
    Ok(String::from_utf8(machine.into_output()).expect("output is valid utf-8"))
}

/// Assert that both execution backends produce exactly the given output.
pub fn assert_output(source: &str, expected: &str) {
    assert_eq!(
        run_interpreter(source).expect("interpreter failed"),
        expected,
        "interpreter output mismatch"
    );
    assert_eq!(
        run_vm(source).expect("vm failed"),
        expected,
        "vm output mismatch"
    );
}
