mod common;

use common::{check_errors, run_interpreter, run_vm};

use wabbit::{
    interpreter::EvalError,
    lexer::Lexer,
    parser,
    typechecker::TypeCheckError,
    vm::MachineError,
};

#[test]
fn integer_division_by_zero_is_an_error_not_a_panic() {
    assert!(matches!(
        run_interpreter("print 1 / 0;"),
        Err(EvalError::DivisionByZero { .. })
    ));
    assert!(matches!(
        run_vm("print 1 / 0;"),
        Err(MachineError::DivisionByZero)
    ));
}

#[test]
fn missing_return_is_a_runtime_error() {
    let source = "func f(x int) int { if x > 0 { return x; } } print f(-1);";
    assert!(matches!(
        run_interpreter(source),
        Err(EvalError::MissingReturn { .. })
    ));
    assert!(run_vm(source).is_err());
}

#[test]
fn chained_comparison_is_a_syntax_error() {
    let (tokens, errors) = Lexer::new("print 1 < 2 < 3;").lex();
    assert!(errors.is_empty());
    let result = parser::parse(tokens);
    assert!(result.is_err());
}

#[test]
fn lexical_errors_are_recovered_and_collected() {
    let (tokens, errors) = Lexer::new("print 1 @ + $ 2;").lex();
    assert_eq!(errors.len(), 2);
    // the surviving token stream still parses
    assert!(parser::parse(tokens).is_ok());
}

#[test]
fn checker_refuses_bad_programs() {
    assert!(matches!(
        check_errors("const x = 1; x = 2;")[0],
        TypeCheckError::ImmutableReassign(_, _)
    ));
    assert!(matches!(
        check_errors("print 1 + true;")[0],
        TypeCheckError::TypeMismatch(_, _)
    ));
    assert!(matches!(
        check_errors("break;")[0],
        TypeCheckError::MisplacedStatement(_, _)
    ));
    assert!(matches!(
        check_errors("var x;")[0],
        TypeCheckError::MissingTypeAnnotation(_, _)
    ));
}

#[test]
fn checker_accumulates_all_errors() {
    let errors = check_errors("print a; var x float = 1; x = true;");
    assert_eq!(errors.len(), 3);
}

#[test]
fn exit_is_refused_after_check_errors() {
    // the pipeline contract: a rejected program never reaches execution;
    // modelled here by the checker returning Err
    assert!(!check_errors("print missing;").is_empty());
}
