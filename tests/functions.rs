mod common;

use common::assert_output;

#[test]
fn calls_a_user_function() {
    assert_output(
        "func add(x int, y int) int { return x + y; } print add(2, 3);",
        "5\n",
    );
}

#[test]
fn calls_may_precede_the_definition() {
    assert_output(
        "print double(21); func double(x int) int { return x * 2; }",
        "42\n",
    );
}

#[test]
fn arguments_evaluate_in_the_callers_scope() {
    let source = "
        func square(x int) int { return x * x; }
        var x int = 3;
        print square(x + 1);
        print x;
    ";
    assert_output(source, "16\n3\n");
}

#[test]
fn recursion_keeps_frames_apart() {
    let source = "
        func fib(n int) int {
            if n < 2 { return n; } else { return fib(n - 1) + fib(n - 2); }
        }
        print fib(10);
    ";
    assert_output(source, "55\n");
}

#[test]
fn mutual_recursion() {
    let source = "
        func is_even(n int) bool {
            if n == 0 { return true; } else { return is_odd(n - 1); }
        }
        func is_odd(n int) bool {
            if n == 0 { return false; } else { return is_even(n - 1); }
        }
        print is_even(10);
        print is_odd(7);
    ";
    assert_output(source, "true\ntrue\n");
}

#[test]
fn globals_are_visible_inside_functions() {
    let source = "
        var counter = 0;
        func bump() { counter = counter + 1; }
        bump();
        bump();
        bump();
        print counter;
    ";
    assert_output(source, "3\n");
}

#[test]
fn void_functions_run_for_their_effect() {
    assert_output(
        "func hello() { print 'h'; print 'i'; } hello(); hello();",
        "hihi",
    );
}

#[test]
fn ackermann() {
    let source = "
        func ack(m int, n int) int {
            if m == 0 { return n + 1; }
            if n == 0 { return ack(m - 1, 1); }
            return ack(m - 1, ack(m, n - 1));
        }
        print ack(2, 3);
    ";
    assert_output(source, "9\n");
}
