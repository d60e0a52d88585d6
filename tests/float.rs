mod common;

use common::assert_output;

#[test]
fn float_constants_and_variables() {
    assert_output(
        "const pi = 3.14159; var r = 4.0; print pi * r * 2.0;",
        "25.13272\n",
    );
}

#[test]
fn float_division_is_ieee() {
    assert_output("print 1.0 / 2.0;", "0.5\n");
    assert_output("print 7.0 / 2.0;", "3.5\n");
}

#[test]
fn float_zero_value() {
    assert_output("var f float; print f;", "0\n");
}

#[test]
fn float_comparisons() {
    assert_output("print 1.5 < 2.5; print 2.5 <= 2.5; print 1.5 != 2.5;", "true\ntrue\ntrue\n");
}
