mod common;

use common::assert_output;

#[test]
fn prints_arithmetic_with_precedence() {
    assert_output("print 2 + 3 * 4;", "14\n");
}

#[test]
fn prints_grouped_and_negated() {
    assert_output("print (2 + 3) * -4;", "-20\n");
}

#[test]
fn prints_booleans_as_words() {
    assert_output("print true; print false; print 1 < 2;", "true\nfalse\ntrue\n");
}

#[test]
fn prints_chars_without_newline() {
    assert_output(
        r"print 'w'; print 'a'; print 'b'; print '\n'; print 'x';",
        "wab\nx",
    );
}

#[test]
fn prints_escaped_characters() {
    assert_output(r"print '\t'; print '\\'; print '\n';", "\t\\\n");
}
