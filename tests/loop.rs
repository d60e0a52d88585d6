mod common;

use common::assert_output;

#[test]
fn factorial_by_while() {
    assert_output(
        "var x int = 1; var f int = 1; while x <= 5 { f = f * x; x = x + 1; print f; }",
        "1\n2\n6\n24\n120\n",
    );
}

#[test]
fn break_leaves_an_infinite_loop() {
    assert_output("while true { break; } print 1;", "1\n");
}

#[test]
fn break_and_continue_interact() {
    assert_output(
        "var n = 0; while true { if n == 2 { print n; break; } else { n = n + 1; continue; } }",
        "2\n",
    );
}

#[test]
fn break_only_leaves_the_inner_loop() {
    let source = "
        var i = 0;
        while i < 2 {
            var j = 0;
            while true {
                j = j + 1;
                if j == 2 { break; }
            }
            print j;
            i = i + 1;
        }
    ";
    assert_output(source, "2\n2\n");
}

#[test]
fn continue_restarts_the_test() {
    let source = "
        var i = 0;
        var sum = 0;
        while i < 10 {
            i = i + 1;
            if i / 2 * 2 == i { continue; }
            sum = sum + i;
        }
        print sum;
    ";
    // 1 + 3 + 5 + 7 + 9
    assert_output(source, "25\n");
}
