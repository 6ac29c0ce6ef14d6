use std::{cell::RefCell, rc::Rc};

use pretty_assertions::assert_eq;
use tinyscript::{run, DiagnosticKind, Interpreter, Report};

struct Session {
    output: Rc<RefCell<String>>,
    itp: Interpreter,
}

impl Session {
    fn new() -> Self {
        let output = Rc::new(RefCell::new(String::new()));
        let itp = Interpreter::new(output.clone());
        Self { output, itp }
    }

    fn run(&mut self, source: &str) -> Report {
        run(source, &mut self.itp)
    }

    fn take_output(&self) -> String {
        std::mem::take(&mut *self.output.borrow_mut())
    }
}

fn run_ok(source: &str) -> String {
    let mut session = Session::new();
    let report = session.run(source);
    assert!(report.is_ok(), "{:?}", report.diagnostics);
    session.take_output()
}

fn messages(report: &Report) -> Vec<String> {
    report.diagnostics.iter().map(|d| d.to_string()).collect()
}

#[test]
fn arithmetic_respects_precedence() {
    assert_eq!(run_ok("print 1 + 2 * 3;"), "7\n");
    assert_eq!(run_ok("print (1 + 2) * 3;"), "9\n");
    assert_eq!(run_ok("print 10 - 4 - 3;"), "3\n");
    assert_eq!(run_ok("print -2 * 3;"), "-6\n");
}

#[test]
fn numbers_print_in_shortest_form() {
    assert_eq!(run_ok("print 3.0; print 3.5; print 7 / 2;"), "3\n3.5\n3.5\n");
}

#[test]
fn division_by_zero_is_infinity() {
    assert_eq!(run_ok("print 1 / 0; print -1 / 0;"), "inf\n-inf\n");
}

#[test]
fn literals_print() {
    assert_eq!(
        run_ok("print null; print true; print false; print \"hi\";"),
        "null\ntrue\nfalse\nhi\n"
    );
}

#[test]
fn strings_concatenate() {
    assert_eq!(run_ok("print \"a\" + \"b\";"), "ab\n");
    assert_eq!(run_ok("var s = \"x\"; s = s + s; print s;"), "xx\n");
}

#[test]
fn mixed_addition_is_a_runtime_error() {
    let mut session = Session::new();
    let report = session.run("print 1 + \"a\";");
    assert_eq!(
        messages(&report),
        vec!["[line 1] RuntimeError: Operands of '+' must be two numbers or two strings."]
    );
    assert_eq!(session.take_output(), "");
}

#[test]
fn comparing_non_numbers_is_a_runtime_error() {
    let mut session = Session::new();
    let report = session.run("print 1 < \"a\";");
    assert_eq!(
        messages(&report),
        vec!["[line 1] RuntimeError: Operands must be numbers."]
    );
}

#[test]
fn negating_non_numbers_is_a_runtime_error() {
    let mut session = Session::new();
    let report = session.run("print -\"a\";");
    assert_eq!(
        messages(&report),
        vec!["[line 1] RuntimeError: Operand must be a number."]
    );
}

#[test]
fn only_null_and_false_are_falsy() {
    assert_eq!(
        run_ok("print !0; print !\"\"; print !null; print !false; print !true;"),
        "false\nfalse\ntrue\ntrue\nfalse\n"
    );
}

#[test]
fn equality_never_coerces() {
    assert_eq!(
        run_ok("print 1 == 1; print \"1\" == 1; print null == false; print null == null; print 1 != 2;"),
        "true\nfalse\nfalse\ntrue\ntrue\n"
    );
}

#[test]
fn logical_operators_short_circuit() {
    assert_eq!(run_ok("print false and (1 / 0);"), "false\n");
    assert_eq!(
        run_ok("var called = false; fun f() { called = true; return 1; } print true or f(); print called;"),
        "true\nfalse\n"
    );
}

#[test]
fn logical_operators_yield_operands() {
    assert_eq!(
        run_ok("print null or \"fallback\"; print 1 and 2; print false or null;"),
        "fallback\n2\nnull\n"
    );
}

#[test]
fn inner_blocks_shadow_outer_variables() {
    assert_eq!(
        run_ok("var a = 1; { var a = 2; print a; } print a;"),
        "2\n1\n"
    );
}

#[test]
fn assignment_reaches_the_enclosing_scope() {
    assert_eq!(run_ok("var a = 1; { a = 2; } print a;"), "2\n");
}

#[test]
fn redeclaring_in_the_same_scope_fails() {
    let mut session = Session::new();
    let report = session.run("var a = 1;\nvar a = 2;\nprint a;");
    assert_eq!(
        messages(&report),
        vec!["[line 2] RuntimeError: Variable 'a' is already defined in this scope."]
    );
    assert_eq!(session.take_output(), "");
}

#[test]
fn undefined_variables_fail() {
    let mut session = Session::new();
    let report = session.run("print nope;");
    assert_eq!(
        messages(&report),
        vec!["[line 1] RuntimeError: Undefined variable 'nope'."]
    );

    let report = session.run("nope = 1;");
    assert!(report.has(DiagnosticKind::RuntimeError));
}

#[test]
fn uninitialized_variables_are_null() {
    assert_eq!(run_ok("var a; print a;"), "null\n");
}

#[test]
fn if_else_picks_a_branch() {
    assert_eq!(
        run_ok("if (1 < 2) print \"yes\"; else print \"no\"; if (null) print \"yes\"; else print \"no\";"),
        "yes\nno\n"
    );
}

#[test]
fn while_loops() {
    assert_eq!(
        run_ok("var i = 0; while (i < 3) { print i; i = i + 1; }"),
        "0\n1\n2\n"
    );
}

#[test]
fn for_loops() {
    assert_eq!(
        run_ok("for (var i = 0; i < 3; i = i + 1) print i;"),
        "0\n1\n2\n"
    );
    // the loop variable lives in its own scope
    let mut session = Session::new();
    let report = session.run("for (var i = 0; i < 1; i = i + 1) {} print i;");
    assert!(report.has(DiagnosticKind::RuntimeError));
}

#[test]
fn functions_return_values() {
    assert_eq!(
        run_ok("fun add(a, b) { return a + b; } print add(1, 2);"),
        "3\n"
    );
    assert_eq!(run_ok("fun f() {} print f();"), "null\n");
    assert_eq!(run_ok("fun f() { return; } print f();"), "null\n");
}

#[test]
fn functions_display_their_name() {
    assert_eq!(
        run_ok("fun f() {} print f; print clock;"),
        "<fn f>\n<native fn clock>\n"
    );
}

#[test]
fn recursion() {
    assert_eq!(
        run_ok("fun fib(n) { if (n < 2) return n; return fib(n - 1) + fib(n - 2); } print fib(15);"),
        "610\n"
    );
}

#[test]
fn return_unwinds_out_of_loops() {
    assert_eq!(
        run_ok("fun first() { var i = 0; while (true) { if (i == 3) return i; i = i + 1; } } print first();"),
        "3\n"
    );
}

#[test]
fn closures_capture_their_scope() {
    let source = "
        fun makeCounter() {
            var count = 0;
            fun counter() {
                count = count + 1;
                return count;
            }
            return counter;
        }
        var c = makeCounter();
        print c();
        print c();
        var d = makeCounter();
        print d();
    ";
    assert_eq!(run_ok(source), "1\n2\n1\n");
}

#[test]
fn functions_escape_their_block() {
    let source = "
        var f;
        {
            var secret = \"kept\";
            fun reveal() { return secret; }
            f = reveal;
        }
        print f();
    ";
    assert_eq!(run_ok(source), "kept\n");
}

#[test]
fn function_equality_is_identity() {
    assert_eq!(
        run_ok("fun f() {} fun g() {} var h = f; print f == h; print f == g; print clock == clock;"),
        "true\nfalse\ntrue\n"
    );
}

#[test]
fn arity_mismatch_is_reported() {
    let mut session = Session::new();
    let report = session.run("fun f(a, b) {}\nf(1);");
    assert_eq!(
        messages(&report),
        vec!["[line 2] RuntimeError: Expected 2 arguments but got 1."]
    );
}

#[test]
fn calling_a_non_callable_fails() {
    let mut session = Session::new();
    let report = session.run("\"text\"();");
    assert_eq!(
        messages(&report),
        vec!["[line 1] RuntimeError: Can only call functions and natives."]
    );
}

#[test]
fn runtime_errors_stop_the_unit_but_keep_the_session() {
    let mut session = Session::new();
    let report = session.run("var a = 1;\nprint a;\nprint -\"x\";\nprint 2;");
    assert_eq!(report.diagnostics.len(), 1);
    assert_eq!(report.diagnostics[0].line, 3);
    assert_eq!(session.take_output(), "1\n");

    let report = session.run("print a + 1;");
    assert!(report.is_ok());
    assert_eq!(session.take_output(), "2\n");
}

#[test]
fn runtime_errors_inside_functions_restore_the_global_scope() {
    let mut session = Session::new();
    let report = session.run("fun f() { var inner = 1; return -\"x\"; } f();");
    assert!(report.has(DiagnosticKind::RuntimeError));

    let report = session.run("var inner = 2; print inner;");
    assert!(report.is_ok());
    assert_eq!(session.take_output(), "2\n");
}

#[test]
fn globals_persist_between_units() {
    let mut session = Session::new();
    assert!(session.run("var a = 40;").is_ok());
    assert!(session.run("fun inc(x) { return x + 2; }").is_ok());
    assert!(session.run("print inc(a);").is_ok());
    assert_eq!(session.take_output(), "42\n");
}

#[test]
fn reset_clears_globals_but_keeps_natives() {
    let mut session = Session::new();
    assert!(session.run("var a = 1;").is_ok());
    session.itp.reset();

    let report = session.run("print a;");
    assert!(report.has(DiagnosticKind::RuntimeError));

    assert!(session.run("var a = 2; writeLine(a);").is_ok());
    assert_eq!(session.take_output(), "2\n");
}

#[test]
fn dropping_the_interpreter_frees_the_global_scope() {
    let mut session = Session::new();
    assert!(session.run("fun f() {} var g = f;").is_ok());

    let globals = Rc::downgrade(&session.itp.globals());
    drop(session);
    assert!(globals.upgrade().is_none());
}

#[test]
fn write_natives() {
    assert_eq!(
        run_ok("write(\"a\"); write(1); writeLine(\"b\"); writeLine(true);"),
        "a1b\ntrue\n"
    );
}

#[test]
fn clock_returns_a_number() {
    assert_eq!(
        run_ok("var t = clock(); print t > 0; print t == t + 0;"),
        "true\ntrue\n"
    );
}

#[test]
fn lexical_errors_prevent_execution() {
    let mut session = Session::new();
    let report = session.run("print 1;\nprint 2 @ 3;");
    assert_eq!(
        messages(&report),
        vec![
            "[line 2, column 9] LexicalError: Unexpected character '@'.".to_string(),
            "[line 2] SyntaxError: Expect ';' after value.".to_string(),
        ]
    );
    assert_eq!(session.take_output(), "");
}

#[test]
fn unterminated_strings_are_reported() {
    let mut session = Session::new();
    let report = session.run("print \"open;");
    assert!(report.has(DiagnosticKind::LexicalError));
    assert_eq!(report.diagnostics[0].message, "Unterminated string.");
    assert_eq!(session.take_output(), "");
}

#[test]
fn syntax_errors_prevent_execution() {
    let mut session = Session::new();
    let report = session.run("print 1;\nvar = 2;\nprint 3;");
    assert_eq!(
        messages(&report),
        vec!["[line 2] SyntaxError: Expect variable name."]
    );
    assert_eq!(session.take_output(), "");
}

#[test]
fn every_syntax_error_in_a_unit_is_reported() {
    let mut session = Session::new();
    let report = session.run("var = 1;\nprint ;\n1 = 2;");
    assert_eq!(report.diagnostics.len(), 3);
    assert!(report
        .diagnostics
        .iter()
        .all(|d| d.kind == DiagnosticKind::SyntaxError));
    assert_eq!(
        report.diagnostics.iter().map(|d| d.line).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[test]
fn duplicate_parameters_are_a_syntax_error() {
    let mut session = Session::new();
    let report = session.run("fun f(a, a) {}\nprint 1;");
    assert_eq!(
        messages(&report),
        vec!["[line 1] SyntaxError: Already a parameter named 'a' in this function."]
    );
    assert_eq!(session.take_output(), "");
}

#[test]
fn return_at_top_level_is_a_syntax_error() {
    let mut session = Session::new();
    let report = session.run("return 1;");
    assert_eq!(
        messages(&report),
        vec!["[line 1] SyntaxError: Can't return from top-level code."]
    );
}

#[test]
fn comments_are_ignored() {
    assert_eq!(run_ok("// nothing\nprint 1; // trailing\n"), "1\n");
}
