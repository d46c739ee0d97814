// Integration tests for the BCL interpreter
//
// These tests drive complete BCL programs through the full pipeline
// (tokenize, parse, analyze, execute) and check the printed output captured
// through the interpreter's output sink. Tests cover:
// - Operator precedence and associativity
// - Control flow (for/break, if/elseif/else chains, return)
// - Structs (allocation, field mutation, aliasing, display)
// - Scoping rules (copy-on-enter blocks, caller-visible call environments)
// - Type widening and string concatenation
// - Rejection of ill-formed programs before any output

use bcl::analyzer::Analyzer;
use bcl::errors::{BclError, ErrorKind};
use bcl::interpreter::Interpreter;
use bcl::lexer::tokenize;
use bcl::parser::Parser;
use std::sync::{Arc, Mutex};

/// Run a program and return everything it printed.
fn run_source(src: &str) -> String {
    let program = Parser::new(tokenize(src)).parse().expect("parse failed");
    Analyzer::new().check(&program).expect("semantic analysis failed");

    let mut interpreter = Interpreter::new();
    let buffer = Arc::new(Mutex::new(Vec::new()));
    interpreter.set_output(buffer.clone());
    interpreter.run(&program).expect("execution failed");

    let output = buffer.lock().unwrap();
    String::from_utf8_lossy(&output).to_string()
}

/// Expect the program to be rejected before execution starts.
fn reject_source(src: &str) -> BclError {
    let program = match Parser::new(tokenize(src)).parse() {
        Ok(program) => program,
        Err(err) => return err,
    };
    Analyzer::new()
        .check(&program)
        .expect_err("expected the program to be rejected")
}

/// Expect the program to pass analysis but fail at runtime, without output
/// beyond what it printed before the fault.
fn run_expect_fault(src: &str) -> (String, BclError) {
    let program = Parser::new(tokenize(src)).parse().expect("parse failed");
    Analyzer::new().check(&program).expect("semantic analysis failed");

    let mut interpreter = Interpreter::new();
    let buffer = Arc::new(Mutex::new(Vec::new()));
    interpreter.set_output(buffer.clone());
    let err = interpreter.run(&program).expect_err("expected a runtime fault");

    let output = buffer.lock().unwrap();
    (String::from_utf8_lossy(&output).to_string(), err)
}

#[test]
fn test_multiplication_before_addition() {
    assert_eq!(run_source("void main() { printf(2 + 3 * 4); }"), "14\n");
}

#[test]
fn test_subtraction_left_associative() {
    assert_eq!(run_source("void main() { printf(10 - 3 - 2); }"), "5\n");
}

#[test]
fn test_modulo_shares_additive_tier() {
    // % sits in the same tier as + and -, so 2 + 3 % 4 is (2 + 3) % 4.
    assert_eq!(run_source("void main() { printf(2 + 3 % 4); }"), "1\n");
    assert_eq!(run_source("void main() { printf(10 % 3 + 1); }"), "2\n");
}

#[test]
fn test_parentheses_override_precedence() {
    assert_eq!(run_source("void main() { printf((2 + 3) * 4); }"), "20\n");
}

#[test]
fn test_integer_division_truncates() {
    assert_eq!(run_source("void main() { printf(7 / 2); }"), "3\n");
    assert_eq!(run_source("void main() { printf(7.0 / 2); }"), "3.5\n");
}

#[test]
fn test_break_stops_the_loop() {
    let out = run_source(
        "void main() {\n\
         \x20 for (int i = 0; i < 10; i = i + 1) {\n\
         \x20   if (i == 3) { break; }\n\
         \x20   printf(i);\n\
         \x20 }\n\
         }",
    );
    assert_eq!(out, "0\n1\n2\n");
}

#[test]
fn test_break_only_exits_inner_loop() {
    let out = run_source(
        "void main() {\n\
         \x20 for (int i = 0; i < 2; i = i + 1) {\n\
         \x20   for (int j = 0; j < 5; j = j + 1) {\n\
         \x20     if (j == 1) { break; }\n\
         \x20     printf(i + \"-\" + j);\n\
         \x20   }\n\
         \x20 }\n\
         }",
    );
    assert_eq!(out, "0-0\n1-0\n");
}

#[test]
fn test_for_loop_without_condition_runs_until_break() {
    let out = run_source(
        "void main() {\n\
         \x20 int i = 0;\n\
         \x20 for (;;) {\n\
         \x20   printf(i);\n\
         \x20   i = i + 1;\n\
         \x20   if (i == 2) { break; }\n\
         \x20 }\n\
         }",
    );
    assert_eq!(out, "0\n1\n");
}

#[test]
fn test_elseif_chain_fires_exactly_one_branch() {
    let out = run_source(
        "void main() {\n\
         \x20 int x = 2;\n\
         \x20 if (x == 1) { printf(\"one\"); }\n\
         \x20 elseif (x == 2) { printf(\"two\"); }\n\
         \x20 elseif (x == 2) { printf(\"again\"); }\n\
         \x20 else { printf(\"other\"); }\n\
         }",
    );
    assert_eq!(out, "two\n");
}

#[test]
fn test_else_fires_when_nothing_matched() {
    let out = run_source(
        "void main() {\n\
         \x20 int x = 9;\n\
         \x20 if (x == 1) { printf(\"one\"); }\n\
         \x20 elseif (x == 2) { printf(\"two\"); }\n\
         \x20 else { printf(\"other\"); }\n\
         }",
    );
    assert_eq!(out, "other\n");
}

#[test]
fn test_new_if_starts_a_fresh_chain() {
    let out = run_source(
        "void main() {\n\
         \x20 int x = 1;\n\
         \x20 if (x == 1) { printf(\"a\"); }\n\
         \x20 if (x == 1) { printf(\"b\"); }\n\
         \x20 else { printf(\"c\"); }\n\
         }",
    );
    assert_eq!(out, "a\nb\n");
}

#[test]
fn test_chain_condition_evaluates_once() {
    let out = run_source(
        "boolean noisy() { printf(\"c\"); return true; }\n\
         void main() {\n\
         \x20 if (noisy()) { printf(\"body\"); }\n\
         }",
    );
    assert_eq!(out, "c\nbody\n");
}

#[test]
fn test_struct_field_round_trip() {
    let out = run_source(
        "struct Point { int x, y; }\n\
         void main() {\n\
         \x20 Point p = new Point();\n\
         \x20 p.x = 7;\n\
         \x20 printf(p.x);\n\
         }",
    );
    assert_eq!(out, "7\n");
}

#[test]
fn test_struct_field_initializers_apply_on_new() {
    let out = run_source(
        "struct Config { int retries = 3; string host = \"localhost\"; }\n\
         void main() {\n\
         \x20 Config c = new Config();\n\
         \x20 printf(c.retries);\n\
         \x20 printf(c.host);\n\
         }",
    );
    assert_eq!(out, "3\nlocalhost\n");
}

#[test]
fn test_struct_display_in_declaration_order() {
    let out = run_source(
        "struct Point { int x, y; }\n\
         void main() {\n\
         \x20 Point p = new Point();\n\
         \x20 p.x = 7;\n\
         \x20 printf(p);\n\
         }",
    );
    assert_eq!(out, "{ x = 7, y = null }\n");
}

#[test]
fn test_struct_bindings_alias_one_instance() {
    let out = run_source(
        "struct Point { int x; }\n\
         void main() {\n\
         \x20 Point a = new Point();\n\
         \x20 Point b = a;\n\
         \x20 b.x = 9;\n\
         \x20 printf(a.x);\n\
         }",
    );
    assert_eq!(out, "9\n");
}

#[test]
fn test_block_reassignment_is_invisible_after_the_block() {
    let out = run_source(
        "void main() {\n\
         \x20 int a = 1;\n\
         \x20 if (a == 1) { a = 2; printf(a); }\n\
         \x20 printf(a);\n\
         }",
    );
    assert_eq!(out, "2\n1\n");
}

#[test]
fn test_loop_writes_are_invisible_after_the_loop() {
    let out = run_source(
        "void main() {\n\
         \x20 int total = 0;\n\
         \x20 for (int i = 0; i < 3; i = i + 1) {\n\
         \x20   total = total + i;\n\
         \x20   printf(total);\n\
         \x20 }\n\
         \x20 printf(total);\n\
         }",
    );
    assert_eq!(out, "0\n1\n3\n0\n");
}

#[test]
fn test_callee_sees_caller_variables() {
    // Calls inherit the caller's whole environment, so the callee reads the
    // caller's current (block-local) value of a global.
    let out = run_source(
        "int g = 1;\n\
         void show() { printf(g); }\n\
         void main() {\n\
         \x20 g = 5;\n\
         \x20 show();\n\
         }",
    );
    assert_eq!(out, "5\n");
}

#[test]
fn test_string_concatenation_follows_associativity() {
    assert_eq!(run_source("void main() { printf(\"x\" + 1 + 2); }"), "x12\n");
    assert_eq!(run_source("void main() { printf(1 + 2 + \"x\"); }"), "3x\n");
}

#[test]
fn test_string_plus_null_prints_null() {
    assert_eq!(run_source("void main() { printf(\"a\" + null); }"), "anull\n");
}

#[test]
fn test_int_widens_to_double() {
    assert_eq!(run_source("void main() { double d = 1; printf(d + 2); }"), "3.0\n");
}

#[test]
fn test_struct_field_widens_to_double() {
    let out = run_source(
        "struct Sample { double weight; }\n\
         void main() {\n\
         \x20 Sample s = new Sample();\n\
         \x20 s.weight = 2;\n\
         \x20 printf(s.weight);\n\
         }",
    );
    assert_eq!(out, "2.0\n");
}

#[test]
fn test_mixed_arithmetic_widens() {
    assert_eq!(run_source("void main() { printf(1 + 0.5); }"), "1.5\n");
}

#[test]
fn test_printf_without_expression_prints_blank_line() {
    assert_eq!(run_source("void main() { printf(); }"), "\n");
}

#[test]
fn test_printf_boolean() {
    assert_eq!(run_source("void main() { printf(true); }"), "true\n");
}

#[test]
fn test_uninitialized_variable_prints_null() {
    // Field reads skip the initialization check, so a declared-but-null
    // struct field prints null.
    let out = run_source(
        "struct Point { int x; }\n\
         void main() {\n\
         \x20 Point p = new Point();\n\
         \x20 printf(p.x);\n\
         }",
    );
    assert_eq!(out, "null\n");
}

#[test]
fn test_function_call_returns_value() {
    let out = run_source(
        "int add(int a, int b) { return a + b; }\n\
         void main() { printf(add(2, 3)); }",
    );
    assert_eq!(out, "5\n");
}

#[test]
fn test_recursion() {
    let out = run_source(
        "int factorial(int n) {\n\
         \x20 if (n <= 1) { return 1; }\n\
         \x20 return n * factorial(n - 1);\n\
         }\n\
         void main() { printf(factorial(5)); }",
    );
    assert_eq!(out, "120\n");
}

#[test]
fn test_parameter_default_applies_to_null_argument() {
    let out = run_source(
        "int pick(int x = 5) { return x; }\n\
         void main() { printf(pick(null)); printf(pick(9)); }",
    );
    assert_eq!(out, "5\n9\n");
}

#[test]
fn test_return_escapes_a_loop() {
    let out = run_source(
        "int first_above(int limit) {\n\
         \x20 for (int i = 0; i < 100; i = i + 1) {\n\
         \x20   if (i > limit) { return i; }\n\
         \x20 }\n\
         \x20 return 0;\n\
         }\n\
         void main() { printf(first_above(3)); }",
    );
    assert_eq!(out, "4\n");
}

#[test]
fn test_function_without_hit_return_yields_null() {
    let out = run_source(
        "int maybe(int x) {\n\
         \x20 if (x == 1) { return 10; }\n\
         }\n\
         void main() { printf(maybe(2)); }",
    );
    assert_eq!(out, "null\n");
}

#[test]
fn test_logical_operators_do_not_short_circuit() {
    let out = run_source(
        "boolean yes() { printf(\"e\"); return true; }\n\
         void main() {\n\
         \x20 if (yes() || yes()) { printf(\"in\"); }\n\
         }",
    );
    assert_eq!(out, "e\ne\nin\n");
}

#[test]
fn test_negation() {
    let out = run_source("void main() { if (!(1 == 2)) { printf(\"ok\"); } }");
    assert_eq!(out, "ok\n");
}

#[test]
fn test_string_ordering_comparison() {
    let out = run_source("void main() { if (\"abc\" < \"abd\") { printf(\"lt\"); } }");
    assert_eq!(out, "lt\n");
}

#[test]
fn test_numeric_comparison_widens() {
    let out = run_source("void main() { if (1 < 1.5) { printf(\"lt\"); } }");
    assert_eq!(out, "lt\n");
}

#[test]
fn test_null_equality() {
    let out = run_source(
        "struct Point { int x; }\n\
         void main() {\n\
         \x20 Point p;\n\
         \x20 p = null;\n\
         \x20 if (p == null) { printf(\"is null\"); }\n\
         \x20 p = new Point();\n\
         \x20 if (p != null) { printf(\"not null\"); }\n\
         }",
    );
    assert_eq!(out, "is null\nnot null\n");
}

#[test]
fn test_globals_declared_before_main_are_visible() {
    assert_eq!(run_source("int g = 2;\nvoid main() { printf(g); }"), "2\n");
}

#[test]
fn test_missing_main_is_a_hard_failure() {
    let (out, err) = run_expect_fault("void helper() { printf(1); }");
    assert_eq!(out, "");
    assert_eq!(err.kind, ErrorKind::RuntimeError);
    assert!(err.message.contains("main"));
}

#[test]
fn test_division_by_zero_is_a_runtime_fault() {
    let (out, err) = run_expect_fault("void main() { printf(\"before\"); printf(1 / 0); }");
    assert_eq!(out, "before\n");
    assert!(err.message.contains("zero"));
}

#[test]
fn test_field_access_on_null_is_a_runtime_fault() {
    let (out, err) = run_expect_fault(
        "struct Point { int x; }\n\
         void main() {\n\
         \x20 Point p;\n\
         \x20 printf(p.x);\n\
         }",
    );
    assert_eq!(out, "");
    assert!(err.message.contains("null"));
}

#[test]
fn test_ill_typed_program_rejected_before_output() {
    let err = reject_source("void main() { printf(1); printf(\"a\" - 1); }");
    assert_eq!(err.kind, ErrorKind::TypeError);
}

#[test]
fn test_unknown_variable_rejected() {
    let err = reject_source("void main() { printf(missing); }");
    assert_eq!(err.kind, ErrorKind::UndefinedVariable);
}

#[test]
fn test_argument_count_mismatch_rejected() {
    let err = reject_source(
        "int add(int a, int b) { return a + b; }\n\
         void main() { printf(add(1)); }",
    );
    assert!(err.message.contains("arguments"));
}

#[test]
fn test_break_outside_loop_rejected() {
    let err = reject_source("void main() { if (1 == 1) { break; } }");
    assert!(err.message.contains("break"));
}

#[test]
fn test_orphan_else_rejected() {
    let err = reject_source("void main() { else { printf(1); } }");
    assert!(err.message.contains("'else'"));
}

#[test]
fn test_unknown_struct_field_rejected() {
    let err = reject_source(
        "struct Point { int x; }\n\
         void main() { Point p = new Point(); p.z = 1; }",
    );
    assert!(err.message.contains("field"));
}

#[test]
fn test_syntax_error_rejected() {
    let err = reject_source("void main() { int a = ; }");
    assert_eq!(err.kind, ErrorKind::SyntaxError);
}
