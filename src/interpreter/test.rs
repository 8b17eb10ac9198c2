use super::*;
use crate::ast::{Program, Stmt};
use crate::builtins::BUILTINS;
use crate::error::RuntimeError;
use crate::lexer::tokenize;
use crate::parser::Parser;

use std::cell::RefCell;
use std::rc::Rc;

fn parse(source: &str) -> Program {
    let tokens = tokenize(source).unwrap();
    let mut parser = Parser::new(&tokens, source.len());
    parser.parse_program().unwrap()
}

/// Runs a program and returns everything `log` produced.
fn run(source: &str) -> Result<Vec<Value>, RuntimeError> {
    let program = parse(source);
    let logged = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&logged);
    let mut interpreter =
        Interpreter::new(BUILTINS, Box::new(move |value| sink.borrow_mut().push(value)));
    interpreter.evaluate(&program)?;
    let values = logged.borrow().clone();
    Ok(values)
}

/// Evaluates a single-expression program and returns its value.
fn eval(source: &str) -> Result<Value, RuntimeError> {
    let program = parse(source);
    let [Stmt::Expr(expr)] = program.body.as_slice() else {
        panic!("expected a single expression statement");
    };
    let mut interpreter = Interpreter::new(BUILTINS, Box::new(|_| {}));
    interpreter.eval_expr(expr)
}

#[test]
fn test_arithmetic_with_grouping() {
    assert_eq!(eval("(2 + 2) * 3").unwrap(), Value::Number(12.0));
}

#[test]
fn test_multiplication_binds_tighter_than_addition() {
    assert_eq!(eval("2 + 2 * 3").unwrap(), Value::Number(8.0));
    assert_eq!(eval("2 + 2 * 3 - 1").unwrap(), Value::Number(7.0));
}

#[test]
fn test_comparison_binds_tighter_than_addition() {
    // 1 + (2 > 3), with false coerced to 0 by the addition.
    assert_eq!(eval("1 + 2 > 3").unwrap(), Value::Number(1.0));
}

#[test]
fn test_comparisons_yield_booleans() {
    assert_eq!(eval("1 < 2").unwrap(), Value::Bool(true));
    assert_eq!(eval("1 > 2").unwrap(), Value::Bool(false));
    assert_eq!(eval("2 == 2").unwrap(), Value::Bool(true));
    assert_eq!(eval("2 != 2").unwrap(), Value::Bool(false));
}

#[test]
fn test_boolean_operands_coerce_in_arithmetic() {
    assert_eq!(eval("(1 < 2) + (3 < 2)").unwrap(), Value::Number(1.0));
}

#[test]
fn test_division_by_zero_is_not_guarded() {
    assert_eq!(eval("1 / 0").unwrap(), Value::Number(f64::INFINITY));
}

#[test]
fn test_mixed_type_comparison_is_never_equal() {
    // A boolean and a number are distinct values even when the boolean
    // would coerce to the same number in arithmetic.
    assert_eq!(eval("(1 == 1) == 1").unwrap(), Value::Bool(false));
    assert_eq!(eval("(1 == 1) != 1").unwrap(), Value::Bool(true));
    assert_eq!(eval("(1 > 2) == 0").unwrap(), Value::Bool(false));
}

#[test]
fn test_log_hands_values_to_the_sink() {
    let logged = run("log(1 + 2) log(5)").unwrap();
    assert_eq!(logged, vec![Value::Number(3.0), Value::Number(5.0)]);
}

#[test]
fn test_function_call() {
    let logged = run(
        "
        function add(a, b) {
            return a + b
        }
        log(add(2, 3))
        ",
    )
    .unwrap();
    assert_eq!(logged, vec![Value::Number(5.0)]);
}

#[test]
fn test_log_evaluates_to_its_argument() {
    let logged = run("log(log(7) + 1)").unwrap();
    assert_eq!(logged, vec![Value::Number(7.0), Value::Number(8.0)]);
}

#[test]
fn test_recursive_fibonacci() {
    let logged = run(
        "
        function fibonacci(n) {
            if (n == 0) {
                return 0
            }
            if (n == 1) {
                return 1
            }
            return fibonacci(n - 1) + fibonacci(n - 2)
        }
        log(fibonacci(10))
        ",
    )
    .unwrap();
    assert_eq!(logged, vec![Value::Number(55.0)]);
}

#[test]
fn test_while_loop_with_assignment() {
    let logged = run(
        "
        function iterate(a) {
            while (a < 10) {
                a = a + 1
            }
            return a
        }
        log(iterate(1))
        ",
    )
    .unwrap();
    assert_eq!(logged, vec![Value::Number(10.0)]);
}

#[test]
fn test_return_unwinds_out_of_loops() {
    let logged = run(
        "
        function first(n) {
            while (n < 100) {
                if (n > 41) {
                    return n
                }
                n = n + 1
            }
            return 0
        }
        log(first(1))
        ",
    )
    .unwrap();
    assert_eq!(logged, vec![Value::Number(42.0)]);
}

#[test]
fn test_assignment_reaches_outer_frames() {
    let logged = run(
        "
        let x = 1
        function bump() {
            x = x + 1
            return x
        }
        log(bump())
        log(bump())
        log(x)
        ",
    )
    .unwrap();
    assert_eq!(
        logged,
        vec![Value::Number(2.0), Value::Number(3.0), Value::Number(3.0)]
    );
}

#[test]
fn test_let_binds_in_the_current_frame() {
    // The inner `let x` must not leak into the global frame.
    let logged = run(
        "
        let x = 1
        function shadow() {
            let x = 99
            return x
        }
        log(shadow())
        log(x)
        ",
    )
    .unwrap();
    assert_eq!(logged, vec![Value::Number(99.0), Value::Number(1.0)]);
}

#[test]
fn test_undefined_variable_is_a_name_error() {
    assert_eq!(
        run("x + 1").unwrap_err(),
        RuntimeError::Name("x".to_string())
    );
}

#[test]
fn test_undefined_function_is_a_name_error() {
    assert_eq!(
        run("missing(1)").unwrap_err(),
        RuntimeError::Name("missing".to_string())
    );
}

#[test]
fn test_missing_argument_surfaces_as_name_error() {
    let err = run(
        "
        function add(a, b) {
            return a + b
        }
        log(add(1))
        ",
    )
    .unwrap_err();
    assert_eq!(err, RuntimeError::Name("b".to_string()));
}

#[test]
fn test_log_without_argument_is_a_type_error() {
    assert!(matches!(
        run("log()").unwrap_err(),
        RuntimeError::Type(_)
    ));
}

#[test]
fn test_extra_arguments_are_dropped() {
    let logged = run(
        "
        function double(a) {
            return a * 2
        }
        log(double(3, 99))
        ",
    )
    .unwrap();
    assert_eq!(logged, vec![Value::Number(6.0)]);
}

#[test]
fn test_function_without_return_fails() {
    let err = run(
        "
        function noop(a) {
            let b = a
        }
        noop(1)
        ",
    )
    .unwrap_err();
    assert_eq!(err, RuntimeError::MissingReturn("noop".to_string()));
}

#[test]
fn test_numeric_condition_is_a_type_error() {
    assert!(matches!(
        run("if (1) { log(1) }").unwrap_err(),
        RuntimeError::Type(_)
    ));
}

#[test]
fn test_calling_a_value_is_a_type_error() {
    assert!(matches!(
        run("let x = 1 x(2)").unwrap_err(),
        RuntimeError::Type(_)
    ));
}

#[test]
fn test_assignment_to_unbound_name_fails() {
    assert_eq!(
        run("x = 1").unwrap_err(),
        RuntimeError::Name("x".to_string())
    );
}

#[test]
fn test_top_level_return_stops_the_program() {
    let logged = run("log(1) return 0 log(2)").unwrap();
    assert_eq!(logged, vec![Value::Number(1.0)]);
}
