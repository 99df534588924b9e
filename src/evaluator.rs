use crate::ast::{Block, Expression, Program, Statement};
use crate::builtins;
use crate::environment::Environment;
use crate::object::{native_bool_to_value, FunctionValue, Value, FALSE, NULL, TRUE};
use std::rc::Rc;

/*
Recursive interpretation of the AST. Every branch that evaluates a
sub-node must check the result for `Value::Error` before using it and
return it unchanged if so — that short-circuit discipline is the entire
error model here, there is no separate exception channel. `macro_rules!`
below spells that check out once instead of repeating
`if result.is_error() { return result }` at every call site.

`Program` and `Block` share a statement list but differ in what a
`ReturnValue` means to them: a `Program` unwraps it (the return has
reached the top of the call, there's nothing left to bubble past), while
a `Block` must hand it back unopened so an enclosing function call can
still see it past however many nested blocks sit between the `return`
and the call boundary. Collapsing these two into one function is the
single most common way to break the nested-return tests.
*/

macro_rules! propagate {
    ($value:expr) => {{
        let value = $value;
        if value.is_error() {
            return value;
        }
        value
    }};
}

/// Evaluates a parsed program in the given environment.
pub fn eval(program: &Program, env: &Environment) -> Value {
    eval_program(program, env)
}

fn eval_program(program: &Program, env: &Environment) -> Value {
    let mut result = NULL.clone();
    for stmt in &program.statements {
        result = eval_statement(stmt, env);
        match result {
            Value::ReturnValue(inner) => return *inner,
            Value::Error(_) => return result,
            _ => {}
        }
    }
    result
}

fn eval_block(block: &Block, env: &Environment) -> Value {
    let mut result = NULL.clone();
    for stmt in &block.statements {
        result = eval_statement(stmt, env);
        if matches!(result, Value::ReturnValue(_) | Value::Error(_)) {
            return result;
        }
    }
    result
}

fn eval_statement(stmt: &Statement, env: &Environment) -> Value {
    match stmt {
        Statement::Expression { expression, .. } => eval_expression(expression, env),
        Statement::Let { name, value, .. } => {
            let value = propagate!(eval_expression(value, env));
            env.set(name.value.clone(), value);
            NULL.clone()
        }
        Statement::Return { value, .. } => {
            let value = propagate!(eval_expression(value, env));
            Value::ReturnValue(Box::new(value))
        }
        Statement::Block(block) => eval_block(block, env),
    }
}

fn eval_expression(expr: &Expression, env: &Environment) -> Value {
    match expr {
        Expression::IntegerLiteral { value, .. } => Value::Integer(*value),
        Expression::StringLiteral { value, .. } => Value::String(value.clone()),
        Expression::Boolean { value, .. } => native_bool_to_value(*value),
        Expression::Identifier(ident) => eval_identifier(&ident.value, env),
        Expression::Prefix {
            operator, right, ..
        } => {
            let right = propagate!(eval_expression(right, env));
            eval_prefix_expression(operator, right)
        }
        Expression::Infix {
            operator,
            left,
            right,
            ..
        } => {
            let left = propagate!(eval_expression(left, env));
            let right = propagate!(eval_expression(right, env));
            eval_infix_expression(operator, left, right)
        }
        Expression::If {
            condition,
            consequence,
            alternative,
            ..
        } => eval_if_expression(condition, consequence, alternative.as_ref(), env),
        Expression::FunctionLiteral {
            parameters, body, ..
        } => Value::Function(Rc::new(FunctionValue {
            parameters: parameters.clone(),
            body: body.clone(),
            env: env.clone(),
        })),
        Expression::Call {
            function,
            arguments,
            ..
        } => {
            let function = propagate!(eval_expression(function, env));
            let args = match eval_expressions(arguments, env) {
                Ok(args) => args,
                Err(err) => return err,
            };
            apply_function(function, args)
        }
    }
}

fn eval_identifier(name: &str, env: &Environment) -> Value {
    if let Some(value) = env.get(name) {
        return value;
    }
    if let Some(value) = builtins::lookup(name) {
        return value;
    }
    Value::Error(format!("identifier not found: {name}"))
}

fn eval_prefix_expression(operator: &str, right: Value) -> Value {
    match operator {
        "!" => eval_bang_operator(right),
        "-" => eval_minus_prefix_operator(right),
        _ => Value::Error(format!("unknown operator: {operator}{}", right.type_name())),
    }
}

fn eval_bang_operator(right: Value) -> Value {
    match right {
        Value::Boolean(true) => FALSE.clone(),
        Value::Boolean(false) => TRUE.clone(),
        Value::Null => TRUE.clone(),
        _ => FALSE.clone(),
    }
}

fn eval_minus_prefix_operator(right: Value) -> Value {
    match right {
        Value::Integer(n) => Value::Integer(n.wrapping_neg()),
        other => Value::Error(format!("unknown operator: -{}", other.type_name())),
    }
}

fn eval_infix_expression(operator: &str, left: Value, right: Value) -> Value {
    match (&left, &right) {
        (Value::Integer(l), Value::Integer(r)) => eval_integer_infix_expression(operator, *l, *r),
        (Value::String(l), Value::String(r)) => eval_string_infix_expression(operator, l, r),
        _ if operator == "==" => native_bool_to_value(left == right),
        _ if operator == "!=" => native_bool_to_value(left != right),
        _ if left.type_name() != right.type_name() => Value::Error(format!(
            "type mismatch: {} {operator} {}",
            left.type_name(),
            right.type_name()
        )),
        _ => Value::Error(format!(
            "unknown operator: {} {operator} {}",
            left.type_name(),
            right.type_name()
        )),
    }
}

fn eval_integer_infix_expression(operator: &str, left: i64, right: i64) -> Value {
    match operator {
        "+" => Value::Integer(left.wrapping_add(right)),
        "-" => Value::Integer(left.wrapping_sub(right)),
        "*" => Value::Integer(left.wrapping_mul(right)),
        "/" => {
            if right == 0 {
                Value::Error("division by zero".to_string())
            } else {
                Value::Integer(left.wrapping_div(right))
            }
        }
        "<" => native_bool_to_value(left < right),
        ">" => native_bool_to_value(left > right),
        "==" => native_bool_to_value(left == right),
        "!=" => native_bool_to_value(left != right),
        _ => Value::Error(format!("unknown operator: INTEGER {operator} INTEGER")),
    }
}

fn eval_string_infix_expression(operator: &str, left: &str, right: &str) -> Value {
    if operator != "+" {
        return Value::Error(format!("unknown operator: STRING {operator} STRING"));
    }
    Value::String(format!("{left}{right}"))
}

fn eval_if_expression(
    condition: &Expression,
    consequence: &Block,
    alternative: Option<&Block>,
    env: &Environment,
) -> Value {
    let condition = propagate!(eval_expression(condition, env));
    if condition.is_truthy() {
        eval_block(consequence, env)
    } else if let Some(alternative) = alternative {
        eval_block(alternative, env)
    } else {
        NULL.clone()
    }
}

fn eval_expressions(exprs: &[Expression], env: &Environment) -> Result<Vec<Value>, Value> {
    let mut result = Vec::with_capacity(exprs.len());
    for expr in exprs {
        let value = eval_expression(expr, env);
        if value.is_error() {
            return Err(value);
        }
        result.push(value);
    }
    Ok(result)
}

fn apply_function(function: Value, args: Vec<Value>) -> Value {
    match function {
        Value::Function(func) => {
            if func.parameters.len() != args.len() {
                return Value::Error(format!(
                    "wrong number of arguments: want={}, got={}",
                    func.parameters.len(),
                    args.len()
                ));
            }
            let extended_env = extend_function_env(&func, args);
            let evaluated = eval_block(&func.body, &extended_env);
            unwrap_return_value(evaluated)
        }
        Value::Builtin(builtin) => (builtin.func)(&args),
        other => Value::Error(format!("not a function: {}", other.type_name())),
    }
}

fn extend_function_env(func: &FunctionValue, args: Vec<Value>) -> Environment {
    let env = Environment::new_enclosed(&func.env);
    for (param, arg) in func.parameters.iter().zip(args) {
        env.set(param.value.clone(), arg);
    }
    env
}

fn unwrap_return_value(value: Value) -> Value {
    match value {
        Value::ReturnValue(inner) => *inner,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn run(input: &str) -> Value {
        let (program, errors) = parse(input);
        assert!(errors.is_empty(), "parser errors for {input:?}: {errors:?}");
        eval(&program, &Environment::new())
    }

    #[test]
    fn integer_and_arithmetic_expressions() {
        let cases = [
            ("5", 5),
            ("10", 10),
            ("-5", -5),
            ("-10", -10),
            ("5 + 5 + 5 + 5 - 10", 10),
            ("2 * 2 * 2 * 2 * 2", 32),
            ("-50 + 100 + -50", 0),
            ("5 * 2 + 10", 20),
            ("5 + 2 * 10", 25),
            ("20 + 2 * -10", 0),
            ("50 / 2 * 2 + 10", 60),
            ("2 * (5 + 10)", 30),
            ("3 * 3 * 3 + 10", 37),
            ("3 * (3 * 3) + 10", 37),
            ("(5 + 10 * 2 + 15 / 3) * 2 + -10", 50),
        ];
        for (input, expected) in cases {
            assert_eq!(run(input), Value::Integer(expected), "input: {input}");
        }
    }

    #[test]
    fn boolean_expressions() {
        let cases = [
            ("true", true),
            ("false", false),
            ("1 < 2", true),
            ("1 > 2", false),
            ("1 < 1", false),
            ("1 > 1", false),
            ("1 == 1", true),
            ("1 != 1", false),
            ("1 == 2", false),
            ("1 != 2", true),
            ("true == true", true),
            ("false == false", true),
            ("true == false", false),
            ("true != false", true),
            ("(1 < 2) == true", true),
            ("(1 < 2) == false", false),
        ];
        for (input, expected) in cases {
            assert_eq!(run(input), Value::Boolean(expected), "input: {input}");
        }
    }

    #[test]
    fn bang_operator() {
        let cases = [
            ("!true", false),
            ("!false", true),
            ("!5", false),
            ("!!true", true),
            ("!!false", false),
            ("!!5", true),
        ];
        for (input, expected) in cases {
            assert_eq!(run(input), Value::Boolean(expected), "input: {input}");
        }
    }

    #[test]
    fn if_else_expressions() {
        assert_eq!(run("if (true) { 10 }"), Value::Integer(10));
        assert_eq!(run("if (false) { 10 }"), Value::Null);
        assert_eq!(run("if (1) { 10 }"), Value::Integer(10));
        assert_eq!(run("if (1 < 2) { 10 }"), Value::Integer(10));
        assert_eq!(run("if (1 > 2) { 10 }"), Value::Null);
        assert_eq!(run("if (1 > 2) { 10 } else { 20 }"), Value::Integer(20));
        assert_eq!(run("if (1 < 2) { 10 } else { 20 }"), Value::Integer(10));
    }

    #[test]
    fn return_statements_unwrap_at_program_top_level() {
        assert_eq!(run("return 10;"), Value::Integer(10));
        assert_eq!(run("return 10; 9;"), Value::Integer(10));
        assert_eq!(run("return 2 * 5; 9;"), Value::Integer(10));
        assert_eq!(run("9; return 2 * 5; 9;"), Value::Integer(10));
    }

    #[test]
    fn nested_blocks_preserve_return_value_until_the_function_boundary() {
        let input = "if (10 > 1) {\n  if (10 > 1) {\n    return 10;\n  }\n  return 1;\n}";
        assert_eq!(run(input), Value::Integer(10));
    }

    #[test]
    fn error_handling_messages() {
        let cases = [
            ("5 + true;", "type mismatch: INTEGER + BOOLEAN"),
            ("5 + true; 5;", "type mismatch: INTEGER + BOOLEAN"),
            ("-true", "unknown operator: -BOOLEAN"),
            ("true + false;", "unknown operator: BOOLEAN + BOOLEAN"),
            ("5; true + false; 5", "unknown operator: BOOLEAN + BOOLEAN"),
            (
                "if (10 > 1) { true + false; }",
                "unknown operator: BOOLEAN + BOOLEAN",
            ),
            (
                "if (10 > 1) { if (10 > 1) { return true + false; } return 1; }",
                "unknown operator: BOOLEAN + BOOLEAN",
            ),
            ("foobar", "identifier not found: foobar"),
            (
                r#""Hello" - "World""#,
                "unknown operator: STRING - STRING",
            ),
        ];
        for (input, expected) in cases {
            match run(input) {
                Value::Error(msg) => assert_eq!(msg, expected, "input: {input}"),
                other => panic!("expected Error for {input:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn error_short_circuits_the_second_operator() {
        // `5 + true` already errors; the outer `+ 5` must never be evaluated.
        match run("5 + true + 5") {
            Value::Error(msg) => assert_eq!(msg, "type mismatch: INTEGER + BOOLEAN"),
            other => panic!("expected a single error, got {other:?}"),
        }
    }

    #[test]
    fn let_statements_bind_and_shadow() {
        assert_eq!(run("let a = 5; a;"), Value::Integer(5));
        assert_eq!(run("let a = 5 * 5; a;"), Value::Integer(25));
        assert_eq!(run("let a = 5; let b = a; b;"), Value::Integer(5));
        assert_eq!(
            run("let a = 5; let b = a; let c = a + b + 5; c;"),
            Value::Integer(15)
        );
        assert_eq!(run("let x = 1; let x = 2; x;"), Value::Integer(2));
    }

    #[test]
    fn function_application() {
        assert_eq!(
            run("let identity = fn(x) { x; }; identity(5);"),
            Value::Integer(5)
        );
        assert_eq!(
            run("let identity = fn(x) { return x; }; identity(5);"),
            Value::Integer(5)
        );
        assert_eq!(
            run("let double = fn(x) { x * 2; }; double(5);"),
            Value::Integer(10)
        );
        assert_eq!(
            run("let add = fn(x, y) { x + y; }; add(5, 5);"),
            Value::Integer(10)
        );
        assert_eq!(
            run("let add = fn(x, y) { x + y; }; add(5 + 5, add(5, 5));"),
            Value::Integer(20)
        );
        assert_eq!(run("fn(x) { x; }(5)"), Value::Integer(5));
    }

    #[test]
    fn closures_capture_their_defining_environment() {
        let input = "let newAdder = fn(x) { fn(y) { x + y }; }; let addTwo = newAdder(2); addTwo(2);";
        assert_eq!(run(input), Value::Integer(4));
    }

    #[test]
    fn nested_closure_capture() {
        let input = "let n = fn(x) { fn(y) { x + y } }; let a = n(2); a(3)";
        assert_eq!(run(input), Value::Integer(5));
    }

    #[test]
    fn recursive_function_via_self_reference_in_its_own_environment() {
        let input = "let counter = fn(x) { if (x > 3) { return true; } else { counter(x + 1); } }; counter(0);";
        assert_eq!(run(input), Value::Boolean(true));
    }

    #[test]
    fn string_literals_and_concatenation() {
        assert_eq!(run(r#""Hello World!""#), Value::String("Hello World!".into()));
        assert_eq!(
            run(r#""Hello" + " " + "World""#),
            Value::String("Hello World".into())
        );
    }

    #[test]
    fn builtin_len_over_strings() {
        assert_eq!(run(r#"len("")"#), Value::Integer(0));
        assert_eq!(run(r#"len("four")"#), Value::Integer(4));
        assert_eq!(run(r#"len("hello world")"#), Value::Integer(11));
        match run("len(1)") {
            Value::Error(msg) => assert_eq!(msg, "argument to `len` not supported, got INTEGER"),
            other => panic!("expected error, got {other:?}"),
        }
        match run(r#"len("one", "two")"#) {
            Value::Error(msg) => assert_eq!(msg, "wrong number of arguments: want=1, got=2"),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn calling_a_non_function_is_an_error() {
        match run("let x = 5; x();") {
            Value::Error(msg) => assert_eq!(msg, "not a function: INTEGER"),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn wrong_argument_count_is_an_error_not_a_panic() {
        match run("let add = fn(x, y) { x + y; }; add(1);") {
            Value::Error(msg) => assert_eq!(msg, "wrong number of arguments: want=2, got=1"),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn division_by_zero_is_an_error_not_a_panic() {
        match run("10 / 0;") {
            Value::Error(msg) => assert_eq!(msg, "division by zero"),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn environment_persists_across_sequential_evaluations() {
        let env = Environment::new();
        let (program1, errors1) = parse("let x = 10;");
        assert!(errors1.is_empty());
        eval(&program1, &env);

        let (program2, errors2) = parse("x + 5;");
        assert!(errors2.is_empty());
        assert_eq!(eval(&program2, &env), Value::Integer(15));
    }
}
