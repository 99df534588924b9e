use std::fmt;
use std::rc::Rc;

use crate::ast::{Block, Identifier};
use crate::environment::Environment;

/*
A single tagged variant type covers every runtime value. `ReturnValue` is
bookkeeping, not a user-visible type: it exists so a `return` inside nested
blocks can reach the enclosing function call without being unwrapped by
every block it passes through (see evaluator.rs's Program vs Block
handling). It must never be the final result of a top-level `Eval`.

Equality here only needs to satisfy the evaluator's identity-based `==`/`!=`
fallback for non-integer, non-string operands (spec section 4.3). Since
`Boolean`/`Null` aren't separately-allocated objects in this representation,
structural equality on them already coincides with "the same singleton" —
there's exactly one `Value::Null` shape and exactly two `Value::Boolean`
shapes. `Function` and `Builtin` are compared by identity (`Rc::ptr_eq` /
function-pointer equality) since two functions with identical source are
still different functions.
*/

#[derive(Debug, Clone)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    String(String),
    Null,
    ReturnValue(Box<Value>),
    Error(String),
    Function(Rc<FunctionValue>),
    Builtin(BuiltinFunction),
}

#[derive(Debug)]
pub struct FunctionValue {
    pub parameters: Vec<Identifier>,
    pub body: Block,
    pub env: Environment,
}

pub type BuiltinImpl = fn(&[Value]) -> Value;

#[derive(Debug, Clone, Copy)]
pub struct BuiltinFunction {
    pub name: &'static str,
    pub func: BuiltinImpl,
}

impl PartialEq for BuiltinFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && std::ptr::eq(self.func as *const (), other.func as *const ())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::ReturnValue(a), Value::ReturnValue(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            _ => false,
        }
    }
}

/// Process-wide boolean singletons. The evaluator never allocates a new
/// `Value::Boolean` for a literal or comparison result — it always hands
/// back one of these two so `!`'s identity-style matching stays meaningful
/// even though the Rust representation doesn't require it structurally.
/// Plain `const`s rather than `once_cell::sync::Lazy`: `Value::Function`
/// holds an `Rc`, so `Value` is neither `Send` nor `Sync` and can't live
/// behind a `Lazy` static; these two variants never allocate, so there's
/// nothing to defer in the first place.
pub const TRUE: Value = Value::Boolean(true);
pub const FALSE: Value = Value::Boolean(false);
pub const NULL: Value = Value::Null;

pub fn native_bool_to_value(input: bool) -> Value {
    if input {
        TRUE.clone()
    } else {
        FALSE.clone()
    }
}

impl Value {
    /// The type name used in diagnostic messages (`"identifier not found"`
    /// style errors use `Display`; type-mismatch style errors use this).
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Boolean(_) => "BOOLEAN",
            Value::String(_) => "STRING",
            Value::Null => "NULL",
            Value::ReturnValue(_) => "RETURN_VALUE",
            Value::Error(_) => "ERROR",
            Value::Function(_) => "FUNCTION",
            Value::Builtin(_) => "BUILTIN",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// `Truthy`: any value other than `NULL` and `FALSE`.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Null | Value::Boolean(false))
    }

    /// Canonical human-readable rendering, used by the driver to display
    /// results and recursively by `Function`'s own rendering.
    pub fn inspect(&self) -> String {
        match self {
            Value::Integer(n) => n.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::String(s) => s.clone(),
            Value::Null => "null".to_string(),
            Value::ReturnValue(inner) => inner.inspect(),
            Value::Error(msg) => format!("ERROR: {msg}"),
            Value::Function(func) => {
                let params: Vec<String> =
                    func.parameters.iter().map(|p| p.value.clone()).collect();
                format!("fn({}) {{\n{}\n}}", params.join(", "), func.body)
            }
            Value::Builtin(b) => format!("builtin function {}", b.name),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inspect())
    }
}
