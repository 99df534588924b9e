use once_cell::sync::Lazy;
use std::collections::HashMap;

use crate::object::{BuiltinFunction, Value};

/*
The fixed, process-wide builtin table. Builtins are plain function
pointers rather than closures: none of them need to capture anything, and
keeping them as `fn` means `Value::Builtin` stays `Copy`-cheap to clone
out of the table on every identifier lookup.
*/

pub static BUILTINS: Lazy<HashMap<&'static str, BuiltinFunction>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert(
        "len",
        BuiltinFunction {
            name: "len",
            func: builtin_len,
        },
    );
    m.insert(
        "puts",
        BuiltinFunction {
            name: "puts",
            func: builtin_puts,
        },
    );
    m
});

pub fn lookup(name: &str) -> Option<Value> {
    BUILTINS.get(name).map(|b| Value::Builtin(*b))
}

fn builtin_len(args: &[Value]) -> Value {
    if args.len() != 1 {
        return Value::Error(format!(
            "wrong number of arguments: want=1, got={}",
            args.len()
        ));
    }
    match &args[0] {
        Value::String(s) => Value::Integer(s.chars().count() as i64),
        other => Value::Error(format!(
            "argument to `len` not supported, got {}",
            other.type_name()
        )),
    }
}

fn builtin_puts(args: &[Value]) -> Value {
    for arg in args {
        println!("{}", arg.inspect());
    }
    Value::Null
}
