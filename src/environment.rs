use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::object::Value;

/*
A name -> value mapping plus an optional outer link, forming the lexical
scope chain. Lookup walks outer links until the name resolves or the chain
ends; binding always writes into the innermost scope of the environment
handle it's called on (there is no "find the scope that owns this name and
mutate it" operation — `let` always shadows).

Shared ownership (`Rc<RefCell<...>>`) is what lets a function literal
capture "the environment active at its definition" and have that capture
observe later bindings written into the same scope by other code running
against the same `Rc` — e.g. a function that calls itself by name before
its own `let` binding has gone out of scope. The trade-off is that a
function value stored back into its own enclosing environment forms a
reference cycle the collector never reclaims; see DESIGN.md for why that
is an accepted trade-off here rather than something this crate works
around with weak back-edges or an arena.
*/

#[derive(Debug, Default)]
struct EnvironmentInner {
    store: HashMap<String, Value>,
    outer: Option<Environment>,
}

#[derive(Debug, Clone)]
pub struct Environment(Rc<RefCell<EnvironmentInner>>);

impl Environment {
    /// A fresh root environment with no outer scope.
    pub fn new() -> Self {
        Environment(Rc::new(RefCell::new(EnvironmentInner::default())))
    }

    /// A nested scope whose lookups fall back to `outer` when a name isn't
    /// bound locally.
    pub fn new_enclosed(outer: &Environment) -> Self {
        Environment(Rc::new(RefCell::new(EnvironmentInner {
            store: HashMap::new(),
            outer: Some(outer.clone()),
        })))
    }

    /// Walks the outer chain looking for `name`.
    pub fn get(&self, name: &str) -> Option<Value> {
        let inner = self.0.borrow();
        match inner.store.get(name) {
            Some(value) => Some(value.clone()),
            None => inner.outer.as_ref().and_then(|outer| outer.get(name)),
        }
    }

    /// Always binds in the innermost scope (this environment handle).
    pub fn set(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().store.insert(name.into(), value);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
