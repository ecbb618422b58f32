// ABOUTME: Lexical scope chain; a live Rc handle doubles as the scope stack

use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// One link in the scope chain. A function's closure is the `Rc<Environment>`
/// that was current at definition time; calling the function swaps the
/// interpreter's current environment for a fresh child of that closure, then
/// restores the caller's environment afterward. `Environment` only ever holds
/// user-defined bindings — built-ins live in the separate, non-chained
/// `Globals` table so a `let` can never shadow or clobber one by accident.
#[derive(Debug)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Value>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
        })
    }

    pub fn with_parent(parent: Rc<Environment>) -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(parent),
        })
    }

    /// Binds `name` in this environment, shadowing any outer binding.
    pub fn define(&self, name: impl Into<String>, value: Value) {
        self.bindings.borrow_mut().insert(name.into(), value);
    }

    /// Walks the chain looking for `name`, returning its current value.
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref().and_then(|p| p.get(name))
    }

    /// `let`/assignment semantics: mutate the nearest existing binding
    /// anywhere in the chain; if none exists, define fresh in `self` (the
    /// innermost scope). Returns `true` if an existing binding was mutated.
    pub fn assign(self: &Rc<Self>, name: &str, value: Value) -> bool {
        if self.assign_existing(name, &value) {
            return true;
        }
        self.define(name, value);
        false
    }

    fn assign_existing(&self, name: &str, value: &Value) -> bool {
        if self.bindings.borrow().contains_key(name) {
            self.bindings.borrow_mut().insert(name.to_string(), value.clone());
            return true;
        }
        match &self.parent {
            Some(p) => p.assign_existing(name, value),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_sees_parent_binding() {
        let parent = Environment::new();
        parent.define("x", Value::Int(1));
        let child = Environment::with_parent(parent);
        assert!(matches!(child.get("x"), Some(Value::Int(1))));
    }

    #[test]
    fn test_assign_mutates_outer_binding_not_shadow() {
        let parent = Environment::new();
        parent.define("x", Value::Int(1));
        let child = Environment::with_parent(parent.clone());
        child.assign("x", Value::Int(2));
        assert!(matches!(parent.get("x"), Some(Value::Int(2))));
    }

    #[test]
    fn test_assign_with_no_existing_binding_defines_in_innermost() {
        let parent = Environment::new();
        let child = Environment::with_parent(parent.clone());
        child.assign("y", Value::Int(5));
        assert!(parent.get("y").is_none());
        assert!(matches!(child.get("y"), Some(Value::Int(5))));
    }

    #[test]
    fn test_unbound_name_returns_none() {
        let env = Environment::new();
        assert!(env.get("missing").is_none());
    }
}
