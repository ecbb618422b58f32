// ABOUTME: Value types representing Veureka's runtime data and callables

use crate::ast::Stmt;
use crate::env::Environment;
use crate::error::EvalError;
use crate::eval::Interpreter;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A user-defined function (named `fn`, anonymous lambda, or bound method).
///
/// `closure` is a live reference to the scope enclosing the function at
/// definition time, not a snapshot: later mutations to variables in that
/// scope are visible the next time the function runs.
#[derive(Debug)]
pub struct UserFunction {
    pub name: Option<String>,
    pub params: Vec<String>,
    pub body: Rc<Vec<Stmt>>,
    pub closure: Rc<Environment>,
}

#[derive(Debug)]
pub struct ClassDef {
    pub name: String,
    pub methods: HashMap<String, Rc<UserFunction>>,
}

#[derive(Debug)]
pub struct Instance {
    pub class: Rc<ClassDef>,
    pub fields: HashMap<String, Value>,
}

/// Signature for functions registered in the `Globals` table (builtins.rs).
/// Takes the `Interpreter` so `map`/`filter`/`reduce` can call back into
/// `apply()` to invoke a user function argument.
pub type NativeFn = fn(&[Value], &mut Interpreter) -> Result<Value, EvalError>;

#[derive(Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<String>),
    List(Rc<RefCell<Vec<Value>>>),
    Map(Rc<RefCell<IndexMap<String, Value>>>),
    Function(Rc<UserFunction>),
    Class(Rc<ClassDef>),
    Instance(Rc<RefCell<Instance>>),
    BuiltIn(&'static str, NativeFn),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Value {
        Value::Str(Rc::new(s.into()))
    }

    pub fn list(items: Vec<Value>) -> Value {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn map(entries: IndexMap<String, Value>) -> Value {
        Value::Map(Rc::new(RefCell::new(entries)))
    }

    /// Short type tag as returned by the `type()` builtin and used in
    /// TypeError/AttributeError messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::Function(_) => "function",
            Value::Class(_) => "class",
            Value::Instance(_) => "instance",
            Value::BuiltIn(..) => "built-in function",
        }
    }

    /// Veureka truthiness: nil, false, numeric zero, empty
    /// string, and empty list are falsy; everything else — including empty
    /// maps and instances — is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(n) => *n != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.borrow().is_empty(),
            Value::Map(_) => true,
            Value::Function(_) | Value::Class(_) | Value::Instance(_) | Value::BuiltIn(..) => true,
        }
    }

    /// Numeric-aware, never-errors equality ("Equality compares
    /// across numeric types by value; across unrelated kinds it is false").
    pub fn values_equal(&self, other: &Value) -> bool {
        use Value::*;
        match (self, other) {
            (Nil, Nil) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Int(a), Float(b)) | (Float(b), Int(a)) => (*a as f64) == *b,
            (Str(a), Str(b)) => a == b,
            (List(a), List(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let a = a.borrow();
                let b = b.borrow();
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.values_equal(y))
            }
            (Map(a), Map(b)) => {
                if Rc::ptr_eq(a, b) {
                    return true;
                }
                let a = a.borrow();
                let b = b.borrow();
                a.len() == b.len()
                    && a.iter()
                        .all(|(k, v)| b.get(k).is_some_and(|w| v.values_equal(w)))
            }
            (Function(a), Function(b)) => Rc::ptr_eq(a, b),
            (Class(a), Class(b)) => Rc::ptr_eq(a, b),
            (Instance(a), Instance(b)) => Rc::ptr_eq(a, b),
            (BuiltIn(a, _), BuiltIn(b, _)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Float(n) => {
                if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{:.1}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::Str(s) => write!(f, "{}", s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
            Value::Function(func) => match &func.name {
                Some(name) => write!(f, "<fn {}>", name),
                None => write!(f, "<fn>"),
            },
            Value::Class(class) => write!(f, "<class {}>", class.name),
            Value::Instance(inst) => write!(f, "<{} instance>", inst.borrow().class.name),
            Value::BuiltIn(name, _) => write!(f, "<built-in fn {}>", name),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_display_keeps_decimal_point() {
        assert_eq!(format!("{}", Value::Float(3.0)), "3.0");
        assert_eq!(format!("{}", Value::Float(2.5)), "2.5");
    }

    #[test]
    fn test_int_display_has_no_decimal_point() {
        assert_eq!(format!("{}", Value::Int(3)), "3");
    }

    #[test]
    fn test_truthiness_boundaries() {
        assert!(!Value::Nil.is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::Float(0.0).is_truthy());
        assert!(!Value::string("").is_truthy());
        assert!(!Value::list(vec![]).is_truthy());

        assert!(Value::map(IndexMap::new()).is_truthy());
        assert!(Value::Int(-1).is_truthy());
        assert!(Value::string("0").is_truthy());
    }

    #[test]
    fn test_numeric_equality_crosses_int_float() {
        assert!(Value::Int(2).values_equal(&Value::Float(2.0)));
        assert!(!Value::Int(2).values_equal(&Value::Float(2.5)));
    }

    #[test]
    fn test_equality_across_unrelated_kinds_is_false_not_error() {
        assert!(!Value::Int(1).values_equal(&Value::string("1")));
        assert!(!Value::Nil.values_equal(&Value::Bool(false)));
    }

    #[test]
    fn test_list_display() {
        let v = Value::list(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(format!("{}", v), "[1, 2, 3]");
    }
}
