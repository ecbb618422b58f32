// ABOUTME: sum/max/min/abs over lists and numbers

use crate::error::EvalError;
use crate::eval::{Globals, Interpreter};
use crate::value::Value;

pub fn register(globals: &mut Globals) {
    globals.register("sum", sum);
    globals.register("max", max);
    globals.register("min", min);
    globals.register("abs", abs);
}

fn as_list<'a>(fn_name: &str, value: &'a Value) -> Result<std::cell::Ref<'a, Vec<Value>>, EvalError> {
    match value {
        Value::List(items) => Ok(items.borrow()),
        other => Err(EvalError::type_error(
            fn_name,
            format!("expected a list, got '{}'", other.type_name()),
        )),
    }
}

fn numeric_cmp(fn_name: &str, a: &Value, b: &Value) -> Result<std::cmp::Ordering, EvalError> {
    let (x, y) = match (a, b) {
        (Value::Int(x), Value::Int(y)) => (*x as f64, *y as f64),
        (Value::Int(x), Value::Float(y)) => (*x as f64, *y),
        (Value::Float(x), Value::Int(y)) => (*x, *y as f64),
        (Value::Float(x), Value::Float(y)) => (*x, *y),
        _ => {
            return Err(EvalError::type_error(
                fn_name,
                format!("cannot compare '{}' and '{}'", a.type_name(), b.type_name()),
            ))
        }
    };
    x.partial_cmp(&y)
        .ok_or_else(|| EvalError::type_error(fn_name, "NaN is not orderable"))
}

/// `sum(list)` — ints stay int unless any element is float.
pub fn sum(args: &[Value], _interp: &mut Interpreter) -> Result<Value, EvalError> {
    let value = args
        .first()
        .ok_or_else(|| EvalError::type_error("sum", "expected 1 argument"))?;
    let items = as_list("sum", value)?;
    let mut int_total: i64 = 0;
    let mut float_total: f64 = 0.0;
    let mut saw_float = false;
    for item in items.iter() {
        match item {
            Value::Int(n) => {
                int_total += n;
                float_total += *n as f64;
            }
            Value::Float(n) => {
                saw_float = true;
                float_total += n;
            }
            other => {
                return Err(EvalError::type_error(
                    "sum",
                    format!("unsupported element type '{}'", other.type_name()),
                ))
            }
        }
    }
    Ok(if saw_float { Value::Float(float_total) } else { Value::Int(int_total) })
}

pub fn max(args: &[Value], _interp: &mut Interpreter) -> Result<Value, EvalError> {
    let value = args
        .first()
        .ok_or_else(|| EvalError::type_error("max", "expected 1 argument"))?;
    let items = as_list("max", value)?;
    let mut best: Option<&Value> = None;
    for item in items.iter() {
        best = match best {
            None => Some(item),
            Some(current) => {
                if numeric_cmp("max", item, current)?.is_gt() {
                    Some(item)
                } else {
                    Some(current)
                }
            }
        };
    }
    best.cloned()
        .ok_or_else(|| EvalError::type_error("max", "arg is an empty sequence"))
}

pub fn min(args: &[Value], _interp: &mut Interpreter) -> Result<Value, EvalError> {
    let value = args
        .first()
        .ok_or_else(|| EvalError::type_error("min", "expected 1 argument"))?;
    let items = as_list("min", value)?;
    let mut best: Option<&Value> = None;
    for item in items.iter() {
        best = match best {
            None => Some(item),
            Some(current) => {
                if numeric_cmp("min", item, current)?.is_lt() {
                    Some(item)
                } else {
                    Some(current)
                }
            }
        };
    }
    best.cloned()
        .ok_or_else(|| EvalError::type_error("min", "arg is an empty sequence"))
}

pub fn abs(args: &[Value], _interp: &mut Interpreter) -> Result<Value, EvalError> {
    let value = args
        .first()
        .ok_or_else(|| EvalError::type_error("abs", "expected 1 argument"))?;
    match value {
        Value::Int(n) => Ok(Value::Int(n.abs())),
        Value::Float(n) => Ok(Value::Float(n.abs())),
        other => Err(EvalError::type_error(
            "abs",
            format!("expected a number, got '{}'", other.type_name()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(values: Vec<Value>) -> Value {
        Value::list(values)
    }

    #[test]
    fn test_sum_stays_int_with_all_int_elements() {
        let mut interp = Interpreter::new();
        let result = sum(&[list(vec![Value::Int(1), Value::Int(2), Value::Int(3)])], &mut interp).unwrap();
        assert!(matches!(result, Value::Int(6)));
    }

    #[test]
    fn test_sum_promotes_to_float_with_any_float_element() {
        let mut interp = Interpreter::new();
        let result = sum(&[list(vec![Value::Int(1), Value::Float(2.5)])], &mut interp).unwrap();
        assert!(matches!(result, Value::Float(n) if n == 3.5));
    }

    #[test]
    fn test_max_and_min_over_mixed_numeric_list() {
        let mut interp = Interpreter::new();
        let xs = list(vec![Value::Int(3), Value::Float(1.5), Value::Int(7)]);
        assert!(matches!(max(&[xs.clone()], &mut interp).unwrap(), Value::Int(7)));
        assert!(matches!(min(&[xs], &mut interp).unwrap(), Value::Float(n) if n == 1.5));
    }

    #[test]
    fn test_abs_on_negative_int_and_float() {
        let mut interp = Interpreter::new();
        assert!(matches!(abs(&[Value::Int(-3)], &mut interp).unwrap(), Value::Int(3)));
        assert!(matches!(abs(&[Value::Float(-2.5)], &mut interp).unwrap(), Value::Float(n) if n == 2.5));
    }
}
