// ABOUTME: len and range

use crate::error::EvalError;
use crate::eval::{Globals, Interpreter};
use crate::value::Value;

pub fn register(globals: &mut Globals) {
    globals.register("len", len);
    globals.register("range", range);
}

pub fn len(args: &[Value], _interp: &mut Interpreter) -> Result<Value, EvalError> {
    let value = args
        .first()
        .ok_or_else(|| EvalError::type_error("len", "expected 1 argument"))?;
    let n = match value {
        Value::List(items) => items.borrow().len(),
        Value::Str(s) => s.chars().count(),
        Value::Map(entries) => entries.borrow().len(),
        other => {
            return Err(EvalError::type_error(
                "len",
                format!("'{}' has no length", other.type_name()),
            ))
        }
    };
    Ok(Value::Int(n as i64))
}

/// `range(stop)`, `range(start, stop)`, or `range(start, stop, step)` — all
/// integer arguments, materialized eagerly into a list.
pub fn range(args: &[Value], _interp: &mut Interpreter) -> Result<Value, EvalError> {
    let as_int = |v: &Value| match v {
        Value::Int(n) => Ok(*n),
        other => Err(EvalError::type_error(
            "range",
            format!("expected int, got '{}'", other.type_name()),
        )),
    };
    let (start, stop, step) = match args {
        [stop] => (0, as_int(stop)?, 1),
        [start, stop] => (as_int(start)?, as_int(stop)?, 1),
        [start, stop, step] => (as_int(start)?, as_int(stop)?, as_int(step)?),
        _ => return Err(EvalError::type_error("range", "expected 1 to 3 arguments")),
    };
    if step == 0 {
        return Err(EvalError::type_error("range", "step cannot be zero"));
    }
    let mut values = Vec::new();
    let mut i = start;
    if step > 0 {
        while i < stop {
            values.push(Value::Int(i));
            i += step;
        }
    } else {
        while i > stop {
            values.push(Value::Int(i));
            i += step;
        }
    }
    Ok(Value::list(values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::Interpreter;

    #[test]
    fn test_len_over_list_string_and_map() {
        let mut interp = Interpreter::new();
        assert!(matches!(
            len(&[Value::list(vec![Value::Int(1), Value::Int(2)])], &mut interp),
            Ok(Value::Int(2))
        ));
        assert!(matches!(len(&[Value::string("hi")], &mut interp), Ok(Value::Int(2))));
    }

    #[test]
    fn test_range_with_one_two_and_three_arguments() {
        let mut interp = Interpreter::new();
        let unwrap_ints = |v: Value| match v {
            Value::List(items) => items
                .borrow()
                .iter()
                .map(|x| match x {
                    Value::Int(n) => *n,
                    _ => panic!("expected int"),
                })
                .collect::<Vec<_>>(),
            _ => panic!("expected list"),
        };
        assert_eq!(unwrap_ints(range(&[Value::Int(3)], &mut interp).unwrap()), vec![0, 1, 2]);
        assert_eq!(
            unwrap_ints(range(&[Value::Int(1), Value::Int(4)], &mut interp).unwrap()),
            vec![1, 2, 3]
        );
        assert_eq!(
            unwrap_ints(range(&[Value::Int(10), Value::Int(0), Value::Int(-2)], &mut interp).unwrap()),
            vec![10, 8, 6, 4, 2]
        );
    }

    #[test]
    fn test_range_rejects_zero_step() {
        let mut interp = Interpreter::new();
        assert!(range(&[Value::Int(0), Value::Int(5), Value::Int(0)], &mut interp).is_err());
    }
}
