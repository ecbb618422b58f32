// ABOUTME: map/filter/reduce — the built-ins that call back into the evaluator

use crate::error::EvalError;
use crate::eval::{Globals, Interpreter};
use crate::value::Value;

pub fn register(globals: &mut Globals) {
    globals.register("map", map);
    globals.register("filter", filter);
    globals.register("reduce", reduce);
}

fn as_items(fn_name: &str, value: &Value) -> Result<Vec<Value>, EvalError> {
    match value {
        Value::List(items) => Ok(items.borrow().clone()),
        other => Err(EvalError::type_error(
            fn_name,
            format!("expected a list, got '{}'", other.type_name()),
        )),
    }
}

/// `map(iterable, f)` — applies `f` to each element, collecting results.
pub fn map(args: &[Value], interp: &mut Interpreter) -> Result<Value, EvalError> {
    let [iterable, f] = args else {
        return Err(EvalError::type_error("map", "expected 2 arguments (iterable, fn)"));
    };
    let items = as_items("map", iterable)?;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        out.push(interp.apply(f, &[item])?);
    }
    Ok(Value::list(out))
}

/// `filter(iterable, f)` — keeps elements where `f(element)` is truthy.
pub fn filter(args: &[Value], interp: &mut Interpreter) -> Result<Value, EvalError> {
    let [iterable, f] = args else {
        return Err(EvalError::type_error("filter", "expected 2 arguments (iterable, fn)"));
    };
    let items = as_items("filter", iterable)?;
    let mut out = Vec::new();
    for item in items {
        if interp.apply(f, &[item.clone()])?.is_truthy() {
            out.push(item);
        }
    }
    Ok(Value::list(out))
}

/// `reduce(iterable, f, initial?)` — left fold. With no `initial`, the first
/// element seeds the accumulator and folding starts from the second (an
/// empty iterable with no `initial` is a TypeError, matching Python's
/// `functools.reduce`).
pub fn reduce(args: &[Value], interp: &mut Interpreter) -> Result<Value, EvalError> {
    let (iterable, f, initial) = match args {
        [iterable, f] => (iterable, f, None),
        [iterable, f, initial] => (iterable, f, Some(initial.clone())),
        _ => {
            return Err(EvalError::type_error(
                "reduce",
                "expected 2 or 3 arguments (iterable, fn, initial?)",
            ))
        }
    };
    let items = as_items("reduce", iterable)?;
    let mut iter = items.into_iter();
    let mut acc = match initial {
        Some(v) => v,
        None => iter
            .next()
            .ok_or_else(|| EvalError::type_error("reduce", "reduce() of empty sequence with no initial value"))?,
    };
    for item in iter {
        acc = interp.apply(f, &[acc, item])?;
    }
    Ok(acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::scanner::scan;

    fn eval_fn(interp: &mut Interpreter, source: &str) -> Value {
        let program = parse(scan(source).unwrap()).unwrap();
        interp.execute(&program).unwrap()
    }

    #[test]
    fn test_map_applies_identity_unchanged() {
        let mut interp = Interpreter::new();
        let xs = eval_fn(&mut interp, "let xs = [1,2,3]\nlet f = fn(x) => x\nmap(xs, f)");
        assert!(matches!(xs, Value::List(items) if items.borrow().len() == 3));
    }

    #[test]
    fn test_filter_with_always_true_keeps_all() {
        let mut interp = Interpreter::new();
        let xs = eval_fn(&mut interp, "let xs = [1,2,3]\nlet f = fn(x) => true\nfilter(xs, f)");
        assert!(matches!(xs, Value::List(items) if items.borrow().len() == 3));
    }

    #[test]
    fn test_reduce_sums_with_initial() {
        let mut interp = Interpreter::new();
        let result = eval_fn(
            &mut interp,
            "let xs = [1,2,3,4,5]\nreduce(xs, fn(a,b) => a+b, 0)",
        );
        assert!(matches!(result, Value::Int(15)));
    }

    #[test]
    fn test_reduce_single_element_with_initial_applies_f_once() {
        let mut interp = Interpreter::new();
        let result = eval_fn(&mut interp, "reduce([5], fn(a,b) => a+b, 10)");
        assert!(matches!(result, Value::Int(15)));
    }
}
