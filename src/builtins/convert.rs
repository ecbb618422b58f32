// ABOUTME: str/int/float/type coercions

use crate::error::EvalError;
use crate::eval::{Globals, Interpreter};
use crate::value::Value;

pub fn register(globals: &mut Globals) {
    globals.register("str", str_);
    globals.register("int", int);
    globals.register("float", float);
    globals.register("type", type_of);
}

pub fn str_(args: &[Value], _interp: &mut Interpreter) -> Result<Value, EvalError> {
    let value = args
        .first()
        .ok_or_else(|| EvalError::type_error("str", "expected 1 argument"))?;
    Ok(Value::string(value.to_string()))
}

pub fn int(args: &[Value], _interp: &mut Interpreter) -> Result<Value, EvalError> {
    let value = args
        .first()
        .ok_or_else(|| EvalError::type_error("int", "expected 1 argument"))?;
    match value {
        Value::Int(n) => Ok(Value::Int(*n)),
        Value::Float(n) => Ok(Value::Int(*n as i64)),
        Value::Bool(b) => Ok(Value::Int(if *b { 1 } else { 0 })),
        Value::Str(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| EvalError::type_error("int", format!("invalid literal '{s}'"))),
        other => Err(EvalError::type_error(
            "int",
            format!("cannot convert '{}' to int", other.type_name()),
        )),
    }
}

pub fn float(args: &[Value], _interp: &mut Interpreter) -> Result<Value, EvalError> {
    let value = args
        .first()
        .ok_or_else(|| EvalError::type_error("float", "expected 1 argument"))?;
    match value {
        Value::Float(n) => Ok(Value::Float(*n)),
        Value::Int(n) => Ok(Value::Float(*n as f64)),
        Value::Str(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| EvalError::type_error("float", format!("invalid literal '{s}'"))),
        other => Err(EvalError::type_error(
            "float",
            format!("cannot convert '{}' to float", other.type_name()),
        )),
    }
}

pub fn type_of(args: &[Value], _interp: &mut Interpreter) -> Result<Value, EvalError> {
    let value = args
        .first()
        .ok_or_else(|| EvalError::type_error("type", "expected 1 argument"))?;
    Ok(Value::string(value.type_name()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::Interpreter;

    #[test]
    fn test_int_str_roundtrip() {
        let mut interp = Interpreter::new();
        let s = str_(&[Value::Int(42)], &mut interp).unwrap();
        assert!(matches!(int(&[s], &mut interp), Ok(Value::Int(42))));
    }

    #[test]
    fn test_float_str_roundtrip() {
        let mut interp = Interpreter::new();
        let s = str_(&[Value::Float(3.5)], &mut interp).unwrap();
        assert!(matches!(float(&[s], &mut interp), Ok(Value::Float(n)) if n == 3.5));
    }

    #[test]
    fn test_type_tags() {
        let mut interp = Interpreter::new();
        assert!(matches!(type_of(&[Value::Int(1)], &mut interp), Ok(Value::Str(s)) if *s == "int"));
        assert!(matches!(type_of(&[Value::Nil], &mut interp), Ok(Value::Str(s)) if *s == "nil"));
    }

    #[test]
    fn test_int_rejects_malformed_string() {
        let mut interp = Interpreter::new();
        assert!(int(&[Value::string("not a number")], &mut interp).is_err());
    }
}
