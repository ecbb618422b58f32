// ABOUTME: print and friends

use crate::error::EvalError;
use crate::eval::{Globals, Interpreter};
use crate::value::Value;

pub fn register(globals: &mut Globals) {
    globals.register("print", print);
}

pub fn print(args: &[Value], _interp: &mut Interpreter) -> Result<Value, EvalError> {
    let rendered: Vec<String> = args.iter().map(|v| v.to_string()).collect();
    println!("{}", rendered.join(" "));
    Ok(Value::Nil)
}
