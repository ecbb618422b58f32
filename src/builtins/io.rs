// ABOUTME: input() — blocking line read from stdin

use crate::error::EvalError;
use crate::eval::{Globals, Interpreter};
use crate::value::Value;
use std::io::Write;

pub fn register(globals: &mut Globals) {
    globals.register("input", input);
}

/// `input()` or `input(prompt)`. Blocks the whole interpreter;
/// the trailing newline is stripped, matching the scripting languages this
/// is modeled on. Returns `""` on EOF rather than erroring, so a script
/// piped input that runs dry degrades to empty strings instead of aborting.
pub fn input(args: &[Value], _interp: &mut Interpreter) -> Result<Value, EvalError> {
    if let Some(prompt) = args.first() {
        print!("{prompt}");
        std::io::stdout()
            .flush()
            .map_err(|e| EvalError::type_error("input", format!("failed to flush stdout: {e}")))?;
    }
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .map_err(|e| EvalError::type_error("input", format!("failed to read stdin: {e}")))?;
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(Value::string(line))
}
