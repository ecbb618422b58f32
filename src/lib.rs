// ABOUTME: Library entry points — compile source to a Program, execute it against an Interpreter

pub mod ast;
pub mod builtins;
pub mod config;
pub mod env;
pub mod error;
pub mod eval;
pub mod parser;
pub mod scanner;
pub mod token;
pub mod value;

use ast::Program;
use error::{CompileError, EvalError};
pub use eval::Interpreter;
use value::Value;

/// Scanner + parser over a source string. `origin` names the source for
/// error messages — a file path, or `"<repl>"` — and plays no role in
/// compilation semantics.
pub fn compile(source: &str, origin: &str) -> Result<Program, CompileError> {
    let tokens = scanner::scan(source).map_err(|e| CompileError::Lex(format!("{origin}: {e}")))?;
    parser::parse(tokens).map_err(|e| CompileError::Parse(format!("{origin}: {e}")))
}

/// Runs a compiled program to completion against `interpreter`'s current
/// scope, returning its last top-level value. May print, may raise; no
/// partial state is rolled back on error.
pub fn execute(interpreter: &mut Interpreter, program: &Program) -> Result<Value, EvalError> {
    interpreter.execute(program)
}

/// Clears all user-defined scopes; built-ins remain untouched (backs the
/// REPL's `clear` command).
pub fn reset(interpreter: &mut Interpreter) {
    interpreter.reset();
}

/// A new interpreter with an empty scope stack plus built-ins registered.
pub fn fresh_interpreter() -> Interpreter {
    Interpreter::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_and_execute_roundtrip() {
        let program = compile("let x = 10\nx += 5\nx", "<test>").unwrap();
        let mut interp = fresh_interpreter();
        assert!(matches!(execute(&mut interp, &program), Ok(Value::Int(15))));
    }

    #[test]
    fn test_reset_clears_user_scope_but_not_builtins() {
        let program = compile("let x = 1", "<test>").unwrap();
        let mut interp = fresh_interpreter();
        execute(&mut interp, &program).unwrap();
        reset(&mut interp);
        let check = compile("x", "<test>").unwrap();
        assert!(execute(&mut interp, &check).is_err());
        let builtin_check = compile("len([1,2,3])", "<test>").unwrap();
        assert!(matches!(execute(&mut interp, &builtin_check), Ok(Value::Int(3))));
    }

    #[test]
    fn test_compile_surfaces_lex_error_with_origin() {
        let err = compile("@", "bad.ver").unwrap_err();
        assert!(err.to_string().contains("bad.ver"));
    }
}
