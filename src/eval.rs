// ABOUTME: Tree-walking evaluator: AST + environment -> effects + values

use crate::ast::{BinaryOp, Expr, IncDecOp, Literal, Program, Stmt, UnaryOp};
use crate::builtins;
use crate::env::Environment;
use crate::error::EvalError;
use crate::value::{ClassDef, Instance, NativeFn, UserFunction, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::PathBuf;
use std::rc::Rc;

/// Non-local control transfer produced by a statement/expression evaluation.
/// `break`/`continue`/`return` are never `Err` — only genuine faults are.
pub enum Signal {
    Value(Value),
    Break,
    Continue,
    Return(Value),
}

impl Signal {
    fn into_value(self) -> Value {
        match self {
            Signal::Value(v) => v,
            Signal::Return(v) => v,
            Signal::Break | Signal::Continue => Value::Nil,
        }
    }
}

/// Built-ins live outside the `Environment` chain so `let`'s
/// mutate-if-bound-else-define rule can never shadow or clobber one.
pub struct Globals {
    entries: HashMap<&'static str, NativeFn>,
}

impl Globals {
    fn new() -> Self {
        let mut globals = Globals { entries: HashMap::new() };
        builtins::register_all(&mut globals);
        globals
    }

    pub fn register(&mut self, name: &'static str, f: NativeFn) {
        self.entries.insert(name, f);
    }

    fn get(&self, name: &str) -> Option<Value> {
        self.entries
            .get_key_value(name)
            .map(|(k, f)| Value::BuiltIn(*k, *f))
    }
}

pub struct Interpreter {
    pub env: Rc<Environment>,
    pub globals: Globals,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter {
            env: Environment::new(),
            globals: Globals::new(),
        }
    }

    /// Clears all user scopes; built-ins remain. Backs the REPL `clear` command.
    pub fn reset(&mut self) {
        self.env = Environment::new();
    }

    pub fn execute(&mut self, program: &Program) -> Result<Value, EvalError> {
        let mut last = Value::Nil;
        for stmt in &program.statements {
            match self.eval_stmt(stmt)? {
                Signal::Return(_) | Signal::Break | Signal::Continue => {
                    // Non-local control flow reaching top level has no
                    // enclosing loop/call to catch it; treat as a no-op
                    // rather than propagating past the program boundary.
                }
                Signal::Value(v) => last = v,
            }
        }
        Ok(last)
    }

    fn eval_block(&mut self, body: &[Stmt]) -> Result<Signal, EvalError> {
        let mut last = Value::Nil;
        for stmt in body {
            match self.eval_stmt(stmt)? {
                Signal::Value(v) => last = v,
                signal @ (Signal::Break | Signal::Continue | Signal::Return(_)) => {
                    return Ok(signal)
                }
            }
        }
        Ok(Signal::Value(last))
    }

    fn eval_stmt(&mut self, stmt: &Stmt) -> Result<Signal, EvalError> {
        match stmt {
            Stmt::Include { path, .. } => {
                self.eval_include(path)?;
                Ok(Signal::Value(Value::Nil))
            }
            Stmt::Let { name, value } => {
                let v = self.eval_expr(value)?;
                self.env.assign(name, v);
                Ok(Signal::Value(Value::Nil))
            }
            Stmt::FnDef { name, params, body } => {
                let func = Value::Function(Rc::new(UserFunction {
                    name: Some(name.clone()),
                    params: params.clone(),
                    body: Rc::new(body.clone()),
                    closure: self.env.clone(),
                }));
                self.env.define(name.clone(), func);
                Ok(Signal::Value(Value::Nil))
            }
            Stmt::ClassDef { name, methods } => {
                let mut method_map = HashMap::new();
                for (method_name, params, body) in methods {
                    method_map.insert(
                        method_name.clone(),
                        Rc::new(UserFunction {
                            name: Some(method_name.clone()),
                            params: params.clone(),
                            body: Rc::new(body.clone()),
                            closure: self.env.clone(),
                        }),
                    );
                }
                let class = Value::Class(Rc::new(ClassDef {
                    name: name.clone(),
                    methods: method_map,
                }));
                self.env.define(name.clone(), class);
                Ok(Signal::Value(Value::Nil))
            }
            Stmt::If { branches, else_branch } => {
                for (cond, body) in branches {
                    if self.eval_expr(cond)?.is_truthy() {
                        return self.eval_block(body);
                    }
                }
                match else_branch {
                    Some(body) => self.eval_block(body),
                    None => Ok(Signal::Value(Value::Nil)),
                }
            }
            Stmt::For { var, iterable, body } => {
                let iterable = self.eval_expr(iterable)?;
                let items = match &iterable {
                    Value::List(items) => items.borrow().clone(),
                    other => {
                        return Err(EvalError::type_error(
                            "for",
                            format!("'{}' object is not iterable", other.type_name()),
                        ))
                    }
                };
                for item in items {
                    // Always binds in the current scope, unlike the general
                    // Let rule, which would otherwise mutate an outer
                    // same-named binding across loop iterations.
                    self.env.define(var.clone(), item);
                    match self.eval_block(body)? {
                        Signal::Break => break,
                        Signal::Continue | Signal::Value(_) => {}
                        signal @ Signal::Return(_) => return Ok(signal),
                    }
                }
                Ok(Signal::Value(Value::Nil))
            }
            Stmt::While { condition, body } => {
                while self.eval_expr(condition)?.is_truthy() {
                    match self.eval_block(body)? {
                        Signal::Break => break,
                        Signal::Continue | Signal::Value(_) => {}
                        signal @ Signal::Return(_) => return Ok(signal),
                    }
                }
                Ok(Signal::Value(Value::Nil))
            }
            Stmt::Return { value, .. } => {
                let v = match value {
                    Some(expr) => self.eval_expr(expr)?,
                    None => Value::Nil,
                };
                Ok(Signal::Return(v))
            }
            Stmt::Break { .. } => Ok(Signal::Break),
            Stmt::Continue { .. } => Ok(Signal::Continue),
            Stmt::Expr(expr) => Ok(Signal::Value(self.eval_expr(expr)?)),
        }
    }

    fn eval_expr(&mut self, expr: &Expr) -> Result<Value, EvalError> {
        match expr {
            Expr::Literal(lit) => Ok(match lit {
                Literal::Int(n) => Value::Int(*n),
                Literal::Float(n) => Value::Float(*n),
                Literal::Str(s) => Value::string(s.clone()),
                Literal::Bool(b) => Value::Bool(*b),
                Literal::Nil => Value::Nil,
            }),
            Expr::Var(name, _) => self.lookup(name),
            Expr::SelfExpr(_) => self.lookup("self"),
            Expr::ListLit(items) => {
                let mut values = Vec::with_capacity(items.len());
                for item in items {
                    values.push(self.eval_expr(item)?);
                }
                Ok(Value::list(values))
            }
            Expr::MapLit(entries) => {
                let mut map = indexmap::IndexMap::with_capacity(entries.len());
                for (key, value) in entries {
                    map.insert(key.clone(), self.eval_expr(value)?);
                }
                Ok(Value::map(map))
            }
            Expr::Unary { op, expr, line } => {
                let v = self.eval_expr(expr)?;
                self.eval_unary(*op, v, *line)
            }
            Expr::Binary { op, left, right, line } => self.eval_binary(*op, left, right, *line),
            Expr::Assign { name, value, .. } => {
                let v = self.eval_expr(value)?;
                self.env.assign(name, v.clone());
                Ok(v)
            }
            Expr::CompoundAssign { name, op, value, line } => {
                let current = self.lookup(name)?;
                let rhs = self.eval_expr(value)?;
                let result = self.apply_binary_op(*op, current, rhs, *line)?;
                self.env.assign(name, result.clone());
                Ok(result)
            }
            Expr::IncDec { target, op, prefix, line } => self.eval_incdec(target, *op, *prefix, *line),
            Expr::Index { target, index, line } => {
                let t = self.eval_expr(target)?;
                let i = self.eval_expr(index)?;
                self.eval_index(t, i, *line)
            }
            Expr::Attr { target, attr, line } => {
                let t = self.eval_expr(target)?;
                self.get_attr(&t, attr, *line)
            }
            Expr::AttrAssign { target, attr, value, line } => {
                let t = self.eval_expr(target)?;
                let v = self.eval_expr(value)?;
                self.set_attr(&t, attr, v.clone(), *line)?;
                Ok(v)
            }
            Expr::Call { callee, args, line } => {
                let callee_name = match callee.as_ref() {
                    Expr::Attr { target, attr, .. } => {
                        let t = self.eval_expr(target)?;
                        Some(self.bind_method(&t, attr, *line)?)
                    }
                    _ => None,
                };
                let f = match callee_name {
                    Some(bound) => bound,
                    None => self.eval_expr(callee)?,
                };
                let mut arg_values = Vec::with_capacity(args.len());
                for arg in args {
                    arg_values.push(self.eval_expr(arg)?);
                }
                self.apply(&f, &arg_values)
            }
            Expr::New { class, args, line } => {
                let class_value = self.lookup(class)?;
                let class_def = match class_value {
                    Value::Class(c) => c,
                    other => {
                        return Err(EvalError::type_error(
                            "new",
                            format!("'{}' is not a class", other.type_name()),
                        ))
                    }
                };
                let instance = Rc::new(RefCell::new(Instance {
                    class: class_def.clone(),
                    fields: HashMap::new(),
                }));
                if let Some(init) = class_def.methods.get("__init__") {
                    let mut arg_values = Vec::with_capacity(args.len());
                    for arg in args {
                        arg_values.push(self.eval_expr(arg)?);
                    }
                    let bound = self.bind(init.clone(), Value::Instance(instance.clone()));
                    self.call_user_function(&bound, &arg_values, *line)?;
                }
                Ok(Value::Instance(instance))
            }
            Expr::FnExpr { name, params, body } => Ok(Value::Function(Rc::new(UserFunction {
                name: name.clone(),
                params: params.clone(),
                body: Rc::new(body.clone()),
                closure: self.env.clone(),
            }))),
        }
    }

    fn lookup(&self, name: &str) -> Result<Value, EvalError> {
        if let Some(v) = self.env.get(name) {
            return Ok(v);
        }
        if let Some(v) = self.globals.get(name) {
            return Ok(v);
        }
        Err(EvalError::NameError(name.to_string()))
    }

    fn eval_unary(&mut self, op: UnaryOp, v: Value, line: usize) -> Result<Value, EvalError> {
        let _ = line;
        match op {
            UnaryOp::Not => Ok(Value::Bool(!v.is_truthy())),
            UnaryOp::Neg => match v {
                Value::Int(n) => Ok(Value::Int(-n)),
                Value::Float(n) => Ok(Value::Float(-n)),
                other => Err(EvalError::type_error(
                    "unary -",
                    format!("cannot negate '{}'", other.type_name()),
                )),
            },
        }
    }

    fn eval_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr, line: usize) -> Result<Value, EvalError> {
        if op == BinaryOp::And {
            let l = self.eval_expr(left)?;
            return if l.is_truthy() { self.eval_expr(right) } else { Ok(l) };
        }
        if op == BinaryOp::Or {
            let l = self.eval_expr(left)?;
            return if l.is_truthy() { Ok(l) } else { self.eval_expr(right) };
        }
        let l = self.eval_expr(left)?;
        let r = self.eval_expr(right)?;
        self.apply_binary_op(op, l, r, line)
    }

    fn apply_binary_op(&self, op: BinaryOp, l: Value, r: Value, line: usize) -> Result<Value, EvalError> {
        let _ = line;
        use Value::*;
        match op {
            BinaryOp::Eq => Ok(Bool(l.values_equal(&r))),
            BinaryOp::NotEq => Ok(Bool(!l.values_equal(&r))),
            BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
                let ordering = match (&l, &r) {
                    (Int(a), Int(b)) => (*a as f64).partial_cmp(&(*b as f64)),
                    (Int(a), Float(b)) => (*a as f64).partial_cmp(b),
                    (Float(a), Int(b)) => a.partial_cmp(&(*b as f64)),
                    (Float(a), Float(b)) => a.partial_cmp(b),
                    (Str(a), Str(b)) => Some(a.as_str().cmp(b.as_str())),
                    _ => {
                        return Err(EvalError::type_error(
                            "comparison",
                            format!("cannot compare '{}' and '{}'", l.type_name(), r.type_name()),
                        ))
                    }
                };
                let ordering = ordering.ok_or_else(|| {
                    EvalError::type_error("comparison", "NaN is not orderable")
                })?;
                Ok(Bool(match op {
                    BinaryOp::Lt => ordering.is_lt(),
                    BinaryOp::LtEq => ordering.is_le(),
                    BinaryOp::Gt => ordering.is_gt(),
                    BinaryOp::GtEq => ordering.is_ge(),
                    _ => unreachable!(),
                }))
            }
            BinaryOp::Add => match (&l, &r) {
                (Int(a), Int(b)) => Ok(Int(a + b)),
                (Int(a), Float(b)) => Ok(Float(*a as f64 + b)),
                (Float(a), Int(b)) => Ok(Float(a + *b as f64)),
                (Float(a), Float(b)) => Ok(Float(a + b)),
                (Str(a), Str(b)) => Ok(Value::string(format!("{a}{b}"))),
                _ => Err(EvalError::type_error(
                    "+",
                    format!("unsupported operand types '{}' and '{}'", l.type_name(), r.type_name()),
                )),
            },
            BinaryOp::Sub => numeric_op(&l, &r, "-", |a, b| a - b, |a, b| a - b),
            BinaryOp::Mul => numeric_op(&l, &r, "*", |a, b| a * b, |a, b| a * b),
            BinaryOp::Div => match (&l, &r) {
                (Int(_) | Float(_), Int(0)) => Err(EvalError::ZeroDivisionError),
                (Int(_) | Float(_), Float(b)) if *b == 0.0 => Err(EvalError::ZeroDivisionError),
                (Int(a), Int(b)) => Ok(Int(a / b)),
                (Int(a), Float(b)) => Ok(Float(*a as f64 / b)),
                (Float(a), Int(b)) => Ok(Float(a / *b as f64)),
                (Float(a), Float(b)) => Ok(Float(a / b)),
                _ => Err(EvalError::type_error(
                    "/",
                    format!("unsupported operand types '{}' and '{}'", l.type_name(), r.type_name()),
                )),
            },
            BinaryOp::Mod => match (&l, &r) {
                (Int(_) | Float(_), Int(0)) => Err(EvalError::ZeroDivisionError),
                (Int(_) | Float(_), Float(b)) if *b == 0.0 => Err(EvalError::ZeroDivisionError),
                (Int(a), Int(b)) => Ok(Int(a % b)),
                (Int(a), Float(b)) => Ok(Float(*a as f64 % b)),
                (Float(a), Int(b)) => Ok(Float(a % *b as f64)),
                (Float(a), Float(b)) => Ok(Float(a % b)),
                _ => Err(EvalError::type_error(
                    "%",
                    format!("unsupported operand types '{}' and '{}'", l.type_name(), r.type_name()),
                )),
            },
            BinaryOp::Pow => match (&l, &r) {
                (Int(a), Int(b)) if *b >= 0 => Ok(Int(a.pow(*b as u32))),
                (Int(a), Int(b)) => Ok(Float((*a as f64).powf(*b as f64))),
                (Int(a), Float(b)) => Ok(Float((*a as f64).powf(*b))),
                (Float(a), Int(b)) => Ok(Float(a.powf(*b as f64))),
                (Float(a), Float(b)) => Ok(Float(a.powf(*b))),
                _ => Err(EvalError::type_error(
                    "**",
                    format!("unsupported operand types '{}' and '{}'", l.type_name(), r.type_name()),
                )),
            },
            BinaryOp::And | BinaryOp::Or => unreachable!("short-circuit ops handled in eval_binary"),
        }
    }

    fn eval_incdec(&mut self, target: &Expr, op: IncDecOp, prefix: bool, line: usize) -> Result<Value, EvalError> {
        let delta = match op {
            IncDecOp::Inc => 1,
            IncDecOp::Dec => -1,
        };
        match target {
            Expr::Var(name, _) => {
                let old = self.lookup(name)?;
                let new = self.apply_binary_op(BinaryOp::Add, old.clone(), Value::Int(delta), line)?;
                self.env.assign(name, new.clone());
                Ok(if prefix { new } else { old })
            }
            Expr::Attr { target, attr, line: attr_line } => {
                let t = self.eval_expr(target)?;
                let old = self.get_attr(&t, attr, *attr_line)?;
                let new = self.apply_binary_op(BinaryOp::Add, old.clone(), Value::Int(delta), line)?;
                self.set_attr(&t, attr, new.clone(), *attr_line)?;
                Ok(if prefix { new } else { old })
            }
            _ => Err(EvalError::type_error("++/--", "target must be a variable or attribute")),
        }
    }

    fn eval_index(&self, target: Value, index: Value, line: usize) -> Result<Value, EvalError> {
        let _ = line;
        match (&target, &index) {
            (Value::List(items), Value::Int(i)) => {
                let items = items.borrow();
                let len = items.len();
                let idx = if *i < 0 { *i + len as i64 } else { *i };
                if idx < 0 || idx as usize >= len {
                    return Err(EvalError::IndexError { index: *i, len });
                }
                Ok(items[idx as usize].clone())
            }
            (Value::Str(s), Value::Int(i)) => {
                let chars: Vec<char> = s.chars().collect();
                let len = chars.len();
                let idx = if *i < 0 { *i + len as i64 } else { *i };
                if idx < 0 || idx as usize >= len {
                    return Err(EvalError::IndexError { index: *i, len });
                }
                Ok(Value::string(chars[idx as usize].to_string()))
            }
            (Value::Map(entries), Value::Str(key)) => entries
                .borrow()
                .get(key.as_str())
                .cloned()
                .ok_or_else(|| EvalError::KeyError(key.to_string())),
            _ => Err(EvalError::not_indexable(&target)),
        }
    }

    fn get_attr(&self, target: &Value, attr: &str, line: usize) -> Result<Value, EvalError> {
        match target {
            Value::Instance(inst) => {
                if let Some(v) = inst.borrow().fields.get(attr) {
                    return Ok(v.clone());
                }
                self.bind_method(target, attr, line)
            }
            other => Err(EvalError::type_error(
                "attribute access",
                format!("'{}' object has no attribute '{attr}'", other.type_name()),
            )),
        }
    }

    /// Resolves `instance.method` to a bound method on the fly (no persistent
    /// bound-method object is cached; the binding is transient).
    fn bind_method(&self, target: &Value, attr: &str, line: usize) -> Result<Value, EvalError> {
        let _ = line;
        match target {
            Value::Instance(inst) => {
                if let Some(v) = inst.borrow().fields.get(attr) {
                    return Ok(v.clone());
                }
                let class = inst.borrow().class.clone();
                match class.methods.get(attr) {
                    Some(method) => Ok(self.bind(method.clone(), target.clone())),
                    None => Err(EvalError::AttributeError {
                        class: class.name.clone(),
                        attr: attr.to_string(),
                    }),
                }
            }
            other => Err(EvalError::type_error(
                "attribute access",
                format!("'{}' object has no attribute '{attr}'", other.type_name()),
            )),
        }
    }

    fn bind(&self, method: Rc<UserFunction>, instance: Value) -> Rc<UserFunction> {
        let bound_scope = Environment::with_parent(method.closure.clone());
        bound_scope.define("self", instance);
        Rc::new(UserFunction {
            name: method.name.clone(),
            params: method.params.clone(),
            body: method.body.clone(),
            closure: bound_scope,
        })
    }

    fn set_attr(&mut self, target: &Value, attr: &str, value: Value, line: usize) -> Result<(), EvalError> {
        let _ = line;
        match target {
            Value::Instance(inst) => {
                inst.borrow_mut().fields.insert(attr.to_string(), value);
                Ok(())
            }
            other => Err(EvalError::type_error(
                "attribute access",
                format!("'{}' object has no attribute '{attr}'", other.type_name()),
            )),
        }
    }

    /// Invokes a callable value: built-ins run directly, user functions swap
    /// in `[f.closure, new_frame]` as the current environment for the call
    /// and restore the caller's environment afterward. Arity is unchecked.
    pub fn apply(&mut self, callee: &Value, args: &[Value]) -> Result<Value, EvalError> {
        match callee {
            Value::BuiltIn(_, f) => f(args, self),
            Value::Function(func) => self.call_user_function(func, args, 0),
            other => Err(EvalError::not_callable(other)),
        }
    }

    fn call_user_function(&mut self, func: &Rc<UserFunction>, args: &[Value], line: usize) -> Result<Value, EvalError> {
        let _ = line;
        let call_env = Environment::with_parent(func.closure.clone());
        for (param, arg) in func.params.iter().zip(args.iter()) {
            call_env.define(param.clone(), arg.clone());
        }
        let caller_env = std::mem::replace(&mut self.env, call_env);
        let result = self.eval_block(&func.body);
        self.env = caller_env;
        Ok(result?.into_value())
    }

    fn eval_include(&mut self, path: &str) -> Result<(), EvalError> {
        let resolved = self.resolve_include_path(path)?;
        let source = std::fs::read_to_string(&resolved)
            .map_err(|e| EvalError::LoadError(format!("{}: {}", resolved.display(), e)))?;
        let tokens = crate::scanner::scan(&source).map_err(|e| EvalError::CompileError(e.to_string()))?;
        let program = crate::parser::parse(tokens).map_err(|e| EvalError::CompileError(e.to_string()))?;
        for stmt in &program.statements {
            self.eval_stmt(stmt)?;
        }
        Ok(())
    }

    fn resolve_include_path(&self, path: &str) -> Result<PathBuf, EvalError> {
        let with_ext = if path.ends_with(".ver") {
            path.to_string()
        } else {
            format!("{path}.ver")
        };
        let candidates = [
            PathBuf::from(&with_ext),
            std::env::current_dir().unwrap_or_default().join(&with_ext),
            std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.join("lib").join(&with_ext)))
                .unwrap_or_else(|| PathBuf::from(&with_ext)),
        ];
        candidates
            .into_iter()
            .find(|p| p.exists())
            .ok_or_else(|| EvalError::LoadError(format!("cannot locate '{path}'")))
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

fn numeric_op(
    l: &Value,
    r: &Value,
    op_name: &str,
    int_op: fn(i64, i64) -> i64,
    float_op: fn(f64, f64) -> f64,
) -> Result<Value, EvalError> {
    use Value::*;
    match (l, r) {
        (Int(a), Int(b)) => Ok(Int(int_op(*a, *b))),
        (Int(a), Float(b)) => Ok(Float(float_op(*a as f64, *b))),
        (Float(a), Int(b)) => Ok(Float(float_op(*a, *b as f64))),
        (Float(a), Float(b)) => Ok(Float(float_op(*a, *b))),
        _ => Err(EvalError::type_error(
            op_name,
            format!("unsupported operand types '{}' and '{}'", l.type_name(), r.type_name()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use crate::scanner::scan;

    fn run(source: &str) -> Value {
        let program = parse(scan(source).unwrap()).unwrap();
        let mut interp = Interpreter::new();
        interp.execute(&program).unwrap()
    }

    #[test]
    fn test_compound_assign_on_global_like_variable() {
        assert!(matches!(run("let x = 10\nx += 5\nx"), Value::Int(15)));
    }

    #[test]
    fn test_recursive_fibonacci() {
        let src = "fn fib(n)\n  if n < 2\n    return n\n  end\n  return fib(n-1)+fib(n-2)\nend\nfib(10)";
        assert!(matches!(run(src), Value::Int(55)));
    }

    #[test]
    fn test_closure_captures_live_reference() {
        let src = "fn c()\n  let n = 0\n  return fn() => n = n + 1\nend\nlet k = c()\nk()\nk()\nk()";
        assert!(matches!(run(src), Value::Int(3)));
    }

    #[test]
    fn test_class_method_binds_self() {
        let src = "class P\n  fn __init__(a)\n    self.a = a\n  end\n  fn get() return self.a end\nend\nlet p = new P(7)\np.get()";
        assert!(matches!(run(src), Value::Int(7)));
    }

    #[test]
    fn test_field_shadows_method_on_read() {
        let src = "class C\n  fn m() return 1 end\nend\nlet c = new C()\nc.m = 2\nc.m";
        assert!(matches!(run(src), Value::Int(2)));
    }

    #[test]
    fn test_postfix_then_prefix_incdec_sequence() {
        let src = "let y = 0\nlet a = y++\nlet b = y\nlet d = ++y\nlet e = y\n[a, b, d, e]";
        match run(src) {
            Value::List(items) => {
                let items = items.borrow();
                assert!(matches!(items[0], Value::Int(0)));
                assert!(matches!(items[1], Value::Int(1)));
                assert!(matches!(items[2], Value::Int(2)));
                assert!(matches!(items[3], Value::Int(2)));
            }
            other => panic!("expected list, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_division_error() {
        let program = parse(scan("1 / 0").unwrap()).unwrap();
        let mut interp = Interpreter::new();
        assert!(matches!(interp.execute(&program), Err(EvalError::ZeroDivisionError)));
    }

    #[test]
    fn test_or_returns_first_truthy_operand_unchanged() {
        assert!(matches!(run("0 or 5"), Value::Int(5)));
        assert!(matches!(run("3 or 5"), Value::Int(3)));
    }

    #[test]
    fn test_int_plus_int_stays_int_but_float_promotes() {
        assert!(matches!(run("2 + 3"), Value::Int(5)));
        assert!(matches!(run("2 + 3.0"), Value::Float(n) if n == 5.0));
    }

    #[test]
    fn test_name_error_on_unbound_variable() {
        let program = parse(scan("missing_name").unwrap()).unwrap();
        let mut interp = Interpreter::new();
        assert!(matches!(interp.execute(&program), Err(EvalError::NameError(_))));
    }

    #[test]
    fn test_attribute_access_on_primitive_is_type_error_not_attribute_error() {
        let program = parse(scan("(5).foo").unwrap()).unwrap();
        let mut interp = Interpreter::new();
        assert!(matches!(interp.execute(&program), Err(EvalError::TypeError(_))));
    }

    #[test]
    fn test_missing_instance_member_is_attribute_error() {
        let src = "class C\n  fn m() return 1 end\nend\nlet c = new C()\nc.missing";
        let program = parse(scan(src).unwrap()).unwrap();
        let mut interp = Interpreter::new();
        assert!(matches!(interp.execute(&program), Err(EvalError::AttributeError { .. })));
    }
}
