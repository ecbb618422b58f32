// ABOUTME: End-to-end scenarios exercised through the public compile/execute API

use veureka::value::Value;
use veureka::{compile, execute, fresh_interpreter, reset};

fn run(source: &str) -> Value {
    let program = compile(source, "<test>").expect("compile failed");
    let mut interp = fresh_interpreter();
    execute(&mut interp, &program).expect("execute failed")
}

#[test]
fn test_scenario_1_compound_assign() {
    assert!(matches!(run("let x = 10\nx += 5\nprint(x)\nx"), Value::Int(15)));
}

#[test]
fn test_scenario_2_recursive_fibonacci() {
    let src = "fn fib(n)\n  if n < 2\n    return n\n  end\n  return fib(n-1)+fib(n-2)\nend\nprint(fib(10))\nfib(10)";
    assert!(matches!(run(src), Value::Int(55)));
}

#[test]
fn test_scenario_3_counter_closure_mutates_captured_scope() {
    let src = "fn c()\n  let n = 0\n  return fn() => n = n + 1\nend\nlet k = c()\nprint(k())\nprint(k())\nk()";
    assert!(matches!(run(src), Value::Int(3)));
}

#[test]
fn test_scenario_4_class_init_and_method() {
    let src = "class P\n  fn __init__(a)\n    self.a = a\n  end\n  fn get() return self.a end\nend\nlet p = new P(7)\np.get()";
    assert!(matches!(run(src), Value::Int(7)));
}

#[test]
fn test_scenario_5_reduce_sums_list() {
    let src = "let xs = [1,2,3,4,5]\nreduce(xs, fn(a,b) => a+b, 0)";
    assert!(matches!(run(src), Value::Int(15)));
}

#[test]
fn test_scenario_6_postfix_and_prefix_incdec() {
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
fn test_map_filter_reduce_identities() {
    assert!(matches!(
        run("let xs = [1,2,3]\nlen(map(xs, fn(x) => x))"),
        Value::Int(3)
    ));
    assert!(matches!(
        run("let xs = [1,2,3]\nlen(filter(xs, fn(x) => true))"),
        Value::Int(3)
    ));
    assert!(matches!(run("reduce([9], fn(a,b) => a+b, 1)"), Value::Int(10)));
}

#[test]
fn test_int_str_roundtrip() {
    assert!(matches!(run("int(str(42))"), Value::Int(42)));
}

#[test]
fn test_empty_for_loop_body_runs_zero_times() {
    assert!(matches!(run("let n = 0\nfor x in []\n  n = n + 1\nend\nn"), Value::Int(0)));
}

#[test]
fn test_return_with_no_value_yields_nil() {
    assert!(matches!(
        run("fn f()\n  return\nend\nf()"),
        Value::Nil
    ));
}

#[test]
fn test_reset_clears_user_bindings_but_not_builtins() {
    let mut interp = fresh_interpreter();
    let program = compile("let x = 5", "<test>").unwrap();
    execute(&mut interp, &program).unwrap();
    reset(&mut interp);

    let lookup = compile("x", "<test>").unwrap();
    assert!(execute(&mut interp, &lookup).is_err());

    let builtin = compile("len([1])", "<test>").unwrap();
    assert!(matches!(execute(&mut interp, &builtin), Ok(Value::Int(1))));
}

#[test]
fn test_include_splices_into_caller_global_scope() {
    let dir = std::env::temp_dir().join(format!("veureka_include_test_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let lib_path = dir.join("greet.ver");
    std::fs::write(&lib_path, "fn greet(name) => \"hi \" + name\n").unwrap();

    let cwd = std::env::current_dir().unwrap();
    std::env::set_current_dir(&dir).unwrap();
    let result = std::panic::catch_unwind(|| run("include \"greet\"\ngreet(\"world\")"));
    std::env::set_current_dir(cwd).unwrap();
    let _ = std::fs::remove_dir_all(&dir);

    match result {
        Ok(Value::Str(s)) => assert_eq!(*s, "hi world"),
        Ok(other) => panic!("expected string, got {other:?}"),
        Err(e) => std::panic::resume_unwind(e),
    }
}

#[test]
fn test_missing_include_is_load_error() {
    let program = compile("include \"does_not_exist_anywhere\"", "<test>").unwrap();
    let mut interp = fresh_interpreter();
    assert!(execute(&mut interp, &program).is_err());
}
