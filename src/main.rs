use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use std::process::ExitCode;
use veureka::value::Value;
use veureka::{compile, config, execute, fresh_interpreter, reset, Interpreter};

/// Veureka: a small dynamically-typed scripting language.
#[derive(Parser, Debug)]
#[command(name = "ver")]
#[command(version = config::VERSION)]
#[command(about = "Veureka: a small dynamically-typed scripting language")]
struct CliArgs {
    /// Script file to run (.ver). Starts an interactive REPL if omitted.
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,

    /// Run the bundled demonstration programs instead of a script or REPL.
    #[arg(long = "examples")]
    examples: bool,
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    if args.examples {
        return run_examples();
    }

    if let Some(path) = &args.script {
        return run_script(path);
    }

    run_repl();
    ExitCode::SUCCESS
}

fn run_source(interpreter: &mut Interpreter, source: &str, origin: &str) -> Result<(), String> {
    let program = compile(source, origin).map_err(|e| e.to_string())?;
    execute(interpreter, &program).map_err(|e| e.to_string())?;
    Ok(())
}

fn run_script(path: &PathBuf) -> ExitCode {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("cannot read script file {}: {}", path.display(), e);
            return ExitCode::FAILURE;
        }
    };
    let origin = path.display().to_string();
    let mut interpreter = fresh_interpreter();
    match run_source(&mut interpreter, &source, &origin) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

/// Bundled demonstration programs, compiled into the binary with
/// `include_str!` so `--examples` runs without needing a `demos/` directory
/// alongside the installed executable.
const DEMOS: &[(&str, &str)] = &[
    ("fibonacci", include_str!("../demos/fibonacci.ver")),
    ("closures", include_str!("../demos/closures.ver")),
    ("classes", include_str!("../demos/classes.ver")),
];

fn run_examples() -> ExitCode {
    let mut interpreter = fresh_interpreter();
    for (name, source) in DEMOS {
        println!("--- {name} ---");
        if let Err(message) = run_source(&mut interpreter, source, name) {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
        reset(&mut interpreter);
    }
    ExitCode::SUCCESS
}

fn run_repl() {
    println!("{}", config::WELCOME_MESSAGE);
    let mut rl = match DefaultEditor::new() {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("failed to initialize REPL: {e}");
            return;
        }
    };
    let history_file = ".veureka_history";
    let _ = rl.load_history(history_file);

    let mut interpreter = fresh_interpreter();
    loop {
        match rl.readline(config::PROMPT) {
            Ok(line) => {
                let _ = rl.add_history_entry(line.as_str());
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                match trimmed {
                    "exit" => break,
                    "clear" => {
                        reset(&mut interpreter);
                        continue;
                    }
                    _ => {}
                }
                match compile(&line, "<repl>") {
                    Ok(program) => match execute(&mut interpreter, &program) {
                        Ok(value) => {
                            if !matches!(value, Value::Nil) {
                                println!("=> {value}");
                            }
                        }
                        Err(e) => eprintln!("{e}"),
                    },
                    Err(e) => eprintln!("{e}"),
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("{e}");
                break;
            }
        }
    }
    let _ = rl.save_history(history_file);
}
