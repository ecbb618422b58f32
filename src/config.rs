// ABOUTME: Version and banner constants shared by the CLI and REPL

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const WELCOME_MESSAGE: &str = "Veureka REPL — type 'exit' or Ctrl-D to quit, 'clear' to reset scope";

pub const PROMPT: &str = "ver> ";
