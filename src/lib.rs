//! A tiny interactive command shell.
//!
//! This crate provides the building blocks of a minimal shell: a tokenizer for
//! raw input lines, a bounded command-history buffer, built-in commands
//! implemented in Rust, and discovery and launching of external programs from
//! the directories listed in `PATH` at startup. It is intentionally small and
//! easy to read, suitable for experiments with process management and argument
//! parsing.
//!
//! The main entry point is [`Interpreter`], which reads lines, dispatches the
//! two built-ins (`exit` and `history`), and runs everything else as a child
//! process, waiting for it to finish before prompting again. The public
//! modules [`command`], [`env`] and [`history`] expose the traits and types
//! the interpreter is built from.

mod builtin;
pub mod command;
pub mod env;
mod external;
pub mod history;
mod interpreter;
mod lexer;

/// Just a convenient re-export of the interactive command runner.
///
/// See [`Interpreter`] for the high-level API.
pub use interpreter::Interpreter;
