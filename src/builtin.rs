use crate::command::{CommandFactory, ExecutableCommand, ExitCode};
use crate::env::Environment;
use crate::history::HistoryBuffer;
use crate::interpreter::Factory;
use anyhow::{Result, anyhow};
use argh::{EarlyExit, FromArgs};
use std::io::Write;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and executed
/// directly in-process without spawning a child process.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "exit" or "history".
    fn name() -> &'static str;

    /// Executes the command using the provided output stream and environment.
    ///
    /// Return value should follow shell conventions: 0 for success, non-zero
    /// for error.
    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode>;
}

impl<T: BuiltinCommand> ExecutableCommand for T {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        env: &mut Environment,
    ) -> Result<ExitCode> {
        match T::execute(*self, stdout, env) {
            Ok(code) => Ok(code),
            Err(e) => {
                writeln!(stdout, "{e}")?;
                Ok(1)
            }
        }
    }
}

/// Carrier for an invocation that argh refused to parse; prints the argh
/// output instead of running anything.
struct InvalidArgs {
    output: String,
    is_error: bool,
}

impl ExecutableCommand for InvalidArgs {
    fn execute(
        self: Box<Self>,
        stdout: &mut dyn Write,
        _env: &mut Environment,
    ) -> Result<ExitCode> {
        stdout.write_all(self.output.as_bytes())?;
        Ok(if self.is_error { 1 } else { 0 })
    }
}

impl<T: BuiltinCommand + 'static> CommandFactory for Factory<T> {
    fn try_create(
        &self,
        _env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        if name == T::name() {
            Some(match T::from_args(&[name], args) {
                Ok(cmd) => Box::new(cmd),
                Err(EarlyExit { output, status }) => Box::new(InvalidArgs {
                    output,
                    is_error: status.is_err(),
                }),
            })
        } else {
            None
        }
    }
}

#[derive(FromArgs)]
/// Leave the shell with status 0.
pub struct Exit {
    #[argh(positional, greedy)]
    /// any trailing arguments are accepted and ignored.
    pub _args: Vec<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, _stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        env.should_exit = true;
        Ok(0)
    }
}

#[derive(FromArgs)]
/// Show or clear previously entered command lines.
pub struct History {
    #[argh(positional, greedy)]
    /// how many of the most recent entries to show, or `clear` to empty the
    /// buffer; shows the whole buffer when omitted.
    pub selector: Vec<String>,
}

impl BuiltinCommand for History {
    fn name() -> &'static str {
        "history"
    }

    fn execute(self, stdout: &mut dyn Write, env: &mut Environment) -> Result<ExitCode> {
        match self.selector.as_slice() {
            [] => {
                print_recent(&env.history, env.history.len(), stdout)?;
                Ok(0)
            }
            [arg] if arg == "clear" => {
                env.history.clear();
                Ok(0)
            }
            [raw] => {
                // Optional sign plus digits only; anything else is reported
                // and the command becomes a no-op.
                let requested: i64 = raw
                    .parse()
                    .map_err(|_| anyhow!("history: not a valid entry count: {raw}"))?;
                if requested < 0 {
                    writeln!(stdout, "ERROR: Input cannot be less than zero.")?;
                    return Ok(1);
                }
                let requested = requested as usize;
                if requested > env.history.len() {
                    writeln!(stdout, "ERROR: Command only has {} entries.", env.history.len())?;
                    return Ok(1);
                }
                print_recent(&env.history, requested, stdout)?;
                Ok(0)
            }
            _ => Err(anyhow!("history: expected at most one argument")),
        }
    }
}

/// Print the `count` most recent entries, oldest of the window first.
///
/// Ordinals are 1-based positions counted from the oldest entry currently
/// buffered, so the numbering stays stable across calls with different
/// window sizes. Callers validate `count <= history.len()`.
fn print_recent(history: &HistoryBuffer, count: usize, stdout: &mut dyn Write) -> Result<()> {
    let skip = history.len() - count;
    for (position, entry) in history.iter_oldest_first().enumerate().skip(skip) {
        writeln!(stdout, "  {}: {}", position + 1, entry)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_with_lines(lines: &[&str]) -> Environment {
        let mut env = Environment::default();
        for line in lines {
            env.history.record(*line);
        }
        env
    }

    fn run_history(env: &mut Environment, args: &[&str]) -> (String, ExitCode) {
        let factory = Factory::<History>::default();
        let cmd = factory
            .try_create(env, "history", args)
            .expect("history factory must match its own name");
        let mut out = Vec::new();
        let code = cmd.execute(&mut out, env).unwrap();
        (String::from_utf8(out).unwrap(), code)
    }

    #[test]
    fn listing_uses_ordinals_from_the_oldest_entry() {
        let mut env = env_with_lines(&["A", "B", "C", "D", "E"]);
        let (out, code) = run_history(&mut env, &["3"]);
        assert_eq!(code, 0);
        assert_eq!(out, "  3: C\n  4: D\n  5: E\n");
    }

    #[test]
    fn listing_without_count_prints_everything() {
        let mut env = env_with_lines(&["alpha", "beta"]);
        let (out, code) = run_history(&mut env, &[]);
        assert_eq!(code, 0);
        assert_eq!(out, "  1: alpha\n  2: beta\n");
    }

    #[test]
    fn empty_history_prints_nothing() {
        let mut env = Environment::default();
        let (out, code) = run_history(&mut env, &[]);
        assert_eq!(code, 0);
        assert_eq!(out, "");
    }

    #[test]
    fn oversized_count_reports_actual_size_and_prints_no_entries() {
        let mut env = env_with_lines(&["one", "two"]);
        let (out, code) = run_history(&mut env, &["9"]);
        assert_eq!(code, 1);
        assert_eq!(out, "ERROR: Command only has 2 entries.\n");
    }

    #[test]
    fn negative_count_is_rejected() {
        let mut env = env_with_lines(&["one"]);
        let (out, code) = run_history(&mut env, &["-3"]);
        assert_eq!(code, 1);
        assert_eq!(out, "ERROR: Input cannot be less than zero.\n");
    }

    #[test]
    fn non_numeric_count_is_reported_not_fatal() {
        let mut env = env_with_lines(&["one"]);
        let (out, code) = run_history(&mut env, &["soon"]);
        assert_eq!(code, 1);
        assert_eq!(out, "history: not a valid entry count: soon\n");
        // The buffer is untouched.
        assert_eq!(env.history.len(), 1);
    }

    #[test]
    fn clear_empties_the_buffer() {
        let mut env = env_with_lines(&["one", "two", "three"]);
        let (out, code) = run_history(&mut env, &["clear"]);
        assert_eq!(code, 0);
        assert_eq!(out, "");
        assert!(env.history.is_empty());
    }

    #[test]
    fn extra_arguments_are_rejected() {
        let mut env = env_with_lines(&["one"]);
        let (out, code) = run_history(&mut env, &["3", "4"]);
        assert_eq!(code, 1);
        assert_eq!(out, "history: expected at most one argument\n");
    }

    #[test]
    fn exit_raises_the_termination_flag() {
        let mut env = Environment::default();
        let factory = Factory::<Exit>::default();
        let cmd = factory.try_create(&env, "exit", &[]).unwrap();
        let mut out = Vec::new();
        let code = cmd.execute(&mut out, &mut env).unwrap();
        assert_eq!(code, 0);
        assert!(env.should_exit);
        assert!(out.is_empty());
    }

    #[test]
    fn exit_ignores_trailing_arguments() {
        let mut env = Environment::default();
        let factory = Factory::<Exit>::default();
        let cmd = factory.try_create(&env, "exit", &["1", "now"]).unwrap();
        let mut out = Vec::new();
        cmd.execute(&mut out, &mut env).unwrap();
        assert!(env.should_exit);
    }

    #[test]
    fn factories_only_match_their_own_name() {
        let env = Environment::default();
        assert!(
            Factory::<History>::default()
                .try_create(&env, "exit", &[])
                .is_none()
        );
        assert!(
            Factory::<Exit>::default()
                .try_create(&env, "history", &[])
                .is_none()
        );
    }
}
