use crate::command::{CommandFactory, ExitCode};
use crate::env::Environment;
use crate::lexer;
use anyhow::{Result, anyhow};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::Write;

/// Static prompt rendered before each read, no trailing newline.
const PROMPT: &str = "osshell> ";

/// The one input line that must never be recorded in history.
const CLEAR_INVOCATION: &str = "history clear";

/// Factory allows creating instances of ExecutableCommand.
///
/// Only supports commands defined in this crate — builtins and
/// ExternalCommand.
pub(crate) struct Factory<T> {
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Default for Factory<T> {
    fn default() -> Self {
        Self {
            _phantom: std::marker::PhantomData,
        }
    }
}

/// A minimal shell-like interpreter that can execute built-in and external
/// commands.
///
/// The interpreter owns an [`Environment`] (search-path snapshot, history,
/// exit flag) and an ordered list of [`CommandFactory`] objects that are
/// queried to create commands by name; builtins are tried before the
/// external-command launcher. See [`Default`] for the factories included out
/// of the box.
///
/// Example
/// ```
/// use osshell::Interpreter;
/// let mut sh = Interpreter::default();
/// let code = sh.run("history", &[]).unwrap();
/// assert_eq!(code, 0);
/// ```
pub struct Interpreter {
    env: Environment,
    commands: Vec<Box<dyn CommandFactory>>,
}

impl Interpreter {
    /// Create a new interpreter with a custom set of command factories.
    pub fn new(commands: Vec<Box<dyn CommandFactory>>) -> Self {
        Self {
            env: Environment::new(),
            commands,
        }
    }

    /// Run a single command invocation by name with arguments.
    ///
    /// Returns the command's exit code, or an error when no factory
    /// recognizes the name.
    pub fn run(&mut self, name: &str, args: &[&str]) -> Result<ExitCode> {
        self.run_to(name, args, &mut std::io::stdout())
    }

    /// Like [`run`](Self::run), with builtin output going to `stdout`.
    fn run_to(&mut self, name: &str, args: &[&str], stdout: &mut dyn Write) -> Result<ExitCode> {
        for factory in &self.commands {
            if let Some(cmd) = factory.try_create(&self.env, name, args) {
                return cmd.execute(stdout, &mut self.env);
            }
        }
        Err(anyhow!("command not found: {}", name))
    }

    /// One loop iteration minus the read: tokenize, dispatch, record.
    ///
    /// Blank input (no tokens) is a no-op and leaves history untouched. A
    /// name no factory resolves is reported on `stdout` and the loop goes
    /// on. The raw line is recorded afterwards unless it is exactly the
    /// clear invocation.
    fn dispatch_line(&mut self, line: &str, stdout: &mut dyn Write) -> Result<()> {
        let tokens = lexer::split_into_tokens(line, ' ');
        let Some((name, rest)) = tokens.split_first() else {
            return Ok(());
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();

        if self.run_to(name, &args, stdout).is_err() {
            writeln!(stdout, "{}: Error command not found", name)?;
        }

        if line != CLEAR_INVOCATION {
            self.env.history.record(line);
        }
        Ok(())
    }

    /// The Read-Eval-Print Loop: prompt, read one line, dispatch, repeat
    /// until `exit` or end of input.
    pub fn repl(&mut self) -> Result<()> {
        let mut rl = DefaultEditor::new()?;
        let mut stdout = std::io::stdout();

        while !self.env.should_exit {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    // Editor history drives arrow-key recall; the shell's own
                    // buffer is filled by dispatch_line.
                    rl.add_history_entry(line.as_str())?;
                    self.dispatch_line(&line, &mut stdout)?;
                }
                Err(ReadlineError::Interrupted) => break,
                Err(ReadlineError::Eof) => break,
                Err(err) => return Err(err.into()),
            }
        }

        Ok(())
    }
}

impl Default for Interpreter {
    /// Create an interpreter with the default set of commands:
    /// - built-ins: `exit`, `history`
    /// - external command launcher
    fn default() -> Self {
        use crate::builtin::{Exit, History};
        use crate::external::ExternalCommand;
        Self::new(vec![
            Box::new(Factory::<Exit>::default()),
            Box::new(Factory::<History>::default()),
            Box::new(Factory::<ExternalCommand>::default()),
        ])
    }
}
