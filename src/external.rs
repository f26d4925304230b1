use crate::command::{CommandFactory, ExecutableCommand, ExitCode};
use crate::env::Environment;
use crate::interpreter::Factory;
use anyhow::Result;
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

/// Prefix marking a command that must be resolved against the current
/// working directory only, never the search path.
const LOCAL_MARKER: &str = "./";

/// Command that is not a builtin: a resolved executable plus the argument
/// vector to launch it with.
pub struct ExternalCommand {
    /// Path confirmed to be a regular, executable file at resolution time.
    path: PathBuf,
    /// The command name as typed; becomes `argv[0]` of the child.
    name: OsString,
    args: Vec<OsString>,
}

impl ExternalCommand {
    pub fn new(path: PathBuf, name: &str, args: &[&str]) -> Self {
        Self {
            path,
            name: name.into(),
            args: args.iter().map(|a| a.into()).collect(),
        }
    }
}

impl CommandFactory for Factory<ExternalCommand> {
    fn try_create(
        &self,
        env: &Environment,
        name: &str,
        args: &[&str],
    ) -> Option<Box<dyn ExecutableCommand>> {
        let path = resolve(name, &env.search_paths)?;
        Some(Box::new(ExternalCommand::new(path, name, args)))
    }
}

impl ExecutableCommand for ExternalCommand {
    /// Launch the resolved executable and block until it terminates.
    ///
    /// The child inherits the parent's environment and standard streams, so
    /// the `stdout` handle of the trait is unused here. A spawn failure (the
    /// file stopped qualifying between the resolution check and the launch)
    /// is not reported; the loop just observes exit code 127.
    fn execute(
        self: Box<Self>,
        _stdout: &mut dyn Write,
        _env: &mut Environment,
    ) -> Result<ExitCode> {
        let mut cmd = std::process::Command::new(&self.path);
        cmd.args(&self.args);
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.arg0(&self.name);
        }
        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(_) => return Ok(127),
        };
        let exit_status = child.wait()?;
        match exit_status.code() {
            Some(x) => Ok(x),
            None => Ok(terminated_by_signal(exit_status)),
        }
    }
}

#[cfg(unix)]
fn terminated_by_signal(exit_status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    if let Some(signal) = ExitStatusExt::signal(&exit_status) {
        128 + signal
    } else if ExitStatusExt::core_dumped(&exit_status) {
        255
    } else {
        -1
    }
}

#[cfg(not(unix))]
fn terminated_by_signal(_exit_status: ExitStatus) -> i32 {
    -1
}

/// Resolve a command token to a confirmed executable path.
///
/// Behavior:
/// - `./`-prefixed token: the candidate is the token itself, checked against
///   the current working directory only; the search path is never consulted.
/// - Any other token: each search-path directory is tried in order and the
///   first candidate that qualifies wins.
///
/// A candidate qualifies when it is a regular file with an execute permission
/// bit set; this is a capability check, not a trial execution.
pub fn resolve(command: &str, search_paths: &[PathBuf]) -> Option<PathBuf> {
    if command.starts_with(LOCAL_MARKER) {
        let candidate = Path::new(command);
        return is_executable_file(candidate).then(|| candidate.to_path_buf());
    }
    search_paths
        .iter()
        .map(|dir| dir.join(command))
        .find(|candidate| is_executable_file(candidate))
}

fn is_executable_file(path: &Path) -> bool {
    match fs::metadata(path) {
        Ok(meta) => meta.is_file() && has_execute_bit(&meta),
        Err(_) => false,
    }
}

#[cfg(unix)]
fn has_execute_bit(meta: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn has_execute_bit(_meta: &fs::Metadata) -> bool {
    true
}
