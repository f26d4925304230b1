use crate::history::HistoryBuffer;
use std::env as stdenv;
use std::path::PathBuf;

/// Mutable state owned by the shell loop.
///
/// The environment contains:
/// - `search_paths`: directories consulted to resolve bare command names,
///   in lookup order.
/// - `history`: the bounded buffer of previously entered lines.
/// - `should_exit`: a flag that the REPL loop checks to know when to
///   terminate.
///
/// Note: fields are public for simplicity to keep the example small.
/// Production code would prefer accessor methods over public fields.
#[derive(Debug, Default)]
pub struct Environment {
    /// Ordered search-path list; first match wins during resolution.
    pub search_paths: Vec<PathBuf>,
    /// Previously entered command lines, newest last chronologically.
    pub history: HistoryBuffer,
    /// When set to true, indicates that the interactive loop should exit.
    pub should_exit: bool,
}

impl Environment {
    /// Capture the current process state into a new `Environment` instance.
    ///
    /// `PATH` is read and split exactly once; later changes to the process
    /// environment are not observed by the resolver.
    pub fn new() -> Self {
        let search_paths = stdenv::var_os("PATH")
            .map(|raw| stdenv::split_paths(&raw).collect())
            .unwrap_or_default();
        Self {
            search_paths,
            history: HistoryBuffer::new(),
            should_exit: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reads_search_paths_from_process_env() {
        // PATH is set in any sane test environment.
        let env = Environment::new();
        assert!(!env.search_paths.is_empty());
        assert!(env.history.is_empty());
        assert!(!env.should_exit);
    }
}
