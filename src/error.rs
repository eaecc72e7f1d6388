use std::{ffi::OsString, io, path::PathBuf, process::ExitStatus};
use thiserror::Error;

/// Conditions that abort the pipeline. Each one maps to exit code 1.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("failed to create temporary file in {}: {source}", dir.display())]
    CreateTemp { dir: PathBuf, source: io::Error },

    #[error("failed to write temporary file {}: {source}", path.display())]
    WriteTemp { path: PathBuf, source: io::Error },

    #[error("failed to run editor {}: {source}", program.to_string_lossy())]
    Spawn { program: OsString, source: io::Error },

    #[error("editor exited with {0}")]
    EditorFailed(ExitStatus),

    #[error("failed to reopen temporary file {}: {source}", path.display())]
    ReopenTemp { path: PathBuf, source: io::Error },

    #[error("failed to write output: {0}")]
    Emit(#[source] io::Error),
}
