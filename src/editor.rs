use std::{
    env,
    ffi::OsString,
    io,
    path::Path,
    process::{Command, ExitStatus, Stdio},
};
use tracing::{debug, info, warn};

/// Environment variables naming the editor, highest priority first.
pub const EDITOR_VARS: [&str; 3] = ["EDITOR", "VISUAL", "SELECTED_EDITOR"];
pub const DEFAULT_EDITOR: &str = "nano";

pub fn resolve_editor() -> OsString {
    resolve_with(|name| env::var_os(name))
}

/// Returns the first variable from [`EDITOR_VARS`] that `lookup` reports as
/// set, even if it is empty, or [`DEFAULT_EDITOR`].
pub fn resolve_with(lookup: impl Fn(&str) -> Option<OsString>) -> OsString {
    for name in EDITOR_VARS {
        if let Some(program) = lookup(name) {
            debug!("using editor from ${}: {}", name, program.to_string_lossy());
            return program;
        }
    }
    warn!("unable to detect default editor, falling back to {}", DEFAULT_EDITOR);
    OsString::from(DEFAULT_EDITOR)
}

/// Runs an editor on a file to completion.
pub trait Editor {
    fn edit(&self, path: &Path) -> io::Result<ExitStatus>;

    /// Name used when reporting failures.
    fn program(&self) -> OsString {
        OsString::from("editor")
    }
}

impl<F> Editor for F
where
    F: Fn(&Path) -> io::Result<ExitStatus>,
{
    fn edit(&self, path: &Path) -> io::Result<ExitStatus> {
        self(path)
    }
}

/// Spawns `program <path>` and blocks until it exits.
#[derive(Debug, Clone)]
pub struct ProcessEditor {
    program: OsString,
}

impl ProcessEditor {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(resolve_editor())
    }

    fn command(&self, path: &Path) -> Command {
        let mut command = Command::new(&self.program);
        command.arg(path);
        // Inside a pipeline our own stdin/stdout are not the terminal, so
        // hand the editor the controlling terminal when there is one.
        if !termion::is_tty(&io::stdin()) {
            if let Some(tty) = terminal() {
                command.stdin(tty);
            }
        }
        if !termion::is_tty(&io::stdout()) {
            if let Some(tty) = terminal() {
                command.stdout(tty);
            }
        }
        command
    }
}

fn terminal() -> Option<Stdio> {
    match termion::get_tty() {
        Ok(tty) => Some(Stdio::from(tty)),
        Err(err) => {
            debug!("no controlling terminal: {}", err);
            None
        }
    }
}

impl Editor for ProcessEditor {
    fn edit(&self, path: &Path) -> io::Result<ExitStatus> {
        let mut child = self.command(path).spawn()?;
        info!("waiting for your editor to finish");
        child.wait()
    }

    fn program(&self) -> OsString {
        self.program.clone()
    }
}
