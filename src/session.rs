use crate::{
    aggregate::{aggregate, copy_buffered, CopyError, Source},
    editor::Editor,
    temp::TempFile,
    throws, Config, SessionError,
};
use fehler::throw;
use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};
use tracing::{debug, warn};

/// Runs the whole pipeline: concatenate `sources` into a fresh temporary
/// file, hand it to `editor`, then copy the result to `out`.
///
/// The temporary file is removed before this returns, whatever the outcome.
#[throws(SessionError)]
pub fn run<E, W>(
    config: &Config,
    sources: &[Source],
    editor: &E,
    stdin: &mut dyn Read,
    out: &mut W,
) where
    E: Editor + ?Sized,
    W: Write + ?Sized,
{
    let (temp, mut file) = TempFile::create_in(&config.temp_dir)?;
    let report = aggregate(sources, stdin, &mut file, temp.path())?;
    debug!(
        "wrote {} bytes to {} ({} sources skipped)",
        report.bytes,
        temp.path().display(),
        report.skipped
    );
    drop(file);

    let status = match editor.edit(temp.path()) {
        Ok(status) => status,
        Err(source) => throw!(SessionError::Spawn {
            program: editor.program(),
            source,
        }),
    };
    if !status.success() {
        if !config.ignore_fail {
            throw!(SessionError::EditorFailed(status));
        }
        warn!("editor exited with {}, emitting anyway", status);
    }

    emit(temp.path(), out)?;
}

/// Streams the file at `path` to `out`.
#[throws(SessionError)]
pub fn emit<W>(path: &Path, out: &mut W)
where
    W: Write + ?Sized,
{
    let mut file = File::open(path).map_err(|source| SessionError::ReopenTemp {
        path: path.to_owned(),
        source,
    })?;
    match copy_buffered(&mut file, &mut *out) {
        Ok(copied) => debug!("emitted {} bytes", copied),
        Err(CopyError::Read { copied, source }) => {
            warn!("stopped reading {} after {} bytes: {}", path.display(), copied, source)
        }
        Err(CopyError::Write { source, .. }) => throw!(SessionError::Emit(source)),
    }
    out.flush().map_err(SessionError::Emit)?;
}
