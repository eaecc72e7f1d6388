use crate::{throws, SessionError};
use fehler::throw;
use std::{
    ffi::{OsStr, OsString},
    fmt,
    fs::File,
    io::{self, Read, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const BUFFER_SIZE: usize = 4096;

/// Argument that selects standard input instead of a file.
pub const STDIN_SENTINEL: &str = "-";

/// One input to concatenate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Stdin,
    Path(PathBuf),
}

impl From<&OsStr> for Source {
    fn from(arg: &OsStr) -> Self {
        if arg == STDIN_SENTINEL {
            Self::Stdin
        } else {
            Self::Path(PathBuf::from(arg))
        }
    }
}

impl From<OsString> for Source {
    fn from(arg: OsString) -> Self {
        Self::from(arg.as_os_str())
    }
}

impl From<&str> for Source {
    fn from(arg: &str) -> Self {
        Self::from(OsStr::new(arg))
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => f.write_str("<stdin>"),
            Self::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Error, Debug)]
pub enum CopyError {
    #[error("read failed after {copied} bytes: {source}")]
    Read { copied: u64, source: io::Error },

    #[error("write failed after {copied} bytes: {source}")]
    Write { copied: u64, source: io::Error },
}

/// Copies `reader` into `writer` through a fixed buffer until end of stream.
/// Returns the number of bytes written.
pub fn copy_buffered<R, W>(reader: &mut R, writer: &mut W) -> Result<u64, CopyError>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = [0u8; BUFFER_SIZE];
    let mut copied = 0u64;
    loop {
        let len = match reader.read(&mut buf) {
            Ok(0) => return Ok(copied),
            Ok(len) => len,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(source) => return Err(CopyError::Read { copied, source }),
        };
        if let Err(source) = writer.write_all(&buf[..len]) {
            return Err(CopyError::Write { copied, source });
        }
        copied += len as u64;
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AggregateReport {
    pub bytes: u64,
    /// Sources that could not be opened and contributed nothing.
    pub skipped: usize,
}

/// Concatenates `sources` in order into `dest`. Sources that cannot be opened
/// or fail mid-read are logged and skipped; only failing to write `dest`
/// (the file at `dest_path`) aborts.
#[throws(SessionError)]
pub fn aggregate<W>(
    sources: &[Source],
    stdin: &mut dyn Read,
    dest: &mut W,
    dest_path: &Path,
) -> AggregateReport
where
    W: Write + ?Sized,
{
    let mut report = AggregateReport::default();
    for source in sources {
        let result = match source {
            Source::Stdin => {
                info!("reading from stdin...");
                copy_buffered(&mut *stdin, &mut *dest)
            }
            Source::Path(path) => match File::open(path) {
                Ok(mut file) => copy_buffered(&mut file, &mut *dest),
                Err(err) => {
                    warn!("failed to open {}: {}", path.display(), err);
                    report.skipped += 1;
                    continue;
                }
            },
        };
        match result {
            Ok(copied) => {
                debug!("copied {} bytes from {}", copied, source);
                report.bytes += copied;
            }
            Err(CopyError::Read { copied, source: err }) => {
                warn!("stopped reading {} after {} bytes: {}", source, copied, err);
                report.bytes += copied;
            }
            Err(CopyError::Write { source, .. }) => throw!(SessionError::WriteTemp {
                path: dest_path.to_owned(),
                source,
            }),
        }
    }
    dest.flush().map_err(|source| SessionError::WriteTemp {
        path: dest_path.to_owned(),
        source,
    })?;
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fs, io::Cursor};

    /// Yields `data` once, then fails.
    struct Flaky<'a> {
        data: Option<&'a [u8]>,
    }

    impl Read for Flaky<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.take() {
                Some(data) => {
                    buf[..data.len()].copy_from_slice(data);
                    Ok(data.len())
                }
                None => Err(io::Error::new(io::ErrorKind::Other, "device gone")),
            }
        }
    }

    struct Full;

    impl Write for Full {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn dash_is_stdin() {
        assert_eq!(Source::from("-"), Source::Stdin);
        assert_eq!(Source::from("./-"), Source::Path(PathBuf::from("./-")));
        assert_eq!(Source::from("a.txt"), Source::Path(PathBuf::from("a.txt")));
    }

    #[test]
    fn copies_across_buffer_boundaries() {
        let data: Vec<u8> = (0..BUFFER_SIZE * 3 + 17).map(|i| i as u8).collect();
        let mut out = Vec::new();
        let copied = copy_buffered(&mut Cursor::new(&data), &mut out).unwrap();
        assert_eq!(copied, data.len() as u64);
        assert_eq!(out, data);
    }

    #[test]
    fn read_error_keeps_what_was_copied() {
        let mut out = Vec::new();
        let err = copy_buffered(&mut Flaky { data: Some(&b"partial"[..]) }, &mut out).unwrap_err();
        assert!(matches!(err, CopyError::Read { copied: 7, .. }));
        assert_eq!(out, b"partial");
    }

    #[test]
    fn concatenates_in_order_with_stdin_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.txt");
        let b = dir.path().join("b.txt");
        fs::write(&a, "AB").unwrap();
        fs::write(&b, "EF").unwrap();

        let sources = [Source::Path(a), Source::Stdin, Source::Path(b)];
        let mut out = Vec::new();
        let report = aggregate(&sources, &mut Cursor::new("CD"), &mut out, Path::new("out")).unwrap();

        assert_eq!(out, b"ABCDEF");
        assert_eq!(report, AggregateReport { bytes: 6, skipped: 0 });
    }

    #[test]
    fn missing_source_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("present");
        fs::write(&present, "kept").unwrap();

        let sources = [Source::Path(dir.path().join("missing")), Source::Path(present)];
        let mut out = Vec::new();
        let report = aggregate(&sources, &mut io::empty(), &mut out, Path::new("out")).unwrap();

        assert_eq!(out, b"kept");
        assert_eq!(report.skipped, 1);
    }

    #[test]
    fn no_sources_writes_nothing() {
        let mut out = Vec::new();
        let report = aggregate(&[], &mut io::empty(), &mut out, Path::new("out")).unwrap();
        assert!(out.is_empty());
        assert_eq!(report, AggregateReport::default());
    }

    #[test]
    fn second_stdin_reads_nothing() {
        let mut out = Vec::new();
        let sources = [Source::Stdin, Source::Stdin];
        aggregate(&sources, &mut Cursor::new("once"), &mut out, Path::new("out")).unwrap();
        assert_eq!(out, b"once");
    }

    #[test]
    fn failing_stdin_does_not_abort() {
        let dir = tempfile::tempdir().unwrap();
        let tail = dir.path().join("tail");
        fs::write(&tail, "!").unwrap();

        let sources = [Source::Stdin, Source::Path(tail)];
        let mut out = Vec::new();
        let report = aggregate(&sources, &mut Flaky { data: Some(&b"half"[..]) }, &mut out, Path::new("out")).unwrap();

        assert_eq!(out, b"half!");
        assert_eq!(report.bytes, 5);
    }

    #[test]
    fn write_failure_is_fatal() {
        let err = aggregate(&[Source::Stdin], &mut Cursor::new("x"), &mut Full, Path::new("out")).unwrap_err();
        assert!(matches!(err, SessionError::WriteTemp { .. }));
    }
}
