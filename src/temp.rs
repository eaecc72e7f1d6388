use crate::{throws, SessionError};
use fehler::throw;
use std::{
    fs::{self, File, OpenOptions},
    io,
    path::{Path, PathBuf},
    process,
    time::{SystemTime, UNIX_EPOCH},
};
use tracing::{debug, warn};

pub const NAME_PREFIX: &str = "hereed_";

/// Xorshift generator for temp file suffixes. Not suitable for anything
/// that has to resist prediction.
#[derive(Debug, Clone)]
pub struct NameGenerator {
    state: u64,
}

impl NameGenerator {
    pub fn new() -> Self {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_nanos() as u64)
            .unwrap_or(0);
        Self::with_seed(nanos ^ (u64::from(process::id()) << 32))
    }

    pub fn with_seed(seed: u64) -> Self {
        // xorshift never leaves the all-zero state
        Self { state: seed | 1 }
    }

    pub fn next_suffix(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        (x >> 32) as u32
    }

    pub fn next_name(&mut self) -> String {
        format!("{}{}", NAME_PREFIX, self.next_suffix())
    }
}

impl Default for NameGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Owns the temporary file for one run and removes it when dropped.
#[derive(Debug)]
pub struct TempFile {
    path: PathBuf,
}

impl TempFile {
    /// Creates a fresh `hereed_<n>` file in `dir`, returning the guard and
    /// the handle opened for writing.
    #[throws(SessionError)]
    pub fn create_in(dir: &Path) -> (Self, File) {
        Self::create_with(dir, &mut NameGenerator::new())?
    }

    #[throws(SessionError)]
    pub fn create_with(dir: &Path, names: &mut NameGenerator) -> (Self, File) {
        let (path, file) = loop {
            let path = dir.join(names.next_name());
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => break (path, file),
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists => {
                    debug!("{} already exists, picking another name", path.display());
                }
                Err(source) => throw!(SessionError::CreateTemp {
                    dir: dir.to_owned(),
                    source,
                }),
            }
        };
        debug!("created temporary file {}", path.display());
        (Self { path }, file)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("removed temporary file {}", self.path.display()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!("failed to remove {}: {}", self.path.display(), err),
        }
    }
}
