use std::path::PathBuf;

/// Directory the temporary file is created in.
pub const TEMP_DIR: &str = "/tmp";

/// Options controlling one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Print diagnostics to stderr.
    pub verbose: bool,
    /// Emit the file even when the editor exits with a failure status.
    pub ignore_fail: bool,
    pub temp_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: false,
            ignore_fail: false,
            temp_dir: PathBuf::from(TEMP_DIR),
        }
    }
}

impl Config {
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = dir.into();
        self
    }
}
