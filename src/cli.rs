use crate::{aggregate::Source, Config};
use clap::{ArgAction, CommandFactory, Parser};
use std::{ffi::OsString, process::ExitCode};

/// Edit the concatenation of FILEs in your editor, then print the result.
#[derive(Parser, Debug)]
#[command(
    name = "hereed",
    version,
    disable_help_flag = true,
    disable_version_flag = true,
    after_help = "If FILE is `-', read from stdin.\nThe editor is taken from $EDITOR, $VISUAL or $SELECTED_EDITOR, in that order."
)]
pub struct Cli {
    /// Succeed even if the editor exits with failure
    #[arg(short = 's', long)]
    pub ignore_fail: bool,

    /// Print verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Print this help and exit
    #[arg(long, action = ArgAction::Help)]
    help: Option<bool>,

    /// Print version and exit
    #[arg(long, action = ArgAction::Version)]
    version: Option<bool>,

    #[arg(value_name = "FILE")]
    pub files: Vec<OsString>,
}

impl Cli {
    pub fn config(&self) -> Config {
        Config {
            verbose: self.verbose,
            ignore_fail: self.ignore_fail,
            ..Config::default()
        }
    }

    pub fn sources(&self) -> Vec<Source> {
        self.files.iter().map(|file| Source::from(file.as_os_str())).collect()
    }
}

/// Prints a parse failure (or the help/version text clap reports the same
/// way) and picks the exit code: 0 for `--help`/`--version`, 1 otherwise.
pub fn report(err: clap::Error) -> ExitCode {
    if !err.use_stderr() {
        let _ = err.print();
        return ExitCode::SUCCESS;
    }
    eprint!("{}", failure_text(&err));
    ExitCode::FAILURE
}

/// The parse error followed by the full help text.
pub fn failure_text(err: &clap::Error) -> String {
    format!("{}\n{}", err.render(), Cli::command().render_help())
}
