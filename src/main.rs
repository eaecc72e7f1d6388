use clap::Parser;
use hereed::{cli, cli::Cli, editor::ProcessEditor, logging};
use std::{io, process::ExitCode};
use tracing::error;

fn main() -> ExitCode {
    let args = match Cli::try_parse() {
        Ok(args) => args,
        Err(err) => return cli::report(err),
    };
    let config = args.config();
    if let Err(err) = logging::init(&config) {
        eprintln!("hereed: {:#}", err);
    }

    let editor = ProcessEditor::from_env();
    let stdin = io::stdin();
    let stdout = io::stdout();
    // The temporary file is gone by the time run returns.
    match hereed::run(&config, &args.sources(), &editor, &mut stdin.lock(), &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
