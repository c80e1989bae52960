use crate::prelude::{eprintln, println, *};
use clap::error::ErrorKind;
use clap::Parser;

mod cli;
mod error;
mod persist;
mod prelude;
mod run;

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .target(env_logger::Target::Stderr)
        .init();
}

/// JSON payload for an argument error, or `None` when clap should print
/// help or version text and exit normally.
fn usage_failure(err: &clap::Error) -> Option<String> {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => None,
        _ => Some(run::failure_payload(err.to_string().trim())),
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let app = match cli::App::try_parse() {
        Ok(app) => app,
        Err(err) => match usage_failure(&err) {
            None => err.exit(),
            Some(payload) => {
                eprintln!("{err}");
                println!("{payload}");
                std::process::exit(1);
            }
        },
    };

    init_logging(app.verbose);

    let outcome = run::run(&app, chrono::Local::now().naive_local())?;
    println!("{}", outcome.json);

    if !outcome.success {
        std::process::exit(1);
    }
    Ok(())
}
