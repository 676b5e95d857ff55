//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use roundtrip_cli::CliError;

fn main() {
    env_logger::init();
    match roundtrip_cli::run() {
        Ok(()) => {}
        // Lets clap render help and version output with its own exit codes.
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            log::debug!("{err:?}");
            eprintln!("roundtrip: {err}");
            std::process::exit(1);
        }
    }
}
