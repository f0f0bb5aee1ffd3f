mod cli;
mod loader;
mod metrics;
mod model;
mod plot;
mod stats;
mod storage;
mod text_summary;

use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;

fn main() -> Result<()> {
    let args = match cli::Cli::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            // Usage errors exit with 1, not clap's default of 2
            let _ = e.print();
            std::process::exit(1);
        }
    };
    let is_silent = args.silent;

    match cli::run(args) {
        Ok(()) => Ok(()),
        Err(e) => {
            if is_silent {
                eprintln!("Error: {e:#}");
                std::process::exit(1);
            } else {
                Err(e)
            }
        }
    }
}
