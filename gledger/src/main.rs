//! `gledger` binary entry point: parse flags, initialize logging, run.

use clap::Parser;
use gledger::cli::Cli;

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(err) = gledger::run(cli) {
        log::error!("{err:?}");
        eprintln!("gledger: {err:#}");
        std::process::exit(1);
    }
}
