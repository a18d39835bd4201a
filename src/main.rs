mod cli;
mod compare_cmd;
mod config;
mod convert;
mod logging;
mod select_cmd;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Compare(args) => compare_cmd::run(args),
        Command::Select(args) => select_cmd::run(args),
    }
}
