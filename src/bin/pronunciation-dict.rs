//! pronunciation-dict - Modify pronunciation dictionaries from the command line

use clap::Parser;
use colored::Colorize;
use std::process;

use pronunciation_dict_utils::cli::{self, Cli};

fn main() {
    let cli = Cli::parse();
    cli::init_logging(cli.debug);

    if let Err(e) = cli::execute(cli) {
        eprintln!("{}: {:#}", "Error".red().bold(), e);
        process::exit(1);
    }
}
