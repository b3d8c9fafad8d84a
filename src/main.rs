//! The main entry point for the `resub` command-line application.
//!
//! Configuration errors (missing arguments, bad patterns, stdin mixed with
//! paths) exit with status 1 before anything is touched. Errors on individual
//! files are reported as they happen and do not change the exit status.

use resub::cli;
use resub::config::Config;
use resub::errors::Error;
use resub::walker;
use std::process;

fn main() {
    let args = cli::parse_args();

    let config = match Config::from_args(args) {
        Ok(config) => config,
        Err(Error::Usage) => {
            eprintln!("{}", cli::usage());
            process::exit(1);
        }
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    if let Err(e) = walker::run(config) {
        eprintln!("{e}");
        process::exit(1);
    }
}
