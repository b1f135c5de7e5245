mod cli;

use crate::cli::Cli;

fn main() {
    // Parse CLI, initialize logging and run the audit.
    if let Err(err) = Cli::run_from_args() {
        eprintln!("cdaudit error: {:#}", err);
        std::process::exit(1);
    }
}
