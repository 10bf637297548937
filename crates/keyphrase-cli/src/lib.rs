pub mod cli;
pub mod commands;

use clap::Parser;
use cli::Keyphrase;
use commands::handle_command;
use std::process;

/// Run the keyphrase CLI application
pub fn run_main() {
    let args = Keyphrase::parse();

    if let Err(e) = keyphrase_daemon::logging::init(args.verbose) {
        eprintln!("Warning: {}", e);
    }

    if let Err(e) = handle_command(args.commands) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
