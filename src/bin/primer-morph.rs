//! Personal name inflection demonstration.

use std::io::Write;
use std::process;

use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use primer::cli::args::MorphArgs;
use primer::cli::commands::run_morph;

fn main() {
    let args = MorphArgs::parse();

    let log_level = match args.common.verbosity() {
        0 => LevelFilter::Error, // Quiet mode
        1 => LevelFilter::Warn,  // Default
        2 => LevelFilter::Info,  // Verbose
        _ => LevelFilter::Debug, // Very verbose (3+)
    };

    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    if let Err(e) = run_morph(&args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
