//! Taxi fare regression demonstration.

use std::io::Write;
use std::process;

use clap::Parser;
use env_logger::Builder;
use log::LevelFilter;

use primer::cli::args::TaxiArgs;
use primer::cli::commands::run_taxi;

fn main() {
    let args = TaxiArgs::parse();

    let log_level = match args.common.verbosity() {
        0 => LevelFilter::Error,
        1 => LevelFilter::Warn,
        2 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };

    Builder::new()
        .filter_level(log_level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    if let Err(e) = run_taxi(&args) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
