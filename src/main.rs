use budgetbuddy::args::{Args, Command};
use budgetbuddy::{commands, Result};
use clap::Parser;
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with {} error: {e}", e.error_type());
            ExitCode::FAILURE
        }
    }
}

pub fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().budgetbuddy_home().path();

    // Every command except init needs an existing home directory
    let load = || commands::load_config(home);

    let _: () = match args.command() {
        Command::Init => commands::init(home)?.print(),
        Command::Add(add_args) => commands::add(load()?, add_args.clone())?.print(),
        Command::Import(import_args) => commands::import(load()?, import_args.clone())?.print(),
        Command::Save => commands::save(load()?)?.print(),
        Command::Clear => commands::clear(load()?)?.print(),
        Command::List => commands::list(load()?)?.print(),
        Command::Summary(summary_args) => {
            commands::summary(load()?, summary_args.clone())?.print()
        }
        Command::Chart(chart_args) => commands::chart(load()?, chart_args.clone())?.print(),
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
