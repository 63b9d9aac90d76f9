use clap::Parser;

mod cli;
mod commands;
mod domain;
mod services;

use cli::Cli;
use services::output::print_error;
use services::store::{default_db_path, Store, StoreError};

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        print_error(cli.json, error_code(&err), &err);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let db_path = match &cli.db {
        Some(path) => path.clone(),
        None => default_db_path()?,
    };
    let store = Store::open(&db_path)?;

    if commands::handle_order_commands(cli, &store)? {
        return Ok(());
    }
    if commands::handle_tracking_commands(cli, &store)? {
        return Ok(());
    }
    Ok(())
}

fn error_code(err: &anyhow::Error) -> &'static str {
    match err.downcast_ref::<StoreError>() {
        Some(StoreError::OrderNotFound(_)) => "ORDER_NOT_FOUND",
        Some(StoreError::DuplicateTracking(_)) => "DUPLICATE_TRACKING",
        Some(_) => "STORE",
        None => "ERROR",
    }
}
