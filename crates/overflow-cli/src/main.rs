//! Overflow CLI: the `overflow` command.

mod cli;
mod commands;
mod config;
mod support;

use clap::Parser;
use cli::{Cli, Commands};
use config::Settings;

fn init_tracing(log_level: &str) {
    let log_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        format!("overflow={log_level},overflow_core={log_level},overflow_query={log_level}")
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let cli = Cli::parse();
    let settings = Settings::resolve(&cli.global).unwrap_or_else(|e| support::fail(e));
    init_tracing(&settings.log_level);
    tracing::debug!(
        store = %settings.store.display(),
        config = ?settings.config_path,
        acting_as = ?settings.acting_as,
        "settings resolved"
    );

    match cli.command {
        Commands::Init { json } => commands::init::run(&settings, json),

        Commands::Status { json } => commands::status::run(&settings, json),

        Commands::Front { json } => commands::front::run(&settings, json),

        Commands::User { command } => commands::user::run(&settings, command),

        Commands::Question { command } => commands::question::run(&settings, command),

        Commands::Answer { command } => commands::answer::run(&settings, command),

        Commands::Vote {
            kind,
            id,
            value,
            json,
        } => commands::vote::run(&settings, kind, id, value, json),

        Commands::Search { query, json } => commands::search::run(&settings, query, json),

        Commands::Tag { command } => commands::tag::run(&settings, command),
    }
}
