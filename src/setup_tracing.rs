use time::{format_description::BorrowedFormatItem, macros::format_description, UtcOffset};
use tracing_subscriber::{fmt::time::OffsetTime, EnvFilter};

use crate::cli::Commands;

const TIMER_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second].[subsecond digits:2]");

/// Default filter for a command. `RUST_LOG` overrides it.
fn default_level<'a>(command: &Option<Commands>, server_log_level: &'a str) -> &'a str {
    match command {
        // Printing commands stay quiet
        Some(Commands::Version | Commands::GenerateJwtSecret | Commands::Routes) => "error",
        Some(Commands::Serve) | None => server_log_level,
    }
}

pub fn setup_tracing_for_command(command: &Option<Commands>, server_log_level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(command, server_log_level)));

    let result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_level(true)
        .with_ansi(true)
        .with_timer(OffsetTime::new(
            UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
            TIMER_FORMAT,
        ))
        .compact()
        .try_init();

    if let Err(e) = result {
        eprintln!("Tracing was already initialized: {e}");
    }
}
