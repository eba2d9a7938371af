//! Logger setup for hosts
//!
//! `NASR_LOG` overrides the level passed in, e.g. `NASR_LOG=debug`.

use env_logger::Builder;
use log::LevelFilter;

const LOG_ENV: &str = "NASR_LOG";

/// Parse a level name, falling back to `Info` for anything unrecognised
pub fn parse_level(level: &str) -> LevelFilter {
    level.trim().parse::<LevelFilter>().unwrap_or(LevelFilter::Info)
}

/// Install the global logger. Returns false if one was already installed.
pub fn init_logging(level: &str) -> bool {
    let level = std::env::var(LOG_ENV)
        .ok()
        .map(|v| parse_level(&v))
        .unwrap_or_else(|| parse_level(level));

    let mut builder = Builder::new();
    builder.filter_level(level);
    builder.format_timestamp_millis();
    builder.try_init().is_ok()
}
