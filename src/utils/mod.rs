//! Utilities: logging setup (tracing-subscriber on stderr) and level derivation.
//!
//! Key items:
//!   derive_level / init_logging
//!   LOG_ENV (`CMDLOOP_LOG`, an EnvFilter directive that overrides -v / -q)

use std::io::{self, IsTerminal};

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "CMDLOOP_LOG";

/// Map `-v` count and `-q` onto a level; quiet wins.
pub fn derive_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::ERROR;
    }
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Build the filter: a non-empty `CMDLOOP_LOG` takes precedence over `level`.
pub fn build_filter(level: LevelFilter, env_directive: Option<&str>) -> EnvFilter {
    if let Some(directive) = env_directive.map(str::trim).filter(|d| !d.is_empty()) {
        match EnvFilter::try_new(directive) {
            Ok(filter) => return filter,
            Err(err) => eprintln!("ignoring invalid {LOG_ENV} '{directive}': {err}"),
        }
    }
    EnvFilter::default().add_directive(level.into())
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logging(level: LevelFilter) {
    let directive = std::env::var(LOG_ENV).ok();
    let filter = build_filter(level, directive.as_deref());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .try_init();
}
