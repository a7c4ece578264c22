use std::env;

use chrono::Utc;
use log::{LevelFilter, Log, Metadata, Record};

/// Writes `HH:MM:SS.mmm LEVEL target - message` lines to stderr so they never
/// mix with a binary's stdout output.
struct ArenaLogger;

impl Log for ArenaLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        eprintln!(
            "{} {:<5} {} - {}",
            Utc::now().format("%H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {}
}

static LOGGER: ArenaLogger = ArenaLogger;

/// Install the logger, level from `ARENA_LOG` (`info` when unset or invalid).
/// Later calls are no-ops.
pub fn init_logging() {
    let level = env::var("ARENA_LOG")
        .ok()
        .and_then(|lvl| lvl.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}
