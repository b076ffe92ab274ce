//! Logging backend: a `log::Log` implementation that reproduces the
//! original's numeric 0..1000 verbosity threshold on top of the `log`
//! crate's five-variant `Level`.
//!
//! Grounded on `original_source/src/utils/logger.h`/`.cpp`: the original
//! `Logger` carries nine named thresholds (`OFF`=0 .. `ALL`=1000, with
//! `DEBUG`=5 through `DEBUGL4`=8 packed between `INFO` and `ALL`) and
//! compares a call site's fixed level against a single runtime
//! threshold. `log::Level` only has five variants, so `Debug`/`Info`/
//! `Warn`/`Error` map straight across and the three extra debug tiers
//! ride on `Level::Trace` with the tier encoded in the log record's
//! `target` (via the [`debugl2`]/[`debugl3`]/[`debugl4`] macros below).
//! The original's `FATAL` tier has no counterpart here: per spec.md §7,
//! what used to be a `logger->fatal` call followed by best-effort
//! continuation is now a returned [`crate::error::StarkError`].

use log::{Level, LevelFilter, Log, Metadata, Record};

pub mod level {
    pub const OFF: i32 = 0;
    pub const ERROR: i32 = 2;
    pub const WARN: i32 = 3;
    pub const INFO: i32 = 4;
    pub const DEBUG: i32 = 5;
    pub const DEBUGL2: i32 = 6;
    pub const DEBUGL3: i32 = 7;
    pub const DEBUGL4: i32 = 8;
    pub const ALL: i32 = 1000;
}

struct StarkLogger {
    threshold: i32,
}

fn severity(record_level: Level, target: &str) -> i32 {
    match record_level {
        Level::Error => level::ERROR,
        Level::Warn => level::WARN,
        Level::Info => level::INFO,
        Level::Debug => level::DEBUG,
        Level::Trace => {
            if target.ends_with("debugl4") {
                level::DEBUGL4
            } else if target.ends_with("debugl3") {
                level::DEBUGL3
            } else {
                level::DEBUGL2
            }
        }
    }
}

impl Log for StarkLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        severity(metadata.level(), metadata.target()) <= self.threshold
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        eprintln!("{}: {}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S"), record.args());
    }

    fn flush(&self) {}
}

/// Install the global logger with `threshold` as the numeric verbosity
/// cutoff (0 = nothing, 1000 = everything). Safe to call once, at
/// startup; a second call is a configuration error in the caller.
pub fn init(threshold: i32) {
    log::set_boxed_logger(Box::new(StarkLogger { threshold })).expect("logger already installed");
    log::set_max_level(LevelFilter::Trace);
}

/// Third debug tier (`DEBUGL2` = 6), between `debug!` and `debugl3!`.
#[macro_export]
macro_rules! debugl2 {
    ($($arg:tt)*) => {
        log::log!(target: "stark::debugl2", log::Level::Trace, $($arg)*)
    };
}

/// Fourth debug tier (`DEBUGL3` = 7).
#[macro_export]
macro_rules! debugl3 {
    ($($arg:tt)*) => {
        log::log!(target: "stark::debugl3", log::Level::Trace, $($arg)*)
    };
}

/// Fifth and noisiest debug tier (`DEBUGL4` = 8).
#[macro_export]
macro_rules! debugl4 {
    ($($arg:tt)*) => {
        log::log!(target: "stark::debugl4", log::Level::Trace, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_debug_tiers_above_plain_debug() {
        assert!(severity(Level::Trace, "stark::debugl2") > severity(Level::Debug, "stark"));
        assert!(severity(Level::Trace, "stark::debugl3") > severity(Level::Trace, "stark::debugl2"));
        assert!(severity(Level::Trace, "stark::debugl4") > severity(Level::Trace, "stark::debugl3"));
    }

    #[test]
    fn severity_defaults_trace_without_known_suffix_to_debugl2() {
        assert_eq!(severity(Level::Trace, "stark"), level::DEBUGL2);
    }
}
