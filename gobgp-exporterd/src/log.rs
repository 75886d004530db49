// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use clap::ValueEnum;
use slog::{Drain, Level, Logger};
use std::fs::File;
use std::io::Write;

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// JSON lines in the bunyan format.
    Bunyan,
    /// Human readable, filtered through RUST_LOG.
    Term,
}

pub fn parse_level(s: &str) -> Result<Level, String> {
    s.parse().map_err(|_| format!("unknown log level {s:?}"))
}

pub fn init_logger(
    format: LogFormat,
    level: Level,
    file: Option<&str>,
) -> std::io::Result<Logger> {
    Ok(match (format, file) {
        (LogFormat::Bunyan, None) => build_logger(std::io::stdout(), level),
        (LogFormat::Bunyan, Some(path)) => {
            build_logger(File::create(path)?, level)
        }
        (LogFormat::Term, None) => build_term_logger(),
        (LogFormat::Term, Some(path)) => {
            build_plain_logger(File::create(path)?, level)
        }
    })
}

pub fn build_logger<W: Write + Send + 'static>(w: W, level: Level) -> Logger {
    let drain = slog_bunyan::new(w).build().fuse();
    let drain = drain.filter_level(level).fuse();
    let drain = slog_async::Async::new(drain)
        .chan_size(0x8000)
        .build()
        .fuse();
    slog::Logger::root(drain, slog::o!())
}

fn build_term_logger() -> Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_envlogger::new(drain).fuse();
    let drain = slog_async::Async::new(drain)
        .chan_size(0x2000)
        .build()
        .fuse();
    slog::Logger::root(drain, slog::o!())
}

fn build_plain_logger(file: File, level: Level) -> Logger {
    let decorator = slog_term::PlainDecorator::new(file);
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = drain.filter_level(level).fuse();
    let drain = slog_async::Async::new(drain)
        .chan_size(0x2000)
        .build()
        .fuse();
    slog::Logger::root(drain, slog::o!())
}

// daemon
macro_rules! dlog {
    (
        $log:expr, $level:ident, $msg:expr, $($args:expr),*;
        $($key:expr => $value:expr),*
    ) => {
        slog::$level!($log,
            $msg, $($args),*;
            "component" => crate::COMPONENT_EXPORTERD,
            "unit" => UNIT_DAEMON,
            $($key => $value),*
        )
    };
    ($log:expr, $level:ident, $msg:expr; $($key:expr => $value:expr),*) => {
        slog::$level!($log,
            $msg;
            "component" => crate::COMPONENT_EXPORTERD,
            "unit" => UNIT_DAEMON,
            $($key => $value),*
        )
    };
    ($log:expr, $level:ident, $msg:expr) => {
        slog::$level!($log,
            $msg;
            "component" => crate::COMPONENT_EXPORTERD,
            "unit" => UNIT_DAEMON
        )
    };
    ($log:expr, $level:ident, $msg:expr, $($args:expr),*) => {
        slog::$level!($log,
            $msg, $($args),*;
            "component" => crate::COMPONENT_EXPORTERD,
            "unit" => UNIT_DAEMON,
        )
    };
}

pub(crate) use dlog;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels() {
        assert_eq!(parse_level("debug"), Ok(Level::Debug));
        assert_eq!(parse_level("warn"), Ok(Level::Warning));
        assert!(parse_level("loud").is_err());
    }
}
