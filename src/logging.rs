use chrono::Local;
use log::{LevelFilter, Metadata, Record, SetLoggerError};
use std::collections::HashSet;
use std::io::{self, Write};
use std::sync::OnceLock;

/// Topics that have a dedicated `debug_*!` macro
pub const TOPICS: [&str; 7] = [
    "geometry", "walls", "avoid", "tracker", "target", "stats", "agent",
];

// Custom logger structure
#[derive(Debug)]
struct NavLogger {
    level: LevelFilter,
    debug_filters: Option<HashSet<String>>,
}

impl NavLogger {
    // Debug and trace records only pass when their topic is in the filter (if any)
    fn topic_enabled(&self, metadata: &Metadata) -> bool {
        match &self.debug_filters {
            Some(filters)
                if metadata.level() == log::Level::Debug
                    || metadata.level() == log::Level::Trace =>
            {
                filters.contains(metadata.target())
                    || filters.iter().any(|f| metadata.target().starts_with(f.as_str()))
            }
            _ => true,
        }
    }
}

/// Pulls the tick number out of messages of the form "... Tick N ..."
fn extract_tick(message: &str) -> Option<u32> {
    let start = message.find("Tick ")? + 5;
    let digits: String = message[start..]
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

impl log::Log for NavLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && self.topic_enabled(metadata)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level_color = match record.level() {
            log::Level::Error => "\x1B[31m", // Red
            log::Level::Warn => "\x1B[33m",  // Yellow
            log::Level::Info => "\x1B[32m",  // Green
            log::Level::Debug => "\x1B[36m", // Cyan
            log::Level::Trace => "\x1B[35m", // Magenta
        };
        let reset = "\x1B[0m";
        let timestamp = Local::now().format("%H:%M:%S%.3f");

        let message = record.args().to_string();
        let context = extract_tick(&message)
            .map(|tick| format!("[T{:04}] ", tick))
            .unwrap_or_default();

        let mut output = format!(
            "{timestamp} {level_color}{level:5}{reset} {context}{target}: {message}",
            level = record.level(),
            target = record.target(),
        );

        if let Some(module_path) = record.module_path() {
            if module_path != record.target() {
                output.push_str(&format!(" [{}]", module_path));
            }
        }

        // A logger has nowhere to report its own write failures
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", output);
        let _ = stdout.flush();
    }

    fn flush(&self) {
        let _ = io::stdout().flush();
    }
}

static LOGGER: OnceLock<NavLogger> = OnceLock::new();

/// Parses a log level name, falling back to info
pub fn parse_level(name: &str) -> LevelFilter {
    match name.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "error" => LevelFilter::Error,
        "warn" => LevelFilter::Warn,
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "trace" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    }
}

/// Installs the logger with an optional comma-separated topic filter
pub fn init_logger(level: LevelFilter, debug_filter: Option<String>) -> Result<(), SetLoggerError> {
    let debug_filters = debug_filter.map(|filter_str| {
        filter_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<HashSet<String>>()
    });

    let logger = LOGGER.get_or_init(|| NavLogger {
        level,
        debug_filters,
    });
    log::set_logger(logger).map(|()| log::set_max_level(level))
}

#[macro_export]
macro_rules! debug_geometry {
    ($agent:expr => $($arg:tt)+) => {
        log::debug!(target: "geometry", "[{}] {}", $agent, format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        log::debug!(target: "geometry", $($arg)+)
    };
}

#[macro_export]
macro_rules! debug_walls {
    ($agent:expr => $($arg:tt)+) => {
        log::debug!(target: "walls", "[{}] {}", $agent, format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        log::debug!(target: "walls", $($arg)+)
    };
}

#[macro_export]
macro_rules! debug_avoid {
    ($agent:expr => $($arg:tt)+) => {
        log::debug!(target: "avoid", "[{}] {}", $agent, format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        log::debug!(target: "avoid", $($arg)+)
    };
}

#[macro_export]
macro_rules! debug_tracker {
    ($agent:expr => $($arg:tt)+) => {
        log::debug!(target: "tracker", "[{}] {}", $agent, format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        log::debug!(target: "tracker", $($arg)+)
    };
}

#[macro_export]
macro_rules! debug_target {
    ($agent:expr => $($arg:tt)+) => {
        log::debug!(target: "target", "[{}] {}", $agent, format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        log::debug!(target: "target", $($arg)+)
    };
}

#[macro_export]
macro_rules! debug_stats {
    ($agent:expr => $($arg:tt)+) => {
        log::debug!(target: "stats", "[{}] {}", $agent, format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        log::debug!(target: "stats", $($arg)+)
    };
}

#[macro_export]
macro_rules! debug_agent {
    ($agent:expr => $($arg:tt)+) => {
        log::debug!(target: "agent", "[{}] {}", $agent, format_args!($($arg)+))
    };
    ($($arg:tt)+) => {
        log::debug!(target: "agent", $($arg)+)
    };
}
