//! Severity-levelled console logging.
//!
//! A [`Logger`] is built once at startup and handed to each component;
//! there is no process-global logging state. Messages go to stderr with a
//! colored severity tag.

use console::{style, StyledObject};

/// Message severity, ordered least to most severe.
///
/// `Success` sits between `Info` and `Warning`: routine progress reports
/// stay at `Info`, milestone completions get the louder `Success` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Debug,
    Info,
    Success,
    Warning,
    Error,
}

impl Level {
    fn tag(self) -> StyledObject<&'static str> {
        match self {
            Level::Debug => style("[DEBUG]").for_stderr().magenta(),
            Level::Info => style("[INFO]").for_stderr().blue(),
            Level::Success => style("[SUCCESS]").for_stderr().green(),
            Level::Warning => style("[WARNING]").for_stderr().yellow(),
            Level::Error => style("[ERROR]").for_stderr().red(),
        }
    }
}

/// Console logger with a minimum-severity gate.
#[derive(Debug, Clone)]
pub struct Logger {
    min_level: Level,
}

impl Logger {
    pub fn new(min_level: Level) -> Self {
        Self { min_level }
    }

    /// Whether a message at `level` would be emitted.
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    pub fn log(&self, level: Level, message: impl AsRef<str>) {
        if self.enabled(level) {
            eprintln!("{} {}", level.tag(), message.as_ref());
        }
    }

    pub fn debug(&self, message: impl AsRef<str>) {
        self.log(Level::Debug, message);
    }

    pub fn info(&self, message: impl AsRef<str>) {
        self.log(Level::Info, message);
    }

    pub fn success(&self, message: impl AsRef<str>) {
        self.log(Level::Success, message);
    }

    pub fn warning(&self, message: impl AsRef<str>) {
        self.log(Level::Warning, message);
    }

    pub fn error(&self, message: impl AsRef<str>) {
        self.log(Level::Error, message);
    }
}
