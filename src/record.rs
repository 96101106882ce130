use std::fmt;
use std::str::FromStr;

use crate::error::LoggerError;
use crate::fields::Fields;

/// Severity of a log call, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
    /// Terminates the process once the line is written.
    Fatal,
}

impl Level {
    pub const ALL: [Level; 5] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "fatal" => Ok(Level::Fatal),
            _ => Err(LoggerError::UnknownLevel(s.to_string())),
        }
    }
}

/// A single log call after field enrichment.
///
/// Records are built on the caller's thread, handed to the active backend
/// and dropped; nothing keeps them around.
#[derive(Debug, Clone)]
pub struct LogRecord<'a> {
    pub level: Level,
    pub message: &'a str,
    pub fields: Fields,
}

impl<'a> LogRecord<'a> {
    pub fn new(level: Level, message: &'a str, fields: Fields) -> Self {
        LogRecord {
            level,
            message,
            fields,
        }
    }

    /// Merged fields as one JSON object, the form both backends attach.
    pub fn fields_json(&self) -> String {
        serde_json::to_string(&self.fields).unwrap_or_else(|_| "{}".to_string())
    }
}
