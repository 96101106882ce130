use std::io::Write;

use crate::context::LogContext;
use crate::error::LoggerError;
use crate::json::JsonLogger;
use crate::logger::Logger;
use crate::text::TextLogger;

/// Supported backend kinds that can be selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackendKind {
    /// `key=value` text lines. Used for any selector that is not recognized.
    #[default]
    Text,
    /// One JSON object per line with fields under `"args"`.
    Json,
}

impl BackendKind {
    /// Resolve a selector string to a backend.
    ///
    /// Accepted names (ASCII case-insensitive, surrounding whitespace ignored):
    /// - `"text"`, `"logrus"` for [`BackendKind::Text`]
    /// - `"json"`, `"zap"` for [`BackendKind::Json`]
    ///
    /// Anything else falls back to [`BackendKind::Text`]; this never fails.
    pub fn from_selector(selector: &str) -> Self {
        match Self::parse(selector) {
            Some(kind) => kind,
            None => {
                tracing::debug!(
                    selector,
                    fallback = ?BackendKind::default(),
                    "unrecognized backend selector"
                );
                BackendKind::default()
            }
        }
    }

    /// Strict lookup, `None` for unknown names.
    pub fn parse(selector: &str) -> Option<Self> {
        match selector.trim().to_ascii_lowercase().as_str() {
            "text" | "logrus" => Some(BackendKind::Text),
            "json" | "zap" => Some(BackendKind::Json),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Text => "text",
            BackendKind::Json => "json",
        }
    }
}

/// Create the concrete [`Logger`] for `kind`.
///
/// This is the single place that maps a backend kind to an implementation;
/// the [`Facade`](crate::facade::Facade) goes through it.
pub fn make_logger(
    kind: BackendKind,
    ctx: Option<&LogContext>,
    out: Box<dyn Write + Send>,
) -> Result<Box<dyn Logger>, LoggerError> {
    let logger: Box<dyn Logger> = match kind {
        BackendKind::Text => Box::new(TextLogger::with_writer(ctx, out)?),
        BackendKind::Json => Box::new(JsonLogger::with_writer(ctx, out)?),
    };
    tracing::trace!(backend = kind.as_str(), "logger constructed");
    Ok(logger)
}
