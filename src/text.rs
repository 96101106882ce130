//! Human-readable backend, the default variant.
//!
//! Lines come from `tracing_subscriber`'s `fmt` layer. The merged fields
//! follow the message as a single JSON object:
//!
//! ```text
//! 2024-05-01T12:00:00.123456Z  INFO user logged in fields={"userId":"12345"}
//! ```

use std::io::Write;

use tracing::Dispatch;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Registry;

use crate::context::LogContext;
use crate::error::LoggerError;
use crate::fields::Fields;
use crate::logger::{emit_event, stdout, Core, Emit, Logger, SharedWriter};
use crate::record::{Level, LogRecord};

/// Text backend, by default writing to stdout.
pub struct TextLogger {
    core: Core<TextEmitter>,
}

impl TextLogger {
    /// Create a logger writing to process stdout.
    ///
    /// Fails if the context carries malformed common fields.
    pub fn new(ctx: Option<&LogContext>) -> Result<Self, LoggerError> {
        Self::with_writer(ctx, stdout())
    }

    pub fn with_writer(
        ctx: Option<&LogContext>,
        out: Box<dyn Write + Send>,
    ) -> Result<Self, LoggerError> {
        Ok(TextLogger {
            core: Core::new(ctx, TextEmitter, out)?,
        })
    }
}

impl Logger for TextLogger {
    fn debug(&self, msg: &str, fields: Fields) {
        self.core.log(Level::Debug, msg, fields);
    }

    fn info(&self, msg: &str, fields: Fields) {
        self.core.log(Level::Info, msg, fields);
    }

    fn warn(&self, msg: &str, fields: Fields) {
        self.core.log(Level::Warn, msg, fields);
    }

    fn error(&self, msg: &str, fields: Fields) {
        self.core.log(Level::Error, msg, fields);
    }

    fn fatal(&self, msg: &str, fields: Fields) -> ! {
        self.core.fatal(msg, fields)
    }
}

pub(crate) struct TextEmitter;

impl Emit for TextEmitter {
    fn dispatch(&self, out: SharedWriter) -> Dispatch {
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(out)
            .with_ansi(false)
            .with_target(false)
            .with_timer(ChronoUtc::rfc_3339());
        Dispatch::new(Registry::default().with(layer))
    }

    fn emit(&self, record: &LogRecord<'_>) {
        let fields = record.fields_json();
        emit_event!(record.level, fields = %fields, "{}", record.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::LogContext;
    use crate::fields;
    use crate::logger::test_support::Captured;
    use serde_json::json;

    fn logger(common: Option<Fields>) -> (TextLogger, Captured) {
        let captured = Captured::default();
        let ctx = common.map(|c| LogContext::background().with_common_fields(c));
        let log = TextLogger::with_writer(ctx.as_ref(), captured.boxed()).unwrap();
        (log, captured)
    }

    fn attached(line: &str) -> Fields {
        let (_, json) = line.rsplit_once(" fields=").unwrap();
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn message_then_merged_fields() {
        let (log, out) = logger(Some(fields! { "a" => 99, "b" => 2 }));
        log.info("hello world", fields! { "a" => 1 });

        let lines = out.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains(" INFO hello world fields="), "{}", lines[0]);
        assert_eq!(attached(&lines[0]), fields! { "a" => 1, "b" => 2 });
    }

    #[test]
    fn each_level_maps_to_its_severity() {
        let (log, out) = logger(None);
        log.debug("d", Fields::new());
        log.info("i", Fields::new());
        log.warn("w", Fields::new());
        log.error("e", Fields::new());

        let lines = out.lines();
        assert_eq!(lines.len(), 4);
        for (line, level) in lines.iter().zip(["DEBUG", "INFO", "WARN", "ERROR"]) {
            assert!(line.contains(level), "{line}");
        }
    }

    #[test]
    fn awkward_keys_and_values_stay_parseable() {
        let (log, out) = logger(None);
        let fields = fields! {
            "user id" => "x",
            "a=b" => "c",
            "esc" => "\u{1b}[31m",
            "obj" => { "k": [1, 2] },
        };
        log.info("m", fields.clone());

        let line = &out.lines()[0];
        assert!(!line.contains('\u{1b}'), "{line}");
        assert_eq!(attached(line), fields);
        assert_eq!(attached(line)["obj"], json!({ "k": [1, 2] }));
    }
}
