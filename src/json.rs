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

/// JSON backend: one object per line from `tracing_subscriber`'s JSON
/// formatter, with the merged fields serialized into a single `"args"`
/// attribute.
///
/// ```text
/// {"timestamp":"2024-05-01T12:00:00.1Z","level":"INFO","message":"hi","args":"{\"a\":1}"}
/// ```
pub struct JsonLogger {
    core: Core<JsonEmitter>,
}

impl JsonLogger {
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
        Ok(JsonLogger {
            core: Core::new(ctx, JsonEmitter, out)?,
        })
    }
}

impl Logger for JsonLogger {
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

pub(crate) struct JsonEmitter;

impl Emit for JsonEmitter {
    fn dispatch(&self, out: SharedWriter) -> Dispatch {
        let layer = tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_current_span(false)
            .with_span_list(false)
            .with_writer(out)
            .with_ansi(false)
            .with_target(false)
            .with_timer(ChronoUtc::rfc_3339());
        Dispatch::new(Registry::default().with(layer))
    }

    fn emit(&self, record: &LogRecord<'_>) {
        let args = record.fields_json();
        emit_event!(record.level, args = %args, "{}", record.message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::LogContext;
    use crate::fields;
    use crate::logger::test_support::Captured;
    use serde_json::Value;

    fn logger(common: Option<Fields>) -> (JsonLogger, Captured) {
        let captured = Captured::default();
        let ctx = common.map(|c| LogContext::background().with_common_fields(c));
        let log = JsonLogger::with_writer(ctx.as_ref(), captured.boxed()).unwrap();
        (log, captured)
    }

    fn parse(line: &str) -> (Value, Fields) {
        let v: Value = serde_json::from_str(line).unwrap();
        let args = serde_json::from_str(v["args"].as_str().unwrap()).unwrap();
        (v, args)
    }

    #[test]
    fn attaches_merged_fields_as_args() {
        let (log, out) = logger(Some(fields! { "a" => 99, "b" => 2 }));
        log.error("boom", fields! { "a" => 1, "code" => 500 });

        let lines = out.lines();
        assert_eq!(lines.len(), 1);
        let (v, args) = parse(&lines[0]);
        assert_eq!(v["level"], "ERROR");
        assert_eq!(v["message"], "boom");
        assert_eq!(args, fields! { "a" => 1, "b" => 2, "code" => 500 });
    }

    #[test]
    fn empty_fields_render_as_empty_object() {
        let (log, out) = logger(Some(Fields::new()));
        log.warn("", Fields::new());

        let (v, args) = parse(&out.lines()[0]);
        assert_eq!(v["level"], "WARN");
        assert!(args.is_empty());
    }

    #[test]
    fn multiline_input_stays_on_one_line() {
        let (log, out) = logger(None);
        log.info("multi\nline", fields! { "k" => "a\nb" });

        let lines = out.lines();
        assert_eq!(lines.len(), 1);
        let (v, args) = parse(&lines[0]);
        assert_eq!(v["message"], "multi\nline");
        assert_eq!(args["k"], "a\nb");
    }
}
