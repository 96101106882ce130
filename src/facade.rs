use std::fmt;
use std::io::Write;

use crate::backend::{make_logger, BackendKind};
use crate::context::LogContext;
use crate::error::LoggerError;
use crate::fields::Fields;
use crate::logger::{stdout, Logger};

/// Single entry point for application code.
///
/// The backend is picked once from a selector string and cannot change
/// afterwards. Every call is forwarded unchanged to that backend, which
/// merges the context's common fields and writes one line to stdout.
/// The context itself is not retained; only its common fields are.
///
/// ```no_run
/// use multilog::{fields, Facade, LogContext, Logger};
///
/// let ctx = LogContext::background().with_common_fields(fields! { "userId" => "12345" });
/// let log = Facade::new("json", Some(&ctx)).expect("common fields are a field map");
/// log.info("user logged in", fields! { "attempt" => 1 });
/// ```
pub struct Facade {
    kind: BackendKind,
    logger: Box<dyn Logger>,
}

impl Facade {
    /// Build a facade writing to process stdout.
    ///
    /// An unrecognized `selector` selects the text backend.
    ///
    /// **Returns**
    /// - `Err(LoggerError::CommonFieldsShape)` if `ctx` holds something other
    ///   than a field map under the common fields key.
    pub fn new(selector: &str, ctx: Option<&LogContext>) -> Result<Self, LoggerError> {
        Self::with_writer(selector, ctx, stdout())
    }

    /// Like [`Facade::new`], writing to `out` instead of stdout.
    pub fn with_writer(
        selector: &str,
        ctx: Option<&LogContext>,
        out: Box<dyn Write + Send>,
    ) -> Result<Self, LoggerError> {
        let kind = BackendKind::from_selector(selector);
        let logger = make_logger(kind, ctx, out)?;
        Ok(Facade { kind, logger })
    }

    /// Backend chosen at construction.
    pub fn backend(&self) -> BackendKind {
        self.kind
    }
}

impl Logger for Facade {
    fn debug(&self, msg: &str, fields: Fields) {
        self.logger.debug(msg, fields);
    }

    fn info(&self, msg: &str, fields: Fields) {
        self.logger.info(msg, fields);
    }

    fn warn(&self, msg: &str, fields: Fields) {
        self.logger.warn(msg, fields);
    }

    fn error(&self, msg: &str, fields: Fields) {
        self.logger.error(msg, fields);
    }

    fn fatal(&self, msg: &str, fields: Fields) -> ! {
        self.logger.fatal(msg, fields)
    }
}

impl fmt::Debug for Facade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Facade").field("backend", &self.kind).finish_non_exhaustive()
    }
}
