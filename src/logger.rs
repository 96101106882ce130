use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::Dispatch;
use tracing_subscriber::fmt::MakeWriter;

use crate::context::LogContext;
use crate::error::LoggerError;
use crate::fields::{extend_missing, Fields};
use crate::record::{Level, LogRecord};

/// Target attached to every event a backend emits.
pub(crate) const TARGET: &str = "multilog";

/// Leveled, structured logging capability shared by every backend and by
/// the [`Facade`](crate::facade::Facade).
///
/// Each call writes one line synchronously before returning. Callers hand
/// over ownership of `fields`; the implementation enriches it with the
/// context's common fields before writing.
pub trait Logger: Send + Sync {
    fn debug(&self, msg: &str, fields: Fields);

    fn info(&self, msg: &str, fields: Fields);

    fn warn(&self, msg: &str, fields: Fields);

    fn error(&self, msg: &str, fields: Fields);

    /// Write the line, flush, and terminate the process with exit status 1.
    ///
    /// There is no way to suppress the exit. Use [`Logger::error`] when the
    /// caller must keep running.
    fn fatal(&self, msg: &str, fields: Fields) -> !;
}

/// How a backend turns a [`LogRecord`] into output.
pub(crate) trait Emit: Send + Sync {
    /// Subscriber owned by one logger, writing formatted events to `out`.
    fn dispatch(&self, out: SharedWriter) -> Dispatch;

    /// Record one event. Runs with this backend's dispatcher as the default.
    fn emit(&self, record: &LogRecord<'_>);
}

/// Emit a `tracing` event at the severity of a [`Level`].
///
/// `tracing` has no fatal level: fatal records go out as `ERROR` with a
/// `fatal = true` marker.
macro_rules! emit_event {
    ($level:expr, $($rest:tt)+) => {
        match $level {
            $crate::record::Level::Debug => ::tracing::event!(
                target: $crate::logger::TARGET,
                ::tracing::Level::DEBUG,
                $($rest)+
            ),
            $crate::record::Level::Info => ::tracing::event!(
                target: $crate::logger::TARGET,
                ::tracing::Level::INFO,
                $($rest)+
            ),
            $crate::record::Level::Warn => ::tracing::event!(
                target: $crate::logger::TARGET,
                ::tracing::Level::WARN,
                $($rest)+
            ),
            $crate::record::Level::Error => ::tracing::event!(
                target: $crate::logger::TARGET,
                ::tracing::Level::ERROR,
                $($rest)+
            ),
            $crate::record::Level::Fatal => ::tracing::event!(
                target: $crate::logger::TARGET,
                ::tracing::Level::ERROR,
                fatal = true,
                $($rest)+
            ),
        }
    };
}
pub(crate) use emit_event;

/// Shared machinery behind both backends: the validated common fields and
/// the logger's private dispatcher.
pub(crate) struct Core<E> {
    common: Option<Arc<Fields>>,
    emitter: E,
    dispatch: Dispatch,
}

impl<E: Emit> Core<E> {
    pub(crate) fn new(
        ctx: Option<&LogContext>,
        emitter: E,
        out: Box<dyn Write + Send>,
    ) -> Result<Self, LoggerError> {
        // Shape is checked once here so the hot path can't fail.
        let common = match ctx {
            Some(ctx) => ctx.common_fields()?,
            None => None,
        };
        let dispatch = emitter.dispatch(SharedWriter::new(out));
        Ok(Core {
            common,
            emitter,
            dispatch,
        })
    }

    pub(crate) fn log(&self, level: Level, msg: &str, mut fields: Fields) {
        if let Some(common) = &self.common {
            extend_missing(&mut fields, common);
        }
        let record = LogRecord::new(level, msg, fields);
        tracing::dispatcher::with_default(&self.dispatch, || self.emitter.emit(&record));
    }

    pub(crate) fn fatal(&self, msg: &str, fields: Fields) -> ! {
        self.log(Level::Fatal, msg, fields);
        std::process::exit(1)
    }
}

/// Output stream shared by the formatting layer of one logger.
///
/// A writer that panicked mid-write leaves the lock poisoned; later events
/// still get the writer.
#[derive(Clone)]
pub(crate) struct SharedWriter(Arc<Mutex<Box<dyn Write + Send>>>);

impl SharedWriter {
    pub(crate) fn new(out: Box<dyn Write + Send>) -> Self {
        SharedWriter(Arc::new(Mutex::new(out)))
    }
}

impl<'a> MakeWriter<'a> for SharedWriter {
    type Writer = SharedWriterGuard<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SharedWriterGuard(self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Exclusive access to the stream for one event. Flushes on drop so a
/// line is out before `fatal` exits.
pub(crate) struct SharedWriterGuard<'a>(MutexGuard<'a, Box<dyn Write + Send>>);

impl Write for SharedWriterGuard<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

impl Drop for SharedWriterGuard<'_> {
    fn drop(&mut self) {
        let _ = self.0.flush();
    }
}

pub(crate) fn stdout() -> Box<dyn Write + Send> {
    Box::new(io::stdout())
}


#[cfg(test)]
mod tests {
    use super::test_support::Captured;
    use super::*;

    #[test]
    fn writer_survives_a_poisoned_lock() {
        let captured = Captured::default();
        let writer = SharedWriter::new(captured.boxed());

        let poisoner = writer.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.make_writer();
            panic!("poison the writer lock");
        })
        .join();

        writer.make_writer().write_all(b"still here\n").unwrap();
        assert_eq!(captured.lines(), ["still here"]);
    }
}
