//! Logging facade with interchangeable backends.
//!
//! A [`Facade`] is built from a backend selector (`"text"` or `"json"`) and
//! an optional [`LogContext`]. Common fields stored in the context under
//! [`COMMON_FIELDS_KEY`] are merged into every line; fields passed to the
//! call win on key collisions.
//!
//! `fatal` terminates the process after writing its line.

pub mod backend;
pub mod context;
pub mod error;
pub mod facade;
pub mod fields;
pub mod init;
pub mod json;
pub mod logger;
pub mod record;
pub mod text;

pub use backend::BackendKind;
pub use context::{LogContext, COMMON_FIELDS_KEY};
pub use error::LoggerError;
pub use facade::Facade;
pub use fields::{merge_common_fields, Fields};
pub use logger::Logger;
pub use record::Level;

#[doc(hidden)]
pub mod __private {
    pub use serde_json;
}
