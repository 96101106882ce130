/// Error type returned by logger construction and field merging.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum LoggerError {
    /// The context holds a value under the common fields key, but it is not
    /// a [`Fields`](crate::fields::Fields) map.
    #[error("context value under `{key}` is not a field map (found {found})")]
    CommonFieldsShape { key: &'static str, found: &'static str },

    #[error("unknown log level: {0}")]
    UnknownLevel(String),
}
