use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::LoggerError;
use crate::fields::Fields;

/// Well-known context key under which the common fields map is stored.
pub const COMMON_FIELDS_KEY: &str = "commonFields";

type Value = Arc<dyn Any + Send + Sync>;

/// Immutable carrier of keyed values for a request or process scope.
///
/// Deriving a context with [`LogContext::with_value`] never touches the
/// parent, so a context can be shared freely between loggers and threads.
/// Values are stored behind `Arc` and handed out by reference.
#[derive(Clone, Default)]
pub struct LogContext {
    values: Arc<HashMap<String, Entry>>,
}

#[derive(Clone)]
struct Entry {
    value: Value,
    type_name: &'static str,
}

impl LogContext {
    /// Empty root context.
    pub fn background() -> Self {
        Self::default()
    }

    /// Return a derived context that additionally maps `key` to `value`.
    pub fn with_value<T>(&self, key: impl Into<String>, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        let mut values = HashMap::clone(&self.values);
        values.insert(
            key.into(),
            Entry {
                value: Arc::new(value),
                type_name: type_name::<T>(),
            },
        );
        LogContext { values: Arc::new(values) }
    }

    /// Return a derived context carrying `fields` as its common fields.
    pub fn with_common_fields(&self, fields: Fields) -> Self {
        self.with_value(COMMON_FIELDS_KEY, fields)
    }

    /// Typed lookup. `None` when the key is missing or holds another type.
    pub fn value<T: Any + Send + Sync>(&self, key: &str) -> Option<&T> {
        self.values.get(key).and_then(|e| e.value.downcast_ref::<T>())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Shared common fields of this context.
    ///
    /// **Returns**
    /// - `Ok(None)` when no common fields were attached.
    /// - `Ok(Some(..))` with a shared handle to the map.
    /// - `Err(LoggerError::CommonFieldsShape)` when something other than a
    ///   [`Fields`] map sits under [`COMMON_FIELDS_KEY`].
    pub fn common_fields(&self) -> Result<Option<Arc<Fields>>, LoggerError> {
        let Some(entry) = self.values.get(COMMON_FIELDS_KEY) else {
            return Ok(None);
        };

        Arc::clone(&entry.value)
            .downcast::<Fields>()
            .map(Some)
            .map_err(|_| LoggerError::CommonFieldsShape {
                key: COMMON_FIELDS_KEY,
                found: entry.type_name,
            })
    }
}

impl fmt::Debug for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<_> = self.values.iter().map(|(k, e)| (k.as_str(), e.type_name)).collect();
        keys.sort_unstable();
        f.debug_struct("LogContext").field("values", &keys).finish()
    }
}
