use std::collections::BTreeMap;

use crate::context::LogContext;
use crate::error::LoggerError;

/// Structured attributes attached to a log line.
pub type Fields = BTreeMap<String, serde_json::Value>;

/// Build a [`Fields`] map from `key => value` pairs.
///
/// Values go through `serde_json::json!`. Each value must be a single token
/// tree, so wrap compound expressions in parentheses: `"n" => (-1)`.
///
/// ```
/// let fields = multilog::fields! { "code" => 500, "path" => "/health" };
/// assert_eq!(fields["code"], 500);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:tt),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $(
            fields.insert(
                ::std::string::ToString::to_string(&$key),
                $crate::__private::serde_json::json!($value),
            );
        )+
        fields
    }};
}

/// Merge the common fields carried by `ctx` into `fields`.
///
/// Keys already present in `fields` win. The context's map is only read.
/// A missing context or missing common fields leaves `fields` as is.
///
/// **Returns**
/// - `Err(LoggerError::CommonFieldsShape)` if the context holds something
///   other than a field map under the common fields key; `fields` is not
///   modified in that case.
pub fn merge_common_fields(
    fields: &mut Fields,
    ctx: Option<&LogContext>,
) -> Result<(), LoggerError> {
    let Some(ctx) = ctx else {
        return Ok(());
    };
    if let Some(common) = ctx.common_fields()? {
        extend_missing(fields, &common);
    }
    Ok(())
}

/// Copy every entry of `common` whose key is not yet in `fields`.
pub fn extend_missing(fields: &mut Fields, common: &Fields) {
    for (key, value) in common {
        if !fields.contains_key(key) {
            fields.insert(key.clone(), value.clone());
        }
    }
}
