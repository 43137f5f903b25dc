/// Request decoding helpers shared across services and handlers
use serde::{Deserialize, Deserializer};

/// Distinguishes an explicit `null` from an absent field.
///
/// Use with `#[serde(default, deserialize_with = "deserialize_some")]` on an
/// `Option<Option<T>>`: absent is `None`, `null` is `Some(None)` and a value is
/// `Some(Some(v))`.
pub fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Required text counts as missing when absent or empty.
pub fn required_text(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
