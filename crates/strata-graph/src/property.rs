//! Property values carried by nodes and edges.

use std::fmt;
use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};
use indexmap::IndexMap;
use serde::Serialize;

/// Ordered property bag keyed by field name.
pub type Properties = IndexMap<String, PropertyValue>;

/// A single property value.
///
/// `Record` holds the primitive sub-fields of a flattened composite and `Map`
/// holds the primitive entries of a map. Neither ever nests further.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Record(IndexMap<String, PropertyValue>),
    Map(IndexMap<String, PropertyValue>),
}

impl PropertyValue {
    /// Store a timestamp in its fixed textual form.
    pub fn timestamp(time: SystemTime) -> Self {
        Self::String(format_timestamp(time))
    }

    /// Flatten a composite one level.
    ///
    /// Only scalar sub-fields survive; anything nested deeper is dropped.
    /// Returns `None` when nothing survives.
    pub fn record<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Option<Self>
    where
        K: Into<String>,
        V: Into<PropertyValue>,
    {
        let fields = scalars_only(fields.into_iter().map(|(k, v)| (k.into(), v.into())));
        (!fields.is_empty()).then_some(Self::Record(fields))
    }

    /// Copy a map entry by entry, dropping entries whose value is not a scalar.
    ///
    /// Returns `None` when no entry survives.
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Option<Self>
    where
        K: fmt::Display,
        V: Into<PropertyValue>,
    {
        let entries = scalars_only(entries.into_iter().map(|(k, v)| (k.to_string(), v.into())));
        (!entries.is_empty()).then_some(Self::Map(entries))
    }

    /// Check if this value is a primitive.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Self::Record(_) | Self::Map(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt(n) => Some(*n),
            Self::Int(n) => u64::try_from(*n).ok(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::UInt(n) => i64::try_from(*n).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Nested entries of a `Record` or `Map`.
    pub fn as_object(&self) -> Option<&IndexMap<String, PropertyValue>> {
        match self {
            Self::Record(m) | Self::Map(m) => Some(m),
            _ => None,
        }
    }
}

fn scalars_only(
    entries: impl Iterator<Item = (String, PropertyValue)>,
) -> IndexMap<String, PropertyValue> {
    entries.filter(|(_, v)| v.is_scalar()).collect()
}

/// Format a timestamp as RFC 3339 in UTC with second precision.
pub fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::UInt(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => f.write_str(s),
            Self::Record(m) | Self::Map(m) => {
                f.write_str("{")?;
                for (i, (k, v)) in m.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for PropertyValue {
    fn from(value: u32) -> Self {
        Self::UInt(u64::from(value))
    }
}

impl From<u64> for PropertyValue {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<usize> for PropertyValue {
    fn from(value: usize) -> Self {
        Self::UInt(value as u64)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<SystemTime> for PropertyValue {
    fn from(value: SystemTime) -> Self {
        Self::timestamp(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_timestamp_format() {
        let t = UNIX_EPOCH + Duration::from_secs(86_400);
        assert_eq!(
            PropertyValue::timestamp(t),
            PropertyValue::String("1970-01-02T00:00:00Z".to_string())
        );
    }

    #[test]
    fn test_record_drops_nested_values() {
        let inner = PropertyValue::record([("x", 1u64)]).unwrap();
        let record = PropertyValue::record([
            ("StartLine", PropertyValue::from(3u32)),
            ("Inner", inner),
        ])
        .unwrap();

        let fields = record.as_object().unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["StartLine"].as_u64(), Some(3));
    }

    #[test]
    fn test_empty_record_and_map_are_absent() {
        let nested = PropertyValue::map([("a", 1u64)]).unwrap();
        assert!(PropertyValue::record([("only", nested)]).is_none());
        assert!(PropertyValue::map(Vec::<(String, String)>::new()).is_none());
    }

    #[test]
    fn test_map_stringifies_keys() {
        let map = PropertyValue::map([(1, "one"), (2, "two")]).unwrap();
        let entries = map.as_object().unwrap();
        assert_eq!(entries["1"].as_str(), Some("one"));
        assert_eq!(map.to_string(), "{1: one, 2: two}");
    }

    #[test]
    fn test_serializes_as_plain_json() {
        let record = PropertyValue::record([("A", PropertyValue::from(true))]).unwrap();
        assert_eq!(serde_json::to_string(&record).unwrap(), r#"{"A":true}"#);
        assert_eq!(serde_json::to_string(&PropertyValue::from(7u64)).unwrap(), "7");
    }
}
