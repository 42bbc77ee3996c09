// ── Record identity and field access ──
//
// RecordId and FieldValue are the only things the table engine knows
// about a row. Typed resources and DynamicRecord both expose their
// columns through the `Tabular` capability.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ── RecordId ────────────────────────────────────────────────────────

/// Canonical identifier for any panel record.
///
/// PHP endpoints emit ids as either JSON numbers or numeric strings;
/// a string in canonical integer form normalizes to [`RecordId::Number`]
/// so `"3"` and `3` compare equal. Anything else (`"007"`, `" 3"`) stays
/// text, so the id always displays exactly as the server sent it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl FromStr for RecordId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => Self::Number(n),
            _ => Self::Text(s),
        }
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self::from(s.to_owned())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => Self::Number(n),
            RawId::Text(s) => Self::from(s),
        })
    }
}

// ── FieldValue ──────────────────────────────────────────────────────

/// A scalar cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum FieldValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Text used for search matching. Null never matches anything.
    pub fn search_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&Value> for FieldValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => n.as_f64().map_or(Self::Null, Self::Number),
            Value::String(s) => Self::Text(s.clone()),
            nested @ (Value::Array(_) | Value::Object(_)) => Self::Text(nested.to_string()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&RecordId> for FieldValue {
    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    fn from(id: &RecordId) -> Self {
        match id {
            RecordId::Number(n) => Self::Number(*n as f64),
            RecordId::Text(s) => Self::Text(s.clone()),
        }
    }
}

impl From<RecordId> for FieldValue {
    fn from(id: RecordId) -> Self {
        Self::from(&id)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Self::Null, Into::into)
    }
}

// ── Tabular ─────────────────────────────────────────────────────────

/// The narrow view the table engine needs of a record.
pub trait Tabular {
    /// Stable identifier, `None` for records not yet persisted.
    fn record_id(&self) -> Option<RecordId>;

    /// Value of the named column, [`FieldValue::Null`] when absent.
    fn field(&self, key: &str) -> FieldValue;

    /// Every column value, in column order.
    fn values(&self) -> Vec<FieldValue>;
}

// ── DynamicRecord ───────────────────────────────────────────────────

/// A schemaless record: ordered field name → scalar map.
///
/// Used for endpoints without a typed model. Nested JSON values are kept
/// as their serialized text so they remain searchable.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DynamicRecord(IndexMap<String, FieldValue>);

impl DynamicRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

}

impl<'de> Deserialize<'de> for DynamicRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = serde_json::Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self(
            map.iter()
                .map(|(k, v)| (k.clone(), FieldValue::from(v)))
                .collect(),
        ))
    }
}

impl Tabular for DynamicRecord {
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    fn record_id(&self) -> Option<RecordId> {
        match self.0.get("id")? {
            FieldValue::Number(n) if n.fract() == 0.0 => Some(RecordId::Number(*n as i64)),
            FieldValue::Null => None,
            other => Some(RecordId::from(other.to_string())),
        }
    }

    fn field(&self, key: &str) -> FieldValue {
        self.0.get(key).cloned().unwrap_or_default()
    }

    fn values(&self) -> Vec<FieldValue> {
        self.0.values().cloned().collect()
    }
}
