// ── Server scalars ──
//
// PHP drivers emit numbers and flags as JSON numbers, strings or
// booleans depending on the column type. A `Scalar` keeps the value
// exactly as sent: it displays, searches and serializes back verbatim,
// and only interprets itself when a validator or sorter asks.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Number, Value};

use super::record::FieldValue;

/// A numeric or boolean column value in its wire form.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Number(Number),
    Text(String),
    Bool(bool),
}

impl Scalar {
    /// Numeric reading: JSON numbers as-is, text strictly parsed after
    /// trimming. `None` for booleans and text that is not a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Bool(_) => None,
        }
    }

    /// Whether the value is blank text, which counts as "not given".
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Number(n) => n.serialize(serializer),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Number(n) => Ok(Self::Number(n)),
            Value::String(s) => Ok(Self::Text(s)),
            Value::Bool(b) => Ok(Self::Bool(b)),
            other => Err(D::Error::custom(format!(
                "expected a number, string or boolean, got {other}"
            ))),
        }
    }
}

impl From<&Scalar> for FieldValue {
    fn from(scalar: &Scalar) -> Self {
        match scalar {
            Scalar::Number(n) => n.as_f64().map_or_else(|| Self::Text(n.to_string()), Self::Number),
            Scalar::Text(s) => Self::Text(s.clone()),
            Scalar::Bool(b) => Self::Bool(*b),
        }
    }
}

impl From<Scalar> for FieldValue {
    fn from(scalar: Scalar) -> Self {
        Self::from(&scalar)
    }
}
