// ── Resource contract ──
//
// A resource is a typed record bound to one `{name}.php` endpoint. It
// knows its own validation rules and how its draft goes on the wire;
// everything else (fetching, lifecycle, table view) is generic.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use painel_api::RequestBody;

use super::record::{RecordId, Tabular};
use crate::error::CoreError;

/// A draft that failed validation. Only the first failing rule is reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// A typed record served by one endpoint.
///
/// The same type doubles as the form draft: a blank draft is
/// `Self::default()`, an edit draft is [`edit_draft`](Self::edit_draft).
pub trait Resource:
    Tabular + Serialize + DeserializeOwned + Default + Clone + std::fmt::Debug + Send + Sync + 'static
{
    /// Endpoint relative to the API base, e.g. `"clientes.php"`.
    const ENDPOINT: &'static str;

    /// Human-readable singular name, e.g. `"Client"`.
    const LABEL: &'static str;

    /// Whether requests must carry the tenant header.
    const TENANT_SCOPED: bool;

    /// Column names, in display order.
    const COLUMNS: &'static [&'static str];

    /// Fields that can be written but are never listed or searched.
    const WRITE_ONLY: &'static [&'static str] = &[];

    fn id(&self) -> Option<&RecordId>;

    /// Run the resource's rules in order, stopping at the first failure.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Working copy for an edit form. Secrets are cleared.
    fn edit_draft(&self) -> Self {
        self.clone()
    }

    /// Body to send for create/update.
    fn request_body(&self) -> Result<RequestBody, CoreError> {
        let value = serde_json::to_value(self).map_err(|e| CoreError::Parse {
            message: format!("cannot encode {}: {e}", Self::LABEL),
        })?;
        Ok(RequestBody::Json(value))
    }

    fn is_new(&self) -> bool {
        self.id().is_none()
    }
}

/// Overwrite draft fields from `name=value` text pairs.
///
/// Values go through the resource's own deserializer, so numeric and
/// boolean columns accept the same textual forms the server sends.
/// Fields the resource does not serialize (attachments) come back reset.
pub fn apply_fields<R: Resource>(draft: &R, fields: &[(String, String)]) -> Result<R, CoreError> {
    let mut value = serde_json::to_value(draft).map_err(|e| CoreError::Parse {
        message: e.to_string(),
    })?;
    let Value::Object(ref mut map) = value else {
        return Err(CoreError::Parse {
            message: format!("{} does not encode as an object", R::LABEL),
        });
    };

    for (name, raw) in fields {
        let Some(&column) = R::COLUMNS
            .iter()
            .chain(R::WRITE_ONLY.iter())
            .find(|c| **c == name.as_str())
        else {
            return Err(ValidationError::new("field", format!("Unknown field '{name}'")).into());
        };
        let parsed = if raw.is_empty() {
            Value::Null
        } else {
            Value::String(raw.clone())
        };
        map.insert(column.to_owned(), parsed);
    }

    serde_json::from_value(value).map_err(|e| {
        CoreError::Validation(ValidationError::new("field", format!("Invalid value: {e}")))
    })
}

// ── Rules ───────────────────────────────────────────────────────────

/// Small validation rules shared by the resource models.
pub mod rules {
    use super::ValidationError;
    use crate::model::scalar::Scalar;

    pub fn required(
        field: &'static str,
        label: &str,
        value: Option<&str>,
    ) -> Result<(), ValidationError> {
        match value {
            Some(v) if !v.trim().is_empty() => Ok(()),
            _ => Err(ValidationError::new(field, format!("{label} is required"))),
        }
    }

    pub fn present<T>(
        field: &'static str,
        label: &str,
        value: Option<&T>,
    ) -> Result<(), ValidationError> {
        value
            .map(|_| ())
            .ok_or_else(|| ValidationError::new(field, format!("{label} is required")))
    }

    /// Checked only when a value is given.
    pub fn email(field: &'static str, value: Option<&str>) -> Result<(), ValidationError> {
        let Some(v) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            return Ok(());
        };
        let valid = v.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !v.contains(char::is_whitespace)
        });
        if valid {
            Ok(())
        } else {
            Err(ValidationError::new(field, "Invalid e-mail address"))
        }
    }

    pub fn min_len(
        field: &'static str,
        label: &str,
        value: Option<&str>,
        min: usize,
    ) -> Result<(), ValidationError> {
        match value {
            Some(v) if v.chars().count() < min => Err(ValidationError::new(
                field,
                format!("{label} must have at least {min} characters"),
            )),
            _ => Ok(()),
        }
    }

    /// Checked only when a value is given: it must read as a number
    /// and not be below zero.
    pub fn non_negative(
        field: &'static str,
        label: &str,
        value: Option<&Scalar>,
    ) -> Result<(), ValidationError> {
        let Some(value) = value.filter(|v| !v.is_blank()) else {
            return Ok(());
        };
        match value.as_f64() {
            None => Err(ValidationError::new(
                field,
                format!("{label} must be a number, got '{value}'"),
            )),
            Some(v) if v < 0.0 => Err(ValidationError::new(
                field,
                format!("{label} cannot be negative"),
            )),
            Some(_) => Ok(()),
        }
    }

    /// Checked only when a value is given: exactly `len` digits once
    /// punctuation is stripped.
    pub fn digits(
        field: &'static str,
        label: &str,
        value: Option<&str>,
        len: usize,
    ) -> Result<(), ValidationError> {
        let Some(v) = value.filter(|v| !v.trim().is_empty()) else {
            return Ok(());
        };
        let digits = v.chars().filter(char::is_ascii_digit).count();
        let junk = v
            .chars()
            .any(|c| !c.is_ascii_digit() && !matches!(c, '.' | '/' | '-' | ' '));
        if digits == len && !junk {
            Ok(())
        } else {
            Err(ValidationError::new(
                field,
                format!("{label} must have {len} digits"),
            ))
        }
    }

}
