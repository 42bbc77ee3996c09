//! Panel users (`usuarios.php`), scoped to the tenant.
//!
//! Users are the one resource with a binary attachment: a profile photo.
//! When a photo is attached the draft is sent as multipart.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use painel_api::{FormPayload, RequestBody};

use super::record::RecordId;
use super::scalar::Scalar;
use super::resource::{Resource, ValidationError, rules};
use crate::error::CoreError;

const MIN_PASSWORD_LEN: usize = 6;

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Read a file from disk, guessing its image type from the extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map_or_else(|| "upload".into(), |n| n.to_string_lossy().into_owned());
        let mime = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .and_then(|ext| match ext.as_str() {
                "png" => Some("image/png"),
                "jpg" | "jpeg" => Some("image/jpeg"),
                "gif" => Some("image/gif"),
                "webp" => Some("image/webp"),
                _ => None,
            })
            .map(String::from);
        Ok(Self {
            file_name,
            mime,
            bytes,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub perfil: Option<String>,
    #[serde(default)]
    pub ativo: Option<Scalar>,
    /// URL of the stored profile photo.
    #[serde(default)]
    pub foto: Option<String>,
    #[serde(default)]
    pub criado_em: Option<String>,
    /// Write-only. Never returned by the server; blank on edit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub senha: Option<String>,
    /// New photo to upload with this draft.
    #[serde(skip)]
    pub photo_upload: Option<Attachment>,
}

tabular_fields!(User {
    id,
    nome,
    email,
    perfil,
    ativo,
    foto,
    criado_em
});

impl Resource for User {
    const ENDPOINT: &'static str = "usuarios.php";
    const LABEL: &'static str = "User";
    const TENANT_SCOPED: bool = true;
    const COLUMNS: &'static [&'static str] = Self::FIELDS;
    const WRITE_ONLY: &'static [&'static str] = &["senha"];

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        rules::required("nome", "Name", self.nome.as_deref())?;
        rules::required("email", "E-mail", self.email.as_deref())?;
        rules::email("email", self.email.as_deref())?;
        if self.is_new() {
            rules::required("senha", "Password", self.senha.as_deref())?;
        }
        let password = self.senha.as_deref().filter(|s| !s.is_empty());
        rules::min_len("senha", "Password", password, MIN_PASSWORD_LEN)
    }

    fn edit_draft(&self) -> Self {
        Self {
            senha: None,
            photo_upload: None,
            ..self.clone()
        }
    }

    fn request_body(&self) -> Result<RequestBody, CoreError> {
        let value = serde_json::to_value(self).map_err(|e| CoreError::Parse {
            message: format!("cannot encode {}: {e}", Self::LABEL),
        })?;
        let Some(ref photo) = self.photo_upload else {
            return Ok(RequestBody::Json(value));
        };

        let mut form = FormPayload::new();
        if let Value::Object(map) = value {
            for (name, field) in map.into_iter().filter(|(name, _)| name != "foto") {
                match field {
                    Value::Null => {}
                    Value::String(s) => form = form.text(name, s),
                    other => form = form.text(name, other.to_string()),
                }
            }
        }
        Ok(RequestBody::Multipart(form.file(
            "foto",
            photo.file_name.clone(),
            photo.mime.clone(),
            photo.bytes.clone(),
        )))
    }
}
