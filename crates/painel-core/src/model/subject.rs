//! Service-call subjects (`assuntos.php`).

use serde::{Deserialize, Serialize};

use super::record::RecordId;
use super::scalar::Scalar;
use super::resource::{Resource, ValidationError, rules};

/// A category a service call is filed under, with its expected effort.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
    /// Expected handling time, in minutes.
    #[serde(default)]
    pub tempo_estimado: Option<Scalar>,
    #[serde(default)]
    pub ativo: Option<Scalar>,
}

tabular_fields!(Subject {
    id,
    nome,
    descricao,
    tempo_estimado,
    ativo
});

impl Resource for Subject {
    const ENDPOINT: &'static str = "assuntos.php";
    const LABEL: &'static str = "Subject";
    const TENANT_SCOPED: bool = false;
    const COLUMNS: &'static [&'static str] = Self::FIELDS;

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        rules::required("nome", "Name", self.nome.as_deref())?;
        rules::non_negative("tempo_estimado", "Estimated time", self.tempo_estimado.as_ref())
    }
}
