//! Customer equipment (`equipamentos.php`), scoped to the tenant.

use serde::{Deserialize, Serialize};

use super::record::RecordId;
use super::scalar::Scalar;
use super::resource::{Resource, ValidationError, rules};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub numero_serie: Option<String>,
    #[serde(default)]
    pub modelo: Option<String>,
    #[serde(default)]
    pub valor: Option<Scalar>,
    #[serde(default)]
    pub cliente_id: Option<RecordId>,
    #[serde(default)]
    pub data_aquisicao: Option<String>,
}

tabular_fields!(Equipment {
    id,
    nome,
    numero_serie,
    modelo,
    valor,
    cliente_id,
    data_aquisicao
});

impl Resource for Equipment {
    const ENDPOINT: &'static str = "equipamentos.php";
    const LABEL: &'static str = "Equipment";
    const TENANT_SCOPED: bool = true;
    const COLUMNS: &'static [&'static str] = Self::FIELDS;

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        rules::required("nome", "Name", self.nome.as_deref())?;
        rules::non_negative("valor", "Value", self.valor.as_ref())
    }
}
