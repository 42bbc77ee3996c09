//! Client market segments (`segmentos.php`).

use serde::{Deserialize, Serialize};

use super::record::RecordId;
use super::resource::{Resource, ValidationError, rules};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
}

tabular_fields!(Segment { id, nome, descricao });

impl Resource for Segment {
    const ENDPOINT: &'static str = "segmentos.php";
    const LABEL: &'static str = "Segment";
    const TENANT_SCOPED: bool = false;
    const COLUMNS: &'static [&'static str] = Self::FIELDS;

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        rules::required("nome", "Name", self.nome.as_deref())
    }
}
