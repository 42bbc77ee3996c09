//! Customer companies (`clientes.php`), scoped to the tenant.

use serde::{Deserialize, Serialize};

use super::record::RecordId;
use super::resource::{Resource, ValidationError, rules};

/// A customer of the tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub nome: Option<String>,
    /// Brazilian company registry number, 14 digits.
    #[serde(default)]
    pub cnpj: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub cidade: Option<String>,
    #[serde(default)]
    pub segmento_id: Option<RecordId>,
    #[serde(default)]
    pub criado_em: Option<String>,
}

tabular_fields!(Client {
    id,
    nome,
    cnpj,
    email,
    telefone,
    cidade,
    segmento_id,
    criado_em
});

impl Resource for Client {
    const ENDPOINT: &'static str = "clientes.php";
    const LABEL: &'static str = "Client";
    const TENANT_SCOPED: bool = true;
    const COLUMNS: &'static [&'static str] = Self::FIELDS;

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        rules::required("nome", "Name", self.nome.as_deref())?;
        rules::digits("cnpj", "CNPJ", self.cnpj.as_deref(), 14)?;
        rules::email("email", self.email.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_failing_rule_wins() {
        let draft = Client {
            cnpj: Some("123".into()),
            email: Some("bad".into()),
            ..Client::default()
        };
        assert_eq!(draft.validate().map_err(|e| e.field), Err("nome"));

        let draft = Client {
            nome: Some("Acme".into()),
            ..draft
        };
        assert_eq!(draft.validate().map_err(|e| e.field), Err("cnpj"));
    }
}
