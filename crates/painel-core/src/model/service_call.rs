//! Service calls (`chamados.php`), scoped to the tenant.

use serde::{Deserialize, Serialize};

use super::record::RecordId;
use super::scalar::Scalar;
use super::resource::{Resource, ValidationError, rules};

/// A support ticket opened for a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub titulo: Option<String>,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub prioridade: Option<String>,
    #[serde(default)]
    pub cliente_id: Option<RecordId>,
    #[serde(default)]
    pub assunto_id: Option<RecordId>,
    #[serde(default)]
    pub equipamento_id: Option<RecordId>,
    /// Minutes spent so far.
    #[serde(default)]
    pub tempo_gasto: Option<Scalar>,
    #[serde(default)]
    pub valor: Option<Scalar>,
    #[serde(default)]
    pub data_abertura: Option<String>,
    #[serde(default)]
    pub finalizado_em: Option<String>,
}

tabular_fields!(ServiceCall {
    id,
    titulo,
    descricao,
    status,
    prioridade,
    cliente_id,
    assunto_id,
    equipamento_id,
    tempo_gasto,
    valor,
    data_abertura,
    finalizado_em
});

impl Resource for ServiceCall {
    const ENDPOINT: &'static str = "chamados.php";
    const LABEL: &'static str = "Service call";
    const TENANT_SCOPED: bool = true;
    const COLUMNS: &'static [&'static str] = Self::FIELDS;

    fn id(&self) -> Option<&RecordId> {
        self.id.as_ref()
    }

    fn validate(&self) -> Result<(), ValidationError> {
        rules::required("titulo", "Title", self.titulo.as_deref())?;
        rules::present("cliente_id", "Client", self.cliente_id.as_ref())?;
        rules::present("assunto_id", "Subject", self.assunto_id.as_ref())?;
        rules::non_negative("tempo_gasto", "Time spent", self.tempo_gasto.as_ref())?;
        rules::non_negative("valor", "Value", self.valor.as_ref())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Tabular;
    use crate::model::resource::apply_fields;
    use crate::table::TableControls;
    use painel_api::RequestBody;
    use serde_json::json;

    fn from_server(value: serde_json::Value) -> ServiceCall {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn search_matches_the_text_the_server_sent() {
        let calls = vec![
            from_server(json!({ "id": "1", "titulo": "Rede", "valor": "150.00" })),
            from_server(json!({ "id": "2", "titulo": "Impressora", "valor": 80 })),
        ];
        let mut table = TableControls::new(calls);
        table.set_search_term("150.00");
        assert_eq!(table.processed_len(), 1);
        assert_eq!(table.displayed_data()[0].field("valor").to_string(), "150.00");
    }

    #[test]
    fn plain_edit_sends_values_back_unchanged() {
        let stored = from_server(json!({
            "id": 4,
            "titulo": "Troca de cabo",
            "cliente_id": "2",
            "assunto_id": 3,
            "tempo_gasto": "45",
            "valor": "12,50"
        }));
        let Ok(RequestBody::Json(body)) = stored.edit_draft().request_body() else {
            panic!("expected a JSON body");
        };
        assert_eq!(body["valor"], json!("12,50"));
        assert_eq!(body["tempo_gasto"], json!("45"));
    }

    #[test]
    fn unreadable_number_blocks_submit_instead_of_vanishing() {
        let stored = from_server(json!({
            "id": 4, "titulo": "Troca", "cliente_id": 2, "assunto_id": 3, "valor": "12,50"
        }));
        assert_eq!(stored.validate().map_err(|e| e.field), Err("valor"));

        let fixed = apply_fields(&stored.edit_draft(), &[("valor".into(), "12.50".into())]).unwrap();
        assert!(fixed.validate().is_ok());
        assert_eq!(fixed.valor, Some(Scalar::from("12.50")));
    }
}
