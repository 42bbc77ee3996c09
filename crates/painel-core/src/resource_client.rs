// ── Resource service ──
//
// Typed CRUD over ApiClient. This is where the envelope gets
// interpreted: `success: false` on a 2xx becomes `Rejected`, collections
// are read from `data` (or a bare array), and tenant-scoped resources
// refuse to go out without a tenant.

use std::sync::Arc;

use futures_util::future::try_join;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use painel_api::{ApiClient, Envelope, RequestConfig};

use crate::error::CoreError;
use crate::model::{DynamicRecord, RecordId, Resource};
use crate::session::TenantContext;

/// What the server said about a successful mutation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ack {
    /// Server-supplied `message`, if any.
    pub message: Option<String>,
    /// Id of the created or updated record, when the server echoes it.
    pub id: Option<RecordId>,
}

/// Interpreted envelope: the `data` member and the server's message.
struct Reply {
    data: Value,
    message: Option<String>,
}

/// CRUD client for typed resources, bound to one tenant.
///
/// Cheaply cloneable; the underlying HTTP client is shared.
#[derive(Debug, Clone)]
pub struct ResourceClient {
    api: Arc<ApiClient>,
    tenant: TenantContext,
}

impl ResourceClient {
    pub fn new(api: ApiClient, tenant: TenantContext) -> Self {
        Self::from_shared(Arc::new(api), tenant)
    }

    pub fn from_shared(api: Arc<ApiClient>, tenant: TenantContext) -> Self {
        Self { api, tenant }
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Fetch the whole collection. There is no server paging.
    pub async fn fetch_all<R: Resource>(&self) -> Result<Vec<R>, CoreError> {
        let request = RequestConfig::get(R::ENDPOINT);
        let reply = self.send(request, R::TENANT_SCOPED, R::LABEL).await?;
        let rows: Vec<R> = decode_rows(reply.data, R::LABEL)?;
        debug!(resource = R::LABEL, count = rows.len(), "collection loaded");
        Ok(rows)
    }

    /// Fetch a single record by id.
    pub async fn fetch_one<R: Resource>(&self, id: &RecordId) -> Result<R, CoreError> {
        let request = RequestConfig::get(item_endpoint(R::ENDPOINT, id));
        let reply = self.send(request, R::TENANT_SCOPED, R::LABEL).await?;

        // Some handlers answer `?id=` with a one-element list.
        let row = match reply.data {
            Value::Array(rows) => rows.into_iter().next(),
            Value::Null => None,
            other => Some(other),
        };
        let row = row.ok_or_else(|| CoreError::NotFound {
            resource: R::LABEL,
            identifier: id.to_string(),
        })?;
        decode_row(row, R::LABEL)
    }

    /// Load two collections concurrently, failing as soon as either fails.
    pub async fn fetch_pair<A: Resource, B: Resource>(
        &self,
    ) -> Result<(Vec<A>, Vec<B>), CoreError> {
        try_join(self.fetch_all::<A>(), self.fetch_all::<B>()).await
    }

    /// Fetch an endpoint without a typed model.
    ///
    /// The tenant header is sent when a tenant is configured.
    pub async fn fetch_records(&self, endpoint: &str) -> Result<Vec<DynamicRecord>, CoreError> {
        let reply = self.send(RequestConfig::get(endpoint), false, "Record").await?;
        decode_rows(reply.data, "Record")
    }

    // ── Mutations ────────────────────────────────────────────────────

    pub async fn create<R: Resource>(&self, draft: &R) -> Result<Ack, CoreError> {
        let request = RequestConfig::post(R::ENDPOINT).with_body(draft.request_body()?);
        let reply = self.send(request, R::TENANT_SCOPED, R::LABEL).await?;
        info!(resource = R::LABEL, "record created");
        Ok(ack(reply))
    }

    /// Replace the record `id` with `draft`. Last write wins.
    pub async fn update<R: Resource>(&self, id: &RecordId, draft: &R) -> Result<Ack, CoreError> {
        let request = RequestConfig::put(item_endpoint(R::ENDPOINT, id))
            .with_body(draft.request_body()?);
        let reply = self.send(request, R::TENANT_SCOPED, R::LABEL).await?;
        info!(resource = R::LABEL, %id, "record updated");
        Ok(ack(reply))
    }

    pub async fn delete<R: Resource>(&self, id: &RecordId) -> Result<Ack, CoreError> {
        let request = RequestConfig::delete(item_endpoint(R::ENDPOINT, id));
        let reply = self.send(request, R::TENANT_SCOPED, R::LABEL).await?;
        info!(resource = R::LABEL, %id, "record deleted");
        Ok(ack(reply))
    }

    // ── Internals ────────────────────────────────────────────────────

    async fn send(
        &self,
        request: RequestConfig,
        tenant_scoped: bool,
        resource: &'static str,
    ) -> Result<Reply, CoreError> {
        let tenant = self.tenant.tenant_id();
        if tenant_scoped && tenant.is_none() {
            return Err(CoreError::MissingTenant { resource });
        }

        let payload = self
            .api
            .send(request.with_tenant(tenant))
            .await
            .inspect_err(|e| warn!(resource, error = %e, "request failed"))?;
        interpret(payload)
    }
}

/// `{endpoint}?id={id}`, with the id percent-encoded.
fn item_endpoint(endpoint: &str, id: &RecordId) -> String {
    let id = id.to_string();
    let encoded: String = url::form_urlencoded::byte_serialize(id.as_bytes()).collect();
    format!("{endpoint}?id={encoded}")
}

fn interpret(payload: Value) -> Result<Reply, CoreError> {
    if !Envelope::<Value>::is_enveloped(&payload) {
        // Bare arrays and objects without `success` are the data itself.
        return Ok(Reply {
            data: payload,
            message: None,
        });
    }

    let envelope: Envelope = Envelope::from_value(payload)?;
    let message = envelope.reason();
    if !envelope.success {
        return Err(CoreError::Rejected {
            message: message.unwrap_or_else(|| "The server rejected the request".into()),
        });
    }
    Ok(Reply {
        data: envelope.data.unwrap_or(Value::Null),
        message,
    })
}

fn ack(reply: Reply) -> Ack {
    let id = match &reply.data {
        Value::Object(obj) => obj.get("id"),
        scalar @ (Value::Number(_) | Value::String(_)) => Some(scalar),
        _ => None,
    }
    .and_then(|v| serde_json::from_value::<RecordId>(v.clone()).ok());

    Ack {
        message: reply.message,
        id,
    }
}

fn decode_rows<T: DeserializeOwned>(data: Value, label: &str) -> Result<Vec<T>, CoreError> {
    match data {
        Value::Null => Ok(Vec::new()),
        Value::Array(rows) => rows.into_iter().map(|r| decode_row(r, label)).collect(),
        other => Err(CoreError::Parse {
            message: format!("expected a list of {label} records, got {}", kind_of(&other)),
        }),
    }
}

fn decode_row<T: DeserializeOwned>(row: Value, label: &str) -> Result<T, CoreError> {
    serde_json::from_value(row).map_err(|e| CoreError::Parse {
        message: format!("cannot decode {label}: {e}"),
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn item_endpoint_encodes_text_ids() {
        assert_eq!(
            item_endpoint("clientes.php", &RecordId::Number(7)),
            "clientes.php?id=7"
        );
        assert_eq!(
            item_endpoint("clientes.php", &RecordId::Text("a b&c".into())),
            "clientes.php?id=a+b%26c"
        );
    }

    #[test]
    fn success_false_is_rejected_with_server_message() {
        let err = interpret(json!({ "success": false, "error": "CNPJ duplicado" }))
            .err()
            .unwrap();
        assert!(matches!(err, CoreError::Rejected { ref message } if message == "CNPJ duplicado"));
    }

    #[test]
    fn empty_message_gives_way_to_error() {
        let err = interpret(json!({ "success": false, "message": "", "error": "Sem permissão" }))
            .err()
            .unwrap();
        assert!(matches!(err, CoreError::Rejected { ref message } if message == "Sem permissão"));

        let err = interpret(json!({ "success": false, "message": "" })).err().unwrap();
        assert!(
            matches!(err, CoreError::Rejected { ref message } if message == "The server rejected the request")
        );
    }

    #[test]
    fn object_without_success_is_the_record() {
        let reply = interpret(json!({ "id": 3, "message": "not an envelope" })).unwrap();
        assert_eq!(reply.data, json!({ "id": 3, "message": "not an envelope" }));
        assert_eq!(reply.message, None);
    }

    #[test]
    fn bare_array_is_data() {
        let reply = interpret(json!([{ "id": 1 }])).unwrap();
        assert_eq!(reply.data, json!([{ "id": 1 }]));
        assert_eq!(reply.message, None);
    }

    #[test]
    fn ack_reads_echoed_id() {
        let reply = interpret(json!({ "success": true, "message": "ok", "data": { "id": "12" } }))
            .unwrap();
        assert_eq!(
            ack(reply),
            Ack {
                message: Some("ok".into()),
                id: Some(RecordId::Number(12)),
            }
        );
    }

    #[test]
    fn non_list_collection_is_a_parse_error() {
        let err = decode_rows::<DynamicRecord>(json!("nope"), "Client").unwrap_err();
        assert!(matches!(err, CoreError::Parse { .. }));
        assert!(decode_rows::<DynamicRecord>(Value::Null, "Client").unwrap().is_empty());
    }
}
