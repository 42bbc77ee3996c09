// Request construction: intended verb, body encoding, tenant scoping,
// and the wire plan derived from them.
//
// `RequestConfig` describes what the caller wants. `WirePlan` is what
// actually goes on the wire after the method-override rule is applied.
// Keeping the two apart lets the rule be tested without a server.

use serde_json::Value;

use crate::error::Error;

/// Header carrying the tenant (company) identifier.
pub const TENANT_HEADER: &str = "X-Empresa-Id";

/// Header carrying the intended verb when a multipart body is tunnelled
/// through `POST`.
pub const METHOD_OVERRIDE_HEADER: &str = "X-HTTP-Method-Override";

// ── Method ───────────────────────────────────────────────────────────

/// Intended HTTP verb of a resource call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub(crate) fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

// ── Body ─────────────────────────────────────────────────────────────

/// One part of a multipart form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        mime: Option<String>,
        bytes: Vec<u8>,
    },
}

/// A binary/multipart payload (e.g. a profile photo plus its record fields).
///
/// Kept as plain data so a request can be inspected, cloned and re-sent;
/// it is converted to a `reqwest` form only at send time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    parts: Vec<FormPart>,
}

impl FormPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Append a file field.
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: Option<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.parts.push(FormPart::File {
            name: name.into(),
            file_name: file_name.into(),
            mime,
            bytes,
        });
        self
    }

    pub fn parts(&self) -> &[FormPart] {
        &self.parts
    }

    pub(crate) fn into_form(self) -> Result<reqwest::multipart::Form, Error> {
        let mut form = reqwest::multipart::Form::new();
        for part in self.parts {
            form = match part {
                FormPart::Text { name, value } => form.text(name, value),
                FormPart::File {
                    name,
                    file_name,
                    mime,
                    bytes,
                } => {
                    let mut file = reqwest::multipart::Part::bytes(bytes).file_name(file_name);
                    if let Some(mime) = mime {
                        file = file.mime_str(&mime).map_err(|e| Error::InvalidHeader {
                            header: "Content-Type",
                            reason: e.to_string(),
                        })?;
                    }
                    form.part(name, file)
                }
            };
        }
        Ok(form)
    }
}

/// Request body: nothing, a JSON document, or a multipart form.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(FormPayload),
}

impl RequestBody {
    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }
}

// ── RequestConfig ────────────────────────────────────────────────────

/// Everything needed to make one resource call. Built per call, never stored.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestConfig {
    pub endpoint: String,
    pub method: Method,
    pub tenant_id: Option<String>,
    pub body: RequestBody,
}

impl RequestConfig {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method,
            tenant_id: None,
            body: RequestBody::Empty,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Get, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Post, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Put, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::Delete, endpoint)
    }

    /// Scope the call to a tenant. `None` leaves the header off.
    pub fn with_tenant(mut self, tenant_id: Option<impl Into<String>>) -> Self {
        self.tenant_id = tenant_id.map(Into::into);
        self
    }

    pub fn with_json(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn with_form(mut self, form: FormPayload) -> Self {
        self.body = RequestBody::Multipart(form);
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Derive the on-the-wire shape of this request.
    pub fn wire_plan(&self) -> WirePlan {
        let multipart = self.body.is_multipart();
        let tunnelled = multipart && matches!(self.method, Method::Put | Method::Delete);

        WirePlan {
            method: if tunnelled { Method::Post } else { self.method },
            method_override: tunnelled.then_some(self.method),
            json_content_type: !multipart,
            tenant_id: self.tenant_id.clone(),
        }
    }
}

/// Headers and verb actually sent for a [`RequestConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WirePlan {
    /// Verb used on the wire.
    pub method: Method,
    /// Intended verb, carried in [`METHOD_OVERRIDE_HEADER`] when tunnelled.
    pub method_override: Option<Method>,
    /// Whether to send `Content-Type: application/json`. Multipart bodies
    /// leave it to the transport so the boundary is set correctly.
    pub json_content_type: bool,
    /// Value for [`TENANT_HEADER`].
    pub tenant_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn photo() -> FormPayload {
        FormPayload::new()
            .text("nome", "Ana")
            .file("foto", "ana.png", Some("image/png".into()), vec![1, 2, 3])
    }

    #[test]
    fn multipart_delete_is_tunnelled_through_post() {
        let plan = RequestConfig::delete("usuarios.php?id=4")
            .with_form(photo())
            .wire_plan();

        assert_eq!(plan.method, Method::Post);
        assert_eq!(plan.method_override, Some(Method::Delete));
        assert!(!plan.json_content_type);
    }

    #[test]
    fn multipart_put_is_tunnelled_through_post() {
        let plan = RequestConfig::put("usuarios.php?id=4")
            .with_form(photo())
            .wire_plan();

        assert_eq!(plan.method, Method::Post);
        assert_eq!(plan.method_override, Some(Method::Put));
    }

    #[test]
    fn multipart_post_keeps_its_verb() {
        let plan = RequestConfig::post("usuarios.php").with_form(photo()).wire_plan();

        assert_eq!(plan.method, Method::Post);
        assert_eq!(plan.method_override, None);
        assert!(!plan.json_content_type);
    }

    #[test]
    fn json_verbs_are_sent_as_is() {
        for method in [Method::Get, Method::Post, Method::Put, Method::Delete] {
            let plan = RequestConfig::new(method, "clientes.php")
                .with_json(json!({ "nome": "Rede" }))
                .wire_plan();
            assert_eq!(plan.method, method);
            assert_eq!(plan.method_override, None);
            assert!(plan.json_content_type);
        }
    }

    #[test]
    fn tenant_is_only_carried_when_present() {
        let scoped = RequestConfig::get("clientes.php")
            .with_tenant(Some("7"))
            .wire_plan();
        let unscoped = RequestConfig::get("assuntos.php")
            .with_tenant(None::<String>)
            .wire_plan();

        assert_eq!(scoped.tenant_id.as_deref(), Some("7"));
        assert_eq!(unscoped.tenant_id, None);
    }

    #[test]
    fn method_parses_case_insensitively() {
        assert_eq!("delete".parse::<Method>().ok(), Some(Method::Delete));
        assert_eq!(Method::Put.to_string(), "PUT");
    }
}
