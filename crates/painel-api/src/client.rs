// Resource HTTP client
//
// Wraps `reqwest::Client` with fixed-base URL construction, tenant header
// injection, JSON/multipart negotiation and the method-override rule.
// Responses are normalized into either the raw JSON payload or an
// `Error`; envelope fields are left for the caller to interpret.

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use serde_json::{Value, json};
use tracing::{debug, trace};
use url::Url;

use crate::envelope::server_message;
use crate::error::Error;
use crate::request::{METHOD_OVERRIDE_HEADER, RequestBody, RequestConfig, TENANT_HEADER};
use crate::transport::TransportConfig;

/// Async client for the panel's `{resource}.php` endpoints.
///
/// Every call is independent: no retries, no caching, no de-duplication.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Build a client for `base_url` (e.g. `https://host/api`).
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, Self::normalize_base_url(base_url)?))
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Parse the base URL and make sure it ends with `/` so endpoints
    /// are appended rather than replacing the last path segment.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Append an endpoint (e.g. `"clientes.php?id=3"`) to the base URL.
    pub fn url(&self, endpoint: &str) -> Result<Url, Error> {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(base.join(endpoint.trim_start_matches('/'))?)
    }

    // ── Send ─────────────────────────────────────────────────────────

    /// Execute one call and return the parsed payload unchanged.
    pub async fn send(&self, config: RequestConfig) -> Result<Value, Error> {
        let url = self.url(&config.endpoint)?;
        let plan = config.wire_plan();
        let intended = config.method;

        debug!(
            method = %plan.method,
            override_method = ?plan.method_override,
            tenant = ?plan.tenant_id,
            "{} {url}",
            plan.method
        );

        let mut builder = self.http.request(plan.method.as_reqwest(), url);

        if let Some(ref tenant) = plan.tenant_id {
            let value = HeaderValue::from_str(tenant).map_err(|e| Error::InvalidHeader {
                header: TENANT_HEADER,
                reason: e.to_string(),
            })?;
            builder = builder.header(TENANT_HEADER, value);
        }
        if let Some(verb) = plan.method_override {
            builder = builder.header(METHOD_OVERRIDE_HEADER, verb.to_string());
        }
        if plan.json_content_type {
            builder = builder.header(CONTENT_TYPE, "application/json");
        }

        builder = match config.body {
            RequestBody::Empty => builder,
            RequestBody::Json(body) => {
                trace!(%body, "json body");
                builder.body(body.to_string())
            }
            RequestBody::Multipart(form) => {
                trace!(parts = form.parts().len(), "multipart body");
                builder.multipart(form.into_form()?)
            }
        };

        let resp = builder.send().await?;
        handle_response(intended, resp).await
    }
}

// ── Response handling ────────────────────────────────────────────────

async fn handle_response(
    intended: crate::request::Method,
    resp: reqwest::Response,
) -> Result<Value, Error> {
    let status = resp.status();
    let is_json = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("json"));

    let body = resp.text().await?;
    trace!(status = status.as_u16(), is_json, len = body.len(), "response received");

    if !status.is_success() {
        let message = is_json
            .then(|| serde_json::from_str::<Value>(&body).ok())
            .flatten()
            .as_ref()
            .and_then(server_message)
            .unwrap_or_else(|| format!("HTTP error {}", status.as_u16()));
        debug!(status = status.as_u16(), %message, "request failed");
        return Err(Error::Http {
            status: status.as_u16(),
            message,
        });
    }

    if !is_json {
        return Ok(json!({
            "success": true,
            "message": format!("{intended} completed"),
        }));
    }

    serde_json::from_str(&body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Parse {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}
