use thiserror::Error;

/// Top-level error type for the `painel-api` crate.
///
/// Every call made through [`ApiClient`](crate::ApiClient) resolves to one
/// of these. `painel-core` folds them into its own user-facing taxonomy.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// The request never reached the server or never came back
    /// (connection refused, DNS failure, timeout, truncated body).
    #[error("Network error: {message}")]
    Network { message: String },

    // ── Server ──────────────────────────────────────────────────────
    /// The server answered with a non-success status. `message` is the
    /// server-supplied text when the body carried one, otherwise a
    /// generic `HTTP error <status>`.
    #[error("{message}")]
    Http { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// The body did not have the shape the content type promised,
    /// with the raw body for debugging.
    #[error("Parse error: {message}")]
    Parse { message: String, body: String },

    // ── Request construction ────────────────────────────────────────
    /// Base URL or endpoint could not be turned into a URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A header value (tenant id, override verb) was not representable.
    #[error("Invalid header value for {header}: {reason}")]
    InvalidHeader { header: &'static str, reason: String },

    /// The underlying `reqwest::Client` could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl Error {
    /// Returns `true` if the call never produced a server response.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Network {
            message: err.to_string(),
        }
    }
}
