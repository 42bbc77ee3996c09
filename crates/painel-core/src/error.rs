// ── Core error types ──
//
// User-facing errors from painel-core. Every variant carries a message
// fit for the page's status line; `From<painel_api::Error>` maps the
// transport errors onto the same taxonomy.

use thiserror::Error;

use crate::model::ValidationError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Local ────────────────────────────────────────────────────────
    /// A draft failed its resource's rules. Never reaches the network.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// A tenant-scoped resource was used without a tenant.
    #[error("{resource} requires a tenant id")]
    MissingTenant { resource: &'static str },

    /// The operation does not apply in the lifecycle's current state.
    #[error("Cannot {action} while {state}")]
    InvalidState {
        action: &'static str,
        state: &'static str,
    },

    #[error("{resource} {identifier} not found")]
    NotFound {
        resource: &'static str,
        identifier: String,
    },

    // ── Remote ───────────────────────────────────────────────────────
    /// The call never reached the server or never returned.
    #[error("Network error: {message}")]
    Network { message: String },

    /// The server answered with a non-success status.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The server answered 2xx but its envelope said `success: false`.
    #[error("{message}")]
    Rejected { message: String },

    /// The body was not what the content type or resource promised.
    #[error("Unexpected response: {message}")]
    Parse { message: String },

    // ── Setup ────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<painel_api::Error> for CoreError {
    fn from(err: painel_api::Error) -> Self {
        match err {
            painel_api::Error::Network { message } => Self::Network { message },
            painel_api::Error::Http { status, message } => Self::Http { status, message },
            painel_api::Error::Parse { message, body: _ } => Self::Parse { message },
            painel_api::Error::InvalidUrl(e) => Self::Config {
                message: format!("Invalid URL: {e}"),
            },
            painel_api::Error::InvalidHeader { header, reason } => Self::Config {
                message: format!("Invalid {header} header: {reason}"),
            },
            painel_api::Error::Client(message) => Self::Config { message },
        }
    }
}
