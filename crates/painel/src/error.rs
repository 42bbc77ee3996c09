//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use painel_config::ConfigError;
use painel_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONFIG: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
    pub const INTERRUPTED: i32 = 130;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the API: {reason}")]
    #[diagnostic(
        code(painel::connection_failed),
        help(
            "Check that the API is running and accessible.\n\
             Try: painel config show, or --api-url to override the profile."
        )
    )]
    ConnectionFailed { reason: String },

    // ── Server answers ───────────────────────────────────────────────
    #[error("{message} (HTTP {status})")]
    #[diagnostic(code(painel::http_error))]
    Http { status: u16, message: String },

    #[error("{message}")]
    #[diagnostic(code(painel::rejected))]
    Rejected { message: String },

    #[error("Unexpected response: {message}")]
    #[diagnostic(
        code(painel::unexpected_response),
        help("The API answered with a body this command could not read. Try -vv for details.")
    )]
    UnexpectedResponse { message: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(painel::not_found),
        help("Run: painel {list_command} to see available records")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(painel::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("{resource} records are scoped to a tenant, but no tenant id is configured")]
    #[diagnostic(
        code(painel::missing_tenant),
        help(
            "Pass --tenant <ID>, or store one with:\n\
             painel config set profiles.<name>.tenant_id <ID>"
        )
    )]
    MissingTenant { resource: String },

    #[error("No API configured for profile '{profile}'")]
    #[diagnostic(
        code(painel::no_config),
        help(
            "Create one with: painel config set profiles.{profile}.api_url <URL>\n\
             Or pass --api-url. Config file: {path}"
        )
    )]
    NoConfig { profile: String, path: String },

    #[error(transparent)]
    #[diagnostic(code(painel::config))]
    Config(#[from] ConfigError),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(painel::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    #[error("Interrupted before the API answered")]
    #[diagnostic(
        code(painel::interrupted),
        help("The request may still have been applied. Run the list command to check.")
    )]
    Interrupted,

    // ── Internal ─────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(painel::internal))]
    Internal { message: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Cannot render output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot render output: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            Self::MissingTenant { .. } | Self::NoConfig { .. } | Self::Config(_) => {
                exit_code::CONFIG
            }
            Self::Interrupted => exit_code::INTERRUPTED,
            _ => exit_code::GENERAL,
        }
    }

    /// Like `From<CoreError>`, but points not-found help at `command`'s list.
    pub fn for_command(err: CoreError, command: &str) -> Self {
        match err {
            CoreError::NotFound {
                resource,
                identifier,
            } => Self::NotFound {
                resource_type: resource.into(),
                identifier,
                list_command: format!("{command} list"),
            },
            other => other.into(),
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(v) => CliError::Validation {
                field: v.field.into(),
                reason: v.message,
            },

            CoreError::MissingTenant { resource } => CliError::MissingTenant {
                resource: resource.into(),
            },

            CoreError::NotFound {
                resource,
                identifier,
            } => CliError::NotFound {
                resource_type: resource.into(),
                identifier,
                list_command: "<resource> list".into(),
            },

            CoreError::InvalidState { action, state } => CliError::Internal {
                message: format!("Cannot {action} while {state}"),
            },

            CoreError::Network { message } => CliError::ConnectionFailed { reason: message },

            CoreError::Http { status, message } => CliError::Http { status, message },

            CoreError::Rejected { message } => CliError::Rejected { message },

            CoreError::Parse { message } => CliError::UnexpectedResponse { message },

            CoreError::Config { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
        }
    }
}
