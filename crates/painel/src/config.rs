//! CLI configuration: thin wrapper around `painel_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (--api-url, --tenant, --timeout, --insecure).

use clap::ValueEnum;

use painel_config::{ConfigError, Overrides, PanelSettings};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use painel_config::{Config, config_path, load_config, save_config};

/// Global flags as config overrides.
pub fn overrides(global: &GlobalOpts) -> Overrides {
    Overrides {
        api_url: global.api_url.clone(),
        tenant_id: global.tenant.clone(),
        timeout: global.timeout,
        insecure: global.insecure,
        records_per_page: None,
    }
}

/// Resolve the active profile plus flags into page settings.
pub fn resolve_settings(global: &GlobalOpts, cfg: &Config) -> Result<PanelSettings, CliError> {
    cfg.resolve(global.profile.as_deref(), &overrides(global))
        .map_err(|err| match err {
            ConfigError::UnknownProfile { profile } => CliError::NoConfig {
                profile,
                path: config_path().display().to_string(),
            },
            other => other.into(),
        })
}

/// `--output`, else the config default, else table.
pub fn output_format(global: &GlobalOpts, cfg: &Config) -> Result<OutputFormat, CliError> {
    if let Some(format) = global.output {
        return Ok(format);
    }
    OutputFormat::from_str(&cfg.defaults.output, true).map_err(|reason| CliError::Validation {
        field: "defaults.output".into(),
        reason,
    })
}
