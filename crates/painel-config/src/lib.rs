//! Shared configuration for the painel front ends.
//!
//! TOML profiles layered with `PAINEL_*` environment variables, and
//! translation into the settings `painel-core` pages run with. The tenant
//! id always comes from here (or a flag on top of it), never from code.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use painel_api::{TlsMode, TransportConfig};
use painel_core::{DEFAULT_MESSAGE_DELAY, DEFAULT_RECORDS_PER_PAGE, TenantContext};

/// Environment variable that points at an alternative config file.
pub const CONFIG_PATH_ENV: &str = "PAINEL_CONFIG";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' is not configured")]
    UnknownProfile { profile: String },

    #[error("unknown config key '{key}'")]
    UnknownKey { key: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Profile used when none is named on the command line.
    pub default_profile: Option<String>,

    #[serde(default)]
    pub defaults: Defaults,

    /// Named backend profiles.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Leading rows shown by list views.
    #[serde(default = "default_records_per_page")]
    pub records_per_page: usize,

    /// How long a status message stays up.
    #[serde(default = "default_message_delay_ms")]
    pub message_delay_ms: u64,

    #[serde(default)]
    pub insecure: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            timeout: default_timeout(),
            records_per_page: default_records_per_page(),
            message_delay_ms: default_message_delay_ms(),
            insecure: false,
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_records_per_page() -> usize {
    DEFAULT_RECORDS_PER_PAGE
}
#[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
fn default_message_delay_ms() -> u64 {
    DEFAULT_MESSAGE_DELAY.as_millis() as u64
}

/// A named backend deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Profile {
    /// Base URL of the PHP API (e.g., "https://painel.example.com/api").
    pub api_url: Option<String>,

    /// Company id sent with tenant-scoped requests.
    pub tenant_id: Option<String>,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override insecure TLS setting.
    pub insecure: Option<bool>,

    /// Override timeout.
    pub timeout: Option<u64>,
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path: `$PAINEL_CONFIG`, else the platform
/// config directory.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    ProjectDirs::from("com", "painel", "painel").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("painel");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Layer defaults, `path` (if it exists) and `PAINEL_*` variables.
///
/// Nested keys use `__`: `PAINEL_PROFILES__PROD__TENANT_ID=7`.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("PAINEL_").split("__"))
        .extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Editing ─────────────────────────────────────────────────────────

impl Config {
    /// Set one dotted key, e.g. `defaults.output` or
    /// `profiles.prod.tenant_id`. Profiles are created on first use.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let parts: Vec<&str> = key.split('.').collect();
        match parts.as_slice() {
            ["default_profile"] => self.default_profile = non_empty(value),
            ["defaults", "output"] => self.defaults.output = value.to_owned(),
            ["defaults", "timeout"] => self.defaults.timeout = parse(key, value)?,
            ["defaults", "records_per_page"] => {
                self.defaults.records_per_page = positive(key, parse(key, value)?)?;
            }
            ["defaults", "message_delay_ms"] => {
                self.defaults.message_delay_ms = parse(key, value)?;
            }
            ["defaults", "insecure"] => self.defaults.insecure = parse(key, value)?,
            ["profiles", name, field] => {
                let profile = self.profiles.entry((*name).to_owned()).or_default();
                match *field {
                    "api_url" => {
                        check_url(key, value)?;
                        profile.api_url = non_empty(value);
                    }
                    "tenant_id" => profile.tenant_id = non_empty(value),
                    "ca_cert" => profile.ca_cert = non_empty(value).map(PathBuf::from),
                    "insecure" => profile.insecure = Some(parse(key, value)?),
                    "timeout" => profile.timeout = Some(parse(key, value)?),
                    _ => return Err(ConfigError::UnknownKey { key: key.into() }),
                }
            }
            _ => return Err(ConfigError::UnknownKey { key: key.into() }),
        }
        Ok(())
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

fn parse<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Validation {
        field: key.into(),
        reason: e.to_string(),
    })
}

fn positive(key: &str, n: usize) -> Result<usize, ConfigError> {
    if n == 0 {
        return Err(ConfigError::Validation {
            field: key.into(),
            reason: "must be at least 1".into(),
        });
    }
    Ok(n)
}

fn check_url(field: &str, raw: &str) -> Result<url::Url, ConfigError> {
    let url = url::Url::parse(raw.trim()).map_err(|e| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL '{raw}': {e}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: field.into(),
            reason: format!("expected an http(s) URL, got '{raw}'"),
        });
    }
    Ok(url)
}

// ── Settings resolution ─────────────────────────────────────────────

/// Values given on the command line. They win over the profile.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub tenant_id: Option<String>,
    pub timeout: Option<u64>,
    pub insecure: bool,
    pub records_per_page: Option<usize>,
}

/// Everything a page needs to talk to one backend.
#[derive(Debug, Clone)]
pub struct PanelSettings {
    pub profile_name: String,
    pub base_url: url::Url,
    pub tenant: TenantContext,
    pub transport: TransportConfig,
    pub records_per_page: usize,
    pub message_delay: Duration,
}

impl Config {
    /// Name of the profile to use when the caller names none.
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(String::from)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    /// Merge a profile with command-line overrides.
    ///
    /// A missing profile is fine as long as `--api-url` is given.
    pub fn resolve(
        &self,
        requested: Option<&str>,
        overrides: &Overrides,
    ) -> Result<PanelSettings, ConfigError> {
        let profile_name = self.active_profile_name(requested);
        let profile = match self.profiles.get(&profile_name) {
            Some(p) => p.clone(),
            None if overrides.api_url.is_some() => Profile::default(),
            None => {
                return Err(ConfigError::UnknownProfile {
                    profile: profile_name,
                });
            }
        };

        let raw_url = overrides
            .api_url
            .clone()
            .or(profile.api_url)
            .ok_or_else(|| ConfigError::Validation {
                field: "api_url".into(),
                reason: format!("profile '{profile_name}' has no API URL"),
            })?;
        let base_url = check_url("api_url", &raw_url)?;

        let tenant =
            TenantContext::from_option(overrides.tenant_id.clone().or(profile.tenant_id));

        let tls = if overrides.insecure || profile.insecure.unwrap_or(self.defaults.insecure) {
            TlsMode::DangerAcceptInvalid
        } else if let Some(ca_path) = profile.ca_cert {
            TlsMode::CustomCa(ca_path)
        } else {
            TlsMode::System
        };
        let timeout = overrides
            .timeout
            .or(profile.timeout)
            .unwrap_or(self.defaults.timeout);
        let transport = TransportConfig::default()
            .with_tls(tls)
            .with_timeout(Duration::from_secs(timeout));

        let records_per_page = positive(
            "records_per_page",
            overrides
                .records_per_page
                .unwrap_or(self.defaults.records_per_page),
        )?;

        Ok(PanelSettings {
            profile_name,
            base_url,
            tenant,
            transport,
            records_per_page,
            message_delay: Duration::from_millis(self.defaults.message_delay_ms),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn with_profile() -> Config {
        let mut cfg = Config::default();
        cfg.set_value("profiles.default.api_url", "https://painel.test/api")
            .unwrap();
        cfg.set_value("profiles.default.tenant_id", "3").unwrap();
        cfg
    }

    #[test]
    fn resolve_uses_profile_and_defaults() {
        let settings = with_profile().resolve(None, &Overrides::default()).unwrap();
        assert_eq!(settings.profile_name, "default");
        assert_eq!(settings.base_url.as_str(), "https://painel.test/api");
        assert_eq!(settings.tenant.tenant_id(), Some("3"));
        assert_eq!(settings.records_per_page, DEFAULT_RECORDS_PER_PAGE);
        assert_eq!(settings.message_delay, DEFAULT_MESSAGE_DELAY);
        assert_eq!(settings.transport.tls, TlsMode::System);
    }

    #[test]
    fn overrides_win_over_profile() {
        let overrides = Overrides {
            tenant_id: Some("9".into()),
            insecure: true,
            timeout: Some(5),
            ..Overrides::default()
        };
        let settings = with_profile().resolve(None, &overrides).unwrap();
        assert_eq!(settings.tenant.tenant_id(), Some("9"));
        assert_eq!(settings.transport.tls, TlsMode::DangerAcceptInvalid);
        assert_eq!(settings.transport.timeout, Duration::from_secs(5));
    }

    #[test]
    fn missing_profile_needs_a_url() {
        let cfg = Config::default();
        assert!(matches!(
            cfg.resolve(Some("prod"), &Overrides::default()),
            Err(ConfigError::UnknownProfile { .. })
        ));

        let overrides = Overrides {
            api_url: Some("http://localhost:8080".into()),
            ..Overrides::default()
        };
        let settings = cfg.resolve(Some("prod"), &overrides).unwrap();
        assert_eq!(settings.tenant.tenant_id(), None);
    }

    #[test]
    fn blank_tenant_means_no_tenant() {
        let mut cfg = with_profile();
        cfg.profiles.get_mut("default").unwrap().tenant_id = Some("  ".into());
        let settings = cfg.resolve(None, &Overrides::default()).unwrap();
        assert_eq!(settings.tenant.tenant_id(), None);
    }

    #[test]
    fn set_value_validates() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set_value("defaults.records_per_page", "0"),
            Err(ConfigError::Validation { .. })
        ));
        assert!(matches!(
            cfg.set_value("profiles.x.api_url", "ftp://nope"),
            Err(ConfigError::Validation { .. })
        ));
        assert!(matches!(
            cfg.set_value("profiles.x.colour", "red"),
            Err(ConfigError::UnknownKey { .. })
        ));
        cfg.set_value("defaults.records_per_page", "25").unwrap();
        assert_eq!(cfg.defaults.records_per_page, 25);
    }
}
