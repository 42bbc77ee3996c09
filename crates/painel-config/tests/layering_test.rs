// Defaults → TOML file → PAINEL_* environment.

use std::path::Path;

use figment::Jail;
use pretty_assertions::assert_eq;

use painel_config::{Config, Overrides, load_config_from, save_config_to};

#[test]
fn missing_file_yields_defaults() {
    Jail::expect_with(|_jail| {
        let config = load_config_from(Path::new("absent.toml")).expect("config loads");
        assert_eq!(config, Config::default());
        Ok(())
    });
}

#[test]
fn toml_profiles_are_read() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "painel.toml",
            r#"
                default_profile = "prod"

                [defaults]
                output = "json"
                records_per_page = 25

                [profiles.prod]
                api_url = "https://painel.example.com/api"
                tenant_id = "12"
            "#,
        )?;

        let config = load_config_from(Path::new("painel.toml")).expect("config loads");
        assert_eq!(config.defaults.output, "json");
        assert_eq!(config.defaults.timeout, 30);

        let settings = config
            .resolve(None, &Overrides::default())
            .expect("profile resolves");
        assert_eq!(settings.profile_name, "prod");
        assert_eq!(settings.tenant.tenant_id(), Some("12"));
        assert_eq!(settings.records_per_page, 25);
        Ok(())
    });
}

#[test]
fn env_beats_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "painel.toml",
            r#"
                [profiles.default]
                api_url = "https://painel.example.com/api"
                tenant_id = "12"
            "#,
        )?;
        jail.set_env("PAINEL_PROFILES__DEFAULT__TENANT_ID", "acme-sul");
        jail.set_env("PAINEL_DEFAULTS__OUTPUT", "yaml");

        let config = load_config_from(Path::new("painel.toml")).expect("config loads");
        assert_eq!(config.defaults.output, "yaml");
        assert_eq!(
            config.profiles["default"].tenant_id.as_deref(),
            Some("acme-sul")
        );
        Ok(())
    });
}

#[test]
fn saved_config_loads_back() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config
        .set_value("profiles.local.api_url", "http://localhost:8000")
        .expect("valid url");
    config
        .set_value("default_profile", "local")
        .expect("valid key");
    save_config_to(&config, &path).expect("config saves");

    Jail::expect_with(|_jail| {
        let loaded = load_config_from(&path).expect("config loads");
        assert_eq!(loaded.default_profile.as_deref(), Some("local"));
        assert_eq!(
            loaded.profiles["local"].api_url.as_deref(),
            Some("http://localhost:8000")
        );
        Ok(())
    });
}
