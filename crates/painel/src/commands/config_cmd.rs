//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            let format = global.output.unwrap_or(OutputFormat::Table);
            let out = output::render_document(format, &cfg, |c| {
                toml::to_string_pretty(c).map_err(|e| CliError::Validation {
                    field: "config".into(),
                    reason: format!("failed to serialize config: {e}"),
                })
            })?;
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config()?;
            cfg.set_value(&key, &value)?;
            let path = config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Set {key} in {}", path.display());
            }
            Ok(())
        }

        ConfigCommand::Profiles => {
            let cfg = config::load_config()?;
            let out = profile_listing(&cfg);
            if out.is_empty() {
                if !global.quiet {
                    eprintln!("No profiles configured. Add one with: painel config set profiles.<name>.api_url <url>");
                }
            } else {
                output::print_output(&out, global.quiet);
            }
            Ok(())
        }

        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config()?;
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::Validation {
                    field: "profile".into(),
                    reason: format!("profile '{name}' does not exist"),
                });
            }
            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Default profile set to '{name}'");
            }
            Ok(())
        }
    }
}

/// One profile per line; the default is marked with `*`.
fn profile_listing(cfg: &Config) -> String {
    let default = cfg.active_profile_name(None);
    cfg.profiles
        .iter()
        .map(|(name, profile)| {
            let marker = if *name == default { "*" } else { " " };
            let url = profile.api_url.as_deref().unwrap_or("-");
            format!("{marker} {name}\t{url}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use painel_config::Profile;

    #[test]
    fn listing_marks_default_profile() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "default".into(),
            Profile {
                api_url: Some("http://localhost/api".into()),
                ..Profile::default()
            },
        );
        cfg.profiles.insert("prod".into(), Profile::default());
        assert_eq!(
            profile_listing(&cfg),
            "* default\thttp://localhost/api\n  prod\t-"
        );
    }
}
