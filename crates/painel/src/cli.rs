//! Clap derive structures for the `painel` CLI.
//!
//! Every resource shares one command shape: list / get / create / edit /
//! delete. Global flags override the selected config profile.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// painel -- manage the admin panel's records from the command line
#[derive(Debug, Parser)]
#[command(
    name = "painel",
    version,
    about = "Manage admin panel records from the command line",
    long_about = "List, inspect, create, edit and delete the records served by the\n\
        panel's PHP API: subjects, segments, clients, users, equipment and\n\
        service calls. Tenant-scoped resources need a tenant id (--tenant or\n\
        the profile's tenant_id).",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Config profile to use
    #[arg(long, short = 'p', env = "PAINEL_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, short = 'u', env = "PAINEL_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Tenant (company) id for tenant-scoped resources
    #[arg(long, short = 't', env = "PAINEL_TENANT", global = true)]
    pub tenant: Option<String>,

    /// Output format [default: from config, else table]
    #[arg(long, short = 'o', env = "PAINEL_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "PAINEL_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "PAINEL_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Service-call subjects (assuntos)
    #[command(alias = "assuntos")]
    Subjects(ResourceArgs),

    /// Client market segments (segmentos)
    #[command(alias = "segmentos")]
    Segments(ResourceArgs),

    /// Customer companies (clientes)
    #[command(alias = "clientes")]
    Clients(ResourceArgs),

    /// Panel users (usuarios)
    #[command(alias = "usuarios")]
    Users(ResourceArgs),

    /// Customer equipment (equipamentos)
    #[command(alias = "equipamentos", alias = "equip")]
    Equipment(ResourceArgs),

    /// Service calls (chamados)
    #[command(alias = "chamados")]
    Calls(ResourceArgs),

    /// List any endpoint without a typed model
    Records(RecordsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared Resource Commands ─────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ResourceArgs {
    #[command(subcommand)]
    pub command: ResourceCommand,
}

#[derive(Debug, Subcommand)]
pub enum ResourceCommand {
    /// List records
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one record
    Get {
        /// Record id
        id: String,
    },

    /// Create a record
    Create(WriteArgs),

    /// Edit a record
    Edit {
        /// Record id
        id: String,

        #[command(flatten)]
        write: WriteArgs,
    },

    /// Delete a record
    #[command(alias = "rm")]
    Delete {
        /// Record id
        id: String,
    },
}

/// Search, sort and cap for list commands.
///
/// The whole collection is always fetched; `--limit` only caps how many
/// leading rows are shown.
#[derive(Debug, Args)]
pub struct ListArgs {
    /// Keep rows where any field contains this text (case-insensitive)
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Column to sort by
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Show at most this many leading rows [default: from config]
    #[arg(long, short = 'l', value_parser = clap::value_parser!(u64).range(1..))]
    pub limit: Option<u64>,
}

#[derive(Debug, Args)]
pub struct WriteArgs {
    /// Field assignment, repeatable (e.g. --set nome=Rede --set ativo=1)
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    pub fields: Vec<(String, String)>,

    /// Profile photo to upload (users only)
    #[arg(long, value_name = "PATH")]
    pub photo: Option<PathBuf>,
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{raw}'"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in '{raw}'"));
    }
    Ok((field.to_owned(), value.to_owned()))
}

// ── Records ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RecordsArgs {
    /// Endpoint relative to the API URL (e.g. "relatorios.php")
    pub endpoint: String,

    #[command(flatten)]
    pub list: ListArgs,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,

    /// Set a configuration value
    Set {
        /// Config key (dot-separated path, e.g., "profiles.prod.tenant_id")
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },
}

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
