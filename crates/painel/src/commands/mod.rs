//! Command dispatch and the per-invocation context.

pub mod config_cmd;
pub mod records;
pub mod resource;
pub mod util;

use painel_api::ApiClient;
use painel_config::PanelSettings;
use painel_core::{
    Client, CoreError, EntityFormLifecycle, Equipment, MessageBus, PageSession, Resource,
    ResourceClient, Segment, ServiceCall, Subject, TableState, User,
};

use crate::cli::{Command, GlobalOpts, OutputFormat};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

/// Everything a resource command needs: resolved settings, a shared
/// client, and the page session that Ctrl-C closes.
pub struct Context<'a> {
    pub global: &'a GlobalOpts,
    pub settings: PanelSettings,
    pub format: OutputFormat,
    pub color: bool,
    pub client: ResourceClient,
    pub session: PageSession,
}

impl<'a> Context<'a> {
    pub fn new(global: &'a GlobalOpts, cfg: &Config) -> Result<Self, CliError> {
        let settings = config::resolve_settings(global, cfg)?;
        let format = config::output_format(global, cfg)?;
        let api = ApiClient::new(settings.base_url.as_str(), &settings.transport)
            .map_err(CoreError::from)?;
        tracing::debug!(
            profile = %settings.profile_name,
            base_url = %settings.base_url,
            tenant = ?settings.tenant.tenant_id(),
            "settings resolved"
        );
        Ok(Self {
            global,
            format,
            color: output::should_color(global.color),
            client: ResourceClient::new(api, settings.tenant.clone()),
            session: PageSession::new(),
            settings,
        })
    }

    /// A fresh page for resource `R`, seeded with the configured cap.
    pub fn page<R: Resource>(&self) -> EntityFormLifecycle<R> {
        EntityFormLifecycle::with_table_state(
            self.client.clone(),
            MessageBus::new(self.settings.message_delay),
            self.session.clone(),
            TableState::with_records_per_page(self.settings.records_per_page),
        )
    }
}

pub async fn dispatch(cmd: Command, ctx: &Context<'_>) -> Result<(), CliError> {
    match cmd {
        Command::Subjects(args) => resource::handle::<Subject>(args, ctx).await,
        Command::Segments(args) => resource::handle::<Segment>(args, ctx).await,
        Command::Clients(args) => resource::handle::<Client>(args, ctx).await,
        Command::Users(args) => resource::handle::<User>(args, ctx).await,
        Command::Equipment(args) => resource::handle::<Equipment>(args, ctx).await,
        Command::Calls(args) => resource::handle::<ServiceCall>(args, ctx).await,
        Command::Records(args) => records::handle(args, ctx).await,
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal {
            message: "command does not use the API".into(),
        }),
    }
}
