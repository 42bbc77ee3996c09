// ── Entity form lifecycle ──
//
// One state machine for every entity page:
//
//   Idle --open_create/open_edit--> Editing --cancel--> Idle
//   Editing --submit--> (validate) --invalid--> Editing
//                                  --valid--> (send) --ok--> Idle + refetch
//                                                    --err--> Editing
//   Idle --request_delete--> ConfirmingDelete --declined--> Idle
//                                             --confirmed--> (send) --> Idle
//
// Validating and Submitting exist only inside `submit` / `confirm_delete`.
// The state is not changed until the server answers, so dropping either
// future leaves the machine where it was.

use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::message::MessageBus;
use crate::model::{RecordId, Resource, ValidationError};
use crate::resource_client::ResourceClient;
use crate::session::PageSession;
use crate::table::{TableControls, TableState};

/// Whether an open form creates a record or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(RecordId),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum FormState<R> {
    #[default]
    Idle,
    Editing {
        mode: FormMode,
        draft: R,
    },
    ConfirmingDelete {
        id: RecordId,
    },
}

impl<R> FormState<R> {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Editing { .. } => "editing",
            Self::ConfirmingDelete { .. } => "confirming a delete",
        }
    }
}

/// Result of [`EntityFormLifecycle::submit`].
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Saved; the list was refetched.
    Saved { message: String },
    /// The draft failed a rule. Nothing was sent; the form stays open.
    Invalid(ValidationError),
    /// The call failed. The draft is kept.
    Failed(CoreError),
    /// The page closed before the server answered.
    Discarded,
}

/// Result of [`EntityFormLifecycle::confirm_delete`].
#[derive(Debug)]
pub enum DeleteOutcome {
    Deleted { message: String },
    /// Declined by the user. No call was made.
    Declined,
    /// The call failed. The list is unchanged.
    Failed(CoreError),
    Discarded,
}

/// Create/edit/delete coordinator for one resource type.
#[derive(Debug)]
pub struct EntityFormLifecycle<R: Resource> {
    client: ResourceClient,
    messages: MessageBus,
    session: PageSession,
    table: TableControls<R>,
    state: FormState<R>,
}

impl<R: Resource> EntityFormLifecycle<R> {
    pub fn new(client: ResourceClient, messages: MessageBus, session: PageSession) -> Self {
        Self::with_table_state(client, messages, session, TableState::default())
    }

    pub fn with_table_state(
        client: ResourceClient,
        messages: MessageBus,
        session: PageSession,
        table_state: TableState,
    ) -> Self {
        Self {
            client,
            messages,
            session,
            table: TableControls::with_state(Vec::new(), table_state),
            state: FormState::Idle,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn state(&self) -> &FormState<R> {
        &self.state
    }

    pub fn table(&self) -> &TableControls<R> {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut TableControls<R> {
        &mut self.table
    }

    pub fn messages(&self) -> &MessageBus {
        &self.messages
    }

    pub fn session(&self) -> &PageSession {
        &self.session
    }

    pub fn draft(&self) -> Option<&R> {
        match &self.state {
            FormState::Editing { draft, .. } => Some(draft),
            _ => None,
        }
    }

    pub fn draft_mut(&mut self) -> Option<&mut R> {
        match &mut self.state {
            FormState::Editing { draft, .. } => Some(draft),
            _ => None,
        }
    }

    // ── List ─────────────────────────────────────────────────────────

    /// Refetch the full collection from the server.
    ///
    /// On failure the previous list is kept and the error is shown.
    pub async fn load(&mut self) -> Result<(), CoreError> {
        let fetch = self.client.fetch_all::<R>();
        let Some(result) = self.session.scoped(fetch).await else {
            warn!(resource = R::LABEL, "page closed, dropping loaded collection");
            return Ok(());
        };
        match result {
            Ok(rows) => {
                debug!(resource = R::LABEL, count = rows.len(), "list refreshed");
                self.table.set_data(rows);
                Ok(())
            }
            Err(err) => {
                self.messages.show_error(err.to_string());
                Err(err)
            }
        }
    }

    // ── Create / edit ────────────────────────────────────────────────

    pub fn open_create(&mut self) -> Result<(), CoreError> {
        self.require_idle("open a form")?;
        self.state = FormState::Editing {
            mode: FormMode::Create,
            draft: R::default(),
        };
        Ok(())
    }

    /// Open an edit form on a record from the current list.
    pub fn open_edit(&mut self, id: &RecordId) -> Result<(), CoreError> {
        self.require_idle("open a form")?;
        let record = self.table.find(id).ok_or_else(|| CoreError::NotFound {
            resource: R::LABEL,
            identifier: id.to_string(),
        })?;
        self.state = FormState::Editing {
            mode: FormMode::Edit(id.clone()),
            draft: record.edit_draft(),
        };
        Ok(())
    }

    /// Close any open form or delete prompt without touching the list.
    pub fn cancel(&mut self) {
        if !matches!(self.state, FormState::Idle) {
            debug!(resource = R::LABEL, from = self.state.name(), "cancelled");
        }
        self.state = FormState::Idle;
    }

    /// Validate the draft and, if valid, save it.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let FormState::Editing { mode, draft } = &self.state else {
            return SubmitOutcome::Failed(CoreError::InvalidState {
                action: "submit",
                state: self.state.name(),
            });
        };

        if let Err(invalid) = draft.validate() {
            debug!(resource = R::LABEL, field = invalid.field, "draft rejected locally");
            self.messages.show_error(invalid.message.clone());
            return SubmitOutcome::Invalid(invalid);
        }

        let verb = match mode {
            FormMode::Create => "created",
            FormMode::Edit(_) => "updated",
        };
        let client = &self.client;
        let call = async move {
            match mode {
                FormMode::Create => client.create(draft).await,
                FormMode::Edit(id) => client.update(id, draft).await,
            }
        };
        let Some(result) = self.session.scoped(call).await else {
            warn!(resource = R::LABEL, "page closed, dropping save result");
            return SubmitOutcome::Discarded;
        };

        match result {
            Ok(ack) => {
                info!(resource = R::LABEL, verb, "draft saved");
                self.state = FormState::Idle;
                let message = ack
                    .message
                    .unwrap_or_else(|| format!("{} {verb} successfully", R::LABEL));
                self.finish(&message).await;
                SubmitOutcome::Saved { message }
            }
            Err(err) => {
                warn!(resource = R::LABEL, error = %err, "save failed");
                self.messages.show_error(err.to_string());
                SubmitOutcome::Failed(err)
            }
        }
    }

    // ── Delete ───────────────────────────────────────────────────────

    /// Ask to delete a record from the current list.
    pub fn request_delete(&mut self, id: &RecordId) -> Result<(), CoreError> {
        self.require_idle("delete")?;
        if self.table.find(id).is_none() {
            return Err(CoreError::NotFound {
                resource: R::LABEL,
                identifier: id.to_string(),
            });
        }
        self.state = FormState::ConfirmingDelete { id: id.clone() };
        Ok(())
    }

    /// Answer the pending delete prompt.
    pub async fn confirm_delete(&mut self, confirmed: bool) -> DeleteOutcome {
        let FormState::ConfirmingDelete { id } = &self.state else {
            return DeleteOutcome::Failed(CoreError::InvalidState {
                action: "confirm a delete",
                state: self.state.name(),
            });
        };

        if !confirmed {
            debug!(resource = R::LABEL, %id, "delete declined");
            self.state = FormState::Idle;
            return DeleteOutcome::Declined;
        }

        let call = self.client.delete::<R>(id);
        let Some(result) = self.session.scoped(call).await else {
            warn!(resource = R::LABEL, "page closed, dropping delete result");
            return DeleteOutcome::Discarded;
        };

        self.state = FormState::Idle;
        match result {
            Ok(ack) => {
                let message = ack
                    .message
                    .unwrap_or_else(|| format!("{} deleted successfully", R::LABEL));
                self.finish(&message).await;
                DeleteOutcome::Deleted { message }
            }
            Err(err) => {
                warn!(resource = R::LABEL, error = %err, "delete failed");
                self.messages.show_error(err.to_string());
                DeleteOutcome::Failed(err)
            }
        }
    }

    // ── Internals ────────────────────────────────────────────────────

    fn require_idle(&self, action: &'static str) -> Result<(), CoreError> {
        match self.state {
            FormState::Idle => Ok(()),
            ref other => Err(CoreError::InvalidState {
                action,
                state: other.name(),
            }),
        }
    }

    /// After a successful mutation: refetch, then report. A page that
    /// closed meanwhile gets no message.
    async fn finish(&mut self, message: &str) {
        let reloaded = self.load().await;
        if !self.session.is_active() {
            debug!(resource = R::LABEL, "page closed, not reporting");
            return;
        }
        match reloaded {
            Ok(()) => self.messages.show_success(message),
            Err(err) => self
                .messages
                .show_warning(format!("{message}, but the list could not be reloaded: {err}")),
        }
    }
}
