//! Handlers shared by every typed resource command.

use std::io::IsTerminal;
use std::path::Path;

use painel_core::{
    Attachment, Client, DeleteOutcome, EntityFormLifecycle, Equipment, RecordId, Resource,
    Segment, ServiceCall, Subject, SubmitOutcome, User, apply_fields,
};

use crate::cli::{ListArgs, ResourceArgs, ResourceCommand, WriteArgs};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

// ── Per-resource CLI hooks ──────────────────────────────────────────

pub trait CliResource: Resource {
    /// Subcommand name, used in help text.
    const COMMAND: &'static str;

    fn attach_photo(&mut self, _path: &Path) -> Result<(), CliError> {
        Err(CliError::Validation {
            field: "photo".into(),
            reason: format!("{} records have no photo", Self::LABEL),
        })
    }
}

impl CliResource for Subject {
    const COMMAND: &'static str = "subjects";
}

impl CliResource for Segment {
    const COMMAND: &'static str = "segments";
}

impl CliResource for Client {
    const COMMAND: &'static str = "clients";
}

impl CliResource for Equipment {
    const COMMAND: &'static str = "equipment";
}

impl CliResource for ServiceCall {
    const COMMAND: &'static str = "calls";
}

impl CliResource for User {
    const COMMAND: &'static str = "users";

    fn attach_photo(&mut self, path: &Path) -> Result<(), CliError> {
        let photo = Attachment::from_path(path).map_err(|e| CliError::Validation {
            field: "photo".into(),
            reason: format!("cannot read {}: {e}", path.display()),
        })?;
        self.photo_upload = Some(photo);
        Ok(())
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle<R: CliResource>(args: ResourceArgs, ctx: &Context<'_>) -> Result<(), CliError> {
    let mut page = ctx.page::<R>();
    let in_command = |e| CliError::for_command(e, R::COMMAND);

    match args.command {
        ResourceCommand::List(list) => {
            check_sort_key::<R>(&list)?;
            page.load().await.map_err(in_command)?;
            util::apply_list_args(page.table_mut(), &list);

            let rows = page.table().displayed_data();
            let out = output::render_list(ctx.format, R::COLUMNS, &rows)?;
            output::print_output(&out, ctx.global.quiet);

            util::note_truncation(page.table(), page.messages());
            util::print_current(page.messages(), ctx);
            Ok(())
        }

        ResourceCommand::Get { id } => {
            let id = RecordId::from(id);
            let record = ctx
                .session
                .scoped(ctx.client.fetch_one::<R>(&id))
                .await
                .ok_or(CliError::Interrupted)?
                .map_err(in_command)?;
            let out = output::render_single(ctx.format, R::COLUMNS, &record)?;
            output::print_output(&out, ctx.global.quiet);
            Ok(())
        }

        ResourceCommand::Create(write) => {
            page.open_create().map_err(in_command)?;
            fill_draft(&mut page, &write)?;
            finish_submit(page.submit().await, &page, ctx)
        }

        ResourceCommand::Edit { id, write } => {
            let id = RecordId::from(id);
            page.load().await.map_err(in_command)?;
            page.open_edit(&id).map_err(in_command)?;
            fill_draft(&mut page, &write)?;
            finish_submit(page.submit().await, &page, ctx)
        }

        ResourceCommand::Delete { id } => {
            if !ctx.global.yes && !std::io::stdin().is_terminal() {
                return Err(CliError::NonInteractiveRequiresYes {
                    action: format!("{} delete", R::COMMAND),
                });
            }
            let id = RecordId::from(id);
            page.load().await.map_err(in_command)?;
            page.request_delete(&id).map_err(in_command)?;

            let confirmed = util::confirm(&format!("Delete {} {id}?", R::LABEL), ctx.global.yes)?;
            match page.confirm_delete(confirmed).await {
                DeleteOutcome::Deleted { .. } => {
                    util::print_current(page.messages(), ctx);
                    Ok(())
                }
                DeleteOutcome::Declined => {
                    page.messages().show_info("Delete cancelled");
                    util::print_current(page.messages(), ctx);
                    Ok(())
                }
                DeleteOutcome::Failed(err) => Err(in_command(err)),
                DeleteOutcome::Discarded => Err(CliError::Interrupted),
            }
        }
    }
}

// ── Helpers ─────────────────────────────────────────────────────────

fn check_sort_key<R: Resource>(list: &ListArgs) -> Result<(), CliError> {
    match list.sort {
        Some(ref key) if !R::COLUMNS.contains(&key.as_str()) => Err(CliError::Validation {
            field: "sort".into(),
            reason: format!(
                "'{key}' is not a {} column (expected one of: {})",
                R::LABEL,
                R::COLUMNS.join(", ")
            ),
        }),
        _ => Ok(()),
    }
}

/// Overwrite the open draft with `--set` values and an optional photo.
fn fill_draft<R: CliResource>(
    page: &mut EntityFormLifecycle<R>,
    write: &WriteArgs,
) -> Result<(), CliError> {
    let draft = page.draft_mut().ok_or_else(|| CliError::Internal {
        message: "no form is open".into(),
    })?;
    let mut updated = apply_fields(draft, &write.fields)?;
    if let Some(ref path) = write.photo {
        updated.attach_photo(path)?;
    }
    *draft = updated;
    Ok(())
}

fn finish_submit<R: CliResource>(
    outcome: SubmitOutcome,
    page: &EntityFormLifecycle<R>,
    ctx: &Context<'_>,
) -> Result<(), CliError> {
    match outcome {
        SubmitOutcome::Saved { .. } => {
            util::print_current(page.messages(), ctx);
            Ok(())
        }
        SubmitOutcome::Invalid(invalid) => Err(CliError::Validation {
            field: invalid.field.into(),
            reason: invalid.message,
        }),
        SubmitOutcome::Failed(err) => Err(CliError::for_command(err, R::COMMAND)),
        SubmitOutcome::Discarded => Err(CliError::Interrupted),
    }
}
