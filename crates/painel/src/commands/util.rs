//! Shared helpers for command handlers.

use painel_core::{MessageBus, TableControls, Tabular};

use crate::cli::ListArgs;
use crate::error::CliError;
use crate::output;

use super::Context;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Apply `--search`, `--sort`/`--desc` and `--limit` to a table.
pub fn apply_list_args<T: Tabular>(table: &mut TableControls<T>, list: &ListArgs) {
    if let Some(ref term) = list.search {
        table.set_search_term(term.clone());
    }
    if let Some(ref key) = list.sort {
        table.sort(key);
        if list.desc {
            table.sort(key);
        }
    }
    if let Some(limit) = list.limit {
        table.set_records_per_page(usize::try_from(limit).unwrap_or(usize::MAX));
    }
}

/// Say so when the cap hid matching rows.
pub fn note_truncation<T: Tabular>(table: &TableControls<T>, messages: &MessageBus) {
    let shown = table.displayed_data().len();
    let total = table.processed_len();
    if shown < total {
        messages.show_info(format!(
            "Showing {shown} of {total} records; use --limit to see more"
        ));
    }
}

/// Print the page's current status message, if any.
pub fn print_current(messages: &MessageBus, ctx: &Context<'_>) {
    if let Some(message) = messages.current() {
        output::print_message(&message, ctx.color, ctx.global.quiet);
    }
}
