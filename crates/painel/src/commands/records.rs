//! Schemaless listing of any endpoint.

use painel_core::{DynamicRecord, MessageBus, TableControls, TableState};

use crate::cli::RecordsArgs;
use crate::error::CliError;
use crate::output;

use super::{Context, util};

pub async fn handle(args: RecordsArgs, ctx: &Context<'_>) -> Result<(), CliError> {
    let rows = ctx
        .session
        .scoped(ctx.client.fetch_records(&args.endpoint))
        .await
        .ok_or(CliError::Interrupted)??;
    tracing::debug!(endpoint = %args.endpoint, count = rows.len(), "records fetched");

    let messages = MessageBus::new(ctx.settings.message_delay);
    let mut table = TableControls::with_state(
        rows,
        TableState::with_records_per_page(ctx.settings.records_per_page),
    );

    let columns = union_of_keys(table.data());
    let unknown_sort = args
        .list
        .sort
        .as_ref()
        .filter(|key| !columns.is_empty() && !columns.contains(*key));
    if let Some(key) = unknown_sort {
        return Err(CliError::Validation {
            field: "sort".into(),
            reason: format!("no record has a '{key}' field"),
        });
    }
    util::apply_list_args(&mut table, &args.list);

    let cols: Vec<&str> = columns.iter().map(String::as_str).collect();
    let shown = table.displayed_data();
    let out = output::render_list(ctx.format, &cols, &shown)?;
    output::print_output(&out, ctx.global.quiet);

    util::note_truncation(&table, &messages);
    util::print_current(&messages, ctx);
    Ok(())
}

/// Column names in first-seen order across all rows.
fn union_of_keys(rows: &[DynamicRecord]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for key in rows.iter().flat_map(DynamicRecord::keys) {
        if !columns.iter().any(|c| c == key) {
            columns.push(key.to_owned());
        }
    }
    // Keep `id` leading when present.
    if let Some(pos) = columns.iter().position(|c| c == "id") {
        let id = columns.remove(pos);
        columns.insert(0, id);
    }
    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_follow_first_appearance_with_id_first() {
        let rows = vec![
            DynamicRecord::new().with("nome", "a").with("id", 1.0),
            DynamicRecord::new().with("cidade", "Recife").with("nome", "b"),
        ];
        assert_eq!(union_of_keys(&rows), vec!["id", "nome", "cidade"]);
    }

    #[test]
    fn no_rows_no_columns() {
        assert!(union_of_keys(&[]).is_empty());
    }
}
