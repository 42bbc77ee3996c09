//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders records in the format selected by `--output`. Tables are built
//! from the resource's column list, structured formats use serde, plain
//! emits one id per line.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{builder::Builder, settings::Style};

use painel_core::{FieldValue, Message, MessageKind, Tabular};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color ────────────────────────────────────────────────────────────

/// Determine whether color output should be enabled on stderr.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render rows in the chosen format. `columns` fixes table column order.
pub fn render_list<T>(format: OutputFormat, columns: &[&str], rows: &[&T]) -> Result<String, CliError>
where
    T: Serialize + Tabular,
{
    match format {
        OutputFormat::Table => Ok(render_table(columns, rows)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(rows)?),
        OutputFormat::JsonCompact => Ok(serde_json::to_string(rows)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(rows)?),
        OutputFormat::Plain => Ok(rows
            .iter()
            .filter_map(|r| r.record_id())
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// Render one record: an aligned `field  value` listing for tables.
pub fn render_single<T>(format: OutputFormat, columns: &[&str], item: &T) -> Result<String, CliError>
where
    T: Serialize + Tabular,
{
    match format {
        OutputFormat::Table => Ok(render_detail(columns, item)),
        OutputFormat::Plain => Ok(item.record_id().map(|id| id.to_string()).unwrap_or_default()),
        other => render_document(other, item, |_| Ok(String::new())),
    }
}

/// Render any serializable document; `text` renders table and plain output.
pub fn render_document<T: Serialize + ?Sized>(
    format: OutputFormat,
    data: &T,
    text: impl FnOnce(&T) -> Result<String, CliError>,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(data)?),
        OutputFormat::JsonCompact => Ok(serde_json::to_string(data)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(data)?),
        OutputFormat::Table | OutputFormat::Plain => text(data),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Print a status message to stderr. Errors are printed even when quiet.
pub fn print_message(message: &Message, color: bool, quiet: bool) {
    if quiet && message.kind != MessageKind::Error {
        return;
    }
    let tag = match message.kind {
        MessageKind::Success => "ok",
        MessageKind::Error => "error",
        MessageKind::Warning => "warning",
        MessageKind::Info => "info",
    };
    let tag = if color {
        match message.kind {
            MessageKind::Success => tag.green().bold().to_string(),
            MessageKind::Error => tag.red().bold().to_string(),
            MessageKind::Warning => tag.yellow().bold().to_string(),
            MessageKind::Info => tag.cyan().bold().to_string(),
        }
    } else {
        tag.to_owned()
    };
    eprintln!("{tag}: {}", message.text);
}

// ── Format-specific renderers ────────────────────────────────────────

fn cell(value: &FieldValue) -> String {
    value.to_string()
}

fn render_table<T: Tabular>(columns: &[&str], rows: &[&T]) -> String {
    let mut builder = Builder::default();
    builder.push_record(columns.iter().map(|c| (*c).to_owned()));
    for row in rows {
        builder.push_record(columns.iter().map(|c| cell(&row.field(c))));
    }
    builder.build().with(Style::rounded()).to_string()
}

fn render_detail<T: Tabular>(columns: &[&str], item: &T) -> String {
    let width = columns.iter().map(|c| c.len()).max().unwrap_or(0);
    columns
        .iter()
        .map(|c| {
            let value = item.field(c);
            let shown = if value.is_null() { "-".into() } else { cell(&value) };
            format!("{c:<width$}  {shown}")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use painel_core::DynamicRecord;

    fn rows() -> Vec<DynamicRecord> {
        vec![
            DynamicRecord::new().with("id", 1.0).with("nome", "Rede"),
            DynamicRecord::new().with("id", 2.0).with("nome", "Impressora"),
        ]
    }

    #[test]
    fn plain_lists_ids() {
        let data = rows();
        let refs: Vec<&DynamicRecord> = data.iter().collect();
        let out = render_list(OutputFormat::Plain, &["id", "nome"], &refs).unwrap();
        assert_eq!(out, "1\n2");
    }

    #[test]
    fn table_has_header_and_cells() {
        let data = rows();
        let refs: Vec<&DynamicRecord> = data.iter().collect();
        let out = render_list(OutputFormat::Table, &["id", "nome"], &refs).unwrap();
        assert!(out.contains("nome"));
        assert!(out.contains("Impressora"));
    }

    #[test]
    fn detail_marks_missing_values() {
        let rec = DynamicRecord::new().with("id", 3.0);
        let out = render_single(OutputFormat::Table, &["id", "nome"], &rec).unwrap();
        assert_eq!(out, "id    3\nnome  -");
    }
}
