//! CSV output format for report tables
//!
//! One CSV document per table, headed by the columns' export keys.

use crate::render::render_cell;
use crate::report::{Report, Row, Table};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// CSV output formatter for a single table
#[derive(Debug)]
pub struct CsvOutput<'a> {
    table: &'a Table,
}

impl<'a> CsvOutput<'a> {
    pub fn new(table: &'a Table) -> Self {
        Self { table }
    }

    /// Header row from the column export keys
    fn header(&self) -> String {
        self.table
            .columns
            .iter()
            .map(|c| Self::escape_field(c.key()))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains(',') || field.contains('"') || field.contains('\n') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn format_row(row: &Row) -> String {
        row.cells
            .iter()
            .map(|cell| Self::escape_field(&render_cell(cell)))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::new();
        output.push_str(&self.header());
        output.push('\n');
        for row in &self.table.rows {
            output.push_str(&Self::format_row(row));
            output.push('\n');
        }
        output
    }
}

/// All tables of a report, each preceded by a `# title` line
pub fn report_to_csv(report: &Report) -> String {
    let mut output = String::new();
    for (idx, table) in report.sections.iter().enumerate() {
        if idx > 0 {
            output.push('\n');
        }
        output.push_str(&format!("# {}\n", table.title));
        output.push_str(&CsvOutput::new(table).to_csv());
    }
    output
}

/// Write `<export_name>.csv` for every table into `dir`
pub fn export_report(report: &Report, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create CSV directory {}", dir.display()))?;
    let mut written = Vec::new();
    for table in &report.sections {
        let path = dir.join(format!("{}.csv", table.export_name));
        fs::write(&path, CsvOutput::new(table).to_csv())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!(path = %path.display(), rows = table.rows.len(), "CSV exported");
        written.push(path);
    }
    Ok(written)
}
