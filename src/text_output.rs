//! Human-readable fixed-width tables

use crate::render::render_cell;
use crate::report::{Align, Report, Table};

/// Render one table with notes above and a separator under the header
pub fn table_to_text(table: &Table) -> String {
    let rendered: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.cells.iter().map(render_cell).collect())
        .collect();

    let widths: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .map(|(idx, col)| {
            rendered
                .iter()
                .map(|cells| cells[idx].chars().count())
                .chain(std::iter::once(col.name.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let pad = |text: &str, idx: usize| -> String {
        match table.columns[idx].align {
            Align::Left => format!("{:<width$}", text, width = widths[idx]),
            Align::Right => format!("{:>width$}", text, width = widths[idx]),
        }
    };

    let mut out = String::new();
    out.push_str(&format!("=== {} ===\n", table.title));
    for note in &table.notes {
        out.push_str(note);
        out.push('\n');
    }

    let header: Vec<String> = table
        .columns
        .iter()
        .enumerate()
        .map(|(idx, col)| pad(&col.name, idx))
        .collect();
    out.push_str(&header.join("  "));
    out.push('\n');
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("  "));
    out.push('\n');

    for (row, cells) in table.rows.iter().zip(&rendered) {
        let line: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(idx, text)| pad(text, idx))
            .collect();
        out.push_str(line.join("  ").trim_end());
        if row.is_flagged() {
            out.push_str("  !");
        }
        out.push('\n');
    }
    out
}

/// Render every section of the report
pub fn report_to_text(report: &Report) -> String {
    if report.sections.is_empty() {
        return "No report sections generated.\n".to_string();
    }
    report
        .sections
        .iter()
        .map(table_to_text)
        .collect::<Vec<_>>()
        .join("\n")
}
