//! HTML output format for lifecycle reports
//!
//! Standalone document with embedded CSS. Rows flagged because of
//! inconsistent input are highlighted.

use crate::error::Severity;
use crate::render::render_cell;
use crate::report::{Align, Report, Row, Table};

/// HTML output formatter
#[derive(Debug)]
pub struct HtmlOutput<'a> {
    report: &'a Report,
}

impl<'a> HtmlOutput<'a> {
    pub fn new(report: &'a Report) -> Self {
        Self { report }
    }

    /// Escape HTML special characters to prevent XSS
    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }

    /// Generate embedded CSS styles
    fn generate_styles() -> &'static str {
        r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 20px;
            background-color: #f5f5f5;
        }
        h1, h2 {
            color: #333;
        }
        table {
            border-collapse: collapse;
            width: 100%;
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            margin-bottom: 20px;
        }
        th, td {
            border: 1px solid #ddd;
            padding: 8px;
            text-align: left;
        }
        th {
            background-color: #4a90d9;
            color: white;
            font-weight: bold;
        }
        tr:nth-child(even) {
            background-color: #f9f9f9;
        }
        tr:hover {
            background-color: #f0f0f0;
        }
        td.right {
            text-align: right;
            font-family: monospace;
        }
        tr.err-row td {
            background-color: #fbe3e4;
            color: #8a1f11;
        }
        .hint {
            font-size: 0.9em;
            color: #666;
            margin-bottom: 8px;
        }
        .err {
            color: #cc0000;
            font-weight: bold;
            margin-bottom: 8px;
        }
        .diagnostics li.high {
            color: #cc0000;
        }
        .footer {
            margin-top: 20px;
            font-size: 0.8em;
            color: #888;
            text-align: center;
        }
        "#
    }

    /// Generate HTML table header
    fn generate_header(table: &Table) -> String {
        let cells: Vec<String> = table
            .columns
            .iter()
            .map(|c| format!("<th>{}</th>", Self::escape_html(&c.name)))
            .collect();
        format!("<tr>{}</tr>", cells.join(""))
    }

    fn format_row(table: &Table, row: &Row) -> String {
        let cells: Vec<String> = row
            .cells
            .iter()
            .zip(&table.columns)
            .map(|(cell, col)| {
                let text = Self::escape_html(&render_cell(cell));
                match col.align {
                    Align::Right => format!(r#"<td class="right">{}</td>"#, text),
                    Align::Left => format!("<td>{}</td>", text),
                }
            })
            .collect();
        if row.is_flagged() {
            format!(r#"<tr class="err-row">{}</tr>"#, cells.join(""))
        } else {
            format!("<tr>{}</tr>", cells.join(""))
        }
    }

    fn render_table(table: &Table) -> String {
        let mut html = String::new();
        html.push_str(&format!("    <h2>{}</h2>\n", Self::escape_html(&table.title)));
        for note in &table.notes {
            let class = if note.starts_with("NOTE:") { "err" } else { "hint" };
            html.push_str(&format!(
                "    <div class=\"{}\">{}</div>\n",
                class,
                Self::escape_html(note)
            ));
        }
        html.push_str("    <table>\n        ");
        html.push_str(&Self::generate_header(table));
        html.push('\n');
        for row in &table.rows {
            html.push_str("        ");
            html.push_str(&Self::format_row(table, row));
            html.push('\n');
        }
        html.push_str("    </table>\n");
        html
    }

    fn render_diagnostics(&self) -> String {
        let mut html = String::new();
        html.push_str("    <h2>Diagnostics</h2>\n    <ul class=\"diagnostics\">\n");
        for diag in &self.report.diagnostics {
            let class = match diag.severity {
                Severity::Low => "low",
                Severity::High => "high",
            };
            html.push_str(&format!(
                "        <li class=\"{}\">{}</li>\n",
                class,
                Self::escape_html(&diag.to_string())
            ));
        }
        html.push_str("    </ul>\n");
        html
    }

    /// Generate complete HTML document
    pub fn to_html(&self) -> String {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n");
        html.push_str("<html lang=\"en\">\n");

        html.push_str("<head>\n");
        html.push_str("    <meta charset=\"UTF-8\">\n");
        html.push_str(
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html.push_str("    <title>Lifetrace Report</title>\n");
        html.push_str("    <style>");
        html.push_str(Self::generate_styles());
        html.push_str("</style>\n");
        html.push_str("</head>\n");

        html.push_str("<body>\n");
        html.push_str("    <h1>Component Lifecycle Report</h1>\n");

        for table in &self.report.sections {
            html.push_str(&Self::render_table(table));
        }

        if !self.report.diagnostics.is_empty() {
            html.push_str(&self.render_diagnostics());
        }

        html.push_str("    <div class=\"footer\">\n");
        html.push_str("        Generated by lifetrace\n");
        html.push_str("    </div>\n");

        html.push_str("</body>\n");
        html.push_str("</html>\n");

        html
    }
}
