//! JSON output format for lifecycle reports

use crate::error::Diagnostic;
use crate::report::{Report, Table};
use serde::Serialize;

/// Root JSON output structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput<'a> {
    /// Format version identifier
    pub version: String,
    /// Format name
    pub format: String,
    /// Reference time used for usage ages (ms since the Unix epoch)
    pub generated_at_ms: i64,
    pub sections: &'a [Table],
    pub diagnostics: &'a [Diagnostic],
}

impl<'a> JsonOutput<'a> {
    pub fn new(report: &'a Report, generated_at_ms: i64) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "lifetrace-json-v1".to_string(),
            generated_at_ms,
            sections: &report.sections,
            diagnostics: &report.diagnostics,
        }
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Severity;
    use crate::report::{Cell, Column, Row};

    fn report() -> Report {
        let mut table = Table::new("Usage history", "usage_history_vs_log", vec![
            Column::new("Package", "pkg"),
            Column::new("Age", "age").right(),
        ]);
        table.push(Row::new(vec![Cell::text("com.mail"), Cell::Empty]));
        Report {
            sections: vec![table],
            diagnostics: vec![Diagnostic {
                severity: Severity::Low,
                message: "missing event trace: not supplied".to_string(),
            }],
        }
    }

    #[test]
    fn test_json_output_structure() {
        let report = report();
        let json = JsonOutput::new(&report, 42).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["format"], "lifetrace-json-v1");
        assert_eq!(value["generated_at_ms"], 42);
        assert_eq!(value["sections"][0]["export_name"], "usage_history_vs_log");
        assert_eq!(value["sections"][0]["columns"][1]["align"], "right");
        assert_eq!(value["diagnostics"][0]["severity"], "low");
    }

    #[test]
    fn test_json_empty_cell_is_distinct_from_zero() {
        let report = report();
        let json = JsonOutput::new(&report, 0).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let cell = &value["sections"][0]["rows"][0]["cells"][1];
        assert_eq!(cell["type"], "empty");
        assert!(cell.get("value").is_none());
    }

    #[test]
    fn test_json_unflagged_row_has_no_style() {
        let report = report();
        let json = JsonOutput::new(&report, 0).to_json().unwrap();
        assert!(!json.contains("\"style\""));
    }
}
