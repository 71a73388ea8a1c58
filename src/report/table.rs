// Typed tables handed to the presentation sinks
//
// Cells carry raw values only. Timestamps stay in epoch milliseconds and
// durations in milliseconds; rendering them is left to the sink.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Horizontal alignment hint for a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Right,
}

/// Column schema entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Human readable header
    pub name: String,
    /// Machine friendly key used by exports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_key: Option<String>,
    pub align: Align,
}

impl Column {
    pub fn new(name: &str, export_key: &str) -> Self {
        Self {
            name: name.to_string(),
            export_key: Some(export_key.to_string()),
            align: Align::Left,
        }
    }

    pub fn right(mut self) -> Self {
        self.align = Align::Right;
        self
    }

    /// Export key, falling back to the display name
    pub fn key(&self) -> &str {
        self.export_key.as_deref().unwrap_or(&self.name)
    }
}

/// A single typed value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Cell {
    /// No data from the source; distinct from zero
    Empty,
    Text(String),
    Int(i64),
    /// Integer percentage, may exceed 100 on malformed input
    Percent(i64),
    /// Milliseconds
    Duration(u64),
    /// Milliseconds since the Unix epoch
    Timestamp(i64),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Cell::Text(value.into())
    }

    pub fn int(value: u64) -> Self {
        Cell::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }

    pub fn opt_int(value: Option<u64>) -> Self {
        value.map_or(Cell::Empty, Cell::int)
    }

    pub fn opt_percent(value: Option<i64>) -> Self {
        value.map_or(Cell::Empty, Cell::Percent)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    fn numeric(&self) -> Option<i128> {
        match self {
            Cell::Int(v) | Cell::Percent(v) | Cell::Timestamp(v) => Some(*v as i128),
            Cell::Duration(v) => Some(*v as i128),
            Cell::Empty | Cell::Text(_) => None,
        }
    }

    /// Sort order used by tables: empty cells first, then numbers, then text
    pub fn compare(&self, other: &Cell) -> Ordering {
        match (self, other) {
            (Cell::Empty, Cell::Empty) => Ordering::Equal,
            (Cell::Empty, _) => Ordering::Less,
            (_, Cell::Empty) => Ordering::Greater,
            (Cell::Text(a), Cell::Text(b)) => a.cmp(b),
            (Cell::Text(_), _) => Ordering::Greater,
            (_, Cell::Text(_)) => Ordering::Less,
            (a, b) => a.numeric().cmp(&b.numeric()),
        }
    }
}

/// Styling hint attached to a whole row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStyle {
    /// Numbers in this row may be wrong because of inconsistent input
    Flagged,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    pub cells: Vec<Cell>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<RowStyle>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells, style: None }
    }

    pub fn flagged(mut self, flagged: bool) -> Self {
        self.style = flagged.then_some(RowStyle::Flagged);
        self
    }

    pub fn is_flagged(&self) -> bool {
        self.style == Some(RowStyle::Flagged)
    }
}

/// A titled table with its schema, rows and free-form notes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub title: String,
    /// Base name for exported files
    pub export_name: String,
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    pub notes: Vec<String>,
}

impl Table {
    pub fn new(title: &str, export_name: &str, columns: Vec<Column>) -> Self {
        Self {
            title: title.to_string(),
            export_name: export_name.to_string(),
            columns,
            rows: Vec::new(),
            notes: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Row) {
        debug_assert_eq!(row.cells.len(), self.columns.len());
        self.rows.push(row);
    }

    pub fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// Find a column by display name or export key
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|c| c.name == name || c.export_key.as_deref() == Some(name))
    }

    /// Stable sort of the rows on one column
    pub fn sort_by_column(&mut self, column: usize, descending: bool) {
        self.rows.sort_by(|a, b| {
            let ord = match (a.cells.get(column), b.cells.get(column)) {
                (Some(x), Some(y)) => x.compare(y),
                _ => Ordering::Equal,
            };
            if descending {
                ord.reverse()
            } else {
                ord
            }
        });
    }

    /// Sort on a named column; returns false if no such column exists
    pub fn sort_by(&mut self, name: &str, descending: bool) -> bool {
        match self.column_index(name) {
            Some(idx) => {
                self.sort_by_column(idx, descending);
                true
            }
            None => false,
        }
    }

    pub fn flagged_rows(&self) -> usize {
        self.rows.iter().filter(|r| r.is_flagged()).count()
    }
}
