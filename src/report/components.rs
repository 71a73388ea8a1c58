// Per-component lifecycle report
//
// One row per component seen in the event trace, not grouped by package.
// Components whose event sequence was inconsistent are flagged.

use crate::error::{InputSource, ReportError, Result};
use crate::lifecycle_index::LifecycleIndex;
use crate::report::table::{Cell, Column, Row, Table};
use crate::stats::{percent_of, ComponentStat};
use regex::Regex;

pub const TITLE: &str = "Component lifecycle stats";
pub const EXPORT_NAME: &str = "component_lifecycle";

fn columns() -> Vec<Column> {
    vec![
        Column::new("Proc", "proc"),
        Column::new("Created count", "created_count").right(),
        Column::new("Total created time", "created_time_total").right(),
        Column::new("Total created time(ms)", "created_time_total_ms").right(),
        Column::new("Total created time(%)", "created_time_total_p").right(),
        Column::new("Max created time(ms)", "created_time_max_ms").right(),
        Column::new("Avg created time(ms)", "created_time_avg_ms").right(),
        Column::new("Restart count", "restart_count").right(),
        Column::new("Min restart time(ms)", "restart_time_min_ms").right(),
        Column::new("Avg restart time(ms)", "restart_time_avg_ms").right(),
        Column::new("Restart after kill count", "kill_restart_count").right(),
        Column::new("Min restart after kill time(ms)", "kill_restart_time_min_ms").right(),
        Column::new("Avg restart after kill time(ms)", "kill_restart_time_avg_ms").right(),
        Column::new("Errors", "errors").right(),
    ]
}

fn component_row(stat: &ComponentStat, duration: i64) -> Row {
    Row::new(vec![
        Cell::text(stat.component.as_str()),
        Cell::int(stat.count),
        Cell::Duration(stat.total_time),
        Cell::int(stat.total_time),
        Cell::opt_percent(percent_of(stat.total_time, duration)),
        Cell::int(stat.max_time),
        Cell::opt_int(stat.avg_time()),
        Cell::int(stat.restart_count),
        Cell::opt_int(stat.min_restart_time),
        Cell::opt_int(stat.avg_restart_time()),
        Cell::int(stat.bg_kill_restart_count),
        Cell::opt_int(stat.min_bg_kill_restart_time),
        Cell::opt_int(stat.avg_bg_kill_restart_time()),
        Cell::int(stat.errors),
    ])
    .flagged(stat.has_errors())
}

/// Build the per-component table, optionally restricted to components whose
/// identifier matches `filter`
///
/// Fails with `MissingInput` when the trace had no lifecycle events or its
/// window is empty.
pub fn component_table(index: &LifecycleIndex, filter: Option<&Regex>) -> Result<Table> {
    if index.is_empty() {
        return Err(ReportError::missing(
            InputSource::EventTrace,
            "no lifecycle events in the event log",
        ));
    }
    let duration = index.duration();
    if duration <= 0 {
        return Err(ReportError::missing(
            InputSource::EventTrace,
            "event log too short",
        ));
    }

    let mut table = Table::new(TITLE, EXPORT_NAME, columns());
    table.note(format!("(Duration {}ms)", duration));

    let mut errors = 0;
    for stat in index.components() {
        if filter.is_some_and(|re| !re.is_match(stat.component.as_str())) {
            continue;
        }
        errors += stat.errors;
        table.push(component_row(stat, duration));
    }

    if errors > 0 {
        table.note(format!(
            "NOTE: {} errors/inconsistencies found in the log, statistics might not be correct! \
             The affected components have been highlighted.",
            errors
        ));
    }

    table.sort_by_column(0, false);
    tracing::info!(rows = table.rows.len(), errors, "component table generated");
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventKind, EventTrace, LifecycleEvent};

    fn index() -> LifecycleIndex {
        use EventKind::{Create, Destroy, DestroyLowMemoryKill};
        LifecycleIndex::build(&EventTrace::new(
            0,
            1000,
            vec![
                LifecycleEvent::new(0, Create, "app.foo/Svc"),
                LifecycleEvent::new(100, DestroyLowMemoryKill, "app.foo/Svc"),
                LifecycleEvent::new(150, Create, "app.foo/Svc"),
                LifecycleEvent::new(400, Destroy, "app.foo/Svc"),
                LifecycleEvent::new(10, Create, "broken"),
                LifecycleEvent::new(20, Create, "broken"),
                LifecycleEvent::new(30, Destroy, "broken"),
            ],
        ))
    }

    #[test]
    fn test_rows_and_values() {
        let table = component_table(&index(), None).unwrap();
        assert_eq!(table.rows.len(), 2);
        let svc = &table.rows[0];
        assert_eq!(svc.cells[0], Cell::text("app.foo/Svc"));
        assert_eq!(svc.cells[1], Cell::Int(2));
        assert_eq!(svc.cells[2], Cell::Duration(350));
        assert_eq!(svc.cells[3], Cell::Int(350));
        assert_eq!(svc.cells[4], Cell::Percent(35));
        assert_eq!(svc.cells[5], Cell::Int(250));
        assert_eq!(svc.cells[6], Cell::Int(175));
        assert_eq!(svc.cells[7], Cell::Int(0));
        assert_eq!(svc.cells[8], Cell::Empty);
        assert_eq!(svc.cells[9], Cell::Empty);
        assert_eq!(svc.cells[10], Cell::Int(1));
        assert_eq!(svc.cells[11], Cell::Int(50));
        assert_eq!(svc.cells[12], Cell::Int(50));
        assert!(!svc.is_flagged());
    }

    #[test]
    fn test_anomalous_component_flagged() {
        let table = component_table(&index(), None).unwrap();
        let broken = &table.rows[1];
        assert_eq!(broken.cells[0], Cell::text("broken"));
        assert_eq!(broken.cells[13], Cell::Int(1));
        assert!(broken.is_flagged());
        assert!(table.notes.iter().any(|n| n.contains("1 errors")));
    }

    #[test]
    fn test_duration_note() {
        let table = component_table(&index(), None).unwrap();
        assert_eq!(table.notes[0], "(Duration 1000ms)");
    }

    #[test]
    fn test_filter_restricts_rows() {
        let re = Regex::new("^app\\.").unwrap();
        let table = component_table(&index(), Some(&re)).unwrap();
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.notes.len(), 1);
    }

    #[test]
    fn test_empty_index_is_missing_input() {
        let err = component_table(&LifecycleIndex::default(), None).unwrap_err();
        assert!(matches!(err, ReportError::MissingInput { .. }));
    }

    #[test]
    fn test_zero_duration_window() {
        let index = LifecycleIndex::build(&EventTrace::new(
            500,
            500,
            vec![LifecycleEvent::new(500, EventKind::Create, "p")],
        ));
        let err = component_table(&index, None).unwrap_err();
        assert!(err.to_string().contains("too short"));
    }
}
