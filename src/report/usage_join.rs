// Usage history joined with the package inventory and lifecycle statistics
//
// Every inventory entry yields one row. A package missing from either source
// keeps the affected cells unset rather than zero.

use crate::error::{InputSource, ReportError, Result};
use crate::inventory::PackageInventoryEntry;
use crate::lifecycle_index::LifecycleIndex;
use crate::report::table::{Cell, Column, Row, Table};
use crate::stats::percent_of;
use crate::usage::UsageHistoryIndex;
use serde::Serialize;

pub const TITLE: &str = "Usage history";
pub const EXPORT_NAME: &str = "usage_history_vs_log";

pub const MS_PER_DAY: i64 = 86_400_000;

/// Joined statistics for one installed package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageRow {
    pub package: String,
    pub is_system: bool,
    /// Last time any component of the package was referenced
    pub last_used: Option<i64>,
    /// Whole days between `last_used` and the reference time
    pub age_days: Option<i64>,
    pub services_started: Option<u64>,
    pub max_created_time: Option<u64>,
    pub created_time_percent: Option<i64>,
}

impl UsageRow {
    fn into_row(self) -> Row {
        let type_label = if self.is_system { "System" } else { "Installed" };
        Row::new(vec![
            Cell::Text(self.package),
            Cell::text(type_label),
            self.last_used.map_or(Cell::Empty, Cell::Timestamp),
            self.age_days.map_or(Cell::Empty, Cell::Int),
            Cell::opt_int(self.services_started),
            Cell::opt_int(self.max_created_time),
            Cell::opt_percent(self.created_time_percent),
        ])
    }
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("Package", "pkg"),
        Column::new("Type", "type"),
        Column::new("Last used", "last_used"),
        Column::new("Age", "age").right(),
        Column::new("Services started", "services_started").right(),
        Column::new("Max created time(ms)", "created_time_max_ms").right(),
        Column::new("Max created time(%)", "created_time_max_p").right(),
    ]
}

/// Whole days elapsed from `then` to `now`, rounded toward negative infinity
///
/// `None` when the span does not fit in an `i64`.
pub fn age_in_days(now: i64, then: i64) -> Option<i64> {
    now.checked_sub(then).map(|span| span.div_euclid(MS_PER_DAY))
}

/// Cross-source join over already built indexes
#[derive(Debug, Clone, Copy)]
pub struct UsageJoin<'a> {
    lifecycle: Option<&'a LifecycleIndex>,
    usage: &'a UsageHistoryIndex,
}

impl<'a> UsageJoin<'a> {
    pub fn new(lifecycle: Option<&'a LifecycleIndex>, usage: &'a UsageHistoryIndex) -> Self {
        Self { lifecycle, usage }
    }

    /// One row per inventory entry, in inventory order
    ///
    /// `now` is the reference time for the age column. Fails with
    /// `MissingInput` when lifecycle statistics or the inventory are absent.
    pub fn rows(&self, inventory: &[PackageInventoryEntry], now: i64) -> Result<Vec<UsageRow>> {
        let lifecycle = match self.lifecycle {
            Some(index) if !index.is_empty() => index,
            _ => {
                return Err(ReportError::missing(
                    InputSource::EventTrace,
                    "cannot find lifecycle statistics",
                ))
            }
        };
        if inventory.is_empty() {
            return Err(ReportError::missing(
                InputSource::PackageInventory,
                "cannot find package list",
            ));
        }

        let duration = lifecycle.duration();
        let rows = inventory
            .iter()
            .map(|pkg| {
                let last_used = self.usage.last_referenced_time(&pkg.name);
                let group = lifecycle.package(&pkg.name).filter(|g| !g.is_empty());
                let max_created_time = group.as_ref().map(|g| g.max_created_time());
                UsageRow {
                    package: pkg.name.clone(),
                    is_system: pkg.is_system,
                    last_used,
                    age_days: last_used.and_then(|lrt| age_in_days(now, lrt)),
                    services_started: group.as_ref().map(|g| g.services_started()),
                    max_created_time,
                    created_time_percent: max_created_time.and_then(|m| percent_of(m, duration)),
                }
            })
            .collect();
        Ok(rows)
    }

    /// Joined rows as a table sorted by package name
    pub fn table(&self, inventory: &[PackageInventoryEntry], now: i64) -> Result<Table> {
        let rows = self.rows(inventory, now)?;
        let mut table = Table::new(TITLE, EXPORT_NAME, columns());
        table.note(
            "(Note: the age is calculated using as reference the time when the report was generated)",
        );
        let joined = rows.len();
        for row in rows {
            table.push(row.into_row());
        }
        table.sort_by_column(0, false);
        tracing::info!(rows = joined, "usage history table generated");
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventKind, EventTrace, LifecycleEvent};
    use crate::usage::UsageRecord;

    const NOW: i64 = 1_700_000_000_000;

    fn lifecycle() -> LifecycleIndex {
        use EventKind::{Create, Destroy};
        LifecycleIndex::build(&EventTrace::new(
            0,
            1000,
            vec![
                LifecycleEvent::new(0, Create, "app.bar/A"),
                LifecycleEvent::new(250, Destroy, "app.bar/A"),
                LifecycleEvent::new(300, Create, "app.bar/B"),
                LifecycleEvent::new(400, Destroy, "app.bar/B"),
                LifecycleEvent::new(500, Create, "app.bar/A"),
                LifecycleEvent::new(600, Destroy, "app.bar/A"),
            ],
        ))
    }

    fn usage() -> UsageHistoryIndex {
        UsageHistoryIndex::from_records(vec![UsageRecord {
            package: "app.foo".to_string(),
            component: "app.foo/A".to_string(),
            last_referenced_time: NOW - MS_PER_DAY,
        }])
    }

    #[test]
    fn test_usage_only_package() {
        let lifecycle = lifecycle();
        let usage = usage();
        let join = UsageJoin::new(Some(&lifecycle), &usage);
        let rows = join
            .rows(&[PackageInventoryEntry::new("app.foo", false)], NOW)
            .unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.age_days, Some(1));
        assert_eq!(row.last_used, Some(NOW - MS_PER_DAY));
        assert_eq!(row.services_started, None);
        assert_eq!(row.max_created_time, None);
        assert_eq!(row.created_time_percent, None);
    }

    #[test]
    fn test_lifecycle_only_package() {
        let lifecycle = lifecycle();
        let usage = usage();
        let join = UsageJoin::new(Some(&lifecycle), &usage);
        let rows = join
            .rows(&[PackageInventoryEntry::new("app.bar", true)], NOW)
            .unwrap();
        let row = &rows[0];
        assert_eq!(row.last_used, None);
        assert_eq!(row.age_days, None);
        assert_eq!(row.services_started, Some(3));
        assert_eq!(row.max_created_time, Some(250));
        assert_eq!(row.created_time_percent, Some(25));
    }

    #[test]
    fn test_rows_follow_inventory_order() {
        let lifecycle = lifecycle();
        let usage = usage();
        let join = UsageJoin::new(Some(&lifecycle), &usage);
        let inventory = vec![
            PackageInventoryEntry::new("zeta", false),
            PackageInventoryEntry::new("app.foo", false),
        ];
        let rows = join.rows(&inventory, NOW).unwrap();
        let names: Vec<_> = rows.iter().map(|r| r.package.as_str()).collect();
        assert_eq!(names, vec!["zeta", "app.foo"]);
    }

    #[test]
    fn test_table_sorted_by_package() {
        let lifecycle = lifecycle();
        let usage = usage();
        let join = UsageJoin::new(Some(&lifecycle), &usage);
        let inventory = vec![
            PackageInventoryEntry::new("zeta", false),
            PackageInventoryEntry::new("app.foo", false),
            PackageInventoryEntry::new("Zulu", true),
        ];
        let table = join.table(&inventory, NOW).unwrap();
        let names: Vec<_> = table.rows.iter().map(|r| r.cells[0].clone()).collect();
        assert_eq!(
            names,
            vec![Cell::text("Zulu"), Cell::text("app.foo"), Cell::text("zeta")]
        );
        assert_eq!(table.rows[0].cells[1], Cell::text("System"));
        assert_eq!(table.rows[2].cells[2], Cell::Empty);
    }

    #[test]
    fn test_empty_inventory_is_missing_input() {
        let lifecycle = lifecycle();
        let usage = usage();
        let join = UsageJoin::new(Some(&lifecycle), &usage);
        let err = join.rows(&[], NOW).unwrap_err();
        assert_eq!(err.input(), InputSource::PackageInventory);
    }

    #[test]
    fn test_missing_lifecycle_is_missing_input() {
        let usage = usage();
        let inventory = [PackageInventoryEntry::new("app.foo", false)];
        let err = UsageJoin::new(None, &usage).rows(&inventory, NOW).unwrap_err();
        assert_eq!(err.input(), InputSource::EventTrace);

        let empty = LifecycleIndex::default();
        let err = UsageJoin::new(Some(&empty), &usage)
            .rows(&inventory, NOW)
            .unwrap_err();
        assert_eq!(err.input(), InputSource::EventTrace);
    }

    #[test]
    fn test_age_overflow_leaves_cell_unset() {
        let lifecycle = lifecycle();
        let usage = UsageHistoryIndex::from_records(vec![UsageRecord {
            package: "app.foo".to_string(),
            component: "app.foo/A".to_string(),
            last_referenced_time: i64::MIN,
        }]);
        let rows = UsageJoin::new(Some(&lifecycle), &usage)
            .rows(&[PackageInventoryEntry::new("app.foo", false)], NOW)
            .unwrap();
        assert_eq!(rows[0].last_used, Some(i64::MIN));
        assert_eq!(rows[0].age_days, None);
        assert_eq!(age_in_days(NOW, i64::MIN), None);
    }

    #[test]
    fn test_age_rounds_down() {
        assert_eq!(age_in_days(NOW, NOW), Some(0));
        assert_eq!(age_in_days(NOW, NOW - MS_PER_DAY + 1), Some(0));
        assert_eq!(age_in_days(NOW, NOW - 3 * MS_PER_DAY - 5), Some(3));
        // last use after the reference time
        assert_eq!(age_in_days(NOW, NOW + 1), Some(-1));
    }
}
