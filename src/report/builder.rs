// Report assembly
//
// Sources are handed in already loaded. A source that is absent or broken
// removes the sections depending on it and leaves a diagnostic behind; the
// remaining sections are still generated.

use crate::error::{Diagnostic, InputSource, ReportError, Severity};
use crate::event::EventTrace;
use crate::inventory::PackageInventoryEntry;
use crate::lifecycle_index::LifecycleIndex;
use crate::report::components::component_table;
use crate::report::table::Table;
use crate::report::usage_join::UsageJoin;
use crate::usage::{UsageHistoryIndex, UsageRecord};
use regex::Regex;
use serde::Serialize;

/// Output of one report run
#[derive(Debug, Clone, Default, Serialize)]
pub struct Report {
    pub sections: Vec<Table>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn section(&self, export_name: &str) -> Option<&Table> {
        self.sections.iter().find(|t| t.export_name == export_name)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::High)
    }
}

/// A source as handed to the builder: not supplied, or the loader's verdict
pub type Source<T> = Option<Result<T, ReportError>>;

/// Builds a [`Report`] from the three data sources
#[derive(Debug)]
pub struct ReportBuilder {
    now_ms: i64,
    trace: Source<EventTrace>,
    usage: Source<Vec<UsageRecord>>,
    inventory: Source<Vec<PackageInventoryEntry>>,
    component_filter: Option<Regex>,
    usage_sort: Option<(String, bool)>,
}

impl ReportBuilder {
    /// `now_ms` is the reference time for usage ages
    pub fn new(now_ms: i64) -> Self {
        Self {
            now_ms,
            trace: None,
            usage: None,
            inventory: None,
            component_filter: None,
            usage_sort: None,
        }
    }

    pub fn trace(mut self, trace: Result<EventTrace, ReportError>) -> Self {
        self.trace = Some(trace);
        self
    }

    pub fn usage(mut self, records: Result<Vec<UsageRecord>, ReportError>) -> Self {
        self.usage = Some(records);
        self
    }

    pub fn inventory(mut self, packages: Result<Vec<PackageInventoryEntry>, ReportError>) -> Self {
        self.inventory = Some(packages);
        self
    }

    pub fn component_filter(mut self, filter: Option<Regex>) -> Self {
        self.component_filter = filter;
        self
    }

    /// Column and direction for the usage table (default: package ascending)
    pub fn usage_sort(mut self, column: impl Into<String>, descending: bool) -> Self {
        self.usage_sort = Some((column.into(), descending));
        self
    }

    pub fn build(self) -> Report {
        let mut out = Diagnostics::default();

        let lifecycle = match self.trace {
            Some(Ok(trace)) if trace.is_empty() => {
                out.report(&ReportError::missing(
                    InputSource::EventTrace,
                    "no lifecycle events in the event log",
                ));
                None
            }
            Some(Ok(trace)) => Some(LifecycleIndex::build(&trace)),
            Some(Err(err)) => {
                out.report(&err);
                None
            }
            None => {
                out.report(&ReportError::missing(InputSource::EventTrace, "not supplied"));
                None
            }
        };

        let mut sections = Vec::new();
        if let Some(index) = &lifecycle {
            match component_table(index, self.component_filter.as_ref()) {
                Ok(table) => sections.push(table),
                Err(err) => out.report(&err),
            }
        }

        let usage = match self.usage {
            Some(Ok(records)) => Some(UsageHistoryIndex::from_records(records)),
            Some(Err(err)) => {
                out.report(&err);
                None
            }
            None => {
                out.report(&ReportError::missing(InputSource::UsageHistory, "not supplied"));
                None
            }
        };

        if let Some(usage) = &usage {
            let inventory = match self.inventory {
                Some(Ok(packages)) => packages,
                Some(Err(err)) => {
                    out.report(&err);
                    Vec::new()
                }
                None => Vec::new(),
            };
            match UsageJoin::new(lifecycle.as_ref(), usage).table(&inventory, self.now_ms) {
                Ok(mut table) => {
                    if let Some((column, descending)) = &self.usage_sort {
                        if !table.sort_by(column, *descending) {
                            tracing::warn!(column = %column, "unknown sort column, keeping package order");
                        }
                    }
                    sections.push(table);
                }
                Err(err) => out.report(&err),
            }
        }

        Report {
            sections,
            diagnostics: out.into_inner(),
        }
    }
}

/// Collects diagnostics, at most one per data source
#[derive(Debug, Default)]
struct Diagnostics {
    reported: Vec<InputSource>,
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    fn report(&mut self, err: &ReportError) {
        if self.reported.contains(&err.input()) {
            tracing::debug!(%err, "condition already reported for this source");
            return;
        }
        match err.severity() {
            Severity::Low => tracing::warn!("{}", err),
            Severity::High => tracing::error!("{}", err),
        }
        self.reported.push(err.input());
        self.items.push(Diagnostic::from(err));
    }

    fn into_inner(self) -> Vec<Diagnostic> {
        self.items
    }
}
