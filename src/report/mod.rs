// Report sections derived from the lifecycle and usage indexes
//
// - components: per-component lifecycle table, anomalous rows flagged
// - usage_join: usage history joined with the package inventory and the
//   package-grouped lifecycle statistics
// - builder: assembles the sections and collects diagnostics
//
// Everything here produces plain typed tables; rendering lives in the
// *_output modules.

mod builder;
mod components;
mod table;
mod usage_join;

pub use builder::{Report, ReportBuilder, Source};
pub use components::component_table;
pub use table::{Align, Cell, Column, Row, RowStyle, Table};
pub use usage_join::{age_in_days, UsageJoin, UsageRow, MS_PER_DAY};

/// Export names of the generated sections
pub mod sections {
    pub use super::components::EXPORT_NAME as COMPONENTS;
    pub use super::usage_join::EXPORT_NAME as USAGE;
}
