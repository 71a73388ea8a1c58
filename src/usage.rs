//! Usage history: when each package's components were last referenced

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Last-run time of one component, as recorded by the usage history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub package: String,
    pub component: String,
    /// Last referenced time, ms since the Unix epoch
    pub last_referenced_time: i64,
}

/// Usage of one package folded over its component records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageUsage {
    pub package: String,
    pub last_referenced_time: i64,
    pub components: Vec<UsageRecord>,
}

/// Package name to [`PackageUsage`]
#[derive(Debug, Default)]
pub struct UsageHistoryIndex {
    packages: HashMap<String, PackageUsage>,
}

impl UsageHistoryIndex {
    /// Fold well-formed records, keeping the latest time per package
    pub fn from_records(records: impl IntoIterator<Item = UsageRecord>) -> Self {
        let mut packages: HashMap<String, PackageUsage> = HashMap::new();
        for record in records {
            let usage = packages
                .entry(record.package.clone())
                .or_insert_with(|| PackageUsage {
                    package: record.package.clone(),
                    last_referenced_time: record.last_referenced_time,
                    components: Vec::new(),
                });
            usage.last_referenced_time = usage.last_referenced_time.max(record.last_referenced_time);
            usage.components.push(record);
        }
        tracing::debug!(packages = packages.len(), "usage history indexed");
        Self { packages }
    }

    pub fn get(&self, package: &str) -> Option<&PackageUsage> {
        self.packages.get(package)
    }

    pub fn last_referenced_time(&self, package: &str) -> Option<i64> {
        self.get(package).map(|u| u.last_referenced_time)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn packages(&self) -> impl Iterator<Item = &PackageUsage> {
        self.packages.values()
    }
}
