//! Index of component lifecycle statistics built from a complete event trace

use crate::event::{ComponentId, EventTrace};
use crate::stats::ComponentStat;
use std::collections::HashMap;

/// Finished per-component statistics for one observation window
#[derive(Debug, Default)]
pub struct LifecycleIndex {
    first_ts: i64,
    last_ts: i64,
    /// Components in first-seen order
    stats: Vec<ComponentStat>,
    by_component: HashMap<String, usize>,
    by_package: HashMap<String, Vec<usize>>,
}

impl LifecycleIndex {
    /// Consume every event in the trace, then finish all components at the
    /// end of the window
    pub fn build(trace: &EventTrace) -> Self {
        let mut stats: Vec<ComponentStat> = Vec::new();
        let mut by_component: HashMap<String, usize> = HashMap::new();

        for event in trace.events() {
            let idx = *by_component
                .entry(event.component.as_str().to_string())
                .or_insert_with(|| {
                    stats.push(ComponentStat::new(event.component.clone()));
                    stats.len() - 1
                });
            stats[idx].record(event);
        }

        for stat in &mut stats {
            stat.finish(trace.last_ts());
        }

        let mut by_package: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, stat) in stats.iter().enumerate() {
            if let Some(package) = stat.component.package() {
                by_package.entry(package.to_string()).or_default().push(idx);
            }
        }

        let errors: u64 = stats.iter().map(|s| s.errors).sum();
        tracing::info!(
            events = trace.len(),
            components = stats.len(),
            packages = by_package.len(),
            errors,
            "lifecycle index built"
        );

        Self {
            first_ts: trace.first_ts(),
            last_ts: trace.last_ts(),
            stats,
            by_component,
            by_package,
        }
    }

    pub fn first_ts(&self) -> i64 {
        self.first_ts
    }

    pub fn last_ts(&self) -> i64 {
        self.last_ts
    }

    /// Observed duration of the trace in milliseconds
    pub fn duration(&self) -> i64 {
        self.last_ts.saturating_sub(self.first_ts)
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    /// All component statistics in first-seen order
    pub fn components(&self) -> impl Iterator<Item = &ComponentStat> {
        self.stats.iter()
    }

    pub fn get(&self, component: &str) -> Option<&ComponentStat> {
        self.by_component.get(component).map(|&idx| &self.stats[idx])
    }

    /// Components owned by `package`, in first-seen order
    ///
    /// Returns `None` when no component of the package appears in the trace.
    pub fn package(&self, package: &str) -> Option<PackageLifecycle<'_>> {
        self.by_package
            .get_key_value(package)
            .map(|(package, indices)| PackageLifecycle {
                package: package.as_str(),
                members: indices.iter().map(|&idx| &self.stats[idx]).collect(),
            })
    }

    /// Every package that owns at least one component, in no particular order
    pub fn packages(&self) -> impl Iterator<Item = PackageLifecycle<'_>> {
        self.by_package.iter().map(|(package, indices)| PackageLifecycle {
            package: package.as_str(),
            members: indices.iter().map(|&idx| &self.stats[idx]).collect(),
        })
    }

    /// Sum of anomalies over all components
    pub fn total_errors(&self) -> u64 {
        self.stats.iter().map(|s| s.errors).sum()
    }

    pub fn contains(&self, component: &ComponentId) -> bool {
        self.by_component.contains_key(component.as_str())
    }
}

/// Read-only view of the components sharing an owning package
#[derive(Debug, Clone)]
pub struct PackageLifecycle<'a> {
    pub package: &'a str,
    pub members: Vec<&'a ComponentStat>,
}

impl PackageLifecycle<'_> {
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Creates summed over the package's components
    pub fn services_started(&self) -> u64 {
        self.members.iter().map(|s| s.count).sum()
    }

    /// Longest single running interval of any component in the package
    pub fn max_created_time(&self) -> u64 {
        self.members.iter().map(|s| s.max_time).max().unwrap_or(0)
    }
}
