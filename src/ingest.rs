//! JSON loaders for the three report sources
//!
//! Each loader validates the document structure before anything reaches the
//! indexes. A document that fails validation is rejected as a whole with
//! [`ReportError::MalformedInput`]; partial lists are never returned.
//!
//! # Formats
//!
//! Event trace:
//!
//! ```json
//! {
//!   "first_ts": 1000,
//!   "last_ts": 90000,
//!   "events": [
//!     { "ts": 1200, "kind": "create", "component": "com.mail/.SyncService" },
//!     { "ts": 5400, "kind": "destroy_low_memory_kill", "component": "com.mail/.SyncService" }
//!   ]
//! }
//! ```
//!
//! Usage history:
//!
//! ```json
//! { "usage_history": [
//!     { "name": "com.mail", "components": [ { "name": "com.mail.Inbox", "lrt": 1699990000000 } ] }
//! ] }
//! ```
//!
//! Package inventory:
//!
//! ```json
//! { "packages": [ { "name": "android", "flags": 1 }, { "name": "com.mail" } ] }
//! ```

use crate::error::{InputSource, ReportError};
use crate::event::{EventKind, EventTrace, LifecycleEvent};
use crate::inventory::PackageInventoryEntry;
use crate::usage::UsageRecord;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Read a source file; failing to read an explicitly requested file is fatal
pub fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EventDocument {
    first_ts: Option<i64>,
    last_ts: Option<i64>,
    events: Vec<EventEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EventEntry {
    ts: i64,
    kind: EventKind,
    #[serde(default)]
    component: Option<String>,
}

/// Parse an event trace document
///
/// Missing window bounds are taken from the earliest and latest event.
/// Entries without a component are skipped.
pub fn parse_event_trace(json: &str) -> std::result::Result<EventTrace, ReportError> {
    let doc: EventDocument = serde_json::from_str(json)
        .map_err(|e| ReportError::malformed(InputSource::EventTrace, e.to_string()))?;

    let mut skipped = 0usize;
    let events: Vec<LifecycleEvent> = doc
        .events
        .into_iter()
        .filter_map(|entry| match entry.component.as_deref() {
            Some(component) if !component.is_empty() => {
                Some(LifecycleEvent::new(entry.ts, entry.kind, component))
            }
            _ => {
                skipped += 1;
                None
            }
        })
        .collect();
    if skipped > 0 {
        tracing::debug!(skipped, "events without component skipped");
    }

    let first_ts = doc
        .first_ts
        .or_else(|| events.iter().map(|e| e.timestamp).min())
        .unwrap_or(0);
    let last_ts = doc
        .last_ts
        .or_else(|| events.iter().map(|e| e.timestamp).max())
        .unwrap_or(first_ts);
    if last_ts < first_ts {
        return Err(ReportError::malformed(
            InputSource::EventTrace,
            format!("window ends before it starts ({} < {})", last_ts, first_ts),
        ));
    }
    if last_ts.checked_sub(first_ts).is_none() {
        return Err(ReportError::malformed(
            InputSource::EventTrace,
            format!("window span overflows ({} .. {})", first_ts, last_ts),
        ));
    }

    let outside = events
        .iter()
        .filter(|e| e.timestamp < first_ts || e.timestamp > last_ts)
        .count();
    if outside > 0 {
        tracing::warn!(outside, first_ts, last_ts, "events outside the observation window");
    }

    Ok(EventTrace::new(first_ts, last_ts, events))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UsageDocument {
    usage_history: Vec<UsagePackage>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UsagePackage {
    name: String,
    #[serde(default)]
    components: Vec<UsageComponent>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UsageComponent {
    name: String,
    lrt: i64,
}

/// Parse a usage history document into flat records
pub fn parse_usage_history(json: &str) -> std::result::Result<Vec<UsageRecord>, ReportError> {
    let doc: UsageDocument = serde_json::from_str(json)
        .map_err(|e| ReportError::malformed(InputSource::UsageHistory, e.to_string()))?;

    let mut records = Vec::new();
    for (pkg_idx, pkg) in doc.usage_history.into_iter().enumerate() {
        if pkg.name.is_empty() {
            return Err(ReportError::malformed(
                InputSource::UsageHistory,
                format!("package #{} has no name", pkg_idx),
            ));
        }
        for comp in pkg.components {
            if comp.name.is_empty() {
                return Err(ReportError::malformed(
                    InputSource::UsageHistory,
                    format!("component without name in package {}", pkg.name),
                ));
            }
            records.push(UsageRecord {
                package: pkg.name.clone(),
                component: comp.name,
                last_referenced_time: comp.lrt,
            });
        }
    }
    Ok(records)
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InventoryDocument {
    packages: Vec<InventoryPackage>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InventoryPackage {
    name: String,
    #[serde(default)]
    flags: u32,
}

/// Parse a package inventory document
pub fn parse_inventory(json: &str) -> std::result::Result<Vec<PackageInventoryEntry>, ReportError> {
    let doc: InventoryDocument = serde_json::from_str(json)
        .map_err(|e| ReportError::malformed(InputSource::PackageInventory, e.to_string()))?;
    if let Some(idx) = doc.packages.iter().position(|p| p.name.is_empty()) {
        return Err(ReportError::malformed(
            InputSource::PackageInventory,
            format!("package #{} has no name", idx),
        ));
    }
    Ok(doc
        .packages
        .into_iter()
        .map(|p| PackageInventoryEntry::from_flags(p.name, p.flags))
        .collect())
}
