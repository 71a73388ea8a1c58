//! Lifecycle events and the bounded trace that carries them

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between the owning package and the class in a component name
pub const COMPONENT_SEPARATOR: char = '/';

/// Kind of lifecycle transition recorded in the event log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Create,
    Destroy,
    /// Destroyed by the low memory killer
    DestroyLowMemoryKill,
}

impl EventKind {
    pub fn is_destroy(self) -> bool {
        matches!(self, EventKind::Destroy | EventKind::DestroyLowMemoryKill)
    }
}

/// Component identifier, parsed once into its package and class parts
///
/// `com.example/.SyncService` belongs to package `com.example`. Bare process
/// names such as `system_server` have no owning package.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComponentId {
    raw: String,
    split: Option<usize>,
}

impl ComponentId {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let split = raw.find(COMPONENT_SEPARATOR).filter(|&idx| idx > 0);
        Self { raw, split }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Owning package, if the identifier is in `package/class` form
    pub fn package(&self) -> Option<&str> {
        self.split.map(|idx| &self.raw[..idx])
    }

    pub fn class(&self) -> Option<&str> {
        self.split.map(|idx| &self.raw[idx + 1..])
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// A single timestamped lifecycle transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleEvent {
    /// Milliseconds since the epoch shared by the whole trace
    pub timestamp: i64,
    pub kind: EventKind,
    pub component: ComponentId,
}

impl LifecycleEvent {
    pub fn new(timestamp: i64, kind: EventKind, component: &str) -> Self {
        Self {
            timestamp,
            kind,
            component: ComponentId::parse(component),
        }
    }
}

/// Complete, bounded event trace covering the window `[first_ts, last_ts]`
///
/// Events are stably sorted by timestamp on construction so every component
/// sees its own events in non-decreasing order. Events sharing a timestamp keep
/// their input order.
#[derive(Debug, Clone, Default)]
pub struct EventTrace {
    first_ts: i64,
    last_ts: i64,
    events: Vec<LifecycleEvent>,
}

impl EventTrace {
    /// Build a trace for an explicit observation window
    pub fn new(first_ts: i64, last_ts: i64, mut events: Vec<LifecycleEvent>) -> Self {
        events.sort_by_key(|e| e.timestamp);
        Self {
            first_ts,
            last_ts,
            events,
        }
    }

    /// Build a trace whose window spans the first and last event
    pub fn from_events(events: Vec<LifecycleEvent>) -> Self {
        let first_ts = events.iter().map(|e| e.timestamp).min().unwrap_or(0);
        let last_ts = events.iter().map(|e| e.timestamp).max().unwrap_or(0);
        Self::new(first_ts, last_ts, events)
    }

    pub fn first_ts(&self) -> i64 {
        self.first_ts
    }

    pub fn last_ts(&self) -> i64 {
        self.last_ts
    }

    /// Observed duration, the denominator for percentage metrics
    pub fn duration(&self) -> i64 {
        self.last_ts.saturating_sub(self.first_ts)
    }

    pub fn events(&self) -> &[LifecycleEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
