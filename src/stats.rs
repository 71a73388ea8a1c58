//! Per-component lifecycle statistics
//!
//! Each component runs a small state machine over its own events:
//!
//! ```text
//!   Idle    + CREATE          -> Running  (restart timed against prior destroy)
//!   Running + DESTROY | KILL  -> Idle     (interval closed)
//!   Running + CREATE          -> Running  (anomaly, interval closed at new ts)
//!   Idle    + DESTROY | KILL  -> Idle     (anomaly, destroy remembered)
//! ```
//!
//! Anomalies never stop accumulation. They are counted in
//! [`ComponentStat::errors`] so reports can flag the affected rows.

use crate::event::{ComponentId, EventKind, LifecycleEvent};

/// Where a component currently is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    Running { since: i64 },
}

/// The destroy that ended the most recent interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PriorDestroy {
    timestamp: i64,
    was_kill: bool,
}

/// Lifecycle statistics for a single component (times in milliseconds)
#[derive(Debug, Clone)]
pub struct ComponentStat {
    pub component: ComponentId,
    /// Number of CREATE events
    pub count: u64,
    pub total_time: u64,
    pub max_time: u64,
    pub restart_count: u64,
    pub min_restart_time: Option<u64>,
    pub total_restart_time: u64,
    /// Restarts following a low memory kill
    pub bg_kill_restart_count: u64,
    pub min_bg_kill_restart_time: Option<u64>,
    pub total_bg_kill_restart_time: u64,
    /// Inconsistencies found in this component's event sequence
    pub errors: u64,
    state: LifecycleState,
    prior_destroy: Option<PriorDestroy>,
    finished: bool,
}

impl ComponentStat {
    pub fn new(component: ComponentId) -> Self {
        Self {
            component,
            count: 0,
            total_time: 0,
            max_time: 0,
            restart_count: 0,
            min_restart_time: None,
            total_restart_time: 0,
            bg_kill_restart_count: 0,
            min_bg_kill_restart_time: None,
            total_bg_kill_restart_time: 0,
            errors: 0,
            state: LifecycleState::Idle,
            prior_destroy: None,
            finished: false,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    /// Feed the next event for this component (timestamps must not decrease)
    pub fn record(&mut self, event: &LifecycleEvent) {
        debug_assert_eq!(event.component, self.component);
        if self.finished {
            tracing::warn!(component = %self.component, "event after finish ignored");
            return;
        }

        let ts = event.timestamp;
        match (self.state, event.kind) {
            (LifecycleState::Idle, EventKind::Create) => self.start(ts),
            (LifecycleState::Running { since }, EventKind::Create) => {
                self.errors += 1;
                tracing::debug!(
                    component = %self.component,
                    ts,
                    "create while already running, closing previous interval"
                );
                self.close_interval(since, ts);
                debug_assert!(self.prior_destroy.is_none());
                self.start(ts);
            }
            (LifecycleState::Running { since }, kind) => {
                self.close_interval(since, ts);
                self.state = LifecycleState::Idle;
                self.prior_destroy = Some(PriorDestroy {
                    timestamp: ts,
                    was_kill: kind == EventKind::DestroyLowMemoryKill,
                });
            }
            (LifecycleState::Idle, kind) => {
                self.errors += 1;
                tracing::debug!(component = %self.component, ts, "destroy without create");
                self.prior_destroy = Some(PriorDestroy {
                    timestamp: ts,
                    was_kill: kind == EventKind::DestroyLowMemoryKill,
                });
            }
        }
    }

    /// Close a still-open interval at the end of the observation window
    ///
    /// Only the first call has any effect.
    pub fn finish(&mut self, end_ts: i64) {
        if self.finished {
            return;
        }
        if let LifecycleState::Running { since } = self.state {
            self.close_interval(since, end_ts);
            self.state = LifecycleState::Idle;
        }
        self.finished = true;
    }

    fn start(&mut self, ts: i64) {
        let first_create = self.count == 0;
        self.count += 1;
        if let Some(prior) = self.prior_destroy.take() {
            if !first_create {
                let interval = elapsed(prior.timestamp, ts);
                if prior.was_kill {
                    self.bg_kill_restart_count += 1;
                    self.total_bg_kill_restart_time += interval;
                    self.min_bg_kill_restart_time =
                        Some(self.min_bg_kill_restart_time.map_or(interval, |m| m.min(interval)));
                } else {
                    self.restart_count += 1;
                    self.total_restart_time += interval;
                    self.min_restart_time =
                        Some(self.min_restart_time.map_or(interval, |m| m.min(interval)));
                }
            }
        }
        self.state = LifecycleState::Running { since: ts };
    }

    fn close_interval(&mut self, since: i64, until: i64) {
        let interval = elapsed(since, until);
        self.total_time += interval;
        self.max_time = self.max_time.max(interval);
    }

    /// Average running time per create
    pub fn avg_time(&self) -> Option<u64> {
        (self.count > 0).then(|| self.total_time / self.count)
    }

    pub fn avg_restart_time(&self) -> Option<u64> {
        (self.restart_count > 0).then(|| self.total_restart_time / self.restart_count)
    }

    pub fn avg_bg_kill_restart_time(&self) -> Option<u64> {
        (self.bg_kill_restart_count > 0)
            .then(|| self.total_bg_kill_restart_time / self.bg_kill_restart_count)
    }
}

/// Non-negative span between two timestamps
fn elapsed(from: i64, to: i64) -> u64 {
    to.saturating_sub(from).max(0) as u64
}

/// Integer percentage of `part` within `whole`; not clamped at 100
pub fn percent_of(part: u64, whole: i64) -> Option<i64> {
    (whole > 0).then(|| (part as i128 * 100 / whole as i128) as i64)
}
