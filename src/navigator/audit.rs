//! Navigation audit hooks.
//!
//! Each state change the navigator makes is reported as a
//! [`NavigationAuditEvent`] so callers can buffer, log or assert on the exact
//! sequence of transitions without reaching into navigator internals.

use std::sync::Mutex;
use std::time::SystemTime;

use serde_json::Value;

/// Distinct checkpoints emitted by the navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationAuditStage {
    /// A presenter was built, bound and initialized.
    ScreenCreated,
    /// An existing presenter was reused for a navigation.
    ScreenReused,
    /// A view became visible.
    ScreenShown,
    /// A view was hidden while its presenter stayed cached.
    ScreenHidden,
    /// History top changed after a successful navigation.
    HistoryRecorded,
    /// Back navigation landed on an earlier screen.
    BackNavigated,
    /// Back navigation found no live screen to return to.
    BackRejected,
    /// A presenter was disposed and removed.
    ScreenClosed,
    /// Every presenter was disposed at once.
    TornDown,
    /// A navigation attempt failed and was rolled back.
    NavigationFailed,
    /// A queued command finished executing.
    CommandExecuted,
    /// A presenter's lifecycle hook returned an error. The transition
    /// itself still completed.
    LifecycleFailed,
}

/// Structured audit entry.
#[derive(Debug, Clone)]
pub struct NavigationAuditEvent {
    pub timestamp: SystemTime,
    pub stage: NavigationAuditStage,
    pub details: Vec<(String, Value)>,
}

impl NavigationAuditEvent {
    fn new(stage: NavigationAuditStage) -> Self {
        Self {
            timestamp: SystemTime::now(),
            stage,
            details: Vec::new(),
        }
    }

    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }
}

/// Builder helper to append fields ergonomically.
pub struct NavigationAuditEventBuilder {
    event: NavigationAuditEvent,
}

impl NavigationAuditEventBuilder {
    pub fn new(stage: NavigationAuditStage) -> Self {
        Self {
            event: NavigationAuditEvent::new(stage),
        }
    }

    pub fn detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.event.details.push((key.into(), value.into()));
        self
    }

    pub fn finish(self) -> NavigationAuditEvent {
        self.event
    }
}

pub trait NavigationAudit: Send + Sync {
    fn record(&self, event: NavigationAuditEvent);
}

/// Default sink used when auditing is disabled.
#[derive(Debug, Default)]
pub struct NullNavigationAudit;

impl NavigationAudit for NullNavigationAudit {
    fn record(&self, _event: NavigationAuditEvent) {}
}

/// Buffers every event in memory.
#[derive(Debug, Default)]
pub struct RecordingAudit {
    events: Mutex<Vec<NavigationAuditEvent>>,
}

impl RecordingAudit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<NavigationAuditEvent> {
        self.events
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn stages(&self) -> Vec<NavigationAuditStage> {
        self.events().into_iter().map(|event| event.stage).collect()
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.events.lock() {
            guard.clear();
        }
    }
}

impl NavigationAudit for RecordingAudit {
    fn record(&self, event: NavigationAuditEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event);
        }
    }
}
