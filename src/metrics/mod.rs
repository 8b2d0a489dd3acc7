use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;

/// Counters accumulated by a [`crate::Navigator`] over its lifetime.
#[derive(Debug, Default, Clone)]
pub struct NavigationMetrics {
    navigations: u64,
    creations: u64,
    reuses: u64,
    back_navigations: u64,
    closes: u64,
    teardowns: u64,
    failures: u64,
}

impl NavigationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_navigation(&mut self, created: bool) {
        self.navigations = self.navigations.saturating_add(1);
        if created {
            self.creations = self.creations.saturating_add(1);
        } else {
            self.reuses = self.reuses.saturating_add(1);
        }
    }

    pub fn record_back(&mut self) {
        self.back_navigations = self.back_navigations.saturating_add(1);
    }

    pub fn record_close(&mut self) {
        self.closes = self.closes.saturating_add(1);
    }

    pub fn record_teardown(&mut self, disposed: usize) {
        self.teardowns = self.teardowns.saturating_add(1);
        self.closes = self.closes.saturating_add(disposed as u64);
    }

    pub fn record_failure(&mut self) {
        self.failures = self.failures.saturating_add(1);
    }

    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            navigations: self.navigations,
            creations: self.creations,
            reuses: self.reuses,
            back_navigations: self.back_navigations,
            closes: self.closes,
            teardowns: self.teardowns,
            failures: self.failures,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub navigations: u64,
    pub creations: u64,
    pub reuses: u64,
    pub back_navigations: u64,
    pub closes: u64,
    pub teardowns: u64,
    pub failures: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "navigation_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("navigations".to_string(), json!(self.navigations));
        map.insert("creations".to_string(), json!(self.creations));
        map.insert("reuses".to_string(), json!(self.reuses));
        map.insert("back_navigations".to_string(), json!(self.back_navigations));
        map.insert("closes".to_string(), json!(self.closes));
        map.insert("teardowns".to_string(), json!(self.teardowns));
        map.insert("failures".to_string(), json!(self.failures));
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_splits_creations_and_reuses() {
        let mut metrics = NavigationMetrics::new();
        metrics.record_navigation(true);
        metrics.record_navigation(false);
        metrics.record_navigation(false);
        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.navigations, 3);
        assert_eq!(snapshot.creations, 1);
        assert_eq!(snapshot.reuses, 2);
    }

    #[test]
    fn snapshot_event_carries_counters() {
        let mut metrics = NavigationMetrics::new();
        metrics.record_teardown(2);
        let event = metrics.snapshot().to_log_event("screenflow::metrics");
        assert_eq!(event.message, "navigation_metrics");
        assert_eq!(event.field("closes"), Some(&json!(2)));
        assert_eq!(event.field("teardowns"), Some(&json!(1)));
    }
}
