// ============================================================================
// Telemetry sink
// ============================================================================
//
// Emission is fire-and-forget: every `track_*` call takes `&self`, returns
// `()`, and can never fail or block the operation it instruments.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Verbose,
    Information,
    Warning,
    Error,
    Critical,
}

/// Named latency measurement with classification tags for later filtering.
#[derive(Debug, Clone)]
pub struct MetricEvent {
    pub name: String,
    pub value: f64,
    pub tags: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct TraceEvent {
    pub message: String,
    pub severity: Severity,
    pub tags: Vec<(String, String)>,
}

/// One tracked call to an external collaborator.
#[derive(Debug, Clone)]
pub struct DependencyEvent {
    pub name: String,
    pub command: String,
    pub started_at: DateTime<Utc>,
    pub duration: Duration,
    pub success: bool,
}

pub trait TelemetrySink: Send + Sync {
    fn track_metric(&self, event: MetricEvent);
    fn track_trace(&self, event: TraceEvent);
    fn track_dependency(&self, event: DependencyEvent);
}

/// Shared handle handed to every metric producer.
#[derive(Clone)]
pub struct Telemetry {
    sink: Arc<dyn TelemetrySink>,
}

impl Telemetry {
    pub fn new(sink: Arc<dyn TelemetrySink>) -> Self {
        Self { sink }
    }

    /// Sink that forwards every event to the `tracing` subscriber.
    pub fn tracing() -> Self {
        Self::new(Arc::new(TracingSink))
    }

    pub fn track_metric(&self, name: &str, value: f64, tags: &[(&str, &str)]) {
        self.sink.track_metric(MetricEvent {
            name: name.to_string(),
            value,
            tags: owned_tags(tags),
        });
    }

    pub fn track_trace(&self, message: &str, severity: Severity, tags: &[(&str, &str)]) {
        self.sink.track_trace(TraceEvent {
            message: message.to_string(),
            severity,
            tags: owned_tags(tags),
        });
    }

    pub fn track_dependency(
        &self,
        name: &str,
        command: &str,
        started_at: DateTime<Utc>,
        duration: Duration,
        success: bool,
    ) {
        self.sink.track_dependency(DependencyEvent {
            name: name.to_string(),
            command: command.to_string(),
            started_at,
            duration,
            success,
        });
    }
}

fn owned_tags(tags: &[(&str, &str)]) -> Vec<(String, String)> {
    tags.iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

struct TracingSink;

impl TelemetrySink for TracingSink {
    fn track_metric(&self, event: MetricEvent) {
        info!(
            target: "telemetry",
            metric = %event.name,
            value = event.value,
            tags = ?event.tags,
            "metric"
        );
    }

    fn track_trace(&self, event: TraceEvent) {
        match event.severity {
            Severity::Verbose | Severity::Information => info!(
                target: "telemetry",
                message = %event.message,
                tags = ?event.tags,
                "trace"
            ),
            Severity::Warning | Severity::Error | Severity::Critical => warn!(
                target: "telemetry",
                message = %event.message,
                severity = ?event.severity,
                tags = ?event.tags,
                "trace"
            ),
        }
    }

    fn track_dependency(&self, event: DependencyEvent) {
        info!(
            target: "telemetry",
            dependency = %event.name,
            command = %event.command,
            started_at = %event.started_at,
            duration_ms = event.duration.as_secs_f64() * 1000.0,
            success = event.success,
            "dependency"
        );
    }
}

/// Captures every event for assertions. A poisoned lock drops the event
/// instead of panicking, keeping emission infallible.
#[derive(Default)]
pub struct RecordingSink {
    metrics: Mutex<Vec<MetricEvent>>,
    traces: Mutex<Vec<TraceEvent>>,
    dependencies: Mutex<Vec<DependencyEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics(&self) -> Vec<MetricEvent> {
        self.metrics.lock().map(|events| events.clone()).unwrap_or_default()
    }

    pub fn traces(&self) -> Vec<TraceEvent> {
        self.traces.lock().map(|events| events.clone()).unwrap_or_default()
    }

    pub fn dependencies(&self) -> Vec<DependencyEvent> {
        self.dependencies
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl TelemetrySink for RecordingSink {
    fn track_metric(&self, event: MetricEvent) {
        if let Ok(mut events) = self.metrics.lock() {
            events.push(event);
        }
    }

    fn track_trace(&self, event: TraceEvent) {
        if let Ok(mut events) = self.traces.lock() {
            events.push(event);
        }
    }

    fn track_dependency(&self, event: DependencyEvent) {
        if let Ok(mut events) = self.dependencies.lock() {
            events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_captures_events() {
        let sink = Arc::new(RecordingSink::new());
        let telemetry = Telemetry::new(sink.clone());

        telemetry.track_metric("op (ms)", 12.5, &[("Performance", "Performance")]);
        telemetry.track_trace("posted", Severity::Warning, &[("PostData", "true")]);
        telemetry.track_dependency("api", "GET /values", Utc::now(), Duration::from_millis(3), true);

        let metrics = sink.metrics();
        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].name, "op (ms)");
        assert_eq!(
            metrics[0].tags,
            vec![("Performance".to_string(), "Performance".to_string())]
        );

        assert_eq!(sink.traces().len(), 1);
        assert_eq!(sink.traces()[0].severity, Severity::Warning);

        let dependencies = sink.dependencies();
        assert_eq!(dependencies.len(), 1);
        assert!(dependencies[0].success);
    }
}
