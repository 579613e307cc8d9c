//! Observability: metrics events, the sink boundary, and in-memory counters.

pub mod metrics;
pub mod sink;

pub use metrics::{EventOps, EventReport, TargetCounters};
pub use sink::{MetricsEvent, MetricsSink, QueryKind, metrics_report, metrics_reset_all, with_metrics_sink};
