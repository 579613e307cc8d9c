//! Metrics sink boundary.
//!
//! Gateway code never touches `obs::metrics` directly; every counter update
//! flows through a [`MetricsEvent`] handed to [`record`].

use crate::obs::metrics::{self, EventReport};
use std::{cell::RefCell, sync::Arc, time::Instant};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Arc<dyn MetricsSink>>> = const { RefCell::new(None) };
}

///
/// QueryKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QueryKind {
    Count,
    Rows,
}

///
/// MetricsEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MetricsEvent {
    FindStart {
        target: &'static str,
    },
    FindFinish {
        target: &'static str,
        rows: u64,
        count: Option<u64>,
        micros: u64,
    },
    BackendQuery {
        target: &'static str,
        kind: QueryKind,
    },
    RowQuerySkipped {
        target: &'static str,
    },
    BackendError {
        target: &'static str,
    },
}

///
/// MetricsSink
///

pub trait MetricsSink {
    fn record(&self, event: MetricsEvent);
}

/// GlobalMetricsSink
/// Default sink writing into the thread-local counters.

pub(crate) struct GlobalMetricsSink;

impl MetricsSink for GlobalMetricsSink {
    fn record(&self, event: MetricsEvent) {
        metrics::with_state_mut(|m| match event {
            MetricsEvent::FindStart { target } => {
                m.ops.find_calls = m.ops.find_calls.saturating_add(1);
                let entry = m.targets.entry(target.to_string()).or_default();
                entry.find_calls = entry.find_calls.saturating_add(1);
            }
            MetricsEvent::FindFinish {
                target,
                rows,
                micros,
                ..
            } => {
                m.ops.rows_returned = m.ops.rows_returned.saturating_add(rows);
                metrics::add_micros(
                    &mut m.ops.find_micros_total,
                    &mut m.ops.find_micros_max,
                    micros,
                );
                let entry = m.targets.entry(target.to_string()).or_default();
                entry.rows_returned = entry.rows_returned.saturating_add(rows);
            }
            MetricsEvent::BackendQuery { target, kind } => {
                let entry = m.targets.entry(target.to_string()).or_default();
                match kind {
                    QueryKind::Count => {
                        m.ops.count_queries = m.ops.count_queries.saturating_add(1);
                        entry.count_queries = entry.count_queries.saturating_add(1);
                    }
                    QueryKind::Rows => {
                        m.ops.row_queries = m.ops.row_queries.saturating_add(1);
                        entry.row_queries = entry.row_queries.saturating_add(1);
                    }
                }
            }
            MetricsEvent::RowQuerySkipped { target } => {
                m.ops.row_queries_skipped = m.ops.row_queries_skipped.saturating_add(1);
                let entry = m.targets.entry(target.to_string()).or_default();
                entry.row_queries_skipped = entry.row_queries_skipped.saturating_add(1);
            }
            MetricsEvent::BackendError { target } => {
                m.ops.backend_errors = m.ops.backend_errors.saturating_add(1);
                let entry = m.targets.entry(target.to_string()).or_default();
                entry.backend_errors = entry.backend_errors.saturating_add(1);
            }
        });
    }
}

pub(crate) fn record(event: MetricsEvent) {
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match sink {
        Some(sink) => sink.record(event),
        None => GlobalMetricsSink.record(event),
    }
}

/// Snapshot the current metrics state.
#[must_use]
pub fn metrics_report() -> EventReport {
    metrics::report()
}

/// Reset all metrics state.
pub fn metrics_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary metrics sink override on this thread.
pub fn with_metrics_sink<T>(sink: Arc<dyn MetricsSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Arc<dyn MetricsSink>>);

    impl Drop for Guard {
        fn drop(&mut self) {
            let prev = self.0.take();
            SINK_OVERRIDE.with(|cell| {
                *cell.borrow_mut() = prev;
            });
        }
    }

    let prev = SINK_OVERRIDE.with(|cell| cell.borrow_mut().replace(sink));
    let _guard = Guard(prev);

    f()
}

/// Span
/// RAII guard that emits start/finish events for one `find` call.
/// Finish accounting happens on every exit path, including errors.

pub(crate) struct Span {
    target: &'static str,
    start: Instant,
    rows: u64,
    count: Option<u64>,
}

impl Span {
    #[must_use]
    pub(crate) fn new(target: &'static str) -> Self {
        record(MetricsEvent::FindStart { target });

        Self {
            target,
            start: Instant::now(),
            rows: 0,
            count: None,
        }
    }

    pub(crate) const fn set_rows(&mut self, rows: u64) {
        self.rows = rows;
    }

    pub(crate) const fn set_count(&mut self, count: Option<u64>) {
        self.count = count;
    }
}

impl Drop for Span {
    fn drop(&mut self) {
        let micros = u64::try_from(self.start.elapsed().as_micros()).unwrap_or(u64::MAX);

        record(MetricsEvent::FindFinish {
            target: self.target,
            rows: self.rows,
            count: self.count,
            micros,
        });
    }
}
