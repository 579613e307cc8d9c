use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, in-memory counters for gateway operations.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub(crate) struct EventState {
    pub(crate) ops: EventOps,
    pub(crate) targets: BTreeMap<String, TargetCounters>,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Gateway entrypoints
    pub find_calls: u64,

    // Backend round trips
    pub count_queries: u64,
    pub row_queries: u64,
    pub row_queries_skipped: u64,
    pub backend_errors: u64,

    // Results
    pub rows_returned: u64,

    // Wall-clock time spent in find, in microseconds
    pub find_micros_total: u128,
    pub find_micros_max: u64,
}

///
/// TargetCounters
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct TargetCounters {
    pub find_calls: u64,
    pub count_queries: u64,
    pub row_queries: u64,
    pub row_queries_skipped: u64,
    pub backend_errors: u64,
    pub rows_returned: u64,
}

///
/// EventReport
/// Snapshot of the counters at the time of the call.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventReport {
    pub ops: EventOps,
    pub targets: BTreeMap<String, TargetCounters>,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

pub(crate) fn report() -> EventReport {
    EVENT_STATE.with(|m| {
        let state = m.borrow();
        EventReport {
            ops: state.ops.clone(),
            targets: state.targets.clone(),
        }
    })
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

/// Accumulate a duration and track its max.
pub(crate) fn add_micros(total: &mut u128, max: &mut u64, delta: u64) {
    *total = total.saturating_add(u128::from(delta));
    if delta > *max {
        *max = delta;
    }
}
