use crate::obs::sink::TransformKind;
use serde::{Deserialize, Serialize};
use std::{cell::RefCell, collections::BTreeMap};

///
/// EventState
/// Ephemeral, thread-local counters for transforms run on this thread.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub(crate) struct EventState {
    pub(crate) ops: EventOps,
    pub(crate) kinds: BTreeMap<String, KindCounters>,
}

///
/// EventOps
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Transform entrypoints
    pub transforms_started: u64,
    pub transforms_finished: u64,
    pub transforms_failed: u64,

    // Volume
    pub rows_folded: u64,
    pub buckets_created: u64,
    pub groups_emitted: u64,
}

///
/// KindCounters
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct KindCounters {
    pub started: u64,
    pub finished: u64,
    pub failed: u64,
    pub rows: u64,
    pub groups: u64,
}

///
/// EventReport
/// Point-in-time snapshot of the thread-local counters.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventReport {
    pub ops: EventOps,
    pub kinds: BTreeMap<String, KindCounters>,
}

impl EventReport {
    /// Counters of one transform kind, zeroed when it never ran.
    #[must_use]
    pub fn kind(&self, kind: TransformKind) -> KindCounters {
        self.kinds.get(kind.label()).copied().unwrap_or_default()
    }
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow counters mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Borrow the per-kind counters of one transform kind.
pub(crate) fn with_kind_mut<R>(
    state: &mut EventState,
    kind: TransformKind,
    f: impl FnOnce(&mut KindCounters) -> R,
) -> R {
    f(state.kinds.entry(kind.label().to_string()).or_default())
}

pub(crate) fn report() -> EventReport {
    EVENT_STATE.with(|m| {
        let state = m.borrow();
        EventReport {
            ops: state.ops,
            kinds: state.kinds.clone(),
        }
    })
}

/// Reset all counters (useful in tests).
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}
