//! Event sink boundary.
//!
//! Engine logic MUST NOT depend on obs::metrics directly.
//! All instrumentation flows through GroupEvent and EventSink.
use crate::obs::metrics;
use std::{cell::RefCell, rc::Rc};

thread_local! {
    static SINK_OVERRIDE: RefCell<Option<Rc<dyn EventSink>>> = RefCell::new(None);
}

///
/// TransformKind
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TransformKind {
    Groups,
    Projection,
    Hook,
    Value,
}

impl TransformKind {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Groups => "groups",
            Self::Projection => "projection",
            Self::Hook => "hook",
            Self::Value => "value",
        }
    }
}

///
/// GroupEvent
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GroupEvent {
    TransformStart {
        kind: TransformKind,
    },
    BucketCreated {
        kind: TransformKind,
    },
    TransformFinish {
        kind: TransformKind,
        rows: u64,
        groups: u64,
    },
    TransformFailed {
        kind: TransformKind,
        rows: u64,
    },
}

///
/// EventSink
///

pub trait EventSink {
    fn record(&self, event: GroupEvent);
}

/// ThreadLocalSink
/// Default sink that writes into the thread-local counters.
/// Acts as the concrete sink when no scoped override is installed.

pub(crate) struct ThreadLocalSink;

impl EventSink for ThreadLocalSink {
    fn record(&self, event: GroupEvent) {
        metrics::with_state_mut(|m| match event {
            GroupEvent::TransformStart { kind } => {
                m.ops.transforms_started = m.ops.transforms_started.saturating_add(1);
                metrics::with_kind_mut(m, kind, |k| k.started = k.started.saturating_add(1));
            }

            GroupEvent::BucketCreated { .. } => {
                m.ops.buckets_created = m.ops.buckets_created.saturating_add(1);
            }

            GroupEvent::TransformFinish { kind, rows, groups } => {
                m.ops.transforms_finished = m.ops.transforms_finished.saturating_add(1);
                m.ops.rows_folded = m.ops.rows_folded.saturating_add(rows);
                m.ops.groups_emitted = m.ops.groups_emitted.saturating_add(groups);
                metrics::with_kind_mut(m, kind, |k| {
                    k.finished = k.finished.saturating_add(1);
                    k.rows = k.rows.saturating_add(rows);
                    k.groups = k.groups.saturating_add(groups);
                });
            }

            GroupEvent::TransformFailed { kind, rows } => {
                m.ops.transforms_failed = m.ops.transforms_failed.saturating_add(1);
                m.ops.rows_folded = m.ops.rows_folded.saturating_add(rows);
                metrics::with_kind_mut(m, kind, |k| {
                    k.failed = k.failed.saturating_add(1);
                    k.rows = k.rows.saturating_add(rows);
                });
            }
        });
    }
}

pub(crate) const THREAD_LOCAL_SINK: ThreadLocalSink = ThreadLocalSink;

pub(crate) fn record(event: GroupEvent) {
    let sink = SINK_OVERRIDE.with(|cell| cell.borrow().clone());
    match sink {
        Some(sink) => sink.record(event),
        None => THREAD_LOCAL_SINK.record(event),
    }
}

/// Snapshot the counters of transforms run on this thread.
#[must_use]
pub fn event_report() -> metrics::EventReport {
    metrics::report()
}

/// Reset all counters on this thread.
pub fn event_reset_all() {
    metrics::reset_all();
}

/// Run a closure with a temporary event sink override.
///
/// The previous sink is restored on every exit, unwinding included.
pub fn with_event_sink<T>(sink: Rc<dyn EventSink>, f: impl FnOnce() -> T) -> T {
    struct Guard(Option<Rc<dyn EventSink>>);

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

///
/// TransformSpan
/// RAII guard that emits start/finish events for one transform call.
/// A span dropped without `finish` records the transform as failed.
///

pub(crate) struct TransformSpan {
    kind: TransformKind,
    rows: u64,
    finished: bool,
}

impl TransformSpan {
    #[must_use]
    pub(crate) fn new(kind: TransformKind) -> Self {
        record(GroupEvent::TransformStart { kind });

        Self {
            kind,
            rows: 0,
            finished: false,
        }
    }

    pub(crate) const fn kind(&self) -> TransformKind {
        self.kind
    }

    pub(crate) const fn add_row(&mut self) {
        self.rows = self.rows.saturating_add(1);
    }

    pub(crate) const fn rows(&self) -> u64 {
        self.rows
    }

    pub(crate) fn bucket_created(&self) {
        record(GroupEvent::BucketCreated { kind: self.kind });
    }

    pub(crate) fn finish(mut self, groups: u64) {
        self.finished = true;
        record(GroupEvent::TransformFinish {
            kind: self.kind,
            rows: self.rows,
            groups,
        });
    }
}

impl Drop for TransformSpan {
    fn drop(&mut self) {
        if !self.finished {
            record(GroupEvent::TransformFailed {
                kind: self.kind,
                rows: self.rows,
            });
        }
    }
}
