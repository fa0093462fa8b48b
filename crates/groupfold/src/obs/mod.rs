//! Observability: transform telemetry and sink abstractions.
//!
//! Engine code emits `GroupEvent`s through `sink::record` only; it never
//! touches counter state directly.

pub(crate) mod metrics;
pub(crate) mod sink;

// re-exports
pub use metrics::{EventOps, EventReport, KindCounters};
pub use sink::{EventSink, GroupEvent, TransformKind, event_report, event_reset_all, with_event_sink};
