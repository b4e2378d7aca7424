//! GC tracing support.
//!
//! When the `tracing` feature is enabled, this module provides structured
//! tracing spans and events for garbage collection operations.

/// Identifier of one collection within a VM.
///
/// Collections are numbered from 1 in the order they run on a given VM, so
/// the id correlates every span and event of one mark/sweep cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GcId(pub u64);

/// Collector phases that get their own span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GcPhase {
    /// Trace the object graph from the root stack.
    Mark,
    /// Reclaim unmarked objects.
    Sweep,
}

#[cfg(feature = "tracing")]
pub(crate) mod internal {
    use tracing::{span, Level};

    use super::{GcId, GcPhase};
    use crate::metrics::CollectionType;

    /// Create a span for the entire GC collection.
    pub fn trace_gc_collection(collection_type: CollectionType, gc_id: GcId) -> span::EnteredSpan {
        span!(
            Level::DEBUG,
            "gc_collect",
            collection_type = ?collection_type,
            gc_id = gc_id.0
        )
        .entered()
    }

    /// Create a span for a GC phase (mark/sweep).
    pub fn trace_phase(phase: GcPhase) -> span::EnteredSpan {
        span!(Level::DEBUG, "gc_phase", phase = ?phase).entered()
    }

    /// Log the start of a GC phase.
    pub fn log_phase_start(phase: GcPhase, objects_live: usize) {
        tracing::debug!(phase = ?phase, objects_live, "phase_start");
    }

    /// Log the end of a GC phase with the number of objects it touched.
    pub fn log_phase_end(phase: GcPhase, objects: usize) {
        tracing::debug!(phase = ?phase, objects, "phase_end");
    }

    /// Log the outcome of a finished collection.
    pub fn log_collection_end(objects_reclaimed: usize, objects_remaining: usize, threshold: usize) {
        tracing::debug!(
            objects_reclaimed,
            objects_remaining,
            threshold,
            "collected {objects_reclaimed} objects, {objects_remaining} remaining"
        );
    }
}
