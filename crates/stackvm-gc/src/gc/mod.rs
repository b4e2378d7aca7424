//! Mark-Sweep garbage collection.
//!
//! A collection is stop-the-world: it borrows the heap and the root stack
//! for its whole duration, so no allocation, push or pop can interleave with
//! it. The phases are:
//!
//! 1. Mark: trace the object graph from the root stack.
//! 2. Sweep: reclaim every unmarked object and clear survivors' marks.
//! 3. Recompute the allocation threshold.

pub(crate) mod mark;
pub(crate) mod sweep;

use std::time::Instant;

use crate::config::ThresholdPolicy;
use crate::heap::Heap;
use crate::metrics::{CollectionType, GcMetrics, MetricsRecorder, PhaseTimer};
use crate::roots::RootStack;

#[cfg(feature = "tracing")]
use crate::tracing::internal::{
    log_collection_end, log_phase_end, log_phase_start, trace_gc_collection, trace_phase,
};
#[cfg(feature = "tracing")]
use crate::tracing::GcPhase;

/// Everything a collection reads or updates.
pub(crate) struct Collection<'a> {
    pub(crate) heap: &'a mut Heap,
    pub(crate) roots: &'a RootStack,
    pub(crate) threshold: &'a mut usize,
    pub(crate) policy: ThresholdPolicy,
    pub(crate) recorder: &'a mut MetricsRecorder,
}

impl Collection<'_> {
    /// Run a full collection and record its metrics.
    pub(crate) fn run(self, collection_type: CollectionType) -> GcMetrics {
        let gc_id = self.recorder.next_gc_id();
        #[cfg(feature = "tracing")]
        let _gc_span = trace_gc_collection(collection_type, gc_id);

        let start = Instant::now();
        let mut timer = PhaseTimer::new();
        let objects_before = self.heap.len();
        let threshold_before = *self.threshold;

        timer.start();
        let objects_marked = {
            #[cfg(feature = "tracing")]
            let _mark_span = trace_phase(GcPhase::Mark);
            #[cfg(feature = "tracing")]
            log_phase_start(GcPhase::Mark, objects_before);

            let marked = mark::mark_all(self.heap, self.roots);

            #[cfg(feature = "tracing")]
            log_phase_end(GcPhase::Mark, marked);
            marked
        };
        timer.end_mark();

        timer.start();
        let objects_reclaimed = {
            #[cfg(feature = "tracing")]
            let _sweep_span = trace_phase(GcPhase::Sweep);
            #[cfg(feature = "tracing")]
            log_phase_start(GcPhase::Sweep, objects_before);

            let reclaimed = sweep::sweep(self.heap);

            #[cfg(feature = "tracing")]
            log_phase_end(GcPhase::Sweep, reclaimed);
            reclaimed
        };
        timer.end_sweep();

        let objects_surviving = self.heap.len();
        debug_assert_eq!(objects_surviving, objects_marked);
        debug_assert_eq!(objects_before, objects_surviving + objects_reclaimed);

        *self.threshold = self
            .policy
            .next_threshold(objects_before, objects_surviving);

        #[cfg(feature = "tracing")]
        log_collection_end(objects_reclaimed, objects_surviving, *self.threshold);

        let metrics = GcMetrics {
            gc_id,
            collection_type,
            duration: start.elapsed(),
            mark_duration: timer.mark,
            sweep_duration: timer.sweep,
            objects_before,
            objects_marked,
            objects_reclaimed,
            objects_surviving,
            threshold_before,
            threshold_after: *self.threshold,
        };
        self.recorder.record(metrics);
        metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Value;
    use crate::tracing::GcId;

    #[test]
    fn test_collection_reports_counts_and_threshold() {
        let mut heap = Heap::new();
        let kept = heap.insert(Value::Int(1));
        heap.insert(Value::Int(2));
        heap.insert(Value::Int(3));

        let mut roots = RootStack::with_capacity(4);
        roots.push(kept).unwrap();

        let mut threshold = 10;
        let mut recorder = MetricsRecorder::default();
        let metrics = Collection {
            heap: &mut heap,
            roots: &roots,
            threshold: &mut threshold,
            policy: ThresholdPolicy::PreCollection,
            recorder: &mut recorder,
        }
        .run(CollectionType::Explicit);

        assert_eq!(metrics.gc_id, GcId(1));
        assert_eq!(metrics.objects_before, 3);
        assert_eq!(metrics.objects_marked, 1);
        assert_eq!(metrics.objects_reclaimed, 2);
        assert_eq!(metrics.objects_surviving, 1);
        assert_eq!(metrics.threshold_before, 10);
        assert_eq!(metrics.threshold_after, 6);
        assert_eq!(threshold, 6);
        assert_eq!(recorder.last, metrics);
        assert_eq!(heap.len(), 1);
    }

    #[test]
    fn test_survivor_policy_can_shrink_threshold() {
        let mut heap = Heap::new();
        for i in 0..8 {
            heap.insert(Value::Int(i));
        }
        let roots = RootStack::with_capacity(1);
        let mut threshold = 8;
        let mut recorder = MetricsRecorder::default();
        Collection {
            heap: &mut heap,
            roots: &roots,
            threshold: &mut threshold,
            policy: ThresholdPolicy::Survivors,
            recorder: &mut recorder,
        }
        .run(CollectionType::Threshold);

        assert!(heap.is_empty());
        assert_eq!(threshold, 1);
    }
}
