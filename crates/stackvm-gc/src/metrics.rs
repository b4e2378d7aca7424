//! GC metrics and statistics.

use std::time::{Duration, Instant};

use crate::tracing::GcId;

/// What started a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum CollectionType {
    /// No collection has run yet.
    #[default]
    None = 0,
    /// Requested through [`Vm::collect`](crate::Vm::collect).
    Explicit = 1,
    /// Run by an allocation that reached the threshold.
    Threshold = 2,
    /// The final collection run by [`Vm::destroy`](crate::Vm::destroy).
    Teardown = 3,
}

/// Statistics from one garbage collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GcMetrics {
    /// Sequence number of the collection within its VM.
    pub gc_id: GcId,
    /// Type of collection.
    pub collection_type: CollectionType,
    /// Wall time of the whole collection.
    pub duration: Duration,
    /// Duration of the mark phase.
    pub mark_duration: Duration,
    /// Duration of the sweep phase.
    pub sweep_duration: Duration,
    /// Live objects when the collection started.
    pub objects_before: usize,
    /// Objects the mark phase reached.
    pub objects_marked: usize,
    /// Objects the sweep phase reclaimed.
    pub objects_reclaimed: usize,
    /// Live objects after the sweep.
    pub objects_surviving: usize,
    /// Allocation threshold before the collection.
    pub threshold_before: usize,
    /// Allocation threshold the collection left behind.
    pub threshold_after: usize,
}

impl Default for GcMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl GcMetrics {
    /// Create a new `GcMetrics` with all fields set to zero/defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            gc_id: GcId(0),
            collection_type: CollectionType::None,
            duration: Duration::ZERO,
            mark_duration: Duration::ZERO,
            sweep_duration: Duration::ZERO,
            objects_before: 0,
            objects_marked: 0,
            objects_reclaimed: 0,
            objects_surviving: 0,
            threshold_before: 0,
            threshold_after: 0,
        }
    }
}

/// Internal helper for capturing phase durations.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PhaseTimer {
    pub(crate) mark: Duration,
    pub(crate) sweep: Duration,
    current_start: Option<Instant>,
}

impl PhaseTimer {
    pub(crate) const fn new() -> Self {
        Self {
            mark: Duration::ZERO,
            sweep: Duration::ZERO,
            current_start: None,
        }
    }

    /// Start timing a phase.
    pub(crate) fn start(&mut self) {
        self.current_start = Some(Instant::now());
    }

    /// End the mark phase and record its duration.
    pub(crate) fn end_mark(&mut self) {
        if let Some(start) = self.current_start.take() {
            self.mark = start.elapsed();
        }
    }

    /// End the sweep phase and record its duration.
    pub(crate) fn end_sweep(&mut self) {
        if let Some(start) = self.current_start.take() {
            self.sweep = start.elapsed();
        }
    }
}

/// Cumulative statistics for one VM.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VmTotals {
    collections: usize,
    threshold_collections: usize,
    objects_allocated: usize,
    objects_reclaimed: usize,
    pause: Duration,
}

impl VmTotals {
    /// Total collections run.
    #[inline]
    #[must_use]
    pub const fn total_collections(&self) -> usize {
        self.collections
    }

    /// Collections triggered by reaching the allocation threshold.
    #[inline]
    #[must_use]
    pub const fn total_threshold_collections(&self) -> usize {
        self.threshold_collections
    }

    /// Objects ever allocated.
    #[inline]
    #[must_use]
    pub const fn total_objects_allocated(&self) -> usize {
        self.objects_allocated
    }

    /// Objects ever reclaimed.
    #[inline]
    #[must_use]
    pub const fn total_objects_reclaimed(&self) -> usize {
        self.objects_reclaimed
    }

    /// Sum of all collection pauses.
    #[inline]
    #[must_use]
    pub const fn total_pause(&self) -> Duration {
        self.pause
    }

    pub(crate) fn record_allocation(&mut self) {
        self.objects_allocated += 1;
    }

    fn record(&mut self, metrics: &GcMetrics) {
        self.collections += 1;
        if metrics.collection_type == CollectionType::Threshold {
            self.threshold_collections += 1;
        }
        self.objects_reclaimed += metrics.objects_reclaimed;
        self.pause += metrics.duration;
    }
}

/// Ring buffer size for GC history.
pub const HISTORY_SIZE: usize = 64;

/// Fixed-size ring buffer of recent `GcMetrics` snapshots.
///
/// Stores the most recent 64 collections of one VM for trend analysis.
#[derive(Debug, Clone)]
pub struct GcHistory {
    buffer: [GcMetrics; HISTORY_SIZE],
    write_idx: usize,
}

impl Default for GcHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl GcHistory {
    /// Create a new `GcHistory` with an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buffer: [GcMetrics::new(); HISTORY_SIZE],
            write_idx: 0,
        }
    }

    /// Push a new metrics snapshot, overwriting the oldest when full.
    fn push(&mut self, metrics: GcMetrics) {
        self.buffer[self.write_idx % HISTORY_SIZE] = metrics;
        self.write_idx += 1;
    }

    /// Get the total number of metrics recorded.
    ///
    /// This may exceed `HISTORY_SIZE` if more collections have occurred
    /// than the buffer can hold.
    #[inline]
    #[must_use]
    pub const fn total_recorded(&self) -> usize {
        self.write_idx
    }

    /// Get the most recent N metrics snapshots, oldest first.
    #[must_use]
    pub fn recent(&self, n: usize) -> Vec<GcMetrics> {
        let total = self.write_idx;
        let n = n.min(HISTORY_SIZE).min(total);
        (total - n..total)
            .map(|i| self.buffer[i % HISTORY_SIZE])
            .collect()
    }

    /// Compute the average pause time from the most recent N collections.
    ///
    /// Returns `Duration::ZERO` if no collections have been recorded.
    #[must_use]
    pub fn average_pause_time(&self, n: usize) -> Duration {
        let recent = self.recent(n);
        if recent.is_empty() {
            return Duration::ZERO;
        }

        let total_ns: u128 = recent.iter().map(|m| m.duration.as_nanos()).sum();
        Duration::from_nanos(
            (total_ns / recent.len() as u128)
                .try_into()
                .unwrap_or(u64::MAX),
        )
    }

    /// Get the maximum pause time from the most recent N collections.
    ///
    /// Returns `Duration::ZERO` if no collections have been recorded.
    #[must_use]
    pub fn max_pause_time(&self, n: usize) -> Duration {
        self.recent(n)
            .iter()
            .map(|m| m.duration)
            .max()
            .unwrap_or(Duration::ZERO)
    }
}

/// Per-VM metrics state.
#[derive(Debug, Clone, Default)]
pub(crate) struct MetricsRecorder {
    pub(crate) last: GcMetrics,
    pub(crate) totals: VmTotals,
    pub(crate) history: GcHistory,
}

impl MetricsRecorder {
    /// Id the next collection will run under.
    pub(crate) const fn next_gc_id(&self) -> GcId {
        GcId(self.totals.collections as u64 + 1)
    }

    /// Record metrics for a collection.
    pub(crate) fn record(&mut self, metrics: GcMetrics) {
        self.totals.record(&metrics);
        self.history.push(metrics);
        self.last = metrics;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: u64, pause_ms: u64) -> GcMetrics {
        GcMetrics {
            gc_id: GcId(id),
            collection_type: CollectionType::Explicit,
            duration: Duration::from_millis(pause_ms),
            ..GcMetrics::new()
        }
    }

    #[test]
    fn test_gc_metrics_new_fields_default_to_zero() {
        let metrics = GcMetrics::new();

        assert_eq!(metrics.gc_id, GcId(0));
        assert_eq!(metrics.collection_type, CollectionType::None);
        assert_eq!(metrics.mark_duration, Duration::ZERO);
        assert_eq!(metrics.sweep_duration, Duration::ZERO);
        assert_eq!(metrics.objects_marked, 0);
        assert_eq!(metrics.objects_reclaimed, 0);
    }

    #[test]
    fn test_phase_timer_captures_durations() {
        let mut timer = PhaseTimer::new();

        assert_eq!(timer.mark, Duration::ZERO);
        assert_eq!(timer.sweep, Duration::ZERO);
        assert!(timer.current_start.is_none());

        timer.start();
        assert!(timer.current_start.is_some());
        std::thread::sleep(Duration::from_millis(1));
        timer.end_mark();
        assert!(timer.mark > Duration::ZERO);
        assert!(timer.current_start.is_none());

        timer.start();
        std::thread::sleep(Duration::from_millis(1));
        timer.end_sweep();
        assert!(timer.sweep > Duration::ZERO);
    }

    #[test]
    fn test_gc_history_new() {
        let history = GcHistory::new();

        assert_eq!(history.total_recorded(), 0);
        assert!(history.recent(10).is_empty());
        assert_eq!(history.average_pause_time(10), Duration::ZERO);
        assert_eq!(history.max_pause_time(10), Duration::ZERO);
    }

    #[test]
    fn test_gc_history_wraps() {
        let mut history = GcHistory::new();
        for id in 1..=(HISTORY_SIZE as u64 + 6) {
            history.push(sample(id, id));
        }

        assert_eq!(history.total_recorded(), HISTORY_SIZE + 6);
        let all = history.recent(usize::MAX);
        assert_eq!(all.len(), HISTORY_SIZE);
        assert_eq!(all[0].gc_id, GcId(7));
        assert_eq!(all[HISTORY_SIZE - 1].gc_id, GcId(HISTORY_SIZE as u64 + 6));
    }

    #[test]
    fn test_gc_history_pause_stats() {
        let mut history = GcHistory::new();
        history.push(sample(1, 2));
        history.push(sample(2, 4));
        history.push(sample(3, 9));

        assert_eq!(history.max_pause_time(3), Duration::from_millis(9));
        assert_eq!(history.max_pause_time(2), Duration::from_millis(9));
        assert_eq!(history.average_pause_time(2), Duration::from_micros(6500));
        assert_eq!(history.average_pause_time(3), Duration::from_millis(5));
    }

    #[test]
    fn test_recorder_totals() {
        let mut recorder = MetricsRecorder::default();
        assert_eq!(recorder.next_gc_id(), GcId(1));

        let mut threshold = sample(1, 1);
        threshold.collection_type = CollectionType::Threshold;
        threshold.objects_reclaimed = 5;
        recorder.record(threshold);
        recorder.record(sample(2, 1));

        assert_eq!(recorder.totals.total_collections(), 2);
        assert_eq!(recorder.totals.total_threshold_collections(), 1);
        assert_eq!(recorder.totals.total_objects_reclaimed(), 5);
        assert_eq!(recorder.totals.total_pause(), Duration::from_millis(2));
        assert_eq!(recorder.last.gc_id, GcId(2));
        assert_eq!(recorder.next_gc_id(), GcId(3));
    }
}
