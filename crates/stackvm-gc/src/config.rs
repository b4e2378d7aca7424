//! VM configuration.

/// Default number of root stack slots.
pub const DEFAULT_STACK_CAPACITY: usize = 256;

/// Default live-object count that triggers the first collection.
pub const DEFAULT_INITIAL_THRESHOLD: usize = 1000;

/// Smallest threshold a collection will leave behind.
///
/// Allocation triggers on `object_count == threshold`; a zero threshold
/// after collecting an empty heap would never be hit again.
pub const MIN_THRESHOLD: usize = 1;

/// How a collection recomputes the allocation threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThresholdPolicy {
    /// Twice the live-object count observed before the collection ran.
    /// The threshold never shrinks below what the heap has already reached.
    ///
    /// Like every policy this is floored at [`MIN_THRESHOLD`], so collecting
    /// an empty heap leaves a threshold of 1 rather than 0.
    #[default]
    PreCollection,
    /// Twice the number of objects that survived the collection. The
    /// threshold follows the working set and can shrink.
    Survivors,
}

impl ThresholdPolicy {
    /// Compute the next threshold from the live counts around a collection.
    #[must_use]
    pub const fn next_threshold(self, before: usize, surviving: usize) -> usize {
        let base = match self {
            Self::PreCollection => before,
            Self::Survivors => surviving,
        };
        let next = base.saturating_mul(2);
        if next < MIN_THRESHOLD {
            MIN_THRESHOLD
        } else {
            next
        }
    }
}

/// Configuration fixed for the lifetime of a [`Vm`](crate::Vm).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VmConfig {
    /// Root stack capacity.
    pub stack_capacity: usize,
    /// Threshold before the first collection.
    pub initial_threshold: usize,
    /// Threshold recompute rule.
    pub threshold_policy: ThresholdPolicy,
}

impl Default for VmConfig {
    fn default() -> Self {
        Self {
            stack_capacity: DEFAULT_STACK_CAPACITY,
            initial_threshold: DEFAULT_INITIAL_THRESHOLD,
            threshold_policy: ThresholdPolicy::default(),
        }
    }
}

impl VmConfig {
    /// Set the root stack capacity.
    #[must_use]
    pub const fn with_stack_capacity(mut self, capacity: usize) -> Self {
        self.stack_capacity = capacity;
        self
    }

    /// Set the threshold before the first collection.
    #[must_use]
    pub const fn with_initial_threshold(mut self, threshold: usize) -> Self {
        self.initial_threshold = threshold;
        self
    }

    /// Set the threshold recompute rule.
    #[must_use]
    pub const fn with_threshold_policy(mut self, policy: ThresholdPolicy) -> Self {
        self.threshold_policy = policy;
        self
    }
}
