//! The VM context.
//!
//! A [`Vm`] owns a heap, the root stack and the collector state. Every
//! mutating operation takes `&mut self`, so exclusive access, and with it
//! the stop-the-world discipline of the collector, is enforced by the borrow
//! checker rather than by locks. Separate VMs share nothing.

use crate::config::VmConfig;
use crate::error::VmError;
use crate::gc::Collection;
use crate::heap::{Handle, Heap};
use crate::metrics::{CollectionType, GcHistory, GcMetrics, MetricsRecorder, VmTotals};
use crate::object::{Object, Value};
use crate::print::ObjectDisplay;
use crate::roots::RootStack;

/// A stack VM with a mark-sweep collected heap.
///
/// # Example
///
/// ```
/// use stackvm_gc::Vm;
///
/// let mut vm = Vm::new();
/// vm.push_int(1)?;
/// vm.push_int(2)?;
/// let pair = vm.push_pair()?;
/// assert_eq!(vm.display(pair).to_string(), "(1, 2)");
///
/// vm.pop()?;
/// vm.collect();
/// assert_eq!(vm.object_count(), 0);
/// # Ok::<(), stackvm_gc::VmError>(())
/// ```
#[derive(Debug)]
pub struct Vm {
    heap: Heap,
    roots: RootStack,
    threshold: usize,
    config: VmConfig,
    metrics: MetricsRecorder,
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}

impl Vm {
    /// Create a VM with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(VmConfig::default())
    }

    /// Create a VM with the given configuration.
    #[must_use]
    pub fn with_config(config: VmConfig) -> Self {
        Self {
            heap: Heap::new(),
            roots: RootStack::with_capacity(config.stack_capacity),
            threshold: config.initial_threshold,
            config,
            metrics: MetricsRecorder::default(),
        }
    }

    // ------------------------------------------------------------------------
    // Allocation
    // ------------------------------------------------------------------------

    /// Allocate an object, collecting first if the heap has reached the
    /// threshold. The new object is unreachable until the caller roots it.
    fn allocate(&mut self, value: Value) -> Handle {
        debug_assert!(self.heap.len() <= self.threshold);
        if self.heap.len() == self.threshold {
            self.collection().run(CollectionType::Threshold);
        }
        let handle = self.heap.insert(value);
        self.metrics.totals.record_allocation();
        handle
    }

    fn push_value(&mut self, value: Value) -> Result<Handle, VmError> {
        // Check before allocating so an overflow leaves the heap untouched.
        self.roots.ensure_room()?;
        let handle = self.allocate(value);
        self.roots.push(handle)?;
        Ok(handle)
    }

    /// Allocate an integer and push it.
    ///
    /// # Errors
    ///
    /// Returns [`VmError::StackOverflow`] if the root stack is full; nothing
    /// is allocated in that case.
    pub fn push_int(&mut self, value: i64) -> Result<Handle, VmError> {
        self.push_value(Value::Int(value))
    }

    /// Allocate a float and push it.
    ///
    /// # Errors
    ///
    /// Returns [`VmError::StackOverflow`] if the root stack is full.
    pub fn push_float(&mut self, value: f64) -> Result<Handle, VmError> {
        self.push_value(Value::Float(value))
    }

    /// Allocate a string and push it.
    ///
    /// # Errors
    ///
    /// Returns [`VmError::StackOverflow`] if the root stack is full.
    pub fn push_string(&mut self, text: impl Into<String>) -> Result<Handle, VmError> {
        self.push_value(Value::String(text.into()))
    }

    /// Pop the tail and then the head off the stack, allocate a pair of
    /// them and push it.
    ///
    /// # Errors
    ///
    /// Returns [`VmError::StackUnderflow`] if fewer than two handles are on
    /// the stack; the stack and heap are left unchanged.
    pub fn push_pair(&mut self) -> Result<Handle, VmError> {
        let (Some(tail), Some(head)) = (self.roots.peek(0), self.roots.peek(1)) else {
            return Err(VmError::StackUnderflow);
        };
        // The operands stay on the stack, and so stay rooted, through any
        // collection the allocation runs.
        let pair = self.allocate(Value::Pair { head, tail });
        self.roots.pop()?;
        self.roots.pop()?;
        self.roots.push(pair)?;
        Ok(pair)
    }

    /// Pop the top handle. The object stays allocated until a collection
    /// finds it unreachable.
    ///
    /// # Errors
    ///
    /// Returns [`VmError::StackUnderflow`] if the stack is empty.
    pub fn pop(&mut self) -> Result<Handle, VmError> {
        self.roots.pop()
    }

    // ------------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------------

    fn pair_mut(&mut self, pair: Handle, value: Handle) -> Result<&mut Value, VmError> {
        if !self.heap.contains(value) {
            return Err(VmError::InvalidHandle(value));
        }
        let object = self
            .heap
            .get_mut(pair)
            .ok_or(VmError::InvalidHandle(pair))?;
        if matches!(object.value, Value::Pair { .. }) {
            Ok(&mut object.value)
        } else {
            Err(VmError::NotAPair(pair))
        }
    }

    /// Overwrite the head of a pair.
    ///
    /// # Errors
    ///
    /// Returns [`VmError::InvalidHandle`] if either handle does not name a
    /// live object, or [`VmError::NotAPair`] if `pair` is a scalar.
    pub fn set_head(&mut self, pair: Handle, value: Handle) -> Result<(), VmError> {
        if let Value::Pair { head, .. } = self.pair_mut(pair, value)? {
            *head = value;
        }
        Ok(())
    }

    /// Overwrite the tail of a pair.
    ///
    /// # Errors
    ///
    /// Returns [`VmError::InvalidHandle`] if either handle does not name a
    /// live object, or [`VmError::NotAPair`] if `pair` is a scalar.
    pub fn set_tail(&mut self, pair: Handle, value: Handle) -> Result<(), VmError> {
        if let Value::Pair { tail, .. } = self.pair_mut(pair, value)? {
            *tail = value;
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Collection
    // ------------------------------------------------------------------------

    fn collection(&mut self) -> Collection<'_> {
        Collection {
            heap: &mut self.heap,
            roots: &self.roots,
            threshold: &mut self.threshold,
            policy: self.config.threshold_policy,
            recorder: &mut self.metrics,
        }
    }

    /// Force a full collection.
    pub fn collect(&mut self) -> GcMetrics {
        self.collection().run(CollectionType::Explicit)
    }

    /// Empty the root stack, collect everything and release the VM.
    pub fn destroy(mut self) -> GcMetrics {
        self.roots.clear();
        let metrics = self.collection().run(CollectionType::Teardown);
        debug_assert!(self.heap.is_empty());
        metrics
    }

    // ------------------------------------------------------------------------
    // Inspection
    // ------------------------------------------------------------------------

    /// Look up a live object.
    #[must_use]
    pub fn get(&self, handle: Handle) -> Option<&Object> {
        self.heap.get(handle)
    }

    /// Whether `handle` names a live object.
    #[must_use]
    pub fn is_live(&self, handle: Handle) -> bool {
        self.heap.contains(handle)
    }

    /// Number of live objects.
    #[must_use]
    pub const fn object_count(&self) -> usize {
        self.heap.len()
    }

    /// Live-object count at which the next allocation collects first.
    #[must_use]
    pub const fn threshold(&self) -> usize {
        self.threshold
    }

    /// The heap.
    #[must_use]
    pub const fn heap(&self) -> &Heap {
        &self.heap
    }

    /// The root stack.
    #[must_use]
    pub const fn roots(&self) -> &RootStack {
        &self.roots
    }

    /// The configuration this VM was created with.
    #[must_use]
    pub const fn config(&self) -> &VmConfig {
        &self.config
    }

    /// Metrics of the most recent collection.
    #[must_use]
    pub const fn last_metrics(&self) -> GcMetrics {
        self.metrics.last
    }

    /// Cumulative statistics.
    #[must_use]
    pub const fn totals(&self) -> VmTotals {
        self.metrics.totals
    }

    /// Recent collections.
    #[must_use]
    pub const fn history(&self) -> &GcHistory {
        &self.metrics.history
    }

    /// A [`Display`](std::fmt::Display) rendering of `handle`.
    #[must_use]
    pub const fn display(&self, handle: Handle) -> ObjectDisplay<'_> {
        ObjectDisplay::new(&self.heap, handle)
    }

    /// Print `handle` to stdout, without a trailing newline.
    pub fn print(&self, handle: Handle) {
        print!("{}", self.display(handle));
    }
}
