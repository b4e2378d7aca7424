//! Root tracking using an explicit operand stack.
//!
//! The VM's operand stack doubles as the collector's root set: every handle
//! on it is reachable by definition, and its contents at collection time
//! are exactly the mark phase's starting frontier.

use crate::config::DEFAULT_STACK_CAPACITY;
use crate::error::VmError;
use crate::heap::Handle;

// ============================================================================
// RootStack - Root tracking structure
// ============================================================================

/// A fixed-capacity LIFO stack of object handles.
#[derive(Debug, Clone)]
pub struct RootStack {
    slots: Vec<Handle>,
    capacity: usize,
}

impl RootStack {
    /// Create an empty stack that holds at most `capacity` handles.
    ///
    /// Storage grows on demand; `capacity` only bounds it.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity.min(DEFAULT_STACK_CAPACITY)),
            capacity,
        }
    }

    /// Push a handle.
    ///
    /// # Errors
    ///
    /// Returns [`VmError::StackOverflow`] if the stack is full. The stack is
    /// left unchanged.
    pub fn push(&mut self, handle: Handle) -> Result<(), VmError> {
        self.ensure_room()?;
        self.slots.push(handle);
        Ok(())
    }

    /// Pop the top handle.
    ///
    /// # Errors
    ///
    /// Returns [`VmError::StackUnderflow`] if the stack is empty.
    pub fn pop(&mut self) -> Result<Handle, VmError> {
        self.slots.pop().ok_or(VmError::StackUnderflow)
    }

    /// Fails with `StackOverflow` unless one more push would succeed.
    pub(crate) fn ensure_room(&self) -> Result<(), VmError> {
        if self.slots.len() >= self.capacity {
            return Err(VmError::StackOverflow {
                capacity: self.capacity,
            });
        }
        Ok(())
    }

    /// The handle `depth` slots below the top (`0` is the top).
    #[must_use]
    pub fn peek(&self, depth: usize) -> Option<Handle> {
        let len = self.slots.len();
        if depth >= len {
            return None;
        }
        Some(self.slots[len - 1 - depth])
    }

    /// Number of handles on the stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the stack is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Maximum number of handles.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate handles from bottom to top.
    pub fn iter(&self) -> impl Iterator<Item = Handle> + '_ {
        self.slots.iter().copied()
    }

    /// Drop every handle.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }
}
