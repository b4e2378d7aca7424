//! Errors reported at the VM's API boundary.
//!
//! Every fallible operation checks its preconditions before touching the
//! heap or the root stack, so an `Err` always means nothing was changed.

use std::error::Error;
use std::fmt;

use crate::heap::Handle;

/// An error returned by a [`Vm`](crate::Vm) operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmError {
    /// A push would exceed the root stack's fixed capacity.
    StackOverflow {
        /// Capacity of the root stack that rejected the push.
        capacity: usize,
    },
    /// A pop (or a pair construction) needed more handles than the root
    /// stack holds.
    StackUnderflow,
    /// The handle does not name a live object in this VM: its object has
    /// been reclaimed, or it was issued by another VM.
    InvalidHandle(Handle),
    /// A head/tail write targeted an object that is not a pair.
    NotAPair(Handle),
}

impl fmt::Display for VmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StackOverflow { capacity } => {
                write!(f, "stack overflow: root stack is full ({capacity} slots)")
            }
            Self::StackUnderflow => f.write_str("stack underflow: root stack is empty"),
            Self::InvalidHandle(handle) => write!(f, "handle {handle} does not name a live object"),
            Self::NotAPair(handle) => write!(f, "object {handle} is not a pair"),
        }
    }
}

impl Error for VmError {}
