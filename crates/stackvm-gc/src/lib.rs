//! A mark-sweep collected heap for a small stack-based virtual machine.
//!
//! `stackvm-gc` provides a [`Vm`] context that owns a heap of tagged objects
//! (integers, floats, strings and pairs) and an explicit, bounded operand
//! stack. The operand stack is the collector's root set: an object survives
//! a collection exactly when it can be reached from some stack slot by
//! following zero or more pair fields. Cycles between pairs are handled.
//!
//! # Features
//!
//! - **Stop-the-world mark-sweep**: iterative marking from the root stack,
//!   then one in-place pass over the heap's intrusive object list
//! - **Generational handles**: objects live in a slab; a handle to a
//!   reclaimed object is detected rather than aliasing its slot's next tenant
//! - **Adaptive trigger**: allocation collects first when the live-object
//!   count reaches a threshold, which each collection recomputes
//! - **Structured logging**: collection spans and events through `tracing`
//!   (the default `tracing` feature)
//!
//! # Quick Start
//!
//! ```
//! use stackvm_gc::Vm;
//!
//! let mut vm = Vm::new();
//! vm.push_string("This is a test")?;
//! vm.push_float(5.3)?;
//! let pair = vm.push_pair()?;
//! assert_eq!(vm.display(pair).to_string(), "(This is a test, 5.300000)");
//! # Ok::<(), stackvm_gc::VmError>(())
//! ```
//!
//! # Handling Cycles
//!
//! ```
//! use stackvm_gc::Vm;
//!
//! let mut vm = Vm::new();
//! vm.push_int(1)?;
//! vm.push_int(2)?;
//! let a = vm.push_pair()?;
//! vm.push_int(3)?;
//! vm.push_int(4)?;
//! let b = vm.push_pair()?;
//!
//! // a -> b -> a; the leaves 2 and 4 become unreachable.
//! vm.set_tail(a, b)?;
//! vm.set_tail(b, a)?;
//!
//! vm.collect();
//! assert_eq!(vm.object_count(), 4);
//! # Ok::<(), stackvm_gc::VmError>(())
//! ```
//!
//! # Thread Safety
//!
//! A `Vm` is `Send` but every operation takes `&mut self`. Use
//! [`sync::SharedVm`] to share one VM between threads behind a mutex.

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod error;
mod gc;
mod metrics;
mod object;
mod print;
mod roots;
mod tracing;
mod vm;

/// Object storage internals.
///
/// This module is public for inspection and testing. Most users should go
/// through [`Vm`].
pub mod heap;
pub mod sync;

// Re-export public API
pub use config::{
    ThresholdPolicy, VmConfig, DEFAULT_INITIAL_THRESHOLD, DEFAULT_STACK_CAPACITY, MIN_THRESHOLD,
};
pub use error::VmError;
pub use heap::Handle;
pub use metrics::{CollectionType, GcHistory, GcMetrics, VmTotals, HISTORY_SIZE};
pub use object::{Object, ObjectKind, Value};
pub use print::ObjectDisplay;
pub use roots::RootStack;
pub use tracing::{GcId, GcPhase};
pub use vm::Vm;
