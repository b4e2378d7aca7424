//! Sharing one VM between threads.
//!
//! [`SharedVm`] puts a [`Vm`] behind a `parking_lot` mutex. Every operation
//! holds the lock from start to finish, so a collection triggered on one
//! thread still runs to completion before any other thread can allocate,
//! push or pop. There is still exactly one collector per VM.
//!
//! # Examples
//!
//! ```
//! use stackvm_gc::sync::SharedVm;
//!
//! let vm = SharedVm::new();
//!
//! let workers: Vec<_> = (0..4)
//!     .map(|i| {
//!         let vm = vm.clone();
//!         std::thread::spawn(move || vm.with(|vm| vm.push_int(i).map(|_| ())))
//!     })
//!     .collect();
//! for worker in workers {
//!     worker.join().unwrap().unwrap();
//! }
//!
//! assert_eq!(vm.lock().roots().len(), 4);
//! ```

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::config::VmConfig;
use crate::Vm;

/// A cloneable, thread-safe handle to one [`Vm`].
#[derive(Debug, Clone, Default)]
pub struct SharedVm {
    inner: Arc<Mutex<Vm>>,
}

impl SharedVm {
    /// Wrap a new VM with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::from_vm(Vm::new())
    }

    /// Wrap a new VM with the given configuration.
    #[must_use]
    pub fn with_config(config: VmConfig) -> Self {
        Self::from_vm(Vm::with_config(config))
    }

    /// Wrap an existing VM.
    #[must_use]
    pub fn from_vm(vm: Vm) -> Self {
        Self {
            inner: Arc::new(Mutex::new(vm)),
        }
    }

    /// Lock the VM for a sequence of operations.
    pub fn lock(&self) -> MutexGuard<'_, Vm> {
        self.inner.lock()
    }

    /// Run `f` with exclusive access to the VM.
    pub fn with<R>(&self, f: impl FnOnce(&mut Vm) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Recover the VM if this is the last handle to it.
    ///
    /// # Errors
    ///
    /// Returns `self` unchanged if other clones are still alive.
    pub fn try_unwrap(self) -> Result<Vm, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threads_serialize_on_one_vm() {
        let config = VmConfig::default()
            .with_stack_capacity(1024)
            .with_initial_threshold(16);
        let vm = SharedVm::with_config(config);

        let workers: Vec<_> = (0..4)
            .map(|t| {
                let vm = vm.clone();
                std::thread::spawn(move || {
                    for i in 0..100 {
                        vm.with(|vm| {
                            vm.push_int(t * 1000 + i).unwrap();
                            vm.pop().unwrap();
                        });
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let vm = vm.try_unwrap().unwrap();
        assert!(vm.roots().is_empty());
        assert_eq!(vm.totals().total_objects_allocated(), 400);
        assert!(vm.totals().total_threshold_collections() > 0);
        let metrics = vm.destroy();
        assert_eq!(metrics.objects_surviving, 0);
    }

    #[test]
    fn test_try_unwrap_with_live_clone() {
        let vm = SharedVm::new();
        let other = vm.clone();
        let vm = vm.try_unwrap().unwrap_err();
        drop(other);
        assert!(vm.try_unwrap().is_ok());
    }
}
