//! Mark phase.
//!
//! Marking is iterative: handles wait on an explicit worklist instead of the
//! call stack, so arbitrarily deep pair chains cannot overflow it. An object
//! is marked when it is first discovered and never queued again, which is
//! what makes cyclic graphs terminate.

use crate::heap::{Handle, Heap};
use crate::roots::RootStack;

/// Marks everything reachable from a set of roots.
#[derive(Debug)]
pub(crate) struct MarkVisitor {
    worklist: Vec<Handle>,
    objects_marked: usize,
}

impl MarkVisitor {
    pub(crate) fn new() -> Self {
        Self {
            worklist: Vec::with_capacity(64),
            objects_marked: 0,
        }
    }

    /// Get the count of objects marked by this visitor.
    pub(crate) const fn objects_marked(&self) -> usize {
        self.objects_marked
    }

    /// Mark `handle` if it is not marked yet and queue it for tracing.
    pub(crate) fn visit(&mut self, heap: &mut Heap, handle: Handle) {
        // Roots and pair fields always name live objects.
        let Some(object) = heap.get_mut(handle) else {
            return;
        };
        if object.marked {
            return;
        }
        object.marked = true;
        self.objects_marked += 1;
        self.worklist.push(handle);
    }

    /// Trace queued objects until the worklist drains.
    pub(crate) fn process_worklist(&mut self, heap: &mut Heap) {
        while let Some(handle) = self.worklist.pop() {
            let Some((head, tail)) = heap.get(handle).and_then(|o| o.value.as_pair()) else {
                continue;
            };
            self.visit(heap, head);
            self.visit(heap, tail);
        }
    }
}

/// Mark every object reachable from `roots`. Returns the number of objects
/// marked.
pub(crate) fn mark_all(heap: &mut Heap, roots: &RootStack) -> usize {
    let mut visitor = MarkVisitor::new();
    for root in roots.iter() {
        visitor.visit(heap, root);
        visitor.process_worklist(heap);
    }
    visitor.objects_marked()
}
