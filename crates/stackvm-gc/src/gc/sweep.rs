//! Sweep phase.

use crate::heap::Heap;

/// Reclaim every unmarked object in one pass over the object list.
///
/// Unreached objects are unlinked in place and their slots vacated;
/// survivors have their mark cleared. Returns the number of objects
/// reclaimed.
pub(crate) fn sweep(heap: &mut Heap) -> usize {
    let mut reclaimed = 0;
    // Last survivor seen, whose `next` link is rewritten on unlink.
    let mut prev: Option<u32> = None;
    let mut cursor = heap.first;

    while let Some(index) = cursor {
        let Some(object) = heap.object_at_mut(index) else {
            break;
        };
        let next = object.next;

        if object.marked {
            object.marked = false;
            prev = Some(index);
        } else {
            match prev {
                None => heap.first = next,
                Some(prev) => {
                    if let Some(survivor) = heap.object_at_mut(prev) {
                        survivor.next = next;
                    }
                }
            }
            heap.release(index);
            reclaimed += 1;
        }

        cursor = next;
    }

    reclaimed
}
