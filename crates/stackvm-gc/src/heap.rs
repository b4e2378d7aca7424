//! Object storage.
//!
//! The heap is a slab of slots. Occupied slots hold an [`Object`]; vacant
//! slots form a free list that allocation pops from before growing the slab.
//! Independently of slab order, every live object is threaded onto an
//! intrusive singly linked list (most recently allocated first) through its
//! `next` field. The sweep phase walks and rewrites that list in place.
//!
//! Objects are named by [`Handle`]s: a slot index plus the slot's
//! generation. Reclaiming a slot bumps its generation, so a handle that
//! outlives its object never resolves to whatever object reuses the slot.
//! Each heap also stamps its own id into the handles it issues, so a handle
//! from another heap never resolves here.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::object::{Object, Value};

// ============================================================================
// Handle
// ============================================================================

/// A non-owning reference to a heap object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    heap: u32,
    index: u32,
    generation: u32,
}

impl Handle {
    /// Slot index of the referenced object.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Generation of the slot at the time the handle was issued.
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

// ============================================================================
// Slots
// ============================================================================

#[derive(Debug)]
pub(crate) enum Slot {
    Occupied(Object),
    Vacant { next_free: Option<u32> },
}

#[derive(Debug)]
pub(crate) struct Entry {
    pub(crate) generation: u32,
    pub(crate) slot: Slot,
}

// ============================================================================
// Heap
// ============================================================================

/// The registry of every live object.
#[derive(Debug)]
pub struct Heap {
    /// Stamped into every handle this heap issues.
    id: u32,
    pub(crate) entries: Vec<Entry>,
    /// Most recently vacated slot.
    pub(crate) free_head: Option<u32>,
    /// Most recently allocated live object.
    pub(crate) first: Option<u32>,
    pub(crate) live: usize,
}

static NEXT_HEAP_ID: AtomicU32 = AtomicU32::new(0);

impl Default for Heap {
    fn default() -> Self {
        Self::new()
    }
}

impl Heap {
    /// Create an empty heap with a fresh id.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: NEXT_HEAP_ID.fetch_add(1, Ordering::Relaxed),
            entries: Vec::new(),
            free_head: None,
            first: None,
            live: 0,
        }
    }

    /// Number of live objects.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.live
    }

    /// Whether the heap holds no live objects.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of slots ever created, live or vacant.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.entries.len()
    }

    /// Store a new unmarked object and link it at the front of the object
    /// list. Does not collect; the VM decides that before calling.
    pub(crate) fn insert(&mut self, value: Value) -> Handle {
        let object = Object::new(value, self.first);

        let index = if let Some(index) = self.free_head {
            let entry = &mut self.entries[index as usize];
            let Slot::Vacant { next_free } = entry.slot else {
                unreachable!("free list points at an occupied slot");
            };
            self.free_head = next_free;
            entry.slot = Slot::Occupied(object);
            index
        } else {
            let Ok(index) = u32::try_from(self.entries.len()) else {
                panic!("heap exhausted: more than u32::MAX slots");
            };
            self.entries.push(Entry {
                generation: 0,
                slot: Slot::Occupied(object),
            });
            index
        };

        self.first = Some(index);
        self.live += 1;

        Handle {
            heap: self.id,
            index,
            generation: self.entries[index as usize].generation,
        }
    }

    /// Vacate an occupied slot. The caller must already have unlinked the
    /// object from the object list.
    pub(crate) fn release(&mut self, index: u32) {
        let entry = &mut self.entries[index as usize];
        debug_assert!(matches!(entry.slot, Slot::Occupied(_)));
        entry.slot = Slot::Vacant {
            next_free: self.free_head,
        };
        entry.generation = entry.generation.wrapping_add(1);
        self.free_head = Some(index);
        self.live -= 1;
    }

    /// Look up a live object.
    #[must_use]
    pub fn get(&self, handle: Handle) -> Option<&Object> {
        match self.entries.get(handle.index as usize) {
            Some(Entry {
                generation,
                slot: Slot::Occupied(object),
            }) if handle.heap == self.id && *generation == handle.generation => Some(object),
            _ => None,
        }
    }

    pub(crate) fn get_mut(&mut self, handle: Handle) -> Option<&mut Object> {
        match self.entries.get_mut(handle.index as usize) {
            Some(Entry {
                generation,
                slot: Slot::Occupied(object),
            }) if handle.heap == self.id && *generation == handle.generation => Some(object),
            _ => None,
        }
    }

    /// Object at a slot index, ignoring generations. Used by the sweep,
    /// which only follows object-list links.
    pub(crate) fn object_at_mut(&mut self, index: u32) -> Option<&mut Object> {
        match self.entries.get_mut(index as usize) {
            Some(Entry {
                slot: Slot::Occupied(object),
                ..
            }) => Some(object),
            _ => None,
        }
    }

    /// Whether `handle` names a live object.
    #[must_use]
    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    /// Iterate live objects in object-list order (most recent first).
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            heap: self,
            cursor: self.first,
        }
    }
}

/// Iterator over live objects, most recently allocated first.
#[derive(Debug)]
pub struct Iter<'a> {
    heap: &'a Heap,
    cursor: Option<u32>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (Handle, &'a Object);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        let entry = &self.heap.entries[index as usize];
        let Slot::Occupied(object) = &entry.slot else {
            self.cursor = None;
            return None;
        };
        self.cursor = object.next;
        Some((
            Handle {
                heap: self.heap.id,
                index,
                generation: entry.generation,
            },
            object,
        ))
    }
}
