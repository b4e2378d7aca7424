//! The heap object model.
//!
//! Every object the VM allocates is an [`Object`]: a [`Value`] payload plus
//! the two pieces of collector bookkeeping, the mark bit and the intrusive
//! link that threads all live objects into the heap's object list.

use crate::heap::Handle;

/// Discriminant of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// A 64-bit signed integer.
    Int,
    /// A 64-bit float.
    Float,
    /// An owned string.
    String,
    /// A pair of references to other heap objects.
    Pair,
}

/// Payload of a heap object.
///
/// `Pair` fields are non-owning references into the same heap. They may
/// point at any live object, including the pair itself or one of its
/// ancestors.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An integer.
    Int(i64),
    /// A float.
    Float(f64),
    /// A string.
    String(String),
    /// A `(head, tail)` pair.
    Pair {
        /// First element.
        head: Handle,
        /// Second element.
        tail: Handle,
    },
}

impl Value {
    /// Returns the tag of this value.
    #[must_use]
    pub const fn kind(&self) -> ObjectKind {
        match self {
            Self::Int(_) => ObjectKind::Int,
            Self::Float(_) => ObjectKind::Float,
            Self::String(_) => ObjectKind::String,
            Self::Pair { .. } => ObjectKind::Pair,
        }
    }

    /// Returns `(head, tail)` if this is a pair.
    #[must_use]
    pub const fn as_pair(&self) -> Option<(Handle, Handle)> {
        match *self {
            Self::Pair { head, tail } => Some((head, tail)),
            _ => None,
        }
    }

    /// Returns the integer if this is an `Int`.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match *self {
            Self::Int(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the float if this is a `Float`.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match *self {
            Self::Float(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the text if this is a `String`.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text),
            _ => None,
        }
    }
}

/// A live heap object.
#[derive(Debug)]
pub struct Object {
    /// Reachability flag. Only ever `true` between the mark and sweep phases
    /// of a collection.
    pub(crate) marked: bool,
    /// Slot of the next object in the heap's object list. This is heap
    /// bookkeeping, not a reachability edge.
    pub(crate) next: Option<u32>,
    pub(crate) value: Value,
}

impl Object {
    pub(crate) const fn new(value: Value, next: Option<u32>) -> Self {
        Self {
            marked: false,
            next,
            value,
        }
    }

    /// The object's payload.
    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    /// The object's tag.
    #[must_use]
    pub const fn kind(&self) -> ObjectKind {
        self.value.kind()
    }

    /// Whether the collector has marked this object. Always `false` outside
    /// of a collection.
    #[must_use]
    pub const fn is_marked(&self) -> bool {
        self.marked
    }
}
