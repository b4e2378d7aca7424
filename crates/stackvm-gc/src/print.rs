//! Debug printing of heap objects.
//!
//! Scalars print their value; a pair prints as `(head, tail)`, following
//! both fields. Nesting depth is bounded by the heap, not the call stack.
//! There is no cycle detection: printing a cyclic structure never
//! terminates.

use std::fmt;

use crate::heap::{Handle, Heap};
use crate::object::Value;

/// A [`Display`](fmt::Display) adapter for an object and everything it
/// references.
#[derive(Debug, Clone, Copy)]
pub struct ObjectDisplay<'a> {
    heap: &'a Heap,
    handle: Handle,
}

impl<'a> ObjectDisplay<'a> {
    pub(crate) const fn new(heap: &'a Heap, handle: Handle) -> Self {
        Self { heap, handle }
    }
}

impl fmt::Display for ObjectDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_object(self.heap, self.handle, f)
    }
}

/// Pending output while printing.
enum Step {
    Object(Handle),
    Text(&'static str),
}

fn write_object(heap: &Heap, handle: Handle, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    // Pair fields are pushed in reverse so they pop in print order.
    let mut pending = vec![Step::Object(handle)];
    while let Some(step) = pending.pop() {
        let handle = match step {
            Step::Text(text) => {
                f.write_str(text)?;
                continue;
            }
            Step::Object(handle) => handle,
        };
        let Some(object) = heap.get(handle) else {
            f.write_str("<reclaimed>")?;
            continue;
        };
        match object.value() {
            Value::Int(value) => write!(f, "{value}")?,
            Value::Float(value) => write!(f, "{value:.6}")?,
            Value::String(text) => f.write_str(text)?,
            Value::Pair { head, tail } => {
                f.write_str("(")?;
                pending.extend([
                    Step::Text(")"),
                    Step::Object(*tail),
                    Step::Text(", "),
                    Step::Object(*head),
                ]);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars() {
        let mut heap = Heap::new();
        let int = heap.insert(Value::Int(-42));
        let float = heap.insert(Value::Float(5.3));
        let text = heap.insert(Value::String("This is a test".into()));

        assert_eq!(ObjectDisplay::new(&heap, int).to_string(), "-42");
        assert_eq!(ObjectDisplay::new(&heap, float).to_string(), "5.300000");
        assert_eq!(ObjectDisplay::new(&heap, text).to_string(), "This is a test");
    }

    #[test]
    fn test_nested_pairs() {
        let mut heap = Heap::new();
        let one = heap.insert(Value::Int(1));
        let two = heap.insert(Value::Int(2));
        let inner = heap.insert(Value::Pair {
            head: one,
            tail: two,
        });
        let outer = heap.insert(Value::Pair {
            head: inner,
            tail: inner,
        });

        assert_eq!(
            ObjectDisplay::new(&heap, outer).to_string(),
            "((1, 2), (1, 2))"
        );
    }

    #[test]
    fn test_reclaimed_handle() {
        let mut heap = Heap::new();
        let gone = heap.insert(Value::Int(1));
        heap.first = None;
        heap.release(gone.index());

        assert_eq!(ObjectDisplay::new(&heap, gone).to_string(), "<reclaimed>");
    }
}
