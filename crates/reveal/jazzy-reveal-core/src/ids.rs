//! Identifiers for tracked elements.

use serde::{Deserialize, Serialize};

/// Stable id assigned when an element becomes tracked. Events refer to
/// elements by this id since host handles are not serializable.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct TrackId(pub u32);

/// Monotonic allocator; ids are never reused within one engine.
#[derive(Default, Debug)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc(&mut self) -> TrackId {
        let id = TrackId(self.next);
        self.next = self.next.wrapping_add(1);
        id
    }
}
