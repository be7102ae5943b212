use std::sync::atomic::{AtomicU64, Ordering};

use crate::talker::Talker;

/// Hands out unique talker IDs for the lifetime of the process.
///
/// The counter is not persisted; it is reseeded at startup by scanning the
/// collection, so restarts continue above the highest surviving ID.
#[derive(Debug)]
pub struct IdAllocator {
    next: AtomicU64,
}

impl IdAllocator {
    /// Creates an allocator whose first ID is one above the highest ID in
    /// the collection, or 1 when the collection is empty.
    pub fn seeded(collection: &[Talker]) -> Self {
        let max = collection.iter().map(Talker::id).max().unwrap_or(0);

        IdAllocator {
            next: AtomicU64::new(max + 1),
        }
    }

    /// Returns the next ID, advancing the counter.
    pub fn next(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}
