use std::sync::atomic::{AtomicBool, Ordering};

/// Dirty flag deciding whether the next frame must rebuild geometry.
///
/// Call `mark_dirty()` whenever visual state changes, from any thread.
/// The render pass calls `consume()` once per frame; any number of marks
/// between two consumes owe exactly one rebuild.
#[derive(Debug)]
pub struct InvalidationGate {
    dirty: AtomicBool,
}

impl Default for InvalidationGate {
    /// Starts dirty so the first frame always builds.
    fn default() -> Self {
        Self {
            dirty: AtomicBool::new(true),
        }
    }
}

impl InvalidationGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_dirty(&self) {
        self.dirty.store(true, Ordering::Release);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// Read and clear in one step. Returns whether a redraw is owed.
    pub fn consume(&self) -> bool {
        self.dirty.swap(false, Ordering::AcqRel)
    }
}
