use std::sync::atomic::{AtomicU64, Ordering};

/// Counts clicks on the resume link.
///
/// Owned by [`crate::handlers::AppState`] and shared between request
/// handlers. The count lives only as long as the process: it starts at zero
/// on every start and is never persisted. Increments are a single atomic
/// read-modify-write, so concurrent handlers never lose an update.
#[derive(Debug, Default)]
pub struct ResumeClickCounter {
    count: AtomicU64,
}

impl ResumeClickCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one click and returns the new total.
    pub fn increment(&self) -> u64 {
        self.count.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current(&self) -> u64 {
        self.count.load(Ordering::SeqCst)
    }
}
