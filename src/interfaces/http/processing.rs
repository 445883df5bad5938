use std::sync::atomic::{AtomicBool, Ordering};

/// Advisory "a CSV run is in flight" flag.
///
/// Held for the duration of one upload and cleared on drop, so every exit
/// path (success, error, cancelled request) releases it.
pub struct ProcessingGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ProcessingGuard<'a> {
    /// `None` if another run already holds the flag
    pub fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
