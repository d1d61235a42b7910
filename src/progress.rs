//! Progress reporting for classification runs.
//!
//! A callback receives a [`Progress`] snapshot every `progress_interval`
//! records, and once more when the last record is done.
//!
//! # Example
//!
//! ```rust
//! use chatcat::progress::{Progress, ProgressCallback};
//! use std::sync::Arc;
//!
//! let callback: ProgressCallback = Arc::new(|progress| {
//!     println!("{}/{} ({:.1}%)", progress.items_processed, progress.total_items, progress.percentage());
//! });
//!
//! for done in (50..=200).step_by(50) {
//!     callback(Progress::new(done, 200));
//! }
//! ```

use std::sync::Arc;

/// Snapshot of a running classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    /// Records classified so far.
    pub items_processed: usize,

    /// Records in this run.
    pub total_items: usize,
}

impl Progress {
    pub fn new(items_processed: usize, total_items: usize) -> Self {
        Self {
            items_processed,
            total_items,
        }
    }

    /// Returns the progress as a percentage (0.0 - 100.0).
    ///
    /// An empty run counts as complete.
    ///
    /// ```rust
    /// use chatcat::progress::Progress;
    ///
    /// assert_eq!(Progress::new(50, 200).percentage(), 25.0);
    /// assert_eq!(Progress::new(0, 0).percentage(), 100.0);
    /// ```
    pub fn percentage(&self) -> f64 {
        if self.total_items == 0 {
            100.0
        } else {
            (self.items_processed as f64 / self.total_items as f64) * 100.0
        }
    }

    pub fn is_complete(&self) -> bool {
        self.items_processed >= self.total_items
    }

    pub fn remaining(&self) -> usize {
        self.total_items.saturating_sub(self.items_processed)
    }
}

/// Callback type for receiving progress updates.
pub type ProgressCallback = Arc<dyn Fn(Progress) + Send + Sync>;

/// Creates a no-op progress callback.
pub fn no_progress() -> ProgressCallback {
    Arc::new(|_| {})
}

/// Creates a progress callback that prints a line to stdout per update.
pub fn stdout_progress() -> ProgressCallback {
    Arc::new(|progress| {
        println!(
            "   ⏳ Processed {}/{} conversations ({:.1}%)",
            progress.items_processed,
            progress.total_items,
            progress.percentage()
        );
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_percentage() {
        assert_eq!(Progress::new(1, 4).percentage(), 25.0);
    }

    #[test]
    fn test_progress_is_complete() {
        assert!(Progress::new(10, 10).is_complete());
        assert!(!Progress::new(9, 10).is_complete());
        assert!(Progress::new(0, 0).is_complete());
    }

    #[test]
    fn test_progress_remaining() {
        assert_eq!(Progress::new(300, 1000).remaining(), 700);
        assert_eq!(Progress::new(5, 3).remaining(), 0);
    }

    #[test]
    fn test_no_progress_callback() {
        let callback = no_progress();
        callback(Progress::default());
    }

    #[test]
    fn test_progress_callback_type() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let counter = Arc::new(AtomicUsize::new(0));
        let counter_clone = counter.clone();

        let callback: ProgressCallback = Arc::new(move |progress| {
            counter_clone.store(progress.items_processed, Ordering::SeqCst);
        });

        callback(Progress::new(42, 100));
        assert_eq!(counter.load(Ordering::SeqCst), 42);
    }
}
