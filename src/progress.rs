//! Progress-callback trait for generator-loop events.
//!
//! Inject an [`Arc<dyn GenerationProgressCallback>`] via
//! [`crate::config::PipelineConfigBuilder::progress_callback`] to receive
//! events as each chunk or scene goes through the relay.
//!
//! # Example
//!
//! ```rust
//! use script2video::{GenerationProgressCallback, ItemKind, PipelineConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     completed: AtomicUsize,
//! }
//!
//! impl GenerationProgressCallback for CountingCallback {
//!     fn on_item_complete(&self, kind: ItemKind, number: usize, total: usize, len: usize) {
//!         self.completed.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{kind} {number}/{total} done ({len} chars)");
//!     }
//! }
//!
//! let counter = Arc::new(CountingCallback { completed: AtomicUsize::new(0) });
//!
//! let config = PipelineConfig::builder()
//!     .progress_callback(counter as Arc<dyn GenerationProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::output::ItemKind;
use std::sync::Arc;

/// Called by the generator loop as it processes each item.
///
/// Implementations must be `Send + Sync`: with `concurrency > 1` item events
/// may arrive from several tasks at once. All methods default to no-ops so
/// callers only override what they care about. Item numbers are 1-indexed.
pub trait GenerationProgressCallback: Send + Sync {
    /// Called once before the first item of a run.
    fn on_run_start(&self, kind: ItemKind, total: usize) {
        let _ = (kind, total);
    }

    /// Called just before the relay request is sent for an item.
    fn on_item_start(&self, kind: ItemKind, number: usize, total: usize) {
        let _ = (kind, number, total);
    }

    /// Called when an item's response arrives without the error sentinel.
    ///
    /// `response_len` is the character count of the response.
    fn on_item_complete(&self, kind: ItemKind, number: usize, total: usize, response_len: usize) {
        let _ = (kind, number, total, response_len);
    }

    /// Called when an item's response is an error sentinel.
    fn on_item_error(&self, kind: ItemKind, number: usize, total: usize, error: &str) {
        let _ = (kind, number, total, error);
    }

    /// Called once after every item of a run has been attempted.
    fn on_run_complete(&self, kind: ItemKind, total: usize, success_count: usize) {
        let _ = (kind, total, success_count);
    }
}

/// A ready-made implementation that ignores every event.
///
/// Leaving [`crate::config::PipelineConfig::progress_callback`] as `None` has
/// the same effect; this type is for callers that need a value to pass.
pub struct NoopProgressCallback;

impl GenerationProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::PipelineConfig`].
pub type ProgressCallback = Arc<dyn GenerationProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        errors: AtomicUsize,
    }

    impl GenerationProgressCallback for TrackingCallback {
        fn on_item_start(&self, _kind: ItemKind, _number: usize, _total: usize) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_item_complete(&self, _kind: ItemKind, _number: usize, _total: usize, _len: usize) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_item_error(&self, _kind: ItemKind, _number: usize, _total: usize, _error: &str) {
            self.errors.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_run_start(ItemKind::Chunk, 3);
        cb.on_item_start(ItemKind::Chunk, 1, 3);
        cb.on_item_complete(ItemKind::Chunk, 1, 3, 42);
        cb.on_item_error(ItemKind::Scene, 2, 3, "Error: timeout");
        cb.on_run_complete(ItemKind::Scene, 3, 2);
    }

    #[test]
    fn noop_callback_can_be_installed_in_config() {
        let config = crate::config::PipelineConfig::builder()
            .progress_callback(Arc::new(NoopProgressCallback))
            .build()
            .unwrap();
        assert!(config.progress_callback.is_some());
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();
        tracker.on_item_start(ItemKind::Scene, 1, 2);
        tracker.on_item_complete(ItemKind::Scene, 1, 2, 100);
        tracker.on_item_start(ItemKind::Scene, 2, 2);
        tracker.on_item_error(ItemKind::Scene, 2, 2, "Error: 500");

        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.errors.load(Ordering::SeqCst), 1);
    }
}
