//! Progress reporting for long-running reads and imports.
//!
//! Defines a [`ProgressCallback`] trait that decouples progress reporting
//! from any specific rendering backend. The CLI renders it with
//! `indicatif`; the server and tests use [`NullProgress`].

use std::sync::Arc;

/// Trait for reporting progress from long-running operations.
///
/// Implementations must be `Send + Sync` so they can be shared behind an
/// `Arc` across async tasks.
pub trait ProgressCallback: Send + Sync {
    /// Set the total expected units of work (enables percentage/ETA).
    fn set_total(&self, total: u64);

    /// Advance progress by `delta` units.
    fn inc(&self, delta: u64);

    /// Update the message displayed alongside the progress indicator.
    fn set_message(&self, msg: String);

    /// Mark progress as complete with a final message.
    fn finish(&self, msg: String);
}

/// A [`ProgressCallback`] that ignores all updates.
pub struct NullProgress;

impl ProgressCallback for NullProgress {
    fn set_total(&self, _total: u64) {}
    fn inc(&self, _delta: u64) {}
    fn set_message(&self, _msg: String) {}
    fn finish(&self, _msg: String) {}
}

/// Returns a shared [`NullProgress`] instance.
#[must_use]
pub fn null_progress() -> Arc<dyn ProgressCallback> {
    Arc::new(NullProgress)
}
