//! Progress reporting hooks.

/// Receives progress events from the pipeline.
///
/// Every method has a no-op default, so a sink only overrides what it shows.
pub trait ProgressSink: Send + Sync {
    /// A stage with `total` items begins.
    fn stage_started(&self, _name: &str, _total: u64) {}

    /// `delta` more items of the current stage are done.
    fn advance(&self, _delta: u64) {}

    /// The current stage is done.
    fn stage_finished(&self) {}
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {}
