use std::sync::Arc;

use crate::traits::segment_store::SegmentHandle;

/// Outcome of one playback attempt, delivered through [`CompletionCallback`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackOutcome {
    /// The segment played to the end.
    Completed,
    /// The device accepted the segment but could not decode or render it.
    DecodeFailed(String),
}

/// Fired exactly once per successful [`PlaybackDevice::begin`], on whatever
/// thread the device uses for notifications.
pub type CompletionCallback = Arc<dyn Fn(PlaybackOutcome) + Send + Sync + 'static>;

/// Interface for platform-specific playback outputs.
pub trait PlaybackDevice: Send + Sync {
    /// Begin playing a stored segment.
    ///
    /// On `Ok` the device owns the playback until it fires `on_finished`,
    /// exactly once. On `Err` playback never started and the callback must
    /// never fire; the scheduler treats the segment as unplayable and
    /// moves on.
    fn begin(&self, segment: &SegmentHandle, on_finished: CompletionCallback)
        -> Result<(), String>;

    /// Stop any active playback immediately, without firing its completion.
    fn halt(&self);
}
