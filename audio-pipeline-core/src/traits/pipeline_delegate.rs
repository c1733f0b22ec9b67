use crate::models::error::PipelineError;

/// Event delegate for pipeline notifications.
///
/// Methods are called from whichever thread produced the event (capture
/// callback, playback completion, or an API caller's thread).
/// Implementations should marshal to their own context if needed and must
/// not call back into the pipeline from inside a notification.
pub trait PipelineDelegate: Send + Sync {
    /// Called with a base64-encoded canonical PCM chunk ready for the
    /// transport layer.
    fn on_captured_audio(&self, encoded: &str);

    /// Called when an error occurs anywhere in the pipeline. Each error is
    /// reported exactly once and then absorbed; the pipeline keeps
    /// running. [`PipelineError::kind`] and [`PipelineError::detail`]
    /// split the notification for host-side routing.
    fn on_error(&self, error: &PipelineError);
}
