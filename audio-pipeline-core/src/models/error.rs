use thiserror::Error;

/// Errors that can occur in the audio pipeline.
///
/// Every error is reported once through [`PipelineDelegate::on_error`] and
/// then absorbed locally: no variant is fatal to the pipeline, which keeps
/// running in degraded form (e.g. without capture) rather than crash.
///
/// [`PipelineDelegate::on_error`]: crate::traits::pipeline_delegate::PipelineDelegate::on_error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Capture device/session setup failed; the pipeline degrades to
    /// playback-only instead of aborting.
    #[error("device setup failed: {0}")]
    DeviceSetupFailed(String),

    /// Malformed playback payload, rejected before it reaches the queue.
    #[error("invalid segment payload: {0}")]
    InvalidData(String),

    /// Destination buffer allocation failed; the frame is skipped.
    #[error("buffer allocation failed: {0}")]
    BufferAllocationFailed(String),

    /// Persisting a segment failed; the segment is never enqueued.
    #[error("storage write failed: {0}")]
    StorageWriteFailed(String),

    /// The playback device refused a segment; the queue advances past it.
    #[error("playback start failed: {0}")]
    PlaybackStartFailed(String),

    /// The playback device could not decode a segment it had accepted.
    /// Treated as a completion for scheduling purposes.
    #[error("playback decode error: {0}")]
    PlaybackDecodeError(String),
}

impl PipelineError {
    /// Stable identifier for host-side error routing.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DeviceSetupFailed(_) => "device_setup_failed",
            Self::InvalidData(_) => "invalid_data",
            Self::BufferAllocationFailed(_) => "buffer_allocation_failed",
            Self::StorageWriteFailed(_) => "storage_write_failed",
            Self::PlaybackStartFailed(_) => "playback_start_failed",
            Self::PlaybackDecodeError(_) => "playback_decode_error",
        }
    }

    /// The human-readable detail portion of the error.
    pub fn detail(&self) -> &str {
        match self {
            Self::DeviceSetupFailed(detail)
            | Self::InvalidData(detail)
            | Self::BufferAllocationFailed(detail)
            | Self::StorageWriteFailed(detail)
            | Self::PlaybackStartFailed(detail)
            | Self::PlaybackDecodeError(detail) => detail,
        }
    }
}
