use std::sync::Arc;

use crate::models::error::PipelineError;

/// Callback invoked when a capture buffer is available.
///
/// Parameters:
/// - `samples`: Interleaved f32 samples.
/// - `sample_rate`: The actual sample rate of the delivered audio.
/// - `channels`: Number of interleaved channels (1 = mono).
pub type FrameCallback = Arc<dyn Fn(&[f32], f64, u16) + Send + Sync + 'static>;

/// Interface for platform-specific capture sources (microphones).
///
/// Implementations own their device/session setup. `start` must not block
/// latency-sensitive callers: any blocking setup work belongs on a thread
/// the implementation spawns. Setup may legitimately fail (no microphone,
/// no permission); the pipeline degrades to playback-only in that case.
pub trait CaptureDevice: Send + Sync {
    /// Whether this capture source is currently available.
    fn is_available(&self) -> bool;

    /// Start capturing audio, delivering buffers via `callback` at a
    /// steady cadence.
    ///
    /// The callback fires on a dedicated audio thread — keep processing
    /// minimal. Return [`PipelineError::DeviceSetupFailed`] when the
    /// device or session cannot be initialized.
    fn start(&mut self, callback: FrameCallback) -> Result<(), PipelineError>;

    /// Stop capturing and release device resources.
    fn stop(&mut self) -> Result<(), PipelineError>;
}
