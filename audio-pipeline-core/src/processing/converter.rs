use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::models::error::PipelineError;
use crate::models::frame::{CanonicalPcm, FrameBuffer};

/// Canonical wire sample rate in Hz.
pub const CANONICAL_SAMPLE_RATE: u32 = 48_000;

/// Capture-side sample format converter.
///
/// Turns one native f32 frame buffer into one canonical 16-bit mono PCM
/// buffer: channel 0 of each frame is clamped to `[-1.0, 1.0]`, scaled by
/// `i16::MAX`, truncated, and written little-endian. The clamp is
/// mandatory — unclamped values would wrap in the 16-bit range and corrupt
/// the audio.
///
/// The converter keeps no state between calls beyond reading the shared
/// mute flag, so calls are safe in any order and from any thread.
#[derive(Clone)]
pub struct CaptureConverter {
    muted: Arc<AtomicBool>,
}

impl CaptureConverter {
    /// Create a converter reading the given shared mute flag.
    pub fn new(muted: Arc<AtomicBool>) -> Self {
        Self { muted }
    }

    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::SeqCst)
    }

    /// Convert one native frame buffer into canonical PCM.
    ///
    /// Returns `Ok(None)` ("skipped") while muted — not an error; the
    /// caller simply emits nothing. For multi-channel input only channel 0
    /// is extracted; the remaining channels are discarded.
    pub fn convert(&self, frame: &FrameBuffer<'_>) -> Result<Option<CanonicalPcm>, PipelineError> {
        if self.is_muted() {
            return Ok(None);
        }

        let frame_count = frame.frame_count();
        let channels = frame.channels.max(1) as usize;

        let mut data = Vec::new();
        data.try_reserve_exact(frame_count * 2).map_err(|e| {
            PipelineError::BufferAllocationFailed(format!(
                "cannot allocate {} bytes: {}",
                frame_count * 2,
                e
            ))
        })?;

        // Channel 0 only: extraction, not an averaging downmix.
        for i in 0..frame_count {
            let sample = frame.samples[i * channels];
            let clamped = sample.clamp(-1.0, 1.0);
            let value = (clamped * i16::MAX as f32) as i16;
            data.extend_from_slice(&value.to_le_bytes());
        }

        Ok(Some(CanonicalPcm::new(data, frame_count)))
    }
}
