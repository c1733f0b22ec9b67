use std::sync::Arc;

use parking_lot::Mutex;

use audio_pipeline_core::{CaptureDevice, FrameCallback, PipelineError};

/// Capture device whose frames are pushed by the owner.
///
/// Cloning yields another handle to the same device: give one clone to the
/// pipeline and keep one to drive [`emit`](ScriptedCapture::emit) from.
/// Constructed [`unavailable`](ScriptedCapture::unavailable), it refuses to
/// start, simulating a machine without a microphone.
#[derive(Clone)]
pub struct ScriptedCapture {
    inner: Arc<Mutex<Inner>>,
}

struct Inner {
    callback: Option<FrameCallback>,
    available: bool,
    starts: usize,
}

impl ScriptedCapture {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                callback: None,
                available: true,
                starts: 0,
            })),
        }
    }

    /// A device with no capture endpoint behind it; `start` fails.
    pub fn unavailable() -> Self {
        let capture = Self::new();
        capture.inner.lock().available = false;
        capture
    }

    /// Deliver one frame buffer to the pipeline, as a microphone would.
    ///
    /// Returns whether a callback was installed (i.e. the device was
    /// started) and the frame was delivered.
    pub fn emit(&self, samples: &[f32], sample_rate: f64, channels: u16) -> bool {
        let callback = self.inner.lock().callback.clone();
        match callback {
            Some(callback) => {
                callback(samples, sample_rate, channels);
                true
            }
            None => false,
        }
    }

    pub fn is_started(&self) -> bool {
        self.inner.lock().callback.is_some()
    }

    /// Number of `start` calls observed, successful or not.
    pub fn start_count(&self) -> usize {
        self.inner.lock().starts
    }
}

impl Default for ScriptedCapture {
    fn default() -> Self {
        Self::new()
    }
}

impl CaptureDevice for ScriptedCapture {
    fn is_available(&self) -> bool {
        self.inner.lock().available
    }

    fn start(&mut self, callback: FrameCallback) -> Result<(), PipelineError> {
        let mut inner = self.inner.lock();
        inner.starts += 1;
        if !inner.available {
            return Err(PipelineError::DeviceSetupFailed(
                "no capture endpoint available".into(),
            ));
        }
        inner.callback = Some(callback);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), PipelineError> {
        self.inner.lock().callback = None;
        Ok(())
    }
}
