use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use parking_lot::Mutex;

use crate::models::config::PipelineConfig;
use crate::models::diagnostics::PipelineDiagnostics;
use crate::models::error::PipelineError;
use crate::models::frame::FrameBuffer;
use crate::models::state::{CaptureState, PlaybackState};
use crate::processing::converter::CaptureConverter;
use crate::scheduler::playback::PlaybackScheduler;
use crate::storage::fs_store::FsSegmentStore;
use crate::traits::capture_device::{CaptureDevice, FrameCallback};
use crate::traits::pipeline_delegate::PipelineDelegate;
use crate::traits::playback_device::PlaybackDevice;
use crate::traits::segment_store::SegmentStore;

/// Duplex audio pipeline controller.
///
/// Owns the capture and playback legs plus their shared mute/interruption
/// surface, generic over the capture backend. Data flow:
///
/// ```text
/// [CaptureDevice] → CaptureConverter → base64 → delegate.on_captured_audio
/// enqueue_playback(base64) → SegmentStore → PlaybackScheduler → [PlaybackDevice]
/// ```
///
/// `start`/`stop` are idempotent. A capture device that fails to start
/// degrades the pipeline to playback-only instead of aborting it: hosts
/// must keep functioning in environments without a microphone.
pub struct AudioPipeline<C: CaptureDevice> {
    capture: C,
    config: PipelineConfig,
    muted: Arc<AtomicBool>,
    converter: CaptureConverter,
    scheduler: PlaybackScheduler,
    delegate: Option<Arc<dyn PipelineDelegate>>,
    diagnostics: Arc<Mutex<PipelineDiagnostics>>,
    running: bool,
    capture_state: CaptureState,
}

impl<C: CaptureDevice> AudioPipeline<C> {
    pub fn new(
        capture: C,
        store: Arc<dyn SegmentStore>,
        playback: Arc<dyn PlaybackDevice>,
        config: PipelineConfig,
    ) -> Self {
        let muted = Arc::new(AtomicBool::new(false));
        let diagnostics = Arc::new(Mutex::new(PipelineDiagnostics::default()));
        Self {
            converter: CaptureConverter::new(Arc::clone(&muted)),
            scheduler: PlaybackScheduler::new(store, playback, Arc::clone(&diagnostics)),
            capture,
            config,
            muted,
            delegate: None,
            diagnostics,
            running: false,
            capture_state: CaptureState::Idle,
        }
    }

    /// Build a pipeline staging segments under `config.segment_directory`.
    pub fn with_fs_store(
        capture: C,
        playback: Arc<dyn PlaybackDevice>,
        config: PipelineConfig,
    ) -> Result<Self, PipelineError> {
        let store = Arc::new(FsSegmentStore::new(config.segment_directory.clone())?);
        Ok(Self::new(capture, store, playback, config))
    }

    /// Install the notification delegate. Set this before `start`: the
    /// capture callback captures the delegate installed at start time.
    pub fn set_delegate(&mut self, delegate: Arc<dyn PipelineDelegate>) {
        self.scheduler.set_delegate(Arc::clone(&delegate));
        self.delegate = Some(delegate);
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Start the pipeline. No-op if already running.
    ///
    /// Device setup failure is reported as [`PipelineError::DeviceSetupFailed`]
    /// and leaves the pipeline logically running with the capture leg idle.
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;

        let converter = self.converter.clone();
        let delegate = self.delegate.clone();
        let diagnostics = Arc::clone(&self.diagnostics);
        let callback: FrameCallback = Arc::new(move |samples: &[f32], sample_rate: f64, channels: u16| {
            let frame = FrameBuffer {
                samples,
                sample_rate,
                channels,
            };
            let _ = process_frame(&converter, delegate.as_ref(), &diagnostics, &frame);
        });

        match self.capture.start(callback) {
            Ok(()) => self.capture_state = CaptureState::Running,
            Err(err) => self.report(&err),
        }
    }

    /// Stop the pipeline. No-op if not running.
    ///
    /// Tears down capture, then interrupts playback (discarding the queue
    /// and releasing all segment storage), then goes idle.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        if let Err(err) = self.capture.stop() {
            log::warn!("capture stop: {}", err);
        }
        self.scheduler.interrupt();
        self.capture_state = CaptureState::Idle;
        self.running = false;
    }

    /// Toggle the shared mute flag. Takes effect on the next frame.
    pub fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::SeqCst);
    }

    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::SeqCst)
    }

    /// Decode a transport payload and hand it to the playback scheduler.
    ///
    /// Malformed base64 is rejected as [`PipelineError::InvalidData`]
    /// before anything is persisted or enqueued.
    pub fn enqueue_playback(&self, encoded: &str) -> Result<(), PipelineError> {
        let bytes = match BASE64.decode(encoded) {
            Ok(bytes) => bytes,
            Err(e) => {
                let err = PipelineError::InvalidData(format!("base64 decode failed: {}", e));
                self.report(&err);
                return Err(err);
            }
        };
        self.scheduler.enqueue(&bytes)
    }

    /// Convert one frame buffer and return the transport-encoded payload.
    ///
    /// Runs the same path as the capture callback: on success the payload
    /// is also delivered via `on_captured_audio`. Returns `Ok(None)`
    /// ("skipped") while muted, with no notification.
    pub fn capture_frame(&self, frame: &FrameBuffer<'_>) -> Result<Option<String>, PipelineError> {
        process_frame(
            &self.converter,
            self.delegate.as_ref(),
            &self.diagnostics,
            frame,
        )
    }

    /// Discard all pending playback immediately (barge-in) without
    /// touching the capture leg.
    pub fn interrupt_playback(&self) {
        self.scheduler.interrupt();
    }

    /// Whether the controller is logically running (possibly degraded).
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// State of the capture leg; `Idle` while degraded.
    pub fn capture_state(&self) -> CaptureState {
        self.capture_state
    }

    pub fn playback_state(&self) -> PlaybackState {
        self.scheduler.state()
    }

    /// Segments waiting behind the active playback.
    pub fn playback_queue_len(&self) -> usize {
        self.scheduler.queue_len()
    }

    pub fn diagnostics(&self) -> PipelineDiagnostics {
        self.diagnostics.lock().clone()
    }

    fn report(&self, error: &PipelineError) {
        log::warn!("pipeline: {}", error);
        if let Some(delegate) = &self.delegate {
            delegate.on_error(error);
        }
    }
}

/// Capture path shared by the device callback and `capture_frame`.
fn process_frame(
    converter: &CaptureConverter,
    delegate: Option<&Arc<dyn PipelineDelegate>>,
    diagnostics: &Mutex<PipelineDiagnostics>,
    frame: &FrameBuffer<'_>,
) -> Result<Option<String>, PipelineError> {
    match converter.convert(frame) {
        Ok(Some(pcm)) => {
            {
                let mut diag = diagnostics.lock();
                diag.frames_converted += 1;
                diag.bytes_captured += pcm.as_bytes().len() as u64;
            }
            let encoded = BASE64.encode(pcm.as_bytes());
            if let Some(delegate) = delegate {
                delegate.on_captured_audio(&encoded);
            }
            Ok(Some(encoded))
        }
        Ok(None) => {
            diagnostics.lock().frames_skipped_muted += 1;
            Ok(None)
        }
        Err(err) => {
            diagnostics.lock().frames_dropped += 1;
            log::warn!("capture conversion: {}", err);
            if let Some(delegate) = delegate {
                delegate.on_error(&err);
            }
            Err(err)
        }
    }
}
