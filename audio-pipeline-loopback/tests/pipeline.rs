//! End-to-end pipeline tests through the loopback backends.

use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use parking_lot::Mutex;

use audio_pipeline_core::{
    AudioPipeline, FrameBuffer, PipelineConfig, PipelineDelegate, PipelineError, PlaybackOutcome,
};
use audio_pipeline_loopback::{ManualPlaybackDevice, MemorySegmentStore, ScriptedCapture};

#[derive(Default)]
struct RecordingDelegate {
    captured: Mutex<Vec<String>>,
    errors: Mutex<Vec<PipelineError>>,
}

impl RecordingDelegate {
    fn captured(&self) -> Vec<String> {
        self.captured.lock().clone()
    }

    fn error_kinds(&self) -> Vec<&'static str> {
        self.errors.lock().iter().map(|e| e.kind()).collect()
    }
}

impl PipelineDelegate for RecordingDelegate {
    fn on_captured_audio(&self, encoded: &str) {
        self.captured.lock().push(encoded.to_string());
    }

    fn on_error(&self, error: &PipelineError) {
        self.errors.lock().push(error.clone());
    }
}

struct Harness {
    pipeline: AudioPipeline<ScriptedCapture>,
    capture: ScriptedCapture,
    device: ManualPlaybackDevice,
    store: MemorySegmentStore,
    delegate: Arc<RecordingDelegate>,
}

fn harness_with(capture: ScriptedCapture) -> Harness {
    let device = ManualPlaybackDevice::new();
    let store = MemorySegmentStore::new();
    let delegate = Arc::new(RecordingDelegate::default());
    let mut pipeline = AudioPipeline::new(
        capture.clone(),
        Arc::new(store.clone()),
        Arc::new(device.clone()),
        PipelineConfig::default(),
    );
    pipeline.set_delegate(delegate.clone());
    Harness {
        pipeline,
        capture,
        device,
        store,
        delegate,
    }
}

fn harness() -> Harness {
    harness_with(ScriptedCapture::new())
}

fn enqueue(h: &Harness, payload: &[u8]) {
    h.pipeline.enqueue_playback(&BASE64.encode(payload)).unwrap();
}

#[test]
fn segments_play_in_arrival_order_with_prompt_cleanup() {
    let h = harness();

    enqueue(&h, b"segment-a");
    enqueue(&h, b"segment-b");
    enqueue(&h, b"segment-c");

    // One active playback, two queued, three stored.
    assert!(h.pipeline.playback_state().is_playing());
    assert_eq!(h.pipeline.playback_queue_len(), 2);
    assert_eq!(h.store.live_segments(), 3);

    let first = h.device.active().unwrap();
    assert_eq!(h.store.bytes(&first).unwrap(), b"segment-a");

    assert!(h.device.finish_next(PlaybackOutcome::Completed));
    // A's storage is gone before B finishes.
    assert!(!h.store.contains(&first));
    assert_eq!(h.store.bytes(&h.device.active().unwrap()).unwrap(), b"segment-b");

    assert!(h.device.finish_next(PlaybackOutcome::Completed));
    assert!(h.device.finish_next(PlaybackOutcome::Completed));
    assert!(!h.device.finish_next(PlaybackOutcome::Completed));

    let begun = h.device.begun();
    assert_eq!(begun.len(), 3);
    assert_eq!(h.store.live_segments(), 0);
    assert!(h.pipeline.playback_state().is_idle());
    assert_eq!(h.pipeline.diagnostics().segments_played, 3);
}

#[test]
fn failed_start_releases_storage_and_advances_unprompted() {
    let h = harness();

    h.device.fail_next_begins(1);
    enqueue(&h, b"bad");
    assert_eq!(h.delegate.error_kinds(), vec!["playback_start_failed"]);
    assert_eq!(h.store.live_segments(), 0);
    assert!(h.pipeline.playback_state().is_idle());

    // The next segment begins immediately, with the bad one's storage
    // already released.
    enqueue(&h, b"good");
    assert!(h.pipeline.playback_state().is_playing());
    assert_eq!(h.store.bytes(&h.device.active().unwrap()).unwrap(), b"good");
}

#[test]
fn interrupt_discards_queue_and_starts_fresh_afterwards() {
    let h = harness();

    enqueue(&h, b"a");
    enqueue(&h, b"b");
    enqueue(&h, b"c");

    h.pipeline.interrupt_playback();

    assert_eq!(h.device.halt_count(), 1);
    assert_eq!(h.store.live_segments(), 0);
    assert_eq!(h.pipeline.playback_queue_len(), 0);
    assert!(h.pipeline.playback_state().is_idle());
    assert_eq!(h.pipeline.diagnostics().segments_discarded, 3);

    // A later enqueue behaves as if from a fresh state.
    enqueue(&h, b"again");
    assert!(h.pipeline.playback_state().is_playing());
    assert!(h.device.finish_next(PlaybackOutcome::Completed));
    assert_eq!(h.pipeline.diagnostics().segments_played, 1);
}

#[test]
fn decode_error_is_reported_and_playback_continues() {
    let h = harness();

    enqueue(&h, b"mangled");
    enqueue(&h, b"fine");

    h.device
        .finish_next(PlaybackOutcome::DecodeFailed("truncated stream".into()));

    assert_eq!(h.delegate.error_kinds(), vec!["playback_decode_error"]);
    assert!(h.pipeline.playback_state().is_playing());
    assert_eq!(h.device.begun().len(), 2);
}

#[test]
fn storage_failure_rejects_segment_but_not_the_queue() {
    let h = harness();

    enqueue(&h, b"kept");
    h.store.set_fail_writes(true);
    let err = h
        .pipeline
        .enqueue_playback(&BASE64.encode(b"dropped"))
        .unwrap_err();
    assert_eq!(err.kind(), "storage_write_failed");

    h.store.set_fail_writes(false);
    enqueue(&h, b"kept-too");

    h.device.finish_next(PlaybackOutcome::Completed);
    h.device.finish_next(PlaybackOutcome::Completed);
    assert_eq!(h.device.begun().len(), 2);
    assert!(!h.device.finish_next(PlaybackOutcome::Completed));
}

#[test]
fn malformed_transport_payload_never_reaches_storage() {
    let h = harness();

    let err = h.pipeline.enqueue_playback("@@not-base64@@").unwrap_err();

    assert_eq!(err.kind(), "invalid_data");
    assert_eq!(h.store.live_segments(), 0);
    assert!(h.device.begun().is_empty());
}

#[test]
fn full_scale_frames_clamp_to_i16_max() {
    let mut h = harness();
    h.pipeline.start();

    let samples = vec![1.0f32; 480];
    assert!(h.capture.emit(&samples, 48000.0, 1));

    let captured = h.delegate.captured();
    assert_eq!(captured.len(), 1);
    let bytes = BASE64.decode(&captured[0]).unwrap();
    assert_eq!(bytes.len(), 480 * 2);
    for chunk in bytes.chunks_exact(2) {
        assert_eq!(i16::from_le_bytes([chunk[0], chunk[1]]), i16::MAX);
    }
}

#[test]
fn muting_suppresses_capture_until_unmuted() {
    let mut h = harness();
    h.pipeline.start();

    h.pipeline.set_muted(true);
    assert!(h.capture.emit(&[0.5, -0.5], 48000.0, 1));
    assert!(h.capture.emit(&[0.5, -0.5], 48000.0, 1));
    assert!(h.delegate.captured().is_empty());
    assert_eq!(h.pipeline.diagnostics().frames_skipped_muted, 2);

    h.pipeline.set_muted(false);
    assert!(h.capture.emit(&[0.5, -0.5], 48000.0, 1));
    assert_eq!(h.delegate.captured().len(), 1);
}

#[test]
fn capture_frame_mirrors_the_device_path() {
    let h = harness();

    let encoded = h
        .pipeline
        .capture_frame(&FrameBuffer {
            samples: &[0.0, 1.0, -1.0],
            sample_rate: 48000.0,
            channels: 1,
        })
        .unwrap()
        .unwrap();

    assert_eq!(h.delegate.captured(), vec![encoded.clone()]);
    let bytes = BASE64.decode(&encoded).unwrap();
    assert_eq!(bytes, vec![0x00, 0x00, 0xFF, 0x7F, 0x01, 0x80]);
}

#[test]
fn missing_microphone_degrades_to_playback_only() {
    let mut h = harness_with(ScriptedCapture::unavailable());

    h.pipeline.start();

    assert_eq!(h.delegate.error_kinds(), vec!["device_setup_failed"]);
    assert!(h.pipeline.is_running());
    assert!(h.pipeline.capture_state().is_idle());

    enqueue(&h, b"still works");
    assert!(h.pipeline.playback_state().is_playing());
    h.device.finish_next(PlaybackOutcome::Completed);
    assert_eq!(h.pipeline.diagnostics().segments_played, 1);
}

#[test]
fn stop_tears_down_capture_and_playback_deterministically() {
    let mut h = harness();
    h.pipeline.start();

    enqueue(&h, b"in flight");
    enqueue(&h, b"queued");
    h.pipeline.stop();

    assert!(!h.capture.is_started());
    assert_eq!(h.device.halt_count(), 1);
    assert_eq!(h.store.live_segments(), 0);
    assert!(h.pipeline.playback_state().is_idle());

    // Stop again: nothing left to tear down.
    h.pipeline.stop();
    assert_eq!(h.device.halt_count(), 1);
    assert_eq!(h.capture.start_count(), 1);
}

#[test]
fn barge_in_keeps_capture_alive() {
    let mut h = harness();
    h.pipeline.start();

    enqueue(&h, b"agent reply");
    h.pipeline.interrupt_playback();

    // The user spoke over the agent: playback is gone, capture is not.
    assert!(h.pipeline.playback_state().is_idle());
    assert!(h.capture.is_started());
    assert!(h.capture.emit(&[0.25], 48000.0, 1));
    assert_eq!(h.delegate.captured().len(), 1);
}
