//! # audio-pipeline-core
//!
//! Platform-agnostic duplex audio pipeline core.
//!
//! Converts native floating-point capture frames into canonical 16-bit
//! little-endian mono PCM for transport, and plays back encoded segments
//! arriving from the remote side through a strictly sequential queue
//! scheduler. Platform backends (WASAPI, Core Audio, PipeWire, …) implement
//! the collaborator traits and plug into the generic [`AudioPipeline`].
//!
//! ## Architecture
//!
//! ```text
//! audio-pipeline-core (this crate)
//! ├── traits/       ← CaptureDevice, PlaybackDevice, SegmentStore, PipelineDelegate
//! ├── models/       ← PipelineError, CaptureState, PlaybackState, FrameBuffer, CanonicalPcm
//! ├── processing/   ← CaptureConverter (f32 → canonical 16-bit PCM)
//! ├── scheduler/    ← PlaybackScheduler (FIFO, one segment at a time)
//! ├── session/      ← AudioPipeline (lifecycle, mute, interruption)
//! └── storage/      ← FsSegmentStore (transient file-backed segments)
//! ```
//!
//! Data flow:
//!
//! ```text
//! [CaptureDevice] → CaptureConverter → base64 → PipelineDelegate::on_captured_audio
//! enqueue_playback(base64) → SegmentStore → PlaybackScheduler → [PlaybackDevice]
//! ```

pub mod models;
pub mod processing;
pub mod scheduler;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::config::PipelineConfig;
pub use models::diagnostics::PipelineDiagnostics;
pub use models::error::PipelineError;
pub use models::frame::{CanonicalPcm, FrameBuffer};
pub use models::state::{CaptureState, PlaybackState};
pub use processing::converter::{CaptureConverter, CANONICAL_SAMPLE_RATE};
pub use scheduler::playback::PlaybackScheduler;
pub use session::pipeline::AudioPipeline;
pub use storage::fs_store::FsSegmentStore;
pub use traits::capture_device::{CaptureDevice, FrameCallback};
pub use traits::pipeline_delegate::PipelineDelegate;
pub use traits::playback_device::{CompletionCallback, PlaybackDevice, PlaybackOutcome};
pub use traits::segment_store::{SegmentHandle, SegmentStore};
