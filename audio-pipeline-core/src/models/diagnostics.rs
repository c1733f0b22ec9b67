use serde::Serialize;

/// Counters for debugging a live pipeline.
///
/// Updated by the capture path and the playback scheduler; snapshot via
/// [`AudioPipeline::diagnostics`](crate::session::pipeline::AudioPipeline::diagnostics).
#[derive(Debug, Clone, Default, Serialize)]
pub struct PipelineDiagnostics {
    /// Frames converted to canonical PCM and delivered.
    pub frames_converted: u64,
    /// Frames skipped because the pipeline was muted.
    pub frames_skipped_muted: u64,
    /// Frames dropped because the destination buffer could not be allocated.
    pub frames_dropped: u64,
    /// Total canonical PCM bytes produced.
    pub bytes_captured: u64,
    /// Segments accepted into the playback queue.
    pub segments_enqueued: u64,
    /// Segments that played to completion.
    pub segments_played: u64,
    /// Segments that failed to start or to decode.
    pub segments_failed: u64,
    /// Segments discarded by an interrupt before playing.
    pub segments_discarded: u64,
}
