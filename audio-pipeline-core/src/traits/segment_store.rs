use std::path::PathBuf;

use uuid::Uuid;

/// Handle to one transiently stored playback segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentHandle {
    /// Store-assigned identity.
    pub id: Uuid,
    /// Backing location the playback device reads from.
    pub path: PathBuf,
    /// Encoded payload size in bytes.
    pub byte_len: usize,
}

/// Transient staging storage for playback segments.
///
/// A segment is written once when it arrives and removed as soon as the
/// scheduler is done with it — after completion, after a failed start, or
/// when an interrupt discards it. Storage decouples segment lifetime from
/// in-memory retention and matches how playback devices consume input.
pub trait SegmentStore: Send + Sync {
    /// Persist one encoded segment, returning its handle.
    fn write(&self, bytes: &[u8]) -> Result<SegmentHandle, String>;

    /// Remove a previously written segment.
    ///
    /// Best effort: must tolerate handles that were already removed.
    fn remove(&self, handle: &SegmentHandle);
}
