use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use audio_pipeline_core::{SegmentHandle, SegmentStore};

/// Segment store backed by a map instead of the filesystem.
///
/// Handles carry synthetic `mem://` paths; the bytes live in the map until
/// removed. Cloning yields another handle to the same store, so tests can
/// watch segment lifetimes from outside the pipeline.
#[derive(Clone)]
pub struct MemorySegmentStore {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    segments: HashMap<Uuid, Vec<u8>>,
    fail_writes: bool,
}

impl MemorySegmentStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Make subsequent writes fail, as a full disk would.
    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.lock().fail_writes = fail;
    }

    /// Number of segments currently held.
    pub fn live_segments(&self) -> usize {
        self.inner.lock().segments.len()
    }

    pub fn contains(&self, handle: &SegmentHandle) -> bool {
        self.inner.lock().segments.contains_key(&handle.id)
    }

    /// The stored bytes for a handle, if still live.
    pub fn bytes(&self, handle: &SegmentHandle) -> Option<Vec<u8>> {
        self.inner.lock().segments.get(&handle.id).cloned()
    }
}

impl Default for MemorySegmentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SegmentStore for MemorySegmentStore {
    fn write(&self, bytes: &[u8]) -> Result<SegmentHandle, String> {
        let mut inner = self.inner.lock();
        if inner.fail_writes {
            return Err("segment store is read-only".into());
        }
        let id = Uuid::new_v4();
        inner.segments.insert(id, bytes.to_vec());
        Ok(SegmentHandle {
            id,
            path: PathBuf::from(format!("mem://segments/{}", id)),
            byte_len: bytes.len(),
        })
    }

    fn remove(&self, handle: &SegmentHandle) {
        if self.inner.lock().segments.remove(&handle.id).is_none() {
            log::warn!("segment {} was already removed", handle.id);
        }
    }
}
