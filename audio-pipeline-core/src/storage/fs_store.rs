use std::fs;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::models::error::PipelineError;
use crate::traits::segment_store::{SegmentHandle, SegmentStore};

/// Filesystem-backed transient segment store.
///
/// Each segment becomes one file under the store directory, named
/// `segment_<uuid>.bin`. Files exist only while their segment is queued or
/// playing; the scheduler removes them the moment it is done with them.
pub struct FsSegmentStore {
    directory: PathBuf,
}

impl FsSegmentStore {
    /// Create a store rooted at `directory`, creating it if needed.
    pub fn new(directory: PathBuf) -> Result<Self, PipelineError> {
        fs::create_dir_all(&directory).map_err(|e| {
            PipelineError::StorageWriteFailed(format!(
                "failed to create segment directory {}: {}",
                directory.display(),
                e
            ))
        })?;
        Ok(Self { directory })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

impl SegmentStore for FsSegmentStore {
    fn write(&self, bytes: &[u8]) -> Result<SegmentHandle, String> {
        let id = Uuid::new_v4();
        let path = self.directory.join(format!("segment_{}.bin", id));
        fs::write(&path, bytes).map_err(|e| format!("failed to write {}: {}", path.display(), e))?;
        Ok(SegmentHandle {
            id,
            path,
            byte_len: bytes.len(),
        })
    }

    fn remove(&self, handle: &SegmentHandle) {
        if let Err(e) = fs::remove_file(&handle.path) {
            log::warn!("failed to remove segment {}: {}", handle.path.display(), e);
        }
    }
}
