use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for an audio pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Canonical wire sample rate in Hz (default: 48000).
    pub sample_rate: u32,

    /// Directory where transient playback segments are staged.
    pub segment_directory: PathBuf,
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.sample_rate == 0 {
            return Err("sample rate must be positive".into());
        }
        if self.segment_directory.as_os_str().is_empty() {
            return Err("segment directory must not be empty".into());
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            segment_directory: std::env::temp_dir().join("audio-pipeline-segments"),
        }
    }
}
