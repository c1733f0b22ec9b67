//! Collaborator seams: the contracts platform backends and hosts implement.

pub mod capture_device;
pub mod pipeline_delegate;
pub mod playback_device;
pub mod segment_store;
