//! Sequential playback scheduling.

pub mod playback;
