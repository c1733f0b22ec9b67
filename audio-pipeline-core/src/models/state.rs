/// Capture-side pipeline state.
///
/// State transitions:
/// ```text
/// idle → running   (device start succeeded)
/// running → idle   (stop, or device setup failure)
/// ```
///
/// A device setup failure returns only the capture leg to `Idle`; the
/// controller stays logically running so playback keeps working on
/// machines without a usable microphone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Idle,
    Running,
}

impl CaptureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Playback-side pipeline state.
///
/// State transitions:
/// ```text
/// idle → playing   (a segment is dequeued and playback begins)
/// playing → idle   (completion, decode error, or interrupt)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
}

impl PlaybackState {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Playing)
    }
}
