use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use audio_pipeline_core::{CompletionCallback, PlaybackDevice, PlaybackOutcome, SegmentHandle};

/// Playback device whose completions are fired by the owner.
///
/// `begin` never renders audio: it records the segment and parks its
/// completion callback until [`finish_next`](ManualPlaybackDevice::finish_next)
/// fires it. `halt` drops parked completions un-fired, matching the device
/// contract that a halted playback never completes. Cloning yields another
/// handle to the same device.
#[derive(Clone)]
pub struct ManualPlaybackDevice {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Default)]
struct Inner {
    pending: VecDeque<(SegmentHandle, CompletionCallback)>,
    begun: Vec<SegmentHandle>,
    fail_begins: usize,
    halts: usize,
}

impl ManualPlaybackDevice {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Make the next `count` begin calls fail, as a corrupt segment would.
    pub fn fail_next_begins(&self, count: usize) {
        self.inner.lock().fail_begins = count;
    }

    /// Every successfully begun segment, in begin order.
    pub fn begun(&self) -> Vec<SegmentHandle> {
        self.inner.lock().begun.clone()
    }

    /// The segment currently considered playing, if any.
    pub fn active(&self) -> Option<SegmentHandle> {
        self.inner
            .lock()
            .pending
            .front()
            .map(|(segment, _)| segment.clone())
    }

    pub fn halt_count(&self) -> usize {
        self.inner.lock().halts
    }

    /// Fire the oldest parked completion with `outcome`.
    ///
    /// Returns false if no playback was pending. The callback is invoked
    /// outside the device lock, so the scheduler is free to begin the next
    /// segment from within it.
    pub fn finish_next(&self, outcome: PlaybackOutcome) -> bool {
        let next = self.inner.lock().pending.pop_front();
        match next {
            Some((_, on_finished)) => {
                on_finished(outcome);
                true
            }
            None => false,
        }
    }
}

impl Default for ManualPlaybackDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackDevice for ManualPlaybackDevice {
    fn begin(
        &self,
        segment: &SegmentHandle,
        on_finished: CompletionCallback,
    ) -> Result<(), String> {
        let mut inner = self.inner.lock();
        if inner.fail_begins > 0 {
            inner.fail_begins -= 1;
            return Err(format!("cannot open {}", segment.path.display()));
        }
        inner.begun.push(segment.clone());
        inner.pending.push_back((segment.clone(), on_finished));
        Ok(())
    }

    fn halt(&self) {
        let mut inner = self.inner.lock();
        inner.halts += 1;
        inner.pending.clear();
    }
}
