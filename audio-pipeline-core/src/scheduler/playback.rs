use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::models::diagnostics::PipelineDiagnostics;
use crate::models::error::PipelineError;
use crate::models::state::PlaybackState;
use crate::traits::pipeline_delegate::PipelineDelegate;
use crate::traits::playback_device::{CompletionCallback, PlaybackDevice, PlaybackOutcome};
use crate::traits::segment_store::{SegmentHandle, SegmentStore};

/// Queue + active-segment state, guarded by one mutex.
///
/// Invariant: the queue never contains the active segment — a segment is
/// removed from the queue the instant it becomes active.
struct SchedulerInner {
    queue: VecDeque<SegmentHandle>,
    active: Option<SegmentHandle>,
    // Bumped by every interrupt; lets advance() detect an interrupt that
    // raced an in-flight begin call.
    interrupt_epoch: u64,
}

/// Strictly sequential playback scheduler.
///
/// Accepts opaque encoded segments, persists each to the transient store,
/// and plays them one at a time in arrival order. Storage for a segment is
/// released deterministically: after its completion, after a failed start,
/// or when an interrupt discards it.
///
/// Device completion notifications re-enter through a `Weak` reference and
/// are matched against the active segment's id, so notifications that
/// arrive after an interrupt are ignored rather than corrupting state.
#[derive(Clone)]
pub struct PlaybackScheduler {
    shared: Arc<SchedulerShared>,
}

struct SchedulerShared {
    inner: Mutex<SchedulerInner>,
    store: Arc<dyn SegmentStore>,
    device: Arc<dyn PlaybackDevice>,
    delegate: Mutex<Option<Arc<dyn PipelineDelegate>>>,
    diagnostics: Arc<Mutex<PipelineDiagnostics>>,
}

impl PlaybackScheduler {
    pub fn new(
        store: Arc<dyn SegmentStore>,
        device: Arc<dyn PlaybackDevice>,
        diagnostics: Arc<Mutex<PipelineDiagnostics>>,
    ) -> Self {
        Self {
            shared: Arc::new(SchedulerShared {
                inner: Mutex::new(SchedulerInner {
                    queue: VecDeque::new(),
                    active: None,
                    interrupt_epoch: 0,
                }),
                store,
                device,
                delegate: Mutex::new(None),
                diagnostics,
            }),
        }
    }

    pub fn set_delegate(&self, delegate: Arc<dyn PipelineDelegate>) {
        *self.shared.delegate.lock() = Some(delegate);
    }

    /// Persist an encoded segment and append it to the playback queue.
    ///
    /// If nothing is playing, playback of the oldest queued segment starts
    /// immediately. A storage failure rejects only this segment; the queue
    /// is unaffected.
    pub fn enqueue(&self, bytes: &[u8]) -> Result<(), PipelineError> {
        SchedulerShared::enqueue(&self.shared, bytes)
    }

    /// Halt any active playback, discard every queued segment, and release
    /// all of their storage. Safe to call from any state.
    pub fn interrupt(&self) {
        self.shared.interrupt();
    }

    pub fn state(&self) -> PlaybackState {
        if self.shared.inner.lock().active.is_some() {
            PlaybackState::Playing
        } else {
            PlaybackState::Idle
        }
    }

    /// Number of segments waiting behind the active one.
    pub fn queue_len(&self) -> usize {
        self.shared.inner.lock().queue.len()
    }
}

impl SchedulerShared {
    fn enqueue(this: &Arc<Self>, bytes: &[u8]) -> Result<(), PipelineError> {
        let handle = match this.store.write(bytes) {
            Ok(handle) => handle,
            Err(detail) => {
                let err = PipelineError::StorageWriteFailed(detail);
                this.report(&err);
                return Err(err);
            }
        };

        this.inner.lock().queue.push_back(handle);
        this.diagnostics.lock().segments_enqueued += 1;
        Self::advance(this);
        Ok(())
    }

    /// Start the next queued segment if nothing is active.
    ///
    /// Iterative on purpose: a run of unplayable segments is skipped in a
    /// loop instead of recursing once per failure.
    fn advance(this: &Arc<Self>) {
        loop {
            let (segment, epoch) = {
                let mut inner = this.inner.lock();
                if inner.active.is_some() {
                    return;
                }
                match inner.queue.pop_front() {
                    // Claim the segment before begin so a concurrent
                    // enqueue cannot start a second playback.
                    Some(segment) => {
                        inner.active = Some(segment.clone());
                        (segment, inner.interrupt_epoch)
                    }
                    None => return,
                }
            };

            match this.device.begin(&segment, Self::completion_for(this, segment.id)) {
                Ok(()) => {
                    // An interrupt may have raced the begin call; if one
                    // did and nothing new is playing, stop the straggler.
                    let interrupted = {
                        let inner = this.inner.lock();
                        inner.interrupt_epoch != epoch && inner.active.is_none()
                    };
                    if interrupted {
                        this.device.halt();
                    }
                    return;
                }
                Err(detail) => {
                    this.store.remove(&segment);
                    {
                        let mut inner = this.inner.lock();
                        if inner.active.as_ref().map(|s| s.id) == Some(segment.id) {
                            inner.active = None;
                        }
                    }
                    this.diagnostics.lock().segments_failed += 1;
                    this.report(&PipelineError::PlaybackStartFailed(detail));
                }
            }
        }
    }

    fn completion_for(this: &Arc<Self>, id: Uuid) -> CompletionCallback {
        let weak = Arc::downgrade(this);
        Arc::new(move |outcome| {
            if let Some(shared) = weak.upgrade() {
                Self::finish(&shared, id, outcome);
            }
        })
    }

    fn finish(this: &Arc<Self>, id: Uuid, outcome: PlaybackOutcome) {
        let segment = {
            let mut inner = this.inner.lock();
            match inner.active.take() {
                Some(segment) if segment.id == id => segment,
                // Stale notification from an interrupted playback.
                other => {
                    inner.active = other;
                    return;
                }
            }
        };

        this.store.remove(&segment);

        match outcome {
            PlaybackOutcome::Completed => {
                this.diagnostics.lock().segments_played += 1;
            }
            PlaybackOutcome::DecodeFailed(detail) => {
                this.diagnostics.lock().segments_failed += 1;
                this.report(&PipelineError::PlaybackDecodeError(detail));
            }
        }

        Self::advance(this);
    }

    fn interrupt(&self) {
        let (active, queued) = {
            let mut inner = self.inner.lock();
            inner.interrupt_epoch += 1;
            let queued: Vec<_> = inner.queue.drain(..).collect();
            (inner.active.take(), queued)
        };

        if active.is_some() {
            self.device.halt();
        }

        let mut discarded = 0u64;
        if let Some(segment) = active {
            self.store.remove(&segment);
            discarded += 1;
        }
        for segment in queued {
            self.store.remove(&segment);
            discarded += 1;
        }

        if discarded > 0 {
            self.diagnostics.lock().segments_discarded += discarded;
        }
    }

    fn report(&self, error: &PipelineError) {
        log::warn!("playback scheduler: {}", error);
        let delegate = self.delegate.lock().clone();
        if let Some(delegate) = delegate {
            delegate.on_error(error);
        }
    }
}
