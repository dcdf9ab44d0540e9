//! Frame image pool
//!
//! Tracks which frames have been requested and which have finished loading.
//! Decoding and transport belong to the host: the pool hands out requests via
//! [`ImagePool::take_requests`] and is told about results via
//! [`ImagePool::complete`]. Completions may arrive in any order; milestones
//! are count based.

pub mod source;

use smallvec::SmallVec;
use spin360_shared::FrameId;

pub use source::{ImageListError, original_source, resolve_sources};

/// Load state of one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Loaded,
    Failed,
}

/// Result of loading one frame, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded,
    Failed,
}

impl From<LoadOutcome> for LoadState {
    fn from(outcome: LoadOutcome) -> Self {
        match outcome {
            LoadOutcome::Loaded => Self::Loaded,
            LoadOutcome::Failed => Self::Failed,
        }
    }
}

/// One frame of the sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRecord {
    pub id: FrameId,
    pub source: String,
    pub state: LoadState,
    requested: bool,
}

impl FrameRecord {
    pub fn is_done(&self) -> bool {
        self.state != LoadState::Pending
    }
}

/// A frame the host should fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRequest {
    pub id: FrameId,
    pub source: String,
}

/// Loading milestones, fired at most once each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Milestone {
    /// Frame 1 finished (successfully or not)
    FirstLoaded(FrameId),
    /// Every frame finished
    AllLoaded,
}

/// Effect of one accepted completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    /// Percentage of finished frames, after counting this one
    pub progress: u8,
    /// Milestones reached by this completion, in firing order
    pub milestones: SmallVec<[Milestone; 2]>,
}

#[derive(Debug, Clone, Default)]
pub struct ImagePool {
    frames: Vec<FrameRecord>,
    completed: usize,
    lazy: bool,
}

impl ImagePool {
    /// Create a pool with one pending record per source, ids assigned in
    /// order starting at 1.
    ///
    /// With `lazy`, only frame 1 is requested until it finishes.
    pub fn new(sources: Vec<String>, lazy: bool) -> Self {
        let frames = sources
            .into_iter()
            .enumerate()
            .map(|(index, source)| FrameRecord {
                id: FrameId::from_index(index),
                source,
                state: LoadState::Pending,
                requested: false,
            })
            .collect();

        Self {
            frames,
            completed: 0,
            lazy,
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frames(&self) -> &[FrameRecord] {
        &self.frames
    }

    pub fn get(&self, id: FrameId) -> Option<&FrameRecord> {
        self.frames.get(id.index())
    }

    pub fn source(&self, id: FrameId) -> Option<&str> {
        self.get(id).map(|frame| frame.source.as_str())
    }

    /// Number of finished frames.
    pub fn completed(&self) -> usize {
        self.completed
    }

    /// `round(completed / len * 100)`, or 0 for an empty pool.
    pub fn progress(&self) -> u8 {
        if self.frames.is_empty() {
            return 0;
        }
        ((self.completed as f64 / self.frames.len() as f64) * 100.0).round() as u8
    }

    pub fn is_complete(&self) -> bool {
        !self.frames.is_empty() && self.completed == self.frames.len()
    }

    /// Whether frame 1 has finished.
    pub fn first_loaded(&self) -> bool {
        self.frames.first().is_some_and(FrameRecord::is_done)
    }

    /// Frames to fetch now. Each frame is handed out once.
    pub fn take_requests(&mut self) -> Vec<FrameRequest> {
        let limit = if self.lazy && !self.first_loaded() {
            1
        } else {
            self.frames.len()
        };

        self.frames
            .iter_mut()
            .take(limit)
            .filter(|frame| !frame.requested)
            .map(|frame| {
                frame.requested = true;
                FrameRequest {
                    id: frame.id,
                    source: frame.source.clone(),
                }
            })
            .collect()
    }

    /// Record that a frame finished loading. Failures count like successes.
    ///
    /// Returns `None` for unknown ids and for frames that already finished.
    pub fn complete(&mut self, id: FrameId, outcome: LoadOutcome) -> Option<Completion> {
        let Some(frame) = self.frames.get_mut(id.index()) else {
            tracing::warn!("Ignoring completion for unknown frame {}", id);
            return None;
        };
        if frame.is_done() {
            tracing::warn!("Ignoring duplicate completion for frame {}", id);
            return None;
        }

        frame.state = outcome.into();
        if outcome == LoadOutcome::Failed {
            tracing::warn!("Frame {} failed to load: {}", id, frame.source);
        }
        self.completed += 1;

        let mut milestones = SmallVec::new();
        if id == FrameId::FIRST {
            milestones.push(Milestone::FirstLoaded(id));
        }
        if self.is_complete() {
            milestones.push(Milestone::AllLoaded);
        }

        Some(Completion {
            progress: self.progress(),
            milestones,
        })
    }

    /// Drop every record.
    pub fn release(&mut self) {
        self.frames.clear();
        self.completed = 0;
    }
}
