//! Shared test utilities for integration and unit tests

use spin360_shared::FrameId;

use crate::adapter::{Badge, Cursor, PresentationAdapter};
use crate::config::{HostEnv, ViewerConfig};
use crate::frame::Affordance;
use crate::pool::LoadOutcome;
use crate::viewer::Viewer;

// ============================================================================
// Recording Adapter
// ============================================================================

/// One call made into a [`RecordingAdapter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterCall {
    Draw(FrameId),
    Affordance(Affordance, bool),
    Progress(u8),
    Ready,
    FirstFrame(FrameId),
    Cursor(Cursor),
    Hint(bool),
    CloseMagnifier,
    Badge(Badge),
    HideBadge,
}

/// Adapter that records every call in order
#[derive(Debug, Default)]
pub struct RecordingAdapter {
    pub calls: Vec<AdapterCall>,
}

impl RecordingAdapter {
    /// Frames drawn, in order.
    pub fn drawn(&self) -> Vec<FrameId> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                AdapterCall::Draw(frame) => Some(*frame),
                _ => None,
            })
            .collect()
    }

    pub fn last_drawn(&self) -> Option<FrameId> {
        self.drawn().last().copied()
    }

    /// Progress values reported, in order.
    pub fn progress(&self) -> Vec<u8> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                AdapterCall::Progress(percent) => Some(*percent),
                _ => None,
            })
            .collect()
    }
}

impl PresentationAdapter for RecordingAdapter {
    fn draw_frame(&mut self, frame: FrameId) {
        self.calls.push(AdapterCall::Draw(frame));
    }

    fn set_affordance_inactive(&mut self, affordance: Affordance, inactive: bool) {
        self.calls.push(AdapterCall::Affordance(affordance, inactive));
    }

    fn report_progress(&mut self, percent: u8) {
        self.calls.push(AdapterCall::Progress(percent));
    }

    fn on_ready(&mut self) {
        self.calls.push(AdapterCall::Ready);
    }

    fn on_first_frame(&mut self, frame: FrameId) {
        self.calls.push(AdapterCall::FirstFrame(frame));
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.calls.push(AdapterCall::Cursor(cursor));
    }

    fn set_hint_visible(&mut self, visible: bool) {
        self.calls.push(AdapterCall::Hint(visible));
    }

    fn close_magnifier(&mut self) {
        self.calls.push(AdapterCall::CloseMagnifier);
    }

    fn show_badge(&mut self, badge: Badge) {
        self.calls.push(AdapterCall::Badge(badge));
    }

    fn hide_badge(&mut self) {
        self.calls.push(AdapterCall::HideBadge);
    }
}

// ============================================================================
// Viewer helpers
// ============================================================================

/// Viewer on the default 800x600 mouse host, after `configure` tweaks the
/// default config.
pub fn viewer_with(configure: impl FnOnce(&mut ViewerConfig)) -> (Viewer, RecordingAdapter) {
    let mut config = ViewerConfig::default();
    configure(&mut config);
    let viewer = Viewer::from_config(&config, HostEnv::default()).unwrap();
    (viewer, RecordingAdapter::default())
}

/// Start `viewer` and complete every frame request successfully, following
/// lazy loading until nothing is left.
pub fn load_all(viewer: &mut Viewer, adapter: &mut RecordingAdapter) {
    viewer.start(adapter);
    loop {
        let requests = viewer.take_requests();
        if requests.is_empty() {
            break;
        }
        for request in requests {
            viewer.frame_loaded(request.id, LoadOutcome::Loaded, adapter);
        }
    }
}
