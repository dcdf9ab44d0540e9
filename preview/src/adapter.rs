//! egui presentation adapter
//!
//! egui redraws the whole surface every repaint, so the adapter only keeps
//! the state the viewer pushes into it. The app reads it back when painting.

use spin360_core::{Affordance, AffordanceMarks, Badge, Cursor, PresentationAdapter};
use spin360_shared::FrameId;

#[derive(Debug, Default)]
pub struct EguiAdapter {
    /// Frame to paint once interactive
    pub frame: Option<FrameId>,
    /// Frame 1, shown while the rest is still loading
    pub placeholder: Option<FrameId>,
    pub progress: u8,
    pub ready: bool,
    pub cursor: Cursor,
    pub hint_visible: bool,
    pub marks: AffordanceMarks,
    pub badge: Option<Badge>,
    /// Set when the viewer asks for the lens to go away
    close_lens: bool,
}

impl EguiAdapter {
    pub fn displayed_frame(&self) -> Option<FrameId> {
        self.frame.or(self.placeholder)
    }

    pub fn is_inactive(&self, affordance: Affordance) -> bool {
        self.marks.get(affordance)
    }

    /// Returns true once after the viewer dismissed the magnifier.
    pub fn take_close_lens(&mut self) -> bool {
        std::mem::take(&mut self.close_lens)
    }
}

impl PresentationAdapter for EguiAdapter {
    fn draw_frame(&mut self, frame: FrameId) {
        self.frame = Some(frame);
    }

    fn set_affordance_inactive(&mut self, affordance: Affordance, inactive: bool) {
        match affordance {
            Affordance::Prev => self.marks.prev_inactive = inactive,
            Affordance::Next => self.marks.next_inactive = inactive,
        }
    }

    fn report_progress(&mut self, percent: u8) {
        self.progress = percent;
    }

    fn on_ready(&mut self) {
        self.ready = true;
    }

    fn on_first_frame(&mut self, frame: FrameId) {
        self.placeholder = Some(frame);
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn set_hint_visible(&mut self, visible: bool) {
        self.hint_visible = visible;
    }

    fn close_magnifier(&mut self) {
        self.close_lens = true;
    }

    fn show_badge(&mut self, badge: Badge) {
        self.badge = Some(badge);
    }

    fn hide_badge(&mut self) {
        self.badge = None;
    }
}
