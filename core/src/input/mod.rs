//! Input translation: drag/swipe motion and key presses to frame steps

mod drag;
mod keyboard;

pub use drag::{AxisSteps, DragSteps, DragTracker, SpeedFactors, drag_extent, speed_factor};
pub use keyboard::{Key, KeyboardMapping};

use spin360_shared::{Point, Size};

use crate::frame::{Axis, Direction};

/// Raw input forwarded by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    TouchStart(Point),
    TouchMove(Point),
    TouchEnd,
    KeyDown(Key),
    KeyUp(Key),
    /// Container (or window, in full-screen view) changed size.
    Resize(Size),
}

/// A request to move the frame index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepRequest {
    pub axis: Axis,
    pub direction: Direction,
    /// Always at least 1.
    pub steps: u32,
}

impl StepRequest {
    /// A single column step, as issued by keys, buttons and autoplay.
    pub fn column(direction: Direction) -> Self {
        Self {
            axis: Axis::Column,
            direction,
            steps: 1,
        }
    }
}
