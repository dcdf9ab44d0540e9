//! Output events for the host page

use smallvec::SmallVec;
use spin360_shared::FrameId;

use crate::frame::{Axis, Bound};

/// Something observable a viewer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerEvent {
    /// The displayed frame changed
    FrameChanged(FrameId),
    /// Frame requests were issued for the first time
    LoadingStarted,
    LoadingProgress(u8),
    /// Every frame finished loading
    LoadingCompleted,
    /// Autoplay or hold-to-spin began
    SpinStarted,
    /// Autoplay or hold-to-spin ended
    SpinStopped,
    /// A clamped step landed on an edge
    EdgeReached { axis: Axis, bound: Bound },
    FullScreenOpened,
    FullScreenClosed,
}

/// Events produced by one viewer call, in order.
pub type Events = SmallVec<[ViewerEvent; 4]>;
