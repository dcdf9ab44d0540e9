//! Presentation adapter
//!
//! The viewer never touches pixels. It calls into a [`PresentationAdapter`]
//! implemented by the host to draw frames and update its controls, and
//! receives raw input back through [`crate::Viewer::handle_input`].

use spin360_shared::{FrameId, Placement, Size, contain, rounded_pixel_ratio};

use crate::frame::Affordance;

/// Pointer cursor shown over the spin surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    /// Frames still loading
    #[default]
    Wait,
    /// Ready to drag
    Grab,
    /// Drag in progress
    Grabbing,
}

/// Contents of the 360 badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Badge {
    /// Loading progress in percent
    Progress(u8),
    /// Every frame loaded; show the configured logo or the built-in mark
    Logo(Option<String>),
}

/// Rendering side of a viewer, implemented by the host.
pub trait PresentationAdapter {
    /// Show `frame`. The frame may have failed to load; draw nothing then.
    fn draw_frame(&mut self, frame: FrameId);

    /// Mark a prev/next control inactive (or active again).
    fn set_affordance_inactive(&mut self, affordance: Affordance, inactive: bool);

    /// Loading progress in percent.
    fn report_progress(&mut self, percent: u8);

    /// Every frame finished loading; interaction is now possible.
    fn on_ready(&mut self);

    /// Frame 1 finished loading and can be shown as a placeholder.
    fn on_first_frame(&mut self, _frame: FrameId) {}

    fn set_cursor(&mut self, _cursor: Cursor) {}

    /// Show or hide the "drag to spin" hint.
    fn set_hint_visible(&mut self, _visible: bool) {}

    /// Dismiss the magnifier lens if it is open.
    fn close_magnifier(&mut self) {}

    /// Show or update the 360 badge.
    fn show_badge(&mut self, _badge: Badge) {}

    /// Remove the 360 badge for good.
    fn hide_badge(&mut self) {}
}

/// Drawing surface geometry for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Canvas {
    /// Backing store size in device pixels
    pub backing: Size,
    /// Displayed size in logical pixels
    pub css: Size,
    /// Where the image goes, in device pixels
    pub placement: Placement,
}

/// Where a viewer is displayed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    /// Container size, or the viewport in full-screen view
    pub container: Size,
    pub pixel_ratio: f64,
    pub full_screen: bool,
}

impl Layout {
    pub fn new(container: Size, pixel_ratio: f64, full_screen: bool) -> Self {
        Self {
            container,
            pixel_ratio,
            full_screen,
        }
    }

    /// Device pixel ratio rounded to a whole number, at least 1.
    pub fn device_ratio(&self) -> f64 {
        rounded_pixel_ratio(self.pixel_ratio) as f64
    }

    /// Surface for drawing an `image` sized frame.
    ///
    /// Full-screen view covers the viewport and letterboxes the frame inside
    /// it. Normal view sizes the surface to the frame itself and fills it.
    pub fn canvas(&self, image: Size) -> Canvas {
        let ratio = self.device_ratio();

        if self.full_screen {
            let backing = self.container.scaled(ratio);
            return Canvas {
                backing,
                css: self.container,
                placement: contain(backing, image),
            };
        }

        let height = match image.aspect() {
            Some(aspect) => image.width * aspect,
            None => 0.0,
        };
        let css = Size::new(image.width, height);
        let backing = css.scaled(ratio);
        Canvas {
            backing,
            css,
            placement: Placement {
                offset_x: 0.0,
                offset_y: 0.0,
                width: backing.width,
                height: backing.height,
            },
        }
    }
}
