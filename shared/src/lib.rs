//! Shared types for the spin360 viewer.
//!
//! Plain data types and pure helpers that both the viewer core and the
//! hosts embedding it need, without pulling in any of the core's state.

pub mod constants;
pub mod ids;
pub mod math;

pub use ids::{FrameId, ViewerId};
pub use math::{Placement, Point, Size, contain, responsive_width, rounded_pixel_ratio, size_for_pixel_ratio};
