//! Geometry for placing frames on a drawable surface.
//!
//! All values are in CSS-style logical pixels unless a function says
//! otherwise. Hosts multiply by the pixel ratio when sizing backing stores.

use serde::{Deserialize, Serialize};

use crate::constants::RESPONSIVE_WIDTH_STEP;

/// Width and height of a box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Height divided by width, or `None` for a zero-width box.
    pub fn aspect(&self) -> Option<f64> {
        if self.width > 0.0 {
            Some(self.height / self.width)
        } else {
            None
        }
    }

    /// Both sides scaled by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }
}

/// Position of a pointer or touch in page coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Where a bitmap lands inside a target box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub offset_x: f64,
    pub offset_y: f64,
    pub width: f64,
    pub height: f64,
}

/// "Contain" fit: scale `image` uniformly so it fits entirely inside
/// `target`, centered on both axes (letterboxed).
///
/// A degenerate image (zero width or height) yields an empty placement at
/// the center of the target.
pub fn contain(target: Size, image: Size) -> Placement {
    if image.width <= 0.0 || image.height <= 0.0 {
        return Placement {
            offset_x: target.width / 2.0,
            offset_y: target.height / 2.0,
            width: 0.0,
            height: 0.0,
        };
    }

    let scale = (target.width / image.width).min(target.height / image.height);
    let width = image.width * scale;
    let height = image.height * scale;

    Placement {
        offset_x: (target.width - width) / 2.0,
        offset_y: (target.height - height) / 2.0,
        width,
        height,
    }
}

/// Quantize a container width up to the next responsive step so that
/// nearby container sizes share one resized image.
pub fn responsive_width(width: f64) -> u32 {
    let steps = (width / RESPONSIVE_WIDTH_STEP as f64).ceil().max(1.0);
    steps as u32 * RESPONSIVE_WIDTH_STEP
}

/// Device pixel ratio rounded to a whole multiplier, never below 1.
pub fn rounded_pixel_ratio(pixel_ratio: f64) -> u32 {
    if pixel_ratio.is_finite() {
        (pixel_ratio.round() as u32).max(1)
    } else {
        1
    }
}

/// Scale a size string such as `"600"` or `"600x400"` by the rounded
/// pixel ratio. Components that are not numbers are kept verbatim.
pub fn size_for_pixel_ratio(size: &str, pixel_ratio: f64) -> String {
    let multiplier = rounded_pixel_ratio(pixel_ratio) as f64;

    size.split('x')
        .map(|part| match part.trim().parse::<f64>() {
            Ok(value) => format_dimension(value * multiplier),
            Err(_) => part.to_string(),
        })
        .collect::<Vec<_>>()
        .join("x")
}

fn format_dimension(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
