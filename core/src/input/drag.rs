//! Pointer/touch drag to frame step conversion

use spin360_shared::{Point, Size};

use super::StepRequest;
use crate::config::DragCalibration;
use crate::frame::{Axis, Direction};

/// Pixels of pointer travel per frame step for one axis.
///
/// Proportional to the drag speed and the on-screen extent, inversely
/// proportional to the number of frames along the axis, and never below 1.
pub fn speed_factor(
    drag_speed: f64,
    divisions: u32,
    extent: f64,
    calibration: &DragCalibration,
) -> u32 {
    let raw = drag_speed / calibration.reference_speed * calibration.reference_frames
        / divisions.max(1) as f64
        * calibration.gain
        * extent
        / calibration.reference_width;

    if raw.is_finite() && raw >= 1.0 {
        raw.floor() as u32
    } else {
        1
    }
}

/// On-screen extent of the spinning image used to calibrate drags.
///
/// In full-screen view a frame taller than the viewport (`ratio` is
/// height/width) is letterboxed, so its visible width is `height / ratio`.
pub fn drag_extent(container: Size, full_screen: bool, image_ratio: Option<f64>) -> Size {
    if !full_screen {
        return container;
    }

    let mut extent = container;
    if let (Some(ratio), Some(container_ratio)) = (image_ratio, container.aspect())
        && ratio > container_ratio
    {
        extent.width = container.height / ratio;
    }
    extent
}

/// Per-axis speed factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeedFactors {
    pub x: u32,
    pub y: u32,
}

impl Default for SpeedFactors {
    fn default() -> Self {
        Self { x: 1, y: 1 }
    }
}

impl SpeedFactors {
    /// Derive both factors for a `rows x cols` grid shown at `extent`.
    pub fn derive(
        drag_speed: f64,
        rows: u32,
        cols: u32,
        extent: Size,
        calibration: &DragCalibration,
    ) -> Self {
        Self {
            x: speed_factor(drag_speed, cols, extent.width, calibration),
            y: speed_factor(drag_speed, rows, extent.height, calibration),
        }
    }
}

/// Steps requested along one axis by a motion event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisSteps {
    pub direction: Direction,
    pub steps: u32,
}

/// Steps requested by one motion event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DragSteps {
    pub column: Option<AxisSteps>,
    pub row: Option<AxisSteps>,
}

impl DragSteps {
    pub fn is_empty(&self) -> bool {
        self.column.is_none() && self.row.is_none()
    }

    /// Requests in application order: columns first, then rows.
    pub fn requests(&self) -> impl Iterator<Item = StepRequest> + '_ {
        [(Axis::Column, self.column), (Axis::Row, self.row)]
            .into_iter()
            .filter_map(|(axis, steps)| {
                steps.map(|s| StepRequest {
                    axis,
                    direction: s.direction,
                    steps: s.steps,
                })
            })
    }
}

/// Tracks a drag gesture and converts its motion into whole frame steps.
///
/// The origin only moves when a step is taken, so slow motion below the
/// threshold accumulates until it crosses it.
#[derive(Debug, Clone)]
pub struct DragTracker {
    pressed: bool,
    origin: Point,
    factors: SpeedFactors,
    spin_reverse: bool,
}

impl DragTracker {
    pub fn new(factors: SpeedFactors, spin_reverse: bool) -> Self {
        Self {
            pressed: false,
            origin: Point::ORIGIN,
            factors,
            spin_reverse,
        }
    }

    pub fn factors(&self) -> SpeedFactors {
        self.factors
    }

    pub fn set_factors(&mut self, factors: SpeedFactors) {
        self.factors = factors;
    }

    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    /// Start a gesture at `at`.
    pub fn press(&mut self, at: Point) {
        self.pressed = true;
        self.origin = at;
    }

    /// End the gesture and reset the origin.
    pub fn release(&mut self) {
        self.pressed = false;
        self.origin = Point::ORIGIN;
    }

    /// Steps for a pointer now at `at`. Empty when no gesture is active.
    pub fn motion(&mut self, at: Point) -> DragSteps {
        if !self.pressed {
            return DragSteps::default();
        }

        // Rightward drags advance; downward drags retreat.
        let column = axis_steps(&mut self.origin.x, at.x, self.factors.x).map(|(positive, steps)| {
            let direction = if positive { Direction::Advance } else { Direction::Retreat };
            AxisSteps {
                direction: direction.flip_if(self.spin_reverse),
                steps,
            }
        });
        let row = axis_steps(&mut self.origin.y, at.y, self.factors.y).map(|(positive, steps)| {
            let direction = if positive { Direction::Retreat } else { Direction::Advance };
            AxisSteps {
                direction: direction.flip_if(self.spin_reverse),
                steps,
            }
        });

        DragSteps { column, row }
    }
}

/// Whole steps between `origin` and `to`, updating `origin` when a step is
/// taken. Returns whether the motion was positive and the step count.
fn axis_steps(origin: &mut f64, to: f64, factor: u32) -> Option<(bool, u32)> {
    let factor = factor.max(1) as f64;
    let delta = to - *origin;
    if delta.abs() < factor {
        return None;
    }

    let steps = ((delta.abs() / factor).floor() as u32).max(1);
    *origin = to;
    Some((delta > 0.0, steps))
}
