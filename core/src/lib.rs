//! spin360 Core - 360° product spin viewer
//!
//! This crate provides the platform-independent state machine behind a
//! product spin: a grid of pre-captured frames, input that selects one of
//! them, and the loading bookkeeping that gates interaction.
//!
//! # Architecture
//!
//! - [`FrameIndex`] - Active row/column with wrap or edge-stop arithmetic
//! - [`DragTracker`] / [`KeyboardMapping`] - Raw input to frame steps
//! - [`SpinTicker`] - Autoplay and hold-to-spin timing
//! - [`ImagePool`] - Frame sources, load progress and milestones
//! - [`Viewer`] - One spin instance, talking to a [`PresentationAdapter`]
//! - [`ViewerRegistry`] - Several viewers on one page with scoped key focus

pub mod adapter;
pub mod config;
pub mod error;
pub mod events;
pub mod frame;
pub mod input;
#[cfg(test)]
mod integration;
pub mod pool;
pub mod registry;
#[cfg(test)]
pub mod test_utils;
pub mod ticker;
pub mod viewer;

pub use adapter::{Badge, Canvas, Cursor, Layout, PresentationAdapter};
pub use config::{HostEnv, ResolvedConfig, ViewerConfig};
pub use error::ConfigError;
pub use events::{Events, ViewerEvent};
pub use frame::{
    Affordance, AffordanceMarks, Axis, Bound, Direction, EdgePolicy, EdgeState, FrameIndex, Grid,
    Step,
};
pub use input::{DragTracker, InputEvent, Key, KeyboardMapping, SpeedFactors, StepRequest};
pub use pool::{FrameRequest, ImagePool, LoadOutcome, LoadState, Milestone};
pub use registry::ViewerRegistry;
pub use ticker::{SpinMode, SpinTicker, TickerHandle};
pub use viewer::{Magnifier, Phase, Viewer};

pub use spin360_shared::{FrameId, Point, Size, ViewerId};
