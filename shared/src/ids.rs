//! Identifiers for frames and viewer instances.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 1-based linear frame id.
///
/// Frame `(row, col)` in a grid with `cols` columns maps to
/// `(row - 1) * cols + col`. Id 1 is always the top-left cell and is the
/// frame the image pool treats as "first".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FrameId(u32);

impl FrameId {
    /// The first frame of any sequence.
    pub const FIRST: Self = Self(1);

    /// Create a frame id. Returns `None` for 0, which is never a valid id.
    pub const fn new(id: u32) -> Option<Self> {
        if id == 0 { None } else { Some(Self(id)) }
    }

    /// Frame id for a zero-based position in the image pool.
    pub const fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }

    /// Raw 1-based value.
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Zero-based position in the image pool.
    pub const fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle for a viewer registered with a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ViewerId(pub u32);

impl fmt::Display for ViewerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "viewer-{}", self.0)
    }
}
