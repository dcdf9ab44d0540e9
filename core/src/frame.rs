//! Frame index state machine
//!
//! Tracks the active `(row, col)` cell of a `rows x cols` frame grid and
//! moves it in whole steps. Each axis either wraps around or stops at its
//! edges. Nothing here has side effects: every move returns a [`Step`]
//! describing what happened, and the caller decides what to redraw and which
//! prev/next affordances to mark inactive.

use bitflags::bitflags;
use spin360_shared::FrameId;

/// What happens when a step would leave the grid on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgePolicy {
    /// Continue from the opposite side.
    Wrap,
    /// Clamp at the first/last cell.
    Stop,
}

impl EdgePolicy {
    /// Policy for a `stop_at_edges_*` config flag.
    pub fn from_stop_at_edges(stop: bool) -> Self {
        if stop { Self::Stop } else { Self::Wrap }
    }
}

/// Grid axis. Horizontal motion drives columns, vertical motion drives rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Column,
    Row,
}

/// Direction of a step along an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards higher indices.
    Advance,
    /// Towards lower indices.
    Retreat,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Self::Advance => Self::Retreat,
            Self::Retreat => Self::Advance,
        }
    }

    /// Flip the direction when `flip` is set.
    pub fn flip_if(self, flip: bool) -> Self {
        if flip { self.flipped() } else { self }
    }
}

/// Which end of an axis a clamped step hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    Min,
    Max,
}

/// A prev/next control whose enabled state reflects edge clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Affordance {
    Prev,
    Next,
}

/// Inactive marks for both affordances after a step under the stop policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AffordanceMarks {
    pub prev_inactive: bool,
    pub next_inactive: bool,
}

impl AffordanceMarks {
    /// Mark `affordance` inactive and clear the other one.
    pub fn only(affordance: Affordance) -> Self {
        match affordance {
            Affordance::Prev => Self { prev_inactive: true, next_inactive: false },
            Affordance::Next => Self { prev_inactive: false, next_inactive: true },
        }
    }

    pub fn get(&self, affordance: Affordance) -> bool {
        match affordance {
            Affordance::Prev => self.prev_inactive,
            Affordance::Next => self.next_inactive,
        }
    }

    /// Both marks in a fixed order (prev, then next).
    pub fn entries(&self) -> [(Affordance, bool); 2] {
        [
            (Affordance::Prev, self.prev_inactive),
            (Affordance::Next, self.next_inactive),
        ]
    }
}

/// Whether affordance marks are mirrored.
///
/// Control reversal inverts the spin reversal: with `control_reverse` set the
/// physical "prev" button maps to the logical advance direction unless the
/// spin itself is reversed too.
pub fn affordance_reverse(spin_reverse: bool, control_reverse: bool) -> bool {
    if control_reverse { !spin_reverse } else { spin_reverse }
}

/// Result of moving the index along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub axis: Axis,
    pub direction: Direction,
    pub policy: EdgePolicy,
    /// Position before the step (1-based).
    pub from: u32,
    /// Position after the step (1-based).
    pub to: u32,
    /// Edge reached by a clamped step. Always `None` under [`EdgePolicy::Wrap`].
    pub edge: Option<Bound>,
}

impl Step {
    /// Whether the position changed.
    pub fn moved(&self) -> bool {
        self.from != self.to
    }

    /// Affordance marks implied by this step.
    ///
    /// `None` under the wrap policy, where edges do not exist. Under the stop
    /// policy, reaching the max edge marks the advancing affordance inactive
    /// (`Next`, or `Prev` when `reverse`), reaching the min edge marks the
    /// retreating affordance (`Prev`, or `Next` when `reverse`), and a step
    /// that lands inside the axis clears both.
    pub fn affordances(&self, reverse: bool) -> Option<AffordanceMarks> {
        if self.policy == EdgePolicy::Wrap {
            return None;
        }

        let marks = match self.edge {
            Some(Bound::Max) => {
                AffordanceMarks::only(if reverse { Affordance::Prev } else { Affordance::Next })
            }
            Some(Bound::Min) => {
                AffordanceMarks::only(if reverse { Affordance::Next } else { Affordance::Prev })
            }
            None => AffordanceMarks::default(),
        };
        Some(marks)
    }
}

bitflags! {
    /// Which stop-policy edges the index currently sits on.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EdgeState: u8 {
        const AT_MIN_COL = 0b0001;
        const AT_MAX_COL = 0b0010;
        const AT_MIN_ROW = 0b0100;
        const AT_MAX_ROW = 0b1000;
    }
}

/// Grid dimensions. Both are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub rows: u32,
    pub cols: u32,
}

impl Grid {
    /// Create a grid, bumping zero dimensions up to 1.
    pub fn new(rows: u32, cols: u32) -> Self {
        Self {
            rows: rows.max(1),
            cols: cols.max(1),
        }
    }

    /// Total number of frames, saturating at `u32::MAX`.
    pub fn amount(&self) -> u32 {
        self.rows.saturating_mul(self.cols)
    }

    /// Linear frame id of a cell: `(row - 1) * cols + col`.
    pub fn frame_id(&self, row: u32, col: u32) -> FrameId {
        FrameId::from_index(((row - 1) * self.cols + (col - 1)) as usize)
    }

    /// Cell of a linear frame id (inverse of [`Grid::frame_id`]).
    pub fn cell(&self, frame: FrameId) -> (u32, u32) {
        let index = frame.get() - 1;
        (index / self.cols + 1, index % self.cols + 1)
    }

    fn len(&self, axis: Axis) -> u32 {
        match axis {
            Axis::Column => self.cols,
            Axis::Row => self.rows,
        }
    }
}

/// Active cell of a frame grid plus the rules for moving it.
#[derive(Debug, Clone)]
pub struct FrameIndex {
    grid: Grid,
    row: u32,
    col: u32,
    column_policy: EdgePolicy,
    row_policy: EdgePolicy,
    /// Mirrors affordance marks; never affects the arithmetic.
    reverse: bool,
}

impl FrameIndex {
    /// Index at the top-left cell.
    pub fn new(grid: Grid, column_policy: EdgePolicy, row_policy: EdgePolicy) -> Self {
        Self {
            grid,
            row: 1,
            col: 1,
            column_policy,
            row_policy,
            reverse: false,
        }
    }

    /// Set the affordance-reverse flag (see [`affordance_reverse`]).
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    /// Start at a given cell, clamped into the grid.
    pub fn with_start(mut self, row: u32, col: u32) -> Self {
        self.row = row.clamp(1, self.grid.rows);
        self.col = col.clamp(1, self.grid.cols);
        self
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn row(&self) -> u32 {
        self.row
    }

    pub fn col(&self) -> u32 {
        self.col
    }

    pub fn reverse(&self) -> bool {
        self.reverse
    }

    pub fn policy(&self, axis: Axis) -> EdgePolicy {
        match axis {
            Axis::Column => self.column_policy,
            Axis::Row => self.row_policy,
        }
    }

    /// Linear id of the active frame.
    pub fn frame_id(&self) -> FrameId {
        self.grid.frame_id(self.row, self.col)
    }

    /// Edges the index currently sits on, for axes using the stop policy.
    ///
    /// `None` when both axes wrap, since edges are meaningless then.
    pub fn edge_state(&self) -> Option<EdgeState> {
        if self.column_policy == EdgePolicy::Wrap && self.row_policy == EdgePolicy::Wrap {
            return None;
        }

        let mut state = EdgeState::empty();
        if self.column_policy == EdgePolicy::Stop {
            state.set(EdgeState::AT_MIN_COL, self.col == 1);
            state.set(EdgeState::AT_MAX_COL, self.col == self.grid.cols);
        }
        if self.row_policy == EdgePolicy::Stop {
            state.set(EdgeState::AT_MIN_ROW, self.row == 1);
            state.set(EdgeState::AT_MAX_ROW, self.row == self.grid.rows);
        }
        Some(state)
    }

    pub fn advance_column(&mut self, steps: u32) -> Step {
        self.step(Axis::Column, Direction::Advance, steps)
    }

    pub fn retreat_column(&mut self, steps: u32) -> Step {
        self.step(Axis::Column, Direction::Retreat, steps)
    }

    pub fn advance_row(&mut self, steps: u32) -> Step {
        self.step(Axis::Row, Direction::Advance, steps)
    }

    pub fn retreat_row(&mut self, steps: u32) -> Step {
        self.step(Axis::Row, Direction::Retreat, steps)
    }

    /// Move `steps` cells along `axis`.
    ///
    /// Callers never pass `steps == 0`; if they do, nothing moves and no
    /// edge is reported.
    pub fn step(&mut self, axis: Axis, direction: Direction, steps: u32) -> Step {
        let policy = self.policy(axis);
        let len = self.grid.len(axis);
        let from = match axis {
            Axis::Column => self.col,
            Axis::Row => self.row,
        };

        let (to, edge) = if steps == 0 {
            (from, None)
        } else {
            shift(from, len, steps, direction, policy)
        };

        match axis {
            Axis::Column => self.col = to,
            Axis::Row => self.row = to,
        }

        Step {
            axis,
            direction,
            policy,
            from,
            to,
            edge,
        }
    }
}

/// New 1-based position after moving `steps` along an axis of length `len`.
fn shift(
    pos: u32,
    len: u32,
    steps: u32,
    direction: Direction,
    policy: EdgePolicy,
) -> (u32, Option<Bound>) {
    let pos = pos as i64;
    let len = len as i64;
    let steps = steps as i64;

    match (policy, direction) {
        (EdgePolicy::Stop, Direction::Advance) => {
            if pos + steps >= len {
                (len as u32, Some(Bound::Max))
            } else {
                ((pos + steps) as u32, None)
            }
        }
        (EdgePolicy::Stop, Direction::Retreat) => {
            if pos - steps <= 1 {
                (1, Some(Bound::Min))
            } else {
                ((pos - steps) as u32, None)
            }
        }
        (EdgePolicy::Wrap, Direction::Advance) => (((pos - 1 + steps) % len + 1) as u32, None),
        (EdgePolicy::Wrap, Direction::Retreat) => {
            ((pos - 1 - steps).rem_euclid(len) as u32 + 1, None)
        }
    }
}
