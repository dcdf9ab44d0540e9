//! Fixed-period spin ticker
//!
//! Drives autoplay and hold-to-spin. Hosts either own a real repeating timer
//! and call [`SpinTicker::fire`] with the handle they were given, or poll
//! [`SpinTicker::advance`] with elapsed time every frame. Stopping bumps the
//! generation, so a timer callback that was already queued when the ticker
//! stopped carries a stale handle and is ignored.

use std::time::Duration;

use crate::frame::Direction;

/// Upper bound on ticks reported by one `advance` call (e.g. after the host
/// was suspended).
pub const MAX_TICKS_PER_ADVANCE: u32 = 64;

/// What the ticker is spinning for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpinMode {
    /// Automatic spinning; `reversed` steps backwards.
    Autoplay { reversed: bool },
    /// A prev/next control held down.
    Hold(Direction),
}

impl SpinMode {
    /// Column direction of every tick.
    pub fn direction(self) -> Direction {
        match self {
            Self::Autoplay { reversed } => Direction::Advance.flip_if(reversed),
            Self::Hold(direction) => direction,
        }
    }
}

/// Registration of one ticker run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickerHandle(u64);

/// Ticks due after an `advance` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticks {
    pub direction: Direction,
    pub count: u32,
}

#[derive(Debug, Clone)]
pub struct SpinTicker {
    period: Duration,
    generation: u64,
    mode: Option<SpinMode>,
    /// Time accumulated towards the next tick
    elapsed: Duration,
}

impl SpinTicker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            generation: 0,
            mode: None,
            elapsed: Duration::ZERO,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_active(&self) -> bool {
        self.mode.is_some()
    }

    pub fn mode(&self) -> Option<SpinMode> {
        self.mode
    }

    /// Handle of the current run, if any.
    pub fn handle(&self) -> Option<TickerHandle> {
        self.mode.map(|_| TickerHandle(self.generation))
    }

    /// Start ticking, replacing any run in progress.
    pub fn start(&mut self, mode: SpinMode) -> TickerHandle {
        self.generation += 1;
        self.mode = Some(mode);
        self.elapsed = Duration::ZERO;
        TickerHandle(self.generation)
    }

    /// Stop ticking. Returns the mode that was running.
    ///
    /// Clears the registration and the active flag together; no tick is
    /// reported afterwards until the next `start`.
    pub fn stop(&mut self) -> Option<SpinMode> {
        let mode = self.mode.take();
        if mode.is_some() {
            self.generation += 1;
        }
        self.elapsed = Duration::ZERO;
        mode
    }

    /// A host timer fired. Returns the step direction, or `None` when the
    /// handle belongs to a run that was stopped or replaced.
    pub fn fire(&self, handle: TickerHandle) -> Option<Direction> {
        match self.mode {
            Some(mode) if handle.0 == self.generation => Some(mode.direction()),
            _ => None,
        }
    }

    /// Account for `elapsed` time and return the ticks that became due.
    ///
    /// Partial periods carry over to the next call.
    pub fn advance(&mut self, elapsed: Duration) -> Option<Ticks> {
        let mode = self.mode?;

        if self.period.is_zero() {
            return Some(Ticks {
                direction: mode.direction(),
                count: 1,
            });
        }

        self.elapsed += elapsed;
        let due = self.elapsed.as_nanos() / self.period.as_nanos();
        if due == 0 {
            return None;
        }

        let count = due.min(MAX_TICKS_PER_ADVANCE as u128) as u32;
        if due > count as u128 {
            tracing::trace!("Dropping {} overdue spin ticks", due - count as u128);
            self.elapsed = Duration::ZERO;
        } else {
            self.elapsed -= self.period * count;
        }

        Some(Ticks {
            direction: mode.direction(),
            count,
        })
    }
}
