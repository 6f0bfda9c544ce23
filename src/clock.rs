//! Fixed-rate game clocks
//!
//! Nothing here touches real time. The host feeds elapsed milliseconds into
//! `advance` (from `requestAnimationFrame` on web, or a test loop natively)
//! and the clock reports how many whole periods elapsed, like the fixed
//! timestep accumulator of a render loop.

use crate::consts::{MAX_FRAME_MS, MAX_SUBSTEPS};

/// Run state of a [`GameClock`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockState {
    #[default]
    Stopped,
    Running,
    Paused,
}

/// A fixed-period tick source
#[derive(Debug, Clone)]
pub struct GameClock {
    period_ms: u32,
    accumulator_ms: u32,
    state: ClockState,
    /// Total periods fired since the last `start()`
    fired: u64,
}

impl GameClock {
    pub fn new(period_ms: u32) -> Self {
        Self {
            period_ms: period_ms.max(1),
            accumulator_ms: 0,
            state: ClockState::Stopped,
            fired: 0,
        }
    }

    pub fn state(&self) -> ClockState {
        self.state
    }

    pub fn fired(&self) -> u64 {
        self.fired
    }

    /// Begin firing from a fresh period
    pub fn start(&mut self) {
        self.state = ClockState::Running;
        self.accumulator_ms = 0;
        self.fired = 0;
    }

    /// Halt firing and drop any partial period
    pub fn stop(&mut self) {
        self.state = ClockState::Stopped;
        self.accumulator_ms = 0;
    }

    /// Suspend firing, keeping the partial period
    pub fn pause(&mut self) {
        if self.state == ClockState::Running {
            self.state = ClockState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == ClockState::Paused {
            self.state = ClockState::Running;
        }
    }

    /// Account for `elapsed_ms` of host time, returning the number of
    /// periods that fired.
    pub fn advance(&mut self, elapsed_ms: u32) -> u32 {
        if self.state != ClockState::Running {
            return 0;
        }

        self.accumulator_ms += elapsed_ms.min(MAX_FRAME_MS);

        let mut ticks = 0;
        while self.accumulator_ms >= self.period_ms && ticks < MAX_SUBSTEPS {
            self.accumulator_ms -= self.period_ms;
            ticks += 1;
        }
        // Periods beyond the substep cap are dropped rather than carried
        if ticks == MAX_SUBSTEPS {
            self.accumulator_ms %= self.period_ms;
        }

        self.fired += u64::from(ticks);
        ticks
    }
}

/// Handle identifying one scheduling of a [`OneShot`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerToken {
    generation: u64,
}

/// A single delayed callback guarded by a generation counter.
///
/// Every `schedule` or `cancel` bumps the generation, so a token captured
/// before a reset can never be mistaken for the current one.
#[derive(Debug, Clone)]
pub struct OneShot {
    delay_ms: u32,
    remaining_ms: Option<u32>,
    generation: u64,
}

impl OneShot {
    pub fn new(delay_ms: u32) -> Self {
        Self {
            delay_ms,
            remaining_ms: None,
            generation: 0,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.remaining_ms.is_some()
    }

    /// Arm the timer, superseding anything already scheduled
    pub fn schedule(&mut self) -> TimerToken {
        self.generation += 1;
        self.remaining_ms = Some(self.delay_ms);
        TimerToken {
            generation: self.generation,
        }
    }

    /// Disarm the timer and invalidate all outstanding tokens
    pub fn cancel(&mut self) {
        self.generation += 1;
        self.remaining_ms = None;
    }

    pub fn is_current(&self, token: TimerToken) -> bool {
        token.generation == self.generation
    }

    /// Count down; yields the token once when the delay has elapsed
    pub fn advance(&mut self, elapsed_ms: u32) -> Option<TimerToken> {
        let remaining = self.remaining_ms?;
        if elapsed_ms < remaining {
            self.remaining_ms = Some(remaining - elapsed_ms);
            return None;
        }
        self.remaining_ms = None;
        Some(TimerToken {
            generation: self.generation,
        })
    }
}
