//! Brick Breaker engine
//!
//! Wraps [`BreakerState`] with its two clocks: the 30 ms physics tick and
//! the 1 s elapsed-time counter.

use super::state::{BreakerPhase, BreakerSnapshot, BreakerState, Outcome, clamp_speed};
use super::tick::{BreakerEvent, PaddleMove, move_paddle, tick};
use crate::clock::{ClockState, GameClock};
use crate::consts::{CLOCK_TICK_MS, PHYSICS_TICK_MS};

/// A mounted Brick Breaker instance
#[derive(Debug, Clone)]
pub struct BrickBreaker {
    state: BreakerState,
    physics: GameClock,
    wall_clock: GameClock,
}

impl Default for BrickBreaker {
    fn default() -> Self {
        Self::new()
    }
}

impl BrickBreaker {
    /// Create an engine with both clocks running
    pub fn new() -> Self {
        Self::with_state(BreakerState::new())
    }

    pub fn with_state(state: BreakerState) -> Self {
        let mut engine = Self {
            state,
            physics: GameClock::new(PHYSICS_TICK_MS),
            wall_clock: GameClock::new(CLOCK_TICK_MS),
        };
        engine.physics.start();
        engine.wall_clock.start();
        engine
    }

    pub fn state(&self) -> &BreakerState {
        &self.state
    }

    pub fn snapshot(&self) -> BreakerSnapshot {
        self.state.snapshot()
    }

    pub fn phase(&self) -> BreakerPhase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.state.elapsed_secs
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.state.speed_multiplier
    }

    pub fn is_paused(&self) -> bool {
        self.state.phase == BreakerPhase::Paused
    }

    /// True while mounted and not yet finished
    pub fn is_active(&self) -> bool {
        self.physics.state() != ClockState::Stopped && !self.state.is_terminal()
    }

    /// Feed host time into both clocks and run whatever ticks fell due
    pub fn advance(&mut self, elapsed_ms: u32) -> Vec<BreakerEvent> {
        let mut events = Vec::new();

        for _ in 0..self.physics.advance(elapsed_ms) {
            let tick_events = tick(&mut self.state);
            for event in &tick_events {
                match event {
                    BreakerEvent::BlockDestroyed { id } => {
                        log::debug!("Block {} destroyed, score {}", id, self.state.score);
                    }
                    BreakerEvent::Won | BreakerEvent::Lost => {
                        log::info!(
                            "Brick Breaker finished: {:?} with score {} in {}s",
                            event,
                            self.state.score,
                            self.state.elapsed_secs
                        );
                    }
                    _ => {}
                }
            }
            events.extend(tick_events);
        }

        for _ in 0..self.wall_clock.advance(elapsed_ms) {
            if self.state.phase == BreakerPhase::Running {
                self.state.elapsed_secs += 1;
            }
        }

        events
    }

    pub fn move_paddle(&mut self, mv: PaddleMove) -> bool {
        move_paddle(&mut self.state, mv)
    }

    /// Running <-> Paused. Finished runs stay finished.
    pub fn toggle_pause(&mut self) {
        self.state.phase = match self.state.phase {
            BreakerPhase::Running => BreakerPhase::Paused,
            BreakerPhase::Paused => BreakerPhase::Running,
            terminal => terminal,
        };
        log::debug!("Brick Breaker phase: {:?}", self.state.phase);
    }

    /// Set the speed multiplier; takes effect on the next tick
    pub fn set_speed(&mut self, multiplier: f32) -> f32 {
        self.state.speed_multiplier = clamp_speed(multiplier);
        self.state.speed_multiplier
    }

    /// Fresh wall, fresh clocks, back to Running
    pub fn reset(&mut self) {
        self.state.reset();
        self.physics.start();
        self.wall_clock.start();
        log::info!("Brick Breaker reset");
    }

    /// Unmount: stop both clocks so nothing fires after teardown
    pub fn stop(&mut self) {
        self.physics.stop();
        self.wall_clock.stop();
    }

    /// Host-level suspension (hidden tab); keeps partial periods
    pub fn suspend(&mut self) {
        self.physics.pause();
        self.wall_clock.pause();
    }

    pub fn unsuspend(&mut self) {
        self.physics.resume();
        self.wall_clock.resume();
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.state.outcome()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Direction;
    use glam::Vec2;

    #[test]
    fn test_advance_runs_physics_ticks() {
        let mut engine = BrickBreaker::new();
        let start = engine.snapshot().ball;

        engine.advance(29);
        assert_eq!(engine.snapshot().ball, start);

        engine.advance(1);
        assert_eq!(engine.snapshot().ball, start + Vec2::new(-2.0, 2.0));
        assert!(engine.is_active());
    }

    #[test]
    fn test_elapsed_time_counts_running_seconds() {
        let mut engine = BrickBreaker::with_state({
            let mut state = BreakerState::new();
            // Park the ball in open space bouncing off nothing for a while
            state.ball.pos = Vec2::new(270.0, 60.0);
            state
        });
        for _ in 0..4 {
            engine.advance(250);
        }
        assert_eq!(engine.elapsed_secs(), 1);

        engine.toggle_pause();
        for _ in 0..8 {
            engine.advance(250);
        }
        assert_eq!(engine.elapsed_secs(), 1, "paused time is not counted");
    }

    #[test]
    fn test_pause_freezes_ball_without_catch_up() {
        let mut engine = BrickBreaker::new();
        engine.toggle_pause();
        assert!(engine.is_paused());

        let frozen = engine.snapshot().ball;
        engine.advance(250);
        engine.advance(250);
        assert_eq!(engine.snapshot().ball, frozen);

        engine.toggle_pause();
        engine.advance(30);
        // Exactly one step, not a burst for the paused time
        assert_eq!(engine.snapshot().ball, frozen + Vec2::new(-2.0, 2.0));
    }

    #[test]
    fn test_speed_change_applies_next_tick() {
        let mut engine = BrickBreaker::new();
        assert_eq!(engine.set_speed(3.0), 3.0);
        let start = engine.snapshot().ball;
        engine.advance(30);
        assert_eq!(engine.snapshot().ball, start + Vec2::new(-6.0, 6.0));
        assert_eq!(engine.set_speed(7.0), 3.0);
    }

    #[test]
    fn test_loss_reports_inactive_until_reset() {
        let mut state = BreakerState::new();
        state.ball.pos = Vec2::new(100.0, 2.0);
        state.ball.direction = Direction::DownLeft;
        let mut engine = BrickBreaker::with_state(state);

        let events = engine.advance(30);
        assert_eq!(events, vec![BreakerEvent::Lost]);
        assert_eq!(engine.outcome(), Some(Outcome::Lost));
        assert!(!engine.is_active());

        // Pause toggling cannot leave a terminal state
        engine.toggle_pause();
        assert_eq!(engine.outcome(), Some(Outcome::Lost));

        engine.reset();
        assert!(engine.is_active());
        assert_eq!(engine.phase(), BreakerPhase::Running);
        assert_eq!(engine.elapsed_secs(), 0);
    }

    #[test]
    fn test_stop_halts_everything() {
        let mut engine = BrickBreaker::new();
        engine.stop();
        assert!(!engine.is_active());
        let frozen = engine.snapshot();
        engine.advance(250);
        assert_eq!(engine.snapshot(), frozen);
    }

    #[test]
    fn test_suspend_and_unsuspend() {
        let mut engine = BrickBreaker::new();
        engine.advance(20);
        engine.suspend();
        let frozen = engine.snapshot().ball;
        engine.advance(250);
        assert_eq!(engine.snapshot().ball, frozen);

        assert!(engine.is_active(), "suspension is not unmounting");

        engine.unsuspend();
        // 20 ms carried over from before suspension
        engine.advance(10);
        assert_eq!(engine.snapshot().ball, frozen + Vec2::new(-2.0, 2.0));
    }
}
