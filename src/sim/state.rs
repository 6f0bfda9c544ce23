//! Brick Breaker game state and core simulation types
//!
//! The engine owns every entity exclusively; the outside world only ever
//! sees a [`BreakerSnapshot`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::consts::*;

/// Current phase of a Brick Breaker run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BreakerPhase {
    /// Active gameplay
    Running,
    /// Player paused; ticks are no-ops
    Paused,
    /// Run ended; only `reset()` leaves this phase
    Terminal(Outcome),
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
}

impl Outcome {
    /// Result banner text
    pub fn message(&self) -> &'static str {
        match self {
            Outcome::Won => "You Win!",
            Outcome::Lost => "You lose!",
        }
    }
}

/// Diagonal ball heading.
///
/// Every collision advances the heading one step around a fixed cycle,
/// whatever surface was hit:
/// `UpRight -> DownRight -> DownLeft -> UpLeft -> UpRight`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// (+2, +2)
    UpRight,
    /// (+2, -2)
    DownRight,
    /// (-2, -2)
    DownLeft,
    /// (-2, +2)
    UpLeft,
}

impl Direction {
    pub fn next(self) -> Self {
        match self {
            Direction::UpRight => Direction::DownRight,
            Direction::DownRight => Direction::DownLeft,
            Direction::DownLeft => Direction::UpLeft,
            Direction::UpLeft => Direction::UpRight,
        }
    }

    /// Per-tick displacement at 1x speed
    pub fn velocity(self) -> Vec2 {
        match self {
            Direction::UpRight => Vec2::new(BALL_STEP, BALL_STEP),
            Direction::DownRight => Vec2::new(BALL_STEP, -BALL_STEP),
            Direction::DownLeft => Vec2::new(-BALL_STEP, -BALL_STEP),
            Direction::UpLeft => Vec2::new(-BALL_STEP, BALL_STEP),
        }
    }
}

/// The ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ball {
    /// Bottom-left corner of the ball's bounding box
    pub pos: Vec2,
    pub direction: Direction,
}

impl Default for Ball {
    fn default() -> Self {
        Self {
            pos: Vec2::new(BALL_START.0, BALL_START.1),
            direction: Direction::UpLeft,
        }
    }
}

impl Ball {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_corner(self.pos, BALL_DIAMETER, BALL_DIAMETER)
    }
}

/// The player's paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    /// Bottom-left corner
    pub pos: Vec2,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            pos: Vec2::new(PADDLE_START.0, PADDLE_START.1),
        }
    }
}

impl Paddle {
    pub fn bounds(&self) -> Aabb {
        Aabb::from_corner(self.pos, PADDLE_WIDTH, PADDLE_HEIGHT)
    }

    /// Step horizontally, staying on the board
    pub fn shift(&mut self, dx: f32) {
        self.pos.x = (self.pos.x + dx).clamp(0.0, BOARD_WIDTH - PADDLE_WIDTH);
    }
}

/// A block; immutable once placed, removed when hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub id: u32,
    /// Bottom-left corner
    pub pos: Vec2,
}

impl Block {
    pub fn new(id: u32, x: f32, y: f32) -> Self {
        Self {
            id,
            pos: Vec2::new(x, y),
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_corner(self.pos, BLOCK_WIDTH, BLOCK_HEIGHT)
    }
}

/// Row heights of the starting wall, top row first
const BLOCK_ROWS: [f32; 3] = [270.0, 240.0, 210.0];
/// Column offsets of the starting wall
const BLOCK_COLUMNS: [f32; 5] = [10.0, 120.0, 230.0, 340.0, 450.0];

/// The 15-block starting wall, ids in row-major order from the top
pub fn initial_blocks() -> Vec<Block> {
    let mut blocks = Vec::with_capacity(BLOCK_ROWS.len() * BLOCK_COLUMNS.len());
    for y in BLOCK_ROWS {
        for x in BLOCK_COLUMNS {
            blocks.push(Block::new(blocks.len() as u32, x, y));
        }
    }
    blocks
}

/// Snap a requested speed multiplier onto the allowed slider positions
pub fn clamp_speed(multiplier: f32) -> f32 {
    if !multiplier.is_finite() {
        return 1.0;
    }
    let snapped = (multiplier / SPEED_STEP).round() * SPEED_STEP;
    snapped.clamp(SPEED_MIN, SPEED_MAX)
}

/// Complete Brick Breaker state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakerState {
    pub phase: BreakerPhase,
    pub paddle: Paddle,
    pub ball: Ball,
    /// Live blocks in scan order
    pub blocks: Vec<Block>,
    pub score: u32,
    /// Applied to both displacement axes
    pub speed_multiplier: f32,
    /// Whole seconds of unpaused play
    pub elapsed_secs: u32,
    /// Physics ticks simulated since the last reset
    pub time_ticks: u64,
}

impl Default for BreakerState {
    fn default() -> Self {
        Self::new()
    }
}

impl BreakerState {
    pub fn new() -> Self {
        Self::with_blocks(initial_blocks())
    }

    pub fn with_blocks(blocks: Vec<Block>) -> Self {
        Self {
            phase: BreakerPhase::Running,
            paddle: Paddle::default(),
            ball: Ball::default(),
            blocks,
            score: 0,
            speed_multiplier: 1.0,
            elapsed_secs: 0,
            time_ticks: 0,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, BreakerPhase::Terminal(_))
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            BreakerPhase::Terminal(outcome) => Some(outcome),
            _ => None,
        }
    }

    /// Back to a fresh wall; the speed setting survives
    pub fn reset(&mut self) {
        let speed = self.speed_multiplier;
        *self = Self::new();
        self.speed_multiplier = speed;
    }

    pub fn snapshot(&self) -> BreakerSnapshot {
        BreakerSnapshot {
            phase: self.phase,
            paddle: self.paddle.pos,
            ball: self.ball.pos,
            direction: self.ball.direction,
            blocks: self.blocks.clone(),
            score: self.score,
            speed_multiplier: self.speed_multiplier,
            elapsed_secs: self.elapsed_secs,
        }
    }
}

/// Read-only view of a Brick Breaker run for rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakerSnapshot {
    pub phase: BreakerPhase,
    pub paddle: Vec2,
    pub ball: Vec2,
    pub direction: Direction,
    pub blocks: Vec<Block>,
    pub score: u32,
    pub speed_multiplier: f32,
    pub elapsed_secs: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_cycle() {
        let mut dir = Direction::UpRight;
        let expected = [
            Direction::DownRight,
            Direction::DownLeft,
            Direction::UpLeft,
            Direction::UpRight,
        ];
        for want in expected {
            dir = dir.next();
            assert_eq!(dir, want);
        }
        assert_eq!(Direction::UpLeft.velocity(), Vec2::new(-2.0, 2.0));
    }

    #[test]
    fn test_initial_blocks_layout() {
        let blocks = initial_blocks();
        assert_eq!(blocks.len(), 15);
        assert_eq!(blocks[0], Block::new(0, 10.0, 270.0));
        assert_eq!(blocks[4], Block::new(4, 450.0, 270.0));
        assert_eq!(blocks[14], Block::new(14, 450.0, 210.0));
    }

    #[test]
    fn test_paddle_clamped_to_board() {
        let mut paddle = Paddle::default();
        for _ in 0..100 {
            paddle.shift(-PADDLE_STEP);
        }
        assert_eq!(paddle.pos.x, 0.0);
        for _ in 0..100 {
            paddle.shift(PADDLE_STEP);
        }
        assert_eq!(paddle.pos.x, BOARD_WIDTH - PADDLE_WIDTH);
    }

    #[test]
    fn test_clamp_speed() {
        assert_eq!(clamp_speed(1.0), 1.0);
        assert_eq!(clamp_speed(2.4), 2.5);
        assert_eq!(clamp_speed(0.1), 0.5);
        assert_eq!(clamp_speed(9.0), 3.0);
        assert_eq!(clamp_speed(f32::NAN), 1.0);
    }

    #[test]
    fn test_reset_keeps_speed() {
        let mut state = BreakerState::new();
        state.speed_multiplier = 2.5;
        state.score = 7;
        state.blocks.clear();
        state.phase = BreakerPhase::Terminal(Outcome::Won);

        state.reset();
        assert_eq!(state.phase, BreakerPhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.blocks.len(), 15);
        assert_eq!(state.speed_multiplier, 2.5);
    }
}
