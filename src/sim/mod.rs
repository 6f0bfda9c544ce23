//! Brick Breaker simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Stable iteration order (blocks scanned in placement order)
//! - No rendering or platform dependencies

pub mod breaker;
pub mod collision;
pub mod state;
pub mod tick;

pub use breaker::BrickBreaker;
pub use collision::Aabb;
pub use state::{
    Ball, Block, BreakerPhase, BreakerSnapshot, BreakerState, Direction, Outcome, Paddle,
    clamp_speed, initial_blocks,
};
pub use tick::{BreakerEvent, PaddleMove, move_paddle, tick};
