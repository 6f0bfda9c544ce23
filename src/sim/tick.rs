//! Fixed timestep simulation tick
//!
//! One call advances the ball by one physics step. Collision checks run in a
//! fixed order: blocks, walls, paddle, floor.

use super::state::{BreakerPhase, BreakerState, Outcome};
use crate::consts::*;

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerEvent {
    BlockDestroyed { id: u32 },
    WallBounce,
    PaddleBounce,
    Won,
    Lost,
}

/// Discrete paddle input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddleMove {
    Left,
    Right,
}

/// Apply one paddle key press. Ignored unless the run is live.
pub fn move_paddle(state: &mut BreakerState, mv: PaddleMove) -> bool {
    if state.phase != BreakerPhase::Running {
        return false;
    }
    let before = state.paddle.pos.x;
    match mv {
        PaddleMove::Left => state.paddle.shift(-PADDLE_STEP),
        PaddleMove::Right => state.paddle.shift(PADDLE_STEP),
    }
    state.paddle.pos.x != before
}

/// Advance the game state by one physics step
pub fn tick(state: &mut BreakerState) -> Vec<BreakerEvent> {
    let mut events = Vec::new();

    // Paused and finished runs keep their clock but do nothing
    if state.phase != BreakerPhase::Running {
        return events;
    }

    state.time_ticks += 1;
    state.ball.pos += state.ball.direction.velocity() * state.speed_multiplier;

    // Blocks: at most one destroyed per tick, first hit in scan order wins
    let ball_box = state.ball.bounds();
    if let Some(idx) = state
        .blocks
        .iter()
        .position(|block| block.bounds().overlaps(&ball_box))
    {
        let block = state.blocks.remove(idx);
        state.ball.direction = state.ball.direction.next();
        state.score += 1;
        events.push(BreakerEvent::BlockDestroyed { id: block.id });

        if state.blocks.is_empty() {
            state.phase = BreakerPhase::Terminal(Outcome::Won);
            events.push(BreakerEvent::Won);
            return events;
        }
    }

    // Walls (left, right, ceiling). The floor is handled below.
    let pos = state.ball.pos;
    if pos.x <= 0.0 || pos.x >= BOARD_WIDTH - BALL_DIAMETER || pos.y >= BOARD_HEIGHT - BALL_DIAMETER
    {
        state.ball.direction = state.ball.direction.next();
        events.push(BreakerEvent::WallBounce);
    }

    if state.ball.bounds().overlaps(&state.paddle.bounds()) {
        state.ball.direction = state.ball.direction.next();
        events.push(BreakerEvent::PaddleBounce);
    }

    if state.ball.pos.y <= 0.0 {
        state.phase = BreakerPhase::Terminal(Outcome::Lost);
        events.push(BreakerEvent::Lost);
    }

    events
}
