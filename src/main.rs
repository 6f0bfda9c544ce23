//! Game Portal entry point
//!
//! On the web the page script constructs a `WebPortal`; this binary only
//! sets up logging there. Natively it plays both games headless and logs
//! the results.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    game_portal::web::init();
    log::info!("Game portal loaded");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Game portal (native) starting...");
    log::info!("Native mode runs headless - serve the web build to play");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);

    headless::play_brick_breaker(seed);
    headless::play_memory(seed);
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use game_portal::consts::{MEMORY_CARDS, PHYSICS_TICK_MS};
    use game_portal::memory::PickOutcome;
    use game_portal::portal::FrameEvents;
    use game_portal::sim::{BreakerEvent, PaddleMove};
    use game_portal::{ActiveGame, MemoryStore, Portal, Route};

    /// Frame length the host pretends to run at
    const FRAME_MS: u32 = 16;
    /// Give up after this much simulated time
    const MAX_RUN_MS: u32 = 5 * 60 * 1000;

    /// Track the ball with the paddle until the run ends
    pub fn play_brick_breaker(seed: u64) {
        let mut portal = Portal::new(MemoryStore::new(), seed);
        portal.navigate(Route::BrickBreaker);
        portal.update_game(|g| {
            if let ActiveGame::Breaker(b) = g {
                b.set_speed(2.0);
            }
        });

        let mut elapsed = 0;
        while elapsed < MAX_RUN_MS {
            portal.update_game(|g| {
                if let ActiveGame::Breaker(b) = g {
                    let ball = b.state().ball.pos.x;
                    let paddle = b.state().paddle.pos.x + 40.0;
                    if ball < paddle {
                        b.move_paddle(PaddleMove::Left);
                    } else if ball > paddle + 20.0 {
                        b.move_paddle(PaddleMove::Right);
                    }
                }
            });

            if let FrameEvents::Breaker(events) = portal.advance(FRAME_MS) {
                if events
                    .iter()
                    .any(|e| matches!(e, BreakerEvent::Won | BreakerEvent::Lost))
                {
                    break;
                }
            }
            elapsed += FRAME_MS;
        }

        if let Some(ActiveGame::Breaker(b)) = portal.game() {
            let result = b.outcome().map_or("Time up", |o| o.message());
            log::info!(
                "Brick Breaker: {} score {} in {}s ({} ticks of {}ms)",
                result,
                b.score(),
                b.elapsed_secs(),
                b.state().time_ticks,
                PHYSICS_TICK_MS
            );
        }
    }

    /// Pick every pair, peeking at the deck
    pub fn play_memory(seed: u64) {
        let mut portal = Portal::new(MemoryStore::new(), seed);
        portal.navigate(Route::Memory);

        for first in 0..MEMORY_CARDS {
            let partner = match portal.game() {
                Some(ActiveGame::Memory(m)) if !m.is_matched(first) => {
                    let face = m.deck().get(first).map(|c| c.face);
                    (0..MEMORY_CARDS)
                        .find(|&i| i != first && m.deck().get(i).map(|c| c.face) == face)
                }
                _ => None,
            };
            let Some(second) = partner else { continue };

            let scheduled = portal.update_game(|g| match g {
                ActiveGame::Memory(m) => {
                    m.pick_card(first);
                    m.pick_card(second)
                }
                ActiveGame::Breaker(_) => PickOutcome::Ignored,
            });
            if let Some(PickOutcome::ResolutionScheduled(_)) = scheduled {
                // Let the resolution delay run out
                while let FrameEvents::Memory(None) = portal.advance(FRAME_MS) {}
            }
        }

        if let Some(ActiveGame::Memory(m)) = portal.game() {
            log::info!(
                "Food Memory: {} (score {}, {}s)",
                m.result_text(),
                m.score(),
                m.elapsed_secs()
            );
        }
    }
}
