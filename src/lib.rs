//! Game Portal - two small arcade games behind a local sign-in gate
//!
//! Core modules:
//! - `sim`: Brick Breaker simulation (physics tick, collisions, game state)
//! - `memory`: Food Memory pairs-matching engine
//! - `clock`: Fixed-rate tick source and one-shot timers
//! - `session`: Session store (user, nickname, settings, game-active flag)
//! - `nav`: Routes and the navigation guard
//! - `portal`: Application context that mounts engines per route
//! - `auth`: Local sign-up and sign-in
//! - `audio`: Background music per mounted game
//! - `storage`: Key-value storage backends (LocalStorage on web)
//! - `web`: wasm bindings for the page script

pub mod audio;
pub mod auth;
pub mod clock;
pub mod memory;
pub mod nav;
pub mod portal;
pub mod session;
pub mod settings;
pub mod sim;
pub mod storage;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use clock::{GameClock, OneShot, TimerToken};
pub use nav::{NavOutcome, NavigationGuard, Route};
pub use portal::{ActiveGame, Portal};
pub use session::{Session, User};
pub use settings::{Settings, Theme};
pub use storage::{KeyValueStore, MemoryStore, StorageError};

/// Game configuration constants
pub mod consts {
    /// Physics tick period (ms)
    pub const PHYSICS_TICK_MS: u32 = 30;
    /// Elapsed-time counter period (ms)
    pub const CLOCK_TICK_MS: u32 = 1000;
    /// Delay before a two-card pick is resolved (ms)
    pub const RESOLVE_DELAY_MS: u32 = 500;
    /// Longest host frame a clock will account for (ms)
    pub const MAX_FRAME_MS: u32 = 250;
    /// Maximum clock periods fired per advance to prevent spiral of death.
    /// Must cover a full clamped frame of physics ticks plus a carried partial.
    pub const MAX_SUBSTEPS: u32 = MAX_FRAME_MS.div_ceil(PHYSICS_TICK_MS) + 1;

    /// Board dimensions
    pub const BOARD_WIDTH: f32 = 560.0;
    pub const BOARD_HEIGHT: f32 = 300.0;

    /// Block dimensions (the paddle shares them)
    pub const BLOCK_WIDTH: f32 = 100.0;
    pub const BLOCK_HEIGHT: f32 = 20.0;
    pub const PADDLE_WIDTH: f32 = BLOCK_WIDTH;
    pub const PADDLE_HEIGHT: f32 = BLOCK_HEIGHT;

    /// Ball bounding box is BALL_DIAMETER square from its bottom-left corner
    pub const BALL_DIAMETER: f32 = 20.0;
    /// Per-axis displacement per tick at 1x speed
    pub const BALL_STEP: f32 = 2.0;

    /// Start positions (bottom-left corners)
    pub const PADDLE_START: (f32, f32) = (230.0, 10.0);
    pub const BALL_START: (f32, f32) = (270.0, 40.0);
    /// Horizontal paddle step per key press
    pub const PADDLE_STEP: f32 = 10.0;

    /// Speed multiplier range
    pub const SPEED_MIN: f32 = 0.5;
    pub const SPEED_MAX: f32 = 3.0;
    pub const SPEED_STEP: f32 = 0.5;

    /// Memory deck: distinct faces, each appearing twice
    pub const MEMORY_PAIRS: usize = 6;
    pub const MEMORY_CARDS: usize = MEMORY_PAIRS * 2;
}
