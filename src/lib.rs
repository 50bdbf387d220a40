//! Pyra Flap - a desert-themed flappy-bird arcade game for the terminal
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bird physics, pipes, scoring, phases)
//! - `renderer`: Half-block terminal rendering
//! - `storage`: Key/value store backing the high score
//! - `highscores`: The single best-score scalar and its persistence rules
//! - `audio`: Procedurally synthesized sound effects

pub mod audio;
pub mod highscores;
pub mod renderer;
pub mod sim;
pub mod storage;

pub use highscores::HighScore;
pub use storage::{FileStore, MemStore, Store};

/// Game configuration constants
///
/// The world is a fixed logical canvas; the renderer scales it to whatever
/// terminal it finds itself in. All tuning lives here so the simulation
/// modules stay free of magic numbers.
pub mod consts {
    /// Logical world width
    pub const WORLD_W: f32 = 662.0;
    /// Logical world height
    pub const WORLD_H: f32 = 666.0;

    /// Fixed simulation timestep (60 Hz, one tick per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Milliseconds per tick, for the welcome-screen bobbing clock
    pub const TICK_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Bird's fixed horizontal position
    pub const BIRD_X: f32 = 50.0;
    /// Bird collision box (square, smaller than the drawn sprite)
    pub const BIRD_SIZE: f32 = 24.0;
    /// Gravity, added to vertical velocity once per tick
    pub const GRAVITY: f32 = 0.103_044_15;
    /// Flap impulse (negative = up), assigned to velocity on flap
    pub const JUMP_IMPULSE: f32 = -4.051_086_7;
    /// Extra instantaneous position nudge on flap, as a multiple of the
    /// impulse. The velocity change is integrated again next tick, so the
    /// impulse is effectively applied twice; intentional, and kept behind
    /// this one constant so it can be tuned in a single place.
    pub const JUMP_NUDGE: f32 = 1.1;
    /// Velocity-to-rotation scale; the result is clamped to ±π/4
    pub const ROTATION_SCALE: f32 = 0.1;
    /// Number of bird animation frames
    pub const BIRD_FRAMES: usize = 8;
    /// Ticks between animation frame advances
    pub const FRAME_DELAY: u32 = 5;

    /// Welcome-screen bob amplitude
    pub const BOB_AMPLITUDE: f32 = 8.0;
    /// Welcome-screen bob period divisor (milliseconds)
    pub const BOB_PERIOD_MS: f32 = 250.0;

    /// Pipe width (collision span)
    pub const PIPE_W: f32 = 52.0;
    /// Vertical gap between the top and bottom pipe of a pair
    pub const PIPE_GAP: f32 = 150.0;
    /// Minimum horizontal distance between consecutive spawns
    pub const PIPE_SPACING: f32 = 230.0;
    /// Lowest allowed bottom edge of a top pipe
    pub const PIPE_MIN_TOP: f32 = 100.0;
    /// Width of the uniform draw for the top pipe's bottom edge; the draw
    /// is `PIPE_MIN_TOP + uniform[0, PIPE_TOP_RANGE)`
    pub const PIPE_TOP_RANGE: f32 = WORLD_H - PIPE_GAP - 200.0;

    /// World scroll speed (pipes and ground), per tick
    pub const SCROLL_SPEED: f32 = 1.64;
    /// Ground strip height
    pub const GROUND_H: f32 = 112.0;
    /// Top of the ground strip; the bird dies past this line
    pub const GROUND_Y: f32 = WORLD_H - GROUND_H;
    /// Ground tile width; the scroll offset wraps modulo this
    pub const GROUND_TILE_W: f32 = 24.0;
}
