//! Game state and core simulation types
//!
//! Everything the renderer needs to draw a frame lives here, mutated in
//! place by the tick function.

use std::f32::consts::FRAC_PI_4;

use glam::Vec2;

use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen, bird bobbing in place, waiting for input
    Welcome,
    /// Active gameplay
    Playing,
    /// The bird hit something; frozen until input resets the run
    GameOver,
}

/// The player's bird
#[derive(Debug, Clone)]
pub struct Bird {
    /// Top-left corner of the collision box; `x` never changes
    pub pos: Vec2,
    /// Vertical velocity (positive = down)
    pub vel: f32,
    /// Tilt in radians, derived from velocity and clamped to ±π/4
    pub rotation: f32,
    /// Current animation frame, cosmetic only
    pub frame: usize,
    frame_counter: u32,
}

impl Default for Bird {
    fn default() -> Self {
        Self::new()
    }
}

impl Bird {
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(BIRD_X, WORLD_H / 2.0),
            vel: 0.0,
            rotation: 0.0,
            frame: 0,
            frame_counter: 0,
        }
    }

    /// Flap: set velocity to the impulse and nudge the position up a bit
    /// extra for instant responsiveness. The only call site of the
    /// [`JUMP_NUDGE`] double application.
    pub fn flap(&mut self) {
        self.vel = JUMP_IMPULSE;
        self.pos.y += JUMP_IMPULSE * JUMP_NUDGE;
    }

    /// One tick of gravity integration, with the top-of-screen clamp
    pub fn integrate(&mut self) {
        self.vel += GRAVITY;
        self.pos.y += self.vel;
        self.rotation = (self.vel * ROTATION_SCALE).clamp(-FRAC_PI_4, FRAC_PI_4);

        // The top bound clamps rather than kills
        if self.pos.y < 0.0 {
            self.pos.y = 0.0;
            self.vel = 0.0;
        }
    }

    /// Advance the wing-flap cycle; shared by Welcome and Playing
    pub fn animate(&mut self) {
        self.frame_counter += 1;
        if self.frame_counter >= FRAME_DELAY {
            self.frame = (self.frame + 1) % BIRD_FRAMES;
            self.frame_counter = 0;
        }
    }

    /// Welcome-screen float: no gravity, no tilt, just a slow bob around
    /// the vertical center
    pub fn bob(&mut self, elapsed_ms: f32) {
        self.vel = 0.0;
        self.rotation = 0.0;
        self.pos.y = WORLD_H / 2.0 + BOB_AMPLITUDE * (elapsed_ms / BOB_PERIOD_MS).sin();
    }

    /// Back to the initial kinematic state
    pub fn reset(&mut self) {
        self.pos.y = WORLD_H / 2.0;
        self.vel = 0.0;
        self.rotation = 0.0;
    }
}

/// A pipe pair: a top and a bottom barrier with a fixed gap between them
#[derive(Debug, Clone)]
pub struct Pipe {
    /// Left edge; decreases every tick
    pub x: f32,
    /// Bottom edge of the top pipe
    pub top_height: f32,
    /// Top edge of the bottom pipe; always `top_height + PIPE_GAP`
    pub bottom_y: f32,
    /// Scoring already credited for this pair
    pub passed: bool,
}

impl Pipe {
    /// New pair at `x` with the gap's upper edge at `top_height`
    pub fn new(x: f32, top_height: f32) -> Self {
        Self {
            x,
            top_height,
            bottom_y: top_height + PIPE_GAP,
            passed: false,
        }
    }
}

/// Something that happened during a tick that the frontend may want to
/// react to (sound, persistence, logging). Cleared at the start of every
/// tick, so the queue only ever holds the most recent tick's events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The bird flapped
    Flapped,
    /// A pipe pair was passed; carries the new score
    Scored(u32),
    /// The score exceeded the stored best; carries the new best
    NewHighScore(u32),
    /// The bird struck the ground or a pipe
    Crashed,
}

/// Complete game state, advanced by [`tick`](super::tick::tick)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Current phase; written only by the tick function
    pub phase: GamePhase,
    pub bird: Bird,
    /// Live pipe pairs in spawn order (oldest first)
    pub pipes: Vec<Pipe>,
    /// Ground scroll offset in `(-GROUND_TILE_W, 0]`, render-only
    pub ground_x: f32,
    /// Pipes passed this life
    pub score: u32,
    /// Best score seen this process; never decreases
    pub high_score: u32,
    /// Simulation tick counter; survives resets
    pub time_ticks: u64,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create the world once at startup. `high_score` comes from the
    /// persistent store (zero when absent).
    pub fn new(high_score: u32) -> Self {
        assert!(PIPE_GAP > 0.0, "pipe gap must be positive");
        assert!(PIPE_TOP_RANGE > 0.0, "pipe spawn range must be positive");

        Self {
            phase: GamePhase::Welcome,
            bird: Bird::new(),
            pipes: Vec::new(),
            ground_x: 0.0,
            score: 0,
            high_score,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Re-initialize for a new life: bird kinematics, pipes, and score.
    /// The container itself, the high score, the ground offset, and the
    /// tick clock all survive.
    pub fn reset(&mut self) {
        self.bird.reset();
        self.pipes.clear();
        self.score = 0;
    }
}
