//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure and deterministic:
//! - Fixed timestep only
//! - Randomness supplied by the caller (tests inject seeded generators)
//! - No rendering, audio, terminal, or storage dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{hits_ground, hits_pipe, overlaps_horizontally};
pub use state::{Bird, GameEvent, GamePhase, GameState, Pipe};
pub use tick::{TickInput, tick};
