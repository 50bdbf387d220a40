//! Terminal rendering
//!
//! Draws the fixed logical world into an RGB pixel buffer, two pixels per
//! terminal cell (the upper-half-block trick), and flushes it with
//! crossterm. Purely a consumer of [`GameState`](crate::sim::GameState);
//! owns no simulation logic and never mutates the world.

mod pixel;
mod scene;

pub use pixel::{PixelBuf, Rgb};
pub use scene::TermRenderer;
