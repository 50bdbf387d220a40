//! Collision predicates between the bird and the world
//!
//! All checks are plain axis-aligned comparisons in world coordinates. The
//! bird's collision box is deliberately smaller than its drawn sprite.

use crate::consts::*;

use super::state::{Bird, Pipe};

/// True when the bird's lower edge has sunk past the ground line.
///
/// Strict comparison: resting exactly on the line is survivable.
pub fn hits_ground(bird: &Bird) -> bool {
    bird.pos.y + BIRD_SIZE > GROUND_Y
}

/// True when the bird's horizontal span overlaps the pipe's
pub fn overlaps_horizontally(bird: &Bird, pipe: &Pipe) -> bool {
    bird.pos.x + BIRD_SIZE > pipe.x && bird.pos.x < pipe.x + PIPE_W
}

/// True when the bird is inside the pipe's horizontal span and outside
/// its gap
pub fn hits_pipe(bird: &Bird, pipe: &Pipe) -> bool {
    overlaps_horizontally(bird, pipe)
        && (bird.pos.y < pipe.top_height || bird.pos.y + BIRD_SIZE > pipe.bottom_y)
}
