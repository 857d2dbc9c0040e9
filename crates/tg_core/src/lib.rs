//! Engine-agnostic building blocks shared by the tile game: frame-timed
//! animation playback, action-bound input state, and the frame clock.

pub mod animation;
pub mod input;
pub mod time;
