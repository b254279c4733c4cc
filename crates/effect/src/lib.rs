//! The hover effect state machine and its render-plane plumbing.
//!
//! [`HoverEffect`] owns everything a single gallery needs: the plane's
//! transform, the uniform set the shaders read, and the tween bookkeeping
//! that sequences opacity, position and mix animations. The [`gpu`] module
//! uploads that state to `wgpu` each frame; nothing in the state machine
//! itself touches the GPU, so the whole lifecycle is testable with plain
//! `Instant` arithmetic.

pub mod gpu;
pub mod plane;
pub mod pointer;
mod state;

pub use plane::{PlaneMesh, PlaneState, PlaneVertex};
pub use pointer::Viewport;
pub use state::{HoverEffect, UniformSet, FOLLOW_STRENGTH};
