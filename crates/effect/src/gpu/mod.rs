//! wgpu plumbing for the hover plane.
//!
//! The state machine stays GPU-free; this module reads a [`HoverEffect`]
//! once per frame and turns it into a uniform upload, a texture bind group
//! and one indexed draw of the subdivided quad.
//!
//! [`HoverEffect`]: crate::HoverEffect

mod context;
mod params;
mod pipeline;
mod surface;
mod textures;

pub use surface::PlaneSurface;
