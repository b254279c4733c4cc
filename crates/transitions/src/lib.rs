//! The five interchangeable hover transitions and their shader stages.
//!
//! A [`Transition`] value is the whole variant contract: the constants the
//! state machine needs (mesh density, whether a previous texture is kept, the
//! mix animation profile) and the GLSL stages the render layer compiles. The
//! effect crate stays variant-agnostic; picking a different look means
//! constructing it with a different `Transition`.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use motion::Ease;
use serde::{Deserialize, Serialize};

mod shaders;

pub use shaders::{fragment_source, vertex_source};

#[derive(Debug, thiserror::Error)]
#[error("unknown transition '{0}' (expected perlin, fly-eye, glitch-displace, smooth-fade, or rgb-shift)")]
pub struct UnknownTransition(String);

/// Duration and curve of the current→previous cross-mix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MixProfile {
    pub duration: Duration,
    pub ease: Ease,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Transition {
    Perlin,
    FlyEye,
    GlitchDisplace,
    SmoothFade,
    RgbShift,
}

impl Transition {
    pub const ALL: [Transition; 5] = [
        Transition::Perlin,
        Transition::FlyEye,
        Transition::GlitchDisplace,
        Transition::SmoothFade,
        Transition::RgbShift,
    ];

    /// Quad subdivisions per axis. More segments bend more smoothly under
    /// the pointer-lag deformation.
    pub fn mesh_density(self) -> u32 {
        match self {
            Transition::RgbShift => 4,
            _ => 8,
        }
    }

    /// Whether the fragment stage blends against the previously hovered
    /// texture. RGB-shift swaps instantly and never keeps one.
    pub fn uses_previous_texture(self) -> bool {
        !matches!(self, Transition::RgbShift)
    }

    /// Mix animation profile, or `None` for variants that swap without a
    /// transition.
    pub fn mix(self) -> Option<MixProfile> {
        let duration = match self {
            Transition::Perlin => Duration::from_millis(800),
            Transition::FlyEye => Duration::from_millis(350),
            Transition::GlitchDisplace => Duration::from_millis(500),
            Transition::SmoothFade => Duration::from_millis(400),
            Transition::RgbShift => return None,
        };
        Some(MixProfile {
            duration,
            ease: Ease::QuadOut,
        })
    }

    /// Factor applied to the pointer-lag offset before it shifts the
    /// fragment UVs. Only smooth-fade stretches its texture this way.
    pub fn uv_stretch(self) -> f32 {
        match self {
            Transition::SmoothFade => 2.0,
            _ => 0.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Transition::Perlin => "perlin",
            Transition::FlyEye => "fly-eye",
            Transition::GlitchDisplace => "glitch-displace",
            Transition::SmoothFade => "smooth-fade",
            Transition::RgbShift => "rgb-shift",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Transition {
    type Err = UnknownTransition;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Transition::ALL
            .into_iter()
            .find(|transition| transition.label() == value)
            .ok_or_else(|| UnknownTransition(value.to_string()))
    }
}
