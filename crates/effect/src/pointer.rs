use glam::Vec3;

/// Logical viewport extents used to map normalized pointer coordinates into
/// world space. World units are logical pixels with the origin at the centre
/// of the window, y up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A viewport with no area cannot host the plane; initialization treats
    /// it the same as a missing container.
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Maps normalized coordinates in [-1, 1] to the world point the plane
    /// should move toward. Normalized (1, 1) lands on the top-right corner.
    pub fn world_target(&self, nx: f32, ny: f32) -> Vec3 {
        Vec3::new(nx * self.width / 2.0, ny * self.height / 2.0, 0.0)
    }
}
