use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};

use crate::HoverEffect;

/// CPU mirror of the `PlaneParams` std140 uniform block declared by the
/// transition shaders. Field order and padding must track that declaration.
#[repr(C)]
#[derive(Clone, Copy, Pod, Zeroable)]
pub(crate) struct PlaneParams {
    projection: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    offset: [f32; 2],
    uv_offset: [f32; 2],
    time: f32,
    mix_value: f32,
    alpha: f32,
    _padding: f32,
}

impl PlaneParams {
    pub(crate) fn new() -> Self {
        let mut params = Self::zeroed();
        params.projection = Mat4::IDENTITY.to_cols_array_2d();
        params.model = Mat4::IDENTITY.to_cols_array_2d();
        params
    }

    /// Refreshes the block from the effect's state. `plane_height` is the
    /// displayed plane height in logical pixels; the state machine's scale
    /// stays `(ratio, 1, 1)` and the pixel factor lives only here.
    pub(crate) fn update(&mut self, effect: &HoverEffect, plane_height: f32) {
        let viewport = effect.viewport();
        let half_w = (viewport.width / 2.0).max(1.0);
        let half_h = (viewport.height / 2.0).max(1.0);
        self.projection =
            Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, -1.0, 1.0).to_cols_array_2d();

        let plane = effect.plane();
        let display = Vec3::new(
            plane.scale.x * plane_height,
            plane.scale.y * plane_height,
            1.0,
        );
        self.model = (Mat4::from_translation(plane.position) * Mat4::from_scale(display))
            .to_cols_array_2d();

        let uniforms = effect.uniforms();
        self.offset = uniforms.offset.to_array();
        // The UV stretch wants the lag in texture space, so normalise the
        // world-pixel offset by the plane's displayed extents.
        self.uv_offset = [
            uniforms.offset.x / display.x.max(1.0),
            uniforms.offset.y / display.y.max(1.0),
        ];
        self.time = uniforms.time;
        self.mix_value = uniforms.mix_value;
        self.alpha = uniforms.alpha;
    }
}
