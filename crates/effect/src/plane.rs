//! The subdivided unit quad the hover effect textures and deforms.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

/// Transform state of the render plane. `scale` carries the image aspect
/// ratio as `(ratio, 1, 1)`; `target` is the world point the position tween
/// is currently heading for.
#[derive(Clone, Copy, Debug)]
pub struct PlaneState {
    pub position: Vec3,
    pub scale: Vec3,
    pub target: Vec3,
}

impl Default for PlaneState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            scale: Vec3::ONE,
            target: Vec3::ZERO,
        }
    }
}

/// One plane vertex as uploaded to the GPU.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct PlaneVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

impl PlaneVertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<PlaneVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// A unit quad centred on the origin, subdivided `density` times per axis.
/// More segments bend more smoothly under the pointer-lag deformation.
pub struct PlaneMesh {
    pub vertices: Vec<PlaneVertex>,
    pub indices: Vec<u16>,
}

impl PlaneMesh {
    pub fn new(density: u32) -> Self {
        let density = density.max(1);
        let side = density + 1;
        let mut vertices = Vec::with_capacity((side * side) as usize);
        for row in 0..side {
            for col in 0..side {
                let u = col as f32 / density as f32;
                let v = row as f32 / density as f32;
                vertices.push(PlaneVertex {
                    position: [u - 0.5, v - 0.5, 0.0],
                    uv: [u, v],
                });
            }
        }

        let mut indices = Vec::with_capacity((density * density * 6) as usize);
        for row in 0..density {
            for col in 0..density {
                let bottom_left = (row * side + col) as u16;
                let bottom_right = bottom_left + 1;
                let top_left = bottom_left + side as u16;
                let top_right = top_left + 1;
                indices.extend_from_slice(&[
                    bottom_left,
                    bottom_right,
                    top_left,
                    top_left,
                    bottom_right,
                    top_right,
                ]);
            }
        }

        Self { vertices, indices }
    }
}

/// CPU mirror of the vertex-stage deformation curve: the pointer-lag offset
/// bends the plane into an S along each axis, scaled by a half-sine over the
/// opposite UV axis.
pub fn deform(position: Vec3, uv: Vec2, offset: Vec2) -> Vec3 {
    Vec3::new(
        position.x + (uv.y * std::f32::consts::PI).sin() * offset.x,
        position.y + (uv.x * std::f32::consts::PI).sin() * offset.y,
        position.z,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subdivision_produces_the_expected_counts() {
        for density in [1, 4, 8] {
            let mesh = PlaneMesh::new(density);
            let side = density + 1;
            assert_eq!(mesh.vertices.len(), (side * side) as usize);
            assert_eq!(mesh.indices.len(), (density * density * 6) as usize);
        }
    }

    #[test]
    fn corner_vertices_carry_corner_uvs() {
        let mesh = PlaneMesh::new(8);
        let first = mesh.vertices.first().expect("mesh has vertices");
        let last = mesh.vertices.last().expect("mesh has vertices");
        assert_eq!(first.uv, [0.0, 0.0]);
        assert_eq!(first.position, [-0.5, -0.5, 0.0]);
        assert_eq!(last.uv, [1.0, 1.0]);
        assert_eq!(last.position, [0.5, 0.5, 0.0]);
    }

    #[test]
    fn indices_stay_in_range() {
        let mesh = PlaneMesh::new(8);
        let count = mesh.vertices.len() as u16;
        assert!(mesh.indices.iter().all(|index| *index < count));
    }

    #[test]
    fn deformation_peaks_at_the_quad_midline() {
        let offset = Vec2::new(0.4, -0.2);
        let midline = deform(Vec3::ZERO, Vec2::new(0.5, 0.5), offset);
        assert!((midline.x - 0.4).abs() < 1e-6);
        assert!((midline.y + 0.2).abs() < 1e-6);

        // sin(0) and sin(pi) pin the edges in place.
        let edge = deform(Vec3::new(0.5, 0.5, 0.0), Vec2::new(0.0, 1.0), offset);
        assert!((edge.x - 0.5).abs() < 1e-5);
        assert!((edge.y - 0.5).abs() < 1e-5);
    }
}
