use anyhow::Result;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use wgpu::util::DeviceExt;

use transitions::Transition;

use crate::plane::PlaneMesh;
use crate::HoverEffect;

use super::context::GpuContext;
use super::params::PlaneParams;
use super::pipeline::PlanePipeline;
use super::textures::{texture_key, TexturePool};

/// Owns every GPU resource behind the hover plane and draws it once per
/// frame from a [`HoverEffect`] snapshot.
pub struct PlaneSurface {
    context: GpuContext,
    pipeline: PlanePipeline,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    params: PlaneParams,
    textures: TexturePool,
    texture_bind_group: Option<(BindKey, wgpu::BindGroup)>,
    plane_height: f32,
}

type BindKey = (Option<usize>, Option<usize>);

impl PlaneSurface {
    /// Brings up the device, compiles the variant's shaders and uploads the
    /// subdivided plane mesh.
    pub fn new<T>(
        target: &T,
        width: u32,
        height: u32,
        transition: Transition,
        plane_height: f32,
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, width, height)?;
        let pipeline = PlanePipeline::new(&context.device, context.surface_format, transition)?;

        let mesh = PlaneMesh::new(transition.mesh_density());
        let vertex_buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("plane vertices"),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("plane indices"),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        let params = PlaneParams::new();
        let uniform_buffer = context
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("plane uniforms"),
                contents: bytemuck::bytes_of(&params),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let uniform_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("plane uniform bind group"),
                layout: &pipeline.uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

        let textures = TexturePool::new(&context.device, &context.queue);

        Ok(Self {
            context,
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            uniform_buffer,
            uniform_bind_group,
            params,
            textures,
            texture_bind_group: None,
            plane_height,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
    }

    /// Writes the uniform block, picks the current/previous texture bind
    /// group and draws the plane over a cleared background.
    pub fn render(&mut self, effect: &HoverEffect) -> Result<(), wgpu::SurfaceError> {
        self.params.update(effect, self.plane_height);
        self.context.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&self.params),
        );
        self.refresh_texture_bind_group(effect);

        let frame = self.context.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("plane encoder"),
                });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("plane pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.pipeline.pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            let (_, texture_bind_group) = self
                .texture_bind_group
                .as_ref()
                .expect("refreshed before draw");
            render_pass.set_bind_group(1, texture_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            render_pass.draw_indexed(0..self.index_count, 0, 0..1);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    /// Rebuilds the texture bind group only when the bound textures changed;
    /// empty slots fall back to the shared 1x1 placeholder.
    fn refresh_texture_bind_group(&mut self, effect: &HoverEffect) {
        let uniforms = effect.uniforms();
        let key: BindKey = (
            uniforms.current_texture.as_ref().map(texture_key),
            uniforms.previous_texture.as_ref().map(texture_key),
        );
        if matches!(&self.texture_bind_group, Some((cached, _)) if *cached == key) {
            return;
        }

        let device = &self.context.device;
        let queue = &self.context.queue;
        if let Some(texture) = uniforms.current_texture.as_ref() {
            self.textures.ensure(device, queue, texture);
        }
        if let Some(texture) = uniforms.previous_texture.as_ref() {
            self.textures.ensure(device, queue, texture);
        }

        let current = match uniforms.current_texture.as_ref() {
            Some(texture) => self.textures.get(texture),
            None => self.textures.placeholder(),
        };
        let mut entries = vec![
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&current.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&current.sampler),
            },
        ];
        let previous = if self.pipeline.uses_previous() {
            Some(match uniforms.previous_texture.as_ref() {
                Some(texture) => self.textures.get(texture),
                None => self.textures.placeholder(),
            })
        } else {
            None
        };
        if let Some(previous) = previous {
            entries.push(wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::TextureView(&previous.view),
            });
            entries.push(wgpu::BindGroupEntry {
                binding: 3,
                resource: wgpu::BindingResource::Sampler(&previous.sampler),
            });
        }

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("plane texture bind group"),
            layout: &self.pipeline.texture_layout,
            entries: &entries,
        });
        self.texture_bind_group = Some((key, bind_group));
    }
}
