use std::borrow::Cow;

use anyhow::{Context, Result};
use wgpu::naga::ShaderStage;

use transitions::Transition;

use crate::plane::PlaneVertex;

/// Render pipeline for one transition variant, plus the layouts the surface
/// needs to build bind groups.
pub(crate) struct PlanePipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub uniform_layout: wgpu::BindGroupLayout,
    pub texture_layout: wgpu::BindGroupLayout,
    uses_previous: bool,
}

impl PlanePipeline {
    pub(crate) fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        transition: Transition,
    ) -> Result<Self> {
        let vertex_module = compile_stage(
            device,
            &transitions::vertex_source(transition),
            ShaderStage::Vertex,
            "plane vertex",
        )
        .context("failed to compile plane vertex shader")?;
        let fragment_module = compile_stage(
            device,
            &transitions::fragment_source(transition),
            ShaderStage::Fragment,
            "plane fragment",
        )
        .with_context(|| format!("failed to compile '{transition}' fragment shader"))?;

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("plane uniform layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let uses_previous = transition.uses_previous_texture();
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("plane texture layout"),
            entries: &texture_layout_entries(uses_previous),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("plane pipeline layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("plane pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &vertex_module,
                entry_point: Some("main"),
                buffers: &[PlaneVertex::desc()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &fragment_module,
                entry_point: Some("main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    // The plane composites over the cleared background, so
                    // standard alpha blending instead of additive.
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview: None,
            cache: None,
        });

        Ok(Self {
            pipeline,
            uniform_layout,
            texture_layout,
            uses_previous,
        })
    }

    pub(crate) fn uses_previous(&self) -> bool {
        self.uses_previous
    }
}

fn compile_stage(
    device: &wgpu::Device,
    source: &str,
    stage: ShaderStage,
    label: &str,
) -> Result<wgpu::ShaderModule> {
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Glsl {
            shader: Cow::Owned(source.to_string()),
            stage,
            defines: &[],
        },
    }))
}

/// Paired texture/sampler entries: slot 0 is the current texture, slot 1 the
/// previous one for variants that blend against it.
fn texture_layout_entries(uses_previous: bool) -> Vec<wgpu::BindGroupLayoutEntry> {
    let slots = if uses_previous { 2 } else { 1 };
    let mut entries = Vec::with_capacity(slots * 2);
    for slot in 0..slots as u32 {
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: slot * 2,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        });
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: slot * 2 + 1,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        });
    }
    entries
}
