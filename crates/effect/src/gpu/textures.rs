use std::collections::HashMap;
use std::sync::Arc;

use gallery::TextureData;
use wgpu::util::{DeviceExt, TextureDataOrder};

/// One uploaded item image: texture, default view and a clamping sampler.
pub(crate) struct PlaneTexture {
    pub _texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

/// Uploads decoded item images on first use and keeps them for the session.
/// Keys are `Arc` pointer identities, matching how the state machine tracks
/// texture identity.
pub(crate) struct TexturePool {
    uploaded: HashMap<usize, PlaneTexture>,
    placeholder: PlaneTexture,
}

impl TexturePool {
    pub(crate) fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self {
            uploaded: HashMap::new(),
            placeholder: create_placeholder(device, queue),
        }
    }

    pub(crate) fn placeholder(&self) -> &PlaneTexture {
        &self.placeholder
    }

    /// Uploads `data` on first sight; later calls are no-ops.
    pub(crate) fn ensure(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &Arc<TextureData>,
    ) {
        self.uploaded
            .entry(texture_key(data))
            .or_insert_with(|| upload_texture(device, queue, data));
    }

    /// Uploaded texture for `data`, or the placeholder if it was never
    /// ensured.
    pub(crate) fn get(&self, data: &Arc<TextureData>) -> &PlaneTexture {
        self.uploaded
            .get(&texture_key(data))
            .unwrap_or(&self.placeholder)
    }
}

pub(crate) fn texture_key(data: &Arc<TextureData>) -> usize {
    Arc::as_ptr(data) as usize
}

fn upload_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    data: &TextureData,
) -> PlaneTexture {
    let width = data.width().max(1);
    let height = data.height().max(1);

    // Decoded rows run top-down; the quad's v axis runs bottom-up, so flip
    // at upload time.
    let row_bytes = (width as usize) * 4;
    let flipped: Vec<u8> = data
        .pixels()
        .chunks(row_bytes)
        .rev()
        .flat_map(|row| row.iter().copied())
        .collect();

    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some("item texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        TextureDataOrder::LayerMajor,
        &flipped,
    );

    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = create_sampler(device);
    PlaneTexture {
        _texture: texture,
        view,
        sampler,
    }
}

/// 1x1 transparent pixel bound while a slot has no resolved texture; the
/// plane is invisible at alpha 0 anyway, this only keeps the bind group
/// complete.
fn create_placeholder(device: &wgpu::Device, queue: &wgpu::Queue) -> PlaneTexture {
    let data = [0u8, 0, 0, 0];
    let texture = device.create_texture_with_data(
        queue,
        &wgpu::TextureDescriptor {
            label: Some("placeholder item texture"),
            size: wgpu::Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        TextureDataOrder::LayerMajor,
        &data,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let sampler = create_sampler(device);
    PlaneTexture {
        _texture: texture,
        view,
        sampler,
    }
}

fn create_sampler(device: &wgpu::Device) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        address_mode_u: wgpu::AddressMode::ClampToEdge,
        address_mode_v: wgpu::AddressMode::ClampToEdge,
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}
