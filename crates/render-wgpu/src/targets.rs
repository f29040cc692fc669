use crate::cubemap::sampler_descriptor;
use fountain_common::DepthAttachment;
use fountain_render::{TargetAllocator, TargetDescriptor, TargetStatus};

/// Texture format backing a depth attachment kind.
pub fn depth_format(depth: DepthAttachment) -> wgpu::TextureFormat {
    match depth {
        DepthAttachment::Depth => wgpu::TextureFormat::Depth32Float,
        DepthAttachment::DepthStencil => wgpu::TextureFormat::Depth24PlusStencil8,
    }
}

/// An offscreen color texture with its own depth attachment.
pub struct GpuTarget {
    pub color: wgpu::Texture,
    pub color_view: wgpu::TextureView,
    pub depth_view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

/// Creates offscreen targets on a device. Validation errors raised while
/// creating a target are reported as [`TargetStatus::Incomplete`].
pub struct WgpuTargetAllocator<'a> {
    pub device: &'a wgpu::Device,
    pub color_format: wgpu::TextureFormat,
}

impl TargetAllocator for WgpuTargetAllocator<'_> {
    type Target = GpuTarget;

    fn allocate(&mut self, desc: &TargetDescriptor) -> (GpuTarget, TargetStatus) {
        let device = self.device;
        let size = wgpu::Extent3d {
            width: desc.width,
            height: desc.height,
            depth_or_array_layers: 1,
        };

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let color = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(desc.label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: self.color_format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let depth = create_depth_texture(device, desc.label, desc.width, desc.height, desc.depth);
        let color_view = color.create_view(&Default::default());
        let sampler = device.create_sampler(&sampler_descriptor(Some(desc.label), &desc.sampler));
        let status = match pollster::block_on(device.pop_error_scope()) {
            Some(e) => TargetStatus::Incomplete(e.to_string()),
            None => TargetStatus::Complete,
        };

        let target = GpuTarget {
            color,
            color_view,
            depth_view: depth.create_view(&Default::default()),
            sampler,
        };
        (target, status)
    }
}

pub(crate) fn create_depth_texture(
    device: &wgpu::Device,
    label: &str,
    width: u32,
    height: u32,
    depth: DepthAttachment,
) -> wgpu::Texture {
    device.create_texture(&wgpu::TextureDescriptor {
        label: Some(label),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: depth_format(depth),
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_formats() {
        assert_eq!(
            depth_format(DepthAttachment::Depth),
            wgpu::TextureFormat::Depth32Float
        );
        let ds = depth_format(DepthAttachment::DepthStencil);
        assert!(ds.has_depth_aspect());
        assert!(ds.has_stencil_aspect());
    }
}
