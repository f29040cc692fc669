use fountain_assets::{CubeFace, CubemapImage};
use fountain_common::{Filter, SamplerSpec, Wrap};

fn address_mode(wrap: Wrap) -> wgpu::AddressMode {
    match wrap {
        Wrap::Repeat => wgpu::AddressMode::Repeat,
        Wrap::ClampToEdge => wgpu::AddressMode::ClampToEdge,
    }
}

fn filter_mode(filter: Filter) -> wgpu::FilterMode {
    match filter {
        Filter::Nearest => wgpu::FilterMode::Nearest,
        Filter::Linear => wgpu::FilterMode::Linear,
    }
}

/// Translate a backend-neutral sampler into a wgpu descriptor.
pub fn sampler_descriptor<'a>(
    label: Option<&'a str>,
    spec: &SamplerSpec,
) -> wgpu::SamplerDescriptor<'a> {
    wgpu::SamplerDescriptor {
        label,
        address_mode_u: address_mode(spec.wrap[0]),
        address_mode_v: address_mode(spec.wrap[1]),
        address_mode_w: address_mode(spec.wrap[2]),
        mag_filter: filter_mode(spec.mag_filter),
        min_filter: filter_mode(spec.min_filter),
        mipmap_filter: wgpu::FilterMode::Nearest,
        ..Default::default()
    }
}

pub struct CubemapTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

/// Upload a decoded cubemap. Faces that failed to load stay zero-filled.
pub fn upload_cubemap(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    image: &CubemapImage,
) -> CubemapTexture {
    let size = image.extent();
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("skybox_cubemap"),
        size: wgpu::Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 6,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8UnormSrgb,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });

    for face in CubeFace::ALL {
        let Some(pixels) = image.face(face) else {
            continue;
        };
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d {
                    x: 0,
                    y: 0,
                    z: face.layer(),
                },
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * size),
                rows_per_image: Some(size),
            },
            wgpu::Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 1,
            },
        );
    }

    let view = texture.create_view(&wgpu::TextureViewDescriptor {
        label: Some("skybox_cubemap_view"),
        dimension: Some(wgpu::TextureViewDimension::Cube),
        ..Default::default()
    });
    let sampler = device.create_sampler(&sampler_descriptor(Some("skybox_sampler"), &image.sampler));
    tracing::debug!(size, faces = image.populated_count(), "cubemap uploaded");

    CubemapTexture {
        texture,
        view,
        sampler,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_clamp_maps_to_wgpu() {
        let desc = sampler_descriptor(None, &SamplerSpec::LINEAR_CLAMP);
        assert_eq!(desc.mag_filter, wgpu::FilterMode::Linear);
        assert_eq!(desc.min_filter, wgpu::FilterMode::Linear);
        assert_eq!(desc.address_mode_u, wgpu::AddressMode::ClampToEdge);
        assert_eq!(desc.address_mode_v, wgpu::AddressMode::ClampToEdge);
        assert_eq!(desc.address_mode_w, wgpu::AddressMode::ClampToEdge);
    }

    #[test]
    fn wrap_axes_are_independent() {
        let spec = SamplerSpec {
            min_filter: Filter::Nearest,
            mag_filter: Filter::Linear,
            wrap: [Wrap::Repeat, Wrap::ClampToEdge, Wrap::Repeat],
        };
        let desc = sampler_descriptor(Some("mixed"), &spec);
        assert_eq!(desc.label, Some("mixed"));
        assert_eq!(desc.min_filter, wgpu::FilterMode::Nearest);
        assert_eq!(desc.address_mode_u, wgpu::AddressMode::Repeat);
        assert_eq!(desc.address_mode_v, wgpu::AddressMode::ClampToEdge);
        assert_eq!(desc.address_mode_w, wgpu::AddressMode::Repeat);
    }
}
