use crate::cubemap::{CubemapTexture, upload_cubemap};
use crate::geometry::{SKYBOX_VERTICES, ScreenVertex, WATER_TILE, debug_quad};
use crate::shaders;
use crate::targets::{GpuTarget, WgpuTargetAllocator, create_depth_texture, depth_format};
use bytemuck::{Pod, Zeroable};
use fountain_assets::{CubemapImage, MeshData};
use fountain_common::{DepthAttachment, Viewport};
use fountain_render::{
    DrawCall, OffscreenTargets, PassKind, PassPlan, RenderBackend, RenderTarget, TargetDiagnostic,
    setup_offscreen_targets,
};
use fountain_scene::SceneConfig;
use glam::Mat4;
use wgpu::util::DeviceExt;

/// Capacity of the water tile instance buffer.
pub const MAX_WATER_TILES: usize = 128;

/// Stride between per-pass uniform slots. Matches the default
/// `min_uniform_buffer_offset_alignment`.
const UNIFORM_SLOT_SIZE: u64 = 256;

#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("surface was lost or outdated and has been reconfigured")]
    SurfaceReconfigured,
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct PassUniforms {
    view_proj: [[f32; 4]; 4],
    sky_view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    clip_plane: [f32; 4],
}

impl PassUniforms {
    fn from_pass(pass: &PassPlan) -> Self {
        let mut model = Mat4::IDENTITY;
        let mut sky_view_proj = Mat4::IDENTITY;
        for call in &pass.draws {
            match call {
                DrawCall::Pool { model: m } => model = *m,
                DrawCall::Skybox { view_rotation } => {
                    sky_view_proj = pass.projection * *view_rotation;
                }
                DrawCall::Water { .. } | DrawCall::DebugQuad { .. } => {}
            }
        }
        Self {
            view_proj: pass.view_projection().to_cols_array_2d(),
            sky_view_proj: sky_view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            clip_plane: pass.clip_plane.to_array(),
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct PoolVertex {
    position: [f32; 3],
    normal: [f32; 3],
    color: [f32; 3],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct TileInstance {
    model: [[f32; 4]; 4],
}

const POOL_ATTRIBUTES: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x3];
const POSITION_ATTRIBUTES: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const TILE_ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    1 => Float32x4,
    2 => Float32x4,
    3 => Float32x4,
    4 => Float32x4,
];
const SCREEN_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];

fn slot_offset(kind: PassKind) -> u64 {
    kind.slot() as u64 * UNIFORM_SLOT_SIZE
}

struct PoolMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

struct Skybox {
    bind_group: wgpu::BindGroup,
    _cubemap: CubemapTexture,
}

/// Resources alive between `begin_frame` and `present`.
struct FrameState {
    output: wgpu::SurfaceTexture,
    view: wgpu::TextureView,
    encoder: wgpu::CommandEncoder,
    pass: Option<wgpu::RenderPass<'static>>,
}

struct PipelineSpec<'a> {
    label: &'a str,
    layout: &'a wgpu::PipelineLayout,
    source: &'a str,
    vs_entry: &'a str,
    fs_entry: &'a str,
    buffers: &'a [wgpu::VertexBufferLayout<'a>],
    depth_compare: wgpu::CompareFunction,
}

fn create_pipeline(
    device: &wgpu::Device,
    spec: &PipelineSpec<'_>,
    color_format: wgpu::TextureFormat,
    depth_format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(spec.label),
        source: wgpu::ShaderSource::Wgsl(spec.source.into()),
    });
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(spec.label),
        layout: Some(spec.layout),
        vertex: wgpu::VertexState {
            module: &module,
            entry_point: Some(spec.vs_entry),
            compilation_options: Default::default(),
            buffers: spec.buffers,
        },
        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: Some(spec.fs_entry),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: depth_format,
            depth_write_enabled: true,
            depth_compare: spec.depth_compare,
            stencil: Default::default(),
            bias: Default::default(),
        }),
        multisample: Default::default(),
        multiview: None,
        cache: None,
    })
}

fn texture_entry(binding: u32, dimension: wgpu::TextureViewDimension) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Texture {
            sample_type: wgpu::TextureSampleType::Float { filterable: true },
            view_dimension: dimension,
            multisampled: false,
        },
        count: None,
    }
}

fn sampler_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
        count: None,
    }
}

fn preview_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    target: &GpuTarget,
    label: &str,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&target.color_view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&target.sampler),
            },
        ],
    })
}

/// wgpu renderer for the water scene. Owns the surface, device and every
/// GPU object it creates; implements [`RenderBackend`] so the frame plan
/// can drive it.
pub struct WgpuRenderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_attachment: DepthAttachment,
    main_depth: wgpu::TextureView,
    pool_pipeline: wgpu::RenderPipeline,
    water_pipeline: wgpu::RenderPipeline,
    skybox_pipeline: wgpu::RenderPipeline,
    screen_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    water_bind_group: wgpu::BindGroup,
    reflection_preview: wgpu::BindGroup,
    refraction_preview: wgpu::BindGroup,
    tile_vertex_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    sky_vertex_buffer: wgpu::Buffer,
    quad_vertex_buffer: wgpu::Buffer,
    pool: Option<PoolMesh>,
    skybox: Option<Skybox>,
    targets: OffscreenTargets<GpuTarget>,
    frame: Option<FrameState>,
}

impl WgpuRenderer {
    /// Build pipelines, offscreen targets and static buffers, and upload
    /// whichever assets loaded. A missing pool mesh or cubemap only skips
    /// that draw.
    pub fn new(
        surface: wgpu::Surface<'static>,
        device: wgpu::Device,
        queue: wgpu::Queue,
        config: wgpu::SurfaceConfiguration,
        scene: &SceneConfig,
        pool_mesh: Option<&MeshData>,
        cubemap: Option<&CubemapImage>,
    ) -> Self {
        surface.configure(&device, &config);
        let color_format = config.format;
        let depth_attachment = scene.depth_attachment;
        let depth = depth_format(depth_attachment);

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("pass_uniforms"),
            size: UNIFORM_SLOT_SIZE * PassKind::ORDER.len() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_size = wgpu::BufferSize::new(std::mem::size_of::<PassUniforms>() as u64);

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("pass_uniform_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: uniform_size,
                },
                count: None,
            }],
        });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("pass_uniform_bind_group"),
            layout: &uniform_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &uniform_buffer,
                    offset: 0,
                    size: uniform_size,
                }),
            }],
        });

        let water_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("water_texture_layout"),
            entries: &[
                texture_entry(0, wgpu::TextureViewDimension::D2),
                texture_entry(1, wgpu::TextureViewDimension::D2),
                sampler_entry(2),
            ],
        });
        let sky_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("skybox_texture_layout"),
            entries: &[
                texture_entry(0, wgpu::TextureViewDimension::Cube),
                sampler_entry(1),
            ],
        });
        let preview_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("preview_texture_layout"),
            entries: &[texture_entry(0, wgpu::TextureViewDimension::D2), sampler_entry(1)],
        });

        let layout = |label: &str, groups: &[&wgpu::BindGroupLayout]| {
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(label),
                bind_group_layouts: groups,
                push_constant_ranges: &[],
            })
        };
        let pool_layout = layout("pool_pipeline_layout", &[&uniform_layout]);
        let water_pipeline_layout = layout("water_pipeline_layout", &[&uniform_layout, &water_layout]);
        let sky_pipeline_layout = layout("skybox_pipeline_layout", &[&uniform_layout, &sky_layout]);
        let screen_layout = layout("screen_pipeline_layout", &[&preview_layout]);

        let pool_pipeline = create_pipeline(
            &device,
            &PipelineSpec {
                label: "pool_pipeline",
                layout: &pool_layout,
                source: shaders::POOL_SHADER,
                vs_entry: "vs_pool",
                fs_entry: "fs_pool",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<PoolVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &POOL_ATTRIBUTES,
                }],
                depth_compare: wgpu::CompareFunction::Less,
            },
            color_format,
            depth,
        );
        let water_pipeline = create_pipeline(
            &device,
            &PipelineSpec {
                label: "water_pipeline",
                layout: &water_pipeline_layout,
                source: shaders::WATER_SHADER,
                vs_entry: "vs_water",
                fs_entry: "fs_water",
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &POSITION_ATTRIBUTES,
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<TileInstance>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &TILE_ATTRIBUTES,
                    },
                ],
                depth_compare: wgpu::CompareFunction::Less,
            },
            color_format,
            depth,
        );
        // Skybox depth is pinned to 1.0, so it must pass `<=` against the clear value.
        let skybox_pipeline = create_pipeline(
            &device,
            &PipelineSpec {
                label: "skybox_pipeline",
                layout: &sky_pipeline_layout,
                source: shaders::SKYBOX_SHADER,
                vs_entry: "vs_sky",
                fs_entry: "fs_sky",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<[f32; 3]>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &POSITION_ATTRIBUTES,
                }],
                depth_compare: wgpu::CompareFunction::LessEqual,
            },
            color_format,
            depth,
        );
        let screen_pipeline = create_pipeline(
            &device,
            &PipelineSpec {
                label: "screen_pipeline",
                layout: &screen_layout,
                source: shaders::SCREEN_SHADER,
                vs_entry: "vs_screen",
                fs_entry: "fs_screen",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<ScreenVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &SCREEN_ATTRIBUTES,
                }],
                depth_compare: wgpu::CompareFunction::Less,
            },
            color_format,
            depth,
        );

        let viewport = Viewport::new(config.width, config.height);
        let targets = setup_offscreen_targets(
            &mut WgpuTargetAllocator {
                device: &device,
                color_format,
            },
            viewport,
            depth_attachment,
        );

        let water_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("water_texture_bind_group"),
            layout: &water_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&targets.reflection.color_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&targets.refraction.color_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&targets.reflection.sampler),
                },
            ],
        });
        let reflection_preview =
            preview_bind_group(&device, &preview_layout, &targets.reflection, "reflection_preview");
        let refraction_preview =
            preview_bind_group(&device, &preview_layout, &targets.refraction, "refraction_preview");

        let tile_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("water_tile_vertices"),
            contents: bytemuck::cast_slice(&WATER_TILE),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("water_tile_instances"),
            size: (MAX_WATER_TILES * std::mem::size_of::<TileInstance>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let sky_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("skybox_vertices"),
            contents: bytemuck::cast_slice(&SKYBOX_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let quad_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("preview_quad_vertices"),
            contents: bytemuck::cast_slice(&debug_quad()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let pool = pool_mesh.map(|mesh| upload_pool(&device, mesh));
        let skybox = cubemap.map(|image| {
            let cubemap = upload_cubemap(&device, &queue, image);
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("skybox_bind_group"),
                layout: &sky_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&cubemap.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&cubemap.sampler),
                    },
                ],
            });
            Skybox {
                bind_group,
                _cubemap: cubemap,
            }
        });

        let main_depth = create_depth_texture(
            &device,
            "main_depth",
            config.width,
            config.height,
            depth_attachment,
        )
        .create_view(&Default::default());

        tracing::info!(
            format = ?color_format,
            depth = ?depth,
            pool = pool.is_some(),
            skybox = skybox.is_some(),
            "renderer ready"
        );

        Self {
            surface,
            device,
            queue,
            config,
            depth_attachment,
            main_depth,
            pool_pipeline,
            water_pipeline,
            skybox_pipeline,
            screen_pipeline,
            uniform_buffer,
            uniform_bind_group,
            water_bind_group,
            reflection_preview,
            refraction_preview,
            tile_vertex_buffer,
            instance_buffer,
            sky_vertex_buffer,
            quad_vertex_buffer,
            pool,
            skybox,
            targets,
            frame: None,
        }
    }

    /// Reconfigure the surface and main depth buffer. Offscreen targets
    /// keep their startup size.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.main_depth =
            create_depth_texture(&self.device, "main_depth", width, height, self.depth_attachment)
                .create_view(&Default::default());
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.config.width, self.config.height)
    }

    /// Offscreen targets that failed their completeness check at startup.
    pub fn target_diagnostics(&self) -> &[TargetDiagnostic] {
        &self.targets.diagnostics
    }
}

fn upload_pool(device: &wgpu::Device, mesh: &MeshData) -> PoolMesh {
    let vertices: Vec<PoolVertex> = mesh
        .vertices
        .iter()
        .map(|v| PoolVertex {
            position: v.position,
            normal: v.normal,
            color: v.color,
        })
        .collect();
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("pool_vertices"),
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("pool_indices"),
        contents: bytemuck::cast_slice(&mesh.indices),
        usage: wgpu::BufferUsages::INDEX,
    });
    PoolMesh {
        vertex_buffer,
        index_buffer,
        index_count: mesh.indices.len() as u32,
    }
}

impl RenderBackend for WgpuRenderer {
    type Error = GpuError;

    fn begin_frame(&mut self) -> Result<(), GpuError> {
        let output = match self.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Err(GpuError::SurfaceReconfigured);
            }
            Err(e) => return Err(e.into()),
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame_encoder"),
            });
        self.frame = Some(FrameState {
            output,
            view,
            encoder,
            pass: None,
        });
        Ok(())
    }

    fn begin_pass(&mut self, pass: &PassPlan) {
        let Some(frame) = self.frame.as_mut() else {
            return;
        };
        self.queue.write_buffer(
            &self.uniform_buffer,
            slot_offset(pass.kind),
            bytemuck::bytes_of(&PassUniforms::from_pass(pass)),
        );

        let (color_view, depth_view) = match pass.target {
            RenderTarget::Reflection => (
                &self.targets.reflection.color_view,
                &self.targets.reflection.depth_view,
            ),
            RenderTarget::Refraction => (
                &self.targets.refraction.color_view,
                &self.targets.refraction.depth_view,
            ),
            RenderTarget::Screen => (&frame.view, &self.main_depth),
        };
        let stencil_ops = match self.depth_attachment {
            DepthAttachment::Depth => None,
            DepthAttachment::DepthStencil => Some(wgpu::Operations {
                load: wgpu::LoadOp::Clear(0),
                store: wgpu::StoreOp::Store,
            }),
        };
        let [r, g, b, a] = pass.clear_color.0.map(f64::from);

        let render_pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(pass.kind.label()),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color { r, g, b, a }),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops,
            }),
            ..Default::default()
        });
        frame.pass = Some(render_pass.forget_lifetime());
    }

    fn draw(&mut self, pass: &PassPlan, call: &DrawCall) {
        let Some(render_pass) = self.frame.as_mut().and_then(|f| f.pass.as_mut()) else {
            return;
        };
        let offsets = [slot_offset(pass.kind) as wgpu::DynamicOffset];

        match call {
            DrawCall::Pool { .. } => {
                let Some(mesh) = &self.pool else {
                    return;
                };
                render_pass.set_pipeline(&self.pool_pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &offsets);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
            DrawCall::Skybox { .. } => {
                let Some(skybox) = &self.skybox else {
                    return;
                };
                render_pass.set_pipeline(&self.skybox_pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &offsets);
                render_pass.set_bind_group(1, &skybox.bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.sky_vertex_buffer.slice(..));
                render_pass.draw(0..SKYBOX_VERTICES.len() as u32, 0..1);
            }
            DrawCall::Water { tiles } => {
                if tiles.len() > MAX_WATER_TILES {
                    tracing::warn!(
                        tiles = tiles.len(),
                        max = MAX_WATER_TILES,
                        "too many water tiles; extra tiles are not drawn"
                    );
                }
                let instances: Vec<TileInstance> = tiles
                    .iter()
                    .take(MAX_WATER_TILES)
                    .map(|m| TileInstance {
                        model: m.to_cols_array_2d(),
                    })
                    .collect();
                if instances.is_empty() {
                    return;
                }
                self.queue
                    .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));

                render_pass.set_pipeline(&self.water_pipeline);
                render_pass.set_bind_group(0, &self.uniform_bind_group, &offsets);
                render_pass.set_bind_group(1, &self.water_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.tile_vertex_buffer.slice(..));
                render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
                render_pass.draw(0..WATER_TILE.len() as u32, 0..instances.len() as u32);
            }
            DrawCall::DebugQuad { source } => {
                let bind_group = match source {
                    RenderTarget::Reflection => &self.reflection_preview,
                    RenderTarget::Refraction => &self.refraction_preview,
                    RenderTarget::Screen => return,
                };
                render_pass.set_pipeline(&self.screen_pipeline);
                render_pass.set_bind_group(0, bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.quad_vertex_buffer.slice(..));
                render_pass.draw(0..6, 0..1);
            }
        }
    }

    fn end_pass(&mut self, _pass: &PassPlan) {
        if let Some(frame) = self.frame.as_mut() {
            frame.pass = None;
        }
    }

    fn present(&mut self) {
        let Some(mut frame) = self.frame.take() else {
            return;
        };
        frame.pass = None;
        self.queue.submit(std::iter::once(frame.encoder.finish()));
        frame.output.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fountain_render::plan_frame;
    use fountain_scene::{Camera, FrameContext};
    use glam::Vec3;

    #[test]
    fn uniform_block_fits_a_slot() {
        assert_eq!(std::mem::size_of::<PassUniforms>(), 208);
        assert!(std::mem::size_of::<PassUniforms>() as u64 <= UNIFORM_SLOT_SIZE);
        assert_eq!(slot_offset(PassKind::Main), 512);
    }

    #[test]
    fn uniforms_carry_pass_state() {
        let ctx = FrameContext::new(Camera::new(Vec3::new(0.0, 3.0, 5.0)), Viewport::DEFAULT);
        let scene = SceneConfig::fountain();
        let plan = plan_frame(&ctx, &scene, None);

        let reflection = PassUniforms::from_pass(&plan.passes[0]);
        assert_eq!(reflection.clip_plane, [0.0, 1.0, 0.0, 0.0]);
        assert_eq!(reflection.model, scene.pool_placement.matrix().to_cols_array_2d());
        assert_ne!(reflection.sky_view_proj, Mat4::IDENTITY.to_cols_array_2d());

        let refraction = PassUniforms::from_pass(&plan.passes[1]);
        assert_eq!(refraction.clip_plane, [0.0, -1.0, 0.0, 0.0]);
        assert_eq!(refraction.sky_view_proj, Mat4::IDENTITY.to_cols_array_2d());

        let main = PassUniforms::from_pass(&plan.passes[2]);
        assert_eq!(main.clip_plane, [0.0; 4]);
        assert_eq!(main.view_proj, plan.passes[2].view_projection().to_cols_array_2d());
    }

    #[test]
    fn tile_capacity_covers_presets() {
        assert!(SceneConfig::fountain().tiles.len() <= MAX_WATER_TILES);
        assert!(SceneConfig::pool().tiles.len() <= MAX_WATER_TILES);
    }
}
