//! WGSL sources. Every shader shares the per-pass uniform block at
//! group 0, bound with a dynamic offset.

/// Pool / fountain model: Lambert-lit vertex colors with the pass clip plane.
pub const POOL_SHADER: &str = r#"
struct PassUniforms {
    view_proj: mat4x4<f32>,
    sky_view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
    clip_plane: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> pass_uniforms: PassUniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) color: vec3<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) color: vec3<f32>,
};

@vertex
fn vs_pool(vertex: VertexInput) -> VertexOutput {
    let world_pos = pass_uniforms.model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (pass_uniforms.model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = pass_uniforms.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = normalize(world_normal);
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_pool(in: VertexOutput) -> @location(0) vec4<f32> {
    if dot(vec4<f32>(in.world_pos, 1.0), pass_uniforms.clip_plane) < 0.0 {
        discard;
    }
    let light_dir = normalize(vec3<f32>(0.3, 1.0, 0.5));
    let ambient = 0.3;
    let diffuse = max(dot(normalize(in.world_normal), light_dir), 0.0);
    let lighting = ambient + diffuse * 0.7;
    return vec4<f32>(in.color * lighting, 1.0);
}
"#;

/// Water tiles: projective lookup into the reflection and refraction targets.
pub const WATER_SHADER: &str = r#"
struct PassUniforms {
    view_proj: mat4x4<f32>,
    sky_view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
    clip_plane: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> pass_uniforms: PassUniforms;

@group(1) @binding(0)
var reflection_texture: texture_2d<f32>;
@group(1) @binding(1)
var refraction_texture: texture_2d<f32>;
@group(1) @binding(2)
var target_sampler: sampler;

struct TileInstance {
    @location(1) model_0: vec4<f32>,
    @location(2) model_1: vec4<f32>,
    @location(3) model_2: vec4<f32>,
    @location(4) model_3: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) clip_space: vec4<f32>,
};

@vertex
fn vs_water(@location(0) position: vec3<f32>, tile: TileInstance) -> VertexOutput {
    let model = mat4x4<f32>(tile.model_0, tile.model_1, tile.model_2, tile.model_3);
    let clip = pass_uniforms.view_proj * model * vec4<f32>(position, 1.0);

    var out: VertexOutput;
    out.clip_position = clip;
    out.clip_space = clip;
    return out;
}

@fragment
fn fs_water(in: VertexOutput) -> @location(0) vec4<f32> {
    let ndc = in.clip_space.xy / in.clip_space.w;
    // Texture rows run top to bottom; the reflection image is upside down.
    let reflect_uv = vec2<f32>(0.5 + 0.5 * ndc.x, 0.5 + 0.5 * ndc.y);
    let refract_uv = vec2<f32>(0.5 + 0.5 * ndc.x, 0.5 - 0.5 * ndc.y);

    let reflection = textureSample(reflection_texture, target_sampler, reflect_uv);
    let refraction = textureSample(refraction_texture, target_sampler, refract_uv);
    return mix(reflection, refraction, 0.5);
}
"#;

/// Skybox cube, pinned to the far plane.
pub const SKYBOX_SHADER: &str = r#"
struct PassUniforms {
    view_proj: mat4x4<f32>,
    sky_view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
    clip_plane: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> pass_uniforms: PassUniforms;

@group(1) @binding(0)
var sky_texture: texture_cube<f32>;
@group(1) @binding(1)
var sky_sampler: sampler;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) direction: vec3<f32>,
};

@vertex
fn vs_sky(@location(0) position: vec3<f32>) -> VertexOutput {
    let clip = pass_uniforms.sky_view_proj * vec4<f32>(position, 1.0);

    var out: VertexOutput;
    out.clip_position = clip.xyww;
    out.direction = position;
    return out;
}

@fragment
fn fs_sky(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(sky_texture, sky_sampler, in.direction);
}
"#;

/// Screen-space preview of an offscreen target.
pub const SCREEN_SHADER: &str = r#"
@group(0) @binding(0)
var preview_texture: texture_2d<f32>;
@group(0) @binding(1)
var preview_sampler: sampler;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_screen(@location(0) position: vec2<f32>, @location(1) uv: vec2<f32>) -> VertexOutput {
    var out: VertexOutput;
    out.clip_position = vec4<f32>(position, 0.0, 1.0);
    out.uv = uv;
    return out;
}

@fragment
fn fs_screen(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(preview_texture, preview_sampler, in.uv);
}
"#;
