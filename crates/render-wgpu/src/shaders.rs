/// WGSL shader for the instanced prop meshes: ambient plus one directional
/// light plus a small set of ranged point lights, with an emissive term.
pub const PROP_SHADER: &str = r#"
struct PointLight {
    position_range: vec4<f32>,
    color: vec4<f32>,
};

struct Uniforms {
    view_proj: mat4x4<f32>,
    ambient: vec4<f32>,
    light_dir: vec4<f32>,
    light_color: vec4<f32>,
    point_lights: array<PointLight, 16>,
    point_count: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
};

struct InstanceInput {
    @location(2) model_0: vec4<f32>,
    @location(3) model_1: vec4<f32>,
    @location(4) model_2: vec4<f32>,
    @location(5) model_3: vec4<f32>,
    @location(6) color: vec4<f32>,
    @location(7) emissive: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) color: vec4<f32>,
    @location(3) emissive: vec3<f32>,
};

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    let world_normal = (model * vec4<f32>(vertex.normal, 0.0)).xyz;

    var out: VertexOutput;
    out.clip_position = uniforms.view_proj * world_pos;
    out.world_pos = world_pos.xyz;
    out.world_normal = normalize(world_normal);
    out.color = instance.color;
    out.emissive = instance.emissive.rgb;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let normal = normalize(in.world_normal);
    var lit = uniforms.ambient.rgb;
    lit += uniforms.light_color.rgb * max(dot(normal, normalize(uniforms.light_dir.xyz)), 0.0);

    let count = u32(uniforms.point_count.x);
    for (var i = 0u; i < count; i = i + 1u) {
        let light = uniforms.point_lights[i];
        let to_light = light.position_range.xyz - in.world_pos;
        let distance = length(to_light);
        let range = light.position_range.w;
        if (distance < range) {
            let falloff = 1.0 - distance / range;
            let direction = to_light / max(distance, 1e-4);
            lit += light.color.rgb * falloff * max(dot(normal, direction), 0.0);
        }
    }

    let color = in.color.rgb * lit + in.emissive;
    return vec4<f32>(color, in.color.a);
}
"#;

/// WGSL shader for the ground grid lines.
pub const GRID_SHADER: &str = r#"
struct PointLight {
    position_range: vec4<f32>,
    color: vec4<f32>,
};

struct Uniforms {
    view_proj: mat4x4<f32>,
    ambient: vec4<f32>,
    light_dir: vec4<f32>,
    light_color: vec4<f32>,
    point_lights: array<PointLight, 16>,
    point_count: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct GridVertex {
    @location(0) position: vec3<f32>,
    @location(1) color: vec4<f32>,
};

struct GridOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec4<f32>,
};

@vertex
fn vs_grid(vertex: GridVertex) -> GridOutput {
    var out: GridOutput;
    out.clip_position = uniforms.view_proj * vec4<f32>(vertex.position, 1.0);
    out.color = vertex.color;
    return out;
}

@fragment
fn fs_grid(in: GridOutput) -> @location(0) vec4<f32> {
    return in.color;
}
"#;
