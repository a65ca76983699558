use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use liminal_render::RenderView;
use liminal_scene::{PropKind, SceneGraph};

use crate::camera::Projection;
use crate::meshes::{self, MeshKind, Vertex};
use crate::shaders;

/// Per-kind cap on the instance buffer. Props past the cap are skipped for
/// the frame rather than reallocating mid-frame.
const MAX_INSTANCES_PER_KIND: usize = 8_192;

/// Upper bound on point lights in the uniform block. When a scene carries
/// more, the ones nearest the eye win.
const MAX_POINT_LIGHTS: usize = 16;

/// Half-width of the floor grid, in grid squares.
const GRID_HALF_EXTENT: i32 = 10;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct PointLightGpu {
    /// xyz = world position, w = range.
    position_range: [f32; 4],
    color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct Uniforms {
    view_proj: [[f32; 4]; 4],
    ambient: [f32; 4],
    /// xyz = direction toward the light, normalized.
    light_dir: [f32; 4],
    light_color: [f32; 4],
    point_lights: [PointLightGpu; MAX_POINT_LIGHTS],
    /// x = live entries in `point_lights`; yzw pad the block to vec4.
    point_count: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct InstanceData {
    model_0: [f32; 4],
    model_1: [f32; 4],
    model_2: [f32; 4],
    model_3: [f32; 4],
    /// rgb = base color, a = opacity.
    color: [f32; 4],
    emissive: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct GridVertex {
    position: [f32; 3],
    color: [f32; 4],
}

/// Generate floor grid line vertices. Spacing matches the streaming cell
/// size, so the lines trace cell seams through the void outside loaded
/// geometry.
fn grid_mesh(half_extent: i32, spacing: f32) -> Vec<GridVertex> {
    let mut verts = Vec::new();
    let color = [0.4, 0.4, 0.4, 1.0];
    let extent = half_extent as f32 * spacing;

    for i in -half_extent..=half_extent {
        let offset = i as f32 * spacing;
        // Lines along X
        verts.push(GridVertex {
            position: [-extent, 0.0, offset],
            color,
        });
        verts.push(GridVertex {
            position: [extent, 0.0, offset],
            color,
        });
        // Lines along Z
        verts.push(GridVertex {
            position: [offset, 0.0, -extent],
            color,
        });
        verts.push(GridVertex {
            position: [offset, 0.0, extent],
            color,
        });
    }
    verts
}

/// Lighting slice of the uniform block, pulled out of a scene graph.
struct LightSet {
    ambient: [f32; 4],
    light_dir: [f32; 4],
    light_color: [f32; 4],
    point_lights: [PointLightGpu; MAX_POINT_LIGHTS],
    point_count: u32,
}

/// Scan the graph for light props. Ambient terms sum; the first directional
/// light wins; point lights keep the `MAX_POINT_LIGHTS` nearest to the eye.
fn collect_lights(graph: &SceneGraph, eye: Vec3) -> LightSet {
    let mut ambient = [0.0_f32; 4];
    let mut saw_ambient = false;
    let mut light_dir = None;
    let mut light_color = [0.0_f32; 4];
    let mut points: Vec<(f32, PointLightGpu)> = Vec::new();

    for (_, prop) in graph.props() {
        match prop.kind {
            PropKind::AmbientLight { color, intensity } => {
                ambient[0] += color.r * intensity;
                ambient[1] += color.g * intensity;
                ambient[2] += color.b * intensity;
                saw_ambient = true;
            }
            PropKind::DirectionalLight { color, intensity } => {
                if light_dir.is_none() {
                    // Lights shine from their position toward the origin.
                    let dir = prop.transform.position.normalize_or_zero();
                    if dir != Vec3::ZERO {
                        light_dir = Some([dir.x, dir.y, dir.z, 0.0]);
                        light_color = [
                            color.r * intensity,
                            color.g * intensity,
                            color.b * intensity,
                            0.0,
                        ];
                    }
                }
            }
            PropKind::PointLight {
                color,
                intensity,
                range,
            } => {
                let position = prop.transform.position;
                points.push((
                    position.distance_squared(eye),
                    PointLightGpu {
                        position_range: [position.x, position.y, position.z, range],
                        color: [
                            color.r * intensity,
                            color.g * intensity,
                            color.b * intensity,
                            0.0,
                        ],
                    },
                ));
            }
            PropKind::Mesh { .. } => {}
        }
    }

    if !saw_ambient {
        // Unlit graphs still get a dim floor level so geometry reads at all.
        ambient = [0.05, 0.05, 0.05, 0.0];
    }

    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    points.truncate(MAX_POINT_LIGHTS);

    let mut point_lights = [PointLightGpu::zeroed(); MAX_POINT_LIGHTS];
    for (slot, (_, light)) in point_lights.iter_mut().zip(points.iter()) {
        *slot = *light;
    }

    LightSet {
        ambient,
        light_dir: light_dir.unwrap_or([0.287, 0.957, 0.0, 0.0]),
        light_color,
        point_lights,
        point_count: points.len() as u32,
    }
}

/// Build per-mesh-kind instance lists from the graph's mesh props.
fn collect_instances(graph: &SceneGraph) -> [Vec<InstanceData>; 4] {
    let mut sets: [Vec<InstanceData>; 4] = std::array::from_fn(|_| Vec::new());

    for (_, prop) in graph.props() {
        let PropKind::Mesh { shape, material } = &prop.kind else {
            continue;
        };
        let (kind, shape_scale) = meshes::kind_and_scale(shape);
        let set = &mut sets[kind.index()];
        if set.len() >= MAX_INSTANCES_PER_KIND {
            continue;
        }

        let t = &prop.transform;
        let model =
            Mat4::from_scale_rotation_translation(t.scale * shape_scale, t.rotation, t.position);
        let cols = model.to_cols_array_2d();
        let emissive = material.emissive.map_or([0.0; 4], |e| [e.r, e.g, e.b, 0.0]);

        set.push(InstanceData {
            model_0: cols[0],
            model_1: cols[1],
            model_2: cols[2],
            model_3: cols[3],
            color: [
                material.color.r,
                material.color.g,
                material.color.b,
                material.opacity,
            ],
            emissive,
        });
    }

    sets
}

struct MeshBuffers {
    vertex: wgpu::Buffer,
    index: wgpu::Buffer,
    index_count: u32,
    instances: wgpu::Buffer,
}

/// wgpu-based scene renderer: one instanced draw per mesh kind plus a
/// floor grid, lit from the graph's light props.
pub struct WgpuRenderer {
    prop_pipeline: wgpu::RenderPipeline,
    grid_pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    mesh_buffers: [MeshBuffers; 4],
    grid_vertex_buffer: wgpu::Buffer,
    grid_vertex_count: u32,
    depth_texture: wgpu::TextureView,
    surface_format: wgpu::TextureFormat,
}

impl WgpuRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        grid_spacing: f32,
    ) -> Self {
        // Uniform buffer
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("uniform_buffer"),
            contents: bytemuck::bytes_of(&Uniforms {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
                ..Uniforms::zeroed()
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform_bind_group_layout"),
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

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("uniform_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        // Prop pipeline
        let prop_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("prop_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::PROP_SHADER.into()),
        });

        let prop_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("prop_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &prop_shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            2 => Float32x4,
                            3 => Float32x4,
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                            7 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &prop_shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        // Grid pipeline
        let grid_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("grid_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::GRID_SHADER.into()),
        });

        let grid_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("grid_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &grid_shader,
                entry_point: Some("vs_grid"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<GridVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x3,
                        1 => Float32x4,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &grid_shader,
                entry_point: Some("fs_grid"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        // One vertex/index/instance buffer set per mesh kind
        let mesh_buffers = MeshKind::ALL.map(|kind| {
            let (verts, indices) = kind.build();
            let vertex = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_vertex_buffer"),
                contents: bytemuck::cast_slice(&verts),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh_index_buffer"),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            let instances = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("mesh_instance_buffer"),
                size: (MAX_INSTANCES_PER_KIND * std::mem::size_of::<InstanceData>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            MeshBuffers {
                vertex,
                index,
                index_count: indices.len() as u32,
                instances,
            }
        });

        // Grid mesh
        let grid_verts = grid_mesh(GRID_HALF_EXTENT, grid_spacing);
        let grid_vertex_count = grid_verts.len() as u32;
        let grid_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("grid_vertex_buffer"),
            contents: bytemuck::cast_slice(&grid_verts),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let depth_texture = Self::create_depth_texture(device, width, height);

        Self {
            prop_pipeline,
            grid_pipeline,
            uniform_buffer,
            uniform_bind_group,
            mesh_buffers,
            grid_vertex_buffer,
            grid_vertex_count,
            depth_texture,
            surface_format,
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth_texture = Self::create_depth_texture(device, width, height);
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    /// Render one frame: floor grid plus every mesh prop in the graph,
    /// lit by the graph's light props.
    pub fn render(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        projection: &Projection,
        view: &RenderView,
        graph: &SceneGraph,
    ) {
        let lights = collect_lights(graph, view.eye);
        queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::bytes_of(&Uniforms {
                view_proj: projection.view_projection(view).to_cols_array_2d(),
                ambient: lights.ambient,
                light_dir: lights.light_dir,
                light_color: lights.light_color,
                point_lights: lights.point_lights,
                point_count: [lights.point_count as f32, 0.0, 0.0, 0.0],
            }),
        );

        let instance_sets = collect_instances(graph);
        for (set, mesh) in instance_sets.iter().zip(&self.mesh_buffers) {
            if !set.is_empty() {
                queue.write_buffer(&mesh.instances, 0, bytemuck::cast_slice(set));
            }
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("render_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            // Floor grid
            pass.set_pipeline(&self.grid_pipeline);
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            pass.set_vertex_buffer(0, self.grid_vertex_buffer.slice(..));
            pass.draw(0..self.grid_vertex_count, 0..1);

            // Instanced props, one draw per mesh kind
            pass.set_pipeline(&self.prop_pipeline);
            pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            for (set, mesh) in instance_sets.iter().zip(&self.mesh_buffers) {
                if set.is_empty() {
                    continue;
                }
                pass.set_vertex_buffer(0, mesh.vertex.slice(..));
                pass.set_vertex_buffer(1, mesh.instances.slice(..));
                pass.set_index_buffer(mesh.index.slice(..), wgpu::IndexFormat::Uint16);
                pass.draw_indexed(0..mesh.index_count, 0, 0..set.len() as u32);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_depth_texture(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth_texture"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&Default::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use liminal_common::{Color, Transform};
    use liminal_scene::{Material, Prop, PropShape};

    #[test]
    fn grid_mesh_covers_the_requested_extent() {
        let verts = grid_mesh(10, 20.0);
        // 21 rows and 21 columns, two endpoints each.
        assert_eq!(verts.len(), 21 * 4);
        assert_eq!(verts[0].position, [-200.0, 0.0, -200.0]);
        let max = verts
            .iter()
            .map(|v| v.position[0].max(v.position[2]))
            .fold(f32::MIN, f32::max);
        assert_eq!(max, 200.0);
    }

    #[test]
    fn instances_are_grouped_by_mesh_kind() {
        let mut graph = SceneGraph::new();
        graph.spawn(Prop::mesh(
            Vec3::ZERO,
            PropShape::Box { size: Vec3::ONE },
            Material::flat(Color::WHITE),
        ));
        graph.spawn(Prop::mesh(
            Vec3::new(4.0, 0.0, 0.0),
            PropShape::Plane {
                width: 2.0,
                height: 2.0,
            },
            Material::flat(Color::WHITE),
        ));
        graph.spawn(Prop::mesh(
            Vec3::new(0.0, 2.0, 0.0),
            PropShape::Sphere { radius: 0.5 },
            Material::flat(Color::rgb(1.0, 0.0, 0.0)),
        ));
        graph.spawn(Prop::point_light(Vec3::Y, Color::WHITE, 1.0, 10.0));

        let sets = collect_instances(&graph);
        // Planes render as thin boxes, so they share the cube set.
        assert_eq!(sets[MeshKind::Cube.index()].len(), 2);
        assert_eq!(sets[MeshKind::Sphere.index()].len(), 1);
        assert_eq!(sets[MeshKind::Cylinder.index()].len(), 0);
        assert_eq!(sets[MeshKind::Cone.index()].len(), 0);
    }

    #[test]
    fn instance_model_carries_shape_scale_and_position() {
        let mut graph = SceneGraph::new();
        graph.spawn(Prop {
            transform: Transform {
                position: Vec3::new(1.0, 2.0, 3.0),
                rotation: Quat::IDENTITY,
                scale: Vec3::ONE,
            },
            ..Prop::mesh(
                Vec3::ZERO,
                PropShape::Box {
                    size: Vec3::new(2.0, 4.0, 6.0),
                },
                Material::flat(Color::WHITE),
            )
        });

        let sets = collect_instances(&graph);
        let instance = &sets[MeshKind::Cube.index()][0];
        assert_eq!(instance.model_0, [2.0, 0.0, 0.0, 0.0]);
        assert_eq!(instance.model_1, [0.0, 4.0, 0.0, 0.0]);
        assert_eq!(instance.model_2, [0.0, 0.0, 6.0, 0.0]);
        assert_eq!(instance.model_3, [1.0, 2.0, 3.0, 1.0]);
    }

    #[test]
    fn opacity_rides_the_color_alpha_and_emissive_defaults_to_zero() {
        let mut graph = SceneGraph::new();
        let mut material = Material::flat(Color::rgb(0.2, 0.4, 0.6));
        material.opacity = 0.35;
        graph.spawn(Prop::mesh(
            Vec3::ZERO,
            PropShape::Box { size: Vec3::ONE },
            material,
        ));

        let sets = collect_instances(&graph);
        let instance = &sets[MeshKind::Cube.index()][0];
        assert_eq!(instance.color, [0.2, 0.4, 0.6, 0.35]);
        assert_eq!(instance.emissive, [0.0; 4]);
    }

    #[test]
    fn lights_come_from_the_graph() {
        let mut graph = SceneGraph::new();
        graph.spawn(Prop::ambient_light(Color::rgb(0.4, 0.4, 0.4), 0.5));
        graph.spawn(Prop::directional_light(
            Vec3::new(0.0, 10.0, 0.0),
            Color::WHITE,
            0.8,
        ));
        graph.spawn(Prop::point_light(
            Vec3::new(0.0, 2.0, -5.0),
            Color::rgb(1.0, 0.5, 0.0),
            2.0,
            12.0,
        ));

        let lights = collect_lights(&graph, Vec3::ZERO);
        assert_eq!(lights.ambient[0], 0.2);
        assert_eq!(lights.light_dir, [0.0, 1.0, 0.0, 0.0]);
        assert_eq!(lights.light_color[0], 0.8);
        assert_eq!(lights.point_count, 1);
        assert_eq!(
            lights.point_lights[0].position_range,
            [0.0, 2.0, -5.0, 12.0]
        );
        assert_eq!(lights.point_lights[0].color[0], 2.0);
    }

    #[test]
    fn nearest_point_lights_win_the_uniform_slots() {
        let mut graph = SceneGraph::new();
        for i in 1..=20 {
            graph.spawn(Prop::point_light(
                Vec3::new(i as f32, 0.0, 0.0),
                Color::WHITE,
                1.0,
                10.0,
            ));
        }

        let lights = collect_lights(&graph, Vec3::ZERO);
        assert_eq!(lights.point_count, 16);
        let farthest = lights.point_lights[..16]
            .iter()
            .map(|l| l.position_range[0])
            .fold(f32::MIN, f32::max);
        assert_eq!(farthest, 16.0);
    }

    #[test]
    fn unlit_graphs_fall_back_to_dim_ambient() {
        let graph = SceneGraph::new();
        let lights = collect_lights(&graph, Vec3::ZERO);
        assert_eq!(lights.ambient[0], 0.05);
        assert_eq!(lights.light_color, [0.0; 4]);
        assert_eq!(lights.point_count, 0);
    }
}
