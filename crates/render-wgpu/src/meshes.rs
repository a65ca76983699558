use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use liminal_scene::PropShape;

/// Thickness given to planes, which the mesh set models as flat boxes.
const PLANE_DEPTH: f32 = 0.05;

const SPHERE_STACKS: u32 = 16;
const SPHERE_SLICES: u32 = 24;
const RADIAL_SEGMENTS: u32 = 24;

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub(crate) struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// The unit meshes every prop shape maps onto. Instancing scales them to
/// the prop's dimensions, so one buffer per kind serves the whole graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MeshKind {
    Cube,
    Sphere,
    Cylinder,
    Cone,
}

impl MeshKind {
    pub(crate) const ALL: [MeshKind; 4] = [
        MeshKind::Cube,
        MeshKind::Sphere,
        MeshKind::Cylinder,
        MeshKind::Cone,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            MeshKind::Cube => 0,
            MeshKind::Sphere => 1,
            MeshKind::Cylinder => 2,
            MeshKind::Cone => 3,
        }
    }

    pub(crate) fn build(self) -> (Vec<Vertex>, Vec<u16>) {
        match self {
            MeshKind::Cube => cube(),
            MeshKind::Sphere => uv_sphere(SPHERE_STACKS, SPHERE_SLICES),
            MeshKind::Cylinder => cylinder(RADIAL_SEGMENTS),
            MeshKind::Cone => cone(RADIAL_SEGMENTS),
        }
    }
}

/// Maps a prop shape onto a unit mesh plus the scale that sizes it.
pub(crate) fn kind_and_scale(shape: &PropShape) -> (MeshKind, Vec3) {
    match *shape {
        PropShape::Plane { width, height } => {
            (MeshKind::Cube, Vec3::new(width, height, PLANE_DEPTH))
        }
        PropShape::Box { size } => (MeshKind::Cube, size),
        PropShape::Sphere { radius } => (MeshKind::Sphere, Vec3::splat(radius)),
        PropShape::Cylinder {
            radius_top,
            radius_bottom,
            height,
        } => {
            // Straight unit shaft; tapered cylinders render at the mean radius.
            let radius = (radius_top + radius_bottom) / 2.0;
            (MeshKind::Cylinder, Vec3::new(radius, height, radius))
        }
        PropShape::Cone { radius, height } => (MeshKind::Cone, Vec3::new(radius, height, radius)),
    }
}

/// Unit cube, four vertices per face so normals stay flat.
fn cube() -> (Vec<Vertex>, Vec<u16>) {
    // Face normal plus the two in-plane axes spanning it, wound outward.
    const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (normal, u, v) in FACES {
        let n = Vec3::from(normal);
        let u = Vec3::from(u);
        let v = Vec3::from(v);
        let base = vertices.len() as u16;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let position = (n + u * su + v * sv) * 0.5;
            vertices.push(Vertex {
                position: position.to_array(),
                normal: n.to_array(),
            });
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }
    (vertices, indices)
}

/// Unit-radius sphere from stacked latitude rings.
fn uv_sphere(stacks: u32, slices: u32) -> (Vec<Vertex>, Vec<u16>) {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for stack in 0..=stacks {
        let theta = PI * stack as f32 / stacks as f32;
        let y = theta.cos();
        let ring = theta.sin();
        for slice in 0..=slices {
            let phi = TAU * slice as f32 / slices as f32;
            let position = Vec3::new(ring * phi.cos(), y, ring * phi.sin());
            vertices.push(Vertex {
                position: position.to_array(),
                normal: position.to_array(),
            });
        }
    }

    let stride = (slices + 1) as u16;
    for stack in 0..stacks {
        for slice in 0..slices {
            let a = stack as u16 * stride + slice as u16;
            let b = a + stride;
            indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
        }
    }
    (vertices, indices)
}

/// Unit cylinder: radius 1, height 1, centered on the origin.
fn cylinder(segments: u32) -> (Vec<Vertex>, Vec<u16>) {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for segment in 0..=segments {
        let phi = TAU * segment as f32 / segments as f32;
        let (x, z) = (phi.cos(), phi.sin());
        vertices.push(Vertex {
            position: [x, 0.5, z],
            normal: [x, 0.0, z],
        });
        vertices.push(Vertex {
            position: [x, -0.5, z],
            normal: [x, 0.0, z],
        });
    }
    for segment in 0..segments {
        let a = (segment * 2) as u16;
        indices.extend_from_slice(&[a, a + 2, a + 1, a + 2, a + 3, a + 1]);
    }

    for (y, normal) in [(0.5, [0.0, 1.0, 0.0]), (-0.5, [0.0, -1.0, 0.0])] {
        let center = vertices.len() as u16;
        vertices.push(Vertex {
            position: [0.0, y, 0.0],
            normal,
        });
        for segment in 0..=segments {
            let phi = TAU * segment as f32 / segments as f32;
            vertices.push(Vertex {
                position: [phi.cos(), y, phi.sin()],
                normal,
            });
        }
        for segment in 0..segments as u16 {
            let rim = center + 1 + segment;
            if y > 0.0 {
                indices.extend_from_slice(&[center, rim + 1, rim]);
            } else {
                indices.extend_from_slice(&[center, rim, rim + 1]);
            }
        }
    }
    (vertices, indices)
}

/// Unit cone: base radius 1 at y = −0.5, apex at y = 0.5.
fn cone(segments: u32) -> (Vec<Vertex>, Vec<u16>) {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    let slope = 1.0 / 2.0_f32.sqrt();

    // One apex vertex per segment keeps the slanted normals from smearing
    // across the tip.
    for segment in 0..segments {
        let phi0 = TAU * segment as f32 / segments as f32;
        let phi1 = TAU * (segment + 1) as f32 / segments as f32;
        let mid = (phi0 + phi1) / 2.0;
        let base = vertices.len() as u16;
        vertices.push(Vertex {
            position: [0.0, 0.5, 0.0],
            normal: [mid.cos() * slope, slope, mid.sin() * slope],
        });
        vertices.push(Vertex {
            position: [phi0.cos(), -0.5, phi0.sin()],
            normal: [phi0.cos() * slope, slope, phi0.sin() * slope],
        });
        vertices.push(Vertex {
            position: [phi1.cos(), -0.5, phi1.sin()],
            normal: [phi1.cos() * slope, slope, phi1.sin() * slope],
        });
        indices.extend_from_slice(&[base, base + 2, base + 1]);
    }

    let center = vertices.len() as u16;
    vertices.push(Vertex {
        position: [0.0, -0.5, 0.0],
        normal: [0.0, -1.0, 0.0],
    });
    for segment in 0..=segments {
        let phi = TAU * segment as f32 / segments as f32;
        vertices.push(Vertex {
            position: [phi.cos(), -0.5, phi.sin()],
            normal: [0.0, -1.0, 0.0],
        });
    }
    for segment in 0..segments as u16 {
        let rim = center + 1 + segment;
        indices.extend_from_slice(&[center, rim, rim + 1]);
    }
    (vertices, indices)
}
