//! wgpu render backend for the liminal walker.
//!
//! Renders the active variant's scene graph as instanced unit meshes (cube,
//! sphere, cylinder, cone) scaled per prop, lit by the graph's light props,
//! over a floor grid aligned to the streaming cells.
//!
//! # Invariants
//! - The renderer never mutates the scene graph; a frame is a pure function
//!   of graph + view + projection.
//! - Mesh vertex/index buffers are built once at startup; per-frame work is
//!   uniform and instance uploads only.
//! - Viewpoint math lives in `liminal-view`; this crate only consumes the
//!   resulting eye/target pair.

mod camera;
mod gpu;
mod meshes;
mod shaders;

pub use camera::Projection;
pub use gpu::WgpuRenderer;
