//! Procedural cell generators, one per scene theme.
//!
//! Every generated cell carries a fixed structural skeleton (floors, walls,
//! periodic lights) plus randomized decoration. All spawned props are tagged
//! with the owning cell key so eviction can later remove exactly this cell,
//! and palette lookups fall back to per-element defaults so a partially
//! populated palette never aborts generation.

mod corridor;
mod gallery;
mod sea;
mod stairs;

pub use corridor::{CorridorGenerator, CorridorParams};
pub use gallery::{GalleryGenerator, GalleryParams};
pub use sea::{SeaGenerator, SeaParams};
pub use stairs::{StairsGenerator, StairsParams};

use glam::{Vec2, Vec3};
use liminal_common::{CellKey, Color};
use rand::RngCore;

use crate::graph::{Prop, PropShape, SceneGraph};
use crate::material::{Material, Palette};

/// Fills one grid cell of a variant's scene graph with themed geometry.
///
/// `origin` is the world-space origin of `cell`; the caller derives it from
/// the streaming grid. Implementations spawn into `graph` only and must be
/// callable for any number of distinct cells without interfering with the
/// props of previously generated ones.
pub trait AreaGenerator {
    fn generate(
        &self,
        cell: CellKey,
        origin: Vec2,
        graph: &mut SceneGraph,
        palette: &Palette,
        rng: &mut dyn RngCore,
    );
}

/// Small glowing collectible; each theme hides one per cell with its own
/// probability and placement.
pub(crate) fn spawn_hidden_orb(
    graph: &mut SceneGraph,
    cell: CellKey,
    position: Vec3,
    radius: f32,
    color: Color,
    glow: Color,
) {
    let material = Material {
        emissive: Some(glow),
        ..Material::flat(color)
    };
    graph.spawn(Prop::mesh(position, PropShape::Sphere { radius }, material).tagged(cell));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::PropKind;

    #[test]
    fn hidden_orb_is_tagged_and_glowing() {
        let mut graph = SceneGraph::new();
        let cell = CellKey::new(2, -1);
        spawn_hidden_orb(
            &mut graph,
            cell,
            Vec3::new(1.0, 0.5, -3.0),
            0.1,
            Color::hex(0xffaaaa),
            Color::hex(0xff5555),
        );

        assert_eq!(graph.cell_props(cell).len(), 1);
        let (_, prop) = graph.props().next().unwrap();
        match prop.kind {
            PropKind::Mesh { material, .. } => assert!(material.emissive.is_some()),
            _ => panic!("orb should be a mesh"),
        }
    }
}
