use std::collections::BTreeMap;

use glam::{Quat, Vec3};
use liminal_common::{CellKey, Color, PropId, Transform};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

use crate::material::Material;

/// Geometric primitive for a mesh prop.
///
/// `Plane` is a flat rectangle in the prop's local XY plane, facing +Z;
/// floors and ceilings are planes rotated onto the XZ plane by their
/// transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PropShape {
    Plane { width: f32, height: f32 },
    Box { size: Vec3 },
    Sphere { radius: f32 },
    Cylinder { radius_top: f32, radius_bottom: f32, height: f32 },
    Cone { radius: f32, height: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PropKind {
    Mesh { shape: PropShape, material: Material },
    AmbientLight { color: Color, intensity: f32 },
    DirectionalLight { color: Color, intensity: f32 },
    PointLight { color: Color, intensity: f32, range: f32 },
}

/// Flicker timer carried by a light prop.
///
/// The owning variant's ambience pass advances the timer, so it lives and
/// dies with the prop instead of leaking scheduled callbacks past eviction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Flicker {
    /// Seconds between intensity changes, fixed per light.
    pub period: f32,
    pub elapsed: f32,
}

impl Flicker {
    pub fn random(rng: &mut dyn RngCore) -> Self {
        Self {
            period: rng.random_range(0.5..1.5),
            elapsed: 0.0,
        }
    }
}

/// One object in a variant's scene graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prop {
    pub transform: Transform,
    pub kind: PropKind,
    /// Owning stream cell. Untagged props are seed content and are never
    /// evicted.
    pub cell: Option<CellKey>,
    /// Tumbles in the ambience pass.
    pub spin: bool,
    pub flicker: Option<Flicker>,
}

impl Prop {
    pub fn mesh(position: Vec3, shape: PropShape, material: Material) -> Self {
        Self {
            transform: Transform::at(position),
            kind: PropKind::Mesh { shape, material },
            cell: None,
            spin: false,
            flicker: None,
        }
    }

    pub fn point_light(position: Vec3, color: Color, intensity: f32, range: f32) -> Self {
        Self {
            transform: Transform::at(position),
            kind: PropKind::PointLight {
                color,
                intensity,
                range,
            },
            cell: None,
            spin: false,
            flicker: None,
        }
    }

    pub fn ambient_light(color: Color, intensity: f32) -> Self {
        Self {
            transform: Transform::default(),
            kind: PropKind::AmbientLight { color, intensity },
            cell: None,
            spin: false,
            flicker: None,
        }
    }

    pub fn directional_light(position: Vec3, color: Color, intensity: f32) -> Self {
        Self {
            transform: Transform::at(position),
            kind: PropKind::DirectionalLight { color, intensity },
            cell: None,
            spin: false,
            flicker: None,
        }
    }

    pub fn tagged(mut self, cell: CellKey) -> Self {
        self.cell = Some(cell);
        self
    }

    pub fn rotated(mut self, rotation: Quat) -> Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn spinning(mut self) -> Self {
        self.spin = true;
        self
    }

    pub fn flickering(mut self, flicker: Flicker) -> Self {
        self.flicker = Some(flicker);
        self
    }
}

/// All live props for one scene variant, with a side index from cell key to
/// owned prop ids.
///
/// # Invariants
/// - `by_cell` lists exactly the ids of props whose `cell` tag equals the map
///   key; spawn and removal keep the index synchronized.
/// - Eviction works purely off the recorded tag, never off world-space
///   proximity, so neighboring cells' overlapping geometry is never swept up.
#[derive(Debug, Default)]
pub struct SceneGraph {
    props: BTreeMap<PropId, Prop>,
    by_cell: BTreeMap<CellKey, Vec<PropId>>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a prop, indexing it under its cell tag if present.
    pub fn spawn(&mut self, prop: Prop) -> PropId {
        let id = PropId::new();
        if let Some(cell) = prop.cell {
            self.by_cell.entry(cell).or_default().push(id);
        }
        self.props.insert(id, prop);
        id
    }

    pub fn remove(&mut self, id: PropId) -> Option<Prop> {
        let prop = self.props.remove(&id)?;
        if let Some(cell) = prop.cell {
            if let Some(ids) = self.by_cell.get_mut(&cell) {
                ids.retain(|p| *p != id);
                if ids.is_empty() {
                    self.by_cell.remove(&cell);
                }
            }
        }
        Some(prop)
    }

    /// Remove every prop tagged with `cell` and drop the index entry.
    /// Returns the number of props removed; zero when nothing was tagged.
    pub fn remove_cell(&mut self, cell: CellKey) -> usize {
        let ids = self.by_cell.remove(&cell).unwrap_or_default();
        let mut removed = 0;
        for id in ids {
            if self.props.remove(&id).is_some() {
                removed += 1;
            }
        }
        removed
    }

    pub fn get(&self, id: PropId) -> Option<&Prop> {
        self.props.get(&id)
    }

    pub fn get_mut(&mut self, id: PropId) -> Option<&mut Prop> {
        self.props.get_mut(&id)
    }

    pub fn props(&self) -> impl Iterator<Item = (&PropId, &Prop)> {
        self.props.iter()
    }

    pub fn props_mut(&mut self) -> impl Iterator<Item = (&PropId, &mut Prop)> {
        self.props.iter_mut()
    }

    pub fn prop_count(&self) -> usize {
        self.props.len()
    }

    /// Ids of props owned by `cell`; empty for an unknown cell.
    pub fn cell_props(&self, cell: CellKey) -> &[PropId] {
        self.by_cell.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn cells(&self) -> impl Iterator<Item = CellKey> + '_ {
        self.by_cell.keys().copied()
    }

    pub fn cell_count(&self) -> usize {
        self.by_cell.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube(position: Vec3) -> Prop {
        Prop::mesh(
            position,
            PropShape::Box { size: Vec3::ONE },
            Material::flat(Color::WHITE),
        )
    }

    #[test]
    fn spawn_indexes_tagged_props_by_cell() {
        let mut graph = SceneGraph::new();
        let cell = CellKey::new(0, 0);
        let id = graph.spawn(cube(Vec3::ZERO).tagged(cell));

        assert_eq!(graph.cell_props(cell), &[id]);
        assert_eq!(graph.prop_count(), 1);
    }

    #[test]
    fn untagged_props_are_not_indexed() {
        let mut graph = SceneGraph::new();
        graph.spawn(Prop::ambient_light(Color::WHITE, 0.5));

        assert_eq!(graph.prop_count(), 1);
        assert_eq!(graph.cell_count(), 0);
    }

    #[test]
    fn remove_cell_drops_only_that_cell() {
        let mut graph = SceneGraph::new();
        let near = CellKey::new(0, 0);
        let far = CellKey::new(3, -2);
        graph.spawn(cube(Vec3::ZERO).tagged(near));
        graph.spawn(cube(Vec3::ZERO).tagged(near));
        let kept = graph.spawn(cube(Vec3::new(60.0, 0.0, -40.0)).tagged(far));

        let removed = graph.remove_cell(near);

        assert_eq!(removed, 2);
        assert_eq!(graph.prop_count(), 1);
        assert!(graph.get(kept).is_some());
        assert!(graph.cell_props(near).is_empty());
    }

    #[test]
    fn remove_cell_on_unknown_key_is_a_noop() {
        let mut graph = SceneGraph::new();
        graph.spawn(cube(Vec3::ZERO).tagged(CellKey::new(0, 0)));

        assert_eq!(graph.remove_cell(CellKey::new(9, 9)), 0);
        assert_eq!(graph.prop_count(), 1);
    }

    #[test]
    fn remove_keeps_cell_index_synchronized() {
        let mut graph = SceneGraph::new();
        let cell = CellKey::new(1, 1);
        let a = graph.spawn(cube(Vec3::ZERO).tagged(cell));
        let b = graph.spawn(cube(Vec3::ONE).tagged(cell));

        graph.remove(a);
        assert_eq!(graph.cell_props(cell), &[b]);

        graph.remove(b);
        assert_eq!(graph.cell_count(), 0);
    }

    #[test]
    fn untagged_props_survive_cell_removal() {
        let mut graph = SceneGraph::new();
        let cell = CellKey::new(0, 0);
        let seed = graph.spawn(Prop::ambient_light(Color::WHITE, 0.5));
        graph.spawn(cube(Vec3::ZERO).tagged(cell));

        graph.remove_cell(cell);
        assert!(graph.get(seed).is_some());
    }

    #[test]
    fn flicker_period_stays_in_documented_range() {
        let mut rng = rand::rng();
        for _ in 0..50 {
            let f = Flicker::random(&mut rng);
            assert!(f.period >= 0.5 && f.period < 1.5);
            assert_eq!(f.elapsed, 0.0);
        }
    }
}
