use std::collections::HashSet;
use std::str::FromStr;

use glam::{EulerRot, Quat, Vec2, Vec3};
use liminal_common::{CellKey, Color};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::generate::{
    AreaGenerator, CorridorGenerator, GalleryGenerator, SeaGenerator, StairsGenerator,
};
use crate::graph::{Flicker, Prop, PropKind, SceneGraph};
use crate::material::{Material, Palette, PaletteSlot};

/// Radians of tumble per ambience tick for spinning props.
const SPIN_STEP: f32 = 0.01;

/// The four built-in scene themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneKind {
    Corridor,
    Sea,
    Gallery,
    Stairs,
}

impl SceneKind {
    pub const ALL: [SceneKind; 4] = [
        SceneKind::Corridor,
        SceneKind::Sea,
        SceneKind::Gallery,
        SceneKind::Stairs,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            SceneKind::Corridor => "corridor",
            SceneKind::Sea => "sea",
            SceneKind::Gallery => "gallery",
            SceneKind::Stairs => "stairs",
        }
    }

    fn generator(self) -> Box<dyn AreaGenerator> {
        match self {
            SceneKind::Corridor => Box::new(CorridorGenerator::default()),
            SceneKind::Sea => Box::new(SeaGenerator::default()),
            SceneKind::Gallery => Box::new(GalleryGenerator::default()),
            SceneKind::Stairs => Box::new(StairsGenerator::default()),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("unknown scene kind `{0}`, expected corridor, sea, gallery, or stairs")]
pub struct UnknownSceneKind(String);

impl FromStr for SceneKind {
    type Err = UnknownSceneKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SceneKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| UnknownSceneKind(s.to_string()))
    }
}

/// Static identity of one variant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    pub name: &'static str,
    pub kind: SceneKind,
    pub description: &'static str,
}

pub const SCENE_CONFIGS: [SceneConfig; 4] = [
    SceneConfig {
        name: "Corridor",
        kind: SceneKind::Corridor,
        description: "Liminal space corridor scene",
    },
    SceneConfig {
        name: "Sea",
        kind: SceneKind::Sea,
        description: "Pool core scene with calming waters",
    },
    SceneConfig {
        name: "Flower Gallery",
        kind: SceneKind::Gallery,
        description: "Dream core scene with beautiful flowers",
    },
    SceneConfig {
        name: "Stairs",
        kind: SceneKind::Stairs,
        description: "Liminal space with endless stairs",
    },
];

/// Snapshot of a variant's identity, handed to the shell on switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneInfo {
    pub index: usize,
    pub name: String,
    pub description: String,
}

/// One selectable world: palette, live scene graph, and the set of cells
/// currently materialized in it.
///
/// # Invariants
/// - `generated` holds exactly the cell keys whose props exist in `graph`;
///   `generate_cell` and `evict_cell` keep the two in lockstep.
/// - Seed lighting is untagged and survives any amount of cell churn.
pub struct SceneVariant {
    config: SceneConfig,
    generator: Box<dyn AreaGenerator>,
    palette: Palette,
    graph: SceneGraph,
    generated: HashSet<CellKey>,
    visible: bool,
}

impl SceneVariant {
    fn new(config: SceneConfig, rng: &mut dyn RngCore) -> Self {
        let mut graph = SceneGraph::new();
        seed_lighting(config.kind, &mut graph, rng);

        let mut variant = Self {
            config,
            generator: config.kind.generator(),
            palette: palette_for(config.kind),
            graph,
            generated: HashSet::new(),
            visible: false,
        };
        // The seed cell at the origin is always materialized eagerly so a
        // freshly selected variant is never empty.
        variant.generate_cell(CellKey::new(0, 0), Vec2::ZERO, rng);
        variant
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn info(&self, index: usize) -> SceneInfo {
        SceneInfo {
            index,
            name: self.config.name.to_string(),
            description: self.config.description.to_string(),
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Materialize `cell` if it is not already present. Returns true when new
    /// content was generated; a repeat call for a known key is a no-op.
    pub fn generate_cell(&mut self, cell: CellKey, origin: Vec2, rng: &mut dyn RngCore) -> bool {
        if !self.generated.insert(cell) {
            return false;
        }
        self.generator
            .generate(cell, origin, &mut self.graph, &self.palette, rng);
        true
    }

    /// Drop `cell`'s props and forget the key. Returns the number of props
    /// removed; a key whose props are already gone is still dropped.
    pub fn evict_cell(&mut self, cell: CellKey) -> usize {
        if !self.generated.remove(&cell) {
            return 0;
        }
        self.graph.remove_cell(cell)
    }

    pub fn generated_cells(&self) -> &HashSet<CellKey> {
        &self.generated
    }

    pub fn loaded_cell_count(&self) -> usize {
        self.generated.len()
    }

    /// Advance cosmetic animation: tumbling props and flickering lights.
    ///
    /// Flicker timers live on the props themselves, so eviction disposes of
    /// them together with their lights.
    pub fn advance_ambience(&mut self, dt: f32, rng: &mut dyn RngCore) {
        let spin = Quat::from_euler(EulerRot::XYZ, SPIN_STEP, SPIN_STEP, 0.0);
        for (_, prop) in self.graph.props_mut() {
            if prop.spin {
                prop.transform.rotation = (spin * prop.transform.rotation).normalize();
            }
            if let Some(flicker) = prop.flicker.as_mut() {
                flicker.elapsed += dt;
                if flicker.elapsed >= flicker.period {
                    flicker.elapsed -= flicker.period;
                    if let PropKind::PointLight { intensity, .. } = &mut prop.kind {
                        *intensity = rng.random_range(0.6..1.2);
                    }
                }
            }
        }
    }
}

/// Owns the fixed list of scene variants and tracks which one is active.
pub struct SceneRegistry {
    variants: Vec<SceneVariant>,
    active: usize,
}

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("scene variant index {index} out of range, {count} variants exist")]
    UnknownVariant { index: usize, count: usize },
}

impl SceneRegistry {
    /// Build every variant with its palette, seed lighting, and eagerly
    /// generated origin cell. The first variant starts visible.
    pub fn new(rng: &mut dyn RngCore) -> Self {
        let mut variants: Vec<SceneVariant> = SCENE_CONFIGS
            .iter()
            .map(|config| SceneVariant::new(*config, rng))
            .collect();
        variants[0].set_visible(true);
        Self {
            variants,
            active: 0,
        }
    }

    /// Switch the active variant, flipping visibility only. Both variants
    /// keep their graphs and generated sets, so re-entry resumes streaming
    /// where it left off. `Ok(None)` when `index` is already active.
    pub fn switch_to(&mut self, index: usize) -> Result<Option<SceneInfo>, RegistryError> {
        if index >= self.variants.len() {
            return Err(RegistryError::UnknownVariant {
                index,
                count: self.variants.len(),
            });
        }
        if index == self.active {
            return Ok(None);
        }

        self.variants[self.active].set_visible(false);
        self.variants[index].set_visible(true);
        self.active = index;

        let info = self.variants[index].info(index);
        info!(index, name = %info.name, "switched scene variant");
        Ok(Some(info))
    }

    pub fn active(&self) -> &SceneVariant {
        &self.variants[self.active]
    }

    pub fn active_mut(&mut self) -> &mut SceneVariant {
        &mut self.variants[self.active]
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn variant(&self, index: usize) -> Option<&SceneVariant> {
        self.variants.get(index)
    }

    pub fn variant_count(&self) -> usize {
        self.variants.len()
    }

    /// Identity snapshots for all variants, in selection order. Queried once
    /// at startup to populate the menu.
    pub fn infos(&self) -> Vec<SceneInfo> {
        self.variants
            .iter()
            .enumerate()
            .map(|(index, variant)| variant.info(index))
            .collect()
    }

    pub fn index_of(&self, kind: SceneKind) -> Option<usize> {
        self.variants
            .iter()
            .position(|variant| variant.config.kind == kind)
    }
}

fn palette_for(kind: SceneKind) -> Palette {
    let mut palette = Palette::new();
    match kind {
        SceneKind::Corridor => {
            palette.insert(PaletteSlot::Wall, Material::flat(Color::hex(0x999999)));
            palette.insert(PaletteSlot::Floor, Material::flat(Color::hex(0x777777)));
            palette.insert(PaletteSlot::Ceiling, Material::flat(Color::hex(0x888888)));
        }
        SceneKind::Sea => {
            palette.insert(
                PaletteSlot::Embankment,
                Material::flat(Color::hex(0x886644)),
            );
            palette.insert(
                PaletteSlot::Water,
                Material {
                    opacity: 0.8,
                    metalness: 0.3,
                    roughness: 0.1,
                    ..Material::flat(Color::hex(0x4488ff))
                },
            );
            palette.insert(PaletteSlot::Floor, Material::flat(Color::hex(0xaaaaaa)));
        }
        SceneKind::Gallery => {
            palette.insert(
                PaletteSlot::Canopy,
                Material {
                    opacity: 0.9,
                    ..Material::flat(Color::WHITE)
                },
            );
            palette.insert(PaletteSlot::Pillar, Material::flat(Color::hex(0xdddddd)));
            palette.insert(PaletteSlot::Walkway, Material::flat(Color::hex(0xffffcc)));
            palette.insert(PaletteSlot::Meadow, Material::flat(Color::hex(0xccffcc)));
        }
        SceneKind::Stairs => {
            palette.insert(PaletteSlot::Wall, Material::flat(Color::hex(0xdddddd)));
            palette.insert(PaletteSlot::Stair, Material::flat(Color::hex(0xcccccc)));
            palette.insert(
                PaletteSlot::WindowFrame,
                Material::flat(Color::hex(0x888888)),
            );
        }
    }
    palette
}

/// Base lighting spawned once per variant, untagged so it is never evicted.
fn seed_lighting(kind: SceneKind, graph: &mut SceneGraph, rng: &mut dyn RngCore) {
    match kind {
        SceneKind::Corridor => {
            graph.spawn(Prop::ambient_light(Color::hex(0x404040), 0.5));
            for i in 0..4 {
                let position = Vec3::new(0.0, 2.8, -(i as f32) * 5.0);
                let intensity = rng.random_range(0.8..1.2);
                graph.spawn(
                    Prop::point_light(position, Color::hex(0xccccff), intensity, 10.0)
                        .flickering(Flicker::random(rng)),
                );
            }
        }
        SceneKind::Sea => {
            graph.spawn(Prop::ambient_light(Color::hex(0x606060), 0.6));
            graph.spawn(Prop::directional_light(
                Vec3::new(5.0, 10.0, 5.0),
                Color::WHITE,
                0.8,
            ));
        }
        SceneKind::Gallery => {
            graph.spawn(Prop::ambient_light(Color::hex(0xffffcc), 0.8));
        }
        SceneKind::Stairs => {
            graph.spawn(Prop::ambient_light(Color::hex(0x404040), 0.5));
        }
    }
}
