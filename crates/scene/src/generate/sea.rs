use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec2, Vec3};
use liminal_common::{CellKey, Color};
use rand::{Rng, RngCore};

use crate::generate::{AreaGenerator, spawn_hidden_orb};
use crate::graph::{Prop, PropShape, SceneGraph};
use crate::material::{Material, Palette, PaletteSlot};

/// Structural knobs for pool-core sea cells.
#[derive(Debug, Clone)]
pub struct SeaParams {
    pub depth: f32,
    pub floor_width: f32,
    /// Raised walkway running down the middle of the water.
    pub bank_width: f32,
    pub bank_height: f32,
    pub pool_width: f32,
    pub pool_depth: f32,
    pub orb_count: usize,
    pub bonus_chance: f64,
}

impl Default for SeaParams {
    fn default() -> Self {
        Self {
            depth: 20.0,
            floor_width: 40.0,
            bank_width: 4.0,
            bank_height: 1.0,
            pool_width: 15.0,
            pool_depth: 2.0,
            orb_count: 3,
            bonus_chance: 0.2,
        }
    }
}

/// Pool core: a central embankment flanked by sunken water volumes with
/// reflective surfaces, plus slowly tumbling translucent orbs.
#[derive(Debug, Default)]
pub struct SeaGenerator {
    pub params: SeaParams,
}

impl AreaGenerator for SeaGenerator {
    fn generate(
        &self,
        cell: CellKey,
        origin: Vec2,
        graph: &mut SceneGraph,
        palette: &Palette,
        rng: &mut dyn RngCore,
    ) {
        let p = &self.params;
        let (x, z) = (origin.x, origin.y);
        let mid_z = z - p.depth / 2.0;

        let floor = palette.resolve(PaletteSlot::Floor, Material::flat(Color::hex(0xaaaaaa)));
        let bank = palette.resolve(
            PaletteSlot::Embankment,
            Material::flat(Color::hex(0x886644)),
        );
        let water = palette.resolve(
            PaletteSlot::Water,
            Material {
                opacity: 0.8,
                metalness: 0.3,
                roughness: 0.1,
                ..Material::flat(Color::hex(0x4488ff))
            },
        );

        graph.spawn(
            Prop::mesh(
                Vec3::new(x, 0.0, mid_z),
                PropShape::Plane {
                    width: p.floor_width,
                    height: p.depth,
                },
                floor,
            )
            .rotated(Quat::from_rotation_x(-FRAC_PI_2))
            .tagged(cell),
        );

        graph.spawn(
            Prop::mesh(
                Vec3::new(x, p.bank_height / 2.0, mid_z),
                PropShape::Box {
                    size: Vec3::new(p.bank_width, p.bank_height, p.depth),
                },
                bank,
            )
            .tagged(cell),
        );

        // Sunken water volume, reflective surface sheet, and a white rim on
        // each side of the embankment.
        let surface = Material {
            opacity: 0.9,
            metalness: 0.8,
            roughness: 0.1,
            ..Material::flat(Color::hex(0x4488ff))
        };
        let pool_x = p.bank_width / 2.0 + p.pool_width / 2.0;
        for side in [-1.0f32, 1.0] {
            let cx = x + side * pool_x;

            graph.spawn(
                Prop::mesh(
                    Vec3::new(cx, -p.pool_depth / 2.0, mid_z),
                    PropShape::Box {
                        size: Vec3::new(p.pool_width, p.pool_depth, p.depth),
                    },
                    water,
                )
                .tagged(cell),
            );

            graph.spawn(
                Prop::mesh(
                    Vec3::new(cx, 0.0, mid_z),
                    PropShape::Plane {
                        width: p.pool_width,
                        height: p.depth,
                    },
                    surface,
                )
                .rotated(Quat::from_rotation_x(-FRAC_PI_2))
                .tagged(cell),
            );

            graph.spawn(
                Prop::mesh(
                    Vec3::new(cx, 0.0, mid_z),
                    PropShape::Box {
                        size: Vec3::new(p.pool_width + 0.5, 0.3, p.depth + 0.5),
                    },
                    Material::flat(Color::WHITE),
                )
                .tagged(cell),
            );
        }

        let orb_material = Material {
            opacity: 0.6,
            metalness: 0.7,
            roughness: 0.2,
            ..Material::flat(Color::hex(0x8844ff))
        };
        for _ in 0..p.orb_count {
            let position = Vec3::new(
                x + rng.random_range(-15.0..15.0),
                rng.random_range(0.5..2.5),
                mid_z + rng.random_range(0.0..p.depth),
            );
            graph.spawn(
                Prop::mesh(
                    position,
                    PropShape::Sphere {
                        radius: rng.random_range(0.3..0.8),
                    },
                    orb_material,
                )
                .spinning()
                .tagged(cell),
            );
        }

        if rng.random_bool(p.bonus_chance) {
            let position = Vec3::new(
                x + rng.random_range(-5.0..5.0),
                0.5,
                z - rng.random_range(0.0..p.depth),
            );
            spawn_hidden_orb(
                graph,
                cell,
                position,
                0.15,
                Color::hex(0xffff88),
                Color::hex(0xffff00),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_gets_pools_on_both_sides() {
        let generator = SeaGenerator::default();
        let mut graph = SceneGraph::new();
        let mut rng = rand::rng();
        let cell = CellKey::new(0, 0);

        generator.generate(cell, Vec2::ZERO, &mut graph, &Palette::new(), &mut rng);

        // floor + embankment + 2x (pool volume, surface, rim) + 3 orbs = 11,
        // plus at most one bonus orb.
        let count = graph.cell_props(cell).len();
        assert!((11..=12).contains(&count), "got {count} props");
    }

    #[test]
    fn drifting_orbs_spin() {
        let generator = SeaGenerator::default();
        let mut graph = SceneGraph::new();
        let mut rng = rand::rng();

        generator.generate(
            CellKey::new(0, 0),
            Vec2::ZERO,
            &mut graph,
            &Palette::new(),
            &mut rng,
        );

        let spinning = graph.props().filter(|(_, p)| p.spin).count();
        assert_eq!(spinning, 3);
    }

    #[test]
    fn palette_water_overrides_fallback() {
        let generator = SeaGenerator::default();
        let mut graph = SceneGraph::new();
        let mut rng = rand::rng();
        let mut palette = Palette::new();
        let custom = Material::flat(Color::hex(0x112233));
        palette.insert(PaletteSlot::Water, custom);

        generator.generate(CellKey::new(0, 0), Vec2::ZERO, &mut graph, &palette, &mut rng);

        let used_custom = graph.props().any(|(_, p)| match p.kind {
            crate::graph::PropKind::Mesh { material, .. } => material == custom,
            _ => false,
        });
        assert!(used_custom);
    }
}
