use std::f32::consts::{FRAC_PI_2, TAU};

use glam::{EulerRot, Quat, Vec2, Vec3};
use liminal_common::{CellKey, Color};
use rand::{Rng, RngCore};

use crate::generate::{AreaGenerator, spawn_hidden_orb};
use crate::graph::{Prop, PropShape, SceneGraph};
use crate::material::{Material, Palette, PaletteSlot};

/// Structural knobs for dream-core flower gallery cells.
#[derive(Debug, Clone)]
pub struct GalleryParams {
    pub depth: f32,
    pub meadow_width: f32,
    pub walkway_width: f32,
    pub canopy_height: f32,
    pub pillar_spacing: f32,
    pub shape_count: usize,
    pub light_count: usize,
    pub bonus_chance: f64,
}

impl Default for GalleryParams {
    fn default() -> Self {
        Self {
            depth: 20.0,
            meadow_width: 100.0,
            walkway_width: 6.0,
            canopy_height: 4.0,
            pillar_spacing: 5.0,
            shape_count: 8,
            light_count: 5,
            bonus_chance: 0.25,
        }
    }
}

/// Dream core: a colonnaded walkway through an open meadow, scattered with
/// tumbling pastel solids and tinted lights.
#[derive(Debug, Default)]
pub struct GalleryGenerator {
    pub params: GalleryParams,
}

impl AreaGenerator for GalleryGenerator {
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

        let meadow = palette.resolve(PaletteSlot::Meadow, Material::flat(Color::hex(0xccffcc)));
        let walkway = palette.resolve(PaletteSlot::Walkway, Material::flat(Color::hex(0xffffcc)));
        let canopy = palette.resolve(
            PaletteSlot::Canopy,
            Material {
                opacity: 0.9,
                ..Material::flat(Color::WHITE)
            },
        );
        let pillar = palette.resolve(PaletteSlot::Pillar, Material::flat(Color::hex(0xdddddd)));

        graph.spawn(
            Prop::mesh(
                Vec3::new(x, 0.0, mid_z),
                PropShape::Plane {
                    width: p.meadow_width,
                    height: p.depth,
                },
                meadow,
            )
            .rotated(Quat::from_rotation_x(-FRAC_PI_2))
            .tagged(cell),
        );
        graph.spawn(
            Prop::mesh(
                Vec3::new(x, 0.0, mid_z),
                PropShape::Plane {
                    width: p.walkway_width,
                    height: p.depth,
                },
                walkway,
            )
            .rotated(Quat::from_rotation_x(-FRAC_PI_2))
            .tagged(cell),
        );
        graph.spawn(
            Prop::mesh(
                Vec3::new(x, p.canopy_height, mid_z),
                PropShape::Plane {
                    width: p.walkway_width,
                    height: p.depth,
                },
                canopy,
            )
            .rotated(Quat::from_rotation_x(FRAC_PI_2))
            .tagged(cell),
        );

        // Two rows of pillars, half a unit in from the walkway edges.
        let pillar_count = (p.depth / p.pillar_spacing) as usize + 1;
        for row in 0..2 {
            let px = if row == 0 {
                x - p.walkway_width / 2.0 + 0.5
            } else {
                x + p.walkway_width / 2.0 - 0.5
            };
            for j in 0..pillar_count {
                graph.spawn(
                    Prop::mesh(
                        Vec3::new(
                            px,
                            p.canopy_height / 2.0,
                            mid_z + j as f32 * p.pillar_spacing,
                        ),
                        PropShape::Cylinder {
                            radius_top: 0.2,
                            radius_bottom: 0.2,
                            height: p.canopy_height,
                        },
                        pillar,
                    )
                    .tagged(cell),
                );
            }
        }

        for _ in 0..p.shape_count {
            let shape = match rng.random_range(0..4) {
                0 => PropShape::Box {
                    size: Vec3::new(
                        rng.random_range(1.0..3.0),
                        rng.random_range(1.0..3.0),
                        rng.random_range(1.0..3.0),
                    ),
                },
                1 => PropShape::Sphere {
                    radius: rng.random_range(0.5..1.5),
                },
                2 => PropShape::Cylinder {
                    radius_top: rng.random_range(0.3..1.0),
                    radius_bottom: rng.random_range(0.3..1.0),
                    height: rng.random_range(1.0..3.0),
                },
                _ => PropShape::Cone {
                    radius: rng.random_range(0.5..1.3),
                    height: rng.random_range(1.5..3.0),
                },
            };
            let material = Material {
                opacity: 0.8,
                metalness: 0.3,
                roughness: 0.2,
                ..Material::flat(Color::hsl(rng.random_range(0.0..1.0), 0.7, 0.6))
            };
            let position = Vec3::new(
                x + rng.random_range(-15.0..15.0),
                rng.random_range(1.0..6.0),
                mid_z + rng.random_range(0.0..p.depth),
            );
            let rotation = Quat::from_euler(
                EulerRot::XYZ,
                rng.random_range(0.0..TAU),
                rng.random_range(0.0..TAU),
                rng.random_range(0.0..TAU),
            );
            graph.spawn(
                Prop::mesh(position, shape, material)
                    .rotated(rotation)
                    .spinning()
                    .tagged(cell),
            );
        }

        for _ in 0..p.light_count {
            let position = Vec3::new(
                x + rng.random_range(-20.0..20.0),
                rng.random_range(2.0..5.0),
                mid_z + rng.random_range(0.0..p.depth),
            );
            let color = Color::rgb(rng.random(), rng.random(), rng.random());
            graph.spawn(Prop::point_light(position, color, 0.5, 15.0).tagged(cell));
        }

        if rng.random_bool(p.bonus_chance) {
            let position = Vec3::new(
                x + rng.random_range(-5.0..5.0),
                2.0,
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
    use crate::graph::PropKind;

    #[test]
    fn cell_gets_colonnade_and_decor() {
        let generator = GalleryGenerator::default();
        let mut graph = SceneGraph::new();
        let mut rng = rand::rng();
        let cell = CellKey::new(0, 0);

        generator.generate(cell, Vec2::ZERO, &mut graph, &Palette::new(), &mut rng);

        // meadow + walkway + canopy + 10 pillars + 8 shapes + 5 lights = 26,
        // plus at most one bonus orb.
        let count = graph.cell_props(cell).len();
        assert!((26..=27).contains(&count), "got {count} props");
    }

    #[test]
    fn decorative_shapes_all_spin() {
        let generator = GalleryGenerator::default();
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
        assert_eq!(spinning, 8);
    }

    #[test]
    fn tinted_lights_do_not_flicker() {
        let generator = GalleryGenerator::default();
        let mut graph = SceneGraph::new();
        let mut rng = rand::rng();

        generator.generate(
            CellKey::new(0, 0),
            Vec2::ZERO,
            &mut graph,
            &Palette::new(),
            &mut rng,
        );

        for (_, prop) in graph.props() {
            if matches!(prop.kind, PropKind::PointLight { .. }) {
                assert!(prop.flicker.is_none());
            }
        }
    }
}
