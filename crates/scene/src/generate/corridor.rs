use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec2, Vec3};
use liminal_common::{CellKey, Color};
use rand::{Rng, RngCore};

use crate::generate::{AreaGenerator, spawn_hidden_orb};
use crate::graph::{Flicker, Prop, PropShape, SceneGraph};
use crate::material::{Material, Palette, PaletteSlot};

/// Structural knobs for backrooms-style corridor cells.
#[derive(Debug, Clone)]
pub struct CorridorParams {
    pub width: f32,
    /// Z extent of one cell's geometry; keep equal to the streaming cell size
    /// so consecutive cells tile seamlessly.
    pub depth: f32,
    pub wall_height: f32,
    pub door_count: usize,
    pub light_spacing: f32,
    pub light_range: f32,
    pub orb_chance: f64,
}

impl Default for CorridorParams {
    fn default() -> Self {
        Self {
            width: 20.0,
            depth: 20.0,
            wall_height: 3.0,
            door_count: 2,
            light_spacing: 5.0,
            light_range: 10.0,
            orb_chance: 0.3,
        }
    }
}

/// Endless corridor: floor and ceiling planes, side walls, doors with
/// handles on random sides, a row of buzzing ceiling lights.
#[derive(Debug, Default)]
pub struct CorridorGenerator {
    pub params: CorridorParams,
}

impl AreaGenerator for CorridorGenerator {
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

        let wall = palette.resolve(PaletteSlot::Wall, Material::flat(Color::hex(0x999999)));
        let floor = palette.resolve(PaletteSlot::Floor, Material::flat(Color::hex(0x777777)));
        let ceiling = palette.resolve(PaletteSlot::Ceiling, Material::flat(Color::hex(0x888888)));

        graph.spawn(
            Prop::mesh(
                Vec3::new(x, 0.0, mid_z),
                PropShape::Plane {
                    width: p.width,
                    height: p.depth,
                },
                floor,
            )
            .rotated(Quat::from_rotation_x(-FRAC_PI_2))
            .tagged(cell),
        );
        graph.spawn(
            Prop::mesh(
                Vec3::new(x, p.wall_height, mid_z),
                PropShape::Plane {
                    width: p.width,
                    height: p.depth,
                },
                ceiling,
            )
            .rotated(Quat::from_rotation_x(FRAC_PI_2))
            .tagged(cell),
        );

        let half_width = p.width / 2.0;
        graph.spawn(
            Prop::mesh(
                Vec3::new(x - half_width, p.wall_height / 2.0, mid_z),
                PropShape::Plane {
                    width: p.depth,
                    height: p.wall_height,
                },
                wall,
            )
            .rotated(Quat::from_rotation_y(FRAC_PI_2))
            .tagged(cell),
        );
        graph.spawn(
            Prop::mesh(
                Vec3::new(x + half_width, p.wall_height / 2.0, mid_z),
                PropShape::Plane {
                    width: p.depth,
                    height: p.wall_height,
                },
                wall,
            )
            .rotated(Quat::from_rotation_y(-FRAC_PI_2))
            .tagged(cell),
        );

        // Doors sit just inside the walls, each on a random side, with a
        // handle sphere offset toward the corridor center.
        let door_offset = half_width - 2.0;
        for i in 0..p.door_count {
            let on_right = rng.random_bool(0.5);
            let door_x = x + if on_right { door_offset } else { -door_offset };
            let door_z = z - i as f32 * (p.depth / 2.0);

            graph.spawn(
                Prop::mesh(
                    Vec3::new(door_x, 1.25, door_z),
                    PropShape::Box {
                        size: Vec3::new(1.5, 2.5, 0.1),
                    },
                    Material::flat(Color::hex(0x555555)),
                )
                .tagged(cell),
            );

            let handle_x = door_x + if on_right { -0.5 } else { 0.5 };
            graph.spawn(
                Prop::mesh(
                    Vec3::new(handle_x, 1.25, door_z - 0.05),
                    PropShape::Sphere { radius: 0.05 },
                    Material::flat(Color::hex(0xaaaaaa)),
                )
                .tagged(cell),
            );
        }

        let light_count = (p.depth / p.light_spacing) as usize;
        for i in 0..light_count {
            let position = Vec3::new(x, p.wall_height - 0.2, z - i as f32 * p.light_spacing);
            let intensity = rng.random_range(0.8..1.2);
            graph.spawn(
                Prop::point_light(position, Color::hex(0xccccff), intensity, p.light_range)
                    .flickering(Flicker::random(rng))
                    .tagged(cell),
            );
        }

        if rng.random_bool(p.orb_chance) {
            let position = Vec3::new(
                x + rng.random_range(-5.0..5.0),
                0.5,
                z - rng.random_range(0.0..p.depth),
            );
            spawn_hidden_orb(
                graph,
                cell,
                position,
                0.1,
                Color::hex(0xffaaaa),
                Color::hex(0xff5555),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::PropKind;

    #[test]
    fn cell_gets_structural_skeleton_plus_optional_orb() {
        let generator = CorridorGenerator::default();
        let mut graph = SceneGraph::new();
        let mut rng = rand::rng();
        let cell = CellKey::new(0, 0);

        generator.generate(cell, Vec2::ZERO, &mut graph, &Palette::new(), &mut rng);

        // floor + ceiling + 2 walls + 2 doors + 2 handles + 4 lights = 12,
        // plus at most one hidden orb.
        let count = graph.cell_props(cell).len();
        assert!((12..=13).contains(&count), "got {count} props");

        let lights = graph
            .props()
            .filter(|(_, p)| matches!(p.kind, PropKind::PointLight { .. }))
            .count();
        assert_eq!(lights, 4);
    }

    #[test]
    fn every_prop_is_tagged_with_the_cell() {
        let generator = CorridorGenerator::default();
        let mut graph = SceneGraph::new();
        let mut rng = rand::rng();
        let cell = CellKey::new(-3, 7);

        generator.generate(
            cell,
            Vec2::new(-60.0, 140.0),
            &mut graph,
            &Palette::new(),
            &mut rng,
        );

        for (_, prop) in graph.props() {
            assert_eq!(prop.cell, Some(cell));
        }
    }

    #[test]
    fn ceiling_lights_all_flicker() {
        let generator = CorridorGenerator::default();
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
                assert!(prop.flicker.is_some());
            }
        }
    }

    #[test]
    fn two_cells_do_not_share_props() {
        let generator = CorridorGenerator::default();
        let mut graph = SceneGraph::new();
        let mut rng = rand::rng();
        let a = CellKey::new(0, 0);
        let b = CellKey::new(0, -1);

        generator.generate(a, Vec2::ZERO, &mut graph, &Palette::new(), &mut rng);
        generator.generate(b, Vec2::new(0.0, -20.0), &mut graph, &Palette::new(), &mut rng);

        let before = graph.cell_props(b).len();
        graph.remove_cell(a);
        assert_eq!(graph.cell_props(b).len(), before);
        assert!(graph.cell_props(a).is_empty());
    }
}
