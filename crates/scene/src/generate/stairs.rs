use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec2, Vec3};
use liminal_common::{CellKey, Color};
use rand::{Rng, RngCore};

use crate::generate::{AreaGenerator, spawn_hidden_orb};
use crate::graph::{Prop, PropShape, SceneGraph};
use crate::material::{Material, Palette, PaletteSlot};

/// Structural knobs for endless-stairwell cells.
#[derive(Debug, Clone)]
pub struct StairsParams {
    pub depth: f32,
    pub wall_width: f32,
    pub wall_height: f32,
    pub flight_count: usize,
    pub flight_length: f32,
    /// Height gained per flight; the right-hand flight is offset by half of
    /// this so the two sides interleave.
    pub flight_rise: f32,
    pub step_count: usize,
    pub window_count: usize,
    pub light_count: usize,
    pub bonus_chance: f64,
}

impl Default for StairsParams {
    fn default() -> Self {
        Self {
            depth: 20.0,
            wall_width: 20.0,
            wall_height: 8.0,
            flight_count: 2,
            flight_length: 8.0,
            flight_rise: 1.0,
            step_count: 8,
            window_count: 4,
            light_count: 4,
            bonus_chance: 0.2,
        }
    }
}

/// Liminal stairwell: a massive back wall, interleaved left/right stair
/// flights with individual steps, and tinted windows floating on the sides.
#[derive(Debug, Default)]
pub struct StairsGenerator {
    pub params: StairsParams,
}

impl AreaGenerator for StairsGenerator {
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

        let wall = palette.resolve(PaletteSlot::Wall, Material::flat(Color::hex(0xdddddd)));
        let stair = palette.resolve(PaletteSlot::Stair, Material::flat(Color::hex(0xcccccc)));
        let frame = palette.resolve(
            PaletteSlot::WindowFrame,
            Material::flat(Color::hex(0x888888)),
        );

        graph.spawn(
            Prop::mesh(
                Vec3::new(x, p.wall_height / 2.0, mid_z),
                PropShape::Box {
                    size: Vec3::new(p.wall_width, p.wall_height, p.depth),
                },
                wall,
            )
            .tagged(cell),
        );

        let step_rise = p.flight_rise / p.step_count as f32;
        for i in 0..p.flight_count {
            let base_y = i as f32 * p.flight_rise;
            let base_z = mid_z + i as f32 * p.flight_length;

            graph.spawn(
                Prop::mesh(
                    Vec3::new(x - 6.0, base_y, base_z),
                    PropShape::Box {
                        size: Vec3::new(4.0, 0.2, p.flight_length),
                    },
                    stair,
                )
                .tagged(cell),
            );
            graph.spawn(
                Prop::mesh(
                    Vec3::new(
                        x + 6.0,
                        base_y + p.flight_rise / 2.0,
                        base_z + p.flight_length / 2.0,
                    ),
                    PropShape::Box {
                        size: Vec3::new(4.0, 0.2, p.flight_length),
                    },
                    stair,
                )
                .tagged(cell),
            );

            for j in 0..p.step_count {
                let step = PropShape::Box {
                    size: Vec3::new(4.0, 0.2, 0.8),
                };
                graph.spawn(
                    Prop::mesh(
                        Vec3::new(x - 6.0, base_y + j as f32 * step_rise, base_z + j as f32),
                        step,
                        stair,
                    )
                    .tagged(cell),
                );
                graph.spawn(
                    Prop::mesh(
                        Vec3::new(
                            x + 6.0,
                            base_y + p.flight_rise / 2.0 + j as f32 * step_rise,
                            base_z + p.flight_length / 2.0 + j as f32,
                        ),
                        step,
                        stair,
                    )
                    .tagged(cell),
                );
            }
        }

        // Windows alternate sides; the glass faces inward from whichever
        // side of the world origin it landed on.
        for i in 0..p.window_count {
            let wx = if i % 2 == 0 {
                x - p.wall_width / 2.0
            } else {
                x + p.wall_width / 2.0
            };
            let wy = rng.random_range(1.0..7.0);
            let wz = mid_z + rng.random_range(0.0..p.depth);

            graph.spawn(
                Prop::mesh(
                    Vec3::new(wx, wy, wz),
                    PropShape::Box {
                        size: Vec3::new(0.2, 2.0, 2.0),
                    },
                    frame,
                )
                .tagged(cell),
            );

            let glass = Material {
                opacity: 0.8,
                ..Material::flat(Color::hsl(rng.random_range(0.0..1.0), 0.7, 0.6))
            };
            let yaw = if wx > 0.0 { FRAC_PI_2 } else { -FRAC_PI_2 };
            graph.spawn(
                Prop::mesh(
                    Vec3::new(wx, wy, wz),
                    PropShape::Plane {
                        width: 1.8,
                        height: 1.8,
                    },
                    glass,
                )
                .rotated(Quat::from_rotation_y(yaw))
                .tagged(cell),
            );
        }

        for _ in 0..p.light_count {
            let position = Vec3::new(
                x + rng.random_range(-5.0..5.0),
                rng.random_range(1.0..7.0),
                mid_z + rng.random_range(0.0..p.depth),
            );
            graph.spawn(Prop::point_light(position, Color::hex(0x88ccff), 0.6, 15.0).tagged(cell));
        }

        if rng.random_bool(p.bonus_chance) {
            let position = Vec3::new(
                x + rng.random_range(-5.0..5.0),
                5.0,
                z - rng.random_range(0.0..p.depth),
            );
            spawn_hidden_orb(
                graph,
                cell,
                position,
                0.2,
                Color::hex(0x88ff88),
                Color::hex(0x00ff00),
            );
        }
    }
}
