use std::collections::VecDeque;

use glam::Vec2;
use liminal_common::Color;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Peak pixel offset toward the cursor.
const MAX_OFFSET: f32 = 25.0;
const MAX_EXTRA_SCALE: f32 = 0.3;
const MAX_ROTATION_DEG: f32 = 8.0;
const MAX_ALPHA: f32 = 0.6;
/// Seconds before a trail particle fades out.
const TRAIL_TTL: f32 = 0.8;
const TRAIL_SIZE: f32 = 30.0;
const BURST_PARTICLES: usize = 5;

/// High-saturation pool the cursor trails draw their gradients from.
const TRAIL_COLORS: [u32; 10] = [
    0xff0000, 0x00ff00, 0x0000ff, 0xffff00, 0xff00ff, 0x00ffff, 0xffffff, 0xff6600, 0x9900ff,
    0x00ff99,
];
const BURST_COLORS: [u32; 6] = [0xff0000, 0x00ff00, 0x0000ff, 0xffff00, 0xff00ff, 0x00ffff];

/// Backdrop density and reach, loadable from the runtime tuning file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackdropConfig {
    /// Edge length of one checker cell, in pixels.
    pub cell_size_px: f32,
    /// Distance inside which the cursor bends the grid, in pixels.
    pub influence_radius: f32,
    /// Oldest trail particles drop out past this count.
    pub max_trails: usize,
}

impl Default for BackdropConfig {
    fn default() -> Self {
        Self {
            cell_size_px: 80.0,
            influence_radius: 250.0,
            max_trails: 20,
        }
    }
}

/// Deformation the renderer applies to one checker cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellDeform {
    /// Pixel offset toward the cursor.
    pub offset: Vec2,
    pub scale: f32,
    pub rotation_deg: f32,
    pub alpha: f32,
}

impl CellDeform {
    const REST: Self = Self {
        offset: Vec2::ZERO,
        scale: 1.0,
        rotation_deg: 0.0,
        alpha: 0.0,
    };
}

/// One trail or burst particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Trail {
    pub position: Vec2,
    pub size: f32,
    pub inner: Color,
    pub outer: Color,
    pub angle_deg: f32,
    age: f32,
}

impl Trail {
    /// Remaining life as a 1 → 0 fade factor.
    pub fn fade(&self) -> f32 {
        (1.0 - self.age / TRAIL_TTL).clamp(0.0, 1.0)
    }
}

/// The checkerboard field behind the menu: cell deformation around the
/// cursor plus a capped queue of trail particles.
///
/// Pure state and math; the desktop app draws it.
#[derive(Debug, Clone)]
pub struct Backdrop {
    config: BackdropConfig,
    cols: usize,
    rows: usize,
    hues: Vec<f32>,
    cursor: Option<Vec2>,
    trails: VecDeque<Trail>,
}

impl Backdrop {
    pub fn new(config: BackdropConfig) -> Self {
        Self {
            config,
            cols: 0,
            rows: 0,
            hues: Vec::new(),
            cursor: None,
            trails: VecDeque::new(),
        }
    }

    pub fn config(&self) -> BackdropConfig {
        self.config
    }

    /// Rebuilds the grid for a window size. One cell of overhang is kept on
    /// every edge so deformed cells never expose the window border.
    pub fn resize(&mut self, width: f32, height: f32, rng: &mut dyn RngCore) {
        self.cols = (width / self.config.cell_size_px).ceil() as usize + 2;
        self.rows = (height / self.config.cell_size_px).ceil() as usize + 2;
        self.hues = (0..self.cols * self.rows)
            .map(|_| rng.random::<f32>())
            .collect();
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Center of cell `(col, row)` in window pixels.
    pub fn cell_center(&self, col: usize, row: usize) -> Vec2 {
        let size = self.config.cell_size_px;
        Vec2::new(
            (col as f32 - 1.0) * size + size / 2.0,
            (row as f32 - 1.0) * size + size / 2.0,
        )
    }

    /// Tint hue for cell `(col, row)`, fixed at resize.
    pub fn hue(&self, col: usize, row: usize) -> f32 {
        self.hues
            .get(row * self.cols + col)
            .copied()
            .unwrap_or_default()
    }

    /// Moves the cursor and sheds one trail particle at its position.
    pub fn move_cursor(&mut self, position: Vec2, rng: &mut dyn RngCore) {
        self.cursor = Some(position);
        let inner = TRAIL_COLORS[rng.random_range(0..TRAIL_COLORS.len())];
        let outer = TRAIL_COLORS[rng.random_range(0..TRAIL_COLORS.len())];
        self.push_trail(Trail {
            position,
            size: TRAIL_SIZE,
            inner: Color::hex(inner),
            outer: Color::hex(outer),
            angle_deg: rng.random_range(0.0..360.0),
            age: 0.0,
        });
    }

    /// Spawns a burst of particles at a click.
    pub fn click(&mut self, position: Vec2, rng: &mut dyn RngCore) {
        for _ in 0..BURST_PARTICLES {
            let color = Color::hex(BURST_COLORS[rng.random_range(0..BURST_COLORS.len())]);
            self.push_trail(Trail {
                position,
                size: rng.random_range(20.0..60.0),
                inner: color,
                outer: color,
                angle_deg: rng.random_range(0.0..360.0),
                age: 0.0,
            });
        }
    }

    fn push_trail(&mut self, trail: Trail) {
        while self.trails.len() >= self.config.max_trails {
            self.trails.pop_front();
        }
        self.trails.push_back(trail);
    }

    /// Ages trail particles, dropping the expired ones.
    pub fn tick(&mut self, dt: f32) {
        for trail in &mut self.trails {
            trail.age += dt;
        }
        self.trails.retain(|trail| trail.age < TRAIL_TTL);
    }

    pub fn trails(&self) -> impl Iterator<Item = &Trail> {
        self.trails.iter()
    }

    pub fn trail_count(&self) -> usize {
        self.trails.len()
    }

    /// Deformation for a cell centered at `center`: intensity falls off
    /// linearly from 1 at the cursor to 0 at the influence radius.
    pub fn deform_at(&self, center: Vec2) -> CellDeform {
        let Some(cursor) = self.cursor else {
            return CellDeform::REST;
        };
        let delta = cursor - center;
        let distance = delta.length();
        if distance >= self.config.influence_radius {
            return CellDeform::REST;
        }
        let intensity = 1.0 - distance / self.config.influence_radius;
        let direction = if distance > f32::EPSILON {
            delta / distance
        } else {
            Vec2::ZERO
        };
        CellDeform {
            offset: direction * intensity * MAX_OFFSET,
            scale: 1.0 + intensity * MAX_EXTRA_SCALE,
            rotation_deg: intensity * MAX_ROTATION_DEG,
            alpha: intensity * MAX_ALPHA,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn backdrop() -> (Backdrop, StdRng) {
        (Backdrop::new(BackdropConfig::default()), StdRng::seed_from_u64(7))
    }

    #[test]
    fn deformation_fades_linearly_with_distance() {
        let (mut field, mut rng) = backdrop();
        field.move_cursor(Vec2::new(500.0, 500.0), &mut rng);

        let under_cursor = field.deform_at(Vec2::new(500.0, 500.0));
        assert!((under_cursor.alpha - 0.6).abs() < 1e-6);
        assert!((under_cursor.scale - 1.3).abs() < 1e-6);
        assert_eq!(under_cursor.offset, Vec2::ZERO);

        let halfway = field.deform_at(Vec2::new(500.0, 375.0));
        assert!((halfway.alpha - 0.3).abs() < 1e-6);
        assert!((halfway.offset.length() - 12.5).abs() < 1e-4);
        assert!((halfway.rotation_deg - 4.0).abs() < 1e-4);

        let outside = field.deform_at(Vec2::new(500.0, 100.0));
        assert_eq!(outside, CellDeform::REST);
    }

    #[test]
    fn offset_points_toward_the_cursor() {
        let (mut field, mut rng) = backdrop();
        field.move_cursor(Vec2::new(200.0, 100.0), &mut rng);
        let deform = field.deform_at(Vec2::new(100.0, 100.0));
        assert!(deform.offset.x > 0.0);
        assert!(deform.offset.y.abs() < 1e-6);
    }

    #[test]
    fn idle_field_is_at_rest() {
        let (field, _) = backdrop();
        assert_eq!(field.deform_at(Vec2::new(10.0, 10.0)), CellDeform::REST);
    }

    #[test]
    fn trail_queue_drops_the_oldest_first() {
        let (mut field, mut rng) = backdrop();
        for i in 0..25 {
            field.move_cursor(Vec2::new(i as f32, 0.0), &mut rng);
        }
        assert_eq!(field.trail_count(), 20);
        let front = field.trails().next().unwrap();
        assert_eq!(front.position.x, 5.0);
    }

    #[test]
    fn trails_expire_after_their_ttl() {
        let (mut field, mut rng) = backdrop();
        field.move_cursor(Vec2::ZERO, &mut rng);
        field.tick(0.5);
        assert_eq!(field.trail_count(), 1);
        assert!(field.trails().next().unwrap().fade() > 0.0);
        field.tick(0.4);
        assert_eq!(field.trail_count(), 0);
    }

    #[test]
    fn clicks_burst_five_particles() {
        let (mut field, mut rng) = backdrop();
        field.click(Vec2::new(50.0, 50.0), &mut rng);
        assert_eq!(field.trail_count(), 5);
        for trail in field.trails() {
            assert!(trail.size >= 20.0 && trail.size < 60.0);
            assert_eq!(trail.inner, trail.outer);
        }
    }

    #[test]
    fn resize_populates_the_overhung_grid() {
        let (mut field, mut rng) = backdrop();
        field.resize(800.0, 600.0, &mut rng);
        assert_eq!(field.cols(), 12);
        assert_eq!(field.rows(), 10);
        for row in 0..field.rows() {
            for col in 0..field.cols() {
                let hue = field.hue(col, row);
                assert!((0.0..1.0).contains(&hue));
            }
        }
        // First cell hangs past the top-left corner.
        assert_eq!(field.cell_center(0, 0), Vec2::new(-40.0, -40.0));
    }
}
