use glam::{Vec2, Vec3};
use liminal_common::CellKey;

/// Maps world positions onto the infinite streaming grid.
///
/// Cells are half-open `cell_size` squares on the XZ plane; the Y axis never
/// affects cell assignment. Generated geometry for a key extends from the
/// key's origin toward negative z.
#[derive(Debug, Clone, Copy)]
pub struct CellGrid {
    cell_size: f32,
}

impl CellGrid {
    pub fn new(cell_size: f32) -> Self {
        assert!(cell_size > 0.0, "cell_size must be positive");
        Self { cell_size }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Key of the cell containing `position`. Total and deterministic: any
    /// perturbation that stays within one cell maps to the same key, and
    /// axis-adjacent cells differ by exactly one on exactly one axis.
    pub fn key_of(&self, position: Vec3) -> CellKey {
        CellKey {
            x: (position.x / self.cell_size).floor() as i32,
            z: (position.z / self.cell_size).floor() as i32,
        }
    }

    /// World-space origin of `key`: the corner with the smallest x and z.
    pub fn origin_of(&self, key: CellKey) -> Vec2 {
        Vec2::new(
            key.x as f32 * self.cell_size,
            key.z as f32 * self.cell_size,
        )
    }
}

/// All keys within `radius` cells of `center` inclusive, in row-major order.
pub(crate) fn keys_within(center: CellKey, radius: i32) -> Vec<CellKey> {
    let side = (2 * radius + 1) as usize;
    let mut keys = Vec::with_capacity(side * side);
    for dx in -radius..=radius {
        for dz in -radius..=radius {
            keys.push(CellKey::new(center.x + dx, center.z + dz));
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_of_floors_toward_negative_infinity() {
        let grid = CellGrid::new(20.0);

        assert_eq!(grid.key_of(Vec3::new(10.0, 0.0, 10.0)), CellKey::new(0, 0));
        assert_eq!(grid.key_of(Vec3::new(20.0, 0.0, -5.0)), CellKey::new(1, -1));
        assert_eq!(
            grid.key_of(Vec3::new(-0.1, 0.0, -20.0)),
            CellKey::new(-1, -1)
        );
    }

    #[test]
    fn key_of_ignores_height() {
        let grid = CellGrid::new(20.0);
        let low = grid.key_of(Vec3::new(5.0, 0.0, 5.0));
        let high = grid.key_of(Vec3::new(5.0, 300.0, 5.0));
        assert_eq!(low, high);
    }

    #[test]
    fn positions_in_same_cell_share_a_key() {
        let grid = CellGrid::new(20.0);
        let a = grid.key_of(Vec3::new(1.0, 0.0, 1.0));
        let b = grid.key_of(Vec3::new(19.9, 5.0, 19.9));
        assert_eq!(a, b);
    }

    #[test]
    fn cell_boundary_belongs_to_the_next_cell() {
        let grid = CellGrid::new(20.0);
        assert_eq!(grid.key_of(Vec3::new(19.999, 0.0, 0.0)), CellKey::new(0, 0));
        assert_eq!(grid.key_of(Vec3::new(20.0, 0.0, 0.0)), CellKey::new(1, 0));
    }

    #[test]
    fn origin_round_trips_through_key() {
        let grid = CellGrid::new(20.0);
        let key = CellKey::new(3, -2);
        let origin = grid.origin_of(key);

        assert_eq!(origin, Vec2::new(60.0, -40.0));
        assert_eq!(grid.key_of(Vec3::new(origin.x, 0.0, origin.y)), key);
    }

    #[test]
    fn keys_within_covers_the_square_neighborhood() {
        let center = CellKey::new(2, -1);
        let keys = keys_within(center, 1);

        assert_eq!(keys.len(), 9);
        assert!(keys.contains(&center));
        assert!(keys.contains(&CellKey::new(1, -2)));
        assert!(keys.contains(&CellKey::new(3, 0)));
    }

    #[test]
    fn keys_within_radius_zero_is_just_the_center() {
        let center = CellKey::new(0, 0);
        assert_eq!(keys_within(center, 0), vec![center]);
    }

    #[test]
    #[should_panic(expected = "cell_size must be positive")]
    fn zero_cell_size_is_rejected() {
        CellGrid::new(0.0);
    }
}
