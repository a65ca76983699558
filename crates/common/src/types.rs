use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a prop in a scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PropId(pub Uuid);

impl PropId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PropId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity of one cell of the infinite streaming grid.
///
/// Stores the integer cell indices (floor of position / cell size per axis),
/// so equality and hashing are exact for every representable position. The
/// derived `Ord` compares x before z. World-space origins are recovered
/// through a grid that knows the cell size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellKey {
    pub x: i32,
    pub z: i32,
}

impl CellKey {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

/// Linear RGB color with f32 components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Decode a 0xRRGGBB hex color.
    pub fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as f32 / 255.0,
            g: ((rgb >> 8) & 0xff) as f32 / 255.0,
            b: (rgb & 0xff) as f32 / 255.0,
        }
    }

    /// Build a color from hue/saturation/lightness, each in [0, 1].
    /// Hue wraps; out-of-range saturation and lightness are clamped.
    pub fn hsl(h: f32, s: f32, l: f32) -> Self {
        let h = h.rem_euclid(1.0);
        let s = s.clamp(0.0, 1.0);
        let l = l.clamp(0.0, 1.0);

        if s == 0.0 {
            return Self { r: l, g: l, b: l };
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        Self {
            r: hue_channel(p, q, h + 1.0 / 3.0),
            g: hue_channel(p, q, h),
            b: hue_channel(p, q, h - 1.0 / 3.0),
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

fn hue_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prop_id_uniqueness() {
        let a = PropId::new();
        let b = PropId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn cell_key_orders_x_before_z() {
        let mut keys = vec![
            CellKey::new(1, 0),
            CellKey::new(0, 5),
            CellKey::new(0, -1),
            CellKey::new(-1, 9),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                CellKey::new(-1, 9),
                CellKey::new(0, -1),
                CellKey::new(0, 5),
                CellKey::new(1, 0),
            ]
        );
    }

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn transform_at_keeps_identity_rotation() {
        let t = Transform::at(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.rotation, Quat::IDENTITY);
    }

    #[test]
    fn color_hex_decodes_channels() {
        let c = Color::hex(0xff8000);
        assert!((c.r - 1.0).abs() < 1e-6);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert!(c.b.abs() < 1e-6);
    }

    #[test]
    fn color_hsl_primary_red() {
        let c = Color::hsl(0.0, 1.0, 0.5);
        assert!((c.r - 1.0).abs() < 1e-6);
        assert!(c.g.abs() < 1e-6);
        assert!(c.b.abs() < 1e-6);
    }

    #[test]
    fn color_hsl_zero_saturation_is_gray() {
        let c = Color::hsl(0.42, 0.0, 0.6);
        assert_eq!(c.r, c.g);
        assert_eq!(c.g, c.b);
    }

    #[test]
    fn color_hsl_hue_wraps() {
        let a = Color::hsl(0.25, 0.7, 0.6);
        let b = Color::hsl(1.25, 0.7, 0.6);
        assert_eq!(a, b);
    }
}
