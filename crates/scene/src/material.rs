use std::collections::BTreeMap;

use liminal_common::Color;
use serde::{Deserialize, Serialize};

/// Named slot in a variant's shared palette.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PaletteSlot {
    Wall,
    Floor,
    Ceiling,
    Embankment,
    Water,
    Meadow,
    Walkway,
    Canopy,
    Pillar,
    Stair,
    WindowFrame,
}

/// Surface description for a mesh prop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub color: Color,
    pub emissive: Option<Color>,
    pub opacity: f32,
    pub metalness: f32,
    pub roughness: f32,
}

impl Material {
    /// Opaque matte material of the given color.
    pub fn flat(color: Color) -> Self {
        Self {
            color,
            emissive: None,
            opacity: 1.0,
            metalness: 0.0,
            roughness: 1.0,
        }
    }
}

/// Shared material palette for one scene variant, so regenerated cells
/// visually match the seed cell.
///
/// Generators look materials up through [`Palette::resolve`] with their own
/// fallback; a partially populated palette therefore never makes cell
/// generation fail.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    slots: BTreeMap<PaletteSlot, Material>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, slot: PaletteSlot, material: Material) {
        self.slots.insert(slot, material);
    }

    pub fn get(&self, slot: PaletteSlot) -> Option<Material> {
        self.slots.get(&slot).copied()
    }

    /// Material for `slot`, or `fallback` when the slot is unpopulated.
    pub fn resolve(&self, slot: PaletteSlot, fallback: Material) -> Material {
        self.slots.get(&slot).copied().unwrap_or(fallback)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_returns_inserted_material() {
        let mut palette = Palette::new();
        let wall = Material::flat(Color::hex(0x999999));
        palette.insert(PaletteSlot::Wall, wall);

        let resolved = palette.resolve(PaletteSlot::Wall, Material::flat(Color::WHITE));
        assert_eq!(resolved, wall);
    }

    #[test]
    fn resolve_falls_back_on_missing_slot() {
        let palette = Palette::new();
        let fallback = Material::flat(Color::hex(0x123456));

        let resolved = palette.resolve(PaletteSlot::Water, fallback);
        assert_eq!(resolved, fallback);
    }

    #[test]
    fn flat_material_is_opaque() {
        let m = Material::flat(Color::WHITE);
        assert_eq!(m.opacity, 1.0);
        assert!(m.emissive.is_none());
    }
}
