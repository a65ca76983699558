//! Scene variants: material palettes, prop graphs, and the procedural
//! generators that fill grid cells with themed geometry.
//!
//! # Invariants
//! - A variant's generated-cell set and its graph's cell index stay in
//!   lockstep; all cell churn flows through the variant's generate and evict
//!   operations.
//! - Variants are created once at startup and persist for the process
//!   lifetime; switching only toggles visibility.

pub mod generate;
pub mod graph;
pub mod material;
pub mod registry;

pub use generate::AreaGenerator;
pub use graph::{Flicker, Prop, PropKind, PropShape, SceneGraph};
pub use material::{Material, Palette, PaletteSlot};
pub use registry::{
    RegistryError, SCENE_CONFIGS, SceneConfig, SceneInfo, SceneKind, SceneRegistry, SceneVariant,
};

pub fn crate_info() -> &'static str {
    "liminal-scene v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("scene"));
    }
}
