//! Rendering Adapter: renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers cannot mutate the scene graph; graph truth belongs to the
//!   streaming layer.
//! - Render state derives from the graph and the view, nothing else.
//!
//! Provides a trait-based renderer interface with a top-down text renderer
//! for headless use. The trait is stable; the wgpu implementation lives in
//! its own crate and plugs in without changing consumers.

mod renderer;

pub use renderer::{RenderView, Renderer, TopDownTextRenderer};

pub fn crate_info() -> &'static str {
    "liminal-render v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("render"));
    }
}
