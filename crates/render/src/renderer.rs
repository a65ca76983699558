use glam::Vec3;
use liminal_common::CellKey;
use liminal_scene::SceneGraph;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Eye position in world space.
    pub eye: Vec3,
    /// Point the eye is looking at.
    pub target: Vec3,
    /// Field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 1.6, 5.0),
            target: Vec3::new(0.0, 1.6, 0.0),
            fov_degrees: 75.0,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// A renderer reads the active variant's graph and a view configuration,
/// then produces output. It never mutates the graph; graph truth belongs
/// to the streaming layer.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given graph and view.
    fn render(&self, graph: &SceneGraph, view: &RenderView) -> Self::Output;
}

/// Top-down ASCII map of the streamed cell neighborhood.
///
/// One character per cell: `@` is the cell under the eye, `#` a loaded
/// cell, `.` an empty one. North (-Z) is the top row. Useful for CLI
/// output, logging, and exercising the render interface headlessly.
#[derive(Debug, Clone, Copy)]
pub struct TopDownTextRenderer {
    cell_size: f32,
    /// Map half-width, in cells.
    radius: i32,
}

impl TopDownTextRenderer {
    pub fn new(cell_size: f32, radius: i32) -> Self {
        assert!(cell_size > 0.0, "cell size must be positive");
        assert!(radius >= 0, "radius must be non-negative");
        Self { cell_size, radius }
    }
}

impl Default for TopDownTextRenderer {
    fn default() -> Self {
        Self::new(20.0, 5)
    }
}

impl Renderer for TopDownTextRenderer {
    type Output = String;

    fn render(&self, graph: &SceneGraph, view: &RenderView) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Scene Map (cells={}, props={}) ===\n",
            graph.cell_count(),
            graph.prop_count()
        ));
        out.push_str(&format!(
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}\n",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        ));
        out.push_str("Legend: @ viewpoint, # loaded cell\n");

        let eye_x = (view.eye.x / self.cell_size).floor() as i32;
        let eye_z = (view.eye.z / self.cell_size).floor() as i32;
        for z in (eye_z - self.radius)..=(eye_z + self.radius) {
            for x in (eye_x - self.radius)..=(eye_x + self.radius) {
                let key = CellKey::new(x, z);
                let glyph = if x == eye_x && z == eye_z {
                    '@'
                } else if !graph.cell_props(key).is_empty() {
                    '#'
                } else {
                    '.'
                };
                out.push(glyph);
            }
            out.push('\n');
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use liminal_common::Color;
    use liminal_scene::{Material, Prop, PropShape};

    fn boxy(cell: CellKey) -> Prop {
        Prop::mesh(
            Vec3::ZERO,
            PropShape::Box { size: Vec3::ONE },
            Material::flat(Color::WHITE),
        )
        .tagged(cell)
    }

    #[test]
    fn empty_graph_still_marks_the_eye() {
        let graph = SceneGraph::default();
        let renderer = TopDownTextRenderer::default();
        let output = renderer.render(&graph, &RenderView::default());

        assert!(output.contains("cells=0"));
        assert_eq!(output.matches('@').count(), 1);
        assert_eq!(output.matches('#').count(), 0);
    }

    #[test]
    fn loaded_cells_show_up_on_the_map() {
        let mut graph = SceneGraph::default();
        graph.spawn(boxy(CellKey::new(1, 0)));
        graph.spawn(boxy(CellKey::new(0, -2)));
        // Same cell as the default eye; hidden behind the @ marker.
        graph.spawn(boxy(CellKey::new(0, 0)));

        let renderer = TopDownTextRenderer::default();
        let output = renderer.render(&graph, &RenderView::default());

        assert!(output.contains("cells=3"));
        assert_eq!(output.matches('#').count(), 2);
        assert_eq!(output.matches('@').count(), 1);
    }

    #[test]
    fn render_view_default_matches_the_entry_pose() {
        let view = RenderView::default();
        assert_eq!(view.fov_degrees, 75.0);
        assert_eq!(view.eye, Vec3::new(0.0, 1.6, 5.0));
        assert_eq!(view.target, Vec3::new(0.0, 1.6, 0.0));
    }
}
