use glam::{Mat4, Vec3};
use liminal_render::RenderView;

/// Surface-derived projection parameters. The field of view rides on the
/// [`RenderView`]; only what the window geometry dictates lives here.
#[derive(Debug, Clone, Copy)]
pub struct Projection {
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Projection {
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn view_projection(&self, view: &RenderView) -> Mat4 {
        let projection =
            Mat4::perspective_rh(view.fov_degrees.to_radians(), self.aspect, self.near, self.far);
        let look = Mat4::look_at_rh(view.eye, view.target, Vec3::Y);
        projection * look
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_projection_yields_finite_matrices() {
        let projection = Projection::default();
        let vp = projection.view_projection(&RenderView::default());
        for col in 0..4 {
            assert!(vp.col(col).is_finite());
        }
    }

    #[test]
    fn resize_updates_aspect() {
        let mut projection = Projection::default();
        projection.resize(800, 400);
        assert_eq!(projection.aspect, 2.0);
        // A zero-height surface must not divide by zero.
        projection.resize(800, 0);
        assert_eq!(projection.aspect, 800.0);
    }
}
