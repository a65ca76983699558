use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::action::{InputState, MoveKey, ViewInput};

/// Hard limit on vertical look, just short of straight up or down.
const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.1;
/// Fraction of the remaining distance covered per tick while resetting.
const RESET_LERP: f32 = 0.05;
/// Position and look target must both be this close before a reset snaps.
const RESET_EPSILON: f32 = 0.1;
/// Distance from the eye to the derived look target.
const LOOK_DISTANCE: f32 = 5.0;

/// Eye state: a position plus yaw/pitch angles and the derived look target.
///
/// Yaw zero faces −Z. The look target trails the eye at a fixed distance in
/// free flight and is lerped independently during a reset, which is what
/// gives the reset its swing-around feel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewpoint {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub look_target: Vec3,
}

impl Default for Viewpoint {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.6, 5.0),
            yaw: 0.0,
            pitch: 0.0,
            look_target: Vec3::new(0.0, 1.6, 0.0),
        }
    }
}

impl Viewpoint {
    /// Unit vector the view faces.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            -self.yaw.sin() * self.pitch.cos(),
            -self.pitch.sin(),
            -self.yaw.cos() * self.pitch.cos(),
        )
        .normalize()
    }

    /// Unit vector to the right of the view, flattened onto the ground plane.
    pub fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin()).normalize()
    }
}

/// Pose a reset glides toward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResetTarget {
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for ResetTarget {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.6, 5.0),
            target: Vec3::new(0.0, 1.6, 0.0),
        }
    }
}

/// Movement feel, loadable from the runtime tuning file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoveTuning {
    /// Speed the eye eases toward, in world units per tick.
    pub target_speed: f32,
    /// Fraction of the speed gap closed per tick.
    pub acceleration: f32,
    /// Radians of yaw/pitch per pixel of pointer travel.
    pub sensitivity: f32,
}

impl Default for MoveTuning {
    fn default() -> Self {
        Self {
            target_speed: 0.05,
            acceleration: 0.01,
            sensitivity: 0.002,
        }
    }
}

/// Drives the viewpoint from accumulated input, one tick per frame.
///
/// Two mutually exclusive modes, selected by whether a reset target is
/// armed. While resetting, movement keys are ignored and the eye glides;
/// pointer deltas still accumulate into yaw/pitch and take effect again on
/// the first free tick.
#[derive(Debug, Clone)]
pub struct ViewpointController {
    viewpoint: Viewpoint,
    pub tuning: MoveTuning,
    input: InputState,
    speed: f32,
    reset: Option<ResetTarget>,
}

impl Default for ViewpointController {
    fn default() -> Self {
        Self::new(MoveTuning::default())
    }
}

impl ViewpointController {
    pub fn new(tuning: MoveTuning) -> Self {
        Self {
            viewpoint: Viewpoint::default(),
            tuning,
            input: InputState::default(),
            speed: tuning.target_speed,
            reset: None,
        }
    }

    pub fn viewpoint(&self) -> &Viewpoint {
        &self.viewpoint
    }

    /// Current smoothed speed, in world units per tick.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn handle(&mut self, input: ViewInput) {
        self.input.apply(input);
    }

    /// Drops held keys and pending pointer travel, as on focus loss.
    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// Arms a reset. The next ticks glide toward `target` until both the
    /// position and the look target converge.
    pub fn begin_reset(&mut self, target: ResetTarget) {
        debug!(?target.position, ?target.target, "viewpoint reset armed");
        self.reset = Some(target);
    }

    pub fn is_resetting(&self) -> bool {
        self.reset.is_some()
    }

    /// Advances one frame: folds pending pointer travel into yaw/pitch, then
    /// either glides toward the armed reset target or integrates free
    /// movement.
    pub fn tick(&mut self) {
        let look = self.input.drain_look();
        self.apply_look(look);

        if let Some(target) = self.reset {
            self.glide(target);
        } else {
            self.fly();
        }
    }

    fn apply_look(&mut self, look: Vec2) {
        self.viewpoint.yaw += look.x * self.tuning.sensitivity;
        self.viewpoint.pitch = (self.viewpoint.pitch + look.y * self.tuning.sensitivity)
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    fn glide(&mut self, target: ResetTarget) {
        let vp = &mut self.viewpoint;
        vp.position = vp.position.lerp(target.position, RESET_LERP);
        vp.look_target = vp.look_target.lerp(target.target, RESET_LERP);

        let arrived = vp.position.distance(target.position) < RESET_EPSILON
            && vp.look_target.distance(target.target) < RESET_EPSILON;
        if arrived {
            vp.position = target.position;
            vp.look_target = target.target;
            self.reset = None;
            debug!("viewpoint reset complete");
        }
    }

    fn fly(&mut self) {
        self.speed += (self.tuning.target_speed - self.speed) * self.tuning.acceleration;

        let forward = self.viewpoint.forward();
        let right = self.viewpoint.right();

        let mut direction = Vec3::ZERO;
        if self.input.is_held(MoveKey::Forward) {
            direction += forward;
        }
        if self.input.is_held(MoveKey::Backward) {
            direction -= forward;
        }
        if self.input.is_held(MoveKey::Left) {
            direction -= right;
        }
        if self.input.is_held(MoveKey::Right) {
            direction += right;
        }
        if direction.length_squared() > 0.0 {
            direction = direction.normalize();
        }

        self.viewpoint.position += direction * self.speed;
        self.viewpoint.look_target = self.viewpoint.position + forward * LOOK_DISTANCE;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        a.distance(b) < 1e-4
    }

    fn press(ctl: &mut ViewpointController, key: MoveKey) {
        ctl.handle(ViewInput::Key { key, pressed: true });
    }

    fn release(ctl: &mut ViewpointController, key: MoveKey) {
        ctl.handle(ViewInput::Key {
            key,
            pressed: false,
        });
    }

    #[test]
    fn default_viewpoint_matches_the_entry_pose() {
        let vp = Viewpoint::default();
        assert_eq!(vp.position, Vec3::new(0.0, 1.6, 5.0));
        assert_eq!(vp.look_target, Vec3::new(0.0, 1.6, 0.0));
        assert_eq!(vp.yaw, 0.0);
        assert_eq!(vp.pitch, 0.0);
    }

    #[test]
    fn forward_at_rest_points_down_negative_z() {
        let vp = Viewpoint::default();
        assert!(close(vp.forward(), Vec3::new(0.0, 0.0, -1.0)));
        assert!(close(vp.right(), Vec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn pointer_travel_turns_the_view() {
        let mut ctl = ViewpointController::default();
        ctl.handle(ViewInput::Look { dx: 100.0, dy: 0.0 });
        ctl.tick();
        assert!((ctl.viewpoint().yaw - 0.2).abs() < 1e-6);
        assert!(ctl.viewpoint().look_target.x < -0.9);
    }

    #[test]
    fn pitch_clamps_short_of_vertical() {
        let mut ctl = ViewpointController::default();
        ctl.handle(ViewInput::Look {
            dx: 0.0,
            dy: 10_000.0,
        });
        ctl.tick();
        assert!((ctl.viewpoint().pitch - PITCH_LIMIT).abs() < 1e-6);

        ctl.handle(ViewInput::Look {
            dx: 0.0,
            dy: -20_000.0,
        });
        ctl.tick();
        assert!((ctl.viewpoint().pitch + PITCH_LIMIT).abs() < 1e-6);
    }

    #[test]
    fn held_forward_key_moves_along_the_facing() {
        let mut ctl = ViewpointController::default();
        press(&mut ctl, MoveKey::Forward);
        for _ in 0..10 {
            ctl.tick();
        }
        assert!(close(ctl.viewpoint().position, Vec3::new(0.0, 1.6, 4.5)));
    }

    #[test]
    fn releasing_the_key_stops_motion() {
        let mut ctl = ViewpointController::default();
        press(&mut ctl, MoveKey::Forward);
        ctl.tick();
        release(&mut ctl, MoveKey::Forward);
        let parked = ctl.viewpoint().position;
        ctl.tick();
        assert_eq!(ctl.viewpoint().position, parked);
    }

    #[test]
    fn opposed_keys_cancel_out() {
        let mut ctl = ViewpointController::default();
        press(&mut ctl, MoveKey::Forward);
        press(&mut ctl, MoveKey::Backward);
        ctl.tick();
        assert!(close(ctl.viewpoint().position, Vec3::new(0.0, 1.6, 5.0)));
    }

    #[test]
    fn strafing_slides_without_turning() {
        let mut ctl = ViewpointController::default();
        press(&mut ctl, MoveKey::Right);
        for _ in 0..10 {
            ctl.tick();
        }
        let vp = ctl.viewpoint();
        assert!(close(vp.position, Vec3::new(0.5, 1.6, 5.0)));
        assert_eq!(vp.yaw, 0.0);
    }

    #[test]
    fn speed_eases_toward_the_target() {
        let mut ctl = ViewpointController::default();
        ctl.tuning.target_speed = 1.0;
        ctl.tuning.acceleration = 0.5;
        ctl.tick();
        assert!((ctl.speed() - 0.525).abs() < 1e-6);
        ctl.tick();
        assert!((ctl.speed() - 0.7625).abs() < 1e-6);
    }

    #[test]
    fn reset_glides_then_snaps_exactly() {
        let mut ctl = ViewpointController::default();
        press(&mut ctl, MoveKey::Forward);
        for _ in 0..50 {
            ctl.tick();
        }
        release(&mut ctl, MoveKey::Forward);

        ctl.begin_reset(ResetTarget::default());
        let mut ticks = 0;
        while ctl.is_resetting() {
            ctl.tick();
            ticks += 1;
            assert!(ticks < 300, "reset never converged");
        }
        assert!(ticks > 1);
        assert_eq!(ctl.viewpoint().position, Vec3::new(0.0, 1.6, 5.0));
        assert_eq!(ctl.viewpoint().look_target, Vec3::new(0.0, 1.6, 0.0));
    }

    #[test]
    fn reset_waits_for_the_look_target_too() {
        let mut ctl = ViewpointController::default();
        // Turn in place so only the look target is displaced.
        ctl.handle(ViewInput::Look { dx: 100.0, dy: 0.0 });
        ctl.tick();

        ctl.begin_reset(ResetTarget::default());
        ctl.tick();
        assert!(ctl.is_resetting(), "converging position alone must not exit");

        let mut ticks = 0;
        while ctl.is_resetting() {
            ctl.tick();
            ticks += 1;
            assert!(ticks < 300, "reset never converged");
        }
        assert_eq!(ctl.viewpoint().look_target, Vec3::new(0.0, 1.6, 0.0));
    }

    #[test]
    fn movement_keys_are_ignored_while_resetting() {
        let mut ctl = ViewpointController::default();
        press(&mut ctl, MoveKey::Forward);
        for _ in 0..50 {
            ctl.tick();
        }

        ctl.begin_reset(ResetTarget::default());
        let before = ctl.viewpoint().position.z;
        ctl.tick();
        assert!(ctl.viewpoint().position.z > before);

        // Control returns once the glide completes, key still held.
        while ctl.is_resetting() {
            ctl.tick();
        }
        ctl.tick();
        assert!(ctl.viewpoint().position.z < 5.0);
    }
}
