//! Viewpoint control: pointer look, eased keyboard movement, and scripted
//! resets back to a variant's entry pose.
//!
//! # Invariants
//! - Window events never reach the controller directly; shells map them to
//!   [`ViewInput`] so the desktop app and headless harnesses share one code
//!   path.
//! - Pitch stays inside ±(π/2 − 0.1).
//! - While a reset target is armed, movement keys are ignored; the mode only
//!   exits once both the position and the look target have converged.

pub mod action;
pub mod controller;

pub use action::{InputState, MoveKey, ViewInput};
pub use controller::{MoveTuning, ResetTarget, Viewpoint, ViewpointController};

pub fn crate_info() -> &'static str {
    "liminal-view v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("view"));
    }
}
