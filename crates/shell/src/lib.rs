//! Presentation state for the shell: the variant menu with its scroll
//! model, synthesized audio cues, and the animated checkerboard backdrop
//! behind the menu.
//!
//! # Invariants
//! - State and math only; windowing, widget drawing, and frame pacing live
//!   in the desktop app.
//! - Cue synthesis is pure. Only [`CuePlayer`] touches the audio device,
//!   and a missing device downgrades playback to a no-op.
//! - Scroll offsets stay clamped to the scrollable range; trail counts
//!   never exceed the configured cap.

pub mod audio;
pub mod backdrop;
pub mod menu;

pub use audio::{Cue, CuePlayer, SAMPLE_RATE, render_cue};
pub use backdrop::{Backdrop, BackdropConfig, CellDeform, Trail};
pub use menu::{KEY_SCROLL_STEP, MenuModel, ScrollIndicator, ScrollState};

pub fn crate_info() -> &'static str {
    "liminal-shell v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("shell"));
    }
}
