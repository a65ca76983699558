use std::collections::HashSet;

use glam::Vec2;

/// A movement key the user can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Forward,
    Backward,
    Left,
    Right,
}

/// A view event produced by the windowing shell or a headless harness.
///
/// The controller consumes these, never raw window events, so the desktop
/// app and the CLI walk simulation share the same movement logic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewInput {
    /// Turn request in pointer pixels: positive `dx` swings the view left,
    /// positive `dy` tilts it up. Window coordinates grow rightward and
    /// downward, so shells negate both raw deltas before sending.
    Look { dx: f32, dy: f32 },
    /// Movement key pressed or released.
    Key { key: MoveKey, pressed: bool },
}

/// Input accumulated between ticks.
///
/// Event handlers only mutate this state; the per-frame tick consumes it at
/// a fixed point in program order.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    held: HashSet<MoveKey>,
    pending_look: Vec2,
}

impl InputState {
    pub fn apply(&mut self, input: ViewInput) {
        match input {
            ViewInput::Look { dx, dy } => {
                self.pending_look.x += dx;
                self.pending_look.y += dy;
            }
            ViewInput::Key { key, pressed } => {
                if pressed {
                    self.held.insert(key);
                } else {
                    self.held.remove(&key);
                }
            }
        }
    }

    pub fn is_held(&self, key: MoveKey) -> bool {
        self.held.contains(&key)
    }

    /// Takes the pointer delta accumulated since the last drain.
    pub fn drain_look(&mut self) -> Vec2 {
        std::mem::take(&mut self.pending_look)
    }

    /// Drops all held keys and any pending pointer delta. Shells call this
    /// when the window loses focus, so no key stays stuck down.
    pub fn clear(&mut self) {
        self.held.clear();
        self.pending_look = Vec2::ZERO;
    }
}
