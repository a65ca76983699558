//! Shared types for the liminal engine: ids, transforms, grid keys, colors.
//!
//! # Invariants
//! - Types here are plain data with no behavior beyond construction and
//!   conversion; no crate below this one exists.

pub mod types;

pub use types::{CellKey, Color, PropId, Transform};
