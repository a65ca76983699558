//! Streaming: grid-keyed cell generation and eviction around the viewpoint.
//!
//! # Invariants
//! - `unload_radius > load_radius > 0`; the hysteresis band prevents cells
//!   from thrashing at the load boundary.
//! - A cell key is loaded iff its props exist in the variant's graph; the
//!   generate and evict passes keep set and graph synchronized.
//! - Generate runs before evict each tick; over-coverage is acceptable,
//!   holes are not.

mod controller;
mod grid;

pub use controller::{FrameClock, StreamConfig, StreamConfigError, StreamStats, Streamer};
pub use grid::CellGrid;

pub fn crate_info() -> &'static str {
    "liminal-stream v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("stream"));
    }
}
