use std::time::{Duration, Instant};

use glam::Vec3;
use liminal_common::CellKey;
use liminal_scene::SceneVariant;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

use crate::grid::{CellGrid, keys_within};

/// Streaming tuning: cell size plus the load/unload hysteresis radii, in
/// world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub cell_size: f32,
    pub load_radius: f32,
    pub unload_radius: f32,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            cell_size: 20.0,
            load_radius: 50.0,
            unload_radius: 70.0,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum StreamConfigError {
    #[error("cell_size must be positive, got {0}")]
    CellSize(f32),
    #[error("load_radius must be positive, got {0}")]
    LoadRadius(f32),
    #[error("unload_radius {unload} must exceed load_radius {load} to form a hysteresis band")]
    RadiusOrder { load: f32, unload: f32 },
}

impl StreamConfig {
    /// Check the `unload > load > 0` invariant without constructing a
    /// streamer. Configuration loading reports this recoverably;
    /// [`Streamer::new`] enforces the same invariant fatally.
    pub fn validate(&self) -> Result<(), StreamConfigError> {
        if self.cell_size <= 0.0 {
            return Err(StreamConfigError::CellSize(self.cell_size));
        }
        if self.load_radius <= 0.0 {
            return Err(StreamConfigError::LoadRadius(self.load_radius));
        }
        if self.unload_radius <= self.load_radius {
            return Err(StreamConfigError::RadiusOrder {
                load: self.load_radius,
                unload: self.unload_radius,
            });
        }
        Ok(())
    }

    /// Number of whole cells covered by the load radius.
    pub fn load_cell_radius(&self) -> i32 {
        (self.load_radius / self.cell_size).ceil() as i32
    }
}

/// Counters from one streaming tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamStats {
    pub cells_generated: usize,
    pub cells_evicted: usize,
    /// Evictions that found no props to remove. Tolerated; the key is
    /// dropped regardless.
    pub empty_evictions: usize,
    pub loaded_cells: usize,
    pub frame_time: Duration,
}

/// Runs the generate and evict passes for the active scene variant.
///
/// # Invariants
/// - Generation runs before eviction every tick, so a fast-moving viewpoint
///   sees temporary over-coverage, never a hole between old and new cells.
/// - The generate pass covers a square cell neighborhood while eviction
///   measures the Euclidean distance between cell origins; the asymmetry is
///   kept as observed behavior, so the far corners of the generated square
///   churn each tick.
pub struct Streamer {
    config: StreamConfig,
    grid: CellGrid,
}

impl Streamer {
    /// Panics when `config` violates `unload > load > 0`; validate first
    /// when the values come from user input.
    pub fn new(config: StreamConfig) -> Self {
        if let Err(err) = config.validate() {
            panic!("invalid stream config: {err}");
        }
        Self {
            grid: CellGrid::new(config.cell_size),
            config,
        }
    }

    pub fn config(&self) -> &StreamConfig {
        &self.config
    }

    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    /// One streaming tick for `variant` around `viewpoint`: generate every
    /// missing cell in the square load neighborhood, then evict loaded cells
    /// whose origins lie beyond the unload radius.
    pub fn update(
        &self,
        variant: &mut SceneVariant,
        viewpoint: Vec3,
        rng: &mut dyn RngCore,
    ) -> StreamStats {
        let _span = tracing::info_span!("stream_update").entered();
        let frame_start = Instant::now();

        let center = self.grid.key_of(viewpoint);
        let center_origin = self.grid.origin_of(center);

        let mut cells_generated = 0;
        for key in keys_within(center, self.config.load_cell_radius()) {
            if variant.generate_cell(key, self.grid.origin_of(key), rng) {
                debug!(?key, "generated cell");
                cells_generated += 1;
            }
        }

        // Distance is measured between cell origins, not to the raw
        // viewpoint position.
        let far: Vec<CellKey> = variant
            .generated_cells()
            .iter()
            .copied()
            .filter(|key| {
                self.grid.origin_of(*key).distance(center_origin) > self.config.unload_radius
            })
            .collect();

        let mut cells_evicted = 0;
        let mut empty_evictions = 0;
        for key in far {
            let removed = variant.evict_cell(key);
            if removed == 0 {
                debug!(?key, "evicted cell had nothing to remove");
                empty_evictions += 1;
            } else {
                debug!(?key, removed, "evicted cell");
            }
            cells_evicted += 1;
        }

        let stats = StreamStats {
            cells_generated,
            cells_evicted,
            empty_evictions,
            loaded_cells: variant.loaded_cell_count(),
            frame_time: frame_start.elapsed(),
        };
        trace!(
            generated = stats.cells_generated,
            evicted = stats.cells_evicted,
            loaded = stats.loaded_cells,
            "stream update complete"
        );
        stats
    }
}

/// Exponentially smoothed frame-time tracker for HUD display.
#[derive(Debug)]
pub struct FrameClock {
    smoothed: Option<Duration>,
    alpha: f64,
}

impl FrameClock {
    /// `alpha` is the weight of the newest sample, in `(0, 1]`.
    pub fn new(alpha: f64) -> Self {
        assert!(alpha > 0.0 && alpha <= 1.0, "alpha must be in (0, 1]");
        Self {
            smoothed: None,
            alpha,
        }
    }

    pub fn record(&mut self, dt: Duration) {
        self.smoothed = Some(match self.smoothed {
            Some(prev) => prev.mul_f64(1.0 - self.alpha) + dt.mul_f64(self.alpha),
            None => dt,
        });
    }

    /// Smoothed frame time; zero before the first sample.
    pub fn average(&self) -> Duration {
        self.smoothed.unwrap_or(Duration::ZERO)
    }

    pub fn fps(&self) -> f64 {
        let avg = self.average().as_secs_f64();
        if avg > 0.0 { 1.0 / avg } else { 0.0 }
    }
}
