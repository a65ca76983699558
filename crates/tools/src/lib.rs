//! Developer Tooling: registry inspector and the runtime tuning file.
//!
//! # Invariants
//! - Tools are read-only over live state; the config is validated before
//!   anything consumes it.

pub mod config;
pub mod inspector;

pub use config::{ConfigError, RuntimeConfig};
pub use inspector::{RegistrySummary, SceneInspector, VariantSummary};

pub fn crate_info() -> &'static str {
    "liminal-tools v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("tools"));
    }
}
