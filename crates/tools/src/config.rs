use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use liminal_shell::BackdropConfig;
use liminal_stream::{StreamConfig, StreamConfigError};
use liminal_view::MoveTuning;

/// Startup tuning, optionally loaded from a YAML file.
///
/// Every section defaults to the built-in constants, so a partial document
/// only overrides what it names and no file at all behaves identically to
/// an empty one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub stream: StreamConfig,
    pub movement: MoveTuning,
    pub audio_enabled: bool,
    pub backdrop: BackdropConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            stream: StreamConfig::default(),
            movement: MoveTuning::default(),
            audio_enabled: true,
            backdrop: BackdropConfig::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file")]
    Parse(#[from] serde_yaml::Error),
    #[error(transparent)]
    Stream(#[from] StreamConfigError),
}

impl RuntimeConfig {
    /// Loads and validates a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_yaml::from_str(&text)?;
        config.stream.validate()?;
        debug!(path = %path.display(), "loaded runtime config");
        Ok(config)
    }

    /// Loads `path` when given, falls back to defaults otherwise. A path
    /// that was asked for but cannot be read is an error, not a fallback.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Renders the config as YAML, for printing a starting-point file.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_yaml() {
        let config = RuntimeConfig::default();
        let yaml = config.to_yaml().unwrap();
        let back: RuntimeConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn no_path_means_defaults() {
        let config = RuntimeConfig::load_or_default(None).unwrap();
        assert_eq!(config, RuntimeConfig::default());
    }

    #[test]
    fn partial_file_keeps_defaults_elsewhere() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "stream:\n  load_radius: 90.0\n  unload_radius: 120.0").unwrap();

        let config = RuntimeConfig::load(file.path()).unwrap();
        assert_eq!(config.stream.load_radius, 90.0);
        assert_eq!(config.stream.unload_radius, 120.0);
        assert_eq!(config.stream.cell_size, 20.0);
        assert!(config.audio_enabled);
        assert_eq!(config.movement, MoveTuning::default());
    }

    #[test]
    fn inverted_radii_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "stream:\n  load_radius: 80.0\n  unload_radius: 50.0").unwrap();

        let err = RuntimeConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Stream(_)));
    }

    #[test]
    fn garbage_yaml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "stream: [not, a, map").unwrap();

        let err = RuntimeConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn unreadable_path_is_an_io_error() {
        let err = RuntimeConfig::load(Path::new("/definitely/not/here.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
