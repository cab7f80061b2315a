//! Mixer configuration
//!
//! Three layers, later ones winning:
//! 1. Built-in defaults
//! 2. Optional TOML file (`--config`)
//! 3. CLI flags

mod defaults;

pub use defaults::DEFAULT_OUTPUT_NAME;

use crate::discovery::input_number;
use mixer_gcode::{DialectError, GcodeDialect};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("output name must be a plain file name, got '{0}'")]
    InvalidOutputName(String),

    #[error("output name '{0}' would be picked up as a numbered input file")]
    OutputNameIsInput(String),

    #[error("invalid gcode dialect: {0}")]
    Dialect(#[from] DialectError),
}

/// Effective mixer configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MixerConfig {
    /// File name of the merged output, created inside the input directory.
    #[serde(default = "defaults::output_name")]
    pub output_name: String,

    /// Prefix of the line that starts a layer.
    #[serde(default = "defaults::layer_marker")]
    pub layer_marker: String,

    /// Prefix of the Z height stamp that follows a layer marker.
    #[serde(default = "defaults::height_prefix")]
    pub height_prefix: String,

    /// Prefix every written line with `<index> ### `.
    #[serde(default)]
    pub annotate: bool,
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            output_name: defaults::output_name(),
            layer_marker: defaults::layer_marker(),
            height_prefix: defaults::height_prefix(),
            annotate: false,
        }
    }
}

/// Values given on the command line; `None` leaves the lower layer alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub output_name: Option<String>,
    pub annotate: bool,
}

impl MixerConfig {
    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Parse TOML text.
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Load the file layer if given, then apply CLI flags and validate.
    pub fn load(path: Option<&Path>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let base = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        let config = base.with_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI flags on top of this config.
    pub fn with_overrides(mut self, overrides: CliOverrides) -> Self {
        if let Some(name) = overrides.output_name {
            self.output_name = name;
        }
        if overrides.annotate {
            self.annotate = true;
        }
        self
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let name = Path::new(&self.output_name);
        let plain = name.file_name().map(|n| n == name.as_os_str()).unwrap_or(false);
        if !plain {
            return Err(ConfigError::InvalidOutputName(self.output_name.clone()));
        }
        if input_number(&self.output_name).is_some() {
            return Err(ConfigError::OutputNameIsInput(self.output_name.clone()));
        }
        self.dialect()?;
        Ok(())
    }

    /// Gcode dialect described by this config.
    pub fn dialect(&self) -> Result<GcodeDialect, DialectError> {
        GcodeDialect::new(&self.layer_marker, &self.height_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = MixerConfig::default();
        assert_eq!(config.output_name, "out.gcode");
        assert_eq!(config.layer_marker, ";LAYER_CHANGE");
        assert_eq!(config.height_prefix, ";Z:");
        assert!(!config.annotate);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = MixerConfig::from_toml("annotate = true\n").unwrap();
        assert!(config.annotate);
        assert_eq!(config.output_name, DEFAULT_OUTPUT_NAME);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(MixerConfig::from_toml("output = \"x.gcode\"\n").is_err());
    }

    #[test]
    fn test_cli_overrides_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "output_name = \"blend.gcode\"").unwrap();
        writeln!(file, "layer_marker = \";LAYER:\"").unwrap();

        let from_file = MixerConfig::load(Some(file.path()), CliOverrides::default()).unwrap();
        assert_eq!(from_file.output_name, "blend.gcode");
        assert_eq!(from_file.layer_marker, ";LAYER:");

        let overridden = MixerConfig::load(
            Some(file.path()),
            CliOverrides {
                output_name: Some("final.gcode".to_string()),
                annotate: true,
            },
        )
        .unwrap();
        assert_eq!(overridden.output_name, "final.gcode");
        assert_eq!(overridden.layer_marker, ";LAYER:");
        assert!(overridden.annotate);
    }

    #[test]
    fn test_output_name_must_be_plain() {
        for bad in ["", "../out.gcode", "sub/out.gcode", ".."] {
            let config = MixerConfig {
                output_name: bad.to_string(),
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::InvalidOutputName(_))),
                "accepted {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_output_name_must_not_look_like_input() {
        for bad in ["0.gcode", "12.gcode"] {
            let config = MixerConfig {
                output_name: bad.to_string(),
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(ConfigError::OutputNameIsInput(_))),
                "accepted {:?}",
                bad
            );
        }

        let err = MixerConfig::load(
            None,
            CliOverrides {
                output_name: Some("0.gcode".to_string()),
                annotate: false,
            },
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::OutputNameIsInput(_)));
    }

    #[test]
    fn test_empty_marker_rejected() {
        let config = MixerConfig {
            layer_marker: String::new(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Dialect(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = MixerConfig::from_file(Path::new("/nonexistent/mixer.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
