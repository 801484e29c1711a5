//! Error type for preset operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from loading, saving, or applying presets.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// The preset names an effect id the registry does not know
    #[error("unknown effect type: {0}")]
    UnknownEffect(String),

    /// The preset was made for a different effect
    #[error("preset is for '{found}', expected '{expected}'")]
    EffectMismatch {
        /// Effect id the caller is applying to.
        expected: String,
        /// Effect id stored in the preset.
        found: String,
    },

    /// A stored knob is not a finite number in `[0, 1]`
    #[error("invalid knob value {value} for parameter {id}")]
    InvalidKnob {
        /// Parameter id.
        id: u32,
        /// Offending value.
        value: f32,
    },
}

impl ConfigError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }

    /// Create an effect mismatch error.
    pub fn effect_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        ConfigError::EffectMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }
}
