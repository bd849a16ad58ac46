//! Errors raised while loading, validating and saving presets.

use std::path::PathBuf;
use thiserror::Error;

/// Preset and configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A preset file could not be read.
    #[error("cannot read {path}: {source}")]
    ReadFile {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A preset file could not be written.
    #[error("cannot write {path}: {source}")]
    WriteFile {
        /// File that was being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid preset TOML.
    #[error("malformed preset TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// The preset could not be rendered as TOML.
    #[error("cannot encode preset as TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// No factory, user or system preset has this name.
    #[error("no preset named '{0}'")]
    PresetNotFound(String),

    /// Key that names no chain parameter.
    #[error("'{0}' is not a chain parameter")]
    UnknownParameter(String),

    /// A value that cannot be parsed for its parameter.
    #[error("{param}: {reason}")]
    InvalidParameter {
        /// Parameter key.
        param: String,
        /// What was wrong with the value.
        reason: String,
    },

    /// The preset parsed but its contents are out of range.
    #[error(transparent)]
    Validation(#[from] crate::validation::ValidationError),

    /// The preset directory could not be created.
    #[error("cannot create directory {path}: {source}")]
    CreateDir {
        /// Directory that was being created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// [`ConfigError::ReadFile`] for `path`.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// [`ConfigError::WriteFile`] for `path`.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// [`ConfigError::CreateDir`] for `path`.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::CreateDir {
            path: path.into(),
            source,
        }
    }

    /// [`ConfigError::InvalidParameter`] for key `param`.
    pub fn invalid_parameter(param: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidParameter {
            param: param.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::io;

    fn denied() -> io::Error {
        io::Error::new(io::ErrorKind::PermissionDenied, "denied")
    }

    #[test]
    fn file_errors_name_the_path_and_chain_the_cause() {
        for err in [
            ConfigError::read_file("/presets/lead.toml", denied()),
            ConfigError::write_file("/presets/lead.toml", denied()),
            ConfigError::create_dir("/presets/lead.toml", denied()),
        ] {
            let text = err.to_string();
            assert!(text.contains("/presets/lead.toml"), "got: {text}");
            assert!(text.contains("denied"), "got: {text}");
            let source = err.source().unwrap();
            assert_eq!(source.to_string(), "denied");
        }
    }

    #[test]
    fn lookup_errors_have_no_source() {
        let missing = ConfigError::PresetNotFound("moon_verb".into());
        assert_eq!(missing.to_string(), "no preset named 'moon_verb'");
        assert!(missing.source().is_none());

        let unknown = ConfigError::UnknownParameter("volume".into());
        assert_eq!(unknown.to_string(), "'volume' is not a chain parameter");
    }

    #[test]
    fn invalid_parameter_prefixes_the_key() {
        let err = ConfigError::invalid_parameter("dist_type", "expected clean, crunch or fuzz");
        assert_eq!(err.to_string(), "dist_type: expected clean, crunch or fuzz");
    }

    #[test]
    fn validation_errors_display_unwrapped() {
        let inner = crate::validation::ValidationError::EmptyName;
        let expected = inner.to_string();
        let err = ConfigError::from(inner);
        assert_eq!(err.to_string(), expected);
    }
}
