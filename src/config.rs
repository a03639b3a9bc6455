use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {error}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },
    #[error("invalid checker configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Settings of the coarray checker pass.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckOptions {
    /// Report usages whose meaning changes under newer standard revisions.
    pub portability_warnings: bool,
    /// Promote portability warnings to errors.
    pub warnings_as_errors: bool,
    /// Constraint codes (e.g. `C1172`) whose diagnostics are suppressed.
    pub allow: Vec<String>,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            portability_warnings: true,
            warnings_as_errors: false,
            allow: Vec::new(),
        }
    }
}

#[derive(Deserialize)]
struct RawConfig {
    #[serde(default)]
    coarray: CheckOptions,
}

impl CheckOptions {
    /// Reads the `[coarray]` table of a configuration document. A document
    /// without the table yields the defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = toml::from_str(text)?;
        Ok(raw.coarray)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn is_allowed(&self, code: &str) -> bool {
        self.allow
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(code))
    }
}
