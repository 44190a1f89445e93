//! Configuration loader for the aml tool.
//!
//! `defaults/aml.default.toml` is embedded into the binary so that docs and runtime
//! behavior stay in sync. [`Loader`] layers, lowest first:
//!
//!     - the embedded defaults
//!     - the per-user file from [`user_config_path`], when it exists
//!     - a file named on the command line
//!     - single-key overrides from command-line flags
//!
//! Parsing itself takes no configuration; these settings only cover how documents are
//! fetched and rendered.

use crate::aml::formats::Format;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../../defaults/aml.default.toml");

/// Name of the per-user configuration file.
pub const USER_CONFIG_FILE: &str = "aml.toml";

/// `$XDG_CONFIG_HOME/aml.toml`, else `$HOME/.config/aml.toml`.
///
/// `None` when neither variable is set.
pub fn user_config_path() -> Option<PathBuf> {
    user_config_path_from(env::var_os("XDG_CONFIG_HOME"), env::var_os("HOME"))
}

fn user_config_path_from(xdg: Option<OsString>, home: Option<OsString>) -> Option<PathBuf> {
    let dir = match xdg.filter(|dir| !dir.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => PathBuf::from(home.filter(|dir| !dir.is_empty())?).join(".config"),
    };
    Some(dir.join(USER_CONFIG_FILE))
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AmlConfig {
    pub output: OutputConfig,
    pub fetch: FetchConfig,
}

/// How documents are rendered.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    pub format: Format,
    pub pretty: bool,
    pub xml_root: String,
}

/// How remote sources are fetched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Contains `{id}`, replaced by the document id.
    pub gdoc_export_url: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: Format::Json,
            pretty: true,
            xml_root: "root".to_string(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: "aml".to_string(),
            gdoc_export_url: "https://docs.google.com/document/d/{id}/export?format=txt"
                .to_string(),
        }
    }
}

/// Layers configuration sources over the embedded defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a TOML file. A missing file fails [`Loader::build`].
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.add_file(path.as_ref(), true)
    }

    /// Layer a TOML file if it exists.
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.add_file(path.as_ref(), false)
    }

    /// Layer the per-user file, if there is one.
    pub fn with_user_file(self) -> Self {
        match user_config_path() {
            Some(path) => self.with_optional_file(path),
            None => self,
        }
    }

    fn add_file(mut self, path: &Path, required: bool) -> Self {
        let source = File::from(path)
            .format(FileFormat::Toml)
            .required(required);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Set one dotted key, e.g. `output.format`, above every file.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<AmlConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<AmlConfig, ConfigError> {
    Loader::new().build()
}
