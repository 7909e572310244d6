//! Settings types and layered loading.
//!
//! The main entry point is [`load_settings`], which merges the layers with
//! `figment` into a [`Settings`] value. Later layers win:
//!
//! 1. [`Settings::default`]
//! 2. the YAML settings file ([`DEFAULT_CONFIG_FILE`] unless another is named)
//! 3. `GITALCHEMIST_*` environment variables, e.g. `GITALCHEMIST_TARGETDIR`
//! 4. [`Overrides`] taken from the command line

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings file read from the current directory when none is named.
pub const DEFAULT_CONFIG_FILE: &str = "gitalchemist.config.yaml";

/// Prefix of the environment variables that override settings.
pub const ENV_PREFIX: &str = "GITALCHEMIST_";

/// Default base directory of the generated repositories.
pub const DEFAULT_TARGET_DIR: &str = "cwd";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A settings file named explicitly does not exist.
    #[error("settings file {} not found", .0.display())]
    Missing(PathBuf),

    /// A layer held a value of the wrong type, or the YAML was malformed.
    #[error("invalid settings: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

/// A specialized `Result` type for settings operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Base directory for the generated git repositories.
    pub targetdir: PathBuf,

    /// Base directory of the formula definitions (the "book").
    pub cfgdir: PathBuf,

    /// Emit debug messages.
    pub verbose: bool,

    /// Dry run: log the steps without executing them.
    pub test: bool,

    /// Execute only this many spells per formula; 0 executes all.
    pub maxsteps: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            targetdir: PathBuf::from(DEFAULT_TARGET_DIR),
            cfgdir: PathBuf::new(),
            verbose: false,
            test: false,
            maxsteps: 0,
        }
    }
}

/// Values given explicitly on the command line. `None` leaves the lower
/// layers in charge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub targetdir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cfgdir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verbose: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maxsteps: Option<usize>,
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Merge all settings layers.
///
/// `config_file` names the YAML settings file. It must exist when given; the
/// default file is optional.
///
/// # Errors
///
/// Returns [`ConfigError::Missing`] for a named file that does not exist and
/// [`ConfigError::Invalid`] if any layer cannot be decoded.
pub fn load_settings(config_file: Option<&Path>, overrides: &Overrides) -> Result<Settings> {
    let file = match config_file {
        Some(path) if !path.is_file() => return Err(ConfigError::Missing(path.to_path_buf())),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(DEFAULT_CONFIG_FILE),
    };

    Figment::from(Serialized::defaults(Settings::default()))
        .merge(Yaml::file(file))
        .merge(Env::prefixed(ENV_PREFIX))
        .merge(Serialized::defaults(overrides))
        .extract()
        .map_err(|e| ConfigError::Invalid(Box::new(e)))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
