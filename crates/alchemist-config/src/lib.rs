//! Settings for the gitalchemist command-line tool.
//!
//! Settings are layered: built-in defaults, then an optional YAML file, then
//! `GITALCHEMIST_*` environment variables, then command-line flags.

pub mod config;

pub use config::{
    ConfigError, DEFAULT_CONFIG_FILE, DEFAULT_TARGET_DIR, ENV_PREFIX, Overrides, Result, Settings,
    load_settings,
};
