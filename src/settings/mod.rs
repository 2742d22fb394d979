//! Tool settings: defaults for the command-line flags, read from layered
//! sources.
//!
//! Settings are resolved from four sparse layers, later layers winning
//! key by key:
//!
//! ```text
//! Compiled defaults     #[config(default = ...)]
//!        ↑ overridden by
//! Settings files        platform config dir, ~/.consul-cfg/, cwd (or one --config file)
//!        ↑ overridden by
//! Environment vars      CONSUL_CFG__KEY, CONSUL_CFG__LOG__LEVEL
//!        ↑ overridden by
//! Command-line flags    --type, --prefix, --sort-keys
//! ```
//!
//! Unknown keys in a settings file are rejected with the file path and line,
//! unless strict mode is turned off.

mod env;
mod file;
mod merge;
mod resolve;
mod validate;

use std::path::PathBuf;

use confique::Config;
use serde::Serialize;

use crate::convert::Converter;
use crate::error::ConsulCfgError;
use crate::flatten;
use crate::tree::Node;
use crate::types::{Format, KvPair, SearchPath};

use resolve::ResolveInput;

pub const APP_NAME: &str = "consul-cfg";
pub const FILE_NAME: &str = "consul-cfg.toml";
pub const ENV_PREFIX: &str = "CONSUL_CFG";

/// Settings for consul-cfg.
#[derive(Config, Serialize, Debug, PartialEq)]
pub struct Settings {
    /// Input format used when `--type` is not given: toml, yaml, hcl, json or props.
    pub format: Option<String>,

    /// Prefix for all keys, used when `--prefix` is not given.
    #[config(default = "")]
    pub prefix: String,

    /// Emit keys in sorted order instead of document order.
    #[config(default = false)]
    pub sort_keys: bool,

    /// Logging.
    #[config(nested)]
    pub log: LogSettings,
}

#[derive(Config, Serialize, Debug, PartialEq)]
pub struct LogSettings {
    /// Tracing filter used when RUST_LOG is not set, e.g. "warn" or "consul_cfg=debug".
    #[config(default = "warn")]
    pub level: String,
}

impl Settings {
    /// The configured input format. A missing format is an error.
    pub fn input_format(&self) -> Result<Format, ConsulCfgError> {
        self.format
            .as_deref()
            .ok_or(ConsulCfgError::FormatRequired)?
            .parse()
    }

    /// A converter set up with the configured format, prefix and ordering.
    pub fn converter(&self) -> Result<Converter, ConsulCfgError> {
        Ok(Converter::new(self.input_format()?)
            .prefix(self.prefix.as_str())
            .sort_keys(self.sort_keys))
    }

    /// Commented TOML template generated from the doc comments above.
    pub fn template() -> String {
        confique::toml::template::<Settings>(confique::toml::FormatOptions::default())
    }

    /// Resolved settings as `/`-delimited key-value pairs.
    pub fn entries(&self) -> Result<Vec<KvPair>, ConsulCfgError> {
        let value = toml::Value::try_from(self).map_err(|e| ConsulCfgError::InvalidSetting {
            key: "<settings>".into(),
            reason: e.to_string(),
        })?;
        flatten::flatten("", &Node::from(value))
    }
}

/// Loads [`Settings`] from files, environment and command-line overrides.
pub struct SettingsLoader {
    search_paths: Vec<SearchPath>,
    explicit_file: Option<PathBuf>,
    env_prefix: Option<String>,
    strict: bool,
    cli_overrides: Vec<(String, toml::Value)>,
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsLoader {
    pub fn new() -> Self {
        Self {
            search_paths: vec![
                SearchPath::Platform,
                SearchPath::Home(".consul-cfg"),
                SearchPath::Cwd,
            ],
            explicit_file: None,
            env_prefix: Some(ENV_PREFIX.to_string()),
            strict: true,
            cli_overrides: Vec::new(),
        }
    }

    /// Replace the directories searched for `consul-cfg.toml`. Last = highest priority.
    pub fn search_paths(mut self, paths: Vec<SearchPath>) -> Self {
        self.search_paths = paths;
        self
    }

    /// Read exactly this settings file instead of searching. The file must exist.
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_file = Some(path.into());
        self
    }

    pub fn no_env(mut self) -> Self {
        self.env_prefix = None;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Override a dotted settings key. `None` leaves lower layers in charge.
    pub fn cli_override<V: Into<toml::Value>>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(v) = value {
            self.cli_overrides.push((key.to_string(), v.into()));
        }
        self
    }

    fn build_input(&self) -> Result<ResolveInput, ConsulCfgError> {
        let files = match &self.explicit_file {
            Some(path) => vec![file::read_settings_file(path)?],
            None => file::load_settings_files(&self.search_paths, FILE_NAME, APP_NAME)?,
        };
        let env_vars = match self.env_prefix {
            Some(_) => std::env::vars().collect(),
            None => Vec::new(),
        };

        Ok(ResolveInput {
            files,
            env_vars,
            env_prefix: self.env_prefix.clone(),
            cli_overrides: self.cli_overrides.clone(),
            strict: self.strict,
        })
    }

    pub fn load(self) -> Result<Settings, ConsulCfgError> {
        let input = self.build_input()?;
        resolve::resolve(input)
    }
}
