//! Merge pre-loaded settings layers into a typed [`Settings`]. No I/O.
//!
//! Files (lowest first), then environment, then command-line overrides are
//! deep-merged as TOML tables. The result is deserialized into the confique
//! layer and confique fills in the defaults.

use std::path::PathBuf;

use confique::Config;
use toml::{Table, Value};

use super::env::env_to_table;
use super::merge::{deep_merge, overrides_to_table};
use super::validate::validate_unknown_keys;
use super::Settings;
use crate::error::ConsulCfgError;

/// Everything the resolver needs, gathered up front.
pub struct ResolveInput {
    /// Settings file contents, lowest priority first.
    pub files: Vec<(PathBuf, String)>,
    pub env_vars: Vec<(String, String)>,
    /// `None` disables the environment layer.
    pub env_prefix: Option<String>,
    /// `(dotted_key, value)` pairs from command-line flags.
    pub cli_overrides: Vec<(String, Value)>,
    pub strict: bool,
}

pub fn resolve(input: ResolveInput) -> Result<Settings, ConsulCfgError> {
    let mut merged = Table::new();

    for (path, content) in &input.files {
        if input.strict {
            validate_unknown_keys(content, path)?;
        }
        let table: Table = toml::from_str(content).map_err(|source| ConsulCfgError::SettingsParse {
            path: path.clone(),
            source,
        })?;
        merged = deep_merge(merged, table);
    }

    if let Some(prefix) = &input.env_prefix {
        merged = deep_merge(merged, env_to_table(prefix, input.env_vars));
    }

    if !input.cli_overrides.is_empty() {
        merged = deep_merge(merged, overrides_to_table(&input.cli_overrides));
    }

    let layer: <Settings as Config>::Layer =
        Value::Table(merged)
            .try_into()
            .map_err(|e: toml::de::Error| ConsulCfgError::InvalidSetting {
                key: "<merged>".into(),
                reason: e.to_string(),
            })?;

    Ok(Settings::builder().preloaded(layer).load()?)
}
