//! Strict mode: reject settings files with keys [`Settings`] does not know.
//!
//! The file is deserialized into the all-optional confique layer through
//! `serde_ignored`, which reports every key the layer skipped.

use std::path::Path;

use confique::Config;

use super::Settings;
use crate::error::ConsulCfgError;

type SettingsLayer = <Settings as Config>::Layer;

pub fn validate_unknown_keys(content: &str, path: &Path) -> Result<(), ConsulCfgError> {
    let mut unknown: Vec<String> = Vec::new();

    let deserializer = toml::Deserializer::new(content);
    let _layer: SettingsLayer = serde_ignored::deserialize(deserializer, |ignored| {
        unknown.push(ignored.to_string());
    })
    .map_err(|source| ConsulCfgError::SettingsParse {
        path: path.to_path_buf(),
        source,
    })?;

    if unknown.is_empty() {
        return Ok(());
    }

    let errors = unknown
        .into_iter()
        .map(|key| ConsulCfgError::UnknownSetting {
            line: key_line(content, &key),
            key,
            path: path.to_path_buf(),
        })
        .collect();
    Err(ConsulCfgError::UnknownSettings(errors))
}

/// 1-based line where `dotted_key` is assigned, or 0 if it cannot be found.
///
/// Tracks plain `[section]` headers only; inline tables and quoted keys are
/// not recognized.
fn key_line(content: &str, dotted_key: &str) -> usize {
    let (section, leaf) = match dotted_key.rsplit_once('.') {
        Some((section, leaf)) => (section, leaf),
        None => ("", dotted_key),
    };

    let mut current = String::new();
    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if let Some(header) = trimmed
            .strip_prefix('[')
            .filter(|h| !h.starts_with('['))
            .and_then(|h| h.strip_suffix(']'))
        {
            current = header.split('.').map(str::trim).collect::<Vec<_>>().join(".");
            continue;
        }

        if current == section
            && trimmed
                .strip_prefix(leaf)
                .is_some_and(|rest| rest.trim_start().starts_with('='))
        {
            return index + 1;
        }
    }
    0
}
