use std::path::PathBuf;
use thiserror::Error;

use crate::types::Format;

#[derive(Debug, Error)]
pub enum ConsulCfgError {
    #[error(
        "Invalid input format '{0}'. Available options are `toml`, `yaml`, `hcl`, `json` and `props` (Java properties)"
    )]
    UnsupportedFormat(String),

    #[error("No input format given. Pass --type or set `format` in the settings file")]
    FormatRequired,

    #[error("Failed to read input {origin}: {source}")]
    InputUnavailable {
        origin: String,
        source: std::io::Error,
    },

    #[error("Input {origin} is not valid UTF-8: {source}")]
    InvalidText {
        origin: String,
        source: std::string::FromUtf8Error,
    },

    #[error("Failed to parse {origin} as {format}: {source}")]
    Decode {
        origin: String,
        format: Format,
        source: DecodeFailure,
    },

    #[error("Failed to encode value of '{key}': {source}")]
    Encoding {
        key: String,
        source: serde_json::Error,
    },

    #[error("Mapping key {key} in {origin} cannot be used as a unique key path segment")]
    InternalConsistency { origin: String, key: String },

    #[error("Input root must be a mapping, found a {kind}")]
    NonMappingRoot { kind: &'static str },

    #[error("Failed to write output: {0}")]
    Output(#[source] serde_json::Error),

    #[error("Unknown setting '{key}' in {path} (line {line})")]
    UnknownSetting {
        key: String,
        path: PathBuf,
        line: usize,
    },

    #[error("Unknown settings in settings file")]
    UnknownSettings(Vec<ConsulCfgError>),

    #[error("Failed to parse settings file {path}: {source}")]
    SettingsParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Failed to read settings file {path}: {source}")]
    SettingsIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Settings error: {0}")]
    Settings(#[from] confique::Error),

    #[error("Invalid value for setting '{key}': {reason}")]
    InvalidSetting { key: String, reason: String },
}

/// The decoder-specific cause behind [`ConsulCfgError::Decode`].
#[derive(Debug, Error)]
pub enum DecodeFailure {
    #[error(transparent)]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Hcl(#[from] hcl::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Props(#[from] java_properties::PropertiesError),
}
