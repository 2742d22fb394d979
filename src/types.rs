use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConsulCfgError;

/// Input document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Toml,
    Yaml,
    Hcl,
    Json,
    /// Java `.properties` files.
    Props,
}

impl Format {
    /// Every supported format, in the order they are listed to users.
    pub const ALL: [Format; 5] = [
        Format::Toml,
        Format::Yaml,
        Format::Hcl,
        Format::Json,
        Format::Props,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Format::Toml => "toml",
            Format::Yaml => "yaml",
            Format::Hcl => "hcl",
            Format::Json => "json",
            Format::Props => "props",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = ConsulCfgError;

    /// Format names are matched exactly, the way they are spelled on the command line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Format::ALL
            .into_iter()
            .find(|format| format.name() == s)
            .ok_or_else(|| ConsulCfgError::UnsupportedFormat(s.to_string()))
    }
}

/// One entry of a Consul KV export. Field order matches `consul kv export`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KvPair {
    pub key: String,
    /// Reserved by Consul. Always `0` here.
    pub flags: u64,
    pub value: String,
}

impl KvPair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            flags: 0,
            value: value.into(),
        }
    }
}

/// Where to look for the settings file.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchPath {
    /// Platform config directory (XDG on Linux, ~/Library/Application Support on macOS).
    Platform,
    /// A subdirectory under the user's home directory, e.g. `Home(".consul-cfg")`.
    Home(&'static str),
    /// Current working directory.
    Cwd,
    /// An explicit directory.
    Path(PathBuf),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_listed_format() {
        for format in Format::ALL {
            assert_eq!(format.name().parse::<Format>().unwrap(), format);
        }
    }

    #[test]
    fn rejects_unknown_format() {
        let err = "xml".parse::<Format>().unwrap_err();
        assert!(matches!(err, ConsulCfgError::UnsupportedFormat(name) if name == "xml"));
    }

    #[test]
    fn format_names_are_case_sensitive() {
        assert!("TOML".parse::<Format>().is_err());
        assert!("".parse::<Format>().is_err());
    }

    #[test]
    fn kv_pair_serializes_in_export_order() {
        let pair = KvPair::new("db/host", "localhost");
        let json = serde_json::to_string(&pair).unwrap();
        assert_eq!(json, r#"{"key":"db/host","flags":0,"value":"localhost"}"#);
    }
}
