use std::fmt;
use std::io::Read;
use std::path::PathBuf;

use tracing::debug;

use crate::error::ConsulCfgError;

/// Where a document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// One source per path, or stdin alone when no path is given.
    pub fn from_paths(paths: Vec<PathBuf>) -> Vec<InputSource> {
        if paths.is_empty() {
            vec![InputSource::Stdin]
        } else {
            paths.into_iter().map(InputSource::File).collect()
        }
    }

    /// Read the whole source as UTF-8 text.
    ///
    /// An I/O failure is [`ConsulCfgError::InputUnavailable`]; bytes that were
    /// read but are not UTF-8 are [`ConsulCfgError::InvalidText`].
    pub fn read(&self) -> Result<String, ConsulCfgError> {
        let result = match self {
            InputSource::Stdin => {
                let mut bytes = Vec::new();
                std::io::stdin().read_to_end(&mut bytes).map(|_| bytes)
            }
            InputSource::File(path) => std::fs::read(path),
        };

        let bytes = result.map_err(|source| ConsulCfgError::InputUnavailable {
            origin: self.to_string(),
            source,
        })?;
        debug!(origin = %self, bytes = bytes.len(), "read input");
        text(&self.to_string(), bytes)
    }
}

fn text(origin: &str, bytes: Vec<u8>) -> Result<String, ConsulCfgError> {
    String::from_utf8(bytes).map_err(|source| ConsulCfgError::InvalidText {
        origin: origin.to_string(),
        source,
    })
}

impl fmt::Display for InputSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputSource::Stdin => f.write_str("<stdin>"),
            InputSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}
