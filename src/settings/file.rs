//! Settings file discovery.
//!
//! Each [`SearchPath`] resolves to one directory, checked for
//! `{dir}/consul-cfg.toml`. All files found are returned in search order
//! (last = highest priority) for the resolver to merge. Missing files are
//! skipped; any other I/O error is fatal.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::ConsulCfgError;
use crate::types::SearchPath;

/// Resolve a [`SearchPath`] to a directory, or `None` if it has no meaning
/// on this machine (no home directory, unreadable cwd).
pub fn resolve_search_path(sp: &SearchPath, app_name: &str) -> Option<PathBuf> {
    match sp {
        SearchPath::Platform => {
            let proj = directories::ProjectDirs::from("", "", app_name)?;
            Some(proj.config_dir().to_path_buf())
        }
        SearchPath::Home(subdir) => {
            let user = directories::UserDirs::new()?;
            Some(user.home_dir().join(subdir))
        }
        SearchPath::Cwd => std::env::current_dir().ok(),
        SearchPath::Path(p) => Some(p.clone()),
    }
}

/// Read every `file_name` found under the search paths, lowest priority first.
pub fn load_settings_files(
    search_paths: &[SearchPath],
    file_name: &str,
    app_name: &str,
) -> Result<Vec<(PathBuf, String)>, ConsulCfgError> {
    let mut found = Vec::new();
    for dir in search_paths
        .iter()
        .filter_map(|sp| resolve_search_path(sp, app_name))
    {
        let path = dir.join(file_name);
        match std::fs::read_to_string(&path) {
            Ok(content) => {
                debug!(path = %path.display(), "loaded settings file");
                found.push((path, content));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(source) => return Err(ConsulCfgError::SettingsIo { path, source }),
        }
    }
    Ok(found)
}

/// Read one explicitly named settings file. Unlike discovery, a missing file is an error.
pub fn read_settings_file(path: &Path) -> Result<(PathBuf, String), ConsulCfgError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConsulCfgError::SettingsIo {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), "loaded settings file");
    Ok((path.to_path_buf(), content))
}
