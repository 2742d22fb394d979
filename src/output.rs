//! Render KV pairs as the JSON document `consul kv import` reads.

use std::io::Write;

use crate::error::ConsulCfgError;
use crate::types::KvPair;

/// Pretty-printed JSON array with two-space indentation.
pub fn to_json(pairs: &[KvPair]) -> Result<String, ConsulCfgError> {
    serde_json::to_string_pretty(pairs).map_err(ConsulCfgError::Output)
}

/// Write [`to_json`] output followed by a newline.
pub fn write_json<W: Write>(mut out: W, pairs: &[KvPair]) -> Result<(), ConsulCfgError> {
    serde_json::to_writer_pretty(&mut out, pairs).map_err(ConsulCfgError::Output)?;
    writeln!(out)
        .and_then(|()| out.flush())
        .map_err(|e| ConsulCfgError::Output(serde_json::Error::io(e)))
}
