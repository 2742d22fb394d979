//! Flatten a configuration tree into Consul KV pairs.
//!
//! Mappings are walked depth-first. Every non-mapping node ends the walk
//! and becomes one [`KvPair`] whose key is the `/`-joined path of mapping
//! keys leading to it:
//!
//! `{db = {host = "localhost", port = 5432}}` → `[("db/host", "localhost"), ("db/port", "5432")]`
//!
//! String leaves are stored verbatim. Any other leaf (numbers, booleans,
//! null, sequences) is stored as its compact JSON text.

use tracing::debug;

use crate::error::ConsulCfgError;
use crate::tree::{Mapping, Node, Scalar};
use crate::types::KvPair;

/// Separator between key path segments.
pub const SEPARATOR: char = '/';

/// Flatten a single tree with `prefix` in front of every key.
pub fn flatten(prefix: &str, tree: &Node) -> Result<Vec<KvPair>, ConsulCfgError> {
    let mut builder = KvBuilder::new();
    builder.push(prefix, tree)?;
    Ok(builder.into_pairs())
}

/// Accumulates KV pairs across any number of input trees, in push order.
#[derive(Debug, Default)]
pub struct KvBuilder {
    pairs: Vec<KvPair>,
    sort_keys: bool,
}

impl KvBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Visit mapping keys in sorted order instead of document order.
    pub fn sort_keys(mut self, sort: bool) -> Self {
        self.sort_keys = sort;
        self
    }

    /// Flatten `tree` and append its pairs.
    ///
    /// The root must be a mapping. On error, pairs already appended by this
    /// call are left in place; callers that need all-or-nothing discard the
    /// builder.
    pub fn push(&mut self, prefix: &str, tree: &Node) -> Result<(), ConsulCfgError> {
        let Node::Mapping(root) = tree else {
            return Err(ConsulCfgError::NonMappingRoot { kind: tree.kind() });
        };

        let before = self.pairs.len();
        if self.sort_keys {
            let mut sorted = Node::Mapping(root.clone());
            sorted.sort_keys();
            if let Node::Mapping(root) = &sorted {
                self.walk(prefix, root)?;
            }
        } else {
            self.walk(prefix, root)?;
        }

        debug!(prefix, pairs = self.pairs.len() - before, "flattened tree");
        Ok(())
    }

    fn walk(&mut self, prefix: &str, mapping: &Mapping) -> Result<(), ConsulCfgError> {
        for (key, value) in mapping {
            let path = join_path(prefix, key);
            match value {
                Node::Mapping(inner) => self.walk(&path, inner)?,
                leaf => {
                    let encoded = encode_leaf(&path, leaf)?;
                    self.pairs.push(KvPair::new(path, encoded));
                }
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[KvPair] {
        &self.pairs
    }

    pub fn into_pairs(self) -> Vec<KvPair> {
        self.pairs
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}{SEPARATOR}{key}")
    }
}

/// Encode a leaf as a KV value: strings as-is, everything else as compact JSON.
pub fn encode_leaf(key: &str, leaf: &Node) -> Result<String, ConsulCfgError> {
    match leaf {
        Node::Scalar(Scalar::String(s)) => Ok(s.clone()),
        other => serde_json::to_string(other).map_err(|source| ConsulCfgError::Encoding {
            key: key.to_string(),
            source,
        }),
    }
}
