//! Format decoders: raw document text in, [`Node`] tree out.
//!
//! Each format is parsed with its own crate into that crate's value type and
//! then converted into a [`Node`]. All five decoders keep document order.
//!
//! A few per-format rules apply during conversion:
//!
//! - TOML datetimes become string scalars holding their RFC 3339 text.
//! - YAML merge keys (`<<: *base`) are resolved before conversion. String,
//!   number and boolean mapping keys are stringified. Keys that are null,
//!   sequences or mappings cannot be a path segment, and neither can two keys
//!   that stringify to the same text (`1` and `"1"`); both are rejected with
//!   [`ConsulCfgError::InternalConsistency`]. Tags are dropped.
//! - HCL blocks decode to nested mappings, so `resource "a" "b" { x = 1 }`
//!   ends up under `resource/a/b/x`.
//! - Java properties keys are split on `.` into nested mappings. When a key
//!   collides with a shorter one (`a = 1` and `a.b = 2`) the later line wins.
//!
//! A document whose root decodes to null (an empty YAML file, JSON `null`) is
//! treated as an empty mapping.

use tracing::debug;

use crate::error::{ConsulCfgError, DecodeFailure};
use crate::tree::{Mapping, Node, Scalar};
use crate::types::Format;

/// Decode `content` according to `format`.
///
/// `origin` names the input in error messages (a file path or `<stdin>`).
pub fn decode(format: Format, origin: &str, content: &str) -> Result<Node, ConsulCfgError> {
    let failed = |source: DecodeFailure| ConsulCfgError::Decode {
        origin: origin.to_string(),
        format,
        source,
    };

    let node = match format {
        Format::Toml => {
            let table: toml::Table = toml::from_str(content).map_err(|e| failed(e.into()))?;
            Node::from(toml::Value::Table(table))
        }
        Format::Yaml => {
            let mut value: serde_yaml::Value =
                serde_yaml::from_str(content).map_err(|e| failed(e.into()))?;
            value.apply_merge().map_err(|e| failed(e.into()))?;
            from_yaml(origin, value)?
        }
        Format::Hcl => {
            let value: hcl::Value = hcl::from_str(content).map_err(|e| failed(e.into()))?;
            Node::from(value)
        }
        Format::Json => {
            let value: serde_json::Value =
                serde_json::from_str(content).map_err(|e| failed(e.into()))?;
            Node::from(value)
        }
        Format::Props => from_props(content).map_err(|e| failed(e.into()))?,
    };

    let node = match node {
        Node::Scalar(Scalar::Null) => Node::empty_mapping(),
        other => other,
    };
    debug!(origin, %format, kind = node.kind(), "decoded input");
    Ok(node)
}

impl From<toml::Value> for Node {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => Node::from(s),
            toml::Value::Integer(i) => Node::from(i),
            toml::Value::Float(f) => Node::from(f),
            toml::Value::Boolean(b) => Node::from(b),
            toml::Value::Datetime(dt) => Node::from(dt.to_string()),
            toml::Value::Array(items) => items.into_iter().map(Node::from).collect::<Vec<_>>().into(),
            toml::Value::Table(table) => table.into_iter().map(|(k, v)| (k, Node::from(v))).collect(),
        }
    }
}

impl From<serde_json::Value> for Node {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Scalar::Null.into(),
            serde_json::Value::Bool(b) => Node::from(b),
            serde_json::Value::Number(n) => json_number(&n).into(),
            serde_json::Value::String(s) => Node::from(s),
            serde_json::Value::Array(items) => {
                items.into_iter().map(Node::from).collect::<Vec<_>>().into()
            }
            serde_json::Value::Object(map) => {
                map.into_iter().map(|(k, v)| (k, Node::from(v))).collect()
            }
        }
    }
}

impl From<hcl::Value> for Node {
    fn from(value: hcl::Value) -> Self {
        match value {
            hcl::Value::Null => Scalar::Null.into(),
            hcl::Value::Bool(b) => Node::from(b),
            hcl::Value::Number(n) => hcl_number(&n).into(),
            hcl::Value::String(s) => Node::from(s),
            hcl::Value::Array(items) => items.into_iter().map(Node::from).collect::<Vec<_>>().into(),
            hcl::Value::Object(map) => map.into_iter().map(|(k, v)| (k, Node::from(v))).collect(),
        }
    }
}

fn json_number(n: &serde_json::Number) -> Scalar {
    if let Some(i) = n.as_i64() {
        Scalar::Integer(i.into())
    } else if let Some(u) = n.as_u64() {
        Scalar::Integer(u.into())
    } else {
        Scalar::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn hcl_number(n: &hcl::Number) -> Scalar {
    if let Some(i) = n.as_i64() {
        Scalar::Integer(i.into())
    } else if let Some(u) = n.as_u64() {
        Scalar::Integer(u.into())
    } else {
        Scalar::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn from_yaml(origin: &str, value: serde_yaml::Value) -> Result<Node, ConsulCfgError> {
    use serde_yaml::Value;

    Ok(match value {
        Value::Null => Scalar::Null.into(),
        Value::Bool(b) => Node::from(b),
        Value::Number(n) => yaml_number(&n).into(),
        Value::String(s) => Node::from(s),
        Value::Sequence(items) => items
            .into_iter()
            .map(|item| from_yaml(origin, item))
            .collect::<Result<Vec<_>, _>>()?
            .into(),
        Value::Mapping(map) => {
            let mut mapping = Mapping::with_capacity(map.len());
            for (key, value) in map {
                let key = yaml_key(origin, key)?;
                if mapping.contains_key(&key) {
                    return Err(ConsulCfgError::InternalConsistency {
                        origin: origin.to_string(),
                        key,
                    });
                }
                mapping.insert(key, from_yaml(origin, value)?);
            }
            Node::Mapping(mapping)
        }
        Value::Tagged(tagged) => from_yaml(origin, tagged.value)?,
    })
}

fn yaml_number(n: &serde_yaml::Number) -> Scalar {
    if let Some(i) = n.as_i64() {
        Scalar::Integer(i.into())
    } else if let Some(u) = n.as_u64() {
        Scalar::Integer(u.into())
    } else {
        Scalar::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

/// Coerce a YAML mapping key into a path segment.
fn yaml_key(origin: &str, key: serde_yaml::Value) -> Result<String, ConsulCfgError> {
    use serde_yaml::Value;

    match key {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Tagged(tagged) => yaml_key(origin, tagged.value),
        other => Err(ConsulCfgError::InternalConsistency {
            origin: origin.to_string(),
            key: serde_json::to_string(&other).unwrap_or_else(|_| format!("{other:?}")),
        }),
    }
}

fn from_props(content: &str) -> Result<Node, java_properties::PropertiesError> {
    let mut root = Mapping::new();
    java_properties::PropertiesIter::new_with_encoding(content.as_bytes(), encoding_rs::UTF_8)
        .read_into(|key, value| {
            let segments: Vec<&str> = key.split('.').collect();
            insert_nested(&mut root, &segments, Node::from(value));
        })?;
    Ok(Node::Mapping(root))
}

/// Insert `value` at the dotted path `segments`, replacing any scalar that
/// sits where a mapping is needed.
fn insert_nested(mapping: &mut Mapping, segments: &[&str], value: Node) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };

    if rest.is_empty() {
        mapping.insert(first.to_string(), value);
        return;
    }

    let slot = mapping
        .entry(first.to_string())
        .or_insert_with(Node::empty_mapping);
    if !matches!(slot, Node::Mapping(_)) {
        *slot = Node::empty_mapping();
    }
    if let Node::Mapping(sub) = slot {
        insert_nested(sub, rest, value);
    }
}
