//! Format-independent configuration tree.
//!
//! Every decoder produces a [`Node`]. The flattener matches on it
//! exhaustively, so a node is always exactly one of mapping, sequence or
//! scalar.
//!
//! `Node` implements [`Serialize`] as plain JSON-shaped data. This is the
//! encoding used for non-string leaves: `[1, 2]` becomes `[1,2]`, `true`
//! becomes `true`. Floats JSON cannot represent (NaN and the infinities) fail
//! to serialize instead of silently turning into `null`.

use indexmap::IndexMap;
use serde::ser::{self, Serialize, SerializeMap, SerializeSeq, Serializer};

/// String-keyed mapping, in the order the decoder reported its entries.
pub type Mapping = IndexMap<String, Node>;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Mapping(Mapping),
    Sequence(Vec<Node>),
    Scalar(Scalar),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    /// Wide enough for both signed and unsigned 64-bit decoder integers.
    Integer(i128),
    Float(f64),
    String(String),
}

impl Node {
    pub fn empty_mapping() -> Self {
        Node::Mapping(Mapping::new())
    }

    /// Short kind name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Mapping(_) => "mapping",
            Node::Sequence(_) => "sequence",
            Node::Scalar(Scalar::Null) => "null",
            Node::Scalar(Scalar::Bool(_)) => "boolean",
            Node::Scalar(Scalar::Integer(_)) => "integer",
            Node::Scalar(Scalar::Float(_)) => "float",
            Node::Scalar(Scalar::String(_)) => "string",
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Node::Mapping(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Sort mapping keys at every level, including mappings inside sequences.
    pub fn sort_keys(&mut self) {
        match self {
            Node::Mapping(mapping) => {
                mapping.sort_keys();
                mapping.values_mut().for_each(Node::sort_keys);
            }
            Node::Sequence(items) => items.iter_mut().for_each(Node::sort_keys),
            Node::Scalar(_) => {}
        }
    }
}

impl From<Scalar> for Node {
    fn from(scalar: Scalar) -> Self {
        Node::Scalar(scalar)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::Scalar(Scalar::String(s.to_string()))
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::Scalar(Scalar::String(s))
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Scalar(Scalar::Bool(b))
    }
}

impl From<i64> for Node {
    fn from(i: i64) -> Self {
        Node::Scalar(Scalar::Integer(i.into()))
    }
}

impl From<f64> for Node {
    fn from(f: f64) -> Self {
        Node::Scalar(Scalar::Float(f))
    }
}

impl From<Vec<Node>> for Node {
    fn from(items: Vec<Node>) -> Self {
        Node::Sequence(items)
    }
}

impl From<Mapping> for Node {
    fn from(mapping: Mapping) -> Self {
        Node::Mapping(mapping)
    }
}

impl<K: Into<String>> FromIterator<(K, Node)> for Node {
    fn from_iter<I: IntoIterator<Item = (K, Node)>>(iter: I) -> Self {
        Node::Mapping(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Mapping(mapping) => {
                let mut map = serializer.serialize_map(Some(mapping.len()))?;
                for (key, value) in mapping {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Node::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Node::Scalar(scalar) => scalar.serialize(serializer),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_unit(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Integer(i) => serializer.serialize_i128(*i),
            Scalar::Float(f) if f.is_finite() => serializer.serialize_f64(*f),
            Scalar::Float(f) => Err(ser::Error::custom(format!(
                "unsupported float value: {f}"
            ))),
            Scalar::String(s) => serializer.serialize_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_json(node: &Node) -> String {
        serde_json::to_string(node).unwrap()
    }

    #[test]
    fn scalars_encode_as_json() {
        assert_eq!(to_json(&Node::from(5432_i64)), "5432");
        assert_eq!(to_json(&Node::from(true)), "true");
        assert_eq!(to_json(&Node::Scalar(Scalar::Null)), "null");
        assert_eq!(to_json(&Node::from(1.5)), "1.5");
        assert_eq!(to_json(&Node::from("a\"b")), r#""a\"b""#);
    }

    #[test]
    fn wide_integers_survive() {
        let big = Node::Scalar(Scalar::Integer(u64::MAX.into()));
        assert_eq!(to_json(&big), "18446744073709551615");
    }

    #[test]
    fn sequences_encode_compactly() {
        let node = Node::from(vec![Node::from(1_i64), Node::from(2_i64)]);
        assert_eq!(to_json(&node), "[1,2]");
    }

    #[test]
    fn mappings_keep_insertion_order() {
        let node: Node = [("b", Node::from(1_i64)), ("a", Node::from(2_i64))]
            .into_iter()
            .collect();
        assert_eq!(to_json(&node), r#"{"b":1,"a":2}"#);
    }

    #[test]
    fn non_finite_float_fails() {
        assert!(serde_json::to_string(&Node::from(f64::NAN)).is_err());
        assert!(serde_json::to_string(&Node::from(f64::INFINITY)).is_err());
    }

    #[test]
    fn sort_keys_reaches_into_sequences() {
        let inner: Node = [("z", Node::from(1_i64)), ("a", Node::from(2_i64))]
            .into_iter()
            .collect();
        let mut node: Node = [
            ("list", Node::from(vec![inner])),
            ("b", Node::from("x")),
        ]
        .into_iter()
        .collect();
        node.sort_keys();
        assert_eq!(to_json(&node), r#"{"b":"x","list":[{"a":2,"z":1}]}"#);
    }

    #[test]
    fn kind_names() {
        assert_eq!(Node::empty_mapping().kind(), "mapping");
        assert_eq!(Node::from(vec![]).kind(), "sequence");
        assert_eq!(Node::from("x").kind(), "string");
    }
}
