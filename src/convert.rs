//! The `kv` pipeline: read each input, decode it, flatten it into one set.
//!
//! Processing is strictly sequential and fail-fast. The first unreadable
//! input, decode failure or encoding failure aborts the whole conversion and
//! no pairs are returned.

use tracing::debug;

use crate::decode::decode;
use crate::error::ConsulCfgError;
use crate::flatten::KvBuilder;
use crate::input::InputSource;
use crate::types::{Format, KvPair};

/// Converts configuration documents of one format into KV pairs.
#[derive(Debug, Clone)]
pub struct Converter {
    format: Format,
    prefix: String,
    sort_keys: bool,
}

impl Converter {
    pub fn new(format: Format) -> Self {
        Self {
            format,
            prefix: String::new(),
            sort_keys: false,
        }
    }

    /// Key prefix applied to every input. Empty means no prefix.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn sort_keys(mut self, sort: bool) -> Self {
        self.sort_keys = sort;
        self
    }

    pub fn format(&self) -> Format {
        self.format
    }

    /// Read, decode and flatten every source in order.
    pub fn convert(&self, sources: &[InputSource]) -> Result<Vec<KvPair>, ConsulCfgError> {
        let mut builder = self.builder();
        for source in sources {
            let content = source.read()?;
            self.convert_into(&mut builder, &source.to_string(), &content)?;
        }
        debug!(sources = sources.len(), pairs = builder.len(), "conversion finished");
        Ok(builder.into_pairs())
    }

    /// Convert a single in-memory document.
    pub fn convert_str(&self, origin: &str, content: &str) -> Result<Vec<KvPair>, ConsulCfgError> {
        let mut builder = self.builder();
        self.convert_into(&mut builder, origin, content)?;
        Ok(builder.into_pairs())
    }

    /// Decode `content` and append its pairs to `builder`.
    pub fn convert_into(
        &self,
        builder: &mut KvBuilder,
        origin: &str,
        content: &str,
    ) -> Result<(), ConsulCfgError> {
        let tree = decode(self.format, origin, content)?;
        builder.push(&self.prefix, &tree)
    }

    fn builder(&self) -> KvBuilder {
        KvBuilder::new().sort_keys(self.sort_keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> InputSource {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        InputSource::File(path)
    }

    fn find<'a>(pairs: &'a [KvPair], key: &str) -> Option<&'a str> {
        pairs.iter().find(|p| p.key == key).map(|p| p.value.as_str())
    }

    #[test]
    fn json_database_example() {
        let pairs = Converter::new(Format::Json)
            .convert_str("app.json", r#"{"db": {"host": "localhost", "port": 5432}}"#)
            .unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(find(&pairs, "db/host"), Some("localhost"));
        assert_eq!(find(&pairs, "db/port"), Some("5432"));
    }

    #[test]
    fn prefixed_sequence_example() {
        let pairs = Converter::new(Format::Json)
            .prefix("app")
            .convert_str("app.json", r#"{"tags": ["a","b"]}"#)
            .unwrap();
        assert_eq!(pairs, vec![KvPair::new("app/tags", r#"["a","b"]"#)]);
    }

    #[test]
    fn empty_mapping_example() {
        let pairs = Converter::new(Format::Json).convert_str("app.json", "{}").unwrap();
        assert!(pairs.is_empty());
    }

    #[test]
    fn toml_array_of_tables_is_json_encoded() {
        let content = r#"
[[servers]]
name = "alpha"

[[servers]]
name = "beta"
"#;
        let pairs = Converter::new(Format::Toml).convert_str("app.toml", content).unwrap();
        assert_eq!(
            pairs,
            vec![KvPair::new("servers", r#"[{"name":"alpha"},{"name":"beta"}]"#)]
        );
    }

    #[test]
    fn toml_infinity_is_encoding_error() {
        let err = Converter::new(Format::Toml)
            .convert_str("app.toml", "limit = inf\n")
            .unwrap_err();
        assert!(matches!(err, ConsulCfgError::Encoding { .. }));
    }

    #[test]
    fn yaml_sequence_root_is_rejected() {
        let err = Converter::new(Format::Yaml)
            .convert_str("app.yaml", "- a\n- b\n")
            .unwrap_err();
        assert!(matches!(err, ConsulCfgError::NonMappingRoot { kind: "sequence" }));
    }

    #[test]
    fn files_concatenate_in_argument_order() {
        let dir = TempDir::new().unwrap();
        let first = write(&dir, "one.toml", "a = \"1\"\n");
        let second = write(&dir, "two.toml", "[b]\nc = 2\n");

        let converter = Converter::new(Format::Toml).prefix("svc");
        let combined = converter.convert(&[first.clone(), second.clone()]).unwrap();

        let mut expected = converter.convert(&[first]).unwrap();
        expected.extend(converter.convert(&[second]).unwrap());
        assert_eq!(combined, expected);
        assert_eq!(
            combined,
            vec![KvPair::new("svc/a", "1"), KvPair::new("svc/b/c", "2")]
        );
    }

    #[test]
    fn missing_file_aborts_everything() {
        let dir = TempDir::new().unwrap();
        let good = write(&dir, "good.toml", "a = 1\n");
        let missing = InputSource::File(dir.path().join("missing.toml"));

        let err = Converter::new(Format::Toml)
            .convert(&[good, missing])
            .unwrap_err();
        assert!(matches!(err, ConsulCfgError::InputUnavailable { .. }));
    }

    #[test]
    fn decode_error_names_the_file() {
        let dir = TempDir::new().unwrap();
        let bad = write(&dir, "bad.json", "{not json");
        let err = Converter::new(Format::Json).convert(&[bad]).unwrap_err();
        assert!(matches!(err, ConsulCfgError::Decode { format: Format::Json, .. }));
        assert!(err.to_string().contains("bad.json"));
    }

    #[test]
    fn sorted_conversion() {
        let pairs = Converter::new(Format::Json)
            .sort_keys(true)
            .convert_str("app.json", r#"{"b": "2", "a": "1"}"#)
            .unwrap();
        let keys: Vec<&str> = pairs.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn props_values_stay_strings() {
        let pairs = Converter::new(Format::Props)
            .prefix("java")
            .convert_str("app.properties", "server.port=8080\nserver.debug=true\n")
            .unwrap();
        assert_eq!(
            pairs,
            vec![
                KvPair::new("java/server/port", "8080"),
                KvPair::new("java/server/debug", "true"),
            ]
        );
    }
}
