//! Convert configuration files into Consul KV import JSON.
//!
//! consul-cfg reads TOML, YAML, HCL, JSON or Java properties documents and
//! emits the same JSON array `consul kv export` produces, so the result can
//! be loaded with `consul kv import`:
//!
//! ```text
//! consul-cfg kv --type toml config1.toml config2.toml
//! cat config.toml | consul-cfg kv --type toml --prefix myconfig/app
//! ```
//!
//! ```ignore
//! let pairs = Converter::new(Format::Toml)
//!     .prefix("myconfig/app")
//!     .convert(&[InputSource::File("config.toml".into())])?;
//! write_json(std::io::stdout(), &pairs)?;
//! ```
//!
//! # Pipeline
//!
//! Every input goes through three steps, one input at a time:
//!
//! 1. **Read** ([`InputSource`]): a named file, or stdin when no file is given.
//! 2. **Decode** ([`decode()`]): the text is parsed in the selected [`Format`]
//!    into a [`Node`] tree of mappings, sequences and scalars.
//! 3. **Flatten** ([`KvBuilder`]): the tree is walked depth-first. Nested
//!    mapping keys are joined with `/` under the optional prefix, and every
//!    non-mapping node becomes one [`KvPair`].
//!
//! The pairs of all inputs are concatenated in input order and written by
//! [`write_json`] as a two-space indented array.
//!
//! # Leaf values
//!
//! Consul stores opaque strings, so leaves are encoded:
//!
//! | Leaf | Stored value |
//! |------|--------------|
//! | `"localhost"` | `localhost` (verbatim, no quotes) |
//! | `5432` | `5432` |
//! | `true` | `true` |
//! | `["a", "b"]` | `["a","b"]` |
//! | `[{name = "x"}]` | `[{"name":"x"}]` |
//!
//! Everything except strings is compact JSON. TOML and YAML can express
//! NaN and infinity, which JSON cannot; such leaves fail the conversion.
//!
//! # Ordering
//!
//! Keys come out in document order. Set `sort_keys` (or pass `--sort-keys`)
//! to sort keys at every level instead.
//!
//! # Error handling
//!
//! All fallible operations return [`ConsulCfgError`]. Processing is
//! fail-fast: the first unreadable input, parse error or unencodable value
//! aborts the conversion and nothing is emitted. A document whose root is
//! not a mapping is rejected rather than given an invented key.
//!
//! # Settings
//!
//! The binary reads defaults for its flags from `consul-cfg.toml` and
//! `CONSUL_CFG__*` environment variables; see [`settings`].

pub mod error;
pub mod settings;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;
mod convert;
mod decode;
mod flatten;
mod input;
mod output;
mod tree;

pub use convert::Converter;
pub use decode::decode;
pub use error::{ConsulCfgError, DecodeFailure};
pub use flatten::{KvBuilder, SEPARATOR, encode_leaf, flatten};
pub use input::InputSource;
pub use output::{to_json, write_json};
pub use settings::{LogSettings, Settings, SettingsLoader};
pub use tree::{Mapping, Node, Scalar};
pub use types::{Format, KvPair, SearchPath};
