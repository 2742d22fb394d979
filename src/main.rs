//! consul-cfg: turn config files into `consul kv import` JSON.
//!
//! ```text
//! consul-cfg kv --type toml config1.toml config2.toml
//! cat config.toml | consul-cfg kv --type toml --prefix myconfig/app
//! ```

fn main() -> anyhow::Result<()> {
    consul_cfg::cli::run()
}
