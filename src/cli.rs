//! Command-line interface for the `consul-cfg` binary.
//!
//! Compiled only with the `cli` Cargo feature (on by default). Parsed flags
//! are fed into [`SettingsLoader`] as the highest-priority layer, so
//! `--type`, `--prefix` and `--sort-keys` can each be defaulted from a
//! settings file or `CONSUL_CFG__*` variables.
//!
//! Only the JSON result goes to stdout. Logs and errors go to stderr.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::input::InputSource;
use crate::output::write_json;
use crate::settings::{Settings, SettingsLoader};

/// Prepare application config for Consul.
///
/// Converts config files (TOML, YAML, HCL, JSON, Java properties) into the
/// JSON produced by `consul kv export`, ready for `consul kv import`.
#[derive(Debug, Parser)]
#[command(name = "consul-cfg", version, propagate_version = true)]
pub struct Cli {
    /// Read settings from this file instead of searching for consul-cfg.toml.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Log debug output to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Convert config files to Consul KV pairs JSON.
    Kv(KvArgs),

    /// Show or generate consul-cfg's own settings.
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Debug, Args)]
pub struct KvArgs {
    /// Input config format type. Available options are `toml`, `yaml`, `hcl`, `json` and `props` (Java properties).
    #[arg(short = 't', long = "type", value_name = "FORMAT")]
    pub format: Option<String>,

    /// Prefix for all keys.
    #[arg(short, long)]
    pub prefix: Option<String>,

    /// Emit keys in sorted order instead of document order.
    #[arg(long)]
    pub sort_keys: bool,

    /// Config files to convert, in order. Reads stdin when none are given.
    #[arg(value_name = "FILE")]
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Print a commented sample settings file.
    Gen,
    /// Print the resolved settings.
    List,
}

impl Cli {
    fn settings_loader(&self) -> SettingsLoader {
        let mut loader = SettingsLoader::new();
        if let Some(path) = &self.config {
            loader = loader.file(path);
        }
        if let Command::Kv(args) = &self.command {
            loader = loader
                .cli_override("format", args.format.clone())
                .cli_override("prefix", args.prefix.clone())
                .cli_override("sort_keys", args.sort_keys.then_some(true));
        }
        loader
    }
}

/// Parse `std::env::args` and run, writing results to stdout.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    run_with(cli, std::io::stdout().lock())
}

/// Run an already parsed command line, writing results to `out`.
pub fn run_with<W: Write>(cli: Cli, mut out: W) -> Result<()> {
    let settings = cli.settings_loader().load()?;
    init_tracing(cli.verbose, &settings.log.level);

    match cli.command {
        Command::Kv(args) => {
            // Resolve the format before touching any input.
            let converter = settings.converter()?;
            let sources = InputSource::from_paths(args.files);
            let pairs = converter.convert(&sources)?;
            write_json(out, &pairs)?;
        }
        Command::Settings {
            action: SettingsAction::Gen,
        } => {
            write!(out, "{}", Settings::template())?;
        }
        Command::Settings {
            action: SettingsAction::List,
        } => {
            for pair in settings.entries()? {
                writeln!(out, "{} = {}", pair.key, pair.value)?;
            }
        }
    }
    Ok(())
}

/// Install the stderr subscriber. `RUST_LOG` wins, then `--verbose`, then
/// the `log.level` setting.
fn init_tracing(verbose: bool, level: &str) {
    let mut invalid_level = false;
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) if verbose => EnvFilter::new("debug"),
        Err(_) => EnvFilter::try_new(level).unwrap_or_else(|_| {
            invalid_level = true;
            EnvFilter::new("warn")
        }),
    };

    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    if invalid_level {
        tracing::warn!(level, "invalid log.level setting, falling back to warn");
    }
}
