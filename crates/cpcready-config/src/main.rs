//! CPCReady configuration launcher — entry point.
//!
//! A headless front end for the same edit session a form UI uses.  It is
//! handy in scripts and over SSH, where no desktop is available.
//!
//! # Usage
//!
//! ```text
//! cpcready-config [--config-root <DIR>] <COMMAND>
//!
//! Commands:
//!   path                     Print the path of cpcready.toml
//!   show                     Print the whole configuration
//!   get <FIELD>              Print one field, e.g. `get system.model`
//!   set <FIELD=VALUE>...     Change fields, validate, and save
//!   reset                    Overwrite the configuration with defaults
//!   validate                 Check the stored configuration
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable               | Description                                  |
//! |------------------------|----------------------------------------------|
//! | `CPCREADY_CONFIG_ROOT` | Directory that holds the `cpcready/` folder  |
//! | `RUST_LOG`             | Log filter, e.g. `debug` (default `warn`)    |

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use cpcready_config::application::edit_session::EditSession;
use cpcready_config::infrastructure::storage::config::ConfigStore;
use cpcready_core::{ConfigField, ConfigurationDocument};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// CPCReady configuration editor.
#[derive(Debug, Parser)]
#[command(
    name = "cpcready-config",
    about = "View and edit the CPCReady configuration file",
    version
)]
struct Cli {
    /// Directory holding the `cpcready/` configuration folder.
    ///
    /// Defaults to the platform per-user config directory.
    #[arg(long, global = true, env = "CPCREADY_CONFIG_ROOT")]
    config_root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the path of the configuration file.
    Path,
    /// Print the whole configuration as TOML.
    Show,
    /// Print a single field.
    Get {
        /// Field path such as `drive.selected_drive`.
        field: ConfigField,
    },
    /// Change one or more fields, validate, and save.
    Set {
        /// Assignments such as `system.user=7`.
        #[arg(required = true, value_parser = parse_assignment)]
        assignments: Vec<(ConfigField, String)>,
    },
    /// Overwrite the configuration with the defaults.
    Reset,
    /// Check that the stored configuration parses and is valid.
    Validate,
}

fn parse_assignment(s: &str) -> Result<(ConfigField, String), String> {
    let (path, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got \"{s}\""))?;
    let field = path.trim().parse::<ConfigField>().map_err(|e| e.to_string())?;
    Ok((field, value.to_string()))
}

impl Cli {
    fn store(&self) -> anyhow::Result<ConfigStore> {
        match &self.config_root {
            Some(root) => Ok(ConfigStore::new(root)),
            None => ConfigStore::for_current_user().context("cannot locate the config directory"),
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `show` and `get` output stays pipeable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = cli.store()?;

    match cli.command {
        Command::Path => println!("{}", store.path().display()),
        Command::Show => {
            let session = open_session(store)?;
            print!("{}", toml::to_string_pretty(session.draft())?);
        }
        Command::Get { field } => {
            let session = open_session(store)?;
            println!("{}", session.draft().get_field(field));
        }
        Command::Set { assignments } => {
            let mut session = open_session(store)?;
            for (field, value) in &assignments {
                session
                    .edit(*field, value)
                    .with_context(|| format!("cannot set {field}"))?;
            }
            session.save().context("configuration not saved")?;
            info!("updated {} field(s)", assignments.len());
        }
        Command::Reset => {
            store
                .save(&ConfigurationDocument::default())
                .context("cannot write default configuration")?;
            println!("{}", store.path().display());
        }
        Command::Validate => {
            let document = store.load().context("configuration cannot be read")?;
            if let Err(e) = document.validate() {
                bail!("{}: {e}", store.path().display());
            }
            println!("{}: ok", store.path().display());
        }
    }
    Ok(())
}

/// Opens an edit session, creating the default file on first run.
fn open_session(store: ConfigStore) -> anyhow::Result<EditSession<ConfigStore>> {
    let path = store.path().to_path_buf();
    EditSession::open(store)
        .with_context(|| format!("cannot open configuration at {}", path.display()))
}
