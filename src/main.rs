//! # Vanilla Search CLI (`vsearch`)
//!
//! ## Usage
//!
//! ```bash
//! vsearch --config ./config/vsearch.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `vsearch types` | List search record types and whether their index is live |
//! | `vsearch resolve <guid>` | Decode a Sphinx GUID into record type and ID |
//! | `vsearch header` | Print the header layout for a device/session/state |
//! | `vsearch styles` | Print the header stylesheet (or `--variables`) |
//! | `vsearch serve` | Start the JSON HTTP API |
//!
//! Set `RUST_LOG=debug` for verbose logs on stderr.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use vanilla_search::config::{self, Config};
use vanilla_search::header_cmd::{self, HeaderOptions};
use vanilla_search::{catalog, server};

/// Vanilla Search: search record-type catalog, GUID resolver, and site
/// header tooling for Vanilla Forums.
#[derive(Parser)]
#[command(name = "vsearch", version)]
struct Cli {
    /// Path to configuration file (TOML).
    ///
    /// When the default path does not exist, built-in record types and the
    /// stock theme are used.
    #[arg(long, global = true, default_value = "./config/vsearch.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List search record types.
    Types {
        /// Only types whose index is live on this deployment.
        #[arg(long)]
        active: bool,
    },

    /// Decode a Sphinx GUID into its record type and record ID.
    Resolve {
        /// GUID as stored in the search index.
        #[arg(allow_hyphen_values = true)]
        guid: i64,

        /// Print JSON instead of a summary line.
        #[arg(long)]
        json: bool,
    },

    /// Print the header layout as JSON.
    Header {
        /// Render for a mobile device.
        #[arg(long)]
        mobile: bool,
        /// Render for a signed-out visitor.
        #[arg(long)]
        guest: bool,
        /// Open the compact search box.
        #[arg(long)]
        search_open: bool,
        /// Show search suggestions.
        #[arg(long)]
        suggestions_open: bool,
        /// Page title (enables the mobile drop-down).
        #[arg(long)]
        title: Option<String>,
        /// Hide the search icon.
        #[arg(long)]
        no_search_icon: bool,
        /// Current page path, used by the guest sign-in links.
        #[arg(long)]
        path: Option<String>,
    },

    /// Print the header stylesheet.
    Styles {
        /// Print the computed style variables as JSON instead of CSS.
        #[arg(long)]
        variables: bool,
    },

    /// Start the JSON HTTP API.
    Serve,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load the config file; a missing default file falls back to built-ins.
fn resolve_config(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() && path == Path::new("./config/vsearch.toml") {
        tracing::debug!(path = %path.display(), "no config file, using built-in defaults");
        return Ok(Config::minimal());
    }
    config::load_config(path)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Header {
            mobile,
            guest,
            search_open,
            suggestions_open,
            title,
            no_search_icon,
            path,
        } => {
            header_cmd::cmd_header(&HeaderOptions {
                mobile,
                guest,
                search_open,
                suggestions_open,
                title,
                hide_search_icon: no_search_icon,
                path,
            })?;
        }
        Commands::Types { active } => {
            let cfg = resolve_config(&cli.config)?;
            catalog::cmd_types(&cfg, active)?;
        }
        Commands::Resolve { guid, json } => {
            let cfg = resolve_config(&cli.config)?;
            catalog::cmd_resolve(&cfg, guid, json)?;
        }
        Commands::Styles { variables } => {
            let cfg = resolve_config(&cli.config)?;
            header_cmd::cmd_styles(&cfg, variables)?;
        }
        Commands::Serve => {
            let cfg = resolve_config(&cli.config)?;
            server::run_server(&cfg).await?;
        }
    }

    Ok(())
}
