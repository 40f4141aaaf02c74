//! CLI argument parsing using clap.

use clap::{
    Parser, Subcommand,
    builder::styling::{AnsiColor, Effects, Styles},
};
use std::path::PathBuf;

fn clap_cargo_style() -> Styles {
    Styles::styled()
        .header(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .usage(AnsiColor::Cyan.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}

/// Serve CSV and JSON files from a folder as a read-only HTTP API
#[derive(Parser)]
#[command(
    name = "dujour",
    version,
    about = "Serve CSV and JSON files as a read-only HTTP API",
    styles = clap_cargo_style(),
    after_help = "Quick Start:\n  $ dujour init                     # Write dujour.toml with defaults\n  $ dujour serve                    # Serve ./data on 127.0.0.1:8080\n  $ dujour serve --https            # Same, over TLS with a self-signed certificate\n  $ dujour list                     # Show what would be served\n  $ dujour get users 42             # Print one record"
)]
pub struct Cli {
    /// Path to a custom dujour.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Start the server
    #[command(
        about = "Load the data folder and serve it over HTTP or HTTPS",
        after_help = "Examples:\n  dujour serve\n  dujour serve --bind 0.0.0.0:3000\n  dujour serve --https --data ./fixtures\n  dujour serve --no-watch"
    )]
    Serve {
        /// Address to bind (overrides config)
        #[arg(long)]
        bind: Option<String>,

        /// Serve over TLS with a self-signed certificate
        #[arg(long)]
        https: bool,

        /// Data folder (overrides config)
        #[arg(long, value_name = "DIR")]
        data: Option<PathBuf>,

        /// Do not reload datasources when files change
        #[arg(long)]
        no_watch: bool,
    },

    /// List datasources found in the data folder
    #[command(about = "List the datasources the server would expose")]
    List {
        /// Data folder (overrides config)
        #[arg(long, value_name = "DIR")]
        data: Option<PathBuf>,
    },

    /// Print a datasource, or one record of it, as JSON
    #[command(
        about = "Print a datasource or a single record as JSON",
        after_help = "Examples:\n  dujour get users\n  dujour get users 42"
    )]
    Get {
        /// Public datasource name, as shown by `dujour list`
        datasource: String,

        /// Record id
        id: Option<String>,

        /// Data folder (overrides config)
        #[arg(long, value_name = "DIR")]
        data: Option<PathBuf>,
    },

    /// Show current configuration
    #[command(about = "Display active settings")]
    Config,

    /// Initialize configuration
    #[command(about = "Write dujour.toml with default settings")]
    Init {
        /// Force overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_flags() {
        let cli = Cli::parse_from([
            "dujour", "serve", "--bind", "0.0.0.0:9000", "--https", "--no-watch",
        ]);
        match cli.command {
            Commands::Serve {
                bind,
                https,
                data,
                no_watch,
            } => {
                assert_eq!(bind.as_deref(), Some("0.0.0.0:9000"));
                assert!(https);
                assert!(no_watch);
                assert!(data.is_none());
            }
            _ => panic!("expected serve"),
        }
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::parse_from(["dujour", "get", "users", "7", "--config", "alt.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("alt.toml")));
        match cli.command {
            Commands::Get { datasource, id, .. } => {
                assert_eq!(datasource, "users");
                assert_eq!(id.as_deref(), Some("7"));
            }
            _ => panic!("expected get"),
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
