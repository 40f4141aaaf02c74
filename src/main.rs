use clap::Parser;
use dujour::cli::commands::{init, query, serve};
use dujour::cli::{Cli, Commands};
use dujour::config::{CONFIG_FILE, Settings};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| CONFIG_FILE.into());

    // Init must work even when the existing file does not parse.
    if let Commands::Init { force } = cli.command {
        return init::run_init(&config_path, force);
    }

    let config = Settings::load_from(&config_path)
        .map_err(|e| anyhow::anyhow!("Configuration error: {e}"))?;
    dujour::logging::init_with_config(&config.logging);

    match cli.command {
        Commands::Serve {
            bind,
            https,
            data,
            no_watch,
        } => {
            let args = serve::ServeArgs {
                bind,
                https,
                data,
                no_watch,
            };
            serve::run(args, config).await
        }
        Commands::List { data } => {
            query::run_list(data.as_deref().unwrap_or(&config.data_folder))
        }
        Commands::Get {
            datasource,
            id,
            data,
        } => query::run_get(
            data.as_deref().unwrap_or(&config.data_folder),
            &datasource,
            id.as_deref(),
        ),
        Commands::Config => init::run_config(&config),
        Commands::Init { .. } => Ok(()),
    }
}
