mod store_commands;

use std::{path::PathBuf, sync::Arc};

use {
    anyhow::Context,
    clap::{Parser, Subcommand},
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
    warden_config::WardenConfig,
    warden_store::{DocumentStore, FileDocumentStore},
};

use store_commands::DocumentName;

#[derive(Parser)]
#[command(name = "warden", about = "Warden: AFK, snipe and channel lock for Discord")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file to load instead of searching the standard locations.
    #[arg(long, global = true, env = "WARDEN_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding the JSON documents (overrides config value).
    #[arg(long, global = true, env = "WARDEN_DATA_DIR")]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to Discord and run the bot (default when no subcommand is provided).
    Run,
    /// Print a stored document, or list stored documents.
    Inspect {
        #[arg(value_enum)]
        document: Option<DocumentName>,
    },
    /// Delete a stored document.
    Reset {
        #[arg(value_enum)]
        document: DocumentName,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<WardenConfig> {
    match &cli.config {
        Some(path) => warden_config::load_config(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(warden_config::discover_and_load()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "warden starting");

    if let Some(ref dir) = cli.data_dir {
        warden_config::set_data_dir(dir.clone());
    }
    let config = load_config(&cli)?;
    let data_dir = warden_config::data_dir(&config);
    info!(data_dir = %data_dir.display(), "using data directory");
    let store = Arc::new(FileDocumentStore::new(data_dir));

    match cli.command {
        // Default: run the bot when no subcommand is provided
        None | Some(Commands::Run) => {
            let store: Arc<dyn DocumentStore> = store;
            warden_discord::run(config, store).await?;
            Ok(())
        },
        Some(Commands::Inspect { document }) => {
            println!("{}", store_commands::inspect(store.as_ref(), document).await?);
            Ok(())
        },
        Some(Commands::Reset { document }) => {
            println!("{}", store_commands::reset(store.as_ref(), document).await?);
            Ok(())
        },
    }
}
