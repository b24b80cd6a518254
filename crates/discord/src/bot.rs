use std::sync::Arc;

use {
    serenity::Client,
    tracing::{info, warn},
};

use {warden_config::WardenConfig, warden_store::DocumentStore};

use crate::{Error, Result, handler::WardenHandler};

/// Connect to the gateway and process events until the connection ends or
/// the process receives Ctrl-C.
pub async fn run(config: WardenConfig, store: Arc<dyn DocumentStore>) -> Result<()> {
    let token = config.discord.resolve_token().ok_or_else(|| {
        Error::message("no bot token: set discord.token or DISCORD_BOT_TOKEN")
    })?;

    let handler = WardenHandler::new(config, store);
    let mut client = Client::builder(&token, WardenHandler::intents())
        .event_handler(handler)
        .await?;

    let shard_manager = Arc::clone(&client.shard_manager);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("shutdown requested");
                shard_manager.shutdown_all().await;
            },
            Err(e) => warn!(error = %e, "failed to listen for ctrl-c"),
        }
    });

    info!("connecting to discord gateway");
    client.start().await?;
    Ok(())
}
