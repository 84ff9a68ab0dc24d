use crate::components::{ComponentManager, EventSync};
use crate::config::Config;
use crate::error::Error;
use crate::shutdown;
use serenity::all::{ActivityData, GatewayIntents, OnlineStatus, Ready};
use serenity::async_trait;
use serenity::client::{Client, Context, EventHandler};
use std::sync::Arc;
use tokio::sync::{oneshot, RwLock};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,serenity=warn")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and initialize the application config
pub async fn load_config() -> miette::Result<Arc<RwLock<Config>>> {
    match Config::load() {
        Ok(config) => Ok(Arc::new(RwLock::new(config))),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Gateway event handler that brings the components up
struct Handler {
    components: Arc<ComponentManager>,
    activity: String,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("Connected to discord as user \"{}\"", ready.user.name);

        ctx.set_presence(
            Some(ActivityData::playing(&self.activity)),
            OnlineStatus::Online,
        );
        info!("Setting activity to {}", self.activity);

        if let Err(e) = self.components.init_all(&ctx).await {
            error!("Failed to initialize components: {:?}", e);
        }
    }
}

/// Initialize and start the Discord bot
pub async fn start_bot(config: Arc<RwLock<Config>>) -> miette::Result<()> {
    let (token, activity) = {
        let config_read = config.read().await;
        (config_read.discord_token.clone(), config_read.activity.clone())
    };

    // Embeds of other bots' messages are only delivered with MESSAGE_CONTENT
    let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;

    let mut component_manager = ComponentManager::new(Arc::clone(&config));
    component_manager.register(EventSync::new());
    let component_manager = Arc::new(component_manager);

    let (shutdown_send, shutdown_recv) = oneshot::channel();

    let shutdown_components = Arc::clone(&component_manager);
    tokio::spawn(async move {
        shutdown::handle_signals(shutdown_send, shutdown_components).await;
    });

    let handler = Handler {
        components: Arc::clone(&component_manager),
        activity,
    };

    info!("Starting bot...");
    let mut client = Client::builder(token, intents)
        .event_handler(handler)
        .await
        .map_err(Error::from)?;

    let client_handle = tokio::spawn(async move {
        if let Err(e) = client.start().await {
            Err(Error::from(e))
        } else {
            Ok(())
        }
    });

    // Wait for either the client to end or a shutdown signal
    tokio::select! {
        result = client_handle => {
            info!("Bot process ended");
            match result {
                Ok(Ok(())) => Ok(()),
                Ok(Err(e)) => Err(e.into()),
                Err(e) => {
                    error!("Client task error: {:?}", e);
                    Err(Error::Other(format!("Client task error: {}", e)).into())
                }
            }
        }
        _ = shutdown_recv => {
            info!("Received shutdown signal, shutting down bot...");
            Ok(())
        }
    }
}
