mod actor;
pub mod cycle;
mod handle;
mod scheduler;

pub use cycle::{CycleContext, CycleReport, SyncPipeline};
pub use handle::EventSyncHandle;
pub use scheduler::start_scheduler;

use crate::components::chat_history::DiscordHistory;
use crate::components::event_extractor::EventExtractor;
use crate::components::google_sheets::{GoogleSheets, SheetLayout, TokenManager};
use crate::config::Config;
use crate::error::{config_error, BotResult};
use async_trait::async_trait;
use serenity::client::Context;
use serenity::http::Http;
use serenity::model::id::ChannelId;
use std::sync::Arc;
use tokio::sync::{watch, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tracing::info;

struct Running {
    handle: EventSyncHandle,
    scheduler: JoinHandle<()>,
    shutdown_tx: watch::Sender<bool>,
}

/// Periodically copies Apollo events from the channel into the worksheet
#[derive(Default)]
pub struct EventSync {
    running: RwLock<Option<Running>>,
}

impl EventSync {
    /// Create a new event sync component
    pub fn new() -> Self {
        Self {
            running: RwLock::new(None),
        }
    }

    /// Wire the pipeline and start the timer, once
    pub async fn start(&self, http: Arc<Http>, config: &Config) -> BotResult<()> {
        let mut running = self.running.write().await;
        if running.is_some() {
            info!("Event sync already running");
            return Ok(());
        }

        let pipeline = SyncPipeline::new(
            Box::new(DiscordHistory::from_config(http, config)),
            Box::new(TokenManager::new(config)),
            Box::new(GoogleSheets::new(config.spreadsheet_id.clone())),
            EventExtractor::new()?,
            SheetLayout::from_config(config),
        );

        let handle = EventSyncHandle::new(pipeline);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let scheduler = start_scheduler(
            handle.clone(),
            Duration::from_secs(config.check_frequency_secs),
            shutdown_rx,
        );

        *running = Some(Running {
            handle,
            scheduler,
            shutdown_tx,
        });

        Ok(())
    }
}

/// Make sure the configured channel exists and belongs to the configured guild
async fn resolve_channel(ctx: &Context, config: &Config) -> BotResult<()> {
    let channel = ChannelId::new(config.channel_id)
        .to_channel(ctx)
        .await?
        .guild()
        .ok_or_else(|| config_error("DISCORD_CHANNEL_ID is not a guild channel"))?;

    if channel.guild_id.get() != config.guild_id {
        return Err(config_error(&format!(
            "Channel {} belongs to guild {}, not DISCORD_SERVER_ID {}",
            config.channel_id, channel.guild_id, config.guild_id
        )));
    }

    info!("Found channel: \"{}\"", channel.name);
    Ok(())
}

#[async_trait]
impl super::Component for EventSync {
    fn name(&self) -> &'static str {
        "event_sync"
    }

    async fn init(&self, ctx: &Context, config: Arc<RwLock<Config>>) -> BotResult<()> {
        let config = config.read().await.clone();

        resolve_channel(ctx, &config).await?;
        self.start(Arc::clone(&ctx.http), &config).await
    }

    async fn shutdown(&self) -> BotResult<()> {
        let running = self.running.write().await.take();
        if let Some(running) = running {
            let _ = running.shutdown_tx.send(true);
            // Let an in-flight cycle finish before the actor goes away
            if let Err(e) = running.scheduler.await {
                tracing::error!("Event sync scheduler task failed: {:?}", e);
            }
            running.handle.shutdown().await?;
        }
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
