use super::models::ChatMessage;
use super::render::render_history;
use super::HistorySource;
use crate::config::Config;
use crate::error::{history_error, BotResult};
use async_trait::async_trait;
use serenity::builder::GetMessages;
use serenity::http::Http;
use serenity::model::id::ChannelId;
use std::sync::Arc;
use tracing::debug;

/// Discord API caps a single history request at 100 messages
const PAGE_SIZE: u16 = 100;

/// Channel history fetched over the Discord HTTP API
#[derive(Clone)]
pub struct DiscordHistory {
    http: Arc<Http>,
    channel_id: ChannelId,
    limit: u16,
}

impl DiscordHistory {
    pub fn new(http: Arc<Http>, channel_id: u64, limit: u16) -> Self {
        Self {
            http,
            channel_id: ChannelId::new(channel_id),
            limit,
        }
    }

    pub fn from_config(http: Arc<Http>, config: &Config) -> Self {
        Self::new(http, config.channel_id, config.checked_messages)
    }

    /// Newest-first, like the API returns them
    async fn fetch_messages(&self) -> BotResult<Vec<ChatMessage>> {
        let mut messages = Vec::with_capacity(self.limit as usize);
        let mut before = None;
        let mut remaining = self.limit;

        while remaining > 0 {
            let batch = remaining.min(PAGE_SIZE) as u8;
            let mut request = GetMessages::new().limit(batch);
            if let Some(id) = before {
                request = request.before(id);
            }

            let page = self
                .channel_id
                .messages(self.http.as_ref(), request)
                .await
                .map_err(|e| history_error(&format!("Failed to fetch channel history: {}", e)))?;

            debug!("Fetched {} messages from channel {}", page.len(), self.channel_id);

            let exhausted = page.len() < batch as usize;
            before = page.last().map(|message| message.id);
            messages.extend(page.iter().map(ChatMessage::from));
            remaining -= page.len() as u16;

            if exhausted || before.is_none() {
                break;
            }
        }

        Ok(messages)
    }
}

#[async_trait]
impl HistorySource for DiscordHistory {
    async fn fetch_markup(&self) -> BotResult<String> {
        let mut messages = self.fetch_messages().await?;
        messages.reverse();
        Ok(render_history(&messages))
    }
}
