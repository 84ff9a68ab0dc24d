mod fetch;
pub mod models;
pub mod render;

pub use fetch::DiscordHistory;
pub use models::{ChatEmbed, ChatField, ChatMessage};
pub use render::render_history;

use crate::error::BotResult;
use async_trait::async_trait;

/// Source of the rendered chat-log markup for one sync cycle
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Fetch the most recent messages and render them, oldest first
    async fn fetch_markup(&self) -> BotResult<String>;
}
