#![allow(dead_code)]

use apollo_sheets::components::chat_history::{
    render_history, ChatEmbed, ChatField, ChatMessage, HistorySource,
};
use apollo_sheets::components::event_extractor::EventExtractor;
use apollo_sheets::components::event_sync::SyncPipeline;
use apollo_sheets::components::google_sheets::{
    AccessTokenSource, SheetLayout, SheetsApi, ValueRange,
};
use apollo_sheets::error::{authorization_error, history_error, BotResult};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Jan 1, 2023 10:00 AM UTC
pub const POSTED_AT: i64 = 1672567200;

/// Apollo-style event post
pub fn apollo_post(
    title: &str,
    description: Option<&str>,
    footer: &str,
    time_value: &str,
    timestamp: i64,
) -> ChatMessage {
    ChatMessage {
        author: "Apollo".to_string(),
        timestamp,
        content: String::new(),
        embeds: vec![ChatEmbed {
            title: Some(title.to_string()),
            description: description.map(str::to_string),
            fields: vec![
                ChatField {
                    name: "Time".to_string(),
                    value: time_value.to_string(),
                },
                ChatField {
                    name: "Accepted".to_string(),
                    value: "-".to_string(),
                },
            ],
            footer: Some(footer.to_string()),
        }],
    }
}

/// The "Raid Night" post used across tests
pub fn raid_night() -> ChatMessage {
    apollo_post(
        "Raid Night",
        Some("Bring potions"),
        "Created by Zed",
        "<t:1672574400:F> - <t:1672578000:t>\n<t:1672574400:R>",
        POSTED_AT,
    )
}

/// An ordinary chat message
pub fn chatter(content: &str, timestamp: i64) -> ChatMessage {
    ChatMessage {
        author: "someone".to_string(),
        timestamp,
        content: content.to_string(),
        embeds: Vec::new(),
    }
}

/// History source serving fixed messages, or failing
pub struct MockHistory {
    messages: Vec<ChatMessage>,
    fail: bool,
}

impl MockHistory {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            messages: Vec::new(),
            fail: true,
        }
    }
}

#[async_trait]
impl HistorySource for MockHistory {
    async fn fetch_markup(&self) -> BotResult<String> {
        if self.fail {
            return Err(history_error("Missing Access"));
        }
        Ok(render_history(&self.messages))
    }
}

/// Token source that hands out a fixed token, or fails
pub struct MockTokens {
    fail: bool,
}

impl MockTokens {
    pub fn ok() -> Self {
        Self { fail: false }
    }

    pub fn failing() -> Self {
        Self { fail: true }
    }
}

#[async_trait]
impl AccessTokenSource for MockTokens {
    async fn access_token(&self) -> BotResult<String> {
        if self.fail {
            return Err(authorization_error("invalid_grant"));
        }
        Ok("test-access-token".to_string())
    }
}

/// Records every update call
#[derive(Clone, Default)]
pub struct MockSheets {
    pub calls: Arc<Mutex<Vec<(ValueRange, String)>>>,
}

impl MockSheets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<(ValueRange, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SheetsApi for MockSheets {
    async fn update_values(&self, value_range: &ValueRange, access_token: &str) -> BotResult<()> {
        self.calls
            .lock()
            .unwrap()
            .push((value_range.clone(), access_token.to_string()));
        Ok(())
    }
}

pub fn layout(max_rows: u32) -> SheetLayout {
    SheetLayout {
        worksheet: "Events".to_string(),
        start_row: 2,
        max_rows,
    }
}

pub fn pipeline(
    history: MockHistory,
    tokens: MockTokens,
    sheets: &MockSheets,
    max_rows: u32,
) -> SyncPipeline {
    SyncPipeline::new(
        Box::new(history),
        Box::new(tokens),
        Box::new(sheets.clone()),
        EventExtractor::new().unwrap(),
        layout(max_rows),
    )
}
