use serenity::model::channel::{Embed, Message};

/// Platform-neutral view of one chat message, as much as the renderer needs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatMessage {
    pub author: String,
    /// Unix seconds
    pub timestamp: i64,
    pub content: String,
    pub embeds: Vec<ChatEmbed>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatEmbed {
    pub title: Option<String>,
    pub description: Option<String>,
    pub fields: Vec<ChatField>,
    pub footer: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatField {
    pub name: String,
    pub value: String,
}

impl From<&Embed> for ChatEmbed {
    fn from(embed: &Embed) -> Self {
        Self {
            title: embed.title.clone(),
            description: embed.description.clone(),
            fields: embed
                .fields
                .iter()
                .map(|field| ChatField {
                    name: field.name.clone(),
                    value: field.value.clone(),
                })
                .collect(),
            footer: embed.footer.as_ref().map(|footer| footer.text.clone()),
        }
    }
}

impl From<&Message> for ChatMessage {
    fn from(message: &Message) -> Self {
        Self {
            author: message.author.name.clone(),
            timestamp: message.timestamp.unix_timestamp(),
            content: message.content.clone(),
            embeds: message.embeds.iter().map(ChatEmbed::from).collect(),
        }
    }
}
