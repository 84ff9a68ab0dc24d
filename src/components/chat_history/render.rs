//! Renders chat messages into the static chat-log markup the extractor reads.
//!
//! Each message becomes its own `chatlog__messages` block. Embeds keep the
//! title / description / fields / footer structure, and raw Discord
//! timestamp markup (`<t:1672574400:F>`) is left in the text, escaped.

use super::models::{ChatEmbed, ChatMessage};
use crate::utils::time::format_render_timestamp;
use std::fmt::Write;

/// Render messages in the order given
pub fn render_history(messages: &[ChatMessage]) -> String {
    let mut html = String::from("<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"></head><body>\n<div class=\"chatlog\">\n");

    for message in messages {
        render_message(&mut html, message);
    }

    html.push_str("</div>\n</body></html>\n");
    html
}

fn render_message(html: &mut String, message: &ChatMessage) {
    html.push_str("<div class=\"chatlog__message-group\">\n<div class=\"chatlog__messages\">\n");

    let _ = writeln!(
        html,
        "<span class=\"chatlog__author-name\">{}</span>",
        escape(&message.author)
    );
    let _ = writeln!(
        html,
        "<span class=\"chatlog__timestamp\">{}</span>",
        format_render_timestamp(message.timestamp)
    );

    if !message.content.is_empty() {
        let _ = writeln!(
            html,
            "<div class=\"chatlog__content\"><span class=\"markdown\">{}</span></div>",
            markdown_text(&message.content)
        );
    }

    for embed in &message.embeds {
        render_embed(html, embed);
    }

    html.push_str("</div>\n</div>\n");
}

fn render_embed(html: &mut String, embed: &ChatEmbed) {
    html.push_str("<div class=\"chatlog__embed\">\n");

    if let Some(title) = &embed.title {
        let _ = writeln!(
            html,
            "<div class=\"chatlog__embed-title\"><span class=\"markdown\">{}</span></div>",
            markdown_text(title)
        );
    }

    if let Some(description) = &embed.description {
        let _ = writeln!(
            html,
            "<div class=\"chatlog__embed-description\"><span class=\"markdown preserve-whitespace\">{}</span></div>",
            markdown_text(description)
        );
    }

    if !embed.fields.is_empty() {
        html.push_str("<div class=\"chatlog__embed-fields\">\n");
        for field in &embed.fields {
            let _ = writeln!(
                html,
                "<div class=\"chatlog__embed-field\">\
                 <div class=\"chatlog__embed-field-name\"><span class=\"markdown\">{}</span></div>\
                 <div class=\"chatlog__embed-field-value\"><span class=\"markdown preserve-whitespace\">{}</span></div>\
                 </div>",
                markdown_text(&field.name),
                markdown_text(&field.value)
            );
        }
        html.push_str("</div>\n");
    }

    if let Some(footer) = &embed.footer {
        let _ = writeln!(
            html,
            "<div class=\"chatlog__embed-footer\"><span class=\"chatlog__embed-footer-text\">{}</span></div>",
            escape(footer)
        );
    }

    html.push_str("</div>\n");
}

/// Escaped text with line breaks kept as `<br>`
fn markdown_text(text: &str) -> String {
    text.lines().map(escape).collect::<Vec<_>>().join("<br>")
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::chat_history::models::ChatField;

    #[test]
    fn test_escape() {
        assert_eq!(escape("<t:1:F> & \"x\""), "&lt;t:1:F&gt; &amp; &quot;x&quot;");
    }

    #[test]
    fn test_markdown_text_breaks_lines() {
        assert_eq!(markdown_text("one\ntwo"), "one<br>two");
    }

    #[test]
    fn test_render_embed_structure() {
        let message = ChatMessage {
            author: "Apollo".to_string(),
            timestamp: 1672567200,
            content: String::new(),
            embeds: vec![ChatEmbed {
                title: Some("Raid Night".to_string()),
                description: None,
                fields: vec![ChatField {
                    name: "Time".to_string(),
                    value: "<t:1672574400:F>".to_string(),
                }],
                footer: Some("Created by Zed".to_string()),
            }],
        };

        let html = render_history(&[message]);

        assert!(html.contains("<span class=\"chatlog__timestamp\">Jan 01, 2023 10:00 AM</span>"));
        assert!(html.contains("<span class=\"markdown\">Raid Night</span>"));
        assert!(html.contains("&lt;t:1672574400:F&gt;"));
        assert!(!html.contains("chatlog__embed-description"));
        assert!(!html.contains("chatlog__content"));
    }
}
