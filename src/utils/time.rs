use chrono::{DateTime, NaiveDateTime, Utc};

/// Sheet-facing timestamp layout: ISO 8601, second precision, no offset
pub const ISO_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";

/// Layout used when rendering message timestamps into the chat log
pub const RENDER_FORMAT: &str = "%b %d, %Y %I:%M %p";

/// Post timestamp layouts accepted from the rendered chat log
const POST_FORMATS: [&str; 4] = [
    RENDER_FORMAT,
    "%d-%b-%y %I:%M %p",
    "%m/%d/%Y %I:%M %p",
    "%Y-%m-%d %H:%M:%S",
];

/// Convert a Unix epoch (seconds) into the sheet timestamp layout
pub fn epoch_to_iso(seconds: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(seconds, 0).map(|dt| dt.format(ISO_SECONDS).to_string())
}

/// Parse a rendered post timestamp, interpreting naive layouts as UTC
pub fn parse_post_timestamp(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc).format(ISO_SECONDS).to_string());
    }

    POST_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.format(ISO_SECONDS).to_string())
}

/// Format a message timestamp the way the renderer writes it
pub fn format_render_timestamp(seconds: i64) -> String {
    DateTime::<Utc>::from_timestamp(seconds, 0)
        .map(|dt| dt.format(RENDER_FORMAT).to_string())
        .unwrap_or_default()
}
