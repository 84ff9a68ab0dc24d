mod footer;
pub mod models;
pub mod tokens;

pub use footer::{split_footer, NO_RECURRENCE};
pub use models::EventRecord;
pub use tokens::{TimeTokenError, TimeTokenizer, TimeTokens};

use crate::error::{render_error, BotResult};
use crate::utils::time::{epoch_to_iso, parse_post_timestamp};
use scraper::{ElementRef, Html, Node, Selector};
use thiserror::Error;
use tracing::debug;

/// Why a message block produced no event record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("no title")]
    MissingTitle,
    #[error("no post timestamp")]
    MissingTimestamp,
    #[error("unparseable post timestamp {0:?}")]
    InvalidTimestamp(String),
    #[error("description container without text")]
    EmptyDescription,
    #[error("no creator footer")]
    MissingFooter,
    #[error("no embed fields")]
    MissingFields,
    #[error("no time field span")]
    MissingTimeSpan,
    #[error("bad time tokens: {0}")]
    TimeTokens(#[from] TimeTokenError),
    #[error("epoch {0} out of range")]
    EpochOutOfRange(i64),
}

/// Records pulled from one rendered history document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub records: Vec<EventRecord>,
    pub skipped: usize,
}

impl Extraction {
    pub fn count(&self) -> usize {
        self.records.len()
    }
}

struct Selectors {
    block: Selector,
    title: Selector,
    timestamp: Selector,
    description: Selector,
    description_text: Selector,
    footer: Selector,
    fields: Selector,
    span: Selector,
}

impl Selectors {
    fn new() -> BotResult<Self> {
        Ok(Self {
            block: parse_selector("div.chatlog__messages")?,
            title: parse_selector("div.chatlog__embed-title span.markdown")?,
            timestamp: parse_selector("span.chatlog__timestamp")?,
            description: parse_selector("div.chatlog__embed-description")?,
            description_text: parse_selector("span.markdown.preserve-whitespace")?,
            footer: parse_selector("span.chatlog__embed-footer-text")?,
            fields: parse_selector("div.chatlog__embed-fields")?,
            span: parse_selector("span")?,
        })
    }
}

fn parse_selector(selector: &str) -> BotResult<Selector> {
    Selector::parse(selector)
        .map_err(|e| render_error(&format!("Invalid selector {}: {}", selector, e)))
}

/// Pulls Apollo event records out of rendered chat-log markup
pub struct EventExtractor {
    selectors: Selectors,
    tokenizer: TimeTokenizer,
}

impl EventExtractor {
    pub fn new() -> BotResult<Self> {
        Ok(Self {
            selectors: Selectors::new()?,
            tokenizer: TimeTokenizer::new()?,
        })
    }

    /// Extract every qualifying block, in document order
    pub fn extract(&self, markup: &str) -> Extraction {
        let document = Html::parse_document(markup);
        let mut extraction = Extraction::default();

        for block in document.select(&self.selectors.block) {
            match self.extract_block(block) {
                Ok(record) => {
                    debug!(
                        "Found event {:?} starting {} by {}",
                        record.title, record.start_time, record.creator
                    );
                    extraction.records.push(record);
                }
                Err(reason) => {
                    debug!("Skipping message block: {}", reason);
                    extraction.skipped += 1;
                }
            }
        }

        extraction
    }

    /// Extract one message block
    pub fn extract_block(&self, block: ElementRef<'_>) -> Result<EventRecord, ExtractError> {
        let title = block
            .select(&self.selectors.title)
            .next()
            .map(element_text)
            .ok_or(ExtractError::MissingTitle)?;

        let timestamp_text = block
            .select(&self.selectors.timestamp)
            .next()
            .map(element_text)
            .filter(|text| !text.trim().is_empty())
            .ok_or(ExtractError::MissingTimestamp)?;
        let posted_at = parse_post_timestamp(&timestamp_text)
            .ok_or_else(|| ExtractError::InvalidTimestamp(timestamp_text.trim().to_string()))?;

        let description = match block.select(&self.selectors.description).next() {
            None => String::new(),
            Some(container) => container
                .select(&self.selectors.description_text)
                .next()
                .map(element_text)
                .filter(|text| !text.is_empty())
                .ok_or(ExtractError::EmptyDescription)?,
        };

        let footer_text = block
            .select(&self.selectors.footer)
            .next()
            .map(element_text)
            .filter(|text| !text.is_empty())
            .ok_or(ExtractError::MissingFooter)?;
        let (creator, recurrence) = split_footer(&footer_text);

        let fields = block
            .select(&self.selectors.fields)
            .next()
            .ok_or(ExtractError::MissingFields)?;
        let time_span = fields
            .select(&self.selectors.span)
            .nth(1)
            .ok_or(ExtractError::MissingTimeSpan)?;
        let times = self.tokenizer.parse(&time_span.html())?;

        let start_time = epoch_to_iso(times.start).ok_or(ExtractError::EpochOutOfRange(times.start))?;
        let end_time = match times.end {
            Some(end) => epoch_to_iso(end).ok_or(ExtractError::EpochOutOfRange(end))?,
            None => String::new(),
        };

        Ok(EventRecord {
            start_time,
            end_time,
            recurrence,
            creator,
            posted_at,
            title,
            description,
        })
    }
}

/// Text content of an element, with `<br>` read back as a newline
fn element_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Text(chunk) => text.push_str(chunk),
            Node::Element(el) if el.name() == "br" => text.push('\n'),
            _ => {}
        }
    }
    text
}
