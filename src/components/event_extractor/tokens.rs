//! Time-token grammar for the embedded field value span.
//!
//! The span's outer markup is split on markup fragments (`/>`, `</`, `&lt;`,
//! `&gt;`, `>`, `<`), the range dash ` - `, line breaks (`br`), Discord
//! timestamp markers (`t:` and `:` + style letter) and whitespace. Empty
//! pieces are dropped. For
//!
//! ```text
//! <span class="markdown preserve-whitespace">&lt;t:1672574400:F&gt; - &lt;t:1672578000:t&gt;</span>
//! ```
//!
//! that leaves:
//!
//! | index | token                               |
//! |------:|-------------------------------------|
//! | 0     | `span`                              |
//! | 1     | `class="markdown`                   |
//! | 2     | `preserve-whitespace"`              |
//! | 3     | start epoch seconds (required)      |
//! | 4     | end epoch seconds, if all digits    |

use crate::error::{render_error, BotResult};
use regex::Regex;
use thiserror::Error;

const SEPARATORS: &str = r#"/>|</|&lt;|&gt;|>|<| - |br|t:|:[tTdDfFrR]|\s"#;

/// Tokens needed before index 4 can be read
const MIN_TOKENS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeTokenError {
    #[error("expected at least 5 tokens, found {0}")]
    TooFewTokens(usize),
    #[error("start token {0:?} is not an epoch timestamp")]
    InvalidStart(String),
    #[error("end token {0:?} is not an epoch timestamp")]
    InvalidEnd(String),
}

/// Start and optional end epoch read from one field span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeTokens {
    pub start: i64,
    pub end: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct TimeTokenizer {
    separators: Regex,
}

impl TimeTokenizer {
    pub fn new() -> BotResult<Self> {
        let separators = Regex::new(SEPARATORS)
            .map_err(|e| render_error(&format!("Failed to compile token pattern: {}", e)))?;
        Ok(Self { separators })
    }

    pub fn tokenize<'a>(&self, markup: &'a str) -> Vec<&'a str> {
        self.separators
            .split(markup)
            .filter(|token| !token.is_empty())
            .collect()
    }

    pub fn parse(&self, markup: &str) -> Result<TimeTokens, TimeTokenError> {
        let tokens = self.tokenize(markup);
        if tokens.len() < MIN_TOKENS {
            return Err(TimeTokenError::TooFewTokens(tokens.len()));
        }

        let start = tokens[3]
            .parse::<i64>()
            .map_err(|_| TimeTokenError::InvalidStart(tokens[3].to_string()))?;

        let end = if is_numeric(tokens[4]) {
            let end = tokens[4]
                .parse::<i64>()
                .map_err(|_| TimeTokenError::InvalidEnd(tokens[4].to_string()))?;
            Some(end)
        } else {
            None
        };

        Ok(TimeTokens { start, end })
    }
}

fn is_numeric(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c.is_ascii_digit())
}
