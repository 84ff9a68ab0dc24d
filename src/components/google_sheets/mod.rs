mod oauth;
pub mod payload;
pub mod token;

pub use oauth::{authorization_url, parse_callback};
pub use payload::{build_update, SheetLayout, SheetUpdate, ValueRange};
pub use token::{AccessTokenSource, ClientSecret, StoredToken, TokenManager};

use crate::error::{sheets_error, BotResult};
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;
use url::Url;

const SHEETS_API: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// The one Sheets call the sync needs
#[async_trait]
pub trait SheetsApi: Send + Sync {
    /// Overwrite `value_range.range` with `value_range.values`
    async fn update_values(&self, value_range: &ValueRange, access_token: &str) -> BotResult<()>;
}

/// Sheets v4 REST client for one spreadsheet
#[derive(Clone)]
pub struct GoogleSheets {
    client: Client,
    spreadsheet_id: String,
}

impl GoogleSheets {
    pub fn new(spreadsheet_id: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            spreadsheet_id: spreadsheet_id.into(),
        }
    }

    fn values_url(&self, range: &str) -> BotResult<Url> {
        let mut url = Url::parse(SHEETS_API)
            .map_err(|e| sheets_error(&format!("Failed to parse URL: {}", e)))?;

        url.path_segments_mut()
            .map_err(|_| sheets_error("Sheets API URL cannot be a base"))?
            .push(&self.spreadsheet_id)
            .push("values")
            .push(range);
        url.query_pairs_mut()
            .append_pair("valueInputOption", "USER_ENTERED");

        Ok(url)
    }
}

#[async_trait]
impl SheetsApi for GoogleSheets {
    async fn update_values(&self, value_range: &ValueRange, access_token: &str) -> BotResult<()> {
        let url = self.values_url(&value_range.range)?;
        debug!("Updating {} with {} rows", value_range.range, value_range.values.len());

        let response = self
            .client
            .put(url)
            .bearer_auth(access_token)
            .json(value_range)
            .send()
            .await
            .map_err(|e| sheets_error(&format!("Failed to update worksheet: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(sheets_error(&format!(
                "Failed to update worksheet: HTTP {} - {}",
                status, error_body
            )));
        }

        Ok(())
    }
}
