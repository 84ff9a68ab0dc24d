use crate::error::{config_error, env_error, BotResult};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Default activity text for the bot
pub const DEFAULT_ACTIVITY: &str = "Syncing Apollo events";

/// Default OAuth scope for the Sheets API
pub const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

/// Main configuration structure for the bot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Discord bot token
    pub discord_token: String,
    /// Discord guild ID (server) the channel belongs to
    pub guild_id: u64,
    /// Discord channel ID holding the Apollo posts
    pub channel_id: u64,
    /// How many of the most recent messages are checked each cycle
    pub checked_messages: u16,
    /// Seconds between sync cycles
    pub check_frequency_secs: u64,
    /// OAuth scope requested for the spreadsheet
    pub google_scope: String,
    /// Target spreadsheet ID
    pub spreadsheet_id: String,
    /// Worksheet (tab) name inside the spreadsheet
    pub worksheet_name: String,
    /// First row written by the sync
    pub worksheet_start_row: u32,
    /// Number of rows owned by the sync
    pub worksheet_max_rows: u32,
    /// Where the authorized-user token is persisted
    pub token_file: PathBuf,
    /// OAuth client secret downloaded from the Google console
    pub client_secret_file: PathBuf,
    /// Local port for the OAuth redirect
    pub oauth_port: u16,
    /// Bot activity status text
    pub activity: String,
}

impl Config {
    /// Load configuration from the environment (and `.env` if present)
    pub fn load() -> BotResult<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> BotResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).ok_or_else(|| env_error(key));

        let discord_token = required("DISCORD_BOT_TOKEN")?;
        let guild_id = parse_value(&required("DISCORD_SERVER_ID")?, "DISCORD_SERVER_ID")?;
        let channel_id = parse_value(&required("DISCORD_CHANNEL_ID")?, "DISCORD_CHANNEL_ID")?;

        let checked_messages = match lookup("DISCORD_CHECKED_MESSAGES") {
            Some(value) => parse_value(&value, "DISCORD_CHECKED_MESSAGES")?,
            None => 100,
        };
        let check_frequency_secs = match lookup("DISCORD_CHECK_FREQUENCY_S") {
            Some(value) => parse_value(&value, "DISCORD_CHECK_FREQUENCY_S")?,
            None => 300,
        };

        let google_scope = lookup("GOOGLE_CLIENT_SCOPE").unwrap_or_else(|| DEFAULT_SCOPE.to_string());
        let spreadsheet_id = required("GOOGLE_SPREADSHEET_ID")?;
        let worksheet_name = required("GOOGLE_WORKSHEET_NAME")?;
        let worksheet_start_row = parse_value(
            &required("GOOGLE_WORKSHEET_START_ROW")?,
            "GOOGLE_WORKSHEET_START_ROW",
        )?;
        let worksheet_max_rows = parse_value(
            &required("GOOGLE_WORKSHEET_MAX_ROWS")?,
            "GOOGLE_WORKSHEET_MAX_ROWS",
        )?;

        let token_file = lookup("GOOGLE_TOKEN_FILE").unwrap_or_else(|| "token.json".to_string());
        let client_secret_file =
            lookup("GOOGLE_CLIENT_SECRET_FILE").unwrap_or_else(|| "credentials.json".to_string());
        let oauth_port = match lookup("GOOGLE_OAUTH_PORT") {
            Some(value) => parse_value(&value, "GOOGLE_OAUTH_PORT")?,
            None => 8080,
        };

        let activity = lookup("BOT_ACTIVITY").unwrap_or_else(|| DEFAULT_ACTIVITY.to_string());

        let config = Config {
            discord_token,
            guild_id,
            channel_id,
            checked_messages,
            check_frequency_secs,
            google_scope,
            spreadsheet_id,
            worksheet_name,
            worksheet_start_row,
            worksheet_max_rows,
            token_file: PathBuf::from(token_file),
            client_secret_file: PathBuf::from(client_secret_file),
            oauth_port,
            activity,
        };
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> BotResult<()> {
        if self.checked_messages == 0 {
            return Err(config_error("DISCORD_CHECKED_MESSAGES must be at least 1"));
        }
        if self.check_frequency_secs == 0 {
            return Err(config_error("DISCORD_CHECK_FREQUENCY_S must be at least 1"));
        }
        if self.worksheet_start_row == 0 {
            return Err(config_error("GOOGLE_WORKSHEET_START_ROW is 1-based"));
        }
        if self.worksheet_max_rows == 0 {
            return Err(config_error("GOOGLE_WORKSHEET_MAX_ROWS must be at least 1"));
        }
        Ok(())
    }
}

fn parse_value<T: FromStr>(raw: &str, var: &str) -> BotResult<T> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| config_error(&format!("Invalid {} format: {:?}", var, raw)))
}
