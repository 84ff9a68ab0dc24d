use miette::Diagnostic;
use thiserror::Error;

/// Main error type for the application
#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("Discord API error: {0}")]
    #[diagnostic(code(apollo_sheets::discord_api))]
    DiscordApi(#[from] serenity::Error),

    #[error("Environment error: {0}")]
    #[diagnostic(code(apollo_sheets::environment))]
    Environment(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(apollo_sheets::config))]
    Config(String),

    #[error("Channel history error: {0}")]
    #[diagnostic(code(apollo_sheets::history))]
    History(String),

    #[error("Markup conversion error: {0}")]
    #[diagnostic(code(apollo_sheets::render))]
    Render(String),

    #[error("Google authorization error: {0}")]
    #[diagnostic(code(apollo_sheets::authorization))]
    Authorization(String),

    #[error("Google Sheets API error: {0}")]
    #[diagnostic(code(apollo_sheets::sheets))]
    Sheets(String),

    #[error("Component error: {0}")]
    #[diagnostic(code(apollo_sheets::component))]
    Component(String),

    #[error(transparent)]
    #[diagnostic(code(apollo_sheets::io))]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    #[diagnostic(code(apollo_sheets::http))]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    #[diagnostic(code(apollo_sheets::serialization))]
    Serialization(String),

    #[error("Other error: {0}")]
    #[diagnostic(code(apollo_sheets::other))]
    Other(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

/// Type alias for Result with our Error type
pub type BotResult<T> = Result<T, Error>;

/// Helper to create environment errors
pub fn env_error(var: &str) -> Error {
    Error::Environment(format!("Missing environment variable: {}", var))
}

/// Helper to create configuration errors
pub fn config_error(message: &str) -> Error {
    Error::Config(message.to_string())
}

/// Helper to create channel history errors
pub fn history_error(message: &str) -> Error {
    Error::History(message.to_string())
}

/// Helper to create markup conversion errors
pub fn render_error(message: &str) -> Error {
    Error::Render(message.to_string())
}

/// Helper to create Google authorization errors
pub fn authorization_error(message: &str) -> Error {
    Error::Authorization(message.to_string())
}

/// Helper to create Google Sheets errors
pub fn sheets_error(message: &str) -> Error {
    Error::Sheets(message.to_string())
}

/// Helper to create component errors
pub fn component_error(message: &str) -> Error {
    Error::Component(message.to_string())
}
