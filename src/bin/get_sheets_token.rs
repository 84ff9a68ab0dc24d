use apollo_sheets::components::google_sheets::TokenManager;
use apollo_sheets::config::Config;
use apollo_sheets::startup;
use tracing::info;

/// Provision the token file on a machine with a browser, then copy it to the
/// host running the bot.
#[tokio::main]
async fn main() -> miette::Result<()> {
    startup::init_logging()?;

    let config = Config::load()?;
    let token_manager = TokenManager::new(&config);

    let token = token_manager.authorize_and_save().await?;

    info!(
        "Token saved to {} (refresh token {})",
        config.token_file.display(),
        if token.refresh_token.is_some() { "present" } else { "missing" }
    );

    Ok(())
}
