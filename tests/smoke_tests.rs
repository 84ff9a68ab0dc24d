use apollo_sheets::components::{ComponentManager, EventSync};
use apollo_sheets::components::google_sheets::SheetLayout;
use apollo_sheets::config::Config;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

fn test_config() -> Config {
    let vars = HashMap::from([
        ("DISCORD_BOT_TOKEN", "test_token"),
        ("DISCORD_SERVER_ID", "987654321"),
        ("DISCORD_CHANNEL_ID", "123456789"),
        ("DISCORD_CHECKED_MESSAGES", "50"),
        ("DISCORD_CHECK_FREQUENCY_S", "60"),
        ("GOOGLE_SPREADSHEET_ID", "test_spreadsheet"),
        ("GOOGLE_WORKSHEET_NAME", "Event List"),
        ("GOOGLE_WORKSHEET_START_ROW", "3"),
        ("GOOGLE_WORKSHEET_MAX_ROWS", "25"),
    ]);
    Config::from_lookup(|key| vars.get(key).map(|v| v.to_string())).unwrap()
}

/// Smoke test to verify that the config can be loaded
#[tokio::test]
async fn test_config_loads() {
    let config = test_config();

    assert_eq!(config.discord_token, "test_token");
    assert_eq!(config.guild_id, 987654321);
    assert_eq!(config.channel_id, 123456789);
    assert_eq!(config.checked_messages, 50);
    assert_eq!(config.check_frequency_secs, 60);
}

/// The sheet layout follows the worksheet settings
#[tokio::test]
async fn test_layout_from_config() {
    let layout = SheetLayout::from_config(&test_config());

    assert_eq!(layout.range(), "Event List!3:27");
}

/// Config shared the way the bot shares it
#[tokio::test]
async fn test_shared_config() {
    let config = Arc::new(RwLock::new(test_config()));

    let spreadsheet_id = {
        let config_guard = config.read().await;
        config_guard.spreadsheet_id.clone()
    };

    assert_eq!(spreadsheet_id, "test_spreadsheet");
}

/// Registering and shutting down without ever starting is harmless
#[tokio::test]
async fn test_component_registration() {
    let config = Arc::new(RwLock::new(test_config()));
    let mut manager = ComponentManager::new(Arc::clone(&config));
    manager.register(EventSync::new());

    assert_eq!(manager.component_names(), vec!["event_sync"]);
    assert!(manager.get_component_by_name("event_sync").is_some());
    assert!(manager.get_component_by_name("reminders").is_none());
    assert!(manager.shutdown_all().await.is_ok());
}
