use apollo_sheets::components::google_sheets::{AccessTokenSource, StoredToken, TokenManager};
use apollo_sheets::config::{Config, DEFAULT_SCOPE};
use apollo_sheets::error::Error;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::thread::JoinHandle;

fn config_with_token_file(path: &Path) -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("DISCORD_BOT_TOKEN", "token".to_string()),
        ("DISCORD_SERVER_ID", "1".to_string()),
        ("DISCORD_CHANNEL_ID", "2".to_string()),
        ("GOOGLE_SPREADSHEET_ID", "sheet".to_string()),
        ("GOOGLE_WORKSHEET_NAME", "Events".to_string()),
        ("GOOGLE_WORKSHEET_START_ROW", "2".to_string()),
        ("GOOGLE_WORKSHEET_MAX_ROWS", "10".to_string()),
        ("GOOGLE_TOKEN_FILE", path.display().to_string()),
        (
            "GOOGLE_CLIENT_SECRET_FILE",
            path.with_file_name("missing-credentials.json")
                .display()
                .to_string(),
        ),
    ]);
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

fn stored_token(expires_in: Duration) -> StoredToken {
    stored_token_at("https://oauth2.googleapis.com/token", expires_in)
}

fn stored_token_at(token_uri: &str, expires_in: Duration) -> StoredToken {
    StoredToken {
        token: "ya29.cached".to_string(),
        refresh_token: Some("1//refresh".to_string()),
        token_uri: token_uri.to_string(),
        client_id: "id".to_string(),
        client_secret: "secret".to_string(),
        scopes: vec![DEFAULT_SCOPE.to_string()],
        expiry: Some(Utc::now() + expires_in),
    }
}

/// A missing token file is not an error
#[tokio::test]
async fn test_missing_token_file() {
    let dir = tempfile::tempdir().unwrap();
    let manager = TokenManager::new(&config_with_token_file(&dir.path().join("token.json")));

    assert!(manager.load_token().await.unwrap().is_none());
}

/// Saved tokens load back unchanged
#[tokio::test]
async fn test_token_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let manager = TokenManager::new(&config_with_token_file(&dir.path().join("token.json")));
    let token = stored_token(Duration::hours(1));

    manager.save_token(&token).await.unwrap();

    assert_eq!(manager.load_token().await.unwrap(), Some(token));
}

/// A valid cached token is used without touching the network
#[tokio::test]
async fn test_valid_token_is_reused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token.json");
    let manager = TokenManager::new(&config_with_token_file(&path));
    manager.save_token(&stored_token(Duration::hours(1))).await.unwrap();
    let before = std::fs::read_to_string(&path).unwrap();

    let access_token = manager.access_token().await.unwrap();

    assert_eq!(access_token, "ya29.cached");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

/// A corrupt token file is treated as no credential
#[tokio::test]
async fn test_corrupt_token_file_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token.json");
    std::fs::write(&path, "not json").unwrap();
    let manager = TokenManager::new(&config_with_token_file(&path));

    assert!(manager.load_token().await.unwrap().is_none());
}

/// Local token endpoint answering every request with a fixed response
struct TokenEndpoint {
    uri: String,
    requests: JoinHandle<Vec<String>>,
}

impl TokenEndpoint {
    fn start(status: u16, body: &'static str) -> Self {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();

        let requests = std::thread::spawn(move || {
            let mut bodies = Vec::new();
            while let Ok(Some(mut request)) =
                server.recv_timeout(std::time::Duration::from_millis(500))
            {
                let mut form = String::new();
                request.as_reader().read_to_string(&mut form).unwrap();
                bodies.push(form);

                let response = tiny_http::Response::from_string(body)
                    .with_status_code(tiny_http::StatusCode(status));
                request.respond(response).unwrap();
            }
            bodies
        });

        Self {
            uri: format!("http://{}/token", addr),
            requests,
        }
    }

    /// Form bodies received, once the endpoint has gone idle
    fn requests(self) -> Vec<String> {
        self.requests.join().unwrap()
    }
}

/// An expired token is refreshed and the token file rewritten
#[tokio::test]
async fn test_expired_token_is_refreshed() {
    let endpoint = TokenEndpoint::start(200, r#"{"access_token":"ya29.fresh","expires_in":3600}"#);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token.json");
    let manager = TokenManager::new(&config_with_token_file(&path));
    manager
        .save_token(&stored_token_at(&endpoint.uri, Duration::hours(-1)))
        .await
        .unwrap();

    let access_token = manager.access_token().await.unwrap();

    assert_eq!(access_token, "ya29.fresh");
    let saved = manager.load_token().await.unwrap().unwrap();
    assert_eq!(saved.token, "ya29.fresh");
    assert_eq!(saved.refresh_token.as_deref(), Some("1//refresh"));
    assert!(saved.expiry.unwrap() > Utc::now() + Duration::minutes(50));

    let requests = endpoint.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].contains("grant_type=refresh_token"));
    assert!(requests[0].contains("refresh_token=1%2F%2Frefresh"));
}

/// A rejected refresh with no way to re-authorize is an authorization error
#[tokio::test]
async fn test_rejected_refresh_fails_cycle() {
    let endpoint = TokenEndpoint::start(400, r#"{"error":"invalid_grant"}"#);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token.json");
    let manager = TokenManager::new(&config_with_token_file(&path));
    manager
        .save_token(&stored_token_at(&endpoint.uri, Duration::hours(-1)))
        .await
        .unwrap();
    let before = std::fs::read_to_string(&path).unwrap();

    let result = manager.access_token().await;

    assert!(matches!(result, Err(Error::Authorization(_))));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    assert_eq!(endpoint.requests().len(), 1);
}

/// Credentials issued for another scope go to consent, not refresh
#[tokio::test]
async fn test_scope_change_skips_refresh() {
    let endpoint = TokenEndpoint::start(200, r#"{"access_token":"ya29.fresh","expires_in":3600}"#);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("token.json");
    let manager = TokenManager::new(&config_with_token_file(&path));
    let mut token = stored_token_at(&endpoint.uri, Duration::hours(1));
    token.scopes = vec!["https://www.googleapis.com/auth/drive".to_string()];
    manager.save_token(&token).await.unwrap();

    let result = manager.access_token().await;

    assert!(matches!(result, Err(Error::Authorization(_))));
    assert!(endpoint.requests().is_empty());
}
