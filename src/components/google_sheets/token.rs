use super::oauth::{obtain_authorization_code, AuthorizationCode};
use crate::config::Config;
use crate::error::{authorization_error, BotResult};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const DEFAULT_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/auth";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Tokens this close to expiry are refreshed up front
const EXPIRY_SKEW_SECS: i64 = 60;

/// Anything that can hand out a bearer token for the Sheets API
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    async fn access_token(&self) -> BotResult<String>;
}

/// OAuth client registered in the Google console
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

#[derive(Debug, Deserialize)]
struct ClientSecretFile {
    installed: Option<ClientSecret>,
    web: Option<ClientSecret>,
}

impl ClientSecret {
    /// Read an "installed" or "web" client secret JSON file
    pub async fn load(path: &Path) -> BotResult<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            authorization_error(&format!(
                "Failed to read client secret {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> BotResult<Self> {
        let file: ClientSecretFile = serde_json::from_str(content)
            .map_err(|e| authorization_error(&format!("Invalid client secret file: {}", e)))?;
        file.installed
            .or(file.web)
            .ok_or_else(|| authorization_error("Client secret has no installed or web client"))
    }
}

fn default_auth_uri() -> String {
    DEFAULT_AUTH_URI.to_string()
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Authorized-user credential as written to the token file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub scopes: Vec<String>,
    #[serde(default)]
    pub expiry: Option<DateTime<Utc>>,
}

impl StoredToken {
    /// Usable for `scope` at `now` without a refresh
    pub fn is_valid(&self, scope: &str, now: DateTime<Utc>) -> bool {
        if self.token.is_empty() || !self.grants(scope) {
            return false;
        }
        match self.expiry {
            Some(expiry) => expiry > now + Duration::seconds(EXPIRY_SKEW_SECS),
            None => true,
        }
    }

    /// Issued for `scope`; an empty scope list predates scope tracking
    pub fn grants(&self, scope: &str) -> bool {
        self.scopes.is_empty() || self.scopes.iter().any(|s| s == scope)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Loads, refreshes or re-obtains the Sheets credential and keeps the token
/// file in step with it
#[derive(Clone)]
pub struct TokenManager {
    token_file: PathBuf,
    client_secret_file: PathBuf,
    scope: String,
    oauth_port: u16,
    client: Client,
}

impl TokenManager {
    pub fn new(config: &Config) -> Self {
        Self {
            token_file: config.token_file.clone(),
            client_secret_file: config.client_secret_file.clone(),
            scope: config.google_scope.clone(),
            oauth_port: config.oauth_port,
            client: Client::new(),
        }
    }

    /// Current credential, refreshing or re-authorizing when needed
    pub async fn get_token(&self) -> BotResult<StoredToken> {
        let stored = self.load_token().await?;

        if let Some(token) = &stored {
            if token.is_valid(&self.scope, Utc::now()) {
                return Ok(token.clone());
            }
        }

        // A refresh keeps the old scopes, so a scope change needs new consent
        let refreshed = match stored {
            Some(token) if !token.grants(&self.scope) => {
                info!("Stored credentials lack scope {}", self.scope);
                None
            }
            Some(token) if token.refresh_token.is_some() => {
                info!("Refreshing access token using refresh token");
                match self.refresh_token(&token).await {
                    Ok(token) => Some(token),
                    Err(e) => {
                        warn!("Token refresh failed, falling back to authorization: {}", e);
                        None
                    }
                }
            }
            _ => None,
        };

        let token = match refreshed {
            Some(token) => token,
            None => {
                info!("Getting new credentials");
                self.authorize().await?
            }
        };

        self.save_token(&token).await?;
        Ok(token)
    }

    /// Run the browser consent flow and persist the result
    pub async fn authorize_and_save(&self) -> BotResult<StoredToken> {
        let token = self.authorize().await?;
        self.save_token(&token).await?;
        Ok(token)
    }

    async fn authorize(&self) -> BotResult<StoredToken> {
        let secret = ClientSecret::load(&self.client_secret_file).await?;
        let AuthorizationCode { code, redirect_uri } =
            obtain_authorization_code(&secret, &self.scope, self.oauth_port).await?;

        let params = [
            ("client_id", secret.client_id.as_str()),
            ("client_secret", secret.client_secret.as_str()),
            ("code", code.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ];
        let response = self.request_token(&secret.token_uri, &params).await?;

        Ok(StoredToken {
            token: response.access_token,
            refresh_token: response.refresh_token,
            token_uri: secret.token_uri,
            client_id: secret.client_id,
            client_secret: secret.client_secret,
            scopes: vec![self.scope.clone()],
            expiry: response.expires_in.map(expiry_from_now),
        })
    }

    async fn refresh_token(&self, token: &StoredToken) -> BotResult<StoredToken> {
        let refresh_token = token
            .refresh_token
            .as_deref()
            .ok_or_else(|| authorization_error("No refresh token in token data"))?;

        let params = [
            ("client_id", token.client_id.as_str()),
            ("client_secret", token.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];
        let response = self.request_token(&token.token_uri, &params).await?;

        Ok(StoredToken {
            token: response.access_token,
            refresh_token: response
                .refresh_token
                .or_else(|| token.refresh_token.clone()),
            expiry: response.expires_in.map(expiry_from_now),
            ..token.clone()
        })
    }

    async fn request_token(&self, token_uri: &str, params: &[(&str, &str)]) -> BotResult<TokenResponse> {
        let response = self
            .client
            .post(token_uri)
            .form(params)
            .send()
            .await
            .map_err(|e| authorization_error(&format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(authorization_error(&format!(
                "Token request failed: HTTP {} - {}",
                status, error_body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| authorization_error(&format!("Failed to parse token response: {}", e)))
    }

    /// Read the token file, `None` when it does not exist yet
    pub async fn load_token(&self) -> BotResult<Option<StoredToken>> {
        if !tokio::fs::try_exists(&self.token_file).await? {
            return Ok(None);
        }

        info!("Getting existing credentials from {}", self.token_file.display());
        let content = tokio::fs::read_to_string(&self.token_file).await?;
        match serde_json::from_str(&content) {
            Ok(token) => Ok(Some(token)),
            Err(e) => {
                warn!("Ignoring unreadable token file: {}", e);
                Ok(None)
            }
        }
    }

    pub async fn save_token(&self, token: &StoredToken) -> BotResult<()> {
        info!("Writing new credentials to {}", self.token_file.display());
        let json = serde_json::to_string_pretty(token)?;
        tokio::fs::write(&self.token_file, json).await?;
        Ok(())
    }
}

#[async_trait]
impl AccessTokenSource for TokenManager {
    async fn access_token(&self) -> BotResult<String> {
        Ok(self.get_token().await?.token)
    }
}

fn expiry_from_now(expires_in: i64) -> DateTime<Utc> {
    Utc::now() + Duration::seconds(expires_in)
}
