use super::token::ClientSecret;
use crate::error::{authorization_error, BotResult};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use url::Url;

/// How long to wait for the browser to come back
const CALLBACK_TIMEOUT: Duration = Duration::from_secs(300);

/// Code returned on the local redirect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationCode {
    pub code: String,
    pub redirect_uri: String,
}

/// Build the consent URL for an installed-app flow
pub fn authorization_url(
    secret: &ClientSecret,
    scope: &str,
    redirect_uri: &str,
    state: &str,
) -> BotResult<Url> {
    let mut url = Url::parse(&secret.auth_uri)
        .map_err(|e| authorization_error(&format!("Invalid auth URI: {}", e)))?;

    url.query_pairs_mut()
        .append_pair("client_id", &secret.client_id)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("response_type", "code")
        .append_pair("access_type", "offline")
        .append_pair("prompt", "consent")
        .append_pair("scope", scope)
        .append_pair("state", state);

    Ok(url)
}

/// Read the authorization code out of a callback request path.
///
/// `Ok(None)` means the request was not the OAuth callback (a favicon fetch,
/// for example) and the server should keep waiting.
pub fn parse_callback(path: &str, expected_state: &str) -> BotResult<Option<String>> {
    let url = Url::parse(&format!("http://localhost{}", path))
        .map_err(|e| authorization_error(&format!("Invalid callback URL: {}", e)))?;

    let mut code = None;
    let mut state = None;
    let mut error = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => error = Some(value.into_owned()),
            _ => {}
        }
    }

    if let Some(error) = error {
        return Err(authorization_error(&format!("Authorization denied: {}", error)));
    }

    match code {
        None => Ok(None),
        Some(code) if state.as_deref() == Some(expected_state) => Ok(Some(code)),
        Some(_) => Err(authorization_error("OAuth state mismatch in callback")),
    }
}

/// Open the consent page and wait for the redirect on `localhost:{port}`
pub async fn obtain_authorization_code(
    secret: &ClientSecret,
    scope: &str,
    port: u16,
) -> BotResult<AuthorizationCode> {
    let state = uuid::Uuid::new_v4().to_string();
    let redirect_uri = format!("http://localhost:{}/", port);
    let url = authorization_url(secret, scope, &redirect_uri, &state)?;

    let server = tiny_http::Server::http(("127.0.0.1", port))
        .map_err(|e| authorization_error(&format!("Failed to start callback server: {}", e)))?;

    info!("Opening browser for Google Sheets authorization");
    if let Err(e) = webbrowser::open(url.as_str()) {
        warn!("Could not open a browser ({}), visit this URL to authorize: {}", e, url);
    }

    let code = tokio::task::spawn_blocking(move || wait_for_callback(&server, &state))
        .await
        .map_err(|e| authorization_error(&format!("Callback task failed: {}", e)))??;

    Ok(AuthorizationCode { code, redirect_uri })
}

fn wait_for_callback(server: &tiny_http::Server, state: &str) -> BotResult<String> {
    let deadline = Instant::now() + CALLBACK_TIMEOUT;

    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            return Err(authorization_error("Timed out waiting for authorization callback"));
        }

        let Some(request) = server.recv_timeout(remaining)? else {
            continue;
        };

        match parse_callback(request.url(), state) {
            Ok(Some(code)) => {
                let response = tiny_http::Response::from_string(
                    "Authorization successful! You can close this window.",
                );
                request.respond(response)?;
                return Ok(code);
            }
            Ok(None) => {
                request.respond(tiny_http::Response::empty(tiny_http::StatusCode(404)))?;
            }
            Err(e) => {
                let response = tiny_http::Response::from_string("Authorization failed.")
                    .with_status_code(tiny_http::StatusCode(400));
                request.respond(response)?;
                return Err(e);
            }
        }
    }
}
