use crate::session::GAME_ID_TAG;
use crate::{ApiError, ApiResult, Session, SessionDirectory};

use std::panic::Location;
use std::time::Duration;

use async_trait::async_trait;
use error_location::ErrorLocation;
use log::debug;
use reqwest::{Client as ReqwestClient, StatusCode, header};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

const LOGIN_PATH: &str = "/Client/LoginWithCustomID";
const CURRENT_GAMES_PATH: &str = "/Client/GetCurrentGames";
const CLOUD_SCRIPT_PATH: &str = "/Client/ExecuteCloudScript";
const DEREGISTER_FUNCTION: &str = "deregisterDedicatedServer";
const AUTHORIZATION_HEADER: &str = "X-Authorization";
const SDK_HEADER: &str = "X-PlayFabSDK";

/// HTTP client for the session directory.
///
/// Calls are authorized with a session ticket obtained from
/// [`DirectoryClient::authenticate`].
pub struct DirectoryClient {
    pub base_url: String,
    pub title_id: String,
    sdk: String,
    session_ticket: Option<String>,
    client: ReqwestClient,
}

#[derive(Debug, Deserialize)]
struct LoginData {
    #[serde(rename = "SessionTicket")]
    session_ticket: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CurrentGamesData {
    #[serde(rename = "Games", default)]
    games: Vec<Session>,
}

impl DirectoryClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `base_url` - Directory URL (e.g., "https://5EA1.playfabapi.com")
    /// * `title_id` - Title the dedicated server belongs to
    /// * `sdk` - SDK identifier sent as query parameter and header
    /// * `timeout` - Per-request timeout
    pub fn new(base_url: &str, title_id: &str, sdk: &str, timeout: Duration) -> ApiResult<Self> {
        let client = ReqwestClient::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            title_id: title_id.to_string(),
            sdk: sdk.to_string(),
            session_ticket: None,
            client,
        })
    }

    /// Use an existing session ticket instead of authenticating.
    pub fn with_session_ticket(mut self, ticket: &str) -> Self {
        self.session_ticket = Some(ticket.to_string());
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.session_ticket.is_some()
    }

    /// Exchange the server's GUID for a session ticket and keep it for later calls.
    pub async fn authenticate(&mut self, server_guid: &str) -> ApiResult<String> {
        let body = json!({
            "CreateAccount": true,
            "CustomId": server_guid,
            "TitleId": self.title_id,
        });

        let data: LoginData = self.execute(self.request(LOGIN_PATH).json(&body)).await?;
        let ticket = data
            .session_ticket
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::missing_field("data.SessionTicket"))?;

        self.session_ticket = Some(ticket.clone());
        Ok(ticket)
    }

    /// Build a POST request with SDK and authorization headers
    fn request(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}?sdk={}", self.base_url, path, self.sdk);
        let mut req = self.client.post(&url).header(SDK_HEADER, &self.sdk);

        if let Some(ref ticket) = self.session_ticket {
            req = req.header(AUTHORIZATION_HEADER, ticket);
        }

        req
    }

    /// Execute request, map error envelopes, and decode the `data` payload
    async fn execute<T: DeserializeOwned>(&self, req: reqwest::RequestBuilder) -> ApiResult<T> {
        let response = req.send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok());
            return Err(ApiError::RateLimited {
                retry_after_secs,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let text = response.text().await?;
        let body: Value = serde_json::from_str(&text)?;

        if !status.is_success() {
            let code = body
                .get("error")
                .and_then(|v| v.as_str())
                .unwrap_or("UNKNOWN")
                .to_string();
            let message = body
                .get("errorMessage")
                .and_then(|v| v.as_str())
                .map(String::from)
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(ApiError::api_error(code, message));
        }

        let data = body
            .get("data")
            .cloned()
            .ok_or_else(|| ApiError::missing_field("data"))?;

        Ok(serde_json::from_value(data)?)
    }
}

#[async_trait]
impl SessionDirectory for DirectoryClient {
    async fn list_sessions(&self, address: &str) -> ApiResult<Vec<Session>> {
        let body = json!({
            "TagFilter": {
                "Includes": [
                    { "Data": { GAME_ID_TAG: address } }
                ]
            }
        });

        let data: CurrentGamesData = self
            .execute(self.request(CURRENT_GAMES_PATH).json(&body))
            .await?;

        debug!("Directory lists {} session(s) for {address}", data.games.len());
        Ok(data.games)
    }

    async fn deregister_session(&self, lobby_id: &str) -> ApiResult<()> {
        let body = json!({
            "FunctionName": DEREGISTER_FUNCTION,
            "FunctionParameter": { "lobbyId": lobby_id },
            "GeneratePlayStreamEvent": true,
        });

        let _: Value = self
            .execute(self.request(CLOUD_SCRIPT_PATH).json(&body))
            .await?;

        Ok(())
    }
}
