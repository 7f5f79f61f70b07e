use crate::{ApiError, ApiResult, Release};

use std::time::Duration;

use reqwest::{Client as ReqwestClient, header};

/// Client for the release feed (GitHub "latest release" API shape).
pub struct ReleaseFeed {
    pub url: String,
    client: ReqwestClient,
}

impl ReleaseFeed {
    /// Create a feed client.
    ///
    /// The feed rejects requests without a User-Agent, so one is always sent.
    pub fn new(url: &str, user_agent: &str, timeout: Duration) -> ApiResult<Self> {
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            url: url.to_string(),
            client,
        })
    }

    /// Fetch the latest published release.
    pub async fn latest_release(&self) -> ApiResult<Release> {
        let response = self
            .client
            .get(&self.url)
            .header(header::ACCEPT, "application/vnd.github+json")
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            return Err(ApiError::api_error(
                status.as_u16().to_string(),
                format!("release feed returned HTTP {status}"),
            ));
        }

        let text = response.text().await?;
        let release: Release = serde_json::from_str(&text)?;

        if release.tag_name.trim().is_empty() {
            return Err(ApiError::missing_field("tag_name"));
        }

        Ok(release)
    }
}
