use anyhow::{Context, Result, anyhow};
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "http://wxpusher.zjiecode.com";

/// Response `code` indicating a successful push.
const SUCCESS_CODE: i64 = 1000;
/// `contentType` 3 is markdown.
const CONTENT_TYPE_MARKDOWN: u8 = 3;

/// Client for the WxPusher message API.
#[derive(Debug, Clone)]
pub struct WxPusherClient {
    http: Client,
    base_url: String,
    app_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PushRequest<'a> {
    app_token: &'a str,
    content: &'a str,
    content_type: u8,
    uids: &'a [String],
    summary: &'a str,
}

#[derive(Debug, Deserialize)]
struct PushResponse {
    code: i64,
    #[serde(default)]
    msg: String,
}

impl WxPusherClient {
    pub fn new(app_token: String) -> Result<Self> {
        let http = Client::builder()
            .build()
            .context("Failed to create HTTP client for WxPusher")?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            app_token,
        })
    }

    /// Override the endpoint, for tests against a local server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Push a markdown message to the given recipients.
    pub async fn push(&self, uids: &[String], content: &str, summary: &str) -> Result<()> {
        let url = format!("{}/api/send/message", self.base_url);
        let request = PushRequest {
            app_token: &self.app_token,
            content,
            content_type: CONTENT_TYPE_MARKDOWN,
            uids,
            summary,
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to WxPusher")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("WxPusher request failed with status {status}: {body}"));
        }

        let parsed: PushResponse = response
            .json()
            .await
            .context("Failed to parse WxPusher response")?;

        if parsed.code != SUCCESS_CODE {
            return Err(anyhow!(
                "WxPusher rejected the message (code {}): {}",
                parsed.code,
                parsed.msg
            ));
        }

        tracing::info!(recipients = uids.len(), "message pushed");
        Ok(())
    }
}
