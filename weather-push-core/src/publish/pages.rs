use anyhow::{Context, Result, anyhow};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::DateTime;
use chrono_tz::Tz;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use crate::config::PagesTarget;

pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

const USER_AGENT: &str = "weather-push/0.1";
const ACCEPT: &str = "application/vnd.github+json";

/// Publishes the HTML report to a file in a GitHub Pages branch via the
/// contents API, read-modify-write: fetch the current revision for its `sha`,
/// then create or update the file.
#[derive(Debug, Clone)]
pub struct PagesPublisher {
    http: Client,
    base_url: String,
    token: String,
    target: PagesTarget,
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    sha: String,
}

impl PagesPublisher {
    pub fn new(token: String, target: PagesTarget) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client for the contents API")?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            token,
            target,
        })
    }

    /// Override the endpoint, for tests against a local server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn contents_url(&self) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.base_url, self.target.owner, self.target.repo, self.target.path
        )
    }

    /// `sha` of the existing file, or `None` when it does not exist yet.
    async fn current_sha(&self) -> Option<String> {
        let response = self
            .http
            .get(self.contents_url())
            .bearer_auth(&self.token)
            .header("Accept", ACCEPT)
            .send()
            .await;

        match response {
            Ok(res) if res.status().is_success() => {
                res.json::<ContentsResponse>().await.ok().map(|c| c.sha)
            }
            Ok(res) => {
                tracing::debug!(status = %res.status(), "no existing page revision, creating");
                None
            }
            Err(e) => {
                tracing::debug!(error = %e, "revision lookup failed, creating");
                None
            }
        }
    }

    /// Create or update the page with the rendered document.
    pub async fn publish(&self, html: &str, updated_at: DateTime<Tz>) -> Result<()> {
        let mut body = json!({
            "message": format!("Update weather report at {}", updated_at.format("%Y-%m-%d %H:%M:%S")),
            "content": STANDARD.encode(html),
            "branch": self.target.branch,
        });
        if let Some(sha) = self.current_sha().await {
            body["sha"] = json!(sha);
        }

        let response = self
            .http
            .put(self.contents_url())
            .bearer_auth(&self.token)
            .header("Accept", ACCEPT)
            .json(&body)
            .send()
            .await
            .context("Failed to send request to the contents API")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Page update failed with status {status}: {body}"));
        }

        tracing::info!(
            owner = %self.target.owner,
            repo = %self.target.repo,
            branch = %self.target.branch,
            "page published"
        );
        Ok(())
    }
}
