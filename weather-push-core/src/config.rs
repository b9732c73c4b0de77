use anyhow::{Result, anyhow};

use crate::retry::RetryConfig;

/// Geographic coordinate the report is generated for.
#[derive(Debug, Clone, Copy)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Changchun, Chaoyang district.
pub const DEFAULT_COORDINATE: Coordinate = Coordinate {
    latitude: 43.8336,
    longitude: 125.2833,
};

/// What triggered this run. Only scheduled and manually dispatched runs
/// publish the HTML page; a subscription event switches the report greeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TriggerEvent {
    Schedule,
    WorkflowDispatch,
    Watch,
    #[default]
    Other,
}

impl TriggerEvent {
    pub fn parse(value: &str) -> Self {
        match value {
            "schedule" => Self::Schedule,
            "workflow_dispatch" => Self::WorkflowDispatch,
            "watch" => Self::Watch,
            _ => Self::Other,
        }
    }

    pub fn publishes_pages(&self) -> bool {
        matches!(self, Self::Schedule | Self::WorkflowDispatch)
    }
}

/// Shape of the forecast to request and to render.
#[derive(Debug, Clone)]
pub struct ForecastOptions {
    /// Days of daily forecast to request.
    pub daily_steps: u32,
    /// Hours of hourly forecast to request.
    pub hourly_steps: u32,
    /// Hourly lines shown in the text report.
    pub hourly_excerpt: usize,
    /// Render the multi-day section at all.
    pub include_daily: bool,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self {
            daily_steps: 5,
            hourly_steps: 24,
            hourly_excerpt: 6,
            include_daily: true,
        }
    }
}

/// Where the HTML report is published.
#[derive(Debug, Clone)]
pub struct PagesTarget {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub path: String,
}

/// Explicit run configuration, assembled once at startup and passed into the
/// pipeline. Nothing in the library reads the environment after this.
#[derive(Debug, Clone)]
pub struct Config {
    pub wxpusher_token: String,
    pub wxpusher_uids: Vec<String>,
    pub weather_api_key: String,
    /// Bearer token for the contents API; page publishing is skipped without it.
    pub github_token: Option<String>,
    pub pages: Option<PagesTarget>,
    pub trigger: TriggerEvent,
    pub coordinate: Coordinate,
    pub location_name: String,
    pub options: ForecastOptions,
    pub retry: RetryConfig,
}

impl Config {
    /// Build from process environment variables. Missing required variables
    /// are fatal; the caller must not reach the network in that case.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`Self::from_env`], with an injectable variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| anyhow!("Missing required environment variable {key}"))
        };

        let wxpusher_token = required("WXPUSHER_TOKEN")?;
        let uids = parse_uids(&required("WXPUSHER_UID")?);
        if uids.is_empty() {
            return Err(anyhow!("WXPUSHER_UID contains no recipient UIDs"));
        }
        let weather_api_key = required("WEATHER_API_KEY")?;

        let github_token = lookup("GH_TOKEN").filter(|v| !v.trim().is_empty());
        let pages = lookup("GITHUB_USERNAME")
            .filter(|v| !v.trim().is_empty())
            .map(|owner| PagesTarget {
                owner,
                repo: "weather-push".to_string(),
                branch: "gh-pages".to_string(),
                path: "index.html".to_string(),
            });

        let trigger = lookup("TRIGGER_EVENT")
            .map(|v| TriggerEvent::parse(&v))
            .unwrap_or_default();

        Ok(Self {
            wxpusher_token,
            wxpusher_uids: uids,
            weather_api_key,
            github_token,
            pages,
            trigger,
            coordinate: DEFAULT_COORDINATE,
            location_name: "长春市朝阳区".to_string(),
            options: ForecastOptions::default(),
            retry: RetryConfig::default(),
        })
    }

    /// Public URL of the published page, when a target is configured.
    pub fn pages_url(&self) -> Option<String> {
        self.pages
            .as_ref()
            .map(|p| format!("https://{}.github.io/{}/", p.owner, p.repo))
    }
}

fn parse_uids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
