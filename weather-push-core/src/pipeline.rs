//! The whole job: fetch → transform → render → deliver.
//!
//! Straight-line control flow with a single failure exit: when the fetch
//! budget is exhausted the run ends without rendering or delivering anything.
//! Delivery failures are logged per path and never abort the sibling path.

use anyhow::{Context, Result};

use crate::config::Config;
use crate::html::render_html;
use crate::model::WeatherSnapshot;
use crate::publish::{PagesPublisher, WxPusherClient};
use crate::report::render_text;
use crate::source::{CaiyunSource, WeatherSource, fetch_snapshot};

/// Push-notification summary line.
pub const PUSH_SUMMARY: &str = "天气预报详情";

/// What a run ended up doing.
#[derive(Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Reports rendered and handed to the delivery paths.
    Delivered,
    /// Fetch budget exhausted; nothing was rendered or delivered.
    FetchFailed,
    /// Dry run: the text report, not delivered anywhere.
    DryRun(String),
}

/// Run the pipeline against the real Caiyun API.
pub async fn run(config: &Config, dry_run: bool) -> Result<RunOutcome> {
    let source = CaiyunSource::new(
        config.weather_api_key.clone(),
        config.coordinate,
        config.options.clone(),
    )?;
    run_with_source(&source, config, dry_run).await
}

/// Run the pipeline with an injectable weather source.
pub async fn run_with_source(
    source: &dyn WeatherSource,
    config: &Config,
    dry_run: bool,
) -> Result<RunOutcome> {
    let snapshot = match fetch_snapshot(source, &config.retry).await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::error!(error = %e, "weather fetch failed, skipping report");
            return Ok(RunOutcome::FetchFailed);
        }
    };

    let text = render_text(&snapshot, config);
    if dry_run {
        return Ok(RunOutcome::DryRun(text));
    }

    if config.trigger.publishes_pages() {
        if let Err(e) = publish_page(&snapshot, config).await {
            tracing::error!(error = %e, "page publishing failed");
        }
    } else {
        tracing::info!(trigger = ?config.trigger, "page publishing not requested");
    }

    if let Err(e) = push_message(&text, config).await {
        tracing::error!(error = %e, "message push failed");
    }

    Ok(RunOutcome::Delivered)
}

async fn publish_page(snapshot: &WeatherSnapshot, config: &Config) -> Result<()> {
    let (Some(token), Some(target)) = (&config.github_token, &config.pages) else {
        tracing::warn!("page publishing skipped: GH_TOKEN or GITHUB_USERNAME not configured");
        return Ok(());
    };

    let html = render_html(snapshot, config);
    let publisher = PagesPublisher::new(token.clone(), target.clone())
        .context("Failed to create page publisher")?;
    publisher.publish(&html, snapshot.updated_at).await
}

async fn push_message(text: &str, config: &Config) -> Result<()> {
    let client = WxPusherClient::new(config.wxpusher_token.clone())
        .context("Failed to create WxPusher client")?;
    client.push(&config.wxpusher_uids, text, PUSH_SUMMARY).await
}
