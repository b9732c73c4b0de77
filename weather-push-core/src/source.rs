use std::fmt::Debug;

use async_trait::async_trait;

use crate::model::WeatherSnapshot;
use crate::retry::{RetryConfig, with_retry};

pub mod caiyun;

pub use caiyun::CaiyunSource;

/// Errors produced while fetching a snapshot. All of them are retryable.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("weather API returned HTTP {status}: {body}")]
    BadStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("weather API reported status '{0}'")]
    ApiStatus(String),

    #[error("malformed weather payload: {0}")]
    Payload(String),
}

/// Something that can produce one [`WeatherSnapshot`] per call.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch(&self) -> anyhow::Result<WeatherSnapshot>;
}

/// Fetch one snapshot through the retry budget. Exhaustion yields the last
/// fetch error; the pipeline logs it and skips every downstream stage.
pub async fn fetch_snapshot(
    source: &dyn WeatherSource,
    retry: &RetryConfig,
) -> anyhow::Result<WeatherSnapshot> {
    with_retry(retry, |attempt| async move {
        tracing::info!(attempt, "requesting weather data");
        source.fetch().await
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::condition::SkyCondition;
    use crate::model::REPORT_TZ;
    use anyhow::anyhow;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[derive(Debug)]
    struct FlakySource {
        calls: AtomicU32,
        fail_first: u32,
    }

    impl FlakySource {
        fn snapshot() -> WeatherSnapshot {
            WeatherSnapshot {
                updated_at: REPORT_TZ.with_ymd_and_hms(2024, 1, 15, 8, 0, 0).unwrap(),
                temperature: -12.3,
                feels_like: -18.0,
                condition: SkyCondition::ClearDay,
                humidity_pct: 45,
                visibility_km: 20.0,
                wind_speed_kmh: 10.8,
                wind_direction_deg: 0.0,
                pressure_hpa: 1020.0,
                aqi: Some(60),
                pm25: 40.0,
                comfort: "较冷".to_string(),
                ultraviolet: "最弱".to_string(),
                hourly: Vec::new(),
                daily: Vec::new(),
                alerts: Vec::new(),
            }
        }
    }

    #[async_trait]
    impl WeatherSource for FlakySource {
        async fn fetch(&self) -> anyhow::Result<WeatherSnapshot> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n <= self.fail_first {
                Err(anyhow!("simulated timeout on attempt {n}"))
            } else {
                Ok(Self::snapshot())
            }
        }
    }

    fn fast_retry() -> RetryConfig {
        RetryConfig {
            max_attempts: 3,
            base_delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn recovers_after_two_timeouts() {
        let source = FlakySource {
            calls: AtomicU32::new(0),
            fail_first: 2,
        };

        let snapshot = fetch_snapshot(&source, &fast_retry()).await.unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
        assert_eq!(snapshot.temperature, -12.3);
    }

    #[tokio::test]
    async fn gives_up_after_budget() {
        let source = FlakySource {
            calls: AtomicU32::new(0),
            fail_first: u32::MAX,
        };

        let result = fetch_snapshot(&source, &fast_retry()).await;

        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
        assert!(result.is_err());
    }
}
