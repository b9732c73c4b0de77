use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use reqwest::Client;
use serde::Deserialize;

use crate::condition::SkyCondition;
use crate::config::{Coordinate, ForecastOptions};
use crate::model::{
    Alert, DailyForecastEntry, HourlyForecastEntry, REPORT_TZ, WeatherSnapshot, today_range,
};

use super::{FetchError, WeatherSource};

pub const DEFAULT_BASE_URL: &str = "https://api.caiyunapp.com/v2.6";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const HOURLY_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M%z";

/// Weather source backed by the Caiyun API.
#[derive(Debug, Clone)]
pub struct CaiyunSource {
    api_key: String,
    coordinate: Coordinate,
    options: ForecastOptions,
    http: Client,
    base_url: String,
}

impl CaiyunSource {
    pub fn new(api_key: String, coordinate: Coordinate, options: ForecastOptions) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client for Caiyun")?;

        Ok(Self {
            api_key,
            coordinate,
            options,
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Override the endpoint, for tests against a local server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_raw(&self) -> Result<ApiResponse, FetchError> {
        let url = format!(
            "{}/{}/{},{}/weather",
            self.base_url, self.api_key, self.coordinate.longitude, self.coordinate.latitude,
        );

        let res = self
            .http
            .get(&url)
            .query(&[
                ("alert", "true".to_string()),
                ("dailysteps", self.options.daily_steps.to_string()),
                ("hourlysteps", self.options.hourly_steps.to_string()),
                ("unit", "metric:v2".to_string()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(FetchError::BadStatus {
                status,
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| FetchError::Payload(format!("invalid JSON: {e}")))
    }
}

#[async_trait]
impl WeatherSource for CaiyunSource {
    async fn fetch(&self) -> Result<WeatherSnapshot> {
        let response = self.fetch_raw().await?;
        let now = Utc::now().with_timezone(&REPORT_TZ);
        Ok(snapshot_from_response(response, now)?)
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    status: String,
    result: Option<ApiResult>,
}

#[derive(Debug, Deserialize)]
struct ApiResult {
    realtime: Realtime,
    hourly: Hourly,
    #[serde(default)]
    daily: Option<Daily>,
    #[serde(default)]
    alert: Option<AlertBlock>,
}

#[derive(Debug, Deserialize)]
struct Realtime {
    temperature: f64,
    apparent_temperature: f64,
    skycon: String,
    /// Fraction in 0..=1.
    humidity: f64,
    visibility: f64,
    wind: Wind,
    /// Pascals.
    pressure: f64,
    air_quality: AirQuality,
    #[serde(default)]
    life_index: Option<LifeIndex>,
}

#[derive(Debug, Deserialize)]
struct Wind {
    /// Meters per second.
    speed: f64,
    direction: f64,
}

#[derive(Debug, Deserialize)]
struct AirQuality {
    aqi: AqiScale,
    pm25: f64,
}

#[derive(Debug, Deserialize)]
struct AqiScale {
    #[serde(default)]
    chn: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct LifeIndex {
    #[serde(default)]
    comfort: Option<IndexEntry>,
    #[serde(default)]
    ultraviolet: Option<IndexEntry>,
}

#[derive(Debug, Deserialize)]
struct IndexEntry {
    desc: String,
}

#[derive(Debug, Deserialize)]
struct Hourly {
    temperature: Vec<TimedValue>,
    skycon: Vec<TimedCode>,
    precipitation: Vec<TimedValue>,
}

#[derive(Debug, Deserialize)]
struct TimedValue {
    datetime: String,
    value: f64,
}

#[derive(Debug, Deserialize)]
struct TimedCode {
    datetime: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct Daily {
    temperature: Vec<DailyRange>,
    skycon: Vec<DatedCode>,
}

#[derive(Debug, Deserialize)]
struct DailyRange {
    max: f64,
    min: f64,
}

#[derive(Debug, Deserialize)]
struct DatedCode {
    date: String,
    value: String,
}

#[derive(Debug, Deserialize)]
struct AlertBlock {
    #[serde(default)]
    content: Vec<AlertContent>,
}

#[derive(Debug, Deserialize)]
struct AlertContent {
    title: String,
    description: String,
}

/// Map the raw payload into the domain model. Pure apart from `now`, which
/// fixes "today" for the hourly-derived temperature range.
fn snapshot_from_response(
    response: ApiResponse,
    now: DateTime<Tz>,
) -> Result<WeatherSnapshot, FetchError> {
    if response.status != "ok" {
        return Err(FetchError::ApiStatus(response.status));
    }
    let result = response
        .result
        .ok_or_else(|| FetchError::Payload("missing result".to_string()))?;
    let realtime = result.realtime;

    let hourly = parse_hourly(&result.hourly)?;
    let daily = result
        .daily
        .map(|d| parse_daily(&d, &hourly, now))
        .transpose()?
        .unwrap_or_default();

    let alerts = result
        .alert
        .map(|a| {
            a.content
                .into_iter()
                .map(|c| Alert {
                    title: c.title,
                    description: c.description,
                })
                .collect()
        })
        .unwrap_or_default();

    let life_index = realtime.life_index.unwrap_or(LifeIndex {
        comfort: None,
        ultraviolet: None,
    });
    let index_desc = |entry: Option<IndexEntry>| entry.map_or_else(|| "未知".to_string(), |e| e.desc);

    Ok(WeatherSnapshot {
        updated_at: now,
        temperature: round1(realtime.temperature),
        feels_like: round1(realtime.apparent_temperature),
        condition: SkyCondition::from_code(&realtime.skycon),
        humidity_pct: (realtime.humidity * 100.0).round() as u8,
        visibility_km: round1(realtime.visibility),
        wind_speed_kmh: round1(realtime.wind.speed * 3.6),
        wind_direction_deg: realtime.wind.direction,
        pressure_hpa: round1(realtime.pressure / 100.0),
        aqi: realtime.air_quality.aqi.chn.map(|v| v.round() as u16),
        pm25: round1(realtime.air_quality.pm25),
        comfort: index_desc(life_index.comfort),
        ultraviolet: index_desc(life_index.ultraviolet),
        hourly,
        daily,
        alerts,
    })
}

fn parse_hourly(hourly: &Hourly) -> Result<Vec<HourlyForecastEntry>, FetchError> {
    hourly
        .temperature
        .iter()
        .zip(&hourly.skycon)
        .zip(&hourly.precipitation)
        .map(|((temp, skycon), precip)| {
            let time = DateTime::parse_from_str(&temp.datetime, HOURLY_TIME_FORMAT)
                .map_err(|e| {
                    FetchError::Payload(format!("bad hourly datetime '{}': {e}", temp.datetime))
                })?
                .with_timezone(&REPORT_TZ);

            Ok(HourlyForecastEntry {
                time,
                temperature: round1(temp.value),
                condition: SkyCondition::from_code(&skycon.value),
                precipitation_mmh: round2(precip.value),
            })
        })
        .collect()
}

fn parse_daily(
    daily: &Daily,
    hourly: &[HourlyForecastEntry],
    now: DateTime<Tz>,
) -> Result<Vec<DailyForecastEntry>, FetchError> {
    daily
        .temperature
        .iter()
        .zip(&daily.skycon)
        .map(|(range, skycon)| {
            let date = parse_daily_date(&skycon.date)?;

            // Today's range comes from the remaining hourly entries when any
            // are left, otherwise from the API's own daily min/max.
            let (min, max) = if date == now.date_naive() {
                today_range(hourly, now).unwrap_or((range.min, range.max))
            } else {
                (range.min, range.max)
            };

            Ok(DailyForecastEntry {
                date,
                temp_min: round1(min),
                temp_max: round1(max),
                condition: SkyCondition::from_code(&skycon.value),
            })
        })
        .collect()
}

fn parse_daily_date(raw: &str) -> Result<NaiveDate, FetchError> {
    let date_part = raw.split('T').next().unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| FetchError::Payload(format!("bad daily date '{raw}': {e}")))
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let cut = body.char_indices().nth(MAX).map_or(body.len(), |(i, _)| i);
        format!("{}...", &body[..cut])
    } else {
        body.to_string()
    }
}
