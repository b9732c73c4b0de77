use chrono::{DateTime, NaiveDate, Timelike};
use chrono_tz::Tz;

use crate::condition::SkyCondition;

/// Timezone all report timestamps are rendered in.
pub const REPORT_TZ: Tz = chrono_tz::Asia::Shanghai;

/// One hour of forecast data, chronological within [`WeatherSnapshot::hourly`].
#[derive(Debug, Clone)]
pub struct HourlyForecastEntry {
    pub time: DateTime<Tz>,
    pub temperature: f64,
    pub condition: SkyCondition,
    pub precipitation_mmh: f64,
}

/// One forecast day.
#[derive(Debug, Clone)]
pub struct DailyForecastEntry {
    pub date: NaiveDate,
    pub temp_min: f64,
    pub temp_max: f64,
    pub condition: SkyCondition,
}

/// A weather alert issued for the coordinate.
#[derive(Debug, Clone)]
pub struct Alert {
    pub title: String,
    pub description: String,
}

/// Everything one fetch produced, already mapped to display units.
///
/// Immutable after construction; both renderers are pure functions of it.
#[derive(Debug, Clone)]
pub struct WeatherSnapshot {
    pub updated_at: DateTime<Tz>,
    pub temperature: f64,
    pub feels_like: f64,
    pub condition: SkyCondition,
    pub humidity_pct: u8,
    pub visibility_km: f64,
    pub wind_speed_kmh: f64,
    pub wind_direction_deg: f64,
    pub pressure_hpa: f64,
    pub aqi: Option<u16>,
    pub pm25: f64,
    pub comfort: String,
    pub ultraviolet: String,
    pub hourly: Vec<HourlyForecastEntry>,
    pub daily: Vec<DailyForecastEntry>,
    pub alerts: Vec<Alert>,
}

impl WeatherSnapshot {
    /// Today's entry of the daily forecast, if the API returned one.
    pub fn today(&self) -> Option<&DailyForecastEntry> {
        self.daily.first()
    }
}

/// Min/max temperature over the remaining hourly entries of the current local
/// day (entries at or after the current hour). `None` when no such entries
/// remain, in which case callers fall back to the API's own daily range.
pub fn today_range(hourly: &[HourlyForecastEntry], now: DateTime<Tz>) -> Option<(f64, f64)> {
    let today = now.date_naive();
    let mut range: Option<(f64, f64)> = None;

    for entry in hourly {
        if entry.time.date_naive() != today || entry.time.hour() < now.hour() {
            continue;
        }
        range = Some(match range {
            Some((min, max)) => (min.min(entry.temperature), max.max(entry.temperature)),
            None => (entry.temperature, entry.temperature),
        });
    }

    range
}
