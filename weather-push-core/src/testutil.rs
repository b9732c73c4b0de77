//! Shared fixtures for unit tests.

use chrono::{NaiveDate, TimeZone};

use crate::condition::SkyCondition;
use crate::config::Config;
use crate::model::{Alert, DailyForecastEntry, HourlyForecastEntry, REPORT_TZ, WeatherSnapshot};

/// A winter-evening snapshot exercising snow, rain, alerts and a sharp
/// temperature drop.
pub fn sample_snapshot() -> WeatherSnapshot {
    let hour = |h: u32, temp: f64, cond: SkyCondition, precip: f64| HourlyForecastEntry {
        time: REPORT_TZ.with_ymd_and_hms(2024, 1, 15, h, 0, 0).unwrap(),
        temperature: temp,
        condition: cond,
        precipitation_mmh: precip,
    };

    WeatherSnapshot {
        updated_at: REPORT_TZ.with_ymd_and_hms(2024, 1, 15, 14, 10, 0).unwrap(),
        temperature: -10.3,
        feels_like: -16.8,
        condition: SkyCondition::LightSnow,
        humidity_pct: 85,
        visibility_km: 8.3,
        wind_speed_kmh: 10.8,
        wind_direction_deg: 315.0,
        pressure_hpa: 1013.3,
        aqi: Some(85),
        pm25: 80.0,
        comfort: "寒冷".to_string(),
        ultraviolet: "最弱".to_string(),
        hourly: vec![
            hour(14, -10.0, SkyCondition::LightSnow, 0.0),
            hour(15, -9.0, SkyCondition::LightSnow, 0.1),
            hour(16, -11.0, SkyCondition::Cloudy, 0.0),
            hour(17, -11.5, SkyCondition::Cloudy, 0.0),
            hour(18, -15.0, SkyCondition::LightRain, 1.2),
            hour(19, -15.5, SkyCondition::ClearNight, 0.0),
            hour(20, -16.0, SkyCondition::ClearNight, 0.0),
            hour(21, -16.5, SkyCondition::ClearNight, 0.0),
        ],
        daily: vec![
            DailyForecastEntry {
                date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                temp_min: -16.5,
                temp_max: -9.0,
                condition: SkyCondition::LightSnow,
            },
            DailyForecastEntry {
                date: NaiveDate::from_ymd_opt(2024, 1, 16).unwrap(),
                temp_min: -18.0,
                temp_max: -7.0,
                condition: SkyCondition::Cloudy,
            },
        ],
        alerts: vec![Alert {
            title: "道路冰雪黄色预警".to_string(),
            description: "预计未来24小时将出现道路结冰".to_string(),
        }],
    }
}

/// Minimal valid configuration with a Pages target.
pub fn sample_config() -> Config {
    Config::from_lookup(|key| {
        match key {
            "WXPUSHER_TOKEN" => Some("AT_token"),
            "WXPUSHER_UID" => Some("UID_a"),
            "WEATHER_API_KEY" => Some("caiyun-key"),
            "GITHUB_USERNAME" => Some("someone"),
            _ => None,
        }
        .map(str::to_string)
    })
    .expect("fixture config must load")
}
