//! Text/markdown report rendering. Pure functions of the snapshot.

use std::fmt::Write;

use crate::condition::{PRECIP_TRACE, PrecipIntensity};
use crate::config::{Config, TriggerEvent};
use crate::model::{HourlyForecastEntry, WeatherSnapshot};

const DIVIDER: &str = "━━━━━━━━━━";
const TREND_STEP: usize = 3;
const TREND_DELTA: f64 = 3.0;

/// Render the push-notification report.
pub fn render_text(snapshot: &WeatherSnapshot, config: &Config) -> String {
    let mut out = String::new();

    let title = match config.trigger {
        TriggerEvent::Watch => "🌟 感谢关注天气推送服务！".to_string(),
        _ => format!("🌈 {}天气预报", config.location_name),
    };
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{DIVIDER}");
    let _ = writeln!(
        out,
        "📅 更新时间：{}",
        snapshot.updated_at.format("%Y-%m-%d %H:%M:%S")
    );

    let _ = writeln!(out, "\n🌡️ 实时天气");
    let _ = writeln!(out, "• 当前温度：{:.1}°C", snapshot.temperature);
    let _ = writeln!(out, "• 体感温度：{:.1}°C", snapshot.feels_like);
    let _ = writeln!(out, "• 天气状况：{}", snapshot.condition.label());
    if let Some(today) = snapshot.today() {
        let _ = writeln!(
            out,
            "• 今日温区：{:.1}°C ~ {:.1}°C",
            today.temp_min, today.temp_max
        );
    }

    let _ = writeln!(out, "\n💨 环境指数");
    let _ = writeln!(out, "• 相对湿度：{}%", snapshot.humidity_pct);
    let _ = writeln!(out, "• 气压：{:.1}hPa", snapshot.pressure_hpa);
    let _ = writeln!(out, "• 能见度：{:.1}km", snapshot.visibility_km);

    let _ = writeln!(out, "\n🌪️ 风力状况");
    let _ = writeln!(
        out,
        "• 风向：{}风 ({}°)",
        crate::condition::compass_label(snapshot.wind_direction_deg),
        snapshot.wind_direction_deg
    );
    let _ = writeln!(out, "• 风速：{:.1}km/h", snapshot.wind_speed_kmh);

    let _ = writeln!(out, "\n🌫️ 空气质量");
    match snapshot.aqi {
        Some(aqi) => {
            let _ = writeln!(out, "• AQI指数：{aqi}");
        }
        None => {
            let _ = writeln!(out, "• AQI指数：未知");
        }
    }
    let _ = writeln!(out, "• PM2.5：{:.1}μg/m³", snapshot.pm25);

    let _ = writeln!(out, "\n👨‍👩‍👦 生活指数");
    let _ = writeln!(out, "• 舒适度：{}", snapshot.comfort);
    let _ = writeln!(out, "• 紫外线：{}", snapshot.ultraviolet);

    if config.options.include_daily && !snapshot.daily.is_empty() {
        let _ = writeln!(out, "\n📅 {}天预报", snapshot.daily.len());
        for day in &snapshot.daily {
            let _ = writeln!(
                out,
                "• {} {} {:.1}°C ~ {:.1}°C {}",
                day.date.format("%m-%d"),
                day.condition.icon(0.0),
                day.temp_min,
                day.temp_max,
                day.condition.label()
            );
        }
    }

    let excerpt = hourly_excerpt_lines(snapshot, config.options.hourly_excerpt);
    if !excerpt.is_empty() {
        let _ = writeln!(out, "\n⏰ 未来{}小时预报", excerpt.len());
        for line in &excerpt {
            let _ = writeln!(out, "{line}");
        }
    }

    let tips = weather_tips(snapshot);
    if !tips.is_empty() {
        let _ = writeln!(out, "\n⚠️ 天气提醒");
        for tip in &tips {
            let _ = writeln!(out, "• {tip}");
        }
    }

    if !snapshot.alerts.is_empty() {
        let _ = writeln!(out, "\n🚨 预警信息");
        for alert in &snapshot.alerts {
            let _ = writeln!(out, "• {}", alert.title);
        }
    }

    if let Some(trend) = temperature_trend(&snapshot.hourly) {
        let _ = writeln!(out, "\n📈 温度趋势：{trend}");
    }

    let _ = writeln!(out, "\n{DIVIDER}");
    let _ = writeln!(out, "📊 数据来源：彩云天气");
    if let Some(url) = config.pages_url() {
        let _ = write!(out, "📱 [点击查看详细天气预报]({url})");
    }

    out
}

/// One bullet line per hourly entry, at most `limit` of them.
pub fn hourly_excerpt_lines(snapshot: &WeatherSnapshot, limit: usize) -> Vec<String> {
    snapshot
        .hourly
        .iter()
        .take(limit)
        .map(hourly_line)
        .collect()
}

fn hourly_line(entry: &HourlyForecastEntry) -> String {
    let intensity = PrecipIntensity::from_rate(entry.precipitation_mmh);
    // Measured precipitation overrides the sky label, except for snow.
    let desc = if entry.condition.is_snow() || intensity == PrecipIntensity::None {
        entry.condition.label()
    } else {
        intensity.label()
    };
    let annotation = if entry.precipitation_mmh > PRECIP_TRACE {
        format!(" | 降水 {:.1}mm/h", entry.precipitation_mmh)
    } else {
        String::new()
    };

    format!(
        "• {} {} {:.1}°C {}{}",
        entry.time.format("%H:00"),
        entry.condition.icon(entry.precipitation_mmh),
        entry.temperature,
        desc,
        annotation
    )
}

fn weather_tips(snapshot: &WeatherSnapshot) -> Vec<String> {
    let mut tips = Vec::new();

    let next_day = &snapshot.hourly[..snapshot.hourly.len().min(24)];
    let rain_hours = next_day
        .iter()
        .filter(|e| e.condition.is_rain() || e.precipitation_mmh > PRECIP_TRACE)
        .count();
    let snow_hours = next_day.iter().filter(|e| e.condition.is_snow()).count();

    if rain_hours > 0 {
        tips.push(format!("未来24小时有{rain_hours}小时降雨"));
    }
    if snow_hours > 0 {
        tips.push(format!("未来24小时有{snow_hours}小时降雪"));
    }
    if snapshot.humidity_pct >= 80 {
        tips.push("湿度较大，注意防潮".to_string());
    }
    if snapshot.pm25 > 75.0 {
        tips.push("空气质量一般，建议戴口罩".to_string());
    }

    tips
}

/// Note for ±3°C swings between 3-hour sample points, when any exist.
fn temperature_trend(hourly: &[HourlyForecastEntry]) -> Option<String> {
    let mut notes = Vec::new();

    let mut i = 0;
    while i + 1 < hourly.len() {
        let delta = hourly[i + 1].temperature - hourly[i].temperature;
        if delta >= TREND_DELTA {
            notes.push("温度明显回升");
        } else if -delta >= TREND_DELTA {
            notes.push("温度明显下降");
        }
        i += TREND_STEP;
    }

    if notes.is_empty() {
        None
    } else {
        Some(notes.join("，"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{sample_config, sample_snapshot};

    #[test]
    fn report_contains_current_conditions_and_alerts() {
        let text = render_text(&sample_snapshot(), &sample_config());

        assert!(text.contains("🌈 长春市朝阳区天气预报"));
        assert!(text.contains("• 当前温度：-10.3°C"));
        assert!(text.contains("• 体感温度：-16.8°C"));
        assert!(text.contains("• 今日温区：-16.5°C ~ -9.0°C"));
        assert!(text.contains("• 风向：西北风 (315°)"));
        assert!(text.contains("• 道路冰雪黄色预警"));
        assert!(text.contains("📱 [点击查看详细天气预报](https://someone.github.io/weather-push/)"));
    }

    #[test]
    fn watch_trigger_changes_greeting() {
        let mut config = sample_config();
        config.trigger = TriggerEvent::Watch;
        let text = render_text(&sample_snapshot(), &config);

        assert!(text.contains("🌟 感谢关注天气推送服务！"));
        assert!(!text.contains("🌈"));
    }

    #[test]
    fn hourly_excerpt_is_exactly_the_requested_length() {
        let snapshot = sample_snapshot();
        let lines = hourly_excerpt_lines(&snapshot, 6);
        assert_eq!(lines.len(), 6);

        let text = render_text(&snapshot, &sample_config());
        assert!(text.contains("⏰ 未来6小时预报"));
        for line in &lines {
            assert!(text.contains(line.as_str()), "missing line: {line}");
        }
    }

    #[test]
    fn hourly_line_shows_precipitation_override() {
        let snapshot = sample_snapshot();
        let lines = hourly_excerpt_lines(&snapshot, 8);

        // Rain hour: label replaced by bucketed severity, rate annotated.
        assert_eq!(lines[4], "• 18:00 🌧️💧 -15.0°C 中雨 | 降水 1.2mm/h");
        // Snow hour with trace rate keeps the snow label and icon.
        assert_eq!(lines[1], "• 15:00 🌨️ -9.0°C 小雪 | 降水 0.1mm/h");
        // Dry hour: no annotation.
        assert_eq!(lines[2], "• 16:00 ☁️ -11.0°C 阴天");
    }

    #[test]
    fn tips_cover_snow_humidity_and_pm25() {
        let text = render_text(&sample_snapshot(), &sample_config());

        assert!(text.contains("未来24小时有2小时降雪"));
        assert!(text.contains("未来24小时有2小时降雨"));
        assert!(text.contains("湿度较大，注意防潮"));
        assert!(text.contains("空气质量一般，建议戴口罩"));
    }

    #[test]
    fn trend_note_flags_sharp_drops() {
        let text = render_text(&sample_snapshot(), &sample_config());
        assert!(text.contains("📈 温度趋势：温度明显下降"));
    }

    #[test]
    fn no_trend_note_for_flat_temperatures() {
        let mut snapshot = sample_snapshot();
        for entry in &mut snapshot.hourly {
            entry.temperature = -10.0;
        }
        let text = render_text(&snapshot, &sample_config());
        assert!(!text.contains("📈"));
    }
}
