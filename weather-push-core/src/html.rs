//! Standalone HTML report for the static page host.

use std::fmt::Write;

use crate::condition::PRECIP_TRACE;
use crate::config::Config;
use crate::model::WeatherSnapshot;

const STYLESHEET: &str = r#"
* { box-sizing: border-box; }
body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
    margin: 0 auto; max-width: 800px; padding: 15px;
    background-color: #f5f5f5; color: #333; line-height: 1.6;
}
.container {
    background: white; border-radius: 15px; padding: 15px;
    box-shadow: 0 2px 10px rgba(0,0,0,0.1); margin-bottom: 15px;
}
.header {
    text-align: center; margin-bottom: 20px; padding: 10px;
    background: linear-gradient(135deg, #1a73e8, #4285f4);
    color: white; border-radius: 10px;
}
.header h1 { margin: 0; font-size: 1.5em; padding: 10px 0; }
.section {
    margin: 15px 0; padding: 15px; background: #f8f9fa;
    border-radius: 12px; box-shadow: 0 1px 3px rgba(0,0,0,0.05);
}
.section h2 { margin-top: 0; color: #1a73e8; font-size: 1.2em; }
.forecast-row {
    display: flex; gap: 12px; overflow-x: auto;
    -webkit-overflow-scrolling: touch; padding: 15px 0;
}
.forecast-row::-webkit-scrollbar { display: none; }
.forecast-item {
    flex: 0 0 100px; background: white; padding: 12px;
    border-radius: 12px; text-align: center;
    box-shadow: 0 1px 3px rgba(0,0,0,0.1);
}
.forecast-item .time, .forecast-item .date { font-weight: bold; color: #1a73e8; }
.weather-icon { font-size: 2em; margin: 8px 0; }
.current-weather { display: flex; flex-direction: column; align-items: center; padding: 15px; }
.current-temp { font-size: 3em; font-weight: bold; color: #1a73e8; margin: 10px 0; }
.alert {
    background: #fff3cd; border-left: 4px solid #ffc107;
    padding: 12px; margin: 10px 0; border-radius: 8px;
}
.alert h3 { margin: 0 0 8px 0; color: #856404; }
.scroll-hint { text-align: center; color: #666; font-size: 0.9em; opacity: 0.8; }
footer { text-align: center; padding: 15px; color: #666; font-size: 0.9em; }
"#;

/// Render the full HTML document.
pub fn render_html(snapshot: &WeatherSnapshot, config: &Config) -> String {
    let mut out = String::new();
    let updated = snapshot.updated_at.format("%Y-%m-%d %H:%M:%S");

    let _ = write!(
        out,
        "<!DOCTYPE html>\n<html lang=\"zh\">\n<head>\n\
         <meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>{title}天气预报</title>\n\
         <style>{STYLESHEET}</style>\n\
         </head>\n<body>\n<div class=\"container\">\n\
         <div class=\"header\"><h1>🌈 {title}天气预报</h1><div>{updated}</div></div>\n",
        title = escape(&config.location_name),
    );

    if config.options.include_daily && !snapshot.daily.is_empty() {
        let _ = write!(
            out,
            "<div class=\"section\">\n<h2>📅 {}天天气预报</h2>\n\
             <div class=\"scroll-hint\">👈 左右滑动查看更多 👉</div>\n\
             <div class=\"forecast-row\">\n",
            snapshot.daily.len()
        );
        for day in &snapshot.daily {
            let _ = write!(
                out,
                "<div class=\"forecast-item\">\
                 <div class=\"date\">{}</div>\
                 <div class=\"weather-icon\">{}</div>\
                 <div class=\"weather\">{}</div>\
                 <div class=\"temp-range\">{:.1}° ~ {:.1}°</div>\
                 </div>\n",
                day.date.format("%m-%d"),
                day.condition.icon(0.0),
                day.condition.label(),
                day.temp_min,
                day.temp_max,
            );
        }
        let _ = write!(out, "</div>\n</div>\n");
    }

    let _ = write!(
        out,
        "<div class=\"section\">\n<h2>⏰ {}小时预报</h2>\n\
         <div class=\"scroll-hint\">👈 左右滑动查看更多 👉</div>\n\
         <div class=\"forecast-row\">\n",
        snapshot.hourly.len()
    );
    for entry in &snapshot.hourly {
        let precipitation = if entry.precipitation_mmh > PRECIP_TRACE {
            format!(
                "<div class=\"precipitation\">降水：{:.1}mm/h</div>",
                entry.precipitation_mmh
            )
        } else {
            String::new()
        };
        let _ = write!(
            out,
            "<div class=\"forecast-item\">\
             <div class=\"time\">{}</div>\
             <div class=\"weather-icon\">{}</div>\
             <div class=\"temp\">{:.1}°C</div>\
             <div class=\"weather\">{}</div>{precipitation}</div>\n",
            entry.time.format("%H:00"),
            entry.condition.icon(entry.precipitation_mmh),
            entry.temperature,
            entry.condition.label(),
        );
    }
    let _ = write!(out, "</div>\n</div>\n");

    if !snapshot.alerts.is_empty() {
        let _ = write!(out, "<div class=\"section\">\n<h2>⚠️ 气象预警</h2>\n");
        for alert in &snapshot.alerts {
            let _ = write!(
                out,
                "<div class=\"alert\"><h3>{}</h3><p>{}</p></div>\n",
                escape(&alert.title),
                escape(&alert.description),
            );
        }
        let _ = write!(out, "</div>\n");
    }

    let _ = write!(
        out,
        "<div class=\"section\">\n<h2>📌 实时天气</h2>\n<div class=\"current-weather\">\n\
         <div class=\"current-temp\">{:.1}°C</div>\n\
         <div>体感温度：{:.1}°C</div>\n",
        snapshot.temperature, snapshot.feels_like,
    );
    if let Some(today) = snapshot.today() {
        let _ = write!(
            out,
            "<div>今日温区：{:.1}°C ~ {:.1}°C</div>\n",
            today.temp_min, today.temp_max
        );
    }
    let _ = write!(
        out,
        "<div>{}</div>\n</div>\n</div>\n",
        snapshot.condition.label()
    );

    let _ = write!(
        out,
        "</div>\n<footer><p>数据来源：彩云天气</p><p>更新时间：{updated}</p></footer>\n\
         </body>\n</html>\n",
    );

    out
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
